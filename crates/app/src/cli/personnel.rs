use baglan_app::{
    config::AppConfig,
    personnel::{HttpPersonnelService, NewPersonnel, PersonnelService, PersonnelUpdate},
};
use clap::{Args, Subcommand};
use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;

use crate::cli::{client, request_failed};

#[derive(Debug, Args)]
pub(crate) struct PersonnelCommand {
    #[command(subcommand)]
    command: PersonnelSubcommand,
}

#[derive(Debug, Subcommand)]
enum PersonnelSubcommand {
    /// List staff
    List,
    /// Hire a staff member
    Add(AddPersonnelArgs),
    /// Change a staff member's details
    Update(UpdatePersonnelArgs),
    /// Remove a staff member
    Remove(RemovePersonnelArgs),
}

#[derive(Debug, Args)]
struct AddPersonnelArgs {
    /// Full name; the last word is taken as the surname
    #[arg(long)]
    name: String,

    /// Job title
    #[arg(long)]
    position: Option<String>,

    /// Monthly salary
    #[arg(long, default_value_t = Decimal::ZERO)]
    salary: Decimal,

    /// First working day; today when omitted
    #[arg(long)]
    start_date: Option<Date>,
}

#[derive(Debug, Args)]
struct UpdatePersonnelArgs {
    /// Staff id
    #[arg(long)]
    id: u64,

    #[command(flatten)]
    details: AddPersonnelArgs,
}

#[derive(Debug, Args)]
struct RemovePersonnelArgs {
    /// Staff id
    #[arg(long)]
    id: u64,
}

pub(crate) async fn run(config: &AppConfig, command: PersonnelCommand) -> Result<(), String> {
    let service = HttpPersonnelService::new(client(config)?);

    match command.command {
        PersonnelSubcommand::List => {
            let staff = service
                .list_personnel()
                .await
                .map_err(|error| request_failed("list personnel", &error))?;

            if staff.is_empty() {
                println!("no personnel found");
                return Ok(());
            }

            for person in staff {
                println!("id: {}", person.id);
                println!("name: {}", person.name);
                println!("role: {}", person.role);
                println!("salary: ₺{}", person.salary.round_dp(2));
                println!();
            }

            Ok(())
        }
        PersonnelSubcommand::Add(args) => {
            let hire = personnel_details(config, args)?;

            service
                .create_personnel(&hire)
                .await
                .map_err(|error| request_failed("add personnel", &error))?;

            println!("added: {} {}", hire.first_name, hire.last_name);

            Ok(())
        }
        PersonnelSubcommand::Update(args) => {
            let update = PersonnelUpdate {
                id: args.id,
                details: personnel_details(config, args.details)?,
            };

            service
                .update_personnel(&update)
                .await
                .map_err(|error| request_failed("update personnel", &error))?;

            println!("updated: {}", update.id);

            Ok(())
        }
        PersonnelSubcommand::Remove(args) => {
            service
                .delete_personnel(args.id)
                .await
                .map_err(|error| request_failed("remove personnel", &error))?;

            println!("removed: {}", args.id);

            Ok(())
        }
    }
}

fn personnel_details(config: &AppConfig, args: AddPersonnelArgs) -> Result<NewPersonnel, String> {
    if args.name.trim().is_empty() {
        return Err("name cannot be empty".to_string());
    }

    let start_date = match args.start_date {
        Some(date) => date,
        None => {
            let time_zone = config.shop.time_zone().map_err(|error| error.to_string())?;

            Timestamp::now().to_zoned(time_zone).date()
        }
    };

    Ok(NewPersonnel::new(
        &args.name,
        args.position.as_deref(),
        args.salary,
        start_date,
    ))
}
