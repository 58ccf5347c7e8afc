use std::{io, path::PathBuf};

use baglan::{
    draft::DraftFixture,
    gate::{WizardStep, check_step},
    pricing::expand_to_line_items,
    receipt::Receipt,
};
use baglan_app::config::AppConfig;
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Draft YAML file
    #[arg(long)]
    draft: PathBuf,
}

pub(crate) fn run(config: &AppConfig, args: QuoteArgs) -> Result<(), String> {
    let catalog = config
        .shop
        .catalog()
        .map_err(|error| format!("failed to load catalog: {error}"))?;

    let draft = DraftFixture::load(&args.draft)
        .and_then(DraftFixture::into_draft)
        .map_err(|error| format!("failed to load draft {}: {error}", args.draft.display()))?;

    for step in WizardStep::ALL {
        match check_step(step, &draft, &catalog) {
            Ok(()) => println!("{step}: complete"),
            Err(reason) => println!("{step}: {reason}"),
        }
    }

    let line_items = expand_to_line_items(&draft, &catalog)
        .map_err(|error| format!("failed to price draft: {error}"))?;

    Receipt::new(&line_items)
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to print quote: {error}"))
}
