use baglan_app::{
    auth::{AuthService, HttpAuthService},
    config::AppConfig,
};
use clap::Args;

use crate::cli::{client, request_failed};

#[derive(Debug, Args)]
pub(crate) struct LoginArgs {
    /// Account name
    #[arg(long)]
    username: String,

    /// Account password
    #[arg(long, env = "BAGLAN_PASSWORD", hide_env_values = true)]
    password: String,
}

pub(crate) async fn run(config: &AppConfig, args: LoginArgs) -> Result<(), String> {
    let service = HttpAuthService::new(client(config)?);

    let session = service
        .login(args.username.trim(), &args.password)
        .await
        .map_err(|error| request_failed("log in", &error))?;

    println!("full_name: {}", session.full_name);
    println!("role: {}", session.role);
    println!("api_token: {}", session.token.as_str());
    println!("export BAGLAN_API_TOKEN to use this session in later commands");

    Ok(())
}
