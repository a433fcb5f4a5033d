#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use autotoken::{
    display, fetch_tokens, settings::AutotokenSettings, ReqwestTransport, TokenResult,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from .env, Settings.toml and environment variables
    let settings = AutotokenSettings::load().context("Failed to load settings")?;
    settings
        .init_logging()
        .context("Failed to initialize logging")?;

    let transport =
        ReqwestTransport::from_settings(&settings.http).context("Failed to build HTTP client")?;

    let tokens = fetch_tokens(&settings, &transport).await?;

    print_tokens(&tokens);
    Ok(())
}

fn print_tokens(tokens: &TokenResult) {
    if let Some(id_token) = &tokens.id_token {
        println!("ID_TOKEN={id_token}");
    }
    if let Some(access_token) = &tokens.access_token {
        println!("ACCESS_TOKEN={access_token}");
    }
    if let Some(expires_in) = tokens.expires_in {
        println!("EXPIRES_IN={expires_in}");
    }
    println!();
    print!("{}", display::describe_tokens(tokens));
}
