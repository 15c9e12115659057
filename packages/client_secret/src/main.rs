//! `generate-secret`: print a Sign in with Apple client secret

use anyhow::{Context, Result};
use appleid_client_secret::{ClientSecretBuilder, ClientSecretConfig, logging};
use clap::Parser;
use std::path::PathBuf;
use zeroize::Zeroizing;

const SECS_PER_DAY: i64 = 86_400;

#[derive(Parser)]
#[command(name = "generate-secret")]
#[command(about = "Generate an ES256 client secret for Sign in with Apple")]
#[command(version)]
struct Cli {
    /// Path to the PKCS#8 private key (.p8) from the developer account
    #[arg(long, env = "APPLE_KEY_FILE")]
    key_file: PathBuf,

    /// Team identifier, written to `iss`
    #[arg(long, env = "APPLE_TEAM_ID")]
    team_id: String,

    /// Services identifier, written to `sub`
    #[arg(long, env = "APPLE_CLIENT_ID")]
    client_id: String,

    /// Key identifier, written to the `kid` header
    #[arg(long, env = "APPLE_KEY_ID")]
    key_id: String,

    /// JSON file with `audience` and/or `validity_secs`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Validity window in days (overrides the config file)
    #[arg(long)]
    validity_days: Option<i64>,

    /// Print `{token, issued_at, expires_at}` as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ClientSecretConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ClientSecretConfig::default(),
    };
    if let Some(days) = cli.validity_days {
        config = config.with_validity_secs(days.saturating_mul(SECS_PER_DAY));
    }

    let builder = ClientSecretBuilder::new()
        .with_config(config)
        .context("invalid configuration")?;

    let pem = Zeroizing::new(
        std::fs::read_to_string(&cli.key_file)
            .with_context(|| format!("failed to read private key {}", cli.key_file.display()))?,
    );

    let secret = builder
        .issue(&pem, &cli.team_id, &cli.client_id, &cli.key_id)
        .context("failed to generate client secret")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&secret)?);
    } else {
        println!("{}", secret.token);
    }
    Ok(())
}
