use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use pdns_dns01::{
    ChallengeHandler, Credentials, DEFAULT_TTL, config::DEFAULT_CREDENTIALS_PATH,
    powerdns::names::challenge_record_name,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// PowerDNS credentials JSON file ({"api-url": ..., "api-key": ...})
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CREDENTIALS_PATH, global = true)]
    credentials: PathBuf,
    /// PowerDNS API URL without path or API version (overrides the file)
    #[arg(long, value_name = "URL", env = "PDNS_API_URL", global = true)]
    api_url: Option<String>,
    /// PowerDNS API key (overrides the file)
    #[arg(long, value_name = "KEY", env = "PDNS_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Publish the challenge TXT record (certbot --manual-auth-hook)
    Auth(AuthArgs),
    /// Remove the challenge TXT record (certbot --manual-cleanup-hook)
    Cleanup(CleanupArgs),
    /// Print the zone a domain resolves to
    Resolve {
        #[arg(long, value_name = "DOMAIN", env = "CERTBOT_DOMAIN")]
        domain: String,
    },
}

#[derive(Args, Debug)]
struct AuthArgs {
    /// Domain being validated
    #[arg(long, value_name = "DOMAIN", env = "CERTBOT_DOMAIN")]
    domain: String,
    /// Validation token to publish
    #[arg(long, value_name = "TOKEN", env = "CERTBOT_VALIDATION")]
    validation: String,
    /// Record name; the published name is always _acme-challenge.<domain>.
    #[arg(long, value_name = "FQDN")]
    validation_name: Option<String>,
    /// TTL of the challenge record
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TTL)]
    ttl: u32,
    /// Time to wait for the record to propagate before returning
    #[arg(long, value_name = "SECONDS", default_value_t = 10)]
    propagation_seconds: u64,
}

#[derive(Args, Debug)]
struct CleanupArgs {
    /// Domain being validated
    #[arg(long, value_name = "DOMAIN", env = "CERTBOT_DOMAIN")]
    domain: String,
    /// Record to delete (defaults to _acme-challenge.<domain>.)
    #[arg(long, value_name = "FQDN")]
    validation_name: Option<String>,
    /// Validation token that was published
    #[arg(long, value_name = "TOKEN", env = "CERTBOT_VALIDATION", default_value = "")]
    validation: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let credentials = load_credentials(&cli)?;
    let handler = ChallengeHandler::connect(&credentials)
        .await
        .with_context(|| format!("failed to set up PowerDNS at {}", credentials.api_url))?;

    match cli.command {
        Command::Auth(args) => {
            let validation_name = args
                .validation_name
                .unwrap_or_else(|| challenge_record_name(&args.domain));
            handler
                .publish_challenge(&args.domain, &validation_name, &args.validation, args.ttl)
                .await
                .with_context(|| format!("failed to publish challenge for {}", args.domain))?;

            if args.propagation_seconds > 0 {
                info!(seconds = args.propagation_seconds, "waiting for DNS propagation");
                tokio::time::sleep(Duration::from_secs(args.propagation_seconds)).await;
            }
        }
        Command::Cleanup(args) => {
            let validation_name = args
                .validation_name
                .unwrap_or_else(|| challenge_record_name(&args.domain));
            handler
                .remove_challenge(&args.domain, &validation_name, &args.validation)
                .await
                .with_context(|| format!("failed to clean up challenge for {}", args.domain))?;
        }
        Command::Resolve { domain } => match handler.find_zone(&domain) {
            Some(zone) => println!("{}", zone.name),
            None => bail!("no zone hosted by PowerDNS covers {domain}"),
        },
    }

    Ok(())
}

fn load_credentials(cli: &Cli) -> Result<Credentials> {
    Credentials::load(&cli.credentials, cli.api_url.clone(), cli.api_key.clone())
        .context("set --api-url/--api-key or provide a credentials file")
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
