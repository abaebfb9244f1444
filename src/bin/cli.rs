//! leadreach CLI
//!
//! Local execution entry point. For AWS Lambda, use `leadreach-lambda`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use leadreach::{
    error::Result,
    models::Config,
    pipeline,
    services::SmtpSender,
    utils::{self, log},
};

/// leadreach - LinkedIn Lead Outreach
#[derive(Parser, Debug)]
#[command(
    name = "leadreach",
    version,
    about = "Scrape, enrich and contact LinkedIn leads"
)]

struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "leadreach.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Suppress per-lead output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one outreach pass (default)
    Run,

    /// Validate configuration and environment
    Validate,

    /// Print the message a lead would receive, without sending it
    Preview {
        /// Recipient display name
        #[arg(long, default_value = "Alice")]
        name: String,

        /// Recipient address
        #[arg(long, default_value = "alice@example.com")]
        email: String,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        ::log::info!(
            "No config file at {}, using defaults and environment",
            cli.config.display()
        );
        Config::default()
    };
    config.apply_env()?;

    log::init(&config.logging.level);
    if cli.quiet {
        config.logging.show_progress = false;
    }

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            config.validate()?;
            let report = pipeline::run_from_config(&config).await?;
            ::log::info!(
                "Processed {} leads ({} sent)",
                report.outcomes.len(),
                report.sent()
            );
        }

        Command::Validate => {
            ::log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                ::log::error!("Config validation failed: {}", e);
                return Err(e);
            }

            log::summary(
                "Configuration",
                &[
                    ("Agent", config.phantombuster.agent_id.clone()),
                    (
                        "Scraper key",
                        utils::redact(&config.phantombuster.api_key),
                    ),
                    ("Search", config.phantombuster.search_query.clone()),
                    ("Batch size", config.phantombuster.batch_size.to_string()),
                    ("Enrichment key", utils::redact(&config.enrichment.api_key)),
                    (
                        "SMTP",
                        format!("{}:{}", config.smtp.host, config.smtp.port),
                    ),
                    ("Sender", config.smtp.sender().to_string()),
                    ("SMTP password", utils::redact(&config.smtp.password)),
                ],
            );
            log::success("✓ Config OK");
        }

        Command::Preview { name, email } => {
            let message = SmtpSender::new(&config).compose(&email, &name);
            println!("To: {}", message.recipient);
            println!("Subject: {}", message.subject);
            println!();
            println!("{}", message.body);
        }
    }

    Ok(())
}
