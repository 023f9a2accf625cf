//! DomaVault CLI - score a single domain from the terminal
//!
//! Prints the analysis (or the quick score with `--quick`) as JSON.
//! Registry settings come from the same environment variables as the API.

use clap::Parser;
use domavault::{AppConfig, DomainAnalyzer};
use eyre::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Score a tokenized domain against the Doma registry
#[derive(Parser, Debug)]
#[command(name = "domavault", version, about)]
struct Cli {
    /// Domain to score, e.g. example.eth
    domain: String,

    /// Print the quick score instead of the full analysis
    #[arg(short, long)]
    quick: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("domavault=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    debug!(endpoint = %config.doma.endpoint, quick = cli.quick, "Scoring {}", cli.domain);

    let analyzer = DomainAnalyzer::from_config(&config)?;
    let output = if cli.quick {
        serde_json::to_string_pretty(&analyzer.quick_score(&cli.domain, None).await?)?
    } else {
        serde_json::to_string_pretty(&analyzer.analyze(&cli.domain, None).await?)?
    };

    println!("{}", output);
    Ok(())
}
