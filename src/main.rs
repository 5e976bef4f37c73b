use crate::config::{RunConfig, CONFIG_ENV};
use crate::errors::ConfigError;
use crate::scraper::Orchestrator;
use clap::Parser;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{error, info};

mod config;
mod domain;
mod errors;
mod js;
mod logging;
mod schema;
mod scraper;

#[cfg(test)]
mod tests;

#[derive(Parser)]
#[command(name = "rental_scraper")]
#[command(about = "Scrape rental listings and print them as JSON lines")]
struct Cli {
    /// JSON run configuration
    #[arg(env = CONFIG_ENV)]
    config: PathBuf,
}

fn main() {
    // 1️⃣ Environment, logging and arguments
    dotenvy::dotenv().ok();
    logging::init_logging();
    let cli = Cli::parse();

    // 2️⃣ Configuration: every fatal error happens here, before any request
    let (config, orchestrator) = match setup(&cli) {
        Ok(ready) => ready,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    // 3️⃣ Discover and extract
    let records = orchestrator.run(&config.areas, &config.filters);

    // 4️⃣ One JSON record per line on stdout
    let mut out = BufWriter::new(io::stdout().lock());
    for record in &records {
        let written = serde_json::to_string(record)
            .map_err(io::Error::from)
            .and_then(|line| writeln!(out, "{line}"));
        if let Err(e) = written {
            error!(error = %e, "could not write record");
            std::process::exit(1);
        }
    }
    if let Err(e) = out.flush() {
        error!(error = %e, "could not flush output");
        std::process::exit(1);
    }

    info!(records = records.len(), "done");
}

fn setup(cli: &Cli) -> Result<(RunConfig, Orchestrator), ConfigError> {
    let config = RunConfig::load(&cli.config)?;
    let orchestrator = Orchestrator::new(config.site_profile()?, config.fetch_config(), config.workers);

    Ok((config, orchestrator))
}
