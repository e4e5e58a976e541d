use std::{error::Error, path::PathBuf, time::Duration};

use clap::Parser;
use model::municipality;
use overpass::{OverpassClient, OverpassConfig, DEFAULT_TIMEOUT, OVERPASS_API_URL};
use report::{Classification, Outputs};

/// Classifies bitcoin-accepting establishments of the covered region by
/// municipality and writes the HTML report, the JSON dump and optionally
/// the landing page counters.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Where to write the HTML report.
    #[arg(long, default_value = "analise_estabelecimentos.html")]
    html: PathBuf,

    /// Where to write the classified establishments as JSON.
    #[arg(long, default_value = "dados_estabelecimentos.json")]
    json: PathBuf,

    /// Also write the counters snippet to this path.
    #[arg(long)]
    counters: Option<PathBuf>,

    #[arg(long, env = "OVERPASS_API_URL", default_value = OVERPASS_API_URL)]
    overpass_url: String,

    /// Overpass request timeout in seconds.
    #[arg(long, env = "OVERPASS_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(why) = run(Args::parse()).await {
        log::error!("Report failed: {why}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let client = OverpassClient::new(OverpassConfig {
        api_url: args.overpass_url,
        timeout: Duration::from_secs(args.timeout),
    })?;

    let elements = client.bitcoin_elements(&municipality::coverage()).await?;
    log::info!("Found {} establishments.", elements.len());

    let classification = Classification::classify(elements);
    for (bucket, count) in classification.summary() {
        log::info!("- {bucket}: {count} establishments");
    }

    Outputs {
        html: args.html,
        json: args.json,
        counters: args.counters,
    }
    .write(&classification)?;

    Ok(())
}
