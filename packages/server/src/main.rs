#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use reviewflow_server::{ServerConfig, run_server};

#[derive(Parser)]
#[command(name = "reviewflow-server")]
#[command(about = "Reviewer assignment and pull request lifecycle service", long_about = None)]
struct Cli {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Seed reviewer selection for reproducible assignments
    #[arg(long, env = "REVIEWFLOW_RNG_SEED")]
    rng_seed: Option<u64>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = ServerConfig::default()
        .with_host(cli.host)
        .with_port(cli.port)
        .with_rng_seed(cli.rng_seed);

    run_server(config).await
}
