use baro_pulse::cli::{run, Cli};
use baro_pulse::error::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
