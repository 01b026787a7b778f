//! WQ CLI - Command line tool for water quality sensor data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wq-cli",
    version,
    about = "Water quality sensor data toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: wq_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("wq-cli {}", env!("CARGO_PKG_VERSION"));
    wq_cmd::run(cli.command).await
}
