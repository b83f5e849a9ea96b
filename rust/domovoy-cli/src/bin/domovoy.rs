use std::io;

use anyhow::Result;
use clap::Parser;
use domovoy_cli::DomovoyCli;
use domovoy_cli::bootstrap::Home;
use domovoy_cli::console::Console;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,domovoy=debug")),
        )
        .init();

    let cli = DomovoyCli::parse();
    info!("Starting Domovoy v{}", env!("CARGO_PKG_VERSION"));

    let home = Home::from_cli(&cli)?;
    let console = Console::new(home, cli.sender);
    console.run(io::stdin().lock(), io::stdout().lock())
}
