mod cli;
mod core;
mod http;
mod pool;
mod scanner;
mod wordlist;

use crate::cli::args::Cli;
use crate::core::context::Config;
use crate::core::engine::Engine;
use clap::Parser;
use tracing::Level;

const BANNER: &str = r#"
 ╔══════════════════════════════════════════════════════════╗
 ║                                                          ║
 ║   ███████╗██╗     ███████╗██████╗  ██████╗ ███████╗      ║
 ║   ██╔════╝██║     ██╔════╝██╔══██╗██╔════╝ ██╔════╝      ║
 ║   ███████╗██║     █████╗  ██║  ██║██║  ███╗█████╗        ║
 ║   ╚════██║██║     ██╔══╝  ██║  ██║██║   ██║██╔══╝        ║
 ║   ███████║███████╗███████╗██████╔╝╚██████╔╝███████╗      ║
 ║   ╚══════╝╚══════╝╚══════╝╚═════╝  ╚═════╝ ╚══════╝      ║
 ║                                                          ║
 ║   WordPress login probing tool                           ║
 ║                                                          ║
 ║   Version : 0.1.0                                        ║
 ║   License : Apache-2.0                                   ║
 ║                                                          ║
 ╚══════════════════════════════════════════════════════════╝
"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !cli.quiet {
        println!("\x1b[33m{}\x1b[0m", BANNER); // Yellow color
    }

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let config = Config::from_cli(cli)?;
    let engine = Engine::new(config)?;
    engine.run().await?;

    Ok(())
}
