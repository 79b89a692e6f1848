use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cookievault::cli::Cli::parse();
    cli.run()
}
