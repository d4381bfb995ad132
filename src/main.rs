use clap::Parser;

use tevd::actions;
use tevd::cli::Cli;
use tevd::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::try_from(cli)?;
    actions::dispatch(&config)
}
