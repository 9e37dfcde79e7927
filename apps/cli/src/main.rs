use clap::Parser;
use skc_cli::Cli;
use std::io;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    skc_cli::run(cli, io::stdin().lock(), &mut io::stdout().lock())
}
