use clap::Parser;

/// Casper: a chat assistant that answers questions from a biography.
#[derive(Parser, Debug)]
#[command(name = "casper", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log filter override (e.g. `casper=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Send a single message, print the reply, and exit.
    #[arg(short = 'm', long)]
    pub message: Option<String>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
