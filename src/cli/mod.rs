pub mod commands;
pub mod output;

use clap::Parser;

/// Authorize SSH public keys from trusted keyserver identities.
#[derive(Parser, Debug)]
#[command(name = "keyferry", version, about, long_about = None)]
pub struct Cli {
    /// Keyserver identities to import keys for
    #[arg(required = true, value_name = "IDENTIFIER")]
    pub identifiers: Vec<String>,

    /// Write keys to FILE instead of ~/.ssh/authorized_keys ('-' for stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Let proxy configuration from the environment reach the fetch
    #[arg(short, long)]
    pub environment: bool,
}
