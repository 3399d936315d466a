mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;

use cli::Cli;

fn main() {
    let args = Cli::parse();

    match cli::commands::import::execute(&args) {
        Ok(0) => {}
        Ok(failures) => {
            // The exit code is the per-identifier failure tally.
            std::process::exit(failures.min(255) as i32);
        }
        Err(e) => {
            cli::output::error(&format!("Error: {e}"));
            std::process::exit(1);
        }
    }
}
