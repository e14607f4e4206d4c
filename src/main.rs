mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();

    let result = match &args.command {
        Commands::Audit { out } => cli::commands::audit::execute(
            args.token.as_deref(),
            args.config.as_deref(),
            out.as_deref(),
            args.quiet,
        ),
        Commands::Decode { id } => cli::commands::decode::execute(id),
        Commands::Init => cli::commands::init::execute(args.verbose),
        Commands::Status => {
            cli::commands::status::execute(args.config.as_deref(), args.token.as_deref())
        }
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
