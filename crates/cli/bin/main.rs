//! The interface to the SQM command-line tool.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sqm_cli::{run, Command, Context};

/// Translate query requests through the semantic query model.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// The directory holding the configuration.
    #[arg(long = "context", env = "SQM_CONTEXT_PATH", default_value = ".")]
    context_path: PathBuf,

    #[command(subcommand)]
    subcommand: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let context = Context {
        context_path: args.context_path,
    };
    match run(args.subcommand, context).await {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
