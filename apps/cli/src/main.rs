//! `grocer` binary entry point.

use std::process::ExitCode;

use clap::Parser;
use grocer_cli::{init_tracing, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    match cli.run().await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(err) if json => {
            match serde_json::to_string(&err) {
                Ok(body) => eprintln!("{}", body),
                Err(_) => eprintln!("error: {}", err),
            }
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
