use clap::Parser;
use std::process::ExitCode;

mod cli;
mod config;
mod error;
mod handler;
mod http;
mod logger;
mod scan;
mod server;

use error::ServerError;

fn main() -> ExitCode {
    exit_code_for(try_main())
}

/// Report a failed run and pick the process exit status
fn exit_code_for(result: Result<(), ServerError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        // Reported, not raised: the user just needs another port
        Err(ServerError::PortInUse { port }) => {
            logger::log_port_in_use(port);
            ExitCode::SUCCESS
        }
        Err(e) => {
            logger::log_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<(), ServerError> {
    let args = cli::Cli::parse();
    let overrides = config::Overrides {
        host: args.bind.as_deref(),
        port: args.port,
        no_open: args.no_open,
        verbose: args.verbose,
    };
    let cfg = config::Config::load_from(args.config.as_deref(), &overrides)?;
    let root = std::env::current_dir()?;

    // Requests are handled one at a time, so a single thread is enough
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(server::run(cfg, root))
}
