use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{error, info};
use waterman_cli::{run, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let result = match &cli.output {
        Some(path) => {
            info!("writing {}", path.display());
            File::create(path)
                .map_err(Into::into)
                .and_then(|file| run(&cli, BufWriter::new(file)))
        }
        None => run(&cli, io::stdout().lock()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
