use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use std::process::ExitCode;

use medimanage_backend::config::AppConfig;
use medimanage_backend::initialize_backend;
use medimanage_backend::io::cli::{self, Cli};
use medimanage_backend::io::output::Output;

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), cli.data_dir.clone())?;

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .init();

    let mut app_state = initialize_backend(&config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::run(
        cli.command,
        &config,
        &mut app_state.medication_service,
        Output::new(cli.json),
        &mut out,
    )
}
