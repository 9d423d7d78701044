use clap::Parser;
use jotter_core::core_version;
use jotter_web::cli::CliConfig;
use jotter_web::{build_rocket, figment_for, init_logging_from};
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = CliConfig::parse();
    let figment = figment_for(&cli);

    if let Err(err) = init_logging_from(&figment) {
        eprintln!("jotter: {err}");
        return ExitCode::FAILURE;
    }
    info!(
        "event=startup module=main status=start version={} core_version={}",
        env!("CARGO_PKG_VERSION"),
        core_version()
    );

    let rocket = match build_rocket(figment) {
        Ok(rocket) => rocket,
        Err(err) => {
            error!("event=startup module=main status=error error={}", err);
            eprintln!("jotter: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = rocket::execute(rocket.launch()) {
        error!("event=launch module=main status=error error={}", err);
        eprintln!("jotter: failed to launch: {err}");
        return ExitCode::FAILURE;
    }

    info!("event=shutdown module=main status=ok");
    ExitCode::SUCCESS
}
