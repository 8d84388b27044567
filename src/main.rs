use std::process;

use clap::Parser;
use ikono::{
    application::error::AppError,
    config::{self, CliArgs, Command},
    infra::telemetry,
};
use tracing::{Dispatch, Level, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

mod commands;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let cli = CliArgs::parse();

    // Enquiries go to the site, not Cockpit, so they need no CMS credentials.
    if let Command::Enquire(args) = &cli.command {
        let logging = config::load_logging(&cli)?;
        telemetry::init(&logging)?;
        return commands::enquire(args).await;
    }

    let settings = config::load(&cli)?;
    telemetry::init(&settings.logging)?;

    let context = commands::Context::build(&settings)?;
    commands::dispatch(&context, cli.command).await
}
