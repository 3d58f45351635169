mod app;
mod command;

use std::io;
use std::process::ExitCode;

use clap::Parser;

use crate::app::App;
use crate::command::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = nksctx_config::AppConfig::load();
    let app = App::new(config, cli.profile().map(str::to_string));

    match app.run(cli.command()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
