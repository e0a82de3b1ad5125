use anyhow::Context;
use clap::Parser;
use dayplan::cli::Cli;
use dayplan::cli_handlers::Session;
use dayplan::config::Config;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        return ExitCode::from(2);
    }
    ExitCode::SUCCESS
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = Config::from(cli);
    tracing::debug!(?config, "starting session");
    let mut session = Session::new(&config);

    match &cli.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("cannot read script {}", path.display()))?;
            session.run(BufReader::new(file), false)?;
        }
        None => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            session.run(stdin.lock(), prompt)?;
        }
    }

    tracing::debug!(tasks = session.schedule().count(), "session ended");
    Ok(())
}
