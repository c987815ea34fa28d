use clap::Parser;
use colored::Colorize;

mod cli;
mod commands;

fn main() {
    let cli = cli::Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    if let Err(err) = commands::run_command(cli) {
        eprintln!("{} {err:#}", "error:".red().bold());
        let code = err
            .downcast_ref::<gitm_repo::RepoError>()
            .map(|e| e.exit_code())
            .unwrap_or(1);
        std::process::exit(code);
    }
}
