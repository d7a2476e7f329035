//! cpcheck CLI entry point.

use clap::Parser;
use cpcheck::cli::{self, Cli, Commands, EXIT_ERROR};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let builder = FmtSubscriber::builder().with_writer(std::io::stderr);
    let result = match EnvFilter::try_from_default_env() {
        Ok(filter) => tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish()),
        Err(_) => tracing::subscriber::set_global_default(builder.with_max_level(level).finish()),
    };

    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {}", e);
        std::process::exit(EXIT_ERROR);
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let exit_code = match &cli.command {
        Commands::Scan(args) => with_config(&cli, |config| cli::run_scan(args, config)),
        Commands::Serve(args) => with_config(&cli, |config| cli::run_serve(args, config)),
        Commands::Init(args) => run(cli::run_init(args)),
    };

    std::process::exit(exit_code);
}

fn with_config<F>(cli: &Cli, f: F) -> i32
where
    F: FnOnce(&cpcheck::Config) -> anyhow::Result<i32>,
{
    match cli::load_config(cli) {
        Ok(config) => run(f(&config)),
        Err(e) => {
            eprintln!("Error: invalid config: {}", e);
            EXIT_ERROR
        }
    }
}

fn run(result: anyhow::Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    }
}
