use anyhow::Result;
use bigo::cli::{self, Commands};
use bigo::commands::analyze::AnalyzeConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::parse_args();
    init_tracing(cli.verbosity);

    match cli.command {
        Commands::Analyze {
            paths,
            format,
            strategy,
            evidence,
            max_passes,
            config,
        } => {
            let config = AnalyzeConfig {
                paths,
                format: format.map(Into::into),
                strategy: strategy.map(Into::into),
                evidence,
                max_passes,
                config,
            };
            bigo::commands::analyze::handle_analyze(config)
        }
        Commands::Init { force } => bigo::commands::init::init_config(force),
    }
}

// -v and -vv take precedence over RUST_LOG
fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
