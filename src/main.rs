use clap::Parser;
use lanes::cli::commands::Cli;
use lanes::cli::handlers;
use tracing_subscriber::EnvFilter;

/// Log to stderr so stdout stays parseable. `LANES_LOG` takes any
/// `EnvFilter` directive and wins over `-v`.
fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "lanes=debug",
        _ => "lanes=trace",
    };
    let filter = EnvFilter::try_from_env("LANES_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
