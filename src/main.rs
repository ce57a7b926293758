use clap::Parser;
use subproc::cli::Args;
use subproc::core;
use subproc::status::ExitStatus;
use tracing_subscriber::EnvFilter;

/// Entry point - parses arguments and hands off to core::run()
///
/// Returns ExitStatus directly, which implements std::process::Termination.
fn main() -> ExitStatus {
    let args = Args::parse();

    // Supervisor logging goes to stderr so the child owns stdout
    let filter = if args.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("subproc=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    core::run(args)
}
