//! Supervisor execution logic
//!
//! Wires the CLI arguments, config defaults, interrupt relay, and
//! restart policy together and runs the command to completion.

use crate::cli::Args;
use crate::config::Config;
use crate::descriptors::DescriptorOpts;
use crate::errors::Result;
use crate::process::{Process, ProcessOpts};
use crate::restart::RestartingProcess;
use crate::signals;
use crate::status::ExitStatus;
use tracing::{error, info};

/// Run the supervised command described by `args`.
pub fn run(args: Args) -> ExitStatus {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "failed to load config");
            return ExitStatus::Error;
        }
    };

    // clap guarantees at least one trailing value
    let Some((program, argv)) = args.command.split_first() else {
        error!("no command given");
        return ExitStatus::Error;
    };

    let opts = ProcessOpts {
        args: argv.to_vec(),
        additional_env: args.env.clone(),
    };
    let proc = Process::new(program.clone(), opts, DescriptorOpts::default());

    // If the handler cannot be installed the command still runs, just
    // without Ctrl+C relay
    signals::reset_interrupted();
    signals::install_relay().ok();

    info!(program = %program, "starting supervised command");
    let outcome = match args.restart_policy(&config) {
        Some(policy) => {
            let mut restarter = RestartingProcess::with_policy(proc, policy);
            restarter.run_with(|p| {
                if let Some(pid) = p.id() {
                    signals::set_relay_target(pid);
                }
            })
        }
        None => run_once(proc),
    };
    signals::clear_relay_target();

    if signals::was_interrupted() {
        return ExitStatus::Interrupted;
    }

    match outcome {
        Ok(status) => ExitStatus::from_child(status),
        Err(e) => {
            error!(error = %e, "supervision failed");
            ExitStatus::Error
        }
    }
}

fn run_once(mut proc: Process) -> Result<std::process::ExitStatus> {
    proc.start()?;
    if let Some(pid) = proc.id() {
        signals::set_relay_target(pid);
    }
    proc.wait()
}
