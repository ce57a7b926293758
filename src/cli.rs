//! CLI argument definitions using clap

use crate::config::Config;
use crate::restart::RestartPolicy;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "subproc", version, about = "Run a command under supervision", long_about = None)]
pub struct Args {
    /// Additional KEY=VALUE environment entries for the child
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,

    /// Restart the command when it exits non-zero
    #[arg(long = "restart")]
    pub restart: bool,

    /// Give up after N restarts (implies --restart)
    #[arg(long = "max-restarts", value_name = "N")]
    pub max_restarts: Option<u32>,

    /// Pause between restarts (e.g. 500ms, 2s)
    #[arg(long = "restart-delay", value_name = "DURATION", value_parser = parse_duration)]
    pub restart_delay: Option<Duration>,

    /// Suppress supervisor logging
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Command to run and its arguments
    #[arg(value_name = "COMMAND", required = true, trailing_var_arg = true)]
    pub command: Vec<String>,
}

impl Args {
    /// Resolve the restart policy from flags and config-file defaults
    ///
    /// Flags win over the config file. `None` means run the command once.
    pub fn restart_policy(&self, config: &Config) -> Option<RestartPolicy> {
        let enabled = self.restart || self.max_restarts.is_some() || config.restart;
        if !enabled {
            return None;
        }

        Some(RestartPolicy {
            max_restarts: self.max_restarts.or(config.max_restarts),
            delay: self
                .restart_delay
                .or(config.restart_delay)
                .unwrap_or(Duration::ZERO),
        })
    }
}

fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {:?}", raw)),
    }
}

fn parse_duration(raw: &str) -> Result<Duration, String> {
    humantime::parse_duration(raw).map_err(|e| e.to_string())
}
