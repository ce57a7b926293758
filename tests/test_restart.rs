//! Restart-on-failure tests against real child processes

mod common;

use std::time::{Duration, Instant};
use subproc::{
    DescriptorOpts, Process, ProcessOpts, RestartPolicy, RestartingProcess, SubprocError,
};

/// Shell command that fails until it has been run `crashes + 1` times,
/// then prints `success`; attempts are tracked in a state file
fn crashing_process(state: &std::path::Path, crashes: u32) -> Process {
    let script = format!(
        r#"echo x >> "{state}"; if [ "$(wc -l < "{state}")" -gt {crashes} ]; then printf success; else exit 1; fi"#,
        state = state.display(),
        crashes = crashes,
    );
    Process::new(
        "sh",
        ProcessOpts::with_args(["-c", &script]),
        DescriptorOpts::captured(),
    )
}

#[test]
fn test_restart_on_crash_until_success() {
    let dir = tempfile::tempdir().expect("tempdir");
    let proc = crashing_process(&dir.path().join("attempts"), 3);

    let mut restarter = RestartingProcess::new(proc);
    let status = restarter.run().expect("run to success");

    assert!(status.success());
    assert_eq!(restarter.restarts(), 3);
    assert_eq!(restarter.get_ref().stdout_utf8().unwrap(), "success");
}

#[test]
fn test_restart_budget_exhaustion() {
    let mut restarter =
        RestartingProcess::with_policy(common::sh("exit 3"), RestartPolicy::limited(2));
    match restarter.run() {
        Err(SubprocError::RestartBudgetExhausted { restarts }) => assert_eq!(restarts, 2),
        other => panic!(
            "expected budget exhaustion, got {:?}",
            other.map(|s| s.code())
        ),
    }
}

#[test]
fn test_restart_delay_is_honored() {
    let mut restarter = RestartingProcess::with_policy(
        common::sh("exit 1"),
        RestartPolicy::limited(1).with_delay(Duration::from_millis(80)),
    );

    let started = Instant::now();
    let result = restarter.run();

    assert!(matches!(
        result,
        Err(SubprocError::RestartBudgetExhausted { restarts: 1 })
    ));
    assert!(
        started.elapsed() >= Duration::from_millis(80),
        "restart happened before the configured delay"
    );
}

#[test]
fn test_stopped_process_can_be_rerun_with_restarts() {
    // An earlier stop() must not mark the process stopped forever: once
    // restarted, the wrapper supervises it like any other run
    let mut proc = common::sh("exit 1");
    proc.start().expect("start");
    proc.stop().expect("stop");
    proc.wait().expect("wait");

    let mut restarter = RestartingProcess::with_policy(proc, RestartPolicy::limited(2));
    match restarter.run() {
        Err(SubprocError::RestartBudgetExhausted { restarts }) => assert_eq!(restarts, 2),
        other => panic!(
            "wrapper should restart a re-started process, got {:?}",
            other.map(|s| s.code())
        ),
    }
    assert!(!restarter.get_ref().was_stopped());
}

#[test]
fn test_budget_failure_still_exposes_capture() {
    let mut restarter = RestartingProcess::with_policy(
        common::sh("printf attempt; exit 1"),
        RestartPolicy::limited(1),
    );
    let _ = restarter.run();

    // One initial run plus one restart
    assert_eq!(restarter.get_ref().stdout_utf8().unwrap(), "attemptattempt");
}
