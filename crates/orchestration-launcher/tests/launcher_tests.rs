//! Integration tests for the server launcher
//!
//! These drive real tiny executables (`true`, `false`, stub shell scripts)
//! instead of the orchestration server itself.

use orchestration_launcher::{Error, Options, ServerLauncher};

#[smol_potat::test]
async fn test_start_resolves_on_clean_exit() {
    let launcher = ServerLauncher::with_program("true");
    launcher.start(&Options::default()).await.unwrap();
}

#[smol_potat::test]
async fn test_non_zero_exit_reports_the_code() {
    let launcher = ServerLauncher::with_program("false");
    let err = launcher.stop(&Options::default()).await.unwrap_err();
    match err {
        Error::NonZeroExit { command, code } => {
            assert_eq!(code, Some(1));
            assert!(command.starts_with("false stop"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[smol_potat::test]
async fn test_missing_program_is_command_not_found() {
    let launcher = ServerLauncher::with_program("mongo-orchestration-does-not-exist");
    let err = launcher.start(&Options::default()).await.unwrap_err();
    match err {
        Error::CommandNotFound { command } => {
            assert_eq!(command, "mongo-orchestration-does-not-exist");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[smol_potat::test]
async fn test_subcommand_and_flags_reach_the_process() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("stub-server.sh");
    let argv_file = dir.path().join("argv.txt");
    std::fs::write(
        &script,
        format!("#!/bin/sh\necho \"$@\" > {}\n", argv_file.display()),
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let launcher = ServerLauncher::with_program(&script);
    let options = Options {
        port: Some(9000),
        no_fork: true,
        ..Options::default()
    };
    launcher.restart(&options).await.unwrap();

    let argv = std::fs::read_to_string(&argv_file).unwrap();
    assert_eq!(
        argv.trim(),
        "restart --bind 127.0.0.1 --port 9000 --no-fork"
    );
}
