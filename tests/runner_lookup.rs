//! Runner executable lookup on PATH.
//!
//! PATH is process-wide state, so every mutation lives in this one test
//! function and the file holds nothing else.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use tbrun::runner::{Runner, RunnerOptions, DEFAULT_RUNNER};
use tbrun::LaunchError;

fn write_executable(dir: &Path, name: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
}

#[test]
fn test_unconfigured_runner_is_looked_up_on_path() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("empty")).unwrap();
    fs::create_dir_all(root.join("bin")).unwrap();
    fs::write(root.join("uart.vhd"), "").unwrap();

    let registered = |output: &str| {
        let mut runner = Runner::from_argv(
            Vec::new(),
            RunnerOptions {
                command: None,
                output_path: root.join(output),
            },
        );
        runner
            .add_library("src_lib")
            .add_source_file(root.join("uart.vhd"))
            .unwrap();
        runner
    };

    let saved_path = std::env::var_os("PATH");

    // Nothing on PATH: a hard error naming the missing executable.
    std::env::set_var("PATH", root.join("empty"));
    let err = registered("out-missing").run(|| {}).unwrap_err();
    match err {
        LaunchError::RunnerNotFound(name) => assert_eq!(name, DEFAULT_RUNNER),
        other => panic!("expected RunnerNotFound, got {other}"),
    }

    // A candidate on PATH is picked up without any configuration.
    write_executable(&root.join("bin"), DEFAULT_RUNNER);
    let mut search = vec![root.join("bin")];
    if let Some(path) = &saved_path {
        search.extend(std::env::split_paths(path));
    }
    std::env::set_var("PATH", std::env::join_paths(search).unwrap());
    let code = registered("out-found").run(|| {}).unwrap();
    assert_eq!(code, 0);

    match saved_path {
        Some(path) => std::env::set_var("PATH", path),
        None => std::env::remove_var("PATH"),
    }
}
