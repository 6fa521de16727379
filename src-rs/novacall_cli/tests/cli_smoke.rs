use std::process::Command;

#[test]
fn help_lists_subcommands() {
    let exe = env!("CARGO_BIN_EXE_novacall");
    let output = Command::new(exe)
        .arg("--help")
        .output()
        .expect("failed to run help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("create"));
    assert!(stdout.contains("watch"));
    assert!(stdout.contains("--backend"));
}

#[test]
fn invalid_backend_is_rejected_before_any_request() {
    let exe = env!("CARGO_BIN_EXE_novacall");
    let output = Command::new(exe)
        .args(["--backend", "ftp://calls.example.com", "watch", "abc123"])
        .env("RUST_LOG", "error")
        .output()
        .expect("failed to run watch");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid client configuration"));
}

#[test]
fn repl_exits_on_eof() {
    let exe = env!("CARGO_BIN_EXE_novacall");
    let output = Command::new(exe)
        .args(["--backend", "http://127.0.0.1:9"])
        .env("RUST_LOG", "error")
        .stdin(std::process::Stdio::null())
        .output()
        .expect("failed to run repl");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Type /help for commands."));
}
