//! Command-line behaviour that needs no network access.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_config(dir: &Path) -> std::path::PathBuf {
    fs::write(dir.join("schoolBee_1.txt"), "tag\nice cream\n\n").unwrap();
    let config = serde_json::json!({
        "project_root": dir,
        "levels": [{"level": "1B", "source_file": "schoolBee_1.txt"}],
        "courtesy_delay_ms": 0
    });
    let path = dir.join("job.json");
    fs::write(&path, config.to_string()).unwrap();
    path
}

fn bin(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("spellbee-audio").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_verify_reports_missing_words() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    fs::write(dir.path().join("ref.txt"), "Tag\nice cream\nSeñor\n").unwrap();

    bin(dir.path())
        .arg("verify")
        .arg("--config")
        .arg(&config)
        .arg("--level")
        .arg("1B=ref.txt")
        .assert()
        .success()
        .stdout(predicate::str::contains("MISSING FROM 1B:"))
        .stdout(predicate::str::contains("  - Señor"))
        .stdout(predicate::str::contains("Total missing: 1"));
}

#[test]
fn test_missing_api_key_exits_with_error() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    bin(dir.path())
        .env_remove("OPENAI_API_KEY")
        .arg("generate")
        .arg("--config")
        .arg(&config)
        .write_stdin("\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("API key is required"));

    assert!(!dir.path().join("audio").exists());
}

#[test]
fn test_complete_level_is_skipped_without_requests() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let audio = dir.path().join("audio").join("1B");
    fs::create_dir_all(&audio).unwrap();
    fs::write(audio.join("tag.mp3"), b"x").unwrap();
    fs::write(audio.join("ice_cream.mp3"), b"x").unwrap();

    bin(dir.path())
        .env("OPENAI_API_KEY", "sk-test")
        .arg("generate")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped:   2"))
        .stdout(predicate::str::contains("Generated: 0"));

    let exported = fs::read_to_string(dir.path().join("data").join("words_1B.json")).unwrap();
    assert!(exported.contains("\"ice cream\""));
}

#[test]
fn test_force_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    bin(dir.path())
        .env("OPENAI_API_KEY", "sk-test")
        .arg("generate")
        .arg("--force")
        .arg("--config")
        .arg(&config)
        .write_stdin("n\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Aborted"));
}

#[test]
fn test_unknown_level_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    bin(dir.path())
        .env("OPENAI_API_KEY", "sk-test")
        .args(["generate", "--level", "9Z", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown level '9Z'"));
}

#[test]
fn test_top_level_force_spellings_ask_for_confirmation() {
    for flag in ["-f", "--force"] {
        let dir = TempDir::new().unwrap();
        let config = write_config(dir.path());

        bin(dir.path())
            .env("OPENAI_API_KEY", "sk-test")
            .arg(flag)
            .arg("--config")
            .arg(&config)
            .write_stdin("n\n")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Continue? (y/n)"))
            .stderr(predicate::str::contains("Aborted"));
    }
}

#[test]
fn test_usage_errors_exit_with_one() {
    let dir = TempDir::new().unwrap();

    bin(dir.path())
        .arg("--no-such-flag")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--no-such-flag"));

    bin(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
}

#[cfg(unix)]
mod unix {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;
    use std::process::{Command, Stdio};
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn interrupt_at_key_prompt_exits_with_one() {
        let dir = TempDir::new().unwrap();
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_spellbee-audio"));
        cmd.current_dir(dir.path())
            .env_remove("OPENAI_API_KEY")
            .env_remove("RUST_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = cmd.spawn().expect("spawn spellbee-audio");
        sleep(Duration::from_millis(500));
        kill(Pid::from_raw(child.id() as i32), Signal::SIGINT).expect("send SIGINT");

        let output = child.wait_with_output().expect("wait output");
        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Interrupted by user"), "stderr: {stderr}");
        assert!(!dir.path().join("audio").exists());
    }
}
