use assert_cmd::Command;
use predicates::prelude::*;

fn yt_captions(config_home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("yt-captions").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("YT_CAPTIONS_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn invalid_input_exits_with_format_guidance() {
    let home = tempfile::tempdir().unwrap();

    yt_captions(home.path())
        .arg("not a url")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Extracting captions").not())
        .stderr(predicate::str::contains("Could not extract video ID"))
        .stderr(predicate::str::contains("Supported formats"))
        .stderr(predicate::str::contains("https://youtu.be/VIDEO_ID"));
}

#[test]
fn ten_character_id_is_rejected() {
    let home = tempfile::tempdir().unwrap();

    yt_captions(home.path())
        .arg("dQw4w9WgXc")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not extract video ID"));
}

#[test]
fn blank_prompt_input_then_eof_fails() {
    let home = tempfile::tempdir().unwrap();

    yt_captions(home.path())
        .write_stdin("\n   \n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Enter a YouTube URL or video ID"))
        .stderr(predicate::str::contains("No YouTube URL or video ID provided"));
}

#[test]
fn prompted_invalid_input_is_rejected() {
    let home = tempfile::tempdir().unwrap();

    yt_captions(home.path())
        .write_stdin("\nnot a url\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Could not extract video ID from: not a url"));
}

#[test]
fn formats_lists_supported_urls() {
    let home = tempfile::tempdir().unwrap();

    yt_captions(home.path())
        .arg("formats")
        .assert()
        .success()
        .stdout(predicate::str::contains("youtube.com/watch?v=VIDEO_ID"))
        .stdout(predicate::str::contains("youtube.com/embed/VIDEO_ID"));
}

#[test]
fn config_init_then_show() {
    let home = tempfile::tempdir().unwrap();

    yt_captions(home.path())
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote default configuration"));

    yt_captions(home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fallback Languages: en, es, fr, de, it, pt"));
}

#[test]
fn config_show_prints_explicit_file() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("custom.yaml");
    std::fs::write(
        &config,
        "transcript:\n  preferred_languages: [de, fr]\nhttp:\n  timeout_secs: 20\n",
    )
    .unwrap();

    yt_captions(home.path())
        .args(["config", "--show", "--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current Configuration"))
        .stdout(predicate::str::contains("Preferred Languages: de, fr"))
        .stdout(predicate::str::contains("HTTP Timeout: 20s"))
        .stdout(predicate::str::contains("Base URL: https://www.youtube.com"));
}

#[test]
fn config_show_conflicts_with_init() {
    let home = tempfile::tempdir().unwrap();

    yt_captions(home.path())
        .args(["config", "--show", "--init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn broken_config_file_fails_before_any_request() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("broken.yaml");
    std::fs::write(&config, "transcript:\n  fallback_languages: []\n").unwrap();

    yt_captions(home.path())
        .args(["--config", config.to_str().unwrap(), "dQw4w9WgXcQ"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("fallback_languages"));
}

#[test]
fn help_mentions_language_flag() {
    let home = tempfile::tempdir().unwrap();

    yt_captions(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--lang"));
}
