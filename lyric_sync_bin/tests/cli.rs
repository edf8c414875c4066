//! End-to-end checks of the `lyric_sync` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn lrc_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write lyrics");
    file
}

fn lyric_sync() -> Command {
    Command::cargo_bin("lyric_sync").expect("binary built")
}

#[test]
fn dump_sorts_and_drops_noise() {
    let file = lrc_file("[00:20.000]c\r\n# comment\r\n[00:00.000]a\r\n\r\n[00:10.000] b \r\n[00:05]x\r\n");
    lyric_sync()
        .arg("dump")
        .arg(file.path())
        .assert()
        .success()
        .stdout("[00:00.000]a\n[00:10.000]b\n[00:20.000]c\n3 entries\n");
}

#[test]
fn dump_keeps_same_time_lines_in_order() {
    let file = lrc_file("[00:05.000]A\n[00:01.000]first\n[00:05.000]B\n");
    lyric_sync()
        .arg("dump")
        .arg(file.path())
        .assert()
        .success()
        .stdout("[00:01.000]first\n[00:05.000]A\n[00:05.000]B\n3 entries\n");
}

#[test]
fn dump_without_lyrics_is_not_an_error() {
    let file = lrc_file("hello world\n[00:05]x\n");
    lyric_sync()
        .arg("dump")
        .arg(file.path())
        .assert()
        .success()
        .stdout("no lyrics available\n");
}

#[test]
fn at_follows_forward_playback_and_seeks() {
    let file = lrc_file("[00:00.000]a\n[00:10.000]b\n[00:20.000]c\n");
    lyric_sync()
        .arg("at")
        .arg(file.path())
        .args(["0", "5", "9.999", "10", "15", "25", "3"])
        .assert()
        .success()
        .stdout(
            "0.000 -> #0 [00:00] a\n\
             10.000 -> #1 [00:10] b\n\
             25.000 -> #2 [00:20] c\n\
             3.000 -> #0 [00:00] a\n",
        );
}

#[test]
fn at_floors_early_positions_to_first_line() {
    let file = lrc_file("[00:09.702]x\n[00:13.440]y\n");
    lyric_sync()
        .arg("at")
        .arg(file.path())
        .arg("--")
        .args(["-2", "0", "14"])
        .assert()
        .success()
        .stdout("-2.000 -> #0 [00:09] x\n14.000 -> #1 [00:13] y\n");
}

#[test]
fn play_prints_lines_as_the_clock_passes_them() {
    let file = lrc_file("[00:00.000]a\n[00:10.000]b\n[00:20.000]c\n");
    lyric_sync()
        .arg("play")
        .arg(file.path())
        .args(["--speed", "1000", "--tick-ms", "1", "--tail", "0"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("00:00  a\n").and(predicate::str::ends_with("00:20  c\n")));
}

#[test]
fn play_rejects_non_positive_speed() {
    let file = lrc_file("[00:00.000]a\n");
    lyric_sync()
        .arg("play")
        .arg(file.path())
        .args(["--speed", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--speed must be a positive number"));
}

#[test]
fn play_rejects_non_finite_start() {
    let file = lrc_file("[00:00.000]a\n");
    lyric_sync()
        .arg("play")
        .arg(file.path())
        .args(["--from", "NaN"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--from must be a finite number"));
}

#[test]
fn play_rejects_non_finite_tail() {
    let file = lrc_file("[00:00.000]a\n");
    lyric_sync()
        .arg("play")
        .arg(file.path())
        .args(["--tail", "inf"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--tail must be a finite number"));
}

#[test]
fn missing_file_is_reported() {
    lyric_sync()
        .arg("dump")
        .arg("definitely/not/here.lrc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read definitely/not/here.lrc"));
}
