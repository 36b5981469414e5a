//! Golden tests for reporg
//!
//! These tests copy a fixture project into a fresh git repository, run the binary
//! and compare its TSV output with the expected files under tests/fixtures/golden.
//! rg visits files in parallel, so lines are compared as a sorted set; line order
//! within a single file is checked separately.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;

/// Get the path to the fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn golden(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join("golden").join(name)).expect("golden file")
}

fn copy_dir(src: &Path, dst: &Path) {
    fs::create_dir_all(dst).unwrap();
    for entry in fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        let target = dst.join(entry.file_name());
        if entry.file_type().unwrap().is_dir() {
            copy_dir(&entry.path(), &target);
        } else {
            fs::copy(entry.path(), &target).unwrap();
        }
    }
}

fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

/// The sample project as a git repository with a GitHub origin, or None if tools are missing
fn sample_repo() -> Option<TempDir> {
    let missing: Vec<&str> = ["git", "rg"]
        .into_iter()
        .filter(|t| which::which(t).is_err())
        .collect();
    if !missing.is_empty() {
        let test = std::thread::current().name().unwrap_or("<unnamed>").to_string();
        if std::env::var_os("REPORG_REQUIRE_TOOLS").is_some() {
            panic!("{}: required tools missing: {}", test, missing.join(", "));
        }
        eprintln!("SKIPPED {}: {} not found on PATH", test, missing.join(", "));
        return None;
    }

    let temp = tempfile::tempdir().unwrap();
    copy_dir(&fixtures_dir().join("sample_project"), temp.path());
    git(temp.path(), &["init", "-q"]);
    git(temp.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(
        temp.path(),
        &["remote", "add", "origin", "git@github.com:test/sample.git"],
    );
    Some(temp)
}

/// Create a command for running reporg binary
fn reporg_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("reporg"));
    cmd.env_remove("REPORG_BRANCH")
        .env_remove("REPORG_ENCODING")
        .env_remove("REPORG_MAX_LINE_LENGTH");
    cmd
}

fn sorted_lines(output: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = output.lines().collect();
    lines.sort_unstable();
    lines
}

fn run(cmd: &mut Command) -> String {
    let output = cmd.output().expect("failed to execute");
    assert!(
        output.status.success(),
        "reporg failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("utf-8 output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn golden_package_search() {
        let Some(repo) = sample_repo() else { return };

        let out = run(reporg_cmd().arg("package").arg(repo.path()));
        let expected = golden("package.tsv");

        assert_eq!(sorted_lines(&out), sorted_lines(&expected));
        assert!(out.ends_with('\n'));
        assert!(!out.ends_with("\n\n"));
    }

    #[test]
    fn golden_package_search_hidden() {
        let Some(repo) = sample_repo() else { return };

        let out = run(reporg_cmd()
            .arg("package")
            .arg(repo.path())
            .arg("--hidden")
            .args(["-g", "!.git"]));
        let expected = golden("package_hidden.tsv");

        assert_eq!(sorted_lines(&out), sorted_lines(&expected));
    }

    #[test]
    fn golden_todo_search() {
        let Some(repo) = sample_repo() else { return };

        let out = run(reporg_cmd().arg("TODO").arg(repo.path()));
        assert_eq!(sorted_lines(&out), sorted_lines(&golden("todo.tsv")));
    }

    #[test]
    fn golden_todo_search_with_glob() {
        let Some(repo) = sample_repo() else { return };

        // A single file keeps the order deterministic, so compare bytes exactly
        let out = run(reporg_cmd()
            .arg("TODO")
            .arg(repo.path())
            .args(["-g", "*.go"]));
        assert_eq!(out, golden("todo_go_only.tsv"));
    }

    #[test]
    fn golden_output_file_matches_stdout() {
        let Some(repo) = sample_repo() else { return };
        let out_dir = tempfile::tempdir().unwrap();
        let out_file = out_dir.path().join("todo.tsv");

        let stdout = run(reporg_cmd()
            .arg("TODO")
            .arg(repo.path())
            .args(["-g", "*.go"])
            .arg("-o")
            .arg(&out_file));
        assert_eq!(stdout, "");
        assert_eq!(
            fs::read_to_string(&out_file).unwrap(),
            golden("todo_go_only.tsv")
        );
    }

    #[test]
    fn golden_every_line_has_four_columns() {
        let Some(repo) = sample_repo() else { return };

        let out = run(reporg_cmd().arg(".").arg(repo.path()));
        assert!(!out.is_empty());
        for line in out.lines() {
            let fields: Vec<&str> = line.split('\t').collect();
            assert_eq!(fields.len(), 4, "line {:?}", line);
            assert_eq!(fields[0], "test/sample");

            let (path, line_no) = fields[1].rsplit_once(':').expect("path:line");
            assert_eq!(
                fields[3],
                format!(
                    "https://github.com/test/sample/blob/main/{}#L{}",
                    path, line_no
                )
            );
        }
    }

    #[test]
    fn golden_matches_within_file_keep_line_order() {
        let Some(repo) = sample_repo() else { return };

        let out = run(reporg_cmd()
            .arg(".")
            .arg(repo.path())
            .args(["-g", "main.go"]));
        let numbers: Vec<u64> = out
            .lines()
            .map(|l| {
                let locator = l.split('\t').nth(1).unwrap();
                locator.rsplit_once(':').unwrap().1.parse().unwrap()
            })
            .collect();

        let mut sorted = numbers.clone();
        sorted.sort_unstable();
        assert_eq!(numbers, sorted);
        assert_eq!(numbers.len(), 9);
    }
}
