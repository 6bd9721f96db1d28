#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use tmprepo::{Config, TmpRepo};

/// Helper to create a scratch repository under its own temp root.
///
/// The root is removed when the returned `TempDir` drops, so tests that
/// panic before calling `unlink` do not leak directories.
pub fn create_test_repo() -> (TempDir, TmpRepo) {
    let root = TempDir::new().expect("Failed to create temp root");
    let mut config = Config::default_config();
    config.behavior.temp_root = Some(root.path().to_path_buf());

    let repo = TmpRepo::with_config(None::<&Path>, config).expect("Failed to create repo");
    (root, repo)
}

/// Helper to create a repository holding one commit of `foo.txt`
pub fn create_repo_with_commit() -> (TempDir, TmpRepo) {
    let (root, repo) = create_test_repo();
    write_file(&repo, "foo.txt", "foobar");
    repo.add_all().expect("Failed to stage");
    repo.commit("Foobar committed").expect("Failed to commit");
    (root, repo)
}

/// Helper to write a file through the repository handle
pub fn write_file(repo: &TmpRepo, name: &str, content: &str) {
    repo.create_file_with(name, |f| f.write_all(content.as_bytes()))
        .expect("Failed to write file");
}

/// Run git directly, bypassing the crate, and return stdout
pub fn raw_git(repo_path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .expect("Failed to run git");

    String::from_utf8_lossy(&output.stdout).into_owned()
}
