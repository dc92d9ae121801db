// Author: Eshan Roy
// SPDX-License-Identifier: MIT

use assert_cmd::Command;
use git2::{Oid, Repository, Signature};
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONFIG: &str = r#"
[branches]
reject = "^refs/heads/frozen$"

[[rules.groups]]
match = "none"

[[rules.groups.rules]]
pattern = "^WIP"
message = "Work in progress commits are not allowed"
"#;

struct Fixture {
    dir: TempDir,
    base: Oid,
    wip: Oid,
    clean: Oid,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let base = commit(&repo, None, "initial", Some("refs/heads/main"));
        let wip = commit(&repo, Some(base), "WIP half done", None);
        let clean = commit(&repo, Some(base), "Add feature", None);

        std::fs::write(dir.path().join("refcheck.toml"), CONFIG).unwrap();
        Self {
            dir,
            base,
            wip,
            clean,
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn refcheck(&self) -> Command {
        let mut cmd = Command::cargo_bin("refcheck").unwrap();
        cmd.arg("--repo").arg(self.path()).env_remove("GIT_DIR");
        cmd
    }
}

fn commit(repo: &Repository, parent: Option<Oid>, message: &str, update_ref: Option<&str>) -> Oid {
    let sig = Signature::now("Ann", "ann@example.com").unwrap();
    let parent = parent.map(|oid| repo.find_commit(oid).unwrap());
    let base = parent.as_ref().map(|p| p.tree().unwrap());
    let mut builder = repo.treebuilder(base.as_ref()).unwrap();
    let blob = repo.blob(message.as_bytes()).unwrap();
    builder.insert("file.txt", blob, 0o100644).unwrap();
    let tree = repo.find_tree(builder.write().unwrap()).unwrap();
    let parents: Vec<_> = parent.iter().collect();
    repo.commit(update_ref, &sig, &sig, message, &tree, &parents)
        .unwrap()
}

#[test]
fn version_prints_package_version() {
    Command::cargo_bin("refcheck")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn pre_receive_rejects_wip_commit() {
    let fx = Fixture::new();

    fx.refcheck()
        .args(["--pusher-name", "ann", "--pusher-email", "ann@example.com"])
        .arg("pre-receive")
        .write_stdin(format!("{} {} refs/heads/main\n", fx.base, fx.wip))
        .assert()
        .failure()
        .stdout(predicate::str::contains("Push rejected for ann <ann@example.com>"))
        .stdout(predicate::str::contains("message-groups"))
        .stderr(predicate::str::contains("Push rejected"));
}

#[test]
fn pre_receive_accepts_clean_commit() {
    let fx = Fixture::new();

    fx.refcheck()
        .arg("pre-receive")
        .write_stdin(format!("{} {} refs/heads/main\n", fx.base, fx.clean))
        .assert()
        .success();
}

#[test]
fn dry_run_reports_without_rejecting() {
    let fx = Fixture::new();

    fx.refcheck()
        .args(["--dry-run", "pre-receive"])
        .write_stdin(format!("{} {} refs/heads/main\n", fx.base, fx.wip))
        .assert()
        .success()
        .stdout(predicate::str::contains("dry run"));
}

#[test]
fn update_rejects_branch_by_name() {
    let fx = Fixture::new();

    fx.refcheck()
        .args(["--format", "json", "update", "refs/heads/frozen"])
        .arg(fx.base.to_string())
        .arg(fx.clean.to_string())
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"branch_name_accepted\": false"));
}

#[test]
fn deleting_a_ref_is_accepted() {
    let fx = Fixture::new();

    fx.refcheck()
        .arg("pre-receive")
        .write_stdin(format!(
            "{} 0000000000000000000000000000000000000000 refs/heads/main\n",
            fx.base
        ))
        .assert()
        .success();
}

#[test]
fn malformed_input_is_an_error() {
    let fx = Fixture::new();

    fx.refcheck()
        .arg("pre-receive")
        .write_stdin("not a ref update\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed ref update line"));
}

#[test]
fn proposal_reports_source_ref() {
    let fx = Fixture::new();

    fx.refcheck()
        .args(["--format", "json", "proposal", "--from-ref", "refs/heads/feature"])
        .arg("--from-hash")
        .arg(fx.wip.to_string())
        .args(["--to-ref", "refs/heads/main", "--to-hash"])
        .arg(fx.base.to_string())
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"ref_id\": \"refs/heads/feature\""));
}

#[test]
fn hooks_install_and_status() {
    let fx = Fixture::new();

    fx.refcheck()
        .args(["hooks", "install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed all hooks"));

    assert!(fx.path().join(".git/hooks/pre-receive").exists());

    fx.refcheck()
        .args(["hooks", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ update"));
}

/// `git` on a `PATH` that also finds the refcheck binary, as the server's
/// hooks will.
fn git_with_refcheck(dir: &Path) -> Command {
    let bin_dir: PathBuf = assert_cmd::cargo::cargo_bin("refcheck")
        .parent()
        .unwrap()
        .to_path_buf();
    let mut paths = vec![bin_dir];
    if let Some(path) = std::env::var_os("PATH") {
        paths.extend(std::env::split_paths(&path));
    }

    let mut cmd = Command::new("git");
    cmd.current_dir(dir)
        .env("PATH", std::env::join_paths(paths).unwrap())
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env_remove("GIT_DIR")
        .env_remove("REFCHECK_PUSHER_NAME")
        .env_remove("REFCHECK_PUSHER_EMAIL");
    cmd
}

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

#[test]
fn installed_pre_receive_hook_sees_pushed_commits() {
    if !git_available() {
        eprintln!("git not found, skipping");
        return;
    }
    let fx = Fixture::new();

    let server = TempDir::new().unwrap();
    let server_repo = server.path().join("server.git");
    Repository::init_bare(&server_repo).unwrap();
    std::fs::write(server_repo.join("refcheck.toml"), CONFIG).unwrap();

    Command::cargo_bin("refcheck")
        .unwrap()
        .arg("--repo")
        .arg(&server_repo)
        .env_remove("GIT_DIR")
        .args(["hooks", "install"])
        .assert()
        .success();

    let push = |oid: Oid| {
        let mut cmd = git_with_refcheck(fx.path());
        cmd.arg("push")
            .arg(&server_repo)
            .arg(format!("{}:refs/heads/main", oid));
        cmd
    };

    push(fx.base).assert().success();

    push(fx.wip)
        .assert()
        .failure()
        .stderr(predicate::str::contains("message-groups"))
        .stderr(predicate::str::contains("pre-receive hook declined"));

    push(fx.clean).assert().success();

    let pushed = Repository::open_bare(&server_repo).unwrap();
    assert_eq!(pushed.refname_to_id("refs/heads/main").unwrap(), fx.clean);
}
