//! Integration tests for tag enumeration and checkout against throwaway
//! git repositories

use azurerm_migration_tracker_scanner::{Repo, ScannerError};
use git2::{IndexAddOption, Oid, Repository, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn commit_all(repo: &Repository, message: &str) -> Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();

    let sig = Signature::now("tester", "tester@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<_> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

fn tag(repo: &Repository, name: &str, oid: Oid) {
    let object = repo.find_object(oid, None).unwrap();
    repo.tag_lightweight(name, &object, false).unwrap();
}

fn init_with_tags(path: &Path, tags: &[&str]) -> Repository {
    let repo = Repository::init(path).unwrap();
    fs::write(path.join("README.md"), "provider\n").unwrap();
    let oid = commit_all(&repo, "initial");
    for name in tags {
        tag(&repo, name, oid);
    }
    repo
}

#[test]
fn test_versions_numeric_ordering() {
    let tmp = TempDir::new().unwrap();
    init_with_tags(tmp.path(), &["v2.40.0", "v3.0.0", "v2.99.9"]);

    let repo = Repo::open(tmp.path()).unwrap();
    let versions = repo.versions().unwrap();

    let names: Vec<&str> = versions.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["v3.0.0", "v2.99.9", "v2.40.0"]);
}

#[test]
fn test_versions_drop_non_release_tags() {
    let tmp = TempDir::new().unwrap();
    init_with_tags(
        tmp.path(),
        &["v3.0.0", "v3.1.0-rc1", "nightly", "v3.0.0-beta.1"],
    );

    let repo = Repo::open(tmp.path()).unwrap();
    let versions = repo.versions().unwrap();

    let names: Vec<&str> = versions.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["v3.0.0"]);
}

#[test]
fn test_versions_carry_repo_path_and_date() {
    let tmp = TempDir::new().unwrap();
    init_with_tags(tmp.path(), &["v1.0.0"]);

    let repo = Repo::open(tmp.path()).unwrap();
    let versions = repo.versions().unwrap();

    assert_eq!(versions[0].path, repo.path);
    assert!(versions[0].date.is_some());
}

#[test]
fn test_checkout_tag_rewrites_working_tree() {
    let tmp = TempDir::new().unwrap();
    let git = Repository::init(tmp.path()).unwrap();

    fs::write(tmp.path().join("marker.txt"), "one\n").unwrap();
    let first = commit_all(&git, "first");
    tag(&git, "v1.0.0", first);

    fs::write(tmp.path().join("marker.txt"), "two\n").unwrap();
    let second = commit_all(&git, "second");
    tag(&git, "v1.1.0", second);

    let repo = Repo::open(tmp.path()).unwrap();

    repo.checkout_tag("v1.0.0").unwrap();
    assert_eq!(fs::read_to_string(tmp.path().join("marker.txt")).unwrap(), "one\n");

    repo.checkout_tag("v1.1.0").unwrap();
    assert_eq!(fs::read_to_string(tmp.path().join("marker.txt")).unwrap(), "two\n");

    // throwaway branch per tag
    assert!(git.find_branch("v/v1.1.0", git2::BranchType::Local).is_ok());
}

#[test]
fn test_checkout_same_tag_twice() {
    let tmp = TempDir::new().unwrap();
    let git = Repository::init(tmp.path()).unwrap();

    fs::write(tmp.path().join("marker.txt"), "one\n").unwrap();
    let first = commit_all(&git, "first");
    tag(&git, "v1.0.0", first);

    let repo = Repo::open(tmp.path()).unwrap();

    // the second run must replace the leftover v/<tag> branch
    repo.checkout_tag("v1.0.0").unwrap();
    repo.checkout_tag("v1.0.0").unwrap();
}

#[test]
fn test_checkout_missing_tag() {
    let tmp = TempDir::new().unwrap();
    init_with_tags(tmp.path(), &["v1.0.0"]);

    let repo = Repo::open(tmp.path()).unwrap();
    let err = repo
        .checkout_tag("v9.9.9")
        .expect_err("missing tag must fail");

    assert!(matches!(err, ScannerError::TagNotFound { .. }));
}

#[test]
fn test_open_non_repository() {
    let tmp = TempDir::new().unwrap();
    let err = Repo::open(tmp.path()).expect_err("plain directory is not a repo");
    assert!(matches!(err, ScannerError::RepoOpen { .. }));
}
