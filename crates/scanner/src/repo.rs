//! Git tag enumeration and working-tree checkout
//!
//! The repository working directory is the one piece of shared mutable
//! state in the scanner: every checkout rewrites it in place, so versions
//! must be checked out and scanned strictly one at a time.

use crate::version::Version;
use crate::{Result, ScannerError};
use chrono::{DateTime, Utc};
use git2::build::CheckoutBuilder;
use git2::{BranchType, Repository};
use regex::Regex;
use std::path::PathBuf;

/// A live handle on a git working directory
pub struct Repo {
    pub path: PathBuf,
    git: Repository,
}

impl std::fmt::Debug for Repo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repo")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Repo {
    /// Open an existing git working directory
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let git = Repository::open(&path).map_err(|e| ScannerError::RepoOpen {
            path: path.clone(),
            source: e,
        })?;

        Ok(Self { path, git })
    }

    /// List release versions, newest first.
    ///
    /// Keeps only tags named `vMAJOR.MINOR.PATCH`; release candidates and
    /// other tags are dropped silently. Ordering compares the three numeric
    /// components, not the tag strings.
    pub fn versions(&self) -> Result<Vec<Version>> {
        let version_regex = Regex::new(r"^v(\d+)\.(\d+)\.(\d+)$").expect("static pattern");

        let tag_names = self.git.tag_names(None).map_err(ScannerError::Tags)?;

        let mut tagged: Vec<(String, (u64, u64, u64))> = Vec::new();
        for name in tag_names.iter().flatten() {
            if let Some(caps) = version_regex.captures(name) {
                let component = |i: usize| caps[i].parse::<u64>().unwrap_or(0);
                tagged.push((name.to_string(), (component(1), component(2), component(3))));
            }
        }

        tagged.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(tagged
            .into_iter()
            .map(|(name, _)| {
                let date = self.tag_date(&name);
                Version::for_tag(name, self.path.clone(), date)
            })
            .collect())
    }

    /// Timestamp of the commit a tag points at
    fn tag_date(&self, tag: &str) -> Option<DateTime<Utc>> {
        let object = self.git.revparse_single(&format!("refs/tags/{tag}")).ok()?;
        let commit = object.peel_to_commit().ok()?;
        DateTime::from_timestamp(commit.time().seconds(), 0)
    }

    /// Force-overwrite the working tree to match a tag, on a throwaway
    /// `v/<tag>` branch. A leftover branch from a prior run is deleted
    /// first so repeated runs do not conflict.
    pub fn checkout_tag(&self, tag: &str) -> Result<()> {
        let object = self
            .git
            .revparse_single(&format!("refs/tags/{tag}"))
            .map_err(|_| ScannerError::TagNotFound {
                tag: tag.to_string(),
            })?;
        let commit = object.peel_to_commit().map_err(|e| checkout_error(tag, e))?;

        // detach HEAD so the throwaway branch can be deleted even when a
        // prior run left HEAD sitting on it
        self.git
            .set_head_detached(commit.id())
            .map_err(|e| checkout_error(tag, e))?;

        let branch_name = format!("v/{tag}");
        if let Ok(mut existing) = self.git.find_branch(&branch_name, BranchType::Local) {
            existing.delete().map_err(|e| checkout_error(tag, e))?;
        }

        self.git
            .branch(&branch_name, &commit, false)
            .map_err(|e| checkout_error(tag, e))?;

        let mut checkout = CheckoutBuilder::new();
        checkout.force();
        self.git
            .checkout_tree(commit.as_object(), Some(&mut checkout))
            .map_err(|e| checkout_error(tag, e))?;

        self.git
            .set_head(&format!("refs/heads/{branch_name}"))
            .map_err(|e| checkout_error(tag, e))?;

        Ok(())
    }
}

fn checkout_error(tag: &str, source: git2::Error) -> ScannerError {
    ScannerError::Checkout {
        tag: tag.to_string(),
        source,
    }
}
