//! Version-tree scanner for the AzureRM provider
//!
//! Measures migration progress between two generations of the internal SDK
//! by walking released versions (git tags) of the provider codebase,
//! classifying every resource and data-source file, and aggregating the
//! results bottom-up into named totals.
//!
//! # Examples
//!
//! ```no_run
//! use azurerm_migration_tracker_scanner::{Repo, SdkMarkers};
//!
//! let repo = Repo::open("./terraform-provider-azurerm").expect("open failed");
//! let markers = SdkMarkers::default();
//!
//! let mut versions = repo.versions().expect("listing tags failed");
//! let latest = &mut versions[0];
//!
//! repo.checkout_tag(&latest.name).expect("checkout failed");
//! latest.scan_services(&markers).expect("scan failed");
//!
//! let totals = latest.totals();
//! println!("{} resources, {} typed", totals.resources, totals.typed);
//! ```

mod classifier;
mod element;
mod repo;
mod service;
mod totals;
mod version;

pub use classifier::{classify, shared_create_update, Classification, SdkMarkers};
pub use element::{DataSource, Element, ElementInfo, Resource};
pub use repo::Repo;
pub use service::Service;
pub use totals::Totals;
pub use version::Version;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while scanning a version tree
#[derive(Debug, Error)]
pub enum ScannerError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open repository {}: {source}", path.display())]
    RepoOpen {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to list tags: {0}")]
    Tags(#[source] git2::Error),

    #[error("Tag {tag} not found")]
    TagNotFound { tag: String },

    #[error("Failed to check out {tag}: {source}")]
    Checkout {
        tag: String,
        #[source]
        source: git2::Error,
    },

    #[error("Services root {} does not exist for {version}", path.display())]
    LayoutResolution { version: String, path: PathBuf },

    #[error("Ambiguous create/update bindings in {file}: {detail}")]
    AmbiguousBinding { file: String, detail: String },

    #[error("Failed to load marker rules from {}: {source}", path.display())]
    Markers {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, ScannerError>;
