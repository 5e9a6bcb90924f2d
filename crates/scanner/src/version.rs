//! Point-in-time snapshot of the provider tree at one released version

use crate::classifier::SdkMarkers;
use crate::service::Service;
use crate::totals::Totals;
use crate::{Result, ScannerError};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::fs;
use std::path::PathBuf;

/// Releases that kept the legacy services root despite falling outside the
/// legacy tag-name range
const LEGACY_LAYOUT_TAGS: [&str; 2] = ["v2.70.0", "v2.71.0"];

/// One scanned version of the provider tree.
///
/// Created per tag of interest and populated by a single scan pass. The
/// working tree is shared across versions and mutated by every checkout,
/// so after a later checkout an earlier Version keeps its captured service
/// data but its path no longer reflects its tag on disk.
#[derive(Debug, Clone)]
pub struct Version {
    pub name: String,
    pub path: PathBuf,
    pub date: Option<DateTime<Utc>>,

    pub services: Vec<Service>,
}

impl Version {
    /// A version for scanning whatever is currently on disk, without any
    /// tag bookkeeping
    pub fn working_tree(name: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
            date: None,
            services: Vec::new(),
        }
    }

    pub(crate) fn for_tag(name: String, path: PathBuf, date: Option<DateTime<Utc>>) -> Self {
        Self {
            name,
            path,
            date,
            services: Vec::new(),
        }
    }

    /// The services root for this version.
    ///
    /// The services folder moved out of the azurerm/ package early in the
    /// v2 line; the exact tag rule below reproduces the observed history
    /// and must not be tidied up, since choosing the wrong root scans a
    /// nonexistent directory.
    pub fn services_root(&self) -> PathBuf {
        if self.uses_legacy_layout() {
            self.path.join("azurerm").join("internal").join("services")
        } else {
            self.path.join("internal").join("services")
        }
    }

    fn uses_legacy_layout(&self) -> bool {
        if LEGACY_LAYOUT_TAGS.contains(&self.name.as_str()) {
            return true;
        }

        // unanchored on purpose, matches v2.1x through v2.6x as well
        let legacy_range = Regex::new("v2.[123456]").expect("static pattern");
        legacy_range.is_match(&self.name)
    }

    /// Discover every service directory under the resolved root and scan
    /// each one. Any single service failure aborts the whole version scan.
    pub fn scan_services(&mut self, markers: &SdkMarkers) -> Result<()> {
        let root = self.services_root();
        if !root.is_dir() {
            return Err(ScannerError::LayoutResolution {
                version: self.name.clone(),
                path: root,
            });
        }

        let entries = fs::read_dir(&root).map_err(|e| ScannerError::Io {
            path: root.clone(),
            source: e,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScannerError::Io {
                path: root.clone(),
                source: e,
            })?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();

        for name in names {
            let mut service = Service::new(name.clone(), root.join(&name));
            service.scan(markers)?;
            self.services.push(service);
        }

        Ok(())
    }

    pub fn totals(&self) -> Totals {
        self.services
            .iter()
            .fold(Totals::default(), |acc, s| acc.add(s.totals()))
    }

    pub fn resource_totals(&self) -> Totals {
        self.services
            .iter()
            .fold(Totals::default(), |acc, s| acc.add(s.resource_totals()))
    }

    pub fn data_source_totals(&self) -> Totals {
        self.services
            .iter()
            .fold(Totals::default(), |acc, s| acc.add(s.data_source_totals()))
    }
}
