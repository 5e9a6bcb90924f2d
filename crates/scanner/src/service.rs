//! Service directory scanning and per-service aggregation

use crate::classifier::{self, SdkMarkers};
use crate::element::{DataSource, Element, ElementInfo, Resource};
use crate::totals::Totals;
use crate::{Result, ScannerError};
use regex::Regex;
use std::fs;
use std::path::PathBuf;

/// Known helper files that match the resource name pattern but are not
/// resources (base implementations, one legacy misnamed data source)
const NON_RESOURCE_FILES: [&str; 5] = [
    "bot_service_base_resource.go",
    "export_base_resource.go",
    "assignment_base_resource.go",
    "container_registry_migrate_resource.go",
    "resource_group_data_source_resource.go",
];

/// One directory of the provider source tree, grouping the resources and
/// data sources for a logical service area.
///
/// Created empty when its directory is discovered, populated by one scan
/// pass, read-only afterward.
#[derive(Debug, Clone)]
pub struct Service {
    pub name: String,
    pub path: PathBuf,

    pub resources: Vec<Resource>,
    pub data_sources: Vec<DataSource>,
}

impl Service {
    pub(crate) fn new(name: String, path: PathBuf) -> Self {
        Self {
            name,
            path,
            resources: Vec::new(),
            data_sources: Vec::new(),
        }
    }

    /// Discover and classify every resource and data-source file directly
    /// in the service directory (non-recursive)
    pub fn scan(&mut self, markers: &SdkMarkers) -> Result<()> {
        let file_names = self.list_file_names()?;

        self.scan_resources(markers, &file_names)?;
        self.scan_data_sources(markers, &file_names)?;

        Ok(())
    }

    fn list_file_names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.path).map_err(|e| ScannerError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScannerError::Io {
                path: self.path.clone(),
                source: e,
            })?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        // read_dir order is platform-dependent, sort for determinism
        names.sort();

        Ok(names)
    }

    fn scan_resources(&mut self, markers: &SdkMarkers, file_names: &[String]) -> Result<()> {
        for name in file_names {
            if !is_resource_file(name) {
                continue;
            }

            let content = self.read_file(name)?;
            let classification = classifier::classify(markers, name, &content);

            // shared create/update only applies to the untyped pattern
            let shared = if classification.is_typed {
                false
            } else {
                classifier::shared_create_update(name, &content)?
            };

            self.resources.push(Resource {
                info: ElementInfo::new(&self.name, &self.path, name.clone(), classification),
                shared_create_update: shared,
            });
        }

        Ok(())
    }

    fn scan_data_sources(&mut self, markers: &SdkMarkers, file_names: &[String]) -> Result<()> {
        for name in file_names {
            if !is_data_source_file(name) {
                continue;
            }

            let content = self.read_file(name)?;
            let classification = classifier::classify(markers, name, &content);

            self.data_sources.push(DataSource {
                info: ElementInfo::new(&self.name, &self.path, name.clone(), classification),
            });
        }

        Ok(())
    }

    fn read_file(&self, name: &str) -> Result<String> {
        let path = self.path.join(name);
        fs::read_to_string(&path).map_err(|e| ScannerError::Io { path, source: e })
    }

    /// Combined resource and data-source count
    pub fn element_count(&self) -> usize {
        self.resources.len() + self.data_sources.len()
    }

    pub fn totals(&self) -> Totals {
        let mut t = self.resource_totals().add(self.data_source_totals());
        t.services = 1;
        t
    }

    pub fn resource_totals(&self) -> Totals {
        let mut t = Totals {
            services: 1,
            ..Totals::default()
        };
        for r in &self.resources {
            t = t.add(r.totals());
        }
        t
    }

    pub fn data_source_totals(&self) -> Totals {
        let mut t = Totals {
            services: 1,
            ..Totals::default()
        };
        for d in &self.data_sources {
            t = t.add(d.totals());
        }
        t
    }

    /// Flattened, predicate-filtered list of all elements, sorted by file
    /// name for deterministic reporting
    pub fn filter_elements<F>(&self, predicate: F) -> Vec<Element>
    where
        F: Fn(&Element) -> bool,
    {
        let mut elements: Vec<Element> = self
            .resources
            .iter()
            .cloned()
            .map(Element::Resource)
            .chain(self.data_sources.iter().cloned().map(Element::DataSource))
            .filter(|e| predicate(e))
            .collect();

        elements.sort_by(|a, b| a.info().file_name.cmp(&b.info().file_name));

        elements
    }
}

/// A file is a resource iff it matches the resource name pattern and is
/// neither a known helper file nor a schema-migration file
fn is_resource_file(name: &str) -> bool {
    let resource_file_regex = Regex::new(r"[a-z_]+_resource\.go$").expect("static pattern");

    if !resource_file_regex.is_match(name) {
        return false;
    }

    if NON_RESOURCE_FILES.contains(&name) {
        return false;
    }

    if name.contains("migration_resource.go")
        || name.contains("migration_resource_test.go")
        || name.contains("migration_test_resource.go")
    {
        return false;
    }

    true
}

fn is_data_source_file(name: &str) -> bool {
    let data_source_file_regex = Regex::new(r"[a-z_]+_data_source\.go$").expect("static pattern");
    data_source_file_regex.is_match(name)
}
