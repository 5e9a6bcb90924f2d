//! Classified resources and data sources

use crate::classifier::Classification;
use crate::totals::Totals;
use std::path::{Path, PathBuf};

/// Classification result shared by resources and data sources.
///
/// Carries the owning service's name and path as plain read-only
/// identifiers captured at construction; the service owns the element,
/// never the other way around. Immutable once built.
#[derive(Debug, Clone)]
pub struct ElementInfo {
    pub service_name: String,
    pub service_path: PathBuf,
    pub file_name: String,
    pub is_typed: bool,
    pub uses_sdk_legacy: bool,
    pub uses_sdk_modern: bool,
    pub uses_built_in_parse: bool,
}

impl ElementInfo {
    pub(crate) fn new(
        service_name: &str,
        service_path: &Path,
        file_name: String,
        c: Classification,
    ) -> Self {
        Self {
            service_name: service_name.to_string(),
            service_path: service_path.to_path_buf(),
            file_name,
            is_typed: c.is_typed,
            uses_sdk_legacy: c.uses_sdk_legacy,
            uses_sdk_modern: c.uses_sdk_modern,
            uses_built_in_parse: c.uses_built_in_parse,
        }
    }

    /// Per-file totals from the classification flags alone
    pub fn totals(&self) -> Totals {
        let mut t = Totals::default();

        if self.is_typed {
            t.typed += 1;
        }
        if self.uses_sdk_legacy {
            t.sdk_legacy += 1;
        }
        if self.uses_sdk_modern {
            t.sdk_modern += 1;
        }
        if self.uses_sdk_legacy && self.uses_sdk_modern {
            t.sdk_both += 1;
        }
        if self.uses_built_in_parse {
            t.built_in_parse += 1;
        }

        t
    }
}

/// A resource file and its classification
#[derive(Debug, Clone)]
pub struct Resource {
    pub info: ElementInfo,
    /// Set only for untyped resources whose Create and Update lifecycle
    /// operations are bound to the same named function
    pub shared_create_update: bool,
}

impl Resource {
    pub fn totals(&self) -> Totals {
        let mut t = self.info.totals();
        t.resources += 1;

        if self.shared_create_update {
            t.create_update += 1;
        }

        t
    }
}

/// A data-source file and its classification
#[derive(Debug, Clone)]
pub struct DataSource {
    pub info: ElementInfo,
}

impl DataSource {
    pub fn totals(&self) -> Totals {
        let mut t = self.info.totals();
        t.data_sources += 1;
        t
    }
}

/// Either a resource or a data source, for flattened filtering queries
#[derive(Debug, Clone)]
pub enum Element {
    Resource(Resource),
    DataSource(DataSource),
}

impl Element {
    pub fn info(&self) -> &ElementInfo {
        match self {
            Element::Resource(r) => &r.info,
            Element::DataSource(d) => &d.info,
        }
    }

    pub fn totals(&self) -> Totals {
        match self {
            Element::Resource(r) => r.totals(),
            Element::DataSource(d) => d.totals(),
        }
    }

    /// Shared create/update flag; always false for data sources
    pub fn shared_create_update(&self) -> bool {
        match self {
            Element::Resource(r) => r.shared_create_update,
            Element::DataSource(_) => false,
        }
    }
}
