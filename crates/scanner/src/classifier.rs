//! Per-file heuristic classification rules
//!
//! All rules are substring/pattern searches over the raw file text for one
//! target codebase's conventions. They live here, separate from traversal
//! and aggregation, so the marker table can be adjusted or overridden
//! without touching the scan code.

use crate::{Result, ScannerError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Content markers identifying which SDK generation a file depends on.
///
/// The defaults target the AzureRM provider; an override table can be
/// loaded from YAML when the heuristics need updating for a new convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkMarkers {
    /// Legacy SDK generation import/call markers
    pub legacy: Vec<String>,
    /// New SDK generation import/call markers
    pub modern: Vec<String>,
    /// Typed-resource interface markers
    pub typed: Vec<String>,
    /// Built-in resource ID parse helper markers
    pub built_in_parse: Vec<String>,
}

impl Default for SdkMarkers {
    fn default() -> Self {
        Self {
            legacy: vec!["github.com/Azure/azure-sdk-for-go/".to_string()],
            modern: vec!["github.com/hashicorp/go-azure-sdk/".to_string()],
            typed: vec!["sdk.ResourceFunc".to_string()],
            built_in_parse: vec!["ParseAzureResourceID".to_string()],
        }
    }
}

impl SdkMarkers {
    /// Load a marker table from a YAML file, falling back to the defaults
    /// for any omitted field
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ScannerError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_yaml::from_str(&content).map_err(|e| ScannerError::Markers {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Flags derived from one file's text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_typed: bool,
    pub uses_sdk_legacy: bool,
    pub uses_sdk_modern: bool,
    pub uses_built_in_parse: bool,
}

/// Classify one file's text against the marker table.
///
/// Pure function of (file name, text); the file name is used only for the
/// staleness warning. A file matching neither SDK generation is not an
/// error, but it usually means a heuristic needs updating, so it is logged.
pub fn classify(markers: &SdkMarkers, file_name: &str, content: &str) -> Classification {
    let matches_any = |ms: &[String]| ms.iter().any(|m| content.contains(m.as_str()));

    let classification = Classification {
        is_typed: matches_any(&markers.typed),
        uses_sdk_legacy: matches_any(&markers.legacy),
        uses_sdk_modern: matches_any(&markers.modern),
        uses_built_in_parse: matches_any(&markers.built_in_parse),
    };

    if !classification.uses_sdk_legacy && !classification.uses_sdk_modern {
        eprintln!("warning: {file_name} matched no SDK marker, heuristics may be stale");
    }

    classification
}

/// Decide whether an untyped resource shares one function between its
/// `Create:` and `Update:` bindings.
///
/// Exactly one `Create:` binding must exist; zero or multiple (or multiple
/// `Update:` bindings) means the heuristic cannot proceed and the file must
/// be surfaced rather than silently guessed.
pub fn shared_create_update(file_name: &str, content: &str) -> Result<bool> {
    let create_regex = Regex::new("Create: *[a-zA-Z0-9]+,").expect("static pattern");
    let update_regex = Regex::new("Update: *[a-zA-Z0-9]+,").expect("static pattern");

    let creates: Vec<&str> = create_regex.find_iter(content).map(|m| m.as_str()).collect();
    let updates: Vec<&str> = update_regex.find_iter(content).map(|m| m.as_str()).collect();

    if creates.is_empty() {
        return Err(ScannerError::AmbiguousBinding {
            file: file_name.to_string(),
            detail: "no 'Create:' binding found".to_string(),
        });
    }
    if creates.len() > 1 {
        return Err(ScannerError::AmbiguousBinding {
            file: file_name.to_string(),
            detail: format!("multiple 'Create:' bindings: {}", creates.join(", ")),
        });
    }
    if updates.len() > 1 {
        return Err(ScannerError::AmbiguousBinding {
            file: file_name.to_string(),
            detail: format!("multiple 'Update:' bindings: {}", updates.join(", ")),
        });
    }

    if updates.len() == 1 {
        let create_function = binding_name(creates[0]);
        let update_function = binding_name(updates[0]);
        return Ok(create_function == update_function);
    }

    Ok(false)
}

/// Extract the function name from a matched `Field: name,` binding
fn binding_name(binding: &str) -> &str {
    binding
        .split(':')
        .nth(1)
        .unwrap_or("")
        .trim()
        .trim_end_matches(',')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_legacy_only() {
        let content = r#"import "github.com/Azure/azure-sdk-for-go/services/compute""#;
        let c = classify(&SdkMarkers::default(), "example_resource.go", content);

        assert!(c.uses_sdk_legacy);
        assert!(!c.uses_sdk_modern);
        assert!(!c.is_typed);
        assert!(!c.uses_built_in_parse);
    }

    #[test]
    fn test_classify_both_generations() {
        let content = concat!(
            "import (\n",
            "\t\"github.com/Azure/azure-sdk-for-go/services/compute\"\n",
            "\t\"github.com/hashicorp/go-azure-sdk/resource-manager/compute\"\n",
            ")\n",
        );
        let c = classify(&SdkMarkers::default(), "example_resource.go", content);

        assert!(c.uses_sdk_legacy);
        assert!(c.uses_sdk_modern);
    }

    #[test]
    fn test_classify_typed_and_parse_helper() {
        let content = concat!(
            "import \"github.com/hashicorp/go-azure-sdk/resource-manager/web\"\n",
            "func (r ExampleResource) Create() sdk.ResourceFunc {}\n",
            "id, err := azure.ParseAzureResourceID(d.Id())\n",
        );
        let c = classify(&SdkMarkers::default(), "example_resource.go", content);

        assert!(c.is_typed);
        assert!(c.uses_sdk_modern);
        assert!(c.uses_built_in_parse);
    }

    #[test]
    fn test_classify_is_pure() {
        let content = "import \"github.com/hashicorp/go-azure-sdk/sdk\"";
        let first = classify(&SdkMarkers::default(), "a_resource.go", content);
        let second = classify(&SdkMarkers::default(), "a_resource.go", content);
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_markers() {
        let markers = SdkMarkers {
            legacy: vec!["oldsdk/".to_string()],
            modern: vec!["newsdk/".to_string()],
            typed: vec!["TypedResource".to_string()],
            built_in_parse: vec!["ParseID".to_string()],
        };
        let c = classify(&markers, "x_resource.go", "import \"newsdk/thing\"");

        assert!(c.uses_sdk_modern);
        assert!(!c.uses_sdk_legacy);
    }

    #[test]
    fn test_shared_create_update_same_function() {
        let content = concat!(
            "Create: resourceFooCreateUpdate,\n",
            "Read:   resourceFooRead,\n",
            "Update: resourceFooCreateUpdate,\n",
        );
        assert!(shared_create_update("foo_resource.go", content).unwrap());
    }

    #[test]
    fn test_shared_create_update_different_functions() {
        let content = concat!(
            "Create: resourceFooCreate,\n",
            "Update: resourceFooUpdate,\n",
        );
        assert!(!shared_create_update("foo_resource.go", content).unwrap());
    }

    #[test]
    fn test_shared_create_update_no_update_binding() {
        let content = "Create: resourceFooCreate,\n";
        assert!(!shared_create_update("foo_resource.go", content).unwrap());
    }

    #[test]
    fn test_shared_create_update_missing_create_is_error() {
        let err = shared_create_update("foo_resource.go", "Read: resourceFooRead,\n")
            .expect_err("zero Create bindings must fail");
        assert!(matches!(
            err,
            crate::ScannerError::AmbiguousBinding { .. }
        ));
    }

    #[test]
    fn test_shared_create_update_multiple_creates_is_error() {
        let content = concat!("Create: fnOne,\n", "Create: fnTwo,\n");
        let err = shared_create_update("foo_resource.go", content)
            .expect_err("multiple Create bindings must fail");
        match err {
            crate::ScannerError::AmbiguousBinding { detail, .. } => {
                assert!(detail.contains("fnOne"));
                assert!(detail.contains("fnTwo"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_binding_name_extraction() {
        assert_eq!(binding_name("Create: resourceFooCreate,"), "resourceFooCreate");
        assert_eq!(binding_name("Update:resourceFooUpdate,"), "resourceFooUpdate");
    }
}
