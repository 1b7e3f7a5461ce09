//! Routing resources carrying annotations.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A routing resource (e.g. an ingress rule) and its annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Resource {
    /// Namespace the resource lives in.
    pub namespace: String,

    /// Resource name, unique within its namespace.
    pub name: String,

    /// Raw annotations as found on the resource metadata.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl Resource {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            annotations: BTreeMap::new(),
        }
    }

    /// Builder-style helper, mostly for tests and fixtures.
    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// `namespace/name`, used as the log identity of the resource.
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

/// Error type for loading resource descriptions.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a resource description from a `.json` or TOML file.
pub fn load_resource(path: &Path) -> Result<Resource, ResourceError> {
    let content = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let resource: Resource = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };

    Ok(resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resource_key() {
        let resource = Resource::new("team-a", "svc1");
        assert_eq!(resource.key(), "team-a/svc1");
        assert!(resource.annotations.is_empty());
    }

    #[test]
    fn test_load_toml_resource() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
namespace = "team-a"
name = "svc1"

[annotations]
"nginx.ingress.kubernetes.io/enable-cache" = "true"
"#
        )
        .unwrap();

        let resource = load_resource(file.path()).unwrap();
        assert_eq!(resource.namespace, "team-a");
        assert_eq!(
            resource.annotations.get("nginx.ingress.kubernetes.io/enable-cache"),
            Some(&"true".to_string())
        );
    }

    #[test]
    fn test_load_json_resource_without_annotations() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"namespace": "default", "name": "web"}}"#).unwrap();

        let resource = load_resource(file.path()).unwrap();
        assert_eq!(resource, Resource::new("default", "web"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_resource(Path::new("/nonexistent/resource.toml")).unwrap_err();
        assert!(matches!(err, ResourceError::Io(_)));
    }
}
