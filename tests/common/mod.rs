//! Shared fakes for integration tests.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ingress_cache::annotations::{AnnotationError, AnnotationResolver, Resource};
use ingress_cache::storage::CacheDirectories;

/// Records every path it is asked to create.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingDirectories {
    pub created: Mutex<Vec<PathBuf>>,
}

#[allow(dead_code)]
impl RecordingDirectories {
    pub fn paths(&self) -> Vec<PathBuf> {
        self.created.lock().unwrap().clone()
    }
}

impl CacheDirectories for RecordingDirectories {
    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        self.created.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

/// Always fails, like a read-only filesystem.
#[allow(dead_code)]
pub struct FailingDirectories;

impl CacheDirectories for FailingDirectories {
    fn ensure_dir(&self, _path: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only filesystem"))
    }
}

/// Rejects every lookup with a type error.
#[allow(dead_code)]
pub struct BrokenResolver;

impl AnnotationResolver for BrokenResolver {
    fn get_string(&self, key: &str, _resource: &Resource) -> Result<String, AnnotationError> {
        Err(AnnotationError::Empty(key.to_string()))
    }

    fn get_bool(&self, key: &str, _resource: &Resource) -> Result<bool, AnnotationError> {
        Err(AnnotationError::InvalidBool {
            key: key.to_string(),
            value: "?".to_string(),
        })
    }

    fn get_int(&self, key: &str, _resource: &Resource) -> Result<i64, AnnotationError> {
        Err(AnnotationError::InvalidInt {
            key: key.to_string(),
            value: "?".to_string(),
        })
    }
}

/// Resource carrying `nginx.ingress.kubernetes.io/*` annotations.
#[allow(dead_code)]
pub fn resource(namespace: &str, name: &str, annotations: &[(&str, &str)]) -> Resource {
    annotations
        .iter()
        .fold(Resource::new(namespace, name), |res, (key, value)| {
            res.with_annotation(format!("nginx.ingress.kubernetes.io/{key}"), *value)
        })
}
