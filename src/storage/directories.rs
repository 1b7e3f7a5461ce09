//! Cache zone directory creation.

use std::fs::DirBuilder;
use std::io;
use std::path::Path;

/// Permissions applied to newly created cache directories.
pub const DEFAULT_DIR_MODE: u32 = 0o777;

/// Capability to make sure a cache zone directory exists.
///
/// Implementations must be idempotent: an existing directory is success.
pub trait CacheDirectories {
    fn ensure_dir(&self, path: &Path) -> io::Result<()>;
}

impl<T: CacheDirectories + ?Sized> CacheDirectories for &T {
    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        (**self).ensure_dir(path)
    }
}

impl<T: CacheDirectories + ?Sized> CacheDirectories for Box<T> {
    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        (**self).ensure_dir(path)
    }
}

/// Creates directories on the local filesystem, parents included.
#[derive(Debug, Clone)]
pub struct FsDirectories {
    mode: u32,
}

impl FsDirectories {
    pub fn new(mode: u32) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }
}

impl Default for FsDirectories {
    fn default() -> Self {
        Self::new(DEFAULT_DIR_MODE)
    }
}

impl CacheDirectories for FsDirectories {
    fn ensure_dir(&self, path: &Path) -> io::Result<()> {
        let mut builder = DirBuilder::new();
        builder.recursive(true);

        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(self.mode);
        }

        builder.create(path)
    }
}

/// Never touches the filesystem. Used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDirectories;

impl CacheDirectories for NoopDirectories {
    fn ensure_dir(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}
