//! Filesystem access used by the writability probe.
//!
//! Kept behind a trait so the probe can be exercised against a temporary
//! directory or a failing implementation in tests.

use std::io;
use std::path::Path;

/// Abstraction for the filesystem operations the probe performs.
pub trait FileSystem: Send + Sync {
    /// Creates an empty file, truncating it if it exists.
    fn create_file(&self, path: &Path) -> io::Result<()>;

    /// Removes a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn create_file(&self, path: &Path) -> io::Result<()> {
        std::fs::File::create(path).map(drop)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}
