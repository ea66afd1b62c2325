//! Filesystem access behind a trait so collectors can be exercised against
//! in-memory `/proc` trees.
//!
//! Collectors only ever need to open a named source and read it line by line,
//! so the abstraction hands out a buffered reader. The reader is owned by the
//! caller and released when it goes out of scope, on every exit path.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

#[cfg(any(test, feature = "test-utils"))]
mod mock;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockFs;

/// Read access to the files a collector depends on.
pub trait FileSystem: Send + Sync {
    /// Opens `path` for buffered reading.
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>>;
}

/// Filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + '_>> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}
