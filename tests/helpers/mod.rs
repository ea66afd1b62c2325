#![allow(dead_code)]

pub mod test_metrics;

use filefd_exporter::fs::FileSystem;
use filefd_exporter::fs::MockFs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Creates a temporary procfs tree with `sys/fs/file-nr` holding `content`.
pub fn procfs_with_file_nr(content: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file_nr(&dir, content);
    dir
}

pub fn write_file_nr(dir: &TempDir, content: &str) {
    let path = file_nr_path(dir);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

pub fn file_nr_path(dir: &TempDir) -> PathBuf {
    dir.path().join("sys/fs/file-nr")
}

/// A mock filesystem with `/proc/sys/fs/file-nr` holding `content`.
pub fn mock_fs_with_file_nr(content: &str) -> (MockFs, Arc<dyn FileSystem>) {
    let fs = MockFs::new();
    fs.add_file("/proc/sys/fs/file-nr", content);
    let shared: Arc<dyn FileSystem> = Arc::new(fs.clone());
    (fs, shared)
}
