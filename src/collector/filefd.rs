//! # File Descriptor Collector
//!
//! Exposes the kernel's file handle counters from `/proc/sys/fs/file-nr`.
//!
//! The file holds a single line of three tab-separated numbers: allocated
//! file handles, allocated-but-unused handles, and the system-wide maximum.
//! The middle field is always zero on Linux 2.6+ and is ignored without
//! validation.
//!
//! Gauges are created the first time a name is seen and are never removed,
//! so a name that vanishes from the source keeps being exported at its last
//! value.

use crate::core::{Collector, Gauge, GaugeDesc, MetricSink};
use crate::error::{CollectorError, StatError};
use crate::fs::FileSystem;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Subsystem key this collector is registered under.
pub const SUBSYSTEM: &str = "filefd";

const FILE_NR: &str = "sys/fs/file-nr";
const FILE_NR_FIELDS: usize = 3;

/// Field name to textual value, produced fresh on every read. Ordered by
/// name, which fixes the order gauges are updated in.
pub type ParsedStats = BTreeMap<String, String>;

/// Opens `path` through `fs` and parses its first line.
pub fn get_file_fd_stats(fs: &dyn FileSystem, path: &Path) -> Result<ParsedStats, StatError> {
    let reader = fs.open(path).map_err(|source| StatError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_file_fd_stats(reader, path)
}

/// Parses the first line of a `file-nr` formatted source.
pub fn parse_file_fd_stats(mut reader: impl BufRead, path: &Path) -> Result<ParsedStats, StatError> {
    let mut line = Vec::new();
    reader
        .read_until(b'\n', &mut line)
        .map_err(|source| StatError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
    let line = line.strip_suffix(b"\n").unwrap_or(&line[..]);
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    // Tabs, not spaces, separate the fields. Only the kept fields are decoded,
    // so bytes in the ignored middle field never fail the read.
    let fields: Vec<&[u8]> = line.split(|&b| b == b'\t').collect();
    if fields.len() < FILE_NR_FIELDS {
        return Err(StatError::MalformedSource {
            path: path.to_path_buf(),
            expected: FILE_NR_FIELDS,
            found: fields.len(),
        });
    }

    let mut stats = ParsedStats::new();
    stats.insert("allocated".to_string(), String::from_utf8_lossy(fields[0]).into_owned());
    stats.insert("maximum".to_string(), String::from_utf8_lossy(fields[2]).into_owned());
    Ok(stats)
}

/// Collector exposing `file-nr` as `<namespace>_filefd_{allocated,maximum}`.
pub struct FileFdCollector {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    namespace: String,
    metrics: Mutex<BTreeMap<String, Gauge>>,
}

impl FileFdCollector {
    /// Creates a collector reading `<procfs_path>/sys/fs/file-nr`.
    pub fn new(fs: Arc<dyn FileSystem>, procfs_path: &Path, namespace: impl Into<String>) -> Self {
        Self {
            fs,
            path: procfs_path.join(FILE_NR),
            namespace: namespace.into(),
            metrics: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of gauges created so far.
    pub fn gauge_count(&self) -> usize {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Current value of the gauge called `name`, if it has been created.
    pub fn gauge_value(&self, name: &str) -> Option<f64> {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map(Gauge::value)
    }
}

impl Collector for FileFdCollector {
    fn name(&self) -> &'static str {
        SUBSYSTEM
    }

    fn update(&self, sink: &mut dyn MetricSink) -> Result<(), CollectorError> {
        // Held for the whole cycle so concurrent scrapes never interleave.
        let mut metrics = self.metrics.lock().unwrap_or_else(PoisonError::into_inner);

        let stats = get_file_fd_stats(self.fs.as_ref(), &self.path)
            .map_err(|source| CollectorError::Read { op: "file-nr", source })?;

        for (name, value) in stats {
            let parsed = value
                .parse::<f64>()
                .map_err(|source| CollectorError::InvalidValue {
                    op: "file-nr",
                    name: name.clone(),
                    value: value.clone(),
                    source,
                });
            let gauge = metrics.entry(name).or_insert_with_key(|name| {
                Gauge::new(GaugeDesc::new(
                    self.namespace.as_str(),
                    SUBSYSTEM,
                    name.as_str(),
                    format!("File descriptor statistics: {}.", name),
                ))
            });
            gauge.set(parsed?);
        }

        for gauge in metrics.values() {
            gauge.collect(sink);
        }
        Ok(())
    }
}
