use std::io;
use std::num::ParseFloatError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain usable content from a statistics source.
#[derive(Error, Debug)]
pub enum StatError {
    #[error("cannot read {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed {}: expected at least {expected} tab-separated fields, found {found}", .path.display())]
    MalformedSource {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
}

/// Failure of a single collection cycle.
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("couldn't get {op}: {source}")]
    Read {
        op: &'static str,
        #[source]
        source: StatError,
    },

    #[error("invalid value {value:?} for {name} in {op}: {source}")]
    InvalidValue {
        op: &'static str,
        name: String,
        value: String,
        #[source]
        source: ParseFloatError,
    },
}
