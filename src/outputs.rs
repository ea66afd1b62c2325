//! One-shot output of collected metrics.

use crate::core::{Metric, MetricSink};
use log::error;
use std::io::Write;

/// Writes each emitted metric as one JSON object per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MetricSink for JsonLinesSink<W> {
    fn emit(&mut self, metric: Metric) {
        let written = serde_json::to_writer(&mut self.writer, &metric)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(e) = written {
            error!("Failed to write metric {}: {}", metric.desc.fq_name(), e);
        }
    }
}
