//! Core metric types and the contracts between collectors and their host.
//!
//! A collector owns its `Gauge`s and, once per collection cycle, pushes a
//! `Metric` for each of them into whatever `MetricSink` the host supplies.
//! The sink decides how values reach the outside world (a Prometheus
//! recorder, stdout, an in-memory buffer in tests).

use crate::error::CollectorError;
use serde::Serialize;

/// Identity and documentation of a metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GaugeDesc {
    pub namespace: String,
    pub subsystem: String,
    pub name: String,
    pub help: String,
}

impl GaugeDesc {
    pub fn new(
        namespace: impl Into<String>,
        subsystem: impl Into<String>,
        name: impl Into<String>,
        help: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            subsystem: subsystem.into(),
            name: name.into(),
            help: help.into(),
        }
    }

    /// Joins namespace, subsystem and name with `_`, skipping empty parts.
    pub fn fq_name(&self) -> String {
        build_fq_name(&self.namespace, &self.subsystem, &self.name)
    }
}

/// Builds a fully-qualified metric name in the Prometheus convention.
pub fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

/// A single numeric value that can go up and down.
#[derive(Debug, Clone)]
pub struct Gauge {
    desc: GaugeDesc,
    value: f64,
}

impl Gauge {
    /// Creates a gauge holding `0.0`.
    pub fn new(desc: GaugeDesc) -> Self {
        Self { desc, value: 0.0 }
    }

    pub fn desc(&self) -> &GaugeDesc {
        &self.desc
    }

    pub fn set(&mut self, value: f64) {
        self.value = value;
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Emits the current value to `sink`.
    pub fn collect(&self, sink: &mut dyn MetricSink) {
        sink.emit(Metric {
            desc: self.desc.clone(),
            value: self.value,
        });
    }
}

/// A gauge sample handed to a sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    #[serde(flatten)]
    pub desc: GaugeDesc,
    pub value: f64,
}

/// Destination for the metrics produced during a collection cycle.
pub trait MetricSink {
    fn emit(&mut self, metric: Metric);
}

impl MetricSink for Vec<Metric> {
    fn emit(&mut self, metric: Metric) {
        self.push(metric);
    }
}

/// A source of metrics driven by the host once per collection cycle.
pub trait Collector: Send + Sync {
    /// The subsystem this collector is registered under (e.g. `"filefd"`).
    fn name(&self) -> &'static str;

    /// Runs one collection cycle, emitting every metric the collector owns.
    fn update(&self, sink: &mut dyn MetricSink) -> Result<(), CollectorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fq_name_skips_empty_parts() {
        assert_eq!(build_fq_name("node", "filefd", "allocated"), "node_filefd_allocated");
        assert_eq!(build_fq_name("", "filefd", "maximum"), "filefd_maximum");
        assert_eq!(build_fq_name("node", "", "up"), "node_up");
    }

    #[test]
    fn test_gauge_collect_emits_current_value() {
        let mut gauge = Gauge::new(GaugeDesc::new("node", "filefd", "allocated", "help"));
        gauge.set(42.0);
        gauge.set(7.5);

        let mut sink = Vec::new();
        gauge.collect(&mut sink);

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].desc.fq_name(), "node_filefd_allocated");
        assert_eq!(sink[0].value, 7.5);
    }
}
