//! A simple in-memory metrics recorder for testing.

use metrics::{Counter, Gauge, GaugeFn, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct TestMetrics {
    gauges: Arc<Mutex<HashMap<String, f64>>>,
    descriptions: Arc<Mutex<HashMap<String, String>>>,
}

impl TestMetrics {
    pub fn new() -> Self {
        Default::default()
    }

    /// Value of the gauge rendered as `name{k="v",...}` (labels sorted).
    pub fn get_gauge(&self, key: &str) -> Option<f64> {
        self.gauges.lock().unwrap().get(key).cloned()
    }

    pub fn get_description(&self, name: &str) -> Option<String> {
        self.descriptions.lock().unwrap().get(name).cloned()
    }

    pub fn gauge_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.gauges.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

fn render_key(key: &Key) -> String {
    let mut labels: Vec<String> = key
        .labels()
        .map(|l| format!("{}=\"{}\"", l.key(), l.value()))
        .collect();
    if labels.is_empty() {
        return key.name().to_string();
    }
    labels.sort();
    format!("{}{{{}}}", key.name(), labels.join(","))
}

impl Recorder for TestMetrics {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, key: KeyName, _unit: Option<Unit>, description: SharedString) {
        self.descriptions
            .lock()
            .unwrap()
            .insert(key.as_str().to_string(), description.to_string());
    }

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, _key: &Key, _metadata: &Metadata<'_>) -> Counter {
        // Not implemented for this test helper
        Counter::noop()
    }

    fn register_gauge(&self, key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::from_arc(Arc::new(MetricGauge {
            key: render_key(key),
            gauges: self.gauges.clone(),
        }))
    }

    fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        // Not implemented for this test helper
        Histogram::noop()
    }
}

#[derive(Debug)]
struct MetricGauge {
    key: String,
    gauges: Arc<Mutex<HashMap<String, f64>>>,
}

impl GaugeFn for MetricGauge {
    fn increment(&self, value: f64) {
        *self.gauges.lock().unwrap().entry(self.key.clone()).or_insert(0.0) += value;
    }

    fn decrement(&self, value: f64) {
        *self.gauges.lock().unwrap().entry(self.key.clone()).or_insert(0.0) -= value;
    }

    fn set(&self, value: f64) {
        self.gauges.lock().unwrap().insert(self.key.clone(), value);
    }
}
