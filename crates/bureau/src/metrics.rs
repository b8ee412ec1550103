//! Dispatch metrics using metrics-rs.
//!
//! Library code records through the `metrics` facade; the CLI installs
//! [`CliRecorder`] to print a summary on exit. Counters are kept as totals and
//! histograms as running [`Summary`] values, both keyed by name plus labels.

use std::collections::BTreeMap;
use std::sync::Arc;

use bureau_abi::AbiId;
use metrics::{
    Counter, CounterFn, Gauge, Histogram, HistogramFn, Key, KeyName, Metadata, Recorder,
    SharedString, Unit, counter, describe_counter, describe_histogram, histogram,
};
use parking_lot::RwLock;

use crate::dispatch::LocalReason;
use crate::error::DispatchError;

// ============================================================================
// Metric descriptions
// ============================================================================

/// Initialize metric descriptions.
///
/// Call this once at startup to register metric descriptions.
pub fn init() {
    describe_counter!(
        "bureau_dispatch_total",
        Unit::Count,
        "Dispatch decisions by outcome and reason"
    );
    describe_counter!(
        "bureau_remote_calls_total",
        Unit::Count,
        "Syscalls forwarded to the bureau"
    );
    describe_counter!(
        "bureau_dispatch_errors_total",
        Unit::Count,
        "Fatal dispatch errors by class"
    );
    describe_histogram!(
        "bureau_remote_args",
        Unit::Count,
        "Concrete arguments per forwarded syscall"
    );
}

// ============================================================================
// Recording functions
// ============================================================================

/// Record a decision to defer to the local model.
pub fn record_local(reason: &LocalReason) {
    let labels = [
        ("outcome", "local".to_string()),
        ("reason", reason.name().to_string()),
    ];
    counter!("bureau_dispatch_total", &labels).increment(1);
}

/// Record a syscall forwarded to the bureau.
pub fn record_remote(abi: &AbiId, name: &str, args: usize) {
    let labels = [
        ("outcome", "remote".to_string()),
        ("reason", "forwarded".to_string()),
    ];
    counter!("bureau_dispatch_total", &labels).increment(1);

    let labels = [("abi", abi.to_string()), ("name", name.to_string())];
    counter!("bureau_remote_calls_total", &labels).increment(1);

    let labels = [("abi", abi.to_string())];
    #[allow(clippy::cast_precision_loss)]
    let args = args as f64;
    histogram!("bureau_remote_args", &labels).record(args);
}

/// Record a fatal dispatch error.
pub fn record_error(err: &DispatchError) {
    let labels = [("class", err.class().name().to_string())];
    counter!("bureau_dispatch_errors_total", &labels).increment(1);
}

// ============================================================================
// CLI Recorder for terminal output
// ============================================================================

/// Running count, min, max and sum of one histogram.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub sum: f64,
}

impl Summary {
    const fn first(value: f64) -> Self {
        Self {
            count: 1,
            min: value,
            max: value,
            sum: value,
        }
    }

    const fn add(&mut self, value: f64) {
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
    }

    #[must_use]
    pub const fn mean(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let count = self.count as f64;
        self.sum / count
    }
}

#[derive(Default)]
struct Store {
    counters: RwLock<BTreeMap<String, u64>>,
    histograms: RwLock<BTreeMap<String, Summary>>,
}

/// One registered metric, writing into the shared store under its key.
struct Slot {
    key: String,
    store: Arc<Store>,
}

impl CounterFn for Slot {
    fn increment(&self, value: u64) {
        let mut counters = self.store.counters.write();
        *counters.entry(self.key.clone()).or_default() += value;
    }

    fn absolute(&self, value: u64) {
        self.store.counters.write().insert(self.key.clone(), value);
    }
}

impl HistogramFn for Slot {
    fn record(&self, value: f64) {
        self.store
            .histograms
            .write()
            .entry(self.key.clone())
            .and_modify(|summary| summary.add(value))
            .or_insert_with(|| Summary::first(value));
    }
}

/// Recorder that keeps dispatch metrics in memory for terminal output.
///
/// Gauges are not used by dispatch and are dropped.
#[derive(Default)]
pub struct CliRecorder {
    store: Arc<Store>,
}

impl CliRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle sharing this recorder's storage.
    #[must_use]
    pub fn handle(&self) -> CliRecorderHandle {
        CliRecorderHandle {
            store: Arc::clone(&self.store),
        }
    }

    /// Install this recorder as the global metrics recorder.
    ///
    /// Returns `None` if a global recorder is already installed.
    #[must_use]
    pub fn install(self) -> Option<CliRecorderHandle> {
        let handle = self.handle();
        metrics::set_global_recorder(self).ok()?;
        Some(handle)
    }

    fn slot(&self, key: &Key) -> Arc<Slot> {
        Arc::new(Slot {
            key: key_to_string(key),
            store: Arc::clone(&self.store),
        })
    }
}

/// `name{label=value,...}`, or just `name` without labels.
fn key_to_string(key: &Key) -> String {
    let labels: Vec<String> = key
        .labels()
        .map(|label| format!("{}={}", label.key(), label.value()))
        .collect();
    if labels.is_empty() {
        key.name().to_string()
    } else {
        format!("{}{{{}}}", key.name(), labels.join(","))
    }
}

impl Recorder for CliRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}
    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(self.slot(key))
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::from_arc(self.slot(key))
    }
}

/// Handle for reading metrics collected by a [`CliRecorder`].
pub struct CliRecorderHandle {
    store: Arc<Store>,
}

impl CliRecorderHandle {
    /// Summary lines, counters first, each section sorted by key.
    #[must_use]
    pub fn summary(&self) -> Vec<String> {
        let counters: Vec<String> = self
            .store
            .counters
            .read()
            .iter()
            .map(|(key, value)| format!("  {key}: {value}"))
            .collect();
        let histograms: Vec<String> = self
            .store
            .histograms
            .read()
            .iter()
            .map(|(key, summary)| {
                format!(
                    "  {key}: count={}, min={:.1}, max={:.1}, avg={:.2}",
                    summary.count,
                    summary.min,
                    summary.max,
                    summary.mean()
                )
            })
            .collect();

        if counters.is_empty() && histograms.is_empty() {
            return vec!["No metrics collected.".to_string()];
        }

        let mut lines = vec!["## Metrics Summary".to_string()];
        for (title, section) in [("### Counters", counters), ("### Histograms", histograms)] {
            if !section.is_empty() {
                lines.push(title.to_string());
                lines.extend(section);
            }
        }
        lines
    }

    /// Print all collected metrics in a human-readable format.
    pub fn print_summary(&self) {
        println!();
        for line in self.summary() {
            println!("{line}");
        }
    }
}
