//! Metric descriptor catalog
//!
//! The catalog is built once when the collector is constructed and never
//! changes afterwards. Samples borrow their descriptor from it, so a sample
//! can never outlive the collector that produced it.

/// Namespace prefix shared by every exported metric
pub const NAMESPACE: &str = "kibana";

/// Prometheus metric type
///
/// Defines the type of metric for Prometheus exposition format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricType {
    /// Gauge metric - a value that can go up and down
    #[default]
    Gauge,
    /// Counter metric - a monotonically increasing value
    Counter,
}

impl MetricType {
    /// Returns the Prometheus type string representation
    ///
    /// # Example
    ///
    /// ```ignore
    /// use kibana_exporter::transformer::MetricType;
    ///
    /// assert_eq!(MetricType::Gauge.as_str(), "gauge");
    /// assert_eq!(MetricType::Counter.as_str(), "counter");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Gauge => "gauge",
            MetricType::Counter => "counter",
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join non-empty name parts with `_`
///
/// `build_fq_name("kibana", "heap", "total_bytes")` yields
/// `kibana_heap_total_bytes`; empty parts are skipped.
pub fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

/// Static description of one metric family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDescriptor {
    /// Fully-qualified metric name
    pub name: String,
    /// Help text
    pub help: String,
    /// Metric type (gauge, counter)
    pub metric_type: MetricType,
    /// Ordered label names
    pub label_names: Vec<&'static str>,
}

impl MetricDescriptor {
    /// Create a descriptor under the `kibana` namespace
    pub fn new(
        subsystem: &str,
        name: &str,
        help: &str,
        metric_type: MetricType,
        label_names: &[&'static str],
    ) -> Self {
        Self {
            name: build_fq_name(NAMESPACE, subsystem, name),
            help: help.to_string(),
            metric_type,
            label_names: label_names.to_vec(),
        }
    }

    fn gauge(subsystem: &str, name: &str, help: &str) -> Self {
        Self::new(subsystem, name, help, MetricType::Gauge, &[])
    }
}

/// One value for a descriptor, produced fresh on every collection pass
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<'a> {
    pub descriptor: &'a MetricDescriptor,
    pub value: f64,
    /// Label values, in the same order as `descriptor.label_names`
    pub label_values: Vec<String>,
}

impl<'a> Sample<'a> {
    /// Unlabeled sample
    pub fn new(descriptor: &'a MetricDescriptor, value: f64) -> Self {
        Self::with_labels(descriptor, value, Vec::new())
    }

    /// Labeled sample
    pub fn with_labels(descriptor: &'a MetricDescriptor, value: f64, label_values: Vec<String>) -> Self {
        debug_assert_eq!(
            descriptor.label_names.len(),
            label_values.len(),
            "label cardinality mismatch for {}",
            descriptor.name
        );
        Self {
            descriptor,
            value,
            label_values,
        }
    }

    /// Metric name shortcut
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Label value by label name
    pub fn label(&self, name: &str) -> Option<&str> {
        self.descriptor
            .label_names
            .iter()
            .position(|l| *l == name)
            .and_then(|i| self.label_values.get(i))
            .map(String::as_str)
    }

    /// (name, value) label pairs in descriptor order
    pub fn labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.descriptor
            .label_names
            .iter()
            .copied()
            .zip(self.label_values.iter().map(String::as_str))
    }
}

/// The fixed set of descriptors exported by the collector
#[derive(Debug, Clone)]
pub struct Catalog {
    pub up: MetricDescriptor,
    pub status_overall: MetricDescriptor,
    pub status_core: MetricDescriptor,
    pub status_elasticsearch: MetricDescriptor,
    pub status_saved_objects: MetricDescriptor,

    pub heap_total: MetricDescriptor,
    pub heap_used: MetricDescriptor,
    pub heap_size_limit: MetricDescriptor,
    pub resident_set: MetricDescriptor,
    pub event_loop_delay: MetricDescriptor,
    pub requests_total: MetricDescriptor,
    pub response_time: MetricDescriptor,
    pub concurrent_connections: MetricDescriptor,

    pub uptime: MetricDescriptor,
    pub os_cpu_percent: MetricDescriptor,
    pub os_load_1m: MetricDescriptor,
    pub os_load_5m: MetricDescriptor,
    pub os_load_15m: MetricDescriptor,
    pub os_memory_total: MetricDescriptor,
    pub os_memory_free: MetricDescriptor,
    pub os_memory_used: MetricDescriptor,

    pub scrape_duration: MetricDescriptor,
    pub scrape_success: MetricDescriptor,
}

impl Catalog {
    /// Build the catalog
    pub fn new() -> Self {
        Self {
            up: MetricDescriptor::gauge("", "up", "Was the last scrape of Kibana successful"),
            status_overall: MetricDescriptor::gauge(
                "status",
                "overall",
                "Kibana overall status (1=green, 0.5=yellow, 0=red, -1=unknown)",
            ),
            status_core: MetricDescriptor::new(
                "status",
                "core",
                "Kibana core status (1=available, 0=unavailable)",
                MetricType::Gauge,
                &["name"],
            ),
            status_elasticsearch: MetricDescriptor::gauge(
                "status",
                "elasticsearch",
                "Elasticsearch connection status (1=available, 0=unavailable)",
            ),
            status_saved_objects: MetricDescriptor::gauge(
                "status",
                "saved_objects",
                "Saved objects status (1=available, 0=unavailable)",
            ),

            heap_total: MetricDescriptor::gauge("heap", "total_bytes", "Total heap size in bytes"),
            heap_used: MetricDescriptor::gauge("heap", "used_bytes", "Used heap size in bytes"),
            heap_size_limit: MetricDescriptor::gauge(
                "heap",
                "size_limit_bytes",
                "Heap size limit in bytes",
            ),
            resident_set: MetricDescriptor::gauge(
                "memory",
                "resident_set_bytes",
                "Resident set size in bytes",
            ),
            event_loop_delay: MetricDescriptor::gauge(
                "event_loop",
                "delay_seconds",
                "Event loop delay in seconds",
            ),
            requests_total: MetricDescriptor::new(
                "requests",
                "total",
                "Total number of requests",
                MetricType::Counter,
                &["status"],
            ),
            response_time: MetricDescriptor::new(
                "response_time",
                "seconds",
                "Response time statistics",
                MetricType::Gauge,
                &["quantile"],
            ),
            concurrent_connections: MetricDescriptor::gauge(
                "concurrent_connections",
                "total",
                "Number of concurrent connections",
            ),

            uptime: MetricDescriptor::gauge(
                "process",
                "uptime_seconds",
                "Kibana process uptime in seconds",
            ),
            os_cpu_percent: MetricDescriptor::gauge("os", "cpu_percent", "OS CPU usage percentage"),
            os_load_1m: MetricDescriptor::gauge("os", "load_average_1m", "OS load average 1 minute"),
            os_load_5m: MetricDescriptor::gauge("os", "load_average_5m", "OS load average 5 minutes"),
            os_load_15m: MetricDescriptor::gauge(
                "os",
                "load_average_15m",
                "OS load average 15 minutes",
            ),
            os_memory_total: MetricDescriptor::gauge(
                "os",
                "memory_total_bytes",
                "OS total memory in bytes",
            ),
            os_memory_free: MetricDescriptor::gauge(
                "os",
                "memory_free_bytes",
                "OS free memory in bytes",
            ),
            os_memory_used: MetricDescriptor::gauge(
                "os",
                "memory_used_bytes",
                "OS used memory in bytes",
            ),

            scrape_duration: MetricDescriptor::gauge(
                "scrape",
                "duration_seconds",
                "Duration of Kibana scrape",
            ),
            scrape_success: MetricDescriptor::gauge(
                "scrape",
                "success",
                "Was the last scrape successful",
            ),
        }
    }

    /// All descriptors in a stable order
    pub fn descriptors(&self) -> Vec<&MetricDescriptor> {
        vec![
            &self.up,
            &self.status_overall,
            &self.status_core,
            &self.status_elasticsearch,
            &self.status_saved_objects,
            &self.heap_total,
            &self.heap_used,
            &self.heap_size_limit,
            &self.resident_set,
            &self.event_loop_delay,
            &self.requests_total,
            &self.response_time,
            &self.concurrent_connections,
            &self.uptime,
            &self.os_cpu_percent,
            &self.os_load_1m,
            &self.os_load_5m,
            &self.os_load_15m,
            &self.os_memory_total,
            &self.os_memory_free,
            &self.os_memory_used,
            &self.scrape_duration,
            &self.scrape_success,
        ]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
