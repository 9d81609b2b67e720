//! Metric transformation module
//!
//! Converts a Kibana status document into a flat set of typed samples
//! and renders them in the Prometheus text exposition format.

pub mod catalog;
pub mod engine;
pub mod formatter;

pub use catalog::{build_fq_name, Catalog, MetricDescriptor, MetricType, Sample, NAMESPACE};
pub use engine::{overall_level_value, service_level_value, translate};
pub use formatter::{PrometheusFormatter, CONTENT_TYPE};
