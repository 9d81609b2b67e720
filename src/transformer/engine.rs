//! Status document to sample translation
//!
//! Every optional field drives its own series: present means exactly one
//! sample for that descriptor/label combination, absent means none. Absent
//! values are never reported as zero.

use crate::collector::StatusDocument;

use super::catalog::{Catalog, MetricDescriptor, Sample};

/// Map an overall status level to its numeric value
///
/// Unknown levels map to the `-1.0` sentinel.
pub fn overall_level_value(level: &str) -> f64 {
    match level {
        "available" | "green" => 1.0,
        "degraded" | "yellow" => 0.5,
        "unavailable" | "red" => 0.0,
        _ => -1.0,
    }
}

/// Map a core subsystem level to 1.0 (available) or 0.0
pub fn service_level_value(level: &str) -> f64 {
    if level == "available" {
        1.0
    } else {
        0.0
    }
}

fn millis_to_seconds(ms: f64) -> f64 {
    ms / 1000.0
}

fn push_opt<'a>(out: &mut Vec<Sample<'a>>, descriptor: &'a MetricDescriptor, value: Option<f64>) {
    if let Some(value) = value {
        out.push(Sample::new(descriptor, value));
    }
}

fn push_opt_labeled<'a>(
    out: &mut Vec<Sample<'a>>,
    descriptor: &'a MetricDescriptor,
    value: Option<f64>,
    label: &str,
) {
    if let Some(value) = value {
        out.push(Sample::with_labels(descriptor, value, vec![label.to_string()]));
    }
}

/// Translate a status document into samples, appending to `out`
///
/// `up`, `scrape_success` and `scrape_duration_seconds` are not produced
/// here; they belong to the collection pass.
pub fn translate<'a>(catalog: &'a Catalog, doc: &StatusDocument, out: &mut Vec<Sample<'a>>) {
    let status = &doc.status;

    out.push(Sample::new(
        &catalog.status_overall,
        overall_level_value(&status.overall.level),
    ));

    for (name, service) in &status.core {
        // null entries carry no level
        if let Some(service) = service {
            out.push(Sample::with_labels(
                &catalog.status_core,
                service_level_value(&service.level),
                vec![name.clone()],
            ));
        }
    }

    push_opt(
        out,
        &catalog.status_elasticsearch,
        status
            .core_service("elasticsearch")
            .map(|s| service_level_value(&s.level)),
    );
    push_opt(
        out,
        &catalog.status_saved_objects,
        status
            .core_service("savedObjects")
            .map(|s| service_level_value(&s.level)),
    );

    let metrics = &doc.metrics;

    if let Some(process) = &metrics.process {
        if let Some(memory) = &process.memory {
            if let Some(heap) = &memory.heap {
                out.push(Sample::new(&catalog.heap_total, heap.total_bytes));
                out.push(Sample::new(&catalog.heap_used, heap.used_bytes));
                out.push(Sample::new(&catalog.heap_size_limit, heap.size_limit));
            }
            push_opt(out, &catalog.resident_set, memory.resident_set_bytes);
        }
        push_opt(
            out,
            &catalog.event_loop_delay,
            process.event_loop_delay.map(millis_to_seconds),
        );
        push_opt(out, &catalog.uptime, process.uptime_ms.map(millis_to_seconds));
    }

    if let Some(requests) = &metrics.requests {
        push_opt_labeled(out, &catalog.requests_total, requests.total, "total");
        push_opt_labeled(out, &catalog.requests_total, requests.disconnects, "disconnects");
        if let Some(codes) = &requests.status_codes {
            for (code, count) in codes {
                push_opt_labeled(out, &catalog.requests_total, *count, code);
            }
        }
    }

    push_opt(out, &catalog.concurrent_connections, metrics.concurrent_connections);

    if let Some(rt) = &metrics.response_times {
        push_opt_labeled(out, &catalog.response_time, rt.avg_ms.map(millis_to_seconds), "avg");
        push_opt_labeled(out, &catalog.response_time, rt.max_ms.map(millis_to_seconds), "max");
    }

    if let Some(os) = &metrics.os {
        push_opt(
            out,
            &catalog.os_cpu_percent,
            os.cpu
                .as_ref()
                .and_then(|cpu| cpu.cgroup.as_ref())
                .and_then(|cg| cg.cpu_percent),
        );
        if let Some(load) = &os.load {
            push_opt(out, &catalog.os_load_1m, load.load_1m);
            push_opt(out, &catalog.os_load_5m, load.load_5m);
            push_opt(out, &catalog.os_load_15m, load.load_15m);
        }
        if let Some(memory) = &os.memory {
            push_opt(out, &catalog.os_memory_total, memory.total_bytes);
            push_opt(out, &catalog.os_memory_free, memory.free_bytes);
            push_opt(out, &catalog.os_memory_used, memory.used_bytes);
        }
    }
}
