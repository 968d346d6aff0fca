//! Footer metrics provider.
//!
//! The menu polls this once per render; it must answer in milliseconds and
//! never error. Anything slow or unavailable degrades to a placeholder.

use std::fs;
use std::time::{Duration, Instant};

pub const METRICS_PLACEHOLDER: &str = "metrics unavailable";

/// Narrow interface the runtime consumes; collection internals stay outside
/// the menu core.
pub trait FooterMetrics {
    fn footer_text(&mut self) -> String;
}

/// Fixed string provider, for tests and for the footer-off config.
pub struct StaticFooter(pub String);

impl FooterMetrics for StaticFooter {
    fn footer_text(&mut self) -> String {
        self.0.clone()
    }
}

/// Reads load average and memory usage from /proc, cached briefly so
/// timeout-driven redraws don't hammer the files.
pub struct SystemMetrics {
    cached: String,
    refreshed_at: Option<Instant>,
    ttl: Duration,
}

impl SystemMetrics {
    pub fn new() -> Self {
        Self {
            cached: METRICS_PLACEHOLDER.to_string(),
            refreshed_at: None,
            ttl: Duration::from_secs(2),
        }
    }
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl FooterMetrics for SystemMetrics {
    fn footer_text(&mut self) -> String {
        let fresh = self
            .refreshed_at
            .map(|at| at.elapsed() < self.ttl)
            .unwrap_or(false);
        if !fresh {
            self.cached = read_metrics().unwrap_or_else(|| METRICS_PLACEHOLDER.to_string());
            self.refreshed_at = Some(Instant::now());
        }
        self.cached.clone()
    }
}

fn read_metrics() -> Option<String> {
    let load = read_loadavg()?;
    match read_mem_used_percent() {
        Some(mem) => Some(format!("load {load} | mem {mem}%")),
        None => Some(format!("load {load}")),
    }
}

fn read_loadavg() -> Option<String> {
    let raw = fs::read_to_string("/proc/loadavg").ok()?;
    raw.split_whitespace().next().map(str::to_string)
}

fn read_mem_used_percent() -> Option<u64> {
    let raw = fs::read_to_string("/proc/meminfo").ok()?;
    let mut total = None;
    let mut available = None;
    for line in raw.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            total = parse_kib(rest);
        } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
            available = parse_kib(rest);
        }
        if total.is_some() && available.is_some() {
            break;
        }
    }
    let total = total?;
    let available = available?;
    if total == 0 {
        return None;
    }
    Some(((total - available.min(total)) * 100) / total)
}

fn parse_kib(rest: &str) -> Option<u64> {
    rest.split_whitespace().next()?.parse().ok()
}
