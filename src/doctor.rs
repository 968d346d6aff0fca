//! Environment diagnostics for bug reports and setup checks.

use std::path::Path;

use crate::capabilities::{Capabilities, MIN_COLS, MIN_ROWS};
use crate::config_store::resolve_config_path;
use crate::logging::log_file_path;
use crate::telemetry::trace_log_path;

pub struct DoctorReport {
    lines: Vec<String>,
}

impl DoctorReport {
    pub fn new(title: &str) -> Self {
        Self {
            lines: vec![title.to_string()],
        }
    }

    pub fn section(&mut self, name: &str) {
        self.lines.push(String::new());
        self.lines.push(format!("[{name}]"));
    }

    pub fn push_kv(&mut self, key: &str, value: impl std::fmt::Display) {
        self.lines.push(format!("  {key}: {value}"));
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

pub fn base_report(config_override: Option<&Path>) -> DoctorReport {
    let caps = Capabilities::detect(false, false);
    let mut report = DoctorReport::new(&format!("shellmate v{}", env!("CARGO_PKG_VERSION")));

    report.section("Terminal");
    report.push_kv("color", caps.color);
    report.push_kv("unicode", caps.unicode);
    report.push_kv("size", format!("{}x{}", caps.width, caps.height));
    report.push_kv("min_size", format!("{MIN_COLS}x{MIN_ROWS}"));
    report.push_kv("size_ok", caps.size_ok());

    report.section("Paths");
    report.push_kv("config", resolve_config_path(config_override).display());
    report.push_kv("debug_log", log_file_path().display());
    report.push_kv("trace_log", trace_log_path().display());

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_carries_version_and_sections() {
        let report = base_report(None).render();
        assert!(report.contains(env!("CARGO_PKG_VERSION")));
        assert!(report.contains("[Terminal]"));
        assert!(report.contains("[Paths]"));
        assert!(report.contains("config:"));
    }

    #[test]
    fn config_override_shows_in_report() {
        let report = base_report(Some(Path::new("/tmp/custom.json"))).render();
        assert!(report.contains("/tmp/custom.json"));
    }
}
