//! What menu items actually do once activated.
//!
//! Every action resolves to a one-line status banner. Failures banner the
//! error text; they never tear down the session or move navigation state.

use std::env;
use std::fs;
use std::path::PathBuf;

use crate::config_store::JsonStore;
use crate::logging::log_debug;
use crate::menu::ActionId;
use crate::metrics::FooterMetrics;

/// Cache directory the plugin's scripts share with us.
pub fn cache_dir() -> PathBuf {
    if let Some(dir) = env::var_os("XDG_CACHE_HOME") {
        return PathBuf::from(dir).join("shellmate");
    }
    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".cache").join("shellmate");
    }
    env::temp_dir().join("shellmate_cache")
}

fn backup_path(store: &JsonStore) -> PathBuf {
    let mut name = store
        .path()
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "config.json".to_string());
    name.push_str(".bak");
    store.path().with_file_name(name)
}

/// Run one action and report what happened as a banner line.
pub fn dispatch(
    action: ActionId,
    store: &mut JsonStore,
    metrics: &mut dyn FooterMetrics,
) -> String {
    match action.0 {
        "backup.create" => match fs::copy(store.path(), backup_path(store)) {
            Ok(_) => "Backup written".to_string(),
            Err(err) => {
                log_debug(&format!("backup.create failed: {err}"));
                format!("Backup failed: {err}")
            }
        },
        "backup.restore" => {
            let backup = backup_path(store);
            if !backup.exists() {
                return "No backup to restore".to_string();
            }
            match fs::copy(&backup, store.path()) {
                Ok(_) => {
                    store.reload();
                    "Backup restored".to_string()
                }
                Err(err) => {
                    log_debug(&format!("backup.restore failed: {err}"));
                    format!("Restore failed: {err}")
                }
            }
        }
        "tools.clear_caches" => {
            let dir = cache_dir();
            match fs::remove_dir_all(&dir) {
                Ok(()) => "Caches cleared".to_string(),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    "Caches already empty".to_string()
                }
                Err(err) => {
                    log_debug(&format!("tools.clear_caches failed: {err}"));
                    format!("Cache clear failed: {err}")
                }
            }
        }
        "tools.system_report" => metrics.footer_text(),
        "about.show" => format!("shellmate v{}", env!("CARGO_PKG_VERSION")),
        other => {
            log_debug(&format!("unknown action id: {other}"));
            format!("Nothing wired to '{other}' yet")
        }
    }
}
