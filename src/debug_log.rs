//! Lightweight debug logging to a local text file.
//!
//! Probe failures during collection are recorded here instead of cluttering
//! the report. Logging never fails the caller.

use directories::ProjectDirs;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

const APP_DIR: &str = "machine-report";

/// Per-user local data directory, the same project namespace `config.rs`
/// resolves its config file under.
fn log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APP_DIR).map(|dirs| dirs.data_local_dir().join("logs"))
}

fn log_path(file_name: &str) -> Option<PathBuf> {
    let dir = log_dir()?;
    let _ = std::fs::create_dir_all(&dir);
    Some(dir.join(file_name))
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn format_line(message: &str) -> String {
    format!("[{}] {}", timestamp(), message)
}

fn append_line(file_name: &str, message: &str) {
    let Some(path) = log_path(file_name) else {
        return;
    };
    let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = writeln!(file, "{}", format_line(message));
}

/// Record a metric probe that fell back to a placeholder value.
pub fn collector_log(message: &str) {
    append_line("collector.log", message);
}

/// Record a CLI-level event (ignored flags, config fallbacks).
pub fn cli_log(message: &str) {
    append_line("cli.log", message);
}
