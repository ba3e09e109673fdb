use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[allow(dead_code)]
pub struct LogGuard(tracing_appender::non_blocking::WorkerGuard);

/// Initialize debug logging.
///
/// When `debug` is enabled, logs are written to a per-session file under the
/// config directory (`sigsweep-debug.log.session-<ts>`) and old session
/// files beyond the keep limit are removed. When `debug` is disabled, this
/// is a no-op.
pub fn init(config: &crate::config::Config) -> Result<Option<LogGuard>> {
    if !config.debug {
        return Ok(None);
    }

    let base = resolve_base_log_path(config.debug_log_path.as_deref())?;
    let (dir, base_name) = split_dir_and_name(&base)?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    // Clean up before opening the new writer to keep the directory tidy.
    cleanup_session_logs(&dir, &base_name, config.debug_log_keep.unwrap_or(20))?;

    let ts = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
    let session_path = dir.join(format!("{base_name}.session-{ts}"));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&session_path)
        .with_context(|| format!("Failed to open log file: {}", session_path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(file);

    // Default: debug our crate, warn for everything else.
    let filter =
        EnvFilter::try_new("sigsweep=debug,warn").unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .try_init()
        .ok(); // If already initialized (e.g., in tests), don't crash.

    tracing::info!(log_file = %session_path.display(), "debug logging enabled");

    Ok(Some(LogGuard(guard)))
}

fn default_log_path() -> Result<PathBuf> {
    let config_path = crate::config::config_path()?;
    Ok(config_path.with_file_name("sigsweep-debug.log"))
}

fn resolve_base_log_path(config_value: Option<&str>) -> Result<PathBuf> {
    let Some(raw) = config_value else {
        return default_log_path();
    };

    let path = PathBuf::from(expand_tilde(raw));

    if raw.ends_with(std::path::MAIN_SEPARATOR) || path.is_dir() {
        return Ok(path.join("sigsweep-debug.log"));
    }

    Ok(path)
}

fn expand_tilde(raw: &str) -> String {
    if raw == "~" || raw.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            let suffix = raw.strip_prefix('~').unwrap_or("");
            return format!("{}{}", home.display(), suffix);
        }
    }
    raw.to_string()
}

fn split_dir_and_name(path: &Path) -> Result<(PathBuf, String)> {
    let dir = path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .context("Invalid debug_log_path: not valid UTF-8")?
        .to_string();
    Ok((dir, name))
}

fn cleanup_session_logs(dir: &Path, base_name: &str, keep: usize) -> Result<()> {
    if keep == 0 {
        return Ok(());
    }

    let prefix = format!("{base_name}.session-");

    let mut candidates: Vec<String> = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read log directory: {}", dir.display()))?
    {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else { continue };
        if name.starts_with(&prefix) {
            candidates.push(name.to_string());
        }
    }

    candidates.sort();
    candidates.reverse(); // newest first (timestamp suffix sorts lexicographically)

    for name in candidates.iter().skip(keep) {
        let path = dir.join(name);
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::debug!(error = %e, file = %path.display(), "failed to remove old log file");
        }
    }

    Ok(())
}

/// Best-effort redaction for Google-style API keys (`AIza...`) before error
/// bodies are logged.
pub fn redact_secrets(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut last = 0usize;
    let mut i = 0usize;

    while i < input.len() {
        if input[i..].starts_with("AIza") && i + 4 < input.len() {
            let mut j = i + 4;
            while j < input.len() {
                match bytes[j] {
                    b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => j += 1,
                    _ => break,
                }
            }

            // Require a minimum length to reduce false positives.
            if j.saturating_sub(i + 4) >= 8 {
                out.push_str(&input[last..i]);
                out.push_str("AIza***REDACTED***");
                last = j;
                i = j;
                continue;
            }
        }

        let ch = input[i..].chars().next().unwrap();
        i += ch.len_utf8();
    }

    out.push_str(&input[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_embedded_api_key() {
        let input = "error for key AIzaSyB1234567890abcdefg in request";
        let out = redact_secrets(input);
        assert!(out.contains("AIza***REDACTED***"));
        assert!(!out.contains("AIzaSyB1234567890abcdefg"));
    }

    #[test]
    fn leaves_short_aiza_prefixes_alone() {
        let input = "AIzaXY is not a key";
        assert_eq!(redact_secrets(input), input);
    }
}
