//! Per-attempt narration log.

use std::path::Path;

use chrono::Local;
use tracing::warn;

/// Ordered human-readable narration of one attempt, flushed to a timestamped
/// file on every exit path.
#[derive(Debug)]
pub struct AttemptLog {
    lines: Vec<String>,
}

impl AttemptLog {
    pub fn new(title: &str, company: &str) -> Self {
        Self {
            lines: vec![format!(
                "[{}] {} @ {}",
                Local::now().format("%Y-%m-%dT%H:%M:%S"),
                title,
                company
            )],
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(format!("  -> {}", line.into()));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }

    /// Write the log to `dir/apply_<timestamp>.log`. Persistence is
    /// unconditional best-effort: any I/O failure is logged and swallowed so
    /// it can never mask the attempt's outcome.
    pub fn flush_into(&self, dir: &Path) {
        let name = format!("apply_{}.log", Local::now().format("%Y%m%d_%H%M%S"));
        let path = dir.join(name);
        if let Err(err) = std::fs::create_dir_all(dir)
            .and_then(|_| std::fs::write(&path, self.lines.join("\n")))
        {
            warn!(target: "apply", path = %path.display(), error = %err, "failed to flush attempt log");
        }
    }
}
