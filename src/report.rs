//! Textual run report.
//!
//! A [`Report`] is created by the caller, passed `&mut` into every analysis
//! step, and read back once the run is over. Each line is also emitted as a
//! `tracing` event.

/// Append-only log of one analysis run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    lines: Vec<String>,
    verbose: bool,
}

impl Report {
    /// Creates an empty report. Verbose reports also keep `detail` lines.
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            lines: Vec::new(),
            verbose,
        }
    }

    /// Returns whether `detail` lines are recorded.
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Records a line.
    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(target: "framesplit", "{message}");
        self.lines.push(message);
    }

    /// Records a diagnostic line, only kept by verbose reports.
    pub fn detail(&mut self, message: impl Into<String>) {
        if !self.verbose {
            return;
        }
        let message = message.into();
        tracing::debug!(target: "framesplit", "{message}");
        self.lines.push(message);
    }

    /// Records a line about a unit of work that was skipped or failed.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(target: "framesplit", "{message}");
        self.lines.push(message);
    }

    /// Lines recorded so far.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consumes the report, returning its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Rounds to the given number of decimals for display.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
