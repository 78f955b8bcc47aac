use console::{Term, style};
use lotto_client::service::{Attempt, CollectProgress, CollectSummary};

const BAR_WIDTH: usize = 40;

/// Single-line progress bar, redrawn in place after every attempt.
///
/// Draws nothing when stderr is not a terminal; the collector logs
/// remain the only output then.
pub struct TerminalProgress {
    term: Term,
}

impl TerminalProgress {
    pub fn stderr() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn draw(&self, line: &str) {
        if !self.term.is_term() {
            return;
        }
        if let Err(e) = self
            .term
            .clear_line()
            .and_then(|()| self.term.write_str(line))
        {
            log::debug!("Failed to draw progress: {e}");
        }
    }
}

/// `Collecting draw #1520 |████------| 42.0%`
pub fn render_bar(draw_number: u32, completed: usize, total: usize) -> String {
    let ratio = if total == 0 {
        1.0
    } else {
        completed as f64 / total as f64
    };
    let filled = ((ratio * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!(
        "Collecting draw #{draw_number} |{}{}| {:.1}%",
        "█".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        ratio * 100.0
    )
}

impl CollectProgress for TerminalProgress {
    fn on_attempt(&mut self, draw_number: u32, attempt: Attempt, completed: usize, total: usize) {
        let bar = render_bar(draw_number, completed, total);
        let line = match attempt {
            Attempt::Collected => bar,
            Attempt::Failed {
                consecutive_failures,
            } => format!("{bar} {}", style(format!("retry {consecutive_failures}")).yellow()),
            Attempt::Skipped => format!("{bar} {}", style("skipped").red()),
        };
        self.draw(&line);
    }

    fn finish(&mut self, summary: &CollectSummary) {
        if !self.term.is_term() {
            return;
        }
        let line = format!(
            "Collected {} draws, {} skipped",
            style(summary.collected).green().bold(),
            summary.skipped.len()
        );
        if let Err(e) = self
            .term
            .clear_line()
            .and_then(|()| self.term.write_line(&line))
        {
            log::debug!("Failed to draw progress: {e}");
        }
    }
}
