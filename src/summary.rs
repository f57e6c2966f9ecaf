use std::fmt;
use std::ops::AddAssign;

/// Per-level counts. Every word lands in exactly one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchStats {
    pub fn total(&self) -> usize {
        self.generated + self.skipped + self.failed
    }

    /// Assets that exist once the batch has finished.
    pub fn files_on_disk(&self) -> usize {
        self.generated + self.skipped
    }
}

impl AddAssign for BatchStats {
    fn add_assign(&mut self, rhs: Self) {
        self.generated += rhs.generated;
        self.skipped += rhs.skipped;
        self.failed += rhs.failed;
    }
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Generated: {}", self.generated)?;
        writeln!(f, "  Skipped:   {}", self.skipped)?;
        writeln!(f, "  Failed:    {}", self.failed)?;
        write!(f, "  Total:     {} files", self.files_on_disk())
    }
}

/// Sum of [`BatchStats`] over every completed level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunTotals {
    pub levels: Vec<(String, BatchStats)>,
    pub totals: BatchStats,
}

impl RunTotals {
    pub fn record(&mut self, level: impl Into<String>, stats: BatchStats) {
        self.totals += stats;
        self.levels.push((level.into(), stats));
    }
}

impl fmt::Display for RunTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        writeln!(f, "{rule}")?;
        writeln!(f, "ALL LEVELS COMPLETE ({})", self.levels.len())?;
        writeln!(f, "{rule}")?;
        for (level, stats) in &self.levels {
            writeln!(
                f,
                "  {level}: {} generated, {} skipped, {} failed",
                stats.generated, stats.skipped, stats.failed
            )?;
        }
        writeln!(f, "Total across all levels:")?;
        writeln!(f, "{}", self.totals)?;
        write!(f, "{rule}")
    }
}
