use std::collections::BTreeMap;
use std::fmt;

/// Lowercased word → last spelling seen.
pub fn normalize_words<I, S>(words: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut map = BTreeMap::new();
    for word in words {
        let word = word.as_ref();
        map.insert(word.to_lowercase(), word.to_string());
    }
    map
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelReport {
    pub level: String,
    /// Distinct (case-insensitive) reference words.
    pub reference_count: usize,
    /// Distinct (case-insensitive) words in the current list.
    pub current_count: usize,
    /// Reference words absent from the current list, in reference spelling,
    /// ordered by their lowercase form.
    pub missing: Vec<String>,
}

/// `reference − current`, compared case-insensitively.
pub fn verify_level<R, C>(level: &str, reference: R, current: C) -> LevelReport
where
    R: IntoIterator,
    R::Item: AsRef<str>,
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    let reference = normalize_words(reference);
    let current = normalize_words(current);
    let missing = reference
        .iter()
        .filter(|(key, _)| !current.contains_key(*key))
        .map(|(_, original)| original.clone())
        .collect();
    LevelReport {
        level: level.to_string(),
        reference_count: reference.len(),
        current_count: current.len(),
        missing,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub levels: Vec<LevelReport>,
}

impl VerificationReport {
    pub fn push(&mut self, report: LevelReport) {
        self.levels.push(report);
    }

    pub fn total_reference(&self) -> usize {
        self.levels.iter().map(|l| l.reference_count).sum()
    }

    pub fn total_current(&self) -> usize {
        self.levels.iter().map(|l| l.current_count).sum()
    }

    pub fn total_missing(&self) -> usize {
        self.levels.iter().map(|l| l.missing.len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.total_missing() == 0
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        writeln!(f, "{rule}")?;
        writeln!(f, "WORD COUNT VERIFICATION")?;
        writeln!(f, "{rule}")?;
        for l in &self.levels {
            writeln!(f)?;
            writeln!(f, "{} Words:", l.level)?;
            writeln!(f, "  From reference: {}", l.reference_count)?;
            writeln!(f, "  In file: {}", l.current_count)?;
            writeln!(f, "  Missing: {}", l.missing.len())?;
        }
        writeln!(f)?;
        writeln!(f, "Total from reference: {}", self.total_reference())?;
        writeln!(f, "Total in files: {}", self.total_current())?;
        write!(f, "Total missing: {}", self.total_missing())?;

        for l in self.levels.iter().filter(|l| !l.missing.is_empty()) {
            writeln!(f)?;
            writeln!(f, "\n{rule}")?;
            writeln!(f, "MISSING FROM {}:", l.level)?;
            write!(f, "{rule}")?;
            for word in &l.missing {
                write!(f, "\n  - {word}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_missing() {
        let report = verify_level("1B", ["x", "y"], ["x"]);
        assert_eq!(report.missing, vec!["y"]);
        assert_eq!(report.reference_count, 2);
        assert_eq!(report.current_count, 1);
    }

    #[test]
    fn test_case_insensitive_and_deduplicated() {
        let reference = ["Buffalo", "buffalo", "Everest", "promenade", "promenade"];
        let current = ["buffalo", "EVEREST"];
        let report = verify_level("2B", reference, current);
        assert_eq!(report.reference_count, 3);
        assert_eq!(report.missing, vec!["promenade"]);
    }

    #[test]
    fn test_missing_keeps_reference_spelling_sorted() {
        let report = verify_level("3B", ["Tucson", "erie", "Adriatic"], Vec::<String>::new());
        assert_eq!(report.missing, vec!["Adriatic", "erie", "Tucson"]);
    }

    #[test]
    fn test_later_spelling_wins() {
        let report = verify_level("2B", ["Buffalo", "buffalo"], Vec::<String>::new());
        assert_eq!(report.missing, vec!["buffalo"]);

        let words = normalize_words(["Everest", "EVEREST"]);
        assert_eq!(words["everest"], "EVEREST");
    }

    #[test]
    fn test_extra_current_words_ignored() {
        let report = verify_level("1B", ["tag"], ["tag", "send"]);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_report_totals_and_display() {
        let mut report = VerificationReport::default();
        report.push(verify_level("1B", ["x", "y"], ["x"]));
        report.push(verify_level("2B", ["z"], ["z"]));

        assert_eq!(report.total_reference(), 3);
        assert_eq!(report.total_current(), 2);
        assert_eq!(report.total_missing(), 1);
        assert!(!report.is_complete());

        let text = report.to_string();
        assert!(text.contains("MISSING FROM 1B:"));
        assert!(text.contains("  - y"));
        assert!(!text.contains("MISSING FROM 2B:"));
    }
}
