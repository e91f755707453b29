use pitest_json::{MutantRecord, MutantStatus, MutantsByLine};

/// The overall verdict for a source line, shown as the background colour of its value cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    /// No mutant was applied to the line.
    None,
    /// At least one mutant survived.
    Red,
    /// No survivors, but some mutants were never exercised by a test.
    Orange,
    /// Every mutant was killed, or was stopped by a memory error or time out.
    Green,
}

impl Classification {
    pub fn as_str(&self) -> &str {
        match self {
            Classification::None => "",
            Classification::Red => "red",
            Classification::Orange => "orange",
            Classification::Green => "green",
        }
    }
}

/// Counts and classification derived for a single line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LineMutationSummary {
    pub mutant_count: usize,
    pub survived_count: usize,
    /// NO_COVERAGE and UNKNOWN mutants.
    pub uncovered_count: usize,
    pub classification: Classification,
}

impl LineMutationSummary {
    pub const EMPTY: LineMutationSummary = LineMutationSummary {
        mutant_count: 0,
        survived_count: 0,
        uncovered_count: 0,
        classification: Classification::None,
    };

    /// Summarises the mutants of one line. An empty slice yields [`LineMutationSummary::EMPTY`].
    pub fn of(records: &[MutantRecord]) -> Self {
        if records.is_empty() {
            return Self::EMPTY;
        }

        let survived_count = records.iter().filter(|r| r.status.is_survived()).count();
        let uncovered_count = records.iter().filter(|r| r.status.is_uncovered()).count();

        let classification = if survived_count > 0 {
            Classification::Red
        } else if uncovered_count > 0 {
            Classification::Orange
        } else {
            Classification::Green
        };

        LineMutationSummary {
            mutant_count: records.len(),
            survived_count,
            uncovered_count,
            classification,
        }
    }

    pub fn has_mutants(&self) -> bool {
        self.classification != Classification::None
    }

    /// The mutant count cell. Lines without mutants show a blank instead of `0`.
    pub fn count_label(&self) -> String {
        match self.classification {
            Classification::None => "&nbsp;".to_owned(),
            _ => self.mutant_count.to_string(),
        }
    }

    /// The `survived/uncovered` cell.
    pub fn ratio_label(&self) -> String {
        match self.classification {
            Classification::None => "&nbsp;".to_owned(),
            _ => format!("{}/{}", self.survived_count, self.uncovered_count),
        }
    }
}

/// Summarises the mutants applied to `line_number`.
pub fn classify(line_number: u32, mutants_by_line: &MutantsByLine) -> LineMutationSummary {
    match mutants_by_line.get(line_number) {
        Some(records) => LineMutationSummary::of(records),
        None => LineMutationSummary::EMPTY,
    }
}

/// Css class of a single mutant's status label.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MutantStyle {
    Killed,
    NoCoverage,
    Survived,
    /// Statuses outside the known vocabulary get no styling.
    Neutral,
}

impl MutantStyle {
    pub fn of(status: &MutantStatus) -> Self {
        match status {
            MutantStatus::Killed | MutantStatus::MemoryError | MutantStatus::TimedOut => MutantStyle::Killed,
            MutantStatus::NoCoverage | MutantStatus::Unknown => MutantStyle::NoCoverage,
            MutantStatus::Survived => MutantStyle::Survived,
            MutantStatus::Unrecognized(_) => MutantStyle::Neutral,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MutantStyle::Killed => "mutationkilled",
            MutantStyle::NoCoverage => "mutationnocoverage",
            MutantStyle::Survived => "mutationsurvived",
            MutantStyle::Neutral => "",
        }
    }
}
