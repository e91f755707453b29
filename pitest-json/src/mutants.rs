use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use smallvec::SmallVec;

use crate::Error;

/// Represents the detection status of a mutant, as written by the PIT plugin in the `s` field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "Option<String>")]
pub enum MutantStatus {
    Killed,
    MemoryError,
    TimedOut,
    NoCoverage,
    Unknown,
    Survived,
    /// A status string that is not part of the vocabulary above. Kept verbatim so it can still be
    /// displayed. A missing or null status is the empty string.
    Unrecognized(String),
}

impl Default for MutantStatus {
    fn default() -> Self {
        MutantStatus::Unrecognized(String::new())
    }
}

impl MutantStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "KILLED" => MutantStatus::Killed,
            "MEMORY_ERROR" => MutantStatus::MemoryError,
            "TIMED_OUT" => MutantStatus::TimedOut,
            "NO_COVERAGE" => MutantStatus::NoCoverage,
            "UNKNOWN" => MutantStatus::Unknown,
            "SURVIVED" => MutantStatus::Survived,
            other => MutantStatus::Unrecognized(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MutantStatus::Killed => "KILLED",
            MutantStatus::MemoryError => "MEMORY_ERROR",
            MutantStatus::TimedOut => "TIMED_OUT",
            MutantStatus::NoCoverage => "NO_COVERAGE",
            MutantStatus::Unknown => "UNKNOWN",
            MutantStatus::Survived => "SURVIVED",
            MutantStatus::Unrecognized(s) => s,
        }
    }

    pub fn is_survived(&self) -> bool {
        matches!(self, MutantStatus::Survived)
    }

    /// NO_COVERAGE and UNKNOWN share a single "uncovered" bucket.
    pub fn is_uncovered(&self) -> bool {
        matches!(self, MutantStatus::NoCoverage | MutantStatus::Unknown)
    }
}

impl From<String> for MutantStatus {
    fn from(s: String) -> Self {
        match MutantStatus::parse(&s) {
            MutantStatus::Unrecognized(_) => MutantStatus::Unrecognized(s),
            status => status,
        }
    }
}

impl From<Option<String>> for MutantStatus {
    fn from(s: Option<String>) -> Self {
        s.map(MutantStatus::from).unwrap_or_default()
    }
}

impl fmt::Display for MutantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single mutant applied to a source line.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MutantRecord {
    #[serde(rename = "s", default)]
    pub status: MutantStatus,
    #[serde(rename = "mname", default)]
    pub mutator_name: String,
    #[serde(rename = "mdesc", default)]
    pub mutator_description: String,
    #[serde(rename = "d", default)]
    pub detected: Option<bool>,
    #[serde(rename = "c", default)]
    pub class_name: Option<String>,
    #[serde(rename = "mmethod", default)]
    pub mutated_method: Option<String>,
    #[serde(rename = "killtest", default)]
    pub killing_test: Option<String>,
}

impl From<MutantStatus> for MutantRecord {
    fn from(status: MutantStatus) -> Self {
        MutantRecord {
            status,
            mutator_name: String::new(),
            mutator_description: String::new(),
            detected: None,
            class_name: None,
            mutated_method: None,
            killing_test: None,
        }
    }
}

/// Most lines carry only a handful of mutants.
pub type MutantList = SmallVec<[MutantRecord; 4]>;

/// The mutants of one source file grouped by their 1-based line number.
///
/// Every stored list is non-empty: an empty list in the payload is treated the same as an absent
/// line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MutantsByLine {
    lines: BTreeMap<u32, MutantList>,
}

impl MutantsByLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the `{ "<line>": [ { "s": ..., "mname": ..., "mdesc": ... } ] }` payload.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, line: u32, record: MutantRecord) {
        self.lines.entry(line).or_default().push(record);
    }

    pub fn get(&self, line: u32) -> Option<&[MutantRecord]> {
        self.lines.get(&line).map(|records| &records[..])
    }

    /// Line numbers that cannot belong to a source of `line_count` lines.
    pub fn lines_outside(&self, line_count: usize) -> impl Iterator<Item = u32> {
        self.lines.keys().copied().filter(move |line| *line == 0 || *line as usize > line_count)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_mutants(&self) -> usize {
        self.lines.values().map(|records| records.len()).sum()
    }
}

impl FromIterator<(u32, MutantRecord)> for MutantsByLine {
    fn from_iter<I: IntoIterator<Item = (u32, MutantRecord)>>(iter: I) -> Self {
        let mut mutants = MutantsByLine::new();
        for (line, record) in iter {
            mutants.insert(line, record);
        }
        mutants
    }
}

/// Accepts only the canonical decimal form, so `"05"` or `"+5"` never alias line 5.
fn parse_line_number(key: &str) -> Option<u32> {
    let line = key.parse::<u32>().ok()?;
    (line.to_string() == key).then_some(line)
}

impl<'de> Deserialize<'de> for MutantsByLine {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LinesVisitor;

        impl<'de> Visitor<'de> for LinesVisitor {
            type Value = MutantsByLine;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from line numbers to lists of mutants")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut lines: BTreeMap<u32, MutantList> = BTreeMap::new();
                while let Some((key, records)) = map.next_entry::<String, MutantList>()? {
                    let line = parse_line_number(&key).ok_or_else(|| {
                        de::Error::invalid_value(de::Unexpected::Str(&key), &"a line number")
                    })?;
                    if records.is_empty() {
                        continue;
                    }
                    lines.entry(line).or_default().extend(records);
                }
                Ok(MutantsByLine { lines })
            }
        }

        deserializer.deserialize_map(LinesVisitor)
    }
}
