use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::Error;
use crate::mutants::MutantsByLine;

/// How the value of a metric is formatted for display.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Percent,
    Data,
}

/// The metrics the PIT plugin publishes for every source file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    Data,
    Total,
    Detected,
    NoCoverage,
    Killed,
    Survived,
    MemoryError,
    TimedOut,
    Unknown,
    Coverage,
}

impl Metric {
    /// Counters shown next to the coverage figure in the source tab header, in display order.
    pub const HEADER_COUNTERS: [Metric; 8] = [
        Metric::Total,
        Metric::Detected,
        Metric::NoCoverage,
        Metric::Killed,
        Metric::Survived,
        Metric::MemoryError,
        Metric::TimedOut,
        Metric::Unknown,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Metric::Data => "pitest_mutations_data",
            Metric::Total => "pitest_mutations_total",
            Metric::Detected => "pitest_mutations_detected",
            Metric::NoCoverage => "pitest_mutations_noCoverage",
            Metric::Killed => "pitest_mutations_killed",
            Metric::Survived => "pitest_mutations_survived",
            Metric::MemoryError => "pitest_mutations_memoryError",
            Metric::TimedOut => "pitest_mutations_timedOut",
            Metric::Unknown => "pitest_mutations_unknown",
            Metric::Coverage => "pitest_mutations_coverage",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Metric::Data => "Mutations Data",
            Metric::Total => "Total Mutations",
            Metric::Detected => "Detected Mutations",
            Metric::NoCoverage => "Non Covered Mutations",
            Metric::Killed => "Killed Mutations",
            Metric::Survived => "Survived Mutations",
            Metric::MemoryError => "Memory Error Mutations",
            Metric::TimedOut => "Timed Out Mutations",
            Metric::Unknown => "Unknown Status Mutations",
            Metric::Coverage => "Mutations Coverage",
        }
    }

    pub fn value_type(self) -> ValueType {
        match self {
            Metric::Data => ValueType::Data,
            Metric::Coverage => ValueType::Percent,
            _ => ValueType::Int,
        }
    }
}

/// The measures attached to one source file, keyed by metric key.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Measures {
    values: BTreeMap<String, Value>,
}

impl Measures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, metric: Metric, value: impl Into<Value>) {
        self.values.insert(metric.key().to_owned(), value.into());
    }

    pub fn get(&self, metric: Metric) -> Option<&Value> {
        self.values.get(metric.key()).filter(|value| !value.is_null())
    }

    /// Formats a measure for display. Absent measures format as an empty string.
    pub fn format(&self, metric: Metric) -> String {
        let Some(value) = self.get(metric) else { return String::new() };
        match (metric.value_type(), value) {
            (ValueType::Percent, Value::Number(n)) => match n.as_f64() {
                Some(percent) => format!("{percent:.1}%"),
                None => n.to_string(),
            },
            (ValueType::Int, Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
                (Some(count), _) => count.to_string(),
                (None, Some(count)) => format!("{count:.0}"),
                (None, None) => n.to_string(),
            },
            (ValueType::Data, _) => String::new(),
            (_, Value::String(s)) => s.clone(),
            (_, other) => other.to_string(),
        }
    }

    /// Decodes the per-line mutation payload stored in the data measure.
    ///
    /// The host stores the payload as a JSON string; an inline JSON object is accepted as well.
    /// A missing or malformed payload is an error.
    pub fn mutants_by_line(&self) -> Result<MutantsByLine, Error> {
        let value = self.get(Metric::Data).ok_or(Error::MissingMeasure(Metric::Data.key()))?;
        let mutants = match value {
            Value::String(json) => MutantsByLine::from_json_str(json)?,
            other => MutantsByLine::deserialize(other)?,
        };
        tracing::debug!(lines = mutants.len(), mutants = mutants.total_mutants(), "decoded mutation data");
        Ok(mutants)
    }
}
