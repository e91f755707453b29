use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const CALCULATOR: &str = "package org.example;

public class Calculator {
    public int add(int a, int b) {
        return a + b;
    }

    public boolean isPositive(int a) {
        return a > 0;
    }
}
";

/// Line 5 has a survivor, line 9 an uncovered mutant, line 4 only killed mutants.
pub const CALCULATOR_DATA: &str = r#"{
    "4": [{"d": true, "s": "KILLED", "c": "org.example.Calculator", "mname": "Return Values Mutator", "mdesc": "The return value of a method call has been replaced", "mmethod": "add", "l": "4", "killtest": "org.example.CalculatorTest.testAdd(org.example.CalculatorTest)"}],
    "5": [{"d": false, "s": "SURVIVED", "c": "org.example.Calculator", "mname": "Math Mutator", "mdesc": "A binary arithmetic operation has been replaced by another one", "mmethod": "add", "l": "5"},
          {"d": true, "s": "TIMED_OUT", "c": "org.example.Calculator", "mname": "Inline Constant Mutator", "mdesc": "An inline constant has been changed", "mmethod": "add", "l": "5"}],
    "9": [{"d": false, "s": "NO_COVERAGE", "c": "org.example.Calculator", "mname": "Conditionals Boundary Mutator", "mdesc": "A relational operator has been replaced by a boundary counterpart", "mmethod": "isPositive", "l": "9"},
          {"d": false, "s": "UNKNOWN", "c": "org.example.Calculator", "mname": "Negate Conditionals Mutator", "mdesc": "A conditional expression has been negated", "mmethod": "isPositive", "l": "9"}],
    "40": [{"s": "SURVIVED", "mname": "Math Mutator", "mdesc": "stale line"}]
}"#;

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn source_dir(&self) -> PathBuf {
        self.dir.path().join("src")
    }

    pub fn measures_dir(&self) -> PathBuf {
        self.dir.path().join("measures")
    }

    pub fn measures_path(&self) -> PathBuf {
        self.measures_dir().join("org/example/Calculator.java.json")
    }
}

pub fn calculator_path() -> &'static Path {
    Path::new("org/example/Calculator.java")
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A source tree and a measures tree for a single Calculator class.
pub fn fixture_with_measures(measures: &serde_json::Value) -> Fixture {
    let fixture = Fixture { dir: tempfile::tempdir().unwrap() };
    write(&fixture.source_dir().join(calculator_path()), CALCULATOR);
    write(&fixture.measures_path(), &measures.to_string());
    fixture
}

pub fn fixture() -> Fixture {
    fixture_with_measures(&serde_json::json!({
        "pitest_mutations_data": CALCULATOR_DATA,
        "pitest_mutations_total": 5,
        "pitest_mutations_detected": 2,
        "pitest_mutations_noCoverage": 1,
        "pitest_mutations_killed": 1,
        "pitest_mutations_survived": 1,
        "pitest_mutations_memoryError": 0,
        "pitest_mutations_timedOut": 1,
        "pitest_mutations_unknown": 1,
        "pitest_mutations_coverage": 40.0
    }))
}
