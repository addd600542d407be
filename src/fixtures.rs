use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseClass {
    LexSuccess,
    LexError,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExpectedOutcome {
    pub tokens_file: Option<String>,
    pub error_contains_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaseSpec {
    pub class: CaseClass,
    pub expected: ExpectedOutcome,
}

#[derive(Debug, Clone)]
pub struct Case {
    pub name: String,
    pub dir: PathBuf,
    pub program_path: PathBuf,
    pub spec: CaseSpec,
}

impl Case {
    pub fn read_text(&self, relative_path: &str) -> Result<String> {
        fs::read_to_string(self.dir.join(relative_path))
            .with_context(|| format!("Reading {} fixture file {}", self.name, relative_path))
    }
}

/// Loads every fixture case under `programs_dir`, sorted by name. Each case
/// is a directory holding `program.my`, `case.yaml`, and expectation files.
pub fn load_cases(programs_dir: &Path) -> Result<Vec<Case>> {
    let mut cases = Vec::new();

    for entry in
        fs::read_dir(programs_dir).with_context(|| format!("Reading {}", programs_dir.display()))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .with_context(|| format!("Case name for {}", path.display()))?;
        let case_raw = fs::read_to_string(path.join("case.yaml"))
            .with_context(|| format!("Reading case.yaml for {name}"))?;
        let spec: CaseSpec = serde_yaml::from_str(&case_raw)
            .with_context(|| format!("Parsing case.yaml for {name}"))?;
        let program_path = path.join("program.my");
        ensure!(program_path.is_file(), "Missing program.my in {name}");
        cases.push(Case {
            name,
            dir: path,
            program_path,
            spec,
        });
    }

    cases.sort_by(|a, b| a.name.cmp(&b.name));
    ensure!(
        !cases.is_empty(),
        "No fixture cases found in {}",
        programs_dir.display()
    );
    Ok(cases)
}
