// src/survey.rs
// Loads the fixed persona and statement lists that drive a simulation.

use std::fs;
use std::path::Path;

use crate::errors::{SimError, SimResult};

/// The survey is a fixed 88-item instrument. A different count is suspicious
/// but not fatal; the run proceeds with whatever was loaded.
pub const EXPECTED_STATEMENTS: usize = 88;

/// One archetypal respondent, read from the pipe-delimited persona file.
#[derive(Debug, Clone)]
pub struct Persona {
    pub name: String,
    pub description: String,
}

/// Reads personas from a text file, one `name|description` per line.
/// Blank lines are skipped; a line without a delimiter is a fatal input
/// error, reported before any network traffic happens.
pub fn load_personas(path: &Path) -> SimResult<Vec<Persona>> {
    let raw = fs::read_to_string(path)?;
    let mut personas = Vec::new();

    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (name, description) = line
            .split_once('|')
            .ok_or(SimError::MalformedPersona { line: idx + 1 })?;
        personas.push(Persona {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
        });
    }

    log::info!("Loaded {} personas from {}", personas.len(), path.display());
    Ok(personas)
}

/// Reads the statement list, one statement per line, trimmed.
pub fn load_statements(path: &Path) -> SimResult<Vec<String>> {
    let raw = fs::read_to_string(path)?;
    let statements: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if statements.len() != EXPECTED_STATEMENTS {
        log::warn!(
            "Expected {} statements but found {} in {}",
            EXPECTED_STATEMENTS,
            statements.len(),
            path.display()
        );
    }
    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_input(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "personapoll_survey_{}_{}",
            std::process::id(),
            name
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parses_personas_from_pipe_delimited_lines() {
        let path = temp_input(
            "personas_ok.txt",
            "Visionary|Leads with bold ideas\nSkeptic|Questions everything\n",
        );
        let personas = load_personas(&path).unwrap();
        assert_eq!(personas.len(), 2);
        assert_eq!(personas[0].name, "Visionary");
        assert_eq!(personas[0].description, "Leads with bold ideas");
        assert_eq!(personas[1].name, "Skeptic");
    }

    #[test]
    fn persona_line_without_delimiter_is_fatal() {
        let path = temp_input("personas_bad.txt", "Visionary|ok\njust a name\n");
        let err = load_personas(&path).unwrap_err();
        match err {
            SimError::MalformedPersona { line } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn statements_are_trimmed_and_blank_lines_dropped() {
        let path = temp_input("statements.txt", "  First statement  \n\nSecond statement\n");
        let statements = load_statements(&path).unwrap();
        assert_eq!(statements, vec!["First statement", "Second statement"]);
    }
}
