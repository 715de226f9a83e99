// src/integrity.rs
// Post-serialization audit of pipe-delimited result tables.
// Diagnostic only: violations are collected and logged, never block a write.

#[derive(Debug, Clone, PartialEq)]
pub struct LineIssue {
    pub line_number: usize,
    pub line: String,
    pub description: &'static str,
}

/// Scans every line of a serialized result table. Each line must hold
/// exactly three non-empty fields separated by two pipes, with no control
/// characters and no leading/trailing whitespace inside a field. All
/// violations are collected; an empty result means the table is clean.
pub fn scan_serialized(text: &str) -> Vec<LineIssue> {
    let mut issues = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_number = idx + 1;
        let line = raw.trim();

        let delimiter_count = line.matches('|').count();
        if delimiter_count != 2 {
            issues.push(LineIssue {
                line_number,
                line: line.to_string(),
                description: "Incorrect number of delimiters",
            });
            continue;
        }

        let parts: Vec<&str> = line.split('|').collect();

        if parts.iter().any(|part| part.trim().is_empty()) {
            issues.push(LineIssue {
                line_number,
                line: line.to_string(),
                description: "Empty field detected",
            });
        }

        if parts
            .iter()
            .any(|part| part.contains('\n') || part.contains('\r'))
        {
            issues.push(LineIssue {
                line_number,
                line: line.to_string(),
                description: "Unexpected line break or control character in fields",
            });
        }

        if parts.iter().any(|part| *part != part.trim()) {
            issues.push(LineIssue {
                line_number,
                line: line.to_string(),
                description: "Field contains leading or trailing whitespace",
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_table_yields_no_issues() {
        assert!(scan_serialized("A|B|C\n").is_empty());
    }

    #[test]
    fn short_row_is_flagged_once_for_delimiter_count() {
        let issues = scan_serialized("A|B|C\nX|Y\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line_number, 2);
        assert_eq!(issues[0].description, "Incorrect number of delimiters");
        assert_eq!(issues[0].line, "X|Y");
    }

    #[test]
    fn empty_field_is_flagged() {
        let issues = scan_serialized("A||C\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].description, "Empty field detected");
    }

    #[test]
    fn inner_whitespace_padding_is_flagged() {
        let issues = scan_serialized("A| B |C\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].description,
            "Field contains leading or trailing whitespace"
        );
    }

    #[test]
    fn embedded_carriage_return_is_flagged() {
        let issues = scan_serialized("A|B\rB|C\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].description,
            "Unexpected line break or control character in fields"
        );
    }

    #[test]
    fn all_violations_on_one_line_are_collected() {
        // Empty field plus padded field on the same line: two issues.
        let issues = scan_serialized("A| |C\n");
        assert_eq!(issues.len(), 2);
        assert!(issues
            .iter()
            .any(|i| i.description == "Empty field detected"));
        assert!(issues
            .iter()
            .any(|i| i.description == "Field contains leading or trailing whitespace"));
    }

    #[test]
    fn scan_does_not_stop_at_the_first_bad_line() {
        let issues = scan_serialized("X|Y\nA||C\n");
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].line_number, 1);
        assert_eq!(issues[1].line_number, 2);
    }
}
