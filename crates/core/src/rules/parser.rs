use crate::error::{NormalizeError, Result};
use crate::rules::directives::{RuleSet, parse_directive};
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Rules file parser
#[derive(Debug)]
pub struct RuleParser;

impl RuleParser {
    /// Parse a single rules file
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<RuleSet> {
        let file = std::fs::File::open(&path).map_err(|e| {
            NormalizeError::RulesError(format!("Cannot open file {}: {}", path.as_ref().display(), e))
        })?;

        let reader = BufReader::new(file);
        Self::parse_reader(reader)
    }

    /// Parse rules from a reader
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<RuleSet> {
        let mut rules = RuleSet::new();

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line =
                line.map_err(|e| NormalizeError::RulesError(format!("Read error at line {}: {}", line_number, e)))?;
            Self::parse_line(&mut rules, &line, line_number)?;
        }

        Ok(rules)
    }

    /// Parse rules from a string
    pub fn parse_string(content: &str) -> Result<RuleSet> {
        let mut rules = RuleSet::new();

        for (index, line) in content.lines().enumerate() {
            Self::parse_line(&mut rules, line, index + 1)?;
        }

        Ok(rules)
    }

    fn parse_line(rules: &mut RuleSet, line: &str, line_number: usize) -> Result<()> {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        match parse_directive(line) {
            Ok(directive) => {
                rules.add_directive(directive);
                Ok(())
            }
            Err(e) => Err(NormalizeError::RulesError(format!("Parse error at line {}: {}", line_number, e))),
        }
    }
}
