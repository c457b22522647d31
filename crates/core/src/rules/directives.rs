use crate::config::Profile;
use crate::error::{NormalizeError, Result};

/// Represents a single rules-file directive
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Boilerplate marker removed up to the next blank line
    Strip(String),
    /// Boilerplate pattern removed as a single line
    StripLine(String),

    /// Extra heading pattern for the segmenter
    Heading(String),

    /// Extra CLI tool name for the command extractor
    Tool(String),

    /// Built-in table to start from
    Profile(Profile),
}

/// Rule extensions collected from one or more rules files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    pub strip: Vec<String>,
    pub strip_line: Vec<String>,
    pub headings: Vec<String>,
    pub tools: Vec<String>,

    /// Profile override; the last file to set it wins
    pub profile: Option<Profile>,
}

impl RuleSet {
    /// Create a new empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directive to this rule set
    pub fn add_directive(&mut self, directive: Directive) {
        match directive {
            Directive::Strip(pattern) => self.strip.push(pattern),
            Directive::StripLine(pattern) => self.strip_line.push(pattern),
            Directive::Heading(pattern) => self.headings.push(pattern),
            Directive::Tool(name) => {
                if !self.tools.contains(&name) {
                    self.tools.push(name);
                }
            }
            Directive::Profile(profile) => self.profile = Some(profile),
        }
    }

    /// Merge another rule set into this one
    pub fn merge(&mut self, other: &RuleSet) {
        self.strip.extend(other.strip.iter().cloned());
        self.strip_line.extend(other.strip_line.iter().cloned());
        self.headings.extend(other.headings.iter().cloned());

        for tool in &other.tools {
            if !self.tools.contains(tool) {
                self.tools.push(tool.clone());
            }
        }

        if other.profile.is_some() {
            self.profile = other.profile;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strip.is_empty()
            && self.strip_line.is_empty()
            && self.headings.is_empty()
            && self.tools.is_empty()
            && self.profile.is_none()
    }
}

/// Parse a directive line from the rules format
pub fn parse_directive(line: &str) -> Result<Directive> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Err(NormalizeError::RulesError("Empty or comment line".to_string()));
    }

    let Some((key, value)) = line.split_once(':') else {
        return Err(NormalizeError::RulesError(format!("Invalid directive format: {}", line)));
    };

    let key = key.trim();
    let value = value.trim();

    if value.is_empty() {
        return Err(NormalizeError::RulesError(format!("Missing value for directive: {}", key)));
    }

    match key {
        "strip" => Ok(Directive::Strip(value.to_string())),
        "strip_line" => Ok(Directive::StripLine(value.to_string())),
        "heading" => Ok(Directive::Heading(value.to_string())),
        "tool" => {
            if value.split_whitespace().count() != 1 {
                return Err(NormalizeError::RulesError(format!("Tool name must be a single word: {}", value)));
            }
            Ok(Directive::Tool(value.to_string()))
        }
        "profile" => value.parse::<Profile>().map(Directive::Profile).map_err(NormalizeError::RulesError),
        _ => Err(NormalizeError::RulesError(format!("Unknown directive: {}", key))),
    }
}
