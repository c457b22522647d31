//! Shell and CLI command-line detection.
//!
//! A line counts as a command when, after trimming, it starts with a prompt
//! glyph (`$ ` or `> `) or contains a known tool name as a whole word. Tool
//! matching is deliberately loose: prose such as "kubectl is a CLI tool" is
//! reported too.

use regex::Regex;

use crate::config::{NormalizeConfig, Profile};
use crate::error::{NormalizeError, Result};

/// Tools recognized in every profile.
pub const DEFAULT_TOOLS: &[&str] = &["kubectl", "oc", "rpm", "artemis", "mvn"];

/// Tools added by the crawl profile.
pub const CRAWL_TOOLS: &[&str] = &["yum"];

const PROMPT_PATTERN: &str = r"^[$>] .+";

/// Matches prompt lines and tool mentions.
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    prompt: Regex,
    tools: Option<Regex>,
    tool_names: Vec<String>,
}

impl CommandExtractor {
    /// Build an extractor for an explicit tool list.
    pub fn with_tools<I, S>(tools: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tool_names: Vec<String> = Vec::new();
        for tool in tools {
            let tool = tool.as_ref().trim();
            if !tool.is_empty() && !tool_names.iter().any(|t| t == tool) {
                tool_names.push(tool.to_string());
            }
        }

        let tools = if tool_names.is_empty() {
            None
        } else {
            let alternation = tool_names.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
            let pattern = format!(r"\b(?:{})\b", alternation);
            let re = Regex::new(&pattern).map_err(|e| NormalizeError::InvalidRule { pattern, message: e.to_string() })?;
            Some(re)
        };

        Ok(Self { prompt: Regex::new(PROMPT_PATTERN).unwrap(), tools, tool_names })
    }

    /// Built-in tools for a profile.
    pub fn for_profile(profile: Profile) -> Self {
        let tools = builtin_tools(profile);
        Self::with_tools(tools).expect("built-in tool names are plain words")
    }

    /// Built-in tools for the configured profile plus user `tool` rules.
    pub fn from_config(config: &NormalizeConfig) -> Result<Self> {
        let mut tools: Vec<String> = builtin_tools(config.profile).into_iter().map(str::to_string).collect();
        tools.extend(config.extra_tools.iter().cloned());
        Self::with_tools(tools)
    }

    pub fn tool_names(&self) -> &[String] {
        &self.tool_names
    }

    /// Whether a trimmed line looks like a command.
    pub fn is_command(&self, line: &str) -> bool {
        self.prompt.is_match(line) || self.tools.as_ref().is_some_and(|re| re.is_match(line))
    }

    /// Collect command-like lines verbatim (trimmed), in order, keeping duplicates.
    pub fn extract(&self, text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| self.is_command(line))
            .map(str::to_string)
            .collect()
    }
}

impl Default for CommandExtractor {
    fn default() -> Self {
        Self::for_profile(Profile::Plaintext)
    }
}

/// Extract commands with the built-in plaintext tool table.
pub fn extract_commands(text: &str) -> Vec<String> {
    CommandExtractor::default().extract(text)
}

fn builtin_tools(profile: Profile) -> Vec<&'static str> {
    let mut tools = DEFAULT_TOOLS.to_vec();
    if profile == Profile::Crawl {
        tools.extend_from_slice(CRAWL_TOOLS);
    }
    tools
}
