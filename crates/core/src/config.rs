//! Normalization configuration.
//!
//! [`NormalizeConfig`] selects the rule-table [`Profile`], sizes the worker
//! pool, and carries user-supplied rule extensions (usually loaded from a
//! rules file, see [`crate::rules`]).
//!
//! # Example
//!
//! ```rust
//! use docnorm_core::{NormalizeConfig, Profile};
//!
//! let config = NormalizeConfig::builder()
//!     .profile(Profile::Crawl)
//!     .workers(4)
//!     .tool("podman")
//!     .build();
//! assert_eq!(config.workers, 4);
//! ```

use std::str::FromStr;

use crate::rules::RuleSet;

/// Rule-table selection.
///
/// `Plaintext` is tuned for text files dumped from documentation sites;
/// `Crawl` adds the rules needed for text extracted from rendered HTML pages
/// (metadata lines, fenced config blocks, markdown and all-caps headings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    #[default]
    Plaintext,
    Crawl,
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plaintext" | "text" | "txt" => Ok(Self::Plaintext),
            "crawl" | "html" => Ok(Self::Crawl),
            _ => Err(format!("Invalid profile: {}. Valid options: plaintext, crawl", s)),
        }
    }
}

/// Configuration for a normalization run.
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Built-in rule table to start from (default: plaintext).
    pub profile: Profile,

    /// Number of pool workers (default: available parallelism).
    pub workers: usize,

    /// Maximum number of documents handed to the pool per round (default: 256).
    pub queue_depth: usize,

    /// Extra until-blank-line boilerplate markers, run after the built-ins.
    pub extra_strip: Vec<String>,

    /// Extra single-line boilerplate patterns, run after `extra_strip`.
    pub extra_strip_line: Vec<String>,

    /// Extra heading patterns for the segmenter.
    pub extra_headings: Vec<String>,

    /// Extra CLI tool names for the command extractor.
    pub extra_tools: Vec<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            workers: default_workers(),
            queue_depth: 256,
            extra_strip: Vec::new(),
            extra_strip_line: Vec::new(),
            extra_headings: Vec::new(),
            extra_tools: Vec::new(),
        }
    }
}

impl NormalizeConfig {
    /// Creates a new builder for NormalizeConfig.
    pub fn builder() -> NormalizeConfigBuilder {
        NormalizeConfigBuilder::new()
    }

    /// Appends every directive of a rules file to this config.
    pub fn apply_rules(&mut self, rules: &RuleSet) {
        self.extra_strip.extend(rules.strip.iter().cloned());
        self.extra_strip_line.extend(rules.strip_line.iter().cloned());
        self.extra_headings.extend(rules.headings.iter().cloned());
        self.extra_tools.extend(rules.tools.iter().cloned());
    }
}

/// One worker per available processing unit, falling back to a single worker.
fn default_workers() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Builder for NormalizeConfig.
pub struct NormalizeConfigBuilder {
    config: NormalizeConfig,
}

impl NormalizeConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: NormalizeConfig::default() }
    }

    /// Sets the rule-table profile.
    pub fn profile(mut self, value: Profile) -> Self {
        self.config.profile = value;
        self
    }

    /// Sets the worker count. Zero is clamped to one.
    pub fn workers(mut self, value: usize) -> Self {
        self.config.workers = value.max(1);
        self
    }

    /// Sets the per-round queue depth. Zero is clamped to one.
    pub fn queue_depth(mut self, value: usize) -> Self {
        self.config.queue_depth = value.max(1);
        self
    }

    /// Adds an until-blank-line boilerplate marker.
    pub fn strip(mut self, pattern: impl Into<String>) -> Self {
        self.config.extra_strip.push(pattern.into());
        self
    }

    /// Adds a single-line boilerplate pattern.
    pub fn strip_line(mut self, pattern: impl Into<String>) -> Self {
        self.config.extra_strip_line.push(pattern.into());
        self
    }

    /// Adds a heading pattern.
    pub fn heading(mut self, pattern: impl Into<String>) -> Self {
        self.config.extra_headings.push(pattern.into());
        self
    }

    /// Adds a CLI tool name.
    pub fn tool(mut self, name: impl Into<String>) -> Self {
        self.config.extra_tools.push(name.into());
        self
    }

    /// Merges a parsed rules file.
    pub fn rules(mut self, rules: &RuleSet) -> Self {
        self.config.apply_rules(rules);
        self
    }

    /// Builds the config.
    pub fn build(self) -> NormalizeConfig {
        self.config
    }
}

impl Default for NormalizeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NormalizeConfig::default();
        assert_eq!(config.profile, Profile::Plaintext);
        assert!(config.workers >= 1);
        assert_eq!(config.queue_depth, 256);
        assert!(config.extra_tools.is_empty());
    }

    #[test]
    fn test_builder_clamps_zero() {
        let config = NormalizeConfig::builder().workers(0).queue_depth(0).build();
        assert_eq!(config.workers, 1);
        assert_eq!(config.queue_depth, 1);
    }

    #[test]
    fn test_builder_extensions() {
        let config = NormalizeConfig::builder()
            .profile(Profile::Crawl)
            .strip("Feedback")
            .strip_line("^Was this helpful")
            .heading("^Step \\d+")
            .tool("podman")
            .build();

        assert_eq!(config.profile, Profile::Crawl);
        assert_eq!(config.extra_strip, vec!["Feedback"]);
        assert_eq!(config.extra_strip_line, vec!["^Was this helpful"]);
        assert_eq!(config.extra_headings, vec!["^Step \\d+"]);
        assert_eq!(config.extra_tools, vec!["podman"]);
    }

    #[test]
    fn test_apply_rules() {
        let rules = RuleSet { tools: vec!["helm".to_string()], ..Default::default() };
        let config = NormalizeConfig::builder().rules(&rules).build();
        assert_eq!(config.extra_tools, vec!["helm"]);
    }

    #[test]
    fn test_profile_from_str() {
        assert_eq!("crawl".parse::<Profile>(), Ok(Profile::Crawl));
        assert_eq!("TEXT".parse::<Profile>(), Ok(Profile::Plaintext));
        assert!("pdf".parse::<Profile>().is_err());
    }
}
