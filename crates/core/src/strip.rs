//! Boilerplate removal.
//!
//! The [`Stripper`] holds an ordered table of [`StripRule`]s. Each rule is
//! applied exactly once, in table order, over the output of the previous
//! rule. There is no fixed-point iteration: a removal can expose text that a
//! later rule matches, but an earlier rule never runs again. On pathological
//! nested boilerplate this leaves residue, and that residue is part of the
//! contract.

use regex::Regex;

use crate::config::{NormalizeConfig, Profile};
use crate::error::{NormalizeError, Result};

/// How much text a rule removes around its match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// From the start of the match up to (not including) the next `\n\n`,
    /// or to the end of the text.
    UntilBlankLine,
    /// The matched line content. Patterns are compiled in multiline mode.
    Line,
    /// Exactly the matched span.
    Match,
}

/// A single boilerplate rule.
#[derive(Debug, Clone)]
pub struct StripRule {
    pub name: String,
    pub matcher: Regex,
    pub scope: Scope,
}

impl StripRule {
    /// Compiles a rule, reporting the offending pattern on failure.
    pub fn new(name: impl Into<String>, pattern: &str, scope: Scope) -> Result<Self> {
        let matcher = Regex::new(pattern)
            .map_err(|e| NormalizeError::InvalidRule { pattern: pattern.to_string(), message: e.to_string() })?;
        Ok(Self { name: name.into(), matcher, scope })
    }

    /// Applies this rule once over `text`.
    pub fn apply(&self, text: &str) -> String {
        match self.scope {
            Scope::UntilBlankLine => remove_until_blank_line(&self.matcher, text),
            Scope::Line | Scope::Match => self.matcher.replace_all(text, "").into_owned(),
        }
    }
}

/// Built-in rules shared by every profile, in application order.
const PLAINTEXT_RULES: &[(&str, &str, Scope)] = &[
    ("legal", r"(?i)Legal Notice", Scope::UntilBlankLine),
    ("navigation", r"(?i)Navigation", Scope::UntilBlankLine),
    ("toc", r"(?i)Table of Contents", Scope::UntilBlankLine),
    ("copyright", r"(?i)Copyright ©", Scope::UntilBlankLine),
];

/// Extra rules for text extracted from rendered HTML pages.
const CRAWL_RULES: &[(&str, &str, Scope)] = &[
    (
        "legal_variants",
        r"(?i)Copyright[^\n]*?Red Hat|All rights reserved|Terms of Use",
        Scope::UntilBlankLine,
    ),
    (
        "pagination",
        r"(?i)\b(?:Previous\s*\|\s*Next|Back to top|Multi-page|Single-page|View full doc as PDF)\b",
        Scope::Match,
    ),
    ("format_switch", r"(?i)\bFormat:", Scope::Match),
    (
        "metadata",
        r"(?im)^[ \t]*(?:Document ID:?|Version:|Last updated:|Category:)[ \t].*$",
        Scope::Line,
    ),
    ("fenced_config", r"(?s)```(?:yaml|json)\n.*?```", Scope::Match),
];

/// Ordered boilerplate rule table.
#[derive(Debug, Clone)]
pub struct Stripper {
    rules: Vec<StripRule>,
}

impl Stripper {
    /// Built-in table for a profile.
    pub fn for_profile(profile: Profile) -> Self {
        let mut table: Vec<&(&str, &str, Scope)> = PLAINTEXT_RULES.iter().collect();
        if profile == Profile::Crawl {
            table.extend(CRAWL_RULES.iter());
        }

        let rules = table
            .into_iter()
            .map(|(name, pattern, scope)| StripRule {
                name: (*name).to_string(),
                matcher: Regex::new(pattern).expect("built-in strip pattern"),
                scope: *scope,
            })
            .collect();

        Self { rules }
    }

    /// Built-in table for the configured profile followed by user rules.
    ///
    /// User `strip` markers are case-insensitive and remove up to the next
    /// blank line; `strip_line` patterns are compiled in multiline mode.
    pub fn from_config(config: &NormalizeConfig) -> Result<Self> {
        let mut stripper = Self::for_profile(config.profile);

        for (index, pattern) in config.extra_strip.iter().enumerate() {
            stripper.push(StripRule::new(
                format!("user_strip_{}", index + 1),
                &format!("(?i){}", pattern),
                Scope::UntilBlankLine,
            )?);
        }

        for (index, pattern) in config.extra_strip_line.iter().enumerate() {
            stripper.push(StripRule::new(
                format!("user_strip_line_{}", index + 1),
                &format!("(?im){}", pattern),
                Scope::Line,
            )?);
        }

        Ok(stripper)
    }

    /// Appends a rule; it runs after every rule already in the table.
    pub fn push(&mut self, rule: StripRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[StripRule] {
        &self.rules
    }

    /// Runs every rule once, in order, and trims the result.
    ///
    /// CRLF line endings are folded to `\n` first so blank-line scopes end
    /// where they would in a Unix file.
    pub fn strip(&self, text: &str) -> String {
        let mut cleaned = text.replace("\r\n", "\n");
        for rule in &self.rules {
            cleaned = rule.apply(&cleaned);
        }
        cleaned.trim().to_string()
    }
}

impl Default for Stripper {
    fn default() -> Self {
        Self::for_profile(Profile::Plaintext)
    }
}

/// Strip boilerplate with the built-in plaintext table.
pub fn strip_boilerplate(text: &str) -> String {
    Stripper::default().strip(text)
}

/// Removes each marker match through the following blank line.
///
/// Scanning resumes at the blank line itself, so two notices separated by a
/// single blank line are both removed and the separator survives.
fn remove_until_blank_line(marker: &Regex, text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;

    while cursor <= text.len() {
        let Some(found) = marker.find_at(text, cursor) else {
            break;
        };

        let end = text[found.end()..].find("\n\n").map(|offset| found.end() + offset).unwrap_or(text.len());

        output.push_str(&text[cursor..found.start()]);

        if end > found.start() {
            cursor = end;
        } else if end < text.len() {
            // zero-width marker directly before a blank line
            output.push('\n');
            cursor = end + 1;
        } else {
            cursor = text.len();
            break;
        }
    }

    if cursor < text.len() {
        output.push_str(&text[cursor..]);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_legal_notice_removed_through_blank_line() {
        let text = "Intro paragraph.\n\nLegal Notice\nCopying is restricted.\nAsk first.\n\nBody text.";
        let cleaned = strip_boilerplate(text);

        assert!(!cleaned.contains("Legal Notice"));
        assert!(!cleaned.contains("Copying is restricted"));
        assert!(!cleaned.contains("Ask first"));
        assert!(cleaned.contains("Intro paragraph."));
        assert!(cleaned.contains("Body text."));
    }

    #[test]
    fn test_crlf_blank_line_ends_scope() {
        let text = "Intro\r\n\r\nLegal Notice\r\nsecret terms\r\n\r\n1 Body heading\r\nBody text\r\n";
        let cleaned = strip_boilerplate(text);

        assert!(!cleaned.contains("secret terms"));
        assert!(!cleaned.contains('\r'));
        assert!(cleaned.contains("1 Body heading\nBody text"));
        assert!(cleaned.starts_with("Intro"));
    }

    #[test]
    fn test_marker_until_end_of_text() {
        let text = "Body text.\n\nCopyright © 2024 Example Corp\nAll trademarks belong to their owners.";
        assert_eq!(strip_boilerplate(text), "Body text.");
    }

    #[rstest]
    #[case("LEGAL NOTICE\nterms\n\nkeep")]
    #[case("legal notice\nterms\n\nkeep")]
    #[case("Table of Contents\n1. Intro\n2. Setup\n\nkeep")]
    #[case("navigation: Home > Docs\n\nkeep")]
    fn test_markers_are_case_insensitive(#[case] text: &str) {
        assert_eq!(strip_boilerplate(text), "keep");
    }

    #[test]
    fn test_marker_mid_line_removes_from_marker_only() {
        let text = "See the Legal Notice for details\nmore\n\nkeep";
        assert_eq!(strip_boilerplate(text), "See the \n\nkeep");
    }

    #[test]
    fn test_absent_markers_are_noop() {
        let text = "  Plain documentation text.\nSecond line.  ";
        assert_eq!(strip_boilerplate(text), "Plain documentation text.\nSecond line.");
    }

    #[test]
    fn test_consecutive_notices() {
        let text = "Legal Notice one\n\nLegal Notice two\n\nkeep";
        let cleaned = strip_boilerplate(text);
        assert!(!cleaned.contains("Legal Notice"));
        assert!(cleaned.ends_with("keep"));
    }

    #[test]
    fn test_single_pass_per_rule() {
        let legal = StripRule::new("legal", r"(?i)Legal Notice", Scope::UntilBlankLine).unwrap();
        let marker = StripRule::new("marker", r"XX", Scope::Match).unwrap();
        let text = "Legal XXNotice\nsecret\n\nbody";

        // Removing the marker exposes a notice, but the legal rule already ran.
        let stripper = Stripper { rules: vec![legal.clone(), marker.clone()] };
        assert_eq!(stripper.strip(text), "Legal Notice\nsecret\n\nbody");

        let reordered = Stripper { rules: vec![marker, legal] };
        assert_eq!(reordered.strip(text), "body");
    }

    #[test]
    fn test_removal_feeds_later_rules() {
        let text = "Navigation Legal Notice\n\nbody";
        assert_eq!(strip_boilerplate(text), "body");
    }

    #[test]
    fn test_crawl_profile_metadata_lines() {
        let stripper = Stripper::for_profile(Profile::Crawl);
        let text = "Intro\nDocument ID: 1234\nVersion: 4.12\nLast updated: 2024-03-01\nCategory: Networking\nBody";
        let cleaned = stripper.strip(text);

        assert!(!cleaned.contains("Document ID"));
        assert!(!cleaned.contains("Last updated"));
        assert!(!cleaned.contains("Category:"));
        assert!(cleaned.starts_with("Intro"));
        assert!(cleaned.ends_with("Body"));
    }

    #[test]
    fn test_crawl_profile_fenced_blocks() {
        let stripper = Stripper::for_profile(Profile::Crawl);
        let text = "Before\n```yaml\napiVersion: v1\nkind: Pod\n```\nMiddle\n```json\n{\"a\": 1}\n```\nAfter";
        let cleaned = stripper.strip(text);

        assert!(!cleaned.contains("apiVersion"));
        assert!(!cleaned.contains("\"a\""));
        assert!(cleaned.contains("Before"));
        assert!(cleaned.contains("Middle"));
        assert!(cleaned.contains("After"));
    }

    #[test]
    fn test_crawl_profile_pagination_chrome() {
        let stripper = Stripper::for_profile(Profile::Crawl);
        let cleaned = stripper.strip("Previous | Next Back to top Installing the CLI");
        assert_eq!(cleaned, "Installing the CLI");
    }

    #[test]
    fn test_plaintext_profile_keeps_metadata_lines() {
        let text = "Document ID: 1234\nBody";
        assert_eq!(strip_boilerplate(text), text);
    }

    #[test]
    fn test_user_rules_run_after_builtins() {
        let config = NormalizeConfig::builder()
            .strip("Was this page helpful")
            .strip_line(r"^Feedback\b.*$")
            .build();
        let stripper = Stripper::from_config(&config).unwrap();

        assert_eq!(stripper.rules().len(), PLAINTEXT_RULES.len() + 2);
        assert_eq!(stripper.rules().last().unwrap().scope, Scope::Line);

        let cleaned = stripper.strip("Body\nFeedback form below\n\nWAS THIS PAGE HELPFUL? Yes No\n\nEnd");
        assert!(!cleaned.contains("Feedback"));
        assert!(!cleaned.contains("Yes No"));
        assert!(cleaned.starts_with("Body"));
        assert!(cleaned.ends_with("End"));
    }

    #[test]
    fn test_invalid_user_rule() {
        let config = NormalizeConfig::builder().strip("(unclosed").build();
        let err = Stripper::from_config(&config).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidRule { .. }));
    }
}
