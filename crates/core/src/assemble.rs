//! Document assembly.
//!
//! The [`Normalizer`] owns one instance of each rule table and turns a raw
//! document into a record: strip once, then run the title, version, section
//! and command extractors on the same stripped text.
//!
//! # Example
//!
//! ```rust
//! use docnorm_core::{Normalizer, RawDocument};
//!
//! let normalizer = Normalizer::default();
//! let record = normalizer.assemble(&RawDocument::new(
//!     "guide.txt",
//!     "Networking Guide 4.12\n1 Overview\n$ oc get pods",
//! ));
//!
//! assert_eq!(record.version.as_deref(), Some("4.12"));
//! assert_eq!(record.commands, vec!["$ oc get pods"]);
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::Result;
use crate::commands::CommandExtractor;
use crate::config::{NormalizeConfig, Profile};
use crate::fields::{extract_title, extract_version_with_profile};
use crate::record::{DocumentRecord, PageRecord};
use crate::sections::Segmenter;
use crate::source::{CrawledPage, RawDocument};
use crate::strip::Stripper;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Compiled rule tables for one normalization run.
///
/// A `Normalizer` is immutable once built and is shared by reference across
/// pool workers.
#[derive(Debug, Clone)]
pub struct Normalizer {
    profile: Profile,
    stripper: Stripper,
    segmenter: Segmenter,
    commands: CommandExtractor,
}

impl Normalizer {
    /// Compile the built-in tables for the configured profile plus any user
    /// rules. Fails only when a user pattern does not compile.
    pub fn new(config: &NormalizeConfig) -> Result<Self> {
        Ok(Self {
            profile: config.profile,
            stripper: Stripper::from_config(config)?,
            segmenter: Segmenter::from_config(config)?,
            commands: CommandExtractor::from_config(config)?,
        })
    }

    /// Built-in tables only.
    pub fn for_profile(profile: Profile) -> Self {
        Self {
            profile,
            stripper: Stripper::for_profile(profile),
            segmenter: Segmenter::for_profile(profile),
            commands: CommandExtractor::for_profile(profile),
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Strip boilerplate with this normalizer's table.
    pub fn strip(&self, text: &str) -> String {
        self.stripper.strip(text)
    }

    /// Build a batch-file record from a raw document.
    pub fn assemble(&self, raw: &RawDocument) -> DocumentRecord {
        let cleaned = self.stripper.strip(&raw.text);

        let record = DocumentRecord {
            title: Some(extract_title(&cleaned)),
            version: extract_version_with_profile(&cleaned, self.profile),
            sections: self.segmenter.segment(&cleaned),
            commands: self.commands.extract(&cleaned),
        };

        tracing::debug!(
            id = %raw.id,
            sections = record.sections.len(),
            commands = record.commands.len(),
            "assembled document"
        );

        record
    }

    /// Build a crawl record from a crawled page.
    ///
    /// The page's own title wins over the extracted one. Crawler-supplied
    /// code blocks come first in `commands`, followed by command lines found
    /// in the text. Empty text and empty lists become `None`.
    pub fn assemble_page(&self, page: &CrawledPage) -> Result<PageRecord> {
        page.validate()?;

        let raw_text = page.raw_text.as_deref().unwrap_or_default();
        let cleaned = self.stripper.strip(raw_text);

        let title = match page.title_hint.as_deref().map(str::trim) {
            Some(hint) if !hint.is_empty() => hint.to_string(),
            _ => extract_title(&cleaned),
        };

        let content = collapse_whitespace(&cleaned);

        let mut commands: Vec<String> = page
            .code_blocks
            .iter()
            .flatten()
            .map(|block| block.trim())
            .filter(|block| !block.is_empty())
            .map(str::to_string)
            .collect();
        commands.extend(self.commands.extract(&cleaned));

        let sections = self.segmenter.segment(&cleaned);

        tracing::debug!(url = %page.url, commands = commands.len(), "assembled page");

        Ok(PageRecord {
            title: Some(title),
            version: extract_version_with_profile(&cleaned, self.profile),
            content: (!content.is_empty()).then_some(content),
            sections: (!sections.is_empty()).then_some(sections),
            commands: (!commands.is_empty()).then_some(commands),
            url: page.url.clone(),
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::for_profile(Profile::Plaintext)
    }
}

/// Assemble a record with the built-in plaintext tables.
pub fn assemble(raw: &RawDocument) -> DocumentRecord {
    Normalizer::default().assemble(raw)
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}
