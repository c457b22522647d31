//! Section segmentation.
//!
//! Splits stripped text into ordered heading/content pairs. Lines are trimmed
//! before classification; blank lines never close a section and never reach
//! section content.

use regex::Regex;

use crate::config::{NormalizeConfig, Profile};
use crate::error::{NormalizeError, Result};
use crate::record::{MAIN_CONTENT_HEADING, Section};

/// `3`, `3.2`, `3.2.1` followed by a title
const NUMBERED_HEADING: &str = r"^\d+(?:\.\d+)*\s+.*$";
const APPENDIX_HEADING: &str = r"^Appendix [A-Z]\.\s+.*$";

const MARKDOWN_HEADING: &str = r"^#{1,4} .+$";
const CHAPTER_HEADING: &str = r"^Chapter \d+:";
const ALL_CAPS_HEADING: &str = r"^[A-Z][A-Z\s]+[A-Z]$";

/// Heading-pattern table plus the segmentation walk.
#[derive(Debug, Clone)]
pub struct Segmenter {
    headings: Vec<Regex>,
}

impl Segmenter {
    /// Built-in heading patterns for a profile.
    pub fn for_profile(profile: Profile) -> Self {
        let mut patterns = vec![NUMBERED_HEADING, APPENDIX_HEADING];
        if profile == Profile::Crawl {
            patterns.extend([MARKDOWN_HEADING, CHAPTER_HEADING, ALL_CAPS_HEADING]);
        }

        let headings = patterns.into_iter().map(|p| Regex::new(p).unwrap()).collect();
        Self { headings }
    }

    /// Built-in patterns for the configured profile plus user `heading` rules.
    pub fn from_config(config: &NormalizeConfig) -> Result<Self> {
        let mut segmenter = Self::for_profile(config.profile);

        for pattern in &config.extra_headings {
            let re = Regex::new(pattern)
                .map_err(|e| NormalizeError::InvalidRule { pattern: pattern.clone(), message: e.to_string() })?;
            segmenter.headings.push(re);
        }

        Ok(segmenter)
    }

    /// Whether a trimmed line opens a new section.
    pub fn is_heading(&self, line: &str) -> bool {
        self.headings.iter().any(|re| re.is_match(line))
    }

    /// Split text into sections in document order.
    ///
    /// Content before the first heading is kept under a leading
    /// `Main Content` section. Sections whose content is blank are dropped.
    /// When no heading matches at all, or every section came out blank, the
    /// whole trimmed text becomes a single `Main Content` section. Only text
    /// that trims to empty yields no sections.
    pub fn segment(&self, text: &str) -> Vec<Section> {
        let mut sections = Vec::new();
        let mut current = Section::new(MAIN_CONTENT_HEADING, String::new());
        let mut saw_heading = false;

        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if self.is_heading(line) {
                let finished = std::mem::replace(&mut current, Section::new(line, String::new()));
                close_section(&mut sections, finished);
                saw_heading = true;
            } else {
                current.content.push_str(line);
                current.content.push('\n');
            }
        }
        close_section(&mut sections, current);

        if !saw_heading || sections.is_empty() {
            let full_text = text.trim();
            if full_text.is_empty() {
                return Vec::new();
            }
            return vec![Section::new(MAIN_CONTENT_HEADING, full_text)];
        }

        sections
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::for_profile(Profile::Plaintext)
    }
}

/// Segment text with the built-in plaintext heading patterns.
pub fn segment(text: &str) -> Vec<Section> {
    Segmenter::default().segment(text)
}

fn close_section(sections: &mut Vec<Section>, mut section: Section) {
    let trimmed = section.content.trim();
    if trimmed.is_empty() {
        return;
    }
    section.content = trimmed.to_string();
    sections.push(section);
}
