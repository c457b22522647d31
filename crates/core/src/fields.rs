//! Title and version heuristics.
//!
//! Both extractors work on boilerplate-stripped text and never fail: a title
//! always has a fallback (`"Untitled"` for empty input) and a missing version
//! is `None`.
//!
//! Title extraction knows one site convention, the vendor portal breadcrumb
//! `Home Products <product> [<version>] <title> Open in new tab`. Sources that
//! do not follow it get a degraded title: the first line, cut at the first
//! ` Open`. That degraded mode is intentional and is the common case for
//! non-portal sources.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::Profile;

pub const UNTITLED: &str = "Untitled";

/// Number of non-empty lines scanned before falling back to the whole text.
const VERSION_HEAD_LINES: usize = 5;

static BREADCRUMB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Home Products (.+?)(?: (\d+\.\d+|\d{4}\.Q\d))? (.+?)(?: Open|$)").unwrap()
});
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Version \d+\.\d+(?:\.\d+)?|\d+\.\d+(?:\.\d+)?|\d{4}\.Q\d").unwrap());
static PRODUCT_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:OpenShift|RHEL)\s+(?:Container Platform|Version)?\s*(\d+\.\d+\.\d+|\d+\.\d+)").unwrap()
});

/// Derive a concise title from the first non-blank line.
///
/// ```rust
/// use docnorm_core::extract_title;
///
/// let title = extract_title("Home Products OpenShift 4.12 Networking Guide Open in new tab");
/// assert_eq!(title, "OpenShift4.12 Networking Guide");
/// assert_eq!(extract_title("   \n"), "Untitled");
/// ```
pub fn extract_title(text: &str) -> String {
    let Some(first) = text.lines().map(str::trim).find(|line| !line.is_empty()) else {
        return UNTITLED.to_string();
    };

    if let Some(caps) = BREADCRUMB_RE.captures(first) {
        let product = caps.get(1).map_or("", |m| m.as_str());
        let version = caps.get(2).map_or("", |m| m.as_str());
        let title = caps.get(3).map_or("", |m| m.as_str());
        return format!("{}{} {}", product, version, title).trim().to_string();
    }

    first.split(" Open").next().unwrap_or(first).trim().to_string()
}

/// Find the first version-like token, preferring the head of the document.
///
/// Recognizes `Version X.Y[.Z]`, `X.Y[.Z]` and year-quarter tags such as
/// `2024.Q2`.
pub fn extract_version(text: &str) -> Option<String> {
    extract_version_with_profile(text, Profile::Plaintext)
}

/// Version extraction for a profile.
///
/// The crawl profile first looks for a version attached to a product name
/// (`OpenShift Container Platform 4.14`, `RHEL 9.2`) and returns just the
/// number, then falls back to the generic patterns.
pub fn extract_version_with_profile(text: &str, profile: Profile) -> Option<String> {
    if profile == Profile::Crawl
        && let Some(version) = find_in_head_then_all(text, |chunk| {
            PRODUCT_VERSION_RE.captures(chunk).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
        })
    {
        return Some(version);
    }

    find_in_head_then_all(text, |chunk| VERSION_RE.find(chunk).map(|m| m.as_str().to_string()))
}

fn find_in_head_then_all<F>(text: &str, find: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .take(VERSION_HEAD_LINES)
        .find_map(&find)
        .or_else(|| find(text))
}
