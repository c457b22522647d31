//! Record store repair.
//!
//! Naive serializers sometimes wrote `content` values without escaping, e.g.
//! `{"content": "he said "hi""}`. [`repair`] patches that one defect and
//! re-validates; anything else is left for the caller to drop.
//!
//! A `content` value is taken to end at the first unescaped quote followed by
//! `, "<key>":` or `}`. Inside it, bare quotes and raw control characters are
//! escaped and existing escape sequences are kept.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::{NormalizeError, Result};

static CONTENT_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""content"\s*:\s*""#).unwrap());
static VALUE_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^\s*(?:,\s*"[^"]+"\s*:|\})"#).unwrap());

/// Counts from a repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Lines that were already valid
    pub kept: usize,
    /// Lines that became valid after escaping
    pub repaired: usize,
    /// 1-based numbers of lines that could not be repaired
    pub dropped: Vec<usize>,
}

impl RepairReport {
    /// Lines written to the output store.
    pub fn written(&self) -> usize {
        self.kept + self.repaired
    }
}

/// Validate one record line, repairing unescaped `content` values if needed.
///
/// Returns the line unchanged when it already parses as a JSON object, the
/// patched line when escaping makes it parse, and `None` otherwise. A record
/// must be an object: lines that parse as arrays, strings or numbers are
/// invalid and come back as `None`. Applying `repair` to its own output
/// returns that output unchanged.
pub fn repair(line: &str) -> Option<String> {
    if is_record(line) {
        return Some(line.to_string());
    }

    let patched = escape_content_values(line);
    if is_record(&patched) {
        Some(patched)
    } else {
        tracing::debug!(line = %truncate(line, 80), "record still invalid after escaping");
        None
    }
}

/// Copy valid and repaired lines from `reader` to `writer`.
///
/// Lines are trimmed first; blank lines are skipped without being counted.
/// A line that is not valid UTF-8 is dropped like any other invalid record.
pub fn repair_lines<R: BufRead, W: Write>(mut reader: R, mut writer: W) -> Result<RepairReport> {
    let mut report = RepairReport::default();
    let mut buffer = Vec::new();
    let mut line_number = 0;

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        line_number += 1;

        let Ok(line) = std::str::from_utf8(&buffer) else {
            tracing::warn!(line = line_number, "skipping line with invalid UTF-8");
            report.dropped.push(line_number);
            continue;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match repair(line) {
            Some(fixed) => {
                if fixed == line {
                    report.kept += 1;
                } else {
                    report.repaired += 1;
                }
                writeln!(writer, "{}", fixed)?;
            }
            None => {
                tracing::warn!(line = line_number, "skipping problematic line");
                report.dropped.push(line_number);
            }
        }
    }

    writer.flush()?;
    Ok(report)
}

/// Repair a record store on disk into a second file.
pub fn repair_file(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<RepairReport> {
    let input = input.as_ref();
    if !input.exists() {
        return Err(NormalizeError::FileNotFound(input.to_path_buf()));
    }

    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output.as_ref())?);
    let report = repair_lines(reader, writer)?;

    tracing::info!(
        kept = report.kept,
        repaired = report.repaired,
        dropped = report.dropped.len(),
        "repair complete"
    );

    Ok(report)
}

fn is_record(line: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(line).is_ok_and(|value| value.is_object())
}

fn escape_content_values(line: &str) -> String {
    let mut output = String::with_capacity(line.len() + 16);
    let mut cursor = 0;

    while let Some(key) = CONTENT_KEY_RE.find_at(line, cursor) {
        let value_start = key.end();
        output.push_str(&line[cursor..value_start]);

        let Some(value_end) = find_value_end(line, value_start) else {
            cursor = value_start;
            break;
        };

        output.push_str(&escape_raw(&line[value_start..value_end]));
        output.push('"');
        cursor = value_end + 1;
    }

    output.push_str(&line[cursor..]);
    output
}

/// Byte offset of the quote closing the value that starts at `start`.
fn find_value_end(line: &str, start: usize) -> Option<usize> {
    let mut escaped = false;

    for (offset, ch) in line[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }

        match ch {
            '\\' => escaped = true,
            '"' if VALUE_END_RE.is_match(&line[start + offset + 1..]) => return Some(start + offset),
            _ => {}
        }
    }

    None
}

fn escape_raw(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 8);
    let mut after_backslash = false;

    for ch in value.chars() {
        if after_backslash {
            escaped.push(ch);
            after_backslash = false;
            continue;
        }

        match ch {
            '\\' => {
                escaped.push(ch);
                after_backslash = true;
            }
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c.is_control() => escaped.push_str(&format!("\\u{:04x}", c as u32)),
            c => escaped.push(c),
        }
    }

    escaped
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
