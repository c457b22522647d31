use std::time::Duration;

use docnorm_core::{DocumentFailure, RepairReport};
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "docnorm".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "Normalize harvested documentation into JSON-lines records\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print a labelled value under the current step
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

/// Print batch results: counts, throughput and every failed unit
pub fn print_batch_summary(records: usize, failures: &[DocumentFailure], elapsed: Duration) {
    let total = records + failures.len();
    let ms = elapsed.as_secs_f64() * 1000.0;
    let per_doc = if total > 0 { ms / total as f64 } else { 0.0 };

    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Batch Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    print_detail("Records", &records.to_string());
    if failures.is_empty() {
        print_detail("Failures", "0");
    } else {
        eprintln!("  {} {}", "Failures:".dimmed(), failures.len().to_string().bright_red());
    }
    eprintln!("  {} {:>8.2}ms ({:.2}ms/doc)\n", "Elapsed:".dimmed(), ms, per_doc);

    for failure in failures {
        print_error(&format!("{}: {}", failure.id, failure.error));
    }
}

/// Print repair results with the number of every dropped line
pub fn print_repair_summary(report: &RepairReport) {
    print_detail("Kept", &report.kept.to_string());
    print_detail("Repaired", &report.repaired.to_string());

    if report.dropped.is_empty() {
        print_detail("Dropped", "0");
    } else {
        let lines = report.dropped.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        print_warning(&format!("Dropped {} line(s): {}", report.dropped.len(), lines));
    }
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
