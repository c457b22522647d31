//! User rules files.
//!
//! A rules file extends the built-in boilerplate, heading and tool tables
//! without recompiling. The format is one `key: value` directive per line;
//! blank lines and lines starting with `#` are ignored.
//!
//! ```text
//! # vendor portal chrome
//! profile: crawl
//! strip: Was this page helpful
//! strip_line: ^Feedback\b.*$
//! heading: ^Step \d+:
//! tool: podman
//! ```

pub mod directives;
pub mod loader;
pub mod parser;

pub use directives::{Directive, RuleSet};
pub use loader::{RuleLoader, RuleLoaderBuilder};
pub use parser::RuleParser;
