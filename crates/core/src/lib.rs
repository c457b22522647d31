pub mod assemble;
pub mod batch;
pub mod commands;
pub mod config;
pub mod error;
pub mod fields;
pub mod record;
pub mod repair;
pub mod rules;
pub mod sections;
pub mod source;
pub mod strip;

pub use assemble::{Normalizer, assemble};
pub use batch::{BatchReport, DocumentFailure, WorkerPool, run_batch, run_pages, write_records};
pub use commands::{CommandExtractor, extract_commands};
pub use config::{NormalizeConfig, NormalizeConfigBuilder, Profile};
pub use error::{NormalizeError, Result};
pub use fields::{extract_title, extract_version, extract_version_with_profile};
pub use record::{DocumentRecord, JsonLine, MAIN_CONTENT_HEADING, PageRecord, Section, to_pretty_json};
pub use repair::{RepairReport, repair, repair_file, repair_lines};
pub use rules::{Directive, RuleLoader, RuleLoaderBuilder, RuleParser, RuleSet};
pub use sections::{Segmenter, segment};
pub use source::{
    CrawledPage, DocumentSource, FeedLine, FileSource, RawDocument, feed_lines, list_documents, read_feed, read_file,
    read_stdin,
};
pub use strip::{Scope, StripRule, Stripper, strip_boilerplate};
