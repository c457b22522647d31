use crate::error::Result;
use crate::rules::directives::RuleSet;
use crate::rules::parser::RuleParser;
use std::path::{Path, PathBuf};

/// File name looked up in each rules directory
pub const RULES_FILE_NAME: &str = "rules.txt";

/// Discovers and merges rules files
#[derive(Debug, Clone)]
pub struct RuleLoader {
    /// User rules directory (highest priority)
    custom_dir: Option<PathBuf>,
    /// Project rules directory
    standard_dir: Option<PathBuf>,
}

impl RuleLoader {
    /// Create a loader with no directories
    pub fn new() -> Self {
        Self { custom_dir: None, standard_dir: None }
    }

    /// Load and merge `rules.txt` from the standard and custom directories.
    ///
    /// Files that fail to parse are skipped with a warning; a missing file is
    /// not an error.
    pub fn load(&self) -> RuleSet {
        let mut merged = RuleSet::new();

        for file_path in self.find_rules_files().iter().rev() {
            match RuleParser::parse_file(file_path) {
                Ok(rules) => {
                    tracing::debug!(path = %file_path.display(), "loaded rules file");
                    merged.merge(&rules);
                }
                Err(e) => tracing::warn!("Failed to parse rules file {}: {}", file_path.display(), e),
            }
        }

        merged
    }

    /// Load discovered rules, then merge an explicit file on top.
    ///
    /// Unlike discovered files, an explicit file that fails to parse is an error.
    pub fn load_with_file<P: AsRef<Path>>(&self, path: P) -> Result<RuleSet> {
        let mut merged = self.load();
        let explicit = RuleParser::parse_file(path)?;
        merged.merge(&explicit);
        Ok(merged)
    }

    /// Rules files in priority order, custom first
    fn find_rules_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for dir in [&self.custom_dir, &self.standard_dir].into_iter().flatten() {
            let file_path = dir.join(RULES_FILE_NAME);
            if file_path.exists() && !files.contains(&file_path) {
                files.push(file_path);
            }
        }

        files
    }

    /// Default user rules directory (`$XDG_CONFIG_HOME/docnorm` or platform equivalent)
    fn default_custom_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docnorm"))
    }

    /// Default project rules directory (`./rules` when present)
    fn default_standard_dir() -> Option<PathBuf> {
        let std_dir = PathBuf::from("rules");
        if std_dir.exists() { Some(std_dir) } else { None }
    }
}

impl Default for RuleLoader {
    fn default() -> Self {
        let mut builder = RuleLoaderBuilder::new();

        if let Some(custom_dir) = Self::default_custom_dir() {
            builder = builder.custom_dir(custom_dir);
        }

        if let Some(standard_dir) = Self::default_standard_dir() {
            builder = builder.standard_dir(standard_dir);
        }

        builder.build()
    }
}

/// Builder for RuleLoader
#[derive(Debug)]
pub struct RuleLoaderBuilder {
    custom_dir: Option<PathBuf>,
    standard_dir: Option<PathBuf>,
}

impl RuleLoaderBuilder {
    pub fn new() -> Self {
        Self { custom_dir: None, standard_dir: None }
    }

    /// Set user rules directory
    pub fn custom_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.custom_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set project rules directory
    pub fn standard_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.standard_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn build(self) -> RuleLoader {
        RuleLoader { custom_dir: self.custom_dir, standard_dir: self.standard_dir }
    }
}

impl Default for RuleLoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_rule_loader_builder() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().join("custom");
        let standard_path = temp_dir.path().join("standard");

        let loader = RuleLoaderBuilder::new()
            .custom_dir(&custom_path)
            .standard_dir(&standard_path)
            .build();

        assert_eq!(loader.custom_dir, Some(custom_path));
        assert_eq!(loader.standard_dir, Some(standard_path));
    }

    #[test]
    fn test_load_missing_dirs_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let loader = RuleLoaderBuilder::new().custom_dir(temp_dir.path().join("absent")).build();
        assert!(loader.load().is_empty());
    }

    #[test]
    fn test_load_merge_priority() {
        let temp_dir = TempDir::new().unwrap();

        let custom_path = temp_dir.path().join("custom");
        fs::create_dir_all(&custom_path).unwrap();
        fs::write(custom_path.join(RULES_FILE_NAME), "tool: podman\nprofile: crawl\n").unwrap();

        let standard_path = temp_dir.path().join("standard");
        fs::create_dir_all(&standard_path).unwrap();
        fs::write(standard_path.join(RULES_FILE_NAME), "tool: helm\nprofile: plaintext\n").unwrap();

        let loader = RuleLoaderBuilder::new()
            .custom_dir(&custom_path)
            .standard_dir(&standard_path)
            .build();

        let rules = loader.load();

        assert_eq!(rules.tools, vec!["helm", "podman"]);
        assert_eq!(rules.profile, Some(Profile::Crawl));
    }

    #[test]
    fn test_load_skips_broken_discovered_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(RULES_FILE_NAME), "selector: nav\n").unwrap();

        let loader = RuleLoaderBuilder::new().custom_dir(temp_dir.path()).build();
        assert!(loader.load().is_empty());
    }

    #[test]
    fn test_load_with_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let explicit = temp_dir.path().join("vendor.txt");
        fs::write(&explicit, "strip: Cookie preferences\n").unwrap();

        let loader = RuleLoader::new();
        let rules = loader.load_with_file(&explicit).unwrap();
        assert_eq!(rules.strip, vec!["Cookie preferences"]);

        fs::write(&explicit, "selector: nav\n").unwrap();
        assert!(loader.load_with_file(&explicit).is_err());
    }
}
