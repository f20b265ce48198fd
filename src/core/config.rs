use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::core::builder::DEFAULT_MAX_DEPTH;
use crate::core::scanner::{DEFAULT_CALL, DEFAULT_EXTENSION, ReferenceScanner, is_identifier};

pub const CONFIG_FILE: &str = "depsort.toml";

/// Project configuration from depsort.toml
#[derive(Debug, Clone, Deserialize)]
pub struct DepsortConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default, rename = "unit")]
    pub units: Vec<UnitConfig>,
}

/// How references are found and followed
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_call")]
    pub call: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// One orderable unit, e.g. a test suite and the source file it exercises.
///
/// ```toml
/// [[unit]]
/// label = "pets"
/// entry = "test/pets.test.js"
/// source = "src/pets.js"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct UnitConfig {
    pub label: String,
    /// File whose dependency tree is built
    pub entry: PathBuf,
    /// Representative file; the entry itself when omitted
    pub source: Option<PathBuf>,
}

fn default_call() -> String {
    DEFAULT_CALL.to_string()
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            call: default_call(),
            extension: default_extension(),
            max_depth: default_max_depth(),
        }
    }
}

impl ScanConfig {
    /// Compile the reference pattern for this configuration.
    pub fn scanner(&self) -> Result<ReferenceScanner> {
        ReferenceScanner::new(&self.call, &self.extension)
    }
}

impl UnitConfig {
    pub fn representative(&self) -> &Path {
        self.source.as_deref().unwrap_or(&self.entry)
    }
}

impl DepsortConfig {
    /// Load and validate configuration from a depsort.toml file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: DepsortConfig =
            toml::from_str(content).context("Failed to parse depsort.toml")?;

        config.validate()?;
        Ok(config)
    }

    /// Nearest depsort.toml at or above `start_dir`.
    pub fn locate(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Find and load depsort.toml by walking up from the given directory.
    /// Returns the config and the directory holding it.
    pub fn find_and_load(start_dir: &Path) -> Result<(Self, PathBuf)> {
        let Some(config_path) = Self::locate(start_dir) else {
            bail!(
                "{} not found in {} or any parent directory",
                CONFIG_FILE,
                start_dir.display()
            );
        };

        let config = Self::from_file(&config_path)?;
        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| start_dir.to_path_buf());
        Ok((config, root))
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if !is_identifier(&self.scan.call) {
            bail!(
                "Invalid scan.call '{}' in depsort.toml. Must be a plain identifier",
                self.scan.call
            );
        }

        if self.scan.extension.is_empty() {
            bail!("Invalid scan.extension in depsort.toml. Must not be empty");
        }

        if self.units.is_empty() {
            bail!("No units declared in depsort.toml. Add at least one [[unit]] table");
        }

        let mut seen = HashSet::new();
        for unit in &self.units {
            if unit.label.trim().is_empty() {
                bail!("Unit with entry {} has an empty label", unit.entry.display());
            }
            if !seen.insert(unit.label.as_str()) {
                bail!("Duplicate unit label '{}' in depsort.toml", unit.label);
            }
        }

        Ok(())
    }
}
