use anyhow::{Result, bail};
use regex::Regex;

pub const DEFAULT_CALL: &str = "require";
pub const DEFAULT_EXTENSION: &str = ".js";

/// Finds `call('path<ext>')` references in source text.
///
/// The quote may be single, double or a backtick, and word characters may
/// sit between the opening parenthesis and the quote.
#[derive(Debug, Clone)]
pub struct ReferenceScanner {
    pattern: Regex,
}

impl ReferenceScanner {
    pub fn new(call: &str, extension: &str) -> Result<Self> {
        if !is_identifier(call) {
            bail!(
                "Invalid import call name '{}': use letters, digits and underscores only",
                call
            );
        }
        if extension.is_empty() {
            bail!("Reference extension must not be empty");
        }

        let source = format!(
            r#"\b{}\(\w*['"`]([^'"`]*{})['"`]\)"#,
            regex::escape(call),
            regex::escape(extension)
        );
        let pattern = Regex::new(&source)?;
        Ok(Self { pattern })
    }

    /// Referenced paths, in order of appearance.
    pub fn scan(&self, text: &str) -> Vec<String> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Call names must start at a `\b` word boundary, so only `\w` characters qualify.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
