//! Font feature extraction.
//!
//! Turns a text run into its text plus the distinct (font name, size) pairs
//! that compose it. Names go through a [`FontAliasTable`] first so that
//! emphasis-only variants (italic, oblique) of a family are not mistaken for
//! a different font by the classifier.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{FontDetail, TextRun};

/// Embedded font subsets are named `ABCDEF+BaseFont`.
fn subset_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{6}\+").expect("valid subset prefix pattern"))
}

/// Maps font-name variants onto a canonical family name.
///
/// Exact entries are consulted first, then pattern rules in insertion order.
/// Subset prefixes are stripped before either lookup.
#[derive(Debug, Clone)]
pub struct FontAliasTable {
    exact: HashMap<String, String>,
    rules: Vec<(Regex, String)>,
}

impl FontAliasTable {
    /// Create a table with no aliases.
    pub fn empty() -> Self {
        Self {
            exact: HashMap::new(),
            rules: Vec::new(),
        }
    }

    /// Add an exact alias.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.exact.insert(from.into(), to.into());
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.insert(from, to);
        self
    }

    /// Add a pattern rule. `replacement` may reference capture groups
    /// (`$1`, `${family}`).
    ///
    /// ```
    /// use pagestruct::pipeline::FontAliasTable;
    ///
    /// let table = FontAliasTable::empty()
    ///     .with_rule(r"^(?P<family>.+)-(Italic|Oblique)$", "${family}-Roman")
    ///     .unwrap();
    /// assert_eq!(table.resolve("Courier-Oblique"), "Courier-Roman");
    /// ```
    pub fn with_rule(mut self, pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| Error::Config(format!("invalid font alias pattern {:?}: {}", pattern, e)))?;
        self.rules.push((regex, replacement.into()));
        Ok(self)
    }

    /// Number of exact aliases and rules.
    pub fn len(&self) -> usize {
        self.exact.len() + self.rules.len()
    }

    /// Check if the table has no aliases.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Canonical name for `name`.
    pub fn resolve(&self, name: &str) -> String {
        let base = subset_prefix().replace(name, "");

        if let Some(target) = self.exact.get(&*base) {
            return target.clone();
        }

        for (regex, replacement) in &self.rules {
            if regex.is_match(&base) {
                return regex.replace(&base, replacement.as_str()).into_owned();
            }
        }

        base.into_owned()
    }
}

impl Default for FontAliasTable {
    fn default() -> Self {
        Self::empty().with("Times-Italic", "Times-Roman")
    }
}

/// Extracts text and distinct font details from text runs.
#[derive(Debug, Clone, Default)]
pub struct FontFeatureExtractor {
    aliases: FontAliasTable,
}

impl FontFeatureExtractor {
    /// Create an extractor with the given alias table.
    pub fn new(aliases: FontAliasTable) -> Self {
        Self { aliases }
    }

    /// Text of the run and its distinct font details in first-seen order.
    pub fn extract(&self, run: &TextRun) -> (String, Vec<FontDetail>) {
        let text = normalize_text(&run.text);
        let details = self.details(run);
        log::trace!("line formats {:?} for {:?}", details, text);
        (text, details)
    }

    /// Distinct font details of the run in first-seen order.
    pub fn details(&self, run: &TextRun) -> Vec<FontDetail> {
        let mut details: Vec<FontDetail> = Vec::new();

        for glyph in &run.glyphs {
            if !glyph.size.is_finite() {
                log::debug!(
                    "Skipping glyph {:?} with non-finite size in font {}",
                    glyph.text,
                    glyph.font_name
                );
                continue;
            }

            let detail = FontDetail::new(self.aliases.resolve(&glyph.font_name), glyph.size);
            if !details.contains(&detail) {
                details.push(detail);
            }
        }

        details
    }
}

/// NFC-normalize and trim surrounding whitespace (layout engines usually
/// end every run with a line break).
fn normalize_text(text: &str) -> String {
    text.nfc().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, Glyph};

    fn run(glyphs: Vec<Glyph>) -> TextRun {
        let text = glyphs.iter().map(|g| g.text.as_str()).collect::<String>() + "\n";
        TextRun {
            bbox: BoundingBox::default(),
            text,
            glyphs,
        }
    }

    #[test]
    fn test_default_alias_collapses_italic() {
        let table = FontAliasTable::default();
        assert_eq!(table.resolve("Times-Italic"), "Times-Roman");
        assert_eq!(table.resolve("Times-Bold"), "Times-Bold");
    }

    #[test]
    fn test_subset_prefix_stripped() {
        let table = FontAliasTable::default();
        assert_eq!(table.resolve("ABCDEF+Times-Italic"), "Times-Roman");
        assert_eq!(table.resolve("ABCDEF+Helvetica"), "Helvetica");
        // Not a subset tag
        assert_eq!(table.resolve("Abc+Helvetica"), "Abc+Helvetica");
    }

    #[test]
    fn test_exact_alias_wins_over_rule() {
        let table = FontAliasTable::empty()
            .with("Courier-Oblique", "Courier")
            .with_rule(r"^(.+)-Oblique$", "$1-Plain")
            .unwrap();
        assert_eq!(table.resolve("Courier-Oblique"), "Courier");
        assert_eq!(table.resolve("Helvetica-Oblique"), "Helvetica-Plain");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_invalid_rule_is_config_error() {
        let result = FontAliasTable::empty().with_rule("(unclosed", "x");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_extract_dedups_in_first_seen_order() {
        let extractor = FontFeatureExtractor::default();
        let run = run(vec![
            Glyph::new("W", "Times-Bold", 14.0),
            Glyph::new("a", "Times-Roman", 10.0),
            Glyph::new("r", "Times-Italic", 10.0),
            Glyph::new("n", "Times-Roman", 10.001),
            Glyph::new("!", "Times-Bold", 14.0),
        ]);

        let (text, details) = extractor.extract(&run);
        assert_eq!(text, "Warn!");
        assert_eq!(
            details,
            vec![
                FontDetail::new("Times-Bold", 14.0),
                FontDetail::new("Times-Roman", 10.0),
            ]
        );
    }

    #[test]
    fn test_extract_is_idempotent() {
        let extractor = FontFeatureExtractor::default();
        let run = run(vec![
            Glyph::new("a", "Helvetica", 9.5),
            Glyph::new("b", "Helvetica-Bold", 9.5),
            Glyph::new("c", "Helvetica", 11.25),
        ]);

        let first = extractor.extract(&run);
        let second = extractor.extract(&run);
        assert_eq!(first, second);
        assert_eq!(first.1.len(), 3);
    }

    #[test]
    fn test_run_without_glyphs() {
        let extractor = FontFeatureExtractor::default();
        let run = TextRun {
            bbox: BoundingBox::default(),
            text: "  orphan text \n".to_string(),
            glyphs: vec![],
        };
        let (text, details) = extractor.extract(&run);
        assert_eq!(text, "orphan text");
        assert!(details.is_empty());
    }

    #[test]
    fn test_non_finite_sizes_skipped() {
        let extractor = FontFeatureExtractor::default();
        let run = run(vec![
            Glyph::new("x", "Helvetica", f64::NAN),
            Glyph::new("y", "Helvetica", 10.0),
        ]);
        assert_eq!(extractor.details(&run), vec![FontDetail::new("Helvetica", 10.0)]);
    }
}
