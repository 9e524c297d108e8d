//! Structuring options and configuration.

use crate::error::{Error, Result};
use crate::model::DocumentInfo;

use super::fonts::FontAliasTable;

/// Options for structuring a document.
#[derive(Debug, Clone)]
pub struct StructureOptions {
    /// Line classification strategy
    pub policy: PolicyKind,

    /// Font-name aliases applied before font details are compared
    pub aliases: FontAliasTable,

    /// Maximum Lloyd iterations for the cluster policy
    pub cluster_max_iterations: usize,

    /// IQR multiple above the median beyond which a line is a heading
    pub heading_iqr_factor: f64,

    /// IQR multiple above the median beyond which a line is a subheading
    pub subheading_iqr_factor: f64,

    /// Slack (points) when matching a vector shape against a table box
    pub table_tolerance: f64,

    /// Whether to rasterize and recognize figures
    pub ocr: bool,

    /// Whether to use parallel processing in the cluster fit
    pub parallel: bool,

    /// Identity fields copied into every record
    pub document: DocumentInfo,

    /// Traceability source label
    pub source_label: String,

    /// Traceability manual reference
    pub manual_reference: String,
}

impl StructureOptions {
    /// Create new structure options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the classification policy.
    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    /// Use the cluster policy.
    pub fn clustered(mut self) -> Self {
        self.policy = PolicyKind::Cluster;
        self
    }

    /// Use the distribution policy.
    pub fn distribution(mut self) -> Self {
        self.policy = PolicyKind::Distribution;
        self
    }

    /// Replace the font alias table.
    pub fn with_aliases(mut self, aliases: FontAliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    /// Add one exact font alias.
    pub fn with_alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.aliases.insert(from, to);
        self
    }

    /// Set the cluster iteration limit.
    pub fn with_cluster_iterations(mut self, iterations: usize) -> Self {
        self.cluster_max_iterations = iterations;
        self
    }

    /// Set the distribution thresholds as IQR multiples above the median.
    pub fn with_iqr_factors(mut self, heading: f64, subheading: f64) -> Self {
        self.heading_iqr_factor = heading;
        self.subheading_iqr_factor = subheading;
        self
    }

    /// Set the table matching tolerance in points.
    pub fn with_table_tolerance(mut self, tolerance: f64) -> Self {
        self.table_tolerance = tolerance;
        self
    }

    /// Enable or disable figure OCR.
    pub fn with_ocr(mut self, ocr: bool) -> Self {
        self.ocr = ocr;
        self
    }

    /// Skip figure OCR; figures still occupy their slot with empty text.
    pub fn without_ocr(mut self) -> Self {
        self.ocr = false;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the document identity fields.
    pub fn with_document(mut self, document: DocumentInfo) -> Self {
        self.document = document;
        self
    }

    /// Set the traceability source label.
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = label.into();
        self
    }

    /// Set the traceability manual reference.
    pub fn with_manual_reference(mut self, reference: impl Into<String>) -> Self {
        self.manual_reference = reference.into();
        self
    }

    /// Check option values for consistency.
    pub fn validate(&self) -> Result<()> {
        if self.cluster_max_iterations == 0 {
            return Err(Error::Config(
                "cluster iteration limit must be at least 1".to_string(),
            ));
        }
        if !(self.heading_iqr_factor.is_finite() && self.subheading_iqr_factor.is_finite()) {
            return Err(Error::Config("IQR factors must be finite".to_string()));
        }
        if self.subheading_iqr_factor > self.heading_iqr_factor {
            return Err(Error::Config(format!(
                "subheading IQR factor ({}) exceeds heading IQR factor ({})",
                self.subheading_iqr_factor, self.heading_iqr_factor
            )));
        }
        if self.table_tolerance < 0.0 || !self.table_tolerance.is_finite() {
            return Err(Error::Config(
                "table tolerance must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StructureOptions {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Distribution,
            aliases: FontAliasTable::default(),
            cluster_max_iterations: 300,
            heading_iqr_factor: 1.0,
            subheading_iqr_factor: 0.25,
            table_tolerance: 1.0,
            ocr: true,
            parallel: true,
            document: DocumentInfo::default(),
            source_label: String::new(),
            manual_reference: String::new(),
        }
    }
}

/// Line classification strategy, fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
    /// Three-way k-means over (encoded font name, size)
    Cluster,
    /// Median + IQR thresholds on font size
    #[default]
    Distribution,
}

impl std::str::FromStr for PolicyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cluster" | "kmeans" => Ok(PolicyKind::Cluster),
            "distribution" | "dist" | "iqr" => Ok(PolicyKind::Distribution),
            other => Err(Error::Config(format!("unknown policy: {}", other))),
        }
    }
}
