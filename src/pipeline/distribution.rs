//! Distribution policy: median and IQR thresholds on font size.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Category, FontDetail};

/// Linear-interpolation percentile of sorted data.
///
/// `p` is in `[0, 100]`; the rank is `p / 100 * (n - 1)`.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Document-wide font size statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SizeStats {
    /// Number of font sizes observed
    pub count: usize,
    /// 25th percentile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// 75th percentile
    pub q3: f64,
    /// Interquartile range
    pub iqr: f64,
}

impl SizeStats {
    /// Compute statistics over a set of sizes. Non-finite sizes are ignored.
    pub fn from_sizes<I>(sizes: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted: Vec<f64> = sizes.into_iter().filter(|s| s.is_finite()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let q1 = percentile(&sorted, 25.0)?;
        let median = percentile(&sorted, 50.0)?;
        let q3 = percentile(&sorted, 75.0)?;

        Some(Self {
            count: sorted.len(),
            q1,
            median,
            q3,
            iqr: q3 - q1,
        })
    }
}

/// Line classifier backed by median/IQR thresholds.
#[derive(Debug, Clone)]
pub struct DistributionPolicy {
    heading_factor: f64,
    subheading_factor: f64,
    fitted: bool,
    stats: Option<SizeStats>,
}

impl DistributionPolicy {
    /// Create an unfitted policy with thresholds at
    /// `median + heading_factor * IQR` and `median + subheading_factor * IQR`.
    pub fn new(heading_factor: f64, subheading_factor: f64) -> Self {
        Self {
            heading_factor,
            subheading_factor,
            fitted: false,
            stats: None,
        }
    }

    /// Compute the size statistics over every font detail of the document.
    pub fn fit(&mut self, corpus: &[FontDetail]) {
        self.stats = SizeStats::from_sizes(corpus.iter().map(|d| d.size));
        self.fitted = true;

        match &self.stats {
            Some(stats) => log::info!(
                "Font size distribution over {} details: median {:.2}, IQR {:.2} (heading > {:.2}, subheading > {:.2})",
                stats.count,
                stats.median,
                stats.iqr,
                stats.median + self.heading_factor * stats.iqr,
                stats.median + self.subheading_factor * stats.iqr
            ),
            None => log::info!("No font sizes in document; every line is content"),
        }
    }

    /// The fitted statistics, if any sizes were observed.
    pub fn stats(&self) -> Option<&SizeStats> {
        self.stats.as_ref()
    }

    /// Category for a single font size.
    pub fn category_for_size(&self, size: f64) -> Result<Category> {
        if !self.fitted {
            return Err(Error::PolicyNotInitialized);
        }
        let Some(stats) = &self.stats else {
            return Ok(Category::Content);
        };

        let heading = stats.median + self.heading_factor * stats.iqr;
        let subheading = stats.median + self.subheading_factor * stats.iqr;

        Ok(if size > heading {
            Category::Heading
        } else if size > subheading {
            Category::Subheading
        } else {
            Category::Content
        })
    }

    /// Classify a line from the size of its first font detail.
    pub fn classify(&self, metadata: &[FontDetail]) -> Result<Category> {
        if !self.fitted {
            return Err(Error::PolicyNotInitialized);
        }
        match metadata.first() {
            Some(detail) => self.category_for_size(detail.size),
            None => Ok(Category::Content),
        }
    }
}
