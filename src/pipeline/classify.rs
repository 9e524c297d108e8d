//! Line classification.
//!
//! Both policies need a document-wide view of the font details before any
//! line can be classified, so classification is split into a fit step
//! (run once over the [`FontCorpus`]) and a read-only `classify` step.

use crate::error::Result;
use crate::model::{Category, FontDetail, PageLayout};

use super::cluster::ClusterPolicy;
use super::distribution::DistributionPolicy;
use super::fonts::FontFeatureExtractor;
use super::options::{PolicyKind, StructureOptions};

/// Maps a line's font details to a category.
pub trait Classifier {
    /// Classify one line.
    ///
    /// Returns [`Error::PolicyNotInitialized`](crate::Error::PolicyNotInitialized)
    /// if the document-wide fit has not run.
    fn classify(&self, metadata: &[FontDetail]) -> Result<Category>;
}

/// Every font detail of a document, gathered in page order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontCorpus {
    details: Vec<FontDetail>,
}

impl FontCorpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the font details of every text run on `page`.
    pub fn add_page(&mut self, page: &PageLayout, extractor: &FontFeatureExtractor) {
        for run in page.text_runs() {
            self.details.extend(extractor.details(run));
        }
    }

    /// Gather the corpus of a set of pages.
    pub fn from_pages<'a, I>(pages: I, extractor: &FontFeatureExtractor) -> Self
    where
        I: IntoIterator<Item = &'a PageLayout>,
    {
        let mut corpus = Self::new();
        for page in pages {
            corpus.add_page(page, extractor);
        }
        corpus
    }

    /// All details.
    pub fn details(&self) -> &[FontDetail] {
        &self.details
    }

    /// Number of details.
    pub fn len(&self) -> usize {
        self.details.len()
    }

    /// Check if the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }
}

/// The classification policy selected for a run.
#[derive(Debug, Clone)]
pub enum Policy {
    /// Three-way k-means over (encoded font name, size)
    Cluster(ClusterPolicy),
    /// Median/IQR thresholds on the first font size of a line
    Distribution(DistributionPolicy),
}

impl Policy {
    /// Create an unfitted policy from the options.
    pub fn from_options(options: &StructureOptions) -> Self {
        match options.policy {
            PolicyKind::Cluster => Policy::Cluster(ClusterPolicy::new(
                options.cluster_max_iterations,
                options.parallel,
            )),
            PolicyKind::Distribution => Policy::Distribution(DistributionPolicy::new(
                options.heading_iqr_factor,
                options.subheading_iqr_factor,
            )),
        }
    }

    /// Create and fit a policy in one step.
    pub fn fitted(options: &StructureOptions, corpus: &FontCorpus) -> Self {
        let mut policy = Self::from_options(options);
        policy.fit(corpus);
        policy
    }

    /// Run the document-wide fit.
    pub fn fit(&mut self, corpus: &FontCorpus) {
        log::debug!("Fitting {} policy over {} font details", self.kind_name(), corpus.len());
        match self {
            Policy::Cluster(policy) => policy.fit(corpus.details()),
            Policy::Distribution(policy) => policy.fit(corpus.details()),
        }
    }

    /// Which policy this is.
    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::Cluster(_) => PolicyKind::Cluster,
            Policy::Distribution(_) => PolicyKind::Distribution,
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Policy::Cluster(_) => "cluster",
            Policy::Distribution(_) => "distribution",
        }
    }
}

impl Classifier for Policy {
    fn classify(&self, metadata: &[FontDetail]) -> Result<Category> {
        match self {
            Policy::Cluster(policy) => policy.classify(metadata),
            Policy::Distribution(policy) => policy.classify(metadata),
        }
    }
}

impl Classifier for ClusterPolicy {
    fn classify(&self, metadata: &[FontDetail]) -> Result<Category> {
        ClusterPolicy::classify(self, metadata)
    }
}

impl Classifier for DistributionPolicy {
    fn classify(&self, metadata: &[FontDetail]) -> Result<Category> {
        DistributionPolicy::classify(self, metadata)
    }
}
