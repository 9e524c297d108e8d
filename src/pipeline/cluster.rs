//! Cluster policy: unsupervised three-way grouping of font details.
//!
//! Every font detail of the document becomes a 2-D point
//! `(encoded font name, size)`. A k-means fit with k = 3 partitions the
//! points and the clusters are ranked by population: the rarest style is
//! taken to be headings and the most frequent one body content.

use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{Category, FontDetail};

/// Number of clusters fitted over the document's font details.
pub const CLUSTER_COUNT: usize = 3;

/// Point count above which the assignment step runs on the rayon pool.
const PARALLEL_THRESHOLD: usize = 4096;

/// A point in (encoded font name, size) space.
pub type Point = [f64; 2];

/// Stable integer encoding of font names for one run.
///
/// Distinct names are numbered in lexicographic order, so the encoding does
/// not depend on the order in which pages were scanned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontNameEncoder {
    codes: HashMap<String, usize>,
}

impl FontNameEncoder {
    /// Fit the encoder over a set of names.
    pub fn fit<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let distinct: BTreeSet<&str> = names.into_iter().collect();
        let codes = distinct
            .into_iter()
            .enumerate()
            .map(|(code, name)| (name.to_string(), code))
            .collect();
        Self { codes }
    }

    /// Code for `name`. Names not seen during the fit map to the first
    /// unused code.
    pub fn encode(&self, name: &str) -> usize {
        self.codes.get(name).copied().unwrap_or(self.codes.len())
    }

    /// Number of distinct names known to the encoder.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Check if the encoder knows no names.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Result of a k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster centers
    pub centroids: Vec<Point>,
    /// Cluster index of every input point
    pub labels: Vec<usize>,
    /// Lloyd iterations performed
    pub iterations: usize,
}

impl KMeansFit {
    /// Number of points assigned to each cluster.
    pub fn populations(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.centroids.len()];
        for &label in &self.labels {
            counts[label] += 1;
        }
        counts
    }
}

fn squared_distance(a: &Point, b: &Point) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Index of the centroid nearest to `point`; ties go to the lower index.
fn nearest(point: &Point, centroids: &[Point]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(point, centroid);
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}

fn assign(points: &[Point], centroids: &[Point], parallel: bool) -> Vec<usize> {
    if parallel && points.len() >= PARALLEL_THRESHOLD {
        points.par_iter().map(|p| nearest(p, centroids)).collect()
    } else {
        points.iter().map(|p| nearest(p, centroids)).collect()
    }
}

/// Farthest-first seeding: start from the first point, then repeatedly add
/// the point farthest from every chosen seed.
///
/// Deterministic, and never picks the same location twice while distinct
/// points remain.
fn initialize_centroids(points: &[Point], k: usize) -> Vec<Point> {
    let mut centroids: Vec<Point> = Vec::with_capacity(k);
    centroids.push(points[0]);

    while centroids.len() < k {
        let mut best: Option<(usize, f64)> = None;
        for (i, point) in points.iter().enumerate() {
            let distance = centroids
                .iter()
                .map(|c| squared_distance(point, c))
                .fold(f64::INFINITY, f64::min);
            if distance > best.map(|(_, d)| d).unwrap_or(0.0) {
                best = Some((i, distance));
            }
        }
        match best {
            Some((i, _)) => centroids.push(points[i]),
            None => break,
        }
    }

    centroids
}

/// Fit k-means over `points`.
///
/// `k` is reduced to the number of distinct points when there are fewer.
/// Returns an empty fit for empty input.
pub fn kmeans(points: &[Point], k: usize, max_iterations: usize, parallel: bool) -> KMeansFit {
    if points.is_empty() || k == 0 {
        return KMeansFit {
            centroids: Vec::new(),
            labels: Vec::new(),
            iterations: 0,
        };
    }

    let mut centroids = initialize_centroids(points, k);
    let mut labels = vec![usize::MAX; points.len()];
    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..max_iterations {
        iterations += 1;

        let assignments = assign(points, &centroids, parallel);
        let changed = assignments != labels;
        labels = assignments;
        if !changed {
            converged = true;
            break;
        }

        let mut sums = vec![[0.0f64; 2]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];
        for (point, &label) in points.iter().zip(labels.iter()) {
            sums[label][0] += point[0];
            sums[label][1] += point[1];
            counts[label] += 1;
        }
        for ((centroid, sum), &count) in centroids.iter_mut().zip(sums.iter()).zip(counts.iter()) {
            // Empty clusters keep their previous center
            if count > 0 {
                *centroid = [sum[0] / count as f64, sum[1] / count as f64];
            }
        }
    }

    // Labels must match the final centroids
    if !converged {
        labels = assign(points, &centroids, parallel);
    }

    KMeansFit {
        centroids,
        labels,
        iterations,
    }
}

/// Assign categories to clusters by population.
///
/// The most populous cluster is content, the next subheading, the next
/// heading. Among equally populous clusters the one with the larger font
/// size ranks as rarer.
fn rank_clusters(populations: &[usize], centroids: &[Point]) -> Vec<Category> {
    let mut order: Vec<usize> = (0..populations.len()).collect();
    order.sort_by(|&a, &b| {
        populations[a].cmp(&populations[b]).then_with(|| {
            centroids[b][1]
                .partial_cmp(&centroids[a][1])
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });

    let mut categories = vec![Category::Content; populations.len()];
    let by_rank = [Category::Content, Category::Subheading, Category::Heading];
    for (rank, &cluster) in order.iter().rev().enumerate() {
        categories[cluster] = by_rank.get(rank).copied().unwrap_or(Category::Heading);
    }
    categories
}

/// A fitted cluster model.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterModel {
    /// Font name encoding used for the fit
    pub encoder: FontNameEncoder,
    /// Cluster centers
    pub centroids: Vec<Point>,
    /// Category of each cluster
    pub categories: Vec<Category>,
    /// Points per cluster
    pub populations: Vec<usize>,
}

impl ClusterModel {
    /// Category of the cluster nearest to `point`, or content when the
    /// model has no clusters.
    pub fn predict(&self, point: &Point) -> Category {
        if self.centroids.is_empty() {
            return Category::Content;
        }
        self.categories[nearest(point, &self.centroids)]
    }
}

/// Line classifier backed by a three-way k-means fit.
#[derive(Debug, Clone)]
pub struct ClusterPolicy {
    max_iterations: usize,
    parallel: bool,
    model: Option<ClusterModel>,
}

impl ClusterPolicy {
    /// Create an unfitted policy.
    pub fn new(max_iterations: usize, parallel: bool) -> Self {
        Self {
            max_iterations,
            parallel,
            model: None,
        }
    }

    /// Fit the clusters over every font detail of the document.
    pub fn fit(&mut self, corpus: &[FontDetail]) {
        let encoder = FontNameEncoder::fit(corpus.iter().map(|d| d.name.as_str()));
        let points: Vec<Point> = corpus
            .iter()
            .map(|d| [encoder.encode(&d.name) as f64, d.size])
            .collect();

        let fit = kmeans(&points, CLUSTER_COUNT, self.max_iterations, self.parallel);
        let populations = fit.populations();
        let categories = rank_clusters(&populations, &fit.centroids);

        log::info!(
            "Fitted {} font clusters over {} points in {} iterations",
            fit.centroids.len(),
            points.len(),
            fit.iterations
        );
        for ((centroid, category), population) in
            fit.centroids.iter().zip(&categories).zip(&populations)
        {
            log::info!(
                "  cluster center (font {:.2}, size {:.2}) -> {} ({} points)",
                centroid[0],
                centroid[1],
                category,
                population
            );
        }

        self.model = Some(ClusterModel {
            encoder,
            centroids: fit.centroids,
            categories,
            populations,
        });
    }

    /// The fitted model, if any.
    pub fn model(&self) -> Option<&ClusterModel> {
        self.model.as_ref()
    }

    /// Classify a line from its font details.
    pub fn classify(&self, metadata: &[FontDetail]) -> Result<Category> {
        let model = self.model.as_ref().ok_or(Error::PolicyNotInitialized)?;
        if metadata.is_empty() {
            return Ok(Category::Content);
        }

        let n = metadata.len() as f64;
        let name = metadata
            .iter()
            .map(|d| model.encoder.encode(&d.name) as f64)
            .sum::<f64>()
            / n;
        let size = metadata.iter().map(|d| d.size).sum::<f64>() / n;

        Ok(model.predict(&[name, size]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(groups: &[(&str, f64, usize)]) -> Vec<FontDetail> {
        groups
            .iter()
            .flat_map(|&(name, size, count)| {
                std::iter::repeat_with(move || FontDetail::new(name, size)).take(count)
            })
            .collect()
    }

    #[test]
    fn test_encoder_is_lexicographic() {
        let encoder = FontNameEncoder::fit(["Times-Roman", "Arial", "Times-Bold", "Arial"]);
        assert_eq!(encoder.len(), 3);
        assert_eq!(encoder.encode("Arial"), 0);
        assert_eq!(encoder.encode("Times-Bold"), 1);
        assert_eq!(encoder.encode("Times-Roman"), 2);
        assert_eq!(encoder.encode("Courier"), 3);
    }

    #[test]
    fn test_kmeans_separates_groups() {
        let mut points = vec![[0.0, 10.0]; 50];
        points.extend(vec![[0.0, 14.0]; 10]);
        points.extend(vec![[0.0, 24.0]; 2]);

        let fit = kmeans(&points, 3, 100, false);
        let mut populations = fit.populations();
        populations.sort_unstable();
        assert_eq!(populations, vec![2, 10, 50]);
    }

    #[test]
    fn test_kmeans_fewer_distinct_points_than_k() {
        let points = vec![[1.0, 10.0]; 20];
        let fit = kmeans(&points, 3, 100, false);
        assert_eq!(fit.centroids.len(), 1);
        assert_eq!(fit.populations(), vec![20]);
    }

    #[test]
    fn test_kmeans_labels_match_final_centroids() {
        let points: Vec<Point> = [12.0, 6.0, 3.0, 15.0, 0.0]
            .iter()
            .map(|&size| [0.0, size])
            .collect();
        let fit = kmeans(&points, 2, 1, false);
        assert_eq!(fit.iterations, 1);
        assert_eq!(fit.centroids, vec![[0.0, 11.0], [0.0, 1.5]]);
        assert_eq!(fit.labels, vec![0, 1, 1, 0, 1]);
        assert_eq!(fit.populations(), vec![2, 3]);
    }

    #[test]
    fn test_kmeans_parallel_matches_sequential() {
        let points: Vec<Point> = (0..5000)
            .map(|i| [(i % 3) as f64, 8.0 + (i % 7) as f64])
            .collect();
        assert_eq!(kmeans(&points, 3, 50, true), kmeans(&points, 3, 50, false));
    }

    #[test]
    fn test_rank_clusters() {
        let centroids = [[0.0, 10.0], [0.0, 24.0], [0.0, 14.0]];
        assert_eq!(
            rank_clusters(&[40, 3, 12], &centroids),
            vec![Category::Content, Category::Heading, Category::Subheading]
        );
        assert_eq!(
            rank_clusters(&[7, 30], &centroids[..2]),
            vec![Category::Subheading, Category::Content]
        );
        assert_eq!(rank_clusters(&[9], &centroids[..1]), vec![Category::Content]);
    }

    #[test]
    fn test_rank_ties_favor_larger_size() {
        let centroids = [[1.0, 10.0], [0.0, 18.0]];
        assert_eq!(
            rank_clusters(&[1, 1], &centroids),
            vec![Category::Content, Category::Subheading]
        );
    }

    #[test]
    fn test_rare_size_classifies_as_heading() {
        let mut policy = ClusterPolicy::new(300, false);
        policy.fit(&corpus(&[
            ("Times-Roman", 10.0, 120),
            ("Times-Roman", 14.0, 30),
            ("Times-Roman", 24.0, 4),
        ]));

        let heading = [FontDetail::new("Times-Roman", 24.0)];
        let subheading = [FontDetail::new("Times-Roman", 14.0)];
        let body = [FontDetail::new("Times-Roman", 10.0)];
        assert_eq!(policy.classify(&heading).unwrap(), Category::Heading);
        assert_eq!(policy.classify(&subheading).unwrap(), Category::Subheading);
        assert_eq!(policy.classify(&body).unwrap(), Category::Content);
    }

    #[test]
    fn test_classify_averages_details() {
        let mut policy = ClusterPolicy::new(300, false);
        policy.fit(&corpus(&[
            ("Times-Roman", 10.0, 120),
            ("Times-Roman", 14.0, 30),
            ("Times-Roman", 24.0, 4),
        ]));

        // Mean size 23.0 is nearest the heading cluster
        let mixed = [
            FontDetail::new("Times-Roman", 24.0),
            FontDetail::new("Times-Roman", 22.0),
        ];
        assert_eq!(policy.classify(&mixed).unwrap(), Category::Heading);
    }

    #[test]
    fn test_unfitted_policy_errors() {
        let policy = ClusterPolicy::new(300, false);
        let result = policy.classify(&[FontDetail::new("Times-Roman", 10.0)]);
        assert!(matches!(result, Err(Error::PolicyNotInitialized)));
    }

    #[test]
    fn test_empty_metadata_and_empty_corpus_are_content() {
        let mut policy = ClusterPolicy::new(300, false);
        policy.fit(&[]);
        assert_eq!(policy.classify(&[]).unwrap(), Category::Content);
        assert_eq!(
            policy.classify(&[FontDetail::new("Times-Roman", 30.0)]).unwrap(),
            Category::Content
        );
    }
}
