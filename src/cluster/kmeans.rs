//! K-means with random restarts.
//!
//! # The Algorithm (Lloyd, 1957/1982)
//!
//! Each restart picks `k` distinct data points as initial centers, then repeats:
//!
//! 1. Assign every point to its nearest center (squared Euclidean distance,
//!    ties to the lowest cluster index).
//! 2. Refill any cluster left without members.
//! 3. Move every center to the mean of its members.
//!
//! until no assignment changes or `max_iter` passes have been made.
//!
//! Lloyd iterations only reach a local minimum of the inertia
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! so the whole procedure is repeated from `restarts` random initializations and
//! the partition with the smallest inertia is kept.
//!
//! ## Empty clusters
//!
//! A cluster can lose all of its members, most often when two initial centers
//! coincide. Its center is then moved to a random data point taken from a
//! cluster with more than one member and not sitting on any existing center,
//! and points are reassigned. After `max_reseeds` unsuccessful rounds, or when
//! no such point exists (fewer than `k` distinct points), the restart fails
//! with [`Error::ConvergenceFailure`].
//!
//! ## Reproducibility
//!
//! A master RNG seeded from [`Kmeans::with_seed`] draws one seed per restart, in
//! restart order, and each restart owns an RNG built from its seed. A restart's
//! result therefore depends only on the data and its index.

use rand::prelude::*;
use rand::seq::index;

use super::traits::Clustering;
use super::util;
use crate::error::{Error, Result};

/// Restarts used unless overridden.
pub const DEFAULT_RESTARTS: usize = 50;
/// Lloyd passes per restart unless overridden.
pub const DEFAULT_MAX_ITER: usize = 100;
/// Reseeding rounds allowed per empty-cluster event unless overridden.
pub const DEFAULT_MAX_RESEEDS: usize = 10;

/// K-means clustering with random restarts.
#[derive(Debug, Clone)]
pub struct Kmeans {
    k: usize,
    restarts: usize,
    max_iter: usize,
    max_reseeds: usize,
    seed: Option<u64>,
}

/// Result of one k-means restart.
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansFit {
    /// Cluster index (`0..k`) of each point.
    pub labels: Vec<usize>,
    /// Cluster centers, one per cluster.
    pub centers: Vec<Vec<f64>>,
    /// Sum of squared distances from each point to its center.
    pub inertia: f64,
    /// Lloyd passes performed.
    pub iterations: usize,
    /// Whether assignments stopped changing before `max_iter`.
    pub converged: bool,
    /// Index of the restart that produced this fit.
    pub restart: usize,
}

impl KmeansFit {
    /// Number of clusters.
    pub fn k(&self) -> usize {
        self.centers.len()
    }

    /// Cluster labels numbered `1..=k`, one per point.
    pub fn assignments(&self) -> Vec<usize> {
        self.labels.iter().map(|&l| l + 1).collect()
    }

    /// Number of points in each cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        cluster_sizes(&self.labels, self.k())
    }
}

impl Kmeans {
    /// Create a k-means clusterer for `k` clusters.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            restarts: DEFAULT_RESTARTS,
            max_iter: DEFAULT_MAX_ITER,
            max_reseeds: DEFAULT_MAX_RESEEDS,
            seed: None,
        }
    }

    /// Set the number of random restarts.
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Set the maximum number of Lloyd passes per restart.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set how many reseeding rounds an empty cluster may take.
    pub fn with_max_reseeds(mut self, max_reseeds: usize) -> Self {
        self.max_reseeds = max_reseeds;
        self
    }

    /// Seed the restart RNG. Without a seed, OS entropy is used.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Run all restarts and keep the one with the lowest inertia.
    pub fn fit(&self, data: &[Vec<f64>]) -> Result<KmeansFit> {
        let best = select_best(self.restarts(data)?)?;
        log::debug!(
            "k-means k={}: best restart {} of {} with inertia {:.6}",
            self.k,
            best.restart,
            self.restarts,
            best.inertia
        );
        Ok(best)
    }

    /// Lazily evaluated restarts, in restart order.
    ///
    /// Input is validated here, before any restart runs.
    pub fn restarts<'a>(&'a self, data: &'a [Vec<f64>]) -> Result<Restarts<'a>> {
        self.validate(data)?;
        let master = match self.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Ok(Restarts {
            kmeans: self,
            data,
            master,
            next: 0,
        })
    }

    fn validate(&self, data: &[Vec<f64>]) -> Result<()> {
        util::validate_points(data)?;
        if self.k == 0 || self.k > data.len() {
            return Err(Error::InvalidClusterCount {
                requested: self.k,
                n_items: data.len(),
            });
        }
        if self.restarts == 0 {
            return Err(Error::InvalidParameter {
                name: "restarts",
                message: "must be at least 1",
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        Ok(())
    }

    fn run_once(&self, data: &[Vec<f64>], seed: u64, restart: usize) -> Result<KmeansFit> {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = data.len();

        let mut centers: Vec<Vec<f64>> = index::sample(&mut rng, n, self.k)
            .into_iter()
            .map(|i| data[i].clone())
            .collect();
        let mut labels = vec![usize::MAX; n];

        let mut iterations = 0;
        let mut converged = false;
        while iterations < self.max_iter {
            iterations += 1;
            let mut changed = assign(data, &centers, &mut labels)?;
            changed |= self.refill_empty(data, &mut centers, &mut labels, &mut rng)?;
            update_centers(data, &labels, &mut centers);
            if !changed {
                converged = true;
                break;
            }
        }

        let inertia = inertia(data, &centers, &labels)?;
        log::trace!(
            "restart {}: {} iterations, converged={}, inertia {:.6}",
            restart,
            iterations,
            converged,
            inertia
        );

        Ok(KmeansFit {
            labels,
            centers,
            inertia,
            iterations,
            converged,
            restart,
        })
    }

    /// Move the centers of empty clusters onto donor points until every cluster
    /// has a member. Returns whether anything was reseeded.
    fn refill_empty(
        &self,
        data: &[Vec<f64>],
        centers: &mut [Vec<f64>],
        labels: &mut [usize],
        rng: &mut StdRng,
    ) -> Result<bool> {
        let k = centers.len();
        let mut reseeded = false;

        for attempt in 0..=self.max_reseeds {
            let mut sizes = cluster_sizes(labels, k);
            if sizes.iter().all(|&s| s > 0) {
                return Ok(reseeded);
            }
            if attempt == self.max_reseeds {
                break;
            }

            for j in 0..k {
                if sizes[j] > 0 {
                    continue;
                }
                let candidates: Vec<usize> = (0..data.len())
                    .filter(|&i| sizes[labels[i]] > 1)
                    .filter(|&i| {
                        centers
                            .iter()
                            .all(|c| util::squared_euclidean(&data[i], c) > 0.0)
                    })
                    .collect();
                let &i = candidates
                    .choose(rng)
                    .ok_or(Error::ConvergenceFailure { attempts: attempt })?;

                log::trace!("cluster {} empty, reseeding at point {}", j, i);
                centers[j] = data[i].clone();
                sizes[labels[i]] -= 1;
                sizes[j] = 1;
                labels[i] = j;
            }

            assign(data, centers, labels)?;
            reseeded = true;
        }

        Err(Error::ConvergenceFailure {
            attempts: self.max_reseeds,
        })
    }
}

impl Default for Kmeans {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Clustering for Kmeans {
    fn fit_predict(&self, data: &[Vec<f64>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Lazy sequence of k-means restarts, created by [`Kmeans::restarts`].
#[derive(Debug)]
pub struct Restarts<'a> {
    kmeans: &'a Kmeans,
    data: &'a [Vec<f64>],
    master: StdRng,
    next: usize,
}

impl Iterator for Restarts<'_> {
    type Item = Result<KmeansFit>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.kmeans.restarts {
            return None;
        }
        let restart = self.next;
        self.next += 1;
        let seed = self.master.random::<u64>();
        Some(self.kmeans.run_once(self.data, seed, restart))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.kmeans.restarts - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Restarts<'_> {}

/// Keep the fit with the lowest inertia.
///
/// Ties keep the earlier fit. The first error aborts the selection. An empty
/// sequence is [`Error::EmptyInput`].
pub fn select_best<I>(fits: I) -> Result<KmeansFit>
where
    I: IntoIterator<Item = Result<KmeansFit>>,
{
    let mut best: Option<KmeansFit> = None;
    for fit in fits {
        let fit = fit?;
        let better = match &best {
            Some(b) => fit.inertia < b.inertia,
            None => true,
        };
        if better {
            best = Some(fit);
        }
    }
    best.ok_or(Error::EmptyInput)
}

/// Assign each point to its nearest center. Returns whether any label changed.
fn assign(data: &[Vec<f64>], centers: &[Vec<f64>], labels: &mut [usize]) -> Result<bool> {
    let mut changed = false;
    for (i, p) in data.iter().enumerate() {
        let (j, _) = util::nearest(p, centers).ok_or(Error::NonFiniteDistance { point: i })?;
        if labels[i] != j {
            labels[i] = j;
            changed = true;
        }
    }
    Ok(changed)
}

fn update_centers(data: &[Vec<f64>], labels: &[usize], centers: &mut [Vec<f64>]) {
    let d = centers.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0; d]; centers.len()];
    let mut counts = vec![0usize; centers.len()];
    for (p, &l) in data.iter().zip(labels) {
        counts[l] += 1;
        for (s, x) in sums[l].iter_mut().zip(p) {
            *s += x;
        }
    }
    for ((center, sum), &count) in centers.iter_mut().zip(sums).zip(&counts) {
        if count == 0 {
            continue;
        }
        for (c, s) in center.iter_mut().zip(sum) {
            *c = s / count as f64;
        }
    }
}

fn inertia(data: &[Vec<f64>], centers: &[Vec<f64>], labels: &[usize]) -> Result<f64> {
    let mut total = 0.0;
    for (i, (p, &l)) in data.iter().zip(labels).enumerate() {
        let d = util::squared_euclidean(p, &centers[l]);
        if !d.is_finite() {
            return Err(Error::NonFiniteDistance { point: i });
        }
        total += d;
    }
    Ok(total)
}

fn cluster_sizes(labels: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0; k];
    for &l in labels {
        if l < k {
            sizes[l] += 1;
        }
    }
    sizes
}
