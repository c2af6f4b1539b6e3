//! Synthetic portfolio generation from Gaussian sub-populations.

use rand::prelude::*;
use rand::seq::index;
use rand_distr::{Distribution, Normal};

use super::{Dataset, PolicyRecord, Sex};
use crate::error::{Error, Result};

/// Records drawn per cluster unless overridden.
pub const DEFAULT_COUNT_PER_CLUSTER: usize = 100;

/// Records whose age is blanked after generation.
pub const DEFAULT_MISSING_AGES: usize = 10;

/// Parameters of one Gaussian sub-population.
///
/// Age and sum assured are drawn independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterSpec {
    /// Mean age.
    pub mean_age: f64,
    /// Standard deviation of age.
    pub sd_age: f64,
    /// Mean sum assured.
    pub mean_sum_assured: f64,
    /// Standard deviation of sum assured.
    pub sd_sum_assured: f64,
}

impl ClusterSpec {
    /// Create a cluster specification.
    pub fn new(mean_age: f64, sd_age: f64, mean_sum_assured: f64, sd_sum_assured: f64) -> Self {
        Self {
            mean_age,
            sd_age,
            mean_sum_assured,
            sd_sum_assured,
        }
    }

    fn distributions(&self) -> Result<(Normal<f64>, Normal<f64>)> {
        if !self.mean_age.is_finite() || !self.mean_sum_assured.is_finite() {
            return Err(Error::InvalidParameter {
                name: "cluster mean",
                message: "must be finite",
            });
        }
        let invalid_sd = || Error::InvalidParameter {
            name: "cluster sd",
            message: "must be finite and non-negative",
        };
        let sd_ok = |sd: f64| sd.is_finite() && sd >= 0.0;
        if !sd_ok(self.sd_age) || !sd_ok(self.sd_sum_assured) {
            return Err(invalid_sd());
        }
        let age = Normal::new(self.mean_age, self.sd_age).map_err(|_| invalid_sd())?;
        let sum_assured =
            Normal::new(self.mean_sum_assured, self.sd_sum_assured).map_err(|_| invalid_sd())?;
        Ok((age, sum_assured))
    }
}

/// Male sub-populations of the illustrative portfolio.
pub fn default_male_clusters() -> Vec<ClusterSpec> {
    vec![
        ClusterSpec::new(25.0, 3.0, 100_000.0, 15_000.0),
        ClusterSpec::new(45.0, 4.0, 400_000.0, 40_000.0),
        ClusterSpec::new(62.0, 3.0, 150_000.0, 20_000.0),
    ]
}

/// Female sub-populations of the illustrative portfolio.
pub fn default_female_clusters() -> Vec<ClusterSpec> {
    vec![
        ClusterSpec::new(30.0, 4.0, 250_000.0, 30_000.0),
        ClusterSpec::new(55.0, 4.0, 500_000.0, 50_000.0),
    ]
}

/// Seeded generator of labeled policy datasets.
///
/// ```rust
/// use policy_clusters::data::{ClusterSpec, Generator};
///
/// let generator = Generator::new(
///     vec![ClusterSpec::new(40.0, 5.0, 200_000.0, 10_000.0)],
///     vec![ClusterSpec::new(35.0, 5.0, 300_000.0, 10_000.0)],
/// )
/// .with_count_per_cluster(20)
/// .with_seed(1);
///
/// let dataset = generator.generate().unwrap();
/// assert_eq!(dataset.len(), 40);
/// assert_eq!(dataset.missing_age_count(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    male: Vec<ClusterSpec>,
    female: Vec<ClusterSpec>,
    count_per_cluster: usize,
    missing_ages: usize,
    seed: u64,
}

impl Generator {
    /// Create a generator from per-sex cluster lists.
    pub fn new(male: Vec<ClusterSpec>, female: Vec<ClusterSpec>) -> Self {
        Self {
            male,
            female,
            count_per_cluster: DEFAULT_COUNT_PER_CLUSTER,
            missing_ages: DEFAULT_MISSING_AGES,
            seed: 42,
        }
    }

    /// Set the number of records drawn per cluster.
    pub fn with_count_per_cluster(mut self, count: usize) -> Self {
        self.count_per_cluster = count;
        self
    }

    /// Set how many records get a missing age.
    pub fn with_missing_ages(mut self, missing: usize) -> Self {
        self.missing_ages = missing;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Total number of records [`generate`](Self::generate) produces.
    pub fn total_records(&self) -> usize {
        (self.male.len() + self.female.len()) * self.count_per_cluster
    }

    /// Draw the dataset.
    ///
    /// Records are returned in ascending id order.
    pub fn generate(&self) -> Result<Dataset> {
        let n = self.total_records();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.missing_ages > n {
            return Err(Error::InvalidParameter {
                name: "missing_ages",
                message: "cannot exceed the number of generated records",
            });
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut records: Vec<PolicyRecord> = Vec::with_capacity(n);

        let groups = [(Sex::Male, &self.male), (Sex::Female, &self.female)];
        for (sex, clusters) in groups {
            for spec in clusters.iter() {
                let (age, sum_assured) = spec.distributions()?;
                for _ in 0..self.count_per_cluster {
                    let a = age.sample(&mut rng).round() as i64;
                    let s = sum_assured.sample(&mut rng).round() as i64;
                    records.push(PolicyRecord {
                        sex,
                        age: Some(a),
                        sum_assured: s,
                        id: 0,
                    });
                }
            }
        }

        let mut ids: Vec<u64> = (1..=n as u64).collect();
        ids.shuffle(&mut rng);
        for (record, id) in records.iter_mut().zip(ids) {
            record.id = id;
        }
        records.sort_by_key(|r| r.id);

        for i in index::sample(&mut rng, n, self.missing_ages).into_iter() {
            records[i].age = None;
        }

        log::debug!(
            "generated {} records ({} male clusters, {} female clusters, {} missing ages)",
            n,
            self.male.len(),
            self.female.len(),
            self.missing_ages
        );

        Ok(Dataset::new(records))
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(default_male_clusters(), default_female_clusters())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_count_and_missing_ages() {
        let dataset = Generator::default().generate().unwrap();
        assert_eq!(dataset.len(), 5 * DEFAULT_COUNT_PER_CLUSTER);
        assert_eq!(dataset.missing_age_count(), DEFAULT_MISSING_AGES);
    }

    #[test]
    fn ids_are_a_permutation() {
        let dataset = Generator::default().with_seed(3).generate().unwrap();
        let ids = dataset.ids();
        let expected: Vec<u64> = (1..=dataset.len() as u64).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn same_seed_same_dataset() {
        let a = Generator::default().with_seed(99).generate().unwrap();
        let b = Generator::default().with_seed(99).generate().unwrap();
        let c = Generator::default().with_seed(100).generate().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn per_sex_counts_follow_cluster_lists() {
        let dataset = Generator::default()
            .with_count_per_cluster(30)
            .generate()
            .unwrap();
        assert_eq!(dataset.filter_sex(Sex::Male).len(), 90);
        assert_eq!(dataset.filter_sex(Sex::Female).len(), 60);
    }

    #[test]
    fn zero_sd_reproduces_mean() {
        let dataset = Generator::new(vec![ClusterSpec::new(40.4, 0.0, 1000.6, 0.0)], vec![])
            .with_count_per_cluster(5)
            .with_missing_ages(0)
            .generate()
            .unwrap();
        for r in dataset.records() {
            assert_eq!(r.age, Some(40));
            assert_eq!(r.sum_assured, 1001);
        }
    }

    #[test]
    fn invalid_parameters() {
        let bad_sd = Generator::new(vec![ClusterSpec::new(40.0, -1.0, 1000.0, 1.0)], vec![]);
        assert!(bad_sd.generate().is_err());

        let too_many_missing = Generator::default()
            .with_count_per_cluster(1)
            .with_missing_ages(6);
        assert!(too_many_missing.generate().is_err());

        let empty = Generator::new(vec![], vec![]);
        assert!(matches!(empty.generate(), Err(Error::EmptyInput)));
    }
}
