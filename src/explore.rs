//! Exploratory clustering of a policy dataset.
//!
//! Runs k-means over the whole portfolio and over each sex separately, once on
//! the raw features and once on z-scored features. Unscaled runs split almost
//! entirely along sum assured; scaled runs recover the age structure as well.
//!
//! ```rust
//! use policy_clusters::data::Generator;
//! use policy_clusters::explore::{Exploration, Scaling, Scope};
//!
//! let dataset = Generator::default().with_count_per_cluster(40).generate().unwrap();
//! let report = Exploration::default().with_restarts(5).run(&dataset).unwrap();
//!
//! assert_eq!(report.excluded, 10);
//! assert_eq!(report.runs.len(), 6);
//! let scaled = report.get(Scope::All, Scaling::ZScore).unwrap();
//! assert_eq!(scaled.fit.k(), 5);
//! assert_eq!(scaled.ids.len(), dataset.len() - 10);
//! ```

use std::fmt;

use crate::cluster::{Kmeans, KmeansFit, DEFAULT_MAX_ITER, DEFAULT_RESTARTS};
use crate::data::{Dataset, Sex};
use crate::error::Result;
use crate::frame::{Frame, AGE, SUM_ASSURED};
use crate::scale::ZScore;

/// Which records a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every cleaned record.
    All,
    /// Records of one sex.
    Sex(Sex),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::All => f.write_str("all"),
            Scope::Sex(sex) => write!(f, "sex={sex}"),
        }
    }
}

/// Feature preprocessing applied before clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaling {
    /// Features as stored.
    Raw,
    /// Features z-scored within the scope.
    ZScore,
}

/// One k-means run of the exploration.
#[derive(Debug, Clone)]
pub struct ExplorationRun {
    /// Records covered.
    pub scope: Scope,
    /// Preprocessing applied.
    pub scaling: Scaling,
    /// Feature columns, in point coordinate order.
    pub features: Vec<String>,
    /// Contract id of each clustered point, in point order.
    pub ids: Vec<u64>,
    /// Best k-means fit.
    pub fit: KmeansFit,
    /// Fitted scaler for [`Scaling::ZScore`] runs.
    pub scaler: Option<ZScore>,
}

impl ExplorationRun {
    /// Cluster centers expressed in the units of the stored data.
    pub fn centers_in_original_units(&self) -> Result<Vec<Vec<f64>>> {
        match &self.scaler {
            None => Ok(self.fit.centers.clone()),
            Some(z) => {
                let features: Vec<&str> = self.features.iter().map(String::as_str).collect();
                self.fit
                    .centers
                    .iter()
                    .map(|c| z.inverse_point(&features, c))
                    .collect()
            }
        }
    }
}

/// All runs of an exploration.
#[derive(Debug, Clone)]
pub struct ExplorationReport {
    /// Records dropped for a missing age.
    pub excluded: usize,
    /// Runs in order: all, male, female; raw before scaled within each.
    pub runs: Vec<ExplorationRun>,
}

impl ExplorationReport {
    /// Look up one run.
    pub fn get(&self, scope: Scope, scaling: Scaling) -> Option<&ExplorationRun> {
        self.runs
            .iter()
            .find(|r| r.scope == scope && r.scaling == scaling)
    }
}

/// Exploration settings.
#[derive(Debug, Clone)]
pub struct Exploration {
    k: usize,
    k_male: usize,
    k_female: usize,
    restarts: usize,
    max_iter: usize,
    seed: u64,
    features: Vec<String>,
}

impl Default for Exploration {
    fn default() -> Self {
        Self {
            k: 5,
            k_male: 3,
            k_female: 2,
            restarts: DEFAULT_RESTARTS,
            max_iter: DEFAULT_MAX_ITER,
            seed: 42,
            features: vec![AGE.to_string(), SUM_ASSURED.to_string()],
        }
    }
}

impl Exploration {
    /// Set the cluster count for the whole portfolio.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the cluster count for each sex.
    pub fn with_k_per_sex(mut self, k_male: usize, k_female: usize) -> Self {
        self.k_male = k_male;
        self.k_female = k_female;
        self
    }

    /// Set the number of k-means restarts per run.
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Set the Lloyd pass limit per restart.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the seed shared by every run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the feature columns.
    pub fn with_features(mut self, features: &[&str]) -> Self {
        self.features = features.iter().map(|s| s.to_string()).collect();
        self
    }

    fn k_for(&self, scope: Scope) -> usize {
        match scope {
            Scope::All => self.k,
            Scope::Sex(Sex::Male) => self.k_male,
            Scope::Sex(Sex::Female) => self.k_female,
        }
    }

    /// Clean `dataset` and run every scope and scaling combination.
    ///
    /// Any failing run fails the whole exploration.
    pub fn run(&self, dataset: &Dataset) -> Result<ExplorationReport> {
        let cleaned = dataset.drop_missing_age();
        let scopes = [Scope::All, Scope::Sex(Sex::Male), Scope::Sex(Sex::Female)];

        let mut runs = Vec::with_capacity(scopes.len() * 2);
        for scope in scopes {
            let subset = match scope {
                Scope::All => cleaned.dataset.clone(),
                Scope::Sex(sex) => cleaned.dataset.filter_sex(sex),
            };
            let frame = Frame::from_dataset(&subset)?;
            for scaling in [Scaling::Raw, Scaling::ZScore] {
                runs.push(self.run_one(scope, scaling, &subset, &frame)?);
            }
        }

        Ok(ExplorationReport {
            excluded: cleaned.excluded,
            runs,
        })
    }

    fn run_one(
        &self,
        scope: Scope,
        scaling: Scaling,
        subset: &Dataset,
        frame: &Frame,
    ) -> Result<ExplorationRun> {
        let features: Vec<&str> = self.features.iter().map(String::as_str).collect();
        let (points, scaler) = match scaling {
            Scaling::Raw => (frame.points(&features)?, None),
            Scaling::ZScore => {
                let z = ZScore::fit(frame, &features)?;
                (z.transform(frame)?.points(&features)?, Some(z))
            }
        };

        let k = self.k_for(scope);
        let fit = Kmeans::new(k)
            .with_restarts(self.restarts)
            .with_max_iter(self.max_iter)
            .with_seed(self.seed)
            .fit(&points)?;
        log::info!(
            "{} {:?}: k={} inertia {:.4} sizes {:?}",
            scope,
            scaling,
            k,
            fit.inertia,
            fit.cluster_sizes()
        );

        Ok(ExplorationRun {
            scope,
            scaling,
            features: self.features.clone(),
            ids: subset.ids(),
            fit,
            scaler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ClusterSpec, Generator};
    use crate::error::Error;

    fn small_dataset() -> Dataset {
        Generator::new(
            vec![
                ClusterSpec::new(25.0, 2.0, 100_000.0, 5_000.0),
                ClusterSpec::new(60.0, 2.0, 100_000.0, 5_000.0),
            ],
            vec![ClusterSpec::new(40.0, 2.0, 400_000.0, 5_000.0)],
        )
        .with_count_per_cluster(30)
        .with_seed(8)
        .generate()
        .unwrap()
    }

    #[test]
    fn runs_every_scope_and_scaling() {
        let report = Exploration::default()
            .with_k(3)
            .with_k_per_sex(2, 1)
            .with_restarts(10)
            .run(&small_dataset())
            .unwrap();

        assert_eq!(report.excluded, 10);
        assert_eq!(report.runs.len(), 6);

        let male = report.get(Scope::Sex(Sex::Male), Scaling::ZScore).unwrap();
        assert_eq!(male.fit.k(), 2);
        assert_eq!(male.ids.len(), male.fit.labels.len());
        assert!(male.scaler.is_some());

        let female = report.get(Scope::Sex(Sex::Female), Scaling::Raw).unwrap();
        assert_eq!(female.fit.k(), 1);
        assert!(female.scaler.is_none());
    }

    #[test]
    fn scaled_centers_reported_in_original_units() {
        let report = Exploration::default()
            .with_k(3)
            .with_k_per_sex(2, 1)
            .with_restarts(10)
            .run(&small_dataset())
            .unwrap();

        let male = report.get(Scope::Sex(Sex::Male), Scaling::ZScore).unwrap();
        let mut ages: Vec<f64> = male
            .centers_in_original_units()
            .unwrap()
            .iter()
            .map(|c| c[0])
            .collect();
        ages.sort_by(f64::total_cmp);
        assert!((ages[0] - 25.0).abs() < 2.0, "{ages:?}");
        assert!((ages[1] - 60.0).abs() < 2.0, "{ages:?}");
    }

    #[test]
    fn too_many_clusters_for_scope_fails() {
        let err = Exploration::default()
            .with_k(3)
            .with_k_per_sex(2, 100)
            .with_restarts(2)
            .run(&small_dataset())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidClusterCount { requested: 100, .. }));
    }

    #[test]
    fn unknown_feature_fails() {
        let err = Exploration::default()
            .with_features(&["age", "premium"])
            .with_restarts(2)
            .run(&small_dataset())
            .unwrap_err();
        assert!(matches!(err, Error::MissingColumn { .. }));
    }
}
