//! Clustering algorithms for grouping policy records.
//!
//! ## K-means
//!
//! The classic algorithm: assign each point to the nearest centroid, then
//! update centroids to the mean of their points. Repeat.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Clusters are roughly spherical
//! - Clusters have similar sizes
//! - You know k in advance
//!
//! Because the objective is measured in raw Euclidean distance, features on very
//! different scales (age in years, sum assured in currency) should be z-scored
//! first; see [`crate::scale`].
//!
//! ## Usage
//!
//! ```rust
//! use policy_clusters::cluster::{Clustering, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);  // First two together
//! assert_ne!(labels[0], labels[2]);  // Separate from last two
//!
//! // Full result: centers, inertia and the restart that won.
//! let fit = Kmeans::new(2).with_seed(42).with_restarts(10).fit(&data).unwrap();
//! assert_eq!(fit.centers.len(), 2);
//! assert!(fit.inertia < 0.1);
//! ```

mod kmeans;
mod traits;
mod util;

pub use kmeans::{
    select_best, Kmeans, KmeansFit, Restarts, DEFAULT_MAX_ITER, DEFAULT_MAX_RESEEDS,
    DEFAULT_RESTARTS,
};
pub use traits::Clustering;
