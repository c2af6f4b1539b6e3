//! Synthetic insurance portfolios and k-means exploration.
//!
//! `policy-clusters` draws a policy dataset (sex, age, sum assured, contract id)
//! from Gaussian sub-populations, stores it as a flat delimited text file, and
//! tries to recover the sub-populations with k-means.
//!
//! - [`data`]: records, the seeded [`Generator`], cleaning and file storage
//! - [`frame`]: numeric columns and column transforms
//! - [`scale`]: z-score scaling
//! - [`cluster`]: k-means with random restarts
//! - [`explore`]: overall and per-sex runs, raw and scaled
//!
//! ```rust
//! use policy_clusters::cluster::Kmeans;
//! use policy_clusters::data::Generator;
//! use policy_clusters::frame::{Frame, AGE, SUM_ASSURED};
//! use policy_clusters::scale::scale_columns;
//!
//! let dataset = Generator::default().with_seed(1).generate().unwrap();
//! let cleaned = dataset.drop_missing_age();
//!
//! let frame = Frame::from_dataset(&cleaned.dataset).unwrap();
//! let (scaled, _) = scale_columns(&frame, &[AGE, SUM_ASSURED]).unwrap();
//! let points = scaled.points(&[AGE, SUM_ASSURED]).unwrap();
//!
//! let fit = Kmeans::new(5).with_seed(1).with_restarts(10).fit(&points).unwrap();
//! assert_eq!(fit.labels.len(), cleaned.dataset.len());
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod data;
pub mod error;
pub mod explore;
pub mod frame;
pub mod scale;

pub use cluster::{Clustering, Kmeans, KmeansFit};
pub use data::{ClusterSpec, Dataset, Generator, PolicyRecord, Sex};
pub use error::{Error, Result};
