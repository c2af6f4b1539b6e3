//! Policy records and datasets.
//!
//! A [`Dataset`] is an ordered list of [`PolicyRecord`]s. It is either produced by
//! [`Generator`] or read back from the flat text format in [`io`]. Every
//! operation here returns a new dataset; the source is left untouched so a
//! generated dataset can be compared against every stage derived from it.
//!
//! ```rust
//! use policy_clusters::data::{Generator, Sex};
//!
//! let dataset = Generator::default().with_seed(7).generate().unwrap();
//! let cleaned = dataset.drop_missing_age();
//!
//! assert_eq!(cleaned.excluded, 10);
//! assert_eq!(cleaned.dataset.len(), dataset.len() - 10);
//! assert!(cleaned.dataset.filter_sex(Sex::Female).len() > 0);
//! ```

mod generate;
pub mod io;

pub use generate::{
    default_female_clusters, default_male_clusters, ClusterSpec, Generator,
    DEFAULT_COUNT_PER_CLUSTER, DEFAULT_MISSING_AGES,
};

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Sex of the policyholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    /// `M`
    Male,
    /// `F`
    Female,
}

impl Sex {
    /// Single-letter code used in the text format.
    pub fn code(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('"') {
            "M" | "m" => Ok(Sex::Male),
            "F" | "f" => Ok(Sex::Female),
            _ => Err(Error::InvalidParameter {
                name: "sex",
                message: "expected M or F",
            }),
        }
    }
}

/// One insurance contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyRecord {
    /// Policyholder sex.
    pub sex: Sex,
    /// Age in whole years; `None` when missing.
    pub age: Option<i64>,
    /// Sum assured in whole currency units.
    pub sum_assured: i64,
    /// Contract id, unique within a dataset.
    pub id: u64,
}

/// Ordered collection of policy records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<PolicyRecord>,
}

/// Output of [`Dataset::drop_missing_age`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cleaned {
    /// Records with a known age, in original order.
    pub dataset: Dataset,
    /// How many records were removed.
    pub excluded: usize,
}

impl Dataset {
    /// Wrap an ordered list of records.
    pub fn new(records: Vec<PolicyRecord>) -> Self {
        Self { records }
    }

    /// Records in order.
    pub fn records(&self) -> &[PolicyRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records whose age is missing.
    pub fn missing_age_count(&self) -> usize {
        self.records.iter().filter(|r| r.age.is_none()).count()
    }

    /// Contract ids in record order.
    pub fn ids(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// Drop every record without an age.
    pub fn drop_missing_age(&self) -> Cleaned {
        let records: Vec<PolicyRecord> = self
            .records
            .iter()
            .filter(|r| r.age.is_some())
            .copied()
            .collect();
        let excluded = self.records.len() - records.len();
        log::info!(
            "excluded {} of {} records with missing age",
            excluded,
            self.records.len()
        );
        Cleaned {
            dataset: Dataset::new(records),
            excluded,
        }
    }

    /// Records of a single sex, in original order.
    pub fn filter_sex(&self, sex: Sex) -> Dataset {
        Dataset::new(
            self.records
                .iter()
                .filter(|r| r.sex == sex)
                .copied()
                .collect(),
        )
    }
}

impl From<Vec<PolicyRecord>> for Dataset {
    fn from(records: Vec<PolicyRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<PolicyRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = PolicyRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sex: Sex, age: Option<i64>, id: u64) -> PolicyRecord {
        PolicyRecord {
            sex,
            age,
            sum_assured: 1000 * id as i64,
            id,
        }
    }

    #[test]
    fn parse_sex_codes() {
        assert_eq!("M".parse::<Sex>().unwrap(), Sex::Male);
        assert_eq!("\"F\"".parse::<Sex>().unwrap(), Sex::Female);
        assert_eq!(" m ".parse::<Sex>().unwrap(), Sex::Male);
        assert!("X".parse::<Sex>().is_err());
        assert!("".parse::<Sex>().is_err());
    }

    #[test]
    fn drop_missing_age_keeps_order_and_counts() {
        let dataset = Dataset::new(vec![
            record(Sex::Male, Some(30), 1),
            record(Sex::Female, None, 2),
            record(Sex::Female, Some(41), 3),
            record(Sex::Male, None, 4),
        ]);

        let cleaned = dataset.drop_missing_age();
        assert_eq!(cleaned.excluded, 2);
        assert_eq!(cleaned.dataset.ids(), vec![1, 3]);
        // Source untouched.
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.missing_age_count(), 2);
        assert_eq!(cleaned.dataset.missing_age_count(), 0);
    }

    #[test]
    fn filter_sex_splits_dataset() {
        let dataset: Dataset = vec![
            record(Sex::Male, Some(30), 1),
            record(Sex::Female, Some(35), 2),
            record(Sex::Male, Some(50), 3),
        ]
        .into();

        assert_eq!(dataset.filter_sex(Sex::Male).ids(), vec![1, 3]);
        assert_eq!(dataset.filter_sex(Sex::Female).ids(), vec![2]);
    }
}
