//! Filter criteria and pagination for listing outcome records.
//!
//! The storage layer compiles an `AnimalFilter` to a SQL `WHERE` clause.
//! `AnimalFilter::matches` evaluates the same criteria against a loaded
//! record and is the reference the SQL version is tested against.

use crate::domain::models::AnimalRecord;

pub const DEFAULT_SKIP: u32 = 0;
pub const DEFAULT_LIMIT: u32 = 100;

/// Conjunctive filter over outcome records. `None` / empty means "any".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimalFilter {
    pub animal_type: Option<String>,
    /// Match-any set of breeds
    pub breeds: Vec<String>,
    pub sex_upon_outcome: Option<String>,
    /// Inclusive bound on age at outcome in weeks
    pub min_age_weeks: Option<i64>,
    /// Inclusive bound on age at outcome in weeks
    pub max_age_weeks: Option<i64>,
}

impl AnimalFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, record: &AnimalRecord) -> bool {
        let details = &record.details;

        if let Some(animal_type) = &self.animal_type {
            if &details.animal_type != animal_type {
                return false;
            }
        }
        if !self.breeds.is_empty() && !self.breeds.iter().any(|b| b == &details.breed) {
            return false;
        }
        if let Some(sex) = &self.sex_upon_outcome {
            if &details.sex_upon_outcome != sex {
                return false;
            }
        }

        if self.min_age_weeks.is_none() && self.max_age_weeks.is_none() {
            return true;
        }
        // A record without a computable age never satisfies an age bound,
        // the same way a NULL comparison is false in SQL.
        let Some(weeks) = record.age_upon_outcome().weeks else {
            return false;
        };
        if self.min_age_weeks.is_some_and(|min| weeks < min) {
            return false;
        }
        if self.max_age_weeks.is_some_and(|max| weeks > max) {
            return false;
        }
        true
    }
}

/// Offset pagination applied after filtering, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: DEFAULT_SKIP,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(skip: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            skip: skip.unwrap_or(DEFAULT_SKIP),
            limit: limit.unwrap_or(DEFAULT_LIMIT),
        }
    }

    /// Apply this page to records already filtered and in store order.
    pub fn apply<T>(&self, records: impl IntoIterator<Item = T>) -> Vec<T> {
        records
            .into_iter()
            .skip(self.skip as usize)
            .take(self.limit as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::age::parse_date;
    use crate::domain::models::animal::test_support::sample_details;

    fn record(id: i64, breed: &str, birth: &str, outcome: &str) -> AnimalRecord {
        let mut details = sample_details(&format!("A{}", id));
        details.breed = breed.to_string();
        details.date_of_birth = parse_date(birth);
        details.date_of_outcome = parse_date(outcome);
        AnimalRecord::new(id, details)
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = AnimalFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&record(1, "Poodle", "2020-01-01", "2020-02-01")));
    }

    #[test]
    fn test_breed_is_match_any() {
        let filter = AnimalFilter {
            breeds: vec!["Poodle".to_string(), "Beagle".to_string()],
            ..Default::default()
        };
        assert!(filter.matches(&record(1, "Beagle", "2020-01-01", "2020-02-01")));
        assert!(!filter.matches(&record(2, "Boxer", "2020-01-01", "2020-02-01")));
    }

    #[test]
    fn test_exact_match_fields_are_conjunctive() {
        let mut filter = AnimalFilter {
            animal_type: Some("Dog".to_string()),
            sex_upon_outcome: Some("Neutered Male".to_string()),
            ..Default::default()
        };
        let rec = record(1, "Poodle", "2020-01-01", "2020-02-01");
        assert!(filter.matches(&rec));

        filter.sex_upon_outcome = Some("Spayed Female".to_string());
        assert!(!filter.matches(&rec));

        filter.sex_upon_outcome = None;
        filter.animal_type = Some("dog".to_string());
        assert!(!filter.matches(&rec));
    }

    #[test]
    fn test_min_age_bound_is_inclusive() {
        let filter = AnimalFilter {
            min_age_weeks: Some(52),
            ..Default::default()
        };
        // 364 days = 52 weeks, 363 days = 51 weeks
        assert!(filter.matches(&record(1, "Poodle", "2021-01-01", "2021-12-31")));
        assert!(!filter.matches(&record(2, "Poodle", "2021-01-01", "2021-12-30")));
    }

    #[test]
    fn test_max_age_bound_is_inclusive() {
        let filter = AnimalFilter {
            max_age_weeks: Some(4),
            ..Default::default()
        };
        assert!(filter.matches(&record(1, "Poodle", "2022-01-01", "2022-01-29")));
        assert!(!filter.matches(&record(2, "Poodle", "2022-01-01", "2022-02-05")));
    }

    #[test]
    fn test_pagination_defaults_and_window() {
        assert_eq!(Pagination::new(None, None), Pagination::default());
        assert_eq!(Pagination::default().limit, 100);

        let page = Pagination::new(Some(5), Some(3)).apply(1..=10);
        assert_eq!(page, vec![6, 7, 8]);

        let past_end = Pagination::new(Some(20), Some(3)).apply(1..=10);
        assert!(past_end.is_empty());
    }
}
