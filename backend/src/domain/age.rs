//! Age derivation for outcome records.
//!
//! The weeks value is also evaluated inside SQLite when filtering by age (see
//! `storage::repositories::animal_repository::AGE_IN_WEEKS_SQL`). Both sides
//! use truncating integer division on the raw day difference so that they
//! agree on every input, including outcome dates that precede the birth date.

use chrono::NaiveDate;

const DAYS_PER_YEAR: i64 = 365;
const DAYS_PER_MONTH: i64 = 30;
const DAYS_PER_WEEK: i64 = 7;

/// Derived age fields of a record. Both are `None` when a date is missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AgeUponOutcome {
    pub text: Option<String>,
    pub weeks: Option<i64>,
}

/// Compute the human readable age and the age in whole weeks at outcome.
pub fn compute_age(
    date_of_birth: Option<NaiveDate>,
    date_of_outcome: Option<NaiveDate>,
) -> AgeUponOutcome {
    match (date_of_birth, date_of_outcome) {
        (Some(birth), Some(outcome)) => {
            let delta_days = (outcome - birth).num_days();
            AgeUponOutcome {
                text: Some(age_text(delta_days)),
                weeks: Some(delta_days / DAYS_PER_WEEK),
            }
        }
        _ => AgeUponOutcome::default(),
    }
}

fn age_text(delta_days: i64) -> String {
    let years = delta_days / DAYS_PER_YEAR;
    let months = (delta_days % DAYS_PER_YEAR) / DAYS_PER_MONTH;

    if years >= 1 {
        pluralize(years, "year")
    } else if months >= 1 {
        pluralize(months, "month")
    } else {
        "0 years".to_string()
    }
}

fn pluralize(count: i64, unit: &str) -> String {
    if count > 1 {
        format!("{} {}s", count, unit)
    } else {
        format!("{} {}", count, unit)
    }
}

/// Shared cases for the in-memory and SQL age computations:
/// (birth, outcome, expected text, expected weeks).
#[cfg(test)]
pub(crate) const AGE_CASES: &[(&str, &str, &str, i64)] = &[
    ("2020-01-01", "2021-06-15", "1 year", 75),
    ("2023-01-01", "2023-04-15", "3 months", 14),
    ("2022-05-05", "2022-05-05", "0 years", 0),
    ("2022-01-01", "2022-01-20", "0 years", 2),
    ("2022-01-01", "2022-01-31", "1 month", 4),
    ("2021-01-01", "2021-12-31", "12 months", 52),
    ("2021-01-01", "2022-01-01", "1 year", 52),
    ("2019-06-01", "2021-06-01", "2 years", 104),
    ("2015-03-10", "2020-03-10", "5 years", 261),
    ("2020-01-07", "2020-01-01", "0 years", 0),
    ("2020-01-01", "2019-12-01", "0 years", -4),
    ("9998-06-01", "9999-06-01", "1 year", 52),
];

#[cfg(test)]
pub(crate) fn parse_date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}
