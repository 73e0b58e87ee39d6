use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::debug;

use crate::domain::models::{AnimalDetails, AnimalRecord};
use crate::domain::query_filter::{AnimalFilter, Pagination};
use crate::storage::connection::DbConnection;
use crate::storage::traits::AnimalStorage;

/// Age at outcome in whole weeks, evaluated by SQLite.
///
/// Must agree with `domain::age::compute_age`: the day difference is cast to
/// an integer and divided with SQLite's integer division, which truncates
/// toward zero like Rust's `/`. NULL dates yield NULL, which fails every
/// comparison.
pub const AGE_IN_WEEKS_SQL: &str =
    "(CAST(julianday(date_of_outcome) - julianday(date_of_birth) AS INTEGER) / 7)";

const SELECT_COLUMNS: &str = "rec_num, animal_id, animal_type, breed, color, date_of_birth, \
     date_of_outcome, name, outcome_subtype, outcome_type, sex_upon_outcome, location_lat, \
     location_long";

const INSERT_SQL: &str = r#"
    INSERT INTO animals (
        animal_id, animal_type, breed, color, date_of_birth, date_of_outcome,
        name, outcome_subtype, outcome_type, sex_upon_outcome, location_lat, location_long
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Repository for outcome records
#[derive(Clone)]
pub struct AnimalRepository {
    db: DbConnection,
}

impl AnimalRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_record(row: &SqliteRow) -> Result<AnimalRecord> {
        let details = AnimalDetails {
            external_id: row.try_get("animal_id")?,
            animal_type: row.try_get("animal_type")?,
            breed: row.try_get("breed")?,
            color: row.try_get("color")?,
            date_of_birth: row.try_get("date_of_birth")?,
            date_of_outcome: row.try_get("date_of_outcome")?,
            name: row.try_get("name")?,
            outcome_subtype: row.try_get("outcome_subtype")?,
            outcome_type: row.try_get("outcome_type")?,
            sex_upon_outcome: row.try_get("sex_upon_outcome")?,
            latitude: row.try_get("location_lat")?,
            longitude: row.try_get("location_long")?,
        };
        Ok(AnimalRecord::new(row.try_get("rec_num")?, details))
    }

    /// Bind the mutable columns in the order used by INSERT_SQL and the UPDATE
    fn bind_details<'q>(
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
        details: &'q AnimalDetails,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query
            .bind(&details.external_id)
            .bind(&details.animal_type)
            .bind(&details.breed)
            .bind(&details.color)
            .bind(details.date_of_birth)
            .bind(details.date_of_outcome)
            .bind(&details.name)
            .bind(&details.outcome_subtype)
            .bind(&details.outcome_type)
            .bind(&details.sex_upon_outcome)
            .bind(details.latitude)
            .bind(details.longitude)
    }

    /// Append the filter as `AND` clauses to a query that already has a WHERE
    fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &AnimalFilter) {
        if let Some(animal_type) = &filter.animal_type {
            builder.push(" AND animal_type = ").push_bind(animal_type.clone());
        }
        if !filter.breeds.is_empty() {
            builder.push(" AND breed IN (");
            let mut separated = builder.separated(", ");
            for breed in &filter.breeds {
                separated.push_bind(breed.clone());
            }
            separated.push_unseparated(")");
        }
        if let Some(sex) = &filter.sex_upon_outcome {
            builder.push(" AND sex_upon_outcome = ").push_bind(sex.clone());
        }
        if let Some(min_weeks) = filter.min_age_weeks {
            builder
                .push(" AND ")
                .push(AGE_IN_WEEKS_SQL)
                .push(" >= ")
                .push_bind(min_weeks);
        }
        if let Some(max_weeks) = filter.max_age_weeks {
            builder
                .push(" AND ")
                .push(AGE_IN_WEEKS_SQL)
                .push(" <= ")
                .push_bind(max_weeks);
        }
    }
}

#[async_trait]
impl AnimalStorage for AnimalRepository {
    async fn insert_animal(&self, details: &AnimalDetails) -> Result<i64> {
        let result = Self::bind_details(sqlx::query(INSERT_SQL), details)
            .execute(self.db.pool())
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn get_animal(&self, record_id: i64) -> Result<Option<AnimalRecord>> {
        let sql = format!("SELECT {} FROM animals WHERE rec_num = ?", SELECT_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(record_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn query_animals(
        &self,
        filter: &AnimalFilter,
        page: Pagination,
    ) -> Result<Vec<AnimalRecord>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM animals WHERE 1 = 1",
            SELECT_COLUMNS
        ));
        Self::push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY rec_num ASC LIMIT ")
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(i64::from(page.skip));

        debug!("Animal query: {}", builder.sql());
        let rows = builder.build().fetch_all(self.db.pool()).await?;
        rows.iter().map(Self::row_to_record).collect()
    }

    async fn replace_animal(&self, record_id: i64, details: &AnimalDetails) -> Result<bool> {
        let query = sqlx::query(
            r#"
            UPDATE animals
            SET animal_id = ?, animal_type = ?, breed = ?, color = ?,
                date_of_birth = ?, date_of_outcome = ?, name = ?, outcome_subtype = ?,
                outcome_type = ?, sex_upon_outcome = ?, location_lat = ?, location_long = ?
            WHERE rec_num = ?
            "#,
        );
        let result = Self::bind_details(query, details)
            .bind(record_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_animal(&self, record_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM animals WHERE rec_num = ?")
            .bind(record_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_animals_atomically(&self, batch: &[AnimalDetails]) -> Result<usize> {
        // Dropping `tx` before commit rolls the whole batch back.
        let mut tx = self.db.pool().begin().await?;
        for (index, details) in batch.iter().enumerate() {
            Self::bind_details(sqlx::query(INSERT_SQL), details)
                .execute(&mut *tx)
                .await
                .with_context(|| {
                    format!("Failed to insert row {} ({})", index + 1, details.external_id)
                })?;
        }
        tx.commit().await.context("Failed to commit batch insert")?;

        Ok(batch.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::age::{compute_age, parse_date, AGE_CASES};
    use crate::domain::models::animal::test_support::sample_details;

    async fn setup_test() -> AnimalRepository {
        let db = DbConnection::init_test().await.unwrap();
        AnimalRepository::new(db)
    }

    async fn count_rows(repo: &AnimalRepository) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM animals")
            .fetch_one(repo.db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let repo = setup_test().await;
        let details = sample_details("A100");

        let id = repo.insert_animal(&details).await.unwrap();
        let stored = repo.get_animal(id).await.unwrap().unwrap();

        assert_eq!(stored.record_id, id);
        assert_eq!(stored.details, details);
        assert!(repo.get_animal(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_assigned_in_insertion_order() {
        let repo = setup_test().await;
        let first = repo.insert_animal(&sample_details("A1")).await.unwrap();
        let second = repo.insert_animal(&sample_details("A2")).await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_replace_and_delete_report_missing_rows() {
        let repo = setup_test().await;
        let id = repo.insert_animal(&sample_details("A1")).await.unwrap();

        let mut updated = sample_details("A1");
        updated.name = None;
        updated.breed = "Beagle".to_string();
        assert!(repo.replace_animal(id, &updated).await.unwrap());
        assert_eq!(repo.get_animal(id).await.unwrap().unwrap().details, updated);

        assert!(!repo.replace_animal(999, &updated).await.unwrap());
        assert!(repo.delete_animal(id).await.unwrap());
        assert!(!repo.delete_animal(id).await.unwrap());
        assert_eq!(count_rows(&repo).await, 0);
    }

    #[tokio::test]
    async fn test_sql_age_matches_in_memory_age() {
        let repo = setup_test().await;
        for (birth, outcome, _, _) in AGE_CASES {
            let mut details = sample_details("A1");
            details.date_of_birth = parse_date(birth);
            details.date_of_outcome = parse_date(outcome);
            repo.insert_animal(&details).await.unwrap();
        }

        let sql = format!(
            "SELECT rec_num, {} AS weeks FROM animals ORDER BY rec_num",
            AGE_IN_WEEKS_SQL
        );
        let rows = sqlx::query(&sql).fetch_all(repo.db.pool()).await.unwrap();

        assert_eq!(rows.len(), AGE_CASES.len());
        for (row, (birth, outcome, _, expected)) in rows.iter().zip(AGE_CASES) {
            let sql_weeks: i64 = row.get("weeks");
            let memory_weeks =
                compute_age(Some(parse_date(birth)), Some(parse_date(outcome))).weeks;
            assert_eq!(sql_weeks, *expected, "sql weeks for {} -> {}", birth, outcome);
            assert_eq!(memory_weeks, Some(sql_weeks));
        }
    }

    #[tokio::test]
    async fn test_sql_filter_matches_in_memory_filter() {
        let repo = setup_test().await;
        let breeds = ["Beagle", "Poodle", "Boxer"];
        let types = ["Dog", "Cat"];
        let sexes = ["Intact Male", "Spayed Female"];
        let birth = parse_date("2020-01-01");
        for i in 0..24i64 {
            let mut details = sample_details(&format!("A{}", i));
            details.breed = breeds[(i % 3) as usize].to_string();
            details.animal_type = types[(i % 2) as usize].to_string();
            details.sex_upon_outcome = sexes[((i / 2) % 2) as usize].to_string();
            details.date_of_birth = birth;
            details.date_of_outcome = birth + chrono::Duration::days(i * 20);
            repo.insert_animal(&details).await.unwrap();
        }
        let everything = repo
            .query_animals(&AnimalFilter::default(), Pagination::new(None, Some(1000)))
            .await
            .unwrap();
        assert_eq!(everything.len(), 24);

        let filters = vec![
            AnimalFilter {
                animal_type: Some("Dog".to_string()),
                ..Default::default()
            },
            AnimalFilter {
                breeds: vec!["Poodle".to_string(), "Boxer".to_string()],
                ..Default::default()
            },
            AnimalFilter {
                sex_upon_outcome: Some("Spayed Female".to_string()),
                min_age_weeks: Some(20),
                ..Default::default()
            },
            AnimalFilter {
                min_age_weeks: Some(17),
                max_age_weeks: Some(40),
                ..Default::default()
            },
            AnimalFilter {
                animal_type: Some("Cat".to_string()),
                breeds: vec!["Beagle".to_string()],
                max_age_weeks: Some(30),
                ..Default::default()
            },
        ];

        for filter in filters {
            for page in [Pagination::new(None, Some(1000)), Pagination::new(Some(2), Some(3))] {
                let from_sql = repo.query_animals(&filter, page).await.unwrap();
                let in_memory: Vec<AnimalRecord> =
                    page.apply(everything.iter().filter(|r| filter.matches(r)).cloned());
                assert_eq!(from_sql, in_memory, "filter {:?} page {:?}", filter, page);
            }
        }
    }

    #[tokio::test]
    async fn test_min_age_filter_excludes_younger_records() {
        let repo = setup_test().await;
        let birth = parse_date("2020-01-01");
        for days in [300, 363, 364, 365, 800] {
            let mut details = sample_details(&format!("A{}", days));
            details.date_of_birth = birth;
            details.date_of_outcome = birth + chrono::Duration::days(days);
            repo.insert_animal(&details).await.unwrap();
        }

        let filter = AnimalFilter {
            min_age_weeks: Some(52),
            ..Default::default()
        };
        let result = repo.query_animals(&filter, Pagination::default()).await.unwrap();
        let ids: Vec<&str> = result.iter().map(|r| r.details.external_id.as_str()).collect();
        assert_eq!(ids, vec!["A364", "A365", "A800"]);
        assert!(result.iter().all(|r| r.age_upon_outcome().weeks.unwrap() >= 52));
    }

    #[tokio::test]
    async fn test_pagination_applies_after_filtering() {
        let repo = setup_test().await;
        for i in 1..=20 {
            let mut details = sample_details(&format!("A{}", i));
            details.animal_type = if i % 2 == 0 { "Dog" } else { "Cat" }.to_string();
            repo.insert_animal(&details).await.unwrap();
        }

        let filter = AnimalFilter {
            animal_type: Some("Dog".to_string()),
            ..Default::default()
        };
        let page = repo
            .query_animals(&filter, Pagination::new(Some(5), Some(3)))
            .await
            .unwrap();
        let ids: Vec<&str> = page.iter().map(|r| r.details.external_id.as_str()).collect();
        // Dogs are A2, A4, ... A20; records 6-8 of that sequence
        assert_eq!(ids, vec!["A12", "A14", "A16"]);
    }

    #[tokio::test]
    async fn test_batch_insert_is_all_or_nothing() {
        let repo = setup_test().await;
        let mut bad = sample_details("A2");
        bad.latitude = 200.0;
        let batch = vec![sample_details("A1"), bad, sample_details("A3")];

        let err = repo.insert_animals_atomically(&batch).await.unwrap_err();
        assert!(err.to_string().contains("row 2"));
        assert_eq!(count_rows(&repo).await, 0);

        let good = vec![sample_details("A1"), sample_details("A2")];
        assert_eq!(repo.insert_animals_atomically(&good).await.unwrap(), 2);
        assert_eq!(count_rows(&repo).await, 2);
    }
}
