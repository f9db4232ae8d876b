//! Registration Repository

use super::{RepoError, RepoResult};
use shared::models::{CountFilter, RecordField, Registration, RegistrationCreate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, record_type, title, employee_name, brings_plus_one, kids_count, \
     vegetarian_count, email_address, department, status, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Registration>> {
    let record = sqlx::query_as::<_, Registration>(&format!(
        "SELECT {COLUMNS} FROM record WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(record)
}

pub async fn find_by_field(
    pool: &SqlitePool,
    record_type: &str,
    field: RecordField,
    value: &str,
) -> RepoResult<Vec<Registration>> {
    let records = sqlx::query_as::<_, Registration>(&format!(
        "SELECT {COLUMNS} FROM record WHERE record_type = ? AND {} = ? ORDER BY id",
        field.column()
    ))
    .bind(record_type)
    .bind(value)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

pub async fn count(pool: &SqlitePool, filter: &CountFilter) -> RepoResult<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM record WHERE record_type = ? AND status = ?",
    )
    .bind(&filter.record_type)
    .bind(filter.status)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn record_type_exists(pool: &SqlitePool, record_type: &str) -> RepoResult<bool> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM record_type WHERE name = ?")
            .bind(record_type)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

pub async fn create(pool: &SqlitePool, data: RegistrationCreate) -> RepoResult<Registration> {
    if !record_type_exists(pool, &data.record_type).await? {
        return Err(RepoError::NotFound(format!(
            "Record type '{}' not found",
            data.record_type
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO record (id, record_type, title, employee_name, brings_plus_one, kids_count, \
         vegetarian_count, email_address, department, status, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(&data.record_type)
    .bind(&data.title)
    .bind(&data.employee_name)
    .bind(data.brings_plus_one)
    .bind(data.kids_count)
    .bind(data.vegetarian_count)
    .bind(&data.email_address)
    .bind(&data.department)
    .bind(data.status)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create registration".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::{REGISTRATION_TYPE, RecordStatus};

    fn payload(email: &str, status: RecordStatus) -> RegistrationCreate {
        RegistrationCreate {
            record_type: REGISTRATION_TYPE.to_string(),
            title: "Alice".to_string(),
            employee_name: "Alice".to_string(),
            brings_plus_one: true,
            kids_count: 2,
            vegetarian_count: 1,
            email_address: email.to_string(),
            department: Some("it".to_string()),
            status,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let db = DbService::in_memory().await.unwrap();
        let created = create(&db.pool, payload("alice@example.com", RecordStatus::Active))
            .await
            .unwrap();

        assert_eq!(created.record_type, "registration");
        assert!(created.brings_plus_one);
        assert_eq!(created.kids_count, 2);
        assert_eq!(created.vegetarian_count, 1);
        assert_eq!(created.department.as_deref(), Some("it"));
        assert_eq!(created.status, RecordStatus::Active);
        assert!(created.created_at > 0);

        let found = find_by_field(
            &db.pool,
            REGISTRATION_TYPE,
            RecordField::EmailAddress,
            "alice@example.com",
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, created.id);
    }

    #[tokio::test]
    async fn test_find_by_field_is_scoped_to_record_type() {
        let db = DbService::in_memory().await.unwrap();
        create(&db.pool, payload("alice@example.com", RecordStatus::Active))
            .await
            .unwrap();

        let found = find_by_field(&db.pool, "article", RecordField::EmailAddress, "alice@example.com")
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_by_index() {
        let db = DbService::in_memory().await.unwrap();
        create(&db.pool, payload("dup@example.com", RecordStatus::Active))
            .await
            .unwrap();

        let err = create(&db.pool, payload("dup@example.com", RecordStatus::Active))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_create_with_unknown_record_type_fails() {
        let db = DbService::in_memory().await.unwrap();
        let mut data = payload("bob@example.com", RecordStatus::Active);
        data.record_type = "missing".to_string();

        let err = create(&db.pool, data).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_count_only_matches_status() {
        let db = DbService::in_memory().await.unwrap();
        create(&db.pool, payload("a@example.com", RecordStatus::Active))
            .await
            .unwrap();
        create(&db.pool, payload("b@example.com", RecordStatus::Active))
            .await
            .unwrap();
        create(&db.pool, payload("c@example.com", RecordStatus::Unpublished))
            .await
            .unwrap();

        let active = count(&db.pool, &CountFilter::active(REGISTRATION_TYPE))
            .await
            .unwrap();
        assert_eq!(active, 2);

        let unpublished = count(
            &db.pool,
            &CountFilter {
                record_type: REGISTRATION_TYPE.to_string(),
                status: RecordStatus::Unpublished,
            },
        )
        .await
        .unwrap();
        assert_eq!(unpublished, 1);
    }
}
