//! Taxonomy Term Repository

use super::RepoResult;
use shared::models::DepartmentTerm;
use sqlx::SqlitePool;

/// All terms of a vocabulary, ordered by weight then name
pub async fn find_by_vocabulary(
    pool: &SqlitePool,
    vocabulary: &str,
) -> RepoResult<Vec<DepartmentTerm>> {
    let terms = sqlx::query_as::<_, DepartmentTerm>(
        "SELECT id, vocabulary, name, weight FROM taxonomy_term WHERE vocabulary = ? ORDER BY weight, name",
    )
    .bind(vocabulary)
    .fetch_all(pool)
    .await?;
    Ok(terms)
}
