//! One repository per entity. Each holds a clone of the pool; statements that
//! must share a transaction take the connection explicitly.

pub mod artworks;
pub mod categories;
pub mod projects;
pub mod users;

pub use artworks::{ArtworkRepository, ArtworkWrite};
pub use categories::CategoryRepository;
pub use projects::{ProjectRepository, ProjectWrite};
pub use users::{NewUser, ProfileUpdate, UserRepository};

use sqlx::PgConnection;

use crate::database::manager::DatabaseError;

/// Replace every category link of one artwork or project. Ids that do not
/// name an existing category are skipped.
pub(crate) async fn replace_category_links(
    conn: &mut PgConnection,
    join_table: &str,
    join_column: &str,
    owner_id: i32,
    category_ids: &[i64],
) -> Result<(), DatabaseError> {
    let delete = format!("DELETE FROM {} WHERE {} = $1", join_table, join_column);
    sqlx::query(&delete).bind(owner_id).execute(&mut *conn).await?;

    insert_category_links(conn, join_table, join_column, owner_id, category_ids).await
}

pub(crate) async fn insert_category_links(
    conn: &mut PgConnection,
    join_table: &str,
    join_column: &str,
    owner_id: i32,
    category_ids: &[i64],
) -> Result<(), DatabaseError> {
    let ids = category_ids_i32(category_ids);
    if ids.is_empty() {
        return Ok(());
    }

    let insert = format!(
        "INSERT INTO {} ({}, category_id) \
         SELECT $1, c.id FROM categories c WHERE c.id = ANY($2) \
         ON CONFLICT DO NOTHING",
        join_table, join_column
    );
    sqlx::query(&insert).bind(owner_id).bind(ids).execute(&mut *conn).await?;
    Ok(())
}

/// Category ids outside the `INTEGER` range cannot name a row.
fn category_ids_i32(ids: &[i64]) -> Vec<i32> {
    let mut out: Vec<i32> = ids.iter().filter_map(|id| i32::try_from(*id).ok()).collect();
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_ids_drop_out_of_range_and_duplicates() {
        assert_eq!(category_ids_i32(&[3, 1, 3, i64::MAX, -1]), vec![-1, 1, 3]);
        assert!(category_ids_i32(&[]).is_empty());
    }
}
