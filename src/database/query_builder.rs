use serde::Serialize;
use sqlx::{self, postgres::PgArguments, Arguments, FromRow, PgConnection, PgPool};

use crate::database::manager::DatabaseError;
use crate::filter::types::{SqlParam, SqlResult};
use crate::filter::{Filter, FilterSpec, FilterTarget, Paginated, Pagination};

/// Paged, filtered listing of artworks or projects with their categories
/// embedded as a JSON array.
pub struct QueryBuilder<T> {
    filter: Filter,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin + Serialize,
{
    pub fn new(target: FilterTarget) -> Self {
        Self {
            filter: Filter::new(target),
            _phantom: std::marker::PhantomData,
        }
    }

    fn target(&self) -> FilterTarget {
        self.filter.target()
    }

    fn table(&self) -> &'static str {
        match self.target() {
            FilterTarget::Artworks => "artworks",
            FilterTarget::Projects => "projects",
        }
    }

    fn categories_column(&self) -> &'static str {
        match self.target() {
            FilterTarget::Artworks => "artwork_categories",
            FilterTarget::Projects => "project_categories",
        }
    }

    /// `SELECT ... FROM ... LEFT JOIN ...` up to, but not including, WHERE.
    fn select_from(&self) -> String {
        let alias = self.target().alias();
        format!(
            "SELECT {alias}.*, \
             COALESCE(JSON_AGG(JSON_BUILD_OBJECT('category', JSON_BUILD_OBJECT(\
             'id', c.id, 'name', c.name, 'user_id', c.user_id, \
             'created_at', c.created_at, 'updated_at', c.updated_at)) ORDER BY c.name) \
             FILTER (WHERE c.id IS NOT NULL), '[]') AS {categories} \
             FROM {table} {alias} \
             LEFT JOIN {join} lc ON lc.{join_column} = {alias}.id \
             LEFT JOIN categories c ON c.id = lc.category_id",
            alias = alias,
            categories = self.categories_column(),
            table = self.table(),
            join = self.target().join_table(),
            join_column = self.target().join_column(),
        )
    }

    /// Page query: filter parameters first, then limit and offset.
    pub fn page_sql(&self, spec: &FilterSpec, pagination: &Pagination) -> SqlResult {
        let mut sql = self.filter.build(spec);
        let where_clause = sql.where_clause();
        let limit_offset = pagination.bind(&mut sql);
        let alias = self.target().alias();
        sql.query = format!(
            "{} {} GROUP BY {alias}.id ORDER BY {alias}.created_at DESC, {alias}.id DESC {}",
            self.select_from(),
            where_clause,
            limit_offset,
            alias = alias,
        );
        sql
    }

    pub fn count_sql(&self, spec: &FilterSpec) -> SqlResult {
        let mut sql = self.filter.build(spec);
        let alias = self.target().alias();
        sql.query = format!(
            "SELECT COUNT(DISTINCT {alias}.id) AS count FROM {table} {alias} {where_clause}",
            alias = alias,
            table = self.table(),
            where_clause = sql.where_clause(),
        );
        sql
    }

    /// Single row by id, categories embedded.
    pub fn by_id_sql(&self) -> String {
        let alias = self.target().alias();
        format!(
            "{} WHERE {alias}.id = $1 GROUP BY {alias}.id",
            self.select_from(),
            alias = alias
        )
    }

    pub async fn select_page(
        &self,
        pool: &PgPool,
        spec: &FilterSpec,
        pagination: Pagination,
    ) -> Result<Paginated<T>, DatabaseError> {
        let total = self.count(pool, spec).await?;

        let sql_result = self.page_sql(spec, &pagination);
        let data = sqlx::query_as_with::<_, T, _>(&sql_result.query, arguments(&sql_result.params))
            .fetch_all(pool)
            .await?;

        Ok(Paginated {
            data,
            pagination: pagination.meta(total),
        })
    }

    pub async fn count(&self, pool: &PgPool, spec: &FilterSpec) -> Result<i64, DatabaseError> {
        let sql_result = self.count_sql(spec);
        let count: i64 = sqlx::query_scalar_with(&sql_result.query, arguments(&sql_result.params))
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn select_optional(&self, conn: &mut PgConnection, id: i32) -> Result<Option<T>, DatabaseError> {
        let sql = self.by_id_sql();
        let row = sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(conn).await?;
        Ok(row)
    }

    pub async fn select_404(&self, conn: &mut PgConnection, id: i32) -> Result<T, DatabaseError> {
        self.select_optional(conn, id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("{} {} not found", self.table(), id)))
    }
}

/// Bind parameters in placeholder order.
fn arguments(params: &[SqlParam]) -> PgArguments {
    let mut args = PgArguments::default();
    for param in params {
        match param {
            SqlParam::Int(v) => args.add(*v),
            SqlParam::Text(v) => args.add(v.clone()),
        }
    }
    args
}
