use serde::Serialize;

use super::types::SqlResult;

/// Page window for list endpoints. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Lenient parse: missing, unparseable or non-positive values fall back to
    /// the defaults, and `limit` is capped at `max_limit`.
    pub fn from_query(page: Option<&str>, limit: Option<&str>, default_limit: i64, max_limit: i64) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|s| s.trim().parse::<i64>().ok()).filter(|n| *n > 0);

        let page = parse(page).unwrap_or(1);
        let limit = parse(limit).unwrap_or(default_limit).min(max_limit.max(1));
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Bind limit and offset after every filter parameter and return the
    /// `LIMIT $n OFFSET $m` clause.
    pub fn bind(&self, sql: &mut SqlResult) -> String {
        let limit = sql.bind(self.limit);
        let offset = sql.bind(self.offset());
        format!("LIMIT {} OFFSET {}", limit, offset)
    }

    pub fn meta(&self, total: i64) -> PaginationMeta {
        let total_pages = if self.limit > 0 { (total + self.limit - 1) / self.limit } else { 0 };
        PaginationMeta {
            page: self.page,
            limit: self.limit,
            total,
            total_pages,
            has_next_page: self.page < total_pages,
            has_prev_page: self.page > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

/// One page of results plus its pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}
