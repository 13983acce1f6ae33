use super::types::{SqlParam, SqlResult};

/// Accumulates AND-ed predicate fragments together with their parameters.
///
/// A fragment is rendered from the placeholders of the values it binds, so a
/// fragment and its parameters are always added as a pair and placeholder
/// numbers follow parameter order.
#[derive(Debug, Default)]
pub struct FilterWhere {
    fragments: Vec<String>,
    sql: SqlResult,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one fragment binding `values`; `render` receives their placeholders.
    pub fn push<F>(&mut self, values: Vec<SqlParam>, render: F) -> &mut Self
    where
        F: FnOnce(&[String]) -> String,
    {
        let placeholders: Vec<String> = values.into_iter().map(|v| self.sql.bind(v)).collect();
        self.fragments.push(render(&placeholders));
        self
    }

    /// `column = $n`
    pub fn push_eq(&mut self, column: &str, value: impl Into<SqlParam>) -> &mut Self {
        self.push(vec![value.into()], |p| format!("{} = {}", column, p[0]))
    }

    /// Case-insensitive substring match over several columns, OR-ed, sharing
    /// one placeholder.
    pub fn push_search(&mut self, columns: &[&str], text: &str) -> &mut Self {
        let pattern = format!("%{}%", escape_like(&text.to_lowercase()));
        self.push(vec![SqlParam::from(pattern)], |p| {
            let ors: Vec<String> = columns
                .iter()
                .map(|c| format!("LOWER({}) LIKE {}", c, p[0]))
                .collect();
            format!("({})", ors.join(" OR "))
        })
    }

    /// `EXISTS (SELECT 1 FROM join_table WHERE join_column = owner AND category_id IN (...))`
    pub fn push_exists_in(
        &mut self,
        join_table: &str,
        join_column: &str,
        owner_column: &str,
        ids: &[i64],
    ) -> &mut Self {
        if ids.is_empty() {
            return self;
        }
        let values = ids.iter().map(|id| SqlParam::from(*id)).collect();
        self.push(values, |p| {
            format!(
                "EXISTS (SELECT 1 FROM {jt} jt WHERE jt.{jc} = {owner} AND jt.category_id IN ({ids}))",
                jt = join_table,
                jc = join_column,
                owner = owner_column,
                ids = p.join(", ")
            )
        })
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Join fragments with AND. No fragments yields an empty predicate.
    pub fn finish(self) -> SqlResult {
        SqlResult {
            query: self.fragments.join(" AND "),
            params: self.sql.params,
        }
    }
}

/// Escape LIKE metacharacters so user text matches literally.
fn escape_like(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
