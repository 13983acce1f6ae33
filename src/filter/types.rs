use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// An optional request field after parsing.
///
/// Keeps "the client never sent it" apart from "the client sent something we
/// could not use". Both end up as "no constraint" for filters, but callers that
/// need to tell them apart (e.g. replacing category links only when the field
/// was sent) can.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestField<T> {
    #[default]
    Absent,
    Invalid(String),
    Present(T),
}

impl<T> RequestField<T> {
    pub fn present(self) -> Option<T> {
        match self {
            RequestField::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            RequestField::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, RequestField::Absent)
    }
}

impl RequestField<Vec<i64>> {
    /// Parse a JSON-encoded id list such as `[1, 2]` or `["1", "2"]`.
    ///
    /// Blank input is absent. Anything that is not a list of integers is
    /// invalid as a whole; individual bad entries are not skipped.
    pub fn parse_id_list(raw: Option<&str>) -> Self {
        let raw = match raw.map(str::trim) {
            None | Some("") => return RequestField::Absent,
            Some(s) => s,
        };

        let values = match serde_json::from_str::<Vec<Value>>(raw) {
            Ok(values) => values,
            Err(_) => return RequestField::Invalid(raw.to_string()),
        };

        let mut ids = Vec::with_capacity(values.len());
        for value in &values {
            let id = match value {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            match id {
                Some(id) => ids.push(id),
                None => return RequestField::Invalid(raw.to_string()),
            }
        }
        RequestField::Present(ids)
    }
}

impl RequestField<ArtworkType> {
    pub fn parse_type(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => RequestField::Absent,
            Some(s) => match s.parse::<ArtworkType>() {
                Ok(t) => RequestField::Present(t),
                Err(_) => RequestField::Invalid(s.to_string()),
            },
        }
    }
}

/// Artwork classification stored in `artworks.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkType {
    #[default]
    Portfolio,
    Scratch,
}

impl ArtworkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtworkType::Portfolio => "portfolio",
            ArtworkType::Scratch => "scratch",
        }
    }
}

impl fmt::Display for ArtworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtworkType {
    type Err = String;

    // Exact match only; "Portfolio" is not a recognized value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "portfolio" => Ok(ArtworkType::Portfolio),
            "scratch" => Ok(ArtworkType::Scratch),
            other => Err(format!("unknown artwork type: {}", other)),
        }
    }
}

/// Constraints for a paginated list query. Every dimension is optional.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    pub search_text: Option<String>,
    pub type_filter: RequestField<ArtworkType>,
    pub category_ids: RequestField<Vec<i64>>,
    pub owner_user_id: Option<i32>,
}

impl FilterSpec {
    pub fn owned_by(mut self, user_id: i32) -> Self {
        self.owner_user_id = Some(user_id);
        self
    }
}

/// Which entity a list query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTarget {
    Artworks,
    Projects,
}

impl FilterTarget {
    pub fn alias(&self) -> &'static str {
        match self {
            FilterTarget::Artworks => "a",
            FilterTarget::Projects => "p",
        }
    }

    pub fn join_table(&self) -> &'static str {
        match self {
            FilterTarget::Artworks => "artwork_categories",
            FilterTarget::Projects => "project_categories",
        }
    }

    pub fn join_column(&self) -> &'static str {
        match self {
            FilterTarget::Artworks => "artwork_id",
            FilterTarget::Projects => "project_id",
        }
    }

    /// Projects have no type column.
    pub fn has_type_column(&self) -> bool {
        matches!(self, FilterTarget::Artworks)
    }
}

/// A bound query parameter. Filters only ever compare integers (ids, limit,
/// offset) and text (type, search pattern).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

impl From<i32> for SqlParam {
    fn from(v: i32) -> Self {
        SqlParam::Int(v.into())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

/// SQL text plus positional parameters, `$1` = `params[0]`.
#[derive(Debug, Clone, Default)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}

impl SqlResult {
    /// Append a parameter and return its placeholder.
    pub fn bind(&mut self, value: impl Into<SqlParam>) -> String {
        self.params.push(value.into());
        format!("${}", self.params.len())
    }

    /// `WHERE <predicate>` or an empty string when there are no constraints.
    pub fn where_clause(&self) -> String {
        if self.query.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.query)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_list_accepts_numbers_and_numeric_strings() {
        assert_eq!(
            RequestField::parse_id_list(Some("[1, \"2\", 3]")),
            RequestField::Present(vec![1, 2, 3])
        );
    }

    #[test]
    fn id_list_blank_is_absent() {
        assert_eq!(RequestField::parse_id_list(None), RequestField::Absent);
        assert_eq!(RequestField::parse_id_list(Some("   ")), RequestField::Absent);
    }

    #[test]
    fn id_list_malformed_is_invalid() {
        for raw in ["[1, 2", "{\"a\": 1}", "[1, \"x\"]", "[1.5]", "[null]", "7"] {
            assert!(
                matches!(RequestField::parse_id_list(Some(raw)), RequestField::Invalid(_)),
                "expected invalid for {}",
                raw
            );
        }
    }

    #[test]
    fn type_parse_is_exact() {
        assert_eq!(
            RequestField::parse_type(Some("scratch")),
            RequestField::Present(ArtworkType::Scratch)
        );
        assert_eq!(
            RequestField::parse_type(Some(" portfolio ")),
            RequestField::Present(ArtworkType::Portfolio)
        );
        assert!(matches!(RequestField::parse_type(Some("Portfolio")), RequestField::Invalid(_)));
        assert!(RequestField::parse_type(Some("")).is_absent());
    }

    #[test]
    fn sql_result_bind_numbers_placeholders_in_order() {
        let mut sql = SqlResult::default();
        assert_eq!(sql.bind(10), "$1");
        assert_eq!(sql.bind("x"), "$2");
        assert_eq!(sql.params, vec![SqlParam::Int(10), SqlParam::Text("x".into())]);
        assert_eq!(sql.where_clause(), "");
    }
}
