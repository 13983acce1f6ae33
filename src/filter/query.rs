use serde::Deserialize;

use super::pagination::Pagination;
use super::types::{FilterSpec, RequestField};
use crate::config::ApiConfig;

/// Raw query string of the list endpoints.
///
/// Everything is taken as text so that a bad `page` or `categoryIds` never
/// rejects the request; interpretation happens in [`ListQuery::filter_spec`]
/// and [`ListQuery::pagination`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub artwork_type: Option<String>,
    pub category_ids: Option<String>,
}

impl ListQuery {
    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec {
            search_text: self.search.clone(),
            type_filter: RequestField::parse_type(self.artwork_type.as_deref()),
            category_ids: RequestField::parse_id_list(self.category_ids.as_deref()),
            owner_user_id: None,
        }
    }

    pub fn pagination(&self, api: &ApiConfig) -> Pagination {
        Pagination::from_query(
            self.page.as_deref(),
            self.limit.as_deref(),
            api.default_page_limit,
            api.max_page_limit,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::ArtworkType;

    #[test]
    fn deserializes_camel_case_query() {
        let q: ListQuery = serde_json::from_value(serde_json::json!({
            "page": "2",
            "search": "moon",
            "type": "scratch",
            "categoryIds": "[4]"
        }))
        .unwrap();

        let spec = q.filter_spec();
        assert_eq!(spec.search_text.as_deref(), Some("moon"));
        assert_eq!(spec.type_filter, RequestField::Present(ArtworkType::Scratch));
        assert_eq!(spec.category_ids, RequestField::Present(vec![4]));
        assert_eq!(spec.owner_user_id, None);
    }
}
