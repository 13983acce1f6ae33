use super::filter_where::FilterWhere;
use super::types::{FilterSpec, FilterTarget, RequestField, SqlResult};

/// Builds the WHERE predicate shared by the artwork and project listings.
#[derive(Debug, Clone, Copy)]
pub struct Filter {
    target: FilterTarget,
}

impl Filter {
    pub fn new(target: FilterTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> FilterTarget {
        self.target
    }

    /// Predicate and parameters for `spec`. Never fails: unusable optional
    /// input contributes no constraint.
    pub fn build(&self, spec: &FilterSpec) -> SqlResult {
        let alias = self.target.alias();
        let mut filter_where = FilterWhere::new();

        if let Some(user_id) = spec.owner_user_id {
            filter_where.push_eq(&format!("{}.user_id", alias), user_id);
        }

        if let Some(text) = spec.search_text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let title = format!("{}.title", alias);
            let description = format!("{}.description", alias);
            filter_where.push_search(&[title.as_str(), description.as_str()], text);
        }

        if self.target.has_type_column() {
            if let RequestField::Present(artwork_type) = &spec.type_filter {
                filter_where.push_eq(&format!("{}.type", alias), artwork_type.as_str());
            }
        }

        match &spec.category_ids {
            RequestField::Present(ids) => {
                filter_where.push_exists_in(
                    self.target.join_table(),
                    self.target.join_column(),
                    &format!("{}.id", alias),
                    ids,
                );
            }
            RequestField::Invalid(raw) => {
                tracing::debug!("Ignoring malformed categoryIds filter: {}", raw);
            }
            RequestField::Absent => {}
        }

        filter_where.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::ArtworkType;
    use crate::filter::types::SqlParam;

    fn placeholder_count(sql: &SqlResult) -> usize {
        // Distinct $n references; the search placeholder appears twice.
        let mut seen = std::collections::BTreeSet::new();
        let bytes = sql.query.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'$' {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end > start {
                    seen.insert(sql.query[start..end].parse::<usize>().unwrap());
                }
                i = end;
            } else {
                i += 1;
            }
        }
        // Placeholders must be exactly $1..$n
        assert_eq!(seen.iter().copied().collect::<Vec<_>>(), (1..=seen.len()).collect::<Vec<_>>());
        seen.len()
    }

    fn artworks() -> Filter {
        Filter::new(FilterTarget::Artworks)
    }

    #[test]
    fn no_constraints_matches_everything() {
        let sql = artworks().build(&FilterSpec::default());
        assert!(sql.query.is_empty());
        assert!(sql.params.is_empty());
        assert_eq!(sql.where_clause(), "");
    }

    #[test]
    fn malformed_category_ids_equal_absent() {
        let base = FilterSpec {
            search_text: Some("sketch".into()),
            owner_user_id: Some(3),
            ..Default::default()
        };
        let malformed = FilterSpec {
            category_ids: RequestField::parse_id_list(Some("[1, two]")),
            ..base.clone()
        };

        let a = artworks().build(&base);
        let b = artworks().build(&malformed);
        assert_eq!(a.query, b.query);
        assert_eq!(a.params, b.params);
    }

    #[test]
    fn blank_search_adds_no_predicate() {
        for text in ["", "   ", "\t\n"] {
            let spec = FilterSpec { search_text: Some(text.into()), ..Default::default() };
            let sql = artworks().build(&spec);
            assert!(sql.query.is_empty(), "search {:?} produced {}", text, sql.query);
        }
    }

    #[test]
    fn search_is_trimmed_and_lowercased() {
        let spec = FilterSpec { search_text: Some("  Blue Hour ".into()), ..Default::default() };
        let sql = artworks().build(&spec);
        assert_eq!(sql.query, "(LOWER(a.title) LIKE $1 OR LOWER(a.description) LIKE $1)");
        assert_eq!(sql.params, vec![SqlParam::from("%blue hour%")]);
    }

    #[test]
    fn unrecognized_type_is_ignored() {
        let spec = FilterSpec { type_filter: RequestField::parse_type(Some("gallery")), ..Default::default() };
        assert!(artworks().build(&spec).query.is_empty());
    }

    #[test]
    fn full_spec_orders_params_like_placeholders() {
        let spec = FilterSpec {
            search_text: Some("ink".into()),
            type_filter: RequestField::Present(ArtworkType::Scratch),
            category_ids: RequestField::Present(vec![5, 9]),
            owner_user_id: Some(42),
        };
        let sql = artworks().build(&spec);

        assert_eq!(
            sql.query,
            "a.user_id = $1 \
             AND (LOWER(a.title) LIKE $2 OR LOWER(a.description) LIKE $2) \
             AND a.type = $3 \
             AND EXISTS (SELECT 1 FROM artwork_categories jt WHERE jt.artwork_id = a.id AND jt.category_id IN ($4, $5))"
        );
        assert_eq!(
            sql.params,
            vec![
                SqlParam::from(42),
                SqlParam::from("%ink%"),
                SqlParam::from("scratch"),
                SqlParam::from(5),
                SqlParam::from(9)
            ]
        );
        assert_eq!(placeholder_count(&sql), sql.params.len());
    }

    #[test]
    fn projects_ignore_type_and_use_project_join() {
        let spec = FilterSpec {
            type_filter: RequestField::Present(ArtworkType::Portfolio),
            category_ids: RequestField::Present(vec![1]),
            ..Default::default()
        };
        let sql = Filter::new(FilterTarget::Projects).build(&spec);
        assert_eq!(
            sql.query,
            "EXISTS (SELECT 1 FROM project_categories jt WHERE jt.project_id = p.id AND jt.category_id IN ($1))"
        );
        assert_eq!(sql.params, vec![SqlParam::from(1)]);
    }

    #[test]
    fn placeholder_count_matches_params_across_combinations() {
        let searches = [None, Some(""), Some("x")];
        let types = [
            RequestField::Absent,
            RequestField::Invalid("bad".to_string()),
            RequestField::Present(ArtworkType::Portfolio),
        ];
        let categories = [
            RequestField::Absent,
            RequestField::Invalid("[".to_string()),
            RequestField::Present(vec![]),
            RequestField::Present(vec![1, 2, 3]),
        ];
        let owners = [None, Some(1)];

        for search in searches {
            for type_filter in types.iter().cloned() {
                for category_ids in categories.iter().cloned() {
                    for owner_user_id in owners {
                        let spec = FilterSpec {
                            search_text: search.map(str::to_string),
                            type_filter: type_filter.clone(),
                            category_ids: category_ids.clone(),
                            owner_user_id,
                        };
                        let sql = artworks().build(&spec);
                        assert_eq!(placeholder_count(&sql), sql.params.len(), "spec: {:?}", spec);
                    }
                }
            }
        }
    }
}
