//! Query-filter builder
//!
//! Translates raw listing query parameters into WHERE/ORDER BY/LIMIT
//! fragments. All inputs are lenient: malformed or missing values degrade to
//! the documented defaults, and the sort column is allow-listed so nothing
//! from the query string reaches the SQL text unescaped.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::ListingQuery;

/// Page size cap for the public listing endpoint
pub const PUBLIC_MAX_LIMIT: i64 = 100;
/// Owners can ask for larger pages on their own listings
pub const OWNER_MAX_LIMIT: i64 = 200;

const DEFAULT_LIMIT: i64 = 10;

/// Sortable columns; anything else falls back to creation time
const SORT_COLUMNS: [&str; 7] = [
    "created_at",
    "rent",
    "title",
    "city",
    "bedrooms",
    "bathrooms",
    "area_sqft",
];

/// Resolved page/limit pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    /// Resolve raw `page`/`limit` strings, clamping to `[1, ∞)` and
    /// `[1, max_limit]` with defaults 1 and 10.
    pub fn resolve(page: Option<&str>, limit: Option<&str>, max_limit: i64) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, max_limit);

        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Resolved ORDER BY column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortParams {
    pub column: &'static str,
    pub direction: &'static str,
}

impl SortParams {
    /// Direction is ASC only on a case-insensitive exact "asc"; the column
    /// must be on the allow-list, otherwise creation time wins.
    pub fn resolve(sort: Option<&str>, order: Option<&str>) -> Self {
        let column = sort
            .map(str::trim)
            .and_then(|s| SORT_COLUMNS.iter().find(|c| **c == s))
            .copied()
            .unwrap_or("created_at");

        let direction = match order {
            Some(o) if o.trim().eq_ignore_ascii_case("asc") => "ASC",
            _ => "DESC",
        };

        Self { column, direction }
    }
}

/// Structured listing filter fed to both the COUNT and SELECT queries
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub search: Option<String>,
    pub city: Option<String>,
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub owner_id: Option<Uuid>,
}

impl ListingFilter {
    /// Filter for the public listing endpoint; status defaults to the
    /// publicly visible value.
    pub fn public(query: &ListingQuery) -> Self {
        Self {
            search: non_empty(&query.search),
            city: non_empty(&query.city),
            property_type: non_empty(&query.property_type),
            status: non_empty(&query.status).or_else(|| Some("ForSale".to_string())),
            owner_id: None,
        }
    }

    /// Filter scoped to one owner's listings; no default status
    pub fn owner(query: &ListingQuery, owner_id: Uuid) -> Self {
        Self {
            search: non_empty(&query.search),
            city: non_empty(&query.city),
            property_type: non_empty(&query.property_type),
            status: non_empty(&query.status),
            owner_id: Some(owner_id),
        }
    }

    /// Append the WHERE clause for this filter. The houses table must be
    /// aliased as `h` in the surrounding query.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push(" WHERE TRUE");

        if let Some(owner_id) = self.owner_id {
            qb.push(" AND h.owner_id = ");
            qb.push_bind(owner_id);
        }

        if let Some(status) = &self.status {
            qb.push(" AND h.status = ");
            qb.push_bind(status.clone());
        }

        if let Some(property_type) = &self.property_type {
            qb.push(" AND h.property_type = ");
            qb.push_bind(property_type.clone());
        }

        if let Some(city) = &self.city {
            qb.push(" AND h.city ILIKE ");
            qb.push_bind(contains_pattern(city));
        }

        if let Some(search) = &self.search {
            let pattern = contains_pattern(search);
            qb.push(" AND (h.title ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR h.address ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR h.city ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR h.description ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
    }
}

/// An empty or whitespace-only parameter counts as absent
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Build a `%...%` pattern with LIKE metacharacters escaped
fn contains_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ListingQuery {
        let mut q = ListingQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "search" => q.search = value,
                "city" => q.city = value,
                "property_type" => q.property_type = value,
                "status" => q.status = value,
                "sort" => q.sort = value,
                "order" => q.order = value,
                "page" => q.page = value,
                "limit" => q.limit = value,
                _ => unreachable!(),
            }
        }
        q
    }

    #[test]
    fn page_params_clamp_and_default() {
        let p = PageParams::resolve(None, None, PUBLIC_MAX_LIMIT);
        assert_eq!(p, PageParams { page: 1, limit: 10 });

        let p = PageParams::resolve(Some("0"), Some("500"), PUBLIC_MAX_LIMIT);
        assert_eq!(
            p,
            PageParams {
                page: 1,
                limit: 100
            }
        );

        let p = PageParams::resolve(Some("-3"), Some("0"), PUBLIC_MAX_LIMIT);
        assert_eq!(p, PageParams { page: 1, limit: 1 });

        // malformed values degrade to defaults instead of erroring
        let p = PageParams::resolve(Some("abc"), Some("ten"), PUBLIC_MAX_LIMIT);
        assert_eq!(p, PageParams { page: 1, limit: 10 });

        let p = PageParams::resolve(Some("3"), Some("150"), OWNER_MAX_LIMIT);
        assert_eq!(
            p,
            PageParams {
                page: 3,
                limit: 150
            }
        );
        assert_eq!(p.offset(), 300);
    }

    #[test]
    fn sort_params_allow_list() {
        let s = SortParams::resolve(Some("rent"), Some("asc"));
        assert_eq!(s.column, "rent");
        assert_eq!(s.direction, "ASC");

        let s = SortParams::resolve(Some("rent"), Some("ASC"));
        assert_eq!(s.direction, "ASC");

        // anything that is not exactly "asc" sorts descending
        let s = SortParams::resolve(Some("title"), Some("ascending"));
        assert_eq!(s.direction, "DESC");

        // unknown columns fall back to creation time
        let s = SortParams::resolve(Some("password_hash"), None);
        assert_eq!(s.column, "created_at");
        assert_eq!(s.direction, "DESC");

        let s = SortParams::resolve(None, None);
        assert_eq!(s.column, "created_at");
        assert_eq!(s.direction, "DESC");
    }

    #[test]
    fn public_filter_defaults_status() {
        let f = ListingFilter::public(&query(&[]));
        assert_eq!(f.status.as_deref(), Some("ForSale"));

        let f = ListingFilter::public(&query(&[("status", "Sold")]));
        assert_eq!(f.status.as_deref(), Some("Sold"));

        // an empty parameter counts as absent, so the default still applies
        let f = ListingFilter::public(&query(&[("status", ""), ("city", " ")]));
        assert_eq!(f.status.as_deref(), Some("ForSale"));
        assert_eq!(f.city, None);
    }

    #[test]
    fn owner_filter_has_no_default_status() {
        let owner_id = Uuid::new_v4();
        let f = ListingFilter::owner(&query(&[]), owner_id);
        assert_eq!(f.status, None);
        assert_eq!(f.owner_id, Some(owner_id));
    }

    #[test]
    fn where_clause_contains_expected_fragments() {
        let f = ListingFilter::public(&query(&[
            ("search", "lake view"),
            ("city", "Pune"),
            ("property_type", "Apartment"),
        ]));

        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM houses h");
        f.push_where(&mut qb);
        let sql = qb.sql();

        assert!(sql.contains("h.status ="));
        assert!(sql.contains("h.property_type ="));
        assert!(sql.contains("h.city ILIKE"));
        assert!(sql.contains("h.title ILIKE"));
        assert!(sql.contains("h.description ILIKE"));
    }

    #[test]
    fn empty_filter_is_just_where_true() {
        let f = ListingFilter::default();
        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM houses h");
        f.push_where(&mut qb);
        assert_eq!(qb.sql(), "SELECT COUNT(*) FROM houses h WHERE TRUE");
    }

    #[test]
    fn like_patterns_are_escaped() {
        assert_eq!(contains_pattern("50%"), "%50\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c\\d"), "%c\\\\d%");
    }
}
