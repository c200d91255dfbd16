use url::form_urlencoded;

use crate::error::ApiError;

pub const DEFAULT_LIMIT: i64 = 20;

/// (skip, limit) window bounding a list query. Missing parameters default to
/// skip=0, limit=20. Non-integer or negative input is rejected with a 400
/// rather than silently coerced; no upper bound is enforced on `limit`.
///
/// Resolved by handlers after the access guard has passed, so an authorization
/// failure always wins over a malformed window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { skip: 0, limit: DEFAULT_LIMIT }
    }
}

impl Pagination {
    pub fn from_query(query: &str) -> Result<Self, ApiError> {
        let mut page = Pagination::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "skip" => {
                    page.skip = parse_i64(&value, "skip")?;
                    if page.skip < 0 {
                        return Err(ApiError::bad_request("skip must be a non-negative integer"));
                    }
                }
                "limit" => {
                    page.limit = parse_i64(&value, "limit")?;
                    if page.limit < 1 {
                        return Err(ApiError::bad_request("limit must be a positive integer"));
                    }
                }
                _ => {}
            }
        }
        Ok(page)
    }
}

pub fn parse_i64(value: &str, name: &str) -> Result<i64, ApiError> {
    value
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request(format!("{name} must be an integer")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent() {
        let page = Pagination::from_query("").unwrap();
        assert_eq!(page, Pagination { skip: 0, limit: 20 });
    }

    #[test]
    fn explicit_values_are_used() {
        let page = Pagination::from_query("skip=40&limit=10").unwrap();
        assert_eq!(page, Pagination { skip: 40, limit: 10 });
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let page = Pagination::from_query("cardId=3&skip=5").unwrap();
        assert_eq!(page.skip, 5);
        assert_eq!(page.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn no_upper_bound_on_limit() {
        let page = Pagination::from_query("limit=1000000").unwrap();
        assert_eq!(page.limit, 1_000_000);
    }

    #[test]
    fn non_numeric_input_is_rejected() {
        assert!(Pagination::from_query("skip=abc").is_err());
        assert!(Pagination::from_query("limit=abc").is_err());
    }

    #[test]
    fn negative_skip_is_rejected() {
        assert!(Pagination::from_query("skip=-1").is_err());
    }

    #[test]
    fn non_positive_limit_is_rejected() {
        assert!(Pagination::from_query("limit=0").is_err());
        assert!(Pagination::from_query("limit=-5").is_err());
    }
}
