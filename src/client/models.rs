//! Backend wire models that are not domain records

use serde::Deserialize;

use crate::domain::User;

/// Response of `POST /auth/telegram`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
    /// Issued by deployments that hand out bearer tokens at login
    #[serde(default)]
    pub access_token: Option<String>,
}

/// Query string for `GET /accounts`
///
/// Translates the caller-facing 1-based page into the server's `skip` offset.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub skip: usize,
    pub limit: usize,
    pub search: Option<String>,
}

impl ListingQuery {
    pub fn new(page: u32, page_size: usize, search: &str) -> Self {
        let page = page.max(1) as usize;
        let search = search.trim();
        ListingQuery {
            skip: (page - 1) * page_size,
            limit: page_size,
            search: (!search.is_empty()).then(|| search.to_string()),
        }
    }

    /// Encode as a URL query string (without the leading `?`)
    pub fn to_query_string(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        serializer.append_pair("skip", &self.skip.to_string());
        if let Some(search) = &self.search {
            serializer.append_pair("search", search);
        }
        serializer.append_pair("limit", &self.limit.to_string());
        serializer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_translates_to_skip() {
        assert_eq!(ListingQuery::new(1, 100, "").skip, 0);
        assert_eq!(ListingQuery::new(3, 100, "").skip, 200);
        // Page 0 is treated as the first page
        assert_eq!(ListingQuery::new(0, 100, "").skip, 0);
    }

    #[test]
    fn test_query_string_encodes_search() {
        let query = ListingQuery::new(2, 100, "  cs go & more ");
        assert_eq!(query.to_query_string(), "skip=100&search=cs+go+%26+more&limit=100");
    }

    #[test]
    fn test_blank_search_is_omitted() {
        assert_eq!(ListingQuery::new(1, 100, "   ").to_query_string(), "skip=0&limit=100");
    }

    #[test]
    fn test_auth_response_without_token() {
        let response: AuthResponse = serde_json::from_str(
            r#"{"user":{"id":1,"telegram_id":42,"username":"neo","rating":0},"message":"Successfully authenticated"}"#,
        )
        .unwrap();

        assert!(response.access_token.is_none());
        assert_eq!(response.user.unwrap().telegram_id, Some(42));
    }
}
