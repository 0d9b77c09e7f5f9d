use serde::Deserialize;

use crate::upstream::SearchParams;

pub const DEFAULT_COUNT: u32 = 5;
pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_count() -> u32 {
    DEFAULT_COUNT
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl From<SearchRequest> for SearchParams {
    fn from(request: SearchRequest) -> Self {
        SearchParams {
            query: request.query,
            count: request.count,
            language: request.language,
        }
    }
}
