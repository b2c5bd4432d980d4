use serde::Deserialize;

/// A single photo hit returned by the search service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct SearchRecord {
    pub id: u64,
    #[serde(rename = "webformatURL")]
    pub image_url: String,
}

impl SearchRecord {
    pub fn new(id: u64, image_url: impl Into<String>) -> Self {
        Self {
            id,
            image_url: image_url.into(),
        }
    }
}

/// Ordered results of one successful search. Always replaced whole.
pub type ResultSet = Vec<SearchRecord>;

/// Response body of the search endpoint. Only `hits` is consumed.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<SearchRecord>,
}

impl From<SearchResponse> for ResultSet {
    fn from(response: SearchResponse) -> Self {
        response.hits
    }
}
