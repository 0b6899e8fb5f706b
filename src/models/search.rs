use serde::{Deserialize, Serialize};

use super::schema::{require_non_empty, require_poster, SchemaViolation, Validate};

/// Items per page returned by the catalog search endpoint.
pub const SERVER_PAGE_SIZE: u64 = 10;

/// Record type reported by the catalog. Searches are restricted to movies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    #[serde(rename = "movie")]
    Movie,
}

/// One search hit in the catalog's own shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchResultItem {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year")]
    pub year: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Type")]
    pub record_type: RecordType,
    /// Poster URL or the literal "N/A".
    #[serde(rename = "Poster")]
    pub poster: String,
}

impl Validate for SearchResultItem {
    fn validate(&self) -> Result<(), SchemaViolation> {
        require_non_empty("Title", &self.title)?;
        require_non_empty("Year", &self.year)?;
        require_non_empty("imdbID", &self.imdb_id)?;
        require_poster("Poster", &self.poster)
    }
}

/// Outcome of a catalog search, discriminated by the `Response` field.
///
/// `NoResults` is a business outcome ("Movie not found!", "Too many
/// results."), not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Response")]
pub enum SearchResponse {
    #[serde(rename = "True")]
    Found {
        #[serde(rename = "Search")]
        movies: Vec<SearchResultItem>,
        /// Total hits across all pages, as a decimal string.
        #[serde(rename = "totalResults")]
        total_results: String,
    },
    #[serde(rename = "False")]
    NoResults {
        #[serde(rename = "Error")]
        error: String,
    },
}

impl SearchResponse {
    /// Parsed total result count. Unparseable counts are treated as zero.
    pub fn total_results(&self) -> u64 {
        match self {
            SearchResponse::Found { total_results, .. } => {
                total_results.trim().parse().unwrap_or(0)
            }
            SearchResponse::NoResults { .. } => 0,
        }
    }
}

impl Validate for SearchResponse {
    fn validate(&self) -> Result<(), SchemaViolation> {
        match self {
            SearchResponse::Found {
                movies,
                total_results,
            } => {
                require_non_empty("totalResults", total_results)?;
                movies
                    .validate()
                    .map_err(|violation| violation.within("Search"))
            }
            SearchResponse::NoResults { error } => require_non_empty("Error", error),
        }
    }
}

/// Parameters of one search request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    pub title: String,
    /// 1-based page number.
    pub page: u32,
}

impl SearchQuery {
    pub fn new(title: impl Into<String>, page: u32) -> Self {
        Self {
            title: title.into(),
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schema::decode;
    use serde_json::json;

    #[test]
    fn test_decode_found() {
        let response: SearchResponse = decode(json!({
            "Response": "True",
            "Search": [{
                "Title": "Batman Begins",
                "Year": "2005",
                "imdbID": "tt0372784",
                "Type": "movie",
                "Poster": "https://m.media-amazon.com/images/M/batman.jpg"
            }],
            "totalResults": "23"
        }))
        .unwrap();

        assert_eq!(response.total_results(), 23);
        match response {
            SearchResponse::Found { movies, .. } => assert_eq!(movies[0].imdb_id, "tt0372784"),
            other => panic!("expected Found, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_no_results() {
        let response: SearchResponse = decode(json!({
            "Response": "False",
            "Error": "Movie not found!"
        }))
        .unwrap();
        assert_eq!(
            response,
            SearchResponse::NoResults {
                error: "Movie not found!".to_string()
            }
        );
    }

    #[test]
    fn test_decode_rejects_series_records() {
        let result = decode::<SearchResponse>(json!({
            "Response": "True",
            "Search": [{
                "Title": "Batman",
                "Year": "1966",
                "imdbID": "tt0059968",
                "Type": "series",
                "Poster": "N/A"
            }],
            "totalResults": "1"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_violation_path_points_into_search_array() {
        let err = decode::<SearchResponse>(json!({
            "Response": "True",
            "Search": [{
                "Title": "Batman",
                "Year": "1989",
                "imdbID": "",
                "Type": "movie",
                "Poster": "N/A"
            }],
            "totalResults": "1"
        }))
        .unwrap_err();
        assert_eq!(err.field, "Search[0].imdbID");
    }

    #[test]
    fn test_serializes_with_response_tag() {
        let value = serde_json::to_value(SearchResponse::NoResults {
            error: "Too many results.".to_string(),
        })
        .unwrap();
        assert_eq!(value, json!({"Response": "False", "Error": "Too many results."}));
    }
}
