use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, NO_RESPONSE_STATUS};
use crate::models::{
    decode, ApiErrorResponse, ApiSuccessResponse, FavoriteMovie, SearchQuery, SearchResponse,
    SortOrder, Validate,
};

use super::MoviesApi;

/// HTTP implementation of [`MoviesApi`].
#[derive(Clone)]
pub struct HttpMoviesClient {
    client: Client,
    base_url: Url,
}

impl HttpMoviesClient {
    /// Create a client for the backend rooted at `base_url`.
    ///
    /// # Errors
    /// Returns a validation error when `base_url` is not an absolute
    /// http(s) URL or the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::Validation {
            message: format!("Invalid backend url '{}': {}", base_url, e),
            details: None,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Validation {
                message: format!("Backend url '{}' cannot be a base", base_url),
                details: None,
            });
        }

        // No client-side deadlines; callers cancel searches through tokens.
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::Validation {
                message: format!("Failed to build HTTP client: {}", e),
                details: None,
            })?;

        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in `new`, so segments are available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch<T>(&self, request: RequestBuilder) -> Result<T, ClientError>
    where
        T: DeserializeOwned + Validate,
    {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(error_from_response(status, &body));
        }

        let envelope: ApiSuccessResponse<Value> =
            serde_json::from_slice(&body).map_err(|e| ClientError::Validation {
                message: format!("Invalid api response: {}", e),
                details: None,
            })?;

        Ok(decode::<T>(envelope.data)?)
    }
}

#[async_trait]
impl MoviesApi for HttpMoviesClient {
    async fn search_movies(
        &self,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> Result<SearchResponse, ClientError> {
        let mut url = self.endpoint(&["movies", "search"]);
        url.query_pairs_mut()
            .append_pair("title", &query.title)
            .append_pair("page", &query.page.to_string());

        tracing::debug!(title = %query.title, page = query.page, "Searching movies");

        // Dropping the request future aborts the underlying connection.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            result = self.fetch::<SearchResponse>(self.client.get(url)) => result,
        }
    }

    async fn get_all_favorite_movies(
        &self,
        sort: Option<SortOrder>,
    ) -> Result<Vec<FavoriteMovie>, ClientError> {
        let mut url = self.endpoint(&["movies", "favorite"]);
        if let Some(order) = sort {
            url.query_pairs_mut().append_pair("sortByUpvotes", order.as_str());
        }
        self.fetch(self.client.get(url)).await
    }

    async fn create_or_upvote_favorite_movie(
        &self,
        imdb_id: &str,
    ) -> Result<FavoriteMovie, ClientError> {
        let url = self.endpoint(&["movies", "favorite", imdb_id, "createOrUpvote"]);
        self.fetch(self.client.post(url)).await
    }

    async fn upvote_favorite_movie(&self, imdb_id: &str) -> Result<FavoriteMovie, ClientError> {
        let url = self.endpoint(&["movies", "favorite", imdb_id, "upvote"]);
        self.fetch(self.client.patch(url)).await
    }
}

/// Map a request that produced no usable response.
fn transport_error(err: reqwest::Error) -> ClientError {
    ClientError::RemoteService {
        status: err
            .status()
            .map(|s| s.as_u16())
            .unwrap_or(NO_RESPONSE_STATUS),
        message: err.to_string(),
        details: None,
    }
}

/// Map a non-success response, preferring the backend's error envelope.
fn error_from_response(status: StatusCode, body: &[u8]) -> ClientError {
    let (code, message, details) = match serde_json::from_slice::<ApiErrorResponse>(body) {
        Ok(envelope) => (
            envelope.error.code,
            envelope.error.message,
            envelope.error.details,
        ),
        Err(_) => (
            status.as_u16(),
            format!("Request failed with status code {}", status.as_u16()),
            None,
        ),
    };

    if status == StatusCode::NOT_FOUND {
        return ClientError::NotFound { message };
    }

    ClientError::RemoteService {
        status: code,
        message,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_relative_url() {
        assert!(matches!(
            HttpMoviesClient::new("/movies"),
            Err(ClientError::Validation { .. })
        ));
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = HttpMoviesClient::new("http://127.0.0.1:3000/api/").unwrap();
        let url = client.endpoint(&["movies", "favorite", "tt 1/2", "upvote"]);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:3000/api/movies/favorite/tt%201%2F2/upvote"
        );
    }

    #[test]
    fn test_error_envelope_is_preferred() {
        let body = br#"{"error":{"code":400,"message":"Query params validation failed","details":{"page":["Must be positive integer"]}}}"#;
        let err = error_from_response(StatusCode::BAD_REQUEST, body);
        match err {
            ClientError::RemoteService {
                status,
                message,
                details,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Query params validation failed");
                assert!(details.is_some());
            }
            other => panic!("expected RemoteService, got {:?}", other),
        }
    }

    #[test]
    fn test_foreign_error_body_uses_http_status() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, b"<html>oops</html>");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn test_404_maps_to_not_found() {
        let body = br#"{"error":{"code":404,"message":"movie with imdbId = 'tt9999999' not found in DB"}}"#;
        let err = error_from_response(StatusCode::NOT_FOUND, body);
        assert_eq!(
            err,
            ClientError::NotFound {
                message: "movie with imdbId = 'tt9999999' not found in DB".to_string()
            }
        );
    }
}
