use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::config::CatalogConfig;
use crate::models::{decode, SchemaViolation, SearchResponse};

use super::{CatalogClient, CatalogError, DetailsResponse, MovieDetails};

/// [`CatalogClient`] backed by the OMDb HTTP API.
#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl OmdbClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            CatalogError::new(500, format!("Invalid catalog url '{}': {}", config.base_url, e))
        })?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()
            .map_err(|e| CatalogError::new(500, format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    fn search_url(&self, title: &str, page: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("type", "movie")
            .append_pair("apikey", &self.api_key)
            .append_pair("s", title)
            .append_pair("page", &page.to_string());
        url
    }

    fn details_url(&self, imdb_id: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("i", imdb_id);
        url
    }

    /// GET `url` and return the JSON body of a successful response.
    async fn get_json(&self, url: Url, context: &str) -> Result<Value, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| CatalogError::transport(context, e))?;

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                CatalogError::invalid_payload(context, &SchemaViolation::new("$", e.to_string()))
            } else {
                CatalogError::transport(context, e)
            }
        })
    }
}

#[async_trait]
impl CatalogClient for OmdbClient {
    async fn search_by_title(
        &self,
        title: &str,
        page: u32,
    ) -> Result<SearchResponse, CatalogError> {
        let context = format!("Error searching movies by title = '{}'", title);
        let body = self.get_json(self.search_url(title, page), &context).await?;

        let response = decode::<SearchResponse>(body)
            .map_err(|violation| CatalogError::invalid_payload(&context, &violation))?;

        tracing::debug!(
            title = %title,
            page,
            total_results = response.total_results(),
            "Catalog search answered"
        );
        Ok(response)
    }

    async fn get_by_imdb_id(&self, imdb_id: &str) -> Result<MovieDetails, CatalogError> {
        let context = format!("Error fetching movie by imdbId = '{}'", imdb_id);
        let body = self.get_json(self.details_url(imdb_id), &context).await?;

        match decode::<DetailsResponse>(body) {
            Ok(DetailsResponse::Found(details)) => Ok(details),
            Ok(DetailsResponse::NotFound { error }) => Err(CatalogError::new(400, error)),
            Err(violation) => Err(CatalogError::invalid_payload(&context, &violation)),
        }
    }
}
