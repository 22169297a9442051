// src/api/client.rs
//! Pure HTTP client wrapper for Notion API.
//!
//! This module provides a thin wrapper around reqwest for making
//! HTTP requests to the Notion API. It handles authentication and
//! endpoint construction; parsing lives in [`super::parser`].

use super::parser;
use super::types::PaginatedResponse;
use super::NotionRepository;
use crate::constants::{NOTION_API_BASE_URL, NOTION_API_PAGE_SIZE, NOTION_API_VERSION};
use crate::error::AppError;
use crate::model::{Block, PageMetadata};
use crate::types::{ApiKey, DocumentId};
use reqwest::{header, Client, Response};
use url::Url;

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: Url,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(api_key: &ApiKey) -> Result<Self, AppError> {
        let base_url = Url::parse(NOTION_API_BASE_URL).map_err(|e| AppError::InternalError {
            message: format!("Invalid Notion API base URL: {}", NOTION_API_BASE_URL),
            source: Some(Box::new(e)),
        })?;
        Self::with_base_url(api_key, base_url)
    }

    /// Creates a client that talks to a different API root, such as a local stub.
    pub fn with_base_url(api_key: &ApiKey, mut base_url: Url) -> Result<Self, AppError> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_API_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Resolves an endpoint path against the API root.
    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        self.base_url.join(path).map_err(|e| AppError::InternalError {
            message: format!("Invalid endpoint path: {}", path),
            source: Some(Box::new(e)),
        })
    }

    /// Makes a GET request to the specified URL.
    pub async fn get(&self, url: Url) -> Result<Response, AppError> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        log::debug!("{} {}", response.status(), response.url());
        Ok(response)
    }
}

#[async_trait::async_trait]
impl NotionRepository for NotionHttpClient {
    async fn retrieve_page(&self, id: &DocumentId) -> Result<PageMetadata, AppError> {
        let url = self.endpoint(&format!("pages/{}", id.to_hyphenated()))?;
        let response = self.get(url).await?;
        let result = extract_response_text(response).await?;
        parser::parse_page_response(result)
    }

    async fn retrieve_children_page(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        let mut url = self.endpoint(&format!("blocks/{}/children", block_id))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page_size", &NOTION_API_PAGE_SIZE.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("start_cursor", cursor);
            }
        }
        let response = self.get(url).await?;
        let result = extract_response_text(response).await?;
        parser::parse_children_response(result)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ApiKey {
        ApiKey::new("secret_abcdefghijklmnopqrstuvwxyz").unwrap()
    }

    #[test]
    fn endpoints_resolve_under_the_versioned_root() {
        let client = NotionHttpClient::new(&key()).unwrap();
        let url = client.endpoint("pages/abc").unwrap();
        assert_eq!(url.as_str(), "https://api.notion.com/v1/pages/abc");
    }

    #[test]
    fn custom_roots_gain_a_trailing_slash() {
        let root = Url::parse("http://127.0.0.1:9999/notion").unwrap();
        let client = NotionHttpClient::with_base_url(&key(), root).unwrap();
        let url = client.endpoint("blocks/b/children").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9999/notion/blocks/b/children");
    }
}
