use itertools::Itertools;
use reqwest::{Client, StatusCode, Url};

use crate::model::{Document, ResourceKind};
use crate::store::traits::SearchIndex;
use crate::store::{StoreError, StoreResult};

/// Client for the external full-text search service.
///
/// Resources live under `{base_url}/{kind}/`; a tag query is sent as
/// `?query=a OR b`.
#[derive(Debug, Clone)]
pub struct HttpSearchIndex {
    client: Client,
    base_url: String,
}

impl HttpSearchIndex {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn collection_url(&self, kind: ResourceKind) -> String {
        format!("{}/{}/", self.base_url, kind)
    }

    /// `{base_url}/{kind}/{id}` with the id percent-encoded as one path segment
    fn entry_url(&self, kind: ResourceKind, id: &str) -> StoreResult<Url> {
        if id.is_empty() || id == "." || id == ".." {
            return Err(StoreError::Malformed(format!(
                "{:?} is not a usable {} id",
                id, kind
            )));
        }
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| StoreError::Malformed(format!("search url {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                StoreError::Malformed(format!("search url {} cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .push(kind.as_str())
            .push(id);
        Ok(url)
    }
}

/// Turn a tag list into the search service's query syntax
pub fn query_string(tags: &[String]) -> String {
    tags.iter().join(" OR ")
}

async fn rejected(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    StoreError::rejected(status, body)
}

#[async_trait::async_trait]
impl SearchIndex for HttpSearchIndex {
    async fn put(&self, kind: ResourceKind, id: &str, projection: Document) -> StoreResult<()> {
        let response = self
            .client
            .post(self.collection_url(kind))
            .json(&projection)
            .send()
            .await?;

        if !response.status().is_success() {
            log::debug!("search index refused {} {}", kind, id);
            return Err(rejected(response).await);
        }
        Ok(())
    }

    async fn get(&self, kind: ResourceKind, id: &str) -> StoreResult<Option<Document>> {
        let response = self.client.get(self.entry_url(kind, id)?).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => Ok(Some(response.json::<Document>().await?)),
            _ => Err(rejected(response).await),
        }
    }

    async fn query(&self, kind: ResourceKind, tags: &[String]) -> StoreResult<Vec<Document>> {
        let mut request = self.client.get(self.collection_url(kind));
        if !tags.is_empty() {
            request = request.query(&[("query", query_string(tags))]);
        }
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(rejected(response).await);
        }
        Ok(response.json::<Vec<Document>>().await?)
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> StoreResult<bool> {
        let response = self.client.delete(self.entry_url(kind, id)?).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            _ => Err(rejected(response).await),
        }
    }
}
