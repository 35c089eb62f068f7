//! Thin reqwest client for the Elasticsearch REST API.
//!
//! Owns transport concerns only: URL building, basic auth, refresh policy,
//! status mapping, and JSON decoding. Every write waits for a refresh so the
//! next read observes it.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use super::dto::{
    CountResponseDto, ErrorResponseDto, GetResponseDto, IndexResponseDto, SearchResponseDto,
    SumResponseDto,
};
use crate::domain::ports::DocumentStoreError;

const REFRESH: (&str, &str) = ("refresh", "wait_for");

/// Connection settings for the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElasticsearchConfig {
    /// Cluster base URL.
    pub url: Url,
    /// Basic-auth user.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Shared HTTP client bound to one cluster.
#[derive(Clone)]
pub struct ElasticsearchClient {
    client: Client,
    base: Url,
    username: Option<String>,
    password: Option<String>,
}

impl ElasticsearchClient {
    /// Build a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: ElasticsearchConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base: config.url,
            username: config.username,
            password: config.password,
        })
    }

    pub(super) fn endpoint(&self, segments: &[&str]) -> Result<Url, DocumentStoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                DocumentStoreError::connection(format!(
                    "document store URL cannot be a base: {}",
                    self.base
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, DocumentStoreError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "document store request");
        let builder = self.client.request(method, url);
        Ok(match &self.username {
            Some(user) => builder.basic_auth(user, self.password.as_deref()),
            None => builder,
        })
    }

    async fn send(builder: RequestBuilder) -> Result<Response, DocumentStoreError> {
        builder.send().await.map_err(map_transport_error)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, DocumentStoreError> {
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        decode_body(body.as_ref())
    }

    /// Store a document under a generated id.
    pub async fn index_document<T: Serialize + ?Sized>(
        &self,
        index: &str,
        document: &T,
    ) -> Result<String, DocumentStoreError> {
        let request = self
            .request(Method::POST, &[index, "_doc"])?
            .query(&[REFRESH])
            .json(document);
        let created: IndexResponseDto = Self::decode(Self::send(request).await?).await?;
        Ok(created.id)
    }

    /// Store a document under a caller-chosen id.
    pub async fn put_document<T: Serialize + ?Sized>(
        &self,
        index: &str,
        id: &str,
        document: &T,
    ) -> Result<(), DocumentStoreError> {
        let request = self
            .request(Method::PUT, &[index, "_doc", id])?
            .query(&[REFRESH])
            .json(document);
        let _: IndexResponseDto = Self::decode(Self::send(request).await?).await?;
        Ok(())
    }

    /// Fetch one document; `None` when absent.
    pub async fn get_document<T: DeserializeOwned>(
        &self,
        index: &str,
        id: &str,
    ) -> Result<Option<(String, T)>, DocumentStoreError> {
        let response = Self::send(self.request(Method::GET, &[index, "_doc", id])?).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let found: GetResponseDto<T> = Self::decode(response).await?;
        Ok(match (found.found, found.source) {
            (true, Some(source)) => Some((found.id, source)),
            _ => None,
        })
    }

    /// Run a search and return `(id, source)` pairs in hit order.
    pub async fn search<T: DeserializeOwned>(
        &self,
        index: &str,
        body: &Value,
    ) -> Result<Vec<(String, T)>, DocumentStoreError> {
        let request = self.request(Method::POST, &[index, "_search"])?.json(body);
        let found: SearchResponseDto<T> = Self::decode(Self::send(request).await?).await?;
        Ok(found.hits.hits.into_iter().map(|hit| hit.into_pair()).collect())
    }

    /// Count documents matching `query`.
    pub async fn count(&self, index: &str, query: &Value) -> Result<u64, DocumentStoreError> {
        let request = self
            .request(Method::POST, &[index, "_count"])?
            .json(&json!({ "query": query }));
        let counted: CountResponseDto = Self::decode(Self::send(request).await?).await?;
        Ok(counted.count)
    }

    /// Sum `field` over documents matching `query`.
    pub async fn sum(
        &self,
        index: &str,
        query: &Value,
        field: &str,
    ) -> Result<f64, DocumentStoreError> {
        let request = self
            .request(Method::POST, &[index, "_search"])?
            .json(&sum_body(query, field));
        let summed: SumResponseDto = Self::decode(Self::send(request).await?).await?;
        Ok(summed.aggregations.total.value.unwrap_or(0.0))
    }

    /// Merge `doc` into an existing document; `false` when absent.
    pub async fn update_document<T: Serialize + ?Sized>(
        &self,
        index: &str,
        id: &str,
        doc: &T,
    ) -> Result<bool, DocumentStoreError> {
        let request = self
            .request(Method::POST, &[index, "_update", id])?
            .query(&[REFRESH])
            .json(&json!({ "doc": doc }));
        let response = Self::send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        let _: Value = Self::decode(response).await?;
        Ok(true)
    }

    /// Delete a document; `false` when absent.
    pub async fn delete_document(&self, index: &str, id: &str) -> Result<bool, DocumentStoreError> {
        let request = self
            .request(Method::DELETE, &[index, "_doc", id])?
            .query(&[REFRESH]);
        let response = Self::send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        let _: Value = Self::decode(response).await?;
        Ok(true)
    }

    /// Create `index` with `mappings` unless it already exists.
    ///
    /// Returns `true` when the index was created.
    pub async fn ensure_index(&self, index: &str, mappings: &Value) -> Result<bool, DocumentStoreError> {
        let exists = Self::send(self.request(Method::HEAD, &[index])?).await?;
        if exists.status().is_success() {
            return Ok(false);
        }
        if exists.status() != StatusCode::NOT_FOUND {
            return Err(map_status_error(exists.status(), &[]));
        }

        let request = self
            .request(Method::PUT, &[index])?
            .json(&json!({ "mappings": mappings }));
        let response = Self::send(request).await?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status.is_success() {
            return Ok(true);
        }
        if is_already_exists(body.as_ref()) {
            return Ok(false);
        }
        Err(map_status_error(status, body.as_ref()))
    }
}

pub(super) fn sum_body(query: &Value, field: &str) -> Value {
    json!({
        "size": 0,
        "query": query,
        "aggs": { "total": { "sum": { "field": field } } },
    })
}

pub(super) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, DocumentStoreError> {
    serde_json::from_slice(body).map_err(|error| {
        DocumentStoreError::decode(format!("invalid document store payload: {error}"))
    })
}

fn is_already_exists(body: &[u8]) -> bool {
    serde_json::from_slice::<ErrorResponseDto>(body)
        .is_ok_and(|envelope| envelope.error.kind == "resource_already_exists_exception")
}

fn map_transport_error(error: reqwest::Error) -> DocumentStoreError {
    DocumentStoreError::connection(error.to_string())
}

pub(super) fn map_status_error(status: StatusCode, body: &[u8]) -> DocumentStoreError {
    let reason = serde_json::from_slice::<ErrorResponseDto>(body)
        .map(|envelope| match envelope.error.reason {
            Some(reason) => format!("{}: {reason}", envelope.error.kind),
            None => envelope.error.kind,
        })
        .unwrap_or_else(|_| body_preview(body));
    let message = if reason.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {reason}", status.as_u16())
    };

    match status {
        StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT
        | StatusCode::BAD_GATEWAY
        | StatusCode::TOO_MANY_REQUESTS
        | StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN => DocumentStoreError::connection(message),
        _ => DocumentStoreError::query(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn client(url: &str) -> ElasticsearchClient {
        ElasticsearchClient::new(ElasticsearchConfig {
            url: Url::parse(url).expect("url"),
            username: None,
            password: None,
            timeout: Duration::from_secs(1),
        })
        .expect("client")
    }

    #[rstest]
    #[case("http://localhost:9200", "http://localhost:9200/payments/_doc/a%2Fb")]
    #[case("http://localhost:9200/", "http://localhost:9200/payments/_doc/a%2Fb")]
    #[case("https://es.example.com/prefix/", "https://es.example.com/prefix/payments/_doc/a%2Fb")]
    fn endpoint_appends_escaped_segments(#[case] base: &str, #[case] expected: &str) {
        let url = client(base)
            .endpoint(&["payments", "_doc", "a/b"])
            .expect("endpoint");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case(StatusCode::SERVICE_UNAVAILABLE, true)]
    #[case(StatusCode::UNAUTHORIZED, true)]
    #[case(StatusCode::BAD_REQUEST, false)]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, false)]
    fn maps_statuses(#[case] status: StatusCode, #[case] connection: bool) {
        let error = map_status_error(status, b"");
        assert_eq!(
            matches!(error, DocumentStoreError::Connection { .. }),
            connection
        );
    }

    #[test]
    fn status_errors_surface_elasticsearch_reason() {
        let body = br#"{"error":{"type":"index_not_found_exception","reason":"no such index [payments]"},"status":404}"#;
        let error = map_status_error(StatusCode::NOT_FOUND, body);
        assert_eq!(
            error.to_string(),
            "document store query failed: status 404: index_not_found_exception: no such index [payments]"
        );
    }

    #[test]
    fn recognises_concurrent_index_creation() {
        let body = br#"{"error":{"type":"resource_already_exists_exception","reason":"index [users/abc] already exists"},"status":400}"#;
        assert!(is_already_exists(body));
        assert!(!is_already_exists(b"{}"));
    }

    #[test]
    fn sum_body_requests_no_hits() {
        let body = sum_body(&json!({"match_all": {}}), "amount");
        assert_eq!(body["size"], 0);
        assert_eq!(body["aggs"]["total"]["sum"]["field"], "amount");
    }

    #[test]
    fn decodes_search_hits() {
        let body = br#"{"hits":{"total":{"value":1},"hits":[{"_id":"n-1","_source":{"read":false}}]}}"#;
        let decoded: SearchResponseDto<Value> = decode_body(body).expect("decode");
        let pairs: Vec<_> = decoded.hits.hits.into_iter().map(|hit| hit.into_pair()).collect();
        assert_eq!(pairs, vec![("n-1".to_owned(), json!({"read": false}))]);
    }

    #[test]
    fn rejects_malformed_payloads() {
        let error = decode_body::<CountResponseDto>(b"not json").expect_err("decode");
        assert!(matches!(error, DocumentStoreError::Decode { .. }));
    }
}
