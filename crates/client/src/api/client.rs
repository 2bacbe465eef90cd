//! CRUD API request builder/invoker.
//!
//! Five stateless operations over a shared pooled HTTP client. URI building
//! goes through [`url::Url`], so path variables and query values are
//! percent-encoded; an embedded `/` in a path variable stays a single
//! segment instead of splitting the path.

use memberlink_domain::{Member, MemberLinkError, Result, ServiceConfig};
use reqwest::header::HeaderMap;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::errors::ClientError;
use crate::http::HttpClient;

/// Name of the custom header attached by
/// [`CrudApiClient::submit_with_header`].
pub const MY_HEADER: &str = "my-header";

/// Full response envelope returned by the POST operations.
#[derive(Debug, Clone)]
pub struct ResponseEnvelope<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: T,
}

/// Client for the member CRUD API.
///
/// Holds a shared [`HttpClient`] and the parsed base URL; operations are
/// independent and keep no state between calls.
#[derive(Clone)]
pub struct CrudApiClient {
    http: HttpClient,
    base_url: Url,
}

impl CrudApiClient {
    /// Create a client for the service described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `MemberLinkError::Config` if the base URL does not parse or
    /// cannot carry a path.
    pub fn new(http: HttpClient, config: &ServiceConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|err| MemberLinkError::Config(format!("invalid base URL: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(MemberLinkError::Config(format!(
                "base URL cannot carry a path: {base_url}"
            )));
        }
        Ok(Self { http, base_url })
    }

    /// GET `/api/v1/crud-api`, returning the raw text body.
    #[instrument(skip(self))]
    pub async fn fetch_plain(&self) -> Result<String> {
        let url = self.endpoint(&[])?;
        self.get_text(url).await
    }

    /// GET `/api/v1/crud-api/{name}` with `name` substituted into the path.
    ///
    /// Reserved characters in `name` are percent-encoded; an embedded `/`
    /// becomes `%2F` instead of adding a path segment.
    #[instrument(skip(self))]
    pub async fn fetch_by_path_variable(&self, name: &str) -> Result<String> {
        let url = self.endpoint(&[name])?;
        self.get_text(url).await
    }

    /// GET `/api/v1/crud-api/param?name=<value>`.
    #[instrument(skip(self))]
    pub async fn fetch_by_query_parameter(&self, name: &str) -> Result<String> {
        let mut url = self.endpoint(&["param"])?;
        url.query_pairs_mut().append_pair("name", name);
        self.get_text(url).await
    }

    /// POST `/api/v1/crud-api?name=..&email=..&organization=..` with `body`
    /// serialized as JSON, returning the full response envelope.
    #[instrument(skip(self, query, body))]
    pub async fn submit_with_query_and_body(
        &self,
        query: &Member,
        body: &Member,
    ) -> Result<ResponseEnvelope<Member>> {
        let mut url = self.endpoint(&[])?;
        url.query_pairs_mut()
            .append_pair("name", &query.name)
            .append_pair("email", &query.email)
            .append_pair("organization", &query.organization);

        let request = self.http.request(Method::POST, url).json(body);
        self.exchange(request).await
    }

    /// POST `/api/v1/crud-api/add-header` with `my-header: <value>` and a
    /// JSON `Member` body, returning the full response envelope.
    #[instrument(skip(self, body))]
    pub async fn submit_with_header(
        &self,
        value: &str,
        body: &Member,
    ) -> Result<ResponseEnvelope<Member>> {
        let url = self.endpoint(&["add-header"])?;
        let request = self.http.request(Method::POST, url).header(MY_HEADER, value).json(body);
        self.exchange(request).await
    }

    /// Build `{base}/api/v1/crud-api[/extra..]`, encoding each extra segment.
    fn endpoint(&self, extra: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                MemberLinkError::Config(format!("base URL cannot carry a path: {}", self.base_url))
            })?;
            segments.pop_if_empty();
            segments.extend(["api", "v1", "crud-api"]);
            segments.extend(extra);
        }
        Ok(url)
    }

    async fn get_text(&self, url: Url) -> Result<String> {
        let response = self.http.send(self.http.request(Method::GET, url)).await?;
        let response = check_status(response).await?;
        response.text().await.map_err(|err| {
            let err: ClientError = err.into();
            MemberLinkError::from(err)
        })
    }

    async fn exchange<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ResponseEnvelope<T>> {
        let response = self.http.send(request).await?;
        let response = check_status(response).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await.map_err(|err| {
            let err: ClientError = err.into();
            MemberLinkError::from(err)
        })?;
        let body = serde_json::from_str(&text)
            .map_err(|err| MemberLinkError::Deserialization(err.to_string()))?;

        debug!(%status, "parsed response envelope");
        Ok(ResponseEnvelope { status, headers, body })
    }
}

/// Map non-2xx responses to `MemberLinkError::Http`.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(MemberLinkError::Http { status: status.as_u16(), body })
}
