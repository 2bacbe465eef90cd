use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use memberlink_domain::{MemberLinkError, PoolConfig, Result};
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, Url};
use tokio::sync::Semaphore;
use tracing::debug;

use crate::errors::ClientError;

/// HTTP client with a bounded connection pool and fixed timeouts.
///
/// Cloning is cheap and shares the underlying pool; build the client once
/// and hand clones to whoever issues requests. Dropping the last clone
/// releases the pool resources.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    total: Arc<Semaphore>,
    routes: Arc<Mutex<HashMap<String, Arc<Semaphore>>>>,
    max_total: usize,
    max_per_route: usize,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default pool limits and timeouts.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Build a client from a [`PoolConfig`].
    pub fn with_config(config: &PoolConfig) -> Result<Self> {
        Self::builder()
            .max_total_connections(config.max_total_connections)
            .max_connections_per_route(config.max_connections_per_route)
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder.
    ///
    /// Holds one total-pool permit and one per-route permit for the whole
    /// round trip; callers beyond the configured limits wait here until a
    /// permit frees up.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let request = builder.build().map_err(|err| {
            let err: ClientError = err.into();
            MemberLinkError::from(err)
        })?;

        let method = request.method().clone();
        let url = request.url().clone();
        let route = route_key(request.url());

        let _total_permit = Arc::clone(&self.total).acquire_owned().await.map_err(|_| {
            MemberLinkError::Internal("connection pool semaphore closed".into())
        })?;
        let _route_permit = self.route_semaphore(&route).acquire_owned().await.map_err(|_| {
            MemberLinkError::Internal("route semaphore closed".into())
        })?;

        debug!(%method, %url, in_flight = self.in_flight(), "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                let err: ClientError = err.into();
                Err(MemberLinkError::from(err))
            }
        }
    }

    /// Number of requests currently holding a pool permit.
    pub fn in_flight(&self) -> usize {
        self.max_total.saturating_sub(self.total.available_permits())
    }

    fn route_semaphore(&self, route: &str) -> Arc<Semaphore> {
        let mut routes = match self.routes.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(
            routes
                .entry(route.to_string())
                .or_insert_with(|| Arc::new(Semaphore::new(self.max_per_route))),
        )
    }
}

/// Pool key for a destination; connections are limited per host+port.
fn route_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or("-");
    match url.port_or_known_default() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    max_total_connections: usize,
    max_connections_per_route: usize,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        let pool = PoolConfig::default();
        Self {
            max_total_connections: pool.max_total_connections,
            max_connections_per_route: pool.max_connections_per_route,
            connect_timeout: pool.connect_timeout(),
            read_timeout: pool.read_timeout(),
        }
    }
}

impl HttpClientBuilder {
    /// Cap on concurrent connections across all destinations (floored to 1).
    pub fn max_total_connections(mut self, max: usize) -> Self {
        self.max_total_connections = max.max(1);
        self
    }

    /// Cap on concurrent connections to a single host+port (floored to 1).
    pub fn max_connections_per_route(mut self, max: usize) -> Self {
        self.max_connections_per_route = max.max(1);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let client = ReqwestClient::builder()
            .connect_timeout(self.connect_timeout)
            .read_timeout(self.read_timeout)
            .pool_max_idle_per_host(self.max_connections_per_route)
            .no_proxy()
            .build()
            .map_err(|err| {
                let err: ClientError = err.into();
                MemberLinkError::from(err)
            })?;

        Ok(HttpClient {
            client,
            total: Arc::new(Semaphore::new(self.max_total_connections)),
            routes: Arc::new(Mutex::new(HashMap::new())),
            max_total: self.max_total_connections,
            max_per_route: self.max_connections_per_route,
        })
    }
}
