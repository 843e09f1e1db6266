//! HTTP client wrapper: verb helpers, path prefixing, and cancellation
//! handling on top of a configured reqwest client.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::error::ApiError;
use super::intercept::{Interceptor, Passthrough};
use crate::config::{ClientConfig, PROXY_SEGMENT};

/// Request verbs the wrapper supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// An outgoing request, constructed per call and not persisted.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub path: String,
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Terminal outcome of a request that was not rejected: either the response
/// body, or a cancellation sentinel.
///
/// Cancellation is expected control flow (a superseded in-flight request),
/// not a failure, so callers get it on the success path and never need an
/// error handler for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    Canceled { message: String },
}

impl<T> Outcome<T> {
    pub fn is_canceled(&self) -> bool {
        matches!(self, Outcome::Canceled { .. })
    }

    /// The response body, if the request ran to completion.
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(body) => Some(body),
            Outcome::Canceled { .. } => None,
        }
    }
}

/// HTTP client wrapper around a configured reqwest Client.
///
/// Every request path is prefixed with the proxy segment, successful
/// responses are unwrapped to their JSON body, and transport failures are
/// normalized into [`ApiError`]. The wrapper holds no mutable state, so
/// concurrent requests are independent and may complete in any order.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    interceptor: Arc<dyn Interceptor>,
}

impl ApiClient {
    /// Builds the underlying reqwest Client from the configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(config.default_headers().clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            config,
            interceptor: Arc::new(Passthrough),
        })
    }

    /// Replaces the request interceptor.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptor = interceptor;
        self
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issues a request and deserializes the JSON response body.
    ///
    /// If the token fires before the response completes, the call resolves
    /// successfully with [`Outcome::Canceled`] instead of rejecting.
    #[tracing::instrument(skip(self, cancel))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
        cancel: &CancellationToken,
    ) -> Result<Outcome<T>, ApiError> {
        let url = format!(
            "{}{}",
            self.config.base_url(),
            prefixed_path(&descriptor.path)
        );
        debug!("{} {}", descriptor.method.as_str(), url);

        let mut headers = HeaderMap::new();
        self.interceptor.on_request(&mut headers).await;

        let mut builder = match descriptor.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        builder = builder.headers(headers);
        if !descriptor.query.is_empty() {
            builder = builder.query(&descriptor.query);
        }
        if let Some(body) = &descriptor.body {
            builder = builder.json(body);
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                let message = format!("{} {} canceled", descriptor.method.as_str(), url);
                debug!("request canceled: {}", message);
                Ok(Outcome::Canceled { message })
            }
            result = self.dispatch::<T>(builder, descriptor.method, &url) => {
                result.map(Outcome::Completed)
            }
        }
    }

    /// Sends a prepared request and unwraps the body from the envelope.
    async fn dispatch<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        method: Method,
        url: &str,
    ) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(ApiError::from_transport)?;

        debug!("{} {} -> {}", method.as_str(), url, response.status());

        let response = response
            .error_for_status()
            .map_err(ApiError::from_transport)?;

        // Callers see only the body; status and headers stay inside
        response.json::<T>().await.map_err(ApiError::from_transport)
    }

    /// GET with query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Outcome<T>, ApiError> {
        self.get_with_cancel(path, params, &CancellationToken::new())
            .await
    }

    pub async fn get_with_cancel<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        cancel: &CancellationToken,
    ) -> Result<Outcome<T>, ApiError> {
        let query = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let descriptor = RequestDescriptor::new(Method::Get, path).with_query(query);
        self.request(descriptor, cancel).await
    }

    /// POST with a JSON body.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        data: Value,
    ) -> Result<Outcome<T>, ApiError> {
        self.post_with_cancel(path, data, &CancellationToken::new())
            .await
    }

    pub async fn post_with_cancel<T: DeserializeOwned>(
        &self,
        path: &str,
        data: Value,
        cancel: &CancellationToken,
    ) -> Result<Outcome<T>, ApiError> {
        let descriptor = RequestDescriptor::new(Method::Post, path).with_body(data);
        self.request(descriptor, cancel).await
    }

    /// PUT with a JSON body.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        data: Value,
    ) -> Result<Outcome<T>, ApiError> {
        self.put_with_cancel(path, data, &CancellationToken::new())
            .await
    }

    pub async fn put_with_cancel<T: DeserializeOwned>(
        &self,
        path: &str,
        data: Value,
        cancel: &CancellationToken,
    ) -> Result<Outcome<T>, ApiError> {
        let descriptor = RequestDescriptor::new(Method::Put, path).with_body(data);
        self.request(descriptor, cancel).await
    }

    /// DELETE.
    pub async fn del<T: DeserializeOwned>(&self, path: &str) -> Result<Outcome<T>, ApiError> {
        self.del_with_cancel(path, &CancellationToken::new()).await
    }

    pub async fn del_with_cancel<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<Outcome<T>, ApiError> {
        let descriptor = RequestDescriptor::new(Method::Delete, path);
        self.request(descriptor, cancel).await
    }
}

/// Normalizes a request path: ensures a leading slash and prepends the proxy
/// segment. Already-prefixed paths are left alone so the operation is
/// idempotent.
fn prefixed_path(path: &str) -> String {
    if path == PROXY_SEGMENT
        || path
            .strip_prefix(PROXY_SEGMENT)
            .is_some_and(|rest| rest.starts_with('/'))
    {
        return path.to_string();
    }
    if path.starts_with('/') {
        format!("{}{}", PROXY_SEGMENT, path)
    } else {
        format!("{}/{}", PROXY_SEGMENT, path)
    }
}
