//! Request interceptor seam.

use async_trait::async_trait;
use reqwest::header::HeaderMap;

/// Hook invoked on every outgoing request before transmission.
///
/// The default implementation passes the request through untouched; the seam
/// exists so auth headers (app key, signature) can be injected later without
/// touching call sites.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn on_request(&self, headers: &mut HeaderMap);
}

/// Default interceptor: leaves the request unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

#[async_trait]
impl Interceptor for Passthrough {
    async fn on_request(&self, _headers: &mut HeaderMap) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passthrough_leaves_headers_unchanged() {
        let mut headers = HeaderMap::new();
        headers.insert("x-existing", "1".parse().unwrap());

        Passthrough.on_request(&mut headers).await;

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-existing").unwrap(), "1");
    }
}
