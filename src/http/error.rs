//! Normalized error taxonomy for transport failures.
//!
//! Classification prefers the structured signals reqwest exposes (timeout
//! flag, connect flag, response status) and only falls back to inspecting
//! the rendered message when no structured signal exists. Cancellation is
//! deliberately absent here: an aborted request is not an error (see
//! [`Outcome`](super::Outcome)).

use log::warn;

/// What went wrong, at the granularity callers care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend could not be reached at all.
    Network,
    /// The request exceeded the configured timeout.
    Timeout,
    /// The backend answered with a non-success status code.
    HttpStatus(u16),
    /// Nothing recognizable; the original message is passed through.
    Unclassified,
}

/// A transport failure with its classification and user-facing message.
///
/// The original cause is preserved as the error source so callers can still
/// inspect it.
#[derive(Debug)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
    source: Option<reqwest::Error>,
}

impl ApiError {
    /// Classifies a reqwest error and attaches the localized message.
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        let kind = classify(&error);
        let message = localized_message(kind, &error.to_string());
        warn!("transport failure classified as {:?}: {}", kind, message);
        Self {
            kind,
            message,
            source: Some(error),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The user-facing message for this failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Classifies a reqwest error, structured signals first.
fn classify(error: &reqwest::Error) -> ErrorKind {
    if error.is_timeout() {
        return ErrorKind::Timeout;
    }
    if let Some(status) = error.status() {
        return ErrorKind::HttpStatus(status.as_u16());
    }
    if error.is_connect() {
        return ErrorKind::Network;
    }
    classify_message(&error.to_string())
}

/// Fallback for errors reqwest cannot type: inspect the rendered message.
pub(crate) fn classify_message(message: &str) -> ErrorKind {
    if message == "Network Error" {
        return ErrorKind::Network;
    }
    if message.contains("timeout") {
        return ErrorKind::Timeout;
    }
    if message.contains("Request failed with status code") {
        // The status code is the last 3 characters of the message
        if let Some(tail) = message.get(message.len().saturating_sub(3)..) {
            if let Ok(code) = tail.parse::<u16>() {
                return ErrorKind::HttpStatus(code);
            }
        }
    }
    ErrorKind::Unclassified
}

/// Maps a classification to its user-facing message. Unclassified failures
/// keep the original message unchanged.
pub(crate) fn localized_message(kind: ErrorKind, original: &str) -> String {
    match kind {
        ErrorKind::Network => "backend interface connection abnormal".to_string(),
        ErrorKind::Timeout => "system interface request timed out".to_string(),
        ErrorKind::HttpStatus(code) => format!("system interface {} abnormal", code),
        ErrorKind::Unclassified => original.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_message_network_error_exact() {
        assert_eq!(classify_message("Network Error"), ErrorKind::Network);
        // Substring is not enough; the match is exact
        assert_eq!(
            classify_message("a Network Error happened"),
            ErrorKind::Unclassified
        );
    }

    #[test]
    fn test_classify_message_timeout_substring() {
        assert_eq!(
            classify_message("timeout of 10000ms exceeded"),
            ErrorKind::Timeout
        );
        assert_eq!(
            classify_message("connection timeout while reading"),
            ErrorKind::Timeout
        );
        // Case-sensitive
        assert_eq!(classify_message("Timeout exceeded"), ErrorKind::Unclassified);
    }

    #[test]
    fn test_classify_message_status_code_tail() {
        assert_eq!(
            classify_message("Request failed with status code 404"),
            ErrorKind::HttpStatus(404)
        );
        assert_eq!(
            classify_message("Request failed with status code 503"),
            ErrorKind::HttpStatus(503)
        );
    }

    #[test]
    fn test_classify_message_status_code_unparseable_tail() {
        assert_eq!(
            classify_message("Request failed with status code ???"),
            ErrorKind::Unclassified
        );
    }

    #[test]
    fn test_classify_message_unknown_passes_through() {
        assert_eq!(classify_message("boom"), ErrorKind::Unclassified);
    }

    #[test]
    fn test_localized_messages() {
        assert_eq!(
            localized_message(ErrorKind::Network, "Network Error"),
            "backend interface connection abnormal"
        );
        assert_eq!(
            localized_message(ErrorKind::Timeout, "timeout of 10000ms exceeded"),
            "system interface request timed out"
        );
        assert_eq!(
            localized_message(ErrorKind::HttpStatus(404), "Request failed with status code 404"),
            "system interface 404 abnormal"
        );
        assert_eq!(localized_message(ErrorKind::Unclassified, "boom"), "boom");
    }

    #[test_log::test(tokio::test)]
    async fn test_from_transport_http_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/")
            .with_status(500)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let response = client.get(server.url()).send().await.unwrap();
        let err = response.error_for_status().unwrap_err();

        let api_err = ApiError::from_transport(err);
        assert_eq!(api_err.kind(), ErrorKind::HttpStatus(500));
        assert_eq!(api_err.message(), "system interface 500 abnormal");
        assert!(std::error::Error::source(&api_err).is_some());
    }

    #[test_log::test(tokio::test)]
    async fn test_from_transport_connection_refused() {
        // Nothing listens on this port; reqwest reports a connect error
        let client = reqwest::Client::new();
        let err = client
            .get("http://127.0.0.1:9")
            .send()
            .await
            .unwrap_err();

        let api_err = ApiError::from_transport(err);
        assert_eq!(api_err.kind(), ErrorKind::Network);
        assert_eq!(api_err.message(), "backend interface connection abnormal");
    }
}
