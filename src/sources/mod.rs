//! Shared HTTP plumbing for the search index backend.

use std::borrow::Cow;
use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::HeaderValue;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::warn;

use crate::error::GenedexError;

pub(crate) mod searchidx;

const ERROR_BODY_MAX_BYTES: usize = 2048;
pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Elasticsearch rejects offset+size paging past its max result window;
/// requests past it are refused client-side before hitting the network.
pub(crate) const ES_MAX_RESULT_WINDOW: usize = 10_000;

static HTTP_CLIENT: OnceLock<ClientWithMiddleware> = OnceLock::new();

pub(crate) fn env_base(default: &'static str, env_var: &str) -> Cow<'static, str> {
    std::env::var(env_var)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(Cow::Owned)
        .unwrap_or_else(|| Cow::Borrowed(default))
}

/// Returns a shared HTTP client with retry middleware.
///
/// Retry: 3 attempts with exponential backoff for transient errors.
pub(crate) fn shared_client() -> Result<ClientWithMiddleware, GenedexError> {
    if let Some(client) = HTTP_CLIENT.get() {
        return Ok(client.clone());
    }

    let base_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("genedex/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(GenedexError::HttpClientInit)?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);

    let client = ClientBuilder::new(base_client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

    match HTTP_CLIENT.set(client.clone()) {
        Ok(()) => Ok(client),
        Err(_) => HTTP_CLIENT.get().cloned().ok_or_else(|| GenedexError::Api {
            api: "http-client".into(),
            message: "Shared HTTP client initialization race".into(),
        }),
    }
}

pub(crate) fn body_excerpt(bytes: &[u8]) -> String {
    let full = String::from_utf8_lossy(bytes);

    let truncated: &str = if full.len() > ERROR_BODY_MAX_BYTES {
        let mut end = ERROR_BODY_MAX_BYTES;
        while end > 0 && !full.is_char_boundary(end) {
            end -= 1;
        }
        &full[..end]
    } else {
        full.as_ref()
    };

    let mut s = truncated.trim().replace(['\n', '\r', '\t'], " ");
    if full.len() > ERROR_BODY_MAX_BYTES {
        s.push_str(" …");
    }
    s
}

pub(crate) fn ensure_json_content_type(
    api: &str,
    content_type: Option<&HeaderValue>,
    body: &[u8],
) -> Result<(), GenedexError> {
    let Some(content_type) = content_type else {
        return Ok(());
    };

    let raw = match content_type.to_str() {
        Ok(v) => v.trim(),
        Err(_) => {
            warn!(
                source = api,
                "Response content-type header was not valid UTF-8; attempting JSON parse"
            );
            return Ok(());
        }
    };
    if raw.is_empty() {
        return Ok(());
    }

    let media_type = raw
        .split(';')
        .next()
        .map(str::trim)
        .unwrap_or_default()
        .to_ascii_lowercase();
    let is_html = matches!(media_type.as_str(), "text/html" | "application/xhtml+xml");
    if is_html {
        return Err(GenedexError::Api {
            api: api.to_string(),
            message: format!(
                "Unexpected HTML response (content-type: {raw}): {}",
                body_excerpt(body)
            ),
        });
    }

    let is_json = media_type == "application/json"
        || media_type == "text/json"
        || media_type.ends_with("+json");
    if !is_json {
        warn!(
            source = api,
            content_type = raw,
            "Unexpected non-JSON content type; attempting JSON parse for compatibility"
        );
    }

    Ok(())
}

pub(crate) fn validate_result_window(
    context: &str,
    limit: usize,
    offset: usize,
) -> Result<(), GenedexError> {
    if offset >= ES_MAX_RESULT_WINDOW {
        return Err(GenedexError::InvalidArgument(format!(
            "Page offset must be less than {ES_MAX_RESULT_WINDOW} for {context}"
        )));
    }

    if offset.saturating_add(limit) > ES_MAX_RESULT_WINDOW {
        return Err(GenedexError::InvalidArgument(format!(
            "Page offset + size must be <= {ES_MAX_RESULT_WINDOW} for {context}"
        )));
    }

    Ok(())
}

pub(crate) async fn read_limited_body(
    mut resp: reqwest::Response,
    api: &str,
) -> Result<Vec<u8>, GenedexError> {
    let mut body: Vec<u8> = Vec::new();

    while let Some(chunk) = resp.chunk().await? {
        let next_len = body.len().saturating_add(chunk.len());
        if next_len > DEFAULT_MAX_BODY_BYTES {
            return Err(GenedexError::Api {
                api: api.to_string(),
                message: format!("Response body exceeded {DEFAULT_MAX_BODY_BYTES} bytes"),
            });
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_json_content_type_rejects_html() {
        let err = ensure_json_content_type(
            "searchidx",
            Some(&HeaderValue::from_static("text/html; charset=utf-8")),
            b"<html><body>upstream error</body></html>",
        )
        .expect_err("html should be rejected");
        let msg = err.to_string();
        assert!(msg.contains("searchidx"));
        assert!(msg.contains("HTML"));
    }

    #[test]
    fn ensure_json_content_type_accepts_json() {
        let ok = ensure_json_content_type(
            "searchidx",
            Some(&HeaderValue::from_static("application/json; charset=utf-8")),
            b"{\"ok\":true}",
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn ensure_json_content_type_allows_non_json_compat_mode() {
        let ok = ensure_json_content_type(
            "searchidx",
            Some(&HeaderValue::from_static("text/plain")),
            b"{\"ok\":true}",
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn validate_result_window_accepts_bounds() {
        assert!(validate_result_window("search page", 10, 9_990).is_ok());
    }

    #[test]
    fn validate_result_window_rejects_offset_at_window() {
        let err = validate_result_window("search page", 5, 10_000)
            .expect_err("offset at window should fail");
        assert!(matches!(err, GenedexError::InvalidArgument(_)));
        assert!(err.to_string().contains("less than 10000"));
    }

    #[test]
    fn validate_result_window_rejects_window_overflow() {
        let err = validate_result_window("search page", 6, 9_995)
            .expect_err("offset + size overflow should fail");
        assert!(matches!(err, GenedexError::InvalidArgument(_)));
        assert!(err.to_string().contains("<= 10000"));
    }

    #[test]
    fn body_excerpt_flattens_whitespace() {
        let excerpt = body_excerpt(b"line one\nline\ttwo\r\n");
        assert_eq!(excerpt, "line one line two");
    }
}
