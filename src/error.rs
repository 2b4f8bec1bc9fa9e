#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum GenedexError {
    #[error("HTTP client initialization failed: {0}")]
    HttpClientInit(reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP middleware error: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    #[error("API error from {api}: {message}")]
    Api { api: String, message: String },

    #[error("API JSON error from {api}: {source}")]
    ApiJson {
        api: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::GenedexError;

    #[test]
    fn api_error_display_includes_api_name() {
        let err = GenedexError::Api {
            api: "searchidx".to_string(),
            message: "HTTP 502".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("searchidx"));
        assert!(msg.contains("HTTP 502"));
    }

    #[test]
    fn invalid_argument_display_keeps_message() {
        let err = GenedexError::InvalidArgument("page size must be greater than zero".into());
        assert!(
            err.to_string()
                .contains("page size must be greater than zero")
        );
    }

    #[test]
    fn api_json_error_carries_source() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = GenedexError::ApiJson {
            api: "searchidx".to_string(),
            source,
        };
        assert!(err.to_string().contains("searchidx"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
