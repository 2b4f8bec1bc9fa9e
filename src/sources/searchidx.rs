use std::borrow::Cow;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::GenedexError;
use crate::utils::query::Query;
use crate::utils::serde::{StringOrU64, StringOrVec};

const SEARCHIDX_BASE: &str = "http://localhost:8000";
const SEARCHIDX_API: &str = "searchidx";
const SEARCHIDX_BASE_ENV: &str = "GENEDEX_BASE";

/// Header Django's CSRF middleware checks on same-origin POSTs.
pub(crate) const CSRF_HEADER: &str = "X-CSRFToken";

/// Client for the search backend's paging and count endpoints.
///
/// The backend routes on the query path segment
/// (`search/{query}/db/{dbs}/...`) and answers with Elasticsearch-shaped
/// JSON. One request is issued per page change; responses are decoded
/// into wire types here and adapted to entities at the boundary.
pub struct SearchIndexClient {
    client: reqwest_middleware::ClientWithMiddleware,
    base: Cow<'static, str>,
    csrf_token: Option<String>,
}

impl SearchIndexClient {
    pub fn new() -> Result<Self, GenedexError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: crate::sources::env_base(SEARCHIDX_BASE, SEARCHIDX_BASE_ENV),
            csrf_token: None,
        })
    }

    /// Overrides the default / environment base URL.
    pub fn with_base(mut self, base: String) -> Self {
        self.base = Cow::Owned(base);
        self
    }

    /// Sets the CSRF token attached to page POSTs. The token value is
    /// never logged.
    pub fn with_csrf_token(mut self, token: Option<String>) -> Self {
        self.csrf_token = token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        self
    }

    #[cfg(test)]
    fn new_for_test(base: String) -> Result<Self, GenedexError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: Cow::Owned(base),
            csrf_token: None,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, GenedexError> {
        let mut url = reqwest::Url::parse(self.base.as_ref()).map_err(|err| {
            GenedexError::InvalidArgument(format!("Invalid base URL '{}': {err}", self.base))
        })?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                GenedexError::InvalidArgument(format!(
                    "Base URL '{}' cannot carry a path",
                    self.base
                ))
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest_middleware::RequestBuilder,
    ) -> Result<T, GenedexError> {
        let resp = req.send().await?;
        let status = resp.status();
        let content_type = resp.headers().get(reqwest::header::CONTENT_TYPE).cloned();
        let bytes = crate::sources::read_limited_body(resp, SEARCHIDX_API).await?;
        if !status.is_success() {
            let excerpt = crate::sources::body_excerpt(&bytes);
            return Err(GenedexError::Api {
                api: SEARCHIDX_API.to_string(),
                message: format!("HTTP {status}: {excerpt}"),
            });
        }
        crate::sources::ensure_json_content_type(SEARCHIDX_API, content_type.as_ref(), &bytes)?;
        serde_json::from_slice(&bytes).map_err(|source| GenedexError::ApiJson {
            api: SEARCHIDX_API.to_string(),
            source,
        })
    }

    /// Fetches one result page: form-encoded `from`/`size` against the
    /// comma-separated index list.
    pub async fn page(
        &self,
        query: &Query,
        db: &str,
        from: usize,
        size: usize,
    ) -> Result<EsSearchResponse, GenedexError> {
        let db = validate_db(db)?;
        if size == 0 {
            return Err(GenedexError::InvalidArgument(
                "Page size must be greater than zero".into(),
            ));
        }
        crate::sources::validate_result_window("search page", size, from)?;

        let url = self.endpoint(&["search", &query.path_segment(), "db", db, "page"])?;
        let mut req = self
            .client
            .post(url)
            .form(&[("from", from.to_string()), ("size", size.to_string())]);
        if let Some(token) = &self.csrf_token {
            req = req.header(CSRF_HEADER, token);
        }
        self.send_json(req).await
    }

    /// Fetches the hit count for a query against one index.
    pub async fn count(&self, query: &Query, db: &str) -> Result<CountResponse, GenedexError> {
        let db = validate_db(db)?;
        let url = self.endpoint(&["search", &query.path_segment(), "db", db, "count"])?;
        self.send_json(self.client.get(url)).await
    }
}

fn validate_db(db: &str) -> Result<&str, GenedexError> {
    let db = db.trim();
    if db.is_empty() {
        return Err(GenedexError::InvalidArgument(
            "At least one search index is required".into(),
        ));
    }
    Ok(db)
}

#[derive(Debug, Clone, Deserialize)]
pub struct EsSearchResponse {
    pub hits: EsHits,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EsHits {
    pub total: usize,
    #[serde(default)]
    pub hits: Vec<EsHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EsHit {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[serde(rename = "_source", default)]
    pub source: WireSource,
}

/// Raw `_source` object of one hit. The schema is fixed on the current
/// field spellings; the legacy `src`/`pos` spellings used by older index
/// documents are accepted as aliases and normalized here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireSource {
    pub id: Option<String>,
    #[serde(alias = "src")]
    pub seqid: Option<StringOrU64>,
    #[serde(alias = "pos")]
    pub start: Option<u64>,
    pub end: Option<u64>,
    #[serde(rename = "ref")]
    pub ref_allele: Option<String>,
    #[serde(rename = "alt")]
    pub alt_allele: Option<String>,
    pub hgnc: Option<StringOrU64>,
    pub gene_symbol: Option<String>,
    #[serde(default)]
    pub synonyms: StringOrVec,
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    pub attr: Option<WireRegionAttr>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireRegionAttr {
    pub region_id: Option<StringOrU64>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CountResponse {
    pub count: usize,
}
