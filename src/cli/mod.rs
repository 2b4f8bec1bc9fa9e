//! Command-line interface.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::warn;

use crate::browser::{PageMove, ResultBrowser};
use crate::error::GenedexError;
use crate::pager::PageState;
use crate::render;
use crate::sources::searchidx::SearchIndexClient;
use crate::utils::cookie;
use crate::utils::query::Query;

pub(crate) mod browse;

/// Default page size, matching the backend's own default.
const DEFAULT_PAGE_SIZE: usize = 20;

const CSRF_TOKEN_ENV: &str = "GENEDEX_CSRF_TOKEN";
const COOKIE_ENV: &str = "GENEDEX_COOKIE";

#[derive(Parser)]
#[command(
    name = "genedex",
    version,
    about = "Browse paginated hits from a genomics search index"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Base URL of the search backend (default: GENEDEX_BASE or http://localhost:8000)
    #[arg(long, global = true)]
    pub base: Option<String>,

    /// CSRF token for page requests (default: GENEDEX_CSRF_TOKEN, or the
    /// csrftoken cookie in GENEDEX_COOKIE)
    #[arg(long, global = true)]
    pub csrf_token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and render one page of search hits
    Search {
        /// Free text, or a genomic range such as 1:100-200
        query: String,

        /// Indices to search; repeat or comma-separate (default: all)
        #[arg(long, value_delimiter = ',')]
        source: Vec<Source>,

        /// Page number (out-of-range values clamp)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Hits per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: usize,

        /// Emit JSON instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Show per-source hit counts for a query
    Count {
        /// Free text, or a genomic range such as 1:100-200
        query: String,

        /// Indices to count; repeat or comma-separate (default: all)
        #[arg(long, value_delimiter = ',')]
        source: Vec<Source>,

        /// Emit JSON instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Page through search hits interactively
    Browse {
        /// Free text, or a genomic range such as 1:100-200
        query: String,

        /// Indices to search; repeat or comma-separate (default: all)
        #[arg(long, value_delimiter = ',')]
        source: Vec<Source>,

        /// Hits per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        size: usize,
    },
}

/// Document collections the backend exposes, one index per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    Marker,
    Gene,
    Region,
}

impl Source {
    pub(crate) const ALL: [Source; 3] = [Source::Marker, Source::Gene, Source::Region];

    pub(crate) fn index_name(self) -> &'static str {
        match self {
            Source::Marker => "marker",
            Source::Gene => "gene",
            Source::Region => "region",
        }
    }
}

/// Comma-joined index list for the request path. An empty selection
/// means all sources; duplicates collapse, order is preserved.
fn db_param(sources: &[Source]) -> String {
    let sources = if sources.is_empty() {
        &Source::ALL[..]
    } else {
        sources
    };
    let mut seen: Vec<&str> = Vec::new();
    for source in sources {
        let name = source.index_name();
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen.join(",")
}

fn resolve_csrf_token(flag: Option<String>) -> Option<String> {
    if let Some(token) = flag.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
        return Some(token);
    }
    if let Some(token) = std::env::var(CSRF_TOKEN_ENV)
        .ok()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
    {
        return Some(token);
    }
    std::env::var(COOKIE_ENV)
        .ok()
        .and_then(|cookies| cookie::cookie_value(&cookies, cookie::CSRF_COOKIE).map(str::to_string))
}

fn build_client(base: Option<String>, csrf_token: Option<String>) -> Result<SearchIndexClient, GenedexError> {
    let mut client = SearchIndexClient::new()?;
    if let Some(base) = base.map(|b| b.trim().to_string()).filter(|b| !b.is_empty()) {
        client = client.with_base(base);
    }
    Ok(client.with_csrf_token(resolve_csrf_token(csrf_token)))
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    query: String,
    state: PageState,
    #[serde(flatten)]
    page: &'a crate::entities::HitPage,
}

#[derive(Serialize)]
struct CountRow {
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
}

fn counts_markdown(query_label: &str, rows: &[CountRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Hit counts: {query_label}\n\n"));
    out.push_str("| Source | Hits |\n");
    out.push_str("|--------|------|\n");
    for row in rows {
        match row.count {
            Some(count) => out.push_str(&format!("| {} | {} |\n", row.source, count)),
            None => out.push_str(&format!("| {} | - |\n", row.source)),
        }
    }
    let total: usize = rows.iter().filter_map(|r| r.count).sum();
    out.push_str(&format!("\nTotal: {total} hits\n"));
    out
}

pub async fn run(cli: Cli) -> anyhow::Result<String> {
    let client = build_client(cli.base, cli.csrf_token)?;

    match cli.command {
        Commands::Search {
            query,
            source,
            page,
            size,
            json,
        } => {
            if size == 0 {
                return Err(GenedexError::InvalidArgument(
                    "Page size must be greater than zero".into(),
                )
                .into());
            }
            let query = Query::parse(&query)?;
            let db = db_param(&source);
            let mut browser = ResultBrowser::open(client, query, db, size).await?;
            browser.select(PageMove::Page(page)).await?;
            let state = browser.state();
            let view = browser.view().ok_or_else(|| GenedexError::Api {
                api: "browser".into(),
                message: "No result page has been loaded".into(),
            })?;
            if json {
                Ok(render::json::to_pretty(&SearchOutput {
                    query: browser.query().label(),
                    state,
                    page: view,
                })?)
            } else {
                Ok(render::markdown::hit_page_markdown(
                    &browser.query().label(),
                    view,
                    &state,
                )?)
            }
        }

        Commands::Count {
            query,
            source,
            json,
        } => {
            let query = Query::parse(&query)?;
            let sources = if source.is_empty() {
                Source::ALL.to_vec()
            } else {
                source
            };

            let fetches = sources.iter().map(|s| {
                let client = &client;
                let query = &query;
                let name = s.index_name();
                async move { (name, client.count(query, name).await) }
            });
            let rows: Vec<CountRow> = futures::future::join_all(fetches)
                .await
                .into_iter()
                .map(|(name, result)| match result {
                    Ok(resp) => CountRow {
                        source: name,
                        count: Some(resp.count),
                    },
                    Err(err) => {
                        warn!(source = name, error = %err, "Count request failed");
                        CountRow {
                            source: name,
                            count: None,
                        }
                    }
                })
                .collect();

            if json {
                Ok(render::json::to_pretty(&rows)?)
            } else {
                Ok(counts_markdown(&query.label(), &rows))
            }
        }

        Commands::Browse {
            query,
            source,
            size,
        } => {
            if size == 0 {
                return Err(GenedexError::InvalidArgument(
                    "Page size must be greater than zero".into(),
                )
                .into());
            }
            let query = Query::parse(&query)?;
            let db = db_param(&source);
            browse::run(client, query, db, size).await?;
            Ok(String::new())
        }
    }
}
