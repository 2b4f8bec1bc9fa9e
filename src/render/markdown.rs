use std::sync::OnceLock;

use minijinja::{Environment, context};

use crate::entities::HitPage;
use crate::entities::hit::Hit;
use crate::error::GenedexError;
use crate::pager::PageState;

static ENV: OnceLock<Environment<'static>> = OnceLock::new();

fn env() -> Result<&'static Environment<'static>, GenedexError> {
    if let Some(env) = ENV.get() {
        return Ok(env);
    }

    let mut env = Environment::new();
    env.add_template("hits.md.j2", include_str!("../../templates/hits.md.j2"))?;

    let _ = ENV.set(env);
    ENV.get().ok_or_else(|| GenedexError::Api {
        api: "render".into(),
        message: "Template environment initialization race".into(),
    })
}

#[derive(serde::Serialize)]
struct HitRow {
    title: String,
    link: String,
    detail: String,
}

fn hit_row(hit: &Hit) -> HitRow {
    let detail = match hit {
        Hit::Marker(marker) => {
            let mut detail = format!(
                "Chromosome: {}; Position: {}",
                marker.seqid.as_deref().unwrap_or("-"),
                marker.position
            );
            if let Some(alleles) = marker.alleles() {
                detail.push_str("; ");
                detail.push_str(&alleles);
            }
            detail
        }
        Hit::Gene(gene) => match &gene.hgnc {
            Some(hgnc) => format!("HGNC: {hgnc}"),
            None => "HGNC: -".to_string(),
        },
        Hit::Region(region) => match region.location() {
            Some(location) => format!(
                "Location: [{location}]({})",
                region
                    .location_link()
                    .unwrap_or_else(|| format!("/search/{location}"))
            ),
            None => "Location: -".to_string(),
        },
    };

    HitRow {
        title: hit.label().to_string(),
        link: hit.detail_link(),
        detail,
    }
}

/// Navigation bar for the current window: `« 1 [2] 3 … 50 »`.
///
/// Previous/Next markers are omitted when non-actionable; when pages
/// remain past the window end the last page is offered after an
/// ellipsis.
pub fn pager_bar(state: &PageState) -> String {
    let mut parts: Vec<String> = Vec::new();
    if state.has_prev() {
        parts.push("«".to_string());
    }
    for page in state.window() {
        if page == state.current_page() {
            parts.push(format!("[{page}]"));
        } else {
            parts.push(page.to_string());
        }
    }
    if let Some(last) = state.overflow_page() {
        parts.push("…".to_string());
        parts.push(last.to_string());
    }
    if state.has_next() {
        parts.push("»".to_string());
    }
    parts.join(" ")
}

/// Renders one result page: count summary, per-hit blocks, skipped-record
/// note, and the pager bar. The whole list is replaced on every render.
pub fn hit_page_markdown(
    query_label: &str,
    page: &HitPage,
    state: &PageState,
) -> Result<String, GenedexError> {
    let tmpl = env()?.get_template("hits.md.j2")?;
    let rows: Vec<HitRow> = page.hits.iter().map(hit_row).collect();
    let body = tmpl.render(context! {
        query => query_label,
        showing => page.hits.len(),
        total => page.total,
        skipped => page.skipped,
        hits => rows,
        pager_bar => pager_bar(state),
    })?;
    Ok(body)
}
