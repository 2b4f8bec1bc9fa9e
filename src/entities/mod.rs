//! Typed search-hit models shared by the browser, renderer, and CLI.

pub(crate) mod hit;

use serde::Serialize;

use crate::entities::hit::Hit;

/// One decoded response batch: the hits of a single page plus the
/// index's authoritative total and the number of records that did not
/// match any known shape.
#[derive(Debug, Clone, Serialize)]
pub struct HitPage {
    pub hits: Vec<Hit>,
    pub total: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub skipped: usize,
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}
