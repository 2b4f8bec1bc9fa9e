use tracing::warn;

use crate::entities::HitPage;
use crate::entities::hit::{Gene, Hit, Marker, Region};
use crate::sources::searchidx::{EsHit, EsSearchResponse, WireSource};

/// Resolves one wire hit into the tagged union.
///
/// Dispatch order is fixed and first-match-wins: marker (an `id` plus a
/// position), then gene (`hgnc`/`gene_symbol`), then region. A record
/// matching none is dropped with a warning; it never fails the batch.
pub fn from_es_hit(hit: &EsHit) -> Option<Hit> {
    let source = &hit.source;
    if let Some(marker) = as_marker(source) {
        return Some(Hit::Marker(marker));
    }
    if let Some(gene) = as_gene(source) {
        return Some(Hit::Gene(gene));
    }
    if let Some(region) = as_region(source) {
        return Some(Hit::Region(region));
    }

    warn!(
        index_id = hit.id.as_deref().unwrap_or("-"),
        "Skipping search hit with unrecognized shape"
    );
    None
}

/// Decodes a full page response, counting skipped records.
pub fn from_response(resp: EsSearchResponse) -> HitPage {
    let total = resp.hits.total;
    let raw_len = resp.hits.hits.len();
    let hits: Vec<Hit> = resp.hits.hits.iter().filter_map(from_es_hit).collect();
    let skipped = raw_len - hits.len();
    HitPage {
        hits,
        total,
        skipped,
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn as_marker(source: &WireSource) -> Option<Marker> {
    let id = non_empty(source.id.as_ref())?;
    let position = source.start?;
    Some(Marker {
        id: id.to_string(),
        seqid: source.seqid.as_ref().map(|s| s.as_string()),
        position,
        ref_allele: non_empty(source.ref_allele.as_ref()).map(str::to_string),
        alt_allele: non_empty(source.alt_allele.as_ref()).map(str::to_string),
    })
}

fn as_gene(source: &WireSource) -> Option<Gene> {
    let hgnc = source.hgnc.as_ref().map(|h| h.as_string());
    let symbol = non_empty(source.gene_symbol.as_ref());
    if hgnc.is_none() && symbol.is_none() {
        return None;
    }
    let symbol = match (symbol, &hgnc) {
        (Some(symbol), _) => symbol.to_string(),
        (None, Some(hgnc)) => hgnc.clone(),
        (None, None) => return None,
    };
    Some(Gene {
        symbol,
        hgnc,
        synonyms: source.synonyms.clone().into_vec(),
    })
}

fn as_region(source: &WireSource) -> Option<Region> {
    if source.doc_type.as_deref() != Some("region") {
        return None;
    }
    let attr = source.attr.as_ref()?;
    let region_id = attr.region_id.as_ref()?.as_string();
    let name = non_empty(attr.name.as_ref())
        .map(str::to_string)
        .unwrap_or_else(|| region_id.clone());
    Some(Region {
        region_id,
        name,
        seqid: source.seqid.as_ref().map(|s| s.as_string()),
        start: source.start,
        end: source.end,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn es_hit(source: serde_json::Value) -> EsHit {
        serde_json::from_value(serde_json::json!({
            "_id": "test-id",
            "_source": source,
        }))
        .expect("valid wire hit")
    }

    #[test]
    fn marker_shape_resolves_first() {
        let hit = from_es_hit(&es_hit(serde_json::json!({
            "id": "rs2476601", "seqid": "1", "start": 114377568, "ref": "A", "alt": "G"
        })))
        .expect("marker hit");

        let Hit::Marker(marker) = hit else {
            panic!("expected marker, got {hit:?}");
        };
        assert_eq!(marker.id, "rs2476601");
        assert_eq!(marker.seqid.as_deref(), Some("1"));
        assert_eq!(marker.position, 114_377_568);
        assert_eq!(marker.alleles().as_deref(), Some("A/G"));
    }

    #[test]
    fn legacy_marker_spellings_resolve_identically() {
        let hit = from_es_hit(&es_hit(serde_json::json!({
            "id": "rs123", "src": "7", "pos": 500, "ref": "C", "alt": "T"
        })))
        .expect("marker hit");

        let Hit::Marker(marker) = hit else {
            panic!("expected marker, got {hit:?}");
        };
        assert_eq!(marker.seqid.as_deref(), Some("7"));
        assert_eq!(marker.position, 500);
    }

    #[test]
    fn gene_shape_resolves_when_no_position() {
        let hit = from_es_hit(&es_hit(serde_json::json!({
            "hgnc": "ABC1", "gene_symbol": "ABC1"
        })))
        .expect("gene hit");

        let Hit::Gene(gene) = hit else {
            panic!("expected gene, got {hit:?}");
        };
        assert_eq!(gene.symbol, "ABC1");
        assert_eq!(gene.hgnc.as_deref(), Some("ABC1"));
    }

    #[test]
    fn gene_with_numeric_hgnc_and_synonyms() {
        let hit = from_es_hit(&es_hit(serde_json::json!({
            "gene_symbol": "PTPN22", "hgnc": 9652, "synonyms": ["LYP", "PEP"]
        })))
        .expect("gene hit");

        let Hit::Gene(gene) = hit else {
            panic!("expected gene, got {hit:?}");
        };
        assert_eq!(gene.hgnc.as_deref(), Some("9652"));
        assert_eq!(gene.synonyms, vec!["LYP", "PEP"]);
    }

    #[test]
    fn region_shape_resolves_with_location() {
        let hit = from_es_hit(&es_hit(serde_json::json!({
            "type": "region",
            "attr": {"region_id": 7, "Name": "R1"},
            "seqid": "1", "start": 100, "end": 200
        })))
        .expect("region hit");

        let Hit::Region(region) = hit else {
            panic!("expected region, got {hit:?}");
        };
        assert_eq!(region.region_id, "7");
        assert_eq!(region.name, "R1");
        assert_eq!(region.location().as_deref(), Some("1:100-200"));
    }

    #[test]
    fn marker_wins_over_gene_fields() {
        // A record carrying both shapes resolves by dispatch order.
        let hit = from_es_hit(&es_hit(serde_json::json!({
            "id": "rs1", "start": 10, "hgnc": "ABC1", "gene_symbol": "ABC1"
        })))
        .expect("hit");
        assert!(matches!(hit, Hit::Marker(_)));
    }

    #[test]
    fn id_without_position_is_not_a_marker() {
        let hit = from_es_hit(&es_hit(serde_json::json!({
            "id": "lonely", "gene_symbol": "XYZ"
        })))
        .expect("hit");
        assert!(matches!(hit, Hit::Gene(_)));
    }

    #[test]
    fn unrecognized_shape_is_skipped_not_fatal() {
        assert!(from_es_hit(&es_hit(serde_json::json!({"weird": true}))).is_none());
    }

    #[test]
    fn region_without_attr_is_skipped() {
        assert!(from_es_hit(&es_hit(serde_json::json!({"type": "region"}))).is_none());
    }

    #[test]
    fn response_batch_counts_skipped_records() {
        let resp: EsSearchResponse = serde_json::from_value(serde_json::json!({
            "hits": {
                "total": 95,
                "hits": [
                    {"_id": "a", "_source": {"id": "rs1", "start": 5}},
                    {"_id": "b", "_source": {"mystery": 1}},
                    {"_id": "c", "_source": {"gene_symbol": "PTPN22", "hgnc": 9652}}
                ]
            }
        }))
        .expect("valid response");

        let page = from_response(resp);
        assert_eq!(page.total, 95);
        assert_eq!(page.hits.len(), 2);
        assert_eq!(page.skipped, 1);
    }
}
