use serde::Serialize;

/// One matched record, tagged by document kind.
///
/// The index stores heterogeneous documents side by side; the wire shape
/// is resolved once at the response boundary and everything downstream
/// dispatches on this enum instead of re-probing field presence.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Hit {
    Marker(Marker),
    Gene(Gene),
    Region(Region),
}

/// A sequence variant document.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seqid: Option<String>,
    pub position: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_allele: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_allele: Option<String>,
}

impl Marker {
    /// `ref/alt` when both alleles are known.
    pub fn alleles(&self) -> Option<String> {
        match (&self.ref_allele, &self.alt_allele) {
            (Some(r), Some(a)) => Some(format!("{r}/{a}")),
            _ => None,
        }
    }
}

/// A gene document.
#[derive(Debug, Clone, Serialize)]
pub struct Gene {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hgnc: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
}

/// A curated disease-region document.
#[derive(Debug, Clone, Serialize)]
pub struct Region {
    pub region_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seqid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<u64>,
}

impl Region {
    /// `seqid:start-end` when the full location is known.
    pub fn location(&self) -> Option<String> {
        match (&self.seqid, self.start, self.end) {
            (Some(seqid), Some(start), Some(end)) => Some(format!("{seqid}:{start}-{end}")),
            _ => None,
        }
    }

    /// Site-relative link searching the region's span.
    pub fn location_link(&self) -> Option<String> {
        self.location().map(|loc| format!("/search/{loc}"))
    }
}

impl Hit {
    /// Display label: the marker id, gene symbol, or region name.
    pub fn label(&self) -> &str {
        match self {
            Hit::Marker(m) => &m.id,
            Hit::Gene(g) => &g.symbol,
            Hit::Region(r) => &r.name,
        }
    }

    /// Site-relative detail link for the record.
    pub fn detail_link(&self) -> String {
        match self {
            Hit::Marker(m) => format!("/marker/{}", m.id),
            Hit::Gene(g) => format!("/gene/{}", g.symbol),
            Hit::Region(r) => format!("/region/{}", r.region_id),
        }
    }
}
