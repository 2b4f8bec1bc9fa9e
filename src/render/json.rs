use serde::Serialize;

use crate::error::GenedexError;

pub fn to_pretty<T: Serialize>(value: &T) -> Result<String, GenedexError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::to_pretty;
    use crate::entities::HitPage;
    use crate::entities::hit::{Hit, Region};

    #[test]
    fn to_pretty_serializes_with_indentation() {
        let page = HitPage {
            hits: vec![Hit::Region(Region {
                region_id: "7".into(),
                name: "R1".into(),
                seqid: Some("1".into()),
                start: Some(100),
                end: Some(200),
            })],
            total: 1,
            skipped: 0,
        };

        let json = to_pretty(&page).expect("json");
        assert!(json.contains('\n'));
        assert!(json.contains("\"kind\": \"region\""));
        assert!(json.contains("\"region_id\": \"7\""));
        assert!(json.contains("\"total\": 1"));
    }
}
