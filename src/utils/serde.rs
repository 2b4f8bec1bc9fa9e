use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StringOrVec {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl StringOrVec {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::None => Vec::new(),
            Self::Single(value) => vec![value],
            Self::Multiple(values) => values,
        }
    }
}

/// Index documents are loose about numeric identifiers; both spellings
/// appear for the same field across loader versions.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StringOrU64 {
    String(String),
    Number(u64),
}

impl StringOrU64 {
    pub fn as_string(&self) -> String {
        match self {
            StringOrU64::String(s) => s.clone(),
            StringOrU64::Number(n) => n.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StringOrU64, StringOrVec};

    #[test]
    fn string_or_vec_covers_all_shapes() {
        assert_eq!(StringOrVec::None.into_vec(), Vec::<String>::new());
        assert_eq!(StringOrVec::Single("X".into()).into_vec(), vec!["X"]);
        assert_eq!(
            StringOrVec::Multiple(vec!["A".into(), "B".into()]).into_vec(),
            vec!["A", "B"]
        );
    }

    #[test]
    fn string_or_u64_normalizes_to_string() {
        let n: StringOrU64 = serde_json::from_str("7").unwrap();
        assert_eq!(n.as_string(), "7");
        let s: StringOrU64 = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(s.as_string(), "7");
    }
}
