use std::collections::HashMap;

/// Lower-cased column names the pipeline looks up.
pub mod columns {
    pub const TYPE: &str = "type";
    pub const FIELD_TYPE: &str = "field type";
    pub const HIDDEN: &str = "hidden";
    pub const OPTIONS: &str = "options";
    pub const NAME: &str = "name";
    pub const INTERNAL_NAME: &str = "internal name";
    pub const DESCRIPTION: &str = "description";
    pub const GROUP_NAME: &str = "group name";
    pub const DISPLAY_ORDER: &str = "display order";
    pub const FORM_FIELD: &str = "form field";
    pub const HUBSPOT_DEFINED: &str = "hubspot defined";

    /// Display names used when the normalizer adds a column.
    pub const FIELD_TYPE_HEADER: &str = "Field Type";
    pub const HIDDEN_HEADER: &str = "Hidden";
}

/// Case-insensitive header name → column position.
///
/// When two headers differ only in case the first one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut positions = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            positions
                .entry(header.as_ref().to_lowercase())
                .or_insert(idx);
        }
        Self { positions }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(&name.to_lowercase()).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let index = HeaderIndex::new(&["Name", "Internal Name", "TYPE"]);
        assert_eq!(index.position("name"), Some(0));
        assert_eq!(index.position("Internal NAME"), Some(1));
        assert_eq!(index.position(columns::TYPE), Some(2));
        assert_eq!(index.position(columns::OPTIONS), None);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let index = HeaderIndex::new(&["Hidden", "hidden"]);
        assert_eq!(index.position("hidden"), Some(0));
    }
}
