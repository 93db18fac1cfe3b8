use std::collections::HashMap;

use crate::table::Table;

/// Old-name ↔ new-name view over the rename table.
///
/// Only one hop is resolved. When several old names point at the same new
/// name, the reverse lookup yields the last one in table order.
#[derive(Debug, Default)]
pub struct RenameIndex<'a> {
    forward: HashMap<&'a str, &'a str>,
    reverse: HashMap<&'a str, &'a str>,
}

impl<'a> RenameIndex<'a> {
    /// Build both directions from `renamed`, reading the new name from the
    /// `new_name_field` attribute. A record without a value maps to `""`.
    pub fn build(renamed: &'a Table, new_name_field: &str) -> Self {
        let mut forward = HashMap::with_capacity(renamed.len());
        let mut reverse = HashMap::with_capacity(renamed.len());

        for (old, attrs) in renamed.iter() {
            let new = attrs.get(new_name_field).unwrap_or("");
            forward.insert(old, new);
            if !new.is_empty() {
                reverse.insert(new, old);
            }
        }

        Self { forward, reverse }
    }

    /// New name recorded for `old`, if `old` has a rename record.
    pub fn new_name(&self, old: &str) -> Option<&'a str> {
        self.forward.get(old).copied()
    }

    /// Original name of the feature now living under `new`.
    pub fn old_name(&self, new: &str) -> Option<&'a str> {
        self.reverse.get(new).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::AttributeSet;

    fn renamed(rows: &[(&str, &str)]) -> Table {
        let mut table = Table::new(["neuer Name"]);
        for (old, new) in rows {
            table.insert(*old, [("neuer Name", *new)].into_iter().collect::<AttributeSet>());
        }
        table
    }

    #[test]
    fn resolves_both_directions() {
        let table = renamed(&[("bioreactor", "bio reactor"), ("kiosk", "newsstand")]);
        let index = RenameIndex::build(&table, "neuer Name");
        assert_eq!(index.new_name("kiosk"), Some("newsstand"));
        assert_eq!(index.old_name("newsstand"), Some("kiosk"));
        assert_eq!(index.new_name("newsstand"), None);
        assert_eq!(index.old_name("kiosk"), None);
    }

    #[test]
    fn reverse_lookup_last_wins() {
        let table = renamed(&[("a", "shared"), ("b", "shared")]);
        let index = RenameIndex::build(&table, "neuer Name");
        assert_eq!(index.old_name("shared"), Some("b"));
    }

    #[test]
    fn missing_field_maps_to_empty() {
        let mut table = Table::new(["Kommentar"]);
        table.insert("a", [("Kommentar", "typo")].into_iter().collect::<AttributeSet>());
        let index = RenameIndex::build(&table, "neuer Name");
        assert_eq!(index.new_name("a"), Some(""));
        assert_eq!(index.old_name(""), None);
    }
}
