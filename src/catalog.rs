//! Component catalog, newest first.

use chrono::NaiveDate;
use serde::Serialize;

/// Kinds of component the crate ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    HeartCounter,
    SoftSwitch,
    SidePanel,
    MorphMenuIcon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentEntry {
    pub kind: ComponentKind,
    pub name: &'static str,
    pub symbol: &'static str,
    pub added_at: NaiveDate,
}

impl ComponentEntry {
    /// Medium-style date, e.g. "Dec 3, 2025".
    pub fn added_label(&self) -> String {
        self.added_at.format("%b %-d, %Y").to_string()
    }
}

const ENTRIES: [(ComponentKind, &str, &str, (i32, u32, u32)); 4] = [
    (ComponentKind::SoftSwitch, "Soft Switch", "switch.2", (2025, 12, 2)),
    (ComponentKind::SidePanel, "Side Panel", "sidebar.right", (2024, 1, 12)),
    (ComponentKind::HeartCounter, "Heart Counter", "heart.fill", (2025, 12, 3)),
    (ComponentKind::MorphMenuIcon, "Morph Menu Icon", "square.grid.2x2", (2024, 1, 10)),
];

/// Every component, newest first.
pub fn catalog() -> Vec<ComponentEntry> {
    let mut entries: Vec<ComponentEntry> = ENTRIES
        .iter()
        .filter_map(|&(kind, name, symbol, (y, m, d))| {
            Some(ComponentEntry {
                kind,
                name,
                symbol,
                added_at: NaiveDate::from_ymd_opt(y, m, d)?,
            })
        })
        .collect();
    entries.sort_by(|a, b| b.added_at.cmp(&a.added_at));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_catalog_is_newest_first() {
        let names: Vec<_> = catalog().iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec!["Heart Counter", "Soft Switch", "Side Panel", "Morph Menu Icon"]
        );
    }

    #[test]
    fn test_added_label_is_medium_style() {
        let entries = catalog();
        assert_eq!(entries[0].added_label(), "Dec 3, 2025");
        assert_eq!(entries[3].added_label(), "Jan 10, 2024");
    }

    #[test]
    fn test_entries_serialize_with_iso_dates() {
        let json = serde_json::to_value(&catalog()[0]).unwrap();
        assert_eq!(json["kind"], "heart_counter");
        assert_eq!(json["added_at"], "2025-12-03");
    }
}
