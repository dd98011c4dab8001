// Free-text plan sections returned directly by the planning service.

use serde::{Deserialize, Serialize};

/// One of the five fixed plan sections, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Transportation,
    Accommodation,
    Highlights,
    Itinerary,
    Additional,
}

impl SectionKey {
    pub const ALL: [SectionKey; 5] = [
        SectionKey::Transportation,
        SectionKey::Accommodation,
        SectionKey::Highlights,
        SectionKey::Itinerary,
        SectionKey::Additional,
    ];

    /// JSON key used by the service.
    pub fn key(self) -> &'static str {
        match self {
            SectionKey::Transportation => "transportation",
            SectionKey::Accommodation => "accommodation",
            SectionKey::Highlights => "highlights",
            SectionKey::Itinerary => "itinerary",
            SectionKey::Additional => "additional",
        }
    }

    /// Tab label: the key with its first letter capitalized.
    pub fn label(self) -> &'static str {
        match self {
            SectionKey::Transportation => "Transportation",
            SectionKey::Accommodation => "Accommodation",
            SectionKey::Highlights => "Highlights",
            SectionKey::Itinerary => "Itinerary",
            SectionKey::Additional => "Additional",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    /// Tab for a 0-based position, if one exists.
    pub fn from_index(idx: usize) -> Option<SectionKey> {
        Self::ALL.get(idx).copied()
    }

    pub fn next(self) -> SectionKey {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> SectionKey {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// All five sections of a flat plan. Every key is always populated; the
/// service response is rejected as a whole if any is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSections {
    pub transportation: String,
    pub accommodation: String,
    pub highlights: String,
    pub itinerary: String,
    pub additional: String,
}

impl PlanSections {
    pub fn get(&self, key: SectionKey) -> &str {
        match key {
            SectionKey::Transportation => &self.transportation,
            SectionKey::Accommodation => &self.accommodation,
            SectionKey::Highlights => &self.highlights,
            SectionKey::Itinerary => &self.itinerary,
            SectionKey::Additional => &self.additional,
        }
    }

    /// Section text split into display paragraphs, one per line.
    pub fn paragraphs(&self, key: SectionKey) -> Vec<&str> {
        self.get(key).split('\n').collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlanSections {
        PlanSections {
            transportation: "Take the 6am train.".into(),
            accommodation: "Hotel Sea View".into(),
            highlights: "Fort\nMarket".into(),
            itinerary: "Day 1: arrive".into(),
            additional: "Carry sunscreen".into(),
        }
    }

    #[test]
    fn get_returns_matching_section() {
        let s = sample();
        for key in SectionKey::ALL {
            let expected = match key {
                SectionKey::Transportation => "Take the 6am train.",
                SectionKey::Accommodation => "Hotel Sea View",
                SectionKey::Highlights => "Fort\nMarket",
                SectionKey::Itinerary => "Day 1: arrive",
                SectionKey::Additional => "Carry sunscreen",
            };
            assert_eq!(s.get(key), expected);
        }
    }

    #[test]
    fn paragraphs_split_on_newlines() {
        let s = sample();
        assert_eq!(s.paragraphs(SectionKey::Highlights), vec!["Fort", "Market"]);
        assert_eq!(s.paragraphs(SectionKey::Accommodation), vec!["Hotel Sea View"]);
    }

    #[test]
    fn tab_order_and_wrapping() {
        assert_eq!(SectionKey::Transportation.next(), SectionKey::Accommodation);
        assert_eq!(SectionKey::Additional.next(), SectionKey::Transportation);
        assert_eq!(SectionKey::Transportation.prev(), SectionKey::Additional);
        assert_eq!(SectionKey::from_index(3), Some(SectionKey::Itinerary));
        assert_eq!(SectionKey::from_index(5), None);
    }

    #[test]
    fn labels_capitalize_keys() {
        for key in SectionKey::ALL {
            let label = key.label();
            let mut chars = key.key().chars();
            let first = chars.next().unwrap().to_ascii_uppercase();
            assert_eq!(label, format!("{first}{}", chars.as_str()));
        }
    }

    #[test]
    fn deserializes_service_object() {
        let json = r#"{
            "transportation": "a", "accommodation": "b", "highlights": "c",
            "itinerary": "d", "additional": "e"
        }"#;
        let s: PlanSections = serde_json::from_str(json).unwrap();
        assert_eq!(s.get(SectionKey::Itinerary), "d");
    }
}
