// Trip request payload: the frozen parameter set sent to the planning service.
//
// Field names and enum values match the service's JSON contract verbatim
// (camelCase keys, lowercase modes, title-case tags).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Selectable options
// ---------------------------------------------------------------------------

/// A closed set of options the traveler picks from.
///
/// `ALL` fixes the display and cycling order.
pub trait Choice: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    /// Human-readable label shown in the form.
    fn label(self) -> &'static str;

    /// Step through `ALL` from `current`, passing through "nothing selected"
    /// at both ends.
    ///
    /// Forward: None -> first -> ... -> last -> None
    fn cycle(current: Option<Self>, forward: bool) -> Option<Self> {
        let all = Self::ALL;
        let idx = current.and_then(|c| all.iter().position(|v| *v == c));
        match (idx, forward) {
            (None, true) => all.first().copied(),
            (None, false) => all.last().copied(),
            (Some(i), true) => all.get(i + 1).copied(),
            (Some(0), false) => None,
            (Some(i), false) => all.get(i - 1).copied(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Flight,
    Train,
    Bus,
    Car,
}

impl Choice for TravelMode {
    const ALL: &'static [Self] = &[Self::Flight, Self::Train, Self::Bus, Self::Car];

    fn label(self) -> &'static str {
        match self {
            Self::Flight => "Flight",
            Self::Train => "Train",
            Self::Bus => "Bus",
            Self::Car => "Car",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotelPreference {
    Luxury,
    Premium,
    Comfort,
    Budget,
}

impl Choice for HotelPreference {
    const ALL: &'static [Self] = &[Self::Luxury, Self::Premium, Self::Comfort, Self::Budget];

    fn label(self) -> &'static str {
        match self {
            Self::Luxury => "Luxury (5 Star)",
            Self::Premium => "Premium (4 Star)",
            Self::Comfort => "Comfort (3 Star)",
            Self::Budget => "Budget Friendly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Family,
    Elderly,
    Couple,
    Friends,
    Solo,
}

impl Choice for GroupType {
    const ALL: &'static [Self] = &[
        Self::Family,
        Self::Elderly,
        Self::Couple,
        Self::Friends,
        Self::Solo,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Family => "Family with Children",
            Self::Elderly => "Senior Citizens",
            Self::Couple => "Couple",
            Self::Friends => "Friends Group",
            Self::Solo => "Solo Traveler",
        }
    }
}

/// Kind of place the traveler wants to visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationTag {
    Mountains,
    Beaches,
    Cities,
    #[serde(rename = "Historical Sites")]
    HistoricalSites,
    Wildlife,
    #[serde(rename = "Adventure Sports")]
    AdventureSports,
}

impl Choice for LocationTag {
    const ALL: &'static [Self] = &[
        Self::Mountains,
        Self::Beaches,
        Self::Cities,
        Self::HistoricalSites,
        Self::Wildlife,
        Self::AdventureSports,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Mountains => "Mountains",
            Self::Beaches => "Beaches",
            Self::Cities => "Cities",
            Self::HistoricalSites => "Historical Sites",
            Self::Wildlife => "Wildlife",
            Self::AdventureSports => "Adventure Sports",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DietaryTag {
    Vegetarian,
    Vegan,
    Halal,
    Kosher,
    #[serde(rename = "Gluten-Free")]
    GlutenFree,
    #[serde(rename = "No Preferences")]
    NoPreferences,
}

impl Choice for DietaryTag {
    const ALL: &'static [Self] = &[
        Self::Vegetarian,
        Self::Vegan,
        Self::Halal,
        Self::Kosher,
        Self::GlutenFree,
        Self::NoPreferences,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Vegetarian => "Vegetarian",
            Self::Vegan => "Vegan",
            Self::Halal => "Halal",
            Self::Kosher => "Kosher",
            Self::GlutenFree => "Gluten-Free",
            Self::NoPreferences => "No Preferences",
        }
    }
}

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

/// Trip budget in rupees.
///
/// Always a multiple of [`Budget::STEP`] within `[MIN, MAX]`; every
/// constructor clamps, so an out-of-range amount can never be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u32")]
pub struct Budget(u32);

impl Budget {
    pub const MIN: u32 = 10_000;
    pub const MAX: u32 = 500_000;
    pub const STEP: u32 = 5_000;
    pub const DEFAULT: Budget = Budget(50_000);

    /// Clamp `amount` into range and snap it to the nearest step
    /// (halfway rounds up).
    pub fn new(amount: i64) -> Self {
        let (min, max, step) = (Self::MIN as i64, Self::MAX as i64, Self::STEP as i64);
        if amount <= min {
            return Budget(Self::MIN);
        }
        if amount >= max {
            return Budget(Self::MAX);
        }
        let snapped = min + (amount - min + step / 2) / step * step;
        Budget(snapped.min(max) as u32)
    }

    pub fn amount(self) -> u32 {
        self.0
    }

    /// One step up, saturating at `MAX`.
    pub fn increment(self) -> Self {
        Budget::new(self.0 as i64 + Self::STEP as i64)
    }

    /// One step down, saturating at `MIN`.
    pub fn decrement(self) -> Self {
        Budget::new(self.0 as i64 - Self::STEP as i64)
    }

    /// Rupee display with Indian digit grouping, e.g. `₹1,00,000`.
    pub fn display_inr(self) -> String {
        format!("\u{20b9}{}", group_indian(self.0))
    }
}

impl Default for Budget {
    fn default() -> Self {
        Budget::DEFAULT
    }
}

impl From<i64> for Budget {
    fn from(amount: i64) -> Self {
        Budget::new(amount)
    }
}

impl From<Budget> for u32 {
    fn from(budget: Budget) -> Self {
        budget.0
    }
}

/// Group digits as thousands then pairs: 1234567 -> "12,34,567".
fn group_indian(n: u32) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

// ---------------------------------------------------------------------------
// TripRequest
// ---------------------------------------------------------------------------

/// Immutable snapshot of one planning attempt, serialized as the POST body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub source: String,
    pub destination: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub travel_mode: TravelMode,
    pub hotel_preference: HotelPreference,
    pub location_preference: Vec<LocationTag>,
    pub dietary_preferences: Vec<DietaryTag>,
    pub group_type: GroupType,
    pub budget: Budget,
    pub special_requirements: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
