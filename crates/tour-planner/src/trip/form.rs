// Form state aggregator: accumulates field edits into one trip request.
//
// Scalar fields are replaced wholesale (last write wins). Tag sets only
// change through `toggle_*`, which keeps each tag at most once.

use chrono::NaiveDate;
use thiserror::Error;

use super::request::{
    Budget, DietaryTag, GroupType, HotelPreference, LocationTag, TravelMode, TripRequest,
};

// ---------------------------------------------------------------------------
// Fields and edits
// ---------------------------------------------------------------------------

/// Identifies one input of the trip form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Source,
    Destination,
    DateFrom,
    DateTo,
    Budget,
    TravelMode,
    HotelPreference,
    LocationPreference,
    DietaryPreferences,
    GroupType,
    SpecialRequirements,
}

impl FormField {
    pub const ALL: [FormField; 11] = [
        FormField::Source,
        FormField::Destination,
        FormField::DateFrom,
        FormField::DateTo,
        FormField::Budget,
        FormField::TravelMode,
        FormField::HotelPreference,
        FormField::LocationPreference,
        FormField::DietaryPreferences,
        FormField::GroupType,
        FormField::SpecialRequirements,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Source => "Source Location",
            FormField::Destination => "Destination",
            FormField::DateFrom => "From Date",
            FormField::DateTo => "To Date",
            FormField::Budget => "Budget",
            FormField::TravelMode => "Travel Mode",
            FormField::HotelPreference => "Hotel Preference",
            FormField::LocationPreference => "Location Preferences",
            FormField::DietaryPreferences => "Dietary Preferences",
            FormField::GroupType => "Group Type",
            FormField::SpecialRequirements => "Special Requirements",
        }
    }

    /// Fields that must be filled in before a request can be sent.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            FormField::Source
                | FormField::Destination
                | FormField::DateFrom
                | FormField::DateTo
                | FormField::TravelMode
                | FormField::HotelPreference
                | FormField::GroupType
        )
    }

    /// Next field in display order, wrapping around.
    pub fn next(self) -> FormField {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous field in display order, wrapping around.
    pub fn prev(self) -> FormField {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A single field-level update to the form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEdit {
    Source(String),
    Destination(String),
    DateFrom(Option<NaiveDate>),
    DateTo(Option<NaiveDate>),
    TravelMode(Option<TravelMode>),
    HotelPreference(Option<HotelPreference>),
    GroupType(Option<GroupType>),
    Budget(i64),
    SpecialRequirements(String),
    ToggleLocation(LocationTag),
    ToggleDietary(DietaryTag),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("missing required fields: {}", field_list(.0))]
    MissingFields(Vec<FormField>),
}

fn field_list(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// TripForm
// ---------------------------------------------------------------------------

/// The in-progress trip parameters as entered by the traveler.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TripForm {
    source: String,
    destination: String,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    travel_mode: Option<TravelMode>,
    hotel_preference: Option<HotelPreference>,
    location_preference: Vec<LocationTag>,
    dietary_preferences: Vec<DietaryTag>,
    group_type: Option<GroupType>,
    budget: Budget,
    special_requirements: String,
}

impl TripForm {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Accessors --

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn date_from(&self) -> Option<NaiveDate> {
        self.date_from
    }

    pub fn date_to(&self) -> Option<NaiveDate> {
        self.date_to
    }

    pub fn travel_mode(&self) -> Option<TravelMode> {
        self.travel_mode
    }

    pub fn hotel_preference(&self) -> Option<HotelPreference> {
        self.hotel_preference
    }

    pub fn group_type(&self) -> Option<GroupType> {
        self.group_type
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    pub fn special_requirements(&self) -> &str {
        &self.special_requirements
    }

    pub fn location_preference(&self) -> &[LocationTag] {
        &self.location_preference
    }

    pub fn dietary_preferences(&self) -> &[DietaryTag] {
        &self.dietary_preferences
    }

    // -- Scalar setters --

    pub fn set_source(&mut self, value: impl Into<String>) {
        self.source = value.into();
    }

    pub fn set_destination(&mut self, value: impl Into<String>) {
        self.destination = value.into();
    }

    pub fn set_date_from(&mut self, value: Option<NaiveDate>) {
        self.date_from = value;
    }

    pub fn set_date_to(&mut self, value: Option<NaiveDate>) {
        self.date_to = value;
    }

    pub fn set_travel_mode(&mut self, value: Option<TravelMode>) {
        self.travel_mode = value;
    }

    pub fn set_hotel_preference(&mut self, value: Option<HotelPreference>) {
        self.hotel_preference = value;
    }

    pub fn set_group_type(&mut self, value: Option<GroupType>) {
        self.group_type = value;
    }

    /// Store the budget, clamped and snapped to the allowed steps.
    pub fn set_budget(&mut self, amount: i64) {
        self.budget = Budget::new(amount);
    }

    pub fn set_special_requirements(&mut self, value: impl Into<String>) {
        self.special_requirements = value.into();
    }

    // -- Set-valued toggles --

    pub fn toggle_location(&mut self, tag: LocationTag) {
        toggle(&mut self.location_preference, tag);
    }

    pub fn toggle_dietary(&mut self, tag: DietaryTag) {
        toggle(&mut self.dietary_preferences, tag);
    }

    pub fn has_location(&self, tag: LocationTag) -> bool {
        self.location_preference.contains(&tag)
    }

    pub fn has_dietary(&self, tag: DietaryTag) -> bool {
        self.dietary_preferences.contains(&tag)
    }

    /// Apply one edit through the matching setter.
    pub fn apply(&mut self, edit: FormEdit) {
        match edit {
            FormEdit::Source(v) => self.set_source(v),
            FormEdit::Destination(v) => self.set_destination(v),
            FormEdit::DateFrom(v) => self.set_date_from(v),
            FormEdit::DateTo(v) => self.set_date_to(v),
            FormEdit::TravelMode(v) => self.set_travel_mode(v),
            FormEdit::HotelPreference(v) => self.set_hotel_preference(v),
            FormEdit::GroupType(v) => self.set_group_type(v),
            FormEdit::Budget(v) => self.set_budget(v),
            FormEdit::SpecialRequirements(v) => self.set_special_requirements(v),
            FormEdit::ToggleLocation(tag) => self.toggle_location(tag),
            FormEdit::ToggleDietary(tag) => self.toggle_dietary(tag),
        }
    }

    // -- Submission --

    /// Required fields that are still empty, in display order.
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|f| f.is_required() && !self.is_filled(*f))
            .collect()
    }

    fn is_filled(&self, field: FormField) -> bool {
        match field {
            FormField::Source => !self.source.trim().is_empty(),
            FormField::Destination => !self.destination.trim().is_empty(),
            FormField::DateFrom => self.date_from.is_some(),
            FormField::DateTo => self.date_to.is_some(),
            FormField::TravelMode => self.travel_mode.is_some(),
            FormField::HotelPreference => self.hotel_preference.is_some(),
            FormField::GroupType => self.group_type.is_some(),
            FormField::Budget
            | FormField::LocationPreference
            | FormField::DietaryPreferences
            | FormField::SpecialRequirements => true,
        }
    }

    /// Freeze the current values into a request.
    ///
    /// Fails with the list of missing fields if any required field is empty.
    pub fn snapshot(&self) -> Result<TripRequest, FormError> {
        let filled = (
            self.date_from,
            self.date_to,
            self.travel_mode,
            self.hotel_preference,
            self.group_type,
        );
        match filled {
            (Some(date_from), Some(date_to), Some(travel_mode), Some(hotel_preference), Some(group_type))
                if !self.source.trim().is_empty() && !self.destination.trim().is_empty() =>
            {
                Ok(TripRequest {
                    source: self.source.trim().to_string(),
                    destination: self.destination.trim().to_string(),
                    date_from,
                    date_to,
                    travel_mode,
                    hotel_preference,
                    location_preference: self.location_preference.clone(),
                    dietary_preferences: self.dietary_preferences.clone(),
                    group_type,
                    budget: self.budget,
                    special_requirements: self.special_requirements.clone(),
                })
            }
            _ => Err(FormError::MissingFields(self.missing_fields())),
        }
    }
}

/// Remove `item` if present, otherwise append it.
fn toggle<T: PartialEq>(set: &mut Vec<T>, item: T) {
    if let Some(idx) = set.iter().position(|x| *x == item) {
        set.remove(idx);
    } else {
        set.push(item);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
