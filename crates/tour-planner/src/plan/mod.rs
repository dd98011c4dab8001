// Planning results: free-text sections and the structured itinerary,
// plus the cleanup applied to raw itinerary text before parsing.

pub mod itinerary;
pub mod sections;
pub mod unwrap;
