pub mod outcome;
pub mod plan;
pub mod record;
pub mod response;
pub mod trip;

pub use outcome::BestEffort;
pub use plan::{Accommodations, Activity, DayPlan, GeneratedTrip, Listing, TripPlan};
pub use record::{CallerIdentity, TripRecord, User};
pub use response::parse_structured_response;
pub use trip::{GroupType, TripRequest, TripRequestPayload};
