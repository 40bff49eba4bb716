use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{completion_schema, services::maps, types::trip::TripRequest};

/// Structured itinerary returned by the text-generation provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    /// A catchy and inviting name for the trip (e.g. 'Parisian Romance Getaway')
    pub trip_name: String,
    /// A brief, exciting overview of the entire trip, highlighting key experiences
    pub overview: String,
    /// Approximate local travel costs for the whole trip with currency symbol (e.g. '₹5000 - ₹8000')
    pub estimated_local_travel_charges: String,
    /// Practical tips for the destination
    pub pro_tips: Vec<String>,
    /// One entry per day of the trip, in order
    pub daily_itinerary: Vec<DayPlan>,
    /// Recommended places to stay
    pub accommodations: Accommodations,
}

completion_schema!(TripPlan, "trip_plan");

/// A single day of the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// 1-based day counter within the itinerary
    pub day: u32,
    /// Theme for the day (e.g. 'Ancient History & Grand Markets')
    pub theme: String,
    /// Morning, afternoon and evening activities in order
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Time of day (Morning, Afternoon, Evening)
    pub time: String,
    /// What to do, including the place name
    pub description: String,
    /// Specific, descriptive place name (e.g. 'Colosseum, Rome')
    pub place_name: String,
    /// Hosted illustration of the place, filled in after generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(skip)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Accommodations {
    /// 2-3 hotel recommendations
    pub hotels: Vec<Listing>,
    /// 2-3 hostel recommendations, or an empty list when hostels do not suit the group
    pub hostels: Vec<Listing>,
}

/// An accommodation recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub name: String,
    /// Short description emphasising amenities and suitability for the group/budget
    pub description: String,
    /// Price per night with currency symbol (e.g. '₹X - ₹Y per night')
    pub price_range: String,
    /// Google Maps search link for the listing
    pub google_maps_link: String,
}

impl TripPlan {
    /// Rebuild every listing's map link from its name and the destination.
    pub fn normalize_map_links(&mut self, destination: &str) {
        let listings = self
            .accommodations
            .hotels
            .iter_mut()
            .chain(self.accommodations.hostels.iter_mut());

        for listing in listings {
            listing.google_maps_link = maps::search_link(&listing.name, destination);
        }
    }

    /// Describe the ways this plan disagrees with the request it answers.
    ///
    /// Empty when the day count and day numbering line up.
    pub fn drift_from(&self, request: &TripRequest) -> Vec<String> {
        let mut issues = Vec::new();

        if self.daily_itinerary.len() != request.days as usize {
            issues.push(format!(
                "requested {} days but received {}",
                request.days,
                self.daily_itinerary.len()
            ));
        }

        for (index, day) in self.daily_itinerary.iter().enumerate() {
            let expected = index as u32 + 1;
            if day.day != expected {
                issues.push(format!(
                    "itinerary entry {} is numbered day {}",
                    expected, day.day
                ));
            }
        }

        issues
    }

    pub fn activities_mut(&mut self) -> impl Iterator<Item = &mut Activity> {
        self.daily_itinerary
            .iter_mut()
            .flat_map(|day| day.activities.iter_mut())
    }
}

/// A generated plan together with the request that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTrip {
    #[serde(flatten)]
    pub plan: TripPlan,
    pub input_details: TripRequest,
}

impl GeneratedTrip {
    pub fn new(plan: TripPlan, input_details: TripRequest) -> Self {
        Self {
            plan,
            input_details,
        }
    }
}
