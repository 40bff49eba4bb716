use crate::{services::maps, types::TripRequest};

/// Build the itinerary prompt for a validated request.
///
/// The JSON skeleton mirrors the response schema, but only the schema sent
/// alongside the prompt is enforced by the provider.
pub fn build_trip_prompt(request: &TripRequest) -> String {
    let destination = &request.destination;
    let hotel_one = maps::search_link("Hotel Name 1", destination);
    let hotel_two = maps::search_link("Hotel Name 2", destination);
    let hostel_one = maps::search_link("Hostel Name 1", destination);

    format!(
        r#"You are a highly experienced and creative travel planner.
Generate a detailed travel plan for a {group} group of {people} people.
Destination: {destination}
Duration: {days} days
Budget: {budget} (consider this as a general guide: Low, Medium, High)

Provide the output as a JSON object with the following strict structure.
Ensure all 'placeName' fields are specific and descriptive for potential image generation.
Provide 2-3 hotel recommendations and 2-3 hostel recommendations based on the budget and group type.
If hostels are not applicable for the group type (e.g., Luxury Couple), provide an empty array for hostels.
Ensure all links are valid Google Maps search links built from the listing name and the destination.

{{
  "tripName": "A catchy and inviting name for the trip (e.g., 'Parisian Romance Getaway')",
  "overview": "A brief, exciting overview of the entire trip, highlighting key experiences.",
  "estimatedLocalTravelCharges": "Approximate local travel costs (public transport, taxis) in INR for the entire trip, excluding flights and hotels, with currency symbol (e.g., '₹5000 - ₹8000').",
  "proTips": ["Tip 1 for the destination", "Tip 2 for the destination", "Tip 3 for the destination"],
  "dailyItinerary": [
    {{
      "day": 1,
      "theme": "Theme for Day 1 (e.g., 'Ancient History & Grand Markets')",
      "activities": [
        {{ "time": "Morning", "description": "Activity description and place name", "placeName": "Colosseum, Rome" }},
        {{ "time": "Afternoon", "description": "Activity description and place name", "placeName": "Campo de' Fiori, Rome" }},
        {{ "time": "Evening", "description": "Activity or dinner suggestion and place name", "placeName": "Trastevere, Rome" }}
      ]
    }}
  ],
  "accommodations": {{
    "hotels": [
      {{ "name": "Hotel Name 1", "description": "Amenities and suitability for the group/budget.", "priceRange": "₹X - ₹Y per night", "googleMapsLink": "{hotel_one}" }},
      {{ "name": "Hotel Name 2", "description": "Short description of the hotel.", "priceRange": "₹X - ₹Y per night", "googleMapsLink": "{hotel_two}" }}
    ],
    "hostels": [
      {{ "name": "Hostel Name 1", "description": "Social atmosphere or budget-friendliness.", "priceRange": "₹X - ₹Y per night", "googleMapsLink": "{hostel_one}" }}
    ]
  }}
}}

The dailyItinerary array must contain exactly {days} entries, numbered from day 1 to day {days}.
Ensure the JSON is perfectly formatted and valid. Do not include any extra text outside the JSON."#,
        group = request.group_type,
        people = request.number_of_people,
        destination = destination,
        days = request.days,
        budget = request.budget,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GroupType;

    fn request() -> TripRequest {
        TripRequest {
            destination: "Kyoto Japan".into(),
            group_type: GroupType::Couple,
            number_of_people: 2,
            days: 5,
            budget: "High".into(),
        }
    }

    #[test]
    fn prompt_embeds_every_request_field() {
        let prompt = build_trip_prompt(&request());

        assert!(prompt.contains("couple group of 2 people"));
        assert!(prompt.contains("Destination: Kyoto Japan"));
        assert!(prompt.contains("Duration: 5 days"));
        assert!(prompt.contains("Budget: High"));
        assert!(prompt.contains("exactly 5 entries"));
    }

    #[test]
    fn prompt_carries_fixed_instructions() {
        let prompt = build_trip_prompt(&request());

        assert!(prompt.contains("2-3 hostel recommendations"));
        assert!(prompt.contains("provide an empty array for hostels"));
        assert!(prompt.contains("'placeName' fields are specific"));
        assert!(prompt.contains("https://www.google.com/maps/search/Hotel+Name+1+Kyoto+Japan"));
        assert!(prompt.contains("Do not include any extra text outside the JSON."));
    }
}
