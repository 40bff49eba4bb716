use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, TripError};

/// Who is travelling together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Solo,
    Couple,
    Friends,
    Family,
}

impl GroupType {
    pub const ALL: [GroupType; 4] = [
        GroupType::Solo,
        GroupType::Couple,
        GroupType::Friends,
        GroupType::Family,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupType::Solo => "solo",
            GroupType::Couple => "couple",
            GroupType::Friends => "friends",
            GroupType::Family => "family",
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupType {
    type Err = TripError;

    fn from_str(value: &str) -> Result<Self> {
        let wanted = value.trim();
        GroupType::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                TripError::Validation(format!(
                    "Unknown group type `{wanted}` (expected solo, couple, friends or family)"
                ))
            })
    }
}

/// Validated trip parameters. Every field is present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub destination: String,
    pub group_type: GroupType,
    pub number_of_people: u32,
    pub days: u32,
    pub budget: String,
}

/// Raw trip parameters as they arrive from a client, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequestPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub group_type: Option<String>,
    #[serde(default)]
    pub number_of_people: Option<u32>,
    #[serde(default)]
    pub days: Option<u32>,
    /// A label such as "Medium" or an amount; amounts are kept as their text.
    #[serde(default, deserialize_with = "budget_text")]
    pub budget: Option<String>,
}

impl TripRequestPayload {
    /// Check that all five fields are present and usable.
    ///
    /// Blank strings and zero counts are reported as missing, all at once.
    pub fn validate(self) -> Result<TripRequest> {
        let destination = non_blank(self.destination);
        let group_type = non_blank(self.group_type);
        let number_of_people = self.number_of_people.filter(|count| *count > 0);
        let days = self.days.filter(|count| *count > 0);
        let budget = non_blank(self.budget);

        let mut missing = Vec::new();
        if destination.is_none() {
            missing.push("destination");
        }
        if group_type.is_none() {
            missing.push("groupType");
        }
        if number_of_people.is_none() {
            missing.push("numberOfPeople");
        }
        if days.is_none() {
            missing.push("days");
        }
        if budget.is_none() {
            missing.push("budget");
        }

        match (destination, group_type, number_of_people, days, budget) {
            (
                Some(destination),
                Some(group_type),
                Some(number_of_people),
                Some(days),
                Some(budget),
            ) => Ok(TripRequest {
                destination,
                group_type: group_type.parse()?,
                number_of_people,
                days,
                budget,
            }),
            _ => Err(TripError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            ))),
        }
    }
}

fn budget_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Budget {
        Label(String),
        Amount(serde_json::Number),
    }

    Ok(Option::<Budget>::deserialize(deserializer)?.map(|budget| match budget {
        Budget::Label(label) => label,
        Budget::Amount(amount) => amount.to_string(),
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris_payload() -> TripRequestPayload {
        TripRequestPayload {
            destination: Some("Paris".into()),
            group_type: Some("solo".into()),
            number_of_people: Some(1),
            days: Some(3),
            budget: Some("Medium".into()),
        }
    }

    #[test]
    fn valid_payload_becomes_request() {
        let request = paris_payload().validate().unwrap();
        assert_eq!(request.destination, "Paris");
        assert_eq!(request.group_type, GroupType::Solo);
        assert_eq!(request.days, 3);
    }

    #[test]
    fn missing_fields_are_all_listed() {
        let payload = TripRequestPayload {
            days: None,
            budget: Some("   ".into()),
            ..paris_payload()
        };

        let err = payload.validate().unwrap_err();
        assert!(matches!(err, TripError::Validation(_)));
        assert_eq!(err.public_message(), "Missing required fields: days, budget");
    }

    #[test]
    fn zero_days_counts_as_missing() {
        let payload = TripRequestPayload {
            days: Some(0),
            ..paris_payload()
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn group_type_is_case_insensitive_but_closed() {
        assert_eq!("Family".parse::<GroupType>().unwrap(), GroupType::Family);
        assert!("business".parse::<GroupType>().is_err());
    }

    #[test]
    fn payload_reads_camel_case() {
        let payload: TripRequestPayload = serde_json::from_value(serde_json::json!({
            "destination": "Rome",
            "groupType": "couple",
            "numberOfPeople": 2,
            "days": 4,
            "budget": "High"
        }))
        .unwrap();

        let request = payload.validate().unwrap();
        assert_eq!(request.group_type, GroupType::Couple);
        assert_eq!(request.number_of_people, 2);
    }

    #[test]
    fn numeric_budget_is_kept_as_text() {
        let payload: TripRequestPayload = serde_json::from_value(serde_json::json!({
            "destination": "Goa",
            "groupType": "friends",
            "numberOfPeople": 3,
            "days": 2,
            "budget": 50000
        }))
        .unwrap();

        assert_eq!(payload.validate().unwrap().budget, "50000");
    }

    #[test]
    fn budget_of_another_shape_is_rejected() {
        let parsed = serde_json::from_value::<TripRequestPayload>(serde_json::json!({
            "budget": ["High"]
        }));
        assert!(parsed.is_err());

        let absent: TripRequestPayload =
            serde_json::from_value(serde_json::json!({ "budget": null })).unwrap();
        assert_eq!(absent.budget, None);
    }
}
