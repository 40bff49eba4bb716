use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{plan::GeneratedTrip, trip::GroupType};

/// The caller as asserted by the upstream authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
}

impl CallerIdentity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            image: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn from_identity(identity: &CallerIdentity) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: identity.email.clone(),
            name: identity.name.clone(),
            image: identity.image.clone(),
            created_at: now(),
        }
    }
}

/// A saved trip. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub destination: String,
    pub group_type: GroupType,
    pub number_of_people: u32,
    pub days: u32,
    pub budget: String,
    pub result: GeneratedTrip,
    pub created_at: DateTime<Utc>,
}

impl TripRecord {
    pub fn new(user_id: Uuid, result: GeneratedTrip) -> Self {
        let input = &result.input_details;
        Self {
            id: Uuid::new_v4(),
            user_id,
            destination: input.destination.clone(),
            group_type: input.group_type,
            number_of_people: input.number_of_people,
            days: input.days,
            budget: input.budget.clone(),
            created_at: now(),
            result,
        }
    }
}

/// Stored timestamps keep microsecond precision.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
