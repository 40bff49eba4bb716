use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::Result,
    store::TripStore,
    types::{CallerIdentity, GeneratedTrip, TripRecord, User},
};

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    trips: HashMap<Uuid, TripRecord>,
}

/// Process-local store, used when no database is configured and in tests.
#[derive(Debug, Default)]
pub struct MemoryTripStore {
    state: RwLock<MemoryState>,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TripStore for MemoryTripStore {
    async fn upsert_user(&self, identity: &CallerIdentity) -> Result<User> {
        let mut state = self.state.write().await;
        if let Some(user) = state.users.values().find(|user| user.email == identity.email) {
            return Ok(user.clone());
        }

        let user = User::from_identity(identity);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn create_trip(&self, user_id: Uuid, trip: &GeneratedTrip) -> Result<TripRecord> {
        let record = TripRecord::new(user_id, trip.clone());
        self.state
            .write()
            .await
            .trips
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_trip(&self, id: Uuid) -> Result<Option<TripRecord>> {
        Ok(self.state.read().await.trips.get(&id).cloned())
    }

    async fn get_trip_with_owner(&self, id: Uuid) -> Result<Option<(TripRecord, User)>> {
        let state = self.state.read().await;
        Ok(state.trips.get(&id).and_then(|trip| {
            state
                .users
                .get(&trip.user_id)
                .map(|user| (trip.clone(), user.clone()))
        }))
    }

    async fn list_trips_for_user(&self, email: &str) -> Result<Option<Vec<TripRecord>>> {
        let state = self.state.read().await;
        let Some(user) = state.users.values().find(|user| user.email == email) else {
            return Ok(None);
        };

        let mut trips: Vec<TripRecord> = state
            .trips
            .values()
            .filter(|trip| trip.user_id == user.id)
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Some(trips))
    }

    async fn delete_trip(&self, id: Uuid) -> Result<bool> {
        Ok(self.state.write().await.trips.remove(&id).is_some())
    }
}
