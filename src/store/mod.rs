//! Trip persistence.
//!
//! Handlers only see the [`TripStore`] trait; each call is one atomic
//! operation against the backing store.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::Result,
    types::{CallerIdentity, GeneratedTrip, TripRecord, User},
};

pub use memory::MemoryTripStore;
pub use sqlite::SqliteTripStore;

#[async_trait]
pub trait TripStore: Send + Sync {
    /// Fetch the user with this email, creating it when absent.
    async fn upsert_user(&self, identity: &CallerIdentity) -> Result<User>;

    async fn create_trip(&self, user_id: Uuid, trip: &GeneratedTrip) -> Result<TripRecord>;

    async fn get_trip(&self, id: Uuid) -> Result<Option<TripRecord>>;

    /// The trip together with the user that owns it.
    async fn get_trip_with_owner(&self, id: Uuid) -> Result<Option<(TripRecord, User)>>;

    /// `None` when no user has this email; otherwise their trips, newest first.
    async fn list_trips_for_user(&self, email: &str) -> Result<Option<Vec<TripRecord>>>;

    /// Returns whether a trip was removed.
    async fn delete_trip(&self, id: Uuid) -> Result<bool>;
}
