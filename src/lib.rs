//! trip-planner-rs: AI-generated travel itineraries behind a small HTTP API
//!
//! A trip request goes out as one schema-constrained Gemini call. The reply is
//! validated against the same schema it was generated under, optionally
//! illustrated with per-activity images, and stored per user.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trip_planner_rs::{GeminiClient, GroupType, TripPlanner, TripRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_key = std::env::var("GEMINI_API_KEY")?;
//!     let planner = TripPlanner::new(Arc::new(GeminiClient::new(api_key)));
//!
//!     let request = TripRequest {
//!         destination: "Paris, France".into(),
//!         group_type: GroupType::Solo,
//!         number_of_people: 1,
//!         days: 3,
//!         budget: "Medium".into(),
//!     };
//!
//!     let trip = planner.plan_trip(&request).await?;
//!     println!("{}", serde_json::to_string_pretty(&trip)?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod schemas;
pub mod server;
pub mod services;
pub mod store;
pub mod types;

pub use config::{AppConfig, CloudinaryConfig, GeminiConfig};
pub use core::{PlaceImagePipeline, TripPlanner};
pub use error::{GenerationError, Result, TripError};
pub use schemas::{CompletionSchema, SchemaHandle};
pub use server::{build_router, run_serve, AppState};
pub use services::{CloudinaryClient, GeminiClient, ImageGenerator, ImageHost, TextGenerator};
pub use store::{MemoryTripStore, SqliteTripStore, TripStore};
pub use types::{
    BestEffort, CallerIdentity, GeneratedTrip, GroupType, TripPlan, TripRecord, TripRequest,
    TripRequestPayload, User,
};

#[cfg(feature = "cli")]
pub mod cli;
