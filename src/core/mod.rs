pub mod images;
pub mod planner;

pub use images::{generate_place_image, upload_image, PlaceImagePipeline};
pub use planner::TripPlanner;
