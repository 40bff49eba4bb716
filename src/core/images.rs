//! Best-effort place illustrations.
//!
//! Nothing in here fails a trip: every error is logged and turned into
//! [`BestEffort::Unavailable`].

use std::sync::Arc;

use tracing::info;

use crate::{
    config::{DEFAULT_IMAGE_FOLDER, DEFAULT_IMAGE_MODEL},
    services::{ImageGenerator, ImageHost},
    types::{BestEffort, TripPlan},
};

const DATA_URI_PREFIX: &str = "data:image/png;base64,";

pub fn place_image_prompt(place_name: &str, destination: &str) -> String {
    format!(
        "A high-quality, realistic photograph of {place_name} in {destination}. \
         Focus on the iconic aspects and natural beauty of the location."
    )
}

/// Ask the image model for one picture of a place.
pub async fn generate_place_image(
    generator: &dyn ImageGenerator,
    model: &str,
    place_name: &str,
    destination: &str,
) -> BestEffort<String> {
    let prompt = place_image_prompt(place_name, destination);
    BestEffort::from_result(
        generator.generate_image(model, &prompt).await,
        "place image generation",
    )
}

/// Host base64 PNG bytes and return their public URL.
pub async fn upload_image(
    host: &dyn ImageHost,
    base64_png: &str,
    folder: &str,
) -> BestEffort<String> {
    let data_uri = format!("{DATA_URI_PREFIX}{base64_png}");
    BestEffort::from_result(host.upload_data_uri(&data_uri, folder).await, "image upload")
}

/// Generates and hosts an image for every activity of a plan.
#[derive(Clone)]
pub struct PlaceImagePipeline {
    generator: Arc<dyn ImageGenerator>,
    host: Arc<dyn ImageHost>,
    image_model: String,
    folder: String,
}

impl PlaceImagePipeline {
    pub fn new(generator: Arc<dyn ImageGenerator>, host: Arc<dyn ImageHost>) -> Self {
        Self {
            generator,
            host,
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            folder: DEFAULT_IMAGE_FOLDER.to_string(),
        }
    }

    pub fn with_image_model(mut self, image_model: impl Into<String>) -> Self {
        self.image_model = image_model.into();
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub async fn place_image_url(
        &self,
        place_name: &str,
        destination: &str,
    ) -> BestEffort<String> {
        let image = generate_place_image(
            self.generator.as_ref(),
            &self.image_model,
            place_name,
            destination,
        )
        .await;

        match image.into_option() {
            Some(bytes) => upload_image(self.host.as_ref(), &bytes, &self.folder).await,
            None => BestEffort::Unavailable,
        }
    }

    /// Attach image URLs to activities, one place at a time.
    ///
    /// Returns how many activities received an image.
    pub async fn illustrate(&self, plan: &mut TripPlan, destination: &str) -> usize {
        let mut attached = 0;
        for activity in plan.activities_mut() {
            let image = self.place_image_url(&activity.place_name, destination).await;
            if image.is_success() {
                activity.image_url = image.into_option();
                attached += 1;
            }
        }
        info!(attached, destination, "place images attached");
        attached
    }
}
