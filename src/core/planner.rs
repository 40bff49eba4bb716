use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    config::{AppConfig, DEFAULT_TEXT_MODEL},
    core::images::PlaceImagePipeline,
    error::{GenerationError, Result},
    schemas::CompletionSchema,
    services::{
        prompt::build_trip_prompt, CloudinaryClient, GeminiClient, StructuredRequest,
        TextGenerator,
    },
    types::{parse_structured_response, GeneratedTrip, TripPlan, TripRequest},
};

/// Turns trip requests into generated itineraries.
#[derive(Clone)]
pub struct TripPlanner {
    text: Arc<dyn TextGenerator>,
    model: String,
    place_images: Option<PlaceImagePipeline>,
}

impl TripPlanner {
    pub fn new(text: Arc<dyn TextGenerator>) -> Self {
        Self {
            text,
            model: DEFAULT_TEXT_MODEL.to_string(),
            place_images: None,
        }
    }

    /// Wire the Gemini and Cloudinary clients described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let gemini = Arc::new(GeminiClient::from_config(&config.gemini)?);
        let mut planner = Self::new(gemini.clone()).with_model(config.gemini.model.clone());

        if let (true, Some(cloudinary)) = (config.place_images, config.cloudinary.as_ref()) {
            let host = Arc::new(CloudinaryClient::new(cloudinary.clone()));
            planner = planner.with_place_images(
                PlaceImagePipeline::new(gemini, host)
                    .with_image_model(config.gemini.image_model.clone())
                    .with_folder(cloudinary.folder.clone()),
            );
        }

        Ok(planner)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_place_images(mut self, pipeline: PlaceImagePipeline) -> Self {
        self.place_images = Some(pipeline);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn place_images_enabled(&self) -> bool {
        self.place_images.is_some()
    }

    /// Generate an itinerary with exactly one provider call.
    ///
    /// Malformed or schema-violating output fails with
    /// [`GenerationError::InvalidResponse`]; nothing is retried.
    pub async fn generate_itinerary(
        &self,
        request: &TripRequest,
    ) -> std::result::Result<GeneratedTrip, GenerationError> {
        let structured = StructuredRequest {
            model: self.model.clone(),
            prompt: build_trip_prompt(request),
            response_schema: TripPlan::schema().provider_json().clone(),
        };

        info!(
            model = %self.model,
            destination = %request.destination,
            days = request.days,
            "requesting itinerary"
        );

        let raw = self.text.generate_json(&structured).await?;
        let mut plan: TripPlan = parse_structured_response(&raw)?;

        for issue in plan.drift_from(request) {
            warn!(destination = %request.destination, %issue, "itinerary drifted from request");
        }

        plan.normalize_map_links(&request.destination);

        Ok(GeneratedTrip::new(plan, request.clone()))
    }

    /// Generate an itinerary, then illustrate it when place images are on.
    pub async fn plan_trip(
        &self,
        request: &TripRequest,
    ) -> std::result::Result<GeneratedTrip, GenerationError> {
        let mut trip = self.generate_itinerary(request).await?;

        if let Some(pipeline) = &self.place_images {
            pipeline
                .illustrate(&mut trip.plan, &request.destination)
                .await;
        }

        Ok(trip)
    }
}
