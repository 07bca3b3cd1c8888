//! AI listing analysis.
//!
//! Phase one of listing creation: the farmer's free-form description plus a
//! produce photo go to the image host and then to the model, which returns a
//! structured draft (item, quantity, unit, quality note, price suggestion,
//! ad copy). Nothing is persisted; the farmer confirms or edits the draft and
//! submits it through the ordinary listing create endpoint.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use mandi_core::GeoPoint;

use crate::error::AppError;
use crate::gemini::{Content, GeminiClient, GeminiError, Part};
use crate::models::ListingDraft;
use crate::services::cloudinary::CloudinaryClient;

/// An image taken from the multipart request.
#[derive(Debug)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// The model's analysis payload, in the shape the prompt demands.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiAnalysis {
    categorize_product: CategorizedProduct,
    assess_quality: String,
    suggest_price: Decimal,
    generate_ad: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategorizedProduct {
    produce_item: String,
    quantity: Decimal,
    unit: String,
}

/// Listing analysis orchestrator.
pub struct AnalysisService<'a> {
    gemini: &'a GeminiClient,
    cloudinary: &'a CloudinaryClient,
}

impl<'a> AnalysisService<'a> {
    /// Create a new analysis service.
    #[must_use]
    pub const fn new(gemini: &'a GeminiClient, cloudinary: &'a CloudinaryClient) -> Self {
        Self { gemini, cloudinary }
    }

    /// Run the full analysis: host the image, ask the model, parse the draft.
    ///
    /// External failures are not retried; the farmer simply resubmits.
    ///
    /// # Errors
    ///
    /// Returns an error when the upload fails, the model call fails, or the
    /// model's reply is not the requested JSON object.
    #[instrument(skip(self, farmer_text, image), fields(image_size = image.bytes.len()))]
    pub async fn analyze(
        &self,
        farmer_text: &str,
        image: ImageUpload,
        location: GeoPoint,
    ) -> Result<ListingDraft, AppError> {
        let encoded_image = BASE64.encode(&image.bytes);

        let image_url = self
            .cloudinary
            .upload_image(image.bytes, &image.content_type)
            .await?;

        let date = chrono::Utc::now().format("%-d %B %Y").to_string();
        let prompt = build_analysis_prompt(farmer_text, location, &date);

        let content = Content {
            role: Some("user".to_owned()),
            parts: vec![
                Part::text(prompt),
                Part::inline_data(image.content_type, encoded_image),
            ],
        };

        let reply = self.gemini.generate(vec![content], None).await?;
        let draft = parse_analysis(&reply, image_url)?;

        Ok(draft)
    }
}

/// Build the analysis prompt around the farmer's text, their coordinates, and
/// the current date (pricing is seasonal).
fn build_analysis_prompt(farmer_text: &str, location: GeoPoint, date: &str) -> String {
    format!(
        "Analyze the user's text and the provided image of produce.\n\
         The user is a farmer in India.\n\
         The farmer's location coordinates are [longitude, latitude]: [{}, {}].\n\
         The current date is {date}.\n\
         User Text: \"{farmer_text}\"\n\
         \n\
         Perform these tasks and respond ONLY with a single, valid JSON object:\n\
         1. \"categorizeProduct\": An object containing three keys: \"produceItem\" (e.g., \"tomato\"), \"quantity\" (e.g., 50), and \"unit\" (e.g., \"kg\").\n\
         2. \"assessQuality\": A brief, one-sentence quality assessment of the produce in the image.\n\
         3. \"suggestPrice\": A suggested fair market price per unit in INR, as a number.\n\
         4. \"generateAd\": A short, catchy advertisement (20-25 words) in Hinglish for local buyers.",
        location.longitude(),
        location.latitude(),
    )
}

/// Parse the model's reply into a draft, tolerating markdown code fences.
pub fn parse_analysis(reply: &str, image_url: String) -> Result<ListingDraft, GeminiError> {
    let raw = strip_code_fences(reply);
    let analysis: GeminiAnalysis = serde_json::from_str(&raw)
        .map_err(|e| GeminiError::Parse(format!("model reply is not the expected JSON: {e}")))?;

    Ok(ListingDraft {
        produce_item: analysis.categorize_product.produce_item,
        quantity: analysis.categorize_product.quantity,
        unit: analysis.categorize_product.unit,
        quality_assessment: analysis.assess_quality,
        suggested_price: analysis.suggest_price,
        generated_ad: analysis.generate_ad,
        image_url,
    })
}

/// Strip markdown ```json fences the model tends to wrap JSON in.
fn strip_code_fences(reply: &str) -> String {
    reply.replace("```json", "").replace("```", "").trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{
        "categorizeProduct": {"produceItem": "tomato", "quantity": 50, "unit": "kg"},
        "assessQuality": "Firm, evenly ripened tomatoes with no visible blemishes.",
        "suggestPrice": 22.5,
        "generateAd": "Taaza tamatar seedha khet se! Best quality, best price. Aaj hi order karo."
    }"#;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn test_parse_analysis_maps_all_fields() {
        let draft =
            parse_analysis(REPLY, "https://img.example/produce.jpg".to_owned()).expect("parse");
        assert_eq!(draft.produce_item, "tomato");
        assert_eq!(draft.quantity, Decimal::from(50));
        assert_eq!(draft.unit, "kg");
        assert_eq!(draft.suggested_price, Decimal::new(225, 1));
        assert_eq!(draft.image_url, "https://img.example/produce.jpg");
        assert!(draft.quality_assessment.starts_with("Firm"));
    }

    #[test]
    fn test_parse_analysis_tolerates_fenced_reply() {
        let fenced = format!("```json\n{REPLY}\n```");
        assert!(parse_analysis(&fenced, String::new()).is_ok());
    }

    #[test]
    fn test_parse_analysis_rejects_prose() {
        let err = parse_analysis("Sure! Here is my analysis.", String::new());
        assert!(matches!(err, Err(GeminiError::Parse(_))));
    }

    #[test]
    fn test_prompt_carries_coordinates_and_date() {
        let location = GeoPoint::new(77.2, 28.6).expect("point");
        let prompt = build_analysis_prompt("50kg tamatar", location, "5 March 2026");
        assert!(prompt.contains("[77.2, 28.6]"));
        assert!(prompt.contains("5 March 2026"));
        assert!(prompt.contains("50kg tamatar"));
    }
}
