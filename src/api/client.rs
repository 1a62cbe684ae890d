//! reqwest transport for the Gemini-style generation API.

use super::wire::{
    self, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig,
    OperationWire, Part, PredictLongRunningRequest, VideoInstance, VideoParameters,
};
use super::{GenerationBackend, QualityTier, ThemeData, VideoOperation, VideoRequest};
use crate::config::Config;
use crate::error::ApiError;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Persona instruction for theme-data synthesis.
const THEME_SYSTEM_INSTRUCTION: &str = "You are an expert Android UI/UX designer. \
Your goal is to create a cohesive theme configuration based on the user's description. \
You need to define a color palette, a name, a description, and a prompt to generate a \
matching wallpaper later. Ensure colors provide good contrast and follow Material Design \
principles where appropriate.";

/// Suffix appended to wallpaper image prompts.
const IMAGE_PROMPT_SUFFIX: &str =
    " --aspect-ratio 9:16 --high-quality abstract digital art wallpaper phone background, clean, aesthetic";

/// Suffix appended to video prompts.
const VIDEO_PROMPT_SUFFIX: &str =
    ", vertical 9:16 phone wallpaper, abstract, moving slowly, cinematic, 4k loop, seamless";

/// Client for the remote generation service.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    theme_model: String,
    image_model: String,
    image_model_hq: String,
    video_model: String,
}

impl GeminiClient {
    /// Build a client from resolved configuration.
    pub fn new(config: &Config) -> Self {
        // Fall back to reqwest defaults if builder creation fails for any reason.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            api_key: config.api.key.trim().to_string(),
            theme_model: config.models.theme.clone(),
            image_model: config.models.image.clone(),
            image_model_hq: config.models.image_hq.clone(),
            video_model: config.models.video.clone(),
        }
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ApiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!(model, "generateContent request");
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;
        let response = check_status(response).await?;
        let payload: GenerateContentResponse = response.json().await?;
        if let Some(reason) = payload.block_reason() {
            return Err(ApiError::InvalidResponse(format!(
                "generation blocked: {reason}"
            )));
        }
        Ok(payload)
    }

    /// JSON response schema sent with theme-data requests so the model
    /// returns a machine-parseable theme object.
    fn theme_response_schema() -> serde_json::Value {
        let hex = |description: &str| json!({"type": "STRING", "description": description});
        json!({
            "type": "OBJECT",
            "properties": {
                "name": {"type": "STRING", "description": "A creative name for the theme"},
                "description": {"type": "STRING", "description": "A short description of the vibe"},
                "colors": {
                    "type": "OBJECT",
                    "properties": {
                        "primary": hex("Hex code for primary color"),
                        "secondary": hex("Hex code for secondary color"),
                        "accent": hex("Hex code for accent/highlight color"),
                        "background": hex("Hex code for background color (often dark or light)"),
                        "surface": hex("Hex code for surface elements like cards"),
                        "text": hex("Hex code for main text, contrasting with background"),
                    },
                    "required": ["primary", "secondary", "accent", "background", "surface", "text"]
                },
                "wallpaperPrompt": {
                    "type": "STRING",
                    "description": "A detailed prompt to generate an abstract or scenic wallpaper matching this theme."
                },
                "iconStyle": {"type": "STRING", "enum": ["minimal", "filled", "outline", "neumorphic"]}
            },
            "required": ["name", "description", "colors", "wallpaperPrompt", "iconStyle"]
        })
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate_theme_data(&self, prompt: &str) -> Result<ThemeData, ApiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(prompt)],
            }],
            system_instruction: Some(Content {
                parts: vec![Part::text(THEME_SYSTEM_INSTRUCTION)],
            }),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".into()),
                response_schema: Some(Self::theme_response_schema()),
                image_config: None,
            }),
        };
        let response = self.generate_content(&self.theme_model, &request).await?;
        let text = response
            .first_text()
            .ok_or_else(|| ApiError::InvalidResponse("no text returned from model".into()))?;
        let data: ThemeData = serde_json::from_str(text)?;
        Ok(data)
    }

    async fn generate_image(
        &self,
        prompt: &str,
        quality: QualityTier,
    ) -> Result<String, ApiError> {
        let (model, generation_config) = match quality {
            QualityTier::Standard => (&self.image_model, None),
            QualityTier::High => (
                &self.image_model_hq,
                Some(GenerationConfig {
                    image_config: Some(ImageConfig {
                        aspect_ratio: "9:16".into(),
                        // 1K renders faster than 2K/4K; plenty for a preview.
                        image_size: "1K".into(),
                    }),
                    ..GenerationConfig::default()
                }),
            ),
        };
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text(format!("{prompt}{IMAGE_PROMPT_SUFFIX}"))],
            }],
            system_instruction: None,
            generation_config,
        };
        let response = self.generate_content(model, &request).await?;
        let inline = response
            .first_inline_data()
            .ok_or_else(|| ApiError::InvalidResponse("no image data found in response".into()))?;
        Ok(wire::to_data_uri(&inline.mime_type, &inline.data))
    }

    async fn edit_image(&self, image: &str, instruction: &str) -> Result<String, ApiError> {
        let (mime, payload) = wire::split_data_uri(image).ok_or_else(|| {
            ApiError::InvalidResponse("wallpaper image is not an inline data URI".into())
        })?;
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::inline(mime, payload), Part::text(instruction)],
            }],
            system_instruction: None,
            generation_config: None,
        };
        let response = self.generate_content(&self.image_model, &request).await?;
        let inline = response
            .first_inline_data()
            .ok_or_else(|| ApiError::InvalidResponse("no image data found in response".into()))?;
        Ok(wire::to_data_uri(&inline.mime_type, &inline.data))
    }

    async fn start_video(&self, request: &VideoRequest) -> Result<VideoOperation, ApiError> {
        let image = match request.seed_image.as_deref() {
            Some(uri) => {
                let (mime, payload) = wire::split_data_uri(uri).ok_or_else(|| {
                    ApiError::InvalidResponse("seed image is not an inline data URI".into())
                })?;
                Some(wire::InlineData {
                    mime_type: mime.to_string(),
                    data: payload.to_string(),
                })
            }
            None => None,
        };
        let body = PredictLongRunningRequest {
            instances: vec![VideoInstance {
                prompt: format!("{}{VIDEO_PROMPT_SUFFIX}", request.prompt),
                image,
            }],
            parameters: VideoParameters {
                number_of_videos: 1,
                resolution: "720p".into(),
                aspect_ratio: "9:16".into(),
            },
        };
        let url = format!(
            "{}/models/{}:predictLongRunning",
            self.base_url, self.video_model
        );
        debug!(model = %self.video_model, seeded = request.seed_image.is_some(), "video job start");
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;
        let operation: OperationWire = response.json().await?;
        Ok(operation.into())
    }

    async fn poll_video(&self, operation: &VideoOperation) -> Result<VideoOperation, ApiError> {
        let url = format!("{}/{}", self.base_url, operation.name);
        let response = self
            .http
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;
        let response = check_status(response).await?;
        let operation: OperationWire = response.json().await?;
        debug!(name = %operation.name, done = operation.done, "video operation polled");
        Ok(operation.into())
    }

    async fn download_video(&self, uri: &str) -> Result<Vec<u8>, ApiError> {
        // The files endpoint authenticates via a key query parameter.
        let separator = if uri.contains('?') { '&' } else { '?' };
        let url = format!("{uri}{separator}key={}", self.api_key);
        let response = self.http.get(&url).send().await?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

impl From<OperationWire> for VideoOperation {
    fn from(wire: OperationWire) -> Self {
        let video_uri = wire.video_uri().map(str::to_string);
        Self {
            name: wire.name,
            done: wire.done,
            video_uri,
        }
    }
}

/// Map non-2xx responses to [`ApiError::Status`] carrying the body text.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status(status.as_u16(), body))
}
