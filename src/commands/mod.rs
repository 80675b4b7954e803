use std::path::Path;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    gemini::{GeminiClient, ImageRequest, PromptRequest},
    models::{CreativeBrief, CreativeRecord, GenerationResult, MAX_PRODUCT_IMAGES},
    prompt,
    storage::{self, InlineImage},
};

/// What would be sent to the prompt model, without calling it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPreview {
    pub system_instruction: String,
    pub request_text: String,
    pub aspect_ratio: String,
    pub api_aspect_ratio: String,
    pub attached_images: usize,
}

pub fn load_brief(path: &Path) -> AppResult<CreativeBrief> {
    if !path.exists() {
        return Err(AppError::msg(format!(
            "brief file not found: {}",
            path.display()
        )));
    }

    let contents = std::fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        Ok(toml::from_str(&contents)?)
    } else {
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Turns every image reference into a validated data URL, keeps at most
/// `MAX_PRODUCT_IMAGES` products and gives each product a role.
pub fn prepare_brief(mut brief: CreativeBrief, base_dir: &Path) -> AppResult<CreativeBrief> {
    if brief.product_images.len() > MAX_PRODUCT_IMAGES {
        warn!(
            supplied = brief.product_images.len(),
            kept = MAX_PRODUCT_IMAGES,
            "too many product images, dropping the rest"
        );
        brief.product_images.truncate(MAX_PRODUCT_IMAGES);
    }

    brief.product_images = brief
        .product_images
        .iter()
        .map(|source| storage::resolve_image_source(source, base_dir))
        .collect::<AppResult<Vec<_>>>()?;

    let product_count = brief.product_images.len();
    brief.product_roles.truncate(product_count);
    brief
        .product_roles
        .resize(product_count, Default::default());

    brief.model_image = resolve_optional(brief.model_image.take(), base_dir)?;
    brief.background_image = resolve_optional(brief.background_image.take(), base_dir)?;
    brief.reference_image = resolve_optional(brief.reference_image.take(), base_dir)?;

    Ok(brief)
}

pub fn preview_prompt(brief: &CreativeBrief) -> AppResult<PromptPreview> {
    Ok(PromptPreview {
        system_instruction: prompt::build_system_instruction(brief),
        request_text: prompt::build_prompt_request(brief),
        aspect_ratio: prompt::resolve_aspect_ratio(brief),
        api_aspect_ratio: prompt::api_aspect_ratio(brief.channel).to_string(),
        attached_images: prompt_images(brief)?.len(),
    })
}

/// Runs the prompt call and, when `render_image` is set, the image call.
/// The first failure aborts the whole flow.
pub async fn generate_creative(
    client: &GeminiClient,
    brief: &CreativeBrief,
    render_image: bool,
) -> AppResult<GenerationResult> {
    let prompt_text = client
        .generate_prompt(PromptRequest {
            system_instruction: prompt::build_system_instruction(brief),
            text: prompt::build_prompt_request(brief),
            images: prompt_images(brief)?,
        })
        .await?;
    info!(chars = prompt_text.chars().count(), "creative prompt ready");

    let aspect_ratio_label = prompt::resolve_aspect_ratio(brief);

    let image_data_url = if render_image {
        client
            .generate_image(ImageRequest {
                prompt: prompt_text.clone(),
                images: render_images(brief)?,
                aspect_ratio: prompt::api_aspect_ratio(brief.channel).to_string(),
            })
            .await?
    } else {
        None
    };

    Ok(GenerationResult {
        prompt: prompt_text,
        image_data_url,
        aspect_ratio_label,
    })
}

pub fn new_record(
    client: &GeminiClient,
    brief: &CreativeBrief,
    result: &GenerationResult,
    render_image: bool,
) -> CreativeRecord {
    let config = client.config();
    CreativeRecord {
        id: Uuid::new_v4().to_string(),
        created_at: Utc::now(),
        product_name: brief.product_name.clone(),
        channel: brief.channel,
        aspect_ratio_label: result.aspect_ratio_label.clone(),
        prompt: result.prompt.clone(),
        prompt_model: config.prompt_model.clone(),
        image_model: render_image.then(|| config.image_model.clone()),
        prompt_path: String::new(),
        image_path: None,
    }
}

/// Products, model, background, then reference image.
fn prompt_images(brief: &CreativeBrief) -> AppResult<Vec<InlineImage>> {
    brief
        .product_images
        .iter()
        .chain(brief.model_image.iter())
        .chain(brief.background_image.iter())
        .chain(brief.reference_image.iter())
        .map(|data_url| storage::split_data_url(data_url))
        .collect()
}

/// The image model only sees the products and the model image.
fn render_images(brief: &CreativeBrief) -> AppResult<Vec<InlineImage>> {
    brief
        .product_images
        .iter()
        .chain(brief.model_image.iter())
        .map(|data_url| storage::split_data_url(data_url))
        .collect()
}

fn resolve_optional(value: Option<String>, base_dir: &Path) -> AppResult<Option<String>> {
    match value {
        Some(source) if !source.trim().is_empty() => {
            storage::resolve_image_source(&source, base_dir).map(Some)
        }
        _ => Ok(None),
    }
}
