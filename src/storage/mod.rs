use std::{
    fs,
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use image::ImageFormat;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::{AppError, AppResult},
    models::{CreativeRecord, GenerationResult},
};

const SUPPORTED_MIMES: [&str; 4] = ["image/png", "image/jpeg", "image/jpg", "image/webp"];

pub struct ParsedDataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Base64 payload of a data URL, still encoded, as the Gemini inline-data
/// part expects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

pub struct ResultPaths {
    pub prompt_path: PathBuf,
    pub image_path: Option<PathBuf>,
    pub record_path: PathBuf,
}

pub fn validate_data_url(data_url: &str) -> AppResult<()> {
    parse_data_url(data_url).map(|_| ())
}

pub fn parse_data_url(data_url: &str) -> AppResult<ParsedDataUrl> {
    let inline = split_data_url(data_url)?;
    let bytes = STANDARD.decode(inline.data.trim())?;
    Ok(ParsedDataUrl {
        mime: inline.mime_type,
        bytes,
    })
}

/// Decodes an image returned by the model. Any `image/*` mime is kept as
/// delivered; only the input side is limited to png/jpeg/webp.
pub fn decode_delivered_image(data_url: &str) -> AppResult<ParsedDataUrl> {
    let inline = split_any_data_url(data_url)?;
    if !inline.mime_type.starts_with("image/") {
        return Err(AppError::msg(format!(
            "model returned a non-image payload: {}",
            inline.mime_type
        )));
    }

    let bytes = STANDARD.decode(&inline.data)?;
    Ok(ParsedDataUrl {
        mime: inline.mime_type,
        bytes,
    })
}

pub fn split_data_url(data_url: &str) -> AppResult<InlineImage> {
    let inline = split_any_data_url(data_url)?;
    if !SUPPORTED_MIMES.contains(&inline.mime_type.as_str()) {
        return Err(AppError::msg(format!(
            "unsupported image mime type: {}. allowed: png/jpeg/webp",
            inline.mime_type
        )));
    }

    Ok(inline)
}

fn split_any_data_url(data_url: &str) -> AppResult<InlineImage> {
    if !data_url.starts_with("data:") {
        return Err(AppError::msg("expected a data URL with image payload"));
    }

    let (metadata, payload) = data_url
        .split_once(',')
        .ok_or_else(|| AppError::msg("invalid data URL format"))?;

    if !metadata.contains(";base64") {
        return Err(AppError::msg("data URL must be base64 encoded"));
    }

    let mime = metadata
        .trim_start_matches("data:")
        .split(';')
        .next()
        .unwrap_or_default();

    Ok(InlineImage {
        mime_type: mime.to_string(),
        data: payload.trim().to_string(),
    })
}

pub fn read_image_path_as_data_url(path: &Path) -> AppResult<String> {
    if !path.exists() {
        return Err(AppError::msg(format!(
            "image path not found: {}",
            path.display()
        )));
    }

    let bytes = fs::read(path)?;
    let mime = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        _ => mime_from_bytes(&bytes)?,
    };

    debug!(path = %path.display(), mime, bytes = bytes.len(), "encoded image file");
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Accepts either an inline data URL or a path (relative paths resolve
/// against `base_dir`) and returns a validated data URL.
pub fn resolve_image_source(value: &str, base_dir: &Path) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.starts_with("data:") {
        validate_data_url(trimmed)?;
        return Ok(trimmed.to_string());
    }

    let path = Path::new(trimmed);
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };
    read_image_path_as_data_url(&path)
}

pub fn write_result(
    out_dir: &Path,
    result: &GenerationResult,
    record: &mut CreativeRecord,
) -> AppResult<ResultPaths> {
    let delivered = result
        .image_data_url
        .as_deref()
        .map(decode_delivered_image)
        .transpose()?;

    fs::create_dir_all(out_dir)?;

    let prompt_path = out_dir.join("prompt.txt");
    fs::write(&prompt_path, &result.prompt)?;
    record.prompt_path = prompt_path.to_string_lossy().to_string();

    let image_path = match delivered {
        Some(image) => {
            let path = write_output_image(out_dir, &image, record.created_at)?;
            record.image_path = Some(path.to_string_lossy().to_string());
            Some(path)
        }
        None => None,
    };

    let record_path = out_dir.join("result.json");
    write_json(&record_path, record)?;

    info!(
        out_dir = %out_dir.display(),
        image = image_path.is_some(),
        "wrote creative result"
    );

    Ok(ResultPaths {
        prompt_path,
        image_path,
        record_path,
    })
}

pub fn write_output_image(
    out_dir: &Path,
    image: &ParsedDataUrl,
    created_at: DateTime<Utc>,
) -> AppResult<PathBuf> {
    let extension = extension_for_mime(&image.mime);
    let image_path = out_dir.join(format!(
        "creative-flow-image-{}.{extension}",
        created_at.timestamp_millis()
    ));

    fs::write(&image_path, &image.bytes)?;
    Ok(image_path)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let contents = serde_json::to_string_pretty(value)?;
    fs::write(path, contents)?;
    Ok(())
}

fn mime_from_bytes(bytes: &[u8]) -> AppResult<&'static str> {
    match image::guess_format(bytes)? {
        ImageFormat::Png => Ok("image/png"),
        ImageFormat::Jpeg => Ok("image/jpeg"),
        ImageFormat::WebP => Ok("image/webp"),
        other => Err(AppError::msg(format!(
            "unsupported image format: {other:?}. allowed: png/jpeg/webp"
        ))),
    }
}

fn extension_for_mime(mime: &str) -> String {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg".to_string(),
        "image/svg+xml" => "svg".to_string(),
        _ => mime
            .strip_prefix("image/")
            .filter(|subtype| {
                !subtype.is_empty() && subtype.chars().all(|c| c.is_ascii_alphanumeric())
            })
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "bin".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Channel;
    use serde::de::DeserializeOwned;

    fn read_json<T: DeserializeOwned>(path: &Path) -> T {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    // 1x1 transparent PNG.
    const PNG_BYTES: [u8; 67] = [
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48,
        0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
        0x00, 0x1f, 0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0a, 0x49, 0x44, 0x41, 0x54, 0x78,
        0x9c, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00,
        0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
    ];

    fn record() -> CreativeRecord {
        CreativeRecord {
            id: "req-1".to_string(),
            created_at: Utc::now(),
            product_name: "Serum".to_string(),
            channel: Channel::MetaFeed,
            aspect_ratio_label: "4:5".to_string(),
            prompt: "A serum bottle on marble – aspect ratio 4:5".to_string(),
            prompt_model: "gemini-2.5-flash".to_string(),
            image_model: Some("gemini-2.5-flash-image".to_string()),
            prompt_path: String::new(),
            image_path: None,
        }
    }

    #[test]
    fn split_data_url_keeps_encoded_payload() {
        let inline = split_data_url("data:image/jpeg;base64, QUJD ").unwrap();
        assert_eq!(inline.mime_type, "image/jpeg");
        assert_eq!(inline.data, "QUJD");
    }

    #[test]
    fn rejects_non_base64_and_unknown_mime() {
        assert!(split_data_url("data:image/png,raw").is_err());
        assert!(split_data_url("data:image/gif;base64,QUJD").is_err());
        assert!(split_data_url("https://example.com/a.png").is_err());
        assert!(parse_data_url("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn file_without_extension_is_sniffed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("product");
        fs::write(&path, PNG_BYTES).unwrap();

        let data_url = read_image_path_as_data_url(&path).unwrap();
        assert!(data_url.starts_with("data:image/png;base64,"));
        assert_eq!(parse_data_url(&data_url).unwrap().bytes, PNG_BYTES);
    }

    #[test]
    fn resolve_image_source_joins_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hero.JPG"), b"not really a jpeg").unwrap();

        let data_url = resolve_image_source("hero.JPG", dir.path()).unwrap();
        assert!(data_url.starts_with("data:image/jpeg;base64,"));

        let inline = "data:image/webp;base64,QUJD";
        assert_eq!(resolve_image_source(inline, dir.path()).unwrap(), inline);
        assert!(resolve_image_source("missing.png", dir.path()).is_err());
    }

    #[test]
    fn write_result_stores_prompt_image_and_record() {
        let dir = tempfile::tempdir().unwrap();
        let result = GenerationResult {
            prompt: "A serum bottle on marble – aspect ratio 4:5".to_string(),
            image_data_url: Some(format!("data:image/png;base64,{}", STANDARD.encode(PNG_BYTES))),
            aspect_ratio_label: "4:5".to_string(),
        };
        let mut record = record();

        let paths = write_result(dir.path(), &result, &mut record).unwrap();

        assert_eq!(fs::read_to_string(&paths.prompt_path).unwrap(), result.prompt);
        let image_path = paths.image_path.unwrap();
        assert_eq!(fs::read(&image_path).unwrap(), PNG_BYTES);
        assert!(image_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("creative-flow-image-"));

        let saved: CreativeRecord = read_json(&paths.record_path);
        assert_eq!(saved.image_path, record.image_path);
        assert_eq!(saved.aspect_ratio_label, "4:5");
        assert_eq!(saved.prompt, result.prompt);
        let raw = fs::read_to_string(&paths.record_path).unwrap();
        assert!(raw.contains("\"prompt\": \"A serum bottle on marble – aspect ratio 4:5\""));
    }

    #[test]
    fn delivered_image_keeps_unlisted_mime() {
        let dir = tempfile::tempdir().unwrap();
        let result = GenerationResult {
            prompt: "prompt".to_string(),
            image_data_url: Some("data:image/heic;base64,QUJD".to_string()),
            aspect_ratio_label: "1:1".to_string(),
        };
        let mut record = record();

        let paths = write_result(dir.path(), &result, &mut record).unwrap();

        let image_path = paths.image_path.unwrap();
        assert_eq!(image_path.extension().unwrap(), "heic");
        assert_eq!(fs::read(&image_path).unwrap(), b"ABC");
        assert!(paths.record_path.exists());
    }

    #[test]
    fn undecodable_image_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("out");
        let result = GenerationResult {
            prompt: "prompt".to_string(),
            image_data_url: Some("data:image/png;base64,@@@".to_string()),
            aspect_ratio_label: "1:1".to_string(),
        };
        let mut record = record();

        assert!(write_result(&out_dir, &result, &mut record).is_err());
        assert!(!out_dir.join("prompt.txt").exists());
    }

    #[test]
    fn extension_follows_mime_subtype() {
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/png"), "png");
        assert_eq!(extension_for_mime("image/AVIF"), "avif");
        assert_eq!(extension_for_mime("image/svg+xml"), "svg");
        assert_eq!(extension_for_mime("image/x.weird"), "bin");
    }

    #[test]
    fn write_result_without_image() {
        let dir = tempfile::tempdir().unwrap();
        let result = GenerationResult {
            prompt: "prompt".to_string(),
            image_data_url: None,
            aspect_ratio_label: "1:1".to_string(),
        };
        let mut record = record();

        let paths = write_result(dir.path(), &result, &mut record).unwrap();
        assert!(paths.image_path.is_none());
        assert!(record.image_path.is_none());
    }
}
