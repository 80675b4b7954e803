use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_PRODUCT_IMAGES: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Channel {
    #[default]
    #[serde(alias = "쇼핑몰 썸네일")]
    ShoppingThumbnail,
    #[serde(alias = "네이버 GFA (1.25:1)")]
    NaverGfaRect,
    #[serde(alias = "메타 광고 (피드)")]
    MetaFeed,
    #[serde(alias = "메타 광고 (스토리/릴스)")]
    MetaStory,
    #[serde(rename = "naver-gfa-1200x628", alias = "네이버 GFA 1200×628")]
    NaverGfa1200x628,
    #[serde(rename = "naver-gfa-1200x1800", alias = "네이버 GFA 1200×1800")]
    NaverGfa1200x1800,
    #[serde(rename = "naver-gfa-342x228", alias = "네이버 GFA 342×228")]
    NaverGfa342x228,
    #[serde(rename = "naver-gfa-1250x560", alias = "네이버 GFA 1250×560")]
    NaverGfa1250x560,
    #[serde(alias = "네이버 GFA (커스텀)")]
    NaverGfaCustom,
}

/// Placement metadata for a channel. `aspect_ratio` is the exact ratio quoted
/// in the prompt; `api_aspect_ratio` is the closest ratio the image model
/// accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSpec {
    pub label: &'static str,
    pub aspect_ratio: &'static str,
    pub api_aspect_ratio: &'static str,
}

impl Channel {
    pub const ALL: [Channel; 9] = [
        Self::ShoppingThumbnail,
        Self::NaverGfaRect,
        Self::MetaFeed,
        Self::MetaStory,
        Self::NaverGfa1200x628,
        Self::NaverGfa1200x1800,
        Self::NaverGfa342x228,
        Self::NaverGfa1250x560,
        Self::NaverGfaCustom,
    ];

    pub fn as_prompt_value(&self) -> &'static str {
        match self {
            Self::ShoppingThumbnail => "쇼핑몰 썸네일",
            Self::NaverGfaRect => "네이버 GFA (1.25:1)",
            Self::MetaFeed => "메타 광고 (피드)",
            Self::MetaStory => "메타 광고 (스토리/릴스)",
            Self::NaverGfa1200x628 => "네이버 GFA 1200×628",
            Self::NaverGfa1200x1800 => "네이버 GFA 1200×1800",
            Self::NaverGfa342x228 => "네이버 GFA 342×228",
            Self::NaverGfa1250x560 => "네이버 GFA 1250×560",
            Self::NaverGfaCustom => "네이버 GFA (커스텀)",
        }
    }

    pub fn spec(&self) -> ChannelSpec {
        let (label, aspect_ratio, api_aspect_ratio) = match self {
            Self::ShoppingThumbnail => ("쇼핑몰 썸네일 (1:1)", "1:1", "1:1"),
            Self::NaverGfaRect => ("네이버 GFA (1.25:1)", "5:4", "4:3"),
            Self::MetaFeed => ("메타 광고 피드 (4:5)", "4:5", "3:4"),
            Self::MetaStory => ("메타 광고 스토리/릴스 (9:16)", "9:16", "9:16"),
            Self::NaverGfa1200x628 => ("네이버 GFA 1200×628 (300:157)", "300:157", "16:9"),
            Self::NaverGfa1200x1800 => ("네이버 GFA 1200×1800 (2:3)", "2:3", "3:4"),
            Self::NaverGfa342x228 => ("네이버 GFA 342×228 (57:38)", "57:38", "4:3"),
            Self::NaverGfa1250x560 => ("네이버 GFA 1250×560 (125:56)", "125:56", "16:9"),
            Self::NaverGfaCustom => ("네이버 GFA 커스텀 (직접 입력)", "Custom", "1:1"),
        };

        ChannelSpec {
            label,
            aspect_ratio,
            api_aspect_ratio,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    #[serde(alias = "고급스러운/살롱 무드")]
    Luxurious,
    #[default]
    #[serde(alias = "깨끗한/클린 뷰티")]
    Clean,
    #[serde(alias = "생동감 있는/팝")]
    Vibrant,
    #[serde(alias = "자연스러운/일상")]
    Natural,
    #[serde(alias = "전문적인/스튜디오")]
    Professional,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Self::Luxurious,
        Self::Clean,
        Self::Natural,
        Self::Vibrant,
        Self::Professional,
    ];

    pub fn as_prompt_value(&self) -> &'static str {
        match self {
            Self::Luxurious => "고급스러운/살롱 무드",
            Self::Clean => "깨끗한/클린 뷰티",
            Self::Vibrant => "생동감 있는/팝",
            Self::Natural => "자연스러운/일상",
            Self::Professional => "전문적인/스튜디오",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Luxurious => "고급스러운 (Luxury/Salon)",
            Self::Clean => "깨끗한 (Clean Beauty)",
            Self::Vibrant => "생동감 있는 (Vibrant/Pop)",
            Self::Natural => "자연스러운 (Natural/Lifestyle)",
            Self::Professional => "전문적인 (Studio/Professional)",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DesignStyle {
    #[default]
    #[serde(alias = "Premium")]
    Premium,
    #[serde(alias = "Clean Beauty")]
    CleanBeauty,
    #[serde(alias = "Pop")]
    Pop,
    #[serde(alias = "Salon")]
    Salon,
    #[serde(alias = "Minimal")]
    Minimal,
}

impl DesignStyle {
    pub const ALL: [DesignStyle; 5] = [
        Self::Premium,
        Self::CleanBeauty,
        Self::Pop,
        Self::Salon,
        Self::Minimal,
    ];

    pub fn as_prompt_value(&self) -> &'static str {
        match self {
            Self::Premium => "Premium",
            Self::CleanBeauty => "Clean Beauty",
            Self::Pop => "Pop",
            Self::Salon => "Salon",
            Self::Minimal => "Minimal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Premium => "Premium (High-end)",
            Self::CleanBeauty => "Clean Beauty (Pure)",
            Self::Pop => "Pop (Trendy/Vivid)",
            Self::Salon => "Salon (Professional)",
            Self::Minimal => "Minimal (Simple)",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundStyle {
    #[serde(alias = "Solid Color")]
    Solid,
    #[default]
    #[serde(alias = "Soft Gradient")]
    SoftGradient,
    #[serde(alias = "Strong Gradient")]
    StrongGradient,
    #[serde(alias = "Spotlight")]
    Spotlight,
    #[serde(alias = "Dark Glow")]
    DarkGlow,
    #[serde(alias = "Light Glow")]
    LightGlow,
}

impl BackgroundStyle {
    pub const ALL: [BackgroundStyle; 6] = [
        Self::Solid,
        Self::SoftGradient,
        Self::StrongGradient,
        Self::Spotlight,
        Self::DarkGlow,
        Self::LightGlow,
    ];

    pub fn as_prompt_value(&self) -> &'static str {
        match self {
            Self::Solid => "Solid Color",
            Self::SoftGradient => "Soft Gradient",
            Self::StrongGradient => "Strong Gradient",
            Self::Spotlight => "Spotlight",
            Self::DarkGlow => "Dark Glow",
            Self::LightGlow => "Light Glow",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Solid => "Solid Color (단색)",
            Self::SoftGradient => "Soft Gradient (부드러운 그라데이션)",
            Self::StrongGradient => "Strong Gradient (강렬한 그라데이션)",
            Self::Spotlight => "Spotlight (스포트라이트)",
            Self::DarkGlow => "Dark Glow (어두운 광채)",
            Self::LightGlow => "Light Glow (밝은 광채)",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DecorativeStyle {
    #[serde(alias = "Sparkle")]
    Sparkle,
    #[serde(alias = "Glossy")]
    Glossy,
    #[serde(alias = "Geometric")]
    Geometric,
    #[default]
    #[serde(alias = "Minimal")]
    Minimal,
}

impl DecorativeStyle {
    pub const ALL: [DecorativeStyle; 4] =
        [Self::Sparkle, Self::Glossy, Self::Geometric, Self::Minimal];

    pub fn as_prompt_value(&self) -> &'static str {
        match self {
            Self::Sparkle => "Sparkle",
            Self::Glossy => "Glossy",
            Self::Geometric => "Geometric",
            Self::Minimal => "Minimal",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sparkle => "Sparkle (반짝임)",
            Self::Glossy => "Glossy (광택)",
            Self::Geometric => "Geometric (기하학 패턴)",
            Self::Minimal => "Minimal (단순 도형)",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DecorativeDensity {
    #[default]
    #[serde(alias = "Low")]
    Low,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

impl DecorativeDensity {
    pub const ALL: [DecorativeDensity; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_prompt_value(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low (적게)",
            Self::Medium => "Medium (보통)",
            Self::High => "High (많이)",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextBlockPosition {
    #[serde(alias = "None")]
    None,
    #[serde(alias = "Top Area")]
    Top,
    #[serde(alias = "Bottom Area")]
    Bottom,
    #[serde(alias = "Left Side")]
    Left,
    #[serde(alias = "Right Side")]
    Right,
    #[default]
    #[serde(alias = "Center")]
    Center,
}

impl TextBlockPosition {
    pub const ALL: [TextBlockPosition; 6] = [
        Self::None,
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
        Self::Center,
    ];

    pub fn as_prompt_value(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Top => "Top Area",
            Self::Bottom => "Bottom Area",
            Self::Left => "Left Side",
            Self::Right => "Right Side",
            Self::Center => "Center",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "선택 안함 (None)",
            Self::Top => "상단 (Top)",
            Self::Bottom => "하단 (Bottom)",
            Self::Left => "좌측 (Left)",
            Self::Right => "우측 (Right)",
            Self::Center => "중앙 (Center)",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextBlockSize {
    #[serde(alias = "None")]
    None,
    #[serde(alias = "Small")]
    Small,
    #[default]
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "Large")]
    Large,
}

impl TextBlockSize {
    pub const ALL: [TextBlockSize; 4] = [Self::None, Self::Small, Self::Medium, Self::Large];

    pub fn as_prompt_value(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "선택 안함 (None)",
            Self::Small => "작게",
            Self::Medium => "중간",
            Self::Large => "크게",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ModelUsage {
    #[serde(alias = "No Model")]
    NoModel,
    #[default]
    #[serde(alias = "Use Model (Identity Change)")]
    UseModel,
}

impl ModelUsage {
    pub const ALL: [ModelUsage; 2] = [Self::NoModel, Self::UseModel];

    pub fn as_prompt_value(&self) -> &'static str {
        match self {
            Self::NoModel => "No Model",
            Self::UseModel => "Use Model (Identity Change)",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoModel => "모델 없음 (No Model)",
            Self::UseModel => "모델 사용 (변형 필수)",
        }
    }
}

/// Display scale of a product image within the composition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ProductRole {
    Large,
    #[default]
    Medium,
    Small,
}

impl ProductRole {
    pub const ALL: [ProductRole; 3] = [Self::Large, Self::Medium, Self::Small];

    pub fn as_prompt_value(&self) -> &'static str {
        match self {
            Self::Large => "Large",
            Self::Medium => "Medium",
            Self::Small => "Small",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Large => "Main (크게)",
            Self::Medium => "Medium (중간)",
            Self::Small => "Small (작게)",
        }
    }
}

/// Everything the user supplies for one creative. Image fields hold either a
/// base64 data URL or a path to an image file until the brief is prepared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CreativeBrief {
    pub product_name: String,
    pub target_audience: String,
    pub channel: Channel,
    pub custom_ratio_width: Option<u32>,
    pub custom_ratio_height: Option<u32>,
    pub tone: Tone,
    pub additional_info: String,
    pub product_images: Vec<String>,
    #[serde(alias = "productSizes")]
    pub product_roles: Vec<ProductRole>,
    pub model_image: Option<String>,
    pub model_usage_rule: ModelUsage,
    pub background_image: Option<String>,
    pub reference_image: Option<String>,

    pub design_style: DesignStyle,
    pub background_style: BackgroundStyle,
    pub primary_color: String,
    pub secondary_color: String,
    pub use_decorative_elements: bool,
    pub decorative_style: DecorativeStyle,
    pub decorative_density: DecorativeDensity,
    pub text_block_main_position: TextBlockPosition,
    pub text_block_main_size: TextBlockSize,

    pub modification_request: String,
}

impl Default for CreativeBrief {
    fn default() -> Self {
        Self {
            product_name: String::new(),
            target_audience: String::new(),
            channel: Channel::default(),
            custom_ratio_width: None,
            custom_ratio_height: None,
            tone: Tone::default(),
            additional_info: String::new(),
            product_images: Vec::new(),
            product_roles: Vec::new(),
            model_image: None,
            model_usage_rule: ModelUsage::default(),
            background_image: None,
            reference_image: None,
            design_style: DesignStyle::default(),
            background_style: BackgroundStyle::default(),
            primary_color: "#ffffff".to_string(),
            secondary_color: "#f0f0f0".to_string(),
            use_decorative_elements: false,
            decorative_style: DecorativeStyle::default(),
            decorative_density: DecorativeDensity::default(),
            text_block_main_position: TextBlockPosition::default(),
            text_block_main_size: TextBlockSize::default(),
            modification_request: String::new(),
        }
    }
}

impl CreativeBrief {
    pub fn product_role(&self, index: usize) -> ProductRole {
        self.product_roles.get(index).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub prompt: String,
    pub image_data_url: Option<String>,
    pub aspect_ratio_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub product_name: String,
    pub channel: Channel,
    pub aspect_ratio_label: String,
    pub prompt: String,
    pub prompt_model: String,
    pub image_model: Option<String>,
    pub prompt_path: String,
    pub image_path: Option<String>,
}
