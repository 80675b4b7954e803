use crate::models::{Channel, CreativeBrief, TextBlockPosition, TextBlockSize};

const FULL_FRAME_LAYOUT: &str = "LAYOUT: Full-frame composition with NO specific reserved empty space. Fill the entire canvas with the product and background elements evenly.";

const NO_MODEL_CONSTRAINT: &str = "CRITICAL: NO MODEL IMAGE UPLOADED. DO NOT GENERATE ANY PEOPLE, HANDS, OR HUMAN FIGURES. Focus purely on the product.";

const REFERENCE_STYLE_SOURCE: &str = "PRIMARY STYLE SOURCE: Use the uploaded Reference Image as the MAIN guide for lighting, composition, and mood. Mimic the layout.";

/// Exact ratio quoted in the prompt. A custom channel only uses its own
/// width/height when both are set and non-zero.
pub fn resolve_aspect_ratio(brief: &CreativeBrief) -> String {
    if brief.channel == Channel::NaverGfaCustom {
        if let (Some(width), Some(height)) = (
            brief.custom_ratio_width.filter(|w| *w > 0),
            brief.custom_ratio_height.filter(|h| *h > 0),
        ) {
            return format!("{width}:{height}");
        }
    }

    brief.channel.spec().aspect_ratio.to_string()
}

pub fn api_aspect_ratio(channel: Channel) -> &'static str {
    channel.spec().api_aspect_ratio
}

pub fn text_space_instruction(position: TextBlockPosition, size: TextBlockSize) -> String {
    if position == TextBlockPosition::None || size == TextBlockSize::None {
        return FULL_FRAME_LAYOUT.to_string();
    }

    let position = position.as_prompt_value();
    let size = size.as_prompt_value();
    format!(
        "LAYOUT PRIORITY: You MUST reserve a clear, clean NEGATIVE SPACE at the {position}.\n- Purpose: This area is strictly for future text placement.\n- Size: This empty area must be {size} in size.\n- Constraint: Do not place the main product or complex details in this {position} area. Keep it empty."
    )
}

pub fn decorations_rule(brief: &CreativeBrief) -> String {
    if !brief.use_decorative_elements {
        return "None".to_string();
    }

    format!(
        "{} density of {} elements",
        brief.decorative_density.as_prompt_value(),
        brief.decorative_style.as_prompt_value()
    )
}

pub fn product_lines(brief: &CreativeBrief) -> String {
    if brief.product_images.is_empty() {
        return "No product images.".to_string();
    }

    (0..brief.product_images.len())
        .map(|index| {
            format!(
                "Product #{}: role {}",
                index + 1,
                brief.product_role(index).as_prompt_value()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_system_instruction(brief: &CreativeBrief) -> String {
    let text_space = text_space_instruction(
        brief.text_block_main_position,
        brief.text_block_main_size,
    );

    format!(
        "You are a professional commercial image composition assistant.
Create a SINGLE-PARAGRAPH image generation prompt based on the user's inputs.

[PRIORITY ORDER]
1. USER MODIFICATION REQUESTS (Highest Priority) - If the user asks for specific changes, override standard rules.
2. REFERENCE IMAGE (High Priority) - If provided, follow its style/composition closely.
3. NO MODEL RULE (High Priority) - If no model image is uploaded, NEVER generate a person.

[ABSOLUTE RULES]
1. NEVER generate text/typography. Leave clean negative space.
2. Products: Keep packaging/label/color EXACT. Adjust display size by role.
3. Model:
   - If usage rule is \"No Model\" OR no image uploaded: DO NOT generate a person.
   - If usage rule is \"Use Model\" AND image uploaded: Create a NEW fictional person inspired by the uploaded image (change identity).
4. Aspect Ratio: End with “– aspect ratio W:H”.

[DESIGN RULES]
- Design Style: {design_style}
- Background: {background_style} (Primary: {primary}, Secondary: {secondary})
- Decorations: {decorations}
- Text Space: {text_space}",
        design_style = brief.design_style.as_prompt_value(),
        background_style = brief.background_style.as_prompt_value(),
        primary = brief.primary_color,
        secondary = brief.secondary_color,
        decorations = decorations_rule(brief),
    )
}

pub fn build_prompt_request(brief: &CreativeBrief) -> String {
    let aspect_ratio = resolve_aspect_ratio(brief);
    let text_space = text_space_instruction(
        brief.text_block_main_position,
        brief.text_block_main_size,
    );

    let modification = if brief.modification_request.is_empty() {
        "None.".to_string()
    } else {
        format!(
            "\"{}\"\n*** INSTRUCTION: This request overrides all other conflicting rules. ***",
            brief.modification_request
        )
    };

    let reference = if brief.reference_image.is_some() {
        REFERENCE_STYLE_SOURCE.to_string()
    } else {
        "No reference provided.".to_string()
    };

    let model_constraint = if brief.model_image.is_some() {
        format!(
            "Model Uploaded: Yes. Rule: {}. Create a new fictional model loosely inspired by the upload.",
            brief.model_usage_rule.as_prompt_value()
        )
    } else {
        NO_MODEL_CONSTRAINT.to_string()
    };

    let decorations = if brief.use_decorative_elements {
        "Yes"
    } else {
        "No"
    };

    format!(
        "Create a commercial advertisement image using the following data:

[URGENT: USER MODIFICATION REQUEST]
{modification}

[REFERENCE IMAGE PRIORITY]
{reference}

[MODEL CONSTRAINT]
{model_constraint}

[Products]
{products}

[Design Settings]
Style: {design_style}
Background: {background_style}
Colors: {primary}, {secondary}
Decorations: {decorations} ({decorative_style}, {decorative_density})

[Layout & Text Space]
{text_space}
Channel: {channel}

[Product Info]
Name: {name}
Key Points: {key_points}
Mood: {tone}
Target: {target}

GENERATE A SINGLE PARAGRAPH PROMPT describing the scene, lighting, and composition.
Ensure strict adherence to the Aspect Ratio: {aspect_ratio}.
End with: “– aspect ratio {aspect_ratio}”",
        products = product_lines(brief),
        design_style = brief.design_style.as_prompt_value(),
        background_style = brief.background_style.as_prompt_value(),
        primary = brief.primary_color,
        secondary = brief.secondary_color,
        decorative_style = brief.decorative_style.as_prompt_value(),
        decorative_density = brief.decorative_density.as_prompt_value(),
        channel = brief.channel.as_prompt_value(),
        name = brief.product_name,
        key_points = brief.additional_info,
        tone = brief.tone.as_prompt_value(),
        target = brief.target_audience,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DecorativeDensity, DecorativeStyle, ModelUsage, ProductRole, Tone};

    fn brief() -> CreativeBrief {
        CreativeBrief {
            product_name: "Anti Hair-Loss Shampoo".to_string(),
            target_audience: "office workers in their 30s".to_string(),
            additional_info: "caffeine complex".to_string(),
            ..CreativeBrief::default()
        }
    }

    #[test]
    fn custom_channel_uses_custom_ratio() {
        let mut brief = brief();
        brief.channel = Channel::NaverGfaCustom;
        brief.custom_ratio_width = Some(7);
        brief.custom_ratio_height = Some(3);
        assert_eq!(resolve_aspect_ratio(&brief), "7:3");
        assert_eq!(api_aspect_ratio(brief.channel), "1:1");
    }

    #[test]
    fn custom_channel_without_dimensions_reports_custom() {
        let mut brief = brief();
        brief.channel = Channel::NaverGfaCustom;
        brief.custom_ratio_width = Some(0);
        brief.custom_ratio_height = Some(3);
        assert_eq!(resolve_aspect_ratio(&brief), "Custom");
    }

    #[test]
    fn custom_dimensions_ignored_for_fixed_channels() {
        let mut brief = brief();
        brief.channel = Channel::NaverGfa1250x560;
        brief.custom_ratio_width = Some(7);
        brief.custom_ratio_height = Some(3);
        assert_eq!(resolve_aspect_ratio(&brief), "125:56");
        assert_eq!(api_aspect_ratio(brief.channel), "16:9");
    }

    #[test]
    fn text_space_none_gives_full_frame() {
        assert_eq!(
            text_space_instruction(TextBlockPosition::None, TextBlockSize::Large),
            FULL_FRAME_LAYOUT
        );
        assert_eq!(
            text_space_instruction(TextBlockPosition::Top, TextBlockSize::None),
            FULL_FRAME_LAYOUT
        );
    }

    #[test]
    fn text_space_reserves_named_area() {
        let instruction = text_space_instruction(TextBlockPosition::Right, TextBlockSize::Small);
        assert!(instruction.starts_with("LAYOUT PRIORITY"));
        assert!(instruction.contains("NEGATIVE SPACE at the Right Side."));
        assert!(instruction.contains("must be Small in size"));
        assert!(instruction.contains("in this Right Side area"));
    }

    #[test]
    fn product_lines_default_missing_roles_to_medium() {
        let mut brief = brief();
        assert_eq!(product_lines(&brief), "No product images.");

        brief.product_images = vec!["a".into(), "b".into(), "c".into()];
        brief.product_roles = vec![ProductRole::Large, ProductRole::Small];
        assert_eq!(
            product_lines(&brief),
            "Product #1: role Large\nProduct #2: role Small\nProduct #3: role Medium"
        );
    }

    #[test]
    fn decorations_rule_reflects_toggle() {
        let mut brief = brief();
        assert_eq!(decorations_rule(&brief), "None");

        brief.use_decorative_elements = true;
        brief.decorative_style = DecorativeStyle::Sparkle;
        brief.decorative_density = DecorativeDensity::High;
        assert_eq!(decorations_rule(&brief), "High density of Sparkle elements");
    }

    #[test]
    fn system_instruction_carries_design_rules() {
        let mut brief = brief();
        brief.primary_color = "#112233".to_string();
        let instruction = build_system_instruction(&brief);

        assert!(instruction.contains("- Design Style: Premium"));
        assert!(instruction
            .contains("- Background: Soft Gradient (Primary: #112233, Secondary: #f0f0f0)"));
        assert!(instruction.contains("- Decorations: None"));
        assert!(instruction.contains("- Text Space: LAYOUT PRIORITY"));
    }

    #[test]
    fn request_without_model_forbids_people() {
        let request = build_prompt_request(&brief());

        assert!(request.contains(NO_MODEL_CONSTRAINT));
        assert!(request.contains("No reference provided."));
        assert!(request.contains("[URGENT: USER MODIFICATION REQUEST]\nNone."));
        assert!(request.contains("Name: Anti Hair-Loss Shampoo"));
        assert!(request.contains("Mood: 깨끗한/클린 뷰티"));
        assert!(request.contains("Channel: 쇼핑몰 썸네일"));
        assert!(request.ends_with("End with: “– aspect ratio 1:1”"));
    }

    #[test]
    fn request_with_model_reference_and_modification() {
        let mut brief = brief();
        brief.model_image = Some("data:image/png;base64,AAAA".to_string());
        brief.model_usage_rule = ModelUsage::NoModel;
        brief.reference_image = Some("data:image/png;base64,AAAA".to_string());
        brief.modification_request = "  make it warmer  ".to_string();
        brief.tone = Tone::Luxurious;
        brief.channel = Channel::MetaFeed;

        let request = build_prompt_request(&brief);

        assert!(request.contains("Model Uploaded: Yes. Rule: No Model."));
        assert!(request.contains(REFERENCE_STYLE_SOURCE));
        assert!(request.contains("\"  make it warmer  \"\n*** INSTRUCTION"));
        assert!(request.contains("Ensure strict adherence to the Aspect Ratio: 4:5."));
        assert!(!request.contains(NO_MODEL_CONSTRAINT));
    }

    #[test]
    fn whitespace_modification_request_is_still_quoted() {
        let mut brief = brief();
        brief.modification_request = "   ".to_string();

        let request = build_prompt_request(&brief);
        assert!(request.contains("[URGENT: USER MODIFICATION REQUEST]\n\"   \"\n*** INSTRUCTION"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let brief = brief();
        assert_eq!(build_prompt_request(&brief), build_prompt_request(&brief));
        assert_eq!(
            build_system_instruction(&brief),
            build_system_instruction(&brief)
        );
    }
}
