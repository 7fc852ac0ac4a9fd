//! Prompt construction for wrap mockup generation.
//!
//! Each coverage style gets its own prompt built from the client's brief.
//! The prompt is deliberately strict about texts: the model must render
//! every provided text verbatim and invent nothing.

use serde::{Deserialize, Serialize};

/// How much of the vehicle the wrap covers.
///
/// The serialized labels are the ones clients send and receive; they are
/// also used verbatim inside the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverageStyle {
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Semi-cover")]
    SemiCover,
    #[serde(rename = "Full cover")]
    FullCover,
}

impl CoverageStyle {
    /// All styles in canonical order.
    pub fn all() -> [CoverageStyle; 3] {
        [
            CoverageStyle::Standard,
            CoverageStyle::SemiCover,
            CoverageStyle::FullCover,
        ]
    }

    /// Client-facing label.
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageStyle::Standard => "Standard",
            CoverageStyle::SemiCover => "Semi-cover",
            CoverageStyle::FullCover => "Full cover",
        }
    }

    /// Parse a client-provided label. Unknown labels fall back to Standard.
    pub fn parse(label: &str) -> Self {
        match label {
            "Semi-cover" => CoverageStyle::SemiCover,
            "Full cover" => CoverageStyle::FullCover,
            _ => CoverageStyle::Standard,
        }
    }
}

impl std::fmt::Display for CoverageStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split the canonical style list into the chosen style and the two
/// alternatives, keeping canonical order among the alternatives.
pub fn plan(chosen: CoverageStyle) -> (CoverageStyle, Vec<CoverageStyle>) {
    let others = CoverageStyle::all()
        .into_iter()
        .filter(|style| *style != chosen)
        .collect();
    (chosen, others)
}

/// Everything the client told us about the design.
///
/// Optional fields are `None` when the client left them blank; the prompt
/// marks those as not-to-be-displayed instead of inventing content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignBrief {
    pub vehicle_type: String,
    pub vehicle_category: Option<String>,
    pub industry: Option<String>,
    pub brand_name: Option<String>,
    pub main_text: Option<String>,
    pub key_info: Option<String>,
    pub style: Option<String>,
    pub primary_colors: String,
    pub constraints: Option<String>,
    pub logo_provided: bool,
}

fn coverage_description(coverage: CoverageStyle, colors: &str) -> String {
    match coverage {
        CoverageStyle::Standard => format!(
            "STANDARD (simple lettering): The vehicle KEEPS its original paint untouched. \
             Only the brand name, slogan, contact details and logo are applied as cut vinyl \
             lettering on the side panel (NOT on the windows). No colored background, no \
             surface wrap. The lettering uses the colors {colors}. The vehicle's original \
             paint stays 100% visible."
        ),
        CoverageStyle::SemiCover => format!(
            "SEMI-COVER (partial wrap, EXACTLY 40 to 60% of the surface): The colors {colors} \
             MUST cover between 40% and 60% of the vehicle's side surface. For example: the \
             whole lower half of the vehicle is covered, OR the whole rear section from the \
             doors back. The covered area forms one VISIBLE, CLEAN block in the colors \
             {colors}. The rest of the body (the remaining 40 to 60%) MUST stay in the \
             vehicle's original color, with NO wrap at all. The brand name, slogan and \
             contact details are integrated into the covered area."
        ),
        CoverageStyle::FullCover => format!(
            "FULL COVER (total wrap): The colors {colors} cover the ENTIRE visible body \
             (hood, sides, doors, tailgate) EXCEPT the windows and bumpers. The whole \
             vehicle is transformed in the colors {colors}. The name, slogan and contact \
             details are integrated into the overall design."
        ),
    }
}

fn text_line(field: &str, value: Option<&str>) -> String {
    match value {
        Some(v) => format!("- {field}: \"{v}\" -> MUST appear on the vehicle\n"),
        None => format!("- {field}: not provided, do not display\n"),
    }
}

fn logo_instruction(logo_provided: bool, logo_url: Option<&str>) -> &'static str {
    match (logo_provided, logo_url) {
        (false, _) => {
            "No logo provided. Use clean, elegant typography to display the brand name \
             on the vehicle."
        }
        (true, Some(_)) => {
            "Logo provided: YES. The logo MUST appear in the image, this is an ABSOLUTE \
             client requirement. Place the logo clearly visible and LARGE on the side of \
             the vehicle (door or side panel). The logo must be reproduced IDENTICALLY: \
             same colors, same shapes, same proportions, with NO modification or \
             distortion. The logo matters as much as the texts. If the logo is not \
             visible and identifiable in the final image, the result will be REFUSED and \
             REJECTED. Integrate the logo as a central element of the wrap design."
        }
        (true, None) => {
            "A logo was provided but its upload failed. Use clean typography for the \
             brand name instead of the logo."
        }
    }
}

/// Build the full generation prompt for one coverage style.
///
/// `logo_url` is the uploaded reference image, if the upload succeeded; the
/// same URL is also attached to the generation request itself.
pub fn build_prompt(brief: &DesignBrief, coverage: CoverageStyle, logo_url: Option<&str>) -> String {
    let mut prompt = String::from(
        "You are an expert commercial vehicle wrap designer. Generate ONE SINGLE IMAGE \
         with ONE SINGLE vehicle.\n\n",
    );

    match &brief.vehicle_category {
        Some(category) => prompt.push_str(&format!(
            "VEHICLE: {} ({})\n",
            brief.vehicle_type, category
        )),
        None => prompt.push_str(&format!("VEHICLE: {}\n", brief.vehicle_type)),
    }
    prompt.push_str(
        "VIEW: Pure side profile (perpendicular to the side panel). Complete vehicle in \
         frame. Neutral background.\n\n",
    );

    prompt.push_str(&format!("WRAP TO APPLY: {}\n", coverage.as_str()));
    prompt.push_str(&coverage_description(coverage, &brief.primary_colors));
    prompt.push_str("\n\n");

    prompt.push_str(&format!(
        "MANDATORY DESIGN COLORS: {}\n",
        brief.primary_colors
    ));
    prompt.push_str(
        "These colors must be used for all of the wrap and lettering. They are the \
         client's choice.\n\n",
    );

    prompt.push_str("TEXTS TO DISPLAY (STRICTLY, invent nothing and omit nothing):\n");
    prompt.push_str(&text_line("Brand name", brief.brand_name.as_deref()));
    prompt.push_str(&text_line("Slogan", brief.main_text.as_deref()));
    prompt.push_str(&text_line("Contact info", brief.key_info.as_deref()));
    if let Some(industry) = &brief.industry {
        prompt.push_str(&format!("- Industry: {industry}\n"));
    }
    prompt.push_str(
        "TEXT RULES: Display ALL the texts provided above, with NO exception. Do NOT \
         invent any text, phone number, address or slogan that is not listed above. If a \
         field is not provided, do not display it. Every provided text MUST be LEGIBLE \
         and CORRECT in the final image.\n\n",
    );

    if let Some(style) = &brief.style {
        prompt.push_str(&format!("Style: {style}\n\n"));
    }

    prompt.push_str(&format!(
        "LOGO: {}\n\n",
        logo_instruction(brief.logo_provided, logo_url)
    ));

    if let Some(constraints) = &brief.constraints {
        prompt.push_str(&format!("CONSTRAINTS: {constraints}\n\n"));
    }

    prompt.push_str(&format!(
        r#"STRICT RULES:
1. ONE SINGLE IMAGE with ONE SINGLE "{vehicle}" vehicle
2. Side profile only, no 3/4 view, no front view
3. No collage, no mosaic
4. The vehicle must be WHOLE and COMPLETE in the image. NOTHING may be cropped: the front bumper, rear bumper, roof and wheels must all be fully visible. NEVER crop any part of the vehicle. Leave generous margins around the vehicle.
5. Photorealistic rendering, 1:1 ratio
6. ALL the provided texts (brand, slogan, contact info) must be present and legible on the vehicle. Omit NONE of them.
7. Add NO text, NO word and NO number that the client did not provide. ZERO invention.
8. If a logo was provided, it MUST appear on the vehicle, clearly visible, at sufficient size, reproduced IDENTICALLY. The logo is MANDATORY and NON-NEGOTIABLE. Do NOT replace it with text, do NOT omit it, do NOT distort it.
"#,
        vehicle = brief.vehicle_type
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief() -> DesignBrief {
        DesignBrief {
            vehicle_type: "Renault Trafic".to_string(),
            vehicle_category: Some("utility van".to_string()),
            industry: Some("plumbing".to_string()),
            brand_name: Some("Aqua Pro".to_string()),
            main_text: Some("Fast and reliable".to_string()),
            key_info: Some("01 23 45 67 89".to_string()),
            style: Some("modern".to_string()),
            primary_colors: "blue and white".to_string(),
            constraints: None,
            logo_provided: false,
        }
    }

    #[test]
    fn test_coverage_labels_round_trip() {
        for style in CoverageStyle::all() {
            assert_eq!(CoverageStyle::parse(style.as_str()), style);
        }
    }

    #[test]
    fn test_unknown_label_falls_back_to_standard() {
        assert_eq!(CoverageStyle::parse("Chrome dip"), CoverageStyle::Standard);
        assert_eq!(CoverageStyle::parse(""), CoverageStyle::Standard);
    }

    #[test]
    fn test_serde_uses_wire_labels() {
        let json = serde_json::to_string(&CoverageStyle::SemiCover).unwrap();
        assert_eq!(json, "\"Semi-cover\"");
        let style: CoverageStyle = serde_json::from_str("\"Full cover\"").unwrap();
        assert_eq!(style, CoverageStyle::FullCover);
    }

    #[test]
    fn test_plan_keeps_canonical_order() {
        let (chosen, others) = plan(CoverageStyle::SemiCover);
        assert_eq!(chosen, CoverageStyle::SemiCover);
        assert_eq!(
            others,
            vec![CoverageStyle::Standard, CoverageStyle::FullCover]
        );

        let (chosen, others) = plan(CoverageStyle::Standard);
        assert_eq!(chosen, CoverageStyle::Standard);
        assert_eq!(
            others,
            vec![CoverageStyle::SemiCover, CoverageStyle::FullCover]
        );
    }

    #[test]
    fn test_prompt_contains_provided_texts() {
        let prompt = build_prompt(&brief(), CoverageStyle::Standard, None);

        assert!(prompt.contains("VEHICLE: Renault Trafic (utility van)"));
        assert!(prompt.contains("\"Aqua Pro\" -> MUST appear"));
        assert!(prompt.contains("\"Fast and reliable\" -> MUST appear"));
        assert!(prompt.contains("\"01 23 45 67 89\" -> MUST appear"));
        assert!(prompt.contains("Industry: plumbing"));
        assert!(prompt.contains("Style: modern"));
        assert!(prompt.contains("blue and white"));
    }

    #[test]
    fn test_prompt_marks_missing_texts() {
        let mut b = brief();
        b.main_text = None;
        b.key_info = None;
        let prompt = build_prompt(&b, CoverageStyle::Standard, None);

        assert!(prompt.contains("- Slogan: not provided, do not display"));
        assert!(prompt.contains("- Contact info: not provided, do not display"));
    }

    #[test]
    fn test_prompt_varies_by_coverage() {
        let standard = build_prompt(&brief(), CoverageStyle::Standard, None);
        let semi = build_prompt(&brief(), CoverageStyle::SemiCover, None);
        let full = build_prompt(&brief(), CoverageStyle::FullCover, None);

        assert!(standard.contains("WRAP TO APPLY: Standard"));
        assert!(standard.contains("original paint stays 100% visible"));
        assert!(semi.contains("WRAP TO APPLY: Semi-cover"));
        assert!(semi.contains("between 40% and 60%"));
        assert!(full.contains("WRAP TO APPLY: Full cover"));
        assert!(full.contains("ENTIRE visible body"));
    }

    #[test]
    fn test_logo_instruction_three_ways() {
        let mut b = brief();

        let no_logo = build_prompt(&b, CoverageStyle::Standard, None);
        assert!(no_logo.contains("No logo provided"));

        b.logo_provided = true;
        let uploaded = build_prompt(&b, CoverageStyle::Standard, Some("https://cdn.example/logo.png"));
        assert!(uploaded.contains("Logo provided: YES"));
        assert!(uploaded.contains("reproduced IDENTICALLY"));

        let failed = build_prompt(&b, CoverageStyle::Standard, None);
        assert!(failed.contains("upload failed"));
        assert!(failed.contains("Use clean typography"));
    }

    #[test]
    fn test_constraints_only_when_present() {
        let without = build_prompt(&brief(), CoverageStyle::Standard, None);
        assert!(!without.contains("CONSTRAINTS:"));

        let mut b = brief();
        b.constraints = Some("no red".to_string());
        let with = build_prompt(&b, CoverageStyle::Standard, None);
        assert!(with.contains("CONSTRAINTS: no red"));
    }
}
