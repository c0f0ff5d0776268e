//! Crop recommendation: form input, request construction and result mapping.

use serde::{Deserialize, Serialize};

use crate::protocol::{CropRequest, CropResponse};

/// Icon used for crops missing from the lookup table.
pub const DEFAULT_CROP_ICON: &str = "🌱";

// ─── Input fields ────────────────────────────────────────────────────────────

/// One of the seven soil / climate parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropField {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

/// Display metadata and declared range of a [`CropField`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub field: CropField,
    /// Form control name.
    pub name: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl FieldSpec {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// `"Nitrogen (N) (mg/kg)"`, or just the label for unitless fields.
    pub fn caption(&self) -> String {
        if self.unit.is_empty() {
            self.label.to_string()
        } else {
            format!("{} ({})", self.label, self.unit)
        }
    }
}

/// Form fields in display order.
pub static CROP_FIELDS: [FieldSpec; 7] = [
    FieldSpec { field: CropField::Nitrogen, name: "nitrogen", label: "Nitrogen (N)", unit: "mg/kg", min: 0.0, max: 140.0, step: 0.1 },
    FieldSpec { field: CropField::Phosphorus, name: "phosphorus", label: "Phosphorus (P)", unit: "mg/kg", min: 5.0, max: 55.0, step: 0.1 },
    FieldSpec { field: CropField::Potassium, name: "potassium", label: "Potassium (K)", unit: "mg/kg", min: 5.0, max: 200.0, step: 0.1 },
    FieldSpec { field: CropField::Temperature, name: "temperature", label: "Temperature", unit: "°C", min: 0.0, max: 50.0, step: 0.1 },
    FieldSpec { field: CropField::Humidity, name: "humidity", label: "Humidity", unit: "%", min: 14.0, max: 100.0, step: 0.1 },
    FieldSpec { field: CropField::Ph, name: "ph", label: "pH Level", unit: "", min: 3.5, max: 9.5, step: 0.1 },
    FieldSpec { field: CropField::Rainfall, name: "rainfall", label: "Rainfall", unit: "mm", min: 20.0, max: 300.0, step: 0.1 },
];

impl CropField {
    pub fn spec(self) -> &'static FieldSpec {
        // CROP_FIELDS is indexed in declaration order.
        &CROP_FIELDS[self as usize]
    }
}

/// Raw text of the crop form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CropForm {
    pub nitrogen: String,
    pub phosphorus: String,
    pub potassium: String,
    pub temperature: String,
    pub humidity: String,
    pub ph: String,
    pub rainfall: String,
}

impl CropForm {
    pub fn get(&self, field: CropField) -> &str {
        match field {
            CropField::Nitrogen => &self.nitrogen,
            CropField::Phosphorus => &self.phosphorus,
            CropField::Potassium => &self.potassium,
            CropField::Temperature => &self.temperature,
            CropField::Humidity => &self.humidity,
            CropField::Ph => &self.ph,
            CropField::Rainfall => &self.rainfall,
        }
    }

    pub fn set(&mut self, field: CropField, value: String) {
        let slot = match field {
            CropField::Nitrogen => &mut self.nitrogen,
            CropField::Phosphorus => &mut self.phosphorus,
            CropField::Potassium => &mut self.potassium,
            CropField::Temperature => &mut self.temperature,
            CropField::Humidity => &mut self.humidity,
            CropField::Ph => &mut self.ph,
            CropField::Rainfall => &mut self.rainfall,
        };
        *slot = value;
    }

    /// Parse every field leniently; unparseable text becomes `NaN`.
    pub fn parse(&self) -> CropInput {
        let f = |field| parse_float_lenient(self.get(field));
        CropInput {
            nitrogen: f(CropField::Nitrogen),
            phosphorus: f(CropField::Phosphorus),
            potassium: f(CropField::Potassium),
            temperature: f(CropField::Temperature),
            humidity: f(CropField::Humidity),
            ph: f(CropField::Ph),
            rainfall: f(CropField::Rainfall),
        }
    }
}

/// Parse the longest numeric prefix of `s`, or `NaN` when there is none.
///
/// `"6.5"` → 6.5, `" 12kg"` → 12.0, `"abc"` → NaN.  Mirrors how browser
/// number inputs are read, so nothing is rejected client side.
pub fn parse_float_lenient(s: &str) -> f64 {
    let s = s.trim_start();
    if let Ok(v) = s.trim_end().parse::<f64>() {
        if v.is_finite() {
            return v;
        }
    }
    let end = s
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    (1..=end)
        .rev()
        .filter(|&i| s.is_char_boundary(i))
        .find_map(|i| s[..i].parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

// ─── Parsed input ────────────────────────────────────────────────────────────

/// The seven numeric parameters of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropInput {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl CropInput {
    pub fn get(&self, field: CropField) -> f64 {
        match field {
            CropField::Nitrogen => self.nitrogen,
            CropField::Phosphorus => self.phosphorus,
            CropField::Potassium => self.potassium,
            CropField::Temperature => self.temperature,
            CropField::Humidity => self.humidity,
            CropField::Ph => self.ph,
            CropField::Rainfall => self.rainfall,
        }
    }

    /// Fields outside their declared range (NaN included).
    ///
    /// Informational only: submissions are forwarded regardless.
    pub fn out_of_range(&self) -> Vec<CropField> {
        CROP_FIELDS
            .iter()
            .filter(|spec| !spec.contains(self.get(spec.field)))
            .map(|spec| spec.field)
            .collect()
    }

    /// `(caption, value)` pairs for reports, in form order.
    pub fn labelled_values(&self) -> Vec<(String, String)> {
        CROP_FIELDS
            .iter()
            .map(|spec| {
                let v = self.get(spec.field);
                let text = if v.is_nan() { "NaN".to_string() } else { format!("{v}") };
                let value = if spec.unit.is_empty() {
                    text
                } else {
                    format!("{text} {}", spec.unit)
                };
                (spec.label.to_string(), value)
            })
            .collect()
    }
}

impl From<&CropInput> for CropRequest {
    fn from(input: &CropInput) -> Self {
        CropRequest {
            n: input.nitrogen,
            p: input.phosphorus,
            k: input.potassium,
            temperature: input.temperature,
            humidity: input.humidity,
            ph: input.ph,
            rainfall: input.rainfall,
        }
    }
}

// ─── Result ──────────────────────────────────────────────────────────────────

/// One row of the recommendation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRecommendation {
    pub name: String,
    /// Whole percent.
    pub confidence: u32,
    pub icon: String,
}

impl CropRecommendation {
    pub fn new(name: &str, confidence: f64) -> Self {
        CropRecommendation {
            name: display_name(name),
            confidence: round_percent(confidence),
            icon: crop_icon(name).to_string(),
        }
    }
}

/// Map an API response to display rows, preserving the API's order.
pub fn map_crop_response(resp: &CropResponse) -> Vec<CropRecommendation> {
    resp.recommended_crops
        .iter()
        .map(|(name, confidence)| CropRecommendation::new(name, *confidence))
        .collect()
}

/// Fixed list shown in demo mode when the API call fails.
pub fn fallback_crops() -> Vec<CropRecommendation> {
    vec![
        CropRecommendation::new("Wheat", 92.0),
        CropRecommendation::new("Corn", 87.0),
        CropRecommendation::new("Rice", 81.0),
    ]
}

/// Round to the nearest whole percent, halves upward; negatives clamp to 0.
pub fn round_percent(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    (value + 0.5).floor().max(0.0) as u32
}

/// Capitalise the first letter: `"wheat"` → `"Wheat"`.
pub fn display_name(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Case-insensitive crop name → emoji lookup.
pub fn crop_icon(name: &str) -> &'static str {
    match name.trim().to_lowercase().as_str() {
        "rice" | "wheat" | "barley" => "🌾",
        "corn" | "maize" => "🌽",
        "cotton" | "jute" => "🌿",
        "coconut" => "🥥",
        "papaya" | "mango" => "🥭",
        "orange" => "🍊",
        "apple" | "pomegranate" => "🍎",
        "muskmelon" => "🍈",
        "watermelon" => "🍉",
        "grapes" => "🍇",
        "banana" => "🍌",
        "lentil" | "blackgram" | "mungbean" | "mothbeans" | "pigeonpeas"
        | "kidneybeans" | "chickpea" => "🌱",
        "coffee" => "☕",
        _ => DEFAULT_CROP_ICON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> CropForm {
        CropForm {
            nitrogen: "90".into(),
            phosphorus: "42".into(),
            potassium: "43".into(),
            temperature: "20.8".into(),
            humidity: "82".into(),
            ph: "6.5".into(),
            rainfall: "202.9".into(),
        }
    }

    #[test]
    fn test_field_table_order_matches_enum() {
        for (i, spec) in CROP_FIELDS.iter().enumerate() {
            assert_eq!(spec.field as usize, i);
            assert_eq!(spec.field.spec().name, spec.name);
        }
    }

    #[test]
    fn test_parse_float_lenient() {
        assert_eq!(parse_float_lenient("6.5"), 6.5);
        assert_eq!(parse_float_lenient(" 12kg"), 12.0);
        assert_eq!(parse_float_lenient("-3"), -3.0);
        assert_eq!(parse_float_lenient("1e2"), 100.0);
        assert!(parse_float_lenient("").is_nan());
        assert!(parse_float_lenient("abc").is_nan());
        assert!(parse_float_lenient("-").is_nan());
    }

    #[test]
    fn test_form_parse_and_request() {
        let input = filled_form().parse();
        assert_eq!(input.ph, 6.5);
        assert!(input.out_of_range().is_empty());

        let req = CropRequest::from(&input);
        assert_eq!(req.n, 90.0);
        assert_eq!(req.rainfall, 202.9);
    }

    #[test]
    fn test_invalid_text_is_forwarded_as_nan() {
        let mut form = filled_form();
        form.set(CropField::Humidity, "wet".into());
        form.set(CropField::Ph, "12".into());
        let input = form.parse();
        assert!(input.humidity.is_nan());
        assert_eq!(
            input.out_of_range(),
            vec![CropField::Humidity, CropField::Ph]
        );
        assert!(CropRequest::from(&input).humidity.is_nan());
    }

    #[test]
    fn test_map_response_rounds_and_titles() {
        let resp = CropResponse {
            recommended_crops: vec![("wheat".into(), 91.6)],
        };
        let rows = map_crop_response(&resp);
        assert_eq!(
            rows,
            vec![CropRecommendation {
                name: "Wheat".into(),
                confidence: 92,
                icon: "🌾".into(),
            }]
        );
    }

    #[test]
    fn test_one_row_per_pair_in_order() {
        let resp = CropResponse {
            recommended_crops: vec![
                ("mango".into(), 70.49),
                ("Coffee".into(), 20.5),
                ("quinoa".into(), 9.0),
            ],
        };
        let rows = map_crop_response(&resp);
        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].confidence, rows[0].icon.as_str()), (70, "🥭"));
        assert_eq!((rows[1].confidence, rows[1].icon.as_str()), (21, "☕"));
        assert_eq!(rows[2].icon, DEFAULT_CROP_ICON);
    }

    #[test]
    fn test_icon_lookup_is_case_insensitive() {
        assert_eq!(crop_icon("MAIZE"), "🌽");
        assert_eq!(crop_icon("Watermelon"), "🍉");
        assert_eq!(crop_icon("dragonfruit"), "🌱");
    }

    #[test]
    fn test_fallback_list() {
        let rows = fallback_crops();
        let summary: Vec<(&str, u32, &str)> = rows
            .iter()
            .map(|r| (r.name.as_str(), r.confidence, r.icon.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![("Wheat", 92, "🌾"), ("Corn", 87, "🌽"), ("Rice", 81, "🌾")]
        );
    }

    #[test]
    fn test_labelled_values_units() {
        let values = filled_form().parse().labelled_values();
        assert_eq!(values[0], ("Nitrogen (N)".into(), "90 mg/kg".into()));
        assert_eq!(values[5], ("pH Level".into(), "6.5".into()));
    }
}
