//! Wire types for the inference API.
//!
//! Field names follow the remote service exactly; the crop request uses
//! the single-letter nutrient keys `N`, `P` and `K`.

use serde::{Deserialize, Serialize};

/// Body of `POST /recommend_crops`.
///
/// Non-finite values serialize as `null` and are forwarded unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRequest {
    #[serde(rename = "N")]
    pub n: f64,
    #[serde(rename = "P")]
    pub p: f64,
    #[serde(rename = "K")]
    pub k: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

/// Response of `POST /recommend_crops`: `[name, confidence]` pairs, best first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropResponse {
    pub recommended_crops: Vec<(String, f64)>,
}

/// Response of `POST /detect_disease`.
///
/// `result` is the literal string `"Healthy"` for a healthy leaf and a
/// disease class name otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseResponse {
    pub result: String,
    pub confidence: f64,
}

/// Health-check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
    pub status: String,
}

/// Multipart field name carrying the uploaded image.
pub const DISEASE_FILE_FIELD: &str = "file";

pub const RECOMMEND_CROPS_PATH: &str = "/recommend_crops";
pub const DETECT_DISEASE_PATH: &str = "/detect_disease";
pub const HEALTH_PATH: &str = "/health";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_request_field_names() {
        let req = CropRequest {
            n: 90.0,
            p: 42.0,
            k: 43.0,
            temperature: 20.8,
            humidity: 82.0,
            ph: 6.5,
            rainfall: 202.9,
        };
        let v = serde_json::to_value(&req).unwrap();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        for key in ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert_eq!(keys.len(), 7);
    }

    #[test]
    fn test_nan_is_forwarded_as_null() {
        let req = CropRequest {
            n: f64::NAN,
            p: 1.0,
            k: 1.0,
            temperature: 1.0,
            humidity: 1.0,
            ph: 1.0,
            rainfall: 1.0,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert!(v["N"].is_null());
    }

    #[test]
    fn test_parse_crop_response() {
        let body = r#"{"recommended_crops": [["rice", 91.6], ["jute", 5.2]]}"#;
        let resp: CropResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.recommended_crops.len(), 2);
        assert_eq!(resp.recommended_crops[0].0, "rice");
    }
}
