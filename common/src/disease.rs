//! Plant disease detection: uploaded image and result mapping.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::crop::round_percent;
use crate::protocol::DiseaseResponse;

/// The literal result string the API uses for a healthy leaf.
pub const HEALTHY_LABEL: &str = "Healthy";

/// Label shown for every non-healthy API result.
pub const DETECTED_LABEL: &str = "Plant Disease Detected";

/// Labels drawn from when a demo-mode placeholder is fabricated.
pub const PLACEHOLDER_DISEASES: [&str; 2] = ["Leaf Spot", "Powdery Mildew"];

/// An image chosen for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseImage {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DiseaseImage {
    /// Accept a file only when its reported MIME type starts with `image/`.
    pub fn accept(file_name: &str, mime: &str, bytes: Vec<u8>) -> Option<DiseaseImage> {
        if !is_image_mime(mime) {
            return None;
        }
        Some(DiseaseImage {
            file_name: file_name.to_string(),
            mime: mime.to_string(),
            bytes,
        })
    }

    /// `data:<mime>;base64,<payload>` for preview and export.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Inverse of [`DiseaseImage::data_url`]; `None` if `url` is not a
    /// base64 image data-URL.
    pub fn from_data_url(file_name: &str, url: &str) -> Option<DiseaseImage> {
        let rest = url.strip_prefix("data:")?;
        let (mime, payload) = rest.split_once(";base64,")?;
        let bytes = STANDARD.decode(payload.trim()).ok()?;
        DiseaseImage::accept(file_name, mime, bytes)
    }
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Whether the plant looks healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Diseased,
}

impl HealthStatus {
    pub fn headline(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Plant is Healthy",
            HealthStatus::Diseased => "Disease Detected",
        }
    }
}

/// Display model of one detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiseaseResult {
    pub status: HealthStatus,
    /// Whole percent.
    pub confidence: u32,
    /// Shown under the headline; `None` when healthy.
    pub disease: Option<String>,
    /// Class name as returned by the API, kept for reports.
    pub raw_label: Option<String>,
}

/// Map an API response: `"Healthy"` is the only healthy value.
pub fn map_disease_response(resp: &DiseaseResponse) -> DiseaseResult {
    let healthy = resp.result == HEALTHY_LABEL;
    DiseaseResult {
        status: if healthy {
            HealthStatus::Healthy
        } else {
            HealthStatus::Diseased
        },
        confidence: round_percent(resp.confidence),
        disease: (!healthy).then(|| DETECTED_LABEL.to_string()),
        raw_label: Some(resp.result.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_image_mime_is_rejected() {
        assert!(DiseaseImage::accept("notes.pdf", "application/pdf", vec![1]).is_none());
        assert!(DiseaseImage::accept("clip.mp4", "video/mp4", vec![1]).is_none());
        assert!(DiseaseImage::accept("blank", "", vec![]).is_none());
        assert!(DiseaseImage::accept("leaf.png", "image/png", vec![1]).is_some());
    }

    #[test]
    fn test_data_url_round_trip() {
        let img = DiseaseImage::accept("leaf.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff]).unwrap();
        let url = img.data_url();
        assert_eq!(url, "data:image/jpeg;base64,/9j/");
        assert_eq!(DiseaseImage::from_data_url("leaf.jpg", &url), Some(img));
        assert!(DiseaseImage::from_data_url("x", "data:text/plain;base64,aGk=").is_none());
    }

    #[test]
    fn test_map_healthy() {
        let r = map_disease_response(&DiseaseResponse {
            result: "Healthy".into(),
            confidence: 97.2,
        });
        assert_eq!(r.status, HealthStatus::Healthy);
        assert_eq!(r.status.headline(), "Plant is Healthy");
        assert_eq!(r.confidence, 97);
        assert_eq!(r.disease, None);
    }

    #[test]
    fn test_map_diseased() {
        let r = map_disease_response(&DiseaseResponse {
            result: "Late Blight".into(),
            confidence: 88.4,
        });
        assert_eq!(r.status, HealthStatus::Diseased);
        assert_eq!(r.status.headline(), "Disease Detected");
        assert_eq!(r.confidence, 88);
        assert_eq!(r.disease.as_deref(), Some("Plant Disease Detected"));
        assert_eq!(r.raw_label.as_deref(), Some("Late Blight"));
    }

    #[test]
    fn test_healthy_match_is_exact() {
        let r = map_disease_response(&DiseaseResponse {
            result: "healthy".into(),
            confidence: 50.0,
        });
        assert_eq!(r.status, HealthStatus::Diseased);
    }
}
