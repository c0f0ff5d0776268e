//! Shared data-transfer objects used by both server and client.

use serde::{Deserialize, Serialize};

use agro_common::analysis::Analysis;
use agro_common::crop::CropRecommendation;
use agro_common::disease::{DiseaseImage, DiseaseResult};
use agro_common::error::{AuthError, InferenceError};
use agro_common::session::SessionUser;

// ─── Server function payloads ────────────────────────────────────────────────

/// Outcome of a sign-in or sign-up attempt.  Provider rejections are data,
/// not transport failures, so the form can show them inline.
pub type AuthOutcome = Result<SessionUser, AuthError>;

pub type CropOutcome = Result<Analysis<Vec<CropRecommendation>>, InferenceError>;

pub type DiseaseOutcome = Result<Analysis<DiseaseResult>, InferenceError>;

/// A rendered PDF ready to be saved by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFile {
    pub file_name: String,
    /// `data:application/pdf;base64,…`
    pub data_url: String,
}

// ─── Upload ──────────────────────────────────────────────────────────────────

/// The image chosen on the disease page, kept as a data URL so it can be
/// previewed and posted back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedImage {
    pub file_name: String,
    pub data_url: String,
}

impl SelectedImage {
    /// `None` when the browser-reported MIME type is not an image.
    pub fn from_upload(file_name: &str, mime: &str, bytes: Vec<u8>) -> Option<Self> {
        let image = DiseaseImage::accept(file_name, mime, bytes)?;
        Some(SelectedImage {
            file_name: image.file_name.clone(),
            data_url: image.data_url(),
        })
    }
}

// ─── Panel state ─────────────────────────────────────────────────────────────

/// What an analysis panel currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<T> {
    Empty,
    Loading,
    Ready(Analysis<T>),
    Failed(String),
}

impl<T: Clone> Panel<T> {
    pub fn from_outcome(outcome: Result<Analysis<T>, InferenceError>) -> Self {
        match outcome {
            Ok(analysis) => Panel::Ready(analysis),
            Err(e) => Panel::Failed(e.user_message()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Panel::Loading)
    }

    pub fn ready(&self) -> Option<&Analysis<T>> {
        match self {
            Panel::Ready(a) => Some(a),
            _ => None,
        }
    }

    /// Show `next` unless the input changed since the request was issued.
    /// Returns whether the response was applied.
    pub fn settle(&mut self, issued: InputTicket, current: InputTicket, next: Panel<T>) -> bool {
        if issued != current {
            return false;
        }
        *self = next;
        true
    }
}

/// Identifies the input an analysis request was made for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputTicket(u64);

impl InputTicket {
    /// Call whenever the input is replaced or cleared.
    pub fn bump(&mut self) {
        self.0 += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_image_rejects_non_images() {
        assert!(SelectedImage::from_upload("notes.txt", "text/plain", b"hi".to_vec()).is_none());

        let img = SelectedImage::from_upload("leaf.png", "image/png", vec![1, 2, 3]).unwrap();
        assert_eq!(img.file_name, "leaf.png");
        assert!(img.data_url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_panel_from_outcome() {
        let ok: Panel<u32> = Panel::from_outcome(Ok(Analysis::Inferred(7)));
        assert_eq!(ok.ready().map(|a| *a.value()), Some(7));
        assert!(!ok.is_loading());

        let err: Panel<u32> = Panel::from_outcome(Err(InferenceError::Status {
            endpoint: "/recommend_crops".into(),
            status: 500,
        }));
        assert!(matches!(err, Panel::Failed(_)));
        assert!(err.ready().is_none());
    }

    #[test]
    fn test_response_for_replaced_input_is_dropped() {
        let mut ticket = InputTicket::default();
        let issued = ticket;
        let mut panel: Panel<u32> = Panel::Loading;

        // A new image arrives while the first request is still running.
        ticket.bump();
        panel = Panel::Empty;

        assert!(!panel.settle(issued, ticket, Panel::Ready(Analysis::Inferred(1))));
        assert_eq!(panel, Panel::Empty);

        let issued = ticket;
        panel = Panel::Loading;
        assert!(panel.settle(issued, ticket, Panel::Ready(Analysis::Inferred(2))));
        assert_eq!(panel.ready().map(|a| *a.value()), Some(2));
    }
}
