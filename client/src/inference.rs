//! HTTP client for the crop / disease inference API.
//!
//! One request per call: no retries, no de-duplication.  Failures come back
//! as [`InferenceError`]; [`Analyzer`] decides whether demo mode papers over
//! them with a placeholder.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use agro_common::analysis::Analysis;
use agro_common::config::Config;
use agro_common::crop::{map_crop_response, CropInput, CropRecommendation};
use agro_common::disease::{map_disease_response, DiseaseImage, DiseaseResult};
use agro_common::error::InferenceError;
use agro_common::protocol::{
    CropRequest, CropResponse, DiseaseResponse, HealthResponse, DETECT_DISEASE_PATH,
    DISEASE_FILE_FIELD, HEALTH_PATH, RECOMMEND_CROPS_PATH,
};

use crate::fallback;

/// Thin wrapper over `reqwest::Client` bound to one API base URL.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    base_url: String,
}

impl InferenceClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Cannot create HTTP client")?;
        Ok(Self::with_http(http, &config.api_base_url))
    }

    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        InferenceClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `POST /recommend_crops` with the seven parameters as given.
    pub async fn recommend_crops(
        &self,
        input: &CropInput,
    ) -> Result<Vec<CropRecommendation>, InferenceError> {
        let url = format!("{}{RECOMMEND_CROPS_PATH}", self.base_url);
        let body = CropRequest::from(input);
        debug!("POST {url} {body:?}");

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let resp = check_status(resp, RECOMMEND_CROPS_PATH)?;

        let parsed: CropResponse = resp.json().await.map_err(decode)?;
        let rows = map_crop_response(&parsed);
        info!("Crop recommendation returned {} row(s)", rows.len());
        Ok(rows)
    }

    /// `POST /detect_disease` with the image as multipart field `file`.
    pub async fn detect_disease(
        &self,
        image: &DiseaseImage,
    ) -> Result<DiseaseResult, InferenceError> {
        let url = format!("{}{DETECT_DISEASE_PATH}", self.base_url);
        let part = reqwest::multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime)
            .map_err(|e| InferenceError::Request(format!("bad MIME type {}: {e}", image.mime)))?;
        let form = reqwest::multipart::Form::new().part(DISEASE_FILE_FIELD, part);
        debug!("POST {url} ({}, {} bytes)", image.file_name, image.bytes.len());

        let resp = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let resp = check_status(resp, DETECT_DISEASE_PATH)?;

        let parsed: DiseaseResponse = resp.json().await.map_err(decode)?;
        info!(
            "Disease detection: {} ({:.1}%)",
            parsed.result, parsed.confidence
        );
        Ok(map_disease_response(&parsed))
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<HealthResponse, InferenceError> {
        let url = format!("{}{HEALTH_PATH}", self.base_url);
        let resp = self.http.get(&url).send().await.map_err(transport)?;
        let resp = check_status(resp, HEALTH_PATH)?;
        resp.json().await.map_err(decode)
    }
}

// ── error mapping ────────────────────────────────────────────────────────

fn transport(e: reqwest::Error) -> InferenceError {
    InferenceError::Transport(e.to_string())
}

fn decode(e: reqwest::Error) -> InferenceError {
    InferenceError::Decode(e.to_string())
}

fn check_status(
    resp: reqwest::Response,
    endpoint: &str,
) -> Result<reqwest::Response, InferenceError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(InferenceError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
        })
    }
}

// ── analyzer ─────────────────────────────────────────────────────────────

/// Runs analyses and applies the demo-mode policy.
///
/// With demo mode off every failure is returned to the caller.  With it on,
/// failures are logged and replaced by [`Analysis::Placeholder`].
#[derive(Debug, Clone)]
pub struct Analyzer {
    client: InferenceClient,
    demo_mode: bool,
}

impl Analyzer {
    pub fn new(client: InferenceClient, demo_mode: bool) -> Self {
        Analyzer { client, demo_mode }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(InferenceClient::new(config)?, config.demo_mode))
    }

    pub fn client(&self) -> &InferenceClient {
        &self.client
    }

    pub async fn crops(
        &self,
        input: &CropInput,
    ) -> Result<Analysis<Vec<CropRecommendation>>, InferenceError> {
        match self.client.recommend_crops(input).await {
            Ok(rows) => Ok(Analysis::Inferred(rows)),
            Err(e) if self.demo_mode => {
                warn!("Crop recommendation failed, using demo data: {e}");
                Ok(Analysis::Placeholder {
                    value: agro_common::crop::fallback_crops(),
                    reason: e.to_string(),
                })
            }
            Err(e) => {
                warn!("Crop recommendation failed: {e}");
                Err(e)
            }
        }
    }

    pub async fn disease(
        &self,
        image: &DiseaseImage,
    ) -> Result<Analysis<DiseaseResult>, InferenceError> {
        match self.client.detect_disease(image).await {
            Ok(result) => Ok(Analysis::Inferred(result)),
            Err(e) if self.demo_mode => {
                warn!("Disease detection failed, using demo data: {e}");
                let value = fallback::placeholder_disease(&mut rand::thread_rng());
                Ok(Analysis::Placeholder {
                    value,
                    reason: e.to_string(),
                })
            }
            Err(e) => {
                warn!("Disease detection failed: {e}");
                Err(e)
            }
        }
    }
}

// ─── tests ───────────────────────────────────────────────────────────────
