//! PDF report export.
//!
//! A report is first assembled as a [`Report`] (plain text blocks plus an
//! optional image) and then laid out onto A4 pages with `printpdf`.

use chrono::{DateTime, Local};
use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::{
    BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};
use thiserror::Error;
use tracing::{debug, warn};

use agro_common::analysis::Analysis;
use agro_common::crop::{CropInput, CropRecommendation};
use agro_common::disease::{DiseaseImage, DiseaseResult};

pub const BRAND: &str = "AgriScience";

pub const CROP_DISCLAIMER: &str = "These AI-powered recommendations are highly accurate but can make mistakes. Please consult with local agricultural experts for important farming decisions.";

pub const DISEASE_DISCLAIMER: &str = "This AI-powered analysis is highly accurate but can make mistakes. Please consult with plant pathologists or agricultural experts for critical plant health decisions.";

pub const IMAGE_UNAVAILABLE: &str = "Image could not be included in the report";

/// Leads the results of a report built from demo data.
pub const DEMO_NOTICE: &str = "DEMO DATA - these results are placeholders, not an inference";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

/// Which analysis a report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Crop,
    Disease,
}

impl ReportKind {
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Crop => "Crop Recommendation Report",
            ReportKind::Disease => "Plant Disease Detection Report",
        }
    }

    fn file_stem(self) -> &'static str {
        match self {
            ReportKind::Crop => "crop-recommendation-report",
            ReportKind::Disease => "plant-disease-detection-report",
        }
    }

    pub fn disclaimer(self) -> &'static str {
        match self {
            ReportKind::Crop => CROP_DISCLAIMER,
            ReportKind::Disease => DISEASE_DISCLAIMER,
        }
    }
}

/// A titled list of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub lines: Vec<String>,
}

/// The uploaded image, if it could be decoded.
#[derive(Debug, Clone)]
pub enum ReportImage {
    Embedded(DynamicImage),
    Unavailable,
}

/// Document model of one report.
#[derive(Debug, Clone)]
pub struct Report {
    pub kind: ReportKind,
    pub generated_at: DateTime<Local>,
    pub sections: Vec<Section>,
    /// Disease reports only.
    pub image: Option<ReportImage>,
}

impl Report {
    /// Crop report: input parameters then the ranked recommendations.
    pub fn crop(
        input: &CropInput,
        analysis: &Analysis<Vec<CropRecommendation>>,
        generated_at: DateTime<Local>,
    ) -> Report {
        let inputs = input
            .labelled_values()
            .into_iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect();
        let mut ranked = demo_lines(analysis);
        ranked.extend(
            analysis
                .value()
                .iter()
                .enumerate()
                .map(|(i, row)| format!("{}. {} - Confidence: {}%", i + 1, row.name, row.confidence)),
        );

        Report {
            kind: ReportKind::Crop,
            generated_at,
            sections: vec![
                Section {
                    heading: "Input Parameters:".into(),
                    lines: inputs,
                },
                Section {
                    heading: "Recommended Crops:".into(),
                    lines: ranked,
                },
            ],
            image: None,
        }
    }

    /// Disease report: status, confidence and a best-effort copy of the image.
    pub fn disease(
        analysis: &Analysis<DiseaseResult>,
        image: Option<&DiseaseImage>,
        generated_at: DateTime<Local>,
    ) -> Report {
        let result = analysis.value();
        let mut lines = demo_lines(analysis);
        lines.push(format!("Status: {}", result.status.headline()));
        lines.push(format!("Confidence: {}%", result.confidence));
        if let Some(disease) = &result.disease {
            lines.push(format!("Finding: {disease}"));
        }
        if let Some(raw) = result.raw_label.as_ref().filter(|r| result.disease.is_some() && !r.is_empty()) {
            lines.push(format!("Model class: {raw}"));
        }

        Report {
            kind: ReportKind::Disease,
            generated_at,
            sections: vec![Section {
                heading: "Analysis Results:".into(),
                lines,
            }],
            image: Some(image.map(decode_image).unwrap_or(ReportImage::Unavailable)),
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn disclaimer(&self) -> &'static str {
        self.kind.disclaimer()
    }

    /// `"Generated on: 2025-01-05 at 14:03:00"`.
    pub fn timestamp_line(&self) -> String {
        format!(
            "Generated on: {} at {}",
            self.generated_at.format("%Y-%m-%d"),
            self.generated_at.format("%H:%M:%S")
        )
    }

    /// Download name, dated with the generation day.
    pub fn file_name(&self) -> String {
        format!(
            "{}-{}.pdf",
            self.kind.file_stem(),
            self.generated_at.format("%Y-%m-%d")
        )
    }

    /// Every text line in document order.
    pub fn text_lines(&self) -> Vec<String> {
        let mut out = vec![
            BRAND.to_string(),
            self.title().to_string(),
            self.timestamp_line(),
        ];
        for section in &self.sections {
            out.push(section.heading.clone());
            out.extend(section.lines.iter().cloned());
        }
        if let Some(ReportImage::Unavailable) = &self.image {
            out.push(IMAGE_UNAVAILABLE.to_string());
        }
        out.push("Important Note:".to_string());
        out.push(self.disclaimer().to_string());
        out.push(format!("Generated by {BRAND}"));
        out
    }

    /// Lay the report out as a PDF.
    pub fn to_pdf(&self) -> Result<Vec<u8>, ReportError> {
        let (doc, page, layer) =
            PdfDocument::new(self.title(), Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(e.to_string()))?;

        let mut pen = Pen {
            layer: doc.get_page(page).get_layer(layer),
            doc: &doc,
            y: PAGE_H - MARGIN,
        };

        pen.text(BRAND, 12.0, &bold, 10.0);
        pen.gap(5.0);
        pen.text(self.title(), 20.0, &bold, 10.0);
        pen.text(&self.timestamp_line(), 10.0, &regular, 10.0);
        pen.gap(10.0);

        for section in &self.sections {
            pen.text(&section.heading, 14.0, &bold, 10.0);
            for line in &section.lines {
                pen.text(line, 11.0, &regular, 8.0);
            }
            pen.gap(8.0);
        }

        match &self.image {
            Some(ReportImage::Embedded(img)) => pen.image(img),
            Some(ReportImage::Unavailable) => pen.text(IMAGE_UNAVAILABLE, 10.0, &regular, 8.0),
            None => {}
        }

        pen.gap(8.0);
        pen.text("Important Note:", 12.0, &bold, 8.0);
        for line in wrap_text(self.disclaimer(), DISCLAIMER_WRAP) {
            pen.text(&line, 9.0, &regular, 5.0);
        }

        // Footer sits on whichever page the body ended on.
        pen.layer
            .use_text(format!("Generated by {BRAND}"), 8.0, Mm(MARGIN), Mm(17.0), &regular);

        doc.save_to_bytes().map_err(|e| ReportError::Pdf(e.to_string()))
    }
}

fn demo_lines<T>(analysis: &Analysis<T>) -> Vec<String> {
    analysis
        .placeholder_reason()
        .map(|reason| vec![DEMO_NOTICE.to_string(), format!("Service error: {reason}")])
        .unwrap_or_default()
}

fn decode_image(image: &DiseaseImage) -> ReportImage {
    match image_crate::load_from_memory(&image.bytes) {
        Ok(img) => ReportImage::Embedded(img),
        Err(e) => {
            warn!("Cannot embed {} in report: {e}", image.file_name);
            ReportImage::Unavailable
        }
    }
}

// ─── layout ──────────────────────────────────────────────────────────────────

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 20.0;
/// Bottom of the printable area; the footer lives below it.
const BODY_BOTTOM: f32 = 25.0;
const IMAGE_MAX_W: f32 = 80.0;
const IMAGE_MAX_H: f32 = 60.0;
/// Characters per disclaimer line at 9pt over a 170 mm column.
const DISCLAIMER_WRAP: usize = 95;

/// Top-down text cursor that starts a new page when it runs out of room.
struct Pen<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    /// Baseline of the next line, in mm from the bottom edge.
    y: f32,
}

impl Pen<'_> {
    fn ensure(&mut self, height: f32) {
        if self.y - height < BODY_BOTTOM {
            let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_H - MARGIN;
            debug!("Report continued on a new page");
        }
    }

    fn text(&mut self, text: &str, size: f32, font: &IndirectFontRef, advance: f32) {
        self.ensure(advance);
        self.layer.use_text(text, size, Mm(MARGIN), Mm(self.y), font);
        self.y -= advance;
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    /// Place `img` scaled to fit `IMAGE_MAX_W` × `IMAGE_MAX_H`.
    fn image(&mut self, img: &DynamicImage) {
        let (w_px, h_px) = img.dimensions();
        if w_px == 0 || h_px == 0 {
            return;
        }
        // A pixel spans 25.4 / dpi mm; pick the dpi that fits both limits.
        let dpi = (w_px as f32 * 25.4 / IMAGE_MAX_W).max(h_px as f32 * 25.4 / IMAGE_MAX_H);
        let height = h_px as f32 * 25.4 / dpi;

        self.ensure(height + 5.0);
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        Image::from_dynamic_image(&rgb).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN)),
                translate_y: Some(Mm(self.y - height)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
        self.y -= height + 5.0;
    }
}

/// Greedy word wrap at `width` characters.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    use agro_common::crop::{fallback_crops, CropForm};
    use agro_common::disease::HealthStatus;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, 5, 14, 3, 0).single().unwrap()
    }

    fn input() -> CropInput {
        CropForm {
            nitrogen: "90".into(),
            phosphorus: "42".into(),
            potassium: "43".into(),
            temperature: "20.8".into(),
            humidity: "82".into(),
            ph: "6.5".into(),
            rainfall: "202.9".into(),
        }
        .parse()
    }

    fn diseased() -> DiseaseResult {
        DiseaseResult {
            status: HealthStatus::Diseased,
            confidence: 88,
            disease: Some("Plant Disease Detected".into()),
            raw_label: Some("Late Blight".into()),
        }
    }

    fn tiny_png() -> Vec<u8> {
        let img = image_crate::RgbImage::from_pixel(4, 3, image_crate::Rgb([30, 160, 60]));
        let mut out = std::io::Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image_crate::ImageOutputFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_crop_report_contents() {
        let report = Report::crop(&input(), &Analysis::Inferred(fallback_crops()), at());
        let lines = report.text_lines();

        assert_eq!(report.file_name(), "crop-recommendation-report-2025-01-05.pdf");
        assert!(lines.contains(&"Crop Recommendation Report".to_string()));
        assert!(lines.contains(&"Generated on: 2025-01-05 at 14:03:00".to_string()));
        assert!(lines.contains(&"Nitrogen (N): 90 mg/kg".to_string()));
        assert!(lines.contains(&"1. Wheat - Confidence: 92%".to_string()));
        assert!(lines.contains(&CROP_DISCLAIMER.to_string()));
        assert!(!lines.contains(&DEMO_NOTICE.to_string()));
    }

    #[test]
    fn test_placeholder_results_are_marked() {
        let crops = Analysis::Placeholder {
            value: fallback_crops(),
            reason: "connection refused".into(),
        };
        let lines = Report::crop(&input(), &crops, at()).text_lines();
        let notice = lines.iter().position(|l| l == DEMO_NOTICE).unwrap();
        let first_row = lines
            .iter()
            .position(|l| l == "1. Wheat - Confidence: 92%")
            .unwrap();
        assert!(notice < first_row);
        assert!(lines.contains(&"Service error: connection refused".to_string()));

        let disease = Analysis::Placeholder {
            value: diseased(),
            reason: "HTTP 503".into(),
        };
        let lines = Report::disease(&disease, None, at()).text_lines();
        assert!(lines.contains(&DEMO_NOTICE.to_string()));

        let lines = Report::disease(&Analysis::Inferred(diseased()), None, at()).text_lines();
        assert!(!lines.contains(&DEMO_NOTICE.to_string()));
    }

    #[test]
    fn test_disease_report_embeds_image() {
        let image = DiseaseImage::accept("leaf.png", "image/png", tiny_png()).unwrap();
        let report = Report::disease(&Analysis::Inferred(diseased()), Some(&image), at());

        assert_eq!(
            report.file_name(),
            "plant-disease-detection-report-2025-01-05.pdf"
        );
        assert!(matches!(report.image, Some(ReportImage::Embedded(_))));
        let lines = report.text_lines();
        assert!(lines.contains(&"Status: Disease Detected".to_string()));
        assert!(lines.contains(&"Confidence: 88%".to_string()));
        assert!(lines.contains(&DISEASE_DISCLAIMER.to_string()));
        assert!(!lines.contains(&IMAGE_UNAVAILABLE.to_string()));
    }

    #[test]
    fn test_undecodable_image_degrades_to_text() {
        let image = DiseaseImage::accept("leaf.jpg", "image/jpeg", vec![1, 2, 3]).unwrap();
        let report = Report::disease(&Analysis::Inferred(diseased()), Some(&image), at());

        assert!(matches!(report.image, Some(ReportImage::Unavailable)));
        assert!(report.text_lines().contains(&IMAGE_UNAVAILABLE.to_string()));
        assert!(report.to_pdf().is_ok());
    }

    #[test]
    fn test_pdf_bytes() {
        let rows: Vec<CropRecommendation> = (0..30)
            .map(|i| CropRecommendation::new("rice", i as f64))
            .collect();
        let pdf = Report::crop(&input(), &Analysis::Inferred(rows), at()).to_pdf().unwrap();
        assert!(pdf.starts_with(b"%PDF"));

        let image = DiseaseImage::accept("leaf.png", "image/png", tiny_png()).unwrap();
        let pdf = Report::disease(&Analysis::Inferred(diseased()), Some(&image), at()).to_pdf().unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text(CROP_DISCLAIMER, DISCLAIMER_WRAP);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= DISCLAIMER_WRAP));
        assert_eq!(lines.join(" "), CROP_DISCLAIMER);
    }
}
