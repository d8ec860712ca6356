//! Mock disease detector.
//!
//! ```text
//!  EMPTY ──select──▶ IMAGE SELECTED ──analyze──▶ ANALYZING ──(delay)──▶ COMPLETE
//!    ▲                     ▲  │                                            │
//!    └──────clear──────────┼──┘◀──────────────────clear───────────────────┘
//!                          └────────────────select (new image)─────────────┘
//! ```
//!
//! Every analysis returns the same diagnosis; the runtime owns the delay.

use log::{info, warn};
use serde::Serialize;

use crate::error::DetectionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetectionState {
    Empty,
    ImageSelected,
    Analyzing,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedImage {
    pub file_name: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Diagnosis {
    pub disease: &'static str,
    /// Percent.
    pub confidence: u8,
    pub severity: &'static str,
    pub description: &'static str,
    pub treatment: &'static [&'static str],
    pub prevention: &'static [&'static str],
}

impl Diagnosis {
    /// Confidence high enough for the primary badge.
    pub fn is_confident(&self) -> bool {
        self.confidence > 80
    }
}

pub const POWDERY_MILDEW: Diagnosis = Diagnosis {
    disease: "Powdery Mildew",
    confidence: 87,
    severity: "Moderate",
    description: "A fungal disease that appears as white, powdery spots on leaves and stems.",
    treatment: &[
        "Remove affected leaves immediately",
        "Apply fungicidal spray every 7-14 days",
        "Improve air circulation around the plant",
        "Reduce humidity levels",
    ],
    prevention: &[
        "Avoid overhead watering",
        "Ensure proper spacing between plants",
        "Regular inspection and early detection",
    ],
};

#[derive(Default)]
pub struct DiseaseDetector {
    image: Option<SelectedImage>,
    analyzing: bool,
    result: Option<Diagnosis>,
}

impl DiseaseDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DetectionState {
        match (&self.image, self.analyzing, &self.result) {
            (None, _, _) => DetectionState::Empty,
            (Some(_), true, _) => DetectionState::Analyzing,
            (Some(_), false, Some(_)) => DetectionState::Complete,
            (Some(_), false, None) => DetectionState::ImageSelected,
        }
    }

    /// Accept an upload.  Only `image/*` MIME types; any previous result
    /// is discarded.
    pub fn select(&mut self, file_name: &str, mime_type: &str) -> Result<(), DetectionError> {
        if self.analyzing {
            return Err(DetectionError::AlreadyAnalyzing);
        }
        if !mime_type.starts_with("image/") {
            warn!("detection: rejected {} ({})", file_name, mime_type);
            return Err(DetectionError::NotAnImage);
        }
        self.image = Some(SelectedImage {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
        });
        self.result = None;
        info!("detection: selected {}", file_name);
        Ok(())
    }

    /// Begin analysis.  The caller completes it once the delay elapses.
    pub fn analyze(&mut self) -> Result<(), DetectionError> {
        if self.analyzing {
            return Err(DetectionError::AlreadyAnalyzing);
        }
        if self.image.is_none() {
            return Err(DetectionError::NoImageSelected);
        }
        self.analyzing = true;
        self.result = None;
        info!("detection: analyzing");
        Ok(())
    }

    /// Finish a running analysis.  `None` if nothing was running (e.g. the
    /// image was cleared meanwhile).
    pub fn complete(&mut self) -> Option<&Diagnosis> {
        if !self.analyzing {
            return None;
        }
        self.analyzing = false;
        self.result = Some(POWDERY_MILDEW);
        info!(
            "detection: {} ({}% confidence)",
            POWDERY_MILDEW.disease, POWDERY_MILDEW.confidence
        );
        self.result.as_ref()
    }

    pub fn clear(&mut self) {
        self.image = None;
        self.analyzing = false;
        self.result = None;
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&Diagnosis> {
        self.result.as_ref()
    }
}
