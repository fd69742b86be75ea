//! Image-classification collaborator interface.
//!
//! The classifier is an external, stateless model wrapper: given raw image
//! bytes it returns a disease label and a confidence percentage. The
//! orchestration core never calls it; it is exposed here so transports that
//! accept image uploads share one contract. Implementations live outside this
//! workspace (model serving); tests use fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Disease classes the pretrained oral-condition model distinguishes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DiseaseLabel {
    Caries,
    Gingivitis,
}

impl DiseaseLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiseaseLabel::Caries => "Caries",
            DiseaseLabel::Gingivitis => "Gingivitis",
        }
    }
}

/// Model output: predicted class plus confidence in percent (0–100).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub label: DiseaseLabel,
    pub confidence: f32,
}

/// Errors a classifier implementation may report.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("image could not be read: {0}")]
    InvalidImage(String),
    #[error("model error: {0}")]
    Model(String),
}

/// Stateless prediction capability over raw image bytes.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn predict(&self, image: &[u8]) -> Result<Prediction, ClassifierError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fake that labels any non-empty image as Caries at fixed confidence.
    struct FixedClassifier;

    #[async_trait]
    impl Classifier for FixedClassifier {
        async fn predict(&self, image: &[u8]) -> Result<Prediction, ClassifierError> {
            if image.is_empty() {
                return Err(ClassifierError::InvalidImage("empty image".to_string()));
            }
            Ok(Prediction {
                label: DiseaseLabel::Caries,
                confidence: 97.25,
            })
        }
    }

    /// **Test: a classifier returns label and confidence for valid input.**
    #[tokio::test]
    async fn predict_returns_label_and_confidence() {
        let classifier = FixedClassifier;
        let prediction = classifier.predict(&[1, 2, 3]).await.unwrap();
        assert_eq!(prediction.label, DiseaseLabel::Caries);
        assert!((prediction.confidence - 97.25).abs() < f32::EPSILON);
    }

    /// **Test: unreadable input is reported as InvalidImage, not a panic.**
    #[tokio::test]
    async fn predict_rejects_empty_image() {
        let classifier = FixedClassifier;
        let err = classifier.predict(&[]).await.unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidImage(_)));
    }

    /// **Test: labels render as the model's class names.**
    #[test]
    fn label_names() {
        assert_eq!(DiseaseLabel::Caries.as_str(), "Caries");
        assert_eq!(DiseaseLabel::Gingivitis.as_str(), "Gingivitis");
    }
}
