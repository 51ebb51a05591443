//! Vision inference stub
//!
//! The model itself is not wired in; `infer` always returns no detections.

use roverlink_shared::{protocol, Detection};
use std::collections::BTreeMap;

const STOP_CLASSES: [&str; 2] = ["person", "stop_sign"];

/// Flattened detections and the derived safety signal
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisionSummary {
    pub must_stop: bool,
    pub detections: Vec<Detection>,
}

#[derive(Debug, Clone, Default)]
pub struct VisionEngine;

impl VisionEngine {
    pub fn infer(&self, _camera_id: &str) -> Vec<Detection> {
        Vec::new()
    }

    pub fn summarize(&self, by_camera: BTreeMap<String, Vec<Detection>>) -> VisionSummary {
        let detections: Vec<Detection> = by_camera.into_values().flatten().collect();
        let must_stop = detections.iter().any(|d| {
            STOP_CLASSES.contains(&d.label.as_str())
                && d.confidence > protocol::VISION_STOP_CONFIDENCE
        });

        VisionSummary {
            must_stop,
            detections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(label: &str, confidence: f32) -> Detection {
        Detection {
            label: label.into(),
            confidence,
            camera_id: "front".into(),
        }
    }

    #[test]
    fn test_confident_person_must_stop() {
        let mut by_camera = BTreeMap::new();
        by_camera.insert("front".to_string(), vec![detection("person", 0.9)]);
        by_camera.insert("rear".to_string(), vec![detection("cat", 0.99)]);

        let summary = VisionEngine.summarize(by_camera);
        assert!(summary.must_stop);
        assert_eq!(summary.detections.len(), 2);
    }

    #[test]
    fn test_low_confidence_is_ignored() {
        let mut by_camera = BTreeMap::new();
        by_camera.insert("front".to_string(), vec![detection("stop_sign", 0.45)]);
        assert!(!VisionEngine.summarize(by_camera).must_stop);
    }

    #[test]
    fn test_stub_infers_nothing() {
        assert!(VisionEngine.infer("front").is_empty());
    }
}
