//! Camera stream listing

use std::collections::BTreeMap;

const CAMERA_NAMES: [&str; 4] = ["front", "rear", "left", "right"];

/// The rover's four USB cameras
#[derive(Debug, Clone)]
pub struct CameraHub {
    streams: BTreeMap<String, String>,
}

impl Default for CameraHub {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraHub {
    pub fn new() -> Self {
        let streams = CAMERA_NAMES
            .iter()
            .map(|name| (name.to_string(), format!("/streams/{}", name)))
            .collect();
        Self { streams }
    }

    pub fn camera_ids(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }

    /// Camera name -> stream URL
    pub fn list_streams(&self) -> BTreeMap<String, String> {
        self.streams.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_streams() {
        let hub = CameraHub::new();
        let streams = hub.list_streams();
        assert_eq!(streams.len(), 4);
        assert_eq!(streams["front"], "/streams/front");
        assert_eq!(hub.camera_ids().count(), 4);
    }
}
