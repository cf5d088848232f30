use serde::{Deserialize, Serialize};

/// Ett landemerke fra pose-modellen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,          // 0.0 for ren 2D
    pub confidence: f64, // 0..1 (visibility)
}

impl Landmark {
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self { x, y, z: 0.0, confidence }
    }

    pub fn with_z(mut self, z: f64) -> Self {
        self.z = z;
        self
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0, confidence: 0.0 }
    }
}

/// Indekser i MediaPipe-33-oppsettet som kjernen bruker.
pub mod idx {
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_ELBOW: usize = 13;
    pub const RIGHT_ELBOW: usize = 14;
    pub const LEFT_WRIST: usize = 15;
    pub const RIGHT_WRIST: usize = 16;
    pub const LEFT_HIP: usize = 23;
    pub const RIGHT_HIP: usize = 24;
    pub const LEFT_KNEE: usize = 25;
    pub const RIGHT_KNEE: usize = 26;
    pub const LEFT_ANKLE: usize = 27;
    pub const RIGHT_ANKLE: usize = 28;
}

pub const POSE_LANDMARK_COUNT: usize = 33;

/// Én pose (33 landemerker). Manglende landemerker har confidence 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub landmarks: Vec<Landmark>,
}

impl Pose {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Landemerke på indeks; `None` hvis posen er kortere enn forventet.
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self { landmarks: vec![Landmark::default(); POSE_LANDMARK_COUNT] }
    }
}
