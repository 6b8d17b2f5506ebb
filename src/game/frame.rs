use cgmath::Vector2;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

use crate::game::blend::mirror;
use crate::game::player::Direction;

// Joints that some authored poses leave out; backfilled at load so every
// frame carries the complete joint set.
pub const DEFAULT_R_ELBOW: [f32; 2] = [0.85, 0.8];
pub const DEFAULT_R_HAND: [f32; 2] = [0.9, 1.1];

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("pose {0:?} is not in the frame library")]
    MissingFrame(String),
    #[error("failed to read frame library: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed frame library: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A named pose: joint name -> normalized 2d position, x in [0,1], y in [0,2]
/// (y grows downward, matching the authoring tool).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    joints: BTreeMap<String, Vector2<f32>>,
}

impl Frame {
    pub fn get(&self, joint: &str) -> Option<Vector2<f32>> {
        self.joints.get(joint).copied()
    }

    pub fn set(&mut self, joint: impl Into<String>, position: Vector2<f32>) {
        self.joints.insert(joint.into(), position);
    }

    pub fn contains(&self, joint: &str) -> bool {
        self.joints.contains_key(joint)
    }

    pub fn joints(&self) -> impl Iterator<Item = (&str, Vector2<f32>)> {
        self.joints.iter().map(|(name, p)| (name.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

// Broadcast as {"joint": [x, y], ..}, the same shape the library is
// authored in.
impl Serialize for Frame {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.joints.len()))?;
        for (name, p) in &self.joints {
            map.serialize_entry(name, &[p.x, p.y])?;
        }
        map.end()
    }
}

/// Immutable pose lookup, built once at startup and shared read-only by
/// every player. `<NAME>_FLIP` entries override mirroring for backward
/// facing lookups.
#[derive(Debug)]
pub struct FrameLibrary {
    frames: BTreeMap<String, Frame>,
}

impl FrameLibrary {
    /// Loads the library from a JSON file of pose name -> joint -> [x, y].
    pub fn load(path: &Path) -> Result<Self, FrameError> {
        let file = File::open(path)?;
        let raw: BTreeMap<String, BTreeMap<String, [f32; 2]>> =
            serde_json::from_reader(BufReader::new(file))?;

        let mut frames = BTreeMap::new();
        for (name, joints) in raw {
            let mut frame = Frame::default();
            for (joint, [x, y]) in joints {
                frame.set(joint, Vector2::new(x, y));
            }
            frames.insert(name, frame);
        }
        Self::from_frames(frames)
    }

    /// Builds the library from already-parsed frames, backfilling missing
    /// joints. The IDLE pose must exist; it is the fallback for every
    /// failed lookup.
    pub fn from_frames(mut frames: BTreeMap<String, Frame>) -> Result<Self, FrameError> {
        if !frames.contains_key("IDLE") {
            return Err(FrameError::MissingFrame(String::from("IDLE")));
        }
        for frame in frames.values_mut() {
            if !frame.contains("r_elbow") {
                frame.set("r_elbow", Vector2::from(DEFAULT_R_ELBOW));
            }
            if !frame.contains("r_hand") {
                frame.set("r_hand", Vector2::from(DEFAULT_R_HAND));
            }
        }
        Ok(Self { frames })
    }

    /// Looks up a pose for the given travel direction. Backward lookups
    /// prefer an authored `<NAME>_FLIP` variant, else mirror the forward
    /// frame across the horizontal midline.
    pub fn get(&self, name: &str, direction: Direction) -> Result<Frame, FrameError> {
        if direction == Direction::Backward {
            let flipped = format!("{name}_FLIP");
            if let Some(frame) = self.frames.get(&flipped) {
                return Ok(frame.clone());
            }
            return self
                .frames
                .get(name)
                .map(mirror)
                .ok_or_else(|| FrameError::MissingFrame(name.to_string()));
        }
        self.frames
            .get(name)
            .cloned()
            .ok_or_else(|| FrameError::MissingFrame(name.to_string()))
    }

    /// The resting pose for a direction. Total: IDLE is validated at load.
    pub fn idle(&self, direction: Direction, crouching: bool) -> Frame {
        let name = if crouching { "CROUCH_IDLE" } else { "IDLE" };
        match self.get(name, direction) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("{e}, substituting IDLE");
                self.get("IDLE", direction).unwrap_or_default()
            }
        }
    }
}
