use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::picking::snap_to_sphere;
use crate::sphere::SPHERE_RADIUS;

pub type SceneId = u32;
pub type HotspotId = u32;

/// Which kind of panoramic media a scene is backed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

/// A single 360° scene: one media surface plus the hotspots anchored to it.
///
/// Scenes are created, reordered and deleted by the host editor; the engine
/// only consumes the active one.
#[derive(Debug, Clone)]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
    pub media_kind: MediaKind,
    pub media_ref: String,
    pub hotspots: Vec<Hotspot>,
}

impl Scene {
    pub fn hotspot(&self, id: HotspotId) -> Option<&Hotspot> {
        self.hotspots.iter().find(|h| h.id == id)
    }

    pub fn hotspot_mut(&mut self, id: HotspotId) -> Option<&mut Hotspot> {
        self.hotspots.iter_mut().find(|h| h.id == id)
    }
}

/// Kind-specific payload for a hotspot. Closed set: adding a kind is a
/// compile error everywhere it is matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HotspotKind {
    Text { content: String },
    Image { media_ref: String },
    Video { media_ref: String },
    Audio { media_ref: String },
    TextToSpeech { content: String, voice: String, rate: f32 },
    VoiceRecording { media_ref: String },
    SceneLink { target: SceneId },
}

impl HotspotKind {
    pub fn label(&self) -> &'static str {
        match self {
            HotspotKind::Text { .. } => "Text",
            HotspotKind::Image { .. } => "Image",
            HotspotKind::Video { .. } => "Video",
            HotspotKind::Audio { .. } => "Audio",
            HotspotKind::TextToSpeech { .. } => "Text to speech",
            HotspotKind::VoiceRecording { .. } => "Voice recording",
            HotspotKind::SceneLink { .. } => "Scene link",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HotspotStyle {
    pub color: ColorData,
    pub size: f32,
}

impl Default for HotspotStyle {
    fn default() -> Self {
        Self { color: ColorData { r: 1.0, g: 1.0, b: 1.0, a: 1.0 }, size: 28.0 }
    }
}

/// An interactive marker anchored to a point on the panorama sphere.
/// Invariant: `|position| == SPHERE_RADIUS` within floating-point tolerance;
/// every position written by the engine goes through `snap_to_sphere`.
#[derive(Debug, Clone)]
pub struct Hotspot {
    pub id: HotspotId,
    pub name: String,
    pub position: Vec3,
    pub kind: HotspotKind,
    pub style: HotspotStyle,
}

/// Partial update applied to an existing hotspot. `None` fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct HotspotPatch {
    pub name: Option<String>,
    pub position: Option<Vec3>,
    pub kind: Option<HotspotKind>,
    pub color: Option<ColorData>,
    pub size: Option<f32>,
}

/// The full tour as the engine sees it: ordered scenes and the id counter
/// for hotspots created through the editor.
#[derive(Debug, Clone, Default)]
pub struct Tour {
    pub scenes: Vec<Scene>,
    next_hotspot_id: HotspotId,
}

impl Tour {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.id == id)
    }

    pub fn push_scene(&mut self, scene: Scene) {
        // Keep the hotspot id counter ahead of anything caller-assigned.
        for hotspot in &scene.hotspots {
            if hotspot.id >= self.next_hotspot_id {
                self.next_hotspot_id = hotspot.id + 1;
            }
        }
        self.scenes.push(scene);
    }

    /// Creates a hotspot at `position` with a generated id, `Text` kind and
    /// default style, appended to the scene. Returns `None` when the scene
    /// id is unknown.
    pub fn add_hotspot(&mut self, scene_id: SceneId, position: Vec3) -> Option<HotspotId> {
        let position = snap_to_sphere(position, SPHERE_RADIUS)?;
        let id = self.next_hotspot_id;
        let scene = self.scene_mut(scene_id)?;
        let name = format!("Hotspot {}", scene.hotspots.len() + 1);
        scene.hotspots.push(Hotspot {
            id,
            name,
            position,
            kind: HotspotKind::Text { content: String::new() },
            style: HotspotStyle::default(),
        });
        self.next_hotspot_id += 1;
        Some(id)
    }

    /// Merges `patch` into the hotspot. Returns `false` when scene or
    /// hotspot is unknown.
    pub fn update_hotspot(&mut self, scene_id: SceneId, id: HotspotId, patch: HotspotPatch) -> bool {
        let Some(scene) = self.scene_mut(scene_id) else {
            return false;
        };
        let Some(hotspot) = scene.hotspot_mut(id) else {
            return false;
        };
        if let Some(name) = patch.name {
            hotspot.name = name;
        }
        if let Some(position) = patch.position {
            if let Some(snapped) = snap_to_sphere(position, SPHERE_RADIUS) {
                hotspot.position = snapped;
            }
        }
        if let Some(kind) = patch.kind {
            hotspot.kind = kind;
        }
        if let Some(color) = patch.color {
            hotspot.style.color = color;
        }
        if let Some(size) = patch.size {
            hotspot.style.size = size;
        }
        true
    }

    pub fn delete_hotspot(&mut self, scene_id: SceneId, id: HotspotId) -> bool {
        let Some(scene) = self.scene_mut(scene_id) else {
            return false;
        };
        let before = scene.hotspots.len();
        scene.hotspots.retain(|h| h.id != id);
        scene.hotspots.len() != before
    }

    /// Moves a hotspot to a new on-sphere position, re-snapping to the
    /// sphere surface. Used by the drag coordinator on every sample.
    pub fn set_hotspot_position(&mut self, scene_id: SceneId, id: HotspotId, position: Vec3) -> bool {
        let Some(snapped) = snap_to_sphere(position, SPHERE_RADIUS) else {
            return false;
        };
        self.scene_mut(scene_id)
            .and_then(|scene| scene.hotspot_mut(id))
            .map(|hotspot| hotspot.position = snapped)
            .is_some()
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("Reading tour file {}", path.display()))?;
        let data = serde_json::from_slice::<TourData>(&bytes)
            .with_context(|| format!("Parsing tour file {}", path.display()))?;
        Ok(data.into())
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating tour directory {}", parent.display()))?;
        }
        let data = TourData::from(self);
        let json = serde_json::to_string_pretty(&data)?;
        fs::write(path, json.as_bytes()).with_context(|| format!("Writing tour file {}", path.display()))?;
        Ok(())
    }
}

// --- serialized representation ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourData {
    #[serde(default)]
    pub scenes: Vec<SceneData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneData {
    pub id: SceneId,
    pub name: String,
    pub media_kind: MediaKind,
    pub media_ref: String,
    #[serde(default)]
    pub hotspots: Vec<HotspotData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotData {
    pub id: HotspotId,
    pub name: String,
    pub position: Vec3Data,
    #[serde(flatten)]
    pub kind: HotspotKind,
    #[serde(default)]
    pub style: HotspotStyleData,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vec3Data {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorData {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HotspotStyleData {
    pub color: ColorData,
    pub size: f32,
}

impl Default for HotspotStyleData {
    fn default() -> Self {
        let style = HotspotStyle::default();
        Self { color: style.color, size: style.size }
    }
}

impl From<glam::Vec3> for Vec3Data {
    fn from(value: glam::Vec3) -> Self {
        Self { x: value.x, y: value.y, z: value.z }
    }
}

impl From<Vec3Data> for glam::Vec3 {
    fn from(value: Vec3Data) -> Self {
        glam::Vec3::new(value.x, value.y, value.z)
    }
}

impl From<TourData> for Tour {
    fn from(data: TourData) -> Self {
        let mut tour = Tour::new();
        for scene in data.scenes {
            tour.push_scene(Scene {
                id: scene.id,
                name: scene.name,
                media_kind: scene.media_kind,
                media_ref: scene.media_ref,
                hotspots: scene
                    .hotspots
                    .into_iter()
                    .map(|h| Hotspot {
                        id: h.id,
                        name: h.name,
                        position: h.position.into(),
                        kind: h.kind,
                        style: HotspotStyle { color: h.style.color, size: h.style.size },
                    })
                    .collect(),
            });
        }
        tour
    }
}

impl From<&Tour> for TourData {
    fn from(tour: &Tour) -> Self {
        Self {
            scenes: tour
                .scenes
                .iter()
                .map(|scene| SceneData {
                    id: scene.id,
                    name: scene.name.clone(),
                    media_kind: scene.media_kind,
                    media_ref: scene.media_ref.clone(),
                    hotspots: scene
                        .hotspots
                        .iter()
                        .map(|h| HotspotData {
                            id: h.id,
                            name: h.name.clone(),
                            position: h.position.into(),
                            kind: h.kind.clone(),
                            style: HotspotStyleData { color: h.style.color, size: h.style.size },
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
