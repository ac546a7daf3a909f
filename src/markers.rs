use crate::camera::PanoCamera;
use crate::config::ViewerConfig;
use crate::tour::{Hotspot, HotspotId, Scene};
use glam::Vec2;
use winit::dpi::PhysicalSize;

/// One hotspot marker laid out for the current frame. The host rasterizes
/// these; the engine only decides where and how they appear.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerInstance {
    pub hotspot: HotspotId,
    pub anchor: Vec2,
    pub color: [f32; 4],
    pub size: f32,
    /// Combined emphasis + pulse scale; 1.0 for idle markers.
    pub scale: f32,
    pub emphasized: bool,
}

/// Entries of the edit-mode quick-action menu anchored to a hotspot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Edit,
    Move,
    Delete,
}

/// Cross-marker UI choreography state: which hotspot's content panel is
/// expanded (at most one) and which hotspot's quick menu is open.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UiState {
    pub expanded: Option<HotspotId>,
    pub menu: Option<HotspotId>,
}

impl UiState {
    /// Toggles the expanded content panel for `hotspot`, collapsing any other
    /// open panel first.
    pub fn toggle_expanded(&mut self, hotspot: HotspotId) {
        if self.expanded == Some(hotspot) {
            self.expanded = None;
        } else {
            self.expanded = Some(hotspot);
        }
    }

    pub fn close_expanded(&mut self) {
        self.expanded = None;
    }

    pub fn open_menu(&mut self, hotspot: HotspotId) {
        self.menu = Some(hotspot);
    }

    pub fn close_menu(&mut self) {
        self.menu = None;
    }

    pub fn clear(&mut self) {
        self.expanded = None;
        self.menu = None;
    }
}

/// Lays out all markers of a scene. Rendering is a pure function of hotspot
/// state plus whether each hotspot is the one currently being dragged:
/// the dragged marker scales up and pulses.
pub fn layout(
    scene: &Scene,
    camera: &PanoCamera,
    viewport: PhysicalSize<u32>,
    dragging: Option<HotspotId>,
    elapsed: f32,
    config: &ViewerConfig,
) -> Vec<MarkerInstance> {
    scene
        .hotspots
        .iter()
        .filter_map(|hotspot| layout_one(hotspot, camera, viewport, dragging, elapsed, config))
        .collect()
}

fn layout_one(
    hotspot: &Hotspot,
    camera: &PanoCamera,
    viewport: PhysicalSize<u32>,
    dragging: Option<HotspotId>,
    elapsed: f32,
    config: &ViewerConfig,
) -> Option<MarkerInstance> {
    let anchor = camera.project_point(hotspot.position, viewport)?;
    let emphasized = dragging == Some(hotspot.id);
    let scale = if emphasized {
        let pulse = (elapsed * config.marker_pulse_hz * std::f32::consts::TAU).sin() * 0.08;
        config.marker_emphasis_scale + pulse
    } else {
        1.0
    };
    let color = hotspot.style.color;
    Some(MarkerInstance {
        hotspot: hotspot.id,
        anchor,
        color: [color.r, color.g, color.b, color.a],
        size: hotspot.style.size,
        scale,
        emphasized,
    })
}

/// Finds the top-most marker under a pixel position. Later hotspots in scene
/// order win, matching their draw order.
pub fn hit_test(markers: &[MarkerInstance], position: Vec2) -> Option<HotspotId> {
    markers
        .iter()
        .rev()
        .find(|marker| position.distance(marker.anchor) <= marker.size * marker.scale * 0.5)
        .map(|marker| marker.hotspot)
}
