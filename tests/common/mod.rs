#![allow(dead_code)]

use panotour_engine::{
    Hotspot, HotspotKind, HotspotStyle, MediaKind, PanoramaViewer, Scene, Tour, ViewerConfig,
    ViewportRect, SPHERE_RADIUS,
};
use glam::Vec3;

pub const VIEW_W: f32 = 1000.0;
pub const VIEW_H: f32 = 500.0;

/// A tour with two image scenes. Scene 1 has one hotspot dead ahead of the
/// default camera and a scene link off to the side.
pub fn sample_tour() -> Tour {
    let mut tour = Tour::new();
    tour.push_scene(Scene {
        id: 1,
        name: "Lobby".into(),
        media_kind: MediaKind::Image,
        media_ref: "assets/lobby.png".into(),
        hotspots: vec![
            Hotspot {
                id: 10,
                name: "Front desk".into(),
                position: Vec3::new(0.0, 0.0, -SPHERE_RADIUS),
                kind: HotspotKind::Text { content: "Welcome".into() },
                style: HotspotStyle::default(),
            },
            Hotspot {
                id: 11,
                name: "To the hall".into(),
                position: Vec3::new(0.0, 60.0, -SPHERE_RADIUS).normalize() * SPHERE_RADIUS,
                kind: HotspotKind::SceneLink { target: 2 },
                style: HotspotStyle::default(),
            },
        ],
    });
    tour.push_scene(Scene {
        id: 2,
        name: "Hall".into(),
        media_kind: MediaKind::Image,
        media_ref: "assets/hall.png".into(),
        hotspots: Vec::new(),
    });
    tour
}

pub fn sample_viewer() -> PanoramaViewer {
    let mut viewer = PanoramaViewer::new(sample_tour(), ViewerConfig::default());
    viewer.set_viewport(ViewportRect::from_size(VIEW_W, VIEW_H));
    viewer
}
