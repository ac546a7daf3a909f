use glam::Vec3;
use panotour_engine::{
    Hotspot, HotspotKind, HotspotPatch, HotspotStyle, MediaKind, Scene, Tour, SPHERE_RADIUS,
};

fn on_sphere(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z).normalize() * SPHERE_RADIUS
}

fn full_tour() -> Tour {
    let kinds = [
        HotspotKind::Text { content: "Check-in is to your left".into() },
        HotspotKind::Image { media_ref: "assets/floorplan.png".into() },
        HotspotKind::Video { media_ref: "assets/intro.mp4".into() },
        HotspotKind::Audio { media_ref: "assets/ambience.ogg".into() },
        HotspotKind::TextToSpeech {
            content: "Welcome to the lobby".into(),
            voice: "en-GB".into(),
            rate: 0.9,
        },
        HotspotKind::VoiceRecording { media_ref: "assets/guide-note.ogg".into() },
        HotspotKind::SceneLink { target: 2 },
    ];
    let hotspots = kinds
        .into_iter()
        .enumerate()
        .map(|(i, kind)| Hotspot {
            id: i as u32 + 1,
            name: format!("Stop {}", i + 1),
            position: on_sphere(1.0 + i as f32, 0.5, -2.0),
            kind,
            style: HotspotStyle::default(),
        })
        .collect();

    let mut tour = Tour::new();
    tour.push_scene(Scene {
        id: 1,
        name: "Lobby".into(),
        media_kind: MediaKind::Image,
        media_ref: "assets/lobby.png".into(),
        hotspots,
    });
    tour.push_scene(Scene {
        id: 2,
        name: "Hall".into(),
        media_kind: MediaKind::Video,
        media_ref: "assets/hall.mp4".into(),
        hotspots: Vec::new(),
    });
    tour
}

#[test]
fn every_hotspot_kind_survives_a_save_load_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tour.json");

    let original = full_tour();
    original.save_to_path(&path).unwrap();
    let loaded = Tour::load_from_path(&path).unwrap();

    assert_eq!(loaded.scenes.len(), 2);
    let scene = loaded.scene(1).unwrap();
    assert_eq!(scene.hotspots.len(), 7);
    for (a, b) in scene.hotspots.iter().zip(&original.scene(1).unwrap().hotspots) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.name, b.name);
        assert_eq!(a.kind, b.kind);
        assert!((a.position - b.position).length() < 1e-4);
    }
    assert_eq!(loaded.scene(2).unwrap().media_kind, MediaKind::Video);
}

#[test]
fn kind_tag_appears_in_the_serialized_form() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tour.json");
    full_tour().save_to_path(&path).unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    for tag in ["text", "image", "video", "audio", "text_to_speech", "voice_recording", "scene_link"]
    {
        assert!(json.contains(&format!("\"kind\": \"{tag}\"")), "missing kind tag {tag}");
    }
}

#[test]
fn ids_generated_after_a_load_do_not_collide() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tour.json");
    full_tour().save_to_path(&path).unwrap();

    let mut loaded = Tour::load_from_path(&path).unwrap();
    let new_id = loaded.add_hotspot(2, Vec3::NEG_Z).unwrap();
    let scene_one_ids: Vec<u32> =
        loaded.scene(1).unwrap().hotspots.iter().map(|h| h.id).collect();
    assert!(!scene_one_ids.contains(&new_id));
}

#[test]
fn patch_on_a_loaded_tour_rescales_positions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tour.json");
    full_tour().save_to_path(&path).unwrap();

    let mut loaded = Tour::load_from_path(&path).unwrap();
    let patch = HotspotPatch {
        position: Some(Vec3::new(10.0, 10.0, 10.0)),
        ..HotspotPatch::default()
    };
    assert!(loaded.update_hotspot(1, 3, patch));
    let position = loaded.scene(1).unwrap().hotspot(3).unwrap().position;
    assert!((position.length() - SPHERE_RADIUS).abs() < 1e-3);
}

#[test]
fn missing_tour_file_is_a_readable_error() {
    let err = Tour::load_from_path("no/such/tour.json").unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("no/such/tour.json"), "error should name the path: {chain}");
}
