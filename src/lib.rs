pub mod camera;
pub mod config;
pub mod drag;
pub mod events;
pub mod input;
pub mod markers;
pub mod media;
pub mod picking;
pub mod sphere;
pub mod tour;
pub mod viewer;

pub use camera::{LookControl, PanoCamera};
pub use config::ViewerConfig;
pub use drag::{DragCoordinator, DragPhase, DragSession};
pub use events::{EngineEvent, EventBus};
pub use input::{PointerEvent, PointerTracker, ViewportRect};
pub use markers::{MarkerInstance, QuickAction, UiState};
pub use media::{
    DecodedImage, MediaTextureLoader, PlaybackError, ScriptedVideo, ScriptedVideoState,
    TextureState, VideoSource, VideoStatus,
};
pub use picking::{pick_sphere_point, ray_sphere_intersection, snap_to_sphere};
pub use sphere::{build_sphere, PanoVertex, FALLBACK_COLOR, SPHERE_RADIUS};
pub use tour::{
    Hotspot, HotspotId, HotspotKind, HotspotPatch, HotspotStyle, MediaKind, Scene, SceneId, Tour,
};
pub use viewer::{PanoramaViewer, VideoSourceFactory};
