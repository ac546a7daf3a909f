use crate::tour::{HotspotId, SceneId};
use smallvec::SmallVec;
use std::fmt;

/// Everything the engine reports to its host, plus the drag broadcasts that
/// coordinate hotspot widgets and the camera look control. Typed payloads
/// instead of string event names: a new variant is a compile error at every
/// match site.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    LoadingChanged { loading: bool },
    MediaError { message: String },
    AutoMuted,
    HotspotSelected { hotspot: HotspotId },
    SceneChangeRequested { scene: SceneId },
    SceneNotFound { scene: SceneId },
    DragStarted { hotspot: HotspotId },
    DragEnded { hotspot: HotspotId },
}

impl fmt::Display for EngineEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineEvent::LoadingChanged { loading } => write!(f, "LoadingChanged loading={loading}"),
            EngineEvent::MediaError { message } => write!(f, "MediaError {message}"),
            EngineEvent::AutoMuted => write!(f, "AutoMuted"),
            EngineEvent::HotspotSelected { hotspot } => write!(f, "HotspotSelected hotspot={hotspot}"),
            EngineEvent::SceneChangeRequested { scene } => {
                write!(f, "SceneChangeRequested scene={scene}")
            }
            EngineEvent::SceneNotFound { scene } => write!(f, "SceneNotFound scene={scene}"),
            EngineEvent::DragStarted { hotspot } => write!(f, "DragStarted hotspot={hotspot}"),
            EngineEvent::DragEnded { hotspot } => write!(f, "DragEnded hotspot={hotspot}"),
        }
    }
}

/// Frame-scoped queue; most frames carry at most a handful of events.
#[derive(Default)]
pub struct EventBus {
    events: SmallVec<[EngineEvent; 8]>,
}

impl EventBus {
    pub fn push(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<EngineEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
