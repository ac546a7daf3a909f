use crate::events::{EngineEvent, EventBus};
use crate::tour::HotspotId;
use glam::Vec2;

/// How far (in NDC units) the pointer has to travel from the arming sample
/// before a session counts as an actual drag rather than a stray click.
const DRAG_THRESHOLD_NDC: f32 = 0.004;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Armed,
    Dragging,
}

/// The single live reposition session. Its existence is the engine-wide
/// gate: no second hotspot can start moving while one exists.
#[derive(Debug, Clone, Copy)]
pub struct DragSession {
    pub hotspot: HotspotId,
    pub phase: DragPhase,
    arm_ndc: Option<Vec2>,
    last_ndc: Option<Vec2>,
}

/// Mutual-exclusion protocol for hotspot repositioning. Arming broadcasts
/// `DragStarted`, every exit path broadcasts `DragEnded`, and both fire at
/// most once per session no matter how many teardown paths run.
#[derive(Debug, Default)]
pub struct DragCoordinator {
    session: Option<DragSession>,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_moving(&self, hotspot: HotspotId) -> bool {
        self.session.map(|s| s.hotspot == hotspot).unwrap_or(false)
    }

    /// Last accepted in-bounds pointer sample; the per-frame tick recomputes
    /// the hotspot position from this between pointer events.
    pub fn last_ndc(&self) -> Option<Vec2> {
        self.session.and_then(|s| s.last_ndc)
    }

    /// Starts a session for `hotspot`. Rejected as a silent no-op while any
    /// session is live; a concurrent arm is an expected race, not an error.
    pub fn try_arm(&mut self, hotspot: HotspotId, events: &mut EventBus) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(DragSession { hotspot, phase: DragPhase::Armed, arm_ndc: None, last_ndc: None });
        events.push(EngineEvent::DragStarted { hotspot });
        true
    }

    /// Feeds one pointer-move sample. Out-of-bounds samples are ignored
    /// without ending the session. Returns the hotspot to move and the
    /// accepted NDC when the sample should be applied.
    pub fn sample(&mut self, ndc: Vec2, in_bounds: bool) -> Option<(HotspotId, Vec2)> {
        let session = self.session.as_mut()?;
        if !in_bounds {
            return None;
        }
        match session.phase {
            DragPhase::Armed => {
                let arm = *session.arm_ndc.get_or_insert(ndc);
                if arm.distance(ndc) >= DRAG_THRESHOLD_NDC {
                    session.phase = DragPhase::Dragging;
                }
            }
            DragPhase::Dragging => {}
        }
        session.last_ndc = Some(ndc);
        Some((session.hotspot, ndc))
    }

    /// Ends the session, leaving the hotspot at its last computed position.
    /// Safe to call any number of times; `DragEnded` fires once.
    pub fn end(&mut self, events: &mut EventBus) -> Option<HotspotId> {
        let session = self.session.take()?;
        events.push(EngineEvent::DragEnded { hotspot: session.hotspot });
        Some(session.hotspot)
    }
}
