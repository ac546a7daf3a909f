use crate::camera::{LookControl, PanoCamera};
use crate::config::ViewerConfig;
use crate::drag::DragCoordinator;
use crate::events::{EngineEvent, EventBus};
use crate::input::{PointerEvent, PointerTracker, ViewportRect};
use crate::markers::{self, MarkerInstance, QuickAction, UiState};
use crate::media::{MediaTextureLoader, TextureState, VideoSource};
use crate::picking::pick_sphere_point;
use crate::sphere::{FALLBACK_COLOR, SPHERE_RADIUS};
use crate::tour::{HotspotId, HotspotKind, MediaKind, Scene, SceneId, Tour};
use glam::Vec2;
use winit::dpi::PhysicalSize;
use winit::event::MouseButton;

/// Builds a platform video source for an already-resolved media ref.
pub type VideoSourceFactory = Box<dyn FnMut(&str) -> Box<dyn VideoSource>>;

/// Owns the active scene and coordinates every engine component around it:
/// texture loading, hotspot markers, the drag protocol, camera look control
/// and the per-frame tick.
pub struct PanoramaViewer {
    tour: Tour,
    active: Option<SceneId>,
    edit_mode: bool,
    config: ViewerConfig,
    pub camera: PanoCamera,
    look: LookControl,
    loader: MediaTextureLoader,
    drag: DragCoordinator,
    ui: UiState,
    events: EventBus,
    pointer: PointerTracker,
    host_viewport: ViewportRect,
    fullscreen_override: Option<ViewportRect>,
    video_factory: Option<VideoSourceFactory>,
    loading: bool,
    loading_elapsed: f32,
    elapsed: f32,
}

impl PanoramaViewer {
    pub fn new(tour: Tour, config: ViewerConfig) -> Self {
        let camera = PanoCamera::new(config.fov_y_radians());
        let look =
            LookControl::new(config.look_sensitivity, config.fov_min_radians(), config.fov_max_radians());
        Self {
            tour,
            active: None,
            edit_mode: false,
            config,
            camera,
            look,
            loader: MediaTextureLoader::new(),
            drag: DragCoordinator::new(),
            ui: UiState::default(),
            events: EventBus::default(),
            pointer: PointerTracker::new(),
            host_viewport: ViewportRect::from_size(1280.0, 720.0),
            fullscreen_override: None,
            video_factory: None,
            loading: false,
            loading_elapsed: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn set_device(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        self.loader.set_device(device, queue);
    }

    pub fn set_video_source_factory(&mut self, factory: VideoSourceFactory) {
        self.video_factory = Some(factory);
    }

    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    pub fn tour_mut(&mut self) -> &mut Tour {
        &mut self.tour
    }

    pub fn active_scene(&self) -> Option<&Scene> {
        self.active.and_then(|id| self.tour.scene(id))
    }

    pub fn active_scene_id(&self) -> Option<SceneId> {
        self.active
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Leaving edit mode aborts any reposition in flight.
    pub fn set_edit_mode(&mut self, enabled: bool) {
        if !enabled {
            self.end_drag();
        }
        self.edit_mode = enabled;
        self.ui.clear();
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn texture_state(&self) -> TextureState {
        self.loader.state()
    }

    pub fn loader(&self) -> &MediaTextureLoader {
        &self.loader
    }

    pub fn loader_mut(&mut self) -> &mut MediaTextureLoader {
        &mut self.loader
    }

    /// Neutral sphere color to present instead of a (failed or missing)
    /// scene texture.
    pub fn fallback_color(&self) -> Option<[f32; 4]> {
        match self.loader.state() {
            TextureState::Error(_) => Some(FALLBACK_COLOR),
            _ => None,
        }
    }

    pub fn ui_state(&self) -> &UiState {
        &self.ui
    }

    pub fn dragging_hotspot(&self) -> Option<HotspotId> {
        self.drag.session().map(|s| s.hotspot)
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain()
    }

    // --- layout / fullscreen ---

    /// Host-driven responsive layout. Ignored while a fullscreen override is
    /// in effect, but remembered for when it clears.
    pub fn set_viewport(&mut self, rect: ViewportRect) {
        self.host_viewport = rect;
    }

    pub fn viewport(&self) -> ViewportRect {
        self.fullscreen_override.unwrap_or(self.host_viewport)
    }

    pub fn viewport_size(&self) -> PhysicalSize<u32> {
        let size = self.viewport().size;
        PhysicalSize::new(size.x.max(0.0) as u32, size.y.max(0.0) as u32)
    }

    pub fn enter_fullscreen(&mut self, size: PhysicalSize<u32>) {
        self.fullscreen_override =
            Some(ViewportRect::from_size(size.width as f32, size.height as f32));
    }

    /// Clears the inline size override applied by the fullscreen transition
    /// so normal responsive layout (the host's `set_viewport`) takes over
    /// again.
    pub fn exit_fullscreen(&mut self) {
        self.fullscreen_override = None;
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen_override.is_some()
    }

    // --- scene lifecycle ---

    /// Switches the active scene: cancels any in-flight drag, releases the
    /// previous texture cycle, resets loading state and starts the new load.
    /// An unknown id reports `SceneNotFound` and stays on the current scene.
    pub fn activate_scene(&mut self, id: SceneId) -> bool {
        let Some(scene) = self.tour.scene(id) else {
            eprintln!("[viewer] Scene {id} not found, staying on the current scene.");
            self.events.push(EngineEvent::SceneNotFound { scene: id });
            return false;
        };
        let media_kind = scene.media_kind;
        let media_ref = scene.media_ref.clone();

        self.end_drag();
        self.ui.clear();

        match media_kind {
            MediaKind::Image => {
                self.loader.begin_image(&media_ref);
            }
            MediaKind::Video => match self.video_factory.as_mut() {
                Some(factory) => {
                    let source = factory(&media_ref);
                    self.loader.begin_video(source);
                }
                None => {
                    let message = String::from("no video backend registered");
                    self.loader.begin_failed(message.clone());
                    self.events.push(EngineEvent::MediaError { message });
                }
            },
        }

        self.loading = true;
        self.loading_elapsed = 0.0;
        self.events.push(EngineEvent::LoadingChanged { loading: true });
        self.active = Some(id);
        true
    }

    // --- pointer choreography ---

    pub fn handle_pointer(&mut self, ev: PointerEvent) {
        self.pointer.push(ev);
        match ev {
            PointerEvent::Moved { position } => self.pointer_moved(position),
            PointerEvent::Pressed { button: MouseButton::Left } => {
                if let Some(position) = self.pointer.cursor_position() {
                    self.pointer_pressed(position);
                }
                self.pointer.take_left_click();
            }
            PointerEvent::Released { button: MouseButton::Left } => {
                // Pointer-up commits an actual drag; an armed-but-unmoved
                // session survives so menu-driven "move" doesn't end on the
                // release of the menu click itself.
                if let Some(session) = self.drag.session() {
                    if session.phase == crate::drag::DragPhase::Dragging {
                        self.end_drag();
                    }
                }
            }
            // Wheel deltas accumulate in the tracker and apply on the tick.
            PointerEvent::Wheel { .. } => {}
            PointerEvent::Exited => {
                // Same treatment as out-of-bounds samples: the session stays
                // alive until the pointer comes back or capture is lost.
            }
            PointerEvent::CaptureLost => {
                // An aborted drag must never leave the camera locked.
                self.end_drag();
            }
            _ => {}
        }
    }

    fn pointer_moved(&mut self, position: Vec2) {
        let delta = self.pointer.take_motion_delta();
        if self.drag.is_active() {
            let rect = self.viewport();
            let in_bounds = rect.contains(position);
            let ndc = rect.to_ndc(position);
            self.apply_drag_sample(ndc, in_bounds);
        } else if self.pointer.left_held() {
            self.look.drag(delta, &mut self.camera);
        }
    }

    fn pointer_pressed(&mut self, position: Vec2) {
        if self.drag.is_active() {
            // Background (or any) click while repositioning commits.
            self.end_drag();
            return;
        }
        let markers = self.markers();
        match markers::hit_test(&markers, position) {
            Some(hotspot) => self.hotspot_clicked(hotspot),
            None => {
                self.ui.close_menu();
                self.ui.close_expanded();
            }
        }
    }

    fn hotspot_clicked(&mut self, hotspot: HotspotId) {
        self.events.push(EngineEvent::HotspotSelected { hotspot });
        if self.edit_mode {
            self.ui.open_menu(hotspot);
            return;
        }
        let Some(kind) = self.active_scene().and_then(|s| s.hotspot(hotspot)).map(|h| h.kind.clone())
        else {
            return;
        };
        match kind {
            HotspotKind::SceneLink { target } => {
                self.events.push(EngineEvent::SceneChangeRequested { scene: target });
            }
            HotspotKind::Text { .. }
            | HotspotKind::Image { .. }
            | HotspotKind::Video { .. }
            | HotspotKind::Audio { .. }
            | HotspotKind::TextToSpeech { .. }
            | HotspotKind::VoiceRecording { .. } => {
                self.ui.toggle_expanded(hotspot);
            }
        }
    }

    /// Quick-action menu selection (edit mode). `Move` arms the drag session
    /// and suspends camera look until the session ends.
    pub fn quick_action(&mut self, hotspot: HotspotId, action: QuickAction) {
        self.ui.close_menu();
        match action {
            QuickAction::Edit => {
                self.events.push(EngineEvent::HotspotSelected { hotspot });
            }
            QuickAction::Move => {
                if self.drag.try_arm(hotspot, &mut self.events) {
                    self.look.suspend();
                }
            }
            QuickAction::Delete => {
                if let Some(scene) = self.active {
                    self.tour.delete_hotspot(scene, hotspot);
                }
                if self.ui.expanded == Some(hotspot) {
                    self.ui.close_expanded();
                }
            }
        }
    }

    /// Creates a hotspot where the pointer ray meets the sphere. A ray miss
    /// ignores the input frame.
    pub fn add_hotspot_at(&mut self, ndc: Vec2) -> Option<HotspotId> {
        let scene = self.active?;
        let point = pick_sphere_point(&self.camera, ndc, self.viewport_size(), SPHERE_RADIUS)?;
        self.tour.add_hotspot(scene, point)
    }

    /// Ends any live drag session. Safe to call twice; always re-enables
    /// camera look.
    pub fn end_drag(&mut self) {
        self.drag.end(&mut self.events);
        self.look.resume();
    }

    fn apply_drag_sample(&mut self, ndc: Vec2, in_bounds: bool) {
        let Some((hotspot, ndc)) = self.drag.sample(ndc, in_bounds) else {
            return;
        };
        let Some(point) = pick_sphere_point(&self.camera, ndc, self.viewport_size(), SPHERE_RADIUS)
        else {
            return;
        };
        if let Some(scene) = self.active {
            self.tour.set_hotspot_position(scene, hotspot, point);
        }
    }

    // --- per-frame tick ---

    /// Runs once per rendered frame. The video and drag concerns are
    /// independent subscribers of the same tick: one stalling or skipping
    /// never affects the other.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.loader.poll(&mut self.events);
        self.reconcile_loading(dt);
        if let Some(delta) = self.pointer.take_wheel_delta() {
            self.look.zoom(delta, &mut self.camera);
        }
        self.tick_video();
        self.tick_drag();
        self.pointer.clear_frame();
    }

    fn reconcile_loading(&mut self, dt: f32) {
        if !self.loading {
            return;
        }
        if !matches!(self.loader.state(), TextureState::Loading) {
            self.loading = false;
            self.events.push(EngineEvent::LoadingChanged { loading: false });
            return;
        }
        self.loading_elapsed += dt;
        if self.loading_elapsed >= self.config.loading_fallback_secs {
            // Escape hatch for a stuck indicator; the load itself may still
            // complete later and will be applied if its generation matches.
            eprintln!(
                "[viewer] No load completion after {:.0}s, clearing the loading indicator.",
                self.config.loading_fallback_secs
            );
            self.loading = false;
            self.events.push(EngineEvent::LoadingChanged { loading: false });
        }
    }

    fn tick_video(&mut self) {
        self.loader.mark_video_frame();
    }

    fn tick_drag(&mut self) {
        let Some(ndc) = self.drag.last_ndc() else {
            return;
        };
        // Recompute from the last known pointer ray so the hotspot tracks
        // camera FOV/viewport changes between pointer samples.
        self.apply_drag_sample(ndc, true);
    }

    /// Marker layout for the current frame; the host rasterizes these.
    pub fn markers(&self) -> Vec<MarkerInstance> {
        let Some(scene) = self.active_scene() else {
            return Vec::new();
        };
        markers::layout(
            scene,
            &self.camera,
            self.viewport_size(),
            self.dragging_hotspot(),
            self.elapsed,
            &self.config,
        )
    }

    /// Mute control for video scenes. Playback position and state are
    /// preserved by the `VideoSource` contract.
    pub fn set_video_muted(&mut self, muted: bool) {
        if let Some(video) = self.loader.video_mut() {
            video.set_muted(muted);
        }
    }
}

impl Drop for PanoramaViewer {
    fn drop(&mut self) {
        self.end_drag();
        self.loader.release();
    }
}
