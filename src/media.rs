use crate::events::{EngineEvent, EventBus};
use anyhow::{anyhow, Result};
use std::fmt;
use std::fs;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

/// Load lifecycle of the active scene's texture. Entered fresh on every
/// scene activation.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureState {
    Loading,
    Ready,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

struct DecodeResult {
    generation: u64,
    outcome: std::result::Result<DecodedImage, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VideoStatus {
    Starting,
    CanPlay,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackError {
    /// The platform refused to start playback with audio. The loader retries
    /// muted and raises `EngineEvent::AutoMuted`.
    AutoplayRejected,
    Backend(String),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::AutoplayRejected => write!(f, "autoplay with audio rejected"),
            PlaybackError::Backend(message) => write!(f, "playback backend error: {message}"),
        }
    }
}

/// The hidden-video-element seam. The host supplies the platform decoder;
/// the engine drives its state machine and frame invalidation.
pub trait VideoSource {
    fn poll_status(&mut self) -> VideoStatus;
    fn play(&mut self, muted: bool) -> std::result::Result<(), PlaybackError>;
    fn pause(&mut self);
    /// Contract: toggling mute preserves the current playback position and
    /// play/pause state. It never restarts playback.
    fn set_muted(&mut self, muted: bool);
    fn muted(&self) -> bool;
    fn is_playing(&self) -> bool;
    fn current_time(&self) -> f64;
    fn frame_size(&self) -> (u32, u32);
    /// Copies the current video frame into the GPU texture.
    fn upload_frame(&mut self, queue: &wgpu::Queue, texture: &wgpu::Texture) -> Result<()>;
}

/// Scriptable stand-in for a platform video element. Hosts can exercise the
/// video scene flow without a real decoder; the engine's own tests use it
/// the same way. State lives behind a shared handle so it stays observable
/// after the source is boxed into the loader.
pub struct ScriptedVideo {
    pub status: VideoStatus,
    pub reject_unmuted: bool,
    state: Arc<Mutex<ScriptedVideoState>>,
}

#[derive(Debug, Default, Clone)]
pub struct ScriptedVideoState {
    pub playing: bool,
    pub muted: bool,
    pub time: f64,
    pub play_calls: u32,
    pub pause_calls: u32,
}

impl ScriptedVideo {
    pub fn ready() -> Self {
        Self {
            status: VideoStatus::CanPlay,
            reject_unmuted: false,
            state: Arc::new(Mutex::new(ScriptedVideoState::default())),
        }
    }

    pub fn state_handle(&self) -> Arc<Mutex<ScriptedVideoState>> {
        Arc::clone(&self.state)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptedVideoState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl VideoSource for ScriptedVideo {
    fn poll_status(&mut self) -> VideoStatus {
        self.status.clone()
    }

    fn play(&mut self, muted: bool) -> std::result::Result<(), PlaybackError> {
        let mut state = self.lock();
        state.play_calls += 1;
        if !muted && self.reject_unmuted {
            return Err(PlaybackError::AutoplayRejected);
        }
        state.muted = muted;
        state.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        let mut state = self.lock();
        state.pause_calls += 1;
        state.playing = false;
    }

    fn set_muted(&mut self, muted: bool) {
        self.lock().muted = muted;
    }

    fn muted(&self) -> bool {
        self.lock().muted
    }

    fn is_playing(&self) -> bool {
        self.lock().playing
    }

    fn current_time(&self) -> f64 {
        self.lock().time
    }

    fn frame_size(&self) -> (u32, u32) {
        (640, 360)
    }

    fn upload_frame(&mut self, _queue: &wgpu::Queue, _texture: &wgpu::Texture) -> Result<()> {
        Ok(())
    }
}

enum CycleMedia {
    Image,
    Video(Box<dyn VideoSource>),
}

struct LoadCycle {
    generation: u64,
    state: TextureState,
    media: CycleMedia,
    pixels: Option<DecodedImage>,
    texture: Option<wgpu::Texture>,
    play_attempted: bool,
    frame_dirty: bool,
}

/// Owns the texture resource for exactly one scene at a time. A new load
/// cancels-then-replaces the previous cycle, and completions are tagged with
/// a generation so a late result for a torn-down scene is a no-op.
pub struct MediaTextureLoader {
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    generation: u64,
    cycle: Option<LoadCycle>,
    tx: Sender<DecodeResult>,
    rx: Receiver<DecodeResult>,
    frames_marked: u64,
}

impl MediaTextureLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { device: None, queue: None, generation: 0, cycle: None, tx, rx, frames_marked: 0 }
    }

    pub fn set_device(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        self.device = Some(device.clone());
        self.queue = Some(queue.clone());
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> TextureState {
        self.cycle.as_ref().map(|c| c.state.clone()).unwrap_or(TextureState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state(), TextureState::Ready)
    }

    pub fn error_message(&self) -> Option<String> {
        match self.state() {
            TextureState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self.cycle, Some(LoadCycle { media: CycleMedia::Video(_), .. }))
    }

    pub fn texture(&self) -> Option<&wgpu::Texture> {
        self.cycle.as_ref().and_then(|c| c.texture.as_ref())
    }

    /// Decoded pixels retained until (or instead of, headless) GPU upload.
    pub fn pixels(&self) -> Option<&DecodedImage> {
        self.cycle.as_ref().and_then(|c| c.pixels.as_ref())
    }

    pub fn video_mut(&mut self) -> Option<&mut dyn VideoSource> {
        match self.cycle.as_mut() {
            Some(LoadCycle { media: CycleMedia::Video(source), .. }) => Some(source.as_mut()),
            _ => None,
        }
    }

    /// Starts an image load cycle for an already-resolved asset path.
    /// Read + decode run on a worker thread; the result is reconciled on
    /// the engine thread in `poll`.
    pub fn begin_image(&mut self, asset_path: &str) -> u64 {
        self.release();
        self.generation += 1;
        let generation = self.generation;
        let tx = self.tx.clone();
        let path = asset_path.to_string();
        let spawned = thread::Builder::new().name("panotour-decode".into()).spawn(move || {
            let outcome = decode_image(&path).map_err(|err| format!("{err:#}"));
            // The loader may have moved on; a failed send just means nobody
            // is listening anymore.
            let _ = tx.send(DecodeResult { generation, outcome });
        });
        let state = match spawned {
            Ok(_) => TextureState::Loading,
            Err(err) => TextureState::Error(format!("failed to spawn decode worker: {err}")),
        };
        self.cycle = Some(LoadCycle {
            generation,
            state,
            media: CycleMedia::Image,
            pixels: None,
            texture: None,
            play_attempted: false,
            frame_dirty: false,
        });
        generation
    }

    /// Starts a video load cycle around a host-provided source.
    pub fn begin_video(&mut self, source: Box<dyn VideoSource>) -> u64 {
        self.release();
        self.generation += 1;
        self.cycle = Some(LoadCycle {
            generation: self.generation,
            state: TextureState::Loading,
            media: CycleMedia::Video(source),
            pixels: None,
            texture: None,
            play_attempted: false,
            frame_dirty: false,
        });
        self.generation
    }

    /// Starts a cycle that is already failed, for media the host cannot
    /// provide a backend for. Keeps the state machine uniform so the caller
    /// still gets the error presentation path.
    pub fn begin_failed(&mut self, message: String) -> u64 {
        self.release();
        self.generation += 1;
        self.cycle = Some(LoadCycle {
            generation: self.generation,
            state: TextureState::Error(message),
            media: CycleMedia::Image,
            pixels: None,
            texture: None,
            play_attempted: false,
            frame_dirty: false,
        });
        self.generation
    }

    /// Reconciles out-of-band completions onto the engine thread: decoded
    /// images get uploaded, video status transitions are applied, errors are
    /// surfaced. Call once per frame before rendering.
    pub fn poll(&mut self, events: &mut EventBus) {
        while let Ok(result) = self.rx.try_recv() {
            if result.generation != self.generation {
                eprintln!(
                    "[media] Ignoring stale load completion (generation {} != {}).",
                    result.generation, self.generation
                );
                continue;
            }
            let Some(cycle) = self.cycle.as_mut() else {
                continue;
            };
            match result.outcome {
                Ok(image) => {
                    cycle.pixels = Some(image);
                    cycle.state = TextureState::Ready;
                }
                Err(message) => {
                    cycle.state = TextureState::Error(message.clone());
                    events.push(EngineEvent::MediaError { message });
                }
            }
        }

        if let Some(cycle) = self.cycle.as_mut() {
            if let CycleMedia::Video(source) = &mut cycle.media {
                if cycle.state == TextureState::Loading {
                    match source.poll_status() {
                        VideoStatus::Starting => {}
                        VideoStatus::CanPlay => {
                            cycle.state = TextureState::Ready;
                        }
                        VideoStatus::Failed(message) => {
                            cycle.state = TextureState::Error(message.clone());
                            events.push(EngineEvent::MediaError { message });
                        }
                    }
                }
                if cycle.state == TextureState::Ready && !cycle.play_attempted {
                    cycle.play_attempted = true;
                    match source.play(false) {
                        Ok(()) => {}
                        Err(PlaybackError::AutoplayRejected) => match source.play(true) {
                            Ok(()) => events.push(EngineEvent::AutoMuted),
                            Err(err) => {
                                let message = err.to_string();
                                cycle.state = TextureState::Error(message.clone());
                                events.push(EngineEvent::MediaError { message });
                            }
                        },
                        Err(err) => {
                            let message = err.to_string();
                            cycle.state = TextureState::Error(message.clone());
                            events.push(EngineEvent::MediaError { message });
                        }
                    }
                }
            }
        }

        if let Err(err) = self.upload_pending() {
            eprintln!("[media] GPU upload failed: {err:#}");
            if let Some(cycle) = self.cycle.as_mut() {
                let message = format!("{err:#}");
                cycle.state = TextureState::Error(message.clone());
                events.push(EngineEvent::MediaError { message });
            }
        }
    }

    fn upload_pending(&mut self) -> Result<()> {
        let (Some(device), Some(queue)) = (self.device.as_ref(), self.queue.as_ref()) else {
            return Ok(());
        };
        let Some(cycle) = self.cycle.as_mut() else {
            return Ok(());
        };
        if cycle.state != TextureState::Ready || cycle.texture.is_some() {
            return Ok(());
        }
        match &mut cycle.media {
            CycleMedia::Image => {
                let Some(image) = cycle.pixels.take() else {
                    return Ok(());
                };
                cycle.texture = Some(upload_rgba(device, queue, &image, "Panorama Texture")?);
            }
            CycleMedia::Video(source) => {
                let (width, height) = source.frame_size();
                if width == 0 || height == 0 {
                    return Err(anyhow!("video source reported zero frame size"));
                }
                cycle.texture = Some(create_texture(device, width, height, "Panorama Video Texture"));
                cycle.frame_dirty = true;
            }
        }
        Ok(())
    }

    /// Marks the video texture as needing a fresh frame. Called once per
    /// rendered frame while Ready; repeat calls within one frame collapse.
    pub fn mark_video_frame(&mut self) {
        let Some(cycle) = self.cycle.as_mut() else {
            return;
        };
        if !matches!(cycle.media, CycleMedia::Video(_)) || cycle.state != TextureState::Ready {
            return;
        }
        if !cycle.frame_dirty {
            cycle.frame_dirty = true;
            self.frames_marked += 1;
        }
    }

    /// Number of distinct frame invalidations so far.
    pub fn frames_marked(&self) -> u64 {
        self.frames_marked
    }

    /// Consumes the dirty flag, copying the current video frame into the GPU
    /// texture when one exists. The host calls this from its render pass.
    pub fn take_video_frame(&mut self) -> Result<bool> {
        let Some(cycle) = self.cycle.as_mut() else {
            return Ok(false);
        };
        if !cycle.frame_dirty {
            return Ok(false);
        }
        cycle.frame_dirty = false;
        if let (CycleMedia::Video(source), Some(texture), Some(queue)) =
            (&mut cycle.media, cycle.texture.as_ref(), self.queue.as_ref())
        {
            source.upload_frame(queue, texture)?;
        }
        Ok(true)
    }

    /// Tears down the current cycle: stops playback, drops the GPU texture
    /// and retained pixels. Runs at most once per cycle; calling it without
    /// a live cycle is a no-op.
    pub fn release(&mut self) {
        if let Some(mut cycle) = self.cycle.take() {
            if let CycleMedia::Video(source) = &mut cycle.media {
                source.pause();
            }
            // texture and pixels drop with the cycle
        }
    }
}

impl Default for MediaTextureLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MediaTextureLoader {
    fn drop(&mut self) {
        self.release();
    }
}

fn decode_image(path: &str) -> Result<DecodedImage> {
    let bytes = fs::read(path).map_err(|err| anyhow!("reading media asset {path}: {err}"))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|err| anyhow!("decoding media asset {path}: {err}"))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(DecodedImage { width, height, rgba: img.into_raw() })
}

fn create_texture(device: &wgpu::Device, width: u32, height: u32, label: &str) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &DecodedImage,
    label: &str,
) -> Result<wgpu::Texture> {
    if image.width == 0 || image.height == 0 {
        return Err(anyhow!("decoded image has zero dimension"));
    }
    let texture = create_texture(device, image.width, image.height, label);
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        wgpu::Extent3d { width: image.width, height: image.height, depth_or_array_layers: 1 },
    );
    Ok(texture)
}
