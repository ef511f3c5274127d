//! Live-classroom bridge to a third-party real-time video SDK.
//!
//! SYSTEM CONTEXT
//! ==============
//! Media negotiation, subscription and reconnection belong to the SDK. This
//! module only sequences the calls the UI needs (connect, publish local media,
//! toggle tracks, leave) behind `RoomAdapter`, one implementation per SDK API
//! generation (see `livekit`).
//!
//! RESOURCE LIFECYCLE
//! ==================
//! `Classroom::leave` must run when the view goes away: it stops every local
//! capture track and disconnects. Skipping it leaves the camera and microphone
//! live.


pub mod livekit;

use std::rc::Rc;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Video,
}

impl TrackKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "audio" => Some(Self::Audio),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// A subscribed track belonging to a remote participant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteTrack {
    pub participant: String,
    pub sid: String,
    pub kind: TrackKind,
}

/// Room activity reported by the adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoomEvent {
    ParticipantJoined { identity: String },
    ParticipantLeft { identity: String },
    TrackSubscribed(RemoteTrack),
    TrackUnsubscribed { participant: String, sid: String },
    Disconnected { reason: Option<String> },
}

/// Participants and tracks already in the room when the connection opened.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub participants: Vec<String>,
    pub tracks: Vec<RemoteTrack>,
}

impl RoomSnapshot {
    /// Replay the snapshot as the events a late joiner would have seen.
    pub fn into_events(self) -> Vec<RoomEvent> {
        let joined = self
            .participants
            .into_iter()
            .map(|identity| RoomEvent::ParticipantJoined { identity });
        let tracks = self.tracks.into_iter().map(RoomEvent::TrackSubscribed);
        joined.chain(tracks).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClassroomError {
    #[error("Video client unavailable: {0}")]
    SdkUnavailable(String),
    #[error("Could not join the classroom: {0}")]
    Connect(String),
    #[error("Camera or microphone unavailable: {0}")]
    MediaDenied(String),
    #[error("Could not share media: {0}")]
    Publish(String),
    #[error("Not connected to a classroom")]
    NotConnected,
}

/// Receives room events for the lifetime of a connection.
pub type EventSink = Rc<dyn Fn(RoomEvent)>;

/// The narrow surface the classroom needs from a video SDK.
#[async_trait(?Send)]
pub trait RoomAdapter {
    /// Join the room. `sink` receives every later event until `disconnect`.
    async fn connect(&mut self, url: &str, token: &str, sink: EventSink) -> Result<RoomSnapshot, ClassroomError>;

    /// Acquire microphone and camera and publish both.
    async fn publish_local_media(&mut self) -> Result<(), ClassroomError>;

    async fn set_microphone(&mut self, enabled: bool) -> Result<(), ClassroomError>;

    async fn set_camera(&mut self, enabled: bool) -> Result<(), ClassroomError>;

    async fn set_screen_share(&mut self, enabled: bool) -> Result<(), ClassroomError>;

    /// Stop every local capture track. Must be safe to call more than once.
    fn stop_local_tracks(&mut self);

    async fn disconnect(&mut self);
}

pub type AdapterFuture = LocalBoxFuture<'static, Result<Box<dyn RoomAdapter>, ClassroomError>>;

/// A video capability that is only built the first time it is needed.
pub struct LazyRoom {
    factory: Option<Box<dyn FnOnce() -> AdapterFuture>>,
    adapter: Option<Box<dyn RoomAdapter>>,
}

impl LazyRoom {
    pub fn new<F>(factory: F) -> Self
    where
        F: FnOnce() -> AdapterFuture + 'static,
    {
        Self { factory: Some(Box::new(factory)), adapter: None }
    }

    pub fn is_loaded(&self) -> bool {
        self.adapter.is_some()
    }

    async fn get_or_load(&mut self) -> Result<&mut Box<dyn RoomAdapter>, ClassroomError> {
        if self.adapter.is_none() {
            let factory = self
                .factory
                .take()
                .ok_or_else(|| ClassroomError::SdkUnavailable("video client failed to load earlier".to_owned()))?;
            self.adapter = Some(factory().await?);
        }
        self.adapter
            .as_mut()
            .ok_or_else(|| ClassroomError::SdkUnavailable("video client not loaded".to_owned()))
    }

    fn loaded(&mut self) -> Option<&mut Box<dyn RoomAdapter>> {
        self.adapter.as_mut()
    }
}

/// Local media switches as last applied to the SDK.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalMedia {
    pub audio_enabled: bool,
    pub video_enabled: bool,
    pub screen_sharing: bool,
}

/// Sequences SDK calls for one classroom visit.
pub struct Classroom {
    room: LazyRoom,
    connected: bool,
    media: LocalMedia,
}

impl Classroom {
    pub fn new(room: LazyRoom) -> Self {
        Self { room, connected: false, media: LocalMedia::default() }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn media(&self) -> LocalMedia {
        self.media
    }

    /// Load the SDK if needed, join, and publish camera + microphone.
    ///
    /// Returns the participants and tracks already present, as events. A
    /// failed publish tears the connection down again.
    ///
    /// # Errors
    ///
    /// Returns the first SDK, connection or media failure.
    pub async fn enter(&mut self, url: &str, token: &str, sink: EventSink) -> Result<Vec<RoomEvent>, ClassroomError> {
        if self.connected {
            return Ok(Vec::new());
        }
        let adapter = self.room.get_or_load().await?;
        let snapshot = adapter.connect(url, token, sink).await?;
        self.connected = true;

        if let Err(err) = adapter.publish_local_media().await {
            leptos::logging::warn!("classroom publish failed: {err}");
            adapter.stop_local_tracks();
            adapter.disconnect().await;
            self.connected = false;
            return Err(err);
        }
        self.media = LocalMedia { audio_enabled: true, video_enabled: true, screen_sharing: false };
        Ok(snapshot.into_events())
    }

    fn connected_adapter(&mut self) -> Result<&mut Box<dyn RoomAdapter>, ClassroomError> {
        if !self.connected {
            return Err(ClassroomError::NotConnected);
        }
        self.room.loaded().ok_or(ClassroomError::NotConnected)
    }

    /// Flip the microphone. Returns the new enabled state.
    ///
    /// # Errors
    ///
    /// `NotConnected` before `enter`, or the SDK failure.
    pub async fn toggle_audio(&mut self) -> Result<bool, ClassroomError> {
        let next = !self.media.audio_enabled;
        self.connected_adapter()?.set_microphone(next).await?;
        self.media.audio_enabled = next;
        Ok(next)
    }

    /// Flip the camera. Returns the new enabled state.
    ///
    /// # Errors
    ///
    /// `NotConnected` before `enter`, or the SDK failure.
    pub async fn toggle_video(&mut self) -> Result<bool, ClassroomError> {
        let next = !self.media.video_enabled;
        self.connected_adapter()?.set_camera(next).await?;
        self.media.video_enabled = next;
        Ok(next)
    }

    /// Start or stop screen sharing. Returns the new sharing state.
    ///
    /// # Errors
    ///
    /// `NotConnected` before `enter`, or the SDK failure (including the user
    /// dismissing the display picker).
    pub async fn toggle_screen_share(&mut self) -> Result<bool, ClassroomError> {
        let next = !self.media.screen_sharing;
        self.connected_adapter()?.set_screen_share(next).await?;
        self.media.screen_sharing = next;
        Ok(next)
    }

    /// Stop local capture and disconnect. Safe to call in any state.
    pub async fn leave(&mut self) {
        let was_connected = self.connected;
        self.connected = false;
        self.media = LocalMedia::default();
        if let Some(adapter) = self.room.loaded() {
            adapter.stop_local_tracks();
            if was_connected {
                adapter.disconnect().await;
            }
        }
    }
}
