//! Reactive mirror of a live-classroom visit.
//!
//! DESIGN
//! ======
//! The SDK owns media; this state only tracks what the view renders: the
//! connection phase, who is present with which tracks, and the local media
//! switches. Every room event goes through `apply`.

#[cfg(test)]
#[path = "classroom_test.rs"]
mod classroom_test;

use std::collections::BTreeMap;

use crate::classroom::{LocalMedia, RemoteTrack, RoomEvent};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ClassroomPhase {
    #[default]
    Idle,
    Connecting,
    Connected,
    /// Connect or publish failed; rendered inline.
    Failed(String),
    /// The room closed the connection.
    Ended,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassroomState {
    pub phase: ClassroomPhase,
    /// Remote participants by identity, each with its subscribed tracks.
    pub participants: BTreeMap<String, Vec<RemoteTrack>>,
    pub media: LocalMedia,
    /// Last toggle failure, cleared by the next successful toggle.
    pub notice: Option<String>,
}

impl ClassroomState {
    pub fn connecting(&mut self) {
        *self = Self { phase: ClassroomPhase::Connecting, ..Self::default() };
    }

    pub fn connected(&mut self, media: LocalMedia) {
        self.phase = ClassroomPhase::Connected;
        self.media = media;
    }

    pub fn failed(&mut self, message: String) {
        self.phase = ClassroomPhase::Failed(message);
        self.participants.clear();
        self.media = LocalMedia::default();
    }

    pub fn is_live(&self) -> bool {
        self.phase == ClassroomPhase::Connected
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn apply(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::ParticipantJoined { identity } => {
                self.participants.entry(identity).or_default();
            }
            RoomEvent::ParticipantLeft { identity } => {
                self.participants.remove(&identity);
            }
            RoomEvent::TrackSubscribed(track) => {
                let tracks = self.participants.entry(track.participant.clone()).or_default();
                if !tracks.iter().any(|t| t.sid == track.sid) {
                    tracks.push(track);
                }
            }
            RoomEvent::TrackUnsubscribed { participant, sid } => {
                if let Some(tracks) = self.participants.get_mut(&participant) {
                    tracks.retain(|t| t.sid != sid);
                }
            }
            RoomEvent::Disconnected { .. } => {
                self.phase = ClassroomPhase::Ended;
                self.participants.clear();
                self.media = LocalMedia::default();
            }
        }
    }

    pub fn apply_all(&mut self, events: impl IntoIterator<Item = RoomEvent>) {
        for event in events {
            self.apply(event);
        }
    }
}
