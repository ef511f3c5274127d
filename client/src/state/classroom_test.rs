use super::*;
use crate::classroom::TrackKind;

fn track(participant: &str, sid: &str, kind: TrackKind) -> RemoteTrack {
    RemoteTrack { participant: participant.to_owned(), sid: sid.to_owned(), kind }
}

fn joined(identity: &str) -> RoomEvent {
    RoomEvent::ParticipantJoined { identity: identity.to_owned() }
}

// =============================================================
// Participants
// =============================================================

#[test]
fn join_and_leave_track_presence() {
    let mut state = ClassroomState::default();
    state.apply(joined("ada"));
    state.apply(joined("grace"));
    assert_eq!(state.participant_count(), 2);

    state.apply(RoomEvent::ParticipantLeft { identity: "ada".to_owned() });
    assert_eq!(state.participants.keys().collect::<Vec<_>>(), vec!["grace"]);
}

#[test]
fn rejoin_keeps_existing_tracks() {
    let mut state = ClassroomState::default();
    state.apply(RoomEvent::TrackSubscribed(track("ada", "TR_A", TrackKind::Audio)));
    state.apply(joined("ada"));
    assert_eq!(state.participants["ada"].len(), 1);
}

// =============================================================
// Tracks
// =============================================================

#[test]
fn track_subscription_creates_participant_and_dedups_by_sid() {
    let mut state = ClassroomState::default();
    state.apply(RoomEvent::TrackSubscribed(track("ada", "TR_V", TrackKind::Video)));
    state.apply(RoomEvent::TrackSubscribed(track("ada", "TR_V", TrackKind::Video)));
    state.apply(RoomEvent::TrackSubscribed(track("ada", "TR_A", TrackKind::Audio)));

    assert_eq!(state.participants["ada"].len(), 2);
}

#[test]
fn unsubscribe_removes_only_that_track() {
    let mut state = ClassroomState::default();
    state.apply_all([
        RoomEvent::TrackSubscribed(track("ada", "TR_V", TrackKind::Video)),
        RoomEvent::TrackSubscribed(track("ada", "TR_A", TrackKind::Audio)),
        RoomEvent::TrackUnsubscribed { participant: "ada".to_owned(), sid: "TR_V".to_owned() },
    ]);

    assert_eq!(state.participants["ada"], vec![track("ada", "TR_A", TrackKind::Audio)]);
}

#[test]
fn unsubscribe_for_unknown_participant_is_ignored() {
    let mut state = ClassroomState::default();
    state.apply(RoomEvent::TrackUnsubscribed { participant: "ghost".to_owned(), sid: "X".to_owned() });
    assert!(state.participants.is_empty());
}

// =============================================================
// Phases
// =============================================================

#[test]
fn disconnect_ends_session_and_clears_room() {
    let mut state = ClassroomState::default();
    state.connecting();
    state.connected(LocalMedia { audio_enabled: true, video_enabled: true, screen_sharing: false });
    state.apply(joined("ada"));

    state.apply(RoomEvent::Disconnected { reason: Some("room closed".to_owned()) });

    assert_eq!(state.phase, ClassroomPhase::Ended);
    assert!(state.participants.is_empty());
    assert_eq!(state.media, LocalMedia::default());
}

#[test]
fn connecting_resets_previous_visit() {
    let mut state = ClassroomState::default();
    state.apply(joined("ada"));
    state.notice = Some("old".to_owned());
    state.failed("Permission denied".to_owned());

    state.connecting();

    assert_eq!(state, ClassroomState { phase: ClassroomPhase::Connecting, ..ClassroomState::default() });
}

#[test]
fn failure_is_not_live() {
    let mut state = ClassroomState::default();
    state.failed("Could not join".to_owned());
    assert!(!state.is_live());
    assert_eq!(state.phase, ClassroomPhase::Failed("Could not join".to_owned()));
}
