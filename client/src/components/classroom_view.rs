//! Live-classroom stage, participant list and media controls.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounting fetches a video token for the class and enters the room through
//! `classroom::Classroom`; SDK events flow into `ClassroomState`. The two
//! stage roots are left empty for the SDK to fill (see `classroom::livekit`).
//!
//! RESOURCE LIFECYCLE
//! ==================
//! Unmounting signals a task that holds its own handle to the controller and
//! runs `leave`, so local capture stops even after the owner is disposed.
//! Connection failures render inline rather than as toasts.

#[cfg(test)]
#[path = "classroom_view_test.rs"]
mod classroom_view_test;

use std::rc::Rc;

use futures::lock::Mutex;
use leptos::prelude::*;

use crate::classroom::livekit::{LOCAL_PREVIEW_ID, REMOTE_ROOT_ID, browser_room};
use crate::classroom::{Classroom, LocalMedia};
use crate::config::AppConfig;
use crate::net::http::ApiClient;
use crate::routes;
use crate::state::classroom::{ClassroomPhase, ClassroomState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaSwitch {
    Microphone,
    Camera,
    Screen,
}

pub fn control_label(switch: MediaSwitch, media: LocalMedia) -> &'static str {
    match switch {
        MediaSwitch::Microphone if media.audio_enabled => "Mute",
        MediaSwitch::Microphone => "Unmute",
        MediaSwitch::Camera if media.video_enabled => "Stop video",
        MediaSwitch::Camera => "Start video",
        MediaSwitch::Screen if media.screen_sharing => "Stop sharing",
        MediaSwitch::Screen => "Share screen",
    }
}

/// Status line for the current phase: `(css modifier, text)`.
pub fn status_line(phase: &ClassroomPhase) -> Option<(&'static str, String)> {
    match phase {
        ClassroomPhase::Idle | ClassroomPhase::Connected => None,
        ClassroomPhase::Connecting => Some(("info", "Joining classroom...".to_owned())),
        ClassroomPhase::Failed(message) => Some(("error", message.clone())),
        ClassroomPhase::Ended => Some(("info", "The class has ended.".to_owned())),
    }
}

pub fn participant_summary(identity: &str, track_count: usize) -> String {
    match track_count {
        0 => identity.to_owned(),
        1 => format!("{identity} (1 track)"),
        n => format!("{identity} ({n} tracks)"),
    }
}

type SharedClassroom = Rc<Mutex<Classroom>>;

#[component]
pub fn ClassroomView(class_id: String) -> impl IntoView {
    let api = expect_context::<ApiClient>();
    let config = expect_context::<AppConfig>();
    let state = RwSignal::new(ClassroomState::default());
    let controller: StoredValue<SharedClassroom, LocalStorage> =
        StoredValue::new_local(Rc::new(Mutex::new(Classroom::new(browser_room(config.livekit_sdk_url.clone())))));

    #[cfg(feature = "hydrate")]
    {
        let room = controller.get_value();
        let left = Rc::new(std::cell::Cell::new(false));
        let (leave_tx, leave_rx) = futures::channel::oneshot::channel::<()>();

        leptos::task::spawn_local(join(api, config.livekit_url.clone(), class_id, state, room.clone(), left.clone()));
        leptos::task::spawn_local(async move {
            let _ = leave_rx.await;
            left.set(true);
            room.lock().await.leave().await;
        });
        on_cleanup(move || {
            let _ = leave_tx.send(());
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (api, class_id);
    }

    let toggle = move |switch: MediaSwitch| {
        let Some(room) = controller.try_get_value() else {
            return;
        };
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let mut room = room.lock().await;
            let result = match switch {
                MediaSwitch::Microphone => room.toggle_audio().await,
                MediaSwitch::Camera => room.toggle_video().await,
                MediaSwitch::Screen => room.toggle_screen_share().await,
            };
            let media = room.media();
            state.update(|s| {
                s.media = media;
                s.notice = result.err().map(|e| e.to_string());
            });
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (room, switch);
        }
    };

    let control = move |switch: MediaSwitch| {
        view! {
            <button
                class="btn classroom__control"
                disabled=move || !state.get().is_live()
                on:click=move |_| toggle(switch)
            >
                {move || control_label(switch, state.get().media)}
            </button>
        }
    };

    view! {
        <section class="classroom">
            {move || {
                status_line(&state.get().phase)
                    .map(|(modifier, text)| {
                        view! { <p class=format!("classroom__status classroom__status--{modifier}")>{text}</p> }
                    })
            }}
            <div class="classroom__stage">
                <div id=LOCAL_PREVIEW_ID class="classroom__local"></div>
                <div id=REMOTE_ROOT_ID class="classroom__remote"></div>
            </div>
            <aside class="classroom__participants">
                <h3>{move || format!("Participants ({})", state.get().participant_count())}</h3>
                <ul>
                    {move || {
                        state
                            .get()
                            .participants
                            .iter()
                            .map(|(identity, tracks)| view! { <li>{participant_summary(identity, tracks.len())}</li> })
                            .collect_view()
                    }}
                </ul>
            </aside>
            <div class="classroom__controls">
                {control(MediaSwitch::Microphone)}
                {control(MediaSwitch::Camera)}
                {control(MediaSwitch::Screen)}
                <a class="btn btn--danger" href=routes::DASHBOARD>
                    "Leave"
                </a>
            </div>
            <Show when=move || state.get().notice.is_some()>
                <p class="classroom__notice">{move || state.get().notice.unwrap_or_default()}</p>
            </Show>
        </section>
    }
}

#[cfg(feature = "hydrate")]
async fn join(
    api: ApiClient,
    default_url: String,
    class_id: String,
    state: RwSignal<ClassroomState>,
    room: SharedClassroom,
    left: Rc<std::cell::Cell<bool>>,
) {
    use crate::classroom::{EventSink, RoomEvent};
    use crate::net::error::format_api_error;

    state.update(ClassroomState::connecting);
    let access = match crate::net::classroom::join_class(&api, &class_id).await {
        Ok(access) => access,
        Err(err) => {
            state.update(|s| s.failed(format_api_error(Some(&err), "Could not join the classroom")));
            return;
        }
    };

    let mut room = room.lock().await;
    if left.get() {
        return;
    }
    let sink: EventSink = Rc::new(move |event: RoomEvent| state.update(|s| s.apply(event)));
    match room.enter(access.signaling_url(&default_url), &access.token, sink).await {
        Ok(events) => {
            let media = room.media();
            state.update(|s| {
                s.connected(media);
                s.apply_all(events);
            });
        }
        Err(err) => {
            leptos::logging::warn!("classroom {class_id}: {err}");
            state.update(|s| s.failed(err.to_string()));
        }
    }
}
