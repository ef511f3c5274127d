//! LiveKit browser SDK adapters.
//!
//! SYSTEM CONTEXT
//! ==============
//! The SDK is a UMD bundle exposing `window.LivekitClient`. It is injected
//! the first time a classroom is entered, probed once, and wrapped in the
//! adapter matching its API generation:
//!
//! - `Modern`: `new Room()` + `room.connect(url, token)`, media switched on the
//!   local participant (`setMicrophoneEnabled` / `setCameraEnabled` /
//!   `setScreenShareEnabled`).
//! - `Legacy`: `LivekitClient.connect(url, token)` returns the room, media is
//!   created with `createLocalTracks` and switched with track `mute`/`unmute`.
//!
//! DOM
//! ===
//! Remote tracks are attached under `#classroom-remote`, one container per
//! participant identity (`data-identity`). The local camera preview goes in
//! `#classroom-local`. Both roots are rendered by `components::classroom_view`
//! and contain nothing reactive.

#[cfg(test)]
#[path = "livekit_test.rs"]
mod livekit_test;

use futures::future::FutureExt;

use super::{ClassroomError, LazyRoom};

pub const SDK_GLOBAL: &str = "LivekitClient";
pub const REMOTE_ROOT_ID: &str = "classroom-remote";
pub const LOCAL_PREVIEW_ID: &str = "classroom-local";

/// Capabilities found on the loaded SDK global.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SdkProbe {
    pub has_room_class: bool,
    pub has_participant_toggles: bool,
    pub has_connect_fn: bool,
    pub has_create_local_tracks: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SdkGeneration {
    Modern,
    Legacy,
}

impl SdkGeneration {
    /// Prefer the participant-level API when both shapes are present.
    pub fn detect(probe: SdkProbe) -> Option<Self> {
        if probe.has_room_class && probe.has_participant_toggles {
            Some(Self::Modern)
        } else if probe.has_connect_fn && probe.has_create_local_tracks {
            Some(Self::Legacy)
        } else {
            None
        }
    }
}

/// Map a `getUserMedia` / publish rejection onto the classroom taxonomy.
///
/// `name` is the `DOMException` name when the SDK surfaces one.
pub fn media_failure(name: &str, message: String) -> ClassroomError {
    match name {
        "NotAllowedError" | "NotFoundError" | "NotReadableError" | "OverconstrainedError" | "SecurityError" => {
            ClassroomError::MediaDenied(message)
        }
        _ => ClassroomError::Publish(message),
    }
}

/// Numeric disconnect codes come from the SDK's `DisconnectReason` enum.
pub fn disconnect_reason(code: Option<f64>, text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty()).or_else(|| code.map(|c| format!("code {c}")))
}

/// Video capability for the current browser, built on first `enter`.
pub fn browser_room(sdk_url: String) -> LazyRoom {
    LazyRoom::new(move || load_adapter(sdk_url).boxed_local())
}

#[cfg(not(feature = "hydrate"))]
async fn load_adapter(sdk_url: String) -> Result<Box<dyn super::RoomAdapter>, ClassroomError> {
    let _ = sdk_url;
    Err(ClassroomError::SdkUnavailable("not available on server".to_owned()))
}

#[cfg(feature = "hydrate")]
async fn load_adapter(sdk_url: String) -> Result<Box<dyn super::RoomAdapter>, ClassroomError> {
    let sdk = match js::sdk_global() {
        Some(sdk) => sdk,
        None => {
            browser::load_script(&sdk_url).await?;
            js::sdk_global()
                .ok_or_else(|| ClassroomError::SdkUnavailable(format!("{SDK_GLOBAL} missing after load")))?
        }
    };
    let generation = SdkGeneration::detect(js::probe(&sdk))
        .ok_or_else(|| ClassroomError::SdkUnavailable("unrecognised video client API".to_owned()))?;
    leptos::logging::log!("classroom: video client generation {generation:?}");
    Ok(match generation {
        SdkGeneration::Modern => Box::new(browser::ModernRoom::new(sdk)),
        SdkGeneration::Legacy => Box::new(browser::LegacyRoom::new(sdk)),
    })
}

#[cfg(feature = "hydrate")]
mod js {
    use js_sys::{Array, Function, Promise, Reflect};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    use super::{SDK_GLOBAL, SdkProbe};

    pub fn get(target: &JsValue, key: &str) -> JsValue {
        if target.is_undefined() || target.is_null() {
            return JsValue::UNDEFINED;
        }
        Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
    }

    pub fn present(value: &JsValue) -> bool {
        !value.is_undefined() && !value.is_null()
    }

    /// First key holding a value. SDK releases renamed several collections.
    pub fn first_present(target: &JsValue, keys: &[&str]) -> JsValue {
        keys.iter()
            .map(|key| get(target, key))
            .find(present)
            .unwrap_or(JsValue::UNDEFINED)
    }

    pub fn string(target: &JsValue, key: &str) -> Option<String> {
        get(target, key).as_string()
    }

    pub fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
        let func: Function = get(target, method)
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("{method} is not a function")))?;
        let args: Array = args.iter().collect();
        func.apply(target, &args)
    }

    /// Call and await the result when it is a promise.
    pub async fn call_async(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
        match call(target, method, args)?.dyn_into::<Promise>() {
            Ok(promise) => JsFuture::from(promise).await,
            Err(value) => Ok(value),
        }
    }

    pub fn construct(target: &JsValue, class: &str) -> Result<JsValue, JsValue> {
        let ctor: Function = get(target, class)
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("{class} is not a constructor")))?;
        Reflect::construct(&ctor, &Array::new())
    }

    /// Values of a JS `Map`, or the items of an array.
    pub fn collection_values(collection: &JsValue) -> Vec<JsValue> {
        if !present(collection) {
            return Vec::new();
        }
        if Array::is_array(collection) {
            return Array::from(collection).iter().collect();
        }
        match call(collection, "values", &[]) {
            Ok(iter) => Array::from(&iter).iter().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn error_name(err: &JsValue) -> String {
        string(err, "name").unwrap_or_default()
    }

    pub fn error_text(err: &JsValue) -> String {
        string(err, "message")
            .filter(|m| !m.is_empty())
            .or_else(|| err.as_string())
            .unwrap_or_else(|| format!("{err:?}"))
    }

    pub fn sdk_global() -> Option<JsValue> {
        let window = web_sys::window()?;
        Some(get(&window, SDK_GLOBAL)).filter(present)
    }

    pub fn probe(sdk: &JsValue) -> SdkProbe {
        let local_participant = get(&get(sdk, "LocalParticipant"), "prototype");
        SdkProbe {
            has_room_class: get(sdk, "Room").is_function(),
            has_participant_toggles: get(&local_participant, "setMicrophoneEnabled").is_function()
                && get(&local_participant, "setCameraEnabled").is_function(),
            has_connect_fn: get(sdk, "connect").is_function(),
            has_create_local_tracks: get(sdk, "createLocalTracks").is_function(),
        }
    }
}

#[cfg(feature = "hydrate")]
mod browser {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use async_trait::async_trait;
    use js_sys::{Array, Object, Reflect};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};

    use super::js::{self, call, call_async, get, present, string};
    use super::{LOCAL_PREVIEW_ID, REMOTE_ROOT_ID, disconnect_reason, media_failure};
    use crate::classroom::{
        ClassroomError, EventSink, RemoteTrack, RoomAdapter, RoomEvent, RoomSnapshot, TrackKind,
    };

    type Listener = Closure<dyn FnMut(JsValue, JsValue, JsValue)>;

    /// Inject the SDK bundle and wait for it to load.
    pub async fn load_script(src: &str) -> Result<(), ClassroomError> {
        let unavailable = |what: &str| ClassroomError::SdkUnavailable(what.to_owned());
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| unavailable("no document"))?;
        let script: web_sys::HtmlScriptElement = document
            .create_element("script")
            .map_err(|_| unavailable("could not create script element"))?
            .dyn_into()
            .map_err(|_| unavailable("could not create script element"))?;
        script.set_src(src);
        script.set_async(true);

        let (tx, rx) = futures::channel::oneshot::channel::<bool>();
        let tx = Rc::new(RefCell::new(Some(tx)));
        let settle = move |loaded: bool| {
            let tx = tx.clone();
            Closure::<dyn FnMut()>::new(move || {
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(loaded);
                }
            })
        };
        let on_load = settle(true);
        let on_error = settle(false);
        script.set_onload(Some(on_load.as_ref().unchecked_ref()));
        script.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        let head = document.head().ok_or_else(|| unavailable("no document head"))?;
        head.append_child(&script)
            .map_err(|_| unavailable("could not attach script"))?;

        let loaded = rx.await.unwrap_or(false);
        script.set_onload(None);
        script.set_onerror(None);
        if loaded { Ok(()) } else { Err(ClassroomError::SdkUnavailable(format!("failed to load {src}"))) }
    }

    /// Media elements the SDK attaches, keyed by participant identity.
    #[derive(Clone, Default)]
    struct Stage {
        containers: Rc<RefCell<HashMap<String, web_sys::Element>>>,
    }

    impl Stage {
        fn document() -> Option<web_sys::Document> {
            web_sys::window()?.document()
        }

        fn container(&self, identity: &str) -> Option<web_sys::Element> {
            let existing = self.containers.borrow().get(identity).cloned();
            if existing.is_some() {
                return existing;
            }
            let document = Self::document()?;
            let root = document.get_element_by_id(REMOTE_ROOT_ID)?;
            let element = document.create_element("div").ok()?;
            element.set_class_name("classroom-participant");
            let _ = element.set_attribute("data-identity", identity);
            root.append_child(&element).ok()?;
            self.containers.borrow_mut().insert(identity.to_owned(), element.clone());
            Some(element)
        }

        fn attach(&self, identity: &str, track: &JsValue) {
            let Some(container) = self.container(identity) else {
                return;
            };
            match call(track, "attach", &[]).map(|value| value.dyn_into::<web_sys::Node>()) {
                Ok(Ok(node)) => {
                    let _ = container.append_child(&node);
                }
                _ => leptos::logging::warn!("classroom: could not attach track for {identity}"),
            }
        }

        fn detach(track: &JsValue) {
            let Ok(elements) = call(track, "detach", &[]) else {
                return;
            };
            for element in js::collection_values(&elements) {
                if let Ok(element) = element.dyn_into::<web_sys::Element>() {
                    element.remove();
                }
            }
        }

        fn remove_participant(&self, identity: &str) {
            if let Some(element) = self.containers.borrow_mut().remove(identity) {
                element.remove();
            }
        }

        fn preview(track: &JsValue) {
            let Some(root) = Self::document().and_then(|d| d.get_element_by_id(LOCAL_PREVIEW_ID)) else {
                return;
            };
            if let Ok(Ok(node)) = call(track, "attach", &[]).map(|value| value.dyn_into::<web_sys::Node>()) {
                root.set_inner_html("");
                let _ = root.append_child(&node);
            }
        }

        fn clear(&self) {
            for (_, element) in self.containers.borrow_mut().drain() {
                element.remove();
            }
            if let Some(root) = Self::document().and_then(|d| d.get_element_by_id(LOCAL_PREVIEW_ID)) {
                root.set_inner_html("");
            }
        }
    }

    fn identity_of(participant: &JsValue) -> String {
        string(participant, "identity").unwrap_or_default()
    }

    fn remote_track(participant: &str, track: &JsValue, publication: &JsValue) -> Option<RemoteTrack> {
        let kind = string(track, "kind").and_then(|k| TrackKind::parse(&k))?;
        let sid = string(track, "sid")
            .or_else(|| string(publication, "trackSid"))
            .unwrap_or_default();
        Some(RemoteTrack { participant: participant.to_owned(), sid, kind })
    }

    /// Subscribe to the room events both SDK generations emit under the same
    /// names.
    fn wire_events(room: &JsValue, sink: &EventSink, stage: &Stage) -> Vec<Listener> {
        let mut listeners = Vec::new();
        let mut on = |event: &str, listener: Listener| {
            if let Err(err) = call(room, "on", &[JsValue::from_str(event), listener.as_ref().clone()]) {
                leptos::logging::warn!("classroom: could not subscribe to {event}: {}", js::error_text(&err));
            }
            listeners.push(listener);
        };

        let emit = sink.clone();
        on(
            "participantConnected",
            Closure::new(move |participant: JsValue, _: JsValue, _: JsValue| {
                emit(RoomEvent::ParticipantJoined { identity: identity_of(&participant) });
            }),
        );

        let (emit, stage_left) = (sink.clone(), stage.clone());
        on(
            "participantDisconnected",
            Closure::new(move |participant: JsValue, _: JsValue, _: JsValue| {
                let identity = identity_of(&participant);
                stage_left.remove_participant(&identity);
                emit(RoomEvent::ParticipantLeft { identity });
            }),
        );

        let (emit, stage_sub) = (sink.clone(), stage.clone());
        on(
            "trackSubscribed",
            Closure::new(move |track: JsValue, publication: JsValue, participant: JsValue| {
                let identity = identity_of(&participant);
                stage_sub.attach(&identity, &track);
                if let Some(remote) = remote_track(&identity, &track, &publication) {
                    emit(RoomEvent::TrackSubscribed(remote));
                }
            }),
        );

        let emit = sink.clone();
        on(
            "trackUnsubscribed",
            Closure::new(move |track: JsValue, publication: JsValue, participant: JsValue| {
                Stage::detach(&track);
                let sid = string(&track, "sid")
                    .or_else(|| string(&publication, "trackSid"))
                    .unwrap_or_default();
                emit(RoomEvent::TrackUnsubscribed { participant: identity_of(&participant), sid });
            }),
        );

        let emit = sink.clone();
        on(
            "disconnected",
            Closure::new(move |reason: JsValue, _: JsValue, _: JsValue| {
                emit(RoomEvent::Disconnected { reason: disconnect_reason(reason.as_f64(), reason.as_string()) });
            }),
        );

        listeners
    }

    /// Attach and report everyone already in the room.
    fn snapshot(room: &JsValue, stage: &Stage) -> RoomSnapshot {
        let mut snapshot = RoomSnapshot::default();
        let participants = js::first_present(room, &["remoteParticipants", "participants"]);
        for participant in js::collection_values(&participants) {
            let identity = identity_of(&participant);
            let publications = js::first_present(&participant, &["trackPublications", "tracks"]);
            for publication in js::collection_values(&publications) {
                let track = get(&publication, "track");
                if !present(&track) {
                    continue;
                }
                stage.attach(&identity, &track);
                if let Some(remote) = remote_track(&identity, &track, &publication) {
                    snapshot.tracks.push(remote);
                }
            }
            snapshot.participants.push(identity);
        }
        snapshot
    }

    fn connect_error(err: &JsValue) -> ClassroomError {
        ClassroomError::Connect(js::error_text(err))
    }

    fn media_error(err: &JsValue) -> ClassroomError {
        media_failure(&js::error_name(err), js::error_text(err))
    }

    fn teardown(room: &JsValue, listeners: &mut Vec<Listener>, stage: &Stage) {
        let _ = call(room, "removeAllListeners", &[]);
        listeners.clear();
        stage.clear();
    }

    // =========================================================================
    // Modern SDK
    // =========================================================================

    pub struct ModernRoom {
        sdk: JsValue,
        room: Option<JsValue>,
        listeners: Vec<Listener>,
        stage: Stage,
    }

    impl ModernRoom {
        pub fn new(sdk: JsValue) -> Self {
            Self { sdk, room: None, listeners: Vec::new(), stage: Stage::default() }
        }

        fn local_participant(&self) -> Result<JsValue, ClassroomError> {
            self.room
                .as_ref()
                .map(|room| get(room, "localParticipant"))
                .filter(present)
                .ok_or(ClassroomError::NotConnected)
        }

        async fn switch(&self, method: &str, enabled: bool) -> Result<JsValue, ClassroomError> {
            let participant = self.local_participant()?;
            call_async(&participant, method, &[JsValue::from_bool(enabled)])
                .await
                .map_err(|err| media_error(&err))
        }
    }

    #[async_trait(?Send)]
    impl RoomAdapter for ModernRoom {
        async fn connect(&mut self, url: &str, token: &str, sink: EventSink) -> Result<RoomSnapshot, ClassroomError> {
            let room = js::construct(&self.sdk, "Room").map_err(|err| connect_error(&err))?;
            self.listeners = wire_events(&room, &sink, &self.stage);
            if let Err(err) = call_async(&room, "connect", &[JsValue::from_str(url), JsValue::from_str(token)]).await {
                teardown(&room, &mut self.listeners, &self.stage);
                return Err(connect_error(&err));
            }
            let snapshot = snapshot(&room, &self.stage);
            self.room = Some(room);
            Ok(snapshot)
        }

        async fn publish_local_media(&mut self) -> Result<(), ClassroomError> {
            self.switch("setMicrophoneEnabled", true).await?;
            let publication = self.switch("setCameraEnabled", true).await?;
            let track = get(&publication, "track");
            if present(&track) {
                Stage::preview(&track);
            }
            Ok(())
        }

        async fn set_microphone(&mut self, enabled: bool) -> Result<(), ClassroomError> {
            self.switch("setMicrophoneEnabled", enabled).await.map(drop)
        }

        async fn set_camera(&mut self, enabled: bool) -> Result<(), ClassroomError> {
            self.switch("setCameraEnabled", enabled).await.map(drop)
        }

        async fn set_screen_share(&mut self, enabled: bool) -> Result<(), ClassroomError> {
            self.switch("setScreenShareEnabled", enabled).await.map(drop)
        }

        fn stop_local_tracks(&mut self) {
            let Ok(participant) = self.local_participant() else {
                return;
            };
            let publications = js::first_present(&participant, &["trackPublications", "tracks"]);
            for publication in js::collection_values(&publications) {
                let track = get(&publication, "track");
                if present(&track) {
                    let _ = call(&track, "stop", &[]);
                }
            }
        }

        async fn disconnect(&mut self) {
            let Some(room) = self.room.take() else {
                return;
            };
            if let Err(err) = call_async(&room, "disconnect", &[]).await {
                leptos::logging::warn!("classroom: disconnect failed: {}", js::error_text(&err));
            }
            teardown(&room, &mut self.listeners, &self.stage);
        }
    }

    // =========================================================================
    // Legacy SDK
    // =========================================================================

    pub struct LegacyRoom {
        sdk: JsValue,
        room: Option<JsValue>,
        local_tracks: Vec<JsValue>,
        screen_tracks: Vec<JsValue>,
        listeners: Vec<Listener>,
        stage: Stage,
    }

    impl LegacyRoom {
        pub fn new(sdk: JsValue) -> Self {
            Self {
                sdk,
                room: None,
                local_tracks: Vec::new(),
                screen_tracks: Vec::new(),
                listeners: Vec::new(),
                stage: Stage::default(),
            }
        }

        fn local_participant(&self) -> Result<JsValue, ClassroomError> {
            self.room
                .as_ref()
                .map(|room| get(room, "localParticipant"))
                .filter(present)
                .ok_or(ClassroomError::NotConnected)
        }

        async fn publish(&self, tracks: &[JsValue]) -> Result<(), ClassroomError> {
            let participant = self.local_participant()?;
            for track in tracks {
                call_async(&participant, "publishTrack", &[track.clone()])
                    .await
                    .map_err(|err| ClassroomError::Publish(js::error_text(&err)))?;
            }
            Ok(())
        }

        async fn mute_kind(&self, kind: &str, enabled: bool) -> Result<(), ClassroomError> {
            let method = if enabled { "unmute" } else { "mute" };
            for track in self.local_tracks.iter().filter(|t| string(t, "kind").as_deref() == Some(kind)) {
                call_async(track, method, &[]).await.map_err(|err| media_error(&err))?;
            }
            Ok(())
        }
    }

    #[async_trait(?Send)]
    impl RoomAdapter for LegacyRoom {
        async fn connect(&mut self, url: &str, token: &str, sink: EventSink) -> Result<RoomSnapshot, ClassroomError> {
            let room = call_async(&self.sdk, "connect", &[JsValue::from_str(url), JsValue::from_str(token)])
                .await
                .map_err(|err| connect_error(&err))?;
            self.listeners = wire_events(&room, &sink, &self.stage);
            let snapshot = snapshot(&room, &self.stage);
            self.room = Some(room);
            Ok(snapshot)
        }

        async fn publish_local_media(&mut self) -> Result<(), ClassroomError> {
            let options = Object::new();
            let _ = Reflect::set(&options, &JsValue::from_str("audio"), &JsValue::TRUE);
            let _ = Reflect::set(&options, &JsValue::from_str("video"), &JsValue::TRUE);
            let created = call_async(&self.sdk, "createLocalTracks", &[options.into()])
                .await
                .map_err(|err| media_error(&err))?;
            self.local_tracks = Array::from(&created).iter().collect();

            if let Some(video) = self.local_tracks.iter().find(|t| string(t, "kind").as_deref() == Some("video")) {
                Stage::preview(video);
            }
            self.publish(&self.local_tracks).await
        }

        async fn set_microphone(&mut self, enabled: bool) -> Result<(), ClassroomError> {
            self.mute_kind("audio", enabled).await
        }

        async fn set_camera(&mut self, enabled: bool) -> Result<(), ClassroomError> {
            self.mute_kind("video", enabled).await
        }

        async fn set_screen_share(&mut self, enabled: bool) -> Result<(), ClassroomError> {
            if enabled {
                let created = call_async(&self.sdk, "createLocalScreenTracks", &[])
                    .await
                    .map_err(|err| media_error(&err))?;
                let tracks: Vec<JsValue> = Array::from(&created).iter().collect();
                self.publish(&tracks).await?;
                self.screen_tracks.extend(tracks);
            } else {
                let participant = self.local_participant()?;
                for track in self.screen_tracks.drain(..) {
                    let _ = call(&participant, "unpublishTrack", &[track.clone()]);
                    let _ = call(&track, "stop", &[]);
                }
            }
            Ok(())
        }

        fn stop_local_tracks(&mut self) {
            for track in self.local_tracks.drain(..).chain(self.screen_tracks.drain(..)) {
                let _ = call(&track, "stop", &[]);
            }
        }

        async fn disconnect(&mut self) {
            let Some(room) = self.room.take() else {
                return;
            };
            if let Err(err) = call_async(&room, "disconnect", &[]).await {
                leptos::logging::warn!("classroom: disconnect failed: {}", js::error_text(&err));
            }
            teardown(&room, &mut self.listeners, &self.stage);
        }
    }
}
