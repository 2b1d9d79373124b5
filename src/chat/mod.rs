//! Chat widgets.
//!
//! Both variants share one contract: the user's entry is appended as soon as
//! it is sent, at most one request is in flight, and exactly one assistant
//! entry follows every accepted send, whatever the backend does.

use crate::backend::{ Assistant, Backend };
use crate::error::ErrorKind;
use crate::geo::{ locate_within, Geolocator };
use crate::models::api::AssistantRequest;
use crate::models::chat::ChatMessage;
use crate::models::place::Coordinates;
use log::{ debug, error, info, warn };
use std::sync::{ Arc, Mutex, MutexGuard, PoisonError };
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatVariant {
    /// Inline assistant on the citizen dashboard.
    Citizen,
    /// Floating wellness-tips bubble on the landing page.
    Landing,
}

impl ChatVariant {
    pub fn assistant(&self) -> Assistant {
        match self {
            ChatVariant::Citizen => Assistant::Citizen,
            ChatVariant::Landing => Assistant::Landing,
        }
    }

    /// Persona text appended in place of a reply that never came.
    pub fn fallback_reply(&self, kind: ErrorKind) -> &'static str {
        match (self, kind) {
            (ChatVariant::Citizen, ErrorKind::BackendRejected) =>
                "I'm having trouble processing your request. Please try again or consult a healthcare provider directly.",
            (ChatVariant::Citizen, _) =>
                "I'm currently unavailable. Please try again later or contact a healthcare provider for urgent concerns.",
            (ChatVariant::Landing, _) =>
                "Hi! I'm here to help with quick wellness tips. Try asking about sleep, stress, or healthy habits!",
        }
    }

    pub fn greeting(&self) -> &'static str {
        match self {
            ChatVariant::Citizen =>
                "Ask me about your health concerns and get comprehensive, weather-aware guidance with diet plans, wellness tips, and more.",
            ChatVariant::Landing =>
                "Hi! Ask me for quick wellness tips like \"reduce stress\" or \"better sleep\"",
        }
    }

    pub fn thinking_text(&self) -> &'static str {
        match self {
            ChatVariant::Citizen =>
                "Analyzing your health concern and current weather conditions...",
            ChatVariant::Landing => "Thinking...",
        }
    }

    pub fn disclaimer(&self) -> Option<&'static str> {
        match self {
            ChatVariant::Citizen =>
                Some(
                    "This provides general wellness guidance only. Always consult healthcare professionals for medical advice."
                ),
            ChatVariant::Landing => None,
        }
    }

    /// Whether an empty send raises a blocking alert or is silently ignored.
    pub fn alerts_on_empty(&self) -> bool {
        matches!(self, ChatVariant::Citizen)
    }

    pub fn renders_markdown(&self) -> bool {
        matches!(self, ChatVariant::Citizen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The backend answered and its text was appended.
    Replied,
    /// The call failed; the variant's fallback text was appended.
    FellBack(ErrorKind),
    /// Nothing was appended and no call was made.
    Rejected(ErrorKind),
    /// Another request is still pending; nothing was appended.
    Busy,
    /// The widget was unmounted before the reply settled.
    Discarded,
}

/// Where a send takes its coordinates from.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LocationMode {
    /// Looked up once at mount, unbounded, then reused.
    Snapshot,
    /// Looked up on every send, bounded by the given timeout.
    PerSend(Duration),
}

#[derive(Debug, Default)]
struct ChatState {
    history: Vec<ChatMessage>,
    pending: bool,
    mounted: bool,
    location: Option<Coordinates>,
    location_notice: Option<ErrorKind>,
}

#[derive(Clone)]
pub struct ChatWidget {
    id: Uuid,
    variant: ChatVariant,
    location_mode: LocationMode,
    backend: Arc<dyn Backend>,
    geolocator: Arc<dyn Geolocator>,
    state: Arc<Mutex<ChatState>>,
}

impl ChatWidget {
    pub fn citizen(backend: Arc<dyn Backend>, geolocator: Arc<dyn Geolocator>) -> Self {
        Self::new(ChatVariant::Citizen, LocationMode::Snapshot, backend, geolocator)
    }

    pub fn landing(
        backend: Arc<dyn Backend>,
        geolocator: Arc<dyn Geolocator>,
        location_timeout: Duration
    ) -> Self {
        Self::new(ChatVariant::Landing, LocationMode::PerSend(location_timeout), backend, geolocator)
    }

    fn new(
        variant: ChatVariant,
        location_mode: LocationMode,
        backend: Arc<dyn Backend>,
        geolocator: Arc<dyn Geolocator>
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            variant,
            location_mode,
            backend,
            geolocator,
            state: Arc::new(
                Mutex::new(ChatState {
                    mounted: true,
                    ..ChatState::default()
                })
            ),
        }
    }

    fn state(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the one location snapshot a citizen widget sends with. The
    /// landing widget looks up per send instead, so this is a no-op for it.
    pub async fn mount(&self) {
        if self.location_mode != LocationMode::Snapshot {
            return;
        }
        let located = self.geolocator.current_position().await;
        let mut state = self.state();
        if !state.mounted {
            return;
        }
        match located {
            Ok(coords) => {
                info!("Chat {} ({:?}): location detected {}", self.id, self.variant, coords);
                state.location = Some(coords);
                state.location_notice = None;
            }
            Err(e) => {
                warn!("Chat {} ({:?}): geolocation error: {}", self.id, self.variant, e);
                state.location_notice = Some(e.kind());
            }
        }
    }

    pub fn unmount(&self) {
        let mut state = self.state();
        state.mounted = false;
        state.pending = false;
        state.history.clear();
    }

    pub async fn send_message(&self, text: &str) -> SendOutcome {
        match self.begin(text) {
            Ok(pending) => pending.finish().await,
            Err(outcome) => outcome,
        }
    }

    /// Accepts a send without awaiting anything: on success the user entry is
    /// already in the history and the widget is pending until the returned
    /// `PendingSend` finishes. Refusals come back as the outcome to report.
    pub fn begin(&self, text: &str) -> Result<PendingSend, SendOutcome> {
        if text.trim().is_empty() {
            debug!("Chat {}: empty message rejected", self.id);
            return Err(SendOutcome::Rejected(ErrorKind::EmptyMessage));
        }

        let mut state = self.state();
        if !state.mounted {
            return Err(SendOutcome::Discarded);
        }
        if state.pending {
            return Err(SendOutcome::Busy);
        }
        state.history.push(self.stamp(ChatMessage::user(text)));
        state.pending = true;
        Ok(PendingSend {
            widget: self.clone(),
            text: text.to_string(),
            snapshot: state.location,
        })
    }

    async fn complete(&self, text: String, snapshot: Option<Coordinates>) -> SendOutcome {
        let coords = match self.location_mode {
            LocationMode::Snapshot => snapshot,
            LocationMode::PerSend(limit) =>
                match locate_within(self.geolocator.as_ref(), limit).await {
                    Ok(coords) => Some(coords),
                    Err(e) => {
                        info!("Chat {}: location not available ({})", self.id, e);
                        None
                    }
                }
        };

        let request = AssistantRequest {
            message: text,
            lat: coords.map(|c| c.latitude).unwrap_or(0.0),
            lon: coords.map(|c| c.longitude).unwrap_or(0.0),
        };
        info!("Chat {}: sending message to {} assistant", self.id, self.variant.assistant());

        let (entry, outcome) = match
            self.backend.ask(self.variant.assistant(), &request).await
        {
            Ok(reply) => (ChatMessage::assistant(reply), SendOutcome::Replied),
            Err(e) => {
                error!("Chat {}: assistant call failed: {}", self.id, e);
                let kind = e.kind();
                (ChatMessage::assistant(self.variant.fallback_reply(kind)), SendOutcome::FellBack(kind))
            }
        };

        let mut state = self.state();
        if !state.mounted {
            debug!("Chat {}: reply arrived after unmount, dropped", self.id);
            return SendOutcome::Discarded;
        }
        state.history.push(self.stamp(entry));
        state.pending = false;
        outcome
    }

    fn stamp(&self, message: ChatMessage) -> ChatMessage {
        match self.variant {
            ChatVariant::Citizen => message,
            ChatVariant::Landing => message.untimed(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn variant(&self) -> ChatVariant {
        self.variant
    }

    pub fn history(&self) -> Vec<ChatMessage> {
        self.state().history.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.state().pending
    }

    /// The text field accepts input only while nothing is in flight.
    pub fn is_input_enabled(&self) -> bool {
        let state = self.state();
        state.mounted && !state.pending
    }

    /// The send button additionally needs a non-blank draft.
    pub fn can_send(&self, draft: &str) -> bool {
        self.is_input_enabled() && !draft.trim().is_empty()
    }

    pub fn location(&self) -> Option<Coordinates> {
        self.state().location
    }

    pub fn location_notice(&self) -> Option<ErrorKind> {
        self.state().location_notice
    }

    /// Banner shown above the conversation when the mount lookup failed.
    pub fn location_notice_text(&self) -> Option<&'static str> {
        self.location_notice().map(|kind| match kind {
            ErrorKind::LocationDenied => "Location access denied. Health advice may be limited.",
            _ => "Unable to get your location. Health advice may be limited.",
        })
    }
}

/// An accepted send whose reply has not settled yet. Owns everything it
/// needs, so it can be moved onto its own task.
pub struct PendingSend {
    widget: ChatWidget,
    text: String,
    snapshot: Option<Coordinates>,
}

impl PendingSend {
    pub async fn finish(self) -> SendOutcome {
        self.widget.complete(self.text, self.snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::{ FakeBackend, Scripted };
    use crate::geo::FixedGeolocator;
    use crate::models::chat::ChatRole;

    fn citizen_with(backend: Arc<FakeBackend>, geo: FixedGeolocator) -> ChatWidget {
        ChatWidget::citizen(backend, Arc::new(geo))
    }

    #[tokio::test]
    async fn each_send_appends_one_user_then_one_assistant_entry() {
        let backend = Arc::new(FakeBackend::default());
        backend.queue_reply(Scripted::Ok("## Rest\n- drink water".into())).await;
        backend.queue_reply(Scripted::Rejected("model error".into())).await;
        backend.queue_reply(Scripted::Unreachable).await;
        let chat = citizen_with(backend.clone(), FixedGeolocator::at(12.34, 56.78));
        chat.mount().await;

        assert_eq!(chat.send_message("headache").await, SendOutcome::Replied);
        assert_eq!(
            chat.send_message("fever").await,
            SendOutcome::FellBack(ErrorKind::BackendRejected)
        );
        assert_eq!(
            chat.send_message("cough").await,
            SendOutcome::FellBack(ErrorKind::BackendUnavailable)
        );

        let history = chat.history();
        assert_eq!(history.len(), 6);
        for (i, pair) in history.chunks(2).enumerate() {
            assert_eq!(pair[0].role, ChatRole::User, "entry {} should be the user", i * 2);
            assert_eq!(pair[1].role, ChatRole::Assistant);
        }
        assert_eq!(history[0].content, "headache");
        assert_eq!(history[1].content, "## Rest\n- drink water");
        assert_eq!(
            history[3].content,
            ChatVariant::Citizen.fallback_reply(ErrorKind::BackendRejected)
        );
        assert_eq!(
            history[5].content,
            ChatVariant::Citizen.fallback_reply(ErrorKind::BackendUnavailable)
        );
        assert!(history.iter().all(|m| m.timestamp.is_some()));
        assert!(chat.is_input_enabled());
    }

    #[tokio::test]
    async fn blank_text_appends_nothing_and_calls_nothing() {
        let backend = Arc::new(FakeBackend::default());
        let chat = citizen_with(backend.clone(), FixedGeolocator::at(1.0, 2.0));

        assert_eq!(chat.send_message("").await, SendOutcome::Rejected(ErrorKind::EmptyMessage));
        assert_eq!(
            chat.send_message("  \t\n").await,
            SendOutcome::Rejected(ErrorKind::EmptyMessage)
        );
        assert!(chat.history().is_empty());
        assert_eq!(FakeBackend::calls(&backend.ask_calls), 0);
        assert!(!chat.can_send("   "));
    }

    #[tokio::test]
    async fn input_is_disabled_while_a_request_is_outstanding() {
        for scripted in [Scripted::Ok("fine".to_string()), Scripted::Unreachable] {
            let (backend, gate) = FakeBackend::gated();
            let backend = Arc::new(backend);
            backend.queue_reply(scripted).await;
            let chat = citizen_with(backend.clone(), FixedGeolocator::at(1.0, 2.0));

            let sending = tokio::spawn({
                let chat = chat.clone();
                async move { chat.send_message("am I ok?").await }
            });
            backend.arrived.notified().await;

            assert!(chat.is_pending());
            assert!(!chat.is_input_enabled());
            assert_eq!(chat.history().len(), 1, "user entry is appended before the reply");
            assert_eq!(chat.send_message("second").await, SendOutcome::Busy);
            assert_eq!(chat.history().len(), 1);

            gate.add_permits(1);
            sending.await.unwrap();
            assert!(chat.is_input_enabled());
            assert_eq!(chat.history().len(), 2);
            assert_eq!(FakeBackend::calls(&backend.ask_calls), 1);
        }
    }

    #[tokio::test]
    async fn citizen_sends_its_mount_snapshot_and_zeros_without_one() {
        let backend = Arc::new(FakeBackend::default());
        let geo = Arc::new(FixedGeolocator::at(12.34, 56.78));
        let chat = ChatWidget::citizen(backend.clone(), geo.clone());
        chat.mount().await;
        chat.send_message("one").await;
        chat.send_message("two").await;
        assert_eq!(geo.lookup_count(), 1);

        let denied = citizen_with(backend.clone(), FixedGeolocator::denied());
        denied.mount().await;
        assert_eq!(denied.location_notice(), Some(ErrorKind::LocationDenied));
        assert_eq!(
            denied.location_notice_text(),
            Some("Location access denied. Health advice may be limited.")
        );
        denied.send_message("three").await;

        let asked = backend.asked.lock().await;
        assert_eq!(asked[0].0, Assistant::Citizen);
        assert_eq!((asked[1].1.lat, asked[1].1.lon), (12.34, 56.78));
        assert_eq!((asked[2].1.lat, asked[2].1.lon), (0.0, 0.0));
    }

    #[tokio::test]
    async fn landing_locates_per_send_and_gives_up_after_its_timeout() {
        let backend = Arc::new(FakeBackend::default());
        backend.queue_reply(Scripted::Rejected("down".into())).await;
        let slow = FixedGeolocator::at(5.0, 6.0).with_delay(Duration::from_millis(300));
        let chat = ChatWidget::landing(backend.clone(), Arc::new(slow), Duration::from_millis(20));
        chat.mount().await;

        assert_eq!(
            chat.send_message("sleep tips").await,
            SendOutcome::FellBack(ErrorKind::BackendRejected)
        );
        let history = chat.history();
        assert_eq!(history[1].content, ChatVariant::Landing.fallback_reply(ErrorKind::BackendRejected));
        assert!(history.iter().all(|m| m.timestamp.is_none()));

        let asked = backend.asked.lock().await;
        assert_eq!(asked[0].0, Assistant::Landing);
        assert_eq!((asked[0].1.lat, asked[0].1.lon), (0.0, 0.0));
    }

    #[tokio::test]
    async fn landing_uses_a_prompt_position() {
        let backend = Arc::new(FakeBackend::default());
        let geo = Arc::new(FixedGeolocator::at(5.0, 6.0));
        let chat = ChatWidget::landing(backend.clone(), geo.clone(), Duration::from_secs(3));
        chat.send_message("a").await;
        chat.send_message("b").await;
        assert_eq!(geo.lookup_count(), 2);
        assert_eq!(backend.asked.lock().await[1].1.lat, 5.0);
    }

    #[tokio::test]
    async fn begin_records_the_question_before_the_reply_is_awaited() {
        let backend = Arc::new(FakeBackend::default());
        let chat = citizen_with(backend.clone(), FixedGeolocator::at(1.0, 2.0));

        let pending = chat.begin("dizzy after running").unwrap();
        assert!(chat.is_pending());
        assert!(!chat.can_send("another"));
        assert_eq!(chat.history().len(), 1);
        assert_eq!(chat.begin("another").err(), Some(SendOutcome::Busy));
        assert_eq!(FakeBackend::calls(&backend.ask_calls), 0);

        assert_eq!(pending.finish().await, SendOutcome::Replied);
        assert_eq!(chat.history()[1].content, "echo: dizzy after running");
        assert!(chat.is_input_enabled());
    }

    #[tokio::test]
    async fn unavailable_position_gets_its_own_notice() {
        let backend = Arc::new(FakeBackend::default());
        let chat = citizen_with(
            backend,
            FixedGeolocator::new(crate::geo::LocationSource::Unavailable)
        );
        chat.mount().await;
        assert_eq!(
            chat.location_notice_text(),
            Some("Unable to get your location. Health advice may be limited.")
        );
    }

    #[tokio::test]
    async fn reply_after_unmount_is_dropped() {
        let (backend, gate) = FakeBackend::gated();
        let backend = Arc::new(backend);
        let chat = citizen_with(backend.clone(), FixedGeolocator::at(1.0, 2.0));

        let sending = tokio::spawn({
            let chat = chat.clone();
            async move { chat.send_message("hello").await }
        });
        backend.arrived.notified().await;
        chat.unmount();
        gate.add_permits(1);

        assert_eq!(sending.await.unwrap(), SendOutcome::Discarded);
        assert!(chat.history().is_empty());
        assert_eq!(chat.send_message("again").await, SendOutcome::Discarded);
    }
}
