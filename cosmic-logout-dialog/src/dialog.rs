// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use clap::ValueEnum;
use cosmic_logout_dialog_config::Settings;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::AbortHandle,
    time::{self, Instant, MissedTickBehavior},
};
use zbus::Connection;

use crate::{
    accounts::UserNames,
    backend::{Backend, SessionBackend},
    capabilities::Capabilities,
    countdown::{Countdown, Tick},
    display_manager::DisplayManager,
    fl,
    response::Response,
};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialogKind {
    Logout,
    Shutdown,
}

impl DialogKind {
    pub fn icon_name(self) -> &'static str {
        match self {
            DialogKind::Logout => "system-log-out",
            DialogKind::Shutdown => "system-shutdown",
        }
    }

    pub fn default_response(self) -> Response {
        match self {
            DialogKind::Logout => Response::Logout,
            DialogKind::Shutdown => Response::Shutdown,
        }
    }

    fn primary_text(self) -> String {
        match self {
            DialogKind::Logout => fl!("log-out-prompt"),
            DialogKind::Shutdown => fl!("shut-down-prompt"),
        }
    }

    fn countdown_warning(self, seconds: u32) -> String {
        match self {
            DialogKind::Logout => fl!("logout-countdown", seconds = seconds),
            DialogKind::Shutdown => fl!("shutdown-countdown", seconds = seconds),
        }
    }

    /// Buttons in display order, gated on what the session supports.
    fn buttons(self, capabilities: &Capabilities) -> Vec<DialogButton> {
        let mut buttons = Vec::with_capacity(5);
        match self {
            DialogKind::Logout => {
                if capabilities.switch_user {
                    buttons.push(DialogButton::new(
                        fl!("switch-user"),
                        "system-users",
                        Response::SwitchUser,
                    ));
                }
                buttons.push(DialogButton::cancel());
                buttons.push(DialogButton::new(
                    fl!("log-out"),
                    "system-log-out",
                    Response::Logout,
                ));
            }
            DialogKind::Shutdown => {
                if capabilities.suspend {
                    buttons.push(DialogButton::new(
                        fl!("suspend"),
                        "battery",
                        Response::Suspend,
                    ));
                }
                if capabilities.hibernate {
                    buttons.push(DialogButton::new(
                        fl!("hibernate"),
                        "drive-harddisk",
                        Response::Hibernate,
                    ));
                }
                if capabilities.reboot {
                    buttons.push(DialogButton::new(
                        fl!("restart"),
                        "view-refresh",
                        Response::Reboot,
                    ));
                }
                buttons.push(DialogButton::cancel());
                if capabilities.shutdown {
                    buttons.push(DialogButton::new(
                        fl!("shut-down"),
                        "system-shutdown",
                        Response::Shutdown,
                    ));
                }
            }
        }
        buttons
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogButton {
    /// Label with an `_` in front of its mnemonic character.
    pub label: String,
    pub icon_name: &'static str,
    pub response: Response,
}

impl DialogButton {
    fn new(label: String, icon_name: &'static str, response: Response) -> Self {
        Self {
            label,
            icon_name,
            response,
        }
    }

    fn cancel() -> Self {
        Self::new(fl!("cancel"), "process-stop", Response::Cancel)
    }

    pub fn mnemonic(&self) -> Option<char> {
        let (_, rest) = self.label.split_once('_')?;
        rest.chars().next().map(|c| c.to_ascii_lowercase())
    }

    pub fn text(&self) -> String {
        self.label.replacen('_', "", 1)
    }
}

/// Who is looking at the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIdentity {
    User(UserNames),
    LoginWindow,
}

impl SessionIdentity {
    /// Asks the backend whether this is a greeter. The user's names are only
    /// looked up for ordinary sessions, and a failed query counts as one.
    pub async fn detect<B: SessionBackend>(
        backend: &B,
        user: impl Future<Output = UserNames>,
    ) -> Self {
        match backend.is_login_window().await {
            Ok(true) => SessionIdentity::LoginWindow,
            Ok(false) => SessionIdentity::User(user.await),
            Err(why) => {
                tracing::warn!("failed to get the current session type: {why}");
                SessionIdentity::User(user.await)
            }
        }
    }
}

/// Where and when the dialog was requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub screen: Option<String>,
    pub activate_time: u32,
}

/// Facts about the running session a dialog is built from.
#[derive(Debug, Clone)]
pub struct SessionContext<B = Backend> {
    pub backend: B,
    pub capabilities: Capabilities,
    pub identity: SessionIdentity,
    pub logout_timeout: i32,
}

impl SessionContext<Backend> {
    /// Selects the session backend and asks it everything the dialog needs.
    pub async fn gather(system: &Connection, settings: &Settings) -> zbus::Result<Self> {
        let backend = Backend::detect(system).await?;
        tracing::debug!("using {} session backend", backend.name());

        let display_manager = DisplayManager::new(&settings.dialog.display_manager_socket);
        let capabilities =
            Capabilities::query(&backend, &settings.lockdown, &display_manager).await;

        let identity = SessionIdentity::detect(&backend, UserNames::lookup(system)).await;

        Ok(Self {
            backend,
            capabilities,
            identity,
            logout_timeout: settings.dialog.logout_timeout,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// One second of the countdown has passed.
    Tick,
    /// A button was pressed.
    Respond(Response),
    /// The default button was activated.
    Activate,
}

pub struct LogoutDialog<B = Backend> {
    kind: DialogKind,
    backend: Option<B>,
    identity: SessionIdentity,
    placement: Placement,
    buttons: Vec<DialogButton>,
    default_response: Response,

    primary_text: String,
    secondary_text: String,
    progress_text: String,
    progress: Option<f32>,

    timeout: i32,
    countdown: Option<Countdown>,
    seconds_left: Option<u32>,
    timer: Option<AbortHandle>,

    events_tx: UnboundedSender<Event>,
    events_rx: UnboundedReceiver<Event>,
    response: Option<Response>,
    destroyed: bool,
}

impl<B> LogoutDialog<B> {
    pub fn logout(session: SessionContext<B>, placement: Placement) -> Self {
        Self::new(DialogKind::Logout, session, placement)
    }

    pub fn shutdown(session: SessionContext<B>, placement: Placement) -> Self {
        Self::new(DialogKind::Shutdown, session, placement)
    }

    pub fn new(kind: DialogKind, session: SessionContext<B>, placement: Placement) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let secondary_text = match &session.identity {
            SessionIdentity::User(names) => fl!("logged-in-as", name = names.display_name()),
            SessionIdentity::LoginWindow => String::new(),
        };

        Self {
            kind,
            backend: Some(session.backend),
            buttons: kind.buttons(&session.capabilities),
            identity: session.identity,
            placement,
            default_response: kind.default_response(),
            primary_text: kind.primary_text(),
            secondary_text,
            progress_text: String::new(),
            progress: Some(1.0),
            timeout: session.logout_timeout,
            countdown: None,
            seconds_left: None,
            timer: None,
            events_tx,
            events_rx,
            response: None,
            destroyed: false,
        }
    }

    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    pub fn icon_name(&self) -> &'static str {
        self.kind.icon_name()
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn buttons(&self) -> &[DialogButton] {
        &self.buttons
    }

    pub fn offers(&self, response: Response) -> bool {
        self.buttons.iter().any(|b| b.response == response)
    }

    pub fn default_response(&self) -> Response {
        self.default_response
    }

    pub fn primary_text(&self) -> &str {
        &self.primary_text
    }

    pub fn secondary_text(&self) -> &str {
        &self.secondary_text
    }

    pub fn progress_text(&self) -> &str {
        &self.progress_text
    }

    /// Fraction of the countdown left, or `None` when the progress bar is
    /// hidden.
    pub fn progress(&self) -> Option<f32> {
        self.progress
    }

    /// Seconds shown by the last countdown update.
    pub fn seconds_left(&self) -> Option<u32> {
        self.seconds_left
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn response(&self) -> Option<Response> {
        self.response
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Handle for front ends to feed button presses into the dialog.
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.events_tx.clone()
    }

    /// Starts the countdown. Must be called from within a Tokio runtime
    /// when the timeout is positive.
    pub fn show(&mut self) {
        if self.destroyed {
            return;
        }

        self.cancel_timer();
        self.countdown = Countdown::new(self.timeout);

        if self.countdown.is_some() {
            // fills in the labels before the first second has passed
            let _ = self.advance();
            self.timer = Some(spawn_timer(self.events_tx.clone()));
        } else {
            self.progress = None;
            self.seconds_left = None;
        }
    }

    pub async fn next_event(&mut self) -> Option<Event> {
        self.events_rx.recv().await
    }

    /// Applies an event, returning the dialog's answer once it has one.
    pub fn update(&mut self, event: Event) -> Option<Response> {
        if self.destroyed || self.response.is_some() {
            return None;
        }

        let response = match event {
            Event::Tick => self.advance(),
            Event::Activate if self.offers(self.default_response) => {
                Some(self.default_response)
            }
            Event::Activate => {
                tracing::debug!("no {} button to activate", self.default_response);
                None
            }
            Event::Respond(response) if self.offers(response) => Some(response),
            Event::Respond(response) => {
                tracing::debug!("ignoring {response}, the dialog does not offer it");
                None
            }
        };

        if let Some(response) = response {
            tracing::info!("{:?} dialog answered {response}", self.kind);
            self.cancel_timer();
            self.response = Some(response);
        }

        response
    }

    /// Tears the dialog down, cancelling the timer and releasing the
    /// backend. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }

        self.cancel_timer();
        self.backend = None;
        self.destroyed = true;
        tracing::debug!("{:?} dialog destroyed", self.kind);
    }

    fn advance(&mut self) -> Option<Response> {
        let countdown = self.countdown.as_mut()?;

        match countdown.tick() {
            Tick::Expired => Some(self.default_response),
            Tick::Remaining(seconds) => {
                let warning = self.kind.countdown_warning(seconds);
                self.progress = Some(countdown.fraction(seconds));
                self.seconds_left = Some(seconds);
                self.secondary_text = match &self.identity {
                    SessionIdentity::User(names) => {
                        fl!("logged-in-as", name = names.display_name())
                    }
                    SessionIdentity::LoginWindow => warning.clone(),
                };
                self.progress_text = warning;
                None
            }
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl<B> Drop for LogoutDialog<B> {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

fn spawn_timer(events: UnboundedSender<Event>) -> AbortHandle {
    tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            if events.send(Event::Tick).is_err() {
                break;
            }
        }
    })
    .abort_handle()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;

    pub(crate) fn session(capabilities: Capabilities, timeout: i32) -> SessionContext<FakeBackend> {
        SessionContext {
            backend: FakeBackend::capable(),
            capabilities,
            identity: SessionIdentity::User(ada()),
            logout_timeout: timeout,
        }
    }

    fn responses<B>(dialog: &LogoutDialog<B>) -> Vec<Response> {
        dialog.buttons().iter().map(|b| b.response).collect()
    }

    #[test]
    fn logout_dialog_layout() {
        let dialog = LogoutDialog::logout(session(Capabilities::ALL, 60), Placement::default());
        assert_eq!(dialog.icon_name(), "system-log-out");
        assert_eq!(dialog.primary_text(), "Log out of this system now?");
        assert_eq!(dialog.default_response(), Response::Logout);
        assert_eq!(
            responses(&dialog),
            [Response::SwitchUser, Response::Cancel, Response::Logout]
        );
        assert_eq!(
            dialog.secondary_text(),
            "You are currently logged in as \"Ada Lovelace\"."
        );
    }

    #[test]
    fn shutdown_dialog_layout() {
        let dialog = LogoutDialog::shutdown(session(Capabilities::ALL, 60), Placement::default());
        assert_eq!(dialog.icon_name(), "system-shutdown");
        assert_eq!(dialog.primary_text(), "Shut down this system now?");
        assert_eq!(dialog.default_response(), Response::Shutdown);
        assert_eq!(
            responses(&dialog),
            [
                Response::Suspend,
                Response::Hibernate,
                Response::Reboot,
                Response::Cancel,
                Response::Shutdown
            ]
        );
    }

    fn without(response: Response) -> Capabilities {
        let mut capabilities = Capabilities::ALL;
        match response {
            Response::SwitchUser => capabilities.switch_user = false,
            Response::Suspend => capabilities.suspend = false,
            Response::Hibernate => capabilities.hibernate = false,
            Response::Reboot => capabilities.reboot = false,
            Response::Shutdown => capabilities.shutdown = false,
            other => panic!("{other} is not gated"),
        }
        capabilities
    }

    #[test]
    fn each_capability_gates_exactly_its_button() {
        let cases = [
            Response::SwitchUser,
            Response::Suspend,
            Response::Hibernate,
            Response::Reboot,
            Response::Shutdown,
        ];

        for missing in cases {
            let kind = if missing == Response::SwitchUser {
                DialogKind::Logout
            } else {
                DialogKind::Shutdown
            };
            let full = LogoutDialog::new(kind, session(Capabilities::ALL, 0), Placement::default());
            let gated = LogoutDialog::new(kind, session(without(missing), 0), Placement::default());

            let mut expected = responses(&full);
            assert!(expected.contains(&missing));
            expected.retain(|r| *r != missing);
            assert_eq!(responses(&gated), expected, "{missing} should be gone");
        }
    }

    #[test]
    fn logout_without_capabilities_keeps_cancel_and_log_out() {
        let dialog =
            LogoutDialog::logout(session(Capabilities::default(), 0), Placement::default());
        assert_eq!(responses(&dialog), [Response::Cancel, Response::Logout]);
    }

    #[test]
    fn mnemonics() {
        let dialog = LogoutDialog::shutdown(session(Capabilities::ALL, 0), Placement::default());
        let keys: Vec<_> = dialog.buttons().iter().map(|b| b.mnemonic()).collect();
        assert_eq!(keys, [Some('u'), Some('h'), Some('r'), Some('c'), Some('s')]);
        assert_eq!(dialog.buttons()[0].text(), "Suspend");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_timeout_hides_progress_and_never_fires() {
        let mut dialog = LogoutDialog::logout(session(Capabilities::ALL, 0), Placement::default());
        dialog.show();

        assert_eq!(dialog.progress(), None);
        assert!(!dialog.timer_running());
        assert!(
            time::timeout(Duration::from_secs(600), dialog.next_event())
                .await
                .is_err()
        );
        assert_eq!(dialog.response(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn negative_timeout_hides_progress() {
        let mut dialog =
            LogoutDialog::shutdown(session(Capabilities::ALL, -1), Placement::default());
        dialog.show();
        assert_eq!(dialog.progress(), None);
        assert!(!dialog.timer_running());
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_fires_default_response_at_last_tick() {
        let mut dialog = LogoutDialog::logout(session(Capabilities::ALL, 3), Placement::default());
        let start = Instant::now();
        dialog.show();

        assert_eq!(dialog.seconds_left(), Some(3));
        assert_eq!(dialog.progress(), Some(1.0));
        assert_eq!(
            dialog.progress_text(),
            "You will be automatically logged out in 3 seconds"
        );

        let mut shown = Vec::new();
        let mut ticks = 0;
        let response = loop {
            let event = dialog.next_event().await.unwrap();
            assert_eq!(event, Event::Tick);
            ticks += 1;
            if let Some(response) = dialog.update(event) {
                break response;
            }
            shown.push(dialog.seconds_left().unwrap());
        };

        assert_eq!(response, Response::Logout);
        assert_eq!(ticks, 3);
        assert_eq!(shown, [2, 1]);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(3) && elapsed < Duration::from_secs(4));
        assert!(!dialog.timer_running());
    }

    #[tokio::test(start_paused = true)]
    async fn singular_warning_on_login_window() {
        let mut context = session(Capabilities::ALL, 1);
        context.identity = SessionIdentity::LoginWindow;
        let mut dialog = LogoutDialog::shutdown(context, Placement::default());
        dialog.show();

        let warning = "This system will be automatically shut down in 1 second";
        assert_eq!(dialog.progress_text(), warning);
        assert_eq!(dialog.secondary_text(), warning);

        let event = dialog.next_event().await.unwrap();
        assert_eq!(dialog.update(event), Some(Response::Shutdown));
    }

    #[tokio::test(start_paused = true)]
    async fn progress_shrinks_each_second() {
        let mut dialog = LogoutDialog::logout(session(Capabilities::ALL, 4), Placement::default());
        dialog.show();

        let event = dialog.next_event().await.unwrap();
        assert_eq!(dialog.update(event), None);
        assert_eq!(dialog.progress(), Some(0.75));
    }

    #[tokio::test(start_paused = true)]
    async fn button_press_stops_countdown() {
        let mut dialog = LogoutDialog::logout(session(Capabilities::ALL, 10), Placement::default());
        dialog.show();
        dialog.sender().send(Event::Respond(Response::Cancel)).unwrap();

        let event = dialog.next_event().await.unwrap();
        assert_eq!(dialog.update(event), Some(Response::Cancel));
        assert!(!dialog.timer_running());
        assert_eq!(dialog.update(Event::Tick), None);
    }

    #[tokio::test]
    async fn activation_picks_default_and_unoffered_responses_are_ignored() {
        let mut dialog = LogoutDialog::logout(session(Capabilities::ALL, 0), Placement::default());
        dialog.show();

        assert_eq!(dialog.update(Event::Respond(Response::Reboot)), None);
        assert_eq!(dialog.update(Event::Activate), Some(Response::Logout));
    }

    #[tokio::test(start_paused = true)]
    async fn activation_needs_the_default_button_but_expiry_does_not() {
        let capabilities = Capabilities {
            shutdown: false,
            ..Capabilities::ALL
        };
        let mut dialog = LogoutDialog::shutdown(session(capabilities, 1), Placement::default());
        dialog.show();

        assert!(!dialog.offers(Response::Shutdown));
        assert_eq!(dialog.update(Event::Activate), None);
        assert!(dialog.timer_running());

        let event = dialog.next_event().await.unwrap();
        assert_eq!(dialog.update(event), Some(Response::Shutdown));
    }

    async fn no_user() -> UserNames {
        panic!("greeters have no user to look up")
    }

    fn ada() -> UserNames {
        UserNames {
            real_name: "Ada Lovelace".into(),
            user_name: "ada".into(),
        }
    }

    #[tokio::test]
    async fn greeter_sessions_are_login_windows() {
        let greeter = FakeBackend {
            login_window: true,
            ..FakeBackend::capable()
        };
        assert_eq!(greeter.is_login_window().await.ok(), Some(true));
        assert_eq!(
            SessionIdentity::detect(&greeter, no_user()).await,
            SessionIdentity::LoginWindow
        );

        let user = FakeBackend::capable();
        assert_eq!(user.is_login_window().await.ok(), Some(false));
        assert_eq!(
            SessionIdentity::detect(&user, async { ada() }).await,
            SessionIdentity::User(ada())
        );

        let failing = FakeBackend {
            failing: true,
            ..FakeBackend::capable()
        };
        assert_eq!(
            SessionIdentity::detect(&failing, async { ada() }).await,
            SessionIdentity::User(ada())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn greeter_shows_countdown_as_secondary_text() {
        let greeter = FakeBackend {
            login_window: true,
            ..FakeBackend::capable()
        };
        let mut context = session(Capabilities::ALL, 2);
        context.identity = SessionIdentity::detect(&greeter, async { ada() }).await;
        let mut dialog = LogoutDialog::logout(context, Placement::default());
        dialog.show();

        assert_eq!(
            dialog.secondary_text(),
            "You will be automatically logged out in 2 seconds"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn destroy_cancels_timer_and_releases_backend() {
        let mut dialog = LogoutDialog::logout(session(Capabilities::ALL, 5), Placement::default());
        dialog.show();
        let timer = dialog.timer.clone().unwrap();

        dialog.destroy();
        tokio::task::yield_now().await;

        assert!(timer.is_finished());
        assert!(dialog.backend().is_none());
        assert!(dialog.is_destroyed());

        time::advance(Duration::from_secs(10)).await;
        assert!(dialog.events_rx.try_recv().is_err());
        dialog.destroy();
    }
}
