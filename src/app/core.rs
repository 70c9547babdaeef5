//! Core RavenApp struct definition and initialization

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::thread;

use crate::backend::run_backend;
use crate::config::{load_settings, save_settings, Settings};
use crate::dialog_manager::DialogManager;
use crate::protocol::{BackendAction, GuiEvent};
use crate::route::Route;
use crate::state::{ClientState, Toast};
use crate::ui;
use crate::ui::panels::{SharedFilesPanel, SidebarList};
use crate::validation::RenameRules;

pub struct RavenApp {
    // Session data (channels, members, route, toasts)
    pub state: ClientState,

    // Persisted settings
    pub settings: Settings,
    pub rename_rules: RenameRules,

    // Channels for backend communication
    pub action_tx: Sender<BackendAction>,
    pub event_rx: Receiver<GuiEvent>,

    // Components
    pub sidebar: SidebarList,
    pub files: SharedFilesPanel,
    pub dialogs: DialogManager,

    // URLs to hand to the system browser on the next frame
    pub pending_urls: Vec<String>,

    // Skip writing settings on drop (tests)
    pub persist_on_exit: bool,
}

impl RavenApp {
    /// Get the current theme based on the settings ("dark" or "light")
    pub(super) fn get_theme(&self) -> ui::theme::RavenTheme {
        ui::theme::RavenTheme::named(&self.settings.theme)
    }

    pub fn new(cc: &eframe::CreationContext<'_>, initial_route: Option<Route>) -> Self {
        // Create channels for UI <-> Backend
        let (action_tx, action_rx) = unbounded::<BackendAction>();
        let (event_tx, event_rx) = unbounded::<GuiEvent>();

        // Spawn the backend thread
        thread::spawn(move || {
            run_backend(action_rx, event_tx);
        });

        let mut settings = load_settings();
        settings.apply_env_overrides();

        ui::theme::apply_app_style(&cc.egui_ctx, &settings.theme);

        let route = initial_route.unwrap_or_else(|| Route::parse(&settings.last_route));
        let mut app = Self::with_channels(settings, route, action_tx, event_rx);
        app.persist_on_exit = true;
        app.start();
        app
    }

    /// Build the app around existing channels without starting anything.
    pub fn with_channels(
        settings: Settings,
        route: Route,
        action_tx: Sender<BackendAction>,
        event_rx: Receiver<GuiEvent>,
    ) -> Self {
        let rename_rules = RenameRules::with_pattern(settings.channel_name_pattern.as_deref());
        Self {
            state: ClientState::new(route),
            settings,
            rename_rules,
            action_tx,
            event_rx,
            sidebar: SidebarList::new(),
            files: SharedFilesPanel::new(),
            dialogs: DialogManager::new(),
            pending_urls: Vec::new(),
            persist_on_exit: false,
        }
    }

    /// Configure the backend and issue the initial loads.
    pub fn start(&mut self) {
        self.configure_backend();
        self.send(BackendAction::FetchChannels);
        if let Some(action) = self.sidebar.mount() {
            self.send(action);
        }
        self.sync_route();
    }

    pub(crate) fn send(&self, action: BackendAction) {
        if self.action_tx.send(action).is_err() {
            tracing::error!("Backend channel closed, action dropped");
        }
    }

    /// Hand the current server settings to the backend.
    pub(crate) fn configure_backend(&mut self) {
        match self.settings.server_settings() {
            Ok(server) => {
                tracing::info!(server = %server.server_url, "Configuring backend");
                self.send(BackendAction::Configure(server));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Invalid server settings");
                self.state
                    .push_toast(Toast::error("Invalid server settings", e.to_string()));
            }
        }
    }

    /// Move to `route`, updating the channel-scoped components.
    pub fn navigate(&mut self, route: Route) {
        if self.state.route == route {
            return;
        }
        tracing::debug!(path = %route.path(), "Navigating");
        self.state.route = route;
        self.sync_route();
    }

    /// Point the files panel at the routed channel, or unmount it.
    fn sync_route(&mut self) {
        match self.state.route.channel_id().map(str::to_string) {
            Some(channel_id) => {
                if let Some(action) = self.files.track_channel(&channel_id) {
                    self.send(action);
                    self.send(BackendAction::FetchMembers(channel_id));
                }
            }
            None => {
                if let Some(action) = self.files.unmount() {
                    self.send(action);
                }
            }
        }
    }

    /// Queue a URL for the system browser.
    pub(crate) fn open_url(&mut self, url: String) {
        tracing::debug!(%url, "Opening URL");
        self.pending_urls.push(url);
    }
}

impl Drop for RavenApp {
    fn drop(&mut self) {
        if !self.persist_on_exit {
            return;
        }
        // Persist settings on exit
        self.settings.last_route = self.state.route.path();
        if let Err(e) = save_settings(&self.settings) {
            tracing::error!(error = %e, "Failed to save settings");
        }
    }
}
