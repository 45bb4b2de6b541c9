use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use usagebar_core::autostart::Autostart;
use usagebar_core::menu::{ClickOutcome, MenuController, MenuError};
use usagebar_core::notifications::Notifier;
use usagebar_core::usage::UsageSource;
use usagebar_core::{CoreEvent, UsageCore};

/// Headless tray application
///
/// Each input line is treated as a menu click identifier. The panel
/// visibility is tracked as a flag only.
pub struct App<A> {
    core: UsageCore,
    menu: MenuController<A>,
    /// `(provider, tag)` pairs for the tray title
    providers: Vec<(String, String)>,
    window_visible: bool,
}

impl<A: Autostart> App<A> {
    /// Create the application, syncing the login item with persisted settings
    pub fn new(core: UsageCore, autostart: A, providers: Vec<(String, String)>) -> Self {
        core.sync_autostart(&autostart);
        let menu = core.menu_controller(autostart);

        Self {
            core,
            menu,
            providers,
            window_visible: false,
        }
    }

    /// Whether the floating panel is shown
    pub fn window_visible(&self) -> bool {
        self.window_visible
    }

    /// Current tray title
    pub fn title(&self) -> String {
        self.core.tray_title(
            self.providers
                .iter()
                .map(|(provider, tag)| (provider.as_str(), tag.as_str())),
        )
    }

    /// Run until `quit` is clicked or input closes
    pub async fn run<S, N, R>(mut self, sources: Vec<S>, notifier: N, input: R) -> Result<()>
    where
        S: UsageSource + 'static,
        N: Notifier + 'static,
        R: AsyncBufRead + Unpin,
    {
        info!("Tray menu:\n{}", self.menu.menu());
        info!(title = %self.title(), "Tray title");

        let mut events = self.core.subscribe();
        let poller = self.core.poller(sources, notifier).start(self.core.subscribe());
        let scheduler = self.core.start_scheduler();

        let mut lines = input.lines();
        let result = loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line.context("Failed to read menu input") {
                        Ok(Some(line)) => {
                            if !self.handle_line(&line) {
                                break Ok(());
                            }
                        }
                        Ok(None) => {
                            info!("Menu input closed");
                            break Ok(());
                        }
                        Err(e) => break Err(e),
                    }
                }
                event = events.recv() => {
                    match event {
                        Ok(CoreEvent::UsageUpdated { provider }) => {
                            debug!(%provider, "Usage updated");
                            info!(title = %self.title(), "Tray title");
                        }
                        Ok(CoreEvent::RefreshIntervalChanged { secs }) => {
                            debug!(secs, "Next refresh uses new interval");
                        }
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "Tray event listener lagged");
                        }
                        Err(RecvError::Closed) => break Ok(()),
                    }
                }
            }
        };

        scheduler.abort();
        poller.abort();
        info!("Tray exited");
        result
    }

    /// Handle one click identifier; returns false when the app should exit
    pub fn handle_line(&mut self, line: &str) -> bool {
        let id = line.trim();
        if id.is_empty() {
            return true;
        }

        match self.menu.handle_click(id) {
            Ok(ClickOutcome::ToggleWindow) => {
                self.window_visible = !self.window_visible;
                info!(visible = self.window_visible, "Panel toggled");
            }
            Ok(ClickOutcome::Quit) => return false,
            Ok(ClickOutcome::RefreshRequested) => info!("Refresh requested"),
            Ok(ClickOutcome::SettingsUpdated(settings)) => {
                info!(?settings, "Settings updated");
                debug!("Tray menu:\n{}", self.menu.menu());
            }
            Err(MenuError::UnknownAction(id)) => warn!(%id, "Ignoring unknown menu action"),
            Err(e) => warn!(error = %e, "Menu action failed"),
        }
        true
    }
}
