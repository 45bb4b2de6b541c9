//! Tray menu click handling.
//!
//! Every click is decoded into a [`MenuAction`], applied through
//! [`SettingsStore::update`], and the affected part of the menu is then
//! re-derived from the committed settings.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::api::{CoreEvent, EventSender};
use crate::autostart::{apply_autostart, Autostart};
use crate::config::{Settings, SettingsError, SettingsStore, ThresholdChoice};

use super::action::{MenuAction, START_LOGIN_ID};
use super::model::{RadioGroup, TrayMenu};

/// Error type for click handling
#[derive(Debug, Error)]
pub enum MenuError {
    /// The click identifier is not part of the menu contract
    #[error("unknown menu action: {0}")]
    UnknownAction(String),

    /// The settings change could not be persisted; the menu is unchanged
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// What the UI layer should do after a click was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Show or hide the floating panel
    ToggleWindow,
    /// Exit the application
    Quit,
    /// A refresh was requested
    RefreshRequested,
    /// Settings were committed and the menu reconciled
    SettingsUpdated(Settings),
}

/// Owns the tray menu projection and applies clicks to the settings store
pub struct MenuController<A> {
    settings: Arc<SettingsStore>,
    autostart: A,
    event_tx: EventSender,
    menu: TrayMenu,
}

impl<A: Autostart> MenuController<A> {
    /// Build the menu from the current settings
    pub fn new(settings: Arc<SettingsStore>, autostart: A, event_tx: EventSender) -> Self {
        let menu = TrayMenu::build(&settings.get());
        Self {
            settings,
            autostart,
            event_tx,
            menu,
        }
    }

    /// Current menu projection
    pub fn menu(&self) -> &TrayMenu {
        &self.menu
    }

    /// Decode and handle a click identifier
    pub fn handle_click(&mut self, id: &str) -> Result<ClickOutcome, MenuError> {
        let action =
            MenuAction::parse(id).ok_or_else(|| MenuError::UnknownAction(id.to_string()))?;
        self.apply(action)
    }

    /// Handle an already-decoded action
    pub fn apply(&mut self, action: MenuAction) -> Result<ClickOutcome, MenuError> {
        debug!(%action, "Menu action");

        match action {
            MenuAction::ShowHide => Ok(ClickOutcome::ToggleWindow),
            MenuAction::Quit => Ok(ClickOutcome::Quit),
            MenuAction::RefreshNow => {
                let _ = self.event_tx.send(CoreEvent::RefreshRequested);
                Ok(ClickOutcome::RefreshRequested)
            }
            MenuAction::SelectInterval(secs) => self.select_interval(secs),
            MenuAction::SelectThreshold(choice) => self.select_threshold(choice),
            MenuAction::ToggleAutostart => self.toggle_autostart(),
        }
    }

    fn select_interval(&mut self, secs: u64) -> Result<ClickOutcome, MenuError> {
        self.settings.update(|s| s.refresh_interval_secs = secs)?;

        let committed = self.reconcile(RadioGroup::Interval);
        info!(secs = committed.refresh_interval_secs, "Refresh interval changed");
        let _ = self.event_tx.send(CoreEvent::RefreshIntervalChanged {
            secs: committed.refresh_interval_secs,
        });

        Ok(self.updated(committed))
    }

    fn select_threshold(&mut self, choice: ThresholdChoice) -> Result<ClickOutcome, MenuError> {
        self.settings.update(|s| s.select_threshold(choice))?;

        let committed = self.reconcile(RadioGroup::Threshold);
        info!(choice = ?committed.threshold_choice(), "Notification threshold changed");

        Ok(self.updated(committed))
    }

    fn toggle_autostart(&mut self) -> Result<ClickOutcome, MenuError> {
        let enabled = !self.settings.get().start_at_login;
        let committed = self.settings.update(|s| s.start_at_login = enabled)?;

        // A registration failure is logged but does not stop the checkbox
        // from following the persisted preference.
        apply_autostart(&self.autostart, committed.start_at_login);
        self.menu.set_checked(START_LOGIN_ID, committed.start_at_login);

        Ok(self.updated(committed))
    }

    /// Re-derive one radio group from freshly read settings
    ///
    /// Reads the store rather than trusting the clicked item, so the last
    /// successful update wins when clicks race.
    fn reconcile(&mut self, group: RadioGroup) -> Settings {
        let committed = self.settings.get();
        let changed = self.menu.sync_group(group, &committed);
        if !changed.is_empty() {
            debug!(group = group.id(), ?changed, "Menu reconciled");
        }
        committed
    }

    fn updated(&self, committed: Settings) -> ClickOutcome {
        let _ = self
            .event_tx
            .send(CoreEvent::SettingsChanged(committed.clone()));
        ClickOutcome::SettingsUpdated(committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tokio::sync::broadcast;

    #[derive(Default)]
    struct FakeAutostart {
        calls: Mutex<Vec<bool>>,
        fail: bool,
    }

    impl Autostart for Arc<FakeAutostart> {
        fn enable(&self) -> Result<()> {
            self.calls.lock().push(true);
            if self.fail {
                anyhow::bail!("registration refused");
            }
            Ok(())
        }

        fn disable(&self) -> Result<()> {
            self.calls.lock().push(false);
            if self.fail {
                anyhow::bail!("registration refused");
            }
            Ok(())
        }

        fn is_enabled(&self) -> Result<bool> {
            Ok(self.calls.lock().last().copied().unwrap_or(false))
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        store: Arc<SettingsStore>,
        autostart: Arc<FakeAutostart>,
        rx: broadcast::Receiver<CoreEvent>,
        controller: MenuController<Arc<FakeAutostart>>,
    }

    fn fixture(fail_autostart: bool) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SettingsStore::open(dir.path()));
        let autostart = Arc::new(FakeAutostart {
            fail: fail_autostart,
            ..Default::default()
        });
        let (tx, rx) = broadcast::channel(64);
        let controller = MenuController::new(store.clone(), autostart.clone(), tx);
        Fixture {
            _dir: dir,
            store,
            autostart,
            rx,
            controller,
        }
    }

    #[test]
    fn test_select_interval_persists_and_reconciles() {
        let mut f = fixture(false);

        let outcome = f.controller.handle_click("interval_60").unwrap();
        assert!(matches!(
            outcome,
            ClickOutcome::SettingsUpdated(ref s) if s.refresh_interval_secs == 60
        ));
        assert_eq!(f.store.get().refresh_interval_secs, 60);
        assert_eq!(
            f.controller.menu().checked_in(RadioGroup::Interval),
            vec!["interval_60"]
        );

        assert_eq!(
            f.rx.try_recv().unwrap(),
            CoreEvent::RefreshIntervalChanged { secs: 60 }
        );
        assert!(matches!(f.rx.try_recv().unwrap(), CoreEvent::SettingsChanged(_)));
    }

    #[test]
    fn test_click_sequence_leaves_one_checked_item() {
        let mut f = fixture(false);

        for id in ["notify_70", "notify_0", "notify_95", "notify_90", "notify_0"] {
            f.controller.handle_click(id).unwrap();
            assert_eq!(f.controller.menu().checked_in(RadioGroup::Threshold).len(), 1);
        }
        assert_eq!(
            f.controller.menu().checked_in(RadioGroup::Threshold),
            vec!["notify_0"]
        );

        f.controller.handle_click("notify_95").unwrap();
        assert_eq!(
            f.controller.menu().checked_in(RadioGroup::Threshold),
            vec!["notify_95"]
        );
        let settings = f.store.get();
        assert!(settings.notifications_enabled);
        assert_eq!(settings.notify_threshold, 95);
    }

    #[test]
    fn test_threshold_off_keeps_stored_percentage() {
        let mut f = fixture(false);
        f.controller.handle_click("notify_90").unwrap();
        f.controller.handle_click("notify_0").unwrap();

        let settings = f.store.get();
        assert!(!settings.notifications_enabled);
        assert_eq!(settings.notify_threshold, 90);
    }

    #[test]
    fn test_reconcile_uses_committed_value_not_clicked_item() {
        let mut f = fixture(false);

        // Another writer commits after the menu was built
        f.store.update(|s| s.refresh_interval_secs = 900).unwrap();

        // A threshold click only reconciles its own group
        f.controller.handle_click("notify_70").unwrap();
        assert_eq!(
            f.controller.menu().checked_in(RadioGroup::Interval),
            vec!["interval_300"]
        );

        f.controller.handle_click("interval_120").unwrap();
        assert_eq!(
            f.controller.menu().checked_in(RadioGroup::Interval),
            vec!["interval_120"]
        );
        assert_eq!(f.controller.menu(), &TrayMenu::build(&f.store.get()));
    }

    #[test]
    fn test_concurrent_updates_settle_on_last_commit() {
        let mut f = fixture(false);

        let writers: Vec<_> = [60, 600, 900]
            .into_iter()
            .map(|secs| {
                let store = f.store.clone();
                std::thread::spawn(move || store.update(|s| s.refresh_interval_secs = secs))
            })
            .collect();
        f.controller.handle_click("interval_120").unwrap();
        for w in writers {
            w.join().unwrap().unwrap();
        }

        // One more click settles the group on whatever the store holds
        f.controller.handle_click("interval_300").unwrap();
        let checked = f.controller.menu().checked_in(RadioGroup::Interval);
        assert_eq!(checked, vec!["interval_300"]);
        assert_eq!(f.store.get().refresh_interval_secs, 300);
    }

    #[test]
    fn test_toggle_autostart() {
        let mut f = fixture(false);

        f.controller.handle_click("start_login").unwrap();
        assert!(f.store.get().start_at_login);
        assert!(f.controller.menu().item("start_login").unwrap().checked);

        f.controller.handle_click("start_login").unwrap();
        assert!(!f.store.get().start_at_login);
        assert!(!f.controller.menu().item("start_login").unwrap().checked);

        assert_eq!(*f.autostart.calls.lock(), vec![true, false]);
    }

    #[test]
    fn test_toggle_autostart_registration_failure_still_flips_checkbox() {
        let mut f = fixture(true);

        let outcome = f.controller.handle_click("start_login");
        assert!(outcome.is_ok());
        assert!(f.store.get().start_at_login);
        assert!(f.controller.menu().item("start_login").unwrap().checked);
        assert_eq!(*f.autostart.calls.lock(), vec![true]);
    }

    #[test]
    fn test_write_failure_leaves_menu_and_settings() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let store = Arc::new(SettingsStore::open(&blocker));
        let autostart = Arc::new(FakeAutostart::default());
        let (tx, _rx) = broadcast::channel(16);
        let mut controller = MenuController::new(store.clone(), autostart.clone(), tx);
        let before = controller.menu().clone();

        let err = controller.handle_click("interval_60").unwrap_err();
        assert!(matches!(err, MenuError::Settings(_)));
        assert_eq!(controller.menu(), &before);
        assert_eq!(store.get().refresh_interval_secs, 300);

        // Autostart registration is not touched when the preference can't be saved
        assert!(controller.handle_click("start_login").is_err());
        assert!(autostart.calls.lock().is_empty());
        assert_eq!(controller.menu(), &before);
    }

    #[test]
    fn test_non_settings_actions() {
        let mut f = fixture(false);

        assert_eq!(
            f.controller.handle_click("show_hide").unwrap(),
            ClickOutcome::ToggleWindow
        );
        assert_eq!(f.controller.handle_click("quit").unwrap(), ClickOutcome::Quit);
        assert_eq!(
            f.controller.handle_click("refresh_now").unwrap(),
            ClickOutcome::RefreshRequested
        );
        assert_eq!(f.rx.try_recv().unwrap(), CoreEvent::RefreshRequested);

        // None of these write settings
        assert!(!f.store.path().exists());
    }

    #[test]
    fn test_unknown_action() {
        let mut f = fixture(false);
        let err = f.controller.handle_click("interval_7").unwrap_err();
        assert!(matches!(err, MenuError::UnknownAction(ref id) if id == "interval_7"));
        assert_eq!(err.to_string(), "unknown menu action: interval_7");
    }
}
