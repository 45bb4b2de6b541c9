//! Tray menu projection.
//!
//! `TrayMenu` is derived entirely from [`Settings`]; it is never read back as
//! a source of truth. Items are created once and their checked state is
//! updated in place.

use std::fmt;

use crate::config::{Settings, ThresholdChoice, NOTIFY_THRESHOLDS, REFRESH_INTERVALS};

use super::action::{
    interval_id, notify_id, QUIT_ID, REFRESH_NOW_ID, SHOW_HIDE_ID, START_LOGIN_ID,
};

/// A radio group in the tray menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioGroup {
    /// "Refresh Every" submenu
    Interval,
    /// "Notify At" submenu
    Threshold,
}

impl RadioGroup {
    /// Submenu identifier
    pub fn id(self) -> &'static str {
        match self {
            RadioGroup::Interval => "refresh_sub",
            RadioGroup::Threshold => "notify_sub",
        }
    }

    /// Submenu title
    pub fn title(self) -> &'static str {
        match self {
            RadioGroup::Interval => "Refresh Every",
            RadioGroup::Threshold => "Notify At",
        }
    }

    /// `(item id, label)` for every choice in display order
    pub fn choices(self) -> Vec<(String, &'static str)> {
        match self {
            RadioGroup::Interval => REFRESH_INTERVALS
                .iter()
                .map(|(secs, label)| (interval_id(*secs), *label))
                .collect(),
            RadioGroup::Threshold => NOTIFY_THRESHOLDS
                .iter()
                .map(|(pct, label)| (notify_id(*pct), *label))
                .collect(),
        }
    }

    /// Identifier of the item that should be checked for `settings`
    pub fn selected_id(self, settings: &Settings) -> String {
        match self {
            RadioGroup::Interval => interval_id(settings.refresh_interval_secs),
            RadioGroup::Threshold => match settings.threshold_choice() {
                ThresholdChoice::Off => notify_id(ThresholdChoice::Off.raw()),
                ThresholdChoice::Percent(pct) => notify_id(pct),
            },
        }
    }
}

/// A checkable menu item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckItem {
    pub id: String,
    pub label: String,
    pub checked: bool,
}

/// One entry of the tray menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// Plain clickable item
    Action { id: String, label: String },
    /// Visual separator
    Separator,
    /// Submenu holding one radio group
    Submenu {
        group: RadioGroup,
        items: Vec<CheckItem>,
    },
    /// Independent checkbox
    Check(CheckItem),
}

/// The whole tray menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayMenu {
    entries: Vec<MenuEntry>,
}

impl TrayMenu {
    /// Build the menu for `settings`
    pub fn build(settings: &Settings) -> Self {
        let entries = vec![
            MenuEntry::Action {
                id: SHOW_HIDE_ID.to_string(),
                label: "Show Widget".to_string(),
            },
            MenuEntry::Separator,
            MenuEntry::Action {
                id: REFRESH_NOW_ID.to_string(),
                label: "Refresh Now".to_string(),
            },
            radio_submenu(RadioGroup::Interval, settings),
            radio_submenu(RadioGroup::Threshold, settings),
            MenuEntry::Check(CheckItem {
                id: START_LOGIN_ID.to_string(),
                label: "Start at Login".to_string(),
                checked: settings.start_at_login,
            }),
            MenuEntry::Separator,
            MenuEntry::Action {
                id: QUIT_ID.to_string(),
                label: "Quit".to_string(),
            },
        ];

        Self { entries }
    }

    /// All entries in display order
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Find a checkable item (radio or checkbox) by id
    pub fn item(&self, id: &str) -> Option<&CheckItem> {
        self.entries.iter().find_map(|entry| match entry {
            MenuEntry::Submenu { items, .. } => items.iter().find(|i| i.id == id),
            MenuEntry::Check(item) if item.id == id => Some(item),
            _ => None,
        })
    }

    /// Items of a radio group
    pub fn group_items(&self, group: RadioGroup) -> &[CheckItem] {
        self.entries
            .iter()
            .find_map(|entry| match entry {
                MenuEntry::Submenu { group: g, items } if *g == group => Some(items.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Identifiers of the checked items in a radio group
    pub fn checked_in(&self, group: RadioGroup) -> Vec<&str> {
        self.group_items(group)
            .iter()
            .filter(|i| i.checked)
            .map(|i| i.id.as_str())
            .collect()
    }

    /// Set every item of `group` to match `settings`
    ///
    /// Idempotent. Returns the ids whose checked state changed.
    pub fn sync_group(&mut self, group: RadioGroup, settings: &Settings) -> Vec<String> {
        let selected = group.selected_id(settings);
        let mut changed = Vec::new();

        for entry in &mut self.entries {
            if let MenuEntry::Submenu { group: g, items } = entry {
                if *g != group {
                    continue;
                }
                for item in items.iter_mut() {
                    let checked = item.id == selected;
                    if item.checked != checked {
                        item.checked = checked;
                        changed.push(item.id.clone());
                    }
                }
            }
        }

        changed
    }

    /// Set a checkbox's state; returns false if no such checkbox exists
    pub fn set_checked(&mut self, id: &str, checked: bool) -> bool {
        for entry in &mut self.entries {
            if let MenuEntry::Check(item) = entry {
                if item.id == id {
                    item.checked = checked;
                    return true;
                }
            }
        }
        false
    }
}

fn radio_submenu(group: RadioGroup, settings: &Settings) -> MenuEntry {
    let selected = group.selected_id(settings);
    let items = group
        .choices()
        .into_iter()
        .map(|(id, label)| CheckItem {
            checked: id == selected,
            label: label.to_string(),
            id,
        })
        .collect();

    MenuEntry::Submenu { group, items }
}

impl fmt::Display for TrayMenu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match entry {
                MenuEntry::Action { label, .. } => writeln!(f, "{}", label)?,
                MenuEntry::Separator => writeln!(f, "---")?,
                MenuEntry::Submenu { group, items } => {
                    writeln!(f, "{} >", group.title())?;
                    for item in items {
                        let mark = if item.checked { "(*)" } else { "( )" };
                        writeln!(f, "    {} {}", mark, item.label)?;
                    }
                }
                MenuEntry::Check(item) => {
                    let mark = if item.checked { "[x]" } else { "[ ]" };
                    writeln!(f, "{} {}", mark, item.label)?;
                }
            }
        }
        Ok(())
    }
}
