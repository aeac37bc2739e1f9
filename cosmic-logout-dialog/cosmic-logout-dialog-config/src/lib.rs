// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::PathBuf;

use cosmic_config::{self, Config, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};

pub const LOGOUT_DIALOG_ID: &str = "com.system76.CosmicLogoutDialog";
pub const LOCKDOWN_ID: &str = "com.system76.CosmicLockdown";

#[derive(Debug, Clone, CosmicConfigEntry, PartialEq, Eq, Deserialize, Serialize)]
#[version = 1]
pub struct LogoutDialogConfig {
    /// Seconds before the default response is triggered. Zero or less
    /// disables the countdown entirely.
    pub logout_timeout: i32,
    /// Control socket of a display manager that can be asked which logout
    /// actions it supports.
    pub display_manager_socket: PathBuf,
}

impl Default for LogoutDialogConfig {
    fn default() -> Self {
        Self {
            logout_timeout: 60,
            display_manager_socket: PathBuf::from("/var/run/mdm_socket"),
        }
    }
}

#[derive(Debug, Clone, Default, CosmicConfigEntry, PartialEq, Eq, Deserialize, Serialize)]
#[version = 1]
pub struct LockdownConfig {
    pub disable_user_switching: bool,
}

/// Everything the dialog reads from the settings store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub dialog: LogoutDialogConfig,
    pub lockdown: LockdownConfig,
}

impl Settings {
    pub fn load() -> Self {
        Self {
            dialog: load_entry(LOGOUT_DIALOG_ID),
            lockdown: load_entry(LOCKDOWN_ID),
        }
    }
}

fn load_entry<T: CosmicConfigEntry + Default>(id: &str) -> T {
    let config = match Config::new(id, T::VERSION) {
        Ok(config) => config,
        Err(why) => {
            tracing::warn!(?why, "{id}: settings unavailable, using defaults");
            return T::default();
        }
    };

    match T::get_entry(&config) {
        Ok(entry) => entry,
        Err((errors, entry)) => {
            // missing keys are reported here too
            for why in errors {
                tracing::debug!(?why, "{id}: falling back to default");
            }
            entry
        }
    }
}
