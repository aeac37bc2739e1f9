// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use cosmic_logout_dialog_config::LockdownConfig;

use crate::{
    backend::SessionBackend,
    display_manager::{DisplayManager, LogoutAction},
};

/// Optional actions the dialog may offer. A `false` flag omits the button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub switch_user: bool,
    pub suspend: bool,
    pub hibernate: bool,
    pub reboot: bool,
    pub shutdown: bool,
}

impl Capabilities {
    pub const ALL: Capabilities = Capabilities {
        switch_user: true,
        suspend: true,
        hibernate: true,
        reboot: true,
        shutdown: true,
    };

    pub async fn query<B: SessionBackend>(
        backend: &B,
        lockdown: &LockdownConfig,
        display_manager: &DisplayManager,
    ) -> Self {
        let switch_user = if lockdown.disable_user_switching {
            false
        } else {
            answer("switch-user", backend.can_switch_user().await)
        };

        let suspend = answer("suspend", backend.can_suspend().await);
        let hibernate = answer("hibernate", backend.can_hibernate().await);

        let mut reboot = answer("restart", backend.can_restart().await);
        if !reboot {
            reboot = display_manager
                .supports_logout_action(LogoutAction::Reboot)
                .await;
        }

        let mut shutdown = answer("stop", backend.can_stop().await);
        if !shutdown {
            shutdown = display_manager
                .supports_logout_action(LogoutAction::Halt)
                .await;
        }

        let capabilities = Self {
            switch_user,
            suspend,
            hibernate,
            reboot,
            shutdown,
        };
        tracing::debug!(?capabilities, "queried session capabilities");
        capabilities
    }
}

fn answer(query: &str, result: zbus::Result<bool>) -> bool {
    result.unwrap_or_else(|why| {
        tracing::warn!("{query} capability query failed: {why}");
        false
    })
}
