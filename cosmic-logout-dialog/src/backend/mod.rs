// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use zbus::Connection;

mod consolekit;
#[cfg(test)]
pub(crate) mod fake;
mod logind;

pub use consolekit::ConsoleKit;
pub use logind::Logind;

const LOGIND_SEATS_DIR: &str = "/run/systemd/seats/";

/// Whether systemd-logind manages the seats on this machine.
pub fn logind_running() -> bool {
    Path::new(LOGIND_SEATS_DIR).exists()
}

/// Capability and session information provided by a session tracker.
#[allow(async_fn_in_trait)]
pub trait SessionBackend {
    async fn can_switch_user(&self) -> zbus::Result<bool>;

    async fn can_suspend(&self) -> zbus::Result<bool>;

    async fn can_hibernate(&self) -> zbus::Result<bool>;

    async fn can_restart(&self) -> zbus::Result<bool>;

    async fn can_stop(&self) -> zbus::Result<bool>;

    /// Whether the current session belongs to a display manager greeter.
    async fn is_login_window(&self) -> zbus::Result<bool>;
}

#[derive(Debug, Clone)]
pub enum Backend {
    Logind(Logind),
    ConsoleKit(ConsoleKit),
}

impl Backend {
    /// Picks logind when it is running and ConsoleKit otherwise. The choice
    /// is made once and reused for every query.
    pub async fn detect(conn: &Connection) -> zbus::Result<Self> {
        if logind_running() {
            Logind::new(conn).await.map(Backend::Logind)
        } else {
            ConsoleKit::new(conn).await.map(Backend::ConsoleKit)
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Logind(_) => "logind",
            Backend::ConsoleKit(_) => "consolekit",
        }
    }

    pub async fn restart(&self) -> zbus::Result<()> {
        match self {
            Backend::Logind(b) => b.restart().await,
            Backend::ConsoleKit(b) => b.restart().await,
        }
    }

    pub async fn stop(&self) -> zbus::Result<()> {
        match self {
            Backend::Logind(b) => b.stop().await,
            Backend::ConsoleKit(b) => b.stop().await,
        }
    }

    pub async fn suspend(&self) -> zbus::Result<()> {
        match self {
            Backend::Logind(b) => b.suspend().await,
            Backend::ConsoleKit(b) => b.suspend().await,
        }
    }

    pub async fn hibernate(&self) -> zbus::Result<()> {
        match self {
            Backend::Logind(b) => b.hibernate().await,
            Backend::ConsoleKit(b) => b.hibernate().await,
        }
    }
}

impl SessionBackend for Backend {
    async fn can_switch_user(&self) -> zbus::Result<bool> {
        match self {
            Backend::Logind(b) => b.can_switch_user().await,
            Backend::ConsoleKit(b) => b.can_switch_user().await,
        }
    }

    async fn can_suspend(&self) -> zbus::Result<bool> {
        match self {
            Backend::Logind(b) => b.can_suspend().await,
            Backend::ConsoleKit(b) => b.can_suspend().await,
        }
    }

    async fn can_hibernate(&self) -> zbus::Result<bool> {
        match self {
            Backend::Logind(b) => b.can_hibernate().await,
            Backend::ConsoleKit(b) => b.can_hibernate().await,
        }
    }

    async fn can_restart(&self) -> zbus::Result<bool> {
        match self {
            Backend::Logind(b) => b.can_restart().await,
            Backend::ConsoleKit(b) => b.can_restart().await,
        }
    }

    async fn can_stop(&self) -> zbus::Result<bool> {
        match self {
            Backend::Logind(b) => b.can_stop().await,
            Backend::ConsoleKit(b) => b.can_stop().await,
        }
    }

    async fn is_login_window(&self) -> zbus::Result<bool> {
        match self {
            Backend::Logind(b) => b.is_login_window().await,
            Backend::ConsoleKit(b) => b.is_login_window().await,
        }
    }
}
