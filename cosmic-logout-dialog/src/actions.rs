// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use anyhow::Context;
use zbus::Connection;

use crate::{
    backend::Backend,
    response::Response,
    session_manager::{CosmicSessionProxy, DisplayManagerSeatProxy, SessionManagerProxy},
};

/// Which session manager ends the desktop session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Cosmic,
    Gnome,
}

impl SessionKind {
    /// Reads a `XDG_CURRENT_DESKTOP` value. Anything that is not GNOME is
    /// assumed to be COSMIC.
    pub fn from_desktop(desktop: Option<&str>) -> Self {
        let is_gnome = desktop
            .into_iter()
            .flat_map(|d| d.split(':'))
            .any(|d| d.trim().eq_ignore_ascii_case("gnome"));

        if is_gnome {
            SessionKind::Gnome
        } else {
            SessionKind::Cosmic
        }
    }

    fn current() -> Self {
        Self::from_desktop(std::env::var("XDG_CURRENT_DESKTOP").ok().as_deref())
    }
}

/// Carries out a confirmed response.
pub async fn perform(response: Response, backend: &Backend) -> anyhow::Result<()> {
    tracing::info!("performing {response} via {}", backend.name());

    match response {
        Response::Cancel => Ok(()),
        Response::Logout => log_out().await,
        Response::SwitchUser => switch_user().await,
        Response::Shutdown => backend.stop().await.context("failed to shut down"),
        Response::Reboot => backend.restart().await.context("failed to restart"),
        Response::Hibernate => backend.hibernate().await.context("failed to hibernate"),
        Response::Suspend => backend.suspend().await.context("failed to suspend"),
    }
}

async fn log_out() -> anyhow::Result<()> {
    let connection = Connection::session().await?;

    match SessionKind::current() {
        SessionKind::Gnome => {
            let manager_proxy = SessionManagerProxy::new(&connection).await?;
            manager_proxy.logout(0).await?;
        }
        SessionKind::Cosmic => {
            let cosmic_session = CosmicSessionProxy::new(&connection).await?;
            cosmic_session.exit().await?;
        }
    }

    Ok(())
}

async fn switch_user() -> anyhow::Result<()> {
    let seat_path = std::env::var("XDG_SEAT_PATH")
        .context("XDG_SEAT_PATH is not set, no greeter to switch to")?;

    let connection = Connection::system().await?;
    let seat = DisplayManagerSeatProxy::builder(&connection)
        .path(seat_path)?
        .build()
        .await?;

    seat.switch_to_greeter()
        .await
        .context("display manager refused to switch to the greeter")
}
