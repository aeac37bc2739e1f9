// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use zbus::{Connection, proxy, zvariant::OwnedObjectPath};

use super::SessionBackend;

#[proxy(
    interface = "org.freedesktop.ConsoleKit.Manager",
    default_service = "org.freedesktop.ConsoleKit",
    default_path = "/org/freedesktop/ConsoleKit/Manager"
)]
trait Manager {
    fn can_restart(&self) -> zbus::Result<bool>;

    fn can_stop(&self) -> zbus::Result<bool>;

    fn can_suspend(&self) -> zbus::Result<String>;

    fn can_hibernate(&self) -> zbus::Result<String>;

    fn get_current_session(&self) -> zbus::Result<OwnedObjectPath>;

    fn restart(&self) -> zbus::Result<()>;

    fn stop(&self) -> zbus::Result<()>;

    fn suspend(&self, interactive: bool) -> zbus::Result<()>;

    fn hibernate(&self, interactive: bool) -> zbus::Result<()>;
}

#[proxy(
    interface = "org.freedesktop.ConsoleKit.Session",
    default_service = "org.freedesktop.ConsoleKit"
)]
trait Session {
    fn get_session_type(&self) -> zbus::Result<String>;

    fn get_seat_id(&self) -> zbus::Result<OwnedObjectPath>;
}

#[proxy(
    interface = "org.freedesktop.ConsoleKit.Seat",
    default_service = "org.freedesktop.ConsoleKit"
)]
trait Seat {
    fn can_activate_sessions(&self) -> zbus::Result<bool>;
}

pub const LOGIN_WINDOW_TYPE: &str = "LoginWindow";

/// Sleep queries answer `yes`, `no`, `challenge` or `na`. A challenge still
/// lets the user authenticate, so it counts as supported.
fn answer_is_yes(answer: &str) -> bool {
    matches!(answer.trim(), "yes" | "challenge")
}

#[derive(Debug, Clone)]
pub struct ConsoleKit {
    conn: Connection,
    manager: ManagerProxy<'static>,
}

impl ConsoleKit {
    pub async fn new(conn: &Connection) -> zbus::Result<Self> {
        let manager = ManagerProxy::new(conn).await?;
        Ok(Self {
            conn: conn.clone(),
            manager,
        })
    }

    async fn current_session(&self) -> zbus::Result<SessionProxy<'static>> {
        let path = self.manager.get_current_session().await?;
        SessionProxy::builder(&self.conn).path(path)?.build().await
    }

    pub async fn restart(&self) -> zbus::Result<()> {
        self.manager.restart().await
    }

    pub async fn stop(&self) -> zbus::Result<()> {
        self.manager.stop().await
    }

    pub async fn suspend(&self) -> zbus::Result<()> {
        self.manager.suspend(true).await
    }

    pub async fn hibernate(&self) -> zbus::Result<()> {
        self.manager.hibernate(true).await
    }
}

impl SessionBackend for ConsoleKit {
    async fn can_switch_user(&self) -> zbus::Result<bool> {
        let seat_path = self.current_session().await?.get_seat_id().await?;
        let seat = SeatProxy::builder(&self.conn)
            .path(seat_path)?
            .build()
            .await?;
        seat.can_activate_sessions().await
    }

    async fn can_suspend(&self) -> zbus::Result<bool> {
        self.manager.can_suspend().await.map(|a| answer_is_yes(&a))
    }

    async fn can_hibernate(&self) -> zbus::Result<bool> {
        self.manager.can_hibernate().await.map(|a| answer_is_yes(&a))
    }

    async fn can_restart(&self) -> zbus::Result<bool> {
        self.manager.can_restart().await
    }

    async fn can_stop(&self) -> zbus::Result<bool> {
        self.manager.can_stop().await
    }

    async fn is_login_window(&self) -> zbus::Result<bool> {
        let session_type = self.current_session().await?.get_session_type().await?;
        Ok(session_type == LOGIN_WINDOW_TYPE)
    }
}
