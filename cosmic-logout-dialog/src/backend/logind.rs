// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use logind_zbus::{
    manager::{IsSupported, ManagerProxy},
    seat::SeatProxy,
    session::{SessionClass, SessionProxy},
};
use zbus::Connection;

use super::SessionBackend;

/// Seat of the calling session, resolved by logind itself.
const OWN_SEAT_PATH: &str = "/org/freedesktop/login1/seat/self";

#[derive(Debug, Clone)]
pub struct Logind {
    conn: Connection,
    manager: ManagerProxy<'static>,
}

impl Logind {
    pub async fn new(conn: &Connection) -> zbus::Result<Self> {
        let manager = ManagerProxy::new(conn).await?;
        Ok(Self {
            conn: conn.clone(),
            manager,
        })
    }

    async fn current_session(&self) -> zbus::Result<SessionProxy<'static>> {
        let path = match std::env::var("XDG_SESSION_ID") {
            Ok(id) if !id.is_empty() => self.manager.get_session(&id).await?,
            _ => self.manager.get_session_by_pid(std::process::id()).await?,
        };

        SessionProxy::builder(&self.conn).path(path)?.build().await
    }

    pub async fn restart(&self) -> zbus::Result<()> {
        self.manager.reboot(true).await
    }

    pub async fn stop(&self) -> zbus::Result<()> {
        self.manager.power_off(true).await
    }

    pub async fn suspend(&self) -> zbus::Result<()> {
        self.manager.suspend(true).await
    }

    pub async fn hibernate(&self) -> zbus::Result<()> {
        self.manager.hibernate(true).await
    }
}

/// `Challenge` still lets the user authenticate.
fn supported(answer: IsSupported) -> bool {
    matches!(answer, IsSupported::Yes | IsSupported::Challenge)
}

impl SessionBackend for Logind {
    async fn can_switch_user(&self) -> zbus::Result<bool> {
        // sessions without a seat (ssh, cron) cannot hand over a display
        let on_seat = std::env::var("XDG_SEAT").is_ok_and(|seat| !seat.is_empty());
        if !on_seat {
            return Ok(false);
        }

        let seat = SeatProxy::builder(&self.conn)
            .path(OWN_SEAT_PATH)?
            .build()
            .await?;
        seat.can_multi_session().await
    }

    async fn can_suspend(&self) -> zbus::Result<bool> {
        self.manager.can_suspend().await.map(supported)
    }

    async fn can_hibernate(&self) -> zbus::Result<bool> {
        self.manager.can_hibernate().await.map(supported)
    }

    async fn can_restart(&self) -> zbus::Result<bool> {
        self.manager.can_reboot().await.map(supported)
    }

    async fn can_stop(&self) -> zbus::Result<bool> {
        self.manager.can_power_off().await.map(supported)
    }

    async fn is_login_window(&self) -> zbus::Result<bool> {
        let class = self.current_session().await?.class().await?;
        Ok(class == SessionClass::Greeter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_counts_as_supported() {
        assert!(supported(IsSupported::Yes));
        assert!(supported(IsSupported::Challenge));
        assert!(!supported(IsSupported::No));
    }
}
