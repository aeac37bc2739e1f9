// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use zbus::proxy;

#[proxy(
    interface = "com.system76.CosmicSession",
    default_service = "com.system76.CosmicSession",
    default_path = "/com/system76/CosmicSession"
)]
pub trait CosmicSession {
    fn exit(&self) -> zbus::Result<()>;
}

#[proxy(
    interface = "org.gnome.SessionManager",
    default_service = "org.gnome.SessionManager",
    default_path = "/org/gnome/SessionManager"
)]
pub trait SessionManager {
    /// Ends the session. Mode 0 still lets inhibitors object, 1 skips the
    /// confirmation, 2 ignores inhibitors.
    fn logout(&self, mode: u32) -> zbus::Result<()>;
}

#[proxy(
    interface = "org.freedesktop.DisplayManager.Seat",
    default_service = "org.freedesktop.DisplayManager"
)]
pub trait DisplayManagerSeat {
    fn switch_to_greeter(&self) -> zbus::Result<()>;
}
