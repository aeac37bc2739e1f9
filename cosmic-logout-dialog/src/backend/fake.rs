// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use std::cell::Cell;

use super::SessionBackend;

/// Backend answering from fixed flags, counting switch-user lookups.
#[derive(Debug, Default)]
pub(crate) struct FakeBackend {
    pub switch_user: bool,
    pub suspend: bool,
    pub hibernate: bool,
    pub restart: bool,
    pub stop: bool,
    pub login_window: bool,
    pub failing: bool,
    pub switch_user_queries: Cell<u32>,
}

impl FakeBackend {
    pub fn capable() -> Self {
        Self {
            switch_user: true,
            suspend: true,
            hibernate: true,
            restart: true,
            stop: true,
            ..Default::default()
        }
    }

    fn answer(&self, value: bool) -> zbus::Result<bool> {
        if self.failing {
            Err(zbus::Error::Failure("backend unavailable".into()))
        } else {
            Ok(value)
        }
    }
}

impl SessionBackend for FakeBackend {
    async fn can_switch_user(&self) -> zbus::Result<bool> {
        self.switch_user_queries.set(self.switch_user_queries.get() + 1);
        self.answer(self.switch_user)
    }

    async fn can_suspend(&self) -> zbus::Result<bool> {
        self.answer(self.suspend)
    }

    async fn can_hibernate(&self) -> zbus::Result<bool> {
        self.answer(self.hibernate)
    }

    async fn can_restart(&self) -> zbus::Result<bool> {
        self.answer(self.restart)
    }

    async fn can_stop(&self) -> zbus::Result<bool> {
        self.answer(self.stop)
    }

    async fn is_login_window(&self) -> zbus::Result<bool> {
        self.answer(self.login_window)
    }
}
