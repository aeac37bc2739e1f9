// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use crate::{backend::Backend, dialog::LogoutDialog};

/// Owner of the one logout dialog allowed on screen.
pub struct DialogManager<B = Backend> {
    current: Option<LogoutDialog<B>>,
}

impl<B> Default for DialogManager<B> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<B> DialogManager<B> {
    /// Destroys the dialog currently on screen, if any, then shows `dialog`.
    pub fn present(&mut self, mut dialog: LogoutDialog<B>) -> &mut LogoutDialog<B> {
        if let Some(mut previous) = self.current.take() {
            tracing::debug!("replacing {:?} dialog", previous.kind());
            previous.destroy();
        }

        dialog.show();
        self.current.insert(dialog)
    }

    pub fn current(&self) -> Option<&LogoutDialog<B>> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut LogoutDialog<B>> {
        self.current.as_mut()
    }

    /// Destroys and hands back the current dialog.
    pub fn close(&mut self) -> Option<LogoutDialog<B>> {
        let mut dialog = self.current.take()?;
        dialog.destroy();
        Some(dialog)
    }
}
