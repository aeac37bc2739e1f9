// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

pub mod accounts;
pub mod actions;
pub mod backend;
pub mod capabilities;
pub mod cli;
pub mod countdown;
pub mod dialog;
pub mod display_manager;
pub mod localize;
pub mod manager;
pub mod response;
pub mod session_manager;
pub mod terminal;

use anyhow::Context;
use cosmic_logout_dialog_config::Settings;
use zbus::Connection;

use crate::{
    cli::Options,
    dialog::{LogoutDialog, SessionContext},
    manager::DialogManager,
    response::Response,
};

/// Shows the dialog on the terminal and waits for its answer.
pub async fn run(options: Options) -> anyhow::Result<Response> {
    let settings = Settings::load();
    let system = Connection::system()
        .await
        .context("failed to connect to the system bus")?;
    let session = SessionContext::gather(&system, &settings)
        .await
        .context("failed to query the session backend")?;

    let mut manager = DialogManager::default();
    let dialog = manager.present(LogoutDialog::new(
        options.kind,
        session,
        options.placement,
    ));
    let backend = dialog.backend().cloned();

    terminal::spawn_input(
        dialog.sender(),
        dialog.buttons().to_vec(),
        !dialog.timer_running(),
    );

    let mut stderr = std::io::stderr();
    terminal::render(dialog, &mut stderr)?;

    let response = loop {
        let Some(event) = dialog.next_event().await else {
            break Response::Cancel;
        };
        if let Some(response) = dialog.update(event) {
            break response;
        }
        terminal::render(dialog, &mut stderr)?;
    };
    manager.close();

    if options.perform {
        if let Some(backend) = backend {
            actions::perform(response, &backend).await?;
        }
    }

    Ok(response)
}
