// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

//! Presents a [`LogoutDialog`] on a terminal.

use std::io::{self, BufRead, Write};

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    dialog::{DialogButton, Event, LogoutDialog},
    response::Response,
};

const PROGRESS_WIDTH: usize = 30;

pub fn progress_bar(fraction: f32, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f32).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Maps one line of user input onto a dialog event. `q` is the Cancel
/// button, countdown or not.
pub fn parse_input(line: &str, buttons: &[DialogButton]) -> Option<Event> {
    let input = line.trim().to_lowercase();
    if input.is_empty() {
        return Some(Event::Activate);
    }

    if input == "q" || input == "quit" {
        return Some(Event::Respond(Response::Cancel));
    }

    let mut chars = input.chars();
    if let (Some(key), None) = (chars.next(), chars.next()) {
        return buttons
            .iter()
            .find(|b| b.mnemonic() == Some(key))
            .map(|b| Event::Respond(b.response));
    }

    buttons
        .iter()
        .find(|b| b.response.as_str() == input || b.text().to_lowercase() == input)
        .map(|b| Event::Respond(b.response))
}

pub fn render<B>(dialog: &LogoutDialog<B>, out: &mut impl Write) -> io::Result<()> {
    // clear and home
    write!(out, "\x1b[2J\x1b[H")?;
    writeln!(out, "[{}] {}", dialog.icon_name(), dialog.primary_text())?;

    if !dialog.secondary_text().is_empty() {
        writeln!(out, "{}", dialog.secondary_text())?;
    }

    if let Some(fraction) = dialog.progress() {
        writeln!(
            out,
            "{} {}",
            progress_bar(fraction, PROGRESS_WIDTH),
            dialog.progress_text()
        )?;
    }

    writeln!(out)?;
    let default_response = dialog.default_response();
    let mut default_text = None;
    for button in dialog.buttons() {
        let label = match button.mnemonic() {
            Some(key) => format!("({key}) {}", button.text()),
            None => button.text(),
        };
        if button.response == default_response {
            default_text = Some(button.text());
            write!(out, "  *{label}*")?;
        } else {
            write!(out, "  {label}")?;
        }
    }
    writeln!(out)?;

    match default_text {
        Some(text) => writeln!(out, "Type a letter and press Enter, or just Enter to {text}.")?,
        None => writeln!(out, "Type a letter and press Enter.")?,
    }
    out.flush()
}

/// Reads stdin on its own thread and forwards recognised input to the
/// dialog. End of input cancels when `cancel_on_eof` is set.
pub fn spawn_input(
    events: UnboundedSender<Event>,
    buttons: Vec<DialogButton>,
    cancel_on_eof: bool,
) {
    let spawned = std::thread::Builder::new()
        .name("logout-dialog-input".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };

                match parse_input(&line, &buttons) {
                    Some(event) => {
                        if events.send(event).is_err() {
                            return;
                        }
                    }
                    None => tracing::debug!("unrecognised input {line:?}"),
                }
            }

            if cancel_on_eof {
                let _ = events.send(Event::Respond(Response::Cancel));
            }
        });

    if let Err(why) = spawned {
        tracing::error!("failed to read terminal input: {why}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        capabilities::Capabilities,
        dialog::{Placement, tests::session},
    };

    #[test]
    fn progress_bar_rounds_to_width() {
        assert_eq!(progress_bar(1.0, 4), "[####]");
        assert_eq!(progress_bar(0.5, 4), "[##--]");
        assert_eq!(progress_bar(0.0, 4), "[----]");
        assert_eq!(progress_bar(2.0, 2), "[##]");
    }

    #[test]
    fn input_picks_buttons() {
        let dialog = LogoutDialog::shutdown(session(Capabilities::ALL, 0), Placement::default());
        let buttons = dialog.buttons();

        assert_eq!(parse_input("", buttons), Some(Event::Activate));
        assert_eq!(parse_input("U\n", buttons), Some(Event::Respond(Response::Suspend)));
        assert_eq!(parse_input("r", buttons), Some(Event::Respond(Response::Reboot)));
        assert_eq!(parse_input("shut down", buttons), Some(Event::Respond(Response::Shutdown)));
        assert_eq!(parse_input("hibernate", buttons), Some(Event::Respond(Response::Hibernate)));
        assert_eq!(parse_input("q", buttons), Some(Event::Respond(Response::Cancel)));
        assert_eq!(parse_input("x", buttons), None);
    }

    #[tokio::test(start_paused = true)]
    async fn quit_cancels_a_running_countdown() {
        let mut dialog = LogoutDialog::logout(session(Capabilities::ALL, 30), Placement::default());
        dialog.show();
        assert!(dialog.timer_running());

        let event = parse_input("q", dialog.buttons()).unwrap();
        assert_eq!(dialog.update(event), Some(Response::Cancel));
        assert!(!dialog.timer_running());
    }

    #[test]
    fn no_default_hint_without_default_button() {
        let capabilities = Capabilities {
            shutdown: false,
            ..Capabilities::ALL
        };
        let mut dialog = LogoutDialog::shutdown(session(capabilities, 0), Placement::default());
        dialog.show();
        assert_eq!(parse_input("", dialog.buttons()), Some(Event::Activate));
        assert_eq!(dialog.update(Event::Activate), None);

        let mut out = Vec::new();
        render(&dialog, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Type a letter and press Enter."));
        assert!(!text.contains("Shut Down"));
    }

    #[test]
    fn renders_hidden_progress_without_bar() {
        let mut dialog =
            LogoutDialog::logout(session(Capabilities::default(), 0), Placement::default());
        dialog.show();

        let mut out = Vec::new();
        render(&dialog, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("[system-log-out] Log out of this system now?"));
        assert!(text.contains("(c) Cancel"));
        assert!(text.contains("*(l) Log Out*"));
        assert!(!text.contains('#'));
    }
}
