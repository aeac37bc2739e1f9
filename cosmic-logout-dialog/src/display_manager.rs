// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

//! Fallback capability queries answered by the display manager over its
//! local control socket.
//!
//! The exchange is line based: the client sends `QUERY_LOGOUT_ACTION` and
//! the daemon answers `OK` followed by a `;` separated list of actions,
//! where a trailing `!` marks the action currently selected.

use std::{io, path::PathBuf, time::Duration};

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
    time::timeout,
};

const QUERY_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutAction {
    Halt,
    Reboot,
    Suspend,
}

impl LogoutAction {
    fn from_protocol(name: &str) -> Option<Self> {
        match name {
            "HALT" => Some(LogoutAction::Halt),
            "REBOOT" => Some(LogoutAction::Reboot),
            "SUSPEND" => Some(LogoutAction::Suspend),
            _ => None,
        }
    }
}

/// Parses a `QUERY_LOGOUT_ACTION` reply. Returns `None` for anything other
/// than an `OK` reply; unknown action names are skipped.
pub fn parse_logout_actions(reply: &str) -> Option<Vec<LogoutAction>> {
    let reply = reply.trim();
    let list = match reply.split_once(' ') {
        Some(("OK", list)) => list,
        None if reply == "OK" => "",
        _ => return None,
    };

    Some(
        list.split(';')
            .map(|action| action.trim().trim_end_matches('!'))
            .filter_map(LogoutAction::from_protocol)
            .collect(),
    )
}

#[derive(Debug, Clone)]
pub struct DisplayManager {
    socket: PathBuf,
}

impl DisplayManager {
    pub fn new(socket: impl Into<PathBuf>) -> Self {
        Self {
            socket: socket.into(),
        }
    }

    /// Any failure to reach the daemon means the action is unsupported.
    pub async fn supports_logout_action(&self, action: LogoutAction) -> bool {
        match timeout(QUERY_TIMEOUT, self.query_logout_actions()).await {
            Ok(Ok(actions)) => actions.contains(&action),
            Ok(Err(why)) => {
                tracing::debug!(?why, socket = ?self.socket, "display manager query failed");
                false
            }
            Err(_) => {
                tracing::debug!(socket = ?self.socket, "display manager query timed out");
                false
            }
        }
    }

    async fn query_logout_actions(&self) -> io::Result<Vec<LogoutAction>> {
        let mut stream = UnixStream::connect(&self.socket).await?;
        stream.write_all(b"QUERY_LOGOUT_ACTION\n").await?;

        let mut reply = String::new();
        BufReader::new(stream).read_line(&mut reply).await?;

        parse_logout_actions(&reply).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unexpected reply {reply:?}"),
            )
        })
    }
}
