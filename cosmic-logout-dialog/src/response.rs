// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use std::{fmt, str::FromStr};

/// Outcome of a logout dialog, numbered like the session manager's modal
/// response codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Response {
    Logout = 0,
    SwitchUser = 1,
    Shutdown = 2,
    Reboot = 3,
    Hibernate = 4,
    Suspend = 5,
    Cancel = -6,
}

impl Response {
    pub const ALL: [Response; 7] = [
        Response::Cancel,
        Response::Logout,
        Response::SwitchUser,
        Response::Shutdown,
        Response::Reboot,
        Response::Hibernate,
        Response::Suspend,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Response::Cancel => "cancel",
            Response::Logout => "logout",
            Response::SwitchUser => "switch-user",
            Response::Shutdown => "shutdown",
            Response::Reboot => "reboot",
            Response::Hibernate => "hibernate",
            Response::Suspend => "suspend",
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown response `{0}`")]
pub struct UnknownResponse(pub String);

impl FromStr for Response {
    type Err = UnknownResponse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownResponse(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_session_manager() {
        assert_eq!(Response::Cancel.code(), -6);
        assert_eq!(Response::Logout.code(), 0);
        assert_eq!(Response::Suspend.code(), 5);
        assert_eq!(Response::from_code(3), Some(Response::Reboot));
        assert_eq!(Response::from_code(42), None);
    }

    #[test]
    fn names_parse_back() {
        assert_eq!("switch-user".parse(), Ok(Response::SwitchUser));
        let err = "halt".parse::<Response>().unwrap_err();
        assert_eq!(err, UnknownResponse("halt".into()));
        assert_eq!(err.to_string(), "unknown response `halt`");
    }
}
