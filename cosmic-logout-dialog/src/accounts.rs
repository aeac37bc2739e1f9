// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use rustix::process::getuid;
use zbus::{Connection, proxy, zvariant::OwnedObjectPath};

#[proxy(
    interface = "org.freedesktop.Accounts",
    default_service = "org.freedesktop.Accounts",
    default_path = "/org/freedesktop/Accounts"
)]
trait Accounts {
    fn find_user_by_id(&self, id: i64) -> zbus::Result<OwnedObjectPath>;
}

#[proxy(
    interface = "org.freedesktop.Accounts.User",
    default_service = "org.freedesktop.Accounts"
)]
trait User {
    #[zbus(property)]
    fn real_name(&self) -> zbus::Result<String>;

    #[zbus(property)]
    fn user_name(&self) -> zbus::Result<String>;
}

/// Names of the user running the dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserNames {
    pub real_name: String,
    pub user_name: String,
}

impl UserNames {
    /// The real name, unless it is blank or the placeholder `Unknown`.
    pub fn display_name(&self) -> &str {
        let real_name = self.real_name.trim();
        if real_name.is_empty() || real_name == "Unknown" {
            &self.user_name
        } else {
            real_name
        }
    }

    pub async fn lookup(conn: &Connection) -> Self {
        match Self::from_accounts_service(conn).await {
            Ok(names) if !names.user_name.is_empty() => names,
            Ok(names) => Self {
                user_name: login_name(),
                ..names
            },
            Err(why) => {
                tracing::debug!(?why, "AccountsService lookup failed");
                Self {
                    real_name: String::new(),
                    user_name: login_name(),
                }
            }
        }
    }

    async fn from_accounts_service(conn: &Connection) -> zbus::Result<Self> {
        let accounts = AccountsProxy::new(conn).await?;
        let path = accounts
            .find_user_by_id(i64::from(getuid().as_raw()))
            .await?;
        let user = UserProxy::builder(conn).path(path)?.build().await?;

        Ok(Self {
            real_name: user.real_name().await.unwrap_or_default(),
            user_name: user.user_name().await.unwrap_or_default(),
        })
    }
}

fn login_name() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_else(|_| getuid().as_raw().to_string())
}
