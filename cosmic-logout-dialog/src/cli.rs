// Copyright 2023 System76 <info@system76.com>
// SPDX-License-Identifier: GPL-3.0-only

use clap::Parser;

use crate::dialog::{DialogKind, Placement};

/// Asks for confirmation and prints the chosen response.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "cosmic-logout-dialog", version)]
pub struct Args {
    /// Which dialog to show
    #[arg(value_enum, default_value_t = DialogKind::Logout)]
    pub kind: DialogKind,

    /// Carry out the chosen response
    #[arg(long)]
    pub perform: bool,

    /// Screen the dialog belongs to
    #[arg(long, value_name = "NAME")]
    pub screen: Option<String>,

    /// Activation timestamp of the request
    #[arg(long = "time", value_name = "TIMESTAMP", default_value_t = 0)]
    pub activate_time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub kind: DialogKind,
    pub placement: Placement,
    pub perform: bool,
}

impl From<Args> for Options {
    fn from(args: Args) -> Self {
        Self {
            kind: args.kind,
            placement: Placement {
                screen: args.screen,
                activate_time: args.activate_time,
            },
            perform: args.perform,
        }
    }
}
