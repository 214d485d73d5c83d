// Copyright 2019-2021 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Typed access to the Windows registry through the `reg` command-line tool.
//!
//! Every operation runs `reg` through a [`ShellExecutor`] and parses its textual output.
//! Keys and values are returned as immutable snapshots; nothing is cached.
//!
//! ```no_run
//! use nt_reg::*;
//!
//! # fn main() -> Result<(), RegistryError> {
//! let gateway = StoreGateway::system();
//! let key = gateway.fetch_key("HKEY_CURRENT_USER\\Environment")?;
//!
//! for value in key.values() {
//!     println!("{} = {:?}", value.name(), value.data());
//! }
//! # Ok(())
//! # }
//! ```

mod helpers;

pub mod codec;
mod error;
mod gateway;
mod key;
mod key_value;
mod path;
pub mod record;
mod shell;
mod value_type;

pub use crate::codec::{Environment, ValueData};
pub use crate::error::*;
pub use crate::gateway::*;
pub use crate::key::*;
pub use crate::key_value::*;
pub use crate::path::*;
pub use crate::record::{QueryRecords, ValueRecord};
pub use crate::shell::*;
pub use crate::value_type::*;
