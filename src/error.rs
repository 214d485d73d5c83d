// Copyright 2019-2021 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: GPL-2.0-or-later

use displaydoc::Display;

use crate::value_type::ValueType;

/// Central result type of nt-reg.
pub type Result<T, E = RegistryError> = core::result::Result<T, E>;

/// Central error type of nt-reg.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum RegistryError {
    /// The command {command:?} could not be executed: {message}
    Execution { command: String, message: String },
    /// The raw data {raw:?} is not valid for a value of type {value_type}
    MalformedValue { value_type: ValueType, raw: String },
    /// The registry tool failed with exit code {exit_code}: {diagnostic}
    StoreAccess { exit_code: i32, diagnostic: String },
    /// The value type {name:?} reported by the registry tool is not supported
    UnknownType { name: String },
    /// The query of key {path:?} succeeded, but returned no record for the value {name:?}
    ValueNotFound { path: String, name: String },
}

impl std::error::Error for RegistryError {}
