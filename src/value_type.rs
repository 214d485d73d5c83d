// Copyright 2019-2021 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::error::{RegistryError, Result};
use core::fmt;
use core::str::FromStr;
use enumn::N;

/// Possible data types of a registry [`Value`].
///
/// The discriminants are the numeric type codes used by the registry itself.
/// You can use [`ValueType::n`] to look up a type by its code.
///
/// [`Value`]: crate::key_value::Value
#[derive(Clone, Copy, Debug, Eq, Hash, N, PartialEq)]
#[repr(u32)]
pub enum ValueType {
    None = 0x0000_0000,
    String = 0x0000_0001,
    ExpandString = 0x0000_0002,
    Binary = 0x0000_0003,
    DWord = 0x0000_0004,
    MultiString = 0x0000_0007,
    FullResourceDescriptor = 0x0000_0009,
    QWord = 0x0000_000b,
}

impl ValueType {
    /// All supported value types, in order of their numeric type codes.
    pub const ALL: [ValueType; 8] = [
        ValueType::None,
        ValueType::String,
        ValueType::ExpandString,
        ValueType::Binary,
        ValueType::DWord,
        ValueType::MultiString,
        ValueType::FullResourceDescriptor,
        ValueType::QWord,
    ];

    /// Returns the numeric type code of this value type.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Returns the name the registry tool uses for this value type (e.g. `REG_SZ`).
    pub fn name(self) -> &'static str {
        match self {
            ValueType::None => "REG_NONE",
            ValueType::String => "REG_SZ",
            ValueType::ExpandString => "REG_EXPAND_SZ",
            ValueType::Binary => "REG_BINARY",
            ValueType::DWord => "REG_DWORD",
            ValueType::MultiString => "REG_MULTI_SZ",
            ValueType::FullResourceDescriptor => "REG_FULL_RESOURCE_DESCRIPTOR",
            ValueType::QWord => "REG_QWORD",
        }
    }

    /// Looks up a value type by the name the registry tool prints for it.
    ///
    /// The comparison is case-sensitive, just like the tool output.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|value_type| value_type.name() == name)
            .ok_or_else(|| RegistryError::UnknownType {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}
