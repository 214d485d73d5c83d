// Copyright 2019-2021 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Conversion between the textual value representation of the registry tool and typed data.

use crate::error::{RegistryError, Result};
use crate::value_type::ValueType;
use std::env;

/// Marker preceding the hexadecimal digits of `REG_DWORD` and `REG_QWORD` data.
const HEX_NUMBER_MARKER: &str = "0x";

/// Escape the registry tool uses to print the NUL separator of `REG_MULTI_SZ` data.
pub const MULTI_STRING_ESCAPE: &str = "\\0";

/// Typed data of a registry [`Value`], decoded from its raw textual representation.
///
/// [`Value`]: crate::key_value::Value
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValueData {
    Binary(Vec<u8>),
    DWord(u32),
    QWord(u64),
    /// Data of `REG_SZ`, `REG_FULL_RESOURCE_DESCRIPTOR` and `REG_NONE` values.
    String(String),
    /// Data of a `REG_EXPAND_SZ` value after all known environment variables have been substituted.
    ExpandString(String),
    MultiString(Vec<String>),
}

impl ValueData {
    /// Returns the raw textual representation of this data, as the registry tool prints it.
    ///
    /// For [`ValueData::ExpandString`], this is the already expanded string.
    pub fn encode(&self) -> String {
        match self {
            ValueData::Binary(bytes) => encode_binary(bytes),
            ValueData::DWord(dword) => encode_dword(*dword),
            ValueData::QWord(qword) => encode_qword(*qword),
            ValueData::String(string) | ValueData::ExpandString(string) => string.clone(),
            ValueData::MultiString(strings) => encode_multi_string(strings, None),
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ValueData::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_dword(&self) -> Option<u32> {
        match self {
            ValueData::DWord(dword) => Some(*dword),
            _ => None,
        }
    }

    pub fn as_qword(&self) -> Option<u64> {
        match self {
            ValueData::QWord(qword) => Some(*qword),
            _ => None,
        }
    }

    /// Returns the string of a `REG_SZ`, `REG_EXPAND_SZ`, `REG_FULL_RESOURCE_DESCRIPTOR` or `REG_NONE` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ValueData::String(string) | ValueData::ExpandString(string) => Some(string),
            _ => None,
        }
    }

    pub fn as_strings(&self) -> Option<&[String]> {
        match self {
            ValueData::MultiString(strings) => Some(strings),
            _ => None,
        }
    }
}

/// Snapshot of environment variables used to expand `REG_EXPAND_SZ` data.
///
/// Variable names are matched ASCII case-insensitively, like on Windows.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Environment {
    variables: Vec<(String, String)>,
}

impl Environment {
    /// Creates an environment without any variables.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Takes a snapshot of the environment of the current process.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_process() -> Self {
        env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Returns the value of the variable `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(variable, _)| variable.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Adds a variable, replacing any existing one with the same name.
    pub fn set<N, V>(&mut self, name: N, value: V)
    where
        N: Into<String>,
        V: Into<String>,
    {
        let name = name.into();
        let value = value.into();

        match self
            .variables
            .iter_mut()
            .find(|(variable, _)| variable.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.variables.push((name, value)),
        }
    }
}

impl<N, V> FromIterator<(N, V)> for Environment
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut environment = Self::empty();
        for (name, value) in iter {
            environment.set(name, value);
        }

        environment
    }
}

/// Decodes the raw textual representation `raw` of a value of type `value_type`.
///
/// `environment` is only consulted for [`ValueType::ExpandString`].
pub fn decode(value_type: ValueType, raw: &str, environment: &Environment) -> Result<ValueData> {
    let malformed = || RegistryError::MalformedValue {
        value_type,
        raw: raw.to_string(),
    };

    match value_type {
        ValueType::Binary => decode_binary(raw).ok_or_else(malformed).map(ValueData::Binary),
        ValueType::DWord => hex_number_digits(raw)
            .and_then(|digits| u32::from_str_radix(digits, 16).ok())
            .ok_or_else(malformed)
            .map(ValueData::DWord),
        ValueType::QWord => hex_number_digits(raw)
            .and_then(|digits| u64::from_str_radix(digits, 16).ok())
            .ok_or_else(malformed)
            .map(ValueData::QWord),
        ValueType::String | ValueType::FullResourceDescriptor | ValueType::None => {
            Ok(ValueData::String(raw.to_string()))
        }
        ValueType::ExpandString => Ok(ValueData::ExpandString(expand(raw, environment))),
        ValueType::MultiString => Ok(ValueData::MultiString(decode_multi_string(raw))),
    }
}

/// Odd lengths and non-hex characters are both malformed.
fn decode_binary(raw: &str) -> Option<Vec<u8>> {
    hex::decode(raw).ok()
}

/// Returns the hexadecimal digits following the `0x` marker.
fn hex_number_digits(raw: &str) -> Option<&str> {
    let marker = raw.get(..HEX_NUMBER_MARKER.len())?;
    if !marker.eq_ignore_ascii_case(HEX_NUMBER_MARKER) {
        return None;
    }

    // `from_str_radix` would also accept a leading sign.
    let digits = &raw[HEX_NUMBER_MARKER.len()..];
    if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    Some(digits)
}

fn decode_multi_string(raw: &str) -> Vec<String> {
    let mut strings = Vec::new();
    let mut string = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        let is_separator = match c {
            '\0' => true,
            '\\' if chars.peek() == Some(&'0') => {
                chars.next();
                true
            }
            _ => false,
        };

        if !is_separator {
            string.push(c);
            continue;
        }

        // An empty entry terminates the list.
        if string.is_empty() {
            return strings;
        }

        strings.push(core::mem::take(&mut string));
    }

    if !string.is_empty() {
        strings.push(string);
    }

    strings
}

/// Replaces every `%NAME%` token naming a variable of `environment` by the variable's value.
///
/// Unknown tokens are kept as they are. Substituted values are inserted verbatim and not scanned again.
pub fn expand(raw: &str, environment: &Environment) -> String {
    let mut expanded = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find('%') {
        expanded.push_str(&rest[..start]);
        let after_start = &rest[start + 1..];

        let end = match after_start.find('%') {
            Some(end) => end,
            None => {
                rest = &rest[start..];
                break;
            }
        };

        let name = &after_start[..end];
        match environment.get(name).filter(|_| !name.is_empty()) {
            Some(value) => {
                expanded.push_str(value);
                rest = &after_start[end + 1..];
            }
            None => {
                // The closing percent sign may open the next token.
                expanded.push('%');
                expanded.push_str(name);
                rest = &after_start[end..];
            }
        }
    }

    expanded.push_str(rest);
    expanded
}

/// Encodes bytes as contiguous pairs of uppercase hex digits.
pub fn encode_binary(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

pub fn encode_dword(dword: u32) -> String {
    format!("{}{:x}", HEX_NUMBER_MARKER, dword)
}

pub fn encode_qword(qword: u64) -> String {
    format!("{}{:x}", HEX_NUMBER_MARKER, qword)
}

/// Joins the entries of a `REG_MULTI_SZ` value with `separator`.
///
/// Without a separator, the entries are joined with the `\0` escape the registry tool understands by default.
/// Pass the same separator to [`StoreGateway::set_value`] when writing the result.
///
/// [`StoreGateway::set_value`]: crate::gateway::StoreGateway::set_value
pub fn encode_multi_string<S: AsRef<str>>(strings: &[S], separator: Option<char>) -> String {
    let mut raw = String::new();

    for (i, string) in strings.iter().enumerate() {
        if i > 0 {
            match separator {
                Some(separator) => raw.push(separator),
                None => raw.push_str(MULTI_STRING_ESCAPE),
            }
        }

        raw.push_str(string.as_ref());
    }

    raw
}
