// Copyright 2019-2021 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: GPL-2.0-or-later

use core::fmt;

/// Separator between the elements of a registry path.
pub const SEPARATOR: char = '\\';

pub const HKEY_CLASSES_ROOT: &str = "HKEY_CLASSES_ROOT";
pub const HKEY_CURRENT_USER: &str = "HKEY_CURRENT_USER";
pub const HKEY_LOCAL_MACHINE: &str = "HKEY_LOCAL_MACHINE";
pub const HKEY_USERS: &str = "HKEY_USERS";
pub const HKEY_CURRENT_CONFIG: &str = "HKEY_CURRENT_CONFIG";

/// Canonical path of a registry key, e.g. `HKEY_CURRENT_USER\Software\App`.
///
/// Forward slashes are accepted as separators and a single trailing separator is stripped.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct KeyPath(String);

impl KeyPath {
    pub fn new(path: &str) -> Self {
        let mut path = path.replace('/', "\\");
        if path.ends_with(SEPARATOR) {
            path.pop();
        }

        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last element of this path.
    pub fn name(&self) -> &str {
        leaf_name(&self.0)
    }

    /// Returns this path without its last element, or `None` for a root key.
    pub fn parent(&self) -> Option<&str> {
        self.0.rfind(SEPARATOR).map(|index| &self.0[..index])
    }

    /// Returns the path of the subkey `name` below this path.
    pub fn join(&self, name: &str) -> Self {
        Self::new(&format!("{}{}{}", self.0, SEPARATOR, name))
    }
}

impl AsRef<str> for KeyPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KeyPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<KeyPath> for String {
    fn from(path: KeyPath) -> Self {
        path.0
    }
}

/// Returns the last element of a registry path.
pub fn leaf_name(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(index) => &path[index + SEPARATOR.len_utf8()..],
        None => path,
    }
}

/// Compares two key or value names case-insensitively, like the registry does.
pub fn names_equal(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_uppercase)
        .eq(b.chars().flat_map(char::to_uppercase))
}

/// Checks whether the last element of `path` is `name`, compared case-insensitively.
pub fn leaf_name_matches(path: &str, name: &str) -> bool {
    names_equal(leaf_name(path), name)
}
