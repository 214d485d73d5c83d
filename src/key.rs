// Copyright 2019-2021 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::error::Result;
use crate::gateway::StoreGateway;
use crate::key_value::Value;
use crate::path::{leaf_name_matches, names_equal, KeyPath};
use crate::shell::ShellExecutor;
use crate::value_type::ValueType;
use core::fmt;
use std::path::Path;

/// A single key of the registry.
/// It has a name and possibly subkeys and values.
///
/// A `Key` is a snapshot taken by [`StoreGateway::fetch_key`] and never changes.
/// Operations that modify the registry do not update it; use [`Key::reload`] to get a new snapshot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Key {
    path: KeyPath,
    children: Vec<String>,
    values: Vec<Value>,
    default_value: Option<Value>,
}

impl Key {
    pub(crate) fn new(
        path: KeyPath,
        children: Vec<String>,
        values: Vec<Value>,
        default_value: Option<Value>,
    ) -> Self {
        Self {
            path,
            children,
            values,
            default_value,
        }
    }

    /// Returns the full path of this key.
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Returns the name of this key, which is the last element of its path.
    pub fn name(&self) -> &str {
        self.path.name()
    }

    /// Returns the path of the parent key, or `None` for a root key.
    pub fn parent(&self) -> Option<&str> {
        self.path.parent()
    }

    /// Returns the full paths of all subkeys, in the order the registry reported them.
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// Returns all values except the default value.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Finds a single value by name (case-insensitively).
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|value| names_equal(value.name(), name))
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    /// Fetches the subkey `name` (compared case-insensitively).
    ///
    /// Returns `None` if this snapshot has no such subkey.
    pub fn child<S: ShellExecutor>(
        &self,
        gateway: &StoreGateway<S>,
        name: &str,
    ) -> Option<Result<Key>> {
        let child = self
            .children
            .iter()
            .find(|child| leaf_name_matches(child, name))?;

        Some(gateway.fetch_key(child))
    }

    /// Fetches all subkeys.
    pub fn child_keys<S: ShellExecutor>(&self, gateway: &StoreGateway<S>) -> Result<Vec<Key>> {
        self.children
            .iter()
            .map(|child| gateway.fetch_key(child))
            .collect()
    }

    /// Fetches the parent key, or returns `None` for a root key.
    pub fn parent_key<S: ShellExecutor>(&self, gateway: &StoreGateway<S>) -> Option<Result<Key>> {
        let parent = self.parent()?;
        Some(gateway.fetch_key(parent))
    }

    /// Fetches a new snapshot of this key.
    pub fn reload<S: ShellExecutor>(&self, gateway: &StoreGateway<S>) -> Result<Key> {
        gateway.fetch_key(self.path())
    }

    /// Creates or replaces the value `name` of this key.
    ///
    /// See [`StoreGateway::set_value`] for the meaning of `separator`.
    pub fn set_value<S: ShellExecutor>(
        &self,
        gateway: &StoreGateway<S>,
        name: &str,
        value_type: ValueType,
        separator: Option<char>,
        raw_value: &str,
    ) -> Result<()> {
        gateway.set_value(self.path(), name, value_type, separator, raw_value)
    }

    pub fn set_default_value<S: ShellExecutor>(
        &self,
        gateway: &StoreGateway<S>,
        value_type: ValueType,
        separator: Option<char>,
        raw_value: &str,
    ) -> Result<()> {
        gateway.set_default_value(self.path(), value_type, separator, raw_value)
    }

    pub fn delete_value<S: ShellExecutor>(&self, gateway: &StoreGateway<S>, name: &str) -> Result<()> {
        gateway.delete_value(self.path(), name)
    }

    pub fn delete_default_value<S: ShellExecutor>(&self, gateway: &StoreGateway<S>) -> Result<()> {
        gateway.delete_default_value(self.path())
    }

    pub fn delete_all_values<S: ShellExecutor>(&self, gateway: &StoreGateway<S>) -> Result<()> {
        gateway.delete_all_values(self.path())
    }

    /// Exports this key with all its subkeys into the file `destination`.
    pub fn export<S: ShellExecutor>(&self, gateway: &StoreGateway<S>, destination: &Path) -> Result<()> {
        gateway.export_key(self.path(), destination)
    }

    /// Deletes this key together with all its subkeys and values.
    pub fn delete<S: ShellExecutor>(self, gateway: &StoreGateway<S>) -> Result<()> {
        gateway.delete_key(self.path())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path={};", self.path)?;
        write!(f, "parent={};", self.parent().unwrap_or_default())?;
        write!(f, "name={};", self.name())?;

        f.write_str("defaultValue=")?;
        if let Some(default_value) = &self.default_value {
            write!(f, "{}", default_value)?;
        }

        f.write_str(";values=[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }

            write!(f, "{}", value)?;
        }

        write!(f, "];children=[{}]", self.children.join(","))
    }
}
