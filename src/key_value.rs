// Copyright 2020-2021 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::codec::{self, Environment, ValueData};
use crate::error::Result;
use crate::gateway::StoreGateway;
use crate::key::Key;
use crate::record::ValueRecord;
use crate::shell::ShellExecutor;
use crate::value_type::ValueType;
use core::fmt;

/// A single value that belongs to a [`Key`].
/// It has a name, a type and data in both raw and decoded form.
///
/// A `Value` is a snapshot and never changes. Use [`Value::reload`] to fetch the current state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Value {
    name: String,
    value_type: ValueType,
    raw_value: String,
    data: ValueData,
    owner_path: String,
}

impl Value {
    /// Creates a value from its raw textual representation, decoding it on the way.
    ///
    /// `environment` is used to expand `REG_EXPAND_SZ` data.
    pub fn new(
        name: &str,
        value_type: ValueType,
        raw_value: &str,
        owner_path: &str,
        environment: &Environment,
    ) -> Result<Self> {
        let data = codec::decode(value_type, raw_value, environment)?;

        Ok(Self {
            name: name.to_string(),
            value_type,
            raw_value: raw_value.to_string(),
            data,
            owner_path: owner_path.to_string(),
        })
    }

    pub(crate) fn decode(
        record: ValueRecord,
        owner_path: &str,
        environment: &Environment,
    ) -> Result<Self> {
        Self::new(
            &record.name,
            record.value_type,
            &record.raw_value,
            owner_path,
            environment,
        )
    }

    /// Returns the name of this value, which is empty for the default value.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns the data exactly as printed by the registry tool.
    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// Returns the decoded data.
    ///
    /// `REG_EXPAND_SZ` data has been expanded with the environment at the time this value was fetched.
    pub fn data(&self) -> &ValueData {
        &self.data
    }

    /// Returns the path of the key this value belongs to.
    pub fn owner_path(&self) -> &str {
        &self.owner_path
    }

    /// Fetches the current state of this value from the registry.
    pub fn reload<S: ShellExecutor>(&self, gateway: &StoreGateway<S>) -> Result<Self> {
        gateway.fetch_value(&self.owner_path, &self.name)
    }

    /// Fetches the key this value belongs to.
    pub fn key<S: ShellExecutor>(&self, gateway: &StoreGateway<S>) -> Result<Key> {
        gateway.fetch_key(&self.owner_path)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.name, self.value_type, self.raw_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::helpers::tests::{FakeRegistry, TEST_KEY};

    #[test]
    fn test_new() {
        let environment: Environment = [("windir", "C:\\Windows")].into_iter().collect();
        let value = Value::new(
            "Path",
            ValueType::ExpandString,
            "%WINDIR%\\Temp",
            TEST_KEY,
            &environment,
        )
        .unwrap();

        assert_eq!(value.name(), "Path");
        assert!(!value.is_default());
        assert_eq!(value.raw_value(), "%WINDIR%\\Temp");
        assert_eq!(value.data().as_str(), Some("C:\\Windows\\Temp"));
        assert_eq!(value.to_string(), "Path|REG_EXPAND_SZ|%WINDIR%\\Temp");

        assert!(matches!(
            Value::new("Bad", ValueType::QWord, "12", TEST_KEY, &environment),
            Err(RegistryError::MalformedValue { .. })
        ));
    }

    #[test]
    fn test_reload() {
        let registry = FakeRegistry::new();
        let gateway = StoreGateway::new(&registry);

        gateway
            .set_value(TEST_KEY, "Counter", ValueType::DWord, None, "1")
            .unwrap();
        let value = gateway.fetch_value(TEST_KEY, "Counter").unwrap();
        assert_eq!(value.data(), &ValueData::DWord(1));

        gateway
            .set_value(TEST_KEY, "Counter", ValueType::DWord, None, "2")
            .unwrap();

        // The snapshot stays as it was, the reloaded value is new.
        let reloaded = value.reload(&gateway).unwrap();
        assert_eq!(value.data(), &ValueData::DWord(1));
        assert_eq!(reloaded.data(), &ValueData::DWord(2));
        assert_eq!(reloaded.owner_path(), TEST_KEY);

        assert_eq!(value.key(&gateway).unwrap().path(), TEST_KEY);

        gateway.delete_value(TEST_KEY, "Counter").unwrap();
        assert!(matches!(
            value.reload(&gateway),
            Err(RegistryError::StoreAccess { .. })
        ));
    }

    #[test]
    fn test_reload_default() {
        let registry = FakeRegistry::new();
        let gateway = StoreGateway::new(&registry);

        gateway
            .set_default_value(TEST_KEY, ValueType::String, None, "first")
            .unwrap();
        let value = gateway.fetch_default_value(TEST_KEY).unwrap().unwrap();
        assert!(value.is_default());

        gateway
            .set_default_value(TEST_KEY, ValueType::String, None, "second")
            .unwrap();
        assert_eq!(value.reload(&gateway).unwrap().raw_value(), "second");
    }

    #[test]
    fn test_reload_expands_again() {
        let registry = FakeRegistry::new();
        let first: Environment = [("AppHome", "C:\\First")].into_iter().collect();
        let second: Environment = [("AppHome", "D:\\Second")].into_iter().collect();
        let first_gateway = StoreGateway::new(&registry).with_environment(first);
        let second_gateway = StoreGateway::new(&registry).with_environment(second);

        first_gateway
            .set_value(TEST_KEY, "Bin", ValueType::ExpandString, None, "%APPHOME%\\bin")
            .unwrap();

        let value = first_gateway.fetch_value(TEST_KEY, "Bin").unwrap();
        assert_eq!(value.data().as_str(), Some("C:\\First\\bin"));

        let reloaded = value.reload(&second_gateway).unwrap();
        assert_eq!(reloaded.raw_value(), value.raw_value());
        assert_eq!(reloaded.data().as_str(), Some("D:\\Second\\bin"));

        let key = first_gateway.fetch_key(TEST_KEY).unwrap();
        let reloaded_key = key.reload(&second_gateway).unwrap();
        assert_eq!(
            reloaded_key.value("Bin").unwrap().raw_value(),
            key.value("Bin").unwrap().raw_value()
        );
        assert_eq!(
            reloaded_key.value("Bin").unwrap().data(),
            &ValueData::ExpandString("D:\\Second\\bin".to_string())
        );
    }
}
