// Copyright 2019-2021 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::codec::Environment;
use crate::error::{RegistryError, Result};
use crate::key::Key;
use crate::key_value::Value;
use crate::path::{names_equal, KeyPath};
use crate::record::{self, QueryRecords, DEFAULT_INDENT, DEFAULT_VALUE_LABEL};
use crate::shell::{ShellExecutor, SystemShell};
use crate::value_type::ValueType;
use core::fmt::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Raw data the registry tool prints for a default value that has never been set.
pub const DEFAULT_VALUE_NOT_SET: &str = "(value not set)";

/// Settings of a [`StoreGateway`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GatewayConfig {
    /// Name or path of the registry tool.
    pub tool: String,
    /// Indentation the tool uses for value lines in query output.
    pub indent: String,
    /// Label the tool prints as name of the default value.
    pub default_label: String,
    /// Data the tool prints for a default value that has never been set.
    pub value_not_set: String,
}

impl GatewayConfig {
    pub fn tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = tool.into();
        self
    }

    pub fn indent<S: Into<String>>(mut self, indent: S) -> Self {
        self.indent = indent.into();
        self
    }

    /// Sets the labels of a localized registry tool, e.g. `(Standard)` and `(Wert nicht festgelegt)`.
    pub fn default_labels<L, N>(mut self, default_label: L, value_not_set: N) -> Self
    where
        L: Into<String>,
        N: Into<String>,
    {
        self.default_label = default_label.into();
        self.value_not_set = value_not_set.into();
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            tool: "reg".to_string(),
            indent: DEFAULT_INDENT.to_string(),
            default_label: DEFAULT_VALUE_LABEL.to_string(),
            value_not_set: DEFAULT_VALUE_NOT_SET.to_string(),
        }
    }
}

/// Selects one value of a key in a command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueSelector<'a> {
    /// The default value (`/ve`).
    Default,
    /// The value with the given name (`/v`).
    Named(&'a str),
}

impl<'a> ValueSelector<'a> {
    /// Maps the empty name to the default value.
    pub fn from_name(name: &'a str) -> Self {
        if name.is_empty() {
            ValueSelector::Default
        } else {
            ValueSelector::Named(name)
        }
    }
}

/// A single invocation of the registry tool.
///
/// Paths, names and data are surrounded by double quotes and not escaped any further.
/// Hence, they must not contain double quotes themselves.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RegCommand<'a> {
    QueryKey {
        path: &'a str,
    },
    QueryValue {
        path: &'a str,
        value: ValueSelector<'a>,
    },
    SetValue {
        path: &'a str,
        value: ValueSelector<'a>,
        value_type: ValueType,
        separator: Option<char>,
        raw_value: &'a str,
    },
    DeleteValue {
        path: &'a str,
        value: ValueSelector<'a>,
    },
    DeleteAllValues {
        path: &'a str,
    },
    DeleteKey {
        path: &'a str,
    },
    SetKey {
        path: &'a str,
    },
    Export {
        path: &'a str,
        destination: &'a Path,
    },
    Import {
        source: &'a Path,
    },
}

impl<'a> RegCommand<'a> {
    /// Builds the command line invoking `tool`.
    pub fn to_command_line(&self, tool: &str) -> String {
        let mut line = String::from(tool);
        // Writing into a String never fails.
        let _ = self.write_arguments(&mut line);
        line
    }

    fn write_arguments(&self, line: &mut String) -> fmt::Result {
        match self {
            RegCommand::QueryKey { path } => write!(line, " query \"{}\"", path),
            RegCommand::QueryValue { path, value } => {
                write!(line, " query \"{}\"", path)?;
                write_value_selector(line, value)
            }
            RegCommand::SetValue {
                path,
                value,
                value_type,
                separator,
                raw_value,
            } => {
                write!(line, " add \"{}\"", path)?;
                write_value_selector(line, value)?;
                write!(line, " /t {}", value_type)?;

                // The separator only has a meaning for REG_MULTI_SZ.
                if let (ValueType::MultiString, Some(separator)) = (value_type, separator) {
                    write!(line, " /s {}", separator)?;
                }

                write!(line, " /d \"{}\" /f", raw_value)
            }
            RegCommand::DeleteValue { path, value } => {
                write!(line, " delete \"{}\"", path)?;
                write_value_selector(line, value)?;
                line.write_str(" /f")
            }
            RegCommand::DeleteAllValues { path } => write!(line, " delete \"{}\" /va /f", path),
            RegCommand::DeleteKey { path } => write!(line, " delete \"{}\" /f", path),
            RegCommand::SetKey { path } => write!(line, " add \"{}\" /f", path),
            RegCommand::Export { path, destination } => write!(
                line,
                " export \"{}\" \"{}\" /y",
                path,
                destination.display()
            ),
            RegCommand::Import { source } => write!(line, " import \"{}\"", source.display()),
        }
    }
}

fn write_value_selector(line: &mut String, value: &ValueSelector) -> fmt::Result {
    match value {
        ValueSelector::Default => line.write_str(" /ve"),
        ValueSelector::Named(name) => write!(line, " /v \"{}\"", name),
    }
}

/// Accesses the registry by running the registry tool through a [`ShellExecutor`].
///
/// Nothing is cached: every fetch queries the registry again.
#[derive(Clone, Debug)]
pub struct StoreGateway<S: ShellExecutor> {
    shell: S,
    config: GatewayConfig,
    environment: Option<Environment>,
}

impl StoreGateway<SystemShell> {
    /// Creates a gateway running `reg` through the command interpreter of the operating system.
    pub fn system() -> Self {
        Self::new(SystemShell::new())
    }
}

impl<S> StoreGateway<S>
where
    S: ShellExecutor,
{
    pub fn new(shell: S) -> Self {
        Self::with_config(shell, GatewayConfig::default())
    }

    pub fn with_config(shell: S, config: GatewayConfig) -> Self {
        Self {
            shell,
            config,
            environment: None,
        }
    }

    /// Expands `REG_EXPAND_SZ` data using `environment` instead of the environment of the current process.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// Returns the environment used to decode the result of the next fetch.
    pub fn environment(&self) -> Environment {
        match &self.environment {
            Some(environment) => environment.clone(),
            None => Environment::from_process(),
        }
    }

    /// Fetches the key at `path` together with its values and the paths of its subkeys.
    ///
    /// A non-existing key results in [`RegistryError::StoreAccess`], just like any other failure of the tool.
    /// The default value is recognized by the labels of [`GatewayConfig`], which must match the language
    /// of the tool. Otherwise it ends up in [`Key::values`].
    pub fn fetch_key(&self, path: &str) -> Result<Key> {
        let path = KeyPath::new(path);
        let records = self.query(path.as_str(), None)?;
        let default_records = self.query(path.as_str(), Some(ValueSelector::Default))?;

        let environment = self.environment();
        let values = records
            .values
            .into_iter()
            .filter(|record| !record.name.is_empty())
            .map(|record| Value::decode(record, path.as_str(), &environment))
            .collect::<Result<Vec<_>>>()?;
        let default_value = default_records
            .values
            .into_iter()
            .find(|record| record.name.is_empty() && record.raw_value != self.config.value_not_set)
            .map(|record| Value::decode(record, path.as_str(), &environment))
            .transpose()?;

        Ok(Key::new(path, records.children, values, default_value))
    }

    /// Fetches the value `name` of the key at `path`.
    ///
    /// The empty name denotes the default value.
    pub fn fetch_value(&self, path: &str, name: &str) -> Result<Value> {
        let path = KeyPath::new(path);
        let records = self.query(path.as_str(), Some(ValueSelector::from_name(name)))?;

        let record = records
            .values
            .into_iter()
            .find(|record| names_equal(&record.name, name))
            .filter(|record| !(name.is_empty() && record.raw_value == self.config.value_not_set))
            .ok_or_else(|| RegistryError::ValueNotFound {
                path: path.to_string(),
                name: name.to_string(),
            })?;

        Value::decode(record, path.as_str(), &self.environment())
    }

    /// Fetches the default value of the key at `path`, if it has been set.
    pub fn fetch_default_value(&self, path: &str) -> Result<Option<Value>> {
        match self.fetch_value(path, "") {
            Ok(value) => Ok(Some(value)),
            Err(RegistryError::ValueNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Creates or replaces the value `name` of the key at `path`.
    ///
    /// The empty name denotes the default value.
    /// `raw_value` is passed to the tool unchanged. For [`ValueType::MultiString`], `separator` tells the tool
    /// where to split `raw_value` into entries (the tool defaults to `\0`); it is ignored for all other types.
    /// Some characters (e.g. `|`) are silently not accepted as separators by the tool, which then stores a
    /// single entry.
    pub fn set_value(
        &self,
        path: &str,
        name: &str,
        value_type: ValueType,
        separator: Option<char>,
        raw_value: &str,
    ) -> Result<()> {
        let path = KeyPath::new(path);
        self.run(&RegCommand::SetValue {
            path: path.as_str(),
            value: ValueSelector::from_name(name),
            value_type,
            separator,
            raw_value,
        })
        .map(drop)
    }

    /// Creates or replaces the default value of the key at `path`.
    pub fn set_default_value(
        &self,
        path: &str,
        value_type: ValueType,
        separator: Option<char>,
        raw_value: &str,
    ) -> Result<()> {
        self.set_value(path, "", value_type, separator, raw_value)
    }

    pub fn delete_value(&self, path: &str, name: &str) -> Result<()> {
        let path = KeyPath::new(path);
        self.run(&RegCommand::DeleteValue {
            path: path.as_str(),
            value: ValueSelector::from_name(name),
        })
        .map(drop)
    }

    pub fn delete_default_value(&self, path: &str) -> Result<()> {
        self.delete_value(path, "")
    }

    /// Deletes all values of the key at `path`, including the default value.
    pub fn delete_all_values(&self, path: &str) -> Result<()> {
        let path = KeyPath::new(path);
        self.run(&RegCommand::DeleteAllValues {
            path: path.as_str(),
        })
        .map(drop)
    }

    /// Deletes the key at `path` together with all its subkeys and values.
    pub fn delete_key(&self, path: &str) -> Result<()> {
        let path = KeyPath::new(path);
        self.run(&RegCommand::DeleteKey {
            path: path.as_str(),
        })
        .map(drop)
    }

    /// Creates the key at `path` unless it already exists.
    ///
    /// An existing key keeps its values and subkeys. The call succeeds in both cases,
    /// so it cannot tell whether the key has been created.
    pub fn set_key(&self, path: &str) -> Result<()> {
        let path = KeyPath::new(path);
        self.run(&RegCommand::SetKey {
            path: path.as_str(),
        })
        .map(drop)
    }

    /// Exports the key at `path` with all its subkeys into the file `destination`, overwriting it.
    pub fn export_key(&self, path: &str, destination: &Path) -> Result<()> {
        let path = KeyPath::new(path);
        self.run(&RegCommand::Export {
            path: path.as_str(),
            destination,
        })
        .map(drop)
    }

    /// Imports the keys and values stored in the file `source`.
    pub fn import_file(&self, source: &Path) -> Result<()> {
        self.run(&RegCommand::Import { source }).map(drop)
    }

    /// Queries the whole key at `path` or only the selected value.
    fn query(&self, path: &str, value: Option<ValueSelector>) -> Result<QueryRecords> {
        let command = match value {
            Some(value) => RegCommand::QueryValue { path, value },
            None => RegCommand::QueryKey { path },
        };

        let stdout = self.run(&command)?;
        let normalized = record::normalize(&stdout, &self.config.indent);
        record::parse_with_default_label(&normalized, path, &self.config.default_label)
    }

    /// Runs a single command and returns its standard output.
    fn run(&self, command: &RegCommand) -> Result<String> {
        let command_line = command.to_command_line(&self.config.tool);
        debug!(command = %command_line, "running registry tool");

        let output = self
            .shell
            .execute(&command_line)
            .map_err(|e| RegistryError::Execution {
                command: command_line.clone(),
                message: e.to_string(),
            })?;

        if output.is_success() {
            Ok(output.stdout)
        } else {
            let diagnostic = output.diagnostic().to_string();
            warn!(
                command = %command_line,
                exit_code = output.exit_code,
                diagnostic = %diagnostic,
                "registry tool failed"
            );

            Err(RegistryError::StoreAccess {
                exit_code: output.exit_code,
                diagnostic,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ValueData;
    use crate::helpers::tests::{FakeRegistry, TEST_KEY};
    use crate::path::HKEY_CURRENT_USER;
    use crate::shell::RawOutput;

    fn gateway(registry: &FakeRegistry) -> StoreGateway<&FakeRegistry> {
        StoreGateway::new(registry).with_environment(
            [("SystemRoot", "C:\\Windows")].into_iter().collect(),
        )
    }

    #[test]
    fn test_command_lines() {
        let path = "HKEY_CURRENT_USER\\Software\\My App";
        let cases = [
            (RegCommand::QueryKey { path }, "reg query \"HKEY_CURRENT_USER\\Software\\My App\""),
            (
                RegCommand::QueryValue {
                    path,
                    value: ValueSelector::Default,
                },
                "reg query \"HKEY_CURRENT_USER\\Software\\My App\" /ve",
            ),
            (
                RegCommand::QueryValue {
                    path,
                    value: ValueSelector::Named("My Value"),
                },
                "reg query \"HKEY_CURRENT_USER\\Software\\My App\" /v \"My Value\"",
            ),
            (
                RegCommand::SetValue {
                    path,
                    value: ValueSelector::Named("List"),
                    value_type: ValueType::MultiString,
                    separator: Some('-'),
                    raw_value: "A-B",
                },
                "reg add \"HKEY_CURRENT_USER\\Software\\My App\" /v \"List\" /t REG_MULTI_SZ /s - /d \"A-B\" /f",
            ),
            (
                RegCommand::SetValue {
                    path,
                    value: ValueSelector::Default,
                    value_type: ValueType::DWord,
                    separator: Some('-'),
                    raw_value: "0x2a",
                },
                "reg add \"HKEY_CURRENT_USER\\Software\\My App\" /ve /t REG_DWORD /d \"0x2a\" /f",
            ),
            (
                RegCommand::DeleteValue {
                    path,
                    value: ValueSelector::Named("List"),
                },
                "reg delete \"HKEY_CURRENT_USER\\Software\\My App\" /v \"List\" /f",
            ),
            (
                RegCommand::DeleteValue {
                    path,
                    value: ValueSelector::Default,
                },
                "reg delete \"HKEY_CURRENT_USER\\Software\\My App\" /ve /f",
            ),
            (
                RegCommand::DeleteAllValues { path },
                "reg delete \"HKEY_CURRENT_USER\\Software\\My App\" /va /f",
            ),
            (
                RegCommand::DeleteKey { path },
                "reg delete \"HKEY_CURRENT_USER\\Software\\My App\" /f",
            ),
            (
                RegCommand::SetKey { path },
                "reg add \"HKEY_CURRENT_USER\\Software\\My App\" /f",
            ),
            (
                RegCommand::Export {
                    path,
                    destination: Path::new("my key.reg"),
                },
                "reg export \"HKEY_CURRENT_USER\\Software\\My App\" \"my key.reg\" /y",
            ),
            (
                RegCommand::Import {
                    source: Path::new("my key.reg"),
                },
                "reg import \"my key.reg\"",
            ),
        ];

        for (command, expected) in cases {
            assert_eq!(command.to_command_line("reg"), expected);
        }
    }

    #[test]
    fn test_config() {
        let registry = FakeRegistry::new();
        let gateway = StoreGateway::with_config(
            &registry,
            GatewayConfig::default().tool("C:\\Windows\\System32\\reg.exe"),
        );
        gateway.set_key(TEST_KEY).unwrap();

        assert_eq!(
            registry.executed_commands(),
            vec![format!("C:\\Windows\\System32\\reg.exe add \"{}\" /f", TEST_KEY)]
        );
    }

    /// Answers queries of [`TEST_KEY`] like a German registry tool.
    struct GermanShell {
        default_data: &'static str,
    }

    impl ShellExecutor for GermanShell {
        fn execute(&self, command_line: &str) -> std::io::Result<RawOutput> {
            let default_line = format!("    (Standard)    REG_SZ    {}\r\n", self.default_data);
            let stdout = if command_line.ends_with("/ve") {
                format!("\r\n{}\r\n{}\r\n", TEST_KEY, default_line)
            } else {
                format!(
                    "\r\n{}\r\n{}    Name    REG_SZ    Wert\r\n\r\n",
                    TEST_KEY, default_line
                )
            };

            Ok(RawOutput::success(stdout))
        }
    }

    #[test]
    fn test_localized_default_labels() {
        let config = GatewayConfig::default().default_labels("(Standard)", "(Wert nicht festgelegt)");

        let gateway = StoreGateway::with_config(GermanShell { default_data: "Hallo" }, config.clone());
        let key = gateway.fetch_key(TEST_KEY).unwrap();
        assert_eq!(key.values().len(), 1);
        assert_eq!(key.values()[0].name(), "Name");
        assert_eq!(key.default_value().unwrap().raw_value(), "Hallo");
        assert_eq!(
            gateway.fetch_default_value(TEST_KEY).unwrap().unwrap().raw_value(),
            "Hallo"
        );

        let unset = StoreGateway::with_config(
            GermanShell {
                default_data: "(Wert nicht festgelegt)",
            },
            config,
        );
        assert!(unset.fetch_key(TEST_KEY).unwrap().default_value().is_none());
        assert!(unset.fetch_default_value(TEST_KEY).unwrap().is_none());

        // With the English labels, the localized default value is an ordinary value.
        let english = StoreGateway::new(GermanShell { default_data: "Hallo" });
        let key = english.fetch_key(TEST_KEY).unwrap();
        assert_eq!(key.values().len(), 2);
        assert!(key.default_value().is_none());
    }

    #[test]
    fn test_fetch_key() {
        let registry = FakeRegistry::new();
        let gateway = gateway(&registry);

        gateway.set_key(TEST_KEY).unwrap();
        gateway.set_key(&format!("{}\\Child1", TEST_KEY)).unwrap();
        gateway.set_key(&format!("{}\\Child2", TEST_KEY)).unwrap();
        gateway
            .set_value(TEST_KEY, "MyValue", ValueType::String, None, "Hello World!")
            .unwrap();
        gateway
            .set_value(TEST_KEY, "Path", ValueType::ExpandString, None, "%SYSTEMROOT%\\System32")
            .unwrap();
        gateway
            .set_default_value(TEST_KEY, ValueType::MultiString, Some('-'), "A-B-C-D-E-F")
            .unwrap();

        // Forward slashes and a trailing separator are accepted.
        let key = gateway
            .fetch_key(&format!("{}/", TEST_KEY.replace('\\', "/")))
            .unwrap();

        assert_eq!(key.path(), TEST_KEY);
        assert_eq!(key.name(), "MyExampleSoftware");
        assert_eq!(key.parent(), Some("HKEY_CURRENT_USER\\Software"));
        assert_eq!(
            key.children(),
            &[
                format!("{}\\Child1", TEST_KEY),
                format!("{}\\Child2", TEST_KEY)
            ]
        );

        let names: Vec<&str> = key.values().iter().map(Value::name).collect();
        assert_eq!(names, vec!["MyValue", "Path"]);
        assert_eq!(
            key.value("path").unwrap().data(),
            &ValueData::ExpandString("C:\\Windows\\System32".to_string())
        );

        let default_value = key.default_value().unwrap();
        assert!(default_value.is_default());
        assert_eq!(default_value.raw_value(), "A\\0B\\0C\\0D\\0E\\0F");
        assert_eq!(
            default_value.data().as_strings().unwrap(),
            &["A", "B", "C", "D", "E", "F"]
        );
        assert_eq!(default_value.owner_path(), TEST_KEY);

        // Two queries: the key itself and its default value.
        let commands = registry.executed_commands();
        assert_eq!(
            &commands[commands.len() - 2..],
            &[
                format!("reg query \"{}\"", TEST_KEY),
                format!("reg query \"{}\" /ve", TEST_KEY)
            ]
        );
    }

    #[test]
    fn test_fetch_key_without_default_value() {
        let registry = FakeRegistry::new();
        let gateway = gateway(&registry);

        gateway.set_key(TEST_KEY).unwrap();
        let key = gateway.fetch_key(TEST_KEY).unwrap();
        assert!(key.default_value().is_none());
        assert!(key.values().is_empty());
        assert!(key.children().is_empty());
        assert_eq!(gateway.fetch_default_value(TEST_KEY).unwrap(), None);
    }

    #[test]
    fn test_fetch_missing_key() {
        let registry = FakeRegistry::new();
        let gateway = gateway(&registry);

        assert!(matches!(
            gateway.fetch_key(TEST_KEY),
            Err(RegistryError::StoreAccess { exit_code: 1, diagnostic })
                if diagnostic.starts_with("ERROR:")
        ));

        // Nothing after the failed query.
        assert_eq!(registry.executed_commands().len(), 1);
    }

    #[test]
    fn test_fetch_value() {
        let registry = FakeRegistry::new();
        let gateway = gateway(&registry);

        gateway
            .set_value(TEST_KEY, "Answer", ValueType::DWord, None, "42")
            .unwrap();
        gateway
            .set_value(TEST_KEY, "Blob", ValueType::Binary, None, "0102ff")
            .unwrap();

        let value = gateway.fetch_value(TEST_KEY, "answer").unwrap();
        assert_eq!(value.name(), "Answer");
        assert_eq!(value.value_type(), ValueType::DWord);
        assert_eq!(value.raw_value(), "0x2a");
        assert_eq!(value.data().as_dword(), Some(42));

        let value = gateway.fetch_value(TEST_KEY, "Blob").unwrap();
        assert_eq!(value.data().as_bytes(), Some(&[0x01, 0x02, 0xff][..]));

        assert!(matches!(
            gateway.fetch_value(TEST_KEY, "Missing"),
            Err(RegistryError::StoreAccess { .. })
        ));
        assert!(matches!(
            gateway.fetch_value(TEST_KEY, ""),
            Err(RegistryError::ValueNotFound { .. })
        ));
    }

    #[test]
    fn test_malformed_output() {
        let registry = FakeRegistry::new();
        let gateway = gateway(&registry);

        // The fake stores DWORD data exactly as given if it cannot parse it.
        gateway
            .set_value(TEST_KEY, "Broken", ValueType::DWord, None, "0xnothex")
            .unwrap();

        assert_eq!(
            gateway.fetch_value(TEST_KEY, "Broken"),
            Err(RegistryError::MalformedValue {
                value_type: ValueType::DWord,
                raw: "0xnothex".to_string(),
            })
        );
        assert!(matches!(
            gateway.fetch_key(TEST_KEY),
            Err(RegistryError::MalformedValue { .. })
        ));
    }

    #[test]
    fn test_set_key_keeps_values() {
        let registry = FakeRegistry::new();
        let gateway = gateway(&registry);

        gateway.set_key(TEST_KEY).unwrap();
        gateway
            .set_value(TEST_KEY, "MyValue", ValueType::String, None, "Hello World!")
            .unwrap();
        gateway.set_key(TEST_KEY).unwrap();

        let value = gateway.fetch_value(TEST_KEY, "MyValue").unwrap();
        assert_eq!(value.raw_value(), "Hello World!");
        assert_eq!(gateway.fetch_key(TEST_KEY).unwrap().values().len(), 1);
    }

    #[test]
    fn test_delete_key_is_recursive() {
        let registry = FakeRegistry::new();
        let gateway = gateway(&registry);

        let child = format!("{}\\Child1", TEST_KEY);
        let grandchild = format!("{}\\Grandchild", child);
        gateway.set_key(&grandchild).unwrap();
        gateway
            .set_value(&child, "MyValue", ValueType::String, None, "x")
            .unwrap();

        gateway.delete_key(TEST_KEY).unwrap();

        for path in [TEST_KEY, child.as_str(), grandchild.as_str()] {
            assert!(matches!(
                gateway.fetch_key(path),
                Err(RegistryError::StoreAccess { .. })
            ));
        }

        // The parent is still there.
        assert!(gateway.fetch_key("HKEY_CURRENT_USER\\Software").is_ok());

        // Deleting again fails just like the tool does.
        assert!(matches!(
            gateway.delete_key(TEST_KEY),
            Err(RegistryError::StoreAccess { .. })
        ));
    }

    #[test]
    fn test_delete_values() {
        let registry = FakeRegistry::new();
        let gateway = gateway(&registry);

        gateway
            .set_value(TEST_KEY, "MyValue", ValueType::String, None, "Hello World!")
            .unwrap();
        gateway
            .set_value(TEST_KEY, "Other", ValueType::QWord, None, "0x1")
            .unwrap();
        gateway
            .set_default_value(TEST_KEY, ValueType::String, None, "default")
            .unwrap();

        gateway.delete_default_value(TEST_KEY).unwrap();
        gateway.delete_value(TEST_KEY, "MyValue").unwrap();

        let key = gateway.fetch_key(TEST_KEY).unwrap();
        assert!(key.default_value().is_none());
        assert!(key.value("MyValue").is_none());
        assert!(key.value("Other").is_some());

        gateway
            .set_default_value(TEST_KEY, ValueType::String, None, "default")
            .unwrap();
        gateway.delete_all_values(TEST_KEY).unwrap();

        let key = gateway.fetch_key(TEST_KEY).unwrap();
        assert!(key.default_value().is_none());
        assert!(key.values().is_empty());
    }

    #[test]
    fn test_export_and_import() {
        let registry = FakeRegistry::new();
        let gateway = gateway(&registry);
        let file = Path::new("myKey.reg");

        gateway
            .set_value(TEST_KEY, "MyValue", ValueType::String, None, "Hello World!")
            .unwrap();
        gateway.export_key(TEST_KEY, file).unwrap();
        gateway.delete_key(TEST_KEY).unwrap();
        assert!(gateway.fetch_key(TEST_KEY).is_err());

        gateway.import_file(file).unwrap();
        let key = gateway.fetch_key(TEST_KEY).unwrap();
        assert_eq!(key.value("MyValue").unwrap().raw_value(), "Hello World!");

        assert!(matches!(
            gateway.import_file(Path::new("missing.reg")),
            Err(RegistryError::StoreAccess { .. })
        ));
    }

    #[test]
    fn test_root_key() {
        let registry = FakeRegistry::new();
        let gateway = gateway(&registry);

        gateway.set_key(TEST_KEY).unwrap();
        let root = gateway.fetch_key(HKEY_CURRENT_USER).unwrap();
        assert_eq!(root.name(), HKEY_CURRENT_USER);
        assert_eq!(root.parent(), None);
        assert_eq!(root.children(), &["HKEY_CURRENT_USER\\Software".to_string()]);
    }

    #[test]
    fn test_execution_error() {
        let registry = FakeRegistry::new();
        registry.fail_to_spawn();
        let gateway = gateway(&registry);

        assert!(matches!(
            gateway.set_key(TEST_KEY),
            Err(RegistryError::Execution { command, .. }) if command.starts_with("reg add")
        ));
    }
}
