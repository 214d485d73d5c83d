// Copyright 2019-2021 Colin Finck <colin@reactos.org>
// SPDX-License-Identifier: GPL-2.0-or-later

//! Parser for the output of `reg query`.
//!
//! The tool prints the queried key path, followed by one indented line per value and one
//! line per subkey path:
//!
//! ```text
//! HKEY_CURRENT_USER\Software\App
//!     (Default)    REG_SZ    Hello
//!     Version    REG_DWORD    0x2a
//!
//! HKEY_CURRENT_USER\Software\App\Child1
//! ```
//!
//! [`normalize`] turns every value line into a record line `" >name|type|raw"`,
//! which [`parse`] then splits into [`ValueRecord`]s.

use crate::error::{RegistryError, Result};
use crate::path::names_equal;
use crate::value_type::ValueType;

/// Indentation the registry tool uses for value lines.
pub const DEFAULT_INDENT: &str = "    ";

/// Tag prepended to normalized value record lines.
pub const VALUE_RECORD_TAG: &str = " >";

/// Separator between the fields of a normalized value record line.
pub const FIELD_SEPARATOR: char = '|';

/// Label the registry tool prints instead of the empty name of the default value.
pub const DEFAULT_VALUE_LABEL: &str = "(Default)";

/// A single value as printed by the registry tool, before decoding.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValueRecord {
    /// Name of the value; empty for the default value.
    pub name: String,
    pub value_type: ValueType,
    /// Raw data; empty if the tool printed none.
    pub raw_value: String,
}

/// Structured result of a single query.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryRecords {
    /// Full paths of the subkeys, in output order.
    pub children: Vec<String>,
    /// Value records, in output order.
    pub values: Vec<ValueRecord>,
}

/// Normalizes raw tool output into record lines, joined by `\n`.
///
/// Blank lines are dropped. Lines starting with `indent` become value record lines, in which
/// the indentation runs between name, type and data are replaced by [`FIELD_SEPARATOR`].
/// Indentation runs inside the data itself are kept.
pub fn normalize(output: &str, indent: &str) -> String {
    let mut normalized = String::with_capacity(output.len());

    for line in output.lines().filter(|line| !line.trim().is_empty()) {
        if !normalized.is_empty() {
            normalized.push('\n');
        }

        let fields = match line.strip_prefix(indent).filter(|_| !indent.is_empty()) {
            Some(fields) => fields,
            None => {
                normalized.push_str(line);
                continue;
            }
        };

        normalized.push_str(VALUE_RECORD_TAG);

        let mut fields = fields.splitn(3, indent);
        if let Some(name) = fields.next() {
            normalized.push_str(name);
        }

        for field in fields.filter(|field| !field.is_empty()) {
            normalized.push(FIELD_SEPARATOR);
            normalized.push_str(field);
        }
    }

    normalized
}

/// Parses normalized output of a query for `queried_path`.
///
/// The line repeating the queried path itself is skipped, every other untagged line is a
/// child path. If two records share a name, the later one replaces the earlier one in place.
pub fn parse(normalized: &str, queried_path: &str) -> Result<QueryRecords> {
    parse_with_default_label(normalized, queried_path, DEFAULT_VALUE_LABEL)
}

/// Like [`parse`], but recognizes the default value by `default_label`.
///
/// Localized versions of the registry tool print a translated label, e.g. `(Standard)`.
pub fn parse_with_default_label(
    normalized: &str,
    queried_path: &str,
    default_label: &str,
) -> Result<QueryRecords> {
    let mut records = QueryRecords::default();

    for line in normalized.lines() {
        if let Some(record) = line.strip_prefix(VALUE_RECORD_TAG) {
            let record = parse_value_record(record, default_label)?;

            match records
                .values
                .iter_mut()
                .find(|existing| names_equal(&existing.name, &record.name))
            {
                Some(existing) => *existing = record,
                None => records.values.push(record),
            }
        } else if line != queried_path && !line.is_empty() {
            records.children.push(line.to_string());
        }
    }

    tracing::trace!(
        path = queried_path,
        children = records.children.len(),
        values = records.values.len(),
        "parsed query output"
    );

    Ok(records)
}

/// Parses the fields `name|type[|raw]` of a single value record line.
///
/// Value names may contain [`FIELD_SEPARATOR`] themselves, so the type is the first field after the
/// name that is a known type name. If there is none, the second field is reported as unknown type.
/// A name equal to `default_label` is returned as the empty name.
pub fn parse_value_record(record: &str, default_label: &str) -> Result<ValueRecord> {
    let mut first_type_name = None;

    for (separator_index, _) in record.match_indices(FIELD_SEPARATOR) {
        let name = &record[..separator_index];
        let after_name = &record[separator_index + 1..];
        let (type_name, raw_value) = after_name
            .split_once(FIELD_SEPARATOR)
            .unwrap_or((after_name, ""));

        if let Ok(value_type) = ValueType::from_name(type_name) {
            let name = if name == default_label { "" } else { name };

            return Ok(ValueRecord {
                name: name.to_string(),
                value_type,
                raw_value: raw_value.to_string(),
            });
        }

        if first_type_name.is_none() {
            first_type_name = Some(type_name);
        }
    }

    Err(RegistryError::UnknownType {
        name: first_type_name.unwrap_or_default().to_string(),
    })
}
