//! Generic JSON container contract shared by every record type.
//!
//! A record is a typed struct whose declared fields map onto camelCase JSON
//! keys, plus an [`UnknownFields`] map that captures every key the struct
//! does not declare. Reading and writing by name goes through the same
//! storage as the typed accessors, so the two views never drift apart.
//!
//! Write access to the unknown-fields map stays inside this crate; callers
//! go through [`JsonRecord::set`], which routes declared names to their
//! typed field:
//!
//! ```compile_fail
//! use testing_model::{JsonRecord, TestMatrix};
//!
//! let mut matrix = TestMatrix::new();
//! matrix.unknown_fields_mut().insert("projectId".into(), "shadow".into());
//! ```

use crate::config::CodecConfig;
use crate::error::{ModelError, ModelResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Keys present on the wire that the record type does not declare.
///
/// Never holds a declared wire name: an entry shadowing a declared field
/// would replace the typed value when the record is encoded.
pub type UnknownFields = Map<String, Value>;

pub(crate) mod store {
    use super::UnknownFields;

    /// Mutable access to the unknown-fields map, unreachable outside the crate.
    pub trait UnknownStore {
        fn unknown_fields_mut(&mut self) -> &mut UnknownFields;
    }
}

use store::UnknownStore;

pub trait JsonRecord: Serialize + DeserializeOwned + Clone + UnknownStore {
    /// Resource name used in log output.
    const KIND: &'static str;

    /// Wire names of the declared fields.
    const KNOWN_FIELDS: &'static [&'static str];

    /// Wire names of fields populated by the service only.
    const OUTPUT_ONLY_FIELDS: &'static [&'static str] = &[];

    fn unknown_fields(&self) -> &UnknownFields;

    fn is_known_field(name: &str) -> bool {
        Self::KNOWN_FIELDS.contains(&name)
    }

    /// Stores `value` in the declared field `name`.
    ///
    /// The default goes through the serde mapper: the record is re-read with
    /// the new key in place, and nothing changes if the value does not fit.
    fn set_known(&mut self, name: &str, value: Value) -> ModelResult<()> {
        let mut object = match serde_json::to_value(&*self)? {
            Value::Object(object) => object,
            other => {
                return Err(ModelError::NotAnObject {
                    found: json_kind(&other).to_string(),
                })
            }
        };
        object.insert(name.to_string(), value);

        *self = decode_field(name, Value::Object(object))?;
        Ok(())
    }

    /// Sets a field by wire name. Declared names update the typed field,
    /// any other name lands in the unknown-fields map.
    fn set(&mut self, name: &str, value: Value) -> ModelResult<&mut Self> {
        if Self::is_known_field(name) {
            self.set_known(name, value)?;
        } else {
            debug!(record = Self::KIND, field = name, "storing unknown field");
            self.unknown_fields_mut().insert(name.to_string(), value);
        }
        Ok(self)
    }

    /// Reads a field by wire name. Absent and null declared fields both read as `None`.
    fn get(&self, name: &str) -> Option<Value> {
        if !Self::is_known_field(name) {
            return self.unknown_fields().get(name).cloned();
        }

        match serde_json::to_value(self) {
            Ok(Value::Object(mut object)) => object.remove(name),
            _ => None,
        }
    }

    fn from_json(json: &str) -> ModelResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> ModelResult<Self> {
        if !value.is_object() {
            return Err(ModelError::NotAnObject {
                found: json_kind(&value).to_string(),
            });
        }

        let record: Self = serde_json::from_value(value)?;
        debug!(
            record = Self::KIND,
            unknown = record.unknown_fields().len(),
            "decoded record"
        );
        Ok(record)
    }

    fn to_value(&self) -> ModelResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn to_json(&self) -> ModelResult<String> {
        self.to_json_with(&CodecConfig::default())
    }

    fn to_json_with(&self, config: &CodecConfig) -> ModelResult<String> {
        config
            .validate()
            .map_err(|message| ModelError::InvalidConfig { message })?;

        let mut value = self.to_value()?;
        if config.strip_output_only {
            if let Value::Object(object) = &mut value {
                for field in Self::OUTPUT_ONLY_FIELDS {
                    object.remove(*field);
                }
            }
        }

        let json = if config.pretty {
            let indent = vec![b' '; config.indent];
            let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
            let mut buf = Vec::new();
            let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut serializer)?;
            String::from_utf8(buf)?
        } else {
            serde_json::to_string(&value)?
        };

        debug!(record = Self::KIND, bytes = json.len(), "encoded record");
        Ok(json)
    }
}

/// Decodes a single field value, reporting failures against the field name.
pub(crate) fn decode_field<T: DeserializeOwned>(name: &str, value: Value) -> ModelResult<T> {
    serde_json::from_value(value).map_err(|e| ModelError::TypeMismatch {
        field: name.to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Implements [`JsonRecord`] for a struct with an `unknown_fields` member.
macro_rules! json_record {
    ($record:ty, $kind:literal, [$($field:literal),* $(,)?]) => {
        impl $crate::json::JsonRecord for $record {
            const KIND: &'static str = $kind;
            const KNOWN_FIELDS: &'static [&'static str] = &[$($field),*];

            fn unknown_fields(&self) -> &$crate::json::UnknownFields {
                &self.unknown_fields
            }
        }

        impl $crate::json::store::UnknownStore for $record {
            fn unknown_fields_mut(&mut self) -> &mut $crate::json::UnknownFields {
                &mut self.unknown_fields
            }
        }
    };
}

pub(crate) use json_record;
