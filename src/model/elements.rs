//! Database model element types
//!
//! Every object found in a release repository starts out as a
//! [`DatabaseSubObject`] during the fold. Tables, functions and data scripts
//! are then analyzed into their richer forms; every other kind stays a plain
//! sub-object.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parser::{Tag, TagMap};
use crate::util::starts_with_ci;

/// One appearance of an object in a release version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectVersion {
    pub version: String,
    pub file: String,
}

/// Any schema object, keyed by name, with its version history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSubObject {
    pub name: String,
    pub latest_version: String,
    pub latest_file: String,
    /// Oldest first; an object changed in several versions appears once per version
    pub versions: Vec<ObjectVersion>,
}

impl DatabaseSubObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Record that `file` defines this object in `version`.
    pub fn record(&mut self, version: &str, file: &str) {
        self.latest_version = version.to_string();
        self.latest_file = file.to_string();
        self.versions.push(ObjectVersion {
            version: version.to_string(),
            file: file.to_string(),
        });
    }
}

/// Target of an inline `REFERENCES table(key)` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub key: String,
}

/// One column of a table (or of a `RETURNS TABLE (...)` clause).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseTableField {
    pub name: String,
    pub camel_cased_name: String,
    /// Raw SQL type as written (`numeric(10,2)`, `character varying`)
    #[serde(rename = "type")]
    pub field_type: String,
    pub not_null: bool,
    pub unique: bool,
    /// Everything after the `default` keyword, as written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// The default expression without trailing column constraints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<ForeignKey>,
    #[serde(default)]
    pub tags: TagMap,
    pub to_update: bool,
    pub is_list_filter: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_filter_name: Option<String>,
    pub retrieve_in_list: bool,
    pub sort: bool,
    pub get_with_parent: bool,
}

/// A table analyzed from its `CREATE TABLE` statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseTable {
    #[serde(flatten)]
    pub base: DatabaseSubObject,
    /// Columns in declaration order, serialized as a name-keyed object
    #[serde(with = "fields_in_order")]
    pub fields: Vec<DatabaseTableField>,
    pub table_suffix: String,
    pub db_prefix: String,
    pub camel_cased_name: String,
    #[serde(default)]
    pub tags: TagMap,
    /// Name of the column flagged `PRIMARY KEY`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
}

impl DatabaseTable {
    pub fn from_sub_object(base: DatabaseSubObject) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }

    pub fn field(&self, name: &str) -> Option<&DatabaseTableField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn primary_key_field(&self) -> Option<&DatabaseTableField> {
        self.primary_key.as_deref().and_then(|pk| self.field(pk))
    }

    /// `#ignore` on the table header.
    pub fn is_ignored(&self) -> bool {
        self.tags.contains_key("ignore")
    }

    /// False when the header carries `#no-<action>`.
    pub fn is_action_allowed(&self, action: &str) -> bool {
        !self.tags.contains_key(&format!("no-{}", action))
    }

    /// Roles for `action`: `#<action>-roles` when present, otherwise `#roles`.
    pub fn roles_for(&self, action: &str) -> Vec<String> {
        self.tags
            .get(&format!("{}-roles", action))
            .or_else(|| self.tags.get("roles"))
            .map(Tag::list_values)
            .unwrap_or_default()
    }

    pub fn service_name(&self) -> Option<&str> {
        self.tags
            .get("service-name")
            .and_then(|t| t.value.as_text())
    }
}

/// Volatility category declared on a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionMode {
    Immutable,
    Stable,
    Volatile,
    Leakproof,
}

impl FunctionMode {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "immutable" => Some(FunctionMode::Immutable),
            "stable" => Some(FunctionMode::Stable),
            "volatile" => Some(FunctionMode::Volatile),
            "leakproof" => Some(FunctionMode::Leakproof),
            _ => None,
        }
    }
}

/// Parameter mode of a function argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentMode {
    #[default]
    In,
    Out,
    InOut,
    Variadic,
}

impl ArgumentMode {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "in" => Some(ArgumentMode::In),
            "out" => Some(ArgumentMode::Out),
            "inout" => Some(ArgumentMode::InOut),
            "variadic" => Some(ArgumentMode::Variadic),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionArgument {
    pub mode: ArgumentMode,
    pub name: String,
    #[serde(rename = "type")]
    pub arg_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Shape of a function's result.
///
/// Serialized as `"void"`, `"table"`, `"setof <type>"` or the scalar type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReturnType {
    #[default]
    Void,
    Table,
    SetOf(String),
    Scalar(String),
}

impl From<String> for ReturnType {
    fn from(s: String) -> Self {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("void") {
            ReturnType::Void
        } else if trimmed.eq_ignore_ascii_case("table") {
            ReturnType::Table
        } else if trimmed.len() > 6 && starts_with_ci(trimmed, "setof ") {
            ReturnType::SetOf(trimmed[6..].trim().to_string())
        } else {
            ReturnType::Scalar(trimmed.to_string())
        }
    }
}

impl From<ReturnType> for String {
    fn from(r: ReturnType) -> Self {
        r.to_string()
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Void => write!(f, "void"),
            ReturnType::Table => write!(f, "table"),
            ReturnType::SetOf(t) => write!(f, "setof {}", t),
            ReturnType::Scalar(t) => write!(f, "{}", t),
        }
    }
}

/// A function analyzed from its `CREATE FUNCTION` statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseFunction {
    #[serde(flatten)]
    pub base: DatabaseSubObject,
    pub db_prefix: String,
    pub camel_cased_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<FunctionMode>,
    pub arguments: Vec<FunctionArgument>,
    pub return_type: ReturnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_table: Option<Vec<DatabaseTableField>>,
    pub has_or_replace: bool,
}

impl DatabaseFunction {
    pub fn from_sub_object(base: DatabaseSubObject) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.base.name
    }
}

/// A data script, with the tables it inserts into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseData {
    #[serde(flatten)]
    pub base: DatabaseSubObject,
    pub target_tables: Vec<String>,
}

impl DatabaseData {
    pub fn from_sub_object(base: DatabaseSubObject) -> Self {
        Self {
            base,
            target_tables: Vec::new(),
        }
    }
}

/// A bucket entry: the analyzed form of one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatabaseObjectEntry {
    Table(DatabaseTable),
    Function(DatabaseFunction),
    Data(DatabaseData),
    Generic(DatabaseSubObject),
}

impl DatabaseObjectEntry {
    pub fn base(&self) -> &DatabaseSubObject {
        match self {
            DatabaseObjectEntry::Table(t) => &t.base,
            DatabaseObjectEntry::Function(f) => &f.base,
            DatabaseObjectEntry::Data(d) => &d.base,
            DatabaseObjectEntry::Generic(g) => g,
        }
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn as_table(&self) -> Option<&DatabaseTable> {
        match self {
            DatabaseObjectEntry::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&DatabaseFunction> {
        match self {
            DatabaseObjectEntry::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&DatabaseData> {
        match self {
            DatabaseObjectEntry::Data(d) => Some(d),
            _ => None,
        }
    }
}

/// Serialize table columns as a JSON object keyed by column name while
/// keeping declaration order.
mod fields_in_order {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};

    use super::DatabaseTableField;

    pub fn serialize<S: Serializer>(
        fields: &[DatabaseTableField],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for field in fields {
            map.serialize_entry(&field.name, field)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<DatabaseTableField>, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = Vec<DatabaseTableField>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column name to field")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut fields = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((_name, field)) =
                    access.next_entry::<String, DatabaseTableField>()?
                {
                    fields.push(field);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}
