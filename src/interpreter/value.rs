use super::error::RuntimeError;
use super::scope::ScopeId;
use derivative::Derivative;
use std::fmt;

/// Result of evaluating a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeValue {
    Null,
    Boolean(bool),
    Number(i64),
    Type(TypeValue),
    Object(ObjectValue),
    /// Reserved for host-provided functions; nothing produces it yet.
    NativeFunction(&'static str),
}

impl RuntimeValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::Type(_) => "type",
            Self::Object(_) => "object",
            Self::NativeFunction(_) => "native function",
        }
    }

    /// Looks up `key` on an object value.
    pub fn property(&self, key: &str) -> Result<&RuntimeValue, RuntimeError> {
        match self {
            Self::Object(object) => object.get(key),
            _ => Err(RuntimeError::InvalidMemberAccess {
                property: key.to_string(),
            }),
        }
    }

    pub(super) fn property_mut(&mut self, key: &str) -> Result<&mut RuntimeValue, RuntimeError> {
        match self {
            Self::Object(object) => object.get_mut(key),
            _ => Err(RuntimeError::InvalidMemberAccess {
                property: key.to_string(),
            }),
        }
    }

    pub(super) fn as_object_mut(&mut self, key: &str) -> Result<&mut ObjectValue, RuntimeError> {
        match self {
            Self::Object(object) => Ok(object),
            _ => Err(RuntimeError::InvalidMemberAccess {
                property: key.to_string(),
            }),
        }
    }
}

impl fmt::Display for RuntimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Type(typ) => write!(f, "{typ}"),
            Self::Object(object) => write!(f, "{object}"),
            Self::NativeFunction(name) => write!(f, "<native fn {name}>"),
        }
    }
}

/// A nominal record shape: a name and the declared property names, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeValue {
    pub name: String,
    pub properties: Vec<String>,
}

impl fmt::Display for TypeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type {} {{", self.name)?;
        for property in &self.properties {
            write!(f, " {property};")?;
        }
        f.write_str(" }")
    }
}

/// An instance of a [`TypeValue`]. The scope it was created in is kept as a
/// handle into the environment; it takes no part in comparisons.
#[derive(Clone, Derivative)]
#[derivative(Debug, PartialEq, Eq)]
pub struct ObjectValue {
    pub type_name: String,
    properties: Vec<(String, RuntimeValue)>,
    #[derivative(Debug = "ignore", PartialEq = "ignore")]
    scope: ScopeId,
}

impl ObjectValue {
    pub fn new(type_name: impl Into<String>, scope: ScopeId) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Vec::new(),
            scope,
        }
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn get(&self, key: &str) -> Result<&RuntimeValue, RuntimeError> {
        self.properties
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
            .ok_or_else(|| self.unknown(key))
    }

    fn get_mut(&mut self, key: &str) -> Result<&mut RuntimeValue, RuntimeError> {
        match self.properties.iter().position(|(name, _)| name == key) {
            Some(index) => Ok(&mut self.properties[index].1),
            None => Err(self.unknown(key)),
        }
    }

    /// Overwrites `key` in place, or appends it after the existing keys.
    pub fn set(&mut self, key: &str, value: RuntimeValue) {
        match self.properties.iter_mut().find(|(name, _)| name == key) {
            Some((_, slot)) => *slot = value,
            None => self.properties.push((key.to_string(), value)),
        }
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &RuntimeValue)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    fn unknown(&self, key: &str) -> RuntimeError {
        RuntimeError::UnknownProperty {
            type_name: self.type_name.clone(),
            property: key.to_string(),
        }
    }
}

impl fmt::Display for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.type_name)?;
        for (index, (name, value)) in self.properties.iter().enumerate() {
            let sep = if index == 0 { " " } else { ", " };
            write!(f, "{sep}{name}: {value}")?;
        }
        f.write_str(" }")
    }
}

/// Follows `keys` through nested objects starting at `value`.
pub(super) fn walk_members(value: RuntimeValue, keys: &[&str]) -> Result<RuntimeValue, RuntimeError> {
    let mut current = &value;
    for key in keys {
        current = current.property(key)?;
    }
    Ok(current.clone())
}
