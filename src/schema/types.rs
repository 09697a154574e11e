//! Schema type definitions
//!
//! A schema is a tree. Each node is either a leaf field descriptor
//! (`{"type": ..., "required": ...}`) or a nested schema whose own
//! children are fields.
//!
//! Supported type tags:
//! - boolean, null, undefined, number, string, object, array
//! - `*`: any type, never type checked

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};

const KEY_TYPE: &str = "type";
const KEY_REQUIRED: &str = "required";

/// Type tag of a declared field or an observed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "null")]
    Null,
    #[serde(rename = "undefined")]
    Undefined,
    #[serde(rename = "number")]
    Number,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "object")]
    Object,
    #[serde(rename = "array")]
    Array,
    #[serde(rename = "*")]
    Any,
}

impl TypeTag {
    /// Returns the type name used in schemas and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Boolean => "boolean",
            TypeTag::Null => "null",
            TypeTag::Undefined => "undefined",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::Object => "object",
            TypeTag::Array => "array",
            TypeTag::Any => "*",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(TypeTag::Boolean),
            "null" => Some(TypeTag::Null),
            "undefined" => Some(TypeTag::Undefined),
            "number" => Some(TypeTag::Number),
            "string" => Some(TypeTag::String),
            "object" => Some(TypeTag::Object),
            "array" => Some(TypeTag::Array),
            "*" => Some(TypeTag::Any),
            _ => None,
        }
    }

    /// Runtime type of a value, telling arrays apart from objects
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => TypeTag::Null,
            Value::Bool(_) => TypeTag::Boolean,
            Value::Number(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Object(_) => TypeTag::Object,
        }
    }

    /// Values of this runtime type are never type checked
    pub fn is_exempt(&self) -> bool {
        matches!(self, TypeTag::Null | TypeTag::Undefined)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf descriptor for one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub type_tag: TypeTag,
    pub required: bool,
}

impl FieldDescriptor {
    pub fn required(type_tag: TypeTag) -> Self {
        Self {
            type_tag,
            required: true,
        }
    }

    pub fn optional(type_tag: TypeTag) -> Self {
        Self {
            type_tag,
            required: false,
        }
    }

    /// Optional field of any type
    pub fn any() -> Self {
        Self::optional(TypeTag::Any)
    }
}

/// A schema node: a leaf descriptor or a nested schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    Leaf(FieldDescriptor),
    Nested(SchemaDefinition),
}

impl SchemaNode {
    pub fn leaf(descriptor: FieldDescriptor) -> Self {
        SchemaNode::Leaf(descriptor)
    }

    pub fn nested(definition: SchemaDefinition) -> Self {
        SchemaNode::Nested(definition)
    }

    /// Classify one JSON node.
    ///
    /// An object carrying `type` or `required` is a leaf and may carry
    /// nothing else. Any other object is a nested schema.
    fn from_json(name: &str, node: &Value) -> SchemaResult<Self> {
        let Value::Object(map) = node else {
            return Err(SchemaError::MalformedNode {
                field: name.to_string(),
                reason: format!("expected an object, found {}", TypeTag::of(node)),
            });
        };

        let is_leaf = map.contains_key(KEY_TYPE) || map.contains_key(KEY_REQUIRED);
        if !is_leaf {
            return Ok(SchemaNode::Nested(SchemaDefinition::from_map(map)?));
        }

        if map.keys().any(|k| k != KEY_TYPE && k != KEY_REQUIRED) {
            return Err(SchemaError::AmbiguousNode(name.to_string()));
        }

        let type_tag = match map.get(KEY_TYPE) {
            None => TypeTag::Any,
            Some(Value::String(t)) => {
                TypeTag::from_name(t).ok_or_else(|| SchemaError::UnknownType {
                    field: name.to_string(),
                    type_name: t.clone(),
                })?
            }
            Some(other) => {
                return Err(SchemaError::MalformedNode {
                    field: name.to_string(),
                    reason: format!("'type' must be a string, found {}", TypeTag::of(other)),
                })
            }
        };

        let required = match map.get(KEY_REQUIRED) {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(SchemaError::MalformedNode {
                    field: name.to_string(),
                    reason: format!("'required' must be a boolean, found {}", TypeTag::of(other)),
                })
            }
        };

        Ok(SchemaNode::Leaf(FieldDescriptor { type_tag, required }))
    }

    fn to_json(&self) -> Value {
        match self {
            SchemaNode::Leaf(d) => {
                let mut map = Map::new();
                map.insert(KEY_TYPE.into(), Value::from(d.type_tag.as_str()));
                map.insert(KEY_REQUIRED.into(), Value::Bool(d.required));
                Value::Object(map)
            }
            SchemaNode::Nested(def) => def.to_value(),
        }
    }
}

/// Complete schema definition: named nodes in authoring order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDefinition {
    nodes: Vec<(String, SchemaNode)>,
}

impl SchemaDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style node insertion. A repeated name replaces the earlier node.
    pub fn field(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        let name = name.into();
        match self.nodes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = node,
            None => self.nodes.push((name, node)),
        }
        self
    }

    pub fn nodes(&self) -> &[(String, SchemaNode)] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Build a definition from its JSON form.
    pub fn from_value(value: &Value) -> SchemaResult<Self> {
        match value {
            Value::Object(map) => Self::from_map(map),
            other => Err(SchemaError::MalformedNode {
                field: "$root".into(),
                reason: format!("expected an object, found {}", TypeTag::of(other)),
            }),
        }
    }

    fn from_map(map: &Map<String, Value>) -> SchemaResult<Self> {
        let mut nodes = Vec::with_capacity(map.len());
        for (name, node) in map {
            nodes.push((name.clone(), SchemaNode::from_json(name, node)?));
        }
        Ok(Self { nodes })
    }

    /// JSON form of the definition. Leaves always carry both keys.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .nodes
            .iter()
            .map(|(name, node)| (name.clone(), node.to_json()))
            .collect();
        Value::Object(map)
    }
}

/// Flattened validation rules derived from a definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedSchema {
    /// Declared type per field name; nested schemas are `object`
    pub type_of: BTreeMap<String, TypeTag>,
    /// Fields that must be present
    pub required: Vec<String>,
    /// Fields allowed but not mandatory
    pub optional: Vec<String>,
}

impl ParsedSchema {
    /// Flatten a definition. Names are not path-prefixed, so a name
    /// declared at two depths keeps the last type seen.
    pub fn from_definition(definition: &SchemaDefinition) -> Self {
        let mut parsed = Self::default();
        parsed.absorb(definition);
        parsed
    }

    fn absorb(&mut self, definition: &SchemaDefinition) {
        for (name, node) in definition.nodes() {
            match node {
                SchemaNode::Leaf(descriptor) => {
                    self.type_of.insert(name.clone(), descriptor.type_tag);
                    if descriptor.required {
                        push_unique(&mut self.required, name);
                    } else {
                        push_unique(&mut self.optional, name);
                    }
                }
                SchemaNode::Nested(children) => {
                    self.type_of.insert(name.clone(), TypeTag::Object);
                    push_unique(&mut self.optional, name);
                    self.absorb(children);
                }
            }
        }
    }

    /// Is `name` declared anywhere in the schema?
    pub fn allows(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name) || self.optional.iter().any(|o| o == name)
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_of_values() {
        assert_eq!(TypeTag::of(&json!(true)), TypeTag::Boolean);
        assert_eq!(TypeTag::of(&json!(1)), TypeTag::Number);
        assert_eq!(TypeTag::of(&json!(1.5)), TypeTag::Number);
        assert_eq!(TypeTag::of(&json!("s")), TypeTag::String);
        assert_eq!(TypeTag::of(&json!([1])), TypeTag::Array);
        assert_eq!(TypeTag::of(&json!({})), TypeTag::Object);
        assert_eq!(TypeTag::of(&Value::Null), TypeTag::Null);
    }

    #[test]
    fn test_type_names_round_trip() {
        for tag in [
            TypeTag::Boolean,
            TypeTag::Null,
            TypeTag::Undefined,
            TypeTag::Number,
            TypeTag::String,
            TypeTag::Object,
            TypeTag::Array,
            TypeTag::Any,
        ] {
            assert_eq!(TypeTag::from_name(tag.as_str()), Some(tag));
        }
        assert_eq!(TypeTag::from_name("int"), None);
    }

    #[test]
    fn test_leaf_and_nested_detection() {
        let def = SchemaDefinition::from_value(&json!({
            "name": {"type": "string", "required": true},
            "flag": {"required": false},
            "e": {"aa": {"type": "*"}}
        }))
        .unwrap();

        let nodes = def.nodes();
        assert_eq!(nodes[0].1, SchemaNode::Leaf(FieldDescriptor::required(TypeTag::String)));
        assert_eq!(nodes[1].1, SchemaNode::Leaf(FieldDescriptor::any()));
        match &nodes[2].1 {
            SchemaNode::Nested(children) => {
                assert_eq!(children.nodes()[0].0, "aa");
            }
            other => panic!("expected nested node, got {:?}", other),
        }
    }

    #[test]
    fn test_ambiguous_node_rejected() {
        let err = SchemaDefinition::from_value(&json!({
            "addr": {"type": "object", "city": {"type": "string"}}
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::AmbiguousNode(ref f) if f == "addr"));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let err = SchemaDefinition::from_value(&json!({"age": {"type": "int"}})).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { .. }));
    }

    #[test]
    fn test_non_object_node_rejected() {
        assert!(SchemaDefinition::from_value(&json!({"age": "number"})).is_err());
        assert!(SchemaDefinition::from_value(&json!([1, 2])).is_err());
        assert!(SchemaDefinition::from_value(&json!({"a": {"required": "yes"}})).is_err());
    }

    #[test]
    fn test_parsed_rules() {
        let def = SchemaDefinition::new()
            .field("name", SchemaNode::leaf(FieldDescriptor::required(TypeTag::String)))
            .field(
                "e",
                SchemaNode::nested(
                    SchemaDefinition::new().field("aa", SchemaNode::leaf(FieldDescriptor::any())),
                ),
            );

        let parsed = ParsedSchema::from_definition(&def);
        assert_eq!(parsed.required, vec!["name".to_string()]);
        assert_eq!(parsed.optional, vec!["e".to_string(), "aa".to_string()]);
        assert_eq!(parsed.type_of.get("e"), Some(&TypeTag::Object));
        assert_eq!(parsed.type_of.get("aa"), Some(&TypeTag::Any));
        assert!(parsed.allows("aa"));
        assert!(!parsed.allows("zz"));
    }

    #[test]
    fn test_definition_json_round_trip() {
        let json = json!({
            "name": {"type": "string", "required": true},
            "meta": {"tags": {"type": "array", "required": false}}
        });
        let def = SchemaDefinition::from_value(&json).unwrap();
        assert_eq!(SchemaDefinition::from_value(&def.to_value()).unwrap(), def);
    }

    #[test]
    fn test_field_replaces_same_name() {
        let def = SchemaDefinition::new()
            .field("a", SchemaNode::leaf(FieldDescriptor::any()))
            .field("a", SchemaNode::leaf(FieldDescriptor::required(TypeTag::Number)));
        assert_eq!(def.nodes().len(), 1);
    }
}
