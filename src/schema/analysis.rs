//! Candidate analysis and the three structural checks.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{ParsedSchema, TypeTag};

/// Fields found in a candidate and their runtime types.
///
/// Nested objects are flattened: a parent key is listed after the keys
/// found beneath it, with no path prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub found: Vec<String>,
    #[serde(rename = "foundTypes")]
    pub found_types: BTreeMap<String, TypeTag>,
}

impl AnalysisReport {
    /// Analyse a candidate. Only objects can be analysed.
    pub fn of(candidate: &Value) -> SchemaResult<Self> {
        let Value::Object(map) = candidate else {
            return Err(SchemaError::objects_only());
        };
        let mut report = Self::default();
        report.walk(map);
        Ok(report)
    }

    fn walk(&mut self, map: &Map<String, Value>) {
        for (key, value) in map {
            if let Value::Object(child) = value {
                self.walk(child);
            }
            self.found.push(key.clone());
            self.found_types.insert(key.clone(), TypeTag::of(value));
        }
    }
}

/// Outcome of one check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl CheckOutcome {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Combined result of the three checks, as carried by `schema.invalid`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub fields: Vec<String>,
    pub required: Vec<String>,
    pub types: Vec<String>,
}

impl ValidationReport {
    /// Run every check against an analysis report.
    pub fn check(rules: &ParsedSchema, analysis: &AnalysisReport) -> Self {
        let fields = check_fields(rules, &analysis.found);
        let required = check_required(rules, &analysis.found);
        let types = check_types(rules, &analysis.found_types);

        Self {
            valid: fields.valid && required.valid && types.valid,
            fields: fields.errors,
            required: required.errors,
            types: types.errors,
        }
    }

    /// Every message, fields first, then required, then types
    pub fn errors(&self) -> impl Iterator<Item = &String> {
        self.fields.iter().chain(&self.required).chain(&self.types)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Every found field must be declared required or optional.
pub fn check_fields(rules: &ParsedSchema, found: &[String]) -> CheckOutcome {
    let errors = found
        .iter()
        .filter(|field| !rules.allows(field))
        .map(|field| format!("{} is not allowed", field))
        .collect();
    CheckOutcome::from_errors(errors)
}

/// Every required field must be found.
///
/// An empty candidate fails outright when anything is required; the
/// outcome still lists every missing field.
pub fn check_required(rules: &ParsedSchema, found: &[String]) -> CheckOutcome {
    let missing = |name: &String| format!("REQUIRED field {} is missing", name);

    if !rules.required.is_empty() && found.is_empty() {
        return CheckOutcome {
            valid: false,
            errors: rules.required.iter().map(missing).collect(),
        };
    }

    let errors = rules
        .required
        .iter()
        .filter(|name| !found.contains(*name))
        .map(missing)
        .collect();
    CheckOutcome::from_errors(errors)
}

/// Declared types must match runtime types. `*` fields, absent fields
/// and null values are not checked.
pub fn check_types(rules: &ParsedSchema, found_types: &BTreeMap<String, TypeTag>) -> CheckOutcome {
    let errors = rules
        .type_of
        .iter()
        .filter(|(_, declared)| **declared != TypeTag::Any)
        .filter_map(|(name, declared)| {
            let actual = found_types.get(name)?;
            if actual.is_exempt() || actual == declared {
                return None;
            }
            Some(format!("{} should have been {} but was {}", name, declared, actual))
        })
        .collect();
    CheckOutcome::from_errors(errors)
}
