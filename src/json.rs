//! JSON codec for the type model.
//!
//! One `kind`-tagged record per variant, payload fields only. Maps (object
//! properties) become ordered arrays of `{name, ...}` records so the document
//! stays plain data. `decode(encode(t)) == t` for every `t`.
//!
//! Encoding builds `serde_json::Value`s directly; decoding reads each record
//! through serde-derived payload shapes so malformed input is rejected with
//! the JSON path of the failure, however deeply it is nested.
//!
//! JSON has no non-finite numbers, so `NaN` and the infinities are written as
//! `{"number": "NaN" | "Infinity" | "-Infinity"}` in a literal's `value`.
use ordered_float::OrderedFloat;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::adt::{
    FullyQualifiedName, LiteralValue, NominativeType, ObjectType, Parameter, Property,
    Signature, Type, TypeKind,
};
use crate::error::DecodeError;

/// Largest integer a JSON consumer can read back exactly as a double.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

// ------------------------------- Encode ---------------------------------- //

pub fn encode(ty: &Type) -> Value {
    let kind = ty.kind().as_str();
    match ty {
        Type::Primitive(_) | Type::NonPrimitive => json!({ "kind": kind }),
        Type::UniqueSymbol { name } => json!({ "kind": kind, "name": name }),
        Type::Literal(value) => json!({ "kind": kind, "value": encode_literal(value) }),
        Type::Union(types) | Type::Intersection(types) => {
            json!({ "kind": kind, "types": encode_all(types) })
        }
        Type::Untranslated { as_string } => json!({ "kind": kind, "asString": as_string }),
        Type::Object(obj) => encode_object(obj),
        Type::Nominative(nom) => encode_nominative(nom),
        Type::TypeParameter { name } => json!({ "kind": kind, "name": name }),
        Type::Typeof { expression } => json!({ "kind": kind, "expression": expression }),
        Type::Tuple(elems) => json!({ "kind": kind, "typeArguments": encode_all(elems) }),
    }
}

/// Compact JSON text of `encode(ty)`.
pub fn encode_to_string(ty: &Type) -> String {
    encode(ty).to_string()
}

fn encode_all(types: &[Type]) -> Vec<Value> {
    types.iter().map(encode).collect()
}

fn encode_literal(value: &LiteralValue) -> Value {
    match value {
        LiteralValue::String(s) => Value::from(s.as_str()),
        LiteralValue::Number(n) => {
            let n = n.0;
            if n.is_nan() {
                return json!({ "number": "NaN" });
            }
            if n.is_infinite() {
                let tag = if n > 0.0 { "Infinity" } else { "-Infinity" };
                return json!({ "number": tag });
            }
            // keep integers integral on the wire
            if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
                Value::from(n as i64)
            } else {
                Value::from(n)
            }
        }
    }
}

fn encode_object(obj: &ObjectType) -> Value {
    let properties = obj.properties.values()
        .map(|p| json!({ "name": p.name, "optional": p.optional, "type": encode(&p.ty) }))
        .collect::<Vec<_>>();
    let call_signatures = obj.call_signatures.iter()
        .map(encode_signature)
        .collect::<Vec<_>>();
    json!({
        "kind": TypeKind::Object.as_str(),
        "properties": properties,
        "callSignatures": call_signatures,
    })
}

fn encode_signature(sig: &Signature) -> Value {
    let parameters = sig.parameters.iter()
        .map(|p| json!({ "name": p.name, "type": encode(&p.ty) }))
        .collect::<Vec<_>>();
    json!({ "parameters": parameters, "returnType": encode(&sig.return_type) })
}

fn encode_nominative(nom: &NominativeType) -> Value {
    json!({
        "kind": TypeKind::Nominative.as_str(),
        "name": nom.name,
        "fullyQualifiedName": encode_fully_qualified_name(&nom.fully_qualified_name),
        "typeArguments": encode_all(&nom.type_arguments),
    })
}

fn encode_fully_qualified_name(fqn: &FullyQualifiedName) -> Value {
    let mut map = Map::new();
    map.insert("builtin".into(), Value::from(fqn.builtin));
    // unset package/file are omitted, not null
    if let Some(package_name) = &fqn.package_name {
        map.insert("packageName".into(), Value::from(package_name.as_str()));
    }
    if let Some(file_name) = &fqn.file_name {
        map.insert("fileName".into(), Value::from(file_name.as_str()));
    }
    map.insert("name".into(), Value::from(fqn.name.as_str()));
    Value::Object(map)
}

// ------------------------------- Decode ---------------------------------- //
//
// Records are dispatched on `kind` by hand rather than through an internally
// tagged serde enum: tagged enums buffer their input, which loses the path of
// errors inside nested records. Each record's payload is read with
// `serde_path_to_error` and nested types are decoded with their own path.

pub fn decode(value: Value) -> Result<Type, DecodeError> {
    decode_at(value, "")
}

pub fn decode_str(src: &str) -> Result<Type, DecodeError> {
    let value = serde_json::from_str::<Value>(src)
        .map_err(|err| DecodeError { path: ".".to_string(), message: err.to_string() })?;
    decode(value)
}

/// `at` is the path of `value` in the document, empty for the root.
fn decode_at(value: Value, at: &str) -> Result<Type, DecodeError> {
    let Some(record) = value.as_object() else {
        return Err(DecodeError {
            path: path_or_root(at),
            message: format!("expected a type record, found {value}"),
        });
    };
    let kind = match record.get("kind") {
        Some(Value::String(tag)) => TypeKind::from_tag(tag).ok_or_else(|| DecodeError {
            path: path_or_root(at),
            message: format!("unknown type kind `{tag}`"),
        })?,
        Some(other) => {
            return Err(DecodeError {
                path: join(at, "kind"),
                message: format!("expected a kind tag, found {other}"),
            });
        }
        None => {
            return Err(DecodeError {
                path: path_or_root(at),
                message: "missing field `kind`".to_string(),
            });
        }
    };

    let ty = match kind {
        TypeKind::String => Type::STRING,
        TypeKind::Number => Type::NUMBER,
        TypeKind::Boolean => Type::BOOLEAN,
        TypeKind::Symbol => Type::SYMBOL,
        TypeKind::Null => Type::NULL,
        TypeKind::Undefined => Type::UNDEFINED,
        TypeKind::Void => Type::VOID,
        TypeKind::Never => Type::NEVER,
        TypeKind::Any => Type::ANY,
        TypeKind::NonPrimitive => Type::NonPrimitive,
        TypeKind::UniqueSymbol => {
            let NameJson { name } = payload(value, at)?;
            Type::UniqueSymbol { name }
        }
        TypeKind::Literal => {
            let LiteralRecordJson { value } = payload(value, at)?;
            Type::Literal(LiteralValue::from(value))
        }
        TypeKind::Union => {
            let TypesJson { types } = payload(value, at)?;
            Type::Union(decode_list(types, &join(at, "types"))?)
        }
        TypeKind::Intersection => {
            let TypesJson { types } = payload(value, at)?;
            Type::Intersection(decode_list(types, &join(at, "types"))?)
        }
        TypeKind::Untranslated => {
            let UntranslatedJson { as_string } = payload(value, at)?;
            Type::Untranslated { as_string }
        }
        TypeKind::Object => Type::Object(decode_object(payload(value, at)?, at)?),
        TypeKind::Nominative => {
            let NominativeJson { name, fully_qualified_name, type_arguments } = payload(value, at)?;
            let fqn = FullyQualifiedName {
                builtin: fully_qualified_name.builtin,
                package_name: fully_qualified_name.package_name,
                file_name: fully_qualified_name.file_name,
                name: fully_qualified_name.name,
            };
            let type_arguments = decode_list(type_arguments, &join(at, "typeArguments"))?;
            Type::nominative(name, fqn, type_arguments)
        }
        TypeKind::Parameter => {
            let NameJson { name } = payload(value, at)?;
            Type::TypeParameter { name }
        }
        TypeKind::Typeof => {
            let TypeofJson { expression } = payload(value, at)?;
            Type::Typeof { expression }
        }
        TypeKind::Tuple => {
            let TupleJson { type_arguments } = payload(value, at)?;
            Type::Tuple(decode_list(type_arguments, &join(at, "typeArguments"))?)
        }
    };
    Ok(ty)
}

fn decode_list(values: Vec<Value>, at: &str) -> Result<Vec<Type>, DecodeError> {
    values.into_iter()
        .enumerate()
        .map(|(i, value)| decode_at(value, &format!("{at}[{i}]")))
        .collect()
}

fn decode_object(wire: ObjectJson, at: &str) -> Result<ObjectType, DecodeError> {
    let mut properties = Vec::new();
    for (i, prop) in wire.properties.unwrap_or_default().into_iter().enumerate() {
        let ty = decode_at(prop.ty, &join(at, &format!("properties[{i}].type")))?;
        properties.push(Property { name: prop.name, optional: prop.optional, ty });
    }
    let mut call_signatures = Vec::new();
    for (i, sig) in wire.call_signatures.unwrap_or_default().into_iter().enumerate() {
        let at = join(at, &format!("callSignatures[{i}]"));
        let mut parameters = Vec::new();
        for (j, param) in sig.parameters.into_iter().enumerate() {
            let ty = decode_at(param.ty, &join(&at, &format!("parameters[{j}].type")))?;
            parameters.push(Parameter { name: param.name, ty });
        }
        let return_type = decode_at(sig.return_type, &join(&at, "returnType"))?;
        call_signatures.push(Signature { parameters, return_type });
    }
    Ok(ObjectType::new(properties, call_signatures))
}

/// Reads the payload fields of the record at `at`.
fn payload<T: DeserializeOwned>(value: Value, at: &str) -> Result<T, DecodeError> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let mut error = DecodeError::from_path_error(err);
        error.path = if error.path == "." { path_or_root(at) } else { join(at, &error.path) };
        error
    })
}

fn join(at: &str, segment: &str) -> String {
    if at.is_empty() {
        segment.to_string()
    } else if segment.starts_with('[') {
        format!("{at}{segment}")
    } else {
        format!("{at}.{segment}")
    }
}

fn path_or_root(at: &str) -> String {
    if at.is_empty() { ".".to_string() } else { at.to_string() }
}

// ------------------------------ Wire shapes ------------------------------ //
//
// Nested types stay `Value`s here and are decoded by `decode_at`.

#[derive(Debug, Deserialize)]
struct NameJson {
    name: String,
}

#[derive(Debug, Deserialize)]
struct LiteralRecordJson {
    value: LiteralJson,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LiteralJson {
    String(String),
    Number(f64),
    NonFinite { number: NonFiniteJson },
}

#[derive(Debug, Deserialize)]
enum NonFiniteJson {
    NaN,
    Infinity,
    #[serde(rename = "-Infinity")]
    NegInfinity,
}

#[derive(Debug, Deserialize)]
struct TypesJson {
    types: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UntranslatedJson {
    as_string: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectJson {
    // absent or null means "no properties"
    #[serde(default)]
    properties: Option<Vec<PropertyJson>>,
    // absent or null means "not callable"
    #[serde(default)]
    call_signatures: Option<Vec<SignatureJson>>,
}

#[derive(Debug, Deserialize)]
struct PropertyJson {
    name: String,
    optional: bool,
    #[serde(rename = "type")]
    ty: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignatureJson {
    parameters: Vec<ParameterJson>,
    return_type: Value,
}

#[derive(Debug, Deserialize)]
struct ParameterJson {
    name: String,
    #[serde(rename = "type")]
    ty: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NominativeJson {
    name: String,
    fully_qualified_name: FullyQualifiedNameJson,
    type_arguments: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FullyQualifiedNameJson {
    #[serde(default)]
    builtin: bool,
    package_name: Option<String>,
    file_name: Option<String>,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TypeofJson {
    expression: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TupleJson {
    type_arguments: Vec<Value>,
}

impl From<LiteralJson> for LiteralValue {
    fn from(wire: LiteralJson) -> Self {
        match wire {
            LiteralJson::String(s) => LiteralValue::String(s),
            LiteralJson::Number(n) => LiteralValue::Number(OrderedFloat(n)),
            LiteralJson::NonFinite { number: NonFiniteJson::NaN } => {
                LiteralValue::Number(OrderedFloat(f64::NAN))
            }
            LiteralJson::NonFinite { number: NonFiniteJson::Infinity } => {
                LiteralValue::Number(OrderedFloat(f64::INFINITY))
            }
            LiteralJson::NonFinite { number: NonFiniteJson::NegInfinity } => {
                LiteralValue::Number(OrderedFloat(f64::NEG_INFINITY))
            }
        }
    }
}

// ------------------------- serde integration ----------------------------- //

impl Serialize for Type {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Type {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode(value).map_err(serde::de::Error::custom)
    }
}

// ------------------------------- Tests ----------------------------------- //
