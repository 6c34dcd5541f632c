//! Portable type model.
//!
//! A closed sum type describing what a value can be, independent of the
//! checker that produced it. Values are immutable after construction and
//! compare structurally.
//!
//! - Primitives are plain unit-like values; use the shared constants
//!   (`Type::STRING`, `Type::ANY`, ...) instead of building them by hand.
//! - `Nominative` refers to a declared type by fully-qualified name, which is
//!   what keeps recursive types finite.
//! - `Untranslated` is the escape hatch for anything the converter could not
//!   classify, including back-edges of cyclic type graphs.
use std::fmt;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;

use crate::error::ModelError;

// ------------------------------- Kinds ----------------------------------- //

/// Built-in, payload-free types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    /// The type all symbols share. Individual symbols get `Type::UniqueSymbol`.
    Symbol,
    Null,
    Undefined,
    Void,
    Never,
    Any,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::String,
        PrimitiveKind::Number,
        PrimitiveKind::Boolean,
        PrimitiveKind::Symbol,
        PrimitiveKind::Null,
        PrimitiveKind::Undefined,
        PrimitiveKind::Void,
        PrimitiveKind::Never,
        PrimitiveKind::Any,
    ];

    pub fn kind(self) -> TypeKind {
        match self {
            PrimitiveKind::String => TypeKind::String,
            PrimitiveKind::Number => TypeKind::Number,
            PrimitiveKind::Boolean => TypeKind::Boolean,
            PrimitiveKind::Symbol => TypeKind::Symbol,
            PrimitiveKind::Null => TypeKind::Null,
            PrimitiveKind::Undefined => TypeKind::Undefined,
            PrimitiveKind::Void => TypeKind::Void,
            PrimitiveKind::Never => TypeKind::Never,
            PrimitiveKind::Any => TypeKind::Any,
        }
    }
}

/// Discriminant of `Type`. The string form is the `kind` tag of the JSON
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKind {
    String,
    Number,
    Boolean,
    Symbol,
    UniqueSymbol,
    Null,
    Undefined,
    Void,
    Never,
    Any,
    NonPrimitive,
    Literal,
    Union,
    Intersection,
    Untranslated,
    Object,
    Nominative,
    Parameter,
    Typeof,
    Tuple,
}

impl TypeKind {
    pub const ALL: [TypeKind; 20] = [
        TypeKind::String,
        TypeKind::Number,
        TypeKind::Boolean,
        TypeKind::Symbol,
        TypeKind::UniqueSymbol,
        TypeKind::Null,
        TypeKind::Undefined,
        TypeKind::Void,
        TypeKind::Never,
        TypeKind::Any,
        TypeKind::NonPrimitive,
        TypeKind::Literal,
        TypeKind::Union,
        TypeKind::Intersection,
        TypeKind::Untranslated,
        TypeKind::Object,
        TypeKind::Nominative,
        TypeKind::Parameter,
        TypeKind::Typeof,
        TypeKind::Tuple,
    ];

    /// Inverse of [`TypeKind::as_str`].
    pub fn from_tag(tag: &str) -> Option<Self> {
        TypeKind::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::String => "string",
            TypeKind::Number => "number",
            TypeKind::Boolean => "boolean",
            TypeKind::Symbol => "symbol",
            TypeKind::UniqueSymbol => "UniqueSymbol",
            TypeKind::Null => "null",
            TypeKind::Undefined => "undefined",
            TypeKind::Void => "void",
            TypeKind::Never => "never",
            TypeKind::Any => "any",
            TypeKind::NonPrimitive => "nonprimitive",
            TypeKind::Literal => "literal",
            TypeKind::Union => "union",
            TypeKind::Intersection => "intersection",
            TypeKind::Untranslated => "untranslated",
            TypeKind::Object => "object",
            TypeKind::Nominative => "nominative",
            TypeKind::Parameter => "parameter",
            TypeKind::Typeof => "typeof",
            TypeKind::Tuple => "tuple",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ------------------------------- Model ----------------------------------- //

/// Value of a singleton literal type, e.g. `"probably" | "maybe" | ""`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    String(String),
    Number(OrderedFloat<f64>),
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        LiteralValue::String(s.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        LiteralValue::String(s)
    }
}

impl From<f64> for LiteralValue {
    fn from(n: f64) -> Self {
        LiteralValue::Number(OrderedFloat(n))
    }
}

impl From<i64> for LiteralValue {
    fn from(n: i64) -> Self {
        LiteralValue::Number(OrderedFloat(n as f64))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(PrimitiveKind),
    /// One specific symbol instance. Only the description survives; two
    /// distinct symbols with the same description are indistinguishable here.
    UniqueSymbol { name: String },
    /// Any value that isn't a primitive (`object`, lowercase).
    NonPrimitive,
    Literal(LiteralValue),
    Union(Vec<Type>),
    Intersection(Vec<Type>),
    /// Checker's own rendering of a type we could not classify. Debug only.
    Untranslated { as_string: String },
    Object(ObjectType),
    Nominative(NominativeType),
    /// An unbound parameter such as `K` in the *definition* of a generic type.
    TypeParameter { name: String },
    /// Type of a specific value expression, e.g. `typeof Date`.
    Typeof { expression: String },
    Tuple(Vec<Type>),
}

/// Structural object type. Also used for function types (non-empty
/// `call_signatures`) and for expanded class/interface definitions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectType {
    /// Properties and methods, keyed by name, in declaration order.
    pub properties: IndexMap<String, Property>,
    /// More than one signature means overloads.
    pub call_signatures: Vec<Signature>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub optional: bool,
    /// For optional properties this already includes `undefined` when the
    /// checker says so; `optional` only records that the key may be absent.
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub parameters: Vec<Parameter>,
    pub return_type: Type,
}

/// A type referenced by name. Also covers instantiations of generic types.
#[derive(Debug, Clone, PartialEq)]
pub struct NominativeType {
    /// Display name; not unique.
    pub name: String,
    pub fully_qualified_name: FullyQualifiedName,
    pub type_arguments: Vec<Type>,
}

/// Where a named type was declared.
///
/// The same symbol always gets the same name within a session, but two
/// different symbols may collide (classes minted by a factory function).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FullyQualifiedName {
    /// Defined by the checker's standard library; package and file are unset.
    pub builtin: bool,
    /// Package that declares the type, e.g. `@types/node`. `None` for files of
    /// the project under analysis.
    pub package_name: Option<String>,
    /// File inside the package (or relative to the source root), including
    /// its extension.
    pub file_name: Option<String>,
    pub name: String,
}

impl FullyQualifiedName {
    pub fn builtin(name: impl Into<String>) -> Self {
        FullyQualifiedName { builtin: true, package_name: None, file_name: None, name: name.into() }
    }

    pub fn local(file_name: impl Into<String>, name: impl Into<String>) -> Self {
        FullyQualifiedName {
            builtin: false,
            package_name: None,
            file_name: Some(file_name.into()),
            name: name.into(),
        }
    }

    pub fn in_package(
        package_name: impl Into<String>,
        file_name: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        FullyQualifiedName {
            builtin: false,
            package_name: Some(package_name.into()),
            file_name: Some(file_name.into()),
            name: name.into(),
        }
    }
}

// ---------------------------- Construction ------------------------------- //

impl Type {
    pub const STRING: Type = Type::Primitive(PrimitiveKind::String);
    pub const NUMBER: Type = Type::Primitive(PrimitiveKind::Number);
    pub const BOOLEAN: Type = Type::Primitive(PrimitiveKind::Boolean);
    pub const SYMBOL: Type = Type::Primitive(PrimitiveKind::Symbol);
    pub const NULL: Type = Type::Primitive(PrimitiveKind::Null);
    pub const UNDEFINED: Type = Type::Primitive(PrimitiveKind::Undefined);
    pub const VOID: Type = Type::Primitive(PrimitiveKind::Void);
    pub const NEVER: Type = Type::Primitive(PrimitiveKind::Never);
    pub const ANY: Type = Type::Primitive(PrimitiveKind::Any);
    pub const NON_PRIMITIVE: Type = Type::NonPrimitive;

    pub fn literal(value: impl Into<LiteralValue>) -> Self {
        Type::Literal(value.into())
    }

    pub fn unique_symbol(name: impl Into<String>) -> Self {
        Type::UniqueSymbol { name: name.into() }
    }

    pub fn union(types: impl IntoIterator<Item = Type>) -> Self {
        Type::Union(types.into_iter().collect())
    }

    pub fn intersection(types: impl IntoIterator<Item = Type>) -> Self {
        Type::Intersection(types.into_iter().collect())
    }

    pub fn untranslated(as_string: impl Into<String>) -> Self {
        Type::Untranslated { as_string: as_string.into() }
    }

    pub fn object(
        properties: impl IntoIterator<Item = Property>,
        call_signatures: Vec<Signature>,
    ) -> Self {
        Type::Object(ObjectType::new(properties, call_signatures))
    }

    /// A callable object with no properties. Signatures that only differ in
    /// parameter names are collapsed.
    pub fn new_function(call_signatures: Vec<Signature>) -> Result<Self, ModelError> {
        if call_signatures.is_empty() {
            return Err(ModelError::NoCallSignatures);
        }
        let call_signatures = crate::collapse::collapse_signatures(call_signatures);
        Ok(Type::Object(ObjectType { properties: IndexMap::new(), call_signatures }))
    }

    pub fn nominative(
        name: impl Into<String>,
        fully_qualified_name: FullyQualifiedName,
        type_arguments: Vec<Type>,
    ) -> Self {
        Type::Nominative(NominativeType {
            name: name.into(),
            fully_qualified_name,
            type_arguments,
        })
    }

    pub fn type_parameter(name: impl Into<String>) -> Self {
        Type::TypeParameter { name: name.into() }
    }

    pub fn type_of(expression: impl Into<String>) -> Self {
        Type::Typeof { expression: expression.into() }
    }

    pub fn tuple(elements: impl IntoIterator<Item = Type>) -> Self {
        Type::Tuple(elements.into_iter().collect())
    }
}

impl ObjectType {
    /// Later properties overwrite earlier ones with the same name.
    pub fn new(properties: impl IntoIterator<Item = Property>, call_signatures: Vec<Signature>) -> Self {
        let mut map = IndexMap::new();
        for prop in properties {
            map.insert(prop.name.clone(), prop);
        }
        ObjectType { properties: map, call_signatures }
    }

    pub fn is_callable(&self) -> bool {
        !self.call_signatures.is_empty()
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }
}

impl Property {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Property { name: name.into(), optional: false, ty }
    }

    pub fn optional(name: impl Into<String>, ty: Type) -> Self {
        Property { name: name.into(), optional: true, ty }
    }
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Parameter { name: name.into(), ty }
    }
}

impl Signature {
    pub fn new(parameters: Vec<Parameter>, return_type: Type) -> Self {
        Signature { parameters, return_type }
    }
}

// ------------------------------ Guards ----------------------------------- //

impl Type {
    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Primitive(p) => p.kind(),
            Type::UniqueSymbol { .. } => TypeKind::UniqueSymbol,
            Type::NonPrimitive => TypeKind::NonPrimitive,
            Type::Literal(_) => TypeKind::Literal,
            Type::Union(_) => TypeKind::Union,
            Type::Intersection(_) => TypeKind::Intersection,
            Type::Untranslated { .. } => TypeKind::Untranslated,
            Type::Object(_) => TypeKind::Object,
            Type::Nominative(_) => TypeKind::Nominative,
            Type::TypeParameter { .. } => TypeKind::Parameter,
            Type::Typeof { .. } => TypeKind::Typeof,
            Type::Tuple(_) => TypeKind::Tuple,
        }
    }

    /// Primitive kinds plus the primitive-like unique symbols and literals.
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_) | Type::UniqueSymbol { .. } | Type::Literal(_))
    }

    /// `string` or a string literal.
    pub fn is_string(&self) -> bool {
        matches!(
            self,
            Type::Primitive(PrimitiveKind::String) | Type::Literal(LiteralValue::String(_))
        )
    }

    /// `number` or a number literal.
    pub fn is_number(&self) -> bool {
        matches!(
            self,
            Type::Primitive(PrimitiveKind::Number) | Type::Literal(LiteralValue::Number(_))
        )
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveKind::Boolean))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveKind::Symbol))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveKind::Null))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveKind::Undefined))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveKind::Void))
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveKind::Never))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Type::Primitive(PrimitiveKind::Any))
    }

    pub fn is_unique_symbol(&self) -> bool {
        matches!(self, Type::UniqueSymbol { .. })
    }

    pub fn is_non_primitive(&self) -> bool {
        matches!(self, Type::NonPrimitive)
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Type::Literal(_))
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Type::Union(_))
    }

    pub fn is_intersection(&self) -> bool {
        matches!(self, Type::Intersection(_))
    }

    pub fn is_untranslated(&self) -> bool {
        matches!(self, Type::Untranslated { .. })
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Type::Object(_))
    }

    pub fn is_nominative(&self) -> bool {
        matches!(self, Type::Nominative(_))
    }

    pub fn is_type_parameter(&self) -> bool {
        matches!(self, Type::TypeParameter { .. })
    }

    pub fn is_typeof(&self) -> bool {
        matches!(self, Type::Typeof { .. })
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Type::Tuple(_))
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Type::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_nominative(&self) -> Option<&NominativeType> {
        match self {
            Type::Nominative(nom) => Some(nom),
            _ => None,
        }
    }
}

// ------------------------------ Queries ---------------------------------- //

impl Type {
    /// Union: every member must satisfy. Intersection: one member suffices.
    /// Anything else: `predicate(self)`.
    ///
    /// The predicate is never called on a union or intersection node; write
    /// your own recursion if you need to look at those shapes.
    pub fn must_satisfy<P>(&self, predicate: P) -> bool
    where
        P: Fn(&Type) -> bool,
    {
        fn go(ty: &Type, predicate: &dyn Fn(&Type) -> bool) -> bool {
            match ty {
                Type::Union(types) => types.iter().all(|t| go(t, predicate)),
                Type::Intersection(types) => types.iter().any(|t| go(t, predicate)),
                other => predicate(other),
            }
        }
        go(self, &predicate)
    }

    /// Every concrete type a value of this type could be. Nested unions are
    /// flattened; intersections are leaves. No duplicates, first-seen order.
    pub fn possible_types(&self) -> Vec<&Type> {
        fn collect<'a>(ty: &'a Type, out: &mut Vec<&'a Type>) {
            match ty {
                Type::Union(types) => {
                    for t in types {
                        collect(t, out);
                    }
                }
                leaf => {
                    if !out.contains(&leaf) {
                        out.push(leaf);
                    }
                }
            }
        }
        let mut out = Vec::new();
        collect(self, &mut out);
        out
    }
}

// ------------------------------ Display ---------------------------------- //
//
// Human consumption only; close to checker syntax but not parseable back.

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Symbol => "Symbol",
            PrimitiveKind::Null => "null",
            PrimitiveKind::Undefined => "undefined",
            PrimitiveKind::Void => "void",
            PrimitiveKind::Never => "never",
            PrimitiveKind::Any => "any",
        };
        f.write_str(s)
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // JSON quoting, so `"a\"b"` stays readable
            LiteralValue::String(s) => write!(f, "{}", serde_json::Value::from(s.as_str())),
            LiteralValue::Number(n) => write!(f, "{}", n.0),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{p}"),
            Type::UniqueSymbol { .. } => f.write_str("[symbol type]"),
            Type::NonPrimitive => f.write_str("object"),
            Type::Literal(v) => write!(f, "{v}"),
            Type::Union(types) => write_joined(f, types, " | "),
            Type::Intersection(types) => write_joined(f, types, " & "),
            Type::Untranslated { as_string } => write!(f, "[untranslated {as_string}]"),
            Type::Object(obj) => write!(f, "{obj}"),
            Type::Nominative(nom) => write!(f, "{nom}"),
            Type::TypeParameter { name } => f.write_str(name),
            Type::Typeof { expression } => write!(f, "typeof {expression}"),
            Type::Tuple(elems) => {
                f.write_str("[")?;
                write_joined(f, elems, ", ")?;
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // a plain function prints as its signature
        if self.call_signatures.len() == 1 && self.properties.is_empty() {
            return write!(f, "{}", self.call_signatures[0]);
        }
        let fields = self.properties.values()
            .map(|p| p.to_string())
            .chain(self.call_signatures.iter().map(|s| s.to_string()))
            .collect::<Vec<_>>();
        write!(f, "{{{}}}", fields.join("; "))
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.optional { "?" } else { "" };
        write!(f, "{}{}: {}", self.name, marker, self.ty)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self.parameters.iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .collect::<Vec<_>>();
        write!(f, "({}) => {}", params.join(", "), self.return_type)
    }
}

impl fmt::Display for NominativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.type_arguments.is_empty() {
            f.write_str("<")?;
            write_joined(f, &self.type_arguments, ", ")?;
            f.write_str(">")?;
        }
        Ok(())
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, types: &[Type], sep: &str) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{ty}")?;
    }
    Ok(())
}

// ------------------------------- Tests ----------------------------------- //

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(params: &[(&str, Type)], ret: Type) -> Signature {
        Signature::new(
            params.iter().map(|(n, t)| Parameter::new(*n, t.clone())).collect(),
            ret,
        )
    }

    #[test]
    fn must_satisfy_calls_predicate_on_leaf() {
        let ty = Type::literal("foo");
        assert!(ty.must_satisfy(|t| *t == Type::literal("foo")));
        assert!(!ty.must_satisfy(Type::is_number));
    }

    #[test]
    fn must_satisfy_union_requires_all_members() {
        let lits = Type::union([Type::literal("foo"), Type::literal("bar")]);
        assert!(lits.must_satisfy(Type::is_literal));

        let mixed = Type::union([Type::literal("foo"), Type::BOOLEAN]);
        assert!(!mixed.must_satisfy(Type::is_literal));
    }

    #[test]
    fn must_satisfy_intersection_requires_one_member() {
        let ty = Type::intersection([Type::literal("foo"), Type::BOOLEAN]);
        assert!(ty.must_satisfy(Type::is_literal));
        assert!(!ty.must_satisfy(Type::is_null));
    }

    #[test]
    fn must_satisfy_recurses_through_nesting() {
        let ty = Type::union([
            Type::intersection([Type::NUMBER, Type::SYMBOL]),
            Type::intersection([Type::literal(123i64), Type::UNDEFINED]),
        ]);
        assert!(ty.must_satisfy(Type::is_number));
        assert!(!ty.must_satisfy(Type::is_symbol));
    }

    #[test]
    fn must_satisfy_never_sees_union_nodes() {
        let ty = Type::union([Type::union([Type::STRING]), Type::intersection([Type::NUMBER])]);
        assert!(ty.must_satisfy(|t| !t.is_union() && !t.is_intersection()));
    }

    #[test]
    fn possible_types_flattens_nested_unions() {
        let ty = Type::union([
            Type::STRING,
            Type::union([Type::NUMBER, Type::union([Type::STRING, Type::NULL])]),
            Type::intersection([Type::NUMBER, Type::BOOLEAN]),
        ]);
        let got = ty.possible_types();
        assert_eq!(
            got,
            vec![
                &Type::STRING,
                &Type::NUMBER,
                &Type::NULL,
                &Type::intersection([Type::NUMBER, Type::BOOLEAN]),
            ]
        );
    }

    #[test]
    fn possible_types_of_non_union_is_itself() {
        let ty = Type::intersection([Type::NUMBER, Type::SYMBOL]);
        assert_eq!(ty.possible_types(), vec![&ty]);
    }

    #[test]
    fn literals_refine_their_base_type() {
        assert!(Type::literal("x").is_string());
        assert!(!Type::literal("x").is_number());
        assert!(Type::literal(1i64).is_number());
        assert!(!Type::literal(1i64).is_string());
    }

    #[test]
    fn kind_tags_are_distinct_and_invertible() {
        for kind in TypeKind::ALL {
            assert_eq!(TypeKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(TypeKind::from_tag("uniquesymbol"), None);
        assert_eq!(TypeKind::from_tag(""), None);
    }

    #[test]
    fn guards_match_exactly_one_kind() {
        let all: &[(&str, fn(&Type) -> bool)] = &[
            ("primitive", Type::is_primitive),
            ("string", Type::is_string),
            ("number", Type::is_number),
            ("boolean", Type::is_boolean),
            ("null", Type::is_null),
            ("undefined", Type::is_undefined),
            ("void", Type::is_void),
            ("never", Type::is_never),
            ("any", Type::is_any),
            ("union", Type::is_union),
            ("symbol", Type::is_symbol),
            ("unique_symbol", Type::is_unique_symbol),
            ("intersection", Type::is_intersection),
            ("untranslated", Type::is_untranslated),
            ("literal", Type::is_literal),
            ("object", Type::is_object),
            ("non_primitive", Type::is_non_primitive),
            ("nominative", Type::is_nominative),
            ("type_parameter", Type::is_type_parameter),
            ("typeof", Type::is_typeof),
            ("tuple", Type::is_tuple),
        ];
        let cases: Vec<(Type, Vec<&str>)> = vec![
            (Type::STRING, vec!["string", "primitive"]),
            (Type::NUMBER, vec!["number", "primitive"]),
            (Type::BOOLEAN, vec!["boolean", "primitive"]),
            (Type::NULL, vec!["null", "primitive"]),
            (Type::UNDEFINED, vec!["undefined", "primitive"]),
            (Type::VOID, vec!["void", "primitive"]),
            (Type::NEVER, vec!["never", "primitive"]),
            (Type::ANY, vec!["any", "primitive"]),
            (Type::SYMBOL, vec!["symbol", "primitive"]),
            (Type::unique_symbol("name"), vec!["unique_symbol", "primitive"]),
            (Type::literal("str"), vec!["string", "literal", "primitive"]),
            (Type::literal(123i64), vec!["number", "literal", "primitive"]),
            (Type::NON_PRIMITIVE, vec!["non_primitive"]),
            (Type::type_parameter("T"), vec!["type_parameter"]),
            (Type::type_of("x.y"), vec!["typeof"]),
            (Type::untranslated("?!?!"), vec!["untranslated"]),
            (Type::tuple([Type::STRING]), vec!["tuple"]),
            (Type::union([Type::STRING]), vec!["union"]),
            (Type::intersection([Type::STRING]), vec!["intersection"]),
            (Type::object([], vec![]), vec!["object"]),
            (Type::nominative("Foo", FullyQualifiedName::builtin("Foo"), vec![]), vec!["nominative"]),
        ];
        for (ty, expected) in cases {
            for (name, guard) in all {
                assert_eq!(
                    guard(&ty),
                    expected.contains(name),
                    "guard `{name}` on {ty}",
                );
            }
        }
    }

    #[test]
    fn new_function_rejects_empty_signatures() {
        assert_eq!(Type::new_function(vec![]), Err(ModelError::NoCallSignatures));
    }

    #[test]
    fn new_function_collapses_renamed_duplicates() {
        let ty = Type::new_function(vec![
            sig(&[("x", Type::NUMBER)], Type::VOID),
            sig(&[("y", Type::NUMBER)], Type::VOID),
            sig(&[("z", Type::NUMBER)], Type::VOID),
        ]).unwrap();
        let obj = ty.as_object().unwrap();
        assert!(obj.is_callable());
        assert_eq!(obj.call_signatures.len(), 1);
        assert_eq!(obj.call_signatures[0].parameters[0].name, "x");
    }

    #[test]
    fn new_function_keeps_distinct_overloads() {
        let by_param = Type::new_function(vec![
            sig(&[("x", Type::NUMBER)], Type::VOID),
            sig(&[("x", Type::STRING)], Type::VOID),
        ]).unwrap();
        assert_eq!(by_param.as_object().unwrap().call_signatures.len(), 2);

        let by_return = Type::new_function(vec![
            sig(&[("x", Type::NUMBER)], Type::VOID),
            sig(&[("x", Type::NUMBER)], Type::ANY),
        ]).unwrap();
        assert_eq!(by_return.as_object().unwrap().call_signatures.len(), 2);
    }

    #[test]
    fn object_last_property_write_wins() {
        let obj = ObjectType::new(
            [Property::new("a", Type::NUMBER), Property::new("b", Type::NULL), Property::optional("a", Type::STRING)],
            vec![],
        );
        assert_eq!(obj.properties.len(), 2);
        assert_eq!(obj.property("a"), Some(&Property::optional("a", Type::STRING)));
        assert!(!obj.is_callable());
    }

    #[test]
    fn structural_equality_ignores_construction_path() {
        let a = Type::nominative("Map", FullyQualifiedName::builtin("Map"), vec![Type::STRING, Type::NUMBER]);
        let b = Type::Nominative(NominativeType {
            name: "Map".into(),
            fully_qualified_name: FullyQualifiedName { builtin: true, name: "Map".into(), ..Default::default() },
            type_arguments: vec![Type::Primitive(PrimitiveKind::String), Type::Primitive(PrimitiveKind::Number)],
        });
        assert_eq!(a, b);
    }

    #[test]
    fn renders_literals_as_json() {
        insta::assert_snapshot!(Type::literal(2i64).to_string(), @"2");
        insta::assert_snapshot!(Type::literal(2.5).to_string(), @"2.5");
        insta::assert_snapshot!(Type::literal("foo").to_string(), @r#""foo""#);
    }

    #[test]
    fn renders_generic_nominative_with_angle_brackets() {
        let ty = Type::nominative("Map", FullyQualifiedName::builtin("Map"), vec![Type::STRING, Type::NUMBER]);
        insta::assert_snapshot!(ty.to_string(), @"Map<string, number>");
    }

    #[test]
    fn renders_objects() {
        let props = Type::object(
            [Property::new("x", Type::NUMBER), Property::optional("y", Type::STRING)],
            vec![],
        );
        insta::assert_snapshot!(props.to_string(), @"{x: number; y?: string}");

        let single = Type::new_function(vec![sig(&[("x", Type::NUMBER)], Type::NUMBER)]).unwrap();
        insta::assert_snapshot!(single.to_string(), @"(x: number) => number");

        let overloaded = Type::new_function(vec![
            sig(&[("x", Type::NUMBER)], Type::NUMBER),
            sig(&[("x", Type::STRING)], Type::STRING),
        ]).unwrap();
        insta::assert_snapshot!(overloaded.to_string(), @"{(x: number) => number; (x: string) => string}");

        insta::assert_snapshot!(Type::object([], vec![]).to_string(), @"{}");
    }

    #[test]
    fn renders_compound_types() {
        insta::assert_snapshot!(Type::union([Type::NUMBER, Type::STRING]).to_string(), @"number | string");
        insta::assert_snapshot!(Type::intersection([Type::BOOLEAN, Type::SYMBOL]).to_string(), @"boolean & Symbol");
        insta::assert_snapshot!(Type::tuple([Type::NUMBER, Type::STRING]).to_string(), @"[number, string]");
        insta::assert_snapshot!(Type::type_of("jQuery").to_string(), @"typeof jQuery");
        insta::assert_snapshot!(Type::untranslated("T[K]").to_string(), @"[untranslated T[K]]");
    }
}
