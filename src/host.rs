//! Capability interface of the external type checker.
//!
//! The converter only sees the checker through these traits: opaque `Copy`
//! handles plus typed queries. Nothing here is queried dynamically; a host that
//! has no answer for a query returns `None`/empty and the converter degrades
//! to `Untranslated`.
use std::fmt::Debug;
use std::hash::Hash;
use std::path::PathBuf;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

// ------------------------------- Flags ----------------------------------- //

bitflags! {
    /// Classification bits of a host type. A type may carry several.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TypeFlags: u32 {
        const ANY              = 1 << 0;
        const UNKNOWN          = 1 << 1;
        const STRING           = 1 << 2;
        const NUMBER           = 1 << 3;
        const BOOLEAN          = 1 << 4;
        const ENUM             = 1 << 5;
        const BIG_INT          = 1 << 6;
        const STRING_LITERAL   = 1 << 7;
        const NUMBER_LITERAL   = 1 << 8;
        const BOOLEAN_LITERAL  = 1 << 9;
        const ENUM_LITERAL     = 1 << 10;
        const BIG_INT_LITERAL  = 1 << 11;
        const ES_SYMBOL        = 1 << 12;
        const UNIQUE_ES_SYMBOL = 1 << 13;
        const VOID             = 1 << 14;
        const UNDEFINED        = 1 << 15;
        const NULL             = 1 << 16;
        const NEVER            = 1 << 17;
        const TYPE_PARAMETER   = 1 << 18;
        const OBJECT           = 1 << 19;
        const UNION            = 1 << 20;
        const INTERSECTION     = 1 << 21;
        const INDEX            = 1 << 22;
        const INDEXED_ACCESS   = 1 << 23;
        const CONDITIONAL      = 1 << 24;
        const SUBSTITUTION     = 1 << 25;
        const NON_PRIMITIVE    = 1 << 26;
        const TEMPLATE_LITERAL = 1 << 27;
    }
}

bitflags! {
    /// Extra bits carried by object types.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ObjectFlags: u32 {
        const CLASS        = 1 << 0;
        const INTERFACE    = 1 << 1;
        /// Instantiation of a generic type (`Array<number>`, tuples).
        const REFERENCE    = 1 << 2;
        const TUPLE        = 1 << 3;
        const ANONYMOUS    = 1 << 4;
        const MAPPED       = 1 << 5;
        const INSTANTIATED = 1 << 6;
    }
}

bitflags! {
    /// Classification bits of a host symbol.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SymbolFlags: u32 {
        const VARIABLE       = 1 << 0;
        const PROPERTY       = 1 << 1;
        const FUNCTION       = 1 << 2;
        const CLASS          = 1 << 3;
        const INTERFACE      = 1 << 4;
        const ENUM           = 1 << 5;
        const VALUE_MODULE   = 1 << 6;
        const NAMESPACE      = 1 << 7;
        const TYPE_LITERAL   = 1 << 8;
        const OBJECT_LITERAL = 1 << 9;
        const METHOD         = 1 << 10;
        const TYPE_PARAMETER = 1 << 11;
        const TYPE_ALIAS     = 1 << 12;
        const ALIAS          = 1 << 13;
        const OPTIONAL       = 1 << 14;
    }
}

impl Default for TypeFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl Default for SymbolFlags {
    fn default() -> Self {
        Self::empty()
    }
}

// ----------------------------- Host values ------------------------------- //

/// Syntactic shape the checker would print for a type, when it matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeNodeKind {
    /// `Foo<T>`: the type is written by name.
    TypeReference,
    /// `typeof foo`: the type is the type of a value.
    TypeQuery,
    #[default]
    Other,
}

/// Value of a string or number literal type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostLiteral {
    String(String),
    Number(f64),
}

/// Package identity of a resolved module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageId {
    /// e.g. `@types/node`
    pub name: String,
    /// File inside the package, e.g. `fs.d.ts`.
    pub sub_module_name: String,
}

// ------------------------------- Traits ---------------------------------- //

/// Resolves module specifiers the way the checker's compiler options would.
pub trait ModuleResolver {
    /// `specifier` is a file path with its source extension stripped. `None`
    /// when the module does not belong to a package.
    fn resolve_module_name(&self, specifier: &str) -> Option<PackageId>;
}

/// Read-only view of the checker's type graph.
pub trait TypeHost: ModuleResolver {
    /// Stable identity of a host type; cache key of a conversion session.
    type Type: Copy + Eq + Hash + Debug;
    type Symbol: Copy + Eq + Hash + Debug;
    type Signature: Copy + Debug;

    fn type_flags(&self, ty: Self::Type) -> TypeFlags;
    fn object_flags(&self, ty: Self::Type) -> ObjectFlags;
    /// Checker's own rendering of the type, for diagnostics.
    fn type_to_string(&self, ty: Self::Type) -> String;

    fn literal_value(&self, ty: Self::Type) -> Option<HostLiteral>;
    /// Escaped name of a unique symbol type (leading `__` doubled to `___`).
    fn unique_symbol_name(&self, ty: Self::Type) -> Option<String>;
    /// Members of a union or intersection.
    fn constituents(&self, ty: Self::Type) -> Vec<Self::Type>;

    fn symbol(&self, ty: Self::Type) -> Option<Self::Symbol>;
    /// Symbol of the type alias this type was written through, if any.
    fn alias_symbol(&self, ty: Self::Type) -> Option<Self::Symbol>;
    fn alias_type_arguments(&self, ty: Self::Type) -> Vec<Self::Type>;
    /// Generic target of a type reference (`Array<T>` for `Array<number>`).
    fn reference_target(&self, ty: Self::Type) -> Option<Self::Type>;
    /// Resolved type arguments of a type reference; empty otherwise.
    fn type_arguments(&self, ty: Self::Type) -> Vec<Self::Type>;
    fn type_node_kind(&self, ty: Self::Type) -> TypeNodeKind;

    fn properties(&self, ty: Self::Type) -> Vec<Self::Symbol>;
    fn call_signatures(&self, ty: Self::Type) -> Vec<Self::Signature>;
    fn signature_parameters(&self, sig: Self::Signature) -> Vec<Self::Symbol>;
    fn signature_return_type(&self, sig: Self::Signature) -> Self::Type;

    /// Declared type of a property or parameter symbol.
    fn type_of_symbol(&self, symbol: Self::Symbol) -> Option<Self::Type>;
    fn symbol_flags(&self, symbol: Self::Symbol) -> SymbolFlags;
    fn symbol_name(&self, symbol: Self::Symbol) -> String;
    /// Qualified display form, e.g. `ns.Foo`.
    fn symbol_to_string(&self, symbol: Self::Symbol) -> String;
    /// File of the symbol's first declaration.
    fn declaration_file(&self, symbol: Self::Symbol) -> Option<PathBuf>;
}
