//! Portable model of static types, converted from a type checker's type graph.
//!
//! - [`adt`]: the type model itself (a closed sum type) and its queries
//! - [`converter`]: host type graph → type model, with caching and cycle
//!   breaking
//! - [`json`]: lossless JSON encoding of the model
//! - [`host`] / [`graph`]: the checker interface and an in-memory
//!   implementation of it
pub mod adt;
pub mod cli;
pub mod collapse;
pub mod converter;
pub mod error;
pub mod fixture;
pub mod graph;
pub mod host;
pub mod json;
pub mod logging;
pub mod names;

pub use adt::{
    FullyQualifiedName, LiteralValue, NominativeType, ObjectType, Parameter, PrimitiveKind,
    Property, Signature, Type, TypeKind,
};
pub use collapse::collapse_signatures;
pub use converter::{Converter, ConverterOptions};
pub use error::{DecodeError, GraphError, ModelError};
pub use fixture::{Expectation, Fixture, Outcome};
pub use graph::{HostSignature, HostSymbol, HostType, Location, SignatureId, SymbolId, TypeGraph, TypeId};
pub use host::{
    HostLiteral, ModuleResolver, ObjectFlags, PackageId, SymbolFlags, TypeFlags, TypeHost,
    TypeNodeKind,
};
pub use names::NameResolver;
