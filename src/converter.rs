//! Host type graph → type model.
//!
//! A [`Converter`] is one analysis session over one host. It memoises every
//! converted handle, so repeated conversions of the same host type return
//! equal values, and it tracks the handles currently being converted so
//! circular types terminate (the inner reference becomes `Untranslated`).
use std::path::PathBuf;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};

use crate::adt::{ObjectType, Parameter, Property, Signature, Type};
use crate::collapse::collapse_signatures;
use crate::host::{HostLiteral, ObjectFlags, SymbolFlags, TypeFlags, TypeHost, TypeNodeKind};
use crate::names::NameResolver;

/// Session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterOptions {
    /// Root of the project's own sources. Local file names in fully-qualified
    /// names are made relative to it; absolute when unset.
    pub source_root: Option<PathBuf>,
    /// Call signature lists shorter than this are de-duplicated.
    pub collapse_limit: usize,
    /// Nesting depth past which types are left untranslated.
    pub max_depth: usize,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        ConverterOptions { source_root: None, collapse_limit: 10, max_depth: 512 }
    }
}

pub struct Converter<'h, H: TypeHost + ?Sized> {
    host: &'h H,
    names: NameResolver<'h, H>,
    collapse_limit: usize,
    max_depth: usize,
    cache: FxHashMap<H::Type, Type>,
    /// Handles on the current conversion path.
    converting: FxHashSet<H::Type>,
    depth: usize,
    /// Set when the depth limit cut the subtree of the current frame. Such
    /// results depend on where the conversion started and are not cached.
    truncated: bool,
}

impl<'h, H: TypeHost + ?Sized> Converter<'h, H> {
    pub fn new(host: &'h H, options: ConverterOptions) -> Self {
        Converter {
            host,
            names: NameResolver::new(host, options.source_root),
            collapse_limit: options.collapse_limit,
            max_depth: options.max_depth,
            cache: FxHashMap::default(),
            converting: FxHashSet::default(),
            depth: 0,
            truncated: false,
        }
    }

    pub fn host(&self) -> &'h H {
        self.host
    }

    /// Number of host types converted so far.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn convert(&mut self, ty: H::Type) -> Type {
        if self.converting.contains(&ty) {
            trace!(?ty, "circular reference left untranslated");
            return self.untranslated(ty);
        }
        if let Some(cached) = self.cache.get(&ty) {
            trace!(?ty, "cache hit");
            return cached.clone();
        }
        if self.depth >= self.max_depth {
            debug!(?ty, depth = self.depth, "nesting limit reached");
            self.truncated = true;
            return self.untranslated(ty);
        }

        let outer_truncated = std::mem::replace(&mut self.truncated, false);
        self.converting.insert(ty);
        self.depth += 1;
        let converted = self.convert_uncached(ty);
        self.depth -= 1;
        self.converting.remove(&ty);

        let truncated = self.truncated;
        self.truncated = outer_truncated || truncated;
        if truncated {
            trace!(?ty, "not caching a result cut by the nesting limit");
        } else {
            self.cache.insert(ty, converted.clone());
        }
        converted
    }

    /// The checker's rendering of `ty`, without attempting a translation.
    pub fn untranslated(&self, ty: H::Type) -> Type {
        Type::untranslated(self.host.type_to_string(ty))
    }

    /// Structural expansion of an object type: its properties and call
    /// signatures. Useful to look inside a type that `convert` reports as
    /// `Nominative`.
    pub fn type_definition(&mut self, ty: H::Type) -> ObjectType {
        let mut properties = Vec::new();
        for prop in self.host.properties(ty) {
            let optional = self.host.symbol_flags(prop).contains(SymbolFlags::OPTIONAL);
            let name = self.host.symbol_name(prop);
            let ty = self.convert_symbol_type(prop);
            properties.push(Property { name, optional, ty });
        }

        let mut call_signatures = Vec::new();
        for sig in self.host.call_signatures(ty) {
            call_signatures.push(self.convert_signature(sig));
        }
        if call_signatures.len() < self.collapse_limit {
            call_signatures = collapse_signatures(call_signatures);
        }

        ObjectType::new(properties, call_signatures)
    }

    fn convert_uncached(&mut self, ty: H::Type) -> Type {
        let flags = self.host.type_flags(ty);

        if flags.contains(TypeFlags::STRING) {
            Type::STRING
        } else if flags.contains(TypeFlags::NUMBER) {
            Type::NUMBER
        } else if flags.intersects(TypeFlags::BOOLEAN | TypeFlags::BOOLEAN_LITERAL) {
            Type::BOOLEAN
        } else if flags.contains(TypeFlags::ES_SYMBOL) {
            Type::SYMBOL
        } else if flags.contains(TypeFlags::UNIQUE_ES_SYMBOL) {
            match self.host.unique_symbol_name(ty) {
                Some(escaped) => Type::unique_symbol(unescape_leading_underscores(&escaped)),
                None => self.untranslated(ty),
            }
        } else if flags.contains(TypeFlags::NULL) {
            Type::NULL
        } else if flags.contains(TypeFlags::UNDEFINED) {
            Type::UNDEFINED
        } else if flags.contains(TypeFlags::VOID) {
            Type::VOID
        } else if flags.contains(TypeFlags::NEVER) {
            Type::NEVER
        } else if flags.contains(TypeFlags::ANY) {
            Type::ANY
        } else if flags.contains(TypeFlags::NON_PRIMITIVE) {
            Type::NON_PRIMITIVE
        } else if let Some(literal) = self.literal(ty, flags) {
            literal
        } else if flags.contains(TypeFlags::UNION) {
            Type::Union(self.convert_all(self.host.constituents(ty)))
        } else if flags.contains(TypeFlags::INTERSECTION) {
            Type::Intersection(self.convert_all(self.host.constituents(ty)))
        } else if flags.contains(TypeFlags::OBJECT) {
            self.convert_object(ty)
        } else if flags.contains(TypeFlags::TYPE_PARAMETER) {
            match self.host.symbol(ty) {
                Some(symbol) => Type::type_parameter(self.host.symbol_name(symbol)),
                None => self.untranslated(ty),
            }
        } else {
            self.untranslated(ty)
        }
    }

    fn literal(&self, ty: H::Type, flags: TypeFlags) -> Option<Type> {
        if !flags.intersects(TypeFlags::STRING_LITERAL | TypeFlags::NUMBER_LITERAL) {
            return None;
        }
        match self.host.literal_value(ty)? {
            HostLiteral::String(s) => Some(Type::literal(s)),
            HostLiteral::Number(n) => Some(Type::literal(n)),
        }
    }

    fn convert_all(&mut self, types: Vec<H::Type>) -> Vec<Type> {
        types.into_iter().map(|ty| self.convert(ty)).collect()
    }

    fn convert_object(&mut self, ty: H::Type) -> Type {
        if let Some(nominative) = self.as_nominative(ty) {
            return nominative;
        }
        if let Some(type_of) = self.as_typeof(ty) {
            return type_of;
        }
        if self.is_tuple(ty) {
            return Type::Tuple(self.convert_all(self.host.type_arguments(ty)));
        }
        Type::Object(self.type_definition(ty))
    }

    /// Named reference to `ty`, if it has a name worth using.
    fn as_nominative(&mut self, ty: H::Type) -> Option<Type> {
        if let Some(alias) = self.host.alias_symbol(ty) {
            let name = self.host.symbol_name(alias);
            let arguments = self.host.alias_type_arguments(ty);
            return Some(self.nominative(alias, name, arguments));
        }

        let symbol = self.host.symbol(ty)?;
        let symbol_flags = self.host.symbol_flags(symbol);
        if symbol_flags.intersects(SymbolFlags::OBJECT_LITERAL | SymbolFlags::TYPE_LITERAL) {
            return None;
        }
        let named = self.host.object_flags(ty)
            .intersects(ObjectFlags::CLASS | ObjectFlags::INTERFACE | ObjectFlags::REFERENCE)
            || symbol_flags.contains(SymbolFlags::VALUE_MODULE)
            || self.host.type_node_kind(ty) == TypeNodeKind::TypeReference;
        if !named {
            return None;
        }

        let name = self.host.symbol_name(symbol);
        if name.starts_with("__") {
            // internal symbol names like `__object` or `__type`
            warn!(ty = %self.host.type_to_string(ty), name = %name, "unexpectedly non-nominative type");
            return None;
        }
        let arguments = self.host.type_arguments(ty);
        Some(self.nominative(symbol, name, arguments))
    }

    fn nominative(&mut self, symbol: H::Symbol, name: String, arguments: Vec<H::Type>) -> Type {
        let file = self.host.declaration_file(symbol);
        let fully_qualified_name = self.names.fully_qualified_name(file.as_deref(), &name);
        let type_arguments = self.convert_all(arguments);
        Type::nominative(name, fully_qualified_name, type_arguments)
    }

    fn as_typeof(&self, ty: H::Type) -> Option<Type> {
        let symbol = self.host.symbol(ty)?;
        if self.host.symbol_flags(symbol).contains(SymbolFlags::CLASS) {
            // constructor of a class
            return Some(Type::type_of(self.host.symbol_name(symbol)));
        }
        if self.host.type_node_kind(ty) == TypeNodeKind::TypeQuery {
            return Some(Type::type_of(self.host.symbol_to_string(symbol)));
        }
        None
    }

    fn is_tuple(&self, ty: H::Type) -> bool {
        self.host.reference_target(ty)
            .is_some_and(|target| self.host.object_flags(target).contains(ObjectFlags::TUPLE))
    }

    /// Parameter names survive but optionality does not: an optional
    /// parameter's type does not say it may be omitted.
    fn convert_signature(&mut self, sig: H::Signature) -> Signature {
        let mut parameters = Vec::new();
        for param in self.host.signature_parameters(sig) {
            let name = self.host.symbol_name(param);
            let ty = self.convert_symbol_type(param);
            parameters.push(Parameter { name, ty });
        }
        let return_type = self.convert(self.host.signature_return_type(sig));
        Signature { parameters, return_type }
    }

    fn convert_symbol_type(&mut self, symbol: H::Symbol) -> Type {
        match self.host.type_of_symbol(symbol) {
            Some(ty) => self.convert(ty),
            None => Type::untranslated(self.host.symbol_to_string(symbol)),
        }
    }
}

/// Undoes the checker's escaping of identifiers that start with `__`
/// (stored with an extra leading underscore).
fn unescape_leading_underscores(escaped: &str) -> &str {
    if escaped.starts_with("___") { &escaped[1..] } else { escaped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{HostType, TypeGraph};

    #[test]
    fn unescapes_only_triple_underscores() {
        assert_eq!(unescape_leading_underscores("___foo"), "__foo");
        assert_eq!(unescape_leading_underscores("__foo"), "__foo");
        assert_eq!(unescape_leading_underscores("foo"), "foo");
    }

    #[test]
    fn primitive_flags_map_to_primitives() {
        let mut g = TypeGraph::new();
        let cases = [
            (TypeFlags::STRING, Type::STRING),
            (TypeFlags::NUMBER, Type::NUMBER),
            (TypeFlags::BOOLEAN, Type::BOOLEAN),
            (TypeFlags::BOOLEAN_LITERAL, Type::BOOLEAN),
            (TypeFlags::ES_SYMBOL, Type::SYMBOL),
            (TypeFlags::NULL, Type::NULL),
            (TypeFlags::UNDEFINED, Type::UNDEFINED),
            (TypeFlags::VOID, Type::VOID),
            (TypeFlags::NEVER, Type::NEVER),
            (TypeFlags::ANY, Type::ANY),
            (TypeFlags::NON_PRIMITIVE, Type::NON_PRIMITIVE),
        ];
        let ids: Vec<_> = cases.iter().map(|(flags, _)| g.intrinsic(*flags, "")).collect();
        let mut conv = Converter::new(&g, ConverterOptions::default());
        for (id, (_, expected)) in ids.into_iter().zip(cases) {
            assert_eq!(conv.convert(id), expected);
        }
    }

    #[test]
    fn unique_symbols_keep_their_description() {
        let mut g = TypeGraph::new();
        let id = g.add_type(HostType {
            flags: TypeFlags::UNIQUE_ES_SYMBOL,
            unique_symbol_name: Some("___hidden".into()),
            ..Default::default()
        });
        let mut conv = Converter::new(&g, ConverterOptions::default());
        assert_eq!(conv.convert(id), Type::unique_symbol("__hidden"));
    }

    #[test]
    fn literal_without_value_is_untranslated() {
        let mut g = TypeGraph::new();
        let id = g.intrinsic(TypeFlags::STRING_LITERAL, "\"?\"");
        let mut conv = Converter::new(&g, ConverterOptions::default());
        assert_eq!(conv.convert(id), Type::untranslated("\"?\""));
    }

    #[test]
    fn unknown_flags_are_untranslated() {
        let mut g = TypeGraph::new();
        let id = g.intrinsic(TypeFlags::INDEXED_ACCESS, "T[K]");
        let mut conv = Converter::new(&g, ConverterOptions::default());
        assert_eq!(conv.convert(id), Type::untranslated("T[K]"));
    }

    #[test]
    fn cache_is_filled_once_per_handle() {
        let mut g = TypeGraph::new();
        let s = g.intrinsic(TypeFlags::STRING, "string");
        let u = g.add_type(HostType {
            flags: TypeFlags::UNION,
            types: vec![s, s],
            ..Default::default()
        });
        let mut conv = Converter::new(&g, ConverterOptions::default());
        let first = conv.convert(u);
        assert_eq!(conv.cache_len(), 2);
        assert_eq!(conv.convert(u), first);
        assert_eq!(conv.cache_len(), 2);
    }

    #[test]
    fn options_default_to_documented_values() {
        let options = ConverterOptions::default();
        assert_eq!(options.collapse_limit, 10);
        assert_eq!(options.max_depth, 512);
        assert_eq!(options.source_root, None);
    }
}
