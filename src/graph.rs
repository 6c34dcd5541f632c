//! In-memory host type graph.
//!
//! An arena snapshot of a checker's type graph: types, symbols and
//! signatures live in flat vectors and refer to each other by index. It
//! implements [`TypeHost`], so it can drive a [`Converter`](crate::Converter)
//! without a live checker. Graphs are built in code (tests) or loaded from a
//! JSON document (CLI, fixtures).
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::host::{
    HostLiteral, ModuleResolver, ObjectFlags, PackageId, SymbolFlags, TypeFlags, TypeHost,
    TypeNodeKind,
};

// ------------------------------- Handles --------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureId(pub u32);

// -------------------------------- Nodes ---------------------------------- //

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostType {
    pub flags: TypeFlags,
    pub object_flags: ObjectFlags,
    /// What the checker prints for this type.
    pub display: String,
    pub value: Option<HostLiteral>,
    pub unique_symbol_name: Option<String>,
    /// Union / intersection members.
    pub types: Vec<TypeId>,
    pub symbol: Option<SymbolId>,
    pub alias_symbol: Option<SymbolId>,
    pub alias_type_arguments: Vec<TypeId>,
    /// Generic target of a reference.
    pub target: Option<TypeId>,
    pub type_arguments: Vec<TypeId>,
    pub node_kind: TypeNodeKind,
    pub properties: Vec<SymbolId>,
    pub call_signatures: Vec<SignatureId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostSymbol {
    pub name: String,
    /// `ns.Foo`; falls back to `name`.
    pub qualified_name: Option<String>,
    pub flags: SymbolFlags,
    #[serde(rename = "type")]
    pub ty: Option<TypeId>,
    /// File of the first declaration.
    pub declaration: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSignature {
    #[serde(default)]
    pub parameters: Vec<SymbolId>,
    pub return_type: TypeId,
}

/// A source node whose type a debug walk reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub text: String,
    pub position: u32,
    #[serde(rename = "type")]
    pub ty: TypeId,
}

static MISSING_TYPE: HostType = HostType {
    flags: TypeFlags::empty(),
    object_flags: ObjectFlags::empty(),
    display: String::new(),
    value: None,
    unique_symbol_name: None,
    types: Vec::new(),
    symbol: None,
    alias_symbol: None,
    alias_type_arguments: Vec::new(),
    target: None,
    type_arguments: Vec::new(),
    node_kind: TypeNodeKind::Other,
    properties: Vec::new(),
    call_signatures: Vec::new(),
};

static MISSING_SYMBOL: HostSymbol = HostSymbol {
    name: String::new(),
    qualified_name: None,
    flags: SymbolFlags::empty(),
    ty: None,
    declaration: None,
};

static MISSING_SIGNATURE: HostSignature = HostSignature {
    parameters: Vec::new(),
    return_type: TypeId(u32::MAX),
};

// -------------------------------- Graph ---------------------------------- //

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeGraph {
    pub types: Vec<HostType>,
    pub symbols: Vec<HostSymbol>,
    pub signatures: Vec<HostSignature>,
    /// Module specifier (path without extension) → owning package.
    pub modules: IndexMap<String, PackageId>,
    pub locations: Vec<Location>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_type(&mut self, ty: HostType) -> TypeId {
        self.types.push(ty);
        TypeId((self.types.len() - 1) as u32)
    }

    /// A type described by its flags alone (`string`, `null`, ...).
    pub fn intrinsic(&mut self, flags: TypeFlags, display: impl Into<String>) -> TypeId {
        self.add_type(HostType { flags, display: display.into(), ..Default::default() })
    }

    pub fn add_symbol(&mut self, symbol: HostSymbol) -> SymbolId {
        self.symbols.push(symbol);
        SymbolId((self.symbols.len() - 1) as u32)
    }

    pub fn add_signature(&mut self, parameters: Vec<SymbolId>, return_type: TypeId) -> SignatureId {
        self.signatures.push(HostSignature { parameters, return_type });
        SignatureId((self.signatures.len() - 1) as u32)
    }

    pub fn add_module(&mut self, specifier: impl Into<String>, package: PackageId) {
        self.modules.insert(specifier.into(), package);
    }

    pub fn add_location(&mut self, text: impl Into<String>, position: u32, ty: TypeId) {
        self.locations.push(Location { text: text.into(), position, ty });
    }

    /// For wiring up cycles after both ends exist.
    ///
    /// Panics if `id` was not issued by this graph.
    pub fn type_mut(&mut self, id: TypeId) -> &mut HostType {
        &mut self.types[id.0 as usize]
    }

    pub fn from_json_str(src: &str) -> Result<Self, GraphError> {
        let de = &mut serde_json::Deserializer::from_str(src);
        let graph: TypeGraph = serde_path_to_error::deserialize(de).map_err(|err| {
            let path = err.path().to_string();
            GraphError::Parse { path, message: err.into_inner().to_string() }
        })?;
        graph.validate()?;
        Ok(graph)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let src = fs::read_to_string(path)
            .map_err(|source| GraphError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&src)
    }

    /// Every handle stored in the graph must point at an existing node.
    pub fn validate(&self) -> Result<(), GraphError> {
        let types = self.types.len();
        let symbols = self.symbols.len();
        let signatures = self.signatures.len();

        let check = |owner: &dyn Fn() -> String, what: &'static str, index: u32, len: usize| {
            if (index as usize) < len {
                Ok(())
            } else {
                Err(GraphError::Dangling { owner: owner(), what, index })
            }
        };

        for (i, ty) in self.types.iter().enumerate() {
            let owner = || format!("type #{i}");
            let type_refs = ty.types.iter()
                .chain(&ty.alias_type_arguments)
                .chain(&ty.type_arguments)
                .chain(&ty.target);
            for id in type_refs {
                check(&owner, "type", id.0, types)?;
            }
            for id in ty.properties.iter().chain(&ty.symbol).chain(&ty.alias_symbol) {
                check(&owner, "symbol", id.0, symbols)?;
            }
            for id in &ty.call_signatures {
                check(&owner, "signature", id.0, signatures)?;
            }
        }
        for (i, symbol) in self.symbols.iter().enumerate() {
            if let Some(id) = symbol.ty {
                check(&|| format!("symbol #{i}"), "type", id.0, types)?;
            }
        }
        for (i, sig) in self.signatures.iter().enumerate() {
            let owner = || format!("signature #{i}");
            check(&owner, "type", sig.return_type.0, types)?;
            for id in &sig.parameters {
                check(&owner, "symbol", id.0, symbols)?;
            }
        }
        for loc in &self.locations {
            check(&|| format!("location {:?}", loc.text), "type", loc.ty.0, types)?;
        }
        Ok(())
    }

    fn node(&self, id: TypeId) -> &HostType {
        self.types.get(id.0 as usize).unwrap_or(&MISSING_TYPE)
    }

    fn sym(&self, id: SymbolId) -> &HostSymbol {
        self.symbols.get(id.0 as usize).unwrap_or(&MISSING_SYMBOL)
    }

    fn sig(&self, id: SignatureId) -> &HostSignature {
        self.signatures.get(id.0 as usize).unwrap_or(&MISSING_SIGNATURE)
    }
}

// ----------------------------- Host impl --------------------------------- //

impl ModuleResolver for TypeGraph {
    fn resolve_module_name(&self, specifier: &str) -> Option<PackageId> {
        self.modules.get(specifier).cloned()
    }
}

impl TypeHost for TypeGraph {
    type Type = TypeId;
    type Symbol = SymbolId;
    type Signature = SignatureId;

    fn type_flags(&self, ty: TypeId) -> TypeFlags {
        self.node(ty).flags
    }

    fn object_flags(&self, ty: TypeId) -> ObjectFlags {
        self.node(ty).object_flags
    }

    fn type_to_string(&self, ty: TypeId) -> String {
        match self.types.get(ty.0 as usize) {
            Some(node) => node.display.clone(),
            None => format!("<missing type #{}>", ty.0),
        }
    }

    fn literal_value(&self, ty: TypeId) -> Option<HostLiteral> {
        self.node(ty).value.clone()
    }

    fn unique_symbol_name(&self, ty: TypeId) -> Option<String> {
        self.node(ty).unique_symbol_name.clone()
    }

    fn constituents(&self, ty: TypeId) -> Vec<TypeId> {
        self.node(ty).types.clone()
    }

    fn symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.node(ty).symbol
    }

    fn alias_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.node(ty).alias_symbol
    }

    fn alias_type_arguments(&self, ty: TypeId) -> Vec<TypeId> {
        self.node(ty).alias_type_arguments.clone()
    }

    fn reference_target(&self, ty: TypeId) -> Option<TypeId> {
        self.node(ty).target
    }

    fn type_arguments(&self, ty: TypeId) -> Vec<TypeId> {
        self.node(ty).type_arguments.clone()
    }

    fn type_node_kind(&self, ty: TypeId) -> TypeNodeKind {
        self.node(ty).node_kind
    }

    fn properties(&self, ty: TypeId) -> Vec<SymbolId> {
        self.node(ty).properties.clone()
    }

    fn call_signatures(&self, ty: TypeId) -> Vec<SignatureId> {
        self.node(ty).call_signatures.clone()
    }

    fn signature_parameters(&self, sig: SignatureId) -> Vec<SymbolId> {
        self.sig(sig).parameters.clone()
    }

    fn signature_return_type(&self, sig: SignatureId) -> TypeId {
        self.sig(sig).return_type
    }

    fn type_of_symbol(&self, symbol: SymbolId) -> Option<TypeId> {
        self.sym(symbol).ty
    }

    fn symbol_flags(&self, symbol: SymbolId) -> SymbolFlags {
        self.sym(symbol).flags
    }

    fn symbol_name(&self, symbol: SymbolId) -> String {
        self.sym(symbol).name.clone()
    }

    fn symbol_to_string(&self, symbol: SymbolId) -> String {
        let s = self.sym(symbol);
        s.qualified_name.clone().unwrap_or_else(|| s.name.clone())
    }

    fn declaration_file(&self, symbol: SymbolId) -> Option<PathBuf> {
        self.sym(symbol).declaration.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_issues_sequential_handles() {
        let mut g = TypeGraph::new();
        let s = g.intrinsic(TypeFlags::STRING, "string");
        let n = g.intrinsic(TypeFlags::NUMBER, "number");
        assert_eq!((s, n), (TypeId(0), TypeId(1)));
        assert_eq!(g.type_flags(n), TypeFlags::NUMBER);
        assert_eq!(g.type_to_string(s), "string");
        assert!(g.validate().is_ok());
    }

    #[test]
    fn loads_json_graph() {
        let src = r#"{
            "types": [
                { "flags": "STRING", "display": "string" },
                { "flags": "OBJECT", "objectFlags": "INTERFACE", "display": "Foo",
                  "symbol": 0, "properties": [1] }
            ],
            "symbols": [
                { "name": "Foo", "flags": "INTERFACE", "declaration": "/p/src/foo.ts" },
                { "name": "x", "flags": "PROPERTY | OPTIONAL", "type": 0 }
            ],
            "modules": { "/p/node_modules/pkg/index": { "name": "pkg", "subModuleName": "index.d.ts" } },
            "locations": [ { "text": "foo", "position": 12, "type": 1 } ]
        }"#;
        let g = TypeGraph::from_json_str(src).unwrap();
        let foo = TypeId(1);
        assert_eq!(g.object_flags(foo), ObjectFlags::INTERFACE);
        assert_eq!(g.properties(foo), vec![SymbolId(1)]);
        assert_eq!(g.symbol_flags(SymbolId(1)), SymbolFlags::PROPERTY | SymbolFlags::OPTIONAL);
        assert_eq!(g.symbol_to_string(SymbolId(0)), "Foo");
        assert_eq!(g.declaration_file(SymbolId(0)), Some(PathBuf::from("/p/src/foo.ts")));
        assert_eq!(g.locations[0].ty, foo);
        assert_eq!(
            g.resolve_module_name("/p/node_modules/pkg/index").map(|p| p.name),
            Some("pkg".to_string())
        );
        assert_eq!(g.resolve_module_name("/p/src/foo"), None);
    }

    #[test]
    fn rejects_dangling_handles() {
        let src = r#"{ "types": [ { "flags": "UNION", "types": [0, 7] } ] }"#;
        match TypeGraph::from_json_str(src) {
            Err(GraphError::Dangling { owner, what, index }) => {
                assert_eq!(owner, "type #0");
                assert_eq!(what, "type");
                assert_eq!(index, 7);
            }
            other => panic!("expected dangling handle, got {other:?}"),
        }
    }

    #[test]
    fn dangling_signature_return_is_reported() {
        let mut g = TypeGraph::new();
        g.add_signature(vec![], TypeId(3));
        let err = g.validate().unwrap_err();
        assert_eq!(err.to_string(), "signature #0 refers to missing type #3");
    }

    #[test]
    fn parse_errors_carry_json_path() {
        let src = r#"{ "types": [ { "flags": "STRING" }, { "flags": "NOT_A_FLAG" } ] }"#;
        match TypeGraph::from_json_str(src) {
            Err(GraphError::Parse { path, .. }) => assert!(path.starts_with("types[1]"), "{path}"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_nodes_read_as_empty() {
        let g = TypeGraph::new();
        assert_eq!(g.type_flags(TypeId(9)), TypeFlags::empty());
        assert_eq!(g.type_to_string(TypeId(9)), "<missing type #9>");
        assert_eq!(g.symbol_name(SymbolId(2)), "");
        assert!(g.signature_parameters(SignatureId(0)).is_empty());
    }

    #[test]
    fn qualified_symbol_string_wins() {
        let mut g = TypeGraph::new();
        let s = g.add_symbol(HostSymbol {
            name: "Foo".into(),
            qualified_name: Some("ns.Foo".into()),
            ..Default::default()
        });
        assert_eq!(g.symbol_name(s), "Foo");
        assert_eq!(g.symbol_to_string(s), "ns.Foo");
    }
}
