//! Fully-qualified names for named types.
//!
//! A name is `(builtin | package + file | project file) + symbol name`. The
//! origin of a declaration file is decided once per session and memoised, so
//! a symbol always resolves to the same name.
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::adt::FullyQualifiedName;
use crate::host::ModuleResolver;

/// Checked longest-first, so `.d.ts` wins over `.ts`.
const SOURCE_EXTENSIONS: [&str; 5] = [".d.ts", ".ts", ".js", ".jsx", ".tsx"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Origin {
    Builtin,
    Package { name: String, file: String },
    Project { file: String },
}

pub struct NameResolver<'r, R: ModuleResolver + ?Sized> {
    resolver: &'r R,
    source_root: Option<PathBuf>,
    origins: FxHashMap<PathBuf, Origin>,
}

impl<'r, R: ModuleResolver + ?Sized> NameResolver<'r, R> {
    /// Project files are reported relative to `source_root`, or as given when
    /// there is no root.
    pub fn new(resolver: &'r R, source_root: Option<PathBuf>) -> Self {
        NameResolver { resolver, source_root, origins: FxHashMap::default() }
    }

    /// `declaration_file` is `None` for symbols without a declaration; those
    /// get a bare name.
    pub fn fully_qualified_name(&mut self, declaration_file: Option<&Path>, name: &str) -> FullyQualifiedName {
        let Some(file) = declaration_file else {
            return FullyQualifiedName { name: name.to_string(), ..Default::default() };
        };
        let origin = match self.origins.get(file) {
            Some(origin) => origin.clone(),
            None => {
                let origin = self.classify(file);
                self.origins.insert(file.to_path_buf(), origin.clone());
                origin
            }
        };
        match origin {
            Origin::Builtin => FullyQualifiedName::builtin(name),
            Origin::Package { name: package, file } => FullyQualifiedName::in_package(package, file, name),
            Origin::Project { file } => FullyQualifiedName::local(file, name),
        }
    }

    fn classify(&self, file: &Path) -> Origin {
        if is_builtin_definition(file) {
            return Origin::Builtin;
        }
        let specifier = strip_extension(&file.to_string_lossy()).to_string();
        match self.resolver.resolve_module_name(&specifier) {
            Some(package) => {
                debug!(file = %file.display(), package = %package.name, "declaration resolved to package");
                Origin::Package { name: package.name, file: package.sub_module_name }
            }
            // inside the project, or something module resolution can't see
            None => Origin::Project { file: self.relative_to_source_root(file) },
        }
    }

    fn relative_to_source_root(&self, file: &Path) -> String {
        match &self.source_root {
            Some(root) => match file.strip_prefix(root) {
                Ok(relative) => relative.to_string_lossy().into_owned(),
                Err(_) => file.to_string_lossy().into_owned(),
            },
            None => file.to_string_lossy().into_owned(),
        }
    }
}

/// Removes the first matching source/definition extension.
pub fn strip_extension(file_name: &str) -> &str {
    SOURCE_EXTENSIONS.iter()
        .find_map(|ext| file_name.strip_suffix(ext))
        .unwrap_or(file_name)
}

/// True for the checker's own library definitions (`.../typescript/lib/*.d.ts`).
pub fn is_builtin_definition(file: &Path) -> bool {
    let Some(dir) = file.parent() else { return false };
    let Some(parent) = dir.parent() else { return false };
    dir.file_name().is_some_and(|d| d == "lib")
        && parent.file_name().is_some_and(|p| p == "typescript")
}
