//! Golden fixture files: a host type graph plus the expected conversion of
//! some of its locations.
//!
//! ```json
//! {
//!   "sourceRoot": "/proj/src",
//!   "graph": { "types": [...], "symbols": [...], "locations": [...] },
//!   "expect": [ { "text": "user", "rendered": "User", "json": { "kind": "nominative", ... } } ]
//! }
//! ```
//!
//! `json` is optional; `rendered` is compared against the `Display` form.
//! Shared by the `dev-test-runner` binary and the crate's own tests.
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::converter::{Converter, ConverterOptions};
use crate::error::GraphError;
use crate::graph::TypeGraph;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    #[serde(default)]
    pub source_root: Option<PathBuf>,
    pub graph: TypeGraph,
    pub expect: Vec<Expectation>,
}

#[derive(Debug, Deserialize)]
pub struct Expectation {
    /// Text of the location to convert.
    pub text: String,
    pub rendered: String,
    #[serde(default)]
    pub json: Option<Value>,
}

/// Result of one expectation; passed when `problems` is empty.
#[derive(Debug)]
pub struct Outcome<'f> {
    pub expectation: &'f Expectation,
    pub problems: Vec<String>,
}

impl Outcome<'_> {
    pub fn passed(&self) -> bool {
        self.problems.is_empty()
    }
}

impl Fixture {
    pub fn from_json_str(src: &str) -> Result<Self, GraphError> {
        let de = &mut serde_json::Deserializer::from_str(src);
        let fixture: Fixture = serde_path_to_error::deserialize(de).map_err(|err| {
            let path = err.path().to_string();
            GraphError::Parse { path, message: err.into_inner().to_string() }
        })?;
        fixture.graph.validate()?;
        Ok(fixture)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let src = fs::read_to_string(path)
            .map_err(|source| GraphError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&src)
    }

    pub fn converter_options(&self) -> ConverterOptions {
        ConverterOptions {
            source_root: self.source_root.clone(),
            ..ConverterOptions::default()
        }
    }

    /// Converts each expected location in one session and compares.
    pub fn check(&self) -> Vec<Outcome<'_>> {
        let mut converter = Converter::new(&self.graph, self.converter_options());
        let mut outcomes = Vec::new();
        for expectation in &self.expect {
            let mut problems = Vec::new();
            let location = self.graph.locations.iter().find(|l| l.text == expectation.text);
            let Some(location) = location else {
                problems.push("no location with this text".to_string());
                outcomes.push(Outcome { expectation, problems });
                continue;
            };

            let ty = converter.convert(location.ty);
            let rendered = ty.to_string();
            if rendered != expectation.rendered {
                problems.push(format!("rendered {rendered:?}, expected {:?}", expectation.rendered));
            }
            let encoded = crate::json::encode(&ty);
            if let Some(expected_json) = &expectation.json {
                if &encoded != expected_json {
                    problems.push(format!("encoded {encoded}, expected {expected_json}"));
                }
            }
            match crate::json::decode(encoded) {
                Ok(decoded) if decoded == ty => {}
                Ok(decoded) => problems.push(format!("decoded back as {decoded}")),
                Err(error) => problems.push(format!("encoding does not decode: {error}")),
            }
            outcomes.push(Outcome { expectation, problems });
        }
        outcomes
    }
}
