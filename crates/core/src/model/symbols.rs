use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Maps trace method ids to fully-qualified method names.
///
/// The instrumented program writes it as a flat JSON object:
/// `{ "0": "game.gol.main", "1": "game.gol.GameOfLife.step" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTable {
    names: HashMap<String, String>,
}

impl SymbolTable {
    pub fn from_json(data: &[u8]) -> Result<Self, SymbolError> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Name for `method_id`. Unknown ids get a placeholder that embeds the id,
    /// so every node stays labelled.
    pub fn resolve(&self, method_id: &str) -> Cow<'_, str> {
        match self.names.get(method_id) {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!(
                "method name not found in symbols file for method {method_id}"
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Symbols file written next to a trace: `trace` in the file name is
    /// replaced by `symbols` (`trace_jvm_1.txt` -> `symbols_jvm_1.txt`).
    pub fn default_path_for(trace_path: &Path) -> PathBuf {
        let file_name = trace_path
            .file_name()
            .map(|n| n.to_string_lossy().replace("trace", "symbols"))
            .unwrap_or_default();
        trace_path.with_file_name(file_name)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            names: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
