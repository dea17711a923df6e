//! Arena holding every symbol of one compilation.

use serde::{Deserialize, Serialize};

use crate::display::{self, DisplayFormat};
use crate::symbol::{Symbol, SymbolKind};

/// Index of a symbol within its [`SymbolGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Error loading a symbol graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("malformed symbol graph JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("symbol {symbol} refers to missing container {container}")]
    DanglingContainer { symbol: SymbolId, container: SymbolId },

    #[error("symbol {symbol} refers to missing associated symbol {associated}")]
    DanglingAssociation {
        symbol: SymbolId,
        associated: SymbolId,
    },
}

/// Symbols of one compilation, addressed by [`SymbolId`].
///
/// Containers are back-references by id, so the graph owns every symbol and
/// walking up a containment chain never borrows more than the graph itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolGraph {
    symbols: Vec<Symbol>,
}

impl SymbolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON form (`{"symbols": [...]}`) and check references.
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        let graph: SymbolGraph = serde_json::from_str(json)?;
        graph.validate()?;
        Ok(graph)
    }

    /// Check that every container and associated symbol id exists.
    pub fn validate(&self) -> Result<(), GraphError> {
        for (id, symbol) in self.iter() {
            if let Some(container) = symbol.container
                && self.get(container).is_none()
            {
                return Err(GraphError::DanglingContainer {
                    symbol: id,
                    container,
                });
            }
            if let SymbolKind::Method {
                associated: Some(associated),
                ..
            } = symbol.kind
                && self.get(associated).is_none()
            {
                return Err(GraphError::DanglingAssociation {
                    symbol: id,
                    associated,
                });
            }
        }
        Ok(())
    }

    /// Add a symbol and return its id.
    pub fn add(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn ids(&self) -> impl DoubleEndedIterator<Item = SymbolId> + '_ {
        (0..self.symbols.len() as u32).map(SymbolId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// The container of `id` if it is a named type (namespaces don't count).
    pub fn containing_type(&self, id: SymbolId) -> Option<SymbolId> {
        let container = self.get(id)?.container?;
        self.get(container)
            .filter(|c| c.is_named_type())
            .map(|_| container)
    }

    /// Render `id` under `format`. Unknown ids render as an empty string.
    pub fn render(&self, id: SymbolId, format: &DisplayFormat) -> String {
        display::render(self, id, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    #[test]
    fn test_containing_type_skips_namespaces() {
        let mut graph = SymbolGraph::new();
        let ns = graph.add(Symbol::namespace("N"));
        let outer = graph.add(Symbol::class("Outer").public().in_container(ns));
        let inner = graph.add(Symbol::class("Inner").public().in_container(outer));

        assert_eq!(graph.containing_type(outer), None);
        assert_eq!(graph.containing_type(inner), Some(outer));
        assert_eq!(graph.containing_type(SymbolId(99)), None);
    }

    #[test]
    fn test_from_json_rejects_dangling_container() {
        let json = r#"{"symbols": [{"name": "C", "kind": "named_type", "container": 7}]}"#;
        let err = SymbolGraph::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            GraphError::DanglingContainer {
                container: SymbolId(7),
                ..
            }
        ));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{"symbols": [
            {"name": "N", "kind": "namespace"},
            {"name": "C", "kind": "named_type", "accessibility": "public", "container": 0}
        ]}"#;
        let graph = SymbolGraph::from_json(json).unwrap();
        assert_eq!(graph.len(), 2);
        assert!(graph.get(SymbolId(1)).unwrap().is_named_type());
    }
}
