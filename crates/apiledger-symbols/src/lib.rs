//! Symbol graph vocabulary for apiledger.
//!
//! A host (compiler front end, metadata reader, or a JSON dump of either)
//! produces a [`SymbolGraph`]. This crate knows how to:
//! - render each symbol to a stable signature name and a short display name
//!   ([`display`]);
//! - decide whether a symbol belongs to the public API surface ([`visibility`]).

pub mod display;
mod graph;
mod location;
mod symbol;
mod types;
pub mod visibility;

pub use display::{CanonicalNames, DisplayFormat};
pub use graph::{GraphError, SymbolGraph, SymbolId};
pub use location::{LinePosition, LinePositionSpan, Location, TextSpan};
pub use symbol::{
    Accessibility, MethodKind, Modifiers, Parameter, RefKind, Symbol, SymbolKind, TypeKind,
};
pub use types::{ConstantValue, SpecialType, TypeRef};
pub use visibility::{ApiVisibility, classify, is_public_api};
