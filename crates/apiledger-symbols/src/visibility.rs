//! Which symbols count as public API.
//!
//! A symbol is API if it is public all the way up its chain of containing
//! types, or if it is protected inside a type that is itself API. Protected
//! members are reachable from outside through inheritance; anything below a
//! public link must stay public for the chain to remain visible.

use crate::graph::{SymbolGraph, SymbolId};
use crate::symbol::Accessibility;

/// Upper bound on containing-type chains. Real code nests a handful of levels.
pub const MAX_CONTAINMENT_DEPTH: usize = 256;

/// Result of classifying a symbol's reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVisibility {
    /// Public, inside fully public types
    Public,
    /// Protected somewhere along an otherwise public chain
    PublicProtected,
    NotPublic,
}

impl ApiVisibility {
    pub fn is_api(&self) -> bool {
        !matches!(self, ApiVisibility::NotPublic)
    }
}

/// True if `id` is part of the public API surface.
pub fn is_public_api(graph: &SymbolGraph, id: SymbolId) -> bool {
    classify(graph, id).is_api()
}

/// Classify `id` by climbing its containing types.
///
/// Once a public link has been crossed, every container above it must also be
/// public. A protected symbol with no containing type is never API.
pub fn classify(graph: &SymbolGraph, id: SymbolId) -> ApiVisibility {
    let mut current = id;
    let mut allow_protected = true;
    let mut saw_protected = false;

    for _ in 0..MAX_CONTAINMENT_DEPTH {
        let Some(symbol) = graph.get(current) else {
            tracing::warn!(symbol = %id, missing = %current, "dangling symbol in containment chain");
            return ApiVisibility::NotPublic;
        };
        let parent = graph.containing_type(current);

        match symbol.accessibility {
            Accessibility::Public => {
                allow_protected = false;
                match parent {
                    Some(parent) => current = parent,
                    None if saw_protected => return ApiVisibility::PublicProtected,
                    None => return ApiVisibility::Public,
                }
            }
            Accessibility::Protected | Accessibility::ProtectedOrInternal if allow_protected => {
                saw_protected = true;
                match parent {
                    Some(parent) => current = parent,
                    None => return ApiVisibility::NotPublic,
                }
            }
            _ => return ApiVisibility::NotPublic,
        }
    }

    tracing::warn!(
        symbol = %id,
        limit = MAX_CONTAINMENT_DEPTH,
        "containment chain too deep, treating symbol as not public"
    );
    ApiVisibility::NotPublic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    #[test]
    fn test_top_level_public() {
        let mut graph = SymbolGraph::new();
        let ns = graph.add(Symbol::namespace("N"));
        let c = graph.add(Symbol::class("C").public().in_container(ns));
        let bare = graph.add(Symbol::class("D").public());
        assert_eq!(classify(&graph, c), ApiVisibility::Public);
        assert!(is_public_api(&graph, bare));
    }

    #[test]
    fn test_private_never_public() {
        let mut graph = SymbolGraph::new();
        let c = graph.add(Symbol::class("C").public());
        let top = graph.add(Symbol::class("Hidden").private());
        let member = graph.add(Symbol::field("f", crate::SpecialType::Int).private().in_container(c));
        assert!(!is_public_api(&graph, top));
        assert!(!is_public_api(&graph, member));
    }

    #[test]
    fn test_top_level_protected_not_public() {
        let mut graph = SymbolGraph::new();
        let c = graph.add(Symbol::class("C").protected());
        assert!(!is_public_api(&graph, c));
    }

    #[test]
    fn test_protected_member_of_public_type() {
        let mut graph = SymbolGraph::new();
        let c = graph.add(Symbol::class("C").public());
        let m = graph.add(Symbol::method("M", crate::TypeRef::void()).protected().in_container(c));
        let pi = graph.add(
            Symbol::method("N", crate::TypeRef::void())
                .with_accessibility(Accessibility::ProtectedOrInternal)
                .in_container(c),
        );
        let pai = graph.add(
            Symbol::method("O", crate::TypeRef::void())
                .with_accessibility(Accessibility::ProtectedAndInternal)
                .in_container(c),
        );
        assert_eq!(classify(&graph, m), ApiVisibility::PublicProtected);
        assert_eq!(classify(&graph, pi), ApiVisibility::PublicProtected);
        assert_eq!(classify(&graph, pai), ApiVisibility::NotPublic);
    }

    #[test]
    fn test_public_member_of_protected_nested_type() {
        // A public member can't be reached through a protected type.
        let mut graph = SymbolGraph::new();
        let outer = graph.add(Symbol::class("Outer").public());
        let nested = graph.add(Symbol::class("Nested").protected().in_container(outer));
        let member = graph.add(Symbol::method("M", crate::TypeRef::void()).public().in_container(nested));
        let protected_member =
            graph.add(Symbol::method("P", crate::TypeRef::void()).protected().in_container(nested));

        assert_eq!(classify(&graph, nested), ApiVisibility::PublicProtected);
        assert!(!is_public_api(&graph, member));
        assert_eq!(classify(&graph, protected_member), ApiVisibility::PublicProtected);
    }

    #[test]
    fn test_internal_container_hides_members() {
        let mut graph = SymbolGraph::new();
        let c = graph.add(Symbol::class("C").with_accessibility(Accessibility::Internal));
        let m = graph.add(Symbol::method("M", crate::TypeRef::void()).public().in_container(c));
        assert!(!is_public_api(&graph, m));
    }

    #[test]
    fn test_cyclic_containment_terminates() {
        let mut graph = SymbolGraph::new();
        let a = graph.add(Symbol::class("A").public());
        let b = graph.add(Symbol::class("B").public().in_container(a));
        // Close the cycle: A is contained by B.
        let mut cyclic = graph.symbols().to_vec();
        cyclic[a.index()].container = Some(b);
        let mut graph = SymbolGraph::new();
        for symbol in cyclic {
            graph.add(symbol);
        }
        assert_eq!(classify(&graph, a), ApiVisibility::NotPublic);
    }

    #[test]
    fn test_unknown_id() {
        let graph = SymbolGraph::new();
        assert!(!is_public_api(&graph, SymbolId(0)));
    }
}
