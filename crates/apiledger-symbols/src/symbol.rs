//! Declarations exposed by a symbol graph producer.

use serde::{Deserialize, Serialize};

use crate::types::{ConstantValue, TypeRef};
use crate::{Location, SymbolId};

/// Declared accessibility of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    /// Namespaces and other symbols where accessibility has no meaning
    #[default]
    NotApplicable,
    Private,
    /// `private protected`
    ProtectedAndInternal,
    Protected,
    Internal,
    /// `protected internal`
    ProtectedOrInternal,
    Public,
}

impl Accessibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Accessibility::NotApplicable => "not_applicable",
            Accessibility::Private => "private",
            Accessibility::ProtectedAndInternal => "protected_and_internal",
            Accessibility::Protected => "protected",
            Accessibility::Internal => "internal",
            Accessibility::ProtectedOrInternal => "protected_or_internal",
            Accessibility::Public => "public",
        }
    }
}

/// Flavor of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

/// Role of a method symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    #[default]
    Ordinary,
    Constructor,
    StaticConstructor,
    Destructor,
    PropertyGet,
    PropertySet,
    EventAdd,
    EventRemove,
    EventRaise,
    /// User-defined operator; the symbol name is the operator token (`+`, `==`)
    Operator,
    /// User-defined conversion; the symbol name is `implicit` or `explicit`
    Conversion,
}

impl MethodKind {
    /// Add/remove accessors belong to their event rather than being API of
    /// their own. Raise accessors are not included.
    pub fn is_event_add_or_remove(&self) -> bool {
        matches!(self, MethodKind::EventAdd | MethodKind::EventRemove)
    }
}

/// How a parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    #[default]
    None,
    Ref,
    Out,
    In,
}

impl RefKind {
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            RefKind::None => None,
            RefKind::Ref => Some("ref"),
            RefKind::Out => Some("out"),
            RefKind::In => Some("in"),
        }
    }
}

/// A method, indexer or delegate parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub ref_kind: RefKind,
    #[serde(default)]
    pub is_params: bool,
    /// Receiver of an extension method
    #[serde(default)]
    pub is_this: bool,
    #[serde(default)]
    pub default: Option<ConstantValue>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ref_kind: RefKind::None,
            is_params: false,
            is_this: false,
            default: None,
        }
    }

    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }

    pub fn params(mut self) -> Self {
        self.is_params = true;
        self
    }

    pub fn this(mut self) -> Self {
        self.is_this = true;
        self
    }

    pub fn with_default(mut self, value: ConstantValue) -> Self {
        self.default = Some(value);
        self
    }
}

/// Member modifiers relevant to the public contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    #[serde(rename = "override")]
    pub is_override: bool,
    #[serde(rename = "sealed")]
    pub is_sealed: bool,
    #[serde(rename = "readonly")]
    pub is_readonly: bool,
}

impl Modifiers {
    pub const STATIC: Modifiers = Modifiers {
        is_static: true,
        is_abstract: false,
        is_virtual: false,
        is_override: false,
        is_sealed: false,
        is_readonly: false,
    };
}

/// What a symbol declares, with the kind-specific data needed for naming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SymbolKind {
    Namespace,
    NamedType {
        #[serde(default)]
        type_kind: TypeKind,
        #[serde(default)]
        type_parameters: Vec<String>,
    },
    Field {
        ty: TypeRef,
        /// Present for `const` fields and enum members
        #[serde(default)]
        constant: Option<ConstantValue>,
    },
    Event {
        ty: TypeRef,
    },
    Property {
        ty: TypeRef,
        /// Non-empty for indexers
        #[serde(default)]
        parameters: Vec<Parameter>,
        #[serde(default)]
        has_getter: bool,
        #[serde(default)]
        has_setter: bool,
    },
    Method {
        #[serde(default)]
        method_kind: MethodKind,
        return_type: TypeRef,
        #[serde(default)]
        parameters: Vec<Parameter>,
        #[serde(default)]
        type_parameters: Vec<String>,
        /// Interface member this method implements explicitly
        #[serde(default)]
        explicit_interface: Option<TypeRef>,
        /// Property or event owning an accessor
        #[serde(default)]
        associated: Option<SymbolId>,
    },
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Namespace => "namespace",
            SymbolKind::NamedType { .. } => "named_type",
            SymbolKind::Field { .. } => "field",
            SymbolKind::Event { .. } => "event",
            SymbolKind::Property { .. } => "property",
            SymbolKind::Method { .. } => "method",
        }
    }
}

/// A declaration in the symbol graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    #[serde(flatten)]
    pub kind: SymbolKind,
    #[serde(default)]
    pub accessibility: Accessibility,
    /// Containing namespace or type
    #[serde(default)]
    pub container: Option<SymbolId>,
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Declaring locations; partial types have more than one
    #[serde(default)]
    pub locations: Vec<Location>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            accessibility: Accessibility::NotApplicable,
            container: None,
            modifiers: Modifiers::default(),
            locations: Vec::new(),
        }
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        Self::new(name, SymbolKind::Namespace)
    }

    pub fn named_type(name: impl Into<String>, type_kind: TypeKind) -> Self {
        Self::new(
            name,
            SymbolKind::NamedType {
                type_kind,
                type_parameters: Vec::new(),
            },
        )
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::named_type(name, TypeKind::Class)
    }

    pub fn field(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self::new(
            name,
            SymbolKind::Field {
                ty: ty.into(),
                constant: None,
            },
        )
    }

    pub fn constant(name: impl Into<String>, ty: impl Into<TypeRef>, value: ConstantValue) -> Self {
        Self::new(
            name,
            SymbolKind::Field {
                ty: ty.into(),
                constant: Some(value),
            },
        )
    }

    pub fn event(name: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        Self::new(name, SymbolKind::Event { ty: ty.into() })
    }

    pub fn property(name: impl Into<String>, ty: impl Into<TypeRef>, get: bool, set: bool) -> Self {
        Self::new(
            name,
            SymbolKind::Property {
                ty: ty.into(),
                parameters: Vec::new(),
                has_getter: get,
                has_setter: set,
            },
        )
    }

    pub fn method(name: impl Into<String>, return_type: impl Into<TypeRef>) -> Self {
        Self::accessor(name, MethodKind::Ordinary, return_type, None)
    }

    /// A method of any kind; `associated` links accessors to their property or event.
    pub fn accessor(
        name: impl Into<String>,
        method_kind: MethodKind,
        return_type: impl Into<TypeRef>,
        associated: Option<SymbolId>,
    ) -> Self {
        Self::new(
            name,
            SymbolKind::Method {
                method_kind,
                return_type: return_type.into(),
                parameters: Vec::new(),
                type_parameters: Vec::new(),
                explicit_interface: None,
                associated,
            },
        )
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn public(self) -> Self {
        self.with_accessibility(Accessibility::Public)
    }

    pub fn protected(self) -> Self {
        self.with_accessibility(Accessibility::Protected)
    }

    pub fn private(self) -> Self {
        self.with_accessibility(Accessibility::Private)
    }

    pub fn in_container(mut self, container: SymbolId) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn at(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    /// Append a parameter to a method or indexer. No effect on other kinds.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        match &mut self.kind {
            SymbolKind::Method { parameters, .. } | SymbolKind::Property { parameters, .. } => {
                parameters.push(parameter)
            }
            _ => {}
        }
        self
    }

    /// Append a generic type parameter to a type or method. No effect on other kinds.
    pub fn with_type_parameter(mut self, name: impl Into<String>) -> Self {
        match &mut self.kind {
            SymbolKind::Method {
                type_parameters, ..
            }
            | SymbolKind::NamedType {
                type_parameters, ..
            } => type_parameters.push(name.into()),
            _ => {}
        }
        self
    }

    pub fn with_explicit_interface(mut self, interface: TypeRef) -> Self {
        if let SymbolKind::Method {
            explicit_interface, ..
        } = &mut self.kind
        {
            *explicit_interface = Some(interface);
        }
        self
    }

    pub fn is_named_type(&self) -> bool {
        matches!(self.kind, SymbolKind::NamedType { .. })
    }

    pub fn type_kind(&self) -> Option<TypeKind> {
        match self.kind {
            SymbolKind::NamedType { type_kind, .. } => Some(type_kind),
            _ => None,
        }
    }

    pub fn method_kind(&self) -> Option<MethodKind> {
        match self.kind {
            SymbolKind::Method { method_kind, .. } => Some(method_kind),
            _ => None,
        }
    }

    /// Event add/remove accessors are part of their event.
    pub fn is_ignorable_accessor(&self) -> bool {
        self.method_kind().is_some_and(|k| k.is_event_add_or_remove())
    }

    /// Kinds whose declarations are checked against the baseline.
    pub fn is_examinable(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::NamedType { .. }
                | SymbolKind::Event { .. }
                | SymbolKind::Field { .. }
                | SymbolKind::Method { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SpecialType;

    #[test]
    fn test_event_accessors_are_ignorable() {
        let add = Symbol::accessor("add_E", MethodKind::EventAdd, TypeRef::void(), None);
        let remove = Symbol::accessor("remove_E", MethodKind::EventRemove, TypeRef::void(), None);
        let raise = Symbol::accessor("raise_E", MethodKind::EventRaise, TypeRef::void(), None);
        let get = Symbol::accessor("get_P", MethodKind::PropertyGet, SpecialType::Int, None);
        assert!(add.is_ignorable_accessor());
        assert!(remove.is_ignorable_accessor());
        assert!(!raise.is_ignorable_accessor());
        assert!(!get.is_ignorable_accessor());
        assert!(!Symbol::class("C").is_ignorable_accessor());
    }

    #[test]
    fn test_examinable_kinds() {
        assert!(Symbol::class("C").is_examinable());
        assert!(Symbol::field("F", SpecialType::Int).is_examinable());
        assert!(Symbol::event("E", TypeRef::named("System.EventHandler")).is_examinable());
        assert!(Symbol::method("M", TypeRef::void()).is_examinable());
        assert!(!Symbol::namespace("N").is_examinable());
        assert!(!Symbol::property("P", SpecialType::Int, true, false).is_examinable());
    }

    #[test]
    fn test_symbol_json() {
        let json = r#"{
            "name": "M",
            "kind": "method",
            "return_type": {"special": "void"},
            "parameters": [{"name": "x", "ty": {"special": "int"}, "ref_kind": "out"}],
            "accessibility": "public",
            "container": 1,
            "modifiers": {"static": true}
        }"#;
        let symbol: Symbol = serde_json::from_str(json).unwrap();
        assert_eq!(symbol.accessibility, Accessibility::Public);
        assert_eq!(symbol.container, Some(SymbolId(1)));
        assert!(symbol.modifiers.is_static);
        match symbol.kind {
            SymbolKind::Method { parameters, .. } => {
                assert_eq!(parameters[0].ref_kind, RefKind::Out)
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }
}
