//! Canonical rendering of symbols.
//!
//! Two fixed formats exist: [`DisplayFormat::SHORT`] for human-readable
//! messages and [`DisplayFormat::SIGNATURE`] for baseline identity. The
//! signature form must tell apart every pair of symbols whose public contract
//! differs (overloads, getter vs setter, const values), and must render the
//! same symbol identically every time.

use crate::graph::{SymbolGraph, SymbolId};
use crate::symbol::{MethodKind, Parameter, Symbol, SymbolKind, TypeKind};
use crate::types::TypeRef;

/// Whether fully-qualified names start with `global::`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalNamespaceStyle {
    Omitted,
    Included,
}

/// How much of a type's containment chain is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeQualification {
    NameOnly,
    NameAndContainingTypes,
    NameAndContainingTypesAndNamespaces,
}

/// How property symbols are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyStyle {
    NameOnly,
    /// Append `{ get; set; }` listing the accessors present
    ShowReadWriteDescriptor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberOptions {
    pub parameters: bool,
    pub containing_type: bool,
    pub explicit_interface: bool,
    pub modifiers: bool,
    pub constant_value: bool,
    /// Trailing ` -> type` for fields, events, properties and methods
    pub ty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterOptions {
    pub extension_this: bool,
    pub params_ref_out: bool,
    pub ty: bool,
    pub name: bool,
    pub default_value: bool,
}

/// A rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayFormat {
    pub global_namespace: GlobalNamespaceStyle,
    pub type_qualification: TypeQualification,
    pub property_style: PropertyStyle,
    pub include_type_parameters: bool,
    pub members: MemberOptions,
    pub parameters: ParameterOptions,
    /// `int` rather than `System.Int32`
    pub use_special_types: bool,
}

impl DisplayFormat {
    /// Unqualified name for diagnostic messages. Never used for identity.
    pub const SHORT: DisplayFormat = DisplayFormat {
        global_namespace: GlobalNamespaceStyle::Omitted,
        type_qualification: TypeQualification::NameOnly,
        property_style: PropertyStyle::NameOnly,
        include_type_parameters: true,
        members: MemberOptions {
            parameters: false,
            containing_type: false,
            explicit_interface: false,
            modifiers: false,
            constant_value: false,
            ty: false,
        },
        parameters: ParameterOptions {
            extension_this: false,
            params_ref_out: false,
            ty: false,
            name: false,
            default_value: false,
        },
        use_special_types: false,
    };

    /// Fully-qualified signature as written in the baseline file.
    pub const SIGNATURE: DisplayFormat = DisplayFormat {
        global_namespace: GlobalNamespaceStyle::Omitted,
        type_qualification: TypeQualification::NameAndContainingTypesAndNamespaces,
        property_style: PropertyStyle::ShowReadWriteDescriptor,
        include_type_parameters: true,
        members: MemberOptions {
            parameters: true,
            containing_type: true,
            explicit_interface: true,
            modifiers: true,
            constant_value: true,
            ty: true,
        },
        parameters: ParameterOptions {
            extension_this: true,
            params_ref_out: true,
            ty: true,
            name: true,
            default_value: true,
        },
        use_special_types: true,
    };
}

/// Signature name and short name of one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalNames {
    pub signature: String,
    pub short: String,
}

impl CanonicalNames {
    pub fn of(graph: &SymbolGraph, id: SymbolId) -> Self {
        Self {
            signature: render(graph, id, &DisplayFormat::SIGNATURE),
            short: render(graph, id, &DisplayFormat::SHORT),
        }
    }
}

/// Render `id` under `format`. Unknown ids render as an empty string.
pub fn render(graph: &SymbolGraph, id: SymbolId, format: &DisplayFormat) -> String {
    let Some(symbol) = graph.get(id) else {
        return String::new();
    };
    let mut renderer = Renderer {
        graph,
        format,
        out: String::new(),
    };
    renderer.symbol(id, symbol);
    renderer.out
}

// Containment chains longer than this are treated as malformed input.
const MAX_QUALIFICATION_DEPTH: usize = 256;

struct Renderer<'a> {
    graph: &'a SymbolGraph,
    format: &'a DisplayFormat,
    out: String,
}

impl Renderer<'_> {
    fn symbol(&mut self, id: SymbolId, symbol: &Symbol) {
        match &symbol.kind {
            SymbolKind::Namespace | SymbolKind::NamedType { .. } => {
                let path = self.qualified_path(id);
                self.push_qualified(&path);
            }
            SymbolKind::Field { ty, constant } => {
                if self.format.members.modifiers {
                    self.field_modifiers(symbol, constant.is_some());
                }
                self.member_prefix(symbol);
                self.out.push_str(&symbol.name);
                if self.format.members.constant_value
                    && let Some(value) = constant
                {
                    self.out.push_str(" = ");
                    self.out.push_str(&value.literal());
                }
                self.member_type(ty);
            }
            SymbolKind::Event { ty } => {
                if self.format.members.modifiers {
                    self.member_modifiers(symbol);
                }
                self.member_prefix(symbol);
                self.out.push_str(&symbol.name);
                self.member_type(ty);
            }
            SymbolKind::Property {
                ty,
                parameters,
                has_getter,
                has_setter,
            } => {
                if self.format.members.modifiers {
                    self.member_modifiers(symbol);
                }
                self.member_prefix(symbol);
                self.property_name(&symbol.name, parameters);
                if self.format.property_style == PropertyStyle::ShowReadWriteDescriptor {
                    self.out.push_str(" {");
                    if *has_getter {
                        self.out.push_str(" get;");
                    }
                    if *has_setter {
                        self.out.push_str(" set;");
                    }
                    self.out.push_str(" }");
                }
                self.member_type(ty);
            }
            SymbolKind::Method {
                method_kind,
                return_type,
                parameters,
                type_parameters,
                explicit_interface,
                associated,
            } => {
                if self.format.members.modifiers {
                    self.member_modifiers(symbol);
                }
                self.member_prefix(symbol);
                if self.format.members.explicit_interface
                    && let Some(interface) = explicit_interface
                {
                    self.type_ref(interface);
                    self.out.push('.');
                }
                let is_accessor = self.method_name(symbol, *method_kind, *associated);
                if !is_accessor {
                    self.type_parameters(type_parameters);
                    if self.format.members.parameters {
                        self.parameter_list(parameters, '(', ')');
                    }
                }
                self.member_type(return_type);
            }
        }
    }

    /// Names of `id` and its containers, outermost first, according to the
    /// qualification style. Type names carry their generic parameters.
    fn qualified_path(&self, id: SymbolId) -> Vec<String> {
        let (with_types, with_namespaces) = match self.format.type_qualification {
            TypeQualification::NameOnly => (false, false),
            TypeQualification::NameAndContainingTypes => (true, false),
            TypeQualification::NameAndContainingTypesAndNamespaces => (true, true),
        };

        let mut parts = Vec::new();
        let mut current = Some(id);
        for depth in 0..MAX_QUALIFICATION_DEPTH {
            let Some(symbol) = current.and_then(|c| self.graph.get(c)) else {
                break;
            };
            let include = depth == 0
                || match symbol.kind {
                    SymbolKind::Namespace => with_namespaces,
                    SymbolKind::NamedType { .. } => with_types,
                    _ => false,
                };
            if !include {
                break;
            }
            // The global namespace has no name.
            if !symbol.name.is_empty() {
                parts.push(self.type_segment(symbol));
            }
            current = symbol.container;
        }
        parts.reverse();
        parts
    }

    fn type_segment(&self, symbol: &Symbol) -> String {
        let mut segment = symbol.name.clone();
        if self.format.include_type_parameters
            && let SymbolKind::NamedType {
                type_parameters, ..
            } = &symbol.kind
            && !type_parameters.is_empty()
        {
            segment.push('<');
            segment.push_str(&type_parameters.join(", "));
            segment.push('>');
        }
        segment
    }

    fn push_qualified(&mut self, parts: &[String]) {
        if self.format.global_namespace == GlobalNamespaceStyle::Included
            && self.format.type_qualification
                == TypeQualification::NameAndContainingTypesAndNamespaces
        {
            self.out.push_str("global::");
        }
        self.out.push_str(&parts.join("."));
    }

    fn member_prefix(&mut self, symbol: &Symbol) {
        if !self.format.members.containing_type {
            return;
        }
        if let Some(container) = symbol.container
            && self.graph.get(container).is_some_and(Symbol::is_named_type)
        {
            let path = self.qualified_path(container);
            self.push_qualified(&path);
            self.out.push('.');
        }
    }

    fn container_kind(&self, symbol: &Symbol) -> Option<TypeKind> {
        symbol
            .container
            .and_then(|c| self.graph.get(c))
            .and_then(Symbol::type_kind)
    }

    fn field_modifiers(&mut self, symbol: &Symbol, is_const: bool) {
        // Enum members are implicitly constant.
        if self.container_kind(symbol) == Some(TypeKind::Enum) {
            return;
        }
        if is_const {
            self.out.push_str("const ");
            return;
        }
        if symbol.modifiers.is_static {
            self.out.push_str("static ");
        }
        if symbol.modifiers.is_readonly {
            self.out.push_str("readonly ");
        }
    }

    fn member_modifiers(&mut self, symbol: &Symbol) {
        let m = symbol.modifiers;
        let in_interface = self.container_kind(symbol) == Some(TypeKind::Interface);
        if m.is_static {
            self.out.push_str("static ");
        }
        if m.is_abstract && !in_interface {
            self.out.push_str("abstract ");
        }
        if m.is_virtual {
            self.out.push_str("virtual ");
        }
        if m.is_sealed {
            self.out.push_str("sealed ");
        }
        if m.is_override {
            self.out.push_str("override ");
        }
    }

    fn property_name(&mut self, name: &str, parameters: &[Parameter]) {
        if parameters.is_empty() {
            self.out.push_str(name);
        } else {
            self.out.push_str("this");
            if self.format.members.parameters {
                self.parameter_list(parameters, '[', ']');
            } else {
                self.out.push_str("[]");
            }
        }
    }

    /// Writes the method's name part. Returns true for accessors, which carry
    /// no parameter list of their own.
    fn method_name(
        &mut self,
        symbol: &Symbol,
        kind: MethodKind,
        associated: Option<SymbolId>,
    ) -> bool {
        let accessor_suffix = match kind {
            MethodKind::PropertyGet => Some("get"),
            MethodKind::PropertySet => Some("set"),
            MethodKind::EventAdd => Some("add"),
            MethodKind::EventRemove => Some("remove"),
            MethodKind::EventRaise => Some("raise"),
            _ => None,
        };
        let graph = self.graph;
        if let Some(suffix) = accessor_suffix {
            match associated.and_then(|a| graph.get(a)) {
                Some(Symbol {
                    name,
                    kind: SymbolKind::Property { parameters, .. },
                    ..
                }) => self.property_name(name, parameters),
                Some(owner) => self.out.push_str(&owner.name),
                None => self.out.push_str(&symbol.name),
            }
            self.out.push('.');
            self.out.push_str(suffix);
            return true;
        }

        let container_name = symbol
            .container
            .and_then(|c| graph.get(c))
            .map(|c| c.name.as_str())
            .unwrap_or(symbol.name.as_str());
        match kind {
            MethodKind::Constructor | MethodKind::StaticConstructor => {
                self.out.push_str(container_name)
            }
            MethodKind::Destructor => {
                self.out.push('~');
                self.out.push_str(container_name);
            }
            MethodKind::Operator => {
                self.out.push_str("operator ");
                self.out.push_str(&symbol.name);
            }
            MethodKind::Conversion => {
                self.out.push_str(&symbol.name);
                self.out.push_str(" operator");
            }
            _ => self.out.push_str(&symbol.name),
        }
        false
    }

    fn type_parameters(&mut self, type_parameters: &[String]) {
        if self.format.include_type_parameters && !type_parameters.is_empty() {
            self.out.push('<');
            self.out.push_str(&type_parameters.join(", "));
            self.out.push('>');
        }
    }

    fn parameter_list(&mut self, parameters: &[Parameter], open: char, close: char) {
        self.out.push(open);
        for (i, parameter) in parameters.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.parameter(parameter);
        }
        self.out.push(close);
    }

    fn parameter(&mut self, parameter: &Parameter) {
        let opts = self.format.parameters;
        let mut words: Vec<String> = Vec::new();
        if opts.extension_this && parameter.is_this {
            words.push("this".to_string());
        }
        if opts.params_ref_out {
            if parameter.is_params {
                words.push("params".to_string());
            }
            if let Some(keyword) = parameter.ref_kind.keyword() {
                words.push(keyword.to_string());
            }
        }
        if opts.ty {
            words.push(self.type_string(&parameter.ty));
        }
        if opts.name {
            words.push(parameter.name.clone());
        }
        self.out.push_str(&words.join(" "));
        if opts.default_value
            && let Some(default) = &parameter.default
        {
            self.out.push_str(" = ");
            self.out.push_str(&default.literal());
        }
    }

    fn member_type(&mut self, ty: &TypeRef) {
        if self.format.members.ty {
            self.out.push_str(" -> ");
            self.type_ref(ty);
        }
    }

    fn type_ref(&mut self, ty: &TypeRef) {
        let rendered = self.type_string(ty);
        self.out.push_str(&rendered);
    }

    fn type_string(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Special(special) => {
                if self.format.use_special_types {
                    special.keyword().to_string()
                } else {
                    self.qualify_dotted(special.framework_name())
                }
            }
            TypeRef::Named {
                name,
                type_arguments,
            } => {
                let mut s = self.qualify_dotted(name);
                s.push_str(&self.type_arguments(type_arguments));
                s
            }
            TypeRef::Symbol { id, type_arguments } => {
                let mut parts = self.qualified_path(*id);
                // Arguments replace the declared parameters of the leaf type.
                if !type_arguments.is_empty()
                    && let Some(symbol) = self.graph.get(*id)
                    && !symbol.name.is_empty()
                    && let Some(leaf) = parts.last_mut()
                {
                    *leaf = symbol.name.clone();
                    leaf.push_str(&self.type_arguments(type_arguments));
                }
                parts.join(".")
            }
            TypeRef::TypeParameter(name) => name.clone(),
            TypeRef::Array { element, rank } => {
                let mut s = self.type_string(element);
                s.push('[');
                for _ in 1..(*rank).max(1) {
                    s.push(',');
                }
                s.push(']');
                s
            }
            TypeRef::Nullable(inner) => {
                let mut s = self.type_string(inner);
                s.push('?');
                s
            }
        }
    }

    fn type_arguments(&self, type_arguments: &[TypeRef]) -> String {
        if type_arguments.is_empty() {
            return String::new();
        }
        let args: Vec<String> = type_arguments.iter().map(|a| self.type_string(a)).collect();
        format!("<{}>", args.join(", "))
    }

    /// Trim a dotted external name down to the configured qualification.
    fn qualify_dotted(&self, name: &str) -> String {
        match self.format.type_qualification {
            TypeQualification::NameAndContainingTypesAndNamespaces => name.to_string(),
            _ => name.rsplit('.').next().unwrap_or(name).to_string(),
        }
    }
}
