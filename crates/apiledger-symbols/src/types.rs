//! Type references and constant values appearing in signatures.

use serde::{Deserialize, Serialize};

use crate::SymbolId;

/// Built-in types that have a language keyword alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialType {
    Void,
    Object,
    Bool,
    Char,
    SByte,
    Byte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Decimal,
    String,
}

impl SpecialType {
    /// Language alias (`int`, `string`, ...).
    pub fn keyword(&self) -> &'static str {
        match self {
            SpecialType::Void => "void",
            SpecialType::Object => "object",
            SpecialType::Bool => "bool",
            SpecialType::Char => "char",
            SpecialType::SByte => "sbyte",
            SpecialType::Byte => "byte",
            SpecialType::Short => "short",
            SpecialType::UShort => "ushort",
            SpecialType::Int => "int",
            SpecialType::UInt => "uint",
            SpecialType::Long => "long",
            SpecialType::ULong => "ulong",
            SpecialType::Float => "float",
            SpecialType::Double => "double",
            SpecialType::Decimal => "decimal",
            SpecialType::String => "string",
        }
    }

    /// Fully-qualified framework name (`System.Int32`, ...).
    pub fn framework_name(&self) -> &'static str {
        match self {
            SpecialType::Void => "System.Void",
            SpecialType::Object => "System.Object",
            SpecialType::Bool => "System.Boolean",
            SpecialType::Char => "System.Char",
            SpecialType::SByte => "System.SByte",
            SpecialType::Byte => "System.Byte",
            SpecialType::Short => "System.Int16",
            SpecialType::UShort => "System.UInt16",
            SpecialType::Int => "System.Int32",
            SpecialType::UInt => "System.UInt32",
            SpecialType::Long => "System.Int64",
            SpecialType::ULong => "System.UInt64",
            SpecialType::Float => "System.Single",
            SpecialType::Double => "System.Double",
            SpecialType::Decimal => "System.Decimal",
            SpecialType::String => "System.String",
        }
    }
}

/// A reference to a type from a member signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Special(SpecialType),
    /// A type outside the graph, by dotted fully-qualified name
    Named {
        name: String,
        #[serde(default)]
        type_arguments: Vec<TypeRef>,
    },
    /// A named type declared in the same graph
    Symbol {
        id: SymbolId,
        #[serde(default)]
        type_arguments: Vec<TypeRef>,
    },
    TypeParameter(String),
    Array {
        element: Box<TypeRef>,
        #[serde(default = "default_rank")]
        rank: u32,
    },
    Nullable(Box<TypeRef>),
}

fn default_rank() -> u32 {
    1
}

impl TypeRef {
    pub fn void() -> Self {
        TypeRef::Special(SpecialType::Void)
    }

    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named {
            name: name.into(),
            type_arguments: Vec::new(),
        }
    }

    pub fn symbol(id: SymbolId) -> Self {
        TypeRef::Symbol {
            id,
            type_arguments: Vec::new(),
        }
    }

    pub fn array_of(element: TypeRef) -> Self {
        TypeRef::Array {
            element: Box::new(element),
            rank: 1,
        }
    }
}

impl From<SpecialType> for TypeRef {
    fn from(special: SpecialType) -> Self {
        TypeRef::Special(special)
    }
}

/// Compile-time constant: const field values and parameter defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    String(String),
}

impl ConstantValue {
    /// Render as a source literal.
    pub fn literal(&self) -> String {
        match self {
            ConstantValue::Null => "null".to_string(),
            ConstantValue::Bool(b) => b.to_string(),
            ConstantValue::Int(i) => i.to_string(),
            ConstantValue::UInt(u) => u.to_string(),
            ConstantValue::Float(f) => f.to_string(),
            ConstantValue::Char(c) => {
                let mut out = String::from('\'');
                escape_into(&mut out, *c, '\'');
                out.push('\'');
                out
            }
            ConstantValue::String(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                out.push('"');
                for c in s.chars() {
                    escape_into(&mut out, c, '"');
                }
                out.push('"');
                out
            }
        }
    }
}

fn escape_into(out: &mut String, c: char, quote: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '\0' => out.push_str("\\0"),
        c if c == quote => {
            out.push('\\');
            out.push(c);
        }
        c => out.push(c),
    }
}
