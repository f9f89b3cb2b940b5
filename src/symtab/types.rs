// Type and constant values attached to declarations

use std::fmt;

/// Value of a declared constant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantValue {
    Int(i32),
    Char(char),
}

impl ConstantValue {
    /// Integer negation; `None` for a char, which has no negative.
    pub fn negated(self) -> Option<ConstantValue> {
        match self {
            ConstantValue::Int(n) => Some(ConstantValue::Int(n.wrapping_neg())),
            ConstantValue::Char(_) => None,
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Int(n) => write!(f, "{}", n),
            ConstantValue::Char(c) => write!(f, "'{}'", c),
        }
    }
}

/// Types a KPL declaration can carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Char,
    Array { size: u32, element: Box<Type> },
    /// A named type; `target` is a copy of the definition taken when the
    /// name was used, so redefining the alias later changes nothing here.
    Alias { name: String, target: Box<Type> },
}

impl Type {
    pub fn array(size: u32, element: Type) -> Self {
        Type::Array {
            size,
            element: Box::new(element),
        }
    }

    pub fn alias(name: impl Into<String>, target: Type) -> Self {
        Type::Alias {
            name: name.into(),
            target: Box::new(target),
        }
    }

    /// The type with every alias layer stripped
    pub fn resolved(&self) -> &Type {
        match self {
            Type::Alias { target, .. } => target.resolved(),
            other => other,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "Int"),
            Type::Char => write!(f, "Char"),
            Type::Array { size, element } => write!(f, "Arr({},{})", size, element),
            Type::Alias { name, .. } => write!(f, "{}", name),
        }
    }
}
