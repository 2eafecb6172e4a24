use std::fmt::Display;

/// Length of an array type: a known compile-time size, or unspecified (a bare
/// `[]` receiver, e.g. a function parameter that accepts any length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayLength {
    Fixed(usize),
    Dynamic,
}

impl Display for ArrayLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrayLength::Fixed(n) => write!(f, "{n}"),
            ArrayLength::Dynamic => write!(f, ""),
        }
    }
}

/// A type in the source language's lattice.
///
/// Equality is structural for primitives and arrays, nominal for structs
/// (name + nullability only — two structs with the same fields but different
/// names are different types), and positional for functions. `#[derive(PartialEq)]`
/// gives us exactly these semantics for free because `Struct` never carries its
/// field list, only its registered name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Numeric { nullable: bool },
    Text { nullable: bool },
    Char { nullable: bool },
    Boolean { nullable: bool },
    Void,
    Null,
    Array {
        element: Box<Type>,
        length: ArrayLength,
        nullable: bool,
    },
    Function {
        params: Vec<Type>,
        return_type: Box<Type>,
    },
    Struct {
        name: String,
        nullable: bool,
    },
}

impl Type {
    pub fn numeric() -> Self {
        Type::Numeric { nullable: false }
    }

    pub fn text() -> Self {
        Type::Text { nullable: false }
    }

    pub fn char() -> Self {
        Type::Char { nullable: false }
    }

    pub fn boolean() -> Self {
        Type::Boolean { nullable: false }
    }

    pub fn array(element: Type, length: ArrayLength) -> Self {
        Type::Array {
            element: Box::new(element),
            length,
            nullable: false,
        }
    }

    pub fn strukt(name: impl Into<String>) -> Self {
        Type::Struct {
            name: name.into(),
            nullable: false,
        }
    }

    /// Whether this type's set of values includes `null`.
    pub fn is_nullable(&self) -> bool {
        match self {
            Type::Numeric { nullable }
            | Type::Text { nullable }
            | Type::Char { nullable }
            | Type::Boolean { nullable }
            | Type::Array { nullable, .. }
            | Type::Struct { nullable, .. } => *nullable,
            Type::Void | Type::Function { .. } => false,
            Type::Null => true,
        }
    }

    /// Same type, but with the nullable flag set. A no-op for `Void`, `Null`
    /// and `Function`, which are never nullable (functions per §4.4, `Void`
    /// because it only ever appears as a return type, `Null` because it is
    /// nullable by definition).
    pub fn make_nullable(&self) -> Type {
        match self.clone() {
            Type::Numeric { .. } => Type::Numeric { nullable: true },
            Type::Text { .. } => Type::Text { nullable: true },
            Type::Char { .. } => Type::Char { nullable: true },
            Type::Boolean { .. } => Type::Boolean { nullable: true },
            Type::Array { element, length, .. } => Type::Array {
                element,
                length,
                nullable: true,
            },
            Type::Struct { name, .. } => Type::Struct {
                name,
                nullable: true,
            },
            other => other,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Numeric { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Type::Text { .. })
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Boolean { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct { .. })
    }

    /// Can a value of `self` be assigned to a location declared with `target`?
    ///
    /// Assignment compatibility (§3.1): equal types; a non-nullable `T` into
    /// its own nullable form; the literal `null` into any nullable type.
    pub fn is_assignable_to(&self, target: &Type) -> bool {
        if self == target {
            return true;
        }
        if matches!(self, Type::Null) {
            return target.is_nullable();
        }
        !self.is_nullable() && &self.make_nullable() == target
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suffix = if self.is_nullable() { "?" } else { "" };
        match self {
            Type::Numeric { .. } => write!(f, "num{suffix}"),
            Type::Text { .. } => write!(f, "text{suffix}"),
            Type::Char { .. } => write!(f, "char{suffix}"),
            Type::Boolean { .. } => write!(f, "bool{suffix}"),
            Type::Void => write!(f, "void"),
            Type::Null => write!(f, "null"),
            Type::Array {
                element, length, ..
            } => write!(f, "{element}[{length}]{suffix}"),
            Type::Function {
                params,
                return_type,
            } => {
                let params = params
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "fnc[{params}]:{return_type}")
            }
            Type::Struct { name, .. } => write!(f, "{name}{suffix}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_nullable_is_assignable_to_its_nullable_form() {
        assert!(Type::numeric().is_assignable_to(&Type::numeric().make_nullable()));
    }

    #[test]
    fn nullable_is_not_assignable_to_non_nullable() {
        assert!(!Type::numeric()
            .make_nullable()
            .is_assignable_to(&Type::numeric()));
    }

    #[test]
    fn null_is_assignable_to_any_nullable_type() {
        assert!(Type::Null.is_assignable_to(&Type::text().make_nullable()));
        assert!(!Type::Null.is_assignable_to(&Type::text()));
    }

    #[test]
    fn structs_are_compared_nominally() {
        let a = Type::strukt("Point");
        let b = Type::strukt("Point");
        let c = Type::strukt("Vector");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn arrays_compare_element_and_length() {
        let a = Type::array(Type::numeric(), ArrayLength::Fixed(3));
        let b = Type::array(Type::numeric(), ArrayLength::Fixed(3));
        let c = Type::array(Type::numeric(), ArrayLength::Fixed(4));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
