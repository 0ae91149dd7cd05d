use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

/// Nominal type handle. Two classes are the same class only if they are the
/// same allocation; names are for display.
#[derive(Clone)]
pub struct Class(Arc<ClassData>);

struct ClassData {
    name: String,
    parent: Option<Class>,
}

static OBJECT: Lazy<Class> = Lazy::new(|| Class(Arc::new(ClassData {
    name: "Object".to_string(),
    parent: None,
})));
static ARRAY: Lazy<Class> = Lazy::new(|| Class::extending("Array", &OBJECT));
static ERROR: Lazy<Class> = Lazy::new(|| Class::extending("Error", &OBJECT));

impl Class {
    /// Root of every class chain.
    pub fn object() -> Self { OBJECT.clone() }
    /// Class of every array value.
    pub fn array() -> Self { ARRAY.clone() }
    pub fn error() -> Self { ERROR.clone() }

    /// Look up a builtin by name (`Object`, `Array`, `Error`).
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "Object" => Some(Self::object()),
            "Array" => Some(Self::array()),
            "Error" => Some(Self::error()),
            _ => None,
        }
    }

    /// A fresh class directly under `Object`.
    pub fn new(name: impl Into<String>) -> Self {
        Self::extending(name, &OBJECT)
    }

    pub fn extending(name: impl Into<String>, parent: &Class) -> Self {
        Self(Arc::new(ClassData {
            name: name.into(),
            parent: Some(parent.clone()),
        }))
    }

    pub fn name(&self) -> &str { &self.0.name }

    pub fn parent(&self) -> Option<&Class> { self.0.parent.as_ref() }

    pub fn ptr_eq(&self, other: &Class) -> bool { Arc::ptr_eq(&self.0, &other.0) }

    pub fn addr(&self) -> usize { Arc::as_ptr(&self.0) as *const () as usize }

    /// Reflexive: every class is a subclass of itself.
    pub fn is_subclass_of(&self, other: &Class) -> bool {
        let mut cursor = Some(self);
        while let Some(class) = cursor {
            if class.ptr_eq(other) {
                return true;
            }
            cursor = class.parent();
        }
        false
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool { self.ptr_eq(other) }
}

impl Eq for Class {}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class({})", self.name())
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_keep_identity_across_calls() {
        assert_eq!(Class::array(), Class::array());
        assert_eq!(Class::builtin("Error"), Some(Class::error()));
        assert_eq!(Class::builtin("Date"), None);
    }

    #[test]
    fn subclass_chain_walks_to_object() {
        let base = Class::new("Shape");
        let circle = Class::extending("Circle", &base);
        assert!(circle.is_subclass_of(&circle));
        assert!(circle.is_subclass_of(&base));
        assert!(circle.is_subclass_of(&Class::object()));
        assert!(!base.is_subclass_of(&circle));
        assert!(!circle.is_subclass_of(&Class::array()));
    }

    #[test]
    fn same_name_is_not_same_class() {
        assert_ne!(Class::new("TestClass"), Class::new("TestClass"));
    }
}
