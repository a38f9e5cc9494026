use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("cannot declare '{name}': it already exists in this scope")]
    DuplicateDeclaration { name: String },
    #[error("cannot resolve '{name}': it does not exist in scope")]
    UnresolvedName { name: String },
    #[error("cannot access property '{property}' on a value that is not an object")]
    InvalidMemberAccess { property: String },
    #[error("instantiation expects a type, found {found}")]
    TypeInstantiationExpectedType { found: &'static str },
    #[error("cannot assign to {target}")]
    InvalidAssignmentTarget { target: &'static str },
    #[error("object of type '{type_name}' has no property '{property}'")]
    UnknownProperty { type_name: String, property: String },
}
