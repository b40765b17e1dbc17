//! Rust code generation modules.

pub mod constructors;
pub mod declarations;
pub mod idents;
pub mod types;

pub use constructors::ConstructorGenerator;
pub use declarations::DeclarationGenerator;
