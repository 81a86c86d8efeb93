pub mod blueprint;
pub mod context;
pub mod finding;
pub mod node;
pub mod path;
pub mod reference;
pub mod registry;

pub use blueprint::{BlueprintDefinition, InputSpec};
pub use context::{ContextKind, Scope};
pub use finding::{Finding, FindingCode, Severity};
pub use node::{ConfigNode, Scalar};
pub use path::{NodePath, PathSegment};
pub use reference::{Origin, RawReference, ReferenceKind};
pub use registry::RegistrySnapshot;
