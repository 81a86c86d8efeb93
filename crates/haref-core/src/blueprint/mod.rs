//! Blueprint loading and `!input` substitution

pub mod cache;
pub mod resolver;

pub use cache::{BlueprintCache, BlueprintSource, NoBlueprints};
pub use resolver::{resolve, substitute, Resolution, ResolvedBlueprint};
