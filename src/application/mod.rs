pub mod catalog;
mod dependencies;
pub mod list;

pub use dependencies::{ListPolicy, ServiceDependencies};
