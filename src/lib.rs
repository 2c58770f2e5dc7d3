//! Walk from a path toward the filesystem root, visiting every entry at each
//! level until a visitor accepts one.
//!
//! ```no_run
//! use walkup::walk_up;
//!
//! let manifest = walk_up(".", |p| p.ends_with("Cargo.toml"))?;
//! # Ok::<(), walkup::WalkError>(())
//! ```

pub mod config;
pub mod guard;
pub mod matcher;
#[cfg(test)]
mod test_utils;
mod traverse;

pub use config::{Config, ConfigError};
pub use guard::AscentGuard;
pub use matcher::{EntryKind, EntryMatcher, MatcherError};
pub use traverse::{WalkError, walk_up, walk_up_guarded};
