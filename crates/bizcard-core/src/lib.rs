//! Request-scoped logic for bizcard: username redirect resolution, the
//! ordered social-link store and profile maintenance.
//!
//! Every operation takes the [`Directory`] it works against as an explicit
//! argument. Nothing here caches Directory state between calls.

pub mod directory;
pub mod error;
pub mod links;
pub mod memory;
pub mod principal;
pub mod profiles;
pub mod resolver;
pub mod vcard;

pub use directory::{Directory, LinkPatch};
pub use error::{CoreError, CoreResult, DirectoryError};
pub use memory::MemoryDirectory;
pub use principal::Principal;
