//! # Curator Common Library
//!
//! Shared code for the exhibition curator service:
//! - Canonical artwork record and identity keys
//! - Selection set ("my exhibition") and its session-scoped persistence
//! - Event types (CuratorEvent enum) and EventBus
//! - Configuration loading

pub mod artwork;
pub mod config;
pub mod error;
pub mod events;
pub mod exhibition;
pub mod selection;
pub mod storage;

pub use artwork::{Artwork, ArtworkDraft, ArtworkId, IdentityKey, Identify, Source};
pub use error::{Error, Result};
pub use config::TomlConfig;
pub use exhibition::{Applied, Exhibition, ExhibitionSnapshot};
pub use selection::{AddOutcome, SelectionSet};
pub use storage::{FileStore, MemoryStore, SessionStore};
