//! Playout-SMIL: composition of SMIL index documents.
//!
//! The pieces, leaves first:
//!
//! - [`format`] - pure string transforms (sequence wrapping, zone region renaming)
//! - [`resolver`] - recursive splicing of `{ITEMS_n}` / `{PREFETCH_n}` placeholders
//! - [`builder`] - turns a player's assignment into one [`PlaylistStructure`]
//! - [`sections`] - turns player + playlist into named template sections
//! - [`template`] - device family template selection
//! - [`render`] - the section renderer seam and its block renderer
//!
//! Nothing here touches the filesystem or the network directly; content comes
//! in through the [`reader`] traits.

pub mod builder;
pub mod format;
pub mod reader;
pub mod render;
pub mod resolver;
pub mod sections;
pub mod structure;
pub mod template;

#[cfg(test)]
pub(crate) mod testing;

pub use builder::{PlaylistBuilder, PlaylistBuilderFactory};
pub use reader::{ContentReader, ExternalContentReader};
pub use render::{BlockRenderer, SectionRenderer};
pub use resolver::{ContentResolver, ResolverLimits};
pub use sections::{PreparerFactory, SectionData, SectionKind, SectionRow};
pub use structure::PlaylistStructure;
pub use template::{select_template, IndexTemplate};
