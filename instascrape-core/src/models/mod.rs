//! Domain models for `instascrape`.
//!
//! ## Submodules
//!
//! - [`account`] - Account profiles
//! - [`media`] - Posts and media identifiers
//! - [`comment`] - Comments
//! - [`tag`] - Hashtags
//! - [`location`] - Locations

mod account;
mod comment;
mod json;
mod location;
mod media;
mod tag;

pub use account::Account;
pub use comment::Comment;
pub use location::Location;
pub use media::{code_to_media_id, media_id_to_code, Media, MediaKind, Owner};
pub use tag::Tag;
