// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `instascrape` Core
//!
//! Domain models and the model-mapping layer for the `instascrape` client.
//!
//! The fetch layer never interprets the JSON it pages through beyond ids and
//! cursors. Everything else is turned into typed values here:
//!
//! - [`Account`] - a profile, from the account page or a search hit
//! - [`Media`] - a post, from any of the four node shapes the web API returns
//! - [`Comment`] - a single comment node
//! - [`Tag`] - a hashtag search hit
//! - [`Location`] - a location page
//!
//! Media identifiers can be converted between their numeric form and the
//! shortcode used in post URLs with [`media_id_to_code`] and
//! [`code_to_media_id`].

pub mod error;
pub mod models;

pub use error::CoreError;

pub use models::{
    code_to_media_id, media_id_to_code, Account, Comment, Location, Media, MediaKind, Owner, Tag,
};
