//! Client for the places/maps provider.
//!
//! Resolves businesses by text search and fetches the per-place details the
//! audit pipeline consumes (rating, reviews, photos, website, geometry).

mod client;
mod error;
mod retry;
mod types;

pub use client::PlacesClient;
pub use error::PlacesError;
pub use types::{PlaceDetails, PlaceSummary};
