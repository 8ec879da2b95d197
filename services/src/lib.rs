//! Side services used while assembling responses.

pub mod image_lookup;

pub use image_lookup::{ImageLookup, ImageLookupError, NoImageLookup, UnsplashClient, UnsplashConfig};
