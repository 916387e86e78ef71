//! Braille text art from raster images.
//!
//! A grayscale grid is resized to the target width, padded to a multiple of the
//! 2x4 Braille cell, split into blocks, thresholded into dot patterns and looked
//! up in a [`mapping::Mapping`].
pub mod blocks;
pub mod dots;
pub mod error;
pub mod loader;
pub mod mapping;
pub mod pipeline;
pub mod render;

/// Row-major 8-bit intensity grid the pipeline works on.
pub use image::GrayImage as PixelGrid;
