//! # `terrain-prep`
//!
//! Batch resizing and normalization of terrain texture images.
//!
//! Height, material and mask maps are resized with nearest-neighbor sampling
//! so that discrete values never blend, then converted to a canonical 8-bit
//! RGB or RGBA PNG: grayscale is replicated across channels, palette images
//! are expanded through their palette and high bit-depth grayscale is
//! contrast-stretched to the full 8-bit range.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use terrain_prep::{Config, Processor};
//!
//! # fn main() -> terrain_prep::Result<()> {
//! let processor = Processor::new(Config::default())?;
//!
//! let report = processor.run(Path::new("assets/Terrain/grass"))?;
//! println!("{} converted, {} failed", report.converted.len(), report.failed.len());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod error;
pub mod image;
pub mod pipeline;

pub use batch::{BatchReport, Config, Processor};
pub use error::{Error, Result};
pub use pipeline::{normalize_and_resize, AllowedSizes, TargetSpec};
