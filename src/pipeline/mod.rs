//! Resize and normalization pipeline for terrain textures.

mod normalize;
mod resample;
mod size;
mod stretch;

pub use normalize::normalize_and_resize;
pub use resample::{resize_nearest, sample_indices};
pub use size::{AllowedSizes, TargetSpec, DEFAULT_ALLOWED_SIZES};
pub use stretch::contrast_stretch;
