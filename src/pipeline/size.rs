//! Target size selection.

use crate::error::{Error, Result};

/// Sizes used when no explicit target is given.
pub const DEFAULT_ALLOWED_SIZES: [u32; 2] = [1024, 2048];

/// Ascending, deduplicated set of sizes an output axis may snap to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedSizes(Vec<u32>);

impl AllowedSizes {
    /// Build a candidate set. Input order does not matter.
    ///
    /// # Errors
    ///
    /// Returns an error if `sizes` is empty or contains zero.
    pub fn new(mut sizes: Vec<u32>) -> Result<Self> {
        if sizes.is_empty() {
            return Err(Error::InvalidParameter {
                name: "sizes".to_string(),
                reason: "must contain at least one size".to_string(),
            });
        }

        if sizes.contains(&0) {
            return Err(Error::InvalidParameter {
                name: "sizes".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        sizes.sort_unstable();
        sizes.dedup();
        Ok(Self(sizes))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// The candidate closest to `dim`.
    ///
    /// Equidistant candidates resolve to the smaller one.
    #[must_use]
    pub fn nearest(&self, dim: u32) -> u32 {
        // min_by_key keeps the first minimum and the set is ascending
        self.0
            .iter()
            .copied()
            .min_by_key(|&size| size.abs_diff(dim))
            .unwrap_or(dim)
    }
}

impl Default for AllowedSizes {
    fn default() -> Self {
        Self(DEFAULT_ALLOWED_SIZES.to_vec())
    }
}

/// How the output dimensions are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// Resize to exactly this size.
    Explicit { width: u32, height: u32 },
    /// Snap each axis independently to the nearest allowed size.
    Nearest(AllowedSizes),
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self::Nearest(AllowedSizes::default())
    }
}

impl TargetSpec {
    /// Validate the target.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit dimension is zero.
    pub fn validate(&self) -> Result<()> {
        if let Self::Explicit { width, height } = *self {
            if width == 0 || height == 0 {
                return Err(Error::InvalidParameter {
                    name: "target".to_string(),
                    reason: format!("{width}x{height} must be greater than 0 on both axes"),
                });
            }
        }
        Ok(())
    }

    /// Output `(width, height)` for a source of the given size.
    #[must_use]
    pub fn resolve(&self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Self::Explicit { width, height } => (*width, *height),
            Self::Nearest(sizes) => (sizes.nearest(width), sizes.nearest(height)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_picks_closest() {
        let sizes = AllowedSizes::default();

        assert_eq!(sizes.nearest(1500), 1024);
        assert_eq!(sizes.nearest(1800), 2048);
        assert_eq!(sizes.nearest(10), 1024);
        assert_eq!(sizes.nearest(9000), 2048);
    }

    #[test]
    fn test_nearest_tie_takes_smaller() {
        let sizes = AllowedSizes::default();
        assert_eq!(sizes.nearest(1536), 1024);
    }

    #[test]
    fn test_sizes_sorted_and_deduplicated() {
        let sizes = AllowedSizes::new(vec![4096, 1024, 2048, 1024]).unwrap();
        assert_eq!(sizes.as_slice(), &[1024, 2048, 4096]);
        // 3072 is equidistant from 2048 and 4096
        assert_eq!(sizes.nearest(3072), 2048);
    }

    #[test]
    fn test_empty_sizes_rejected() {
        assert!(AllowedSizes::new(Vec::new()).is_err());
        assert!(AllowedSizes::new(vec![0, 1024]).is_err());
    }

    #[test]
    fn test_resolve_axes_independently() {
        let target = TargetSpec::default();
        assert_eq!(target.resolve(1500, 1800), (1024, 2048));

        let explicit = TargetSpec::Explicit { width: 640, height: 480 };
        assert_eq!(explicit.resolve(4000, 3000), (640, 480));
    }

    #[test]
    fn test_zero_explicit_target_invalid() {
        let target = TargetSpec::Explicit { width: 0, height: 512 };
        assert!(target.validate().is_err());
        assert!(TargetSpec::default().validate().is_ok());
    }
}
