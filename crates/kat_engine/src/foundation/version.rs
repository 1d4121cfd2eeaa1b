//! Semantic version triple used for application and engine identification

use ash::vk;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `major.minor.patch` version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl Version {
    /// Create a version from its three components
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Pack into the Vulkan version encoding (variant 0)
    pub fn to_vulkan(self) -> u32 {
        vk::make_api_version(0, self.major, self.minor, self.patch)
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::new(0, 1, 0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vulkan_packing() {
        let packed = Version::new(1, 2, 3).to_vulkan();
        assert_eq!(vk::api_version_variant(packed), 0);
        assert_eq!(vk::api_version_major(packed), 1);
        assert_eq!(vk::api_version_minor(packed), 2);
        assert_eq!(vk::api_version_patch(packed), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::new(0, 1, 0).to_string(), "0.1.0");
    }

    #[test]
    fn test_default_is_0_1_0() {
        assert_eq!(Version::default(), Version::new(0, 1, 0));
    }
}
