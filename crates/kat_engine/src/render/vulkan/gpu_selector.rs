//! Physical device selection

use ash::vk;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ConfigError;
use crate::render::vulkan::instance::{VulkanError, VulkanInstance, VulkanResult};

/// How a physical device is chosen among the ones the instance reports
///
/// New strategies are added as variants; `select_from` must then handle them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuSelectionStrategy {
    /// First device in enumeration order, no scoring or filtering
    #[default]
    Naive,
}

impl GpuSelectionStrategy {
    /// Every strategy, in declaration order
    pub const ALL: [Self; 1] = [Self::Naive];

    /// Name used in configuration files
    pub const fn name(self) -> &'static str {
        match self {
            Self::Naive => "naive",
        }
    }
}

impl fmt::Display for GpuSelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GpuSelectionStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownStrategy(s.to_string()))
    }
}

/// Chooses a physical device from a Vulkan instance
pub struct GpuSelector<'a> {
    instance: &'a VulkanInstance,
}

impl<'a> GpuSelector<'a> {
    /// Selector over `instance`'s physical devices
    pub fn new(instance: &'a VulkanInstance) -> Self {
        Self { instance }
    }

    /// Enumerate the instance's devices and pick one with `strategy`
    pub fn select(&self, strategy: GpuSelectionStrategy) -> VulkanResult<vk::PhysicalDevice> {
        let devices = self.instance.enumerate_physical_devices()?;
        log::debug!("{} physical device(s) available", devices.len());

        let selected = select_from(strategy, &devices)?;
        log::info!(
            "GPU selection ({}): {}",
            strategy,
            self.instance.device_name(selected)
        );
        Ok(selected)
    }
}

/// Apply `strategy` to an already enumerated device list
pub fn select_from(
    strategy: GpuSelectionStrategy,
    devices: &[vk::PhysicalDevice],
) -> VulkanResult<vk::PhysicalDevice> {
    match strategy {
        GpuSelectionStrategy::Naive => {
            devices.first().copied().ok_or(VulkanError::NoPhysicalDevice)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle;

    fn devices(raw: &[u64]) -> Vec<vk::PhysicalDevice> {
        raw.iter().map(|&handle| vk::PhysicalDevice::from_raw(handle)).collect()
    }

    #[test]
    fn test_naive_picks_first_device() {
        let list = devices(&[0x30, 0x10, 0x20]);
        let first = select_from(GpuSelectionStrategy::Naive, &list).unwrap();
        assert_eq!(first.as_raw(), 0x30);

        // Same order, same answer.
        let again = select_from(GpuSelectionStrategy::Naive, &list).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_naive_without_devices_fails() {
        let result = select_from(GpuSelectionStrategy::Naive, &[]);
        assert!(matches!(result, Err(VulkanError::NoPhysicalDevice)));
    }

    #[test]
    fn test_parse_known_strategy() {
        assert_eq!("naive".parse::<GpuSelectionStrategy>().unwrap(), GpuSelectionStrategy::Naive);
        assert_eq!(" Naive ".parse::<GpuSelectionStrategy>().unwrap(), GpuSelectionStrategy::Naive);
    }

    #[test]
    fn test_parse_unknown_strategy_is_config_error() {
        let err = "discrete-first".parse::<GpuSelectionStrategy>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownStrategy(ref name) if name == "discrete-first"));
        assert!(err.to_string().contains("discrete-first"));
    }

    #[test]
    fn test_names_round_trip_through_parse() {
        for strategy in GpuSelectionStrategy::ALL {
            assert_eq!(strategy.to_string().parse::<GpuSelectionStrategy>().unwrap(), strategy);
        }
    }
}
