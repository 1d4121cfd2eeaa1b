//! Vulkan backend
//!
//! Instance creation, window surfaces, GPU selection, queue-family discovery
//! and logical device creation.

pub mod device;
pub mod features;
pub mod gpu_selector;
pub mod instance;
pub mod queue_families;
pub mod window;

pub use device::{DeviceQueues, RenderDevice};
pub use features::DeviceFeatureSet;
pub use gpu_selector::{GpuSelectionStrategy, GpuSelector};
pub use instance::{VulkanError, VulkanInstance, VulkanResult, ENGINE_NAME};
pub use queue_families::{
    discover_queue_families, QueueDiscovery, QueueFamilies, QueueFamilyAssignment, QueueRole,
};
pub use window::{Window, WindowError, WindowResult, WindowSettings};
