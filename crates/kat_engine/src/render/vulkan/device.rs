//! Render device: queue-family discovery and logical device creation

use ash::extensions::khr::Swapchain as SwapchainLoader;
use ash::{vk, Device};
use std::collections::BTreeSet;
use std::os::raw::c_char;
use std::rc::Rc;

use super::features::DeviceFeatureSet;
use super::gpu_selector::{GpuSelectionStrategy, GpuSelector};
use super::instance::{VulkanError, VulkanInstance, VulkanResult};
use super::queue_families::{discover_queue_families, QueueFamilies, QueueRole};
use super::window::Window;

const QUEUE_PRIORITIES: [f32; 1] = [1.0];

/// One queue handle per role, queue index 0 of each role's family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceQueues {
    /// Graphics queue
    pub graphics: vk::Queue,
    /// Present queue
    pub present: vk::Queue,
    /// Transfer queue
    pub transfer: vk::Queue,
    /// Compute queue
    pub compute: vk::Queue,
}

impl DeviceQueues {
    /// Queue serving `role`
    pub fn get(&self, role: QueueRole) -> vk::Queue {
        match role {
            QueueRole::Graphics => self.graphics,
            QueueRole::Present => self.present,
            QueueRole::Transfer => self.transfer,
            QueueRole::Compute => self.compute,
        }
    }
}

/// Physical GPU plus the logical device created on it
pub struct RenderDevice {
    physical_device: vk::PhysicalDevice,
    device: Device,
    queue_families: QueueFamilies,
    queues: DeviceQueues,
    instance: Rc<VulkanInstance>,
}

impl RenderDevice {
    /// Create a device on an explicit physical device, presenting to `surface`
    pub fn new(
        instance: Rc<VulkanInstance>,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
    ) -> VulkanResult<Self> {
        let families = unsafe {
            instance.instance().get_physical_device_queue_family_properties(physical_device)
        };

        let surface_loader = instance.surface_loader();
        let queue_families = discover_queue_families(&families, |index| unsafe {
            surface_loader
                .get_physical_device_surface_support(physical_device, index, surface)
                .map_err(VulkanError::Api)
        })?
        .resolve()
        .into_result()?;

        log::info!(
            "Picked queues (graphics: {}, present: {}, transfer: {}, compute: {})",
            queue_families.graphics,
            queue_families.present,
            queue_families.transfer,
            queue_families.compute,
        );

        let device = create_logical_device(
            &instance,
            physical_device,
            &queue_families.unique(),
            DeviceFeatureSet::required(),
        )?;
        let queues = retrieve_queues(&device, &queue_families);
        log::info!("Created device");

        Ok(Self {
            physical_device,
            device,
            queue_families,
            queues,
            instance,
        })
    }

    /// Create a device on an explicit physical device, presenting to `window`'s surface
    pub fn for_window(physical_device: vk::PhysicalDevice, window: &Window) -> VulkanResult<Self> {
        Self::new(Rc::clone(window.vulkan_instance()), physical_device, window.surface())
    }

    /// Pick a physical device with `strategy` and create a device presenting to `window`
    pub fn with_strategy(window: &Window, strategy: GpuSelectionStrategy) -> VulkanResult<Self> {
        let physical_device = GpuSelector::new(window.vulkan_instance()).select(strategy)?;
        Self::for_window(physical_device, window)
    }

    /// Name reported by the physical device
    pub fn gpu_name(&self) -> String {
        self.instance.device_name(self.physical_device)
    }

    /// The selected physical device
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    /// The logical device
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Family index per queue role
    pub fn queue_families(&self) -> &QueueFamilies {
        &self.queue_families
    }

    /// Queue handle per role
    pub fn queues(&self) -> &DeviceQueues {
        &self.queues
    }

    /// Distinct families the device was created with
    pub fn unique_queue_families(&self) -> BTreeSet<u32> {
        self.queue_families.unique()
    }
}

impl Drop for RenderDevice {
    fn drop(&mut self) {
        unsafe {
            let _ = self.device.device_wait_idle();
            self.device.destroy_device(None);
        }
        log::info!("Destroyed device");
    }
}

/// One single-queue create info per unique family
fn queue_create_infos(unique_families: &BTreeSet<u32>) -> Vec<vk::DeviceQueueCreateInfo> {
    unique_families
        .iter()
        .map(|&family| {
            vk::DeviceQueueCreateInfo::builder()
                .queue_family_index(family)
                .queue_priorities(&QUEUE_PRIORITIES)
                .build()
        })
        .collect()
}

fn create_logical_device(
    instance: &VulkanInstance,
    physical_device: vk::PhysicalDevice,
    unique_families: &BTreeSet<u32>,
    features: DeviceFeatureSet,
) -> VulkanResult<Device> {
    let queue_infos = queue_create_infos(unique_families);
    let extensions: [*const c_char; 1] = [SwapchainLoader::name().as_ptr()];

    log::debug!("Enabling device features: {}", features.enabled_names().join(", "));

    let mut tiers = features.to_tiers();
    let mut features2 = vk::PhysicalDeviceFeatures2::builder()
        .features(tiers.core)
        .push_next(&mut tiers.vulkan_11)
        .push_next(&mut tiers.vulkan_12)
        .push_next(&mut tiers.vulkan_13);

    let create_info = vk::DeviceCreateInfo::builder()
        .queue_create_infos(&queue_infos)
        .enabled_extension_names(&extensions)
        .push_next(&mut features2);

    unsafe {
        instance.instance()
            .create_device(physical_device, &create_info, None)
            .map_err(VulkanError::Api)
    }
}

fn retrieve_queues(device: &Device, families: &QueueFamilies) -> DeviceQueues {
    let queue = |role| unsafe { device.get_device_queue(families.family(role), 0) };
    DeviceQueues {
        graphics: queue(QueueRole::Graphics),
        present: queue(QueueRole::Present),
        transfer: queue(QueueRole::Transfer),
        compute: queue(QueueRole::Compute),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_queue_info_per_unique_family() {
        let families = QueueFamilies { graphics: 0, present: 0, transfer: 2, compute: 0 };
        let infos = queue_create_infos(&families.unique());

        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].queue_family_index, 0);
        assert_eq!(infos[1].queue_family_index, 2);
        for info in &infos {
            assert_eq!(info.queue_count, 1);
            let priorities = unsafe {
                std::slice::from_raw_parts(info.p_queue_priorities, info.queue_count as usize)
            };
            assert_eq!(priorities, &[1.0]);
        }
    }

    #[test]
    fn test_shared_family_collapses_to_single_queue_info() {
        let families = QueueFamilies { graphics: 3, present: 3, transfer: 3, compute: 3 };
        assert_eq!(queue_create_infos(&families.unique()).len(), 1);
    }
}
