//! Vulkan instance creation and teardown
//!
//! The instance is shared through `Rc` by the context, every window surface and
//! every render device, so it is destroyed only after the last of them drops.

use ash::extensions::ext::DebugUtils;
use ash::extensions::khr::Surface;
use ash::{vk, Entry, Instance};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use thiserror::Error;

use crate::engine::EngineSettings;
use crate::render::vulkan::queue_families::QueueRole;

/// Engine name reported to the driver
pub const ENGINE_NAME: &str = "KatEngine";

const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Vulkan-specific error types
#[derive(Error, Debug)]
pub enum VulkanError {
    /// General Vulkan API error with result code
    #[error("Vulkan API error: {0:?}")]
    Api(vk::Result),

    /// Vulkan initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// The instance reports no physical devices
    #[error("No Vulkan-capable GPU found")]
    NoPhysicalDevice,

    /// Queue-family discovery could not fill a required role on the chosen GPU
    #[error("No {0} queue family found on the selected GPU")]
    MissingQueueFamily(QueueRole),
}

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;

/// Vulkan instance wrapper with RAII cleanup
pub struct VulkanInstance {
    entry: Entry,
    instance: Instance,
    surface_loader: Surface,
    debug_utils: Option<(DebugUtils, vk::DebugUtilsMessengerEXT)>,
}

impl VulkanInstance {
    /// Create the instance for `settings`
    ///
    /// `required_extensions` are the windowing extensions GLFW needs for surfaces.
    pub fn new(settings: &EngineSettings, required_extensions: &[String]) -> VulkanResult<Self> {
        let entry = unsafe { Entry::load() }
            .map_err(|e| {
                VulkanError::InitializationFailed(format!("Failed to load Vulkan: {:?}", e))
            })?;

        let app_name = to_cstring(&settings.app_name)?;
        let engine_name = to_cstring(ENGINE_NAME)?;
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(settings.app_version.to_vulkan())
            .engine_name(&engine_name)
            .engine_version(crate::ENGINE_VERSION.to_vulkan())
            .api_version(vk::API_VERSION_1_3);

        let enable_validation = settings.validation && validation_layer_available(&entry);
        if settings.validation && !enable_validation {
            log::warn!("{} requested but not installed, continuing without it", VALIDATION_LAYER);
        }

        let mut extension_names = required_extensions
            .iter()
            .map(|ext| to_cstring(ext))
            .collect::<VulkanResult<Vec<CString>>>()?;
        if enable_validation {
            extension_names.push(DebugUtils::name().to_owned());
        }
        let extension_ptrs: Vec<*const c_char> =
            extension_names.iter().map(|ext| ext.as_ptr()).collect();

        let layer_names = if enable_validation {
            vec![to_cstring(VALIDATION_LAYER)?]
        } else {
            Vec::new()
        };
        let layer_ptrs: Vec<*const c_char> = layer_names.iter().map(|name| name.as_ptr()).collect();

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs);

        let instance = unsafe {
            entry.create_instance(&create_info, None)
                .map_err(VulkanError::Api)?
        };
        log::info!(
            "Created Vulkan instance for {} {} ({} extension(s), validation {})",
            settings.app_name,
            settings.app_version,
            extension_ptrs.len(),
            if enable_validation { "on" } else { "off" },
        );

        let debug_utils = if enable_validation {
            let loader = DebugUtils::new(&entry, &instance);
            match setup_debug_messenger(&loader) {
                Ok(messenger) => Some((loader, messenger)),
                Err(e) => {
                    unsafe { instance.destroy_instance(None) };
                    return Err(e);
                }
            }
        } else {
            None
        };

        let surface_loader = Surface::new(&entry, &instance);

        Ok(Self {
            entry,
            instance,
            surface_loader,
            debug_utils,
        })
    }

    /// Get a reference to the Vulkan entry
    pub fn entry(&self) -> &Entry {
        &self.entry
    }

    /// Get a reference to the Vulkan instance
    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// Raw instance handle, as consumed by GLFW surface creation
    pub fn handle(&self) -> vk::Instance {
        self.instance.handle()
    }

    /// Get the surface extension loader
    pub fn surface_loader(&self) -> &Surface {
        &self.surface_loader
    }

    /// Enumerate physical devices in driver order
    pub fn enumerate_physical_devices(&self) -> VulkanResult<Vec<vk::PhysicalDevice>> {
        unsafe {
            self.instance.enumerate_physical_devices()
                .map_err(VulkanError::Api)
        }
    }

    /// Human-readable device name from the physical device properties
    pub fn device_name(&self, physical_device: vk::PhysicalDevice) -> String {
        let properties = unsafe { self.instance.get_physical_device_properties(physical_device) };
        unsafe { CStr::from_ptr(properties.device_name.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        unsafe {
            if let Some((loader, messenger)) = self.debug_utils.take() {
                loader.destroy_debug_utils_messenger(messenger, None);
            }
            self.instance.destroy_instance(None);
        }
        log::info!("Destroyed Vulkan instance");
    }
}

fn to_cstring(value: &str) -> VulkanResult<CString> {
    CString::new(value)
        .map_err(|_| VulkanError::InitializationFailed(format!("Interior NUL byte in {:?}", value)))
}

fn validation_layer_available(entry: &Entry) -> bool {
    #[allow(unused_unsafe)]
    let layers = match unsafe { entry.enumerate_instance_layer_properties() } {
        Ok(layers) => layers,
        Err(e) => {
            log::warn!("Could not enumerate instance layers: {:?}", e);
            return false;
        }
    };
    layers.iter().any(|layer| {
        let name = unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) };
        name.to_bytes() == VALIDATION_LAYER.as_bytes()
    })
}

fn setup_debug_messenger(debug_utils: &DebugUtils) -> VulkanResult<vk::DebugUtilsMessengerEXT> {
    let create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
        )
        .pfn_user_callback(Some(debug_callback));

    unsafe {
        debug_utils.create_debug_utils_messenger(&create_info, None)
            .map_err(VulkanError::Api)
    }
}

/// Debug callback for validation layers
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    if callback_data.is_null() || (*callback_data).p_message.is_null() {
        return vk::FALSE;
    }
    let message = CStr::from_ptr((*callback_data).p_message).to_string_lossy();

    if message_severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        log::error!("[Vulkan] {:?} - {}", message_type, message);
    } else if message_severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        log::warn!("[Vulkan] {:?} - {}", message_type, message);
    } else {
        log::debug!("[Vulkan] {:?} - {}", message_type, message);
    }

    vk::FALSE
}
