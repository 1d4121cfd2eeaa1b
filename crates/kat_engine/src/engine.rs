//! Engine context: GLFW, the Vulkan instance and the default render device

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::foundation::{logging, Version};
use crate::render::vulkan::{
    GpuSelectionStrategy, RenderDevice, VulkanError, VulkanInstance, Window, WindowError,
};

/// Settings consumed once, when the Vulkan instance is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Application name reported to the driver
    pub app_name: String,

    /// Application version reported to the driver
    pub app_version: Version,

    /// Request the Khronos validation layer when it is installed
    pub validation: bool,
}

impl EngineSettings {
    /// Replace the application name
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Replace the application version
    pub fn with_app_version(mut self, version: Version) -> Self {
        self.app_version = version;
        self
    }

    /// Enable or disable the validation layer request
    pub fn with_validation(mut self, validation: bool) -> Self {
        self.validation = validation;
        self
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            app_name: "UnnamedApplication".to_string(),
            app_version: Version::new(0, 1, 0),
            validation: cfg!(debug_assertions),
        }
    }
}

impl Config for EngineSettings {}

/// Engine-wide state owned by the application
///
/// Construct one per process on the main thread. Windows and render devices
/// share its Vulkan instance, so they may be dropped in any order relative to
/// the context; the default render device is always released before the
/// context's own instance handle.
///
/// `new` installs the `env_logger` backend at `info` unless the application
/// already installed a `log` backend, in which case that one is kept.
pub struct Context {
    default_render_device: Option<RenderDevice>,
    instance: Rc<VulkanInstance>,
    glfw: glfw::Glfw,
}

impl Context {
    /// Set up logging, initialize GLFW and create the Vulkan instance
    ///
    /// GLFW errors are logged and surface as `Err`, never as a panic.
    pub fn new(settings: &EngineSettings) -> EngineResult<Self> {
        logging::init();

        let glfw = glfw::init(glfw::log_errors)
            .map_err(|_| WindowError::InitializationFailed)?;
        log::info!("Initialized GLFW");

        if !glfw.vulkan_supported() {
            let reason = "GLFW reports no Vulkan loader".to_string();
            return Err(VulkanError::InitializationFailed(reason).into());
        }

        let required_extensions = glfw.get_required_instance_extensions().ok_or_else(|| {
            WindowError::GlfwError("Failed to get required extensions".to_string())
        })?;
        log::debug!("Required instance extensions: {:?}", required_extensions);

        let instance = VulkanInstance::new(settings, &required_extensions)?;

        Ok(Self {
            default_render_device: None,
            instance: Rc::new(instance),
            glfw,
        })
    }

    /// Create the default render device for `window` using `strategy`
    pub fn init_render_device(
        &mut self,
        window: &Window,
        strategy: GpuSelectionStrategy,
    ) -> EngineResult<&RenderDevice> {
        // Release any previous device before its replacement is created.
        self.default_render_device = None;

        let device = RenderDevice::with_strategy(window, strategy)?;
        log::info!("Initialized render device");
        log::info!("Selected GPU: {}", device.gpu_name());

        Ok(self.default_render_device.insert(device))
    }

    /// Drain the platform event queue; call once per loop iteration
    pub fn poll_events(&mut self) {
        self.glfw.poll_events();
    }

    /// The GLFW handle windows are created from
    pub fn glfw(&self) -> &glfw::Glfw {
        &self.glfw
    }

    /// The shared Vulkan instance
    pub fn vulkan_instance(&self) -> &Rc<VulkanInstance> {
        &self.instance
    }

    /// The raw `ash` instance
    pub fn instance(&self) -> &ash::Instance {
        self.instance.instance()
    }

    /// The device created by `init_render_device`, if any
    pub fn default_render_device(&self) -> Option<&RenderDevice> {
        self.default_render_device.as_ref()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.default_render_device = None;
        log::info!("Engine context terminated");
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Vulkan instance or device failure
    #[error(transparent)]
    Vulkan(#[from] VulkanError),

    /// Windowing failure
    #[error(transparent)]
    Window(#[from] WindowError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = EngineSettings::default();
        assert_eq!(settings.app_name, "UnnamedApplication");
        assert_eq!(settings.app_version, Version::new(0, 1, 0));
    }

    #[test]
    fn test_settings_builders() {
        let settings = EngineSettings::default()
            .with_app_name("Sample")
            .with_app_version(Version::new(2, 0, 1))
            .with_validation(false);
        assert_eq!(settings.app_name, "Sample");
        assert_eq!(settings.app_version.to_string(), "2.0.1");
        assert!(!settings.validation);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: EngineSettings = toml::from_str("app_name = \"Hello\"").unwrap();
        assert_eq!(settings.app_name, "Hello");
        assert_eq!(settings.app_version, Version::default());
    }

    #[test]
    fn test_config_file_round_trip() {
        let file_name = format!("kat_engine_settings_{}.ron", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        let path = path.to_string_lossy().into_owned();
        let settings = EngineSettings::default()
            .with_app_name("Saved")
            .with_app_version(Version::new(1, 4, 2));

        settings.save_to_file(&path).unwrap();
        let loaded = EngineSettings::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_config_falls_back_to_default() {
        let loaded = EngineSettings::load_or_default("definitely/not/here/kat.toml").unwrap();
        assert_eq!(loaded, EngineSettings::default());
    }

    #[test]
    fn test_unsupported_config_format() {
        let err = EngineSettings::default().save_to_file("settings.json").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_strategy_error_converts_to_engine_error() {
        let err: EngineError = "best".parse::<GpuSelectionStrategy>().unwrap_err().into();
        assert!(matches!(err, EngineError::Config(ConfigError::UnknownStrategy(_))));
    }
}
