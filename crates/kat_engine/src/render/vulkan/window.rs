//! Window management using GLFW
//!
//! A `Window` is a fixed-size GLFW window with no client API, paired with a
//! Vulkan surface created against the context's instance. The window keeps the
//! instance alive until its surface has been destroyed.

use ash::vk;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use thiserror::Error;

use crate::engine::Context;
use crate::render::vulkan::instance::VulkanInstance;

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// `glfwInit` failed, e.g. no display is available
    #[error("GLFW initialization failed")]
    InitializationFailed,

    /// `glfwCreateWindow` returned no window
    #[error("Window creation failed")]
    CreationFailed,

    /// Other GLFW failure
    #[error("GLFW error: {0}")]
    GlfwError(String),

    /// `glfwCreateWindowSurface` failed
    #[error("Failed to create Vulkan surface: {0:?}")]
    SurfaceCreation(vk::Result),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Title and size of a new window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Window title
    pub title: String,
    /// Width in screen coordinates
    pub width: u32,
    /// Height in screen coordinates
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Window".to_string(),
            width: 600,
            height: 800,
        }
    }
}

/// GLFW window wrapper with its presentation surface
pub struct Window {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    surface: vk::SurfaceKHR,
    instance: Rc<VulkanInstance>,
}

impl Window {
    /// Create a window and its surface on `context`'s instance
    pub fn new(context: &Context, settings: &WindowSettings) -> WindowResult<Self> {
        let mut glfw = context.glfw().clone();

        glfw.default_window_hints();
        glfw.window_hint(glfw::WindowHint::Resizable(false));
        glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));

        let (mut window, events) = glfw
            .create_window(
                settings.width,
                settings.height,
                &settings.title,
                glfw::WindowMode::Windowed,
            )
            .ok_or(WindowError::CreationFailed)?;

        window.set_key_polling(true);
        window.set_close_polling(true);
        log::info!(
            "Created window \"{}\" ({}x{})",
            settings.title,
            settings.width,
            settings.height
        );

        let instance = Rc::clone(context.vulkan_instance());
        let mut surface = vk::SurfaceKHR::null();
        let result =
            window.create_window_surface(instance.handle(), std::ptr::null(), &mut surface);
        if result != vk::Result::SUCCESS {
            return Err(WindowError::SurfaceCreation(result));
        }
        log::info!("Created window surface");

        Ok(Self {
            glfw,
            window,
            events,
            surface,
            instance,
        })
    }

    /// Whether the platform asked for the window to close
    pub fn should_close(&self) -> bool {
        self.window.should_close()
    }

    /// Request or cancel closing the window
    pub fn set_should_close(&mut self, should_close: bool) {
        self.window.set_should_close(should_close);
    }

    /// Pump the platform event queue; call once per loop iteration
    pub fn poll_events(&mut self) {
        self.glfw.poll_events();
    }

    /// Drain the events queued for this window since the last call
    pub fn flush_events(&self) -> glfw::FlushedMessages<'_, (f64, glfw::WindowEvent)> {
        glfw::flush_messages(&self.events)
    }

    /// Window size in screen coordinates
    pub fn size(&self) -> (u32, u32) {
        let (width, height) = self.window.get_size();
        (width.max(0) as u32, height.max(0) as u32)
    }

    /// The Vulkan surface bound to this window
    pub fn surface(&self) -> vk::SurfaceKHR {
        self.surface
    }

    /// The instance the surface was created against
    pub fn vulkan_instance(&self) -> &Rc<VulkanInstance> {
        &self.instance
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        unsafe {
            self.instance.surface_loader().destroy_surface(self.surface, None);
        }
        log::info!("Destroyed window");
    }
}
