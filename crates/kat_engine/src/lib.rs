//! # Kat Engine
//!
//! Bootstraps a Vulkan application: a GLFW window with its surface, a physical
//! GPU picked by a selection strategy, and a logical device with graphics,
//! present, transfer and compute queues.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kat_engine::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     let settings = EngineSettings::default().with_app_name("Hello");
//!     let mut context = Context::new(&settings)?;
//!     let window = Window::new(&context, &WindowSettings {
//!         title: "Hello!".to_string(),
//!         width: 800,
//!         height: 600,
//!     })?;
//!
//!     context.init_render_device(&window, GpuSelectionStrategy::Naive)?;
//!
//!     while !window.should_close() {
//!         context.poll_events();
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod foundation;
pub mod render;

mod engine;

pub use engine::{Context, EngineError, EngineResult, EngineSettings};

use foundation::Version;

/// Engine version reported to the driver
pub const ENGINE_VERSION: Version = Version::new(0, 1, 0);

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Context, EngineError, EngineResult, EngineSettings,
        config::{Config, ConfigError},
        foundation::Version,
        render::vulkan::{
            GpuSelectionStrategy, RenderDevice, QueueRole, Window, WindowSettings,
        },
    };
}
