//! Rendering backends

pub mod vulkan;

pub use vulkan::{GpuSelectionStrategy, RenderDevice, Window, WindowSettings};
