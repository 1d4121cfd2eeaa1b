//! Device features enabled on every logical device
//!
//! Features are kept as one flat record and only turned into Vulkan's
//! version-tiered `pNext` chain when the device is created.

use ash::vk;

/// Named feature toggles across the core, 1.1, 1.2 and 1.3 feature tiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceFeatureSet {
    /// Wireframe and point polygon modes
    pub fill_mode_non_solid: bool,
    /// Geometry shader stage
    pub geometry_shader: bool,
    /// Tessellation control and evaluation stages
    pub tessellation_shader: bool,
    /// Line widths other than 1.0
    pub wide_lines: bool,
    /// Point sizes other than 1.0
    pub large_points: bool,
    /// Variable pointers (1.1)
    pub variable_pointers: bool,
    /// Variable pointers into storage buffers (1.1)
    pub variable_pointers_storage_buffer: bool,
    /// Framebuffers created without image views (1.2)
    pub imageless_framebuffer: bool,
    /// Timeline semaphores (1.2)
    pub timeline_semaphore: bool,
    /// std430-style layout for uniform buffers (1.2)
    pub uniform_buffer_standard_layout: bool,
    /// Rendering without render pass objects (1.3)
    pub dynamic_rendering: bool,
    /// Inline uniform blocks (1.3)
    pub inline_uniform_block: bool,
}

impl DeviceFeatureSet {
    /// The fixed set every render device is created with
    pub const fn required() -> Self {
        Self {
            fill_mode_non_solid: true,
            geometry_shader: true,
            tessellation_shader: true,
            wide_lines: true,
            large_points: true,
            variable_pointers: true,
            variable_pointers_storage_buffer: true,
            imageless_framebuffer: true,
            timeline_semaphore: true,
            uniform_buffer_standard_layout: true,
            dynamic_rendering: true,
            inline_uniform_block: true,
        }
    }

    /// Names of the enabled toggles, for logging
    pub fn enabled_names(&self) -> Vec<&'static str> {
        [
            (self.fill_mode_non_solid, "fillModeNonSolid"),
            (self.geometry_shader, "geometryShader"),
            (self.tessellation_shader, "tessellationShader"),
            (self.wide_lines, "wideLines"),
            (self.large_points, "largePoints"),
            (self.variable_pointers, "variablePointers"),
            (self.variable_pointers_storage_buffer, "variablePointersStorageBuffer"),
            (self.imageless_framebuffer, "imagelessFramebuffer"),
            (self.timeline_semaphore, "timelineSemaphore"),
            (self.uniform_buffer_standard_layout, "uniformBufferStandardLayout"),
            (self.dynamic_rendering, "dynamicRendering"),
            (self.inline_uniform_block, "inlineUniformBlock"),
        ]
        .into_iter()
        .filter_map(|(enabled, name)| enabled.then_some(name))
        .collect()
    }

    pub(crate) fn to_tiers(self) -> FeatureTiers {
        FeatureTiers {
            core: vk::PhysicalDeviceFeatures::builder()
                .fill_mode_non_solid(self.fill_mode_non_solid)
                .geometry_shader(self.geometry_shader)
                .tessellation_shader(self.tessellation_shader)
                .wide_lines(self.wide_lines)
                .large_points(self.large_points)
                .build(),
            vulkan_11: vk::PhysicalDeviceVulkan11Features::builder()
                .variable_pointers(self.variable_pointers)
                .variable_pointers_storage_buffer(self.variable_pointers_storage_buffer)
                .build(),
            vulkan_12: vk::PhysicalDeviceVulkan12Features::builder()
                .imageless_framebuffer(self.imageless_framebuffer)
                .timeline_semaphore(self.timeline_semaphore)
                .uniform_buffer_standard_layout(self.uniform_buffer_standard_layout)
                .build(),
            vulkan_13: vk::PhysicalDeviceVulkan13Features::builder()
                .dynamic_rendering(self.dynamic_rendering)
                .inline_uniform_block(self.inline_uniform_block)
                .build(),
        }
    }
}

/// Per-tier Vulkan feature structs, not yet linked
pub(crate) struct FeatureTiers {
    pub(crate) core: vk::PhysicalDeviceFeatures,
    pub(crate) vulkan_11: vk::PhysicalDeviceVulkan11Features,
    pub(crate) vulkan_12: vk::PhysicalDeviceVulkan12Features,
    pub(crate) vulkan_13: vk::PhysicalDeviceVulkan13Features,
}
