//! End-to-end bootstrap against a real display and Vulkan driver
//!
//! Run with `cargo test -p kat_engine -- --ignored` on a machine with a GPU.

use kat_engine::prelude::*;
use kat_engine::render::vulkan::GpuSelector;

fn hello_window() -> WindowSettings {
    WindowSettings {
        title: "Hello!".to_string(),
        width: 800,
        height: 600,
    }
}

#[test]
#[ignore = "requires a display and a Vulkan driver"]
fn test_window_and_naive_device() {
    let settings = EngineSettings::default().with_app_name("bootstrap-test").with_validation(false);
    let mut context = Context::new(&settings).expect("context");
    let window = Window::new(&context, &hello_window()).expect("window");

    let first = context
        .vulkan_instance()
        .enumerate_physical_devices()
        .expect("enumerate")[0];
    let expected_name = context.vulkan_instance().device_name(first);

    let device = context
        .init_render_device(&window, GpuSelectionStrategy::Naive)
        .expect("render device");

    assert!(!window.should_close());
    assert!(!device.gpu_name().is_empty());
    assert_eq!(device.gpu_name(), expected_name);
    assert_eq!(device.physical_device(), first);

    let families = device.queue_families();
    assert!(device.unique_queue_families().contains(&families.graphics));
    assert_eq!(device.unique_queue_families().len(), {
        let mut all = vec![
            families.graphics,
            families.present,
            families.transfer,
            families.compute,
        ];
        all.sort_unstable();
        all.dedup();
        all.len()
    });
}

#[test]
#[ignore = "requires a display and a Vulkan driver"]
fn test_explicit_physical_device_matches_selector() {
    let settings = EngineSettings::default().with_validation(false);
    let context = Context::new(&settings).expect("context");
    let window = Window::new(&context, &hello_window()).expect("window");

    let selected = GpuSelector::new(context.vulkan_instance())
        .select(GpuSelectionStrategy::Naive)
        .expect("selection");
    let device = RenderDevice::for_window(selected, &window).expect("render device");

    assert_eq!(device.physical_device(), selected);
    assert_eq!(device.queues().graphics, device.queues().get(QueueRole::Graphics));
    assert!(context.default_render_device().is_none());
}
