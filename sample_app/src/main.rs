//! Hello window sample
//!
//! Opens an 800x600 window, creates the default render device and pumps
//! events until the window is closed or Escape is pressed.

use glfw::{Action, Key, WindowEvent};
use kat_engine::foundation::logging;
use kat_engine::prelude::*;
use serde::{Deserialize, Serialize};

const CONFIG_PATH: &str = "kat.toml";

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct SampleConfig {
    engine: EngineSettings,
    window: WindowSettings,
    gpu_strategy: String,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            engine: EngineSettings::default().with_app_name("HelloWindow"),
            window: WindowSettings {
                title: "Hello!".to_string(),
                width: 800,
                height: 600,
            },
            gpu_strategy: GpuSelectionStrategy::Naive.to_string(),
        }
    }
}

impl Config for SampleConfig {}

fn run(context: &mut Context, config: &SampleConfig) -> EngineResult<()> {
    let strategy: GpuSelectionStrategy = config.gpu_strategy.parse()?;
    let mut window = Window::new(context, &config.window)?;

    context.init_render_device(&window, strategy)?;

    while !window.should_close() {
        context.poll_events();

        let escape_pressed = window
            .flush_events()
            .any(|(_, event)| matches!(event, WindowEvent::Key(Key::Escape, _, Action::Press, _)));
        if escape_pressed {
            window.set_should_close(true);
        }
    }

    log::info!("Window closed");
    Ok(())
}

fn main() {
    logging::init_with_level(log::LevelFilter::Info);

    let config = match SampleConfig::load_or_default(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Fatal error: {}", e);
            std::process::exit(1);
        }
    };

    let result = Context::new(&config.engine).and_then(|mut context| run(&mut context, &config));

    if let Err(e) = result {
        log::error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}
