//! Renders a hand-built UI command stream through the lumen engine.
//!
//! Stands in for a layout pass: every frame `scene::DemoScene` records panels,
//! borders, a clipped scrolling list and live stats into a `CommandList`.

mod scene;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use lumen_engine::core::{App, AppControl, FrameCtx};
use lumen_engine::device::GpuInit;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::paint::Color;
use lumen_engine::render::{EngineConfig, RenderEngine};
use lumen_engine::scene::CommandList;
use lumen_engine::text::{FontId, FontSystem};
use lumen_engine::window::{Runtime, RuntimeConfig};

use scene::DemoScene;

fn main() -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,wgpu_core=warn,wgpu_hal=warn".into());
    init_logging(LoggingConfig::with_filter(filter));

    let mut fonts = FontSystem::new();
    let font = fonts
        .load_font(&load_font()?)
        .context("failed to parse UI font")?;

    let config = RuntimeConfig {
        title: "lumen demo".to_string(),
        initial_size: LogicalSize::new(820.0, 560.0),
        ..RuntimeConfig::default()
    };
    Runtime::run(config, GpuInit::default(), Demo::new(fonts, font))
}

fn load_font() -> Result<Vec<u8>> {
    [
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
    .context("no usable system font found (looked for DejaVuSans and NotoSans)")
}

struct Demo {
    // Moved into the engine on the first frame, once a device exists.
    fonts: Option<FontSystem>,
    engine: Option<RenderEngine>,
    scene: DemoScene,
    commands: CommandList,
}

impl Demo {
    fn new(fonts: FontSystem, font: FontId) -> Self {
        Self {
            fonts: Some(fonts),
            engine: None,
            scene: DemoScene::new(font),
            commands: CommandList::new(),
        }
    }
}

impl App for Demo {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if event.state == ElementState::Pressed && event.logical_key == Key::Named(NamedKey::Escape) {
                return AppControl::Exit;
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.engine.is_none() {
            let Some(fonts) = self.fonts.take() else {
                return AppControl::Exit;
            };
            let config = EngineConfig {
                clear_color: Color::from_srgb_u8(18, 20, 26, 255),
                ..EngineConfig::default()
            };
            match RenderEngine::new(&ctx.render_ctx(), fonts, config) {
                Ok(engine) => self.engine = Some(engine),
                Err(err) => {
                    log::error!("failed to create render engine: {err}");
                    return AppControl::Exit;
                }
            }
        }
        let Some(engine) = self.engine.as_mut() else {
            return AppControl::Exit;
        };

        let (w, h) = ctx.window.logical_size();
        self.commands.clear();
        self.scene.build(&mut self.commands, w, h, ctx.time.dt, engine.stats());

        let commands = &self.commands;
        let dt = ctx.time.dt;
        ctx.render(|rctx, target| {
            engine.prepare(rctx, commands.commands(), dt)?;
            engine.draw(rctx, target)?;
            Ok(())
        })
    }

    fn on_exit(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.shutdown();
        }
    }
}
