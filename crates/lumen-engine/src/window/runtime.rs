use std::collections::HashMap;

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::FrameClock;

/// When a window gets a new frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum RedrawMode {
    /// After every event-loop iteration.
    #[default]
    Continuous,
    /// On resize, on expose, or after [`RuntimeCtx::request_redraw`].
    OnDemand,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    /// Inner size in logical pixels.
    pub initial_size: LogicalSize<f64>,
    pub redraw: RedrawMode,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            redraw: RedrawMode::Continuous,
        }
    }
}

/// Requests made from inside an [`App`] callback.
///
/// Nothing happens until the callback returns; requests then apply in the
/// order they were made.
#[derive(Default)]
pub struct RuntimeCtx {
    requests: Vec<Request>,
}

impl RuntimeCtx {
    pub fn open_window(&mut self, config: RuntimeConfig) {
        self.requests.push(Request::Open(config));
    }

    pub fn close_window(&mut self, id: WindowId) {
        self.requests.push(Request::Close(id));
    }

    /// Schedules one more frame for `id`. Only needed with
    /// [`RedrawMode::OnDemand`].
    pub fn request_redraw(&mut self, id: WindowId) {
        self.requests.push(Request::Redraw(id));
    }

    pub fn exit(&mut self) {
        self.requests.push(Request::Exit);
    }
}

enum Request {
    Open(RuntimeConfig),
    Close(WindowId),
    Redraw(WindowId),
    Exit,
}

pub struct Runtime;

impl Runtime {
    /// Opens the first window and drives the event loop until the app exits or
    /// the last window closes.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut host = Host {
            first: Some(config),
            gpu_init,
            app,
            slots: HashMap::new(),
            quit: false,
        };

        event_loop
            .run_app(&mut host)
            .context("event loop terminated with error")
    }
}

/// A window plus the surface/device pair that borrows it.
#[self_referencing]
struct Slot {
    clock: FrameClock,
    redraw: RedrawMode,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl Slot {
    fn open(event_loop: &ActiveEventLoop, config: RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title)
            .with_inner_size(config.initial_size);
        let window = event_loop.create_window(attrs).context("failed to create window")?;

        SlotTryBuilder {
            clock: FrameClock::new(),
            redraw: config.redraw,
            window,
            gpu_builder: |window| pollster::block_on(Gpu::new(window, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")
    }

    fn id(&self) -> WindowId {
        self.with_window(|w| w.id())
    }

    fn is_continuous(&self) -> bool {
        self.with_redraw(|mode| *mode == RedrawMode::Continuous)
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }

    /// Reconfigures the surface to the window's current inner size.
    fn sync_size(&mut self) {
        let size = self.with_window(|w| w.inner_size());
        self.with_gpu_mut(|gpu| gpu.resize(size));
    }
}

struct Host<A: App + 'static> {
    /// Config for the window opened on the first `resumed`.
    first: Option<RuntimeConfig>,
    gpu_init: GpuInit,
    app: A,

    slots: HashMap<WindowId, Slot>,
    quit: bool,
}

impl<A: App + 'static> Host<A> {
    fn open(&mut self, event_loop: &ActiveEventLoop, config: RuntimeConfig) {
        match Slot::open(event_loop, config, self.gpu_init.clone()) {
            Ok(slot) => {
                let id = slot.id();
                log::info!("window {id:?} opened");
                slot.request_redraw();
                self.slots.insert(id, slot);
            }
            Err(e) => {
                log::error!("failed to open window: {e:#}");
                self.quit = true;
            }
        }
    }

    fn close(&mut self, id: WindowId) {
        if self.slots.remove(&id).is_some() {
            log::debug!("window {id:?} closed");
        }
        if self.slots.is_empty() {
            self.quit = true;
        }
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, ctx: RuntimeCtx) {
        for request in ctx.requests {
            match request {
                Request::Open(config) => self.open(event_loop, config),
                Request::Close(id) => self.close(id),
                Request::Redraw(id) => {
                    if let Some(slot) = self.slots.get(&id) {
                        slot.request_redraw();
                    }
                }
                Request::Exit => self.quit = true,
            }
        }
    }

    /// Stops the loop once a quit is pending. Returns whether it did.
    fn settle(&self, event_loop: &ActiveEventLoop) -> bool {
        if self.quit {
            event_loop.exit();
        }
        self.quit
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop, id: WindowId) {
        let Some(slot) = self.slots.get_mut(&id) else {
            return;
        };

        let mut runtime = RuntimeCtx::default();
        let app = &mut self.app;
        let control = slot.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx { id, window: fields.window },
                gpu: fields.gpu,
                time: fields.clock.tick(),
                runtime: &mut runtime,
            };
            app.on_frame(&mut ctx)
        });

        if control == AppControl::Exit {
            runtime.exit();
        }
        self.apply(event_loop, runtime);
    }
}

impl<A: App + 'static> ApplicationHandler for Host<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(config) = self.first.take() {
            self.open(event_loop, config);
        }
        self.settle(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.settle(event_loop) {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);
        for slot in self.slots.values().filter(|s| s.is_continuous()) {
            slot.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.settle(event_loop) {
            return;
        }

        if self.app.on_window_event(id, &event) == AppControl::Exit {
            self.quit = true;
            self.settle(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.close(id),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(slot) = self.slots.get_mut(&id) {
                    slot.sync_size();
                    slot.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.frame(event_loop, id),
            _ => {}
        }

        self.settle(event_loop);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.app.on_exit();
        // Surfaces go before winit tears down the windows they borrow.
        self.slots.clear();
    }
}
