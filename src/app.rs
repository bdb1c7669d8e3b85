//! The windowed application shell.
//!
//! [`run`] owns the winit event loop and drives the fixed per-frame
//! contract: each redraw runs the app's frame callback, then
//! [`Scene::update`], then one [`ScenePass::frame`]; window resizes
//! reconfigure the surface and fan the new aspect ratio out to every camera.
//! One frame always runs to completion before the next begins.

use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::gpu::GpuContext;
use crate::input::Input;
use crate::scene::Scene;
use crate::scene_pass::ScenePass;

/// Window configuration for [`run_with_config`].
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Argos".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Runs an application with the default window configuration.
///
/// `setup` receives the GPU context once, builds the scene (meshes, actors,
/// cameras), and returns the per-frame callback. The callback runs first
/// each frame, before camera input is applied, and receives the scene, the
/// polled input, the frame's delta time, and the total elapsed time.
///
/// # Example
/// ```ignore
/// argos::run(|gpu| {
///     let mut scene = Scene::new();
///     scene.add_camera(Camera::new(gpu.aspect()));
///     // ... add actors ...
///     (scene, move |scene: &mut Scene, input: &Input, dt: f32, total: f32| {
///         // per-frame app logic
///     })
/// });
/// ```
pub fn run<S, F>(setup: S)
where
    S: FnOnce(&GpuContext) -> (Scene, F) + 'static,
    F: FnMut(&mut Scene, &Input, f32, f32) + 'static,
{
    run_with_config(AppConfig::default(), setup);
}

/// Runs an application with a custom window configuration.
pub fn run_with_config<S, F>(config: AppConfig, setup: S)
where
    S: FnOnce(&GpuContext) -> (Scene, F) + 'static,
    F: FnMut(&mut Scene, &Input, f32, f32) + 'static,
{
    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::Pending {
        config,
        setup: Some(Box::new(move |gpu| {
            let (scene, frame_fn) = setup(gpu);
            (scene, Box::new(frame_fn) as FrameFn)
        })),
    };

    event_loop.run_app(&mut app).unwrap();
}

type FrameFn = Box<dyn FnMut(&mut Scene, &Input, f32, f32)>;
type SetupFn = Box<dyn FnOnce(&GpuContext) -> (Scene, FrameFn)>;

enum App {
    Pending {
        config: AppConfig,
        setup: Option<SetupFn>,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        scene: Scene,
        pass: ScenePass,
        input: Input,
        frame_fn: FrameFn,
        start_time: Instant,
        last_frame: Instant,
    },
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let App::Pending { config, setup } = self {
            let window_attrs = WindowAttributes::default()
                .with_title(&config.title)
                .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

            let window = Arc::new(event_loop.create_window(window_attrs).unwrap());

            let gpu = match GpuContext::new(window.clone()) {
                Ok(gpu) => gpu,
                Err(e) => {
                    // Startup resource failure is fatal, never retried.
                    log::error!("GPU initialization failed: {e}");
                    event_loop.exit();
                    return;
                }
            };

            let setup_fn = setup.take().unwrap();
            let (scene, frame_fn) = setup_fn(&gpu);
            let pass = ScenePass::new(&gpu);
            log::info!(
                "scene ready: {} actors, {} cameras",
                scene.actors().len(),
                scene.cameras().len()
            );

            *self = App::Running {
                window,
                gpu,
                scene,
                pass,
                input: Input::new(),
                frame_fn,
                start_time: Instant::now(),
                last_frame: Instant::now(),
            };
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let App::Running {
            window,
            gpu,
            scene,
            pass,
            input,
            frame_fn,
            start_time,
            last_frame,
        } = self
        else {
            return;
        };

        input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
                scene.resize(gpu.aspect());
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let total = start_time.elapsed().as_secs_f32();
                let dt = now.duration_since(*last_frame).as_secs_f32();
                *last_frame = now;

                // Update phase: app logic first, then camera input.
                frame_fn(scene, input, dt, total);
                scene.update(input, dt);

                if scene.quit_requested() {
                    event_loop.exit();
                    return;
                }

                // Upload/draw/present phase.
                match pass.frame(gpu, scene) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                        log::warn!("surface lost, reconfiguring");
                        gpu.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of GPU memory, exiting");
                        event_loop.exit();
                        return;
                    }
                    Err(e) => {
                        log::warn!("dropped frame: {e}");
                    }
                }

                input.end_frame();
                window.request_redraw();
            }
            _ => {}
        }
    }
}
