use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use flyview_camera::Camera;
use flyview_input::{InputState, MoveKey};
use flyview_render::{
    FramePacer, FrameStats, FrameTransforms, MeshData, MeshHandle, MeshRegistry, Projection, Spin,
};
use flyview_render_wgpu::{GpuContext, MeshRenderer, load_shader};
use glam::Mat4;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::config::AppConfig;

/// Frames per rolling stats window logged at debug level.
const STATS_WINDOW: usize = 120;

/// Everything the frame loop touches, built once when the window exists.
struct AppContext {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: MeshRenderer,
    meshes: MeshRegistry,
    mesh: MeshHandle,
    camera: Camera,
    input: InputState,
    transforms: FrameTransforms,
    move_speed: f32,
    pacer: FramePacer,
    stats: FrameStats,
    frame: u64,
    next_frame_at: Instant,
}

impl AppContext {
    fn new(event_loop: &ActiveEventLoop, config: &AppConfig) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(config.width, config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone(), size.width, size.height)
            .context("failed to initialize GPU")?;

        let mut meshes = MeshRegistry::new();
        let mesh = meshes.insert(MeshData::for_kind(config.mesh))?;

        let shader = load_shader(config.shader.as_deref())?;
        let (width, height) = gpu.size();
        let mut renderer = MeshRenderer::new(gpu.device(), gpu.format(), width, height, &shader)
            .context("failed to create graphics pipeline")?;
        renderer.upload_all(gpu.device(), &meshes);

        let ctx = Self {
            window,
            gpu,
            renderer,
            meshes,
            mesh,
            camera: Camera::default(),
            input: InputState::default(),
            transforms: FrameTransforms::new(
                Projection::for_viewport(width, height),
                Spin::new(config.spin_step),
            ),
            move_speed: config.move_speed,
            pacer: FramePacer::new(config.target_fps),
            stats: FrameStats::new(STATS_WINDOW),
            frame: 0,
            next_frame_at: Instant::now(),
        };

        let center = PhysicalPosition::new(width / 2, height / 2);
        if let Err(e) = ctx.window.set_cursor_position(center) {
            tracing::debug!("could not center cursor: {e}");
        }
        apply_capture(&ctx.window, ctx.input.is_captured());

        tracing::info!(
            mesh = %ctx.meshes.get(mesh).map_or("?", |m| m.name.as_str()),
            budget_ms = ctx.pacer.budget().as_millis() as u64,
            "scene ready"
        );
        Ok(ctx)
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.gpu.resize(size.width, size.height);
        let (width, height) = self.gpu.size();
        self.renderer.resize(self.gpu.device(), width, height);
        self.transforms.projection.resize(width, height);
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) {
        if key == KeyCode::Escape {
            if pressed && !repeat {
                let captured = self.input.toggle_capture();
                apply_capture(&self.window, captured);
            }
            return;
        }
        if let Some(move_key) = move_key(key) {
            self.input.set_key(move_key, pressed);
        }
    }

    /// One tick: input, camera, transform upload, draw, present, pacing.
    fn redraw(&mut self) -> Result<()> {
        let frame_start = Instant::now();

        // Skipped frames leave the camera and spin untouched.
        let Some(output) = self.gpu.acquire()? else {
            self.next_frame_at = Instant::now();
            return Ok(());
        };

        let transform = advance_frame(
            &mut self.input,
            &mut self.camera,
            &mut self.transforms,
            self.move_speed,
        );
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.renderer.render(
            self.gpu.device(),
            self.gpu.queue(),
            &view,
            self.mesh,
            transform,
        )?;
        self.window.pre_present_notify();
        output.present();
        self.frame += 1;

        let elapsed = frame_start.elapsed();
        if self.stats.record(elapsed) {
            tracing::debug!(
                frame = self.frame,
                avg_us = self.stats.average().as_micros() as u64,
                min_us = self.stats.min().as_micros() as u64,
                max_us = self.stats.max().as_micros() as u64,
                over_budget = self.stats.over_budget(self.pacer.budget()),
                "frame times"
            );
        }

        self.next_frame_at = self.pacer.finish(elapsed).next_frame_at(Instant::now());
        Ok(())
    }
}

/// Apply pending input to the camera, spin the model, and return the frame's
/// combined transform. Only called for frames that will be drawn.
fn advance_frame(
    input: &mut InputState,
    camera: &mut Camera,
    transforms: &mut FrameTransforms,
    move_speed: f32,
) -> Mat4 {
    input.drive(camera, move_speed);
    transforms.next_frame(camera)
}

fn move_key(key: KeyCode) -> Option<MoveKey> {
    match key {
        KeyCode::KeyW => Some(MoveKey::Forward),
        KeyCode::KeyS => Some(MoveKey::Backward),
        KeyCode::KeyA => Some(MoveKey::Left),
        KeyCode::KeyD => Some(MoveKey::Right),
        _ => None,
    }
}

/// Grab and hide the cursor while captured; release and show it otherwise.
fn apply_capture(window: &Window, captured: bool) {
    let grab = if captured {
        window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
    } else {
        window.set_cursor_grab(CursorGrabMode::None)
    };
    if let Err(e) = grab {
        tracing::warn!("cursor grab change failed: {e}");
    }
    window.set_cursor_visible(!captured);
}

/// winit handler owning the config and, once resumed, the app context.
pub struct FlyviewApp {
    config: AppConfig,
    context: Option<AppContext>,
    error: Option<anyhow::Error>,
}

impl FlyviewApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            context: None,
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for FlyviewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.context.is_some() {
            return;
        }
        match AppContext::new(event_loop, &self.config) {
            Ok(ctx) => self.context = Some(ctx),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(ctx) = &mut self.context else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!(frames = ctx.frame, "goodbye");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => ctx.resize(new_size),
            WindowEvent::Focused(false) => ctx.input.release_all(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => ctx.handle_key(key, state == ElementState::Pressed, repeat),
            WindowEvent::RedrawRequested => {
                if let Err(e) = ctx.redraw() {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let (Some(ctx), DeviceEvent::MouseMotion { delta }) = (&mut self.context, event) {
            ctx.input.mouse_motion(delta.0 as f32, delta.1 as f32);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ctx) = &self.context else {
            return;
        };
        if Instant::now() >= ctx.next_frame_at {
            ctx.window.request_redraw();
            event_loop.set_control_flow(ControlFlow::Wait);
        } else {
            event_loop.set_control_flow(ControlFlow::WaitUntil(ctx.next_frame_at));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn wasd_maps_to_move_keys() {
        assert_eq!(move_key(KeyCode::KeyW), Some(MoveKey::Forward));
        assert_eq!(move_key(KeyCode::KeyS), Some(MoveKey::Backward));
        assert_eq!(move_key(KeyCode::KeyA), Some(MoveKey::Left));
        assert_eq!(move_key(KeyCode::KeyD), Some(MoveKey::Right));
        assert_eq!(move_key(KeyCode::Space), None);
        assert_eq!(move_key(KeyCode::Escape), None);
    }

    #[test]
    fn input_waits_for_the_next_drawn_frame() {
        let mut input = InputState::default();
        let mut camera = Camera::default();
        let mut transforms = FrameTransforms::default();

        // motion and held keys from a frame whose surface was not acquired
        input.mouse_motion(450.0, 0.0);
        input.set_key(MoveKey::Left, true);
        input.mouse_motion(450.0, 0.0);
        assert_eq!(camera, Camera::default());
        assert_eq!(transforms.spin.angle, 0.0);

        let transform = advance_frame(&mut input, &mut camera, &mut transforms, 0.5);
        assert!(camera.facing().abs_diff_eq(Vec3::X, 1e-4));
        assert!(camera.position().abs_diff_eq(Vec3::new(-0.5, 0.0, 5.0), 1e-6));
        assert!((transforms.spin.angle - transforms.spin.step).abs() < 1e-7);
        assert_eq!(transform, transforms.combined(camera.view_matrix()));
        assert_eq!(input.look_delta(), Vec2::ZERO);
    }

    #[test]
    fn app_starts_without_context() {
        let mut app = FlyviewApp::new(AppConfig::default());
        assert!(app.context.is_none());
        assert!(app.take_error().is_none());
    }
}
