mod icon;

use anyhow::{Context as _, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use icon::{ICON_SIZE, IconExporter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use trailrun_common::ViewerConfig;
use trailrun_input::{InputEvent, Key};
use trailrun_kernel::{FrameOrchestrator, FrameOutput, ViewerState};
use trailrun_render::FrameDraw;
use trailrun_render_wgpu::{GpuContext, PendingCapture, TerrainRenderer};
use trailrun_terrain::TerrainMesh;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, Touch, TouchPhase, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "trailrun-desktop", about = "First-person terrain viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Initial window width in physical pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial window height in physical pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Also write idle thumbnails as PNG into this directory
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Start with the HUD hidden (F1 toggles it)
    #[arg(long)]
    no_hud: bool,
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::Forward),
        KeyCode::KeyS => Some(Key::Back),
        KeyCode::KeyA => Some(Key::StrafeLeft),
        KeyCode::KeyD => Some(Key::StrafeRight),
        KeyCode::ArrowLeft => Some(Key::TurnLeft),
        KeyCode::ArrowRight => Some(Key::TurnRight),
        KeyCode::ArrowUp => Some(Key::LookUp),
        KeyCode::ArrowDown => Some(Key::LookDown),
        _ => None,
    }
}

fn map_touch(phase: TouchPhase, location: PhysicalPosition<f64>) -> InputEvent {
    let position = Some(Vec2::new(location.x as f32, location.y as f32));
    match phase {
        TouchPhase::Started => InputEvent::TouchStart { position },
        TouchPhase::Moved => InputEvent::TouchMove { position },
        TouchPhase::Ended | TouchPhase::Cancelled => InputEvent::TouchEnd,
    }
}

/// Pointer events egui may keep from the viewer. Releases always pass
/// through so a drag never sticks.
fn hud_can_claim(event: &WindowEvent) -> bool {
    match event {
        WindowEvent::MouseInput { state, .. } => *state == ElementState::Pressed,
        WindowEvent::CursorMoved { .. } => true,
        WindowEvent::Touch(Touch { phase, .. }) => {
            matches!(phase, TouchPhase::Started | TouchPhase::Moved)
        }
        _ => false,
    }
}

/// Viewer state that exists before and independently of the window.
struct AppState {
    mesh: TerrainMesh,
    orchestrator: FrameOrchestrator,
    viewer: ViewerState,
    cursor: Option<Vec2>,
    last_frame: Option<FrameOutput>,
    show_hud: bool,
}

impl AppState {
    fn new(config: ViewerConfig, show_hud: bool) -> Result<Self> {
        let mesh = trailrun_terrain::generate(config.plane_size, config.plane_divisions)
            .context("failed to generate terrain mesh")?;
        tracing::info!(
            vertices = mesh.vertex_count(),
            indices = mesh.index_count(),
            "terrain mesh ready"
        );

        Ok(Self {
            mesh,
            orchestrator: FrameOrchestrator::new(config),
            viewer: ViewerState::new(),
            cursor: None,
            last_frame: None,
            show_hud,
        })
    }

    /// Returns true when the key asks to close the window.
    fn handle_key(&mut self, code: KeyCode, pressed: bool) -> bool {
        if let Some(key) = map_key(code) {
            let event = if pressed {
                InputEvent::KeyDown(key)
            } else {
                InputEvent::KeyUp(key)
            };
            self.viewer.input.push(event);
            return false;
        }

        if !pressed {
            return false;
        }
        match code {
            KeyCode::F1 => {
                self.show_hud = !self.show_hud;
                false
            }
            KeyCode::Escape => true,
            _ => false,
        }
    }

    fn handle_mouse_button(&mut self, pressed: bool) {
        let event = if pressed {
            InputEvent::PointerDown {
                position: self.cursor,
            }
        } else {
            InputEvent::PointerUp
        };
        self.viewer.input.push(event);
    }

    fn handle_cursor(&mut self, position: Vec2) {
        self.cursor = Some(position);
        self.viewer.input.push(InputEvent::PointerMove {
            position: Some(position),
        });
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        if !self.show_hud {
            return;
        }
        let Some(frame) = &self.last_frame else {
            return;
        };

        egui::Window::new("Trailrun")
            .default_pos([12.0, 12.0])
            .resizable(false)
            .collapsible(true)
            .show(ctx, |ui| {
                let camera = frame.camera;
                ui.label(format!(
                    "Position: ({:.1}, {:.1})",
                    camera.position.x, camera.position.y
                ));
                ui.label(format!(
                    "Yaw: {:.1}°  Pitch: {:.1}°",
                    camera.orientation.yaw.to_degrees(),
                    camera.orientation.pitch.to_degrees()
                ));
                ui.label(format!("Frame: {}  dt: {:.1} ms", frame.index, frame.dt * 1000.0));
                ui.label(format!(
                    "Idle: {} / {}",
                    frame.idle_counter,
                    self.orchestrator.idle_threshold()
                ));
                ui.separator();
                ui.small("WASD: Move | Arrows/Drag: Look | F1: HUD | Esc: Quit");
            });
    }
}

/// Window plus everything bound to its surface.
struct Gpu {
    window: Arc<Window>,
    context: GpuContext,
    renderer: TerrainRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct ViewerApp {
    state: AppState,
    initial_size: PhysicalSize<u32>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    capture: Option<PendingCapture>,
    icons: IconExporter,
    init_error: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(state: AppState, initial_size: PhysicalSize<u32>, icons: IconExporter) -> Self {
        Self {
            state,
            initial_size,
            gpu: None,
            egui_ctx: EguiContext::default(),
            capture: None,
            icons,
            init_error: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title("Trailrun")
            .with_inner_size(self.initial_size);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let size = window.inner_size();
        let context = pollster::block_on(GpuContext::new(
            window.clone(),
            size.width,
            size.height,
        ))?;
        self.state.orchestrator.set_viewport(size.width, size.height);

        let renderer = TerrainRenderer::new(
            &context.device,
            context.format(),
            size.width,
            size.height,
            &self.state.mesh,
            self.state.orchestrator.config().clear_color,
        );

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&context.device, context.format(), None, 1, false);

        Ok(Gpu {
            window,
            context,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn redraw(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let frame = self
            .state
            .orchestrator
            .frame(&mut self.state.viewer, Instant::now());

        let output = match gpu.context.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.context.reconfigure();
                self.state.last_frame = Some(frame);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                self.state.last_frame = Some(frame);
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let device = &gpu.context.device;
        let queue = &gpu.context.queue;
        let draw = FrameDraw::from_frame(&frame, self.state.mesh.vertex_spacing());
        gpu.renderer.render(device, queue, &view, &draw);

        // Capture before the HUD so the thumbnail shows only the terrain.
        if let Some(request) = frame.export {
            if gpu.context.can_capture() && self.capture.is_none() && !self.icons.is_busy() {
                match PendingCapture::begin(device, queue, &output.texture) {
                    Ok(capture) => {
                        tracing::debug!(frame = request.frame, "idle snapshot requested");
                        self.capture = Some(capture);
                    }
                    Err(e) => tracing::debug!("snapshot skipped: {e}"),
                }
            }
        }

        self.state.last_frame = Some(frame);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let (width, height) = gpu.context.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        {
            let egui_renderer = &mut gpu.egui_renderer;
            for (id, image_delta) in &full_output.textures_delta.set {
                egui_renderer.update_texture(device, queue, *id, image_delta);
            }
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
            egui_renderer.update_buffers(
                device,
                queue,
                &mut encoder,
                &paint_jobs,
                &screen_descriptor,
            );
            {
                let mut pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("egui_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    })
                    .forget_lifetime();
                egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
            }
            queue.submit(std::iter::once(encoder.finish()));
            for id in &full_output.textures_delta.free {
                egui_renderer.free_texture(id);
            }
        }

        output.present();

        if let Some(capture) = &self.capture {
            if let Some(result) = capture.try_finish(device) {
                self.capture = None;
                match result {
                    Ok(captured) => self.icons.submit(captured),
                    Err(e) => tracing::debug!("snapshot readback failed: {e}"),
                }
            }
        }
        self.icons.apply(&gpu.window);
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialize renderer: {e:#}");
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed && hud_can_claim(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.context.resize(new_size.width, new_size.height);
                    let (width, height) = gpu.context.size();
                    gpu.renderer.resize(&gpu.context.device, width, height);
                    self.state.orchestrator.set_viewport(width, height);
                    // The surface texture a capture was copied from is gone.
                    self.capture = None;
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                if self
                    .state
                    .handle_key(key, key_state == ElementState::Pressed)
                {
                    event_loop.exit();
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: btn_state,
                ..
            } => {
                self.state
                    .handle_mouse_button(btn_state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state
                    .handle_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::Touch(Touch {
                phase, location, ..
            }) => {
                self.state.viewer.input.push(map_touch(phase, location));
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
                if let Some(gpu) = &self.gpu {
                    gpu.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("trailrun-desktop starting");

    if let Some(dir) = &cli.snapshot_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let state = AppState::new(ViewerConfig::default(), !cli.no_hud)?;
    let icons = IconExporter::spawn(ICON_SIZE, cli.snapshot_dir)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(state, PhysicalSize::new(cli.width, cli.height), icons);
    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_arrows_map_to_controls() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::Forward));
        assert_eq!(map_key(KeyCode::KeyS), Some(Key::Back));
        assert_eq!(map_key(KeyCode::KeyA), Some(Key::StrafeLeft));
        assert_eq!(map_key(KeyCode::KeyD), Some(Key::StrafeRight));
        assert_eq!(map_key(KeyCode::ArrowLeft), Some(Key::TurnLeft));
        assert_eq!(map_key(KeyCode::ArrowRight), Some(Key::TurnRight));
        assert_eq!(map_key(KeyCode::ArrowUp), Some(Key::LookUp));
        assert_eq!(map_key(KeyCode::ArrowDown), Some(Key::LookDown));
        assert_eq!(map_key(KeyCode::Space), None);
    }

    #[test]
    fn held_key_reaches_the_frame_step() {
        let mut state = AppState::new(ViewerConfig::default(), true).unwrap();
        assert!(!state.handle_key(KeyCode::KeyW, true));
        assert_eq!(state.viewer.input.pending_len(), 1);

        let t0 = Instant::now();
        state.orchestrator.frame(&mut state.viewer, t0);
        let frame = state
            .orchestrator
            .frame(&mut state.viewer, t0 + std::time::Duration::from_millis(100));
        assert!(frame.moved);
        assert!((frame.camera.position.y - 10.0).abs() < 1e-3);
    }

    #[test]
    fn escape_requests_exit_and_f1_toggles_hud() {
        let mut state = AppState::new(ViewerConfig::default(), true).unwrap();
        assert!(state.handle_key(KeyCode::Escape, true));
        assert!(!state.handle_key(KeyCode::F1, true));
        assert!(!state.show_hud);
        assert!(!state.handle_key(KeyCode::F1, false));
        assert!(!state.show_hud);
    }

    #[test]
    fn mouse_press_uses_last_cursor_position() {
        let mut state = AppState::new(ViewerConfig::default(), true).unwrap();
        state.handle_cursor(Vec2::new(100.0, 100.0));
        state.handle_mouse_button(true);
        state.handle_cursor(Vec2::new(110.0, 90.0));
        let snapshot = state.viewer.input.drain();
        assert!(snapshot.pointer_down());
        assert_eq!(snapshot.drag_delta(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn touch_phases_map_to_touch_events() {
        let at = PhysicalPosition::new(3.0, 4.0);
        assert_eq!(
            map_touch(TouchPhase::Started, at),
            InputEvent::TouchStart {
                position: Some(Vec2::new(3.0, 4.0))
            }
        );
        assert_eq!(
            map_touch(TouchPhase::Moved, at),
            InputEvent::TouchMove {
                position: Some(Vec2::new(3.0, 4.0))
            }
        );
        assert_eq!(map_touch(TouchPhase::Cancelled, at), InputEvent::TouchEnd);
    }

    #[test]
    fn hud_claims_pointer_presses_and_moves_only() {
        let device_id = unsafe { winit::event::DeviceId::dummy() };
        let button = |state| WindowEvent::MouseInput {
            device_id,
            state,
            button: MouseButton::Left,
        };
        let touch = |phase| {
            WindowEvent::Touch(Touch {
                device_id,
                phase,
                location: PhysicalPosition::new(0.0, 0.0),
                force: None,
                id: 0,
            })
        };

        assert!(hud_can_claim(&button(ElementState::Pressed)));
        assert!(hud_can_claim(&WindowEvent::CursorMoved {
            device_id,
            position: PhysicalPosition::new(1.0, 2.0),
        }));
        assert!(hud_can_claim(&touch(TouchPhase::Started)));
        assert!(hud_can_claim(&touch(TouchPhase::Moved)));

        assert!(!hud_can_claim(&button(ElementState::Released)));
        assert!(!hud_can_claim(&touch(TouchPhase::Ended)));
        assert!(!hud_can_claim(&touch(TouchPhase::Cancelled)));
        assert!(!hud_can_claim(&WindowEvent::Resized(PhysicalSize::new(8, 8))));
        assert!(!hud_can_claim(&WindowEvent::CloseRequested));
    }

    #[test]
    fn hud_reads_threshold_from_orchestrator() {
        let cfg = ViewerConfig {
            idle_frame_threshold: 42,
            ..ViewerConfig::default()
        };
        let state = AppState::new(cfg, true).unwrap();
        assert_eq!(state.orchestrator.idle_threshold(), 42);
        assert_eq!(state.orchestrator.config().clear_color, cfg.clear_color);
    }
}
