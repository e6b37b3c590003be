//! Core application state and lifecycle.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Timelike};
use kurbo::{Size, Vec2};
use peniko::Color;
use tableau_core::{
    BoundsPolicy, CanvasConfig, DirectoryClient, DragOutcome, QueryOptions, SensorConfig, UserDirectory,
    directory::USERS_URL,
};
use tableau_render::{GridStyle, RenderContext, Renderer, VelloRenderer};
use tableau_widgets::Palette;
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
#[cfg(not(target_arch = "wasm32"))]
use winit::dpi::LogicalSize;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::board::Board;
use crate::drag_bridge::PointerFrame;
use crate::loader::MediaLoader;
use crate::ui::{UiAction, UiOutput, UiState, render_ui};

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub grid_style: GridStyle,
    pub bounds: BoundsPolicy,
    /// Where the group maker loads its students from.
    pub users_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Tableau".to_string(),
            width: 1280,
            height: 800,
            grid_style: GridStyle::default(),
            bounds: BoundsPolicy::default(),
            users_url: USERS_URL.to_string(),
        }
    }
}

/// Runtime state for the application.
struct AppRuntime {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    scene_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion (needed for WebGPU/WASM)
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // egui
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    ui_state: UiState,

    // State
    board: Board,
    loader: MediaLoader,
    /// When the next frame is due if nothing else happens.
    next_frame: Option<Instant>,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    state: Option<AppRuntime>,
    render_cx: Option<vello::util::RenderContext>,
    /// Window waiting for async surface creation (WASM only)
    pending_window: Option<Arc<Window>>,
    /// Flag to indicate async init is in progress
    #[cfg(target_arch = "wasm32")]
    init_in_progress: std::cell::Cell<bool>,
}

impl App {
    /// Create a new application with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a new application with custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            state: None,
            render_cx: None,
            pending_window: None,
            #[cfg(target_arch = "wasm32")]
            init_in_progress: std::cell::Cell::new(false),
        }
    }

    /// Run the application.
    pub async fn run() {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        let app = App::new();

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::EventLoopExtWebSys;
            event_loop.spawn_app(app);
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let mut app = app;
            event_loop.run_app(&mut app).expect("Event loop error");
        }
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let render_cx = self.render_cx.as_ref().expect("RenderContext not initialized");
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer =
            vello::Renderer::new(device, RendererOptions::default()).expect("Failed to create Vello renderer");

        // Vello renders to Rgba8Unorm; the surface is often Bgra8Unorm on WebGPU.
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(device, surface.config.format, egui_wgpu::RendererOptions::default());

        let logical = window.inner_size().to_logical::<f64>(window.scale_factor());
        let canvas = CanvasConfig::default()
            .with_bounds(self.config.bounds)
            .with_viewport(Size::new(logical.width, logical.height));
        let directory = UserDirectory::new(
            QueryOptions::default(),
            DirectoryClient::new(self.config.users_url.clone()),
        );
        let ui_state = UiState {
            grid_style: self.config.grid_style,
            bounds: self.config.bounds,
            ..UiState::default()
        };

        log::info!("Tableau initialized - {}x{}", surface.config.width, surface.config.height);

        self.state = Some(AppRuntime {
            window: window.clone(),
            surface,
            vello_renderer,
            scene_renderer: VelloRenderer::new(),
            texture_blitter,
            egui_ctx,
            egui_state,
            egui_renderer,
            ui_state,
            board: Board::new(canvas, SensorConfig::default(), directory),
            loader: MediaLoader::new(),
            next_frame: None,
        });

        self.pending_window = None;

        // Request initial redraw
        window.request_redraw();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl AppRuntime {
    /// Apply what the UI asked for this frame.
    fn apply_action(&mut self, action: UiAction, now: Instant) {
        match action {
            UiAction::AddTool(kind) => {
                let id = self.board.add_tool(kind, now);
                log::info!("Added {} as {}", kind.display_name(), id);
            }
            UiAction::ToggleTheme => {
                let theme = self.board.app_state.theme().toggled();
                self.board.app_state.set_theme(theme);
            }
            UiAction::CycleGrid => {
                self.ui_state.grid_style = self.ui_state.grid_style.next();
                log::info!("Wallpaper: {}", self.ui_state.grid_style.name());
            }
            UiAction::ToggleBounds => {
                self.ui_state.bounds = self.ui_state.bounds.next();
                self.board.canvas.set_bounds_policy(self.ui_state.bounds);
                log::info!("Drag bounds: {}", self.ui_state.bounds.name());
            }
            UiAction::ToggleSidebar => {
                self.ui_state.sidebar_open = !self.ui_state.sidebar_open;
            }
            UiAction::RefetchUsers => {
                self.board.directory.cache_mut().refetch();
            }
        }
    }

    /// Feed this frame's pointer state to the drag sensor.
    fn step_drag(&mut self, frame: PointerFrame, now: Instant) {
        let events = self.board.bridge.step(frame, now);
        for outcome in self.board.apply_drag_events(events) {
            match outcome {
                DragOutcome::Ignored | DragOutcome::Moved => {}
                outcome => log::debug!("Drag: {:?}", outcome),
            }
        }
    }

    /// When the next frame is due: the soonest of egui's own request, a
    /// widget's wake-up and the next tick of the wall clock.
    fn schedule(&mut self, now: Instant, egui_delay: Duration, board_wake: Option<Duration>) {
        let delay = if self.board.bridge.is_tracking() {
            Duration::ZERO
        } else {
            let millis = Local::now().nanosecond() / 1_000_000;
            let clock_tick = Duration::from_millis(1000 - u64::from(millis.min(999)));
            board_wake.map_or(clock_tick, |w| w.min(clock_tick)).min(egui_delay)
        };

        if delay.is_zero() {
            self.next_frame = None;
            self.window.request_redraw();
        } else {
            self.next_frame = Some(now + delay);
        }
    }

    fn redraw(&mut self, render_cx: &vello::util::RenderContext) {
        let now = Instant::now();

        for event in self.loader.poll_events() {
            self.board.apply_loader_event(event, &self.loader, &self.egui_ctx);
        }
        let board_wake = self.board.update(now);

        // Run egui and collect what it reported
        let egui_input = self.egui_state.take_egui_input(&self.window);
        let mut ui_output: Option<UiOutput> = None;
        let egui_output = self.egui_ctx.run(egui_input, |ctx| {
            ui_output = Some(render_ui(ctx, &self.ui_state, &mut self.board, &self.loader, now));
        });

        self.egui_state
            .handle_platform_output(&self.window, egui_output.platform_output);
        let egui_primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, egui_output.pixels_per_point);

        let canvas_offset = match ui_output {
            Some(out) => {
                let rect = out.canvas_rect;
                self.board
                    .canvas
                    .set_viewport(Size::new(rect.width() as f64, rect.height() as f64));
                if let Some(action) = out.action {
                    self.apply_action(action, now);
                }
                self.step_drag(PointerFrame::from_egui(&self.egui_ctx, out.pressed), now);
                Vec2::new(rect.min.x as f64, rect.min.y as f64)
            }
            None => Vec2::ZERO,
        };

        let egui_delay = egui_output
            .viewport_output
            .get(&egui::ViewportId::ROOT)
            .map_or(Duration::MAX, |v| v.repaint_delay);
        self.schedule(now, egui_delay, board_wake);

        let width = self.surface.config.width;
        let height = self.surface.config.height;

        let palette = Palette::for_dark_mode(self.board.app_state.theme().is_dark());
        let render_ctx = RenderContext::new(&self.board.canvas, Size::new(width as f64, height as f64))
            .with_scale_factor(egui_output.pixels_per_point as f64)
            .with_background(to_color(palette.background))
            .with_grid(self.ui_state.grid_style)
            .with_grid_color(to_color(palette.border))
            .with_shadow_color(to_color(palette.shadow))
            .with_highlight(to_color(palette.accent))
            .with_canvas_offset(canvas_offset);
        self.scene_renderer.build_scene(&render_ctx);
        let background = self.scene_renderer.background_color(&render_ctx);
        let scene = self.scene_renderer.take_scene();

        let device_handle = &render_cx.devices[self.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match self.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let params = RenderParams {
            base_color: background,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello's compute shaders need StorageBinding, which WebGPU only
        // supports for Rgba8Unorm. The result is blitted to the surface.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view = render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = self
            .vello_renderer
            .render_to_texture(device, queue, &scene, &render_texture_view, &params)
        {
            log::error!("Failed to render: {:?}", e);
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        {
            let mut blit_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("blit encoder"),
            });
            self.texture_blitter
                .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
            queue.submit(std::iter::once(blit_encoder.finish()));
        }

        for (id, image_delta) in &egui_output.textures_delta.set {
            self.egui_renderer.update_texture(device, queue, *id, image_delta);
        }

        // egui on top of the backdrop
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: egui_output.pixels_per_point,
        };

        {
            let mut egui_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("egui encoder"),
            });

            self.egui_renderer.update_buffers(
                device,
                queue,
                &mut egui_encoder,
                &egui_primitives,
                &screen_descriptor,
            );

            let render_pass = egui_encoder.begin_render_pass(&vello::wgpu::RenderPassDescriptor {
                label: Some("egui render pass"),
                color_attachments: &[Some(vello::wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: vello::wgpu::Operations {
                        load: vello::wgpu::LoadOp::Load,
                        store: vello::wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // egui-wgpu wants a 'static render pass
            let mut render_pass = render_pass.forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &egui_primitives, &screen_descriptor);
            drop(render_pass);

            queue.submit(std::iter::once(egui_encoder.finish()));
        }

        for id in &egui_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
        surface_texture.present();
    }
}

fn to_color(color: egui::Color32) -> Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color::from_rgba8(r, g, b, a)
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.pending_window.is_some() {
            return;
        }

        log::info!("Creating window...");

        #[cfg(not(target_arch = "wasm32"))]
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        // On WASM, attach a canvas to the DOM and fill the viewport
        #[cfg(target_arch = "wasm32")]
        let window_attrs = {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let web_window = web_sys::window().expect("No window");
            let document = web_window.document().expect("No document");

            let (viewport_width, viewport_height) = viewport_size(&web_window, &self.config);

            if let Some(loading) = document.get_element_by_id("loading") {
                loading.remove();
            }

            let canvas = document
                .get_element_by_id("tableau-canvas")
                .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
                .or_else(|| {
                    let app_div = document.get_element_by_id("app")?;
                    let canvas = document.create_element("canvas").ok()?;
                    canvas.set_id("tableau-canvas");
                    app_div.append_child(&canvas).ok()?;
                    canvas.dyn_into::<web_sys::HtmlCanvasElement>().ok()
                })
                .expect("Failed to create canvas");

            let dpr = web_window.device_pixel_ratio();
            canvas.set_width((viewport_width * dpr) as u32);
            canvas.set_height((viewport_height * dpr) as u32);
            let style = canvas.style();
            for (property, value) in [
                ("width", "100%"),
                ("height", "100%"),
                ("display", "block"),
                ("position", "fixed"),
                ("top", "0"),
                ("left", "0"),
            ] {
                let _ = style.set_property(property, value);
            }

            log::info!("Canvas created: {}x{} (dpr: {})", viewport_width, viewport_height, dpr);

            Window::default_attributes()
                .with_title(&self.config.title)
                .with_canvas(Some(canvas))
        };

        let window = Arc::new(event_loop.create_window(window_attrs).expect("Failed to create window"));

        log::info!("Window created, initializing renderer...");

        // On native, block on async surface creation
        #[cfg(not(target_arch = "wasm32"))]
        {
            let size = window.inner_size();
            let (width, height) = if size.width == 0 || size.height == 0 {
                (self.config.width, self.config.height)
            } else {
                (size.width, size.height)
            };

            let render_cx = self.render_cx.get_or_insert_with(vello::util::RenderContext::new);
            let surface = pollster::block_on(render_cx.create_surface(
                window.clone(),
                width,
                height,
                PresentMode::AutoVsync,
            ))
            .expect("Failed to create surface");

            // SAFETY: the surface only borrows the window, which App keeps alive in the same AppRuntime.
            let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
            self.finish_init(window, surface);
        }

        // On WASM, surface creation is async and happens on the first window event
        #[cfg(target_arch = "wasm32")]
        {
            self.pending_window = Some(window);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        #[cfg(target_arch = "wasm32")]
        if self.state.is_none() {
            if let Some(window) = self.pending_window.clone() {
                if !self.init_in_progress.get() {
                    self.init_in_progress.set(true);
                    self.spawn_surface(window.clone());
                }
                window.request_redraw();
            }
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        let egui_response = state.egui_state.on_window_event(&state.window, &event);
        if egui_response.repaint {
            state.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            // A drag never outlives the window's focus.
            WindowEvent::Focused(false) => {
                let frame = PointerFrame {
                    focused: false,
                    ..PointerFrame::default()
                };
                state.step_drag(frame, Instant::now());
                state.window.request_redraw();
            }

            WindowEvent::RedrawRequested => {
                let Some(render_cx) = self.render_cx.as_ref() else {
                    return;
                };
                state.redraw(render_cx);
            }

            _ => {}
        }
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            if let Some(state) = &mut self.state {
                state.next_frame = None;
                state.window.request_redraw();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let next_frame = self.state.as_ref().and_then(|state| state.next_frame);
        match next_frame {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl App {
    /// Create the surface asynchronously, then finish initialization.
    fn spawn_surface(&mut self, window: Arc<Window>) {
        let web_window = web_sys::window().expect("No window");
        let dpr = web_window.device_pixel_ratio();
        let (viewport_width, viewport_height) = viewport_size(&web_window, &self.config);
        let width = (viewport_width * dpr) as u32;
        let height = (viewport_height * dpr) as u32;

        let self_ptr = self as *mut Self;
        wasm_bindgen_futures::spawn_local(async move {
            log::info!("Creating surface asynchronously...");
            let mut render_cx = vello::util::RenderContext::new();
            match render_cx
                .create_surface(window.clone(), width, height, PresentMode::AutoVsync)
                .await
            {
                Ok(surface) => {
                    let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };
                    // SAFETY: WASM is single-threaded and the event loop keeps the App alive.
                    let app = unsafe { &mut *self_ptr };
                    app.render_cx = Some(render_cx);
                    app.finish_init(window, surface);
                }
                Err(e) => {
                    log::error!("Failed to create surface: {:?}", e);
                    let app = unsafe { &mut *self_ptr };
                    app.init_in_progress.set(false);
                }
            }
        });
    }
}

/// Browser viewport in CSS pixels.
#[cfg(target_arch = "wasm32")]
fn viewport_size(web_window: &web_sys::Window, config: &AppConfig) -> (f64, f64) {
    let width = web_window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(config.width as f64);
    let height = web_window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(config.height as f64);
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.title, "Tableau");
        assert_eq!(config.bounds, BoundsPolicy::Viewport);
        assert_eq!(config.users_url, USERS_URL);
    }

    #[test]
    fn test_to_color_keeps_opaque_channels() {
        let color = to_color(egui::Color32::from_rgb(10, 20, 30));
        assert_eq!(color.to_rgba8().to_u8_array(), [10, 20, 30, 255]);
    }
}
