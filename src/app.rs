use glam::Vec2;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::camera::PerspectiveCamera;
use crate::config::ViewerConfig;
use crate::controls::OrbitControls;
use crate::core::{Button, Clock, Controller, PointerEvent, WinitController};
use crate::loaders::{AssetLoader, LoadState};
use crate::overlay::{project_labels, Overlay, Status};
use crate::picking::{hover_text, PickScene, Raycaster};
use crate::renderer::Renderer;
use crate::scene::{place_model, Node, Placement, Scene};

/// Viewer state driven by the winit event loop
pub struct App {
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    input: WinitController,
    scene: Scene,
    pick_scene: PickScene,
    overlay: Overlay,
    loader: Option<AssetLoader>,
    placement: Placement,
    clock: Clock,
}

impl App {
    pub fn new(config: ViewerConfig) -> Self {
        let (width, height) = (config.window.width, config.window.height);
        let scene = Scene::from_config(&config);

        Self {
            camera: PerspectiveCamera::new(&config.camera, width, height),
            controls: OrbitControls::new(config.controls.clone(), height),
            input: WinitController::new(),
            pick_scene: PickScene::new(Vec::new(), scene.line_segments()),
            overlay: Overlay::new(config.show_ui),
            placement: Placement::from_settings(&config.model),
            scene,
            config,
            window: None,
            renderer: None,
            loader: None,
            clock: Clock::new(),
        }
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    fn viewport(&self) -> Vec2 {
        match &self.renderer {
            Some(renderer) => {
                let (width, height) = renderer.size();
                Vec2::new(width as f32, height as f32)
            }
            None => Vec2::new(self.config.window.width as f32, self.config.window.height as f32),
        }
    }

    fn start_loading(&mut self) {
        let path = self.config.resolved_model_path();
        match AssetLoader::spawn(&path) {
            Ok(loader) => {
                self.overlay.status = Status::Loading(path.display().to_string());
                self.loader = Some(loader);
            }
            Err(e) => self.load_failed(format!("{:#}", e)),
        }
    }

    fn poll_loader(&mut self) {
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        match loader.poll() {
            LoadState::Pending => {}
            LoadState::Loaded(model) => {
                self.loader = None;
                self.add_model(model);
            }
            LoadState::Failed(message) => {
                self.loader = None;
                self.load_failed(message);
            }
        }
    }

    /// Normalize a loaded model and hand it to the renderer and picking
    pub fn add_model(&mut self, mut model: Node) {
        place_model(&mut model, &self.placement);
        self.scene.add(model);

        let meshes = self.scene.flatten();
        if let Some(renderer) = &mut self.renderer {
            renderer.upload_scene(&meshes);
        }
        self.pick_scene = PickScene::new(meshes, self.scene.line_segments());
        self.overlay.status = Status::Ready;
        log::info!("Model loaded successfully");
    }

    fn load_failed(&mut self, message: String) {
        log::error!("Error loading model: {}", message);
        self.overlay.status = Status::Error(message);
    }

    /// Raycast under the cursor and update the tooltip
    pub fn update_hover(&mut self, cursor: Vec2) {
        let hit = Raycaster::from_screen(&self.camera, cursor, self.viewport())
            .and_then(|raycaster| hover_text(&raycaster.intersect_scene(&self.pick_scene)));
        match hit {
            Some(text) => self.overlay.tooltip.show(text, cursor),
            None => self.overlay.tooltip.hide(),
        }
    }

    pub fn handle_pointer(&mut self, pointer: PointerEvent) {
        self.controls
            .handle_pointer(&pointer, &self.input, &self.camera);
        match pointer {
            PointerEvent::Moved { position, .. } => self.update_hover(position),
            PointerEvent::Left => self.overlay.tooltip.hide(),
            _ => {}
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
        self.controls.set_viewport_height(height);
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(width, height);
        }
    }

    /// Per-frame update that does not touch the GPU
    pub fn update(&mut self) {
        self.clock.tick();
        self.overlay.fps = self.clock.fps();

        self.poll_loader();

        if self.controls.update(&mut self.camera) {
            if let Some(cursor) = self.input.mouse_position() {
                self.update_hover(cursor);
            }
        }

        self.overlay.labels = project_labels(&self.scene.labels(), &self.camera, self.viewport());
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.update();

        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };

        match renderer.render(window, &self.camera, &self.overlay) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.config.window.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.config.window.width,
                    self.config.window.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match pollster::block_on(Renderer::new(
            window.clone(),
            self.scene.lighting.clone(),
            self.scene.background,
        )) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Failed to initialize renderer: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.window = Some(window);
        self.renderer = Some(renderer);
        if let Some(renderer) = &mut self.renderer {
            renderer.set_lines(&self.scene.line_segments());
        }
        self.resize(size.width, size.height);

        self.start_loading();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            renderer.handle_event(window, &event);
        }

        let pointer = self.input.process_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput { .. } if self.input.is_down(Button::Escape) => {
                event_loop.exit()
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {
                if let Some(pointer) = pointer {
                    self.handle_pointer(pointer);
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
