//! The winit application
//!
//! [`VernissageApp`] owns the window, the render engine, the UI and one
//! [`SceneContext`] per mounted view. The view is mounted when the window
//! resumes and dropped on suspend or exit, which cancels its pending loads.
//! Gallery events are handed to the registered handler on the event loop
//! thread.

use cgmath::Vector2;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    composition::{GalleryInput, SceneContext},
    config::ViewerConfig,
    editing::GalleryEvent,
    error::AppError,
    gfx::{camera::OrbitControls, rendering::RenderEngine},
    models::AssetSource,
    ui::{gallery_panel, PanelState, UiManager},
};

/// Receives every [`GalleryEvent`] the mounted view produces
pub type EventHandler = Box<dyn FnMut(&GalleryEvent)>;

pub struct VernissageApp {
    state: AppState,
}

struct AppState {
    config: ViewerConfig,
    input: GalleryInput,
    source: Arc<dyn AssetSource>,
    handler: Option<EventHandler>,

    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    controls: OrbitControls,
    view: Option<SceneContext>,
    panel: PanelState,
    cursor: Vector2<f32>,
    error: Option<AppError>,
}

impl VernissageApp {
    pub fn new(config: ViewerConfig, input: GalleryInput, source: Arc<dyn AssetSource>) -> Self {
        let controls = OrbitControls::from_config(
            &config.camera,
            config.window.width as f32 / config.window.height.max(1) as f32,
        );
        Self {
            state: AppState {
                config,
                input,
                source,
                handler: None,
                window: None,
                render_engine: None,
                ui_manager: None,
                controls,
                view: None,
                panel: PanelState::default(),
                cursor: Vector2::new(0.0, 0.0),
                error: None,
            },
        }
    }

    /// Registers the gallery event handler
    pub fn on_event<F>(&mut self, handler: F)
    where
        F: FnMut(&GalleryEvent) + 'static,
    {
        self.state.handler = Some(Box::new(handler));
    }

    /// Runs the event loop until the window closes
    pub fn run(mut self) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self.state)?;

        match self.state.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_config = &self.config.window;
        let window = Arc::new(
            event_loop.create_window(
                WindowAttributes::default()
                    .with_title(window_config.title.clone())
                    .with_inner_size(LogicalSize::new(window_config.width, window_config.height)),
            )?,
        );

        let (width, height) = window.inner_size().into();
        let mut renderer =
            pollster::block_on(RenderEngine::new(window.clone(), width, height))?;
        if !window_config.vsync {
            renderer.set_vsync(false);
        }

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );
        ui_manager.update_display_size(width, height);
        self.controls.resize(width, height);

        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    fn mount(&mut self) {
        if self.view.is_some() {
            return;
        }
        self.view = Some(SceneContext::new(
            self.input.clone(),
            self.source.clone(),
            &self.config.editor,
        ));
    }

    /// Drops the view; pending loads are cancelled with it
    ///
    /// Committed transforms are kept so the next mount starts from them.
    fn unmount(&mut self) {
        if let Some(view) = self.view.take() {
            self.input.artworks = view.artworks().cloned().collect();
            if let Some(engine) = self.render_engine.as_mut() {
                engine.clear_scene_resources();
            }
        }
    }

    fn screen_size(&self) -> (f32, f32) {
        self.render_engine
            .as_ref()
            .map(|engine| {
                let (w, h) = engine.get_surface_size();
                (w as f32, h as f32)
            })
            .unwrap_or((1.0, 1.0))
    }

    /// Hands queued gallery events to the handler
    fn dispatch_events(&mut self) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        for event in view.drain_events() {
            log::debug!("Gallery event: {:?}", event);
            if let Some(handler) = self.handler.as_mut() {
                handler(&event);
            }
        }
    }

    fn handle_pointer(&mut self, event: &WindowEvent) {
        let screen = self.screen_size();
        let camera = &self.controls.camera;

        match *event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vector2::new(position.x as f32, position.y as f32);
                if let Some(view) = self.view.as_mut() {
                    view.pointer_moved(self.cursor, screen, camera);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let mut grabbed = false;
                if let Some(view) = self.view.as_mut().filter(|_| button == MouseButton::Left) {
                    match state {
                        ElementState::Pressed => {
                            grabbed = view.pointer_pressed(self.cursor, screen, camera)
                        }
                        ElementState::Released => view.pointer_released(self.cursor, screen, camera),
                    }
                }
                // A grabbed gizmo handle keeps the camera still
                if !grabbed {
                    self.controls.button(button, state);
                }
            }
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(render_engine), Some(view)) = (
            self.window.as_ref(),
            self.render_engine.as_mut(),
            self.view.as_mut(),
        ) else {
            return;
        };

        view.update(&self.controls.camera);
        render_engine.update(self.controls.uniform(), &view.scene().lights());

        let ui_manager = self.ui_manager.as_mut();
        let result = match ui_manager {
            Some(ui_manager) => {
                let panel = &mut self.panel;
                ui_manager.update_logic(window, |ui| gallery_panel(ui, view, panel));
                render_engine.render_frame(
                    view.scene(),
                    Some(|device: &wgpu::Device,
                          queue: &wgpu::Queue,
                          encoder: &mut wgpu::CommandEncoder,
                          target: &wgpu::TextureView| {
                        ui_manager.render(device, queue, encoder, target)
                    }),
                )
            }
            None => render_engine.render_frame(
                view.scene(),
                None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
            ),
        };

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_engine.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, closing the gallery");
                event_loop.exit();
            }
            Err(e) => log::warn!("Dropped frame: {}", e),
        }

        self.dispatch_events();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window(event_loop) {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
                return;
            }
        }
        self.mount();
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // The UI sees input first; a captured event goes no further
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let dragging = self
                .view
                .as_ref()
                .is_some_and(|view| view.editor().is_dragging());
            if ui_manager.handle_window_event(&window, window_id, &event) && !dragging {
                if let WindowEvent::MouseInput {
                    state: ElementState::Released,
                    button,
                    ..
                } = event
                {
                    self.controls.button(button, ElementState::Released);
                }
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event: key, .. } => {
                if key.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                    event_loop.exit();
                    return;
                }
                self.controls.key(&key);
            }
            WindowEvent::CursorMoved { .. } | WindowEvent::MouseInput { .. } => {
                self.handle_pointer(&event);
                self.dispatch_events();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.controls.resize(width, height);
                if let Some(engine) = self.render_engine.as_mut() {
                    engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                self.unmount();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if self
            .ui_manager
            .as_ref()
            .is_some_and(|ui_manager| ui_manager.wants_input())
        {
            return;
        }

        match event {
            DeviceEvent::MouseMotion { delta } => {
                if self.controls.motion(delta) {
                    window.request_redraw();
                }
            }
            DeviceEvent::MouseWheel { delta } => {
                self.controls.wheel(&delta);
                window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
    }
}
