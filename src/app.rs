//! Application shell: window, event loop and the per-frame sequence.
//!
//! Thin glue around the core: scene state is edited by the UI between
//! frames, then each redraw runs the explicit update pass, the software
//! renderer, the presenter blit and the UI overlay, in that order.

use std::sync::Arc;

use cgmath::Vector3;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::gfx::Presenter;
use crate::render::{RenderSettings, SoftwareRenderer};
use crate::scene::{Camera, Light, Scene};
use crate::ui::{viewer_panel, UiManager};

const DEFAULT_WIDTH: u32 = 1200;
const DEFAULT_HEIGHT: u32 = 800;

pub struct ViewerApp {
    event_loop: Option<EventLoop<()>>,
    state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    ui: Option<UiManager>,
    renderer: SoftwareRenderer,
    scene: Scene,
    settings: RenderSettings,
}

impl ViewerApp {
    pub fn new() -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        Self {
            event_loop: Some(event_loop),
            state: AppState {
                window: None,
                presenter: None,
                ui: None,
                renderer: SoftwareRenderer::new(DEFAULT_WIDTH as usize, DEFAULT_HEIGHT as usize),
                scene: Scene::new(),
                settings: RenderSettings::default(),
            },
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.state.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.state.scene
    }

    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.state.settings
    }

    /// Loads an OBJ file and adds it to the scene as the active model.
    pub fn add_model(&mut self, path: &str) -> Result<usize, crate::io::MeshLoadError> {
        let model = crate::io::load_obj(path)?;
        Ok(self.state.scene.add_model(model))
    }

    /// Runs the application (consumes self and starts the event loop).
    ///
    /// A default camera and light are added first if the scene has none, so
    /// an empty setup still shows something sensible.
    pub fn run(mut self) {
        if self.state.scene.camera_count() == 0 {
            self.state.scene.add_camera(Camera::new(
                Vector3::new(0.0, 0.0, 5.0),
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ));
        }
        if self.state.scene.light_count() == 0 {
            let mut light = Light::new();
            light.proxy_mut().translation = Vector3::new(3.0, 4.0, 5.0);
            self.state.scene.add_light(light);
        }

        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.state)
            .expect("Failed to run event loop");
    }
}

impl Default for ViewerApp {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Ok(window) = event_loop.create_window(
            WindowAttributes::default()
                .with_title("meshview")
                .with_inner_size(winit::dpi::LogicalSize::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)),
        ) {
            let window_handle = Arc::new(window);
            self.window = Some(window_handle.clone());

            let (width, height) = window_handle.inner_size().into();
            self.renderer.set_viewport(width as usize, height as usize);

            let window_clone = window_handle.clone();
            let presenter =
                pollster::block_on(async move { Presenter::new(window_clone, width, height).await });

            let mut ui = UiManager::new(
                presenter.device(),
                presenter.queue(),
                presenter.surface_format(),
                &window_handle,
            );
            ui.update_display_size(width, height);

            self.ui = Some(ui);
            self.presenter = Some(presenter);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // UI gets first refusal on input
        if let Some(ui) = self.ui.as_mut() {
            if ui.handle_window_event(window, window_id, &event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                presenter.resize(width, height);
                self.renderer.set_viewport(width as usize, height as usize);

                // Viewport aspect follows the window for aspect-locked cameras
                let aspect = width.max(1) as f32 / height.max(1) as f32;
                for i in 0..self.scene.camera_count() {
                    if let Some(camera) = self.scene.camera_mut(i) {
                        if camera.aspect_locked {
                            camera.aspect = aspect;
                        }
                    }
                }

                if let Some(ui) = self.ui.as_mut() {
                    ui.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                // Explicit update pass before the renderer reads anything
                self.scene.update();

                let frame = self.renderer.render(&self.scene, &self.settings);

                let scene = &mut self.scene;
                let settings = &mut self.settings;
                let window_clone = window.clone();
                if let Some(ui) = self.ui.as_mut() {
                    presenter.present(frame, |device, queue, encoder, color_attachment| {
                        ui.draw(
                            device,
                            queue,
                            encoder,
                            &window_clone,
                            color_attachment,
                            |imgui_ui| {
                                viewer_panel(imgui_ui, scene, settings);
                            },
                        );
                    });
                } else {
                    presenter.present(frame, |_, _, _, _| {});
                }
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
