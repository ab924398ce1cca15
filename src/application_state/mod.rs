//! # Application State Management
//!
//! Window lifecycle, graphics initialization handoff and the per-frame event
//! loop glue. The application starts in a pre-graphics state, builds its GPU
//! resources on the first `resumed` callback, and runs the engine once they
//! arrive.

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;
use std::time::Instant;

use graphics_resources_builder::{Graphics, MaybeGraphics};
use input_manager::InputManager;

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::engine_state::EngineState;

/// Top-level application state driven by the winit event loop.
pub struct ApplicationState {
    /// Graphics initialization state, consumed when the engine starts.
    pub graphics: MaybeGraphics,
    /// The running application, once graphics resources arrive.
    pub state: Option<InitializedApplicationState>,
}

/// The fully initialized, running application.
pub struct InitializedApplicationState {
    /// The engine and everything it owns.
    pub engine_state: EngineState,
    /// Handle to the application window, for redraw requests.
    pub window: Arc<Window>,
    /// Raw input accumulator.
    pub input_manager: InputManager,
    /// Timestamp of the previous frame, for delta time.
    pub last_wait_time: Instant,
}

impl ApplicationState {
    /// Creates the application in its pre-graphics state.
    pub fn new(graphics: MaybeGraphics) -> Self {
        Self {
            graphics,
            state: None,
        }
    }
}

impl ApplicationHandler<Graphics> for ApplicationState {
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(state) = &mut self.state {
            state.input_manager.intake_input(&event);

            match event {
                WindowEvent::Resized(size) => {
                    state.engine_state.resize_surface(size);
                }
                WindowEvent::Focused(is_focused) => {
                    if !is_focused {
                        state.input_manager.reset_inputs();
                    }
                }
                WindowEvent::RedrawRequested => {
                    state.engine_state.render();
                }
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            ..
                        },
                    ..
                } => event_loop.exit(),
                _ => (),
            }
        } else if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                state.input_manager.intake_mouse_motion(delta);
            }
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    /// Receives the built graphics resources and starts the engine. This is
    /// also the point where the terrain generation workers begin running.
    fn user_event(&mut self, _event_loop: &ActiveEventLoop, graphics: Graphics) {
        let Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            shader_file_string,
            texture_bytes,
        } = graphics;

        let engine_state = EngineState::new(
            surface,
            surface_config,
            device,
            queue,
            shader_file_string,
            texture_bytes,
        );

        self.state = Some(InitializedApplicationState {
            engine_state,
            window,
            input_manager: InputManager::new(),
            last_wait_time: Instant::now(),
        });
        self.graphics = MaybeGraphics::Moved;
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            let now = Instant::now();
            let wait_dt = now - state.last_wait_time;
            state.last_wait_time = now;

            if let Some(processed_input) = state.input_manager.get_and_reset_processed_input() {
                state.engine_state.set_input_commands(processed_input);
            }
            state.engine_state.process_input(wait_dt);
            state.window.request_redraw();
        }
    }
}
