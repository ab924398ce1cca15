//! # Engine State Module
//!
//! The core engine module tying the subsystems together.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `camera_state` - First-person camera and input-driven movement
//! * `rendering` - Pipeline, vertex and texture plumbing
//! * `scene` - The fixed scene objects (the spinning cube)
//! * `terrain` - Streamed infinite voxel terrain
//!
//! ## Architecture
//!
//! `EngineState` owns the GPU handles and coordinates the per-frame loop:
//! input is translated into player actions, the camera moves and republishes
//! its position, and the render pass draws the cube followed by the terrain.
//! The terrain generation workers run on their own threads for the process
//! lifetime; the engine only touches their results through the shared store.

use std::sync::Arc;
use std::time::Duration;

use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::keyboard::KeyCode;

use crate::application_state::input_state::ProcessedInputState;

use camera_state::{camera::Projection, CameraState};
use rendering::{ScenePipeline, Texture};
use scene::Cube;
use terrain::renderer::GpuMesh;
use terrain::{stream, ChunkStore, TerrainContext, TerrainRenderer};

pub mod camera_state;
pub mod rendering;
pub mod scene;
pub mod terrain;

/// The main state container for the engine.
///
/// Owns the surface, device and queue, all drawable objects, and the
/// terrain context shared with the generation workers.
pub struct EngineState {
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    device: Device,
    queue: Queue,
    depth_texture: Texture,
    pipeline: ScenePipeline,
    cube: Cube,
    terrain_renderer: TerrainRenderer,
    projection: Projection,
    /// Camera state managing position, orientation and movement.
    pub camera_state: CameraState,
    /// Current player actions derived from input.
    pub player_actions: PlayerAction,
}

impl EngineState {
    /// Creates the engine with all subsystems initialized and the terrain
    /// generation workers running.
    ///
    /// # Arguments
    ///
    /// * `surface` - The rendering surface
    /// * `surface_config` - Configuration for the rendering surface
    /// * `device` - The GPU device
    /// * `queue` - The GPU command queue
    /// * `shader_string` - WGSL source for the scene shader
    /// * `texture_bytes` - PNG bytes of the crate texture
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        shader_string: String,
        texture_bytes: Vec<u8>,
    ) -> Self {
        let diffuse = Texture::from_png_bytes(&device, &queue, &texture_bytes, "Crate Texture")
            .expect("failed to decode the crate texture");

        let pipeline = ScenePipeline::new(&device, surface_config.format, &shader_string, &diffuse);
        let depth_texture = Texture::create_depth_texture(&device, &surface_config, "Depth Texture");

        let camera_state = CameraState::new();
        let projection = Projection::new(
            surface_config.width,
            surface_config.height,
            camera_state::FOV_Y,
            camera_state::Z_NEAR,
            camera_state::Z_FAR,
        );
        pipeline.set_projection(&queue, projection.calc_matrix());
        pipeline.set_view(&queue, camera_state.camera.calc_matrix());

        let cube = Cube::new(&device, &pipeline);

        let terrain_context = TerrainContext {
            observer: camera_state.position_handle(),
            store: Arc::new(ChunkStore::<GpuMesh>::new()),
        };
        stream::spawn_workers(&terrain_context);
        let terrain_renderer = TerrainRenderer::new(&terrain_context);

        Self {
            surface,
            surface_config,
            device,
            queue,
            depth_texture,
            pipeline,
            cube,
            terrain_renderer,
            projection,
            camera_state,
            player_actions: PlayerAction::default(),
        }
    }

    /// Reconfigures the surface, depth buffer and projection for a new
    /// window size.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_texture =
            Texture::create_depth_texture(&self.device, &self.surface_config, "Depth Texture");
        self.projection.resize(size.width, size.height);
        self.pipeline
            .set_projection(&self.queue, self.projection.calc_matrix());
    }

    /// Translates processed input into this frame's player actions.
    pub fn set_input_commands(&mut self, input: ProcessedInputState) {
        self.player_actions = PlayerAction {
            move_forward: input.get_key_state(KeyCode::KeyW).is_active(),
            move_backward: input.get_key_state(KeyCode::KeyS).is_active(),
            move_left: input.get_key_state(KeyCode::KeyA).is_active(),
            move_right: input.get_key_state(KeyCode::KeyD).is_active(),
            move_up: input.get_key_state(KeyCode::Space).is_active(),
            move_down: input.get_key_state(KeyCode::ShiftLeft).is_active(),
            rotate_view: input.get_mouse_delta(),
        };
    }

    /// Advances the simulation by one frame: camera movement and the cube's
    /// spin.
    pub fn process_input(&mut self, dt: Duration) {
        self.camera_state.intake_actions(&self.player_actions);
        if self.camera_state.update(dt) {
            self.pipeline
                .set_view(&self.queue, self.camera_state.camera.calc_matrix());
        }
        self.cube
            .update(dt.as_secs_f32(), &self.queue, &self.pipeline);
    }

    /// Renders one frame: the cube in a clearing pass, then the terrain.
    pub fn render(&mut self) {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("surface frame timed out, skipping frame");
                return;
            }
            Err(e @ wgpu::SurfaceError::OutOfMemory | e @ wgpu::SurfaceError::Other) => {
                panic!("unrecoverable surface error: {e:?}");
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::WHITE),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.pipeline.bind(&mut pass);
            self.cube.draw(&mut pass);
        }

        self.terrain_renderer.render(
            &self.device,
            &mut encoder,
            &view,
            &self.depth_texture.view,
            &self.pipeline,
        );

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

/// Player actions derived from input for one frame.
#[derive(Default)]
pub struct PlayerAction {
    /// Move along the camera's forward direction.
    pub move_forward: bool,
    /// Move against the camera's forward direction.
    pub move_backward: bool,
    /// Strafe left.
    pub move_left: bool,
    /// Strafe right.
    pub move_right: bool,
    /// Ascend along world Y.
    pub move_up: bool,
    /// Descend along world Y.
    pub move_down: bool,
    /// Mouse look delta for this frame, if the mouse moved.
    pub rotate_view: Option<(f64, f64)>,
}
