#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxelplay
//!
//! A small real-time 3D demo: a first-person camera flying over an infinite,
//! procedurally generated voxel terrain, with a spinning textured cube at the
//! world origin.
//!
//! ## Key Modules
//!
//! * `application_state` - Window lifecycle, input and graphics initialization
//! * `core` - Shared concurrency utilities
//! * `engine_state` - Camera, rendering, the scene and the terrain system
//!
//! ## Architecture
//!
//! The terrain is the interesting part: a pool of generation workers streams
//! fixed-size chunks around the camera for the lifetime of the process, while
//! the render thread evicts chunks that fall out of range, uploads freshly
//! generated meshes and draws whatever is resident. See
//! [`engine_state::terrain`] for the details.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() {
//!     voxelplay::run();
//! }
//! ```

use application_state::{
    graphics_resources_builder::{GraphicsBuilder, MaybeGraphics},
    ApplicationState,
};
use log::info;
use winit::event_loop::EventLoop;

mod application_state;
pub mod core;
pub mod engine_state;

/// Initializes logging, builds the event loop and runs the application until
/// the window closes.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let event_loop = EventLoop::with_user_event()
        .build()
        .expect("failed to build the event loop");

    let mut state = ApplicationState::new(MaybeGraphics::Builder(GraphicsBuilder::new(
        event_loop.create_proxy(),
    )));

    let _ = event_loop.run_app(&mut state);
}
