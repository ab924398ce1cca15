//! Native entry point; all the work happens in [`voxelplay::run`].

fn main() {
    voxelplay::run();
}
