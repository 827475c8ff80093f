//! # Voxel Wasteland Demo Entry Point
//!
//! Generates a world, applies a few edits and runs one frame of mesh updates
//! against a sink that only logs what a renderer would receive.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json] [materials.json]
//! ```

use std::{env, error::Error, process::ExitCode, sync::Arc};

use cgmath::Vector3;
use log::{error, info};
use voxel_wasteland::{
    engine_state::voxels::chunk::{CHUNK_HEIGHT, CHUNK_SIZE},
    BlockType, ChunkId, ChunkManager, MaterialRegistry, Mesh, MeshSink, World, WorldConfig,
};

/// Counts what the engine hands to a renderer.
#[derive(Default)]
struct LoggingSink {
    uploads: usize,
    uploaded_vertices: usize,
    draws: usize,
    drawn_indices: usize,
}

impl MeshSink for LoggingSink {
    fn upload(&mut self, _chunk: ChunkId, mesh: &Mesh) {
        self.uploads += 1;
        self.uploaded_vertices += mesh.vertices().len();
    }

    fn draw(&mut self, _chunk: ChunkId, mesh: &Mesh) {
        self.draws += 1;
        self.drawn_indices += mesh.indices().len();
    }
}

/// World position of the highest active voxel in a column of `id`.
fn surface_at(world: &World, id: ChunkId, x: i32, z: i32) -> Option<Vector3<f32>> {
    let chunk = world.chunk(id)?;
    (0..CHUNK_HEIGHT as i32)
        .rev()
        .map(|y| Vector3::new(x, y, z))
        .find(|&index| chunk.check_block_exists_at(index))
        .map(|index| chunk.block_world_position(index))
}

fn edit_demo(world: &mut World) -> Result<(), Box<dyn Error>> {
    let centre = world.map_size() / 2;
    let id = world.chunk_at(centre, centre).ok_or("world has no centre chunk")?;
    let middle = CHUNK_SIZE as i32 / 2;
    let top = surface_at(world, id, middle, middle).ok_or("centre column is empty")?;
    info!("Surface of {id} at {top:?}");

    let above = top + Vector3::new(0.0, 1.0, 0.0);
    if world.add_block(id, above, BlockType::SAND as u8)? {
        info!("Placed sand at {above:?}");
    }

    // Hit the sand slightly towards +x: the new block lands beside it.
    let hit = above + Vector3::new(0.4, 0.1, 0.0);
    if world.try_add_block(id, hit, BlockType::WATER as u8)? {
        info!("Placed water next to {above:?}");
    }

    if world.remove_block(id, top)? {
        info!("Removed block at {top:?}");
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => WorldConfig::from_file(&path)?,
        None => WorldConfig::default(),
    };
    let materials = match args.next() {
        Some(path) => MaterialRegistry::from_file(&path)?,
        None => MaterialRegistry::builtin()?,
    };
    info!("Loaded {} materials", materials.len());

    let manager = ChunkManager::new(config)?;
    let mut world = manager.generate(Arc::new(materials))?;

    let mut sink = LoggingSink::default();
    world.update(&mut sink);
    edit_demo(&mut world)?;
    let rebuilt = world.update(&mut sink);
    world.draw(&mut sink);

    info!(
        "Rebuilt {rebuilt} meshes, {} uploads ({} vertices), {} draws ({} indices)",
        sink.uploads, sink.uploaded_vertices, sink.draws, sink.drawn_indices
    );
    Ok(())
}

fn main() -> ExitCode {
    voxel_wasteland::init_logger();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
