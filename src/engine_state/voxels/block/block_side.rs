//! # Block Side Module
//!
//! This module defines the six faces of a voxel block together with the
//! geometry every mesher needs per face: the outward normal, the corner layout
//! of the face quad and the texture slot the face samples.

/// Represents the six possible faces of a voxel block.
///
/// The discriminant doubles as the index into a material's six texture layers,
/// so the order is: [FRONT, BACK, RIGHT, LEFT, TOP, BOTTOM]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The right face (facing positive X)
    RIGHT = 2,

    /// The left face (facing negative X)
    LEFT = 3,

    /// The top face (facing positive Y)
    TOP = 4,

    /// The bottom face (facing negative Y)
    BOTTOM = 5,
}

/// Corner signs of the unit cube, named after the cube corners p1..p8.
const P1: [i32; 3] = [-1, -1, 1];
const P2: [i32; 3] = [1, -1, 1];
const P3: [i32; 3] = [1, 1, 1];
const P4: [i32; 3] = [-1, 1, 1];
const P5: [i32; 3] = [1, -1, -1];
const P6: [i32; 3] = [-1, -1, -1];
const P7: [i32; 3] = [-1, 1, -1];
const P8: [i32; 3] = [1, 1, -1];

/// Texture coordinates of the four quad corners, in corner order.
pub const FACE_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

impl BlockSide {
    /// Returns an array containing all six block faces in texture slot order.
    ///
    /// # Returns
    /// An array containing all `BlockSide` variants.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
        ]
    }

    /// The outward unit normal of this face, in voxel steps.
    pub fn normal(self) -> [i32; 3] {
        match self {
            BlockSide::FRONT => [0, 0, 1],
            BlockSide::BACK => [0, 0, -1],
            BlockSide::RIGHT => [1, 0, 0],
            BlockSide::LEFT => [-1, 0, 0],
            BlockSide::TOP => [0, 1, 0],
            BlockSide::BOTTOM => [0, -1, 0],
        }
    }

    /// The axis (0 = x, 1 = y, 2 = z) the normal points along.
    pub fn axis(self) -> usize {
        match self {
            BlockSide::RIGHT | BlockSide::LEFT => 0,
            BlockSide::TOP | BlockSide::BOTTOM => 1,
            BlockSide::FRONT | BlockSide::BACK => 2,
        }
    }

    /// The two axes spanning the face plane, lowest axis first.
    pub fn tangent_axes(self) -> (usize, usize) {
        match self.axis() {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        }
    }

    /// Cube corner signs of the face quad, in the order the vertices are emitted.
    ///
    /// Each component is -1 or 1; scaling by half a voxel and adding the voxel
    /// centre gives the vertex position. Corner `i` pairs with [`FACE_UVS`]`[i]`.
    pub fn corners(self) -> [[i32; 3]; 4] {
        match self {
            BlockSide::FRONT => [P1, P2, P3, P4],
            BlockSide::BACK => [P5, P6, P7, P8],
            BlockSide::RIGHT => [P2, P5, P8, P3],
            BlockSide::LEFT => [P6, P1, P4, P7],
            BlockSide::TOP => [P4, P3, P8, P7],
            BlockSide::BOTTOM => [P6, P5, P2, P1],
        }
    }

    /// Index into a material's six texture layers.
    pub fn texture_slot(self) -> usize {
        self as usize
    }
}
