//! # Material Registry
//!
//! Maps material ids to the data the mesher needs: six texture layer indices
//! and whether the material hides the faces of its neighbours.
//!
//! Materials are described by a JSON array:
//!
//! ```json
//! [
//!     { "id": 6, "name": "grass_block", "texture": ["side.png", "side.png", "side.png", "side.png", "top.png", "dirt.png"] },
//!     { "id": 8, "name": "dark_oak_leaves", "texture": "leaves.png", "type": "leaves" }
//! ]
//! ```
//!
//! Texture layers are numbered in file order across all materials. A material
//! listing fewer than six textures repeats its last layer for the remaining
//! faces (face order front, back, right, left, top, bottom).

use std::{collections::HashMap, fmt, fs, io, path::Path};

use serde::Deserialize;

use super::{block_side::BlockSide, block_type::BlockType, BlockTypeSize};

const BUILTIN_MATERIALS: &str = include_str!("../../../../assets/materials.json");

/// Material `type` that opts out of face culling.
const LEAVES_KIND: &str = "leaves";

/// Failure while building a [`MaterialRegistry`].
#[derive(Debug)]
pub enum MaterialError {
    /// The file could not be read.
    Io { path: String, source: io::Error },
    /// The file is not valid material JSON.
    Parse { source: serde_json::Error },
    /// Two materials share an id.
    DuplicateId { id: BlockTypeSize },
    /// A material tried to claim the air id.
    ReservedId { name: String },
    /// A built-in id was given a different name.
    NameMismatch { name: String, id: BlockTypeSize },
    /// A material lists no textures.
    NoTextures { name: String },
    /// A required material is not registered.
    Missing { name: String },
}

impl fmt::Display for MaterialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialError::Io { path, source } => {
                write!(f, "failed to read materials `{path}`: {source}")
            }
            MaterialError::Parse { source } => write!(f, "invalid material json: {source}"),
            MaterialError::DuplicateId { id } => write!(f, "material id {id} is defined twice"),
            MaterialError::ReservedId { name } => {
                write!(f, "material `{name}` uses the reserved air id")
            }
            MaterialError::NameMismatch { name, id } => {
                write!(f, "material `{name}` is built in with a different id than {id}")
            }
            MaterialError::NoTextures { name } => write!(f, "material `{name}` has no textures"),
            MaterialError::Missing { name } => write!(f, "required material `{name}` is not registered"),
        }
    }
}

impl std::error::Error for MaterialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MaterialError::Io { source, .. } => Some(source),
            MaterialError::Parse { source } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextureSpec {
    Single(String),
    Layered(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct MaterialDefinition {
    id: BlockTypeSize,
    name: String,
    texture: TextureSpec,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Everything the engine knows about one material.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Material id stored in blocks.
    pub id: BlockTypeSize,
    /// Name from the definition file.
    pub name: String,
    /// Texture paths in definition order.
    pub textures: Vec<String>,
    /// Texture array layer per face, indexed by [`BlockSide::texture_slot`].
    pub texture_layers: [u32; 6],
    /// Whether this material hides adjacent faces (false for foliage).
    pub should_cull_face: bool,
}

impl Material {
    /// Texture array layer sampled by `side`.
    pub fn texture_layer(&self, side: BlockSide) -> u32 {
        self.texture_layers[side.texture_slot()]
    }
}

/// Immutable lookup from material id to [`Material`], created once at startup
/// and shared by reference with every chunk that builds a mesh.
#[derive(Debug, Clone, Default)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
    lookup: HashMap<BlockTypeSize, usize>,
    texture_paths: Vec<String>,
}

impl MaterialRegistry {
    /// The registry embedded in the binary, covering every built-in block type except air.
    pub fn builtin() -> Result<Self, MaterialError> {
        Self::from_json_str(BUILTIN_MATERIALS)
    }

    /// Loads a registry from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MaterialError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| MaterialError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Parses a registry from a JSON array of material definitions.
    pub fn from_json_str(json: &str) -> Result<Self, MaterialError> {
        let definitions: Vec<MaterialDefinition> =
            serde_json::from_str(json).map_err(|source| MaterialError::Parse { source })?;

        let mut registry = MaterialRegistry::default();
        for definition in definitions {
            registry.register(definition)?;
        }

        log::debug!(
            "Registered {} materials with {} texture layers",
            registry.materials.len(),
            registry.texture_paths.len()
        );
        Ok(registry)
    }

    fn register(&mut self, definition: MaterialDefinition) -> Result<(), MaterialError> {
        let MaterialDefinition { id, name, texture, kind } = definition;

        if id == BlockType::AIR.id() {
            return Err(MaterialError::ReservedId { name });
        }
        if self.lookup.contains_key(&id) {
            return Err(MaterialError::DuplicateId { id });
        }
        if let Some(builtin) = BlockType::from_name(&name) {
            if builtin.id() != id {
                return Err(MaterialError::NameMismatch { name, id });
            }
        }

        let textures = match texture {
            TextureSpec::Single(path) => vec![path],
            TextureSpec::Layered(paths) => paths,
        };
        if textures.is_empty() {
            return Err(MaterialError::NoTextures { name });
        }

        let first_layer = self.texture_paths.len() as u32;
        let mut texture_layers = [0u32; 6];
        for (slot, layer) in texture_layers.iter_mut().enumerate() {
            *layer = first_layer + slot.min(textures.len() - 1) as u32;
        }
        self.texture_paths.extend(textures.iter().cloned());

        self.lookup.insert(id, self.materials.len());
        self.materials.push(Material {
            id,
            name,
            textures,
            texture_layers,
            should_cull_face: kind.as_deref() != Some(LEAVES_KIND),
        });
        Ok(())
    }

    /// The material registered under `id`.
    pub fn get(&self, id: BlockTypeSize) -> Option<&Material> {
        self.lookup.get(&id).map(|&index| &self.materials[index])
    }

    /// Whether a block of material `id` hides the faces touching it.
    ///
    /// Unregistered ids cull, matching an opaque solid.
    pub fn should_cull_face(&self, id: BlockTypeSize) -> bool {
        self.get(id).map_or(true, |material| material.should_cull_face)
    }

    /// Fails with [`MaterialError::Missing`] unless every type in `required` is registered.
    pub fn require(&self, required: &[BlockType]) -> Result<(), MaterialError> {
        match required.iter().find(|block_type| self.get(block_type.id()).is_none()) {
            Some(missing) => Err(MaterialError::Missing {
                name: format!("{missing:?}").to_lowercase(),
            }),
            None => Ok(()),
        }
    }

    /// Every texture path, indexed by texture array layer.
    pub fn texture_paths(&self) -> &[String] {
        &self.texture_paths
    }

    /// Registered materials in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    /// Number of registered materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether no material is registered.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_covers_generation_materials() {
        let registry = MaterialRegistry::builtin().unwrap();
        registry
            .require(&[
                BlockType::BEDROCK,
                BlockType::STONE,
                BlockType::SANDSTONE,
                BlockType::DIRT,
                BlockType::GRASS,
                BlockType::DARK_OAK_LOG,
                BlockType::DARK_OAK_LEAVES,
            ])
            .unwrap();
        assert!(!registry.should_cull_face(BlockType::DARK_OAK_LEAVES.id()));
        assert!(registry.should_cull_face(BlockType::STONE.id()));
    }

    #[test]
    fn texture_layers_are_sequential_and_padded() {
        let registry = MaterialRegistry::from_json_str(
            r#"[
                { "id": 1, "name": "bedrock", "texture": "bedrock.png" },
                { "id": 6, "name": "grass_block", "texture": ["side.png", "top.png"] },
                { "id": 2, "name": "stone", "texture": "stone.png" }
            ]"#,
        )
        .unwrap();

        assert_eq!(registry.get(1).unwrap().texture_layers, [0; 6]);
        assert_eq!(registry.get(6).unwrap().texture_layers, [1, 2, 2, 2, 2, 2]);
        assert_eq!(registry.get(2).unwrap().texture_layers, [3; 6]);
        assert_eq!(registry.get(6).unwrap().texture_layer(BlockSide::FRONT), 1);
        assert_eq!(registry.texture_paths().len(), 4);
    }

    #[test]
    fn leaves_type_disables_culling() {
        let registry = MaterialRegistry::from_json_str(
            r#"[{ "id": 8, "name": "dark_oak_leaves", "texture": "l.png", "type": "leaves" }]"#,
        )
        .unwrap();
        assert!(!registry.get(8).unwrap().should_cull_face);
    }

    #[test]
    fn rejects_duplicate_reserved_and_mismatched_ids() {
        let duplicate = r#"[
            { "id": 2, "name": "stone", "texture": "a.png" },
            { "id": 2, "name": "stone", "texture": "b.png" }
        ]"#;
        assert!(matches!(
            MaterialRegistry::from_json_str(duplicate),
            Err(MaterialError::DuplicateId { id: 2 })
        ));

        let air = r#"[{ "id": 0, "name": "void", "texture": "a.png" }]"#;
        assert!(matches!(
            MaterialRegistry::from_json_str(air),
            Err(MaterialError::ReservedId { .. })
        ));

        let mismatch = r#"[{ "id": 3, "name": "stone", "texture": "a.png" }]"#;
        assert!(matches!(
            MaterialRegistry::from_json_str(mismatch),
            Err(MaterialError::NameMismatch { id: 3, .. })
        ));

        let empty = r#"[{ "id": 40, "name": "glass", "texture": [] }]"#;
        assert!(matches!(
            MaterialRegistry::from_json_str(empty),
            Err(MaterialError::NoTextures { .. })
        ));
    }

    #[test]
    fn custom_ids_are_allowed() {
        let registry =
            MaterialRegistry::from_json_str(r#"[{ "id": 40, "name": "glass", "texture": "g.png" }]"#)
                .unwrap();
        assert_eq!(registry.get(40).unwrap().name, "glass");
        assert!(matches!(
            registry.require(&[BlockType::STONE]),
            Err(MaterialError::Missing { .. })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            MaterialRegistry::from_json_str("{ not json"),
            Err(MaterialError::Parse { .. })
        ));
        assert!(matches!(
            MaterialRegistry::from_file("does/not/exist.json"),
            Err(MaterialError::Io { .. })
        ));
    }
}
