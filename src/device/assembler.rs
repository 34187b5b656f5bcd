//! Scene Assembly
//!
//! Turns an imported scene tree into GPU-backed meshes. Nodes flatten
//! depth-first with a node's own meshes ahead of its children, each mesh
//! creates its vertex and index buffers as a concurrent pair, and material
//! texture roles load concurrently after a dedup pass against the texture
//! cache keyed by the scene file's raw paths.

use std::thread;

use crate::assets::importer::{ImportedMaterial, ImportedMesh, ImportedNode};
use crate::assets::resolve_asset_path;
use crate::resources::{CachedResource, Material, Mesh, ResourceCache, Texture, Vertex};

use super::RenderingDevice;
use super::builder;
use super::parallel;

/// Meshes of every node in traversal order: a node's meshes first, then
/// its children, recursively.
pub(crate) fn flatten_nodes(nodes: &[ImportedNode]) -> Vec<&ImportedMesh> {
    let mut meshes = Vec::new();
    collect_meshes(nodes, &mut meshes);
    meshes
}

fn collect_meshes<'scene>(nodes: &'scene [ImportedNode], out: &mut Vec<&'scene ImportedMesh>) {
    for node in nodes {
        out.extend(node.meshes.iter());
        collect_meshes(&node.children, out);
    }
}

/// Interleaves mesh attributes into the fixed vertex format.
///
/// Attribute sets the import left out, and entries past the end of a
/// short attribute set, fill with zeroes.
pub(crate) fn assemble_vertices(mesh: &ImportedMesh) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(mesh.positions.len());
    for (index, position) in mesh.positions.iter().enumerate() {
        let texcoord = mesh
            .texcoords
            .as_ref()
            .and_then(|texcoords| texcoords.get(index))
            .copied()
            .unwrap_or_default();
        let normal = mesh
            .normals
            .as_ref()
            .and_then(|normals| normals.get(index))
            .copied()
            .unwrap_or_default();
        vertices.push(Vertex {
            position: *position,
            texcoord,
            normal,
        });
    }
    vertices
}

impl RenderingDevice {
    /// Builds one GPU mesh from an imported primitive.
    ///
    /// Vertex and index buffers are created on a pair of forked threads.
    /// A failed buffer is logged and left `None`; the mesh is still
    /// produced and recorded.
    pub(crate) fn process_mesh(
        &mut self,
        imported: &ImportedMesh,
        materials: &[ImportedMaterial],
    ) -> Mesh {
        let vertices = assemble_vertices(imported);

        let device = &self.device;
        let (vertex_buffer, index_buffer) = parallel::join2(
            || builder::create_vertex_buffer(device, &vertices),
            || builder::create_index_buffer(device, &imported.indices),
        );
        if vertex_buffer.is_none() || index_buffer.is_none() {
            log::error!("Failed to create one or more buffers");
        }

        let mut material = Material::default();
        if let Some(imported_material) = imported
            .material
            .and_then(|index| materials.get(index))
        {
            log::info!("Processing mesh materials...");
            material = self.process_material(imported_material);
        }

        Mesh {
            vertex_buffer,
            index_buffer,
            index_count: imported.indices.len() as u32,
            material,
        }
    }

    /// Resolves a material's texture roles against the texture cache and
    /// loads the misses, one forked thread per missing role.
    ///
    /// Dedup compares the raw path as written in the scene file; a loaded
    /// texture is cached under that same raw path so the next mesh
    /// referencing it resolves without a load.
    pub(crate) fn process_material(&mut self, imported: &ImportedMaterial) -> Material {
        let label = imported.name.as_deref().unwrap_or("unnamed");
        log::info!("Processing material {label}");

        let roles = [
            imported.diffuse_texture.as_deref(),
            imported.specular_texture.as_deref(),
            imported.normal_texture.as_deref(),
        ];

        let device = &self.device;
        let queue = &self.queue;
        let texture_root = &self.roots.textures;
        let resolved = resolve_texture_roles(
            &mut self.textures,
            roles,
            |texture| texture.path.as_str(),
            |pending| {
                thread::scope(|scope| {
                    let units = pending.map(|role| {
                        role.map(|raw_path| {
                            scope.spawn(move || {
                                let path = resolve_asset_path(texture_root, raw_path);
                                builder::load_texture_from_file(device, queue, &path)
                            })
                        })
                    });
                    units.map(|unit| unit.and_then(parallel::join_unit))
                })
            },
            |id, path, (texture, view)| Texture {
                id,
                path,
                texture,
                view,
            },
        );

        Material {
            color: imported.base_color,
            diffuse_texture: resolved[0],
            specular_texture: resolved[1],
            normal_texture: resolved[2],
        }
    }
}

/// The cache side of material role resolution: probe each requested role
/// by its raw path, hand the misses to `load` as one batch, and record
/// every payload that comes back under the raw path it was requested for.
///
/// Roles that hit the cache keep the existing id and never reach `load`;
/// roles whose load produced nothing stay `0`. The load step is a
/// parameter so this machinery runs the same against forked GPU loads and
/// against stub payloads in tests.
pub(crate) fn resolve_texture_roles<'scene, T, R>(
    cache: &mut ResourceCache<T>,
    roles: [Option<&'scene str>; 3],
    path_of: impl Fn(&T) -> &str,
    load: impl FnOnce([Option<&'scene str>; 3]) -> [Option<R>; 3],
    record: impl Fn(u32, String, R) -> T,
) -> [u32; 3]
where
    T: CachedResource,
{
    let mut resolved = [0u32; 3];
    let mut pending: [Option<&'scene str>; 3] = [None; 3];
    for (slot, role) in roles.iter().enumerate() {
        let Some(raw_path) = *role else { continue };
        match cache.find_id(|entry| path_of(entry) == raw_path) {
            Some(id) => resolved[slot] = id,
            None => pending[slot] = Some(raw_path),
        }
    }

    let loaded = load(pending);

    for (slot, outcome) in loaded.into_iter().enumerate() {
        let Some(payload) = outcome else { continue };
        let Some(raw_path) = pending[slot] else { continue };
        resolved[slot] = cache.insert_with(|id| record(id, raw_path.to_owned(), payload));
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CachedPath {
        id: u32,
        path: String,
    }

    impl CachedResource for CachedPath {
        fn id(&self) -> u32 {
            self.id
        }
    }

    /// Drives role resolution with stub payloads: a pending slot loads
    /// successfully iff its entry in `outcomes` is true.
    fn resolve(
        cache: &mut ResourceCache<CachedPath>,
        roles: [Option<&str>; 3],
        outcomes: [bool; 3],
    ) -> [u32; 3] {
        resolve_texture_roles(
            cache,
            roles,
            |entry| entry.path.as_str(),
            |pending| {
                let mut loaded = [None, None, None];
                for (slot, role) in pending.into_iter().enumerate() {
                    if role.is_some() && outcomes[slot] {
                        loaded[slot] = Some(());
                    }
                }
                loaded
            },
            |id, path, ()| CachedPath { id, path },
        )
    }

    #[test]
    fn roles_dedup_against_the_cache_across_materials() {
        let mut cache = ResourceCache::new();

        let first = resolve(&mut cache, [Some("wood.png"), None, None], [true; 3]);
        assert_eq!(first, [1, 0, 0]);
        assert_eq!(cache.len(), 1);

        // A second material referencing the same path must resolve from
        // the cache: every load here is rigged to fail, so a nonzero id
        // can only come from the probe.
        let second = resolve(
            &mut cache,
            [Some("wood.png"), None, Some("wood.png")],
            [false; 3],
        );
        assert_eq!(second, [1, 0, 1]);
        assert_eq!(cache.len(), 1, "a cache hit creates no new entry");
    }

    #[test]
    fn failed_role_loads_insert_nothing() {
        let mut cache = ResourceCache::new();

        let resolved = resolve(
            &mut cache,
            [Some("a.png"), Some("b.png"), Some("c.png")],
            [false; 3],
        );
        assert_eq!(resolved, [0, 0, 0]);
        assert!(cache.is_empty(), "failed loads must not mutate the cache");
    }

    #[test]
    fn loaded_roles_are_recorded_under_their_raw_path() {
        let mut cache = ResourceCache::new();
        cache.insert(CachedPath {
            id: 1,
            path: "cached.png".to_string(),
        });

        let resolved = resolve(
            &mut cache,
            [Some("cached.png"), Some("fresh.png"), Some("broken.png")],
            [true, true, false],
        );
        assert_eq!(resolved, [1, 2, 0]);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.find_id(|entry| entry.path == "fresh.png"), Some(2));
    }

    #[test]
    fn unreferenced_roles_stay_unset() {
        let mut cache = ResourceCache::new();
        let resolved = resolve(&mut cache, [None, None, None], [true; 3]);
        assert_eq!(resolved, [0, 0, 0]);
        assert!(cache.is_empty());
    }

    fn marker_mesh(marker: f32) -> ImportedMesh {
        ImportedMesh {
            positions: vec![[marker, 0.0, 0.0]],
            ..Default::default()
        }
    }

    #[test]
    fn flattening_visits_node_meshes_before_children() {
        let tree = vec![
            ImportedNode {
                meshes: vec![marker_mesh(1.0)],
                children: vec![ImportedNode {
                    meshes: vec![marker_mesh(2.0), marker_mesh(3.0)],
                    children: Vec::new(),
                }],
            },
            ImportedNode {
                meshes: vec![marker_mesh(4.0)],
                children: Vec::new(),
            },
        ];

        let order: Vec<f32> = flatten_nodes(&tree)
            .iter()
            .map(|mesh| mesh.positions[0][0])
            .collect();
        assert_eq!(order, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn assembly_zero_fills_missing_attributes() {
        let mesh = ImportedMesh {
            positions: vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            normals: None,
            texcoords: Some(vec![[0.25, 0.75]]),
            indices: vec![0, 1],
            material: None,
        };

        let vertices = assemble_vertices(&mesh);
        assert_eq!(vertices.len(), 2);
        assert_eq!(
            vertices[0],
            Vertex {
                position: [1.0, 2.0, 3.0],
                texcoord: [0.25, 0.75],
                normal: [0.0; 3],
            }
        );
        // The second vertex is past the end of the texcoord set.
        assert_eq!(
            vertices[1],
            Vertex {
                position: [4.0, 5.0, 6.0],
                texcoord: [0.0; 2],
                normal: [0.0; 3],
            }
        );
    }

    #[test]
    fn assembly_interleaves_full_attribute_sets() {
        let mesh = ImportedMesh {
            positions: vec![[1.0, 0.0, 0.0]],
            normals: Some(vec![[0.0, 1.0, 0.0]]),
            texcoords: Some(vec![[0.5, 0.5]]),
            indices: vec![0],
            material: None,
        };

        let vertices = assemble_vertices(&mesh);
        assert_eq!(
            vertices[0],
            Vertex {
                position: [1.0, 0.0, 0.0],
                texcoord: [0.5, 0.5],
                normal: [0.0, 1.0, 0.0],
            }
        );
    }
}
