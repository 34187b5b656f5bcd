//! Scene Import
//!
//! Adapter over the glTF library producing a CPU-side scene tree the
//! assembler can flatten without touching import types again.
//!
//! Import behavior is fixed: primitives are triangulated (strips and fans
//! expanded to triangle lists, point/line primitives dropped) and the
//! right-handed source data is converted to the engine's left-handed
//! convention (Z negated, V flipped, triangle winding swapped).

use std::fs;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use glam::Vec4;
use gltf::Gltf;

use crate::errors::{Result, SmaltError};

/// An imported scene graph, ready for flattening.
#[derive(Debug, Default)]
pub(crate) struct ImportedScene {
    /// Root nodes of the default scene, in declared order.
    pub roots: Vec<ImportedNode>,
    /// The document's material table, in declared order.
    pub materials: Vec<ImportedMaterial>,
}

#[derive(Debug, Default)]
pub(crate) struct ImportedNode {
    /// The node's own meshes, in declared order.
    pub meshes: Vec<ImportedMesh>,
    /// Child nodes, in declared order.
    pub children: Vec<ImportedNode>,
}

/// One triangulated primitive. Attribute sets the source does not provide
/// stay `None`; zero-fill is the assembler's decision.
#[derive(Debug, Default)]
pub(crate) struct ImportedMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub texcoords: Option<Vec<[f32; 2]>>,
    pub indices: Vec<u32>,
    /// Index into [`ImportedScene::materials`], if the primitive has one.
    pub material: Option<usize>,
}

/// Texture roles resolve to the referenced image's URI. Images embedded
/// in buffer views have no path identity and leave the role unset.
#[derive(Debug, Default)]
pub(crate) struct ImportedMaterial {
    pub name: Option<String>,
    pub base_color: Vec4,
    pub diffuse_texture: Option<String>,
    pub specular_texture: Option<String>,
    pub normal_texture: Option<String>,
}

/// Parses the scene file at `path` and converts it.
///
/// External buffers are resolved relative to the file's directory.
pub(crate) fn import_scene(path: &Path) -> Result<ImportedScene> {
    let gltf = Gltf::open(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    scene_from_gltf(gltf, base)
}

fn scene_from_gltf(gltf: Gltf, base: &Path) -> Result<ImportedScene> {
    let Gltf { document, blob } = gltf;
    let buffers = load_buffers(&document, blob, base)?;
    Ok(build_scene(&document, &buffers))
}

/// Materializes every buffer in the document: the GLB binary chunk,
/// base64 `data:` URIs, or files next to the scene.
fn load_buffers(
    document: &gltf::Document,
    mut blob: Option<Vec<u8>>,
    base: &Path,
) -> Result<Vec<Vec<u8>>> {
    let mut buffers = Vec::with_capacity(document.buffers().len());
    for buffer in document.buffers() {
        let mut data = match buffer.source() {
            gltf::buffer::Source::Bin => blob.take().ok_or_else(|| {
                SmaltError::UnsupportedBufferUri("missing GLB binary chunk".to_string())
            })?,
            gltf::buffer::Source::Uri(uri) => {
                if let Some(rest) = uri.strip_prefix("data:") {
                    let encoded = rest
                        .split_once(";base64,")
                        .map(|(_, encoded)| encoded)
                        .ok_or_else(|| SmaltError::UnsupportedBufferUri(uri.to_string()))?;
                    BASE64_STANDARD.decode(encoded)?
                } else {
                    fs::read(base.join(uri))?
                }
            }
        };
        if data.len() < buffer.length() {
            return Err(SmaltError::TruncatedBuffer {
                index: buffer.index(),
            });
        }
        while data.len() % 4 != 0 {
            data.push(0);
        }
        buffers.push(data);
    }
    Ok(buffers)
}

fn build_scene(document: &gltf::Document, buffers: &[Vec<u8>]) -> ImportedScene {
    let materials = document.materials().map(convert_material).collect();
    let roots = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .map(|scene| {
            scene
                .nodes()
                .map(|node| convert_node(&node, buffers))
                .collect()
        })
        .unwrap_or_default();
    ImportedScene { roots, materials }
}

fn convert_node(node: &gltf::Node, buffers: &[Vec<u8>]) -> ImportedNode {
    let meshes = node
        .mesh()
        .map(|mesh| {
            mesh.primitives()
                .filter_map(|primitive| convert_primitive(&primitive, buffers))
                .collect()
        })
        .unwrap_or_default();
    let children = node
        .children()
        .map(|child| convert_node(&child, buffers))
        .collect();
    ImportedNode { meshes, children }
}

fn convert_primitive(primitive: &gltf::Primitive, buffers: &[Vec<u8>]) -> Option<ImportedMesh> {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));

    let Some(position_reader) = reader.read_positions() else {
        log::warn!("Skipping a primitive without position data");
        return None;
    };
    let mut positions: Vec<[f32; 3]> = position_reader.collect();
    let mut normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(Iterator::collect);
    let mut texcoords: Option<Vec<[f32; 2]>> = reader
        .read_tex_coords(0)
        .map(|texcoords| texcoords.into_f32().collect());

    let raw_indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    let mut indices = triangulate(primitive.mode(), &raw_indices)?;

    for position in &mut positions {
        position[2] = -position[2];
    }
    if let Some(normals) = &mut normals {
        for normal in normals {
            normal[2] = -normal[2];
        }
    }
    if let Some(texcoords) = &mut texcoords {
        for texcoord in texcoords {
            texcoord[1] = 1.0 - texcoord[1];
        }
    }
    for triangle in indices.chunks_exact_mut(3) {
        triangle.swap(1, 2);
    }

    Some(ImportedMesh {
        positions,
        normals,
        texcoords,
        indices,
        material: primitive.material().index(),
    })
}

/// Expands the primitive's index list to plain triangles.
///
/// Returns `None` for point and line modes, which have no triangle
/// expansion.
fn triangulate(mode: gltf::mesh::Mode, indices: &[u32]) -> Option<Vec<u32>> {
    use gltf::mesh::Mode;
    match mode {
        // A remainder that cannot form a triangle is dropped, so every
        // emitted triple is a whole triangle the winding swap covers.
        Mode::Triangles => Some(indices[..indices.len() - indices.len() % 3].to_vec()),
        Mode::TriangleStrip => {
            let mut out = Vec::with_capacity(indices.len().saturating_sub(2) * 3);
            for (i, window) in indices.windows(3).enumerate() {
                // Strips alternate winding; normalize every triangle.
                if i % 2 == 0 {
                    out.extend_from_slice(&[window[0], window[1], window[2]]);
                } else {
                    out.extend_from_slice(&[window[1], window[0], window[2]]);
                }
            }
            Some(out)
        }
        Mode::TriangleFan => {
            let mut out = Vec::with_capacity(indices.len().saturating_sub(2) * 3);
            if let Some((hub, rest)) = indices.split_first() {
                for window in rest.windows(2) {
                    out.extend_from_slice(&[*hub, window[0], window[1]]);
                }
            }
            Some(out)
        }
        mode => {
            log::warn!("Skipping a primitive with non-triangle mode {mode:?}");
            None
        }
    }
}

fn convert_material(material: gltf::Material) -> ImportedMaterial {
    let pbr = material.pbr_metallic_roughness();
    ImportedMaterial {
        name: material.name().map(str::to_string),
        base_color: Vec4::from_array(pbr.base_color_factor()),
        diffuse_texture: pbr
            .base_color_texture()
            .and_then(|info| texture_uri(&info.texture())),
        specular_texture: material
            .specular()
            .and_then(|specular| specular.specular_texture())
            .and_then(|info| texture_uri(&info.texture())),
        normal_texture: material
            .normal_texture()
            .and_then(|normal| texture_uri(&normal.texture())),
    }
}

fn texture_uri(texture: &gltf::Texture) -> Option<String> {
    match texture.source().source() {
        gltf::image::Source::Uri { uri, .. } if !uri.is_empty() => Some(uri.to_string()),
        _ => None,
    }
}
