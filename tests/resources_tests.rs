//! Resource Record Tests
//!
//! Tests for:
//! - Vertex: buffer layout against the repr(C) memory layout, Pod casting
//! - RasterizerMode: construction default
//! - Material: default role ids and color

use glam::Vec4;

use smalt::{Material, RasterizerMode, Vertex};

// ============================================================================
// Vertex Format
// ============================================================================

#[test]
fn vertex_layout_matches_memory_layout() {
    let layout = Vertex::layout();
    assert_eq!(layout.array_stride, std::mem::size_of::<Vertex>() as u64);
    assert_eq!(layout.array_stride, 32);
    assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
}

#[test]
fn vertex_attributes_are_position_texcoord_normal() {
    let layout = Vertex::layout();
    let attrs = layout.attributes;
    assert_eq!(attrs.len(), 3);

    assert_eq!(attrs[0].shader_location, 0);
    assert_eq!(attrs[0].format, wgpu::VertexFormat::Float32x3);
    assert_eq!(attrs[0].offset, 0);

    assert_eq!(attrs[1].shader_location, 1);
    assert_eq!(attrs[1].format, wgpu::VertexFormat::Float32x2);
    assert_eq!(attrs[1].offset, 12);

    assert_eq!(attrs[2].shader_location, 2);
    assert_eq!(attrs[2].format, wgpu::VertexFormat::Float32x3);
    assert_eq!(attrs[2].offset, 20);
}

#[test]
fn vertices_cast_to_bytes_for_upload() {
    let vertices = [
        Vertex {
            position: [1.0, 2.0, 3.0],
            texcoord: [0.5, 0.5],
            normal: [0.0, 1.0, 0.0],
        },
        Vertex::default(),
    ];

    let bytes: &[u8] = bytemuck::cast_slice(&vertices);
    assert_eq!(bytes.len(), 64);
    // First float of the first position.
    assert_eq!(&bytes[0..4], &1.0_f32.to_le_bytes());
}

// ============================================================================
// Mode & Material Defaults
// ============================================================================

#[test]
fn rasterizer_mode_defaults_to_solid() {
    assert_eq!(RasterizerMode::default(), RasterizerMode::Solid);
}

#[test]
fn default_material_has_no_textures_and_zero_color() {
    let material = Material::default();
    assert_eq!(material.diffuse_texture, 0);
    assert_eq!(material.specular_texture, 0);
    assert_eq!(material.normal_texture, 0);
    assert_eq!(material.color, Vec4::ZERO);
}
