use bytemuck::{Pod, Zeroable};

use crate::types::Variant;

/// Number of vertices every variant draws.
pub const TRIANGLE_VERTEX_COUNT: u32 = 3;

/// Interleaved layout (24 bytes):
///
///  offset  0  position  [f32; 3]   loc 0
///  offset 12  color     [f32; 3]   loc 1
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl ColorVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Interleaved layout (32 bytes):
///
///  offset  0  position    [f32; 3]   loc 0
///  offset 12  color       [f32; 3]   loc 1
///  offset 24  tex_coords  [f32; 2]   loc 2
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl TexturedVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3, // color
        2 => Float32x2  // tex_coords
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexturedVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

#[rustfmt::skip]
pub const TRIANGLE: [ColorVertex; 3] = [
    ColorVertex { position: [ 0.5, -0.5, 0.0], color: [1.0, 0.0, 0.0] }, // bottom right
    ColorVertex { position: [-0.5, -0.5, 0.0], color: [0.0, 1.0, 0.0] }, // bottom left
    ColorVertex { position: [ 0.0,  0.5, 0.0], color: [0.0, 0.0, 1.0] }, // top
];

#[rustfmt::skip]
pub const TEXTURED_TRIANGLE: [TexturedVertex; 3] = [
    TexturedVertex { position: [ 0.5, -0.5, 0.0], color: [1.0, 0.0, 0.0], tex_coords: [1.0, 0.0] },
    TexturedVertex { position: [-0.5, -0.5, 0.0], color: [0.0, 1.0, 0.0], tex_coords: [0.0, 0.0] },
    TexturedVertex { position: [ 0.0,  0.5, 0.0], color: [0.0, 0.0, 1.0], tex_coords: [0.5, 1.0] },
];

/// Vertex bytes plus the layout the pipeline needs to interpret them.
pub struct VertexData {
    bytes: Vec<u8>,
    layout: wgpu::VertexBufferLayout<'static>,
    count: u32,
}

impl VertexData {
    pub fn for_variant(variant: Variant) -> Self {
        if variant.is_textured() {
            Self {
                bytes: bytemuck::cast_slice(&TEXTURED_TRIANGLE).to_vec(),
                layout: TexturedVertex::layout(),
                count: TRIANGLE_VERTEX_COUNT,
            }
        } else {
            Self {
                bytes: bytemuck::cast_slice(&TRIANGLE).to_vec(),
                layout: ColorVertex::layout(),
                count: TRIANGLE_VERTEX_COUNT,
            }
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn layout(&self) -> &wgpu::VertexBufferLayout<'static> {
        &self.layout
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_vertex_layout_matches_interleaved_offsets() {
        let layout = ColorVertex::layout();
        assert_eq!(layout.array_stride, 6 * 4);
        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12]);
        let locations: Vec<_> = layout
            .attributes
            .iter()
            .map(|a| a.shader_location)
            .collect();
        assert_eq!(locations, vec![0, 1]);
    }

    #[test]
    fn textured_vertex_layout_appends_tex_coords() {
        let layout = TexturedVertex::layout();
        assert_eq!(layout.array_stride, 8 * 4);
        let last = layout.attributes.last().expect("tex coord attribute");
        assert_eq!(last.offset, 24);
        assert_eq!(last.shader_location, 2);
        assert_eq!(last.format, wgpu::VertexFormat::Float32x2);
    }

    #[test]
    fn vertex_data_length_is_stride_times_count() {
        for variant in [Variant::Inline, Variant::FileShaders, Variant::Textured] {
            let data = VertexData::for_variant(variant);
            assert_eq!(data.count(), 3);
            assert_eq!(
                data.bytes().len() as u64,
                data.layout().array_stride * u64::from(data.count())
            );
        }
    }

    #[test]
    fn triangle_corners_carry_primary_colors() {
        assert_eq!(TRIANGLE[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(TRIANGLE[1].color, [0.0, 1.0, 0.0]);
        assert_eq!(TRIANGLE[2].color, [0.0, 0.0, 1.0]);
        for (plain, textured) in TRIANGLE.iter().zip(TEXTURED_TRIANGLE.iter()) {
            assert_eq!(plain.position, textured.position);
        }
    }
}
