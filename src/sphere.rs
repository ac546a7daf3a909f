use glam::Vec3;

/// Radius of the panorama sphere. Hotspot positions, picking results and the
/// backing geometry all live on this surface.
pub const SPHERE_RADIUS: f32 = 490.0;

/// Neutral color rendered while a scene's media failed to load. The viewer
/// never leaves a previous scene's texture on screen after a failure.
pub const FALLBACK_COLOR: [f32; 4] = [0.13, 0.13, 0.15, 1.0];

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PanoVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl PanoVertex {
    pub fn layout<'a>() -> wgpu::VertexBufferLayout<'a> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<PanoVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[derive(Clone, Debug)]
pub struct SphereMesh {
    pub vertices: Vec<PanoVertex>,
    pub indices: Vec<u32>,
}

/// Builds a UV sphere for equirectangular panorama mapping. The camera sits
/// inside, so triangles wind to face the origin. U runs with longitude, V
/// from pole to pole.
pub fn build_sphere(radius: f32, segments: u32, rings: u32) -> SphereMesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = v * std::f32::consts::PI;
        let (mut sin_phi, cos_phi) = phi.sin_cos();
        if ring == 0 || ring == rings {
            // sin(PI) is a hair off zero in f32; pole vertices must coincide.
            sin_phi = 0.0;
        }
        for segment in 0..=segments {
            let u = segment as f32 / segments as f32;
            let theta = u * std::f32::consts::TAU;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let position = Vec3::new(sin_phi * cos_theta, cos_phi, sin_phi * sin_theta) * radius;
            vertices.push(PanoVertex { position: position.to_array(), uv: [1.0 - u, v] });
        }
    }
    let mut indices = Vec::with_capacity((segments * (rings - 1) * 6) as usize);
    let stride = segments + 1;
    for ring in 0..rings {
        for segment in 0..segments {
            let a = ring * stride + segment;
            let b = a + stride;
            // Reversed winding relative to an outward-facing sphere. The pole
            // rings contribute one triangle per quad; the other one collapses
            // to a line between coincident pole vertices.
            if ring != 0 {
                indices.extend_from_slice(&[a, b, a + 1]);
            }
            if ring != rings - 1 {
                indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }
    SphereMesh { vertices, indices }
}
