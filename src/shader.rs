use bytemuck::{Pod, Zeroable};

/// Point-cloud render shader: instanced screen-facing quads.
pub const POINTS_SHADER: &str = include_str!("shader.wgsl");

/// Uniform block matching `Uniforms` in `shader.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    /// Surface size in physical pixels.
    pub viewport: [f32; 2],
    pub point_size: f32,
    pub _padding: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniforms_size_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 144);
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
    }
}
