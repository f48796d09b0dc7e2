//! 2D shape batching in clip space

pub type Rgba = [f32; 4];

/// Vertex structure for rendering colored shapes
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Rgba,
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x4
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Triangle list collected for one frame
#[derive(Default)]
pub struct ShapeBatch {
    vertices: Vec<Vertex>,
}

impl ShapeBatch {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    fn tri(&mut self, a: [f32; 2], b: [f32; 2], c: [f32; 2], color: Rgba) {
        self.vertices.extend([a, b, c].map(|position| Vertex { position, color }));
    }

    /// Filled circle as a fan of `segments` triangles
    pub fn circle(&mut self, center: [f32; 2], radius: f32, color: Rgba, segments: u32) {
        let [cx, cy] = center;
        let step = std::f32::consts::TAU / segments.max(3) as f32;
        for i in 0..segments.max(3) {
            let (a1, a2) = (i as f32 * step, (i + 1) as f32 * step);
            self.tri(
                center,
                [cx + radius * a1.cos(), cy + radius * a1.sin()],
                [cx + radius * a2.cos(), cy + radius * a2.sin()],
                color,
            );
        }
    }

    /// Line segment as a thin quad
    pub fn line(&mut self, from: [f32; 2], to: [f32; 2], width: f32, color: Rgba) {
        let (dx, dy) = (to[0] - from[0], to[1] - from[1]);
        let len = dx.hypot(dy);
        if len < 0.001 {
            return;
        }
        // Perpendicular offset for thickness
        let (px, py) = (-dy / len * width, dx / len * width);
        let a = [from[0] - px, from[1] - py];
        let b = [from[0] + px, from[1] + py];
        let c = [to[0] + px, to[1] + py];
        let d = [to[0] - px, to[1] - py];
        self.tri(a, b, c, color);
        self.tri(a, c, d, color);
    }

    /// Axis-aligned rectangle from its lower-left and upper-right corners
    pub fn rect(&mut self, min: [f32; 2], max: [f32; 2], color: Rgba) {
        let (a, c) = (min, max);
        let (b, d) = ([max[0], min[1]], [min[0], max[1]]);
        self.tri(a, b, c, color);
        self.tri(a, c, d, color);
    }
}
