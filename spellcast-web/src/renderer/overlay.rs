//! Debug overlay - hand skeletons, projectile markers, boss marker, HP bar

use super::shapes::{Rgba, ShapeBatch};
use super::state::{GPU_STATE, MAX_VERTICES};
use crate::bridge;
use crate::gesture::{HandLandmarks, HandsInput, HAND_SKELETON, PALM};
use crate::world::{Camera, World};

mod colors {
    use super::Rgba;

    pub const BONE: Rgba = [0.2, 0.9, 0.9, 0.7];
    pub const JOINT: Rgba = [1.0, 0.2, 0.2, 1.0];
    pub const PALM: Rgba = [1.0, 0.9, 0.2, 1.0];
    pub const BOSS: Rgba = [0.8, 0.3, 1.0, 0.8];
    pub const HP_BACK: Rgba = [0.1, 0.1, 0.1, 0.6];
    pub const HP_FILL: Rgba = [0.9, 0.15, 0.2, 0.9];
    pub const CLEAR: wgpu::Color = wgpu::Color::TRANSPARENT;
}

/// Landmarks are mirrored to match the selfie view
fn landmark_clip(hand: &HandLandmarks, joint: usize) -> [f32; 2] {
    let ndc = Camera::landmark_ndc(&hand[joint]);
    [ndc.x, ndc.y]
}

/// Clip-space position of a world point, `None` when behind the camera
fn world_clip(camera: &Camera, point: &nalgebra::Point3<f32>) -> Option<[f32; 2]> {
    let ndc = camera.project(point);
    (ndc.z.abs() <= 1.0).then_some([ndc.x, ndc.y])
}

fn draw_hands(batch: &mut ShapeBatch, hands: &HandsInput) {
    for hand in hands.iter().flatten() {
        for (from, to) in HAND_SKELETON {
            batch.line(landmark_clip(hand, from), landmark_clip(hand, to), 0.005, colors::BONE);
        }
        for joint in 0..hand.len() {
            let (color, radius) = if joint == PALM {
                (colors::PALM, 0.016)
            } else {
                (colors::JOINT, 0.009)
            };
            batch.circle(landmark_clip(hand, joint), radius, color, 10);
        }
    }
}

fn draw_world(batch: &mut ShapeBatch, world: &World) {
    let camera = world.camera();
    let snapshot = world.snapshot();

    if let Some(boss) = world.boss() {
        if let Some(at) = world_clip(camera, &boss.position) {
            batch.circle(at, 0.04, colors::BOSS, 20);
        }
        // HP bar along the top edge
        let ratio = boss.health_ratio();
        batch.rect([-0.6, 0.88], [0.6, 0.93], colors::HP_BACK);
        batch.rect([-0.6, 0.88], [-0.6 + 1.2 * ratio, 0.93], colors::HP_FILL);
    }

    for projectile in &snapshot.projectiles {
        let [x, y, z] = projectile.position;
        if let Some(at) = world_clip(camera, &nalgebra::Point3::new(x, y, z)) {
            let [r, g, b] = projectile.color;
            let radius = 0.01 + 0.02 * projectile.scale.min(2.0);
            batch.circle(at, radius, [r, g, b, if projectile.held { 0.6 } else { 1.0 }], 14);
        }
    }
}

/// Render one overlay frame from the current world
pub fn render_frame() {
    let mut batch = ShapeBatch::default();
    draw_hands(&mut batch, &bridge::latest_hands());
    bridge::with_game(|game| draw_world(&mut batch, game.world()));

    GPU_STATE.with(|state_cell| {
        let state_ref = state_cell.borrow();
        let Some(state) = state_ref.as_ref() else {
            return;
        };

        let output = match state.surface.get_current_texture() {
            Ok(t) => t,
            Err(err) => {
                log::debug!("skipping overlay frame: {:?}", err);
                return;
            }
        };

        let vertices = batch.vertices();
        let count = vertices.len().min(MAX_VERTICES / 3 * 3);
        if count > 0 {
            state
                .queue
                .write_buffer(&state.vertex_buffer, 0, bytemuck::cast_slice(&vertices[..count]));
        }

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = state.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Overlay Encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(colors::CLEAR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if count > 0 {
                pass.set_pipeline(&state.render_pipeline);
                pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                pass.draw(0..count as u32, 0..1);
            }
        }

        state.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    });
}
