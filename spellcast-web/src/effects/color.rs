//! Linear RGB colors and the aurora hue cycle

pub type Color = [f32; 3];

/// `0xRRGGBB` to RGB in [0, 1]
pub const fn hex(rgb: u32) -> Color {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    ]
}

/// HSV to RGB, all components in [0, 1]; hue wraps
pub fn hsv(h: f32, s: f32, v: f32) -> Color {
    let h = h.rem_euclid(1.0) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    match sector as u32 % 6 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// Aurora ball tint at `phase` (in hue turns), with its emissive intensity
pub fn aurora_cycle(phase: f32) -> (Color, f32) {
    let color = hsv(phase, 0.7, 1.0);
    let intensity = 2.5 + (phase * 2.0).sin() * 0.7;
    (color, intensity)
}
