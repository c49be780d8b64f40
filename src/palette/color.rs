use crate::foundation::core::Rgba;
use crate::palette::primitive::Oklch;

/// Convert a perceptual color to gamma-encoded sRGB, clamping out-of-gamut channels.
pub fn oklch_to_rgba(c: Oklch, alpha: f32) -> Rgba {
    let h = c.h.to_radians();
    let (a, b) = (c.c * h.cos(), c.c * h.sin());

    let l_ = c.l + 0.396_337_78 * a + 0.215_803_76 * b;
    let m_ = c.l - 0.105_561_346 * a - 0.063_854_17 * b;
    let s_ = c.l - 0.089_484_18 * a - 1.291_485_5 * b;
    let (l, m, s) = (l_ * l_ * l_, m_ * m_ * m_, s_ * s_ * s_);

    let r = 4.076_741_7 * l - 3.307_711_6 * m + 0.230_969_94 * s;
    let g = -1.268_438 * l + 2.609_757_4 * m - 0.341_319_38 * s;
    let bl = -0.004_196_086_3 * l - 0.703_418_6 * m + 1.707_614_7 * s;

    Rgba::new(encode(r), encode(g), encode(bl), alpha.clamp(0.0, 1.0))
}

fn encode(linear: f32) -> f32 {
    let x = linear.clamp(0.0, 1.0);
    if x <= 0.003_130_8 {
        12.92 * x
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    }
}
