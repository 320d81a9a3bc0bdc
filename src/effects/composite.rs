use crate::foundation::error::{ComposeError, ComposeResult};
use crate::foundation::math::{add_sat_u8, mul_div255};
use crate::raster::buffer::PixelBuffer;

pub type PremulRgba8 = [u8; 4];
pub type StraightRgba8 = [u8; 4];

/// Porter-Duff source-over on premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn premultiply(px: StraightRgba8) -> PremulRgba8 {
    let a = u16::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    [
        mul_div255(u16::from(px[0]), a),
        mul_div255(u16::from(px[1]), a),
        mul_div255(u16::from(px[2]), a),
        px[3],
    ]
}

pub fn unpremultiply(px: PremulRgba8) -> StraightRgba8 {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| -> u8 { ((u32::from(c) * 255 + a / 2) / a).min(255) as u8 };
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

/// Source-over for straight-alpha pixels (the storage format of [`PixelBuffer`]).
pub fn over_straight(dst: StraightRgba8, src: StraightRgba8) -> StraightRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }
    unpremultiply(over(premultiply(dst), premultiply(src), 1.0))
}

/// Blend `src` over `dst` with its top-left corner at `(x, y)`, clipped to `dst`.
pub fn blit_over(dst: &mut PixelBuffer, src: &PixelBuffer, x: i64, y: i64) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + sw).min(dw);
    let y1 = (y + sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let src_data = src.data();
    for dy in y0..y1 {
        let sy = dy - y;
        for dx in x0..x1 {
            let sx = dx - x;
            let si = ((sy * sw + sx) as usize) * 4;
            let s = [
                src_data[si],
                src_data[si + 1],
                src_data[si + 2],
                src_data[si + 3],
            ];
            if s[3] == 0 {
                continue;
            }
            let di = dst.index(dx as u32, dy as u32);
            let d = &mut dst.data_mut()[di..di + 4];
            let out = over_straight([d[0], d[1], d[2], d[3]], s);
            d.copy_from_slice(&out);
        }
    }
}

pub fn premultiply_in_place(rgba: &mut [u8]) -> ComposeResult<()> {
    if !rgba.len().is_multiple_of(4) {
        return Err(ComposeError::validation("rgba8 buffer length must be a multiple of 4"));
    }
    for px in rgba.chunks_exact_mut(4) {
        let out = premultiply([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&out);
    }
    Ok(())
}

pub fn unpremultiply_in_place(rgba: &mut [u8]) -> ComposeResult<()> {
    if !rgba.len().is_multiple_of(4) {
        return Err(ComposeError::validation("rgba8 buffer length must be a multiple of 4"));
    }
    for px in rgba.chunks_exact_mut(4) {
        let out = unpremultiply([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
