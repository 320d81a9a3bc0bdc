use crate::raster::buffer::PixelBuffer;

/// Neighbor count (out of 8) above which a pixel is considered part of a cut edge.
pub const EDGE_NEIGHBOR_THRESHOLD: usize = 3;
/// Alpha multiplier applied to edge pixels.
pub const EDGE_ALPHA_FACTOR: f64 = 0.7;

const NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// One feathering pass over the interior of `buf`.
///
/// Every decision reads the alpha channel as it was before the pass started, so the order pixels
/// are visited in does not matter. The outermost rows and columns are never written. Returns the
/// number of pixels whose alpha was reduced.
pub fn smooth_edges(buf: &mut PixelBuffer) -> usize {
    let (w, h) = (buf.width(), buf.height());
    if w < 3 || h < 3 {
        return 0;
    }

    let before: Vec<u8> = buf.data().iter().skip(3).step_by(4).copied().collect();
    let alpha_at = |x: i64, y: i64| before[(y as usize) * (w as usize) + (x as usize)];

    let mut feathered = 0;
    for y in 1..i64::from(h) - 1 {
        for x in 1..i64::from(w) - 1 {
            let a = alpha_at(x, y);
            if a == 0 {
                continue;
            }
            let transparent = NEIGHBORS
                .iter()
                .filter(|(dx, dy)| alpha_at(x + dx, y + dy) == 0)
                .count();
            if transparent > EDGE_NEIGHBOR_THRESHOLD {
                let idx = buf.index(x as u32, y as u32) + 3;
                buf.data_mut()[idx] = (f64::from(a) * EDGE_ALPHA_FACTOR).round() as u8;
                feathered += 1;
            }
        }
    }
    feathered
}

#[cfg(test)]
#[path = "../../tests/unit/effects/smooth.rs"]
mod tests;
