use super::*;
use crate::foundation::core::Rgba8;

fn alpha_grid(buf: &PixelBuffer) -> Vec<Vec<u8>> {
    (0..buf.height())
        .map(|y| (0..buf.width()).map(|x| buf.alpha(x, y)).collect())
        .collect()
}

fn from_alpha(rows: &[&[u8]]) -> PixelBuffer {
    let h = rows.len() as u32;
    let w = rows[0].len() as u32;
    let mut buf = PixelBuffer::new(w, h).unwrap();
    for (y, row) in rows.iter().enumerate() {
        for (x, &a) in row.iter().enumerate() {
            buf.set_pixel(x as u32, y as u32, Rgba8::new(90, 80, 70, a));
        }
    }
    buf
}

#[test]
fn isolated_pixel_is_feathered_to_seventy_percent() {
    let mut buf = from_alpha(&[&[0, 0, 0], &[0, 200, 0], &[0, 0, 0]]);
    assert_eq!(smooth_edges(&mut buf), 1);
    assert_eq!(buf.alpha(1, 1), 140);
    assert_eq!(buf.pixel(1, 1).unwrap().rgb(), crate::foundation::core::Rgb8::new(90, 80, 70));
}

#[test]
fn exactly_three_transparent_neighbors_is_left_alone() {
    let mut buf = from_alpha(&[&[0, 0, 0], &[255, 255, 255], &[255, 255, 255]]);
    assert_eq!(smooth_edges(&mut buf), 0);
    assert_eq!(buf.alpha(1, 1), 255);
}

#[test]
fn four_transparent_neighbors_feathers() {
    let mut buf = from_alpha(&[&[0, 0, 0], &[0, 255, 255], &[255, 255, 255]]);
    assert_eq!(smooth_edges(&mut buf), 1);
    assert_eq!(buf.alpha(1, 1), 178);
}

#[test]
fn border_pixels_are_never_modified() {
    // Border pixels sit next to lots of transparency but must stay as they are.
    let mut buf = from_alpha(&[
        &[255, 0, 255, 0, 255],
        &[0, 0, 0, 0, 0],
        &[255, 0, 0, 0, 255],
        &[0, 0, 0, 0, 0],
        &[255, 0, 255, 0, 255],
    ]);
    let before = alpha_grid(&buf);
    smooth_edges(&mut buf);
    let after = alpha_grid(&buf);

    let (w, h) = (5usize, 5usize);
    for y in 0..h {
        for x in 0..w {
            if x == 0 || y == 0 || x == w - 1 || y == h - 1 {
                assert_eq!(after[y][x], before[y][x], "border ({x},{y})");
            }
        }
    }
}

#[test]
fn single_pass_reads_pre_pass_alpha() {
    // A 2px horizontal sliver: each interior pixel sees 7 transparent neighbors regardless
    // of whether its neighbor was already feathered in this pass.
    let mut buf = from_alpha(&[
        &[0, 0, 0, 0],
        &[0, 100, 100, 0],
        &[0, 0, 0, 0],
    ]);
    assert_eq!(smooth_edges(&mut buf), 2);
    assert_eq!(buf.alpha(1, 1), 70);
    assert_eq!(buf.alpha(2, 1), 70);
}

#[test]
fn alpha_only_decreases_and_transparent_pixels_stay_transparent() {
    let rows: Vec<Vec<u8>> = (0..8u32)
        .map(|y| {
            (0..8u32)
                .map(|x| if (x * 7 + y * 3) % 5 < 2 { 0 } else { (x * 31 + y * 17) as u8 | 1 })
                .collect()
        })
        .collect();
    let row_refs: Vec<&[u8]> = rows.iter().map(|r| r.as_slice()).collect();
    let mut buf = from_alpha(&row_refs);
    let before = alpha_grid(&buf);
    smooth_edges(&mut buf);
    let after = alpha_grid(&buf);

    for y in 0..8 {
        for x in 0..8 {
            assert!(after[y][x] <= before[y][x], "({x},{y}) increased");
            if before[y][x] == 0 {
                assert_eq!(after[y][x], 0);
            }
        }
    }
}

#[test]
fn tiny_buffers_are_untouched() {
    let mut buf = from_alpha(&[&[255, 0], &[0, 0]]);
    assert_eq!(smooth_edges(&mut buf), 0);
    assert_eq!(buf.alpha(0, 0), 255);
}

#[test]
fn feathered_alpha_rounds_the_double_precision_product() {
    // 45 * 0.7 is 31.499999999999996 in f64 but rounds up to 32 in f32.
    for (a, expected) in [(45u8, 31u8), (85, 59), (165, 115), (175, 122), (10, 7), (255, 178)] {
        let mut buf = from_alpha(&[&[0, 0, 0], &[0, a, 0], &[0, 0, 0]]);
        assert_eq!(smooth_edges(&mut buf), 1);
        assert_eq!(buf.alpha(1, 1), expected, "alpha {a}");
    }
}
