use super::*;

fn three_stop() -> LinearGradient {
    LinearGradient::vertical(vec![
        ColorStop {
            offset: 0.0,
            color: Rgba8::new(0, 0, 0, 255),
        },
        ColorStop {
            offset: 0.5,
            color: Rgba8::new(100, 100, 100, 255),
        },
        ColorStop {
            offset: 1.0,
            color: Rgba8::new(200, 0, 100, 255),
        },
    ])
    .unwrap()
}

#[test]
fn endpoints_and_midpoint_hit_stops() {
    let g = three_stop();
    assert_eq!(g.color_at(0.0), Rgba8::new(0, 0, 0, 255));
    assert_eq!(g.color_at(0.5), Rgba8::new(100, 100, 100, 255));
    assert_eq!(g.color_at(1.0), Rgba8::new(200, 0, 100, 255));
    assert_eq!(g.color_at(0.25), Rgba8::new(50, 50, 50, 255));
    assert_eq!(g.color_at(-3.0), g.color_at(0.0));
    assert_eq!(g.color_at(9.0), g.color_at(1.0));
}

#[test]
fn rows_sample_pixel_centers() {
    let g = three_stop();
    // Row 0 of a 2px surface sits at t = 0.25.
    assert_eq!(g.color_for_row(0, 2), Rgba8::new(50, 50, 50, 255));
    assert_eq!(g.color_for_row(1, 2), Rgba8::new(150, 50, 100, 255));
}

#[test]
fn invalid_stops_are_rejected() {
    assert!(LinearGradient::vertical(vec![]).is_err());
    let c = Rgba8::new(1, 1, 1, 255);
    assert!(
        LinearGradient::vertical(vec![
            ColorStop { offset: 0.6, color: c },
            ColorStop { offset: 0.2, color: c },
        ])
        .is_err()
    );
    assert!(LinearGradient::vertical(vec![ColorStop { offset: 1.5, color: c }]).is_err());
}
