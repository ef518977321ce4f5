//! Bounding box tests

use parcelmap::domain::model::BoundingBox;

fn samples() -> Vec<BoundingBox> {
    let coords = [-400.0, -181.0, -90.5, -12.25, 0.0, 33.3, 90.0, 179.9, 250.0];
    let mut out = Vec::new();
    for &w in &coords {
        for &s in &coords {
            out.push(BoundingBox::new(w, s, -w / 2.0 + 1.0, s * 0.75 - 3.0));
        }
    }
    out
}

#[test]
fn test_normalized_orders_edges() {
    for b in samples() {
        let n = b.normalized();
        assert!(n.west <= n.east, "{b:?}");
        assert!(n.south <= n.north, "{b:?}");
    }

    let swapped = BoundingBox::new(-73.9, 42.9, -74.0, 42.8).normalized();
    assert_eq!(swapped, BoundingBox::new(-74.0, 42.8, -73.9, 42.9));
}

#[test]
fn test_clamp_bounds_coordinates() {
    for b in samples() {
        let c = b.clamp();
        for v in [c.west, c.east] {
            assert!((-180.0..=180.0).contains(&v), "{b:?}");
        }
        for v in [c.south, c.north] {
            assert!((-90.0..=90.0).contains(&v), "{b:?}");
        }
    }
}

#[test]
fn test_clamp_does_not_reorder() {
    let b = BoundingBox::new(200.0, 10.0, 190.0, 5.0).clamp();
    assert_eq!(b, BoundingBox::new(180.0, 10.0, 180.0, 5.0));
}

#[test]
fn test_area_never_negative() {
    for b in samples() {
        assert!(b.approx_area_deg2() >= 0.0, "{b:?}");
    }
}

#[test]
fn test_area_degenerate_is_zero() {
    assert_eq!(BoundingBox::new(-74.0, 42.0, -74.0, 43.0).approx_area_deg2(), 0.0);
    assert_eq!(BoundingBox::new(-74.0, 42.0, -73.0, 42.0).approx_area_deg2(), 0.0);
    // collapses to the antimeridian after clamping
    assert_eq!(BoundingBox::new(190.0, 0.0, 200.0, 1.0).approx_area_deg2(), 0.0);
}

#[test]
fn test_area_uses_normalized_clamped_box() {
    let b = BoundingBox::new(-73.0, 43.0, -74.0, 42.0);
    assert_eq!(b.approx_area_deg2(), 1.0);

    let world = BoundingBox::new(-500.0, -100.0, 500.0, 100.0);
    assert_eq!(world.approx_area_deg2(), 360.0 * 180.0);
}

#[test]
fn test_envelope_keys() {
    let env = BoundingBox::new(-74.0, 42.8, -73.9, 42.9).to_envelope();
    let json = serde_json::to_value(env).unwrap();
    assert_eq!(json["xmin"], -74.0);
    assert_eq!(json["ymin"], 42.8);
    assert_eq!(json["xmax"], -73.9);
    assert_eq!(json["ymax"], 42.9);
    assert_eq!(json["spatialReference"]["wkid"], 4326);
}

#[test]
fn test_parse_from_cli() {
    let b: BoundingBox = "-74.0, 42.8,-73.9,42.9".parse().unwrap();
    assert_eq!(b, BoundingBox::new(-74.0, 42.8, -73.9, 42.9));

    assert!("1,2,3".parse::<BoundingBox>().is_err());
    assert!("a,b,c,d".parse::<BoundingBox>().is_err());
    assert!("1,2,3,NaN".parse::<BoundingBox>().is_err());
}
