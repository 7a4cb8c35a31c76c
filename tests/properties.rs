use ledge::{test_circle_polygon, test_polygon_circle, test_polygon_polygon, Circle, Fp, Polygon, Rect, Response, Vector};
use proptest::prelude::*;

fn rect(x: i32, y: i32, w: i32, h: i32) -> Polygon {
    Rect::new(Vector::new(x as Fp, y as Fp), w as Fp, h as Fp).to_polygon()
}

fn regular(pos: Vector, r: Fp, sides: usize, turn: Fp) -> Polygon {
    //! A convex polygon with `sides` vertices on a circle, wound like a box.
    let step = std::f64::consts::PI as Fp * 2.0 / sides as Fp;
    let points = (0..sides)
        .map(|i| {
            let (sin, cos) = (turn + step * i as Fp).sin_cos();
            Vector::new(r * cos, r * sin)
        })
        .collect();
    Polygon::new(pos, points)
}

fn overlap_1d(a0: i32, a1: i32, b0: i32, b1: i32) -> Option<i32> {
    if a1 < b0 || b1 < a0 {
        None
    } else {
        Some((a1 - b0).min(b1 - a0))
    }
}

proptest! {
    #[test]
    fn box_symmetry(
        ax in -50..50i32, ay in -50..50i32, aw in 1..40i32, ah in 1..40i32,
        bx in -50..50i32, by in -50..50i32, bw in 1..40i32, bh in 1..40i32,
    ) {
        let a = rect(ax, ay, aw, ah);
        let b = rect(bx, by, bw, bh);
        let mut rab = Response::new();
        let mut rba = Response::new();
        let hit_ab = test_polygon_polygon(&a, &b, Some(&mut rab));
        let hit_ba = test_polygon_polygon(&b, &a, Some(&mut rba));
        prop_assert_eq!(hit_ab, hit_ba);

        let ox = overlap_1d(ax, ax + aw, bx, bx + bw);
        let oy = overlap_1d(ay, ay + ah, by, by + bh);
        prop_assert_eq!(hit_ab, ox.is_some() && oy.is_some());
        if !hit_ab {
            return Ok(());
        }
        prop_assert_eq!(rab.overlap, rba.overlap);

        // a shared center leaves two equal ways out, taken backwards in both orders,
        // and equal depths may pick either axis
        prop_assume!(2 * ax + aw != 2 * bx + bw && 2 * ay + ah != 2 * by + bh);
        prop_assume!(ox != oy);
        prop_assert_eq!(rab.overlap_v, -rba.overlap_v);
        prop_assert_eq!(rab.overlap, ox.min(oy).unwrap_or_default() as Fp);
    }

    #[test]
    fn convex_symmetry(
        ax in -30.0..30.0 as Fp, ay in -30.0..30.0 as Fp, ar in 1.0..20.0 as Fp, an in 3..9usize, at in 0.0..6.0 as Fp,
        bx in -30.0..30.0 as Fp, by in -30.0..30.0 as Fp, br in 1.0..20.0 as Fp, bn in 3..9usize, bt in 0.0..6.0 as Fp,
    ) {
        let a = regular(Vector::new(ax, ay), ar, an, at);
        let b = regular(Vector::new(bx, by), br, bn, bt);
        prop_assert!(a.validate().is_ok());
        let mut rab = Response::new();
        let mut rba = Response::new();
        let hit_ab = test_polygon_polygon(&a, &b, Some(&mut rab));
        let hit_ba = test_polygon_polygon(&b, &a, Some(&mut rba));

        if hit_ab && hit_ba {
            prop_assert!((rab.overlap - rba.overlap).abs() < 1e-3);
        } else if hit_ab {
            // only rounding at an exact touch may split the verdicts
            prop_assert!(rab.overlap < 1e-3);
        } else if hit_ba {
            prop_assert!(rba.overlap < 1e-3);
        }
    }

    #[test]
    fn rotation_keeps_length(x in -1e3..1e3 as Fp, y in -1e3..1e3 as Fp, angle in -10.0..10.0 as Fp) {
        let v = Vector::new(x, y);
        let mut r = v;
        r.rotate(angle);
        prop_assert!((r.len() - v.len()).abs() <= 1e-4 * v.len().max(1.0));
    }

    #[test]
    fn circle_polygon_consistency(
        px in -20..20i32, py in -20..20i32, w in 1..40i32, h in 1..40i32,
        cx in -40.0..60.0 as Fp, cy in -40.0..60.0 as Fp, r in 0.5..25.0 as Fp,
    ) {
        let poly = rect(px, py, w, h);
        let circle = Circle::new(Vector::new(cx, cy), r);
        let mut rpc = Response::new();
        let mut rcp = Response::new();
        let hit_pc = test_polygon_circle(&poly, &circle, Some(&mut rpc));
        let hit_cp = test_circle_polygon(&circle, &poly, Some(&mut rcp));
        prop_assert_eq!(hit_pc, hit_cp);
        if hit_pc {
            prop_assert_eq!(rpc.overlap, rcp.overlap);
            prop_assert_eq!(rpc.overlap_n, -rcp.overlap_n);
            prop_assert_eq!(rpc.a_in_b, rcp.b_in_a);
            prop_assert_eq!(rpc.b_in_a, rcp.a_in_b);
        }
    }

    #[test]
    fn cleared_response_is_fresh(ax in -20..20i32, ay in -20..20i32, bx in -20..20i32, by in -20..20i32) {
        let a = rect(ax, ay, 10, 10);
        let b = rect(bx, by, 10, 10);
        let mut r = Response::new();
        test_polygon_polygon(&a, &b, Some(&mut r));
        r.clear();
        prop_assert_eq!(r.overlap, Fp::MAX);
        prop_assert!(r.a_in_b && r.b_in_a);
    }

    #[test]
    fn resting_converges(x in 0.0..80.0 as Fp, w in 5.0..20.0 as Fp, h in 5.0..40.0 as Fp, sink in 0.01..1.0 as Fp) {
        let platform = Rect::new(Vector::new(0.0, 200.0), 100.0, 10.0).to_polygon();
        let mut item = Rect::new(Vector::new(x, 200.0 - h + sink), w, h).to_polygon();

        let mut r = Response::new();
        prop_assert!(test_polygon_polygon(&item, &platform, Some(&mut r)));
        prop_assert!(r.is_landing());
        let v = r.overlap_v;
        item.pos.sub(v);

        let mut r = Response::new();
        if test_polygon_polygon(&item, &platform, Some(&mut r)) {
            prop_assert!(r.overlap < 1e-3);
        }
    }

    #[test]
    fn nested_box_takes_shortest_exit(
        ox in -50..50i32, oy in -50..50i32, ow in 10..60i32, oh in 10..60i32,
        fx in 0.0..1.0f64, fy in 0.0..1.0f64, fw in 0.0..1.0f64, fh in 0.0..1.0f64,
    ) {
        // inner box strictly inside the outer one
        let iw = 1 + ((ow - 3) as f64 * fw) as i32;
        let ih = 1 + ((oh - 3) as f64 * fh) as i32;
        let ix = ox + 1 + ((ow - iw - 2) as f64 * fx) as i32;
        let iy = oy + 1 + ((oh - ih - 2) as f64 * fy) as i32;
        let mut inner = rect(ix, iy, iw, ih);
        let outer = rect(ox, oy, ow, oh);

        let mut r = Response::new();
        prop_assert!(test_polygon_polygon(&inner, &outer, Some(&mut r)));
        prop_assert!(r.a_in_b);
        prop_assert!(!r.b_in_a);

        let exits = [ix + iw - ox, ox + ow - ix, iy + ih - oy, oy + oh - iy];
        let shortest = exits.iter().copied().min().unwrap_or_default();
        prop_assert_eq!(r.overlap, shortest as Fp);

        let v = r.overlap_v;
        inner.pos.sub(v);
        let mut r = Response::new();
        prop_assert!(test_polygon_polygon(&inner, &outer, Some(&mut r)));
        prop_assert_eq!(r.overlap, 0.0);
        prop_assert!(!r.a_in_b);
    }
}
