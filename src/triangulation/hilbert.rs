//! Hilbert-curve ordering of samples.
//!
//! Inserting samples along a space-filling curve keeps consecutive points close,
//! so the locate walk for each insertion starts next to its target.

use crate::bounds::BoundingBox;
use crate::geometry::Point2;

/// Hilbert index of `p` on a `2^order x 2^order` grid spanning `bounds`.
///
/// Coordinates outside `bounds` are clamped. `order` is clamped to `1..=31`.
pub fn hilbert_index(p: Point2, bounds: &BoundingBox, order: u32) -> u64 {
    let order = order.clamp(1, 31);
    let n = 1_u64 << order;
    let x = quantize(p.x, bounds.min[0], bounds.width(), n);
    let y = quantize(p.y, bounds.min[1], bounds.height(), n);
    xy_to_index(n, x, y)
}

/// Indices into `points`, sorted along the Hilbert curve. Ties keep input order.
pub fn hilbert_sorted(points: &[Point2], bounds: &BoundingBox, order: u32) -> Vec<usize> {
    let keys: Vec<u64> = points.iter().map(|&p| hilbert_index(p, bounds, order)).collect();
    let mut order_idx: Vec<usize> = (0..points.len()).collect();
    order_idx.sort_by_key(|&i| keys[i]);
    order_idx
}

fn quantize(v: f64, min: f64, extent: f64, n: u64) -> u64 {
    if !(extent > 0.0) {
        return 0;
    }
    let t = ((v - min) / extent).clamp(0.0, 1.0);
    if !t.is_finite() {
        return 0;
    }
    (t * (n - 1) as f64).round() as u64
}

fn xy_to_index(n: u64, mut x: u64, mut y: u64) -> u64 {
    let mut d = 0;
    let mut s = n / 2;
    while s > 0 {
        let rx = u64::from(x & s > 0);
        let ry = u64::from(y & s > 0);
        d += s * s * ((3 * rx) ^ ry);
        // rotate the quadrant so the sub-curve has canonical orientation
        if ry == 0 {
            if rx == 1 {
                x = n - 1 - x;
                y = n - 1 - y;
            }
            std::mem::swap(&mut x, &mut y);
        }
        s /= 2;
    }
    d
}
