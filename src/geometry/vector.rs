//! Small vector helpers over `[f64; 3]`.
//!
//! Coordinates are plain arrays so vertex storage can be handed to codecs as
//! packed doubles without conversion.

/// A point or vector in 3-D space.
pub type Point3 = [f64; 3];

#[inline]
pub fn add(a: Point3, b: Point3) -> Point3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(a: Point3, s: f64) -> Point3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot(a: Point3, b: Point3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: Point3, b: Point3) -> Point3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm_sq(a: Point3) -> f64 {
    dot(a, a)
}

#[inline]
pub fn norm(a: Point3) -> f64 {
    norm_sq(a).sqrt()
}

#[inline]
pub fn distance_sq(a: Point3, b: Point3) -> f64 {
    norm_sq(sub(a, b))
}

#[inline]
pub fn distance(a: Point3, b: Point3) -> f64 {
    distance_sq(a, b).sqrt()
}

#[inline]
pub fn midpoint(a: Point3, b: Point3) -> Point3 {
    scale(add(a, b), 0.5)
}

/// Unit vector along `a`, or the zero vector when `a` has zero length.
#[inline]
pub fn normalize_or_zero(a: Point3) -> Point3 {
    let len = norm(a);
    if len > 0.0 && len.is_finite() {
        scale(a, 1.0 / len)
    } else {
        [0.0; 3]
    }
}

/// Area-scaled normal `(b - a) x (c - a)`; its length is twice the triangle area.
#[inline]
pub fn triangle_normal(a: Point3, b: Point3, c: Point3) -> Point3 {
    cross(sub(b, a), sub(c, a))
}

#[inline]
pub fn triangle_area(a: Point3, b: Point3, c: Point3) -> f64 {
    0.5 * norm(triangle_normal(a, b, c))
}

/// Interior angle at `apex` between the rays towards `b` and `c`.
///
/// Returns 0 when either ray has zero length.
pub fn interior_angle(apex: Point3, b: Point3, c: Point3) -> f64 {
    let u = sub(b, apex);
    let v = sub(c, apex);
    let s = norm(cross(u, v));
    let d = dot(u, v);
    if s == 0.0 && d == 0.0 {
        return 0.0;
    }
    s.atan2(d)
}

/// `true` if the triangle is degenerate relative to the length of its edges.
///
/// Uses `|e1 x e2| <= eps * |e1| * |e2|`, which is independent of the mesh scale.
pub fn is_degenerate_triangle(a: Point3, b: Point3, c: Point3) -> bool {
    let e1 = sub(b, a);
    let e2 = sub(c, a);
    let n = norm(cross(e1, e2));
    let bound = f64::EPSILON * norm(e1) * norm(e2);
    !(n > bound)
}
