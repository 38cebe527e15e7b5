use quarry_geom::Vec3;

/// Squared sine below which an edge is treated as passing through the origin.
const COLLINEAR_EPS: f32 = 1e-10;

/// GJK working set: up to four points, newest first.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Simplex {
    points: [Vec3; 4],
    len: usize,
}

impl Simplex {
    pub const CAPACITY: usize = 4;

    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points[..self.len]
    }

    /// Inserts at index 0 and shifts the rest back. A full simplex drops its
    /// oldest point.
    pub fn push_front(&mut self, p: Vec3) {
        debug_assert!(self.len < Self::CAPACITY, "simplex overflow");
        let keep = self.len.min(Self::CAPACITY - 1);
        self.points.copy_within(0..keep, 1);
        self.points[0] = p;
        self.len = keep + 1;
    }
}

#[inline]
fn same_direction(a: Vec3, b: Vec3) -> bool {
    a.dot(b) > 0.0
}

/// Direction from `edge` toward the origin, perpendicular to the edge.
fn toward_origin_from_edge(edge: Vec3, ao: Vec3) -> Vec3 {
    let d = edge.cross(ao).cross(edge);
    let scale = edge.length_sq() * edge.length_sq() * ao.length_sq();
    if d.length_sq() <= COLLINEAR_EPS * scale {
        edge.any_orthogonal()
    } else {
        d
    }
}

fn line(s: &mut Simplex, dir: &mut Vec3) -> bool {
    let a = s.points[0];
    let b = s.points[1];
    let ab = b - a;
    let ao = -a;
    if same_direction(ab, ao) {
        *dir = toward_origin_from_edge(ab, ao);
    } else {
        s.len = 1;
        *dir = ao;
    }
    false
}

fn triangle(s: &mut Simplex, dir: &mut Vec3) -> bool {
    let a = s.points[0];
    let b = s.points[1];
    let c = s.points[2];
    let ab = b - a;
    let ac = c - a;
    let ao = -a;
    let abc = ab.cross(ac);

    if same_direction(abc.cross(ac), ao) {
        s.len = 2;
        if same_direction(ac, ao) {
            s.points[1] = c;
            *dir = toward_origin_from_edge(ac, ao);
        } else {
            return line(s, dir);
        }
    } else if same_direction(ab.cross(abc), ao) {
        s.len = 2;
        return line(s, dir);
    } else if same_direction(abc, ao) {
        *dir = abc;
    } else {
        s.points.swap(1, 2);
        *dir = -abc;
    }
    false
}

/// Relative tolerance for the origin lying in a face plane.
const PLANE_EPS: f32 = 1e-6;

/// `n·ao` clearly positive, or within tolerance of the plane.
fn plane_side(n: Vec3, ao: Vec3) -> (bool, bool) {
    let d = n.dot(ao);
    let tol = PLANE_EPS * n.length() * ao.length();
    (d > tol, d.abs() <= tol)
}

/// Normal of face `p q r` pointing away from `opposite`.
fn outward(p: Vec3, q: Vec3, r: Vec3, opposite: Vec3) -> Vec3 {
    let n = (q - p).cross(r - p);
    if n.dot(opposite - p) > 0.0 { -n } else { n }
}

/// Keeps face `p q r` wound so that its normal is `n`, and searches along `n`.
fn keep_face(s: &mut Simplex, dir: &mut Vec3, p: Vec3, q: Vec3, r: Vec3, n: Vec3) {
    s.len = 3;
    s.points[0] = p;
    if (q - p).cross(r - p).dot(n) < 0.0 {
        s.points[1] = r;
        s.points[2] = q;
    } else {
        s.points[1] = q;
        s.points[2] = r;
    }
    *dir = n;
}

fn tetrahedron(s: &mut Simplex, dir: &mut Vec3) -> bool {
    let a = s.points[0];
    let b = s.points[1];
    let c = s.points[2];
    let d = s.points[3];
    let ab = b - a;
    let ac = c - a;
    let ad = d - a;
    let ao = -a;

    let abc = ab.cross(ac);
    let acd = ac.cross(ad);
    let adb = ad.cross(ab);
    let (abc_out, abc_on) = plane_side(abc, ao);
    let (acd_out, acd_on) = plane_side(acd, ao);
    let (adb_out, adb_on) = plane_side(adb, ao);

    if abc_out {
        s.len = 3;
        return triangle(s, dir);
    }
    if acd_out {
        s.len = 3;
        s.points[1] = c;
        s.points[2] = d;
        return triangle(s, dir);
    }
    if adb_out {
        s.len = 3;
        s.points[1] = d;
        s.points[2] = b;
        return triangle(s, dir);
    }

    // The origin on the boundary is only contact. Search outward from that
    // face; a touching pair then stops with no progress.
    if abc_on {
        keep_face(s, dir, a, b, c, outward(a, b, c, d));
        return false;
    }
    if acd_on {
        keep_face(s, dir, a, c, d, outward(a, c, d, b));
        return false;
    }
    if adb_on {
        keep_face(s, dir, a, d, b, outward(a, d, b, c));
        return false;
    }
    let bcd = outward(b, c, d, a);
    if plane_side(bcd, -b).1 {
        keep_face(s, dir, b, c, d, bcd);
        return false;
    }
    true
}

/// Reduces the simplex to the feature nearest the origin and writes the next
/// search direction. Returns `true` once a tetrahedron encloses the origin.
///
/// Feature order is fixed: for a triangle the AC edge region, then the AB
/// edge region, then above/below the face; for a tetrahedron the faces ABC,
/// ACD, ADB in that order. An origin lying on a tetrahedron face is not
/// enclosed.
pub fn next_simplex(s: &mut Simplex, dir: &mut Vec3) -> bool {
    match s.len {
        2 => line(s, dir),
        3 => triangle(s, dir),
        4 => tetrahedron(s, dir),
        _ => false,
    }
}
