//! Hex coordinate engine
//!
//! Axial `(q, r)` coordinates with an implicit cube form `(x = q, y = -q - r, z = r)`.
//! Everything here is a pure function over coordinates: distances, neighbor and
//! ring queries, line drawing, flat-top pixel projection and A* pathfinding.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

/// Axial direction offsets. Index 0 is east (+q); the rest follow clockwise
/// (y-up) around the hex. This is the canonical neighbor order for every flood fill.
pub const DIRECTIONS: [(i32, i32); 6] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
];

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Axial hex coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub const ORIGIN: HexCoord = HexCoord { q: 0, r: 0 };

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Build from cube coordinates. Panics when `x + y + z != 0`.
    pub fn from_cube(x: i32, y: i32, z: i32) -> Self {
        assert!(x + y + z == 0, "cube coordinate ({x}, {y}, {z}) does not sum to zero");
        Self { q: x, r: z }
    }

    pub fn try_from_cube(x: i32, y: i32, z: i32) -> Option<Self> {
        (x + y + z == 0).then_some(Self { q: x, r: z })
    }

    /// Implicit third cube axis.
    pub fn s(self) -> i32 {
        -self.q - self.r
    }

    pub fn cube(self) -> (i32, i32, i32) {
        (self.q, self.s(), self.r)
    }

    /// Pack into a single `i64`; used as the canonical visited-set key.
    pub fn key(self) -> i64 {
        ((self.q as i64) << 32) | (self.r as u32 as i64)
    }

    pub fn from_key(key: i64) -> Self {
        Self {
            q: (key >> 32) as i32,
            r: key as u32 as i32,
        }
    }

    pub fn offset(self, dq: i32, dr: i32) -> Self {
        Self::new(self.q + dq, self.r + dr)
    }

    /// Neighbor in direction `dir` (0..6, see [`DIRECTIONS`]).
    pub fn neighbor(self, dir: usize) -> Self {
        let (dq, dr) = DIRECTIONS[dir % 6];
        self.offset(dq, dr)
    }

    /// The six neighbors, east first.
    pub fn neighbors(self) -> [HexCoord; 6] {
        let mut result = [self; 6];
        for (i, n) in result.iter_mut().enumerate() {
            *n = self.neighbor(i);
        }
        result
    }

    /// Exact hex distance (cube max-norm).
    pub fn distance(self, other: HexCoord) -> u32 {
        let (x1, y1, z1) = self.cube();
        let (x2, y2, z2) = other.cube();
        (x1 - x2).abs().max((y1 - y2).abs()).max((z1 - z2).abs()) as u32
    }

    /// Flat-top projection to pixel space.
    pub fn to_pixel(self, size: f64) -> (f64, f64) {
        let x = size * 1.5 * self.q as f64;
        let y = size * SQRT_3 * (self.r as f64 + self.q as f64 / 2.0);
        (x, y)
    }

    /// Inverse of [`HexCoord::to_pixel`], rounded through cube space.
    pub fn from_pixel(x: f64, y: f64, size: f64) -> Self {
        let q = (2.0 / 3.0 * x) / size;
        let r = (-1.0 / 3.0 * x + SQRT_3 / 3.0 * y) / size;
        cube_round(q, -q - r, r)
    }
}

impl std::fmt::Display for HexCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

/// Round fractional cube coordinates to the nearest hex, fixing the component
/// with the largest rounding error so the result stays on the `x+y+z=0` plane.
pub fn cube_round(x: f64, y: f64, z: f64) -> HexCoord {
    let mut rx = x.round();
    let ry = y.round();
    let mut rz = z.round();

    let dx = (rx - x).abs();
    let dy = (ry - y).abs();
    let dz = (rz - z).abs();

    if dx > dy && dx > dz {
        rx = -ry - rz;
    } else if dy <= dz {
        rz = -rx - ry;
    }
    // When dy is largest, y is implied by the other two.

    HexCoord::new(rx as i32, rz as i32)
}

pub fn distance(a: HexCoord, b: HexCoord) -> u32 {
    a.distance(b)
}

pub fn neighbors(hex: HexCoord) -> [HexCoord; 6] {
    hex.neighbors()
}

/// Hex ring of the given radius: `6 * radius` coordinates, or just the center
/// for radius 0.
pub fn ring(center: HexCoord, radius: u32) -> Vec<HexCoord> {
    if radius == 0 {
        return vec![center];
    }
    let radius = radius as i32;
    let mut result = Vec::with_capacity(6 * radius as usize);
    let (dq, dr) = DIRECTIONS[4];
    let mut hex = center.offset(dq * radius, dr * radius);
    for dir in 0..6 {
        for _ in 0..radius {
            result.push(hex);
            hex = hex.neighbor(dir);
        }
    }
    result
}

/// All coordinates within `radius`, ring by ring from the center outwards.
pub fn spiral(center: HexCoord, radius: u32) -> Vec<HexCoord> {
    let mut result = Vec::with_capacity(1 + 3 * radius as usize * (radius as usize + 1));
    for k in 0..=radius {
        result.extend(ring(center, k));
    }
    result
}

/// Straight line from `a` to `b`, inclusive, `distance(a, b) + 1` points long.
pub fn line(a: HexCoord, b: HexCoord) -> Vec<HexCoord> {
    let n = a.distance(b);
    if n == 0 {
        return vec![a];
    }

    // Nudge off exact edges so ties round the same way every time.
    let (ax, ay, az) = a.cube();
    let (bx, by, bz) = b.cube();
    let (ax, ay, az) = (ax as f64 + 1e-6, ay as f64 + 1e-6, az as f64 - 2e-6);
    let (bx, by, bz) = (bx as f64 + 1e-6, by as f64 + 1e-6, bz as f64 - 2e-6);

    let mut result = Vec::with_capacity(n as usize + 1);
    for i in 0..=n {
        let t = i as f64 / n as f64;
        let hex = cube_round(
            ax + (bx - ax) * t,
            ay + (by - ay) * t,
            az + (bz - az) * t,
        );
        if result.last() != Some(&hex) {
            result.push(hex);
        }
    }
    result
}

/// Open-set entry for A*.
#[derive(Clone, Copy)]
struct PathNode {
    coord: HexCoord,
    cost: f64,
    estimated_total: f64,
    seq: u64,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on estimated total, then earliest insertion.
        other
            .estimated_total
            .total_cmp(&self.estimated_total)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

const MAX_PATH_EXPANSIONS: usize = 200_000;

/// A* over the hex grid.
///
/// `cost` returns the cost of entering a tile, or `None` when it is impassable.
/// Costs are expected to be at least 1 so hex distance stays an admissible
/// heuristic. Returns an empty vector when `goal` cannot be reached, otherwise
/// a path that starts at `start` and ends at `goal`.
pub fn find_path<F>(start: HexCoord, goal: HexCoord, cost: F) -> Vec<HexCoord>
where
    F: Fn(HexCoord) -> Option<f64>,
{
    if start == goal {
        return vec![start];
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<i64, HexCoord> = HashMap::new();
    let mut g_score: HashMap<i64, f64> = HashMap::new();
    let mut seq = 0u64;

    g_score.insert(start.key(), 0.0);
    open_set.push(PathNode {
        coord: start,
        cost: 0.0,
        estimated_total: start.distance(goal) as f64,
        seq,
    });

    let mut expansions = 0;
    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            let mut path = vec![goal];
            let mut step = goal;
            while let Some(&prev) = came_from.get(&step.key()) {
                path.push(prev);
                step = prev;
            }
            path.reverse();
            return path;
        }

        // Stale entry
        if current.cost > *g_score.get(&current.coord.key()).unwrap_or(&f64::INFINITY) {
            continue;
        }

        expansions += 1;
        if expansions > MAX_PATH_EXPANSIONS {
            break;
        }

        for next in current.coord.neighbors() {
            let Some(step_cost) = cost(next) else {
                continue;
            };
            let tentative = current.cost + step_cost;
            if tentative < *g_score.get(&next.key()).unwrap_or(&f64::INFINITY) {
                came_from.insert(next.key(), current.coord);
                g_score.insert(next.key(), tentative);
                seq += 1;
                open_set.push(PathNode {
                    coord: next,
                    cost: tentative,
                    estimated_total: tentative + next.distance(goal) as f64,
                    seq,
                });
            }
        }
    }

    Vec::new()
}
