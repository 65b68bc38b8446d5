//! Instance graphs with known optimal tours.

use std::f64::consts::PI;

use tourforge_core::Graph;

/// Optimal tour cost of [`k4`]: 0-1-3-2-0.
pub const K4_OPTIMUM: f64 = 80.0;

/// Optimal tour cost of [`two_triangles`].
pub const TWO_TRIANGLES_OPTIMUM: f64 = 24.0;

/// Cost of the two separate triangles that satisfy every degree constraint
/// of [`two_triangles`] without forming a tour.
pub const TWO_TRIANGLES_DEGREE_ONLY: f64 = 6.0;

/// Optimal tour cost of [`decoy`]: 0-2-1-3-0.
pub const DECOY_OPTIMUM: f64 = 12.0;

/// Cost of either tour of [`decoy`] through its cheapest edge 0-1.
pub const DECOY_CHEAP_EDGE_TOUR: f64 = 17.0;

/// Complete graph on 4 nodes.
pub fn k4() -> Graph {
    graph(
        4,
        &[
            (0, 1, 10.0),
            (0, 2, 15.0),
            (0, 3, 20.0),
            (1, 2, 35.0),
            (1, 3, 25.0),
            (2, 3, 30.0),
        ],
    )
}

/// Complete graph on 4 nodes whose cheapest edge 0-1 is on no optimal tour.
///
/// Both tours through 0-1 also use 2-3 of weight 10. Every other edge
/// weighs 3.
pub fn decoy() -> Graph {
    graph(
        4,
        &[
            (0, 1, 1.0),
            (0, 2, 3.0),
            (0, 3, 3.0),
            (1, 2, 3.0),
            (1, 3, 3.0),
            (2, 3, 10.0),
        ],
    )
}

/// Triangles `{0, 1, 2}` and `{3, 4, 5}` with unit edges, joined by the
/// expensive edges 0-3, 1-4 and 2-5 of weight 10.
pub fn two_triangles() -> Graph {
    graph(
        6,
        &[
            (0, 1, 1.0),
            (1, 2, 1.0),
            (0, 2, 1.0),
            (3, 4, 1.0),
            (4, 5, 1.0),
            (3, 5, 1.0),
            (0, 3, 10.0),
            (1, 4, 10.0),
            (2, 5, 10.0),
        ],
    )
}

/// Two unit triangles with no edge between them; no tour exists.
pub fn disconnected() -> Graph {
    graph(
        6,
        &[
            (0, 1, 1.0),
            (1, 2, 1.0),
            (0, 2, 1.0),
            (3, 4, 1.0),
            (4, 5, 1.0),
            (3, 5, 1.0),
        ],
    )
}

/// Cycle `0 - 1 - ... - (n-1) - 0` with uniform weights; the only tour.
pub fn ring(n: usize, weight: f64) -> Graph {
    let edges: Vec<_> = (0..n).map(|i| (i, (i + 1) % n, weight)).collect();
    graph(n, &edges)
}

/// Complete graph over the corners of a regular `n`-gon with unit
/// circumradius, weighted by euclidean distance.
///
/// The optimal tour walks the perimeter, of length `perimeter(n)`.
pub fn polygon(n: usize) -> Graph {
    let corner = |i: usize| {
        let angle = 2.0 * PI * i as f64 / n as f64;
        (angle.cos(), angle.sin())
    };
    let result = Graph::complete(n, |u, v| {
        let (ux, uy) = corner(u);
        let (vx, vy) = corner(v);
        (ux - vx).hypot(uy - vy)
    });
    match result {
        Ok(graph) => graph,
        Err(err) => panic!("invalid polygon fixture: {err}"),
    }
}

/// Perimeter of the regular `n`-gon used by [`polygon`].
pub fn perimeter(n: usize) -> f64 {
    2.0 * n as f64 * (PI / n as f64).sin()
}

fn graph(n: usize, edges: &[(usize, usize, f64)]) -> Graph {
    match Graph::from_edges(n, edges.iter().copied()) {
        Ok(graph) => graph,
        Err(err) => panic!("invalid fixture graph: {err}"),
    }
}
