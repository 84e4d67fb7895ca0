//! Distance allocation: nearest-label propagation
//!
//! Every cell of the grid receives the label of its nearest occupied cell, a
//! discrete approximation of a polygonal Voronoi partition. Distances grow
//! by multi-source Dijkstra over the 8-connected grid (cardinal step 1,
//! diagonal step sqrt(2)), the chamfer approximation of Euclidean distance.
//!
//! Tie rule: a cell equidistant from two labels takes the **lowest label
//! id**. The priority queue orders by (distance, label), so for equal
//! distances the lowest label arrives first and later arrivals never
//! displace an equal-distance winner.

use borderalign_core::{Error, Raster, Result};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// State in the priority queue (min-heap via reversed ordering).
#[derive(Debug, Clone, PartialEq)]
struct State {
    dist: f64,
    label: i32,
    row: usize,
    col: usize,
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on distance, then on label for deterministic ties
        other
            .dist
            .partial_cmp(&self.dist)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.label.cmp(&self.label))
    }
}

/// 8-connected neighbor offsets with their step lengths.
const NEIGHBORS: [(isize, isize, f64); 8] = [
    (-1, -1, std::f64::consts::SQRT_2),
    (-1, 0, 1.0),
    (-1, 1, std::f64::consts::SQRT_2),
    (0, -1, 1.0),
    (0, 1, 1.0),
    (1, -1, std::f64::consts::SQRT_2),
    (1, 0, 1.0),
    (1, 1, std::f64::consts::SQRT_2),
];

/// Fill the whole grid with nearest-occupied-cell labels.
///
/// Input cells with a non-zero value are sources at distance 0 and keep
/// their label. Errors if the grid has no occupied cell at all.
pub fn distance_allocation(labels: &Raster<i32>) -> Result<Raster<i32>> {
    let (rows, cols) = labels.shape();
    let mut dist = vec![f64::INFINITY; rows * cols];
    let mut out: Raster<i32> = Raster::new(rows, cols, *labels.transform())?;
    let mut heap = BinaryHeap::new();

    for row in 0..rows {
        for col in 0..cols {
            let label = unsafe { labels.get_unchecked(row, col) };
            if label != 0 {
                dist[row * cols + col] = 0.0;
                unsafe { out.set_unchecked(row, col, label) };
                heap.push(State {
                    dist: 0.0,
                    label,
                    row,
                    col,
                });
            }
        }
    }

    if heap.is_empty() {
        return Err(Error::Other(
            "distance allocation: no occupied cells to propagate from".into(),
        ));
    }

    while let Some(State {
        dist: d,
        label,
        row,
        col,
    }) = heap.pop()
    {
        let idx = row * cols + col;
        if d > dist[idx] {
            continue;
        }
        // Stale entry for a cell a lower label already claimed at equal cost
        if d == dist[idx] && unsafe { out.get_unchecked(row, col) } != label {
            continue;
        }

        for &(dr, dc, step) in &NEIGHBORS {
            let nr = row as isize + dr;
            let nc = col as isize + dc;
            if nr < 0 || nc < 0 || nr as usize >= rows || nc as usize >= cols {
                continue;
            }
            let (nr, nc) = (nr as usize, nc as usize);
            let nidx = nr * cols + nc;
            let nd = d + step;

            let better = nd < dist[nidx]
                || (nd == dist[nidx] && label < unsafe { out.get_unchecked(nr, nc) });
            if better {
                dist[nidx] = nd;
                unsafe { out.set_unchecked(nr, nc, label) };
                heap.push(State {
                    dist: nd,
                    label,
                    row: nr,
                    col: nc,
                });
            }
        }
    }

    Ok(out)
}
