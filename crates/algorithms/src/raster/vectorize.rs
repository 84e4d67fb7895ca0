//! Label grid vectorization
//!
//! Converts a labeled raster into one (multi)polygon per label by walking
//! the cell edges that separate unlike labels. Edges are oriented with the
//! labeled region on their left, so exterior rings come out counterclockwise
//! and hole rings clockwise; holes are attached to the smallest exterior
//! ring that contains them.

use borderalign_core::{Raster, Result};
use geo::{Area, Contains};
use geo_types::{Coord, LineString, MultiPolygon, Point, Polygon};
use std::collections::HashMap;

/// Corner-grid point: (row, col) with indices running 0..=rows / 0..=cols.
type Corner = (usize, usize);

/// A directed boundary edge between two adjacent corners.
#[derive(Debug, Clone, Copy)]
struct Segment {
    from: Corner,
    to: Corner,
}

/// Vectorize a label grid into `(label, polygon)` pairs.
///
/// Background (label 0) is not vectorized. Output order is ascending label.
pub fn vectorize_labels(grid: &Raster<i32>) -> Result<Vec<(i32, MultiPolygon<f64>)>> {
    let (rows, cols) = grid.shape();

    // Boundary segments per label, oriented region-on-the-left
    let mut segments: HashMap<i32, Vec<Segment>> = HashMap::new();
    for row in 0..rows {
        for col in 0..cols {
            let label = unsafe { grid.get_unchecked(row, col) };
            if label == 0 {
                continue;
            }
            let neighbor = |r: isize, c: isize| -> i32 {
                if r < 0 || c < 0 || r as usize >= rows || c as usize >= cols {
                    0
                } else {
                    unsafe { grid.get_unchecked(r as usize, c as usize) }
                }
            };
            let sides = segments.entry(label).or_default();
            let (r, c) = (row, col);
            // Top edge: walk -x (geo), interior below
            if neighbor(r as isize - 1, c as isize) != label {
                sides.push(Segment {
                    from: (r, c + 1),
                    to: (r, c),
                });
            }
            // Bottom edge: walk +x, interior above
            if neighbor(r as isize + 1, c as isize) != label {
                sides.push(Segment {
                    from: (r + 1, c),
                    to: (r + 1, c + 1),
                });
            }
            // Left edge: walk downward in row space, interior to the east
            if neighbor(r as isize, c as isize - 1) != label {
                sides.push(Segment {
                    from: (r, c),
                    to: (r + 1, c),
                });
            }
            // Right edge: walk upward in row space, interior to the west
            if neighbor(r as isize, c as isize + 1) != label {
                sides.push(Segment {
                    from: (r + 1, c + 1),
                    to: (r, c + 1),
                });
            }
        }
    }

    let mut labels: Vec<i32> = segments.keys().copied().collect();
    labels.sort_unstable();

    let transform = *grid.transform();
    let to_geo = |corner: Corner| -> Coord<f64> {
        let (x, y) = transform.pixel_to_geo_corner(corner.1, corner.0);
        Coord { x, y }
    };

    let mut out = Vec::with_capacity(labels.len());
    for label in labels {
        let rings = chain_rings(&segments[&label]);
        let polygons = assemble_polygons(rings, &to_geo);
        out.push((label, polygons));
    }
    Ok(out)
}

/// Chain directed segments into closed rings.
///
/// At corners where several boundary segments meet (diagonal label
/// adjacency), the walk prefers the sharpest left turn, which keeps each
/// ring simple and lets diagonally-touching parts come out as separate
/// rings meeting at a point.
fn chain_rings(segments: &[Segment]) -> Vec<Vec<Corner>> {
    let mut by_start: HashMap<Corner, Vec<usize>> = HashMap::new();
    for (idx, seg) in segments.iter().enumerate() {
        by_start.entry(seg.from).or_default().push(idx);
    }
    let mut used = vec![false; segments.len()];
    let mut rings = Vec::new();

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        let mut ring = vec![segments[start].from];
        let mut current = segments[start];
        used[start] = true;

        loop {
            ring.push(current.to);
            if current.to == ring[0] {
                break;
            }
            let candidates = match by_start.get(&current.to) {
                Some(c) => c,
                None => break, // open chain; cannot happen on a consistent grid
            };
            let incoming = direction(current);
            let next = candidates
                .iter()
                .copied()
                .filter(|&idx| !used[idx])
                .max_by_key(|&idx| turn_score(incoming, direction(segments[idx])));
            match next {
                Some(idx) => {
                    used[idx] = true;
                    current = segments[idx];
                }
                None => break,
            }
        }
        rings.push(ring);
    }
    rings
}

/// Direction of a unit segment in geo orientation (x = col, y = -row).
fn direction(seg: Segment) -> (i64, i64) {
    let dx = seg.to.1 as i64 - seg.from.1 as i64;
    let dy = seg.from.0 as i64 - seg.to.0 as i64;
    (dx, dy)
}

/// Rank an outgoing direction: left turn > straight > right turn.
fn turn_score(incoming: (i64, i64), outgoing: (i64, i64)) -> i64 {
    let cross = incoming.0 * outgoing.1 - incoming.1 * outgoing.0;
    let dot = incoming.0 * outgoing.0 + incoming.1 * outgoing.1;
    if cross > 0 {
        2
    } else if dot > 0 {
        1
    } else {
        0
    }
}

/// Build polygons from corner rings: CCW rings are exteriors, CW rings are
/// holes attached to the smallest containing exterior.
fn assemble_polygons(
    rings: Vec<Vec<Corner>>,
    to_geo: &impl Fn(Corner) -> Coord<f64>,
) -> MultiPolygon<f64> {
    let mut exteriors: Vec<(LineString<f64>, f64)> = Vec::new();
    let mut holes: Vec<LineString<f64>> = Vec::new();

    for ring in rings {
        if ring.len() < 4 {
            continue;
        }
        let coords: Vec<Coord<f64>> = ring.into_iter().map(to_geo).collect();
        let line = LineString::new(coords);
        let signed = Polygon::new(line.clone(), vec![]).signed_area();
        if signed > 0.0 {
            exteriors.push((line, signed));
        } else if signed < 0.0 {
            holes.push(line);
        }
    }

    let mut shells: Vec<(Polygon<f64>, f64)> = exteriors
        .into_iter()
        .map(|(line, area)| (Polygon::new(line, vec![]), area))
        .collect();

    for hole in holes {
        let probe = Point::from(hole.0[0]);
        let owner = shells
            .iter_mut()
            .filter(|(shell, _)| shell.contains(&probe) || shell.exterior().contains(&probe))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        if let Some((shell, _)) = owner {
            shell.interiors_push(hole);
        }
    }

    MultiPolygon(shells.into_iter().map(|(p, _)| p).collect())
}
