// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Measurement and simplification of traced contours

use crate::types::Point;

/// Enclosed area of a closed contour (shoelace formula)
pub fn contour_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut twice_area = 0i64;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += points[i].x as i64 * points[j].y as i64;
        twice_area -= points[j].x as i64 * points[i].y as i64;
    }

    twice_area.abs() as f64 / 2.0
}

/// Length of a polyline, including the closing edge when `closed`
pub fn arc_length(points: &[Point], closed: bool) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let open: f64 = points.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
    if closed {
        open + points[points.len() - 1].distance_to(&points[0])
    } else {
        open
    }
}

/// Drop the interior points of straight runs in a closed pixel chain
///
/// Only points whose incoming and outgoing steps are identical are
/// removed, so area and perimeter are unchanged.
pub fn compress_chain(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let compressed: Vec<Point> = (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            let here = points[i];
            (here.x - prev.x, here.y - prev.y) != (next.x - here.x, next.y - here.y)
        })
        .map(|i| points[i])
        .collect();

    if compressed.is_empty() {
        points.to_vec()
    } else {
        compressed
    }
}

/// Douglas-Peucker simplification
///
/// Closed curves are split at their lowest point (smallest `(y, x)`) and
/// the point farthest from it, and both halves are simplified
/// independently. The split does not depend on where the ring starts, and
/// the pass is repeated until it removes nothing, so the returned polygon
/// is left unchanged by a further call at the same tolerance.
pub fn approx_polygon(points: &[Point], epsilon: f64, closed: bool) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    if !closed {
        let keep = douglas_peucker(points, epsilon);
        return select(points, &keep);
    }

    let mut current = simplify_closed(points, epsilon);
    loop {
        let next = simplify_closed(&current, epsilon);
        if next.len() == current.len() {
            return current;
        }
        current = next;
    }
}

/// One closed Douglas-Peucker pass; the output starts at the lowest point
fn simplify_closed(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    // Walk the ring starting at the lowest point so both halves are
    // contiguous slices
    let start = lowest_point(points);
    let ring: Vec<Point> = (0..=n).map(|i| points[(start + i) % n]).collect();
    let split = farthest_from(&ring[..n], 0);
    if split == 0 {
        return vec![ring[0]];
    }

    let first = douglas_peucker(&ring[..=split], epsilon);
    let second = douglas_peucker(&ring[split..], epsilon);

    let mut result = select(&ring[..split], &first[..first.len() - 1]);
    result.extend(select(&ring[split..n], &second[..second.len() - 1]));
    result
}

/// Index of the first point with the smallest `(y, x)`
fn lowest_point(points: &[Point]) -> usize {
    let mut best = 0;
    for (i, p) in points.iter().enumerate() {
        if (p.y, p.x) < (points[best].y, points[best].x) {
            best = i;
        }
    }
    best
}

/// Index of the point farthest from `points[from]`; ties go to the
/// smallest `(y, x)`, then to the earliest index
fn farthest_from(points: &[Point], from: usize) -> usize {
    let origin = points[from];
    let mut best = from;
    let mut best_dist = 0i64;
    for (i, p) in points.iter().enumerate() {
        let dx = (p.x - origin.x) as i64;
        let dy = (p.y - origin.y) as i64;
        let dist = dx * dx + dy * dy;
        let closer_tie = dist == best_dist && (p.y, p.x) < (points[best].y, points[best].x);
        if dist > best_dist || closer_tie {
            best_dist = dist;
            best = i;
        }
    }
    best
}

fn select(points: &[Point], keep: &[bool]) -> Vec<Point> {
    points
        .iter()
        .zip(keep)
        .filter_map(|(p, &k)| if k { Some(*p) } else { None })
        .collect()
}

/// Iterative Douglas-Peucker over an open polyline
///
/// Returns a keep-mask; both endpoints are always kept.
fn douglas_peucker(points: &[Point], epsilon: f64) -> Vec<bool> {
    let n = points.len();
    let mut keep = vec![false; n];
    if n == 0 {
        return keep;
    }
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((first, last)) = stack.pop() {
        if last <= first + 1 {
            continue;
        }

        let mut max_dist = 0.0;
        let mut max_idx = first;
        for i in first + 1..last {
            let dist = perpendicular_distance(&points[i], &points[first], &points[last]);
            if dist > max_dist {
                max_dist = dist;
                max_idx = i;
            }
        }

        if max_dist > epsilon {
            keep[max_idx] = true;
            stack.push((max_idx, last));
            stack.push((first, max_idx));
        }
    }

    keep
}

/// Distance from point to the infinite line through `line_start` and `line_end`
fn perpendicular_distance(point: &Point, line_start: &Point, line_end: &Point) -> f64 {
    let dx = (line_end.x - line_start.x) as f64;
    let dy = (line_end.y - line_start.y) as f64;
    let length_sq = dx * dx + dy * dy;

    if length_sq < 1e-10 {
        return point.distance_to(line_start);
    }

    let length = length_sq.sqrt();
    (((point.x - line_start.x) as f64) * dy - ((point.y - line_start.y) as f64) * dx).abs()
        / length
}
