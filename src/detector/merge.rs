//! Neighbour clustering of raw candidates.
//!
//! Candidates are partitioned into classes with a pairwise near-duplicate
//! test against every earlier candidate; the last matching earlier candidate
//! decides the class. Classes with enough members are averaged with the
//! rounding-biased mean `(sum * 2 + n) / (2 * n)` and truncated to integers.
use crate::types::{Candidate, Detection};
use log::debug;

/// Near-duplicate test between an earlier candidate `r1` and a later `r2`.
///
/// Either box contains the other, or both origins are within 20% of `r1`'s
/// width of each other and the widths are within 20% of each other.
pub fn is_equivalent(r1: &Candidate, r2: &Candidate) -> bool {
    if r1.is_inside(r2) || r2.is_inside(r1) {
        return true;
    }
    let distance = r1.width * 0.2;
    (r2.x - r1.x).abs() <= distance
        && (r2.y - r1.y).abs() <= distance
        && r2.width <= r1.width * 1.2
        && r2.width * 1.2 >= r1.width
}

/// Class label per candidate, numbered in order of first appearance.
pub fn assign_classes(candidates: &[Candidate]) -> Vec<usize> {
    let mut classes = vec![0usize; candidates.len()];
    let mut next = 0usize;
    for i in 0..candidates.len() {
        let mut found = false;
        for j in 0..i {
            if is_equivalent(&candidates[j], &candidates[i]) {
                found = true;
                classes[i] = classes[j];
            }
        }
        if !found {
            classes[i] = next;
            next += 1;
        }
    }
    classes
}

#[derive(Clone, Copy, Default)]
struct ClassSum {
    n: usize,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl ClassSum {
    fn add(&mut self, c: &Candidate) {
        self.n += 1;
        self.x += c.x;
        self.y += c.y;
        self.width += c.width;
        self.height += c.height;
    }

    fn average(&self) -> Detection {
        let n = self.n as f64;
        let avg = |sum: f64| ((sum * 2.0 + n) / (2.0 * n)) as i32;
        Detection::new(avg(self.x), avg(self.y), avg(self.width), avg(self.height))
    }
}

/// Collapse `candidates` into detections supported by at least
/// `min_neighbours` members.
///
/// No clamping is applied here; [`ObjectDetector`](super::ObjectDetector)
/// clamps the threshold on the public path.
pub fn merge(candidates: &[Candidate], min_neighbours: u32) -> Vec<Detection> {
    let classes = assign_classes(candidates);
    let class_count = classes.iter().max().map_or(0, |m| m + 1);
    let mut sums = vec![ClassSum::default(); class_count];
    for (c, &class) in candidates.iter().zip(&classes) {
        sums[class].add(c);
    }
    let out: Vec<Detection> = sums
        .iter()
        .filter(|s| s.n > 0 && s.n >= min_neighbours as usize)
        .map(ClassSum::average)
        .collect();
    debug!(
        "merge: raw={} classes={} kept={} (min_neighbours={})",
        candidates.len(),
        class_count,
        out.len(),
        min_neighbours
    );
    out
}
