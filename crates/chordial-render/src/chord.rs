use crate::model::{Bounds, ChordDiagramLayout, ChordGroupLayout, ChordRibbonLayout, ChordSubgroupLayout};
use crate::{Error, Result, Surface};
use chordial_core::FlowMatrix;
use std::cmp::Ordering;
use std::f64::consts::TAU;

/// Angular gap between adjacent groups, in radians.
pub const PAD_ANGLE: f64 = 0.05;

/// Space reserved outside the ring for rotated labels.
const RADIAL_MARGIN: f64 = 90.0;
const RING_THICKNESS: f64 = 10.0;

/// Point on a circle of `radius` at `angle`, 12 o'clock zero, y down.
pub fn polar_xy(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

fn f64_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Radial chord layout over a validated flow matrix.
///
/// Each group spans an arc proportional to its row total, with `PAD_ANGLE`
/// gaps between groups. Within a group, subgroup slices are laid out in
/// descending value order. Ribbons join slice `(i, j)` with `(j, i)` — one
/// ribbon per unordered pair, oriented so the larger side is the source;
/// self-flows produce self-ribbons and all-zero pairs are skipped.
pub fn layout_chord(matrix: &FlowMatrix, surface: Surface) -> Result<ChordDiagramLayout> {
    let n = matrix.size();
    let total = matrix.total();
    if total <= 0.0 {
        return Err(Error::ZeroFlow {
            message: "matrix has no positive cells".to_string(),
        });
    }

    let inner_radius = surface.width.min(surface.height) * 0.5 - RADIAL_MARGIN;
    if inner_radius <= 0.0 {
        return Err(Error::DegenerateSurface {
            width: surface.width,
            height: surface.height,
        });
    }
    let outer_radius = inner_radius + RING_THICKNESS;

    let k = (TAU - PAD_ANGLE * n as f64).max(0.0) / total;
    let group_gap = if k > 0.0 { PAD_ANGLE } else { TAU / n as f64 };

    // Subgroup angle slices, row-major: slice (i, j) is group i's share of
    // the flow toward group j.
    let mut slices = vec![(0.0f64, 0.0f64); n * n];
    let mut groups = Vec::with_capacity(n);
    let mut x = 0.0;
    for i in 0..n {
        let group_start = x;
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| f64_desc(matrix.get(i, a), matrix.get(i, b)).then(a.cmp(&b)));
        for &j in &order {
            let a0 = x;
            x += matrix.get(i, j) * k;
            slices[i * n + j] = (a0, x);
        }
        groups.push(ChordGroupLayout {
            index: i,
            start_angle: group_start,
            end_angle: x,
            value: matrix.row_totals()[i],
            label: format!("Group {}", i + 1),
        });
        x += group_gap;
    }

    let subgroup = |i: usize, j: usize| -> ChordSubgroupLayout {
        let (start_angle, end_angle) = slices[i * n + j];
        ChordSubgroupLayout {
            index: i,
            subindex: j,
            start_angle,
            end_angle,
            value: matrix.get(i, j),
        }
    };

    let mut ribbons = Vec::new();
    for i in 0..n {
        for j in i..n {
            let forward = subgroup(i, j);
            let backward = subgroup(j, i);
            if forward.value <= 0.0 && backward.value <= 0.0 {
                continue;
            }
            let (source, target) = if forward.value < backward.value {
                (backward, forward)
            } else {
                (forward, backward)
            };
            ribbons.push(ChordRibbonLayout { source, target });
        }
    }

    let half_w = surface.width / 2.0;
    let half_h = surface.height / 2.0;

    Ok(ChordDiagramLayout {
        inner_radius,
        outer_radius,
        groups,
        ribbons,
        bounds: Bounds {
            min_x: -half_w,
            min_y: -half_h,
            max_x: half_w,
            max_y: half_h,
        },
    })
}
