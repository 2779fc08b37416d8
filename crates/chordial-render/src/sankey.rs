use crate::model::{Bounds, SankeyDiagramLayout, SankeyLinkLayout, SankeyNodeLayout};
use crate::{Error, Result, Surface};
use chordial_core::FlowGraph;
use std::cmp::Ordering;

/// Tuning knobs for the flow layout. Defaults match the reference rendering:
/// 15px nodes, 10px padding, justified columns, six relaxation passes.
#[derive(Debug, Clone)]
pub struct SankeyOptions {
    pub node_width: f64,
    pub node_padding: f64,
    pub align: NodeAlign,
    pub iterations: usize,
}

impl Default for SankeyOptions {
    fn default() -> Self {
        Self {
            node_width: 15.0,
            node_padding: 10.0,
            align: NodeAlign::Justify,
            iterations: 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAlign {
    Left,
    Right,
    Center,
    Justify,
}

#[derive(Debug, Clone)]
struct ColNode {
    value: f64,
    depth: usize,
    height: usize,
    layer: usize,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
    out_links: Vec<usize>,
    in_links: Vec<usize>,
}

#[derive(Debug, Clone)]
struct ColLink {
    index: usize,
    source: usize,
    target: usize,
    value: f64,
    width: f64,
    y0: f64,
    y1: f64,
}

fn f64_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Horizontal flow layout over a resolved graph.
///
/// Nodes are assigned to columns by breadth rank, sized proportionally to
/// their flow total, then relaxed vertically toward the weighted midpoints
/// of their neighbors while resolving overlaps. The drawable region is the
/// surface inset by `[[1,1],[w-1,h-5]]`.
pub fn layout_sankey(
    graph: &FlowGraph,
    surface: Surface,
    options: &SankeyOptions,
) -> Result<SankeyDiagramLayout> {
    let x0 = 1.0;
    let y0 = 1.0;
    let x1 = surface.width - 1.0;
    let y1 = surface.height - 5.0;
    if x1 - x0 <= options.node_width || y1 - y0 <= 0.0 {
        return Err(Error::DegenerateSurface {
            width: surface.width,
            height: surface.height,
        });
    }

    let n = graph.nodes().len();
    let totals = graph.node_totals();

    let mut nodes: Vec<ColNode> = (0..n)
        .map(|i| ColNode {
            value: totals[i],
            depth: 0,
            height: 0,
            layer: 0,
            x0: 0.0,
            x1: 0.0,
            y0: 0.0,
            y1: 0.0,
            out_links: Vec::new(),
            in_links: Vec::new(),
        })
        .collect();

    let mut links: Vec<ColLink> = graph
        .links()
        .iter()
        .enumerate()
        .map(|(i, l)| ColLink {
            index: i,
            source: l.source,
            target: l.target,
            value: l.value,
            width: 0.0,
            y0: 0.0,
            y1: 0.0,
        })
        .collect();
    for link in &links {
        nodes[link.source].out_links.push(link.index);
        nodes[link.target].in_links.push(link.index);
    }

    assign_ranks(&mut nodes, &links, Direction::Downstream)?;
    assign_ranks(&mut nodes, &links, Direction::Upstream)?;

    let max_depth = nodes.iter().map(|n| n.depth).max().unwrap_or(0);
    let column_count = max_depth + 1;
    let kx = if column_count <= 1 {
        0.0
    } else {
        (x1 - x0 - options.node_width) / (column_count as f64 - 1.0)
    };

    let mut columns: Vec<Vec<usize>> = vec![Vec::new(); column_count];
    for i in 0..n {
        let last = column_count as i64 - 1;
        let raw_layer = match options.align {
            NodeAlign::Left => nodes[i].depth as i64,
            NodeAlign::Right => last - nodes[i].height as i64,
            NodeAlign::Justify => {
                if nodes[i].out_links.is_empty() {
                    last
                } else {
                    nodes[i].depth as i64
                }
            }
            NodeAlign::Center => {
                if !nodes[i].in_links.is_empty() {
                    nodes[i].depth as i64
                } else if !nodes[i].out_links.is_empty() {
                    let min_target_depth = nodes[i]
                        .out_links
                        .iter()
                        .map(|&li| nodes[links[li].target].depth)
                        .min()
                        .unwrap_or(0);
                    min_target_depth as i64 - 1
                } else {
                    0
                }
            }
        };
        let layer = raw_layer.clamp(0, last) as usize;
        nodes[i].layer = layer;
        nodes[i].x0 = x0 + layer as f64 * kx;
        nodes[i].x1 = nodes[i].x0 + options.node_width;
        columns[layer].push(i);
    }

    let max_len = columns.iter().map(|c| c.len()).max().unwrap_or(0);
    let py = if max_len <= 1 {
        options.node_padding
    } else {
        options
            .node_padding
            .min((y1 - y0) / (max_len as f64 - 1.0))
    };

    let mut ky = f64::INFINITY;
    for col in &columns {
        if col.is_empty() {
            continue;
        }
        let col_value: f64 = col.iter().map(|&ni| nodes[ni].value).sum();
        if col_value <= 0.0 {
            continue;
        }
        let available = (y1 - y0) - (col.len() as f64 - 1.0) * py;
        ky = ky.min(available / col_value);
    }
    if !ky.is_finite() {
        ky = 0.0;
    }

    for col in &columns {
        let mut y = y0;
        for &ni in col {
            nodes[ni].y0 = y;
            nodes[ni].y1 = y + nodes[ni].value * ky;
            y = nodes[ni].y1 + py;
            for &li in &nodes[ni].out_links.clone() {
                links[li].width = links[li].value * ky;
            }
        }
        if !col.is_empty() {
            let spread = (y1 - y + py) / (col.len() as f64 + 1.0);
            for (i, &ni) in col.iter().enumerate() {
                let shift = spread * (i as f64 + 1.0);
                nodes[ni].y0 += shift;
                nodes[ni].y1 += shift;
            }
            sort_column_links(&mut nodes, &links, col);
        }
    }

    let mut relax_columns = columns.clone();
    for i in 0..options.iterations {
        let alpha = 0.99_f64.powi(i as i32);
        let beta = (1.0 - alpha).max((i as f64 + 1.0) / options.iterations as f64);
        relax_right_to_left(&mut nodes, &links, &mut relax_columns, py, alpha, beta, y0, y1);
        relax_left_to_right(&mut nodes, &links, &mut relax_columns, py, alpha, beta, y0, y1);
    }

    for ni in 0..nodes.len() {
        let mut out_y = nodes[ni].y0;
        for li in nodes[ni].out_links.clone() {
            links[li].y0 = out_y + links[li].width / 2.0;
            out_y += links[li].width;
        }
        let mut in_y = nodes[ni].y0;
        for li in nodes[ni].in_links.clone() {
            links[li].y1 = in_y + links[li].width / 2.0;
            in_y += links[li].width;
        }
    }

    let layout_nodes: Vec<SankeyNodeLayout> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| SankeyNodeLayout {
            index: i,
            name: graph.nodes()[i].name.clone(),
            value: node.value,
            layer: node.layer,
            x0: node.x0,
            x1: node.x1,
            y0: node.y0,
            y1: node.y1,
        })
        .collect();

    let layout_links: Vec<SankeyLinkLayout> = links
        .iter()
        .map(|l| SankeyLinkLayout {
            index: l.index,
            source: l.source,
            target: l.target,
            value: l.value,
            width: l.width,
            y0: l.y0,
            y1: l.y1,
        })
        .collect();

    Ok(SankeyDiagramLayout {
        width: surface.width,
        height: surface.height,
        node_width: options.node_width,
        node_padding: py,
        nodes: layout_nodes,
        links: layout_links,
        bounds: Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: surface.width,
            max_y: surface.height,
        },
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Follow outgoing links; writes `depth`.
    Downstream,
    /// Follow incoming links; writes `height`.
    Upstream,
}

fn assign_ranks(nodes: &mut [ColNode], links: &[ColLink], dir: Direction) -> Result<()> {
    let n = nodes.len();
    let mut current: Vec<usize> = (0..n).collect();
    let mut next: Vec<usize> = Vec::new();
    let mut queued = vec![false; n];
    let mut rank = 0usize;
    while !current.is_empty() {
        for &ni in &current {
            match dir {
                Direction::Downstream => nodes[ni].depth = rank,
                Direction::Upstream => nodes[ni].height = rank,
            }
            let edges = match dir {
                Direction::Downstream => &nodes[ni].out_links,
                Direction::Upstream => &nodes[ni].in_links,
            };
            for &li in edges {
                let peer = match dir {
                    Direction::Downstream => links[li].target,
                    Direction::Upstream => links[li].source,
                };
                if !queued[peer] {
                    queued[peer] = true;
                    next.push(peer);
                }
            }
        }
        rank += 1;
        if rank > n {
            return Err(Error::CircularFlow {
                message: "cycle in flow graph".to_string(),
            });
        }
        current = std::mem::take(&mut next);
        queued.fill(false);
    }
    Ok(())
}

fn sort_out_links_by_target_y0(node_y0: &[f64], links: &[ColLink], link_indices: &mut [usize]) {
    link_indices.sort_by(|&a, &b| {
        f64_cmp(node_y0[links[a].target], node_y0[links[b].target])
            .then_with(|| links[a].index.cmp(&links[b].index))
    });
}

fn sort_in_links_by_source_y0(node_y0: &[f64], links: &[ColLink], link_indices: &mut [usize]) {
    link_indices.sort_by(|&a, &b| {
        f64_cmp(node_y0[links[a].source], node_y0[links[b].source])
            .then_with(|| links[a].index.cmp(&links[b].index))
    });
}

fn sort_column_links(nodes: &mut [ColNode], links: &[ColLink], column: &[usize]) {
    let node_y0: Vec<f64> = nodes.iter().map(|n| n.y0).collect();
    for &ni in column {
        sort_out_links_by_target_y0(&node_y0, links, &mut nodes[ni].out_links);
        sort_in_links_by_source_y0(&node_y0, links, &mut nodes[ni].in_links);
    }
}

fn sort_neighbor_links(nodes: &mut [ColNode], links: &[ColLink], node_idx: usize) {
    let node_y0: Vec<f64> = nodes.iter().map(|n| n.y0).collect();

    for li in nodes[node_idx].in_links.clone() {
        let source = links[li].source;
        sort_out_links_by_target_y0(&node_y0, links, &mut nodes[source].out_links);
    }
    for li in nodes[node_idx].out_links.clone() {
        let target = links[li].target;
        sort_in_links_by_source_y0(&node_y0, links, &mut nodes[target].in_links);
    }
}

/// Top edge of the given link's slot on the target side, assuming links fan
/// out from the source node's current position.
fn target_slot_top(nodes: &[ColNode], links: &[ColLink], py: f64, source: usize, target: usize) -> f64 {
    let fan = nodes[source].out_links.len() as f64;
    let mut y = nodes[source].y0 - (fan - 1.0) * py / 2.0;
    for &li in &nodes[source].out_links {
        if links[li].target == target {
            break;
        }
        y += links[li].width + py;
    }
    for &li in &nodes[target].in_links {
        if links[li].source == source {
            break;
        }
        y -= links[li].width;
    }
    y
}

fn source_slot_top(nodes: &[ColNode], links: &[ColLink], py: f64, source: usize, target: usize) -> f64 {
    let fan = nodes[target].in_links.len() as f64;
    let mut y = nodes[target].y0 - (fan - 1.0) * py / 2.0;
    for &li in &nodes[target].in_links {
        if links[li].source == source {
            break;
        }
        y += links[li].width + py;
    }
    for &li in &nodes[source].out_links {
        if links[li].target == target {
            break;
        }
        y -= links[li].width;
    }
    y
}

fn push_down(nodes: &mut [ColNode], column: &[usize], py: f64, mut y: f64, mut i: isize, alpha: f64) {
    while i < column.len() as isize {
        let ni = column[i as usize];
        let dy = (y - nodes[ni].y0) * alpha;
        if dy > 1e-6 {
            nodes[ni].y0 += dy;
            nodes[ni].y1 += dy;
        }
        y = nodes[ni].y1 + py;
        i += 1;
    }
}

fn push_up(nodes: &mut [ColNode], column: &[usize], py: f64, mut y: f64, mut i: isize, alpha: f64) {
    while i >= 0 {
        let ni = column[i as usize];
        let dy = (nodes[ni].y1 - y) * alpha;
        if dy > 1e-6 {
            nodes[ni].y0 -= dy;
            nodes[ni].y1 -= dy;
        }
        y = nodes[ni].y0 - py;
        i -= 1;
    }
}

fn resolve_collisions(
    nodes: &mut [ColNode],
    column: &[usize],
    py: f64,
    y_top: f64,
    y_bottom: f64,
    alpha: f64,
) {
    if column.is_empty() {
        return;
    }
    let i = column.len() >> 1;
    let subject = column[i];
    let (subject_y0, subject_y1) = (nodes[subject].y0, nodes[subject].y1);
    push_up(nodes, column, py, subject_y0 - py, i as isize - 1, alpha);
    push_down(nodes, column, py, subject_y1 + py, i as isize + 1, alpha);
    push_up(nodes, column, py, y_bottom, column.len() as isize - 1, alpha);
    push_down(nodes, column, py, y_top, 0, alpha);
}

#[allow(clippy::too_many_arguments)]
fn relax_left_to_right(
    nodes: &mut [ColNode],
    links: &[ColLink],
    columns: &mut [Vec<usize>],
    py: f64,
    alpha: f64,
    beta: f64,
    y_top: f64,
    y_bottom: f64,
) {
    for ci in 1..columns.len() {
        let column = &mut columns[ci];
        for &target in column.iter() {
            let mut y = 0.0;
            let mut w = 0.0;
            for &li in &nodes[target].in_links.clone() {
                let source = links[li].source;
                let v = links[li].value * (nodes[target].layer as f64 - nodes[source].layer as f64);
                y += target_slot_top(nodes, links, py, source, target) * v;
                w += v;
            }
            if !(w > 0.0) {
                continue;
            }
            let dy = (y / w - nodes[target].y0) * alpha;
            nodes[target].y0 += dy;
            nodes[target].y1 += dy;
            sort_neighbor_links(nodes, links, target);
        }
        column.sort_by(|&a, &b| f64_cmp(nodes[a].y0, nodes[b].y0).then_with(|| a.cmp(&b)));
        resolve_collisions(nodes, column, py, y_top, y_bottom, beta);
    }
}

#[allow(clippy::too_many_arguments)]
fn relax_right_to_left(
    nodes: &mut [ColNode],
    links: &[ColLink],
    columns: &mut [Vec<usize>],
    py: f64,
    alpha: f64,
    beta: f64,
    y_top: f64,
    y_bottom: f64,
) {
    if columns.len() < 2 {
        return;
    }
    for ci in (0..=(columns.len() - 2)).rev() {
        let column = &mut columns[ci];
        for &source in column.iter() {
            let mut y = 0.0;
            let mut w = 0.0;
            for &li in &nodes[source].out_links.clone() {
                let target = links[li].target;
                let v = links[li].value * (nodes[target].layer as f64 - nodes[source].layer as f64);
                y += source_slot_top(nodes, links, py, source, target) * v;
                w += v;
            }
            if !(w > 0.0) {
                continue;
            }
            let dy = (y / w - nodes[source].y0) * alpha;
            nodes[source].y0 += dy;
            nodes[source].y1 += dy;
            sort_neighbor_links(nodes, links, source);
        }
        column.sort_by(|&a, &b| f64_cmp(nodes[a].y0, nodes[b].y0).then_with(|| a.cmp(&b)));
        resolve_collisions(nodes, column, py, y_top, y_bottom, beta);
    }
}
