use crate::{
    edge_ring::{EdgeRing, RingKind},
    geom::point_not_in_list,
    geometry::Surface,
    graph::{PlanarGraph, RingIdx},
    label::Location,
    locate::locate_in_ring,
    Error, Result,
};

/// Builds the result surfaces from the directed edges marked as in the
/// result.
///
/// Result edges are first linked into maximal rings. A maximal ring that
/// touches itself is split into minimal rings, which contain at most one
/// shell. Holes that don't come with a shell are then assigned to the
/// smallest shell containing them.
pub fn build_polygons(graph: &mut PlanarGraph) -> Result<Vec<Surface>> {
    for n in graph.node_indices() {
        graph.link_result_directed_edges(n)?;
    }

    let mut rings = Vec::new();
    let max_rings = build_maximal_rings(graph, &mut rings)?;

    let mut shells = Vec::new();
    let mut free_holes = Vec::new();
    for max_ring in max_rings {
        if rings[max_ring.0].max_node_degree(graph, max_ring) > 2 {
            let min_rings = build_minimal_rings(graph, &mut rings, max_ring)?;
            match find_shell(&rings, &min_rings)? {
                Some(shell) => {
                    for &r in &min_rings {
                        if rings[r.0].is_hole {
                            set_shell(&mut rings, r, shell);
                        }
                    }
                    shells.push(shell);
                }
                None => free_holes.extend(min_rings),
            }
        } else if rings[max_ring.0].is_hole {
            free_holes.push(max_ring);
        } else {
            shells.push(max_ring);
        }
    }

    for hole in free_holes {
        if rings[hole.0].shell.is_some() {
            continue;
        }
        let shell = find_ring_containing(&rings, hole, &shells).ok_or_else(|| {
            Error::topology("unable to assign hole to a shell", rings[hole.0].pts[0])
        })?;
        set_shell(&mut rings, hole, shell);
    }

    log::debug!(
        "built {} rings, {} of them shells",
        rings.len(),
        shells.len()
    );
    Ok(shells
        .into_iter()
        .map(|s| {
            let shell = &rings[s.0];
            Surface {
                shell: shell.pts.clone(),
                holes: shell.holes.iter().map(|h| rings[h.0].pts.clone()).collect(),
            }
        })
        .collect())
}

fn build_maximal_rings(graph: &mut PlanarGraph, rings: &mut Vec<EdgeRing>) -> Result<Vec<RingIdx>> {
    let mut ret = Vec::new();
    for de in graph.half_edges() {
        let d = &graph.des[de];
        if d.in_result && d.label.is_area() && d.edge_ring.is_none() {
            let idx = EdgeRing::build(graph, rings, de, RingKind::Maximal)?;
            for ring_de in &rings[idx.0].edges {
                graph.edge_mut(*ring_de).in_result = true;
            }
            ret.push(idx);
        }
    }
    Ok(ret)
}

fn build_minimal_rings(
    graph: &mut PlanarGraph,
    rings: &mut Vec<EdgeRing>,
    max_ring: RingIdx,
) -> Result<Vec<RingIdx>> {
    let edges = rings[max_ring.0].edges.clone();
    for de in &edges {
        graph.link_minimal_directed_edges(graph.des[*de].node, max_ring)?;
    }

    let mut ret = Vec::new();
    for de in edges {
        if graph.des[de].min_edge_ring.is_none() {
            ret.push(EdgeRing::build(graph, rings, de, RingKind::Minimal)?);
        }
    }
    Ok(ret)
}

// Minimal rings from one maximal ring contain at most one shell.
fn find_shell(rings: &[EdgeRing], min_rings: &[RingIdx]) -> Result<Option<RingIdx>> {
    let mut shells = min_rings.iter().filter(|r| !rings[r.0].is_hole);
    let shell = shells.next().copied();
    if let Some(other) = shells.next() {
        return Err(Error::topology(
            "found two shells in minimal ring list",
            rings[other.0].pts[0],
        ));
    }
    Ok(shell)
}

fn set_shell(rings: &mut [EdgeRing], hole: RingIdx, shell: RingIdx) {
    rings[hole.0].shell = Some(shell);
    rings[shell.0].holes.push(hole);
}

// The shell with the smallest envelope that contains `hole`.
fn find_ring_containing(rings: &[EdgeRing], hole: RingIdx, shells: &[RingIdx]) -> Option<RingIdx> {
    let test = &rings[hole.0];
    let mut min: Option<RingIdx> = None;
    for &s in shells {
        let shell = &rings[s.0];
        if !shell.env.contains(&test.env) {
            continue;
        }
        let test_pt = point_not_in_list(&test.pts, &shell.pts).unwrap_or(&test.pts[0]);
        if locate_in_ring(test_pt, &shell.pts) == Location::Exterior {
            continue;
        }
        if min.map_or(true, |m| rings[m.0].env.contains(&shell.env)) {
            min = Some(s);
        }
    }
    min
}
