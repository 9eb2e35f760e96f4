use super::{Node, Point};
use log::warn;
use smallvec::SmallVec;
use std::fmt;

/// The four sides of a quadrilateral.
///
/// Used both as the geometric label of a physical edge (by corner extrema) and as
/// the side of the parametric square `[-1, 1]²` an edge is mapped from:
/// * `Top`: η = 1
/// * `Bottom`: η = -1
/// * `Left`: ξ = -1
/// * `Right`: ξ = 1
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeSide {
    Top,
    Right,
    Bottom,
    Left,
}

impl EdgeSide {
    /// The reference-space side joining two adjacent local node indices (0..4, counter-clockwise from (-1, -1))
    pub fn from_local_pair(a: usize, b: usize) -> Option<Self> {
        match (a.min(b), a.max(b)) {
            (0, 1) => Some(Self::Bottom),
            (1, 2) => Some(Self::Right),
            (2, 3) => Some(Self::Top),
            (0, 3) => Some(Self::Left),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for EdgeSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An Element side whose two end Nodes both carry the boundary flag
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryEdge {
    /// 1-based ids of the two end Nodes
    pub node_ids: [usize; 2],
    /// Geometric label of the edge within its Element
    pub side: EdgeSide,
    /// Side of the parametric square the edge is integrated over
    pub reference_side: EdgeSide,
}

/// At most one entry per side of the Element
pub type BoundaryEdges = SmallVec<[BoundaryEdge; 4]>;

// local node index pairs for (top, right, bottom, left) following the winding order
const WINDING_EDGES: [([usize; 2], EdgeSide); 4] = [
    ([2, 3], EdgeSide::Top),
    ([1, 2], EdgeSide::Right),
    ([0, 1], EdgeSide::Bottom),
    ([3, 0], EdgeSide::Left),
];

/// Find the sides of an Element which lie on the domain boundary.
///
/// The corner role of each node is chosen by its coordinate extrema (ties broken by x, then y):
/// * bottom-left: smallest `(x, y)`
/// * top-right: largest `(x, y)`
/// * top-left: smallest `(x, -y)`
/// * bottom-right: largest `(x, -y)`
///
/// The candidate sides are then top (TL, TR), right (TR, BR), bottom (BR, BL) and left (BL, TL).
/// A side is reported only when both of its Nodes are boundary Nodes.
///
/// If the extrema don't pick out four distinct corners that are pairwise adjacent in the Element's
/// node ordering (e.g. a square rotated by 45°), the sides are labeled by winding order instead.
///
/// `nodes` is indexed by `node_id - 1`; the node ids must already be validated.
pub fn detect_boundary_edges(element_id: usize, node_ids: &[usize; 4], nodes: &[Node]) -> BoundaryEdges {
    let node = |local: usize| &nodes[node_ids[local] - 1];
    let mut edges = BoundaryEdges::new();

    if !node_ids.iter().any(|id| nodes[id - 1].boundary) {
        return edges;
    }

    let candidates = match extremal_corner_edges(node_ids, nodes) {
        Some(candidates) => candidates,
        None => {
            warn!(
                "Element {}: corner roles are ambiguous; labeling boundary edges by winding order",
                element_id
            );
            WINDING_EDGES
        }
    };

    for ([a, b], side) in candidates {
        if node(a).boundary && node(b).boundary {
            if let Some(reference_side) = EdgeSide::from_local_pair(a, b) {
                edges.push(BoundaryEdge {
                    node_ids: [node_ids[a], node_ids[b]],
                    side,
                    reference_side,
                });
            }
        }
    }

    edges
}

// local index pairs of the (top, right, bottom, left) sides chosen by coordinate extrema
fn extremal_corner_edges(node_ids: &[usize; 4], nodes: &[Node]) -> Option<[([usize; 2], EdgeSide); 4]> {
    let coords: [Point; 4] = node_ids.map(|id| nodes[id - 1].coords);

    let pick = |cmp: fn(&Point, &Point) -> std::cmp::Ordering, largest: bool| -> usize {
        let mut best = 0;
        for candidate in 1..4 {
            let ord = cmp(&coords[candidate], &coords[best]);
            if (largest && ord.is_gt()) || (!largest && ord.is_lt()) {
                best = candidate;
            }
        }
        best
    };

    let bottom_left = pick(Point::xy_order, false);
    let top_right = pick(Point::xy_order, true);
    let top_left = pick(Point::x_neg_y_order, false);
    let bottom_right = pick(Point::x_neg_y_order, true);

    let edges = [
        ([top_left, top_right], EdgeSide::Top),
        ([top_right, bottom_right], EdgeSide::Right),
        ([bottom_right, bottom_left], EdgeSide::Bottom),
        ([bottom_left, top_left], EdgeSide::Left),
    ];

    let mut roles = [bottom_left, bottom_right, top_right, top_left];
    roles.sort_unstable();
    let distinct = roles.windows(2).all(|w| w[0] != w[1]);

    if distinct
        && edges
            .iter()
            .all(|([a, b], _)| EdgeSide::from_local_pair(*a, *b).is_some())
    {
        Some(edges)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // (n x n) grid of unit squares; nodes numbered row by row from the bottom-left corner
    fn unit_grid(n: usize, boundary: impl Fn(usize, usize) -> bool) -> (Vec<Node>, Vec<[usize; 4]>) {
        let mut nodes = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                let id = j * (n + 1) + i + 1;
                nodes.push(Node::new(id, Point::new(i as f64, j as f64), boundary(i, j)));
            }
        }

        let mut elements = Vec::new();
        for j in 0..n {
            for i in 0..n {
                let n1 = j * (n + 1) + i + 1;
                elements.push([n1, n1 + 1, n1 + n + 2, n1 + n + 1]);
            }
        }

        (nodes, elements)
    }

    #[test]
    fn extreme_corners_only_yield_no_edges() {
        let (nodes, elements) = unit_grid(2, |i, j| (i == 0 || i == 2) && (j == 0 || j == 2));

        for (e, ids) in elements.iter().enumerate() {
            assert!(detect_boundary_edges(e + 1, ids, &nodes).is_empty());
        }
    }

    #[test]
    fn bottom_row_yields_one_bottom_edge_per_bottom_element() {
        let (nodes, elements) = unit_grid(2, |_, j| j == 0);

        let e1 = detect_boundary_edges(1, &elements[0], &nodes);
        assert_eq!(e1.len(), 1);
        assert_eq!(e1[0].side, EdgeSide::Bottom);
        assert_eq!(e1[0].reference_side, EdgeSide::Bottom);
        assert_eq!(e1[0].node_ids, [2, 1]);

        let e2 = detect_boundary_edges(2, &elements[1], &nodes);
        assert_eq!(e2.len(), 1);
        assert_eq!(e2[0].side, EdgeSide::Bottom);
        assert_eq!(e2[0].node_ids, [3, 2]);

        assert!(detect_boundary_edges(3, &elements[2], &nodes).is_empty());
        assert!(detect_boundary_edges(4, &elements[3], &nodes).is_empty());
    }

    #[test]
    fn perimeter_of_three_by_three_grid() {
        let (nodes, elements) = unit_grid(3, |i, j| i == 0 || j == 0 || i == 3 || j == 3);

        let expected: [&[EdgeSide]; 9] = [
            &[EdgeSide::Bottom, EdgeSide::Left],
            &[EdgeSide::Bottom],
            &[EdgeSide::Right, EdgeSide::Bottom],
            &[EdgeSide::Left],
            &[],
            &[EdgeSide::Right],
            &[EdgeSide::Top, EdgeSide::Left],
            &[EdgeSide::Top],
            &[EdgeSide::Top, EdgeSide::Right],
        ];

        for (e, (ids, sides)) in elements.iter().zip(expected.iter()).enumerate() {
            let found: Vec<EdgeSide> = detect_boundary_edges(e + 1, ids, &nodes)
                .iter()
                .map(|edge| edge.side)
                .collect();
            assert_eq!(&found[..], *sides, "element {}", e + 1);
        }
    }

    #[test]
    fn rotated_numbering_maps_to_matching_reference_side() {
        // element starts at its top-right corner (counter-clockwise)
        let nodes = vec![
            Node::new(1, Point::new(1.0, 1.0), true),
            Node::new(2, Point::new(0.0, 1.0), true),
            Node::new(3, Point::new(0.0, 0.0), false),
            Node::new(4, Point::new(1.0, 0.0), false),
        ];

        let edges = detect_boundary_edges(1, &[1, 2, 3, 4], &nodes);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].side, EdgeSide::Top);
        assert_eq!(edges[0].reference_side, EdgeSide::Bottom);
    }

    #[test]
    fn diamond_falls_back_to_winding_order() {
        let nodes = vec![
            Node::new(1, Point::new(1.0, 0.0), true),
            Node::new(2, Point::new(2.0, 1.0), true),
            Node::new(3, Point::new(1.0, 2.0), false),
            Node::new(4, Point::new(0.0, 1.0), false),
        ];

        let edges = detect_boundary_edges(1, &[1, 2, 3, 4], &nodes);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].side, EdgeSide::Bottom);
        assert_eq!(edges[0].node_ids, [1, 2]);
    }
}
