use super::integration::{GeometryError, ShapeFnSampler};
use super::local::LocalSystem;
use crate::domain::{grid::detect_boundary_edges, GlobalData, Grid};
use log::debug;
use rayon::prelude::*;

impl Grid {
    /// Compute the local matrices of every Element and aggregate them into the global system.
    ///
    /// Local computations are parallelized over the Rayon Global Threadpool. Aggregation happens
    /// afterwards, in Element order, so repeated assemblies of the same Grid are bit-identical.
    ///
    /// Any previously assembled state is discarded.
    ///
    /// # Returns
    /// * An `Err` describing the first (by Element order) invalid Element; the Grid is left unchanged
    /// * `Ok(())`, otherwise
    pub fn assemble(&mut self, data: &GlobalData, sampler: &ShapeFnSampler) -> Result<(), GeometryError> {
        let nodes = &self.nodes;

        let locals = self
            .elements
            .par_iter()
            .map(|element| {
                let corners = element.node_ids.map(|id| nodes[id - 1].coords);
                let boundary_edges = detect_boundary_edges(element.id, &element.node_ids, nodes);
                LocalSystem::compute(element.id, &corners, boundary_edges, data, sampler)
            })
            .collect::<Vec<Result<LocalSystem, GeometryError>>>()
            .into_iter()
            .collect::<Result<Vec<LocalSystem>, GeometryError>>()?;

        for (element, local) in self.elements.iter_mut().zip(locals) {
            element.local = local;
        }

        self.system.clear();
        self.system.extend(self.elements.iter());

        debug!(
            "Assembled {} Elements over {} Nodes with {} integration; {} boundary edges",
            self.elements.len(),
            self.nodes.len(),
            sampler.scheme().order(),
            self.elements
                .iter()
                .map(|e| e.local.boundary_edges.len())
                .sum::<usize>(),
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grid::{Element, Node, Point};
    use crate::fem_problem::integration::{GaussScheme, IntegrationOrder};
    use matrixcompare::assert_matrix_eq;
    use proptest::prelude::*;

    fn reference_data() -> GlobalData {
        GlobalData::from_values([
            500.0, 50.0, 25.0, 300.0, 1200.0, 100.0, 7800.0, 700.0, 16.0, 9.0,
        ])
        .unwrap()
    }

    fn assembled(mut grid: Grid, order: IntegrationOrder) -> Grid {
        let sampler = ShapeFnSampler::new(GaussScheme::new(order));
        grid.assemble(&reference_data(), &sampler).unwrap();
        grid
    }

    // renumber the Nodes of a Grid: old id `i` becomes `perm[i - 1] + 1`
    fn relabeled(grid: &Grid, perm: &[usize]) -> Grid {
        let mut nodes = grid.nodes.clone();
        for node in grid.nodes.iter() {
            let new_id = perm[node.id - 1] + 1;
            nodes[new_id - 1] = Node::new(new_id, node.coords, node.boundary);
        }

        let elements = grid
            .elements
            .iter()
            .map(|e| Element::new(e.id, e.node_ids.map(|id| perm[id - 1] + 1)))
            .collect();

        Grid::new(nodes, elements).unwrap()
    }

    #[test]
    fn global_sums_match_geometry() {
        let data = reference_data();
        let rectangle = Grid::uniform_rectangle(0.1, 0.1, [3, 3]).unwrap();
        let grid = assembled(rectangle, IntegrationOrder::Two);

        let (area, perimeter) = (0.01, 0.4);

        assert!((grid.system.c.sum() - data.capacity_coefficient() * area).abs() < 1e-6);
        // conduction rows sum to zero, so only convection remains: α * ∫(ΣN)² ds
        assert!((grid.system.h.sum() - data.alfa * perimeter).abs() < 1e-9);
        assert!((grid.system.p.sum() - data.alfa * data.tot * perimeter).abs() < 1e-6);

        assert_matrix_eq!(grid.system.h, grid.system.h.transpose(), comp = abs, tol = 1e-12);
        assert_matrix_eq!(grid.system.c, grid.system.c.transpose(), comp = abs, tol = 1e-9);

        // interior Node 6 has no boundary edges
        assert_eq!(grid.system.p[5], 0.0);
    }

    #[test]
    fn reassembly_is_bit_identical() {
        let sampler = ShapeFnSampler::new(GaussScheme::new(IntegrationOrder::Three));
        let mut grid = Grid::uniform_rectangle(0.3, 0.2, [6, 4]).unwrap();

        grid.assemble(&reference_data(), &sampler).unwrap();
        let first = grid.system.clone();
        grid.assemble(&reference_data(), &sampler).unwrap();

        assert_eq!(first, grid.system);
    }

    #[test]
    fn first_invalid_element_is_reported() {
        let sampler = ShapeFnSampler::new(GaussScheme::new(IntegrationOrder::Two));
        let mut grid = Grid::uniform_rectangle(1.0, 1.0, [2, 2]).unwrap();

        // collapse the shared center Node onto a corner; every Element touches it
        grid.nodes[4].coords = Point::new(0.0, 0.0);
        let before = grid.system.clone();

        match grid.assemble(&reference_data(), &sampler) {
            Err(GeometryError::DegenerateJacobian { element, .. })
            | Err(GeometryError::InconsistentOrientation { element, .. }) => assert_eq!(element, 1),
            other => panic!("expected a geometry error, found {:?}", other),
        }
        assert_eq!(before, grid.system);
    }

    proptest! {
        #[test]
        fn node_relabeling_permutes_global_system(
            perm in Just((0..16).collect::<Vec<usize>>()).prop_shuffle()
        ) {
            let original = Grid::uniform_rectangle(0.1, 0.1, [3, 3]).unwrap();
            let relabeled_grid = assembled(relabeled(&original, &perm), IntegrationOrder::Two);
            let original = assembled(original, IntegrationOrder::Two);
            let (a, b) = (&original.system, &relabeled_grid.system);

            for i in 0..16 {
                prop_assert!((a.p[i] - b.p[perm[i]]).abs() < 1e-9);
                for j in 0..16 {
                    let (pi, pj) = (perm[i], perm[j]);
                    prop_assert!((a.h[(i, j)] - b.h[(pi, pj)]).abs() < 1e-9);
                    prop_assert!((a.c[(i, j)] - b.c[(pi, pj)]).abs() < 1e-6);
                }
            }
        }

        #[test]
        fn element_order_does_not_change_global_system(
            order in Just((0..12).collect::<Vec<usize>>()).prop_shuffle()
        ) {
            let original = Grid::uniform_rectangle(0.4, 0.3, [4, 3]).unwrap();
            let shuffled = Grid::new(
                original.nodes.clone(),
                order.iter().map(|k| original.elements[*k].clone()).collect(),
            ).unwrap();

            let original = assembled(original, IntegrationOrder::Three);
            let shuffled = assembled(shuffled, IntegrationOrder::Three);

            assert_matrix_eq!(original.system.h, shuffled.system.h, comp = abs, tol = 1e-9);
            assert_matrix_eq!(original.system.c, shuffled.system.c, comp = abs, tol = 1e-6);
            assert_matrix_eq!(original.system.p, shuffled.system.p, comp = abs, tol = 1e-6);
        }
    }
}
