use std::sync::Arc;

use itertools::Itertools;

use crate::entities::{Fabric, Gene, PieceShape};
use crate::io::ext_repr::{ExtFabric, ExtInstance, ExtPiece, ExtPlacedPiece, ExtShape, ExtSolution};

/// Exports a gene, evaluating it first if needed
pub fn export(gene: &Gene) -> ExtSolution {
    let fitness = match gene.cached_fitness_data() {
        Some(data) => *data,
        None => *gene.clone().fitness_data(),
    };
    let placements = gene
        .pieces()
        .iter()
        .enumerate()
        .map(|(slot, p)| ExtPlacedPiece {
            slot,
            piece_id: p.id(),
            center: p.center_origin.into(),
            orientation: p.orientation.into(),
        })
        .collect_vec();

    ExtSolution {
        fabric: export_fabric(gene.fabric()),
        placements,
        fitness,
    }
}

pub fn export_fabric(fabric: &Fabric) -> ExtFabric {
    ExtFabric {
        width: fabric.width,
        height: fabric.height,
    }
}

/// Exports the distinct shapes among `shapes` as an instance, consecutive copies of the same shape are merged into `qty`
pub fn export_instance(name: &str, fabric: &Fabric, shapes: &[Arc<PieceShape>]) -> ExtInstance {
    let pieces = shapes
        .iter()
        .sorted_by_key(|s| s.id)
        .chunk_by(|s| s.id)
        .into_iter()
        .map(|(_, group)| {
            let group = group.collect_vec();
            export_piece(group[0], group.len())
        })
        .collect_vec();

    ExtInstance {
        name: name.to_owned(),
        fabric: export_fabric(fabric),
        pieces,
    }
}

pub fn export_piece(shape: &PieceShape, qty: usize) -> ExtPiece {
    ExtPiece {
        id: shape.id,
        qty,
        shape: ExtShape::Rows(shape.mask.to_rows()),
        center: Some(shape.meta.center.into()),
        resolution: Some(shape.meta.resolution),
        n_holes: shape.meta.n_holes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{PatternPiece, PieceSource};
    use crate::eval::FitnessWeights;
    use crate::geometry::primitives::Point;
    use crate::geometry::{BitMask, Orientation};
    use crate::io::import::import;

    fn shapes() -> Vec<Arc<PieceShape>> {
        let l = Arc::new(PieceShape::new(0, PieceSource::from_mask(BitMask::from_rows(&["#.", "##"]).unwrap())).unwrap());
        let bar = Arc::new(PieceShape::new(1, PieceSource::from_mask(BitMask::filled(3, 1).unwrap())).unwrap());
        vec![l.clone(), bar, l]
    }

    #[test]
    fn solution_lists_every_placement() {
        let fabric = Fabric::new(8, 6).unwrap();
        let s = shapes();
        let pieces = vec![
            PatternPiece::new(s[0].clone(), Point::new(1, 1), Orientation::R0),
            PatternPiece::new(s[1].clone(), Point::new(4, 4), Orientation::R90),
            PatternPiece::new(s[2].clone(), Point::new(1, 5), Orientation::R270),
        ];
        let mut gene = Gene::new(fabric, pieces, FitnessWeights::default()).unwrap();
        let solution = export(&gene);

        assert_eq!(solution.placements.len(), 3);
        assert_eq!(
            solution.placements[1],
            ExtPlacedPiece {
                slot: 1,
                piece_id: 1,
                center: (4, 4),
                orientation: 90,
            }
        );
        assert_eq!(solution.placements[2].orientation, 270);
        assert_eq!(solution.fitness, *gene.fitness_data());
    }

    #[test]
    fn exported_instance_imports_back() {
        let fabric = Fabric::new(8, 6).unwrap();
        let ext = export_instance("demo", &fabric, &shapes());
        assert_eq!(ext.pieces.len(), 2);
        assert_eq!(ext.pieces[0].qty, 2);

        let (imported_fabric, imported) = import(&ext).unwrap();
        assert_eq!(imported_fabric, fabric);
        assert_eq!(imported.iter().map(|s| s.id).collect_vec(), vec![0, 0, 1]);
        assert_eq!(imported[0].meta, shapes()[0].meta);
        assert_eq!(imported[0].mask.to_rows(), vec!["#.", "##"]);
    }
}
