use anyhow::{Result, ensure};
use ndarray::Array2;

use crate::entities::Gene;
use crate::textile::DistanceConfig;

/// Dissimilarity of two arrangements of the same pieces.
///
/// Sum of the rounded euclidean distances between the centers of corresponding pieces, divided by the
/// largest fabric dimension and weighted by `center_weight`, plus `orientation_weight` for every piece
/// with a different orientation.
pub fn genes_distance(a: &Gene, b: &Gene, config: &DistanceConfig) -> Result<f64> {
    ensure!(
        a.n_pieces() == b.n_pieces(),
        "both genes must have the same number of pieces, got {} and {}",
        a.n_pieces(),
        b.n_pieces()
    );
    let (center_distance, orientation_distance) =
        a.pieces()
            .iter()
            .zip(b.pieces())
            .fold((0.0, 0.0), |(cd, od), (pa, pb)| {
                let d = pa.center_origin.distance(&pb.center_origin).round();
                let o = if pa.orientation == pb.orientation { 0.0 } else { 1.0 };
                (cd + d, od + o)
            });
    let max_dim = a.fabric().max_dim() as f64;
    Ok(center_distance / max_dim * config.center_weight + orientation_distance * config.orientation_weight)
}

/// Flattens a gene into `[row, col, orientation]` triplets, one per piece.
/// When normalized, rows and columns are divided by their maximum over the gene and orientations by 270.
pub fn data_vector(gene: &Gene, normalize: bool) -> Vec<f64> {
    let pieces = gene.pieces();
    let (max_row, max_col) = match normalize {
        true => pieces.iter().fold((1, 1), |(r, c), p| {
            (i64::max(r, p.center_origin.row), i64::max(c, p.center_origin.col))
        }),
        false => (1, 1),
    };
    let max_orientation = if normalize { 270.0 } else { 1.0 };

    pieces
        .iter()
        .flat_map(|p| {
            [
                p.center_origin.row as f64 / max_row as f64,
                p.center_origin.col as f64 / max_col as f64,
                p.orientation.degrees() as f64 / max_orientation,
            ]
        })
        .collect()
}

/// Symmetric matrix of the pairwise distances between `genes`
pub fn distance_matrix(genes: &[&Gene], config: &DistanceConfig) -> Result<Array2<f64>> {
    let n = genes.len();
    let mut matrix = Array2::zeros((n, n));
    for i in 0..n {
        for j in (i + 1)..n {
            let d = genes_distance(genes[i], genes[j], config)?;
            matrix[[i, j]] = d;
            matrix[[j, i]] = d;
        }
    }
    Ok(matrix)
}
