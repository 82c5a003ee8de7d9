use std::sync::Arc;

use anyhow::{Context, Result, ensure};
use itertools::Itertools;
use log::debug;

use crate::entities::{Fabric, PieceShape, PieceSource};
use crate::geometry::BitMask;
use crate::geometry::primitives::Point;
use crate::io::ext_repr::{ExtFabric, ExtInstance, ExtPiece, ExtShape};

/// Imports an instance into the library.
/// Every piece appears `qty` times in the returned list, the copies share the same [`PieceShape`].
pub fn import(ext_instance: &ExtInstance) -> Result<(Fabric, Vec<Arc<PieceShape>>)> {
    let fabric = import_fabric(&ext_instance.fabric)?;

    let mut ext_pieces = ext_instance.pieces.iter().collect_vec();
    ext_pieces.sort_by_key(|p| p.id);
    ensure!(
        ext_pieces.iter().enumerate().all(|(i, p)| p.id == i),
        "all pieces should have consecutive IDs starting from 0. IDs: {:?}",
        ext_pieces.iter().map(|p| p.id).collect_vec()
    );

    let mut shapes = vec![];
    for ext_piece in ext_pieces {
        ensure!(ext_piece.qty > 0, "piece {} has a quantity of 0", ext_piece.id);
        let shape = Arc::new(import_piece(ext_piece)?);
        shapes.extend(std::iter::repeat_n(shape, ext_piece.qty));
    }
    debug!(
        "[IMPORT] instance '{}': {} pieces ({} distinct) on a {}×{} fabric",
        ext_instance.name,
        shapes.len(),
        ext_instance.pieces.len(),
        fabric.width,
        fabric.height
    );

    Ok((fabric, shapes))
}

pub fn import_fabric(ext_fabric: &ExtFabric) -> Result<Fabric> {
    Fabric::new(ext_fabric.width, ext_fabric.height)
}

pub fn import_piece(ext_piece: &ExtPiece) -> Result<PieceShape> {
    let mask = import_shape(&ext_piece.shape).with_context(|| format!("invalid shape for piece {}", ext_piece.id))?;
    let source = PieceSource {
        center: ext_piece.center.map(Point::from),
        n_holes: ext_piece.n_holes,
        resolution: ext_piece.resolution,
        ..PieceSource::from_mask(mask)
    };
    PieceShape::new(ext_piece.id, source)
}

pub fn import_shape(ext_shape: &ExtShape) -> Result<BitMask> {
    match ext_shape {
        ExtShape::Rectangle { width, height } => BitMask::filled(*width, *height),
        ExtShape::Rows(rows) => BitMask::from_rows(rows.as_slice()),
    }
}
