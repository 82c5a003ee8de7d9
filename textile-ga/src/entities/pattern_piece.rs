use std::sync::Arc;

use anyhow::{Result, ensure};

use crate::entities::Fabric;
use crate::geometry::primitives::{Point, Rect};
use crate::geometry::{BitMask, Orientation, Raster};

/// Resolution assumed for pieces which do not specify one, in pixels per cm
pub const DEFAULT_RESOLUTION: f64 = 10.0;

/// Raw description of a piece, as delivered by whatever extracted it from a pattern.
/// Missing values are derived from the mask.
#[derive(Debug, Clone)]
pub struct PieceSource {
    pub mask: BitMask,
    /// Number of set pixels, counted from the mask if `None`
    pub surface: Option<u64>,
    /// Rotation center relative to the top-left corner of the mask, `(h/2, w/2)` if `None`
    pub center: Option<Point>,
    /// Center of mass relative to the top-left corner of the mask
    pub centroid: Option<Point>,
    pub n_holes: usize,
    /// Pixels per cm, [`DEFAULT_RESOLUTION`] if `None`
    pub resolution: Option<f64>,
}

impl PieceSource {
    pub fn from_mask(mask: BitMask) -> Self {
        PieceSource {
            mask,
            surface: None,
            center: None,
            centroid: None,
            n_holes: 0,
            resolution: None,
        }
    }
}

/// Properties of a shape which never change once it is created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceMeta {
    pub width: usize,
    pub height: usize,
    /// Rotation center, relative to the top-left corner of the un-rotated mask
    pub center: Point,
    pub surface: u64,
    pub centroid: Option<Point>,
    pub n_holes: usize,
    pub resolution: f64,
}

/// Immutable shape of a pattern piece, shared by every placement of it.
#[derive(Debug, Clone)]
pub struct PieceShape {
    pub id: usize,
    pub mask: BitMask,
    pub meta: PieceMeta,
}

impl PieceShape {
    pub fn new(id: usize, source: PieceSource) -> Result<Self> {
        let PieceSource {
            mask,
            surface,
            center,
            centroid,
            n_holes,
            resolution,
        } = source;
        let (width, height) = (mask.width(), mask.height());
        let center = center.unwrap_or(Point::new((height / 2) as i64, (width / 2) as i64));
        ensure!(
            (0..height as i64).contains(&center.row) && (0..width as i64).contains(&center.col),
            "center {center} of piece {id} lies outside its {width}×{height} mask"
        );
        let resolution = resolution.unwrap_or(DEFAULT_RESOLUTION);
        ensure!(
            resolution > 0.0,
            "resolution of piece {id} must be positive, got {resolution}"
        );
        let surface = surface.unwrap_or_else(|| mask.n_set_pixels());

        Ok(PieceShape {
            id,
            mask,
            meta: PieceMeta {
                width,
                height,
                center,
                surface,
                centroid,
                n_holes,
                resolution,
            },
        })
    }
}

/// A [`PieceShape`] placed on the fabric.
/// Cloning shares the shape and copies the placement.
#[derive(Debug, Clone)]
pub struct PatternPiece {
    pub shape: Arc<PieceShape>,
    /// Position of the rotated center on the fabric
    pub center_origin: Point,
    pub orientation: Orientation,
}

impl PatternPiece {
    pub fn new(shape: Arc<PieceShape>, center_origin: Point, orientation: Orientation) -> Self {
        PatternPiece {
            shape,
            center_origin,
            orientation,
        }
    }

    pub fn id(&self) -> usize {
        self.shape.id
    }

    pub fn meta(&self) -> &PieceMeta {
        &self.shape.meta
    }

    pub fn surface(&self) -> u64 {
        self.shape.meta.surface
    }

    pub fn rotated_width(&self) -> usize {
        self.rotated_dims().0
    }

    pub fn rotated_height(&self) -> usize {
        self.rotated_dims().1
    }

    /// (width, height) in the current orientation
    pub fn rotated_dims(&self) -> (usize, usize) {
        let meta = &self.shape.meta;
        self.orientation.rotated_dims(meta.width, meta.height)
    }

    /// Rotated center, relative to the top-left corner of the rotated mask
    pub fn relative_center(&self) -> Point {
        let meta = &self.shape.meta;
        self.orientation
            .rotate_point(meta.center, meta.width, meta.height)
    }

    /// Top-left corner of the rotated mask on the fabric
    pub fn top_left(&self) -> Point {
        self.center_origin - self.relative_center()
    }

    pub fn bbox(&self) -> Rect {
        let (w, h) = self.rotated_dims();
        Rect::from_top_left(self.top_left(), w, h)
    }

    pub fn rotated_mask(&self) -> BitMask {
        self.shape.mask.rotated(self.orientation)
    }

    /// Whether the piece covers fabric pixel (`row`, `col`)
    #[inline(always)]
    pub fn covers(&self, row: i64, col: i64) -> bool {
        let tl = self.top_left();
        let (w, h) = self.rotated_dims();
        let (r, c) = (row - tl.row, col - tl.col);
        if r < 0 || c < 0 || r >= h as i64 || c >= w as i64 {
            return false;
        }
        self.shape
            .mask
            .bit_oriented(r as usize, c as usize, self.orientation)
    }

    /// Moves the piece back inside the fabric if it sticks out.
    /// Returns whether the piece had to be moved.
    pub fn clamp_into(&mut self, fabric: &Fabric) -> Result<bool> {
        let (w, h) = self.rotated_dims();
        ensure!(
            w <= fabric.width && h <= fabric.height,
            "piece {} ({w}×{h} at {}) does not fit in fabric of {}×{}",
            self.id(),
            self.orientation,
            fabric.width,
            fabric.height
        );
        let tl = self.top_left();
        let clamped_tl = Point::new(
            tl.row.clamp(0, (fabric.height - h) as i64),
            tl.col.clamp(0, (fabric.width - w) as i64),
        );
        if clamped_tl == tl {
            return Ok(false);
        }
        self.center_origin = clamped_tl + self.relative_center();
        Ok(true)
    }

    pub fn fits_in(&self, fabric: &Fabric) -> bool {
        fabric.rect().contains(&self.bbox())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_piece(width: usize, height: usize, center: Point) -> PatternPiece {
        let shape = PieceShape::new(0, PieceSource::from_mask(BitMask::filled(width, height).unwrap())).unwrap();
        PatternPiece::new(Arc::new(shape), center, Orientation::R0)
    }

    #[test]
    fn default_center_and_surface() {
        let mask = BitMask::from_rows(&["###..", "#####", "..###"]).unwrap();
        let shape = PieceShape::new(3, PieceSource::from_mask(mask)).unwrap();
        assert_eq!(shape.meta.center, Point::new(1, 2));
        assert_eq!(shape.meta.surface, 11);
        assert_eq!(shape.meta.resolution, DEFAULT_RESOLUTION);
    }

    #[test]
    fn relative_center_follows_rotation() {
        // 4 wide, 2 high, center (1, 2)
        let mut piece = rect_piece(4, 2, Point::new(5, 5));
        assert_eq!(piece.relative_center(), Point::new(1, 2));
        piece.orientation = Orientation::R90;
        assert_eq!(piece.relative_center(), Point::new(1, 1));
        piece.orientation = Orientation::R180;
        assert_eq!(piece.relative_center(), Point::new(0, 1));
        piece.orientation = Orientation::R270;
        assert_eq!(piece.relative_center(), Point::new(2, 0));
    }

    #[test]
    fn top_left_is_center_minus_relative_center() {
        let piece = rect_piece(5, 3, Point::new(1, 2));
        assert_eq!(piece.top_left(), Point::new(0, 0));
        assert_eq!(piece.bbox(), Rect::try_new(0, 0, 3, 5).unwrap());
        assert!(piece.covers(2, 4));
        assert!(!piece.covers(3, 4));
    }

    #[test]
    fn clamping_moves_piece_inside() {
        let fabric = Fabric::new(10, 10).unwrap();
        let mut piece = rect_piece(3, 3, Point::new(-4, 12));
        assert!(piece.clamp_into(&fabric).unwrap());
        assert_eq!(piece.center_origin, Point::new(1, 8));
        assert!(piece.fits_in(&fabric));
        assert!(!piece.clamp_into(&fabric).unwrap());
    }

    #[test]
    fn clamping_a_piece_larger_than_the_fabric_fails() {
        let fabric = Fabric::new(4, 10).unwrap();
        let mut piece = rect_piece(5, 2, Point::new(1, 2));
        assert!(piece.clamp_into(&fabric).is_err());
    }

    #[test]
    fn clones_share_the_shape() {
        let piece = rect_piece(2, 2, Point::new(1, 1));
        let mut clone = piece.clone();
        clone.center_origin = Point::new(4, 4);
        assert!(Arc::ptr_eq(&piece.shape, &clone.shape));
        assert_eq!(piece.center_origin, Point::new(1, 1));
    }
}
