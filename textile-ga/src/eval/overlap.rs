use crate::entities::PatternPiece;

/// Number of fabric pixels covered by both `a` and `b`.
///
/// Pieces whose rotated bounding boxes do not intersect are rejected without scanning.
/// Otherwise every pixel of the intersection of both boxes is mapped back into the
/// un-rotated mask of each piece and tested.
pub fn overlap(a: &PatternPiece, b: &PatternPiece) -> u64 {
    let Some(isect) = a.bbox().intersection(&b.bbox()) else {
        return 0;
    };

    let mut count = 0;
    for row in isect.row_min..isect.row_max {
        for col in isect.col_min..isect.col_max {
            if a.covers(row, col) && b.covers(row, col) {
                count += 1;
            }
        }
    }
    count
}
