use ndarray::Array2;

/// Symmetric cache of the pairwise overlap (in pixels) between the pieces of a gene.
/// A `None` cell is stale and has to be recomputed before it is used.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapMatrix {
    cells: Array2<Option<u64>>,
}

impl OverlapMatrix {
    /// Fully stale matrix for `n` pieces, the diagonal is always zero.
    pub fn new(n: usize) -> Self {
        let cells = Array2::from_shape_fn((n, n), |(i, j)| if i == j { Some(0) } else { None });
        OverlapMatrix { cells }
    }

    pub fn size(&self) -> usize {
        self.cells.nrows()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<u64> {
        self.cells[[i, j]]
    }

    /// Stores the overlap between pieces `i` and `j` in both mirrored cells
    pub fn set(&mut self, i: usize, j: usize, overlap: u64) {
        debug_assert!(i != j || overlap == 0);
        self.cells[[i, j]] = Some(overlap);
        self.cells[[j, i]] = Some(overlap);
    }

    /// Marks the row and column of piece `i` as stale
    pub fn invalidate(&mut self, i: usize) {
        for j in 0..self.size() {
            if j != i {
                self.cells[[i, j]] = None;
                self.cells[[j, i]] = None;
            }
        }
    }

    pub fn invalidate_all(&mut self) {
        *self = OverlapMatrix::new(self.size());
    }

    /// Number of stale pairs (each pair counted once)
    pub fn n_stale(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count() / 2
    }

    pub fn is_up_to_date(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Sum over all pairs, i.e. half the sum of the matrix.
    /// Stale cells are ignored.
    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum::<u64>() / 2
    }

    pub fn cells(&self) -> &Array2<Option<u64>> {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_matrix_is_stale_except_diagonal() {
        let m = OverlapMatrix::new(3);
        assert_eq!(m.n_stale(), 3);
        assert_eq!(m.get(1, 1), Some(0));
        assert_eq!(m.get(0, 2), None);
    }

    #[test]
    fn invalidation_only_touches_one_row_and_column() {
        let mut m = OverlapMatrix::new(3);
        m.set(0, 1, 4);
        m.set(0, 2, 2);
        m.set(1, 2, 6);
        assert!(m.is_up_to_date());
        assert_eq!(m.total(), 12);

        m.invalidate(2);
        assert_eq!(m.get(0, 1), Some(4));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(1, 2), None);
        assert_eq!(m.n_stale(), 2);
    }
}
