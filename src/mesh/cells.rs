/// Cell topology of an unstructured grid, stored the way the `<Cells>` section stores it
///
/// `offsets[i]` is the index one past the last node of cell `i` in `connectivity`, and `types`
/// holds the VTK cell type code of every cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cells {
    pub connectivity: Vec<usize>,
    pub offsets: Vec<usize>,
    pub types: Vec<u8>,
}

impl Cells {
    pub fn new(connectivity: Vec<usize>, offsets: Vec<usize>, types: Vec<u8>) -> Self {
        Self {
            connectivity,
            offsets,
            types,
        }
    }

    /// number of cells
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// append a single cell made of `nodes`
    pub fn push(&mut self, nodes: &[usize], cell_type: u8) {
        self.connectivity.extend_from_slice(nodes);
        self.offsets.push(self.connectivity.len());
        self.types.push(cell_type);
    }

    /// the node indices of every cell, in order
    pub fn iter(&self) -> CellIter<'_> {
        CellIter {
            cells: self,
            index: 0,
        }
    }

    /// append `other`, shifting its node indices by `point_offset`
    pub(crate) fn extend_shifted(&mut self, other: &Cells, point_offset: usize) {
        let connectivity_offset = self.connectivity.len();

        self.connectivity
            .extend(other.connectivity.iter().map(|node| node + point_offset));
        self.offsets
            .extend(other.offsets.iter().map(|end| end + connectivity_offset));
        self.types.extend_from_slice(&other.types);
    }
}

pub struct CellIter<'a> {
    cells: &'a Cells,
    index: usize,
}

impl<'a> Iterator for CellIter<'a> {
    type Item = &'a [usize];

    fn next(&mut self) -> Option<Self::Item> {
        let end = *self.cells.offsets.get(self.index)?;
        let start = match self.index {
            0 => 0,
            i => self.cells.offsets[i - 1],
        };
        self.index += 1;

        // a malformed offset list yields an empty cell rather than a panic
        Some(self.cells.connectivity.get(start..end).unwrap_or(&[]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellIter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterate_mixed_cells() {
        let mut cells = Cells::default();
        cells.push(&[0, 1, 2], 5);
        cells.push(&[1, 2, 3, 4], 9);

        let nodes: Vec<&[usize]> = cells.iter().collect();
        assert_eq!(nodes, vec![&[0, 1, 2][..], &[1, 2, 3, 4][..]]);
        assert_eq!(cells.offsets, vec![3, 7]);
        assert_eq!(cells.iter().len(), 2);
    }

    #[test]
    fn shifted_extension() {
        let mut first = Cells::new(vec![0, 1, 2], vec![3], vec![5]);
        let second = Cells::new(vec![0, 1, 2], vec![3], vec![5]);
        first.extend_shifted(&second, 3);

        assert_eq!(first.connectivity, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(first.offsets, vec![3, 6]);
        assert_eq!(first.types, vec![5, 5]);
    }
}
