use rand::seq::SliceRandom;
use rand::Rng;

use crate::settings::GridSize;

/// A Schulte table: the numbers `1..=size²` laid out row-major in random order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: GridSize,
    cells: Vec<u32>,
}

impl Board {
    /// Builds a fresh board with a uniform random permutation of `1..=size²`.
    pub fn generate<R: Rng + ?Sized>(size: GridSize, rng: &mut R) -> Self {
        let mut cells: Vec<u32> = (1..=size.cell_count()).collect();
        // Fisher-Yates
        cells.shuffle(rng);
        Self { size, cells }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Highest number on the board, which is also the final target
    pub fn last_number(&self) -> u32 {
        self.size.cell_count()
    }

    pub fn contains(&self, value: u32) -> bool {
        (1..=self.last_number()).contains(&value)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.size.get() as usize)
    }

    /// Row-major index of the cell holding `value`
    pub fn position_of(&self, value: u32) -> Option<usize> {
        self.cells.iter().position(|&v| v == value)
    }

    pub fn value_at(&self, index: usize) -> Option<u32> {
        self.cells.get(index).copied()
    }
}
