//! Static domain decomposition into contiguous per-worker chunks.

use crate::error::RunError;

/// A contiguous `[start, start + len)` slice of the domain owned by one
/// worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Chunk {
    /// Offset of the first cell.
    pub start: usize,
    /// Number of cells. May be zero when there are more workers than cells.
    pub len: usize,
}

impl Chunk {
    /// One past the last cell.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Whether the chunk owns no cells.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Ordered chunk descriptors, one per worker, covering `[0, cells)`
/// exactly.
///
/// Every chunk but the tail has `ceil(cells / workers)` cells; the tail is
/// truncated to whatever remains, which can leave trailing workers with
/// zero-length chunks.
///
/// # Examples
///
/// ```
/// use halo_core::Partition;
///
/// let p = Partition::new(10, 3).unwrap();
/// let lens: Vec<usize> = p.chunks().iter().map(|c| c.len).collect();
/// assert_eq!(lens, vec![4, 4, 2]);
///
/// // More workers than cells: the tail is empty.
/// let p = Partition::new(3, 4).unwrap();
/// let lens: Vec<usize> = p.chunks().iter().map(|c| c.len).collect();
/// assert_eq!(lens, vec![1, 1, 1, 0]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    cells: usize,
    chunks: Vec<Chunk>,
}

impl Partition {
    /// Split `cells` cells across `workers` workers.
    ///
    /// Returns `Err(RunError::InsufficientWorkers)` if `workers == 0` and
    /// `Err(RunError::InvalidConfig)` if `cells == 0`.
    pub fn new(cells: usize, workers: usize) -> Result<Self, RunError> {
        if workers == 0 {
            return Err(RunError::InsufficientWorkers { ranks: 1 });
        }
        if cells == 0 {
            return Err(RunError::invalid_config("domain must have at least one cell"));
        }
        let chunk = cells.div_ceil(workers);
        let mut chunks = Vec::with_capacity(workers);
        let mut start = 0;
        for _ in 0..workers {
            let len = chunk.min(cells - start);
            chunks.push(Chunk { start, len });
            start += len;
        }
        debug_assert_eq!(start, cells);
        Ok(Self { cells, chunks })
    }

    /// Split `cells` across every rank but the coordinator (`ranks - 1`
    /// workers).
    ///
    /// Returns `Err(RunError::InsufficientWorkers)` if `ranks < 2`.
    pub fn for_ranks(cells: usize, ranks: usize) -> Result<Self, RunError> {
        if ranks < 2 {
            return Err(RunError::InsufficientWorkers { ranks });
        }
        Self::new(cells, ranks - 1)
    }

    /// Total number of cells covered.
    pub fn cell_count(&self) -> usize {
        self.cells
    }

    /// Number of workers (= number of chunks).
    pub fn worker_count(&self) -> usize {
        self.chunks.len()
    }

    /// All chunk descriptors in worker order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Descriptor of worker `index` (0-based, i.e. rank - 1).
    pub fn chunk(&self, index: usize) -> Option<Chunk> {
        self.chunks.get(index).copied()
    }

    /// Number of zero-length chunks.
    pub fn empty_chunks(&self) -> usize {
        self.chunks.iter().filter(|c| c.is_empty()).count()
    }
}
