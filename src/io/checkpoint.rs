//! Checkpoint sink abstraction.

use thiserror::Error;

use crate::solver::FieldArray;
use crate::types::CheckpointIndex;

/// Error type for checkpoint output.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// I/O error during file operations.
    #[error("checkpoint I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// State array does not cover the grid the sink was built for.
    #[error("checkpoint shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
}

/// Destination for snapshots of the primitive state.
pub trait CheckpointSink {
    /// Persist `q` as checkpoint `index` taken at time `t` with step `dt`.
    fn save(
        &mut self,
        q: &FieldArray,
        index: CheckpointIndex,
        t: f64,
        dt: f64,
    ) -> Result<(), CheckpointError>;
}

impl<C: CheckpointSink + ?Sized> CheckpointSink for &mut C {
    fn save(
        &mut self,
        q: &FieldArray,
        index: CheckpointIndex,
        t: f64,
        dt: f64,
    ) -> Result<(), CheckpointError> {
        (**self).save(q, index, t, dt)
    }
}

/// One saved snapshot.
#[derive(Clone, Debug)]
pub struct CheckpointRecord {
    pub index: CheckpointIndex,
    pub t: f64,
    pub dt: f64,
    pub snapshot: FieldArray,
}

/// In-memory sink.
#[derive(Clone, Debug, Default)]
pub struct MemoryCheckpoint {
    records: Vec<CheckpointRecord>,
}

impl MemoryCheckpoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[CheckpointRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&CheckpointRecord> {
        self.records.last()
    }
}

impl CheckpointSink for MemoryCheckpoint {
    fn save(
        &mut self,
        q: &FieldArray,
        index: CheckpointIndex,
        t: f64,
        dt: f64,
    ) -> Result<(), CheckpointError> {
        self.records.push(CheckpointRecord {
            index,
            t,
            dt,
            snapshot: q.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Grid;

    fn save_through<C: CheckpointSink>(mut sink: C, q: &FieldArray) {
        sink.save(q, CheckpointIndex::new(1), 0.5, 0.1).unwrap();
    }

    #[test]
    fn test_memory_checkpoint_records_in_order() {
        let grid = Grid::uniform(2, 2, 1, 0.0, 1.0, 0.0, 1.0);
        let q = FieldArray::new(&grid, 4);
        let mut sink = MemoryCheckpoint::new();
        assert!(sink.is_empty());

        sink.save(&q, CheckpointIndex::new(0), 0.0, 0.1).unwrap();
        save_through(&mut sink, &q);

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.records()[1].t, 0.5);
        assert_eq!(sink.records()[1].dt, 0.1);
        assert_eq!(sink.last().unwrap().index, CheckpointIndex::new(1));
    }
}
