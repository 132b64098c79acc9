//! # Pool
//!
//! An ordered collection of chromosomes with aggregate statistics.
//!
//! A pool distinguishes its live `len()` from its slot `capacity()`. Slots
//! grow in chunks of [`POOL_GROWTH`] and slots past `len()` may still hold a
//! chromosome that the next copying append reuses. All operations address
//! slots by index; `insert` overwrites the occupant of a slot rather than
//! shifting the rest of the pool.
//!
//! Statistics are only valid right after [`Pool::stats`]. Any change to the
//! membership clears the `sorted` flag and leaves the stats stale until they
//! are recomputed.
//!
//! ## Example
//!
//! ```rust
//! use genpool::chromosome::Chromosome;
//! use genpool::pool::Pool;
//!
//! let mut pool = Pool::with_capacity(4);
//! pool.set_minimize(false);
//! for f in [10.0, 20.0, 30.0, 40.0] {
//!     let mut c = Chromosome::new(3).unwrap();
//!     c.set_fitness(f);
//!     pool.append(c);
//! }
//!
//! let stats = pool.stats().unwrap();
//! assert_eq!(stats.best_index, Some(3));
//! assert!((stats.var - 166.666_666).abs() < 1e-3);
//! ```

mod generate;
mod io;
mod stats;

pub use stats::PoolStats;

use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};

/// Number of slots added whenever a pool runs out of room.
pub const POOL_GROWTH: usize = 10;

#[derive(Debug, Clone)]
pub struct Pool {
    slots: Vec<Option<Chromosome>>,
    size: usize,
    stats: PoolStats,
    minimize: bool,
    sorted: bool,
}

impl Pool {
    /// Creates an empty pool with `capacity` empty slots. Minimizes by default.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self {
            slots,
            size: 0,
            stats: PoolStats::default(),
            minimize: true,
            sorted: false,
        }
    }

    /// Builds a pool owning `chromosomes`, in order.
    pub fn from_chromosomes(chromosomes: Vec<Chromosome>) -> Self {
        let size = chromosomes.len();
        Self {
            slots: chromosomes.into_iter().map(Some).collect(),
            size,
            stats: PoolStats::default(),
            minimize: true,
            sorted: false,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn minimize(&self) -> bool {
        self.minimize
    }

    pub fn set_minimize(&mut self, minimize: bool) {
        self.minimize = minimize;
    }

    /// True only right after [`Pool::sort`] with no membership change since.
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Statistics as of the last [`Pool::stats`] call.
    pub fn last_stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Changes the slot count. Chromosomes in dropped slots are freed and the
    /// live size is clamped to the new capacity.
    pub fn resize(&mut self, capacity: usize) {
        if capacity < self.slots.len() {
            self.slots.truncate(capacity);
        } else {
            self.slots.resize_with(capacity, || None);
        }
        self.size = self.size.min(capacity);
        self.sorted = false;
    }

    fn ensure_slot(&mut self, index: usize) {
        if index >= self.slots.len() {
            let mut capacity = self.slots.len();
            while capacity <= index {
                capacity += POOL_GROWTH;
            }
            self.slots.resize_with(capacity, || None);
        }
    }

    /// Live member at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Chromosome> {
        if index < self.size {
            self.slots[index].as_ref()
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Chromosome> {
        if index < self.size {
            self.sorted = false;
            self.slots[index].as_mut()
        } else {
            None
        }
    }

    /// Like [`Pool::get`], but an empty or out-of-range slot is an error.
    pub fn chromosome(&self, index: usize) -> Result<&Chromosome> {
        if index >= self.size {
            return Err(GeneticError::IndexOutOfBounds {
                name: "pool index",
                index,
                length: self.size,
            });
        }
        self.slots[index]
            .as_ref()
            .ok_or_else(|| GeneticError::InvalidState(format!("pool slot {} is empty", index)))
    }

    /// Iterates over the live members, skipping empty slots.
    pub fn iter(&self) -> impl Iterator<Item = &Chromosome> {
        self.slots[..self.size].iter().flatten()
    }

    /// Takes ownership of `chrom` and places it after the last live member.
    pub fn append(&mut self, chrom: Chromosome) {
        let index = self.size;
        self.insert(index, chrom);
        self.size += 1;
    }

    /// Deep-copies `chrom` after the last live member, reusing a spare
    /// chromosome in that slot if there is one.
    pub fn append_copy(&mut self, chrom: &Chromosome) {
        let index = self.size;
        self.insert_copy(index, chrom);
        self.size += 1;
    }

    /// Places `chrom` into slot `index`, releasing its previous occupant.
    ///
    /// `index` may equal `capacity()`, in which case the pool grows.
    pub fn insert(&mut self, index: usize, chrom: Chromosome) {
        self.ensure_slot(index);
        self.slots[index] = Some(chrom);
        self.sorted = false;
    }

    /// Copies `chrom` into slot `index`, reusing the occupant's storage.
    pub fn insert_copy(&mut self, index: usize, chrom: &Chromosome) {
        self.ensure_slot(index);
        match self.slots[index].as_mut() {
            Some(existing) => existing.copy_from(chrom),
            None => self.slots[index] = Some(chrom.clone()),
        }
        self.sorted = false;
    }

    /// Empties slot `index` and returns what it held. The live size is not
    /// changed, so a later [`Pool::stats`] fails until the slot is refilled.
    pub fn remove(&mut self, index: usize) -> Option<Chromosome> {
        self.sorted = false;
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Moves the chromosome in `src` to `dst`, freeing whatever `dst` held.
    pub fn move_slot(&mut self, src: usize, dst: usize) -> Result<()> {
        self.check_slot(src)?;
        self.check_slot(dst)?;
        if src != dst {
            self.slots[dst] = self.slots[src].take();
            self.sorted = false;
        }
        Ok(())
    }

    /// Exchanges two slots without copying gene data.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_slot(i)?;
        self.check_slot(j)?;
        self.slots.swap(i, j);
        self.sorted = false;
        Ok(())
    }

    fn check_slot(&self, index: usize) -> Result<()> {
        if index >= self.slots.len() {
            return Err(GeneticError::IndexOutOfBounds {
                name: "pool slot",
                index,
                length: self.slots.len(),
            });
        }
        Ok(())
    }

    /// Drops the live members. Spare slots keep their chromosomes for reuse.
    pub fn clear(&mut self) {
        self.size = 0;
        self.sorted = false;
    }

    /// Frees every chromosome and zeroes the stats.
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.size = 0;
        self.stats = PoolStats::default();
        self.sorted = false;
    }

    /// Orders the live members best first and reindexes them.
    pub fn sort(&mut self) -> Result<()> {
        self.check_live()?;
        let minimize = self.minimize;
        self.slots[..self.size].sort_by(|a, b| match (a, b) {
            (Some(a), Some(b)) => a.compare(b, minimize),
            _ => std::cmp::Ordering::Equal,
        });
        for (i, slot) in self.slots[..self.size].iter_mut().enumerate() {
            if let Some(c) = slot.as_mut() {
                c.set_index(Some(i));
            }
        }
        self.sorted = true;
        Ok(())
    }

    fn check_live(&self) -> Result<()> {
        match self.slots[..self.size].iter().position(Option::is_none) {
            Some(i) => Err(GeneticError::InvalidState(format!(
                "pool slot {} of {} live members is empty",
                i, self.size
            ))),
            None => Ok(()),
        }
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::with_capacity(POOL_GROWTH)
    }
}
