//! Monotonic task id allocation.

use tasktrack_core::TaskId;

/// Hands out task ids that never repeat within a process.
///
/// Seeded past the highest id already stored, so loaded tasks are never shadowed.
/// Once an id of `u64::MAX` has been handed out or observed the allocator is
/// exhausted and returns `None`.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: Option<TaskId>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            next: Some(TaskId(1)),
        }
    }
}

impl IdAllocator {
    /// Allocator whose first id follows `max`.
    #[must_use]
    pub fn starting_after(max: Option<TaskId>) -> Self {
        max.map_or_else(Self::default, |id| Self { next: id.next() })
    }

    /// Take the next id, or `None` when the id space is used up.
    pub const fn allocate(&mut self) -> Option<TaskId> {
        let Some(id) = self.next else {
            return None;
        };
        self.next = id.next();
        Some(id)
    }

    /// Record an id chosen elsewhere so it is never handed out again.
    pub fn observe(&mut self, id: TaskId) {
        if self.next.is_some_and(|next| id >= next) {
            self.next = id.next();
        }
    }

    /// Id that [`allocate`](Self::allocate) would return next.
    #[must_use]
    pub const fn peek(&self) -> Option<TaskId> {
        self.next
    }
}
