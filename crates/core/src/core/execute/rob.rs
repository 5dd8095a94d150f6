//! Reorder buffer.
//!
//! The ROB is a fixed-size circular buffer tracking every in-flight
//! instruction from issue through commit. It provides:
//! 1. **Allocation:** Hands out ring slots at the tail in program order.
//! 2. **Completion:** Marks slots as done when their result is available and
//!    remembers which slots completed this cycle (one-shot flags) so the
//!    broadcast can visit each result exactly once.
//! 3. **In-order commit:** The head retires only when completed; the head
//!    index only advances on commit, the tail only on issue.

use crate::common::{Address, RegisterValue};

/// Tag naming the ROB slot that will produce a value.
///
/// Reservation-station operands waiting on an in-flight producer carry this
/// tag; a missing tag means the operand value is already captured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RobTag(pub usize);

/// A single reorder-buffer entry.
#[derive(Clone, Debug, Default)]
pub struct RobEntry {
    /// Whether the slot is occupied.
    pub busy: bool,
    /// Destination register index (ignored at commit for stores).
    pub dest: usize,
    /// Computed result value.
    pub value: RegisterValue,
    /// Whether execution has finished for this entry.
    pub completed: bool,
    /// Whether the instruction is a store (memory write deferred to commit).
    pub is_store: bool,
    /// Effective address recorded for a store.
    pub mem_addr: Address,
    /// Data recorded for a store.
    pub mem_data: RegisterValue,
    /// Address the instruction was fetched from.
    pub pc: Address,
    /// funct3 field; selects the store width at commit.
    pub funct3: u32,
    /// Major opcode; used to attribute retirement statistics.
    pub opcode: u32,
    /// Resolved direction for a branch entry.
    pub branch_taken: bool,
    /// Resolved target for a branch entry.
    pub branch_target: Address,
}

/// Reorder buffer: circular queue enabling in-order commit despite
/// out-of-order completion.
pub struct ReorderBuffer {
    entries: Vec<RobEntry>,
    newly_completed: Vec<bool>,
    head: usize,
    tail: usize,
    count: usize,
}

impl ReorderBuffer {
    /// Creates a ROB with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![RobEntry::default(); capacity],
            newly_completed: vec![false; capacity],
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Clears all entries and resets the ring pointers.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.busy = false;
        }
        for flag in &mut self.newly_completed {
            *flag = false;
        }
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    /// Returns the ROB capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no slots are occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if every slot is occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.entries.len()
    }

    /// Allocates the tail slot. Returns `None` when the ROB is full.
    ///
    /// The slot is marked busy with its completion state cleared; the caller
    /// fills in the instruction fields with [`update_entry`].
    ///
    /// [`update_entry`]: ReorderBuffer::update_entry
    pub fn allocate_entry(&mut self) -> Option<usize> {
        if self.is_full() {
            return None;
        }

        let index = self.tail;
        self.tail = (self.tail + 1) % self.entries.len();
        self.count += 1;

        self.entries[index].busy = true;
        self.entries[index].completed = false;
        self.newly_completed[index] = false;

        Some(index)
    }

    /// Replaces the entry at `index`.
    pub fn update_entry(&mut self, index: usize, entry: RobEntry) {
        if index < self.entries.len() {
            self.entries[index] = entry;
        }
    }

    /// Records a store's effective address and data and marks it completed.
    ///
    /// The memory write itself is deferred until the entry reaches the head.
    pub fn update_store_entry(&mut self, index: usize, addr: Address, data: RegisterValue) {
        if index >= self.entries.len() {
            return;
        }
        self.entries[index].mem_addr = addr;
        self.entries[index].mem_data = data;
        self.entries[index].completed = true;
        self.newly_completed[index] = true;
    }

    /// Marks the entry at `index` completed with its result value.
    pub fn complete_entry(&mut self, index: usize, value: RegisterValue) {
        if index >= self.entries.len() {
            return;
        }
        self.entries[index].value = value;
        self.entries[index].completed = true;
        self.newly_completed[index] = true;
    }

    /// Marks a branch entry completed, recording its resolved outcome.
    pub fn complete_branch_entry(
        &mut self,
        index: usize,
        value: RegisterValue,
        taken: bool,
        target: Address,
    ) {
        if index >= self.entries.len() {
            return;
        }
        self.entries[index].value = value;
        self.entries[index].branch_taken = taken;
        self.entries[index].branch_target = target;
        self.entries[index].completed = true;
        self.newly_completed[index] = true;
    }

    /// Returns true if the entry at `index` is occupied and completed.
    pub fn is_entry_completed(&self, index: usize) -> bool {
        index < self.entries.len() && self.entries[index].busy && self.entries[index].completed
    }

    /// Returns the value of the entry at `index` (0 when out of range).
    pub fn entry_value(&self, index: usize) -> RegisterValue {
        if index < self.entries.len() {
            self.entries[index].value
        } else {
            0
        }
    }

    /// Returns true if the head entry exists and is completed.
    pub fn is_head_completed(&self) -> bool {
        !self.is_empty() && self.entries[self.head].completed
    }

    /// Returns the current head index.
    pub fn head_index(&self) -> usize {
        self.head
    }

    /// Returns the head entry, if the ROB is non-empty.
    pub fn head_entry(&self) -> Option<&RobEntry> {
        if self.is_empty() {
            None
        } else {
            Some(&self.entries[self.head])
        }
    }

    /// Frees the head slot and advances the head pointer.
    pub fn remove_head(&mut self) {
        if self.is_empty() {
            return;
        }
        self.entries[self.head].busy = false;
        self.newly_completed[self.head] = false;
        self.head = (self.head + 1) % self.entries.len();
        self.count -= 1;
    }

    /// Drains the one-shot completion flags.
    ///
    /// Returns `(index, value)` for every occupied entry that completed since
    /// the last drain, clearing each flag so a result is broadcast once.
    pub fn take_newly_completed(&mut self) -> Vec<(usize, RegisterValue)> {
        let mut completed = Vec::new();
        for i in 0..self.entries.len() {
            if self.entries[i].busy && self.newly_completed[i] {
                completed.push((i, self.entries[i].value));
                self.newly_completed[i] = false;
            }
        }
        completed
    }
}
