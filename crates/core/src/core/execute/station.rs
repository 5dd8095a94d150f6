//! Reservation stations.
//!
//! A reservation station holds renamed operations waiting for their source
//! operands. Each slot pairs the waiting operation with the ROB index that
//! will receive its result; an operand either carries its captured value or a
//! [`RobTag`] naming the in-flight producer. An entry is ready to dispatch
//! once neither operand is waiting on a tag.
//!
//! [`RobTag`]: crate::core::execute::rob::RobTag

use crate::common::{Address, RegisterValue};
use crate::core::execute::rob::RobTag;

/// A renamed operation waiting in a reservation station.
#[derive(Clone, Debug, Default)]
pub struct RsEntry {
    /// Major opcode.
    pub opcode: u32,
    /// funct3 field.
    pub funct3: u32,
    /// funct7 field.
    pub funct7: u32,
    /// Destination register index.
    pub rd: usize,
    /// Captured value of operand 1.
    pub vj: RegisterValue,
    /// Captured value of operand 2.
    pub vk: RegisterValue,
    /// Producer of operand 1, if the value is still in flight.
    pub qj: Option<RobTag>,
    /// Producer of operand 2, if the value is still in flight.
    pub qk: Option<RobTag>,
    /// Sign-extended immediate.
    pub imm: i32,
    /// Address the instruction was fetched from.
    pub pc: Address,
}

impl RsEntry {
    /// An entry is ready when both operands hold final values.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.qj.is_none() && self.qk.is_none()
    }
}

/// An occupied reservation-station slot.
#[derive(Clone, Debug)]
struct Slot {
    entry: RsEntry,
    rob_index: usize,
}

/// Fixed-capacity pool of reservation-station slots.
pub struct ReservationStation {
    slots: Vec<Option<Slot>>,
}

impl ReservationStation {
    /// Creates a pool with the given number of slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Frees every slot.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }

    /// Returns true if no slot is free.
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }

    /// Places an entry in the first free slot.
    ///
    /// Returns false when the pool is full.
    pub fn add_entry(&mut self, entry: RsEntry, rob_index: usize) -> bool {
        for slot in &mut self.slots {
            if slot.is_none() {
                *slot = Some(Slot { entry, rob_index });
                return true;
            }
        }
        false
    }

    /// Frees the slot associated with `rob_index`.
    ///
    /// Returns false if no slot matched.
    pub fn remove_entry(&mut self, rob_index: usize) -> bool {
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|s| s.rob_index == rob_index) {
                *slot = None;
                return true;
            }
        }
        false
    }

    /// Returns snapshots of every occupied, ready slot with its ROB index.
    pub fn ready_entries(&self) -> Vec<(RsEntry, usize)> {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.entry.is_ready())
            .map(|s| (s.entry.clone(), s.rob_index))
            .collect()
    }

    /// Applies a result broadcast: every operand waiting on `tag` captures
    /// `value` and stops waiting.
    pub fn update_waiting_entries(&mut self, tag: RobTag, value: RegisterValue) {
        for slot in self.slots.iter_mut().flatten() {
            if slot.entry.qj == Some(tag) {
                slot.entry.vj = value;
                slot.entry.qj = None;
            }
            if slot.entry.qk == Some(tag) {
                slot.entry.vk = value;
                slot.entry.qk = None;
            }
        }
    }
}
