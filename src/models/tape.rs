// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Filmstrip ("tape") of frame slots.
//!
//! Each [`Slot`] stands for one frame in the [`FrameStore`], in the same
//! order. Slot counters are 1-based and double as the lookup key into the
//! store (`counter - 1` is the frame index), so any structural change to
//! the store must be followed by [`Tape::rebuild`] or
//! [`Tape::remove_unchecked`] to keep the two aligned.
//!
//! Changes are reported as [`TapeEvent`]s which the host drains with
//! [`Tape::take_events`].

use super::frame_store::FrameStore;
use std::collections::BTreeSet;

/// Margin around the tape contents and spacing between slots.
pub const TAPE_SPACING: f32 = 5.0;

/// Notification emitted by the tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapeEvent {
    /// The current slot changed; `0` means no slot is current.
    CurrentChanged(usize),
    /// A slot's checked flag flipped.
    CheckStateChanged { counter: usize, checked: bool },
}

/// One filmstrip entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    counter: usize,
    checked: bool,
    current: bool,
}

impl Slot {
    fn new(counter: usize) -> Self {
        Self {
            counter,
            checked: true,
            current: false,
        }
    }

    /// 1-based display counter ("#N").
    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn is_current(&self) -> bool {
        self.current
    }

    /// Index of the frame this slot shows.
    pub fn frame_index(&self) -> usize {
        self.counter - 1
    }

    /// Display label.
    pub fn label(&self) -> String {
        format!("#{}", self.counter)
    }
}

/// Ordered slots plus the current-slot pointer.
#[derive(Debug, Default)]
pub struct Tape {
    slots: Vec<Slot>,
    /// 0-based position of the current slot.
    current: Option<usize>,
    events: Vec<TapeEvent>,
}

impl Tape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Slot at 1-based position `counter`.
    pub fn slot(&self, counter: usize) -> Option<&Slot> {
        counter.checked_sub(1).and_then(|i| self.slots.get(i))
    }

    /// 1-based position of the current slot.
    pub fn current(&self) -> Option<usize> {
        self.current.map(|i| i + 1)
    }

    /// Drain pending notifications.
    pub fn take_events(&mut self) -> Vec<TapeEvent> {
        std::mem::take(&mut self.events)
    }

    fn in_range(&self, counter: usize) -> bool {
        counter >= 1 && counter <= self.slots.len()
    }

    /// Create one checked slot per stored frame, with no current slot.
    pub fn initialize(&mut self, store: &FrameStore) {
        if self.current.is_some() {
            self.current = None;
            self.events.push(TapeEvent::CurrentChanged(0));
        }

        self.slots = (1..=store.len()).map(Slot::new).collect();
        log::debug!("Tape initialized with {} slots", self.slots.len());
    }

    /// Re-create all slots after the store's frames were replaced,
    /// keeping check state per index and the current slot.
    pub fn rebuild(&mut self, store: &FrameStore) {
        let checked: Vec<bool> = self.slots.iter().map(|s| s.checked).collect();
        let current = self.current();

        self.slots = (1..=store.len()).map(Slot::new).collect();
        self.current = None;

        for (slot, was_checked) in self.slots.iter_mut().zip(checked) {
            slot.checked = was_checked;
        }

        match current {
            Some(counter) if self.in_range(counter) => self.set_current(counter),
            _ => self.set_current(1),
        }

        log::debug!("Tape rebuilt with {} slots", self.slots.len());
    }

    /// Make slot `counter` current. Out of range clears the current slot.
    pub fn set_current(&mut self, counter: usize) {
        if let Some(old) = self.current.take() {
            self.slots[old].current = false;
        }

        if self.in_range(counter) {
            self.slots[counter - 1].current = true;
            self.current = Some(counter - 1);
            self.events.push(TapeEvent::CurrentChanged(counter));
        } else {
            self.events.push(TapeEvent::CurrentChanged(0));
        }
    }

    /// Set the checked flag of slot `counter`.
    pub fn set_checked(&mut self, counter: usize, checked: bool) {
        if !self.in_range(counter) {
            debug_assert!(false, "slot {} out of range 1..={}", counter, self.slots.len());
            log::warn!("Ignoring check of missing slot {}", counter);
            return;
        }

        let slot = &mut self.slots[counter - 1];
        if slot.checked != checked {
            slot.checked = checked;
            self.events.push(TapeEvent::CheckStateChanged {
                counter: slot.counter,
                checked,
            });
        }
    }

    /// Set the checked flag of every slot from `counter` to the end.
    pub fn check_till_end(&mut self, counter: usize, on: bool) {
        for position in counter.max(1)..=self.slots.len() {
            self.set_checked(position, on);
        }
    }

    /// Remove the slot at 1-based position `counter`.
    ///
    /// If it was current, the previous slot becomes current, else the next
    /// one, else none. Remaining counters are not renumbered.
    pub fn remove(&mut self, counter: usize) {
        if !self.in_range(counter) {
            debug_assert!(false, "slot {} out of range 1..={}", counter, self.slots.len());
            log::warn!("Ignoring removal of missing slot {}", counter);
            return;
        }

        let index = counter - 1;
        self.slots.remove(index);

        self.current = match self.current {
            Some(c) if c == index => {
                if index > 0 {
                    Some(index - 1)
                } else if !self.slots.is_empty() {
                    Some(0)
                } else {
                    None
                }
            }
            Some(c) if c > index => Some(c - 1),
            other => other,
        };

        if let Some(c) = self.current {
            self.slots[c].current = true;
        }

        self.events
            .push(TapeEvent::CurrentChanged(self.current().unwrap_or(0)));
    }

    /// Remove every unchecked slot and renumber the survivors 1..N.
    ///
    /// Returns the number of removed slots.
    pub fn remove_unchecked(&mut self) -> usize {
        let total = self.slots.len();
        let mut removed = 0;

        for position in 1..=total {
            let at = position - removed;
            if self.slots[at - 1].checked {
                self.slots[at - 1].counter = at;
            } else {
                self.remove(at);
                removed += 1;
            }
        }

        if removed > 0 {
            log::info!("Removed {} unchecked slots, {} remain", removed, self.slots.len());
        }

        removed
    }

    /// Remove all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.current = None;
        self.events.push(TapeEvent::CurrentChanged(0));
    }

    /// 0-based frame indices of the checked slots.
    pub fn checked_indices(&self) -> BTreeSet<usize> {
        self.slots
            .iter()
            .filter(|s| s.checked)
            .map(Slot::frame_index)
            .collect()
    }

    /// X coordinate of the left border of slot `counter`, for slots of
    /// uniform width.
    pub fn x_of_slot(&self, counter: usize, slot_width: f32) -> Option<f32> {
        if !self.in_range(counter) {
            return None;
        }
        let before = (counter - 1) as f32;
        Some(TAPE_SPACING + before * (slot_width + TAPE_SPACING))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::frame_store::Frame;
    use image::RgbaImage;

    fn store_with(count: usize) -> FrameStore {
        let mut store = FrameStore::new();
        store.load(
            (0..count)
                .map(|_| Frame::new(RgbaImage::new(4, 4), 100))
                .collect(),
        );
        store
    }

    fn tape_with(count: usize) -> Tape {
        let mut tape = Tape::new();
        tape.initialize(&store_with(count));
        tape
    }

    fn counters(tape: &Tape) -> Vec<usize> {
        tape.slots().iter().map(Slot::counter).collect()
    }

    #[test]
    fn test_initialize_defaults() {
        let tape = tape_with(4);
        assert_eq!(counters(&tape), vec![1, 2, 3, 4]);
        assert!(tape.slots().iter().all(|s| s.is_checked() && !s.is_current()));
        assert_eq!(tape.current(), None);
        assert_eq!(tape.slot(2).map(Slot::label), Some("#2".to_string()));
    }

    #[test]
    fn test_set_current_in_and_out_of_range() {
        let mut tape = tape_with(3);
        tape.set_current(2);
        assert_eq!(tape.current(), Some(2));
        assert!(tape.slot(2).unwrap().is_current());

        tape.set_current(3);
        assert!(!tape.slot(2).unwrap().is_current());
        assert!(tape.slot(3).unwrap().is_current());

        tape.set_current(7);
        assert_eq!(tape.current(), None);
        assert!(tape.slots().iter().all(|s| !s.is_current()));

        assert_eq!(
            tape.take_events(),
            vec![
                TapeEvent::CurrentChanged(2),
                TapeEvent::CurrentChanged(3),
                TapeEvent::CurrentChanged(0),
            ]
        );
    }

    #[test]
    fn test_remove_current_moves_to_previous() {
        let mut tape = tape_with(5);
        tape.set_current(3);
        tape.take_events();

        tape.remove(3);

        assert_eq!(tape.current(), Some(2));
        assert_eq!(tape.take_events(), vec![TapeEvent::CurrentChanged(2)]);
        // No renumbering on a plain remove.
        assert_eq!(counters(&tape), vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_remove_first_current_moves_to_next() {
        let mut tape = tape_with(3);
        tape.set_current(1);
        tape.take_events();

        tape.remove(1);
        assert_eq!(tape.current(), Some(1));
        assert_eq!(tape.slot(1).unwrap().counter(), 2);
        assert!(tape.slot(1).unwrap().is_current());
        assert_eq!(tape.take_events(), vec![TapeEvent::CurrentChanged(1)]);
    }

    #[test]
    fn test_remove_last_remaining_clears_current() {
        let mut tape = tape_with(1);
        tape.set_current(1);
        tape.take_events();

        tape.remove(1);
        assert!(tape.is_empty());
        assert_eq!(tape.current(), None);
        assert_eq!(tape.take_events(), vec![TapeEvent::CurrentChanged(0)]);
    }

    #[test]
    fn test_remove_before_current_shifts_position() {
        let mut tape = tape_with(5);
        tape.set_current(4);
        tape.take_events();

        tape.remove(2);
        assert_eq!(tape.current(), Some(3));
        assert_eq!(tape.slot(3).unwrap().counter(), 4);
        assert_eq!(tape.take_events(), vec![TapeEvent::CurrentChanged(3)]);
    }

    #[test]
    fn test_check_till_end() {
        let mut tape = tape_with(5);
        tape.check_till_end(3, false);

        let checked: Vec<bool> = tape.slots().iter().map(Slot::is_checked).collect();
        assert_eq!(checked, vec![true, true, false, false, false]);
        assert_eq!(tape.take_events().len(), 3);

        // Only flips are reported.
        tape.check_till_end(4, false);
        assert!(tape.take_events().is_empty());
    }

    #[test]
    fn test_set_checked_emits_on_flip() {
        let mut tape = tape_with(2);
        tape.set_checked(2, false);
        tape.set_checked(2, false);
        assert_eq!(
            tape.take_events(),
            vec![TapeEvent::CheckStateChanged {
                counter: 2,
                checked: false
            }]
        );
    }

    #[test]
    fn test_remove_unchecked_renumbers() {
        let mut tape = tape_with(6);
        tape.set_current(2);
        tape.set_checked(2, false);
        tape.set_checked(5, false);
        tape.take_events();

        let removed = tape.remove_unchecked();

        assert_eq!(removed, 2);
        assert_eq!(counters(&tape), vec![1, 2, 3, 4]);
        assert!(tape.slots().iter().all(Slot::is_checked));
        assert_eq!(tape.current(), Some(1));
        assert_eq!(tape.checked_indices(), (0..4).collect());
    }

    #[test]
    fn test_remove_unchecked_is_idempotent() {
        let mut tape = tape_with(5);
        tape.set_checked(1, false);
        tape.set_checked(4, false);
        tape.remove_unchecked();
        tape.take_events();
        let before = counters(&tape);

        assert_eq!(tape.remove_unchecked(), 0);
        assert_eq!(counters(&tape), before);
        assert!(tape.take_events().is_empty());
    }

    #[test]
    fn test_clear_resets_current() {
        let mut tape = tape_with(3);
        tape.set_current(2);
        tape.take_events();

        tape.clear();
        assert!(tape.is_empty());
        assert_eq!(tape.current(), None);
        assert_eq!(tape.take_events(), vec![TapeEvent::CurrentChanged(0)]);
    }

    #[test]
    fn test_rebuild_keeps_check_state_and_current() {
        let store = store_with(4);
        let mut tape = Tape::new();
        tape.initialize(&store);
        tape.set_current(3);
        tape.set_checked(2, false);
        tape.take_events();

        tape.rebuild(&store);

        let checked: Vec<bool> = tape.slots().iter().map(Slot::is_checked).collect();
        assert_eq!(checked, vec![true, false, true, true]);
        assert_eq!(tape.current(), Some(3));
        assert_eq!(tape.take_events(), vec![TapeEvent::CurrentChanged(3)]);
    }

    #[test]
    fn test_x_of_slot() {
        let tape = tape_with(3);
        assert_eq!(tape.x_of_slot(1, 100.0), Some(5.0));
        assert_eq!(tape.x_of_slot(3, 100.0), Some(215.0));
        assert_eq!(tape.x_of_slot(4, 100.0), None);
    }

    #[test]
    fn test_retain_then_renumber_is_contiguous() {
        let mut store = store_with(7);
        let mut tape = Tape::new();
        tape.initialize(&store);
        for counter in [1, 3, 6] {
            tape.set_checked(counter, false);
        }

        store.retain(&tape.checked_indices());
        tape.remove_unchecked();

        assert_eq!(store.len(), tape.count());
        assert_eq!(counters(&tape), (1..=store.len()).collect::<Vec<_>>());
    }
}
