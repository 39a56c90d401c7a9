//! Backjumping --- revising the valuation to some prior decision level.

use crate::context::GenericContext;

impl<R: rand::Rng + std::default::Default> GenericContext<R> {
    /// Open a fresh decision level at the current point of the trail.
    pub(crate) fn push_level(&mut self) {
        self.level_starts.push(self.trail.len());
    }

    /// Pop levels until `target` is the current level, clearing the values made on the popped
    /// levels and returning their atoms to the activity heap.
    pub(crate) fn backjump(&mut self, target: u32) {
        while self.current_level() > target {
            let start = self
                .level_starts
                .pop()
                .expect("level starts match the current level");
            while self.trail.len() > start {
                let literal = match self.trail.pop() {
                    Some(literal) => literal,
                    None => break,
                };
                let atom = literal.atom();
                self.cells.clear_value(atom);
                if !self.config.phase_saving {
                    self.cells.save_phase(atom, self.config.polarity_default);
                }
                if self.cells.is_decision(atom) {
                    self.activity.activate(atom as usize);
                }
            }
        }
        // Entries below the jump are propagated, though the root prefix may hold fresh units.
        self.q_head = self.q_head.min(self.trail.len());
    }
}
