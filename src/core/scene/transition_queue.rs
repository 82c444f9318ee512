//=========================================================================
// Transition Queue
//=========================================================================
//
// Deferred scene transitions.
//
// The embedding application queues transitions at any point during a
// frame. The host applies them in FIFO order at the end of `tick()`,
// after first-frame activations have been dispatched.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{SceneKey, SceneTransition};

//=== Transition Queue ====================================================

/// FIFO queue of scene transitions awaiting the next tick boundary.
pub struct TransitionQueue<S: SceneKey> {
    queue: Vec<SceneTransition<S>>,
}

impl<S: SceneKey> TransitionQueue<S> {
    /// Creates a new empty transition queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues a transition. `SceneTransition::Empty` is discarded.
    pub fn push(&mut self, transition: SceneTransition<S>) {
        if transition != SceneTransition::Empty {
            self.queue.push(transition);
        }
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of queued transitions.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all transitions from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<SceneTransition<S>> {
        std::mem::take(&mut self.queue)
    }
}

impl<S: SceneKey> Default for TransitionQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================
