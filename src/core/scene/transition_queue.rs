//=========================================================================
// Transition Queue
//=========================================================================
//
// FIFO of scene operations waiting for a frame boundary.
//
// Each `Systems` fills one while its scene updates; the SceneManager
// keeps its own for operations issued before boot or mid-frame, and
// drains it at the start of the next `update`.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{SceneKey, SceneTransition};

//=== Transition Queue ====================================================

pub(crate) struct TransitionQueue<S: SceneKey> {
    queue: Vec<SceneTransition<S>>,
}

impl<S: SceneKey> TransitionQueue<S> {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues an operation for the next frame boundary.
    pub fn push(&mut self, transition: SceneTransition<S>) {
        if transition != SceneTransition::Empty {
            self.queue.push(transition);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear()
    }

    /// Takes every queued operation in FIFO order, leaving the queue empty.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        A,
        B,
    }

    impl SceneKey for Key {}

    #[test]
    fn take_drains_in_fifo_order() {
        let mut queue = TransitionQueue::new();
        queue.push(SceneTransition::Start(Key::A, None));
        queue.push(SceneTransition::Empty);
        queue.push(SceneTransition::Stop(Key::B, None));
        assert_eq!(queue.len(), 2);

        let taken = queue.take();
        assert_eq!(
            taken,
            vec![SceneTransition::Start(Key::A, None), SceneTransition::Stop(Key::B, None)]
        );
        assert!(queue.is_empty());
    }
}
