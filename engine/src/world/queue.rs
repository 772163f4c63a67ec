//! Post-step command queue
//!
//! Destructive edits (spawning fragments, killing bodies) discovered while
//! the physics step is being processed are queued here and executed once
//! the step has finished, so the backend's shape set is never mutated while
//! it is being iterated.

#[derive(Debug)]
pub struct PostStepQueue<C> {
    commands: Vec<C>,
}

impl<C> Default for PostStepQueue<C> {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
        }
    }
}

impl<C> PostStepQueue<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: C) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Takes every queued command in submission order. Commands pushed while
    /// the returned batch is being executed wait for the next drain.
    pub fn drain(&mut self) -> Vec<C> {
        std::mem::take(&mut self.commands)
    }
}
