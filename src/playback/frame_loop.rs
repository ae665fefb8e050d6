//! Frame loop handles
//!
//! The host's per-frame callback is the only driver of a loop. Each callback
//! carries the `LoopId` it was started with and asks the owner whether that id
//! is still current before doing any work, so starting or cancelling a loop
//! invalidates every callback already queued for the old one.

/// Identity of one started loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopId(u64);

impl LoopId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default, Clone)]
pub struct FrameLoop {
    generation: u64,
    active: bool,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new loop, retiring any previous one
    pub fn start(&mut self) -> LoopId {
        self.generation += 1;
        self.active = true;
        LoopId(self.generation)
    }

    /// Stop the live loop. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        was_active
    }

    /// Mark `id` as having run to completion
    pub fn finish(&mut self, id: LoopId) {
        if self.is_current(id) {
            self.active = false;
        }
    }

    pub fn is_current(&self, id: LoopId) -> bool {
        self.active && id.0 == self.generation
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_retires_previous_loop() {
        let mut frame_loop = FrameLoop::new();
        let first = frame_loop.start();
        let second = frame_loop.start();
        assert!(!frame_loop.is_current(first));
        assert!(frame_loop.is_current(second));
    }

    #[test]
    fn test_cancel_then_start_leaves_one_loop() {
        let mut frame_loop = FrameLoop::new();
        let stale = frame_loop.start();
        assert!(frame_loop.cancel());
        assert!(!frame_loop.is_current(stale));

        let live = frame_loop.start();
        assert!(frame_loop.is_current(live));
        assert!(!frame_loop.is_current(stale));
    }

    #[test]
    fn test_finish_ignores_stale_id() {
        let mut frame_loop = FrameLoop::new();
        let stale = frame_loop.start();
        let live = frame_loop.start();
        frame_loop.finish(stale);
        assert!(frame_loop.is_current(live));
        frame_loop.finish(live);
        assert!(!frame_loop.is_active());
    }
}
