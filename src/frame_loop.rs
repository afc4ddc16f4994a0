/// Owner of the animation loop's scheduling.
///
/// The application asks the window for another redraw after each frame only while the loop is
/// running, so the pending redraw request acts as the handle to the next scheduled frame.
/// Stopping the loop means no further frame gets requested and the scene holds still.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameLoop {
    running: bool,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        if !self.running {
            log::info!("Animation loop started");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        if self.running {
            log::info!("Animation loop stopped after {} frames", self.frames);
        }
        self.running = false;
    }

    pub fn toggle(&mut self) {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Total frames run by the updater since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Accounts for one redraw. Returns `true` when the frame updater should run.
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.frames += 1;
        }
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_loop_is_stopped() {
        let mut frame_loop = FrameLoop::new();
        assert!(!frame_loop.is_running());
        assert!(!frame_loop.tick());
        assert_eq!(frame_loop.frames(), 0);
    }

    #[test]
    fn counts_only_running_frames() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.start();
        assert!(frame_loop.tick());
        assert!(frame_loop.tick());
        frame_loop.stop();
        assert!(!frame_loop.tick());
        assert_eq!(frame_loop.frames(), 2);
    }

    #[test]
    fn toggle_flips_state() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.toggle();
        assert!(frame_loop.is_running());
        frame_loop.toggle();
        assert!(!frame_loop.is_running());
    }
}
