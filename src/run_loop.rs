// run_loop.rs - Frame stepping with cancellation
//
// The browser drives `tick` from requestAnimationFrame; tests call
// `run_frames` to step an exact number of frames.

use std::cell::Cell;
use std::rc::Rc;

use crate::app::{App, Compositor, Page};
use crate::error::Result;

/// Shared stop flag. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

pub struct RunLoop {
    token: CancelToken,
    frames: u64,
}

impl RunLoop {
    pub fn new(token: CancelToken) -> Self {
        Self { token, frames: 0 }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame unless cancelled. `Stopped` means do not reschedule.
    /// A fatal error cancels the token before it is returned.
    pub fn tick<P: Page, C: Compositor>(
        &mut self,
        app: &mut App,
        page: &mut P,
        compositor: &mut C,
    ) -> Result<LoopState> {
        if self.token.is_cancelled() {
            return Ok(LoopState::Stopped);
        }
        let result = app.frame(page, compositor);
        self.frames += 1;
        if let Err(e) = result {
            if e.is_fatal() {
                self.token.cancel();
            }
            return Err(e);
        }
        Ok(if self.token.is_cancelled() { LoopState::Stopped } else { LoopState::Running })
    }

    /// Step up to `n` frames, stopping early on cancel. Returns frames run.
    pub fn run_frames<P: Page, C: Compositor>(
        &mut self,
        n: u64,
        app: &mut App,
        page: &mut P,
        compositor: &mut C,
    ) -> Result<u64> {
        let start = self.frames;
        for _ in 0..n {
            if self.token.is_cancelled() {
                break;
            }
            if self.tick(app, page, compositor)? == LoopState::Stopped {
                break;
            }
        }
        Ok(self.frames - start)
    }
}
