use std::thread;
use std::time::Duration;

use crate::engine::progress::Renderer;

use super::context::PipelineState;

/// Poll every tracker each `interval` and hand the frame to `renderer`.
///
/// Stops once the queue is closed and drained and every fetcher has exited, then draws one
/// final frame. Returns the number of frames drawn, the final one included.
pub fn run_reporter<R>(state: &PipelineState, renderer: &mut R, interval: Duration) -> u64
where
    R: Renderer + ?Sized,
{
    let mut frames = 0_u64;
    loop {
        renderer.draw(&state.frame());
        frames += 1;
        thread::sleep(interval);
        if state.is_finished() {
            break;
        }
    }
    renderer.finish(&state.frame());
    frames + 1
}
