//! Main loop: a background thread that drains input events, ticks the
//! structural mutator at 1 Hz, and renders frames at the target fps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use canopy_audio::AudioFeed;
use canopy_core::{StructuralMutator, SystemClock, VisualParameters};
use crossbeam::channel::Receiver;

use crate::frame::render_frame;
use crate::input::{apply_event, InputEvent};
use crate::surface::DrawSurface;

/// Upper bound on a single sleep so a stop request is noticed quickly.
const MAX_SLEEP: Duration = Duration::from_millis(5);

/// Fixed-rate deadline tracker.
///
/// `advance` pushes the deadline forward by whole intervals, skipping
/// any that were missed, so a stalled loop catches up to the present
/// instead of firing a burst of stale ticks.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(hz: u32) -> Self {
        let interval = Duration::from_secs_f64(1.0 / hz.max(1) as f64);
        Self {
            interval,
            next: Instant::now() + interval,
        }
    }

    pub fn due(&self, now: Instant) -> bool {
        now >= self.next
    }

    pub fn advance(&mut self, now: Instant) {
        self.next += self.interval;
        while self.next <= now {
            self.next += self.interval;
        }
    }

    /// Change the rate; the pending deadline is kept.
    pub fn set_rate(&mut self, hz: u32) {
        self.interval = Duration::from_secs_f64(1.0 / hz.max(1) as f64);
    }

    pub fn next_deadline(&self) -> Instant {
        self.next
    }
}

/// Everything the loop thread owns: the shared parameters, the audio
/// stage, and the mutator.
pub struct VizContext {
    pub params: VisualParameters,
    pub feed: AudioFeed,
    pub mutator: StructuralMutator,
}

impl VizContext {
    pub fn new(params: VisualParameters, feed: AudioFeed) -> Self {
        Self {
            params,
            feed,
            mutator: StructuralMutator::new(),
        }
    }
}

/// Background render loop.
///
/// Owns its context for the lifetime of the thread; the host talks to
/// it through the input-event channel and `stop()`.
pub struct MainLoop {
    running: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<VizContext>>,
}

impl MainLoop {
    /// Start the loop on a named thread.
    ///
    /// Events are drained before every tick check, so input latency is
    /// bounded by the sleep granularity rather than the frame rate.
    pub fn start(
        mut context: VizContext,
        mut surface: impl DrawSurface + Send + 'static,
        event_rx: Receiver<InputEvent>,
    ) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let thread = thread::Builder::new()
            .name("main-loop".to_string())
            .spawn(move || {
                let clock = SystemClock::new();
                let mut render = Ticker::new(context.params.fps);
                let mut mutate = Ticker::new(1);

                while running_clone.load(Ordering::Relaxed) {
                    while let Ok(event) = event_rx.try_recv() {
                        apply_event(event, &mut context.params, &mut context.feed);
                    }
                    render.set_rate(context.params.fps);

                    let now = Instant::now();
                    if mutate.due(now) {
                        mutate.advance(now);
                        context.mutator.tick(&clock, &mut context.params.tree);
                    }
                    if render.due(now) {
                        render.advance(now);
                        let frames = (context.feed.sample_rate()
                            / context.params.fps.max(1) as f32)
                            as usize;
                        if !context.feed.advance_playout(frames)
                            && context.feed.notify_ended()
                        {
                            log::info!("playback finished");
                            context.params.reset_info();
                        }
                        render_frame(&mut surface, &mut context.params, &mut context.feed);
                    }

                    let deadline = render.next_deadline().min(mutate.next_deadline());
                    if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
                        thread::sleep(wait.min(MAX_SLEEP));
                    }
                }
                context
            })
            .expect("failed to spawn main loop thread");

        Self {
            running,
            thread: Some(thread),
        }
    }

    /// Signal the loop to stop, wait for the thread, and hand the
    /// context back to the caller.
    pub fn stop(&mut self) -> Option<VizContext> {
        self.running.store(false, Ordering::Relaxed);
        self.thread.take().and_then(|thread| thread.join().ok())
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

impl Drop for MainLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use crossbeam::channel::bounded;

    #[test]
    fn test_ticker_fires_at_interval() {
        let mut ticker = Ticker::new(100);
        let start = Instant::now();
        assert!(!ticker.due(start));
        let later = start + Duration::from_millis(20);
        assert!(ticker.due(later));
        ticker.advance(later);
        assert!(!ticker.due(later));
        assert!(ticker.next_deadline() > later);
    }

    #[test]
    fn test_ticker_skips_missed_deadlines() {
        let mut ticker = Ticker::new(1000);
        let far = Instant::now() + Duration::from_secs(1);
        ticker.advance(far);
        // the next deadline lands after the stall, not behind it
        assert!(ticker.next_deadline() > far);
    }

    #[test]
    fn test_main_loop_lifecycle() {
        let context = VizContext::new(VisualParameters::default(), AudioFeed::new());
        let surface = RecordingSurface::new(800.0, 600.0);
        let (tx, rx) = bounded(16);

        let mut main_loop = MainLoop::start(context, surface, rx);
        assert!(main_loop.is_running());

        tx.send(InputEvent::Digit(2)).unwrap();
        thread::sleep(Duration::from_millis(60));

        let context = main_loop.stop().expect("loop thread returns its context");
        assert!(!main_loop.is_running());
        assert_eq!(context.params.mode, canopy_core::VizMode::Oscope);
        // at 60 fps a 60 ms run has rendered at least once
        assert!(context.params.line_dash_speed > 0.0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let context = VizContext::new(VisualParameters::default(), AudioFeed::new());
        let surface = RecordingSurface::new(100.0, 100.0);
        let (_tx, rx) = bounded::<InputEvent>(1);

        let mut main_loop = MainLoop::start(context, surface, rx);
        assert!(main_loop.stop().is_some());
        assert!(main_loop.stop().is_none());
    }
}
