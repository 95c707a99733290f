use std::time::{Duration, Instant};

/// Decides when the event loop should issue the next redraw.
///
/// Without a cap every wakeup renders (the platform's present pacing is the
/// only throttle). With a cap, frames are spaced by the target interval and
/// the loop sleeps until [`next_deadline`](Self::next_deadline).
#[derive(Debug)]
pub struct FrameScheduler {
    interval: Option<Duration>,
    last_rendered: Option<Instant>,
}

impl FrameScheduler {
    /// `target_fps` of `None` or a non-positive value means uncapped.
    pub fn new(target_fps: Option<f32>) -> Self {
        let interval = target_fps
            .filter(|fps| *fps > 0.0)
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)));
        Self {
            interval,
            last_rendered: None,
        }
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        match (self.interval, self.last_rendered) {
            (Some(interval), Some(last)) => now.duration_since(last) >= interval,
            _ => true,
        }
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.last_rendered = Some(now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.interval, self.last_rendered) {
            (Some(interval), Some(last)) => Some(last + interval),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.last_rendered = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_scheduler_is_always_ready() {
        let mut scheduler = FrameScheduler::new(None);
        let now = Instant::now();
        assert!(scheduler.ready_for_frame(now));
        scheduler.mark_rendered(now);
        assert!(scheduler.ready_for_frame(now));
        assert!(scheduler.next_deadline().is_none());
    }

    #[test]
    fn capped_scheduler_spaces_frames_by_the_interval() {
        let mut scheduler = FrameScheduler::new(Some(10.0));
        let start = Instant::now();
        assert!(scheduler.ready_for_frame(start));
        scheduler.mark_rendered(start);

        assert!(!scheduler.ready_for_frame(start + Duration::from_millis(50)));
        assert!(scheduler.ready_for_frame(start + Duration::from_millis(100)));
        assert_eq!(
            scheduler.next_deadline(),
            Some(start + Duration::from_millis(100))
        );
    }

    #[test]
    fn non_positive_fps_means_uncapped() {
        let scheduler = FrameScheduler::new(Some(0.0));
        scheduler
            .next_deadline()
            .map_or((), |_| panic!("zero fps must not produce a deadline"));
        assert!(scheduler.ready_for_frame(Instant::now()));
    }

    #[test]
    fn reset_forgets_the_last_frame() {
        let mut scheduler = FrameScheduler::new(Some(1.0));
        let now = Instant::now();
        scheduler.mark_rendered(now);
        assert!(!scheduler.ready_for_frame(now));
        scheduler.reset();
        assert!(scheduler.ready_for_frame(now));
    }
}
