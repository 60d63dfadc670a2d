//! Deterministic in-memory clock
//!
//! Stands in for the browser when there is no browser: time only moves when
//! the owner calls [`ManualClock::advance`], and frames only happen on
//! [`ManualClock::render_frame`]. Mirrors the platform rules the binding
//! relies on:
//! - Timers fire in (due time, scheduling order) order
//! - Negative delays clamp to zero
//! - Frame callbacks requested during a frame run on the next one
//! - Cancelling a stale handle does nothing
//!
//! Callbacks run with no internal borrow held, so they may reschedule or
//! cancel through the same clock.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::clock::{Clock, FrameCallback, TimerCallback};
use crate::error::{Result, TimingError};
use crate::handle::{FrameHandle, TimerHandle};

/// Upper bound on timer callbacks fired by one `advance` or
/// `run_until_idle` call
pub const MAX_IDLE_RUNS: usize = 10_000;

struct PendingTimer {
    handle: TimerHandle,
    due: f64,
    seq: u64,
    callback: TimerCallback,
}

#[derive(Default)]
struct State {
    now: f64,
    last_timer_id: i32,
    last_frame_id: i32,
    seq: u64,
    timers: Vec<PendingTimer>,
    /// Requested for the next frame
    frames: Vec<(FrameHandle, FrameCallback)>,
    /// Still to run in the frame being rendered
    rendering: VecDeque<(FrameHandle, FrameCallback)>,
    /// Scheduling calls to let through before failing, and the failure
    fail_at: Option<(usize, String)>,
}

impl State {
    /// Remove the earliest timer due at or before `limit`
    fn pop_due(&mut self, limit: f64) -> Option<PendingTimer> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= limit)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;
        Some(self.timers.remove(idx))
    }

    fn check_failure(&mut self) -> Result<()> {
        let Some((skip, _)) = &mut self.fail_at else {
            return Ok(());
        };
        if *skip > 0 {
            *skip -= 1;
            return Ok(());
        }
        let (_, reason) = self.fail_at.take().unwrap_or_default();
        Err(TimingError::Platform(reason))
    }
}

/// Virtual clock driven by hand
#[derive(Default)]
pub struct ManualClock {
    state: RefCell<State>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in ms
    pub fn now(&self) -> f64 {
        self.state.borrow().now
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    /// Make the next scheduling call fail with `reason`
    pub fn fail_next(&self, reason: impl Into<String>) {
        self.fail_nth(0, reason);
    }

    /// Let `skip` scheduling calls succeed, then fail the one after with
    /// `reason`
    pub fn fail_nth(&self, skip: usize, reason: impl Into<String>) {
        self.state.borrow_mut().fail_at = Some((skip, reason.into()));
    }

    /// Fire timers due at or before `limit` in order, at most
    /// [`MAX_IDLE_RUNS`] of them. Returns the count and whether the cap hit.
    fn fire_due(&self, limit: f64) -> (usize, bool) {
        let mut fired = 0;

        while fired < MAX_IDLE_RUNS {
            let next = {
                let mut state = self.state.borrow_mut();
                let timer = state.pop_due(limit);
                if let Some(t) = &timer {
                    state.now = state.now.max(t.due);
                }
                timer
            };
            let Some(timer) = next else { return (fired, false) };
            log::trace!("Firing timer {:?} at {}ms", timer.handle, timer.due);
            (timer.callback)();
            fired += 1;
        }

        log::warn!(
            "Stopped after {} timer callbacks with {} timers pending",
            fired,
            self.pending_timers()
        );
        (fired, true)
    }

    /// Move time forward by `ms`, firing every timer that falls due.
    /// Returns the number of callbacks fired. If [`MAX_IDLE_RUNS`] is hit,
    /// time stays at the last fired timer.
    pub fn advance(&self, ms: f64) -> usize {
        let target = self.now() + ms.max(0.0);
        let (fired, capped) = self.fire_due(target);
        if !capped {
            self.state.borrow_mut().now = target;
        }
        fired
    }

    /// Fire timers until none remain, jumping time to each due point.
    /// Stops after [`MAX_IDLE_RUNS`] callbacks so a self-rescheduling timer
    /// cannot hang the caller.
    pub fn run_until_idle(&self) -> usize {
        self.fire_due(f64::INFINITY).0
    }

    /// Run the frame callbacks requested so far, in request order.
    /// Returns the number of callbacks fired.
    pub fn render_frame(&self) -> usize {
        let timestamp = {
            let mut state = self.state.borrow_mut();
            let requested = std::mem::take(&mut state.frames);
            state.rendering.extend(requested);
            state.now
        };
        let mut fired = 0;

        loop {
            let next = self.state.borrow_mut().rendering.pop_front();
            let Some((handle, callback)) = next else { break };
            log::trace!("Firing frame {:?} at {}ms", handle, timestamp);
            callback(timestamp);
            fired += 1;
        }

        fired
    }
}

impl Clock for ManualClock {
    fn request_frame(&self, callback: FrameCallback) -> Result<FrameHandle> {
        let mut state = self.state.borrow_mut();
        state.check_failure()?;
        state.last_frame_id += 1;
        let handle = FrameHandle::from_raw(state.last_frame_id);
        state.frames.push((handle, callback));
        Ok(handle)
    }

    fn cancel_frame(&self, handle: FrameHandle) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.frames.retain(|(h, _)| *h != handle);
        state.rendering.retain(|(h, _)| *h != handle);
        Ok(())
    }

    fn set_timeout(&self, callback: TimerCallback, ms: i32) -> Result<TimerHandle> {
        let mut state = self.state.borrow_mut();
        state.check_failure()?;
        state.last_timer_id += 1;
        state.seq += 1;
        let timer = PendingTimer {
            handle: TimerHandle::from_raw(state.last_timer_id),
            due: state.now + f64::from(ms.max(0)),
            seq: state.seq,
            callback,
        };
        let handle = timer.handle;
        state.timers.push(timer);
        Ok(handle)
    }

    fn clear_timeout(&self, handle: TimerHandle) -> Result<()> {
        self.state
            .borrow_mut()
            .timers
            .retain(|t| t.handle != handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) -> Box<dyn FnOnce()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let make = move |name: &str| {
            let sink = sink.clone();
            let name = name.to_string();
            Box::new(move || sink.borrow_mut().push(name)) as Box<dyn FnOnce()>
        };
        (log, make)
    }

    #[test]
    fn test_timer_waits_for_its_delay() {
        let clock = ManualClock::new();
        let (log, make) = recorder();
        clock.set_timeout(make("a"), 100).unwrap();

        assert_eq!(clock.advance(99.0), 0);
        assert!(log.borrow().is_empty());
        assert_eq!(clock.advance(1.0), 1);
        assert_eq!(*log.borrow(), vec!["a"]);
        assert_eq!(clock.now(), 100.0);
    }

    #[test]
    fn test_timers_fire_by_due_then_order() {
        let clock = ManualClock::new();
        let (log, make) = recorder();
        clock.set_timeout(make("late"), 20).unwrap();
        clock.set_timeout(make("first"), 10).unwrap();
        clock.set_timeout(make("second"), 10).unwrap();

        clock.advance(50.0);
        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
    }

    #[test]
    fn test_negative_delay_clamps_to_zero() {
        let clock = ManualClock::new();
        let (log, make) = recorder();
        clock.set_timeout(make("a"), -50).unwrap();
        assert_eq!(clock.advance(0.0), 1);
        assert_eq!(*log.borrow(), vec!["a"]);
    }

    #[test]
    fn test_cleared_timer_never_fires() {
        let clock = ManualClock::new();
        let (log, make) = recorder();
        let handle = clock.set_timeout(make("a"), 10).unwrap();
        clock.clear_timeout(handle).unwrap();
        clock.clear_timeout(handle).unwrap();

        assert_eq!(clock.advance(100.0), 0);
        assert!(log.borrow().is_empty());
        assert_eq!(clock.pending_timers(), 0);
    }

    #[test]
    fn test_callback_can_schedule_within_window() {
        let clock = Rc::new(ManualClock::new());
        let (log, make) = recorder();
        let inner = clock.clone();
        let chained = make("chained");
        clock
            .set_timeout(Box::new(move || {
                inner.set_timeout(chained, 5).unwrap();
            }), 10)
            .unwrap();

        assert_eq!(clock.advance(15.0), 2);
        assert_eq!(*log.borrow(), vec!["chained"]);
    }

    #[test]
    fn test_frame_requested_during_frame_runs_next_frame() {
        let clock = Rc::new(ManualClock::new());
        let count = Rc::new(RefCell::new(0));
        let inner = clock.clone();
        let c = count.clone();
        clock
            .request_frame(Box::new(move |_| {
                *c.borrow_mut() += 1;
                let c = c.clone();
                inner
                    .request_frame(Box::new(move |_| *c.borrow_mut() += 10))
                    .unwrap();
            }))
            .unwrap();

        assert_eq!(clock.render_frame(), 1);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(clock.pending_frames(), 1);
        assert_eq!(clock.render_frame(), 1);
        assert_eq!(*count.borrow(), 11);
    }

    #[test]
    fn test_frame_cancelled_mid_frame_is_skipped() {
        let clock = Rc::new(ManualClock::new());
        let hits = Rc::new(RefCell::new(0));
        let victim = Rc::new(RefCell::new(None::<FrameHandle>));

        let inner = clock.clone();
        let v = victim.clone();
        clock
            .request_frame(Box::new(move |_| {
                if let Some(h) = *v.borrow() {
                    inner.cancel_frame(h).unwrap();
                }
            }))
            .unwrap();
        let h = hits.clone();
        let second = clock
            .request_frame(Box::new(move |_| *h.borrow_mut() += 1))
            .unwrap();
        *victim.borrow_mut() = Some(second);

        assert_eq!(clock.render_frame(), 1);
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_frame_receives_current_time() {
        let clock = ManualClock::new();
        clock.advance(16.0);
        let seen = Rc::new(RefCell::new(0.0));
        let s = seen.clone();
        clock
            .request_frame(Box::new(move |t| *s.borrow_mut() = t))
            .unwrap();
        clock.render_frame();
        assert_eq!(*seen.borrow(), 16.0);
    }

    #[test]
    fn test_handles_start_at_one_and_increase() {
        let clock = ManualClock::new();
        let a = clock.set_timeout(Box::new(|| {}), 0).unwrap();
        let b = clock.set_timeout(Box::new(|| {}), 0).unwrap();
        let f = clock.request_frame(Box::new(|_| {})).unwrap();
        assert_eq!(a.raw(), 1);
        assert_eq!(b.raw(), 2);
        assert_eq!(f.raw(), 1);
    }

    #[test]
    fn test_fail_next_fails_once() {
        let clock = ManualClock::new();
        clock.fail_next("quota");
        assert_eq!(
            clock.set_timeout(Box::new(|| {}), 0),
            Err(TimingError::Platform("quota".to_string()))
        );
        assert!(clock.set_timeout(Box::new(|| {}), 0).is_ok());
    }

    #[test]
    fn test_run_until_idle_stops_runaway_timer() {
        fn reschedule(clock: Rc<ManualClock>) {
            let next = clock.clone();
            clock
                .set_timeout(Box::new(move || reschedule(next)), 1)
                .unwrap();
        }
        let clock = Rc::new(ManualClock::new());
        reschedule(clock.clone());

        assert_eq!(clock.run_until_idle(), MAX_IDLE_RUNS);
        assert_eq!(clock.pending_timers(), 1);
    }

    #[test]
    fn test_advance_stops_zero_delay_runaway() {
        fn reschedule(clock: Rc<ManualClock>) {
            let next = clock.clone();
            clock
                .set_timeout(Box::new(move || reschedule(next)), 0)
                .unwrap();
        }
        let clock = Rc::new(ManualClock::new());
        clock.advance(5.0);
        reschedule(clock.clone());

        assert_eq!(clock.advance(0.0), MAX_IDLE_RUNS);
        assert_eq!(clock.pending_timers(), 1);
        assert_eq!(clock.now(), 5.0);
    }

    #[test]
    fn test_fail_nth_skips_earlier_calls() {
        let clock = ManualClock::new();
        clock.fail_nth(1, "quota");
        assert!(clock.set_timeout(Box::new(|| {}), 0).is_ok());
        assert_eq!(
            clock.request_frame(Box::new(|_| {})),
            Err(TimingError::Platform("quota".to_string()))
        );
        assert!(clock.set_timeout(Box::new(|| {}), 0).is_ok());
    }

    proptest! {
        #[test]
        fn prop_timers_fire_in_due_order_not_before_delay(
            delays in prop::collection::vec(0i32..500, 1..40)
        ) {
            let clock = Rc::new(ManualClock::new());
            let fired = Rc::new(RefCell::new(Vec::new()));
            for (i, &delay) in delays.iter().enumerate() {
                let c = clock.clone();
                let f = fired.clone();
                clock
                    .set_timeout(Box::new(move || f.borrow_mut().push((i, c.now()))), delay)
                    .unwrap();
            }

            prop_assert_eq!(clock.run_until_idle(), delays.len());

            let fired = fired.borrow();
            for &(i, at) in fired.iter() {
                prop_assert!(at >= f64::from(delays[i]));
            }
            for pair in fired.windows(2) {
                let (a, b) = (pair[0].0, pair[1].0);
                prop_assert!((delays[a], a) < (delays[b], b));
            }
        }
    }
}
