//! Frame Timers demo entry point
//!
//! Drives a short frame loop plus a timer that gets cancelled through its
//! delivered handle. Runs on the browser clock on the web and on a manual
//! clock natively.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use std::cell::Cell;
use std::rc::Rc;

use frame_timers::{Clock, Timing};

/// Frames the demo loop runs before stopping
const DEMO_FRAMES: u32 = 120;

/// Keep requesting frames until `DEMO_FRAMES` have run
fn frame_loop<C: Clock + 'static>(timing: Rc<Timing<C>>, frames: Rc<Cell<u32>>) {
    let next = timing.clone();
    let result = timing.request_animation_frame(move |time| {
        frames.set(frames.get() + 1);
        if frames.get() % 30 == 0 {
            log::info!("Frame {} at {:.1}ms", frames.get(), time);
        }
        if frames.get() < DEMO_FRAMES {
            frame_loop(next, frames);
        }
    });
    if let Err(e) = result {
        log::error!("Frame request failed: {}", e);
    }
}

/// Schedule a timer that should fire, and one that gets cancelled as soon as
/// its handle arrives
fn schedule_timers<C: Clock + 'static>(timing: Rc<Timing<C>>) -> frame_timers::Result<()> {
    timing.after(
        || log::info!("1s timer fired"),
        1_000,
        |handle| log::info!("1s timer handle delivered: {:?}", handle),
    )?;

    let canceller = timing.clone();
    timing.after(
        || log::error!("Cancelled timer fired anyway"),
        500,
        move |handle| match canceller.cancel(handle) {
            Ok(()) => log::info!("Cancelled timer {:?} before it fired", handle),
            Err(e) => log::error!("Cancel failed: {}", e),
        },
    )
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Frame Timers demo starting...");

    let timing = match Timing::browser() {
        Ok(timing) => Rc::new(timing),
        Err(e) => {
            log::error!("Browser timing unavailable: {}", e);
            return;
        }
    };

    frame_loop(timing.clone(), Rc::new(Cell::new(0)));
    if let Err(e) = schedule_timers(timing) {
        log::error!("Timer scheduling failed: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use frame_timers::{ManualClock, TimingConfig};

    env_logger::init();
    log::info!("Frame Timers (native) starting on a manual clock...");

    let clock = Rc::new(ManualClock::new());
    let timing = Rc::new(Timing::with_config(clock.clone(), TimingConfig::load()));
    let frames = Rc::new(Cell::new(0));

    frame_loop(timing.clone(), frames.clone());
    if let Err(e) = schedule_timers(timing) {
        log::error!("Timer scheduling failed: {}", e);
        return;
    }

    // 60 Hz until the loop stops requesting frames
    while clock.pending_frames() > 0 {
        clock.advance(1000.0 / 60.0);
        clock.render_frame();
    }
    clock.run_until_idle();

    println!("\n✓ Ran {} frames in {:.0}ms of virtual time", frames.get(), clock.now());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
