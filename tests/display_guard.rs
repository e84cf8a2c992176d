#![allow(missing_docs)]
//! Host-level tests for priority-arbitrated display access.

use std::sync::Barrier;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::{Duration, Instant};

use led_envoy::{Error, Result};
use led_envoy::display::{DisplayController, DisplayGuard};
use led_envoy::led_strip::{LedStrip, PixelDriver, Transmit};
use led_envoy::led_strip_host::{RecordingDisplay, RecordingTransmitter};
use led_envoy::pixel::{Pixel, colors};

const DARK: [Pixel; 1] = [colors::BLACK];
const LIGHT: [Pixel; 1] = [colors::WHITE];

fn controller() -> DisplayController<RecordingDisplay> {
    DisplayController::new(RecordingDisplay::new(1))
}

fn last(controller: &DisplayController<RecordingDisplay>) -> Option<Vec<Pixel>> {
    controller.device().last_frame()
}

#[test]
fn single_guard_shows() {
    let controller = controller();
    let guard = controller.guard(0).unwrap();
    assert!(guard.show(&DARK).unwrap());
    assert_eq!(last(&controller), Some(DARK.to_vec()));
}

#[test]
fn higher_priority_wins_when_it_shows_first() {
    let controller = controller();
    let low = controller.guard(0).unwrap();
    let high = controller.guard(1).unwrap();
    assert!(high.show(&LIGHT).unwrap());
    assert!(!low.show(&DARK).unwrap());
    assert_eq!(last(&controller), Some(LIGHT.to_vec()));
}

#[test]
fn higher_priority_wins_when_it_shows_last() {
    let controller = controller();
    let low = controller.guard(0).unwrap();
    let high = controller.guard(1).unwrap();
    assert!(!low.show(&DARK).unwrap());
    assert!(high.show(&LIGHT).unwrap());
    assert_eq!(controller.device().frames(), vec![LIGHT.to_vec()]);
}

#[test]
fn dropping_the_winner_hands_over() {
    let controller = controller();
    let low = controller.guard(0).unwrap();
    {
        let high = controller.guard(1).unwrap();
        assert!(high.show(&LIGHT).unwrap());
        assert_eq!(last(&controller), Some(LIGHT.to_vec()));
    }
    assert!(low.show(&DARK).unwrap());
    assert_eq!(last(&controller), Some(DARK.to_vec()));
}

#[test]
fn lower_priority_newcomer_is_muted() {
    let controller = controller();
    let high = controller.guard(2).unwrap();
    assert!(high.show(&DARK).unwrap());
    {
        let low = controller.guard(1).unwrap();
        assert!(!low.show(&LIGHT).unwrap());
        assert_eq!(last(&controller), Some(DARK.to_vec()));
    }
    assert!(high.show(&LIGHT).unwrap());
    assert_eq!(last(&controller), Some(LIGHT.to_vec()));
}

#[test]
fn reacquire_to_higher_priority_takes_over() {
    let controller = controller();
    let mut first = controller.guard(0).unwrap();
    let second = controller.guard(1).unwrap();
    assert!(!first.show(&DARK).unwrap());
    assert!(second.show(&LIGHT).unwrap());

    first.reacquire(3);
    assert_eq!(first.priority(), 3);
    assert!(first.show(&DARK).unwrap());
    assert!(!second.show(&LIGHT).unwrap());
    assert_eq!(last(&controller), Some(DARK.to_vec()));
}

#[test]
fn reacquire_to_lower_priority_gives_way() {
    let controller = controller();
    let mut first = controller.guard(2).unwrap();
    let second = controller.guard(1).unwrap();
    first.reacquire(0);
    assert!(!first.show(&DARK).unwrap());
    assert!(second.show(&LIGHT).unwrap());
    assert_eq!(controller.winner_priority(), Some(1));
}

#[test]
fn reacquire_with_same_priority_keeps_the_display() {
    let controller = controller();
    let mut first = controller.guard(1).unwrap();
    let second = controller.guard(1).unwrap();
    first.reacquire(1);
    assert!(first.show(&DARK).unwrap());
    assert!(!second.show(&LIGHT).unwrap());
}

#[test]
fn reacquire_into_a_tie_ranks_as_newest() {
    let controller = controller();
    let mut first = controller.guard(0).unwrap();
    let second = controller.guard(1).unwrap();
    first.reacquire(1);
    assert!(!first.show(&DARK).unwrap());
    assert!(second.show(&LIGHT).unwrap());
}

#[test]
fn equal_priority_first_attached_wins() {
    let controller = controller();
    let first = controller.guard(0).unwrap();
    let second = controller.guard(0).unwrap();
    assert!(first.show(&DARK).unwrap());
    assert!(!second.show(&LIGHT).unwrap());
    assert_eq!(last(&controller), Some(DARK.to_vec()));
}

#[test]
fn equal_priority_newcomer_waits_for_its_turn() {
    let controller = controller();
    let first = controller.guard(0).unwrap();
    assert!(first.show(&DARK).unwrap());
    {
        let second = controller.guard(0).unwrap();
        assert!(!second.show(&LIGHT).unwrap());
        assert_eq!(last(&controller), Some(DARK.to_vec()));
    }
    assert!(first.show(&LIGHT).unwrap());
    assert_eq!(last(&controller), Some(LIGHT.to_vec()));
}

#[test]
fn equal_priority_second_wins_after_first_detaches() {
    let controller = controller();
    let first = controller.guard(4).unwrap();
    let second = controller.guard(4).unwrap();
    assert!(!second.show(&LIGHT).unwrap());
    drop(first);
    assert!(second.show(&LIGHT).unwrap());
}

#[test]
fn ties_keep_attach_order_after_other_guards_detach() {
    let controller = controller();
    let top = controller.guard(2).unwrap();
    let early = controller.guard(1).unwrap();
    let middle = controller.guard(0).unwrap();
    let late = controller.guard(1).unwrap();

    drop(middle);
    drop(top);
    assert!(early.show(&DARK).unwrap());
    assert!(!late.show(&LIGHT).unwrap());
}

#[test]
fn nested_scopes_unwind_in_priority_order() {
    let controller = controller();
    {
        let g1 = controller.guard(0).unwrap();
        {
            let g2 = controller.guard(1).unwrap();
            {
                let g3 = controller.guard(2).unwrap();
                assert!(g3.show(&LIGHT).unwrap());
                assert!(!g2.show(&DARK).unwrap());
                assert!(!g1.show(&DARK).unwrap());
                assert_eq!(last(&controller), Some(LIGHT.to_vec()));
            }
            assert!(g2.show(&DARK).unwrap());
            assert!(!g1.show(&LIGHT).unwrap());
            assert_eq!(last(&controller), Some(DARK.to_vec()));
        }
        assert!(g1.show(&LIGHT).unwrap());
        assert_eq!(last(&controller), Some(LIGHT.to_vec()));
    }
    assert_eq!(controller.guard_count(), 0);
    assert_eq!(controller.winner_priority(), None);
}

#[test]
fn losing_guard_leaves_the_device_untouched() {
    let controller = controller();
    let background = controller.guard(0).unwrap();
    let foreground = controller.guard(1).unwrap();

    assert!(!background.show(&DARK).unwrap());
    assert!(controller.device().frames().is_empty());

    assert!(foreground.show(&LIGHT).unwrap());
    assert_eq!(controller.device().frames(), vec![LIGHT.to_vec()]);

    drop(foreground);
    assert!(background.show(&LIGHT).unwrap());
    assert_eq!(
        controller.device().frames(),
        vec![LIGHT.to_vec(), LIGHT.to_vec()]
    );
}

#[test]
fn controller_show_and_shutdown_bypass_guards() {
    let controller = controller();
    let _winner = controller.guard(9).unwrap();
    controller.show(&DARK).unwrap();
    controller.shutdown().unwrap();
    assert_eq!(controller.device().shutdowns(), 1);
    assert_eq!(controller.device().frames().len(), 2);
}

#[test]
fn guard_set_capacity_is_enforced() {
    let controller: DisplayController<_, 2> = DisplayController::new(RecordingDisplay::new(1));
    let first = controller.guard(0).unwrap();
    let _second = controller.guard(1).unwrap();
    assert!(matches!(
        controller.guard(2),
        Err(Error::TooManyGuards { max: 2 })
    ));
    assert_eq!(controller.winner_priority(), Some(1));

    drop(first);
    let third = controller.guard(2).unwrap();
    assert!(third.show(&LIGHT).unwrap());
}

#[test]
fn device_errors_reach_the_winner() {
    let strip = LedStrip::<_, 1>::new(RecordingTransmitter::failing(), 1, &PixelDriver::WS2812).unwrap();
    let controller: DisplayController<_> = DisplayController::new(strip);
    let loser = controller.guard(0).unwrap();
    let winner = controller.guard(1).unwrap();
    assert!(matches!(winner.show(&LIGHT), Err(Error::Transmit)));
    assert!(matches!(loser.show(&LIGHT), Ok(false)));
}

#[test]
fn winner_always_has_the_highest_live_priority() {
    let controller: DisplayController<_, 16> = DisplayController::new(RecordingDisplay::new(1));
    let mut guards: Vec<Option<DisplayGuard<'_, RecordingDisplay, 16>>> = Vec::new();
    let mut seed: u32 = 0x2545_F491;
    for _ in 0..500 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let roll = (seed >> 16) as usize;
        let live = guards.iter().filter(|guard| guard.is_some()).count();
        if live < 16 && roll % 3 != 0 {
            let priority = u8::try_from(roll % 5).unwrap();
            guards.push(Some(controller.guard(priority).unwrap()));
        } else if let Some(slot) = guards.iter_mut().filter(|guard| guard.is_some()).nth(roll % live.max(1)) {
            *slot = None;
        }

        let best = guards
            .iter()
            .flatten()
            .map(DisplayGuard::priority)
            .max();
        assert_eq!(controller.winner_priority(), best);
        assert_eq!(controller.guard_count(), guards.iter().flatten().count());

        let winners = guards
            .iter()
            .flatten()
            .filter(|guard| guard.show(&LIGHT).unwrap())
            .count();
        assert_eq!(winners, usize::from(best.is_some()));
    }
}

#[test]
fn concurrent_producers_only_highest_reaches_the_device() {
    const PRODUCERS: u8 = 4;
    const FRAMES: usize = 25;
    let controller = controller();
    let attached = Barrier::new(usize::from(PRODUCERS));
    let finished = Barrier::new(usize::from(PRODUCERS));

    let shown: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..PRODUCERS)
            .map(|priority| {
                let (controller, attached, finished) = (&controller, &attached, &finished);
                scope.spawn(move || {
                    let guard = controller.guard(priority).unwrap();
                    attached.wait();
                    let frame = [Pixel::new(priority, priority, priority)];
                    let shown = (0..FRAMES)
                        .filter(|_| guard.show(&frame).unwrap())
                        .count();
                    finished.wait();
                    shown
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(shown, vec![0, 0, 0, FRAMES]);
    let top = PRODUCERS - 1;
    let frames = controller.device().frames();
    assert_eq!(frames.len(), FRAMES);
    assert!(
        frames
            .iter()
            .all(|frame| frame == &[Pixel::new(top, top, top)])
    );
}

/// A transmitter that reports when a frame starts and then stays busy.
struct SlowTransmitter {
    started: Sender<()>,
    busy_for: Duration,
}

impl Transmit for SlowTransmitter {
    fn transmit(&mut self, _bytes: &[u8]) -> Result<()> {
        let _ = self.started.send(());
        Ok(())
    }

    fn block_until_idle(&mut self) -> Result<()> {
        thread::sleep(self.busy_for);
        Ok(())
    }
}

#[test]
fn losers_and_newcomers_do_not_wait_for_a_transmission() {
    const BUSY: Duration = Duration::from_millis(400);
    let (started, frame_started) = mpsc::channel();
    let transmitter = SlowTransmitter {
        started,
        busy_for: BUSY,
    };
    let strip = LedStrip::<_, 1>::new(transmitter, 1, &PixelDriver::WS2812).unwrap();
    let controller: DisplayController<_> = DisplayController::new(strip);
    let loser = controller.guard(1).unwrap();

    thread::scope(|scope| {
        let producer = scope.spawn(|| {
            let winner = controller.guard(5).unwrap();
            winner.show(&LIGHT).unwrap()
        });
        frame_started.recv().unwrap();

        let begin = Instant::now();
        assert!(!loser.show(&DARK).unwrap());
        let newcomer = controller.guard(3).unwrap();
        assert!(!newcomer.show(&DARK).unwrap());
        drop(newcomer);
        let elapsed = begin.elapsed();
        assert!(elapsed < BUSY / 4, "arbitration waited {elapsed:?} on the device");

        assert!(producer.join().unwrap());
    });
    assert!(loser.show(&DARK).unwrap());
}
