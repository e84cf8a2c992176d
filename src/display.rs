//! A module for sharing one display between several producers by priority.
//!
//! Each producer takes a [`DisplayGuard`] from a [`DisplayController`] with a
//! priority (higher wins). Every producer keeps rendering and calling
//! [`DisplayGuard::show`], but only the current *winner's* frames reach the
//! device; everyone else's `show` returns `Ok(false)` right away. When the
//! winner drops its guard, the next highest-priority guard takes over.
//!
//! Nobody ever waits on anybody else: the controller's lock covers only the
//! guard bookkeeping and the winner comparison. The device call happens after
//! that lock is released; devices serialize their own transmissions.
//!
//! Among guards of equal priority the one attached first wins. The live set
//! keeps attach order, so this still holds after other guards detach.
//! [`DisplayGuard::reacquire`] counts as a fresh attach.
//!
//! # Example
//!
//! ```rust
//! use led_envoy::display::DisplayController;
//! use led_envoy::led_strip_host::RecordingDisplay;
//! use led_envoy::pixel::colors;
//!
//! # fn main() -> led_envoy::Result<()> {
//! let controller: DisplayController<_> = DisplayController::new(RecordingDisplay::new(1));
//!
//! let background = controller.guard(0)?;
//! {
//!     let alert = controller.guard(1)?;
//!     assert!(!background.show(&[colors::BLACK])?); // muted
//!     assert!(alert.show(&[colors::WHITE])?);
//! } // alert dropped here
//! assert!(background.show(&[colors::WHITE])?);
//!
//! assert_eq!(controller.device().frames().len(), 2);
//! # Ok(())
//! # }
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use heapless::Vec;

use crate::pixel::Pixel;
use crate::{Error, Result};

/// A device that can show a whole frame of pixels.
///
/// Implemented by [`LedStrip`](crate::led_strip::LedStrip),
/// [`LedMatrix`](crate::led2d::LedMatrix), and the host-side
/// `RecordingDisplay` test double.
pub trait PixelDisplay {
    /// Show `pixels` (canonical order), blocking until sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transmit`] if the hardware fails.
    fn display(&self, pixels: &[Pixel]) -> Result<()>;

    /// Turn every LED off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transmit`] if the hardware fails.
    fn shutdown(&self) -> Result<()>;

    /// Number of LEDs.
    fn len(&self) -> usize;

    /// True for a device with no LEDs.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Guard priority. Higher is more important.
pub type Priority = u8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct GuardEntry {
    id: u32,
    priority: Priority,
}

struct Arbitration<const MAX_GUARDS: usize> {
    // Attach order.
    live: Vec<GuardEntry, MAX_GUARDS>,
    winner: Option<GuardEntry>,
    next_id: u32,
}

impl<const MAX_GUARDS: usize> Arbitration<MAX_GUARDS> {
    const fn new() -> Self {
        Self {
            live: Vec::new(),
            winner: None,
            next_id: 0,
        }
    }

    /// First entry with the highest priority.
    fn rescan(&mut self) {
        let mut best: Option<GuardEntry> = None;
        for entry in &self.live {
            if best.is_none_or(|best| entry.priority > best.priority) {
                best = Some(*entry);
            }
        }
        self.set_winner(best);
    }

    fn set_winner(&mut self, winner: Option<GuardEntry>) {
        if winner != self.winner {
            match winner {
                Some(entry) => info!(
                    "DisplayController: guard {} (priority {}) now holds the display",
                    entry.id,
                    entry.priority
                ),
                None => info!("DisplayController: no guards left"),
            }
        }
        self.winner = winner;
    }

    /// Remove `id`, keeping the attach order of the rest.
    fn remove(&mut self, id: u32) {
        let position = self.live.iter().position(|entry| entry.id == id);
        assert!(
            position.is_some(),
            "display guard {id} is not attached to this controller"
        );
        if let Some(tail) = position.and_then(|position| self.live.get_mut(position..)) {
            tail.rotate_left(1);
            self.live.pop();
        }
    }
}

/// Arbitrates one [`PixelDisplay`] among up to `MAX_GUARDS` live [`DisplayGuard`]s.
///
/// The controller must outlive its guards (enforced by the guard's borrow).
pub struct DisplayController<D, const MAX_GUARDS: usize = 8> {
    device: D,
    arbitration: Mutex<CriticalSectionRawMutex, RefCell<Arbitration<MAX_GUARDS>>>,
}

impl<D: PixelDisplay, const MAX_GUARDS: usize> DisplayController<D, MAX_GUARDS> {
    /// Take ownership of `device`.
    #[must_use]
    pub const fn new(device: D) -> Self {
        Self {
            device,
            arbitration: Mutex::new(RefCell::new(Arbitration::new())),
        }
    }

    /// The device being arbitrated.
    #[must_use]
    pub const fn device(&self) -> &D {
        &self.device
    }

    /// Show `pixels` unconditionally, ignoring every guard.
    ///
    /// # Errors
    ///
    /// Propagates device failures.
    pub fn show(&self, pixels: &[Pixel]) -> Result<()> {
        self.device.display(pixels)
    }

    /// Turn the device off, ignoring every guard.
    ///
    /// # Errors
    ///
    /// Propagates device failures.
    pub fn shutdown(&self) -> Result<()> {
        self.device.shutdown()
    }

    /// Register a producer with `priority`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyGuards`] if `MAX_GUARDS` guards are already live.
    pub fn guard(&self, priority: Priority) -> Result<DisplayGuard<'_, D, MAX_GUARDS>> {
        let id = self.attach(priority)?;
        Ok(DisplayGuard {
            controller: self,
            id,
            priority,
        })
    }

    /// Priority of the guard currently holding the display, if any.
    #[must_use]
    pub fn winner_priority(&self) -> Option<Priority> {
        self.arbitration
            .lock(|cell| cell.borrow().winner.map(|entry| entry.priority))
    }

    /// Number of live guards.
    #[must_use]
    pub fn guard_count(&self) -> usize {
        self.arbitration.lock(|cell| cell.borrow().live.len())
    }

    fn attach(&self, priority: Priority) -> Result<u32> {
        self.arbitration.lock(|cell| {
            let mut arbitration = cell.borrow_mut();
            let id = arbitration.next_id;
            let entry = GuardEntry { id, priority };
            if arbitration.live.push(entry).is_err() {
                warn!(
                    "DisplayController: guard set full ({}), priority {} rejected",
                    MAX_GUARDS,
                    priority
                );
                return Err(Error::TooManyGuards { max: MAX_GUARDS });
            }
            arbitration.next_id = id.wrapping_add(1);
            debug!("DisplayController: guard {} attached at priority {}", id, priority);
            if arbitration
                .winner
                .is_none_or(|winner| priority > winner.priority)
            {
                arbitration.set_winner(Some(entry));
            }
            Ok(id)
        })
    }

    fn detach(&self, id: u32) {
        self.arbitration.lock(|cell| {
            let mut arbitration = cell.borrow_mut();
            arbitration.remove(id);
            debug!("DisplayController: guard {} detached", id);
            arbitration.rescan();
        });
    }

    fn reattach(&self, id: u32, priority: Priority) {
        self.arbitration.lock(|cell| {
            let mut arbitration = cell.borrow_mut();
            arbitration.remove(id);
            // Capacity is available: one entry was just removed.
            let _ = arbitration.live.push(GuardEntry { id, priority });
            debug!("DisplayController: guard {} reattached at priority {}", id, priority);
            arbitration.rescan();
        });
    }

    fn display_if_winner(&self, id: u32, pixels: &[Pixel]) -> Result<bool> {
        let is_winner = self.arbitration.lock(|cell| {
            cell.borrow()
                .winner
                .is_some_and(|winner| winner.id == id)
        });
        if is_winner {
            self.device.display(pixels)?;
        }
        Ok(is_winner)
    }
}

/// A producer's claim on a [`DisplayController`].
///
/// Attached on creation, detached on drop. Guards are not `Clone`: each one is
/// a distinct entry in the controller's live set, identified by an opaque id,
/// so moving a guard is fine.
pub struct DisplayGuard<'a, D: PixelDisplay, const MAX_GUARDS: usize = 8> {
    controller: &'a DisplayController<D, MAX_GUARDS>,
    id: u32,
    priority: Priority,
}

impl<D: PixelDisplay, const MAX_GUARDS: usize> DisplayGuard<'_, D, MAX_GUARDS> {
    /// Show `pixels` if this guard holds the display.
    ///
    /// Returns `Ok(false)` without touching the device if another guard wins.
    ///
    /// # Errors
    ///
    /// Propagates device failures.
    pub fn show(&self, pixels: &[Pixel]) -> Result<bool> {
        self.controller.display_if_winner(self.id, pixels)
    }

    /// This guard's priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Change priority, detaching and re-attaching as one step.
    ///
    /// The guard then ranks as the most recently attached among its priority.
    /// Nothing happens if `priority` is unchanged.
    pub fn reacquire(&mut self, priority: Priority) {
        if priority == self.priority {
            return;
        }
        self.controller.reattach(self.id, priority);
        self.priority = priority;
    }
}

impl<D: PixelDisplay, const MAX_GUARDS: usize> Drop for DisplayGuard<'_, D, MAX_GUARDS> {
    fn drop(&mut self) {
        self.controller.detach(self.id);
    }
}
