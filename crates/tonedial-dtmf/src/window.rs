//! Single-slot window handoff between the acquisition and detection contexts.
//!
//! Exactly one window is in flight at a time. The producer fills the slot one
//! sample at a time and publishes it by setting the readiness flag; the
//! consumer borrows the completed window, scans it, and clears the flag to
//! hand the storage back. The flag is the only shared mutable state, so no
//! locks are involved and neither side ever blocks.

use std::cell::UnsafeCell;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct Slot {
    samples: UnsafeCell<Box<[u8]>>,
    ready: AtomicBool,
}

// Safety: there is one producer handle and one consumer handle. The producer
// touches the sample storage only while `ready` is false and the consumer
// only while it is true. Each side publishes its accesses with a Release
// store of the flag, which the other side observes with an Acquire load
// before touching the storage.
unsafe impl Send for Slot {}
unsafe impl Sync for Slot {}

/// Create a window slot of `len` samples, returning the producer and
/// consumer halves of the handoff.
pub fn window_slot(len: usize) -> (WindowProducer, WindowConsumer) {
    assert!(len > 0, "window length must be non-zero");
    let slot = Arc::new(Slot {
        samples: UnsafeCell::new(vec![0u8; len].into_boxed_slice()),
        ready: AtomicBool::new(false),
    });
    (
        WindowProducer {
            slot: Arc::clone(&slot),
            len,
            fill: 0,
        },
        WindowConsumer { slot, len },
    )
}

/// Filling side of the handoff, owned by the acquisition context.
pub struct WindowProducer {
    slot: Arc<Slot>,
    len: usize,
    fill: usize,
}

impl WindowProducer {
    /// Push one sample. Writing the final slot publishes the window and
    /// rewinds the fill cursor. While the consumer still holds the window
    /// the sample is dropped and `false` returned; overrun is a drop
    /// policy here, not an error.
    pub fn push(&mut self, sample: u8) -> bool {
        if self.slot.ready.load(Ordering::Acquire) {
            return false;
        }
        let samples = unsafe { &mut *self.slot.samples.get() };
        samples[self.fill] = sample;
        self.fill += 1;
        if self.fill == self.len {
            self.fill = 0;
            self.slot.ready.store(true, Ordering::Release);
        }
        true
    }

    /// Push a run of samples, dropping whatever does not fit.
    /// Returns the number accepted.
    pub fn extend(&mut self, samples: &[u8]) -> usize {
        let mut accepted = 0;
        for &sample in samples {
            if self.push(sample) {
                accepted += 1;
            }
        }
        accepted
    }

    /// Length of the window this producer fills.
    pub fn window_len(&self) -> usize {
        self.len
    }
}

/// Scanning side of the handoff, owned by the detection context.
pub struct WindowConsumer {
    slot: Arc<Slot>,
    len: usize,
}

impl WindowConsumer {
    /// Non-blocking poll for a completed window. `None` means the producer
    /// is still filling; the caller is expected to try again later.
    pub fn try_acquire(&mut self) -> Option<Window<'_>> {
        if !self.slot.ready.load(Ordering::Acquire) {
            return None;
        }
        Some(Window { consumer: self })
    }

    /// Whether a completed window is currently waiting.
    pub fn is_ready(&self) -> bool {
        self.slot.ready.load(Ordering::Acquire)
    }

    /// Length of the windows this consumer receives.
    pub fn window_len(&self) -> usize {
        self.len
    }
}

/// A completed window on loan from the producer. Dropping it clears the
/// readiness flag, handing the storage back for refilling.
pub struct Window<'a> {
    consumer: &'a WindowConsumer,
}

impl Deref for Window<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        unsafe { &*self.consumer.slot.samples.get() }
    }
}

impl Drop for Window<'_> {
    fn drop(&mut self) {
        self.consumer.slot.ready.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_publishes_after_final_sample() {
        let (mut producer, mut consumer) = window_slot(4);
        for value in 0..3 {
            assert!(producer.push(value));
            assert!(!consumer.is_ready());
        }
        assert!(producer.push(3));
        assert!(consumer.is_ready());

        let window = consumer.try_acquire().expect("window ready");
        assert_eq!(&window[..], &[0, 1, 2, 3]);
    }

    #[test]
    fn producer_drops_samples_while_window_is_held() {
        let (mut producer, mut consumer) = window_slot(2);
        assert_eq!(producer.extend(&[10, 20]), 2);

        // Slot is published; everything pushed now must be discarded.
        assert!(!producer.push(30));
        assert_eq!(producer.extend(&[40, 50]), 0);

        let window = consumer.try_acquire().expect("window ready");
        assert_eq!(&window[..], &[10, 20]);
        drop(window);

        // Released: filling resumes from index 0.
        assert_eq!(producer.extend(&[60, 70]), 2);
        let window = consumer.try_acquire().expect("window ready");
        assert_eq!(&window[..], &[60, 70]);
    }

    #[test]
    fn try_acquire_is_a_non_blocking_poll() {
        let (mut producer, mut consumer) = window_slot(3);
        assert!(consumer.try_acquire().is_none());
        producer.push(1);
        assert!(consumer.try_acquire().is_none());
    }

    #[test]
    fn handoff_crosses_threads() {
        let (mut producer, mut consumer) = window_slot(8);
        let filler = std::thread::spawn(move || {
            for value in 0..8u8 {
                assert!(producer.push(value));
            }
        });

        let window = loop {
            if let Some(window) = consumer.try_acquire() {
                break window.to_vec();
            }
            std::thread::yield_now();
        };
        assert_eq!(window, (0..8).collect::<Vec<u8>>());
        filler.join().unwrap();
    }
}
