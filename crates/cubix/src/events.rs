//! # Client Event Bus
//!
//! The only way for work running off the orchestration thread to reach game
//! state.
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌──────────────────┐
//! │  Network    │─────>│   Event     │─────>│   Main loop      │
//! │  Window     │      │   Channel   │      │  (drained once   │
//! │  Input      │─────>│  (bounded)  │      │   per frame)     │
//! └─────────────┘      └─────────────┘      └──────────────────┘
//! ```
//!
//! Senders are `Send` and cheap to clone. The receiver stays with the game.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use cubix_shared::{BlockId, FpsLimitMethod};
use tracing::warn;

/// Default number of events in flight.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Events applied by the main loop at the start of a frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientEvent {
    // =========================================================================
    // Window
    // =========================================================================
    /// The window client area changed size.
    Resized,
    /// The user asked to close the window.
    CloseRequested,
    /// Take a screenshot at the end of the frame.
    ScreenshotRequested,
    /// Switch frame pacing strategy.
    SetFpsLimit(FpsLimitMethod),

    // =========================================================================
    // Network
    // =========================================================================
    /// The server changed a block. Already known by the peer, so it is
    /// applied locally only.
    BlockReceived {
        /// X coordinate.
        x: i32,
        /// Y coordinate.
        y: i32,
        /// Z coordinate.
        z: i32,
        /// New block.
        block: BlockId,
    },
    /// A new map began loading.
    MapLoading,
    /// The new map finished loading.
    MapLoaded,
    /// The connection ended.
    Disconnected {
        /// Screen title.
        title: String,
        /// Reason shown below the title.
        reason: String,
    },

    // =========================================================================
    // Process
    // =========================================================================
    /// Leave the main loop.
    Quit,
}

/// Bounded channel carrying [`ClientEvent`]s.
pub struct EventBus {
    sender: Sender<ClientEvent>,
    receiver: Receiver<ClientEvent>,
}

impl EventBus {
    /// Creates a bus holding up to `capacity` pending events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle (clone for multiple producers).
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Takes every pending event without blocking.
    #[must_use]
    pub fn drain(&self) -> Vec<ClientEvent> {
        self.receiver.try_iter().collect()
    }

    /// Number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

/// Handle for sending events, usable from any thread.
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: Sender<ClientEvent>,
}

impl EventSender {
    /// Sends an event without blocking.
    ///
    /// Returns `false` if the channel is full or the game is gone; the event
    /// is dropped in that case.
    #[inline]
    pub fn send(&self, event: ClientEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                warn!(?event, "event queue full, dropping event");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Sends an event, waiting for room if the channel is full.
    ///
    /// Use only for events that must be delivered (disconnects).
    #[inline]
    pub fn send_blocking(&self, event: ClientEvent) -> bool {
        self.sender.send(event).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_drain_in_order() {
        let bus = EventBus::new(16);
        let sender = bus.sender();
        assert!(sender.send(ClientEvent::MapLoading));
        assert!(sender.send(ClientEvent::MapLoaded));
        assert_eq!(bus.pending_count(), 2);
        assert_eq!(bus.drain(), vec![ClientEvent::MapLoading, ClientEvent::MapLoaded]);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_queue_drops() {
        let bus = EventBus::new(1);
        let sender = bus.sender();
        assert!(sender.send(ClientEvent::Resized));
        assert!(!sender.send(ClientEvent::Quit));
        assert_eq!(bus.drain(), vec![ClientEvent::Resized]);
    }

    #[test]
    fn test_sender_crosses_threads() {
        let bus = EventBus::new(16);
        let sender = bus.sender();
        let handle = std::thread::spawn(move || {
            sender.send_blocking(ClientEvent::BlockReceived {
                x: 1,
                y: 2,
                z: 3,
                block: 4,
            })
        });
        assert!(handle.join().unwrap_or(false));
        assert_eq!(bus.drain().len(), 1);
    }
}
