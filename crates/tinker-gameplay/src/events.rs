//! Event bus for notifying presentation layers about crafting changes.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};

use tinker_common::{ItemId, RecipeId};

/// Default event bus capacity.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Event types that can be sent through the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CraftEvent {
    /// The pending craft result changed
    ResultChanged {
        /// New result item, if any
        result: Option<ItemId>,
    },
    /// A craft was committed
    ItemCrafted {
        /// Recipe used
        recipe_id: RecipeId,
        /// Item produced
        item_id: ItemId,
    },
    /// An item was crafted for the first time
    ItemDiscovered {
        /// Item discovered
        item_id: ItemId,
    },
    /// The final item was crafted
    GameWon {
        /// The final item
        item_id: ItemId,
    },
    /// Everything was reset
    GameReset,
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<CraftEvent>,
    /// Receiver for collecting events
    receiver: Receiver<CraftEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event to the bus.
    ///
    /// Never blocks. When the bus is full the oldest pending event is
    /// dropped to make room.
    pub fn publish(&self, mut event: CraftEvent) {
        loop {
            match self.sender.try_send(event) {
                Ok(()) | Err(TrySendError::Disconnected(_)) => return,
                Err(TrySendError::Full(rejected)) => {
                    let _ = self.receiver.try_recv();
                    event = rejected;
                },
            }
        }
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<CraftEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a receiver handle for a subscriber.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<CraftEvent> {
        self.receiver.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(4);
        bus.publish(CraftEvent::GameReset);
        bus.publish(CraftEvent::ResultChanged { result: None });
        assert_eq!(bus.pending_count(), 2);

        let events = bus.drain();
        assert_eq!(events[0], CraftEvent::GameReset);
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_keeps_newest_events() {
        let bus = EventBus::new(2);
        for _ in 0..10 {
            bus.publish(CraftEvent::ResultChanged { result: None });
        }
        bus.publish(CraftEvent::GameReset);

        let events = bus.drain();
        assert_eq!(
            events,
            vec![CraftEvent::ResultChanged { result: None }, CraftEvent::GameReset]
        );
    }

    #[test]
    fn test_zero_capacity_clamped() {
        assert_eq!(EventBus::new(0).capacity(), 1);
    }
}
