//! Lifecycle events for categories.
//!
//! Events are fire-and-forget: publishers never learn whether anyone was
//! listening.

use tokio::sync::broadcast;

use crate::category::Category;

/// Events emitted around category deletion.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryEvent {
    /// The category passed validation and is about to be deleted.
    Deleting(Category),
    /// The category was deleted. Carries the last known state of the category.
    Deleted(Category),
}

impl CategoryEvent {
    /// The name of the event, e.g. for logging.
    pub fn event_type(&self) -> &'static str {
        match self {
            CategoryEvent::Deleting(_) => "category:deleting",
            CategoryEvent::Deleted(_) => "category:deleted",
        }
    }

    /// The category the event is about.
    pub fn category(&self) -> &Category {
        match self {
            CategoryEvent::Deleting(category) | CategoryEvent::Deleted(category) => category,
        }
    }
}

/// Delivers category events to whoever is interested.
pub trait EventBus {
    /// Publish an event.
    fn publish(&self, event: CategoryEvent);
}

/// Default capacity of the broadcast channel.
const CHANNEL_CAPACITY: usize = 128;

/// An event bus backed by a tokio broadcast channel.
///
/// Subscribers that fall too far behind miss the oldest events.
#[derive(Debug, Clone)]
pub struct BroadcastEventBus {
    sender: broadcast::Sender<CategoryEvent>,
}

impl BroadcastEventBus {
    /// Create an event bus with the default channel capacity.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);

        Self { sender }
    }

    /// Receive the events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CategoryEvent> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for BroadcastEventBus {
    fn publish(&self, event: CategoryEvent) {
        tracing::debug!(
            "publishing {} for category {}",
            event.event_type(),
            event.category().id
        );
        // An error only means there are no subscribers.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod broadcast_event_bus_tests {
    use crate::category::{Category, CategoryName, CategoryType};

    use super::{BroadcastEventBus, CategoryEvent, EventBus};

    fn category() -> Category {
        Category {
            id: 7,
            company_id: 1,
            name: CategoryName::new_unchecked("Rent"),
            category_type: CategoryType::Expense,
            parent_id: None,
        }
    }

    #[test]
    fn publish_without_subscribers_does_not_panic() {
        let bus = BroadcastEventBus::new();

        bus.publish(CategoryEvent::Deleted(category()));
    }

    #[test]
    fn subscriber_receives_events_in_order() {
        let bus = BroadcastEventBus::new();
        let mut receiver = bus.subscribe();

        bus.publish(CategoryEvent::Deleting(category()));
        bus.publish(CategoryEvent::Deleted(category()));

        assert_eq!(receiver.try_recv(), Ok(CategoryEvent::Deleting(category())));
        assert_eq!(receiver.try_recv(), Ok(CategoryEvent::Deleted(category())));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn event_types_are_namespaced() {
        assert_eq!(
            CategoryEvent::Deleting(category()).event_type(),
            "category:deleting"
        );
        assert_eq!(
            CategoryEvent::Deleted(category()).event_type(),
            "category:deleted"
        );
    }
}
