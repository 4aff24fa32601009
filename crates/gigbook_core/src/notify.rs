//! View-invalidation and toast notifications.
//!
//! # Responsibility
//! - Fan out notifications from services to any number of listeners.
//! - Carry coarse invalidation scopes; listeners re-read and recompute.
//!
//! # Invariants
//! - Publishing never blocks and never fails the mutation that triggered it.
//! - Dropped receivers are pruned on the next publish.

use crate::model::event::EventId;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Which cached view must be re-read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewScope {
    /// Event lists, dashboard and finance views.
    Events,
    /// The checklist of one event.
    Checklist(EventId),
    /// Template list.
    Templates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Invalidated(ViewScope),
    Toast { level: ToastLevel, message: String },
}

/// In-process broadcast bus shared by the services.
#[derive(Debug, Clone, Default)]
pub struct NotificationBus {
    subscribers: Arc<Mutex<Vec<Sender<Notification>>>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<Notification> {
        let (sender, receiver) = channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(sender);
        }
        receiver
    }

    /// Sends to every live subscriber; returns how many received it.
    pub fn publish(&self, notification: Notification) -> usize {
        let Ok(mut subscribers) = self.subscribers.lock() else {
            return 0;
        };
        subscribers.retain(|sender| sender.send(notification.clone()).is_ok());
        subscribers.len()
    }

    pub fn invalidate(&self, scope: ViewScope) -> usize {
        self.publish(Notification::Invalidated(scope))
    }

    pub fn toast(&self, level: ToastLevel, message: impl Into<String>) -> usize {
        self.publish(Notification::Toast {
            level,
            message: message.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Notification, NotificationBus, ToastLevel, ViewScope};

    #[test]
    fn publish_reaches_every_subscriber_and_prunes_dropped_ones() {
        let bus = NotificationBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        assert_eq!(bus.invalidate(ViewScope::Events), 2);
        assert_eq!(
            first.try_recv().unwrap(),
            Notification::Invalidated(ViewScope::Events)
        );
        assert_eq!(
            second.try_recv().unwrap(),
            Notification::Invalidated(ViewScope::Events)
        );

        drop(second);
        assert_eq!(bus.toast(ToastLevel::Success, "saved"), 1);
        assert_eq!(
            first.try_recv().unwrap(),
            Notification::Toast {
                level: ToastLevel::Success,
                message: "saved".to_string()
            }
        );
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        assert_eq!(NotificationBus::new().invalidate(ViewScope::Templates), 0);
    }
}
