//! Cross-Context Messenger for ChatLens.
//!
//! A broadcast queue connecting the three extension contexts. A send
//! enqueues one envelope; delivery (performed by the router) hands the
//! message to every context except the sender, at most once each, in FIFO
//! order. There is no ordering guarantee across contexts beyond the queue
//! itself and no cancellation of queued envelopes.

use std::collections::VecDeque;

use uuid::Uuid;

use crate::types::message::{Context, Message};

/// A queued message together with its origin.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub id: String,
    pub from: Context,
    pub message: Message,
}

impl Envelope {
    /// Contexts this envelope is delivered to: everyone but the sender.
    pub fn targets(&self) -> Vec<Context> {
        Context::ALL
            .iter()
            .copied()
            .filter(|c| *c != self.from)
            .collect()
    }
}

/// Trait defining the messenger interface.
pub trait MessengerTrait {
    /// Enqueues a broadcast from `from` to the other two contexts.
    fn send(&mut self, from: Context, message: Message);
    /// Drains every queued envelope in FIFO order.
    fn drain(&mut self) -> Vec<Envelope>;
    fn pending(&self) -> usize;
}

/// In-process messenger backed by a FIFO queue.
pub struct Messenger {
    queue: VecDeque<Envelope>,
}

impl Messenger {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl Default for Messenger {
    fn default() -> Self {
        Self::new()
    }
}

impl MessengerTrait for Messenger {
    fn send(&mut self, from: Context, message: Message) {
        self.queue.push_back(Envelope {
            id: Uuid::new_v4().to_string(),
            from,
            message,
        });
    }

    fn drain(&mut self) -> Vec<Envelope> {
        self.queue.drain(..).collect()
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}
