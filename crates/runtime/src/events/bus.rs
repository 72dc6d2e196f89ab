//! Topic-based event bus implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{MinionEvent, ProgressionEvent, SkillEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Experience, levels, titles and stat allocation
    Progression,
    /// Skill activation, rejection and upgrades
    Skill,
    /// Shadow soldier lifecycle
    Minion,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Progression, Topic::Skill, Topic::Minion];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Progression(ProgressionEvent),
    Skill(SkillEvent),
    Minion(MinionEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Progression(_) => Topic::Progression,
            Event::Skill(_) => Topic::Skill,
            Event::Minion(_) => Topic::Minion,
        }
    }
}

impl From<ProgressionEvent> for Event {
    fn from(event: ProgressionEvent) -> Self {
        Event::Progression(event)
    }
}

impl From<SkillEvent> for Event {
    fn from(event: SkillEvent) -> Self {
        Event::Skill(event)
    }
}

impl From<MinionEvent> for Event {
    fn from(event: MinionEvent) -> Self {
        Event::Minion(event)
    }
}

/// Topic-based event bus
///
/// Every topic owns one broadcast channel, created up front. Clones share
/// the same channels.
#[derive(Clone)]
pub struct EventBus {
    progression: broadcast::Sender<Event>,
    skill: broadcast::Sender<Event>,
    minion: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            progression: broadcast::channel(capacity).0,
            skill: broadcast::channel(capacity).0,
            minion: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Progression => &self.progression,
            Topic::Skill => &self.skill,
            Topic::Minion => &self.minion,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
