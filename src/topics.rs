//! Per-topic subscriber index
//!
//! Pure storage and identity: a bounded set of named topics, each holding
//! the ids of its subscribed handlers in registration order. All mutation
//! goes through the registration and removal paths in
//! [`LogRouter`](crate::LogRouter), so every stored id always refers to a
//! currently registered handler.

use crate::error::{Error, Result};
use crate::handlers::HandlerId;

/// Topic name
///
/// A named routing channel with a maximum length. Identity is the name
/// itself; comparison is exact (no wildcards).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TopicName<const MAX_TOPIC_NAME_LENGTH: usize>(
    heapless::String<MAX_TOPIC_NAME_LENGTH>,
);

impl<const MAX_TOPIC_NAME_LENGTH: usize> TopicName<MAX_TOPIC_NAME_LENGTH> {
    pub const fn new(name: heapless::String<MAX_TOPIC_NAME_LENGTH>) -> Self {
        TopicName(name)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl<const MAX_TOPIC_NAME_LENGTH: usize> From<heapless::String<MAX_TOPIC_NAME_LENGTH>>
    for TopicName<MAX_TOPIC_NAME_LENGTH>
{
    fn from(name: heapless::String<MAX_TOPIC_NAME_LENGTH>) -> Self {
        TopicName(name)
    }
}

impl<const MAX_TOPIC_NAME_LENGTH: usize> TryFrom<&str> for TopicName<MAX_TOPIC_NAME_LENGTH> {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        let name = heapless::String::try_from(value).map_err(|_| {
            Error::TopicNameLengthExceeded {
                max_length: MAX_TOPIC_NAME_LENGTH,
                actual_length: value.len(),
            }
        })?;
        Ok(TopicName(name))
    }
}

impl<const MAX_TOPIC_NAME_LENGTH: usize> core::fmt::Display for TopicName<MAX_TOPIC_NAME_LENGTH> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One topic and its subscribers, in subscription order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TopicEntry<const MAX_TOPIC_NAME_LENGTH: usize, const MAX_SUBSCRIBERS_PER_TOPIC: usize> {
    topic_name: TopicName<MAX_TOPIC_NAME_LENGTH>,
    subscribers: heapless::Vec<HandlerId, MAX_SUBSCRIBERS_PER_TOPIC>,
}

impl<const MAX_TOPIC_NAME_LENGTH: usize, const MAX_SUBSCRIBERS_PER_TOPIC: usize>
    TopicEntry<MAX_TOPIC_NAME_LENGTH, MAX_SUBSCRIBERS_PER_TOPIC>
{
    fn new(topic_name: TopicName<MAX_TOPIC_NAME_LENGTH>) -> Self {
        Self {
            topic_name,
            subscribers: heapless::Vec::new(),
        }
    }

    fn add_subscriber(&mut self, id: HandlerId) -> Result<()> {
        if self.subscribers.contains(&id) {
            return Ok(());
        }
        self.subscribers
            .push(id)
            .map_err(|_| Error::MaxSubscribersPerTopicReached {
                max_subscribers: MAX_SUBSCRIBERS_PER_TOPIC,
            })
    }

    /// Removes `id`, left-compacting the remaining subscribers.
    fn remove_subscriber(&mut self, id: HandlerId) -> bool {
        if let Some(pos) = self.subscribers.iter().position(|s| *s == id) {
            self.subscribers.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.subscribers.is_full()
    }

    pub fn topic_name(&self) -> &TopicName<MAX_TOPIC_NAME_LENGTH> {
        &self.topic_name
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn subscribers(&self) -> &[HandlerId] {
        &self.subscribers
    }
}

/// Bounded index of topics and their subscriber lists.
///
/// Entries are created on first subscription and pruned when their last
/// subscriber leaves; a topic with no subscribers costs nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicRegistry<
    const MAX_TOPIC_NAME_LENGTH: usize,
    const MAX_TOPICS: usize,
    const MAX_SUBSCRIBERS_PER_TOPIC: usize,
> {
    topics: heapless::Vec<
        TopicEntry<MAX_TOPIC_NAME_LENGTH, MAX_SUBSCRIBERS_PER_TOPIC>,
        MAX_TOPICS,
    >,
}

impl<
        const MAX_TOPIC_NAME_LENGTH: usize,
        const MAX_TOPICS: usize,
        const MAX_SUBSCRIBERS_PER_TOPIC: usize,
    > TopicRegistry<MAX_TOPIC_NAME_LENGTH, MAX_TOPICS, MAX_SUBSCRIBERS_PER_TOPIC>
{
    /// Checks that every name in `names` can accept one more subscriber,
    /// without mutating anything. Names must already be deduplicated.
    pub(crate) fn check_capacity_for(
        &self,
        names: &[TopicName<MAX_TOPIC_NAME_LENGTH>],
    ) -> Result<()> {
        let mut new_topics_needed = 0;
        for name in names {
            match self.topics.iter().find(|t| t.topic_name == *name) {
                Some(entry) => {
                    if entry.is_full() {
                        return Err(Error::MaxSubscribersPerTopicReached {
                            max_subscribers: MAX_SUBSCRIBERS_PER_TOPIC,
                        });
                    }
                }
                None => new_topics_needed += 1,
            }
        }
        if self.topics.len() + new_topics_needed > MAX_TOPICS {
            return Err(Error::MaxTopicsReached {
                max_topics: MAX_TOPICS,
            });
        }
        Ok(())
    }

    pub(crate) fn subscribe(
        &mut self,
        id: HandlerId,
        name: TopicName<MAX_TOPIC_NAME_LENGTH>,
    ) -> Result<()> {
        if let Some(entry) = self.topics.iter_mut().find(|t| t.topic_name == name) {
            entry.add_subscriber(id)
        } else {
            let mut new_entry = TopicEntry::new(name);
            new_entry.add_subscriber(id)?;
            self.topics.push(new_entry).map_err(|_| Error::MaxTopicsReached {
                max_topics: MAX_TOPICS,
            })
        }
    }

    /// Removes `id` from `name`'s subscriber list, pruning the entry if it
    /// becomes empty.
    pub(crate) fn unsubscribe(
        &mut self,
        id: HandlerId,
        name: &TopicName<MAX_TOPIC_NAME_LENGTH>,
    ) -> bool {
        let topic_idx = self.topics.iter().position(|e| e.topic_name == *name);

        if let Some(idx) = topic_idx {
            let removed = self.topics[idx].remove_subscriber(id);

            if self.topics[idx].is_empty() {
                self.topics.remove(idx);
            }

            removed
        } else {
            false
        }
    }

    pub(crate) fn clear_all(&mut self) {
        self.topics.clear();
    }

    /// Subscribers of `topic` in subscription order; empty if the topic is
    /// unknown.
    pub fn subscribers(&self, topic: &str) -> &[HandlerId] {
        self.topics
            .iter()
            .find(|t| t.topic_name.as_str() == topic)
            .map(|t| t.subscribers())
            .unwrap_or(&[])
    }

    pub fn get(
        &self,
        topic: &str,
    ) -> Option<&TopicEntry<MAX_TOPIC_NAME_LENGTH, MAX_SUBSCRIBERS_PER_TOPIC>> {
        self.topics.iter().find(|t| t.topic_name.as_str() == topic)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn subscription_count(&self) -> usize {
        self.topics.iter().map(|t| t.subscribers.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> HandlerId {
        HandlerId::new(raw)
    }

    fn name(raw: &str) -> TopicName<32> {
        TopicName::try_from(raw).unwrap()
    }

    #[test]
    fn test_subscribe_creates_topic_on_first_use() {
        let mut registry = TopicRegistry::<32, 4, 4>::default();

        registry.subscribe(id(1), name("NET")).unwrap();

        assert_eq!(registry.topic_count(), 1);
        assert_eq!(registry.subscribers("NET"), &[id(1)]);
        assert!(registry.subscribers("SYS").is_empty());
    }

    #[test]
    fn test_subscribe_is_idempotent_per_handler() {
        let mut registry = TopicRegistry::<32, 4, 4>::default();

        registry.subscribe(id(1), name("NET")).unwrap();
        registry.subscribe(id(1), name("NET")).unwrap();

        assert_eq!(registry.subscription_count(), 1);
    }

    #[test]
    fn test_subscribers_keep_subscription_order() {
        let mut registry = TopicRegistry::<32, 4, 4>::default();

        registry.subscribe(id(3), name("NET")).unwrap();
        registry.subscribe(id(1), name("NET")).unwrap();
        registry.subscribe(id(2), name("NET")).unwrap();

        assert_eq!(registry.subscribers("NET"), &[id(3), id(1), id(2)]);
    }

    #[test]
    fn test_unsubscribe_compacts_and_preserves_order() {
        let mut registry = TopicRegistry::<32, 4, 4>::default();

        registry.subscribe(id(1), name("NET")).unwrap();
        registry.subscribe(id(2), name("NET")).unwrap();
        registry.subscribe(id(3), name("NET")).unwrap();

        assert!(registry.unsubscribe(id(2), &name("NET")));
        assert_eq!(registry.subscribers("NET"), &[id(1), id(3)]);

        assert!(!registry.unsubscribe(id(2), &name("NET")));
    }

    #[test]
    fn test_empty_topic_is_pruned() {
        let mut registry = TopicRegistry::<32, 4, 4>::default();

        registry.subscribe(id(1), name("NET")).unwrap();
        registry.unsubscribe(id(1), &name("NET"));

        assert_eq!(registry.topic_count(), 0);
    }

    #[test]
    fn test_subscriber_capacity_is_enforced() {
        let mut registry = TopicRegistry::<32, 4, 2>::default();

        registry.subscribe(id(1), name("NET")).unwrap();
        registry.subscribe(id(2), name("NET")).unwrap();

        let err = registry.subscribe(id(3), name("NET")).unwrap_err();
        assert_eq!(
            err,
            Error::MaxSubscribersPerTopicReached { max_subscribers: 2 }
        );
    }

    #[test]
    fn test_topic_capacity_is_enforced() {
        let mut registry = TopicRegistry::<32, 2, 4>::default();

        registry.subscribe(id(1), name("A")).unwrap();
        registry.subscribe(id(1), name("B")).unwrap();

        let err = registry.subscribe(id(1), name("C")).unwrap_err();
        assert_eq!(err, Error::MaxTopicsReached { max_topics: 2 });
    }

    #[test]
    fn test_check_capacity_counts_new_topics() {
        let mut registry = TopicRegistry::<32, 2, 4>::default();
        registry.subscribe(id(1), name("A")).unwrap();

        // One slot left, two new topics requested.
        let wanted = [name("B"), name("C")];
        let err = registry.check_capacity_for(&wanted).unwrap_err();
        assert_eq!(err, Error::MaxTopicsReached { max_topics: 2 });

        // Existing topic plus one new one fits.
        let wanted = [name("A"), name("B")];
        registry.check_capacity_for(&wanted).unwrap();
        assert_eq!(registry.topic_count(), 1);
    }

    #[test]
    fn test_check_capacity_detects_full_subscriber_list() {
        let mut registry = TopicRegistry::<32, 4, 1>::default();
        registry.subscribe(id(1), name("A")).unwrap();

        let wanted = [name("A")];
        let err = registry.check_capacity_for(&wanted).unwrap_err();
        assert_eq!(
            err,
            Error::MaxSubscribersPerTopicReached { max_subscribers: 1 }
        );
    }

    #[test]
    fn test_topic_name_length_is_enforced() {
        let err = TopicName::<4>::try_from("TOOLONG").unwrap_err();
        assert_eq!(
            err,
            Error::TopicNameLengthExceeded {
                max_length: 4,
                actual_length: 7,
            }
        );
    }

    #[test]
    fn test_topic_names_match_exactly() {
        let mut registry = TopicRegistry::<32, 4, 4>::default();
        registry.subscribe(id(1), name("NET")).unwrap();

        assert!(registry.subscribers("net").is_empty());
        assert!(registry.subscribers("NET ").is_empty());
        assert_eq!(registry.subscribers("NET").len(), 1);
    }
}
