//! Transient notifications shown on top of the planner page.
//!
//! The queue keeps insertion order, which is also display order. Growth is
//! bounded by [`ToastConfig::capacity`] and every entry expires after
//! [`ToastConfig::lifetime_secs`] once [`ToastQueue::prune_expired`] runs.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    #[default]
    Info,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Creation time in milliseconds since the Unix epoch, bumped to stay unique.
    pub id: i64,
    pub title: Option<String>,
    pub message: String,
    pub kind: ToastKind,
    pub created_at: Instant,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ToastConfig {
    /// Maximum number of visible toasts; the oldest is evicted first. 0 = unbounded.
    pub capacity: usize,
    /// Seconds before a toast expires. 0 = toasts stay until dismissed.
    pub lifetime_secs: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            lifetime_secs: 5,
        }
    }
}

impl ToastConfig {
    pub const fn lifetime(&self) -> Option<Duration> {
        if self.lifetime_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.lifetime_secs))
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    config: ToastConfig,
    last_id: i64,
}

impl ToastQueue {
    pub fn new(config: ToastConfig) -> Self {
        Self {
            toasts: VecDeque::new(),
            config,
            last_id: 0,
        }
    }

    pub const fn config(&self) -> &ToastConfig {
        &self.config
    }

    /// Appends a toast of kind `info`.
    pub fn add_info(&mut self, message: impl Into<String>) -> i64 {
        self.add(message, ToastKind::Info)
    }

    pub fn add(&mut self, message: impl Into<String>, kind: ToastKind) -> i64 {
        self.push(None, message.into(), kind)
    }

    pub fn add_titled(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: ToastKind,
    ) -> i64 {
        self.push(Some(title.into()), message.into(), kind)
    }

    /// Removes the toast with `id`. Unknown ids leave the queue untouched.
    pub fn remove(&mut self, id: i64) -> Option<Toast> {
        let index = self.toasts.iter().position(|t| t.id == id)?;
        self.toasts.remove(index)
    }

    /// The most recently added toast.
    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    /// Drops every toast whose lifetime has elapsed at `now`. Returns how many were removed.
    pub fn prune_expired(&mut self, now: Instant) -> usize {
        let Some(lifetime) = self.config.lifetime() else {
            return 0;
        };
        let before = self.toasts.len();
        self.toasts
            .retain(|t| now.saturating_duration_since(t.created_at) < lifetime);
        before - self.toasts.len()
    }

    pub fn get(&self, id: i64) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    fn push(&mut self, title: Option<String>, message: String, kind: ToastKind) -> i64 {
        let id = self.next_id();
        if self.config.capacity > 0 {
            while self.toasts.len() >= self.config.capacity {
                self.toasts.pop_front();
            }
        }
        self.toasts.push_back(Toast {
            id,
            title,
            message,
            kind,
            created_at: Instant::now(),
        });
        id
    }

    fn next_id(&mut self) -> i64 {
        let id = Utc::now().timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unbounded() -> ToastQueue {
        ToastQueue::new(ToastConfig {
            capacity: 0,
            lifetime_secs: 0,
        })
    }

    fn messages(queue: &ToastQueue) -> Vec<&str> {
        queue.iter().map(|t| t.message.as_str()).collect()
    }

    #[test]
    fn add_then_remove_leaves_queue_empty() {
        let mut queue = unbounded();
        let id = queue.add_info("保存しました");
        assert_eq!(queue.get(id).map(|t| t.kind), Some(ToastKind::Info));
        assert!(queue.remove(id).is_some());
        assert!(queue.is_empty());
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let mut queue = unbounded();
        queue.add("one", ToastKind::Success);
        queue.add("two", ToastKind::Error);
        let before: Vec<i64> = queue.iter().map(|t| t.id).collect();
        assert!(queue.remove(-1).is_none());
        let after: Vec<i64> = queue.iter().map(|t| t.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let mut queue = unbounded();
        let ids: Vec<i64> = (0..50).map(|i| queue.add_info(i.to_string())).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn insertion_order_survives_interleaved_removal() {
        let mut queue = unbounded();
        let a = queue.add_info("a");
        queue.add_info("b");
        let c = queue.add_info("c");
        queue.remove(a);
        queue.add_info("d");
        queue.remove(c);
        queue.add_info("e");
        assert_eq!(messages(&queue), ["b", "d", "e"]);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut queue = ToastQueue::new(ToastConfig {
            capacity: 2,
            lifetime_secs: 0,
        });
        queue.add_info("first");
        queue.add_info("second");
        queue.add_info("third");
        assert_eq!(messages(&queue), ["second", "third"]);
    }

    #[test]
    fn expired_toasts_are_pruned() {
        let mut queue = ToastQueue::new(ToastConfig {
            capacity: 0,
            lifetime_secs: 5,
        });
        queue.add_titled("エラー", "failed", ToastKind::Error);
        assert_eq!(queue.prune_expired(Instant::now()), 0);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.prune_expired(Instant::now() + Duration::from_secs(6)), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn zero_lifetime_never_expires() {
        let mut queue = unbounded();
        queue.add_info("sticky");
        assert_eq!(queue.prune_expired(Instant::now() + Duration::from_secs(3600)), 0);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn latest_is_newest_and_removable_by_id() {
        let mut queue = unbounded();
        queue.add_info("old");
        let newest = queue.add_info("new");
        assert_eq!(queue.latest().map(|t| t.id), Some(newest));
        assert!(queue.remove(newest).is_some());
        assert_eq!(messages(&queue), ["old"]);
    }
}
