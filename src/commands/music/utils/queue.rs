//! Per-guild FIFO of resolved tracks.
//!
//! Insertion order is playback order, except for explicit front insertions
//! used to re-prioritize an interrupted track. The queue itself is not
//! synchronized; it is owned by a `PlaybackSession` and every access goes
//! through the session's lock.

use super::super::audio_sources::track::Track;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct TrackQueue {
    tracks: VecDeque<Track>,
}

impl TrackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a track to the back of the queue.
    pub fn push_back(&mut self, track: Track) {
        self.tracks.push_back(track);
    }

    /// Inserts a track at the front, making it the next track to play.
    pub fn push_front(&mut self, track: Track) {
        self.tracks.push_front(track);
    }

    /// Removes and returns the next track, if any.
    pub fn pop_front(&mut self) -> Option<Track> {
        self.tracks.pop_front()
    }

    /// Returns clones of up to `limit` upcoming tracks in playback order.
    pub fn peek_all(&self, limit: usize) -> Vec<Track> {
        self.tracks.iter().take(limit).cloned().collect()
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.tracks.len();
        self.tracks.clear();
        removed
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn track(name: &str) -> Track {
        Track {
            stream_url: format!("https://cdn.example/{}", name),
            title: name.to_string(),
            page_url: format!("https://videos.example/watch?v={}", name),
            duration: Duration::from_secs(200),
        }
    }

    #[test]
    fn enqueued_tracks_come_back_in_order() {
        let mut queue = TrackQueue::new();
        for name in ["a", "b", "c", "d"] {
            queue.push_back(track(name));
        }

        let titles: Vec<String> = queue
            .peek_all(10)
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c", "d"]);

        assert_eq!(queue.pop_front().unwrap().title, "a");
        assert_eq!(queue.pop_front().unwrap().title, "b");
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn push_front_takes_priority_over_existing_contents() {
        let mut queue = TrackQueue::new();
        queue.push_back(track("queued-1"));
        queue.push_back(track("queued-2"));

        queue.push_front(track("interrupted"));
        assert_eq!(queue.pop_front().unwrap().title, "interrupted");
        assert_eq!(queue.pop_front().unwrap().title, "queued-1");
    }

    #[test]
    fn push_front_pop_front_on_empty_queue() {
        let mut queue = TrackQueue::new();
        queue.push_front(track("only"));
        assert_eq!(queue.pop_front().unwrap().title, "only");
        assert_eq!(queue.pop_front(), None);
    }

    #[test]
    fn peek_all_respects_limit() {
        let mut queue = TrackQueue::new();
        for i in 0..15 {
            queue.push_back(track(&format!("t{}", i)));
        }
        assert_eq!(queue.peek_all(10).len(), 10);
        assert_eq!(queue.len(), 15);
    }

    #[test]
    fn clear_reports_removed_count() {
        let mut queue = TrackQueue::new();
        queue.push_back(track("x"));
        queue.push_back(track("y"));
        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
        assert_eq!(queue.clear(), 0);
    }
}
