//! # Transcript
//!
//! The ordered, append-only log of chat entries.
//!
//! Committed entries are never edited or removed. The only exception is the
//! typing indicator, which is removed once, right before the reply that
//! replaces it is appended.
//!
//! Every append bumps [`Transcript::revision`]. Renderers compare it with the
//! revision they last drew and jump to the newest entry when it changed.

use chrono::{Local, NaiveTime};

/// Who authored an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "you",
            Sender::Bot => "bot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Message,
    /// Transient "bot is typing" placeholder.
    Typing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub sender: Sender,
    pub kind: EntryKind,
    pub text: String,
    pub timestamp: Option<String>,
}

impl Entry {
    pub fn is_typing(&self) -> bool {
        self.kind == EntryKind::Typing
    }
}

/// Formats a local time of day for an entry header (`14:05`).
pub fn format_timestamp(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Current local time, formatted for display.
pub fn now_timestamp() -> String {
    format_timestamp(Local::now().time())
}

#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_id: u64,
    revision: u64,
    show_timestamps: bool,
}

impl Transcript {
    pub fn new(show_timestamps: bool) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            revision: 0,
            show_timestamps,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Incremented on every append.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Committed messages only (typing placeholders excluded).
    pub fn messages(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.is_typing())
    }

    pub fn typing_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_typing()).count()
    }

    /// Appends a committed message and returns its id.
    pub fn append(&mut self, sender: Sender, text: impl Into<String>) -> EntryId {
        let timestamp = self.show_timestamps.then(now_timestamp);
        self.push(sender, EntryKind::Message, text.into(), timestamp)
    }

    /// Appends a typing placeholder on the bot side.
    pub fn show_typing(&mut self) -> EntryId {
        self.push(Sender::Bot, EntryKind::Typing, String::new(), None)
    }

    /// Removes a typing placeholder.
    ///
    /// Returns `false` if `id` is unknown, already removed, or names a
    /// committed message (those are never removed).
    pub fn remove_typing(&mut self, id: EntryId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(idx) if self.entries[idx].is_typing() => {
                self.entries.remove(idx);
                true
            }
            _ => false,
        }
    }

    fn push(
        &mut self,
        sender: Sender,
        kind: EntryKind,
        text: String,
        timestamp: Option<String>,
    ) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            sender,
            kind,
            text,
            timestamp,
        });
        self.revision += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_records_sender_and_text() {
        let mut t = Transcript::new(false);
        t.append(Sender::User, "hello");
        t.append(Sender::Bot, "hi there");

        let entries = t.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].sender, Sender::User);
        assert_eq!(entries[0].text, "hello");
        assert_eq!(entries[1].sender, Sender::Bot);
        assert!(entries[1].timestamp.is_none());
    }

    #[test]
    fn append_stamps_time_when_enabled() {
        let mut t = Transcript::new(true);
        t.append(Sender::User, "hello");
        let stamp = t.entries()[0].timestamp.as_deref().unwrap();
        assert_eq!(stamp.len(), 5);
        assert_eq!(&stamp[2..3], ":");
    }

    #[test]
    fn every_append_bumps_revision() {
        let mut t = Transcript::new(false);
        assert_eq!(t.revision(), 0);
        t.append(Sender::User, "a");
        let typing = t.show_typing();
        assert_eq!(t.revision(), 2);
        t.remove_typing(typing);
        assert_eq!(t.revision(), 2);
    }

    #[test]
    fn typing_removed_exactly_once() {
        let mut t = Transcript::new(false);
        let typing = t.show_typing();
        assert_eq!(t.typing_count(), 1);
        assert!(t.remove_typing(typing));
        assert!(!t.remove_typing(typing));
        assert_eq!(t.typing_count(), 0);
    }

    #[test]
    fn committed_messages_cannot_be_removed() {
        let mut t = Transcript::new(false);
        let id = t.append(Sender::User, "keep me");
        assert!(!t.remove_typing(id));
        assert_eq!(t.entries().len(), 1);
    }

    #[test]
    fn messages_skips_typing() {
        let mut t = Transcript::new(false);
        t.append(Sender::User, "q");
        t.show_typing();
        assert_eq!(t.messages().count(), 1);
    }

    #[test]
    fn format_timestamp_is_hour_minute() {
        let time = NaiveTime::from_hms_opt(9, 7, 42).unwrap();
        assert_eq!(format_timestamp(time), "09:07");
    }
}
