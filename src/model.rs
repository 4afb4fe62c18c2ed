//! Data model for transcript entries.
//!
//! All of these are supplied per render cycle by the parent list controller
//! and are read-only to the transcript item. The item never stores them
//! beyond the snapshot it last applied.

use crate::error::TranscriptError;

/// A single chat message inside a group.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    /// Unique within the group when present. System-message groups may lack
    /// stable ids and fall back to positional identity.
    pub id: Option<u64>,
    pub text: String,
    /// Epoch milliseconds.
    pub time: i64,
}

impl ChatMessage {
    pub fn new(id: u64, text: impl Into<String>, time: i64) -> Self {
        Self {
            id: Some(id),
            text: text.into(),
            time,
        }
    }

    /// A message without a stable id (system traffic).
    pub fn system(text: impl Into<String>, time: i64) -> Self {
        Self {
            id: None,
            text: text.into(),
            time,
        }
    }
}

/// Identity of the speaker behind a user-attributed group. Absent for
/// system-originated entries.
#[derive(Clone, Debug, PartialEq)]
pub struct Participant {
    pub name: String,
    pub is_online: bool,
    /// Opaque avatar reference (seed, url, ...). Consumed by the avatar
    /// collaborator only.
    pub avatar: Option<String>,
}

impl Participant {
    pub fn new(name: impl Into<String>, is_online: bool) -> Self {
        Self {
            name: name.into(),
            is_online,
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Structural identity used for change detection: name and online status
    /// only. The avatar reference is presentation detail and deliberately
    /// does not participate.
    pub fn identity_eq(&self, other: &Participant) -> bool {
        self.name == other.name && self.is_online == other.is_online
    }
}

/// Ordered, non-empty run of messages forming one transcript entry.
///
/// The non-empty invariant holds by construction; `new` rejects an empty
/// vector instead of letting a blank entry reach the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct MessageGroup {
    messages: Vec<ChatMessage>,
}

impl MessageGroup {
    pub fn new(messages: Vec<ChatMessage>) -> Result<Self, TranscriptError> {
        if messages.is_empty() {
            return Err(TranscriptError::EmptyGroup);
        }
        Ok(Self { messages })
    }

    pub fn single(message: ChatMessage) -> Self {
        Self {
            messages: vec![message],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Groups grow in place as the feed appends to them.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_group_rejected() {
        let result = MessageGroup::new(Vec::new());
        assert!(matches!(result, Err(TranscriptError::EmptyGroup)));
    }

    #[test]
    fn test_group_keeps_order_and_grows() {
        let mut group = MessageGroup::new(vec![
            ChatMessage::new(1, "first", 1_000),
            ChatMessage::new(2, "second", 2_000),
        ])
        .unwrap();
        assert_eq!(group.len(), 2);

        group.push(ChatMessage::new(3, "third", 3_000));
        assert_eq!(group.len(), 3);
        assert_eq!(group.messages()[0].text, "first");
        assert_eq!(group.messages()[2].text, "third");
    }

    #[test]
    fn test_system_message_has_no_id() {
        let msg = ChatMessage::system("recording started", 5_000);
        assert_eq!(msg.id, None);
    }

    #[test]
    fn test_identity_eq_tracks_name_and_presence_only() {
        let bob = Participant::new("Bob", true);

        // Same name and presence: equal, avatar notwithstanding.
        let bob_new_avatar = Participant::new("Bob", true).with_avatar("seed-42");
        assert!(bob.identity_eq(&bob_new_avatar));

        // Presence flip breaks identity.
        let bob_offline = Participant::new("Bob", false);
        assert!(!bob.identity_eq(&bob_offline));

        // Name change breaks identity.
        let alice = Participant::new("Alice", true);
        assert!(!bob.identity_eq(&alice));
    }
}
