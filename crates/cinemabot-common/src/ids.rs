//! Typed ID wrappers for the chat platform's integer identifiers.
//!
//! Users, chats and messages are all plain `i64` values on the wire; the
//! newtypes keep a chat id from being passed where a user id is expected.

use serde::{Deserialize, Serialize};

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw platform identifier.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// The raw platform identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

integer_id!(
    /// Identifier of the user who sent a message.
    UserId
);

integer_id!(
    /// Identifier of the chat a message arrived in and replies go to.
    ChatId
);

integer_id!(
    /// Identifier of a single message within a chat.
    MessageId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_round_trip() {
        let user_id = UserId::from(123_456_789);
        let raw: i64 = user_id.into();
        assert_eq!(raw, 123_456_789);
    }

    #[test]
    fn test_chat_id_serializes_transparently() {
        let id = ChatId::new(-100_200);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "-100200");
        let back: ChatId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_message_id_display() {
        assert_eq!(MessageId::new(7).to_string(), "7");
    }
}
