//! # local-pubsub
//!
//! Wildcard topic-filter subscription routing for a local pub/sub runtime
//! on edge devices.
//!
//! ## Features
//!
//! - **Wildcard Filters**: a single `*` token matches any span of zero or
//!   more characters, anywhere in a filter, any number of times
//! - **Concurrent by Construction**: subscribe, unsubscribe, and match
//!   resolution run from any number of threads without external locking
//! - **Opaque Handles**: the trie stores caller-defined equatable values
//!   and never invokes them
//! - **Subscription Registry**: [`TopicRouter`] correlates issued
//!   identifiers with filters and caller payloads
//!
//! ## Quick Start
//!
//! ```rust
//! use local_pubsub::SubscriptionTrie;
//!
//! let trie = SubscriptionTrie::new();
//! trie.insert("sensors/*/reading", 7)?;
//! trie.insert("sensors/outdoor/reading", 8)?;
//!
//! let matched = trie.matches("sensors/outdoor/reading");
//! assert!(matched.contains(&7));
//! assert!(matched.contains(&8));
//! assert!(trie.matches("sensors/outdoor/status").is_empty());
//! # Ok::<(), local_pubsub::TopicFilterError>(())
//! ```
//!
//! ## Matching Semantics
//!
//! - A literal filter character matches one identical topic character.
//! - The `*` wildcard absorbs any span of zero or more characters, so
//!   `foo*baz` matches `foobaz`, `foobarbaz`, and `foo/bar/baz`.
//! - A wildcard in the very first filter position never matches a topic
//!   starting with the reserved marker `$`; a filter with a literal first
//!   segment (such as `$aws/things/*/shadow/*`) still can.
//! - An empty topic matches nothing, by definition; not even a pure
//!   wildcard filter matches it.
//! - Published topics are concrete strings; no wildcard interpretation is
//!   applied to the topic itself.
//!
//! Delivery is out of scope: resolution returns the set of matching
//! subscriber handles, and the surrounding service decides what invoking
//! a handle means.

#![warn(missing_docs)]

pub mod topic;

// === Core Public API ===
pub use topic::{
	RESERVED_PREFIX, SubscriptionId, SubscriptionTrie, TopicError,
	TopicFilterError, TopicRouter, TopicRouterError, WILDCARD,
};

/// Error types used throughout the library
///
/// Re-exports all error types in one convenient location for error
/// handling.
pub mod errors {
	pub use crate::topic::{
		TopicError, TopicFilterError, TopicRouterError,
	};
}
