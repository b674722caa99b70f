#![allow(clippy::missing_docs_in_private_items)]
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

/// The wildcard token: matches any span of zero or more topic characters.
///
/// It may appear anywhere in a filter, any number of times.
pub const WILDCARD: char = '*';

/// Marker for reserved topics.
///
/// A wildcard occupying the very first position of a filter never matches
/// a topic whose first character is this marker. The exception applies at
/// position zero only; a filter with a literal first segment can still
/// match reserved topics through later wildcards.
pub const RESERVED_PREFIX: char = '$';

/// Sentinel value carried by the root node.
const ROOT_VALUE: char = '\0';

/// Errors that can occur when registering a topic filter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopicFilterError {
	/// Empty filter passed to an insertion
	#[error("Topic filter cannot be empty")]
	EmptyFilter,
}

/// One trie node per filter character.
///
/// Created lazily on first insertion along a previously-unseen prefix and
/// never removed afterwards, even when its handle set drains to empty.
struct TrieNode<H> {
	value: char,
	is_wildcard: bool,
	children: DashMap<char, Arc<TrieNode<H>>>,
	handles: DashSet<H>,
}

impl<H: Eq + Hash + std::fmt::Debug> std::fmt::Debug for TrieNode<H> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TrieNode")
			.field("value", &self.value)
			.field("is_wildcard", &self.is_wildcard)
			.field("children", &self.children)
			.field("handles", &self.handles)
			.finish()
	}
}

impl<H: Eq + Hash> TrieNode<H> {
	fn new(value: char) -> Self {
		Self {
			value,
			is_wildcard: value == WILDCARD,
			children: DashMap::new(),
			handles: DashSet::new(),
		}
	}
}

/// Set of trie nodes consistent with the topic prefix consumed so far.
///
/// Deduplicated by node identity: a wildcard node can be produced both by
/// staying in the frontier and as a child of another frontier member.
struct Frontier<H> {
	nodes: SmallVec<[Arc<TrieNode<H>>; 8]>,
}

impl<H> Frontier<H> {
	fn new() -> Self {
		Self {
			nodes: SmallVec::new(),
		}
	}

	fn push_unique(&mut self, node: Arc<TrieNode<H>>) {
		if !self.nodes.iter().any(|n| Arc::ptr_eq(n, &node)) {
			self.nodes.push(node);
		}
	}

	fn iter(&self) -> std::slice::Iter<'_, Arc<TrieNode<H>>> {
		self.nodes.iter()
	}

	fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Character trie mapping wildcard topic filters to sets of opaque
/// subscriber handles.
///
/// A handle is any caller-defined equatable value; the trie stores and
/// compares handles, never interprets them. Removal must pass a handle
/// equal to one previously inserted under the same filter.
///
/// All operations take `&self` and are safe for unsynchronized concurrent
/// callers. No global lock serializes the structure: each node's children
/// map and handle set are independently synchronized, so a single call
/// observes a momentary, not globally atomic, view of concurrent
/// mutations.
///
/// Nodes are never removed once created. Memory grows monotonically with
/// the number of distinct literal prefixes ever inserted; this is a
/// deliberate trade-off that keeps removal free of cross-node
/// coordination.
pub struct SubscriptionTrie<H> {
	root: Arc<TrieNode<H>>,
}

impl<H: Eq + Hash + std::fmt::Debug> std::fmt::Debug for SubscriptionTrie<H> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SubscriptionTrie")
			.field("root", &self.root)
			.finish()
	}
}

impl<H: Eq + Hash + Clone> Default for SubscriptionTrie<H> {
	fn default() -> Self {
		Self::new()
	}
}

impl<H: Eq + Hash + Clone> SubscriptionTrie<H> {
	/// Creates an empty trie.
	pub fn new() -> Self {
		Self {
			root: Arc::new(TrieNode::new(ROOT_VALUE)),
		}
	}

	/// Registers `handle` under `filter`.
	///
	/// Walks the trie one filter character at a time, creating missing
	/// nodes on the way, and adds the handle to the terminal node's set.
	/// Re-inserting an equal handle under the same filter is a no-op.
	pub fn insert(
		&self,
		filter: &str,
		handle: H,
	) -> Result<(), TopicFilterError> {
		self.insert_many(filter, std::iter::once(handle))
	}

	/// Registers every handle in `handles` under `filter`.
	pub fn insert_many(
		&self,
		filter: &str,
		handles: impl IntoIterator<Item = H>,
	) -> Result<(), TopicFilterError> {
		if filter.is_empty() {
			return Err(TopicFilterError::EmptyFilter);
		}
		let mut current = Arc::clone(&self.root);
		for ch in filter.chars() {
			// Atomic create-if-absent per child slot: concurrent
			// insertions sharing a prefix converge on one node.
			let child = current
				.children
				.entry(ch)
				.or_insert_with(|| Arc::new(TrieNode::new(ch)))
				.value()
				.clone();
			current = child;
		}
		for handle in handles {
			current.handles.insert(handle);
		}
		Ok(())
	}

	/// Unregisters `handle` from `filter`.
	///
	/// Addressing is exact-pattern, not match-based: the filter is walked
	/// literally, so a wildcard token in `filter` selects only a node
	/// whose value is the wildcard token itself.
	///
	/// Returns whether the terminal node existed, independent of whether
	/// the handle was actually present. The node and its ancestors stay
	/// in place even if the handle set drains to empty.
	pub fn remove(&self, filter: &str, handle: &H) -> bool {
		self.remove_many(filter, std::slice::from_ref(handle))
	}

	/// Unregisters every handle in `handles` from `filter`.
	pub fn remove_many(&self, filter: &str, handles: &[H]) -> bool {
		match self.lookup(filter) {
			| Some(node) => {
				for handle in handles {
					node.handles.remove(handle);
				}
				true
			}
			| None => false,
		}
	}

	/// Whether a literal walk of `filter` reaches an existing node.
	///
	/// True regardless of whether that node currently holds any handles,
	/// and also for prefixes of previously-inserted filters, since
	/// intermediate nodes persist for the lifetime of the trie.
	pub fn contains_filter(&self, filter: &str) -> bool {
		self.lookup(filter).is_some()
	}

	/// Total count of live `(filter, handle)` registrations.
	///
	/// A handle registered under several filters is counted once per
	/// filter.
	pub fn len(&self) -> usize {
		let mut total = 0;
		let mut pending: SmallVec<[Arc<TrieNode<H>>; 16]> =
			smallvec![Arc::clone(&self.root)];
		while let Some(node) = pending.pop() {
			total += node.handles.len();
			for child in node.children.iter() {
				pending.push(child.value().clone());
			}
		}
		total
	}

	/// Whether no registrations are live.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Resolves the set of handles whose filter matches `topic`.
	///
	/// The topic is concrete: a wildcard character in it is matched
	/// literally, not interpreted. A filter matches when its literal
	/// characters line up with topic characters and each wildcard token
	/// absorbs some span of zero or more characters. An empty topic
	/// matches nothing, including a pure-wildcard filter.
	///
	/// Runs the trie as an NFA, one topic character at a time: the
	/// frontier holds every node some filter could have reached after the
	/// topic prefix consumed so far, and is advanced by literal child
	/// steps, by wildcards staying put to absorb the character, and by
	/// wildcard exits into children matching the character. Once the
	/// frontier empties the result is empty; there is no backtracking.
	///
	/// Cost is `O(len(topic) * frontier width)`; the width is bounded by
	/// the number of concurrently viable wildcard branches, typically
	/// small.
	pub fn matches(&self, topic: &str) -> HashSet<H> {
		let mut frontier = Frontier::new();
		for (position, ch) in topic.chars().enumerate() {
			if position == 0 {
				let allow_wildcard = ch != RESERVED_PREFIX;
				Self::matching_children(
					&self.root,
					ch,
					allow_wildcard,
					&mut frontier,
				);
			} else {
				let mut next = Frontier::new();
				for node in frontier.iter() {
					if node.is_wildcard {
						// A wildcard already in the frontier absorbs
						// the character and stays viable.
						next.push_unique(Arc::clone(node));
					}
					Self::matching_children(node, ch, true, &mut next);
				}
				frontier = next;
			}
			if frontier.is_empty() {
				return HashSet::new();
			}
		}
		let mut matched = HashSet::new();
		for node in frontier.iter() {
			Self::collect_terminal_handles(node, &mut matched);
		}
		matched
	}

	fn lookup(&self, filter: &str) -> Option<Arc<TrieNode<H>>> {
		let mut current = Arc::clone(&self.root);
		for ch in filter.chars() {
			let child = current.children.get(&ch)?.value().clone();
			current = child;
		}
		Some(current)
	}

	/// Adds to `out` every child of `parent` reachable by consuming `ch`:
	/// literal children whose value equals `ch`, wildcard children (which
	/// enter the frontier to start absorbing), and, transitively, matching
	/// children of those wildcards, since a wildcard may absorb zero
	/// characters before a following literal resumes.
	fn matching_children(
		parent: &Arc<TrieNode<H>>,
		ch: char,
		allow_wildcard: bool,
		out: &mut Frontier<H>,
	) {
		let mut pending: SmallVec<[Arc<TrieNode<H>>; 4]> =
			smallvec![Arc::clone(parent)];
		while let Some(node) = pending.pop() {
			for entry in node.children.iter() {
				let child = entry.value();
				let literal_match = child.value == ch;
				let wildcard_match = allow_wildcard && child.is_wildcard;
				if literal_match || wildcard_match {
					out.push_unique(Arc::clone(child));
				}
				if wildcard_match {
					// Zero-width exit: scan the wildcard's own children
					// against the same character.
					pending.push(Arc::clone(child));
				}
			}
		}
	}

	/// Collects the node's own handles plus the handles of every node
	/// reachable by following only wildcard children: a filter ending in
	/// one or more wildcards succeeds without consuming extra characters.
	fn collect_terminal_handles(
		node: &Arc<TrieNode<H>>,
		out: &mut HashSet<H>,
	) {
		let mut pending: SmallVec<[Arc<TrieNode<H>>; 4]> =
			smallvec![Arc::clone(node)];
		while let Some(node) = pending.pop() {
			for handle in node.handles.iter() {
				out.insert(handle.key().clone());
			}
			if let Some(wildcard) = node.children.get(&WILDCARD) {
				pending.push(wildcard.value().clone());
			}
		}
	}
}
