#![allow(clippy::missing_docs_in_private_items)]
#![allow(missing_docs)]
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::atomic::{AtomicUsize, Ordering};

use arcstr::ArcStr;
use dashmap::DashMap;
use thiserror::Error;
use tracing::{debug, trace};

use super::subscription_trie::{SubscriptionTrie, TopicFilterError};

/// Errors that can occur during routing operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopicRouterError {
	/// Topic filter validation failed
	#[error("Invalid topic filter: {0}")]
	InvalidFilter(#[from] TopicFilterError),

	/// Subscription with given ID was not found
	#[error("Subscription {id} not found")]
	SubscriptionNotFound {
		/// The unknown identifier
		id: SubscriptionId,
	},
}

impl TopicRouterError {
	/// Creates a new SubscriptionNotFound error
	pub fn subscription_not_found(id: SubscriptionId) -> Self {
		Self::SubscriptionNotFound { id }
	}
}

/// A subscription identifier.
///
/// Issued on subscribe and used to address the subscription afterwards.
/// The caller correlates it out-of-band with whatever reacts to matched
/// messages; the router never invokes anything.
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub struct SubscriptionId(usize);

impl Display for SubscriptionId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "SubscriptionId({})", self.0)
	}
}

#[derive(Debug)]
struct Subscription<T> {
	filter: ArcStr,
	data: T,
}

/// Registry of live subscriptions on top of [`SubscriptionTrie`].
///
/// Associates each issued [`SubscriptionId`] with its topic filter and an
/// arbitrary caller payload, and resolves the fan-out set for a published
/// topic. All methods take `&self`; subscribe, unsubscribe, and fan-out
/// resolution may run concurrently from any number of callers.
pub struct TopicRouter<T> {
	trie: SubscriptionTrie<SubscriptionId>,
	subscriptions: DashMap<SubscriptionId, Subscription<T>>,
	next_id: AtomicUsize,
}

impl<T> Default for TopicRouter<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> TopicRouter<T> {
	/// Creates an empty router.
	pub fn new() -> Self {
		Self {
			trie: SubscriptionTrie::new(),
			subscriptions: DashMap::new(),
			next_id: AtomicUsize::new(0),
		}
	}

	/// Registers a subscription and returns its identifier.
	pub fn subscribe(
		&self,
		filter: &str,
		data: T,
	) -> Result<SubscriptionId, TopicRouterError> {
		let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.trie.insert(filter, id)?;
		self.subscriptions.insert(id, Subscription {
			filter: ArcStr::from(filter),
			data,
		});
		debug!(subscription_id = %id, filter, "subscription added");
		Ok(id)
	}

	/// Cancels a subscription and returns its payload.
	pub fn unsubscribe(
		&self,
		id: SubscriptionId,
	) -> Result<T, TopicRouterError> {
		match self.subscriptions.remove(&id) {
			| Some((_, subscription)) => {
				self.trie.remove(&subscription.filter, &id);
				debug!(
					subscription_id = %id,
					filter = %subscription.filter,
					"subscription removed"
				);
				Ok(subscription.data)
			}
			| None => Err(TopicRouterError::subscription_not_found(id)),
		}
	}

	/// Resolves the fan-out set for a published topic.
	///
	/// Returns the identifier and payload of every subscription whose
	/// filter matches `topic`. A registration observed in the trie whose
	/// registry entry is already gone was unsubscribed mid-resolution and
	/// is skipped.
	pub fn subscribers(&self, topic: &str) -> Vec<(SubscriptionId, T)>
	where T: Clone {
		let matched = self.trie.matches(topic);
		let mut subscribers = Vec::with_capacity(matched.len());
		for id in matched {
			match self.subscriptions.get(&id) {
				| Some(subscription) => {
					subscribers.push((id, subscription.data.clone()));
				}
				| None => {
					trace!(
						subscription_id = %id,
						topic,
						"stale registration skipped"
					);
				}
			}
		}
		subscribers
	}

	/// Returns the topic filter a subscription was registered under.
	pub fn filter_of(
		&self,
		id: SubscriptionId,
	) -> Result<ArcStr, TopicRouterError> {
		self.subscriptions
			.get(&id)
			.map(|subscription| subscription.filter.clone())
			.ok_or(TopicRouterError::subscription_not_found(id))
	}

	/// All distinct filters with at least one live subscription.
	pub fn active_filters(&self) -> HashSet<ArcStr> {
		self.subscriptions
			.iter()
			.map(|entry| entry.value().filter.clone())
			.collect()
	}

	/// Number of live subscriptions.
	pub fn subscription_count(&self) -> usize {
		self.subscriptions.len()
	}

	/// Whether no subscriptions are live.
	pub fn is_empty(&self) -> bool {
		self.subscriptions.is_empty()
	}
}
