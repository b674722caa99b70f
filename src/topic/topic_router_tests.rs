use std::collections::HashSet;

use arcstr::ArcStr;

use super::subscription_trie::TopicFilterError;
use super::topic_router::{TopicRouter, TopicRouterError};

// Helper function to collect the payloads of a fan-out set
fn payloads<'a>(
	subscribers: &[(super::SubscriptionId, &'a str)],
) -> HashSet<&'a str> {
	subscribers.iter().map(|(_, data)| *data).collect()
}

#[test]
fn test_subscribe_and_resolve() {
	let router = TopicRouter::new();
	router.subscribe("sensors/*/reading", "wild").unwrap();
	router.subscribe("sensors/outdoor/reading", "exact").unwrap();
	router.subscribe("devices/*", "devices").unwrap();

	let subscribers = router.subscribers("sensors/outdoor/reading");
	assert_eq!(payloads(&subscribers), HashSet::from(["wild", "exact"]));

	let subscribers = router.subscribers("devices/lamp");
	assert_eq!(payloads(&subscribers), HashSet::from(["devices"]));

	assert!(router.subscribers("nothing/here").is_empty());
}

#[test]
fn test_duplicate_filters_fan_out_independently() {
	let router = TopicRouter::new();
	let first = router.subscribe("jobs/*", "first").unwrap();
	let second = router.subscribe("jobs/*", "second").unwrap();
	assert_ne!(first, second);

	let subscribers = router.subscribers("jobs/42");
	assert_eq!(payloads(&subscribers), HashSet::from(["first", "second"]));

	router.unsubscribe(first).unwrap();
	let subscribers = router.subscribers("jobs/42");
	assert_eq!(payloads(&subscribers), HashSet::from(["second"]));
}

#[test]
fn test_unsubscribe_returns_payload() {
	let router = TopicRouter::new();
	let id = router.subscribe("alerts/*", "payload").unwrap();

	assert_eq!(router.unsubscribe(id), Ok("payload"));
	assert!(router.is_empty());
	assert!(router.subscribers("alerts/disk").is_empty());

	assert_eq!(
		router.unsubscribe(id),
		Err(TopicRouterError::subscription_not_found(id))
	);
}

#[test]
fn test_invalid_filter_is_rejected() {
	let router = TopicRouter::new();
	assert_eq!(
		router.subscribe("", "payload"),
		Err(TopicRouterError::InvalidFilter(
			TopicFilterError::EmptyFilter
		))
	);
	assert!(router.is_empty());
}

#[test]
fn test_filter_of() {
	let router = TopicRouter::new();
	let id = router.subscribe("sensors/*", ()).unwrap();

	assert_eq!(router.filter_of(id), Ok(ArcStr::from("sensors/*")));

	router.unsubscribe(id).unwrap();
	assert_eq!(
		router.filter_of(id),
		Err(TopicRouterError::subscription_not_found(id))
	);
}

#[test]
fn test_active_filters_are_distinct() {
	let router = TopicRouter::new();
	router.subscribe("jobs/*", ()).unwrap();
	router.subscribe("jobs/*", ()).unwrap();
	router.subscribe("sensors/*", ()).unwrap();

	let expected: HashSet<ArcStr> =
		[ArcStr::from("jobs/*"), ArcStr::from("sensors/*")]
			.into_iter()
			.collect();
	assert_eq!(router.active_filters(), expected);
	assert_eq!(router.subscription_count(), 3);
}

#[test]
fn test_reserved_topics_pass_through() {
	let router = TopicRouter::new();
	router.subscribe("$aws/things/*/shadow/*", "shadow").unwrap();
	router.subscribe("*", "all").unwrap();

	let subscribers = router.subscribers("$aws/things/foo/shadow/update");
	assert_eq!(payloads(&subscribers), HashSet::from(["shadow"]));
}
