//! Error types and utilities for the topic module
//!
//! This module contains the composite error type for the entire topic
//! module, while individual error types remain in their respective
//! modules.

use thiserror::Error;

use super::subscription_trie::TopicFilterError;
use super::topic_router::TopicRouterError;

/// Comprehensive error type for all topic-related operations
///
/// Aggregates the errors of each submodule into a single type for callers
/// that do not care which layer failed, while preserving the detailed
/// error information.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopicError {
	/// Topic filter validation error
	#[error("Topic filter error: {0}")]
	Filter(#[from] TopicFilterError),

	/// Routing operation error
	#[error("Topic router error: {0}")]
	Router(#[from] TopicRouterError),
}

/// Convenient Result type for topic operations
pub type TopicResult<T> = Result<T, TopicError>;

/// Convenient Result type for filter operations
pub type FilterResult<T> = Result<T, TopicFilterError>;

/// Convenient Result type for router operations
pub type RouterResult<T> = Result<T, TopicRouterError>;
