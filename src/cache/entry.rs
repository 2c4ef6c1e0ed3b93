//! Cached payload paired with its absolute expiry.

// self
use crate::_prelude::*;

/// Value stored by [`ExpiringCache`](crate::cache::ExpiringCache) together with its expiry.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry<V> {
	/// Opaque payload.
	pub value: V,
	/// Instant at which the entry stops being live.
	pub expires_at: OffsetDateTime,
}
impl<V> CacheEntry<V> {
	/// Creates an entry that expires `ttl` after `now`.
	///
	/// A non-positive `ttl` yields an entry that is already expired.
	pub fn new(value: V, now: OffsetDateTime, ttl: Duration) -> Self {
		Self { value, expires_at: now.saturating_add(ttl) }
	}

	/// An entry is live strictly before its expiry instant.
	pub fn is_live_at(&self, instant: OffsetDateTime) -> bool {
		instant < self.expires_at
	}

	/// Remaining lifetime at `instant`, clamped at zero.
	pub fn ttl_remaining_at(&self, instant: OffsetDateTime) -> Duration {
		(self.expires_at - instant).max(Duration::ZERO)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn entry_expires_exactly_at_boundary() {
		let now = macros::datetime!(2025-11-10 12:00 UTC);
		let entry = CacheEntry::new("payload", now, Duration::seconds(5));

		assert!(entry.is_live_at(now));
		assert!(entry.is_live_at(now + Duration::milliseconds(4_999)));
		assert!(!entry.is_live_at(now + Duration::seconds(5)));
		assert_eq!(entry.ttl_remaining_at(now + Duration::seconds(2)), Duration::seconds(3));
		assert_eq!(entry.ttl_remaining_at(now + Duration::seconds(9)), Duration::ZERO);
	}

	#[test]
	fn non_positive_ttl_is_already_expired() {
		let now = macros::datetime!(2025-11-10 12:00 UTC);

		assert!(!CacheEntry::new(1, now, Duration::ZERO).is_live_at(now));
		assert!(!CacheEntry::new(1, now, Duration::seconds(-3)).is_live_at(now));
	}
}
