//! Time-boxed response cache keyed by request signature.
//!
//! [`ExpiringCache`] keeps every entry until its absolute expiry passes. Expired entries are
//! swept lazily the first time a lookup observes them, or in bulk through
//! [`ExpiringCache::clear_expired`]. Each operation runs under one short lock so callers on
//! different tasks never see a half-applied mutation.

pub mod entry;

pub use entry::CacheEntry;

// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
};

/// Lifetime applied when callers do not supply one (five minutes).
pub const DEFAULT_TTL: Duration = Duration::minutes(5);

/// Snapshot returned by [`ExpiringCache::stats`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
	/// Number of live entries.
	pub size: usize,
	/// Keys of the live entries, in no particular order.
	pub keys: Vec<String>,
}

/// String-keyed store whose entries expire at an absolute instant.
pub struct ExpiringCache<V> {
	entries: Mutex<HashMap<String, CacheEntry<V>>>,
	default_ttl: Duration,
	clock: Arc<dyn Clock>,
}
impl<V> ExpiringCache<V>
where
	V: Clone,
{
	/// Creates an empty cache using the wall clock and [`DEFAULT_TTL`].
	pub fn new() -> Self {
		Self::with_clock(Arc::new(SystemClock))
	}

	/// Creates an empty cache that reads time from `clock`.
	pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
		Self { entries: Mutex::new(HashMap::new()), default_ttl: DEFAULT_TTL, clock }
	}

	/// Overrides the lifetime used by [`set`](Self::set).
	pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
		self.default_ttl = ttl;

		self
	}

	/// Lifetime used by [`set`](Self::set).
	pub fn default_ttl(&self) -> Duration {
		self.default_ttl
	}

	/// Stores `value` with the default lifetime, replacing any existing entry.
	pub fn set(&self, key: impl Into<String>, value: V) {
		self.set_with_ttl(key, value, self.default_ttl);
	}

	/// Stores `value` until `now + ttl`, replacing any existing entry.
	///
	/// A non-positive `ttl` is accepted and produces an entry that the next lookup discards.
	pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
		let entry = CacheEntry::new(value, self.clock.now(), ttl);

		self.entries.lock().insert(key.into(), entry);
	}

	/// Returns the live value for `key`, deleting the entry if it has expired.
	pub fn get(&self, key: &str) -> Option<V> {
		let now = self.clock.now();
		let mut entries = self.entries.lock();

		match entries.get(key) {
			Some(entry) if entry.is_live_at(now) => Some(entry.value.clone()),
			Some(_) => {
				entries.remove(key);

				None
			},
			None => None,
		}
	}

	/// Reports whether `key` holds a live entry, deleting the entry if it has expired.
	pub fn has(&self, key: &str) -> bool {
		let now = self.clock.now();
		let mut entries = self.entries.lock();

		match entries.get(key) {
			Some(entry) if entry.is_live_at(now) => true,
			Some(_) => {
				entries.remove(key);

				false
			},
			None => false,
		}
	}

	/// Removes `key` and reports whether it was stored, expired or not.
	pub fn delete(&self, key: &str) -> bool {
		self.entries.lock().remove(key).is_some()
	}

	/// Removes every entry.
	pub fn clear(&self) {
		self.entries.lock().clear();
	}

	/// Removes every expired entry and leaves live entries untouched.
	pub fn clear_expired(&self) {
		let now = self.clock.now();

		self.entries.lock().retain(|_, entry| entry.is_live_at(now));
	}

	/// Sweeps expired entries, then reports the remaining size and keys.
	pub fn stats(&self) -> CacheStats {
		let now = self.clock.now();
		let mut entries = self.entries.lock();

		entries.retain(|_, entry| entry.is_live_at(now));

		CacheStats { size: entries.len(), keys: entries.keys().cloned().collect() }
	}
}
impl<V> Default for ExpiringCache<V>
where
	V: Clone,
{
	fn default() -> Self {
		Self::new()
	}
}
impl<V> Debug for ExpiringCache<V> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ExpiringCache")
			.field("len", &self.entries.lock().len())
			.field("default_ttl", &self.default_ttl)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::clock::ManualClock;

	fn cache_with_clock() -> (ExpiringCache<String>, ManualClock) {
		let clock = ManualClock::default();
		let cache = ExpiringCache::with_clock(Arc::new(clock.clone()));

		(cache, clock)
	}

	#[test]
	fn set_then_get_returns_value_until_expiry() {
		let (cache, clock) = cache_with_clock();

		cache.set_with_ttl("GET:/me", "profile".into(), Duration::seconds(1));

		assert_eq!(cache.get("GET:/me").as_deref(), Some("profile"));
		assert!(cache.has("GET:/me"));

		clock.advance(Duration::seconds(1));

		assert_eq!(cache.get("GET:/me"), None);
		assert!(!cache.has("GET:/me"));
	}

	#[test]
	fn default_ttl_is_five_minutes() {
		let (cache, clock) = cache_with_clock();

		cache.set("GET:/drafts", "drafts".into());
		clock.advance(Duration::minutes(5) - Duration::milliseconds(1));

		assert!(cache.has("GET:/drafts"));

		clock.advance(Duration::milliseconds(1));

		assert!(!cache.has("GET:/drafts"));
	}

	#[test]
	fn set_overwrites_value_and_expiry() {
		let (cache, clock) = cache_with_clock();

		cache.set_with_ttl("key", "old".into(), Duration::seconds(1));
		cache.set_with_ttl("key", "new".into(), Duration::seconds(10));
		clock.advance(Duration::seconds(5));

		assert_eq!(cache.get("key").as_deref(), Some("new"));
	}

	#[test]
	fn expired_lookup_removes_the_entry() {
		let (cache, clock) = cache_with_clock();

		cache.set_with_ttl("stale", "value".into(), Duration::milliseconds(10));
		clock.advance(Duration::milliseconds(20));

		// Still physically present until observed.
		assert!(cache.delete("stale"));

		cache.set_with_ttl("stale", "value".into(), Duration::milliseconds(10));
		clock.advance(Duration::milliseconds(20));

		assert_eq!(cache.get("stale"), None);
		assert!(!cache.delete("stale"));
	}

	#[test]
	fn non_positive_ttl_expires_on_next_access() {
		let (cache, _clock) = cache_with_clock();

		cache.set_with_ttl("zero", "value".into(), Duration::ZERO);
		cache.set_with_ttl("negative", "value".into(), Duration::seconds(-1));

		assert_eq!(cache.get("zero"), None);
		assert!(!cache.has("negative"));
	}

	#[test]
	fn delete_and_clear() {
		let (cache, _clock) = cache_with_clock();

		cache.set("a", "1".into());
		cache.set("b", "2".into());

		assert!(cache.delete("a"));
		assert!(!cache.delete("a"));

		cache.clear();

		assert_eq!(cache.stats().size, 0);
	}

	#[test]
	fn clear_expired_only_drops_expired_entries() {
		let (cache, clock) = cache_with_clock();

		cache.set_with_ttl("short-1", "v".into(), Duration::seconds(1));
		cache.set_with_ttl("short-2", "v".into(), Duration::seconds(1));
		cache.set_with_ttl("long", "v".into(), Duration::seconds(60));

		clock.advance(Duration::seconds(2));
		cache.clear_expired();

		assert!(cache.delete("long"));
		assert!(!cache.delete("short-1"));
		assert!(!cache.delete("short-2"));
	}

	#[test]
	fn stats_sweeps_before_reporting() {
		let (cache, clock) = cache_with_clock();

		cache.set_with_ttl("GET:/me", "v".into(), Duration::seconds(1));
		cache.set_with_ttl("GET:/publications", "v".into(), Duration::seconds(30));
		cache.set_with_ttl("GET:/drafts", "v".into(), Duration::seconds(30));

		assert_eq!(cache.stats().size, 3);

		clock.advance(Duration::seconds(5));

		let mut stats = cache.stats();

		stats.keys.sort();

		assert_eq!(stats.size, 2);
		assert_eq!(stats.keys, vec!["GET:/drafts".to_owned(), "GET:/publications".to_owned()]);
	}
}
