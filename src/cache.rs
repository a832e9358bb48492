//! Capacity-bounded in-memory response cache with per-entry TTL and
//! least-recently-used eviction.
//!
//! One cache instance is scoped to one client instance; there is no sweeper
//! thread, staleness is checked lazily on every read. Entries are immutable
//! values replaced wholesale on write, so concurrent populate races resolve
//! last-writer-wins without corrupting the map.

// self
use crate::{_prelude::*, model::Product};

/// Key of the full product-list entry.
pub const PRODUCTS_ALL_KEY: &str = "products:all";
/// Prefix shared by every single-product entry.
pub const PRODUCT_KEY_PREFIX: &str = "product:";

/// Derives the cache key for a single product.
pub fn product_key(id: u64) -> String {
	format!("{PRODUCT_KEY_PREFIX}{id}")
}

/// Values the cache can hold, keyed by logical resource identity.
#[derive(Clone, Debug, PartialEq)]
pub enum CachedValue {
	/// A single product (`product:<id>`).
	Product(Box<Product>),
	/// The full product list (`products:all`).
	Products(Vec<Product>),
}

/// Snapshot of cache statistics exposed to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
	/// Number of entries currently stored, stale-but-unswept entries included.
	pub size: usize,
}

#[derive(Clone, Debug)]
struct CacheEntry {
	value: CachedValue,
	inserted_at: OffsetDateTime,
	ttl: Duration,
	tick: u64,
}
impl CacheEntry {
	fn is_stale_at(&self, now: OffsetDateTime) -> bool {
		now - self.inserted_at > self.ttl
	}
}

#[derive(Debug, Default)]
struct CacheInner {
	entries: HashMap<String, CacheEntry>,
	clock: u64,
}
impl CacheInner {
	fn next_tick(&mut self) -> u64 {
		self.clock += 1;

		self.clock
	}

	fn evict_least_recent(&mut self) {
		let victim = self
			.entries
			.iter()
			.min_by_key(|(_, entry)| entry.tick)
			.map(|(key, _)| key.clone());

		if let Some(key) = victim {
			self.entries.remove(&key);
		}
	}
}

/// Thread-safe key-value store with LRU eviction and independent per-entry
/// expiry.
#[derive(Debug)]
pub struct ResponseCache {
	inner: Mutex<CacheInner>,
	max_entries: usize,
}
impl ResponseCache {
	/// Creates a cache bounded to `max_entries` live entries.
	pub fn new(max_entries: usize) -> Self {
		Self { inner: Mutex::new(CacheInner::default()), max_entries: max_entries.max(1) }
	}

	/// Fetches a value, treating stale entries as absent.
	///
	/// A hit refreshes the entry's recency so recently-read entries outlive
	/// unread ones of the same age under eviction pressure.
	pub fn get(&self, key: &str) -> Option<CachedValue> {
		self.get_at(key, OffsetDateTime::now_utc())
	}

	/// [`get`](Self::get) with an explicit instant; deterministic path used by
	/// tests that simulate clock advance.
	pub fn get_at(&self, key: &str, now: OffsetDateTime) -> Option<CachedValue> {
		let mut guard = self.inner.lock();

		match guard.entries.get(key) {
			Some(entry) if entry.is_stale_at(now) => {
				guard.entries.remove(key);

				None
			},
			Some(_) => {
				let tick = guard.next_tick();
				let entry = guard.entries.get_mut(key)?;

				entry.tick = tick;

				Some(entry.value.clone())
			},
			None => None,
		}
	}

	/// Inserts or replaces an entry under its own TTL.
	///
	/// At capacity the least-recently-used entry is evicted first. Entries are
	/// replaced wholesale, never mutated in place.
	pub fn set(&self, key: impl Into<String>, value: CachedValue, ttl: Duration) {
		self.set_at(key, value, ttl, OffsetDateTime::now_utc());
	}

	/// [`set`](Self::set) with an explicit insertion instant.
	pub fn set_at(
		&self,
		key: impl Into<String>,
		value: CachedValue,
		ttl: Duration,
		now: OffsetDateTime,
	) {
		let key = key.into();
		let mut guard = self.inner.lock();

		if !guard.entries.contains_key(&key) && guard.entries.len() >= self.max_entries {
			guard.evict_least_recent();
		}

		let tick = guard.next_tick();

		guard.entries.insert(key, CacheEntry { value, inserted_at: now, ttl, tick });
	}

	/// Removes one entry; returns whether it was present.
	pub fn delete(&self, key: &str) -> bool {
		self.inner.lock().entries.remove(key).is_some()
	}

	/// Removes every entry whose key starts with `prefix`; returns the count.
	pub fn delete_by_prefix(&self, prefix: &str) -> usize {
		let mut guard = self.inner.lock();
		let before = guard.entries.len();

		guard.entries.retain(|key, _| !key.starts_with(prefix));

		before - guard.entries.len()
	}

	/// Drops every entry.
	pub fn clear(&self) {
		self.inner.lock().entries.clear();
	}

	/// Number of stored entries (stale-but-unswept entries included).
	pub fn len(&self) -> usize {
		self.inner.lock().entries.len()
	}

	/// Whether the cache holds no entries.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Statistics snapshot.
	pub fn stats(&self) -> CacheStats {
		CacheStats { size: self.len() }
	}
}
