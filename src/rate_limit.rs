//! Token-bucket admission control for outbound API calls.
//!
//! The bucket refills continuously at `refill_per_second` up to `max_tokens` without a
//! background timer: every public operation first credits the tokens accrued since the last
//! observation. Internally the balance is fractional; callers only ever see it floored.

// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	obs,
};

/// Shortest pause [`RateLimiter::consume`] takes between attempts.
pub const MIN_WAIT: Duration = Duration::milliseconds(100);

/// Result of a single admission attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
	/// The tokens were taken and the call may proceed immediately.
	Allow,
	/// Not enough tokens; nothing was taken.
	Delay(RetryDirective),
}
impl RateLimitDecision {
	/// Returns `true` for [`RateLimitDecision::Allow`].
	pub fn is_allowed(&self) -> bool {
		matches!(self, Self::Allow)
	}
}

/// Advises callers when to retry after a [`RateLimitDecision::Delay`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryDirective {
	/// Instant when enough tokens are expected to have accrued.
	pub earliest_retry_at: OffsetDateTime,
	/// Suggested pause before the next attempt.
	pub recommended_backoff: Duration,
}
impl RetryDirective {
	/// Creates a new directive with the provided timing metadata.
	pub fn new(earliest_retry_at: OffsetDateTime, recommended_backoff: Duration) -> Self {
		Self { earliest_retry_at, recommended_backoff }
	}
}

#[derive(Debug)]
struct Bucket {
	tokens: f64,
	last_refill: OffsetDateTime,
}

/// Token bucket shared by every request a client issues.
pub struct RateLimiter {
	bucket: Mutex<Bucket>,
	max_tokens: u32,
	refill_per_second: f64,
	clock: Arc<dyn Clock>,
}
impl RateLimiter {
	/// Bucket size used by [`RateLimiter::default`].
	pub const DEFAULT_MAX_TOKENS: u32 = 10;
	/// Refill rate used by [`RateLimiter::default`].
	pub const DEFAULT_REFILL_PER_SECOND: f64 = 2.;

	/// Creates a full bucket that reads time from the wall clock.
	pub fn new(max_tokens: u32, refill_per_second: f64) -> Self {
		Self::with_clock(max_tokens, refill_per_second, Arc::new(SystemClock))
	}

	/// Creates a full bucket that reads time from `clock`.
	pub fn with_clock(max_tokens: u32, refill_per_second: f64, clock: Arc<dyn Clock>) -> Self {
		let bucket = Bucket { tokens: max_tokens as f64, last_refill: clock.now() };

		Self { bucket: Mutex::new(bucket), max_tokens, refill_per_second, clock }
	}

	/// Bucket capacity.
	pub fn max_tokens(&self) -> u32 {
		self.max_tokens
	}

	/// Tokens credited per second.
	pub fn refill_per_second(&self) -> f64 {
		self.refill_per_second
	}

	/// Takes `tokens` if the bucket holds at least that many, otherwise takes nothing and
	/// reports how long to wait.
	pub fn evaluate(&self, tokens: u32) -> RateLimitDecision {
		let now = self.clock.now();
		let mut bucket = self.bucket.lock();

		self.refill(&mut bucket, now);

		let requested = tokens as f64;

		if bucket.tokens >= requested {
			bucket.tokens -= requested;

			return RateLimitDecision::Allow;
		}

		let backoff = self.backoff_for(requested - bucket.tokens);

		RateLimitDecision::Delay(RetryDirective::new(now + backoff, backoff))
	}

	/// Takes `tokens` if available and reports whether it did.
	pub fn try_consume(&self, tokens: u32) -> bool {
		self.evaluate(tokens).is_allowed()
	}

	/// Waits cooperatively until `tokens` can be taken, then takes them.
	///
	/// Every retry re-reads the bucket instead of trusting the previous estimate, so time
	/// drift or competing consumers only lengthen the wait. There is no timeout: a request
	/// larger than [`max_tokens`](Self::max_tokens) never completes.
	pub async fn consume(&self, tokens: u32) {
		while let RateLimitDecision::Delay(directive) = self.evaluate(tokens) {
			obs::log_rate_limit_wait(tokens, directive.recommended_backoff);

			let pause = std::time::Duration::try_from(directive.recommended_backoff)
				.unwrap_or(std::time::Duration::from_millis(100));

			tokio::time::sleep(pause).await;
		}
	}

	/// Whole tokens currently available.
	pub fn available_tokens(&self) -> u32 {
		let now = self.clock.now();
		let mut bucket = self.bucket.lock();

		self.refill(&mut bucket, now);

		bucket.tokens.floor() as u32
	}

	/// Refills the bucket to capacity and restarts the refill clock.
	pub fn reset(&self) {
		let now = self.clock.now();
		let mut bucket = self.bucket.lock();

		bucket.tokens = self.max_tokens as f64;
		bucket.last_refill = now;
	}

	fn refill(&self, bucket: &mut Bucket, now: OffsetDateTime) {
		// A clock stepping backwards credits nothing.
		let elapsed = (now - bucket.last_refill).as_seconds_f64().max(0.);
		let credited = bucket.tokens + elapsed * self.refill_per_second;

		bucket.tokens = credited.clamp(0., self.max_tokens as f64);
		// The anchor only moves forward so a stepped-back interval is never credited twice.
		bucket.last_refill = bucket.last_refill.max(now);
	}

	fn backoff_for(&self, deficit: f64) -> Duration {
		if self.refill_per_second <= 0. {
			return MIN_WAIT;
		}

		Duration::checked_seconds_f64(deficit / self.refill_per_second)
			.map_or(MIN_WAIT, |wait| wait.max(MIN_WAIT))
	}
}
impl Default for RateLimiter {
	fn default() -> Self {
		Self::new(Self::DEFAULT_MAX_TOKENS, Self::DEFAULT_REFILL_PER_SECOND)
	}
}
impl Debug for RateLimiter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RateLimiter")
			.field("max_tokens", &self.max_tokens)
			.field("refill_per_second", &self.refill_per_second)
			.field("tokens", &self.bucket.lock().tokens)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::time::Instant;
	// self
	use super::*;
	use crate::clock::ManualClock;

	fn limiter(max_tokens: u32, refill: f64) -> (RateLimiter, ManualClock) {
		let clock = ManualClock::default();
		let limiter = RateLimiter::with_clock(max_tokens, refill, Arc::new(clock.clone()));

		(limiter, clock)
	}

	#[test]
	fn starts_full_and_drains() {
		let (limiter, _clock) = limiter(10, 2.);

		assert_eq!(limiter.available_tokens(), 10);
		assert!(limiter.try_consume(10));
		assert_eq!(limiter.available_tokens(), 0);
		assert!(!limiter.try_consume(1));
	}

	#[test]
	fn failed_attempt_takes_nothing() {
		let (limiter, _clock) = limiter(5, 1.);

		assert!(limiter.try_consume(3));
		assert!(!limiter.try_consume(3));
		assert_eq!(limiter.available_tokens(), 2);
	}

	#[test]
	fn refills_over_time() {
		let (limiter, clock) = limiter(10, 2.);

		assert!(limiter.try_consume(10));

		clock.advance(Duration::milliseconds(400));

		assert!(!limiter.try_consume(1));

		clock.advance(Duration::milliseconds(100));

		assert!(limiter.try_consume(1));
		assert_eq!(limiter.available_tokens(), 0);
	}

	#[test]
	fn never_exceeds_capacity() {
		let (limiter, clock) = limiter(10, 2.);

		clock.advance(Duration::seconds(3));

		assert_eq!(limiter.available_tokens(), 10);

		assert!(limiter.try_consume(4));
		clock.advance(Duration::hours(1));

		assert_eq!(limiter.available_tokens(), 10);
	}

	#[test]
	fn available_tokens_are_floored() {
		let (limiter, clock) = limiter(10, 2.);

		assert!(limiter.try_consume(10));
		clock.advance(Duration::milliseconds(1_250));

		assert_eq!(limiter.available_tokens(), 2);
	}

	#[test]
	fn clock_going_backwards_credits_nothing() {
		let (limiter, clock) = limiter(4, 1.);

		clock.advance(Duration::seconds(100));

		assert!(limiter.try_consume(4));
		clock.advance(Duration::seconds(-10));

		assert_eq!(limiter.available_tokens(), 0);

		clock.advance(Duration::seconds(10));

		assert_eq!(limiter.available_tokens(), 0);

		clock.advance(Duration::seconds(2));

		assert_eq!(limiter.available_tokens(), 2);
	}

	#[test]
	fn delay_directive_reflects_deficit() {
		let (limiter, clock) = limiter(10, 2.);

		assert!(limiter.try_consume(10));

		let RateLimitDecision::Delay(directive) = limiter.evaluate(3) else {
			panic!("An empty bucket should ask the caller to wait.");
		};

		assert_eq!(directive.recommended_backoff, Duration::milliseconds(1_500));
		assert_eq!(directive.earliest_retry_at, clock.now() + Duration::milliseconds(1_500));

		clock.advance(Duration::milliseconds(1_480));

		let RateLimitDecision::Delay(directive) = limiter.evaluate(3) else {
			panic!("A nearly refilled bucket should still ask the caller to wait.");
		};

		assert_eq!(directive.recommended_backoff, MIN_WAIT);
	}

	#[test]
	fn zero_refill_rate_falls_back_to_min_wait() {
		let (limiter, _clock) = limiter(1, 0.);

		assert!(limiter.try_consume(1));
		assert_eq!(
			limiter.evaluate(1),
			RateLimitDecision::Delay(RetryDirective::new(
				OffsetDateTime::UNIX_EPOCH + MIN_WAIT,
				MIN_WAIT
			))
		);
	}

	#[test]
	fn reset_restores_capacity() {
		let (limiter, _clock) = limiter(10, 2.);

		assert!(limiter.try_consume(7));

		limiter.reset();

		assert_eq!(limiter.available_tokens(), 10);
	}

	#[tokio::test]
	async fn consume_returns_immediately_when_tokens_exist() {
		let limiter = RateLimiter::new(3, 1.);
		let started = Instant::now();

		limiter.consume(2).await;

		assert!(started.elapsed() < std::time::Duration::from_millis(100));
		assert_eq!(limiter.available_tokens(), 1);
	}

	#[tokio::test]
	async fn consume_waits_for_refill() {
		let limiter = RateLimiter::new(2, 5.);

		assert!(limiter.try_consume(2));

		let started = Instant::now();

		limiter.consume(1).await;

		// One token at five per second takes 200ms to accrue.
		assert!(started.elapsed() >= std::time::Duration::from_millis(190));
		assert_eq!(limiter.available_tokens(), 0);
	}
}
