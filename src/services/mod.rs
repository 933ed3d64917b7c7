use std::num::NonZeroU32;
use std::sync::Arc;

use governor::{clock::DefaultClock, state::{InMemoryState, NotKeyed}, Quota, RateLimiter};

pub mod aggregate;
pub mod dexscreener;
pub mod launches;
pub mod market;
pub mod price;
pub mod trending;
pub mod wallet;

pub type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

pub fn per_second_limiter(requests: NonZeroU32) -> Arc<Limiter> {
    Arc::new(RateLimiter::direct(Quota::per_second(requests)))
}
