//! `orla-infra` — persistence for users and events.
//!
//! Store traits plus two implementations: an in-memory store for tests/dev
//! and a Postgres store for production. Business rules do not live here;
//! the stores only persist, look up, and filter.

pub mod store;

pub use store::{EventStore, StoreError, UserStore};
pub use store::in_memory::InMemoryStore;
pub use store::postgres::PostgresStore;
