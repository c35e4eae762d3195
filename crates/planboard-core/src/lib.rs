//! Filter state, saved views, and object code allocation for the
//! planboard dashboard.
//!
//! - **[`FilterStateStore`]**: Owns the query text that is the single
//!   source of truth for active filters and sort order. Every read parses
//!   the text into an immutable [`FilterState`] snapshot; every write
//!   re-encodes it.
//!
//! - **[`SavedViewRegistry`]**: Fixed catalog of named filter presets per
//!   [`EntityDomain`], built once at startup.
//!
//! - **[`ViewMatcher`]**: Resolves which saved view (or "All") the current
//!   state selects, by canonical, order-independent comparison.
//!
//! - **Object codes** ([`code`]): [`next_code`] derives the next
//!   `OBJ-<module>-<category>-<NNN>` identifier from a snapshot;
//!   [`CodeAllocator`] commits it through a [`CodeStore`] and retries on
//!   commit-time conflicts.

pub mod code;
pub mod error;
pub mod filter;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use code::allocate::{CodeAllocator, CodeStore, CommitError, InMemoryCodeStore};
pub use code::{Category, ModuleType, ObjectCode, compute_next_code, next_code};
pub use error::CoreError;
pub use filter::{
    FilterKey, FilterState, FilterStateStore, SortDirection, SortSpec, encode_query, parse_query,
};
pub use view::{ActiveView, EntityDomain, SavedView, SavedViewRegistry, ViewMatcher};
