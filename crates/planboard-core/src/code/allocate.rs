// ── Commit-time allocation ──
//
// `next_code` reads a snapshot and the caller commits later, so two
// callers holding the same snapshot compute the same code. Storage must
// reject the second commit; the allocator then re-reads and retries.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use thiserror::Error;
use tracing::{debug, warn};

use super::{Category, ModuleType, ObjectCode, next_code};
use crate::error::CoreError;

/// Default number of commit attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Failure reported by a [`CodeStore`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommitError {
    /// The code is already committed. Retryable.
    #[error("Object code {code} is already taken")]
    Conflict { code: String },

    /// Anything else. Not retried.
    #[error("{0}")]
    Storage(String),
}

impl From<CommitError> for CoreError {
    fn from(err: CommitError) -> Self {
        match err {
            CommitError::Conflict { code } => CoreError::Storage {
                message: format!("unexpected conflict on {code}"),
            },
            CommitError::Storage(message) => CoreError::Storage { message },
        }
    }
}

/// Durable home of object codes.
///
/// `commit` must be atomic with respect to other commits: of two
/// concurrent commits of the same code, exactly one succeeds and the
/// other returns [`CommitError::Conflict`].
pub trait CodeStore {
    /// Every stored identifier for the pair. Extra names are tolerated;
    /// the allocator filters by prefix.
    fn existing_codes(
        &self,
        module: ModuleType,
        category: Category,
    ) -> Result<Vec<String>, CommitError>;

    fn commit(&self, code: &ObjectCode) -> Result<(), CommitError>;
}

/// Snapshot, compute, commit; retry on conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeAllocator {
    max_attempts: u32,
}

impl Default for CodeAllocator {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl CodeAllocator {
    /// `max_attempts` is clamped to at least one.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Allocate and commit the next code for `(module, category)`.
    pub fn allocate<S: CodeStore + ?Sized>(
        &self,
        store: &S,
        module: ModuleType,
        category: Category,
    ) -> Result<ObjectCode, CoreError> {
        let snapshot = store.existing_codes(module, category)?;
        self.allocate_from(store, snapshot, module, category)
    }

    /// Like [`allocate`](Self::allocate), starting from a snapshot the
    /// caller already holds. The snapshot may be stale; later attempts
    /// always re-read the store.
    pub fn allocate_from<S: CodeStore + ?Sized>(
        &self,
        store: &S,
        mut snapshot: Vec<String>,
        module: ModuleType,
        category: Category,
    ) -> Result<ObjectCode, CoreError> {
        for attempt in 1..=self.max_attempts {
            let code = next_code(&snapshot, module, category)?;
            match store.commit(&code) {
                Ok(()) => {
                    debug!(%code, attempt, "object code committed");
                    return Ok(code);
                }
                Err(CommitError::Conflict { code: taken }) if attempt < self.max_attempts => {
                    debug!(code = %taken, attempt, "object code taken, re-reading snapshot");
                    snapshot = store.existing_codes(module, category)?;
                }
                Err(CommitError::Conflict { code: taken }) => {
                    debug!(code = %taken, attempt, "object code taken on final attempt");
                }
                Err(CommitError::Storage(message)) => {
                    return Err(CoreError::Storage { message });
                }
            }
        }

        let prefix = ObjectCode::prefix(module, category);
        warn!(%prefix, attempts = self.max_attempts, "object code allocation exhausted");
        Err(CoreError::AllocationExhausted {
            prefix,
            attempts: self.max_attempts,
        })
    }
}

// ── In-memory store ─────────────────────────────────────────────────

/// Lock-free reference [`CodeStore`].
///
/// Uniqueness is enforced through `DashMap`'s entry API, which holds the
/// shard lock between the existence check and the insert.
#[derive(Debug, Default)]
pub struct InMemoryCodeStore {
    /// Code text -> commit time.
    codes: DashMap<String, DateTime<Utc>>,
}

impl InMemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-load existing identifiers without uniqueness checks.
    /// Malformed names are kept; they simply never influence allocation.
    pub fn seed<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let now = Utc::now();
        for name in names {
            self.codes.insert(name.into(), now);
        }
    }

    /// All stored names, sorted.
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.codes.iter().map(|r| r.key().clone()).collect();
        codes.sort_unstable();
        codes
    }

    pub fn committed_at(&self, code: &str) -> Option<DateTime<Utc>> {
        self.codes.get(code).map(|r| *r.value())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl CodeStore for InMemoryCodeStore {
    fn existing_codes(
        &self,
        module: ModuleType,
        category: Category,
    ) -> Result<Vec<String>, CommitError> {
        let prefix = ObjectCode::prefix(module, category);
        Ok(self
            .codes
            .iter()
            .filter(|r| r.key().starts_with(&prefix))
            .map(|r| r.key().clone())
            .collect())
    }

    fn commit(&self, code: &ObjectCode) -> Result<(), CommitError> {
        match self.codes.entry(code.to_string()) {
            Entry::Occupied(slot) => Err(CommitError::Conflict {
                code: slot.key().clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(Utc::now());
                Ok(())
            }
        }
    }
}
