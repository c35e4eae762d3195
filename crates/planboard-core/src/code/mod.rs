// ── Object codes ──
//
// Human-readable identifiers of the form `OBJ-<MM>-<CC>-<NNN>`, numbered
// per (module, category) pair. Allocation here is a pure function of a
// snapshot; exclusivity is enforced at commit time (see `allocate`).

pub mod allocate;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};
use tracing::trace;

use crate::error::CoreError;

/// Leading tag shared by every object code.
pub const CODE_PREFIX: &str = "OBJ";

/// Minimum rendered width of the sequence number.
pub const SEQUENCE_WIDTH: usize = 3;

// ── ModuleType ──────────────────────────────────────────────────────

/// Planning module an object belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModuleType {
    DemandPlanning,
    SupplyPlanning,
}

impl ModuleType {
    /// Two-letter tag used in object codes.
    pub fn code(self) -> &'static str {
        match self {
            Self::DemandPlanning => "DP",
            Self::SupplyPlanning => "SP",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::iter().find(|m| m.code() == code)
    }

    /// Parse the snake_case name. Unknown names are a configuration error.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        Self::from_str(raw).map_err(|_| CoreError::UnknownModule {
            value: raw.to_owned(),
        })
    }
}

// ── Category ────────────────────────────────────────────────────────

/// Object category within a module.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum Category {
    #[serde(rename = "master_data")]
    #[strum(serialize = "master_data")]
    MasterData,
    #[serde(rename = "drivers")]
    #[strum(serialize = "drivers")]
    Drivers,
    #[serde(rename = "priority_1")]
    #[strum(serialize = "priority_1")]
    Priority1,
    #[serde(rename = "priority_2")]
    #[strum(serialize = "priority_2")]
    Priority2,
    #[serde(rename = "priority_3")]
    #[strum(serialize = "priority_3")]
    Priority3,
}

impl Category {
    pub fn code(self) -> &'static str {
        match self {
            Self::MasterData => "MD",
            Self::Drivers => "DR",
            Self::Priority1 => "P1",
            Self::Priority2 => "P2",
            Self::Priority3 => "P3",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::iter().find(|c| c.code() == code)
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        Self::from_str(raw).map_err(|_| CoreError::UnknownCategory {
            value: raw.to_owned(),
        })
    }
}

// ── ObjectCode ──────────────────────────────────────────────────────

/// A structured object identifier, e.g. `OBJ-DP-MD-001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectCode {
    pub module: ModuleType,
    pub category: Category,
    pub sequence: u64,
}

impl ObjectCode {
    pub fn new(module: ModuleType, category: Category, sequence: u64) -> Self {
        Self {
            module,
            category,
            sequence,
        }
    }

    /// `OBJ-<MM>-<CC>-`, the part shared by every code in the pair.
    pub fn prefix(module: ModuleType, category: Category) -> String {
        format!("{CODE_PREFIX}-{}-{}-", module.code(), category.code())
    }
}

impl fmt::Display for ObjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:0width$}",
            Self::prefix(self.module, self.category),
            self.sequence,
            width = SEQUENCE_WIDTH
        )
    }
}

impl FromStr for ObjectCode {
    type Err = CoreError;

    /// Accepts only the exact rendered form: `OBJ-DP-MD-7` and
    /// `OBJ-DP-MD-0007` are rejected because they would render as
    /// `OBJ-DP-MD-007`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| CoreError::MalformedCode {
            value: s.to_owned(),
            reason: reason.to_owned(),
        };

        let mut parts = s.splitn(4, '-');
        let (Some(tag), Some(module), Some(category), Some(digits)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed("expected OBJ-<module>-<category>-<number>"));
        };

        if tag != CODE_PREFIX {
            return Err(malformed("missing OBJ tag"));
        }
        let module = ModuleType::from_code(module).ok_or_else(|| malformed("unknown module tag"))?;
        let category =
            Category::from_code(category).ok_or_else(|| malformed("unknown category tag"))?;
        let sequence = parse_sequence(digits).map_err(|err| match err {
            SequenceError::Malformed => malformed("invalid sequence number"),
            SequenceError::TooLarge => malformed("sequence number out of range"),
        })?;

        let code = Self::new(module, category, sequence);
        if code.to_string() != s {
            return Err(malformed("sequence is not padded to its canonical width"));
        }
        Ok(code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SequenceError {
    /// Not a plain run of ASCII digits.
    Malformed,
    /// A valid number that does not fit in `u64`.
    TooLarge,
}

/// Strict base-10 parse: ASCII digits only, no sign, no whitespace.
fn parse_sequence(digits: &str) -> Result<u64, SequenceError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SequenceError::Malformed);
    }
    // Only overflow can fail once the digits are checked.
    digits.parse().map_err(|_| SequenceError::TooLarge)
}

// ── Allocation ──────────────────────────────────────────────────────

/// Compute the next code for `(module, category)` from a snapshot of
/// existing identifiers.
///
/// Only names carrying the exact (case-sensitive) prefix count. Entries
/// whose suffix is not a number are skipped. Gaps are never reused: the
/// result is one past the highest sequence seen, or 1 for none.
///
/// A numeric suffix too large for `u64` still counts as the highest
/// sequence, so the pair is exhausted and the call fails with
/// [`CoreError::SequenceOverflow`].
pub fn next_code<I, S>(
    existing: I,
    module: ModuleType,
    category: Category,
) -> Result<ObjectCode, CoreError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let prefix = ObjectCode::prefix(module, category);

    let mut highest: Option<u64> = None;
    for name in existing {
        let name = name.as_ref();
        let Some(suffix) = name.strip_prefix(prefix.as_str()) else {
            continue;
        };
        match parse_sequence(suffix) {
            Ok(sequence) => highest = highest.max(Some(sequence)),
            Err(SequenceError::Malformed) => {
                trace!(name, "ignoring malformed object code");
            }
            Err(SequenceError::TooLarge) => {
                return Err(CoreError::SequenceOverflow { prefix });
            }
        }
    }

    let sequence = match highest {
        None => 1,
        Some(max) => max
            .checked_add(1)
            .ok_or(CoreError::SequenceOverflow { prefix })?,
    };

    Ok(ObjectCode::new(module, category, sequence))
}

/// Text entry point for [`next_code`].
///
/// An unrecognized module or category fails immediately; there is no
/// fallback tag.
pub fn compute_next_code<I, S>(existing: I, module: &str, category: &str) -> Result<String, CoreError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let module = ModuleType::parse(module)?;
    let category = Category::parse(category)?;
    next_code(existing, module, category).map(|code| code.to_string())
}
