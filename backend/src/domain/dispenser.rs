//! Dispensers, their fill levels and the running-low predicate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::PantryId;

/// Threshold percentage applied when a dispenser is created without one.
pub const DEFAULT_THRESHOLD: i32 = 10;

/// Store-assigned dispenser identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DispenserId(i64);

impl DispenserId {
    /// Wrap a raw identifier.
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DispenserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a dispenser holds. Serialised as its two-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DispenserKind {
    /// Cold drinks.
    #[serde(rename = "DR")]
    Drink,
    /// Snacks.
    #[serde(rename = "SN")]
    Snack,
    /// Coffee.
    #[serde(rename = "CO")]
    Coffee,
}

impl DispenserKind {
    /// Every kind, in code order.
    pub const ALL: [Self; 3] = [Self::Drink, Self::Snack, Self::Coffee];

    /// Two-letter wire and storage code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Drink => "DR",
            Self::Snack => "SN",
            Self::Coffee => "CO",
        }
    }

    /// Human-readable name used in notifications.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Drink => "Drink",
            Self::Snack => "Snack",
            Self::Coffee => "Coffee",
        }
    }
}

impl fmt::Display for DispenserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Raised when a dispenser kind code is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDispenserKind(pub String);

impl fmt::Display for UnknownDispenserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dispenser type '{}'; expected DR, SN or CO", self.0)
    }
}

impl std::error::Error for UnknownDispenserKind {}

impl FromStr for DispenserKind {
    type Err = UnknownDispenserKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == s)
            .ok_or_else(|| UnknownDispenserKind(s.to_owned()))
    }
}

/// Validation failures for dispenser fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispenserValidationError {
    /// Capacity must be at least one unit.
    NonPositiveCapacity { max_capacity: i64 },
    /// Levels are never negative.
    NegativeLevel { current_level: i64 },
    /// Thresholds are non-negative percentages.
    NegativeThreshold { threshold: i64 },
    /// Value does not fit the storage column.
    OutOfRange { field: &'static str, value: i64 },
}

impl fmt::Display for DispenserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveCapacity { max_capacity } => {
                write!(f, "max_capacity must be a positive integer, got {max_capacity}")
            }
            Self::NegativeLevel { current_level } => {
                write!(f, "current_level must not be negative, got {current_level}")
            }
            Self::NegativeThreshold { threshold } => {
                write!(f, "threshold must not be negative, got {threshold}")
            }
            Self::OutOfRange { field, value } => {
                write!(f, "{field} is out of range: {value}")
            }
        }
    }
}

impl std::error::Error for DispenserValidationError {}

fn to_column(field: &'static str, value: i64) -> Result<i32, DispenserValidationError> {
    i32::try_from(value).map_err(|_| DispenserValidationError::OutOfRange { field, value })
}

/// Validated mutable fields of a dispenser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispenserDraft {
    kind: DispenserKind,
    max_capacity: i32,
    current_level: i32,
    threshold: i32,
    pantry: PantryId,
}

/// Raw dispenser fields prior to validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispenserFields {
    /// Contents type.
    pub kind: DispenserKind,
    /// Capacity in units; must be positive.
    pub max_capacity: i64,
    /// Current fill in units; must not be negative.
    pub current_level: i64,
    /// Running-low percentage; defaults to [`DEFAULT_THRESHOLD`].
    pub threshold: Option<i64>,
    /// Parent pantry.
    pub pantry: PantryId,
}

impl DispenserDraft {
    /// Validate raw dispenser fields.
    ///
    /// Zero capacity is rejected here so the running-low predicate never
    /// divides by zero for stored dispensers.
    ///
    /// # Examples
    /// ```
    /// use pantry_backend::domain::{DispenserDraft, DispenserFields, DispenserKind, PantryId};
    ///
    /// let fields = DispenserFields {
    ///     kind: DispenserKind::Coffee,
    ///     max_capacity: 0,
    ///     current_level: 0,
    ///     threshold: None,
    ///     pantry: PantryId::new(1),
    /// };
    /// assert!(DispenserDraft::new(fields).is_err());
    /// ```
    pub fn new(fields: DispenserFields) -> Result<Self, DispenserValidationError> {
        let DispenserFields {
            kind,
            max_capacity,
            current_level,
            threshold,
            pantry,
        } = fields;
        if max_capacity <= 0 {
            return Err(DispenserValidationError::NonPositiveCapacity { max_capacity });
        }
        if current_level < 0 {
            return Err(DispenserValidationError::NegativeLevel { current_level });
        }
        let threshold = threshold.unwrap_or(i64::from(DEFAULT_THRESHOLD));
        if threshold < 0 {
            return Err(DispenserValidationError::NegativeThreshold { threshold });
        }
        Ok(Self {
            kind,
            max_capacity: to_column("max_capacity", max_capacity)?,
            current_level: to_column("current_level", current_level)?,
            threshold: to_column("threshold", threshold)?,
            pantry,
        })
    }

    /// Contents type.
    pub fn kind(&self) -> DispenserKind {
        self.kind
    }

    /// Capacity in units.
    pub fn max_capacity(&self) -> i32 {
        self.max_capacity
    }

    /// Current fill in units.
    pub fn current_level(&self) -> i32 {
        self.current_level
    }

    /// Running-low percentage.
    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Parent pantry.
    pub fn pantry(&self) -> PantryId {
        self.pantry
    }
}

/// Persisted dispenser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispenser {
    id: DispenserId,
    kind: DispenserKind,
    max_capacity: i32,
    current_level: i32,
    threshold: i32,
    pantry: PantryId,
}

impl Dispenser {
    /// Combine a store-assigned id with validated fields.
    pub fn from_draft(id: DispenserId, draft: DispenserDraft) -> Self {
        Self {
            id,
            kind: draft.kind,
            max_capacity: draft.max_capacity,
            current_level: draft.current_level,
            threshold: draft.threshold,
            pantry: draft.pantry,
        }
    }

    /// Identifier.
    pub fn id(&self) -> DispenserId {
        self.id
    }

    /// Contents type.
    pub fn kind(&self) -> DispenserKind {
        self.kind
    }

    /// Capacity in units.
    pub fn max_capacity(&self) -> i32 {
        self.max_capacity
    }

    /// Current fill in units.
    pub fn current_level(&self) -> i32 {
        self.current_level
    }

    /// Running-low percentage.
    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Parent pantry.
    pub fn pantry(&self) -> PantryId {
        self.pantry
    }

    /// Copy of this dispenser with a new absolute level.
    #[must_use]
    pub fn with_current_level(mut self, level: CurrentLevel) -> Self {
        self.current_level = level.get();
        self
    }

    /// Whether the dispenser is below its threshold.
    pub fn is_running_low(&self) -> bool {
        is_running_low(self.current_level, self.max_capacity, self.threshold)
    }

    /// Fill percentage, for diagnostics only.
    pub fn fill_percentage(&self) -> f64 {
        if self.max_capacity <= 0 {
            return 0.0;
        }
        f64::from(self.current_level) * 100.0 / f64::from(self.max_capacity)
    }
}

/// Running-low predicate: `current_level / max_capacity * 100 < threshold`.
///
/// The comparison is evaluated exactly on the rational value by
/// cross-multiplying in 64-bit integers, so boundaries such as 29 of 100 with
/// a threshold of 29 are not misclassified by floating-point rounding. A
/// non-positive capacity counts as running low.
///
/// # Examples
/// ```
/// use pantry_backend::domain::is_running_low;
///
/// assert!(is_running_low(9, 100, 10));
/// assert!(!is_running_low(10, 100, 10));
/// assert!(is_running_low(9, 50, 20));
/// ```
pub fn is_running_low(current_level: i32, max_capacity: i32, threshold: i32) -> bool {
    if max_capacity <= 0 {
        return true;
    }
    i64::from(current_level) * 100 < i64::from(threshold) * i64::from(max_capacity)
}

/// Pantry and floor that host a dispenser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispenserLocation {
    /// Hosting pantry name.
    pub pantry_name: String,
    /// Floor number of the hosting pantry.
    pub floor_number: i32,
}

/// Validated absolute level submitted by a sensor or client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CurrentLevel(i32);

impl CurrentLevel {
    /// Validate an integer level.
    pub fn new(value: i64) -> Result<Self, LevelInputError> {
        if value < 0 {
            return Err(LevelInputError::Negative { value });
        }
        i32::try_from(value)
            .map(Self)
            .map_err(|_| LevelInputError::TooLarge { value })
    }

    /// Level value in units.
    pub fn get(self) -> i32 {
        self.0
    }
}

/// Why a submitted `current_level` was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelInputError {
    /// Field absent or `null`.
    Missing,
    /// Value could not be read as an integer.
    NotAnInteger,
    /// Value was an integer below zero.
    Negative { value: i64 },
    /// Value exceeded the storage range.
    TooLarge { value: i64 },
}

impl LevelInputError {
    /// Machine-readable detail code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing => "missing_field",
            Self::NotAnInteger => "not_an_integer",
            Self::Negative { .. } => "negative_level",
            Self::TooLarge { .. } => "level_out_of_range",
        }
    }
}

impl fmt::Display for LevelInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("'current_level' is required"),
            Self::NotAnInteger | Self::Negative { .. } | Self::TooLarge { .. } => {
                f.write_str("'current_level' must be a positive integer")
            }
        }
    }
}

impl std::error::Error for LevelInputError {}

/// Coerce a raw JSON `current_level` into a [`CurrentLevel`].
///
/// Integers, finite numbers (truncated toward zero) and strings holding a
/// signed base-10 integer are accepted. Zero is valid.
///
/// # Examples
/// ```
/// use pantry_backend::domain::{LevelInputError, parse_current_level};
/// use serde_json::json;
///
/// assert_eq!(parse_current_level(Some(&json!("12"))).map(|l| l.get()), Ok(12));
/// assert_eq!(parse_current_level(Some(&json!(0))).map(|l| l.get()), Ok(0));
/// assert_eq!(parse_current_level(None), Err(LevelInputError::Missing));
/// ```
pub fn parse_current_level(raw: Option<&Value>) -> Result<CurrentLevel, LevelInputError> {
    let integer = match raw {
        None | Some(Value::Null) => return Err(LevelInputError::Missing),
        Some(Value::Number(number)) => integer_from_number(number)?,
        Some(Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| LevelInputError::NotAnInteger)?,
        Some(Value::Bool(_) | Value::Array(_) | Value::Object(_)) => {
            return Err(LevelInputError::NotAnInteger);
        }
    };
    CurrentLevel::new(integer)
}

fn integer_from_number(number: &serde_json::Number) -> Result<i64, LevelInputError> {
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }
    if number.is_u64() {
        return Err(LevelInputError::TooLarge { value: i64::MAX });
    }
    let Some(float) = number.as_f64().filter(|value| value.is_finite()) else {
        return Err(LevelInputError::NotAnInteger);
    };
    let truncated = float.trunc();
    if truncated < -1.0e15 || truncated > 1.0e15 {
        return Err(LevelInputError::NotAnInteger);
    }
    // Range checked above, so the cast is exact.
    Ok(truncated as i64)
}

#[cfg(test)]
#[path = "dispenser_tests.rs"]
mod tests;
