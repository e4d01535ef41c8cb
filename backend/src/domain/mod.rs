//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed inventory entities (floors, pantries,
//! dispensers), accounts and bearer tokens, and the services that implement
//! the driving ports. Types validate their invariants at construction so
//! adapters never persist malformed values.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Floor, Pantry, Dispenser and their drafts: the inventory tree.
//! - LevelUpdateService: the level-update and running-low workflow.
//! - LowLevelNotifier: best-effort running-low messages.
//! - InventoryService, AccountService, SampleDataSeeder.

pub mod account_service;
pub mod auth;
pub mod dispenser;
pub mod error;
pub mod floor;
pub mod inventory_service;
pub mod level_update;
pub mod notification;
pub mod pantry;
pub mod ports;
pub mod sample_data_seeder;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, TokenLifetimes};
pub use self::auth::{
    LoginCredentials, LoginValidationError, PasswordDigest, Registration, TokenDigest, TokenKind,
    TokenPair, TokenRecord, generate_token_secret,
};
pub use self::dispenser::{
    CurrentLevel, DEFAULT_THRESHOLD, Dispenser, DispenserDraft, DispenserFields, DispenserId,
    DispenserKind, DispenserLocation, DispenserValidationError, LevelInputError,
    UnknownDispenserKind, is_running_low, parse_current_level,
};
pub use self::error::{Error, ErrorCode};
pub use self::floor::{Floor, FloorDraft, FloorId, FloorValidationError};
pub use self::inventory_service::InventoryService;
pub use self::level_update::{LevelUpdateOutcome, LevelUpdateService};
pub use self::notification::{
    DEFAULT_NOTIFICATION_TIMEOUT, DEFAULT_RECIPIENT, DEFAULT_SENDER, LowLevelNotice,
    LowLevelNotifier, NotificationFailure, NotifyOutcome,
};
pub use self::pantry::{PANTRY_NAME_MAX, Pantry, PantryDraft, PantryId, PantryValidationError};
pub use self::sample_data_seeder::{SampleDataOutcome, SampleDataSeeder, SampleDataSeedingError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{USERNAME_MAX, User, UserId, UserValidationError, Username, normalise_email};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use pantry_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::unauthorized("missing bearer token"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
