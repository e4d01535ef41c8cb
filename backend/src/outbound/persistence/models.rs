//! Internal Diesel row structs.
//!
//! Rows never leave the persistence layer; conversions into domain types
//! re-run domain validation so a hand-edited row cannot smuggle an invalid
//! value past the adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Dispenser, DispenserDraft, DispenserFields, DispenserId, DispenserKind, Floor, FloorDraft,
    FloorId, Pantry, PantryDraft, PantryId, PasswordDigest, TokenDigest, TokenKind, TokenRecord,
    User, UserId, Username,
};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = super::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub password_salt: String,
    pub password_hash: String,
}

/// Insertable `users` row.
#[derive(Debug, Insertable)]
#[diesel(table_name = super::schema::users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub password_salt: &'a str,
    pub password_hash: &'a str,
}

impl UserRow {
    pub(crate) fn into_user(self) -> Result<(User, PasswordDigest), String> {
        let username = Username::new(&self.username)
            .map_err(|err| format!("stored username is invalid: {err}"))?;
        let user = User::new(UserId::from_uuid(self.id), username, self.email);
        Ok((
            user,
            PasswordDigest::from_parts(self.password_salt, self.password_hash),
        ))
    }
}

/// Row read from and written to `auth_tokens`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = super::schema::auth_tokens)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TokenRow {
    pub digest: String,
    pub user_id: Uuid,
    pub kind: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&TokenRecord> for TokenRow {
    fn from(record: &TokenRecord) -> Self {
        Self {
            digest: record.digest.as_str().to_owned(),
            user_id: *record.user_id.as_uuid(),
            kind: record.kind.as_str().to_owned(),
            expires_at: record.expires_at,
        }
    }
}

impl TokenRow {
    pub(crate) fn into_record(self) -> Result<TokenRecord, String> {
        let kind = TokenKind::parse(&self.kind)
            .ok_or_else(|| format!("stored token kind '{}' is unknown", self.kind))?;
        Ok(TokenRecord {
            digest: TokenDigest::from_stored(self.digest),
            user_id: UserId::from_uuid(self.user_id),
            kind,
            expires_at: self.expires_at,
        })
    }
}

/// Row read from `floors`.
#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = super::schema::floors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FloorRow {
    pub id: i64,
    pub number: i32,
    pub owner_id: Uuid,
}

/// Insertable and updatable `floors` fields.
#[derive(Debug, Clone, Copy, Insertable, AsChangeset)]
#[diesel(table_name = super::schema::floors)]
pub(crate) struct FloorChanges {
    pub number: i32,
    pub owner_id: Uuid,
}

impl From<&FloorDraft> for FloorChanges {
    fn from(draft: &FloorDraft) -> Self {
        Self {
            number: draft.number(),
            owner_id: *draft.owner().as_uuid(),
        }
    }
}

impl TryFrom<FloorRow> for Floor {
    type Error = String;

    fn try_from(row: FloorRow) -> Result<Self, Self::Error> {
        let draft = FloorDraft::new(i64::from(row.number), UserId::from_uuid(row.owner_id))
            .map_err(|err| format!("stored floor {} is invalid: {err}", row.id))?;
        Ok(Floor::from_draft(FloorId::new(row.id), draft))
    }
}

/// Row read from `pantries`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = super::schema::pantries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PantryRow {
    pub id: i64,
    pub name: String,
    pub floor_id: i64,
}

/// Insertable and updatable `pantries` fields.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = super::schema::pantries)]
pub(crate) struct PantryChanges<'a> {
    pub name: &'a str,
    pub floor_id: i64,
}

impl<'a> From<&'a PantryDraft> for PantryChanges<'a> {
    fn from(draft: &'a PantryDraft) -> Self {
        Self {
            name: draft.name(),
            floor_id: draft.floor().get(),
        }
    }
}

impl TryFrom<PantryRow> for Pantry {
    type Error = String;

    fn try_from(row: PantryRow) -> Result<Self, Self::Error> {
        let draft = PantryDraft::new(&row.name, FloorId::new(row.floor_id))
            .map_err(|err| format!("stored pantry {} is invalid: {err}", row.id))?;
        Ok(Pantry::from_draft(PantryId::new(row.id), draft))
    }
}

/// Row read from `dispensers`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = super::schema::dispensers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DispenserRow {
    pub id: i64,
    pub kind: String,
    pub max_capacity: i32,
    pub current_level: i32,
    pub threshold: i32,
    pub pantry_id: i64,
}

/// Insertable and updatable `dispensers` fields.
#[derive(Debug, Clone, Copy, Insertable, AsChangeset)]
#[diesel(table_name = super::schema::dispensers)]
pub(crate) struct DispenserChanges {
    pub kind: &'static str,
    pub max_capacity: i32,
    pub current_level: i32,
    pub threshold: i32,
    pub pantry_id: i64,
}

impl From<&DispenserDraft> for DispenserChanges {
    fn from(draft: &DispenserDraft) -> Self {
        Self {
            kind: draft.kind().code(),
            max_capacity: draft.max_capacity(),
            current_level: draft.current_level(),
            threshold: draft.threshold(),
            pantry_id: draft.pantry().get(),
        }
    }
}

impl TryFrom<DispenserRow> for Dispenser {
    type Error = String;

    fn try_from(row: DispenserRow) -> Result<Self, Self::Error> {
        let kind: DispenserKind = row
            .kind
            .parse()
            .map_err(|err| format!("stored dispenser {} is invalid: {err}", row.id))?;
        let draft = DispenserDraft::new(DispenserFields {
            kind,
            max_capacity: i64::from(row.max_capacity),
            current_level: i64::from(row.current_level),
            threshold: Some(i64::from(row.threshold)),
            pantry: PantryId::new(row.pantry_id),
        })
        .map_err(|err| format!("stored dispenser {} is invalid: {err}", row.id))?;
        Ok(Dispenser::from_draft(DispenserId::new(row.id), draft))
    }
}
