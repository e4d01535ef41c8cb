//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations` exactly.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        email -> Nullable<Varchar>,
        password_salt -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Issued bearer tokens, keyed by the SHA-256 digest of the secret.
    auth_tokens (digest) {
        digest -> Varchar,
        user_id -> Uuid,
        kind -> Varchar,
        expires_at -> Timestamptz,
    }
}

diesel::table! {
    /// Building floors.
    floors (id) {
        id -> Int8,
        number -> Int4,
        owner_id -> Uuid,
    }
}

diesel::table! {
    /// Pantries; deleted with their floor.
    pantries (id) {
        id -> Int8,
        name -> Varchar,
        floor_id -> Int8,
    }
}

diesel::table! {
    /// Dispensers; deleted with their pantry.
    dispensers (id) {
        id -> Int8,
        kind -> Varchar,
        max_capacity -> Int4,
        current_level -> Int4,
        threshold -> Int4,
        pantry_id -> Int8,
    }
}

diesel::joinable!(auth_tokens -> users (user_id));
diesel::joinable!(floors -> users (owner_id));
diesel::joinable!(pantries -> floors (floor_id));
diesel::joinable!(dispensers -> pantries (pantry_id));

diesel::allow_tables_to_appear_in_same_query!(users, auth_tokens, floors, pantries, dispensers);
