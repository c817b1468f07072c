//! Diesel table definitions for the PostgreSQL schema.
//!
//! Keep in step with `backend/migrations`; `diesel print-schema` against a
//! migrated database regenerates this file.

diesel::table! {
    /// Registered portal users.
    users (id) {
        id -> Uuid,
        /// Unique login name (`users_username_key`).
        username -> Varchar,
        /// Unique, lower-cased email (`users_email_key`).
        email -> Varchar,
        full_name -> Varchar,
        /// `doctor` or `patient`, enforced by a check constraint.
        role -> Varchar,
        contact -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Varchar,
        created_at -> Timestamptz,
        /// Maintained by the `users_set_updated_at` trigger.
        updated_at -> Timestamptz,
    }
}
