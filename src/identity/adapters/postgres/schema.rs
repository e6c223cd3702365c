//! Diesel schema for user persistence.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Normalized, unique login email.
        #[max_length = 255]
        email -> Varchar,
        /// Display name.
        #[max_length = 255]
        username -> Varchar,
        /// PHC-formatted password hash.
        #[max_length = 255]
        hashed_password -> Varchar,
        /// Admin flag.
        is_admin -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
