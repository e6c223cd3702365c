//! Diesel schema for theme persistence.

diesel::table! {
    /// Theme catalogue.
    themes (id) {
        /// Theme identifier.
        id -> Uuid,
        /// Unique theme name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional description.
        #[max_length = 1024]
        description -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
