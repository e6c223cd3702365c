//! Diesel schema for task and status history persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        #[max_length = 2000]
        description -> Nullable<Varchar>,
        /// Status storage string, constrained to the alphabet.
        #[max_length = 20]
        status -> Varchar,
        /// Priority in `1..=5`.
        priority -> Int4,
        /// Optional theme reference.
        theme_id -> Nullable<Uuid>,
        /// Optional assignee reference.
        assignee_id -> Nullable<Uuid>,
        /// Creator reference.
        created_by -> Uuid,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only status history.
    task_status_history (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Insertion sequence used to order entries sharing a timestamp.
        seq -> Int8,
        /// Task the entry belongs to.
        task_id -> Uuid,
        /// Status before the change.
        #[max_length = 20]
        from_status -> Varchar,
        /// Status after the change.
        #[max_length = 20]
        to_status -> Varchar,
        /// Acting user.
        changed_by -> Uuid,
        /// Time of the change.
        changed_at -> Timestamptz,
    }
}

diesel::joinable!(task_status_history -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_status_history);
