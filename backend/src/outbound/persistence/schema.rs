//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique case-insensitively through a `lower(username)` index.
        username -> Varchar,
        /// Stored lower-cased; unique.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Direct messages. Rows are immutable apart from the read flag.
    messages (id) {
        id -> Uuid,
        sender_id -> Uuid,
        receiver_id -> Uuid,
        body -> Text,
        is_read -> Bool,
        /// Set together with `is_read`.
        read_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Published posts. The author's username is copied at publish time.
    posts (id) {
        id -> Uuid,
        author_id -> Uuid,
        author_username -> Varchar,
        content -> Nullable<Text>,
        image_url -> Nullable<Text>,
        is_promotion -> Bool,
        genre -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per user who liked a post.
    post_likes (post_id, user_id) {
        post_id -> Uuid,
        user_id -> Uuid,
        username -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// First view of a post by each user.
    post_views (post_id, user_id) {
        post_id -> Uuid,
        user_id -> Uuid,
        viewed_at -> Timestamptz,
    }
}

diesel::table! {
    post_comments (id) {
        id -> Uuid,
        post_id -> Uuid,
        user_id -> Uuid,
        username -> Varchar,
        body -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed follow edges.
    follows (follower_id, followee_id) {
        follower_id -> Uuid,
        followee_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(post_likes -> posts (post_id));
diesel::joinable!(post_views -> posts (post_id));
diesel::joinable!(post_comments -> posts (post_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    messages,
    posts,
    post_likes,
    post_views,
    post_comments,
    follows,
);
