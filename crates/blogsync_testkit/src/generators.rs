//! Property-based test generators using proptest.
//!
//! Provides strategies for generating entities. Collections are generated
//! with unique ids, as the remote API and the stores key records by id.

use blogsync_model::{Comment, EntityId, Post, User};
use proptest::prelude::*;
use std::collections::BTreeSet;

/// Strategy for generating entity ids.
pub fn entity_id_strategy() -> impl Strategy<Value = EntityId> {
    (1u32..10_000).prop_map(EntityId::new)
}

/// Strategy for generating short text fields.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 ]{0,40}").expect("Invalid regex")
}

/// Strategy for generating a post.
pub fn post_strategy() -> impl Strategy<Value = Post> {
    (
        entity_id_strategy(),
        entity_id_strategy(),
        text_strategy(),
        text_strategy(),
    )
        .prop_map(|(id, user_id, title, body)| Post {
            id,
            user_id,
            title,
            body,
        })
}

/// Strategy for generating a user.
pub fn user_strategy() -> impl Strategy<Value = User> {
    (entity_id_strategy(), text_strategy(), "[a-z]{1,12}").prop_map(|(id, name, username)| {
        let email = format!("{username}@example.com");
        User {
            id,
            name,
            username,
            email,
        }
    })
}

/// Strategy for generating a comment.
pub fn comment_strategy() -> impl Strategy<Value = Comment> {
    (
        entity_id_strategy(),
        entity_id_strategy(),
        text_strategy(),
        text_strategy(),
    )
        .prop_map(|(id, post_id, name, body)| Comment {
            id,
            post_id,
            name,
            email: "reader@example.com".into(),
            body,
        })
}

/// Strategy for generating posts with unique ids, sorted by id.
pub fn posts_strategy(max_len: usize) -> impl Strategy<Value = Vec<Post>> {
    prop::collection::vec(post_strategy(), 0..=max_len).prop_map(|mut posts| {
        let mut seen = BTreeSet::new();
        posts.retain(|post| seen.insert(post.id));
        posts.sort_by_key(|post| post.id);
        posts
    })
}

/// Strategy for generating at least one post with unique ids.
pub fn non_empty_posts_strategy(max_len: usize) -> impl Strategy<Value = Vec<Post>> {
    posts_strategy(max_len.max(1)).prop_filter("Posts must not be empty", |posts| !posts.is_empty())
}
