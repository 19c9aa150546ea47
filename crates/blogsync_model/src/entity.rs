//! Blog entities and the trait stores use to key them.

use crate::id::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The cached collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Blog users.
    Users,
    /// Comments on posts.
    Comments,
    /// Blog posts (the only paginated collection).
    Posts,
}

impl Collection {
    /// Returns the collection name, used for file names and log fields.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Comments => "comments",
            Collection::Posts => "posts",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for records that can be cached in a local store.
///
/// Implementors must provide a stable identifier; stores upsert by it.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The collection this entity belongs to.
    const COLLECTION: Collection;

    /// Returns the entity's stable, immutable identifier.
    fn entity_id(&self) -> EntityId;
}

/// A blog user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: EntityId,
    /// Full name.
    pub name: String,
    /// Login handle.
    pub username: String,
    /// Contact email.
    pub email: String,
}

/// A comment left on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment ID.
    pub id: EntityId,
    /// ID of the post this comment belongs to.
    pub post_id: EntityId,
    /// Author name.
    pub name: String,
    /// Author email.
    pub email: String,
    /// Comment text.
    pub body: String,
}

/// A blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Post ID.
    pub id: EntityId,
    /// ID of the authoring user.
    pub user_id: EntityId,
    /// Post title.
    pub title: String,
    /// Post text.
    pub body: String,
}

impl Entity for User {
    const COLLECTION: Collection = Collection::Users;

    fn entity_id(&self) -> EntityId {
        self.id
    }
}

impl Entity for Comment {
    const COLLECTION: Collection = Collection::Comments;

    fn entity_id(&self) -> EntityId {
        self.id
    }
}

impl Entity for Post {
    const COLLECTION: Collection = Collection::Posts;

    fn entity_id(&self) -> EntityId {
        self.id
    }
}
