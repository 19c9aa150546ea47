//! Property tests: both stores behave like an id-keyed map.

use blogsync_model::{EntityId, Post};
use blogsync_storage::{InMemoryStore, JsonFileStore, LocalStore};
use proptest::prelude::*;
use std::collections::BTreeMap;
use tempfile::TempDir;

fn post_strategy() -> impl Strategy<Value = Post> {
    (1u32..64, 1u32..8, "[a-z ]{0,16}").prop_map(|(id, user_id, title)| Post {
        id: EntityId::new(id),
        user_id: EntityId::new(user_id),
        title,
        body: String::new(),
    })
}

fn batches_strategy() -> impl Strategy<Value = Vec<Vec<Post>>> {
    prop::collection::vec(prop::collection::vec(post_strategy(), 0..12), 0..6)
}

fn model(batches: &[Vec<Post>]) -> Vec<Post> {
    let mut map = BTreeMap::new();
    for batch in batches {
        for post in batch {
            map.insert(post.id, post.clone());
        }
    }
    map.into_values().collect()
}

proptest! {
    #[test]
    fn memory_store_upserts_like_a_map(batches in batches_strategy()) {
        let store = InMemoryStore::<Post>::new();
        for batch in &batches {
            store.insert_all(batch).unwrap();
        }

        prop_assert_eq!(store.get_all().unwrap(), model(&batches));
    }

    #[test]
    fn file_store_reopens_to_the_same_records(batches in batches_strategy()) {
        let dir = TempDir::new().unwrap();
        let expected = model(&batches);
        {
            let store = JsonFileStore::<Post>::open_in(dir.path()).unwrap();
            for batch in &batches {
                store.insert_all(batch).unwrap();
            }
            prop_assert_eq!(store.get_all().unwrap(), expected.clone());
        }

        let reopened = JsonFileStore::<Post>::open_in(dir.path()).unwrap();
        prop_assert_eq!(reopened.get_all().unwrap(), expected.clone());
        for post in &expected {
            let found = reopened.get(post.id).unwrap();
            prop_assert_eq!(found.as_ref(), Some(post));
        }
    }
}
