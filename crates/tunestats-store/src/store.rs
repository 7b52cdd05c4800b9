//! Read-side entity store abstraction and its in-memory backend.

use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;
use tunestats_common::{Favorite, Result, Track, User};

use crate::dataset::Dataset;

/// Read access to the full entity collections.
///
/// Each call returns an owned copy of one collection in the store's
/// enumeration order. Implementations must never hand out a partially
/// updated collection.
pub trait EntityStore: Send + Sync {
    /// All users.
    fn list_all_users(&self) -> Result<Vec<User>>;

    /// All tracks.
    fn list_all_tracks(&self) -> Result<Vec<Track>>;

    /// All favorites.
    fn list_all_favorites(&self) -> Result<Vec<Favorite>>;
}

impl<S: EntityStore + ?Sized> EntityStore for Arc<S> {
    fn list_all_users(&self) -> Result<Vec<User>> {
        (**self).list_all_users()
    }

    fn list_all_tracks(&self) -> Result<Vec<Track>> {
        (**self).list_all_tracks()
    }

    fn list_all_favorites(&self) -> Result<Vec<Favorite>> {
        (**self).list_all_favorites()
    }
}

impl<S: EntityStore + ?Sized> EntityStore for &S {
    fn list_all_users(&self) -> Result<Vec<User>> {
        (**self).list_all_users()
    }

    fn list_all_tracks(&self) -> Result<Vec<Track>> {
        (**self).list_all_tracks()
    }

    fn list_all_favorites(&self) -> Result<Vec<Favorite>> {
        (**self).list_all_favorites()
    }
}

/// Thread-safe in-memory store holding a whole dataset behind a read-write lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    dataset: RwLock<Dataset>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `dataset`.
    pub fn from_dataset(dataset: Dataset) -> Self {
        Self {
            dataset: RwLock::new(dataset),
        }
    }

    /// Replaces every collection at once, returning the previous dataset.
    pub fn replace_dataset(&self, dataset: Dataset) -> Dataset {
        debug!(
            users = dataset.users.len(),
            tracks = dataset.tracks.len(),
            favorites = dataset.favorites.len(),
            "Replacing store contents"
        );
        std::mem::replace(&mut *self.dataset.write(), dataset)
    }

    /// Appends a user.
    pub fn insert_user(&self, user: User) {
        self.dataset.write().users.push(user);
    }

    /// Appends a track.
    pub fn insert_track(&self, track: Track) {
        self.dataset.write().tracks.push(track);
    }

    /// Appends a favorite. References are not checked here.
    pub fn insert_favorite(&self, favorite: Favorite) {
        self.dataset.write().favorites.push(favorite);
    }

    /// Copies out the current contents.
    pub fn dataset(&self) -> Dataset {
        self.dataset.read().clone()
    }
}

impl EntityStore for InMemoryStore {
    fn list_all_users(&self) -> Result<Vec<User>> {
        Ok(self.dataset.read().users.clone())
    }

    fn list_all_tracks(&self) -> Result<Vec<Track>> {
        Ok(self.dataset.read().tracks.clone())
    }

    fn list_all_favorites(&self) -> Result<Vec<Favorite>> {
        Ok(self.dataset.read().favorites.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunestats_common::test_utils::{favorite, reference_scenario, track, user};

    fn seeded() -> InMemoryStore {
        let scenario = reference_scenario();
        InMemoryStore::from_dataset(Dataset::new(
            scenario.users,
            scenario.tracks,
            scenario.favorites,
        ))
    }

    #[test]
    fn test_lists_preserve_insertion_order() {
        let store = seeded();
        let users = store.list_all_users().unwrap();
        assert_eq!(
            users.iter().map(|u| u.username.as_str()).collect::<Vec<_>>(),
            vec!["alice", "bob"]
        );
        let tracks = store.list_all_tracks().unwrap();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[2].id.as_str(), "t3");
        assert_eq!(store.list_all_favorites().unwrap().len(), 3);
    }

    #[test]
    fn test_inserts_and_replace() {
        let store = InMemoryStore::new();
        assert!(store.list_all_users().unwrap().is_empty());

        store.insert_user(user(1, "carol", "Canada"));
        store.insert_track(track("t1", "Jazz", 0.4));
        store.insert_favorite(favorite(1, 1, "t1", 2, None));
        assert_eq!(store.dataset().favorites.len(), 1);

        let previous = store.replace_dataset(Dataset::default());
        assert_eq!(previous.users.len(), 1);
        assert!(store.list_all_favorites().unwrap().is_empty());
    }

    #[test]
    fn test_shared_store_through_arc() {
        let store = Arc::new(seeded());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.list_all_favorites().unwrap().len())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 3);
        }

        let dyn_store: Arc<dyn EntityStore> = store;
        assert_eq!(dyn_store.list_all_users().unwrap().len(), 2);
    }
}
