//! Consistent read snapshot of the entity collections.

use std::collections::HashMap;
use tracing::{debug, warn};
use tunestats_common::{Favorite, Result, StatsError, Track, TrackId, User, UserId};
use tunestats_store::EntityStore;

/// The three collections as fetched at the start of one analyzer call, with
/// every favorite's user and track already resolved.
#[derive(Debug, Clone)]
pub struct Snapshot {
    users: Vec<User>,
    tracks: Vec<Track>,
    favorites: Vec<Favorite>,
    user_index: HashMap<UserId, usize>,
    track_index: HashMap<TrackId, usize>,
    // Per favorite, the positions of its user and track.
    resolved: Vec<(usize, usize)>,
    favorites_by_user: HashMap<UserId, Vec<usize>>,
}

/// A favorite together with the user and track it references.
#[derive(Debug, Clone, Copy)]
pub struct FavoriteView<'a> {
    pub favorite: &'a Favorite,
    pub user: &'a User,
    pub track: &'a Track,
}

impl Snapshot {
    /// Fetches all collections from `store` and resolves favorite references.
    ///
    /// Fails with an integrity error on the first favorite whose user or
    /// track is missing.
    pub fn capture<S: EntityStore + ?Sized>(store: &S) -> Result<Self> {
        let users = store.list_all_users()?;
        let tracks = store.list_all_tracks()?;
        let favorites = store.list_all_favorites()?;
        Self::from_parts(users, tracks, favorites)
    }

    /// Builds a snapshot from already fetched collections.
    ///
    /// A user or track id that appears twice is an integrity error, as is a
    /// favorite referencing an id that does not appear at all.
    pub fn from_parts(users: Vec<User>, tracks: Vec<Track>, favorites: Vec<Favorite>) -> Result<Self> {
        let mut user_index = HashMap::with_capacity(users.len());
        for (position, user) in users.iter().enumerate() {
            if user_index.insert(user.id, position).is_some() {
                warn!(user_id = %user.id, "Duplicate user id");
                return Err(StatsError::integrity(format!("duplicate user id {}", user.id)));
            }
        }
        let mut track_index = HashMap::with_capacity(tracks.len());
        for (position, track) in tracks.iter().enumerate() {
            if track_index.insert(track.id.clone(), position).is_some() {
                warn!(track_id = %track.id, "Duplicate track id");
                return Err(StatsError::integrity(format!("duplicate track id {}", track.id)));
            }
        }

        let mut resolved = Vec::with_capacity(favorites.len());
        let mut favorites_by_user: HashMap<UserId, Vec<usize>> = HashMap::new();

        for (position, favorite) in favorites.iter().enumerate() {
            let Some(&user_position) = user_index.get(&favorite.user_id) else {
                warn!(
                    favorite_id = %favorite.id,
                    user_id = %favorite.user_id,
                    "Favorite references a missing user"
                );
                return Err(StatsError::dangling_reference(
                    favorite.id.0,
                    format!(
                        "favorite {} references unknown user {}",
                        favorite.id, favorite.user_id
                    ),
                ));
            };
            let Some(&track_position) = track_index.get(&favorite.track_id) else {
                warn!(
                    favorite_id = %favorite.id,
                    track_id = %favorite.track_id,
                    "Favorite references a missing track"
                );
                return Err(StatsError::dangling_reference(
                    favorite.id.0,
                    format!(
                        "favorite {} references unknown track {}",
                        favorite.id, favorite.track_id
                    ),
                ));
            };

            resolved.push((user_position, track_position));
            favorites_by_user
                .entry(favorite.user_id)
                .or_default()
                .push(position);
        }

        debug!(
            users = users.len(),
            tracks = tracks.len(),
            favorites = favorites.len(),
            "Captured snapshot"
        );

        Ok(Self {
            users,
            tracks,
            favorites,
            user_index,
            track_index,
            resolved,
            favorites_by_user,
        })
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn favorites(&self) -> &[Favorite] {
        &self.favorites
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.user_index.get(&id).map(|&position| &self.users[position])
    }

    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.track_index.get(id).map(|&position| &self.tracks[position])
    }

    /// Every favorite with its references, in store enumeration order.
    pub fn views(&self) -> impl Iterator<Item = FavoriteView<'_>> + '_ {
        (0..self.favorites.len()).map(move |position| self.view(position))
    }

    /// The favorites of one user, in store enumeration order.
    pub fn favorites_of(&self, user: UserId) -> impl Iterator<Item = FavoriteView<'_>> + '_ {
        self.favorites_by_user
            .get(&user)
            .into_iter()
            .flatten()
            .map(move |&position| self.view(position))
    }

    /// Number of favorites held by `user`.
    pub fn favorite_count(&self, user: UserId) -> u64 {
        self.favorites_by_user
            .get(&user)
            .map_or(0, |positions| positions.len() as u64)
    }

    fn view(&self, position: usize) -> FavoriteView<'_> {
        let (user_position, track_position) = self.resolved[position];
        FavoriteView {
            favorite: &self.favorites[position],
            user: &self.users[user_position],
            track: &self.tracks[track_position],
        }
    }
}
