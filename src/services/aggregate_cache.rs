//! In-memory aggregate counters mirroring store totals.
//!
//! Member and per-genre book totals are read on every listing request. The
//! cells are updated with atomic adds after the matching store commit and
//! recomputed from the store by [`AggregateCache::load`]. A crash between a
//! commit and its cell update leaves the cell off by that amount until the next
//! load, which runs at startup and on `POST /initialize`.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::{
    error::AppResult,
    models::genre::{Genre, GENRE_COUNT},
    repository::Repository,
};

/// Store totals the cache is rebuilt from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub members: i64,
    pub genres: [i64; GENRE_COUNT],
}

#[derive(Debug, Default)]
pub struct AggregateCache {
    members: AtomicI64,
    genres: [AtomicI64; GENRE_COUNT],
}

impl AggregateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute every cell from the store
    pub async fn load(&self, repository: &Repository) -> AppResult<CacheSnapshot> {
        let members = repository.members.count_active().await?;
        let mut genres = [0; GENRE_COUNT];
        for (genre, count) in repository.books.count_by_genre().await? {
            genres[genre.index()] = count;
        }

        let snapshot = CacheSnapshot { members, genres };
        self.reset(&snapshot);
        tracing::info!(members, ?genres, "Aggregate cache loaded");
        Ok(snapshot)
    }

    /// Overwrite every cell; genres missing from the snapshot read as zero
    pub fn reset(&self, snapshot: &CacheSnapshot) {
        self.members.store(snapshot.members, Ordering::Relaxed);
        for (cell, count) in self.genres.iter().zip(snapshot.genres) {
            cell.store(count, Ordering::Relaxed);
        }
    }

    pub fn on_member_registered(&self) {
        self.members.fetch_add(1, Ordering::Relaxed);
    }

    pub fn on_member_banned(&self) {
        self.members.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn on_books_registered(&self, genre: Genre, count: i64) {
        self.genres[genre.index()].fetch_add(count, Ordering::Relaxed);
    }

    pub fn member_count(&self) -> i64 {
        self.members.load(Ordering::Relaxed)
    }

    pub fn genre_count(&self, genre: Genre) -> i64 {
        self.genres[genre.index()].load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        let mut genres = [0; GENRE_COUNT];
        for (slot, cell) in genres.iter_mut().zip(&self.genres) {
            *slot = cell.load(Ordering::Relaxed);
        }
        CacheSnapshot {
            members: self.member_count(),
            genres,
        }
    }
}
