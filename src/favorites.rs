//! Favorites kept for the current session

use crate::models::{Movie, MovieId};

/// Result of [`FavoritesStore::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Ordered favorites, unique by show id.
///
/// Owned by the app and lent to both the show list and the favorites panel.
#[derive(Debug, Default)]
pub struct FavoritesStore {
    items: Vec<Movie>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, movie: Movie) -> AddOutcome {
        if self.contains(movie.id) {
            return AddOutcome::AlreadyPresent;
        }
        self.items.push(movie);
        AddOutcome::Added
    }

    pub fn remove(&mut self, id: MovieId) -> Option<Movie> {
        let pos = self.items.iter().position(|m| m.id == id)?;
        Some(self.items.remove(pos))
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.items.iter().any(|m| m.id == id)
    }

    /// Mean rating over rated favorites, one decimal; 0 when none are rated
    pub fn average_rating(&self) -> f64 {
        let rated: Vec<f64> = self.items.iter().filter_map(|m| m.rating.average).collect();
        if rated.is_empty() {
            return 0.0;
        }
        let avg = rated.iter().sum::<f64>() / rated.len() as f64;
        (avg * 10.0).round() / 10.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[path = "favorites_tests.rs"]
mod tests;
