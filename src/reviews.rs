//! In-memory review log

use crate::models::Review;

/// Append-only list of reviews in submission order
#[derive(Debug, Default)]
pub struct ReviewStore {
    reviews: Vec<Review>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false (and stores nothing) for blank messages
    pub fn add_positive(&mut self, message: impl Into<String>) -> bool {
        self.push(message.into(), |message| Review::Positive { message })
    }

    pub fn add_negative(&mut self, message: impl Into<String>) -> bool {
        self.push(message.into(), |message| Review::Negative { message })
    }

    fn push(&mut self, message: String, make: fn(String) -> Review) -> bool {
        if message.trim().is_empty() {
            return false;
        }
        self.reviews.push(make(message));
        true
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_reviews_rejected() {
        let mut store = ReviewStore::new();
        assert!(!store.add_positive(""));
        assert!(!store.add_negative("   \n\t"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_reviews_keep_order_and_tag() {
        let mut store = ReviewStore::new();
        assert!(store.add_positive("Great show"));
        assert!(store.add_negative("Too slow"));

        assert_eq!(
            store.reviews(),
            &[
                Review::Positive { message: "Great show".to_string() },
                Review::Negative { message: "Too slow".to_string() },
            ]
        );
    }

    #[test]
    fn test_message_stored_untrimmed() {
        let mut store = ReviewStore::new();
        store.add_positive("  padded  ");
        assert_eq!(store.reviews()[0].message(), "  padded  ");
        assert_eq!(store.len(), 1);
    }
}
