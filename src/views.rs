//! Dashboard widgets
//!
//! Views borrow state and report what the user clicked; the app applies the
//! resulting actions after the frame is laid out.

use eframe::egui;
use std::cmp::Ordering;
use std::hash::Hash;

use crate::favorites::FavoritesStore;
use crate::loader::FetchState;
use crate::models::{Movie, MovieId, Review, SortOrder};

const POSITIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);
const NEGATIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 90, 90);

/// Case-insensitive substring check, allocation-free for ASCII input
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() { return true; }
    if !haystack.is_ascii() || !needle.is_ascii() {
        // Show names like "Élite" need full Unicode case folding
        return haystack.to_lowercase().contains(&needle.to_lowercase());
    }
    if needle.len() > haystack.len() { return false; }

    haystack.as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Search box and sort order for the show list
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub search: String,
    pub sort: SortOrder,
}

impl ListFilter {
    /// Shows to render, in display order
    pub fn apply<'a>(&self, movies: &'a [Movie]) -> Vec<&'a Movie> {
        let search = self.search.trim();
        let mut visible: Vec<&Movie> = movies
            .iter()
            .filter(|m| contains_ignore_case(&m.name, search))
            .collect();

        match self.sort {
            SortOrder::Default => {} // Keep server order
            SortOrder::NameAsc => visible.sort_by_cached_key(|m| m.name.to_lowercase()),
            SortOrder::NameDesc => {
                visible.sort_by_cached_key(|m| m.name.to_lowercase());
                visible.reverse();
            }
            SortOrder::RatingDesc => visible.sort_by(|a, b| {
                b.rating.average
                    .partial_cmp(&a.rating.average)
                    .unwrap_or(Ordering::Equal)
            }),
        }
        visible
    }
}

/// Titled group around a panel
pub fn section<R>(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::group(ui.style())
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.heading(title);
            ui.separator();
            add_contents(ui)
        })
        .inner
}

pub fn alert_box(ui: &mut egui::Ui, message: &str) {
    egui::Frame::new()
        .fill(egui::Color32::from_rgb(90, 30, 30))
        .stroke(egui::Stroke::new(1.0, NEGATIVE_COLOR))
        .inner_margin(8.0)
        .corner_radius(4.0)
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new("Error:").strong().color(egui::Color32::WHITE));
                ui.label(egui::RichText::new(message).color(egui::Color32::WHITE));
            });
        });
}

/// Render items under stable per-item ids
pub fn generic_list<T, K: Hash>(
    ui: &mut egui::Ui,
    items: &[T],
    key: impl Fn(&T) -> K,
    mut render: impl FnMut(&mut egui::Ui, &T),
) {
    for item in items {
        ui.push_id(key(item), |ui| render(ui, item));
        ui.add_space(6.0);
    }
}

/// One show card. Returns true when "Select" was clicked.
pub fn movie_card(ui: &mut egui::Ui, movie: &Movie, is_favorite: bool) -> bool {
    let mut selected = false;
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            if is_favorite {
                ui.label(egui::RichText::new("★").size(18.0).color(egui::Color32::GOLD))
                    .on_hover_text("In favorites");
            }
            ui.label(egui::RichText::new(&movie.name).strong().size(16.0))
                .on_hover_text(movie.to_string());
        });

        ui.label(format!("Genres: {}", movie.genres_label()));
        ui.label(format!("Rating: {}", movie.rating_label()));
        ui.horizontal(|ui| {
            if let Some(lang) = &movie.language {
                ui.label(egui::RichText::new(lang).weak());
                ui.label(egui::RichText::new("·").weak());
            }
            ui.label(egui::RichText::new(movie.status.as_str()).weak());
        });

        if let Some(summary) = movie.plain_summary() {
            ui.label(egui::RichText::new(summary).small());
        }

        ui.horizontal(|ui| {
            let unavailable = movie.is_unavailable();
            let text = if unavailable { "Unavailable" } else { "Select" };
            if ui.add_enabled(!unavailable, egui::Button::new(text)).clicked() {
                selected = true;
            }
            if let Some(image) = &movie.image {
                ui.hyperlink_to("Poster", &image.original);
            }
            if let Some(site) = &movie.official_site {
                ui.hyperlink_to("Official site", site);
            }
        });
    });
    selected
}

/// Show list in its loading, error or data state. Returns the selected id.
pub fn movie_list(
    ui: &mut egui::Ui,
    state: &FetchState<Vec<Movie>>,
    favorites: &FavoritesStore,
    filter: &ListFilter,
) -> Option<MovieId> {
    let movies = match state {
        FetchState::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading shows...");
            });
            return None;
        }
        FetchState::Error(message) => {
            alert_box(ui, message);
            return None;
        }
        FetchState::Data(movies) => movies,
    };

    let visible = filter.apply(movies);
    if visible.is_empty() {
        ui.label(egui::RichText::new("No shows to display").weak());
        return None;
    }

    let mut selected = None;
    egui::ScrollArea::vertical()
        .id_salt("movie_list")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            generic_list(ui, &visible, |m| m.id, |ui, movie| {
                if movie_card(ui, movie, favorites.contains(movie.id)) {
                    selected = Some(movie.id);
                }
            });
        });
    selected
}

/// Favorites with remove buttons and the average rating. Returns the id to remove.
pub fn favorites_panel(ui: &mut egui::Ui, favorites: &FavoritesStore) -> Option<MovieId> {
    if favorites.is_empty() {
        ui.label(egui::RichText::new("No favorite shows yet.").weak());
        return None;
    }

    let mut to_remove = None;
    for movie in favorites.iter() {
        ui.horizontal(|ui| {
            if ui.button("Remove").clicked() {
                to_remove = Some(movie.id);
            }
            ui.label(format!("{} ({})", movie.name, movie.rating_label()));
        });
    }
    ui.separator();
    ui.label(egui::RichText::new(format!("Average: {}", favorites.average_rating())).strong());
    to_remove
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReviewAction {
    Positive(String),
    Negative(String),
}

#[derive(Debug, Default)]
pub struct ReviewForm {
    message: String,
}

impl ReviewForm {
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<ReviewAction> {
        ui.add(
            egui::TextEdit::multiline(&mut self.message)
                .hint_text("Write your review here...")
                .desired_rows(3)
                .desired_width(f32::INFINITY),
        );

        let mut action = None;
        ui.horizontal(|ui| {
            if ui.button(egui::RichText::new("Add positive review").color(POSITIVE_COLOR)).clicked() {
                action = self.submit(ReviewAction::Positive);
            }
            if ui.button(egui::RichText::new("Add negative review").color(NEGATIVE_COLOR)).clicked() {
                action = self.submit(ReviewAction::Negative);
            }
        });
        action
    }

    /// Blank text is not submitted; accepted text clears the box
    fn submit(&mut self, make: fn(String) -> ReviewAction) -> Option<ReviewAction> {
        if self.message.trim().is_empty() {
            return None;
        }
        Some(make(std::mem::take(&mut self.message)))
    }
}

pub fn review_list(ui: &mut egui::Ui, reviews: &[Review]) {
    if reviews.is_empty() {
        ui.label(egui::RichText::new("No reviews yet.").weak());
        return;
    }

    for review in reviews {
        let color = match review {
            Review::Positive { .. } => POSITIVE_COLOR,
            Review::Negative { .. } => NEGATIVE_COLOR,
        };
        ui.label(egui::RichText::new(review.to_string()).color(color));
    }
}
