//! ShowBoard
//! A desktop TV show dashboard: browse the catalog, keep favorites, jot reviews

// Hide console window on Windows release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

// Use mimalloc for faster memory allocation (Linux, macOS)
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use eframe::egui;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod favorites;
mod loader;
mod models;
mod reviews;
mod views;

use api::{MovieSource, ShowsClient};
use config::AppConfig;
use favorites::{AddOutcome, FavoritesStore};
use loader::{LoadEvent, MovieLoader};
use models::{MovieId, SortOrder, Tab};
use reviews::ReviewStore;
use views::{ListFilter, ReviewAction, ReviewForm};

const MAX_CONSOLE_LINES: usize = 500;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .init();
}

fn main() -> Result<(), eframe::Error> {
    init_tracing();

    let config = AppConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([900.0, 500.0]),
        vsync: true,
        ..Default::default()
    };

    eframe::run_native(
        "ShowBoard",
        options,
        Box::new(|cc| {
            let visuals = if config.dark_mode { egui::Visuals::dark() } else { egui::Visuals::light() };
            cc.egui_ctx.set_visuals(visuals);
            Ok(Box::new(ShowBoardApp::new(config)))
        }),
    )
}

struct ShowBoardApp {
    config: AppConfig,

    // State
    current_tab: Tab,
    status_message: String,
    url_input: String,

    // Data
    loader: MovieLoader,
    favorites: FavoritesStore,
    reviews: ReviewStore,

    // Widgets
    filter: ListFilter,
    review_form: ReviewForm,

    // Console log
    console_log: Vec<String>,
}

impl ShowBoardApp {
    fn new(config: AppConfig) -> Self {
        let source = Arc::new(ShowsClient::new(&config));
        Self::with_source(config, source)
    }

    fn with_source(config: AppConfig, source: Arc<dyn MovieSource>) -> Self {
        let mut app = Self {
            url_input: config.api_url.clone(),
            config,
            current_tab: Tab::Dashboard,
            status_message: "Ready".to_string(),
            loader: MovieLoader::new(source),
            favorites: FavoritesStore::new(),
            reviews: ReviewStore::new(),
            filter: ListFilter::default(),
            review_form: ReviewForm::default(),
            console_log: Vec::new(),
        };
        app.log("[INFO] ShowBoard started");
        let url = app.url_input.clone();
        app.load_source(&url);
        app
    }

    fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        self.console_log.push(format!("[{}] {}", timestamp, message));
        if self.console_log.len() > MAX_CONSOLE_LINES {
            self.console_log.remove(0);
        }
    }

    fn load_source(&mut self, url: &str) {
        match self.loader.load(url) {
            Ok(()) => {
                if self.loader.is_loading() {
                    self.log(&format!("[INFO] Loading shows from {}", self.loader.url()));
                    self.status_message = "Loading shows...".to_string();
                }
                if self.config.api_url != self.loader.url() {
                    self.config.api_url = self.loader.url().to_string();
                    self.save_config();
                }
            }
            Err(e) => {
                self.log(&format!("[WARN] {}", e));
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    fn reload(&mut self) {
        match self.loader.reload() {
            Ok(()) => {
                self.log(&format!("[INFO] Refreshing shows from {}", self.loader.url()));
                self.status_message = "Loading shows...".to_string();
            }
            Err(e) => {
                self.log(&format!("[WARN] {}", e));
                self.status_message = format!("Error: {}", e);
            }
        }
    }

    fn save_config(&mut self) {
        if let Err(e) = self.config.save() {
            tracing::warn!("{}", e);
            self.log(&format!("[WARN] {}", e));
        }
    }

    fn handle_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Loaded(count) => {
                self.log(&format!("[INFO] Loaded {} shows", count));
                self.status_message = format!("Loaded {} shows", count);
            }
            LoadEvent::Failed(msg) => {
                self.log(&format!("[ERROR] {}", msg));
                self.status_message = format!("Error: {}", msg);
            }
        }
    }

    fn select_movie(&mut self, id: MovieId) {
        let Some(movie) = self.loader.movies().iter().find(|m| m.id == id).cloned() else {
            self.log(&format!("[WARN] No show found with id {}", id));
            return;
        };

        let name = movie.name.clone();
        match self.favorites.add(movie) {
            AddOutcome::Added => {
                self.log(&format!("[INFO] Added '{}' to favorites", name));
                self.status_message = format!("Added '{}' to favorites", name);
            }
            AddOutcome::AlreadyPresent => {
                self.status_message = format!("'{}' is already in favorites", name);
            }
        }
    }

    fn remove_favorite(&mut self, id: MovieId) {
        if let Some(movie) = self.favorites.remove(id) {
            self.log(&format!("[INFO] Removed '{}' from favorites", movie.name));
            self.status_message = format!("Removed '{}' from favorites", movie.name);
        }
    }

    fn add_review(&mut self, action: ReviewAction) {
        let (accepted, kind) = match action {
            ReviewAction::Positive(message) => (self.reviews.add_positive(message), "positive"),
            ReviewAction::Negative(message) => (self.reviews.add_negative(message), "negative"),
        };
        if accepted {
            self.log(&format!("[INFO] Added {} review ({} total)", kind, self.reviews.len()));
        }
    }

    fn show_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.heading("📺 ShowBoard");
                ui.separator();
                ui.selectable_value(&mut self.current_tab, Tab::Dashboard, "Dashboard");
                ui.selectable_value(&mut self.current_tab, Tab::Console, "Console");
                ui.separator();

                ui.label("API:");
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.url_input)
                        .desired_width(320.0)
                        .hint_text(config::DEFAULT_API_URL),
                );
                let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if ui.button("Load").clicked() || submitted {
                    let url = self.url_input.clone();
                    self.load_source(&url);
                }
                if ui.button("⟳ Refresh").on_hover_text("Fetch the current source again").clicked() {
                    self.reload();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.checkbox(&mut self.config.dark_mode, "Dark mode").changed() {
                        let visuals = if self.config.dark_mode { egui::Visuals::dark() } else { egui::Visuals::light() };
                        ctx.set_visuals(visuals);
                        self.save_config();
                    }
                });
            });
            ui.add_space(5.0);
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.loader.is_loading() {
                    ui.spinner();
                } else if let Some(err) = self.loader.state().error() {
                    ui.label(egui::RichText::new("⚠").color(egui::Color32::RED)).on_hover_text(err);
                }
                ui.label(&self.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!(
                        "{} shows · {} favorites · {} reviews",
                        self.loader.movies().len(),
                        self.favorites.len(),
                        self.reviews.len()
                    ));
                });
            });
        });
    }

    fn show_dashboard(&mut self, ctx: &egui::Context) {
        let mut to_remove: Option<MovieId> = None;
        let mut review_action: Option<ReviewAction> = None;
        let mut selected: Option<MovieId> = None;

        egui::SidePanel::right("sidebar")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("sidebar_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        to_remove = views::section(ui, "My Favorites", |ui| {
                            views::favorites_panel(ui, &self.favorites)
                        });
                        ui.add_space(10.0);
                        views::section(ui, "Reviews", |ui| {
                            review_action = self.review_form.show(ui);
                            ui.add_space(6.0);
                            views::review_list(ui, self.reviews.reviews());
                        });
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            views::section(ui, "Shows", |ui| {
                ui.horizontal(|ui| {
                    ui.label("🔍");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.filter.search)
                            .hint_text("Search by name")
                            .desired_width(220.0),
                    );
                    egui::ComboBox::from_id_salt("sort_order")
                        .selected_text(self.filter.sort.label())
                        .show_ui(ui, |ui| {
                            for order in SortOrder::ALL {
                                ui.selectable_value(&mut self.filter.sort, order, order.label());
                            }
                        });
                });
                ui.add_space(6.0);
                selected = views::movie_list(ui, self.loader.state(), &self.favorites, &self.filter);
            });
        });

        if let Some(id) = selected {
            self.select_movie(id);
        }
        if let Some(id) = to_remove {
            self.remove_favorite(id);
        }
        if let Some(action) = review_action {
            self.add_review(action);
        }
    }

    fn show_console(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Console Log");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("🗑 Clear").clicked() {
                        self.console_log.clear();
                    }
                });
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    for line in &self.console_log {
                        let color = if line.contains("[ERROR]") {
                            egui::Color32::RED
                        } else if line.contains("[WARN]") {
                            egui::Color32::YELLOW
                        } else if line.contains("[INFO]") {
                            egui::Color32::LIGHT_BLUE
                        } else {
                            egui::Color32::GRAY
                        };
                        ui.label(egui::RichText::new(line).monospace().color(color));
                    }
                });
        });
    }
}

impl eframe::App for ShowBoardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply finished background fetches (non-blocking)
        if let Some(event) = self.loader.poll() {
            self.handle_load_event(event);
        }

        // Keep polling while a request is in flight
        if self.loader.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        self.show_top_panel(ctx);
        self.show_status_bar(ctx);

        match self.current_tab {
            Tab::Dashboard => self.show_dashboard(ctx),
            Tab::Console => self.show_console(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use crate::models::{Movie, Rating, ShowStatus};
    use std::time::Instant;

    struct FixedSource(Vec<Movie>);

    impl MovieSource for FixedSource {
        fn fetch_movies(&self, _url: &str) -> Result<Vec<Movie>, FetchError> {
            Ok(self.0.clone())
        }
    }

    fn show(id: u64, name: &str, rating: Option<f64>) -> Movie {
        Movie {
            id: MovieId(id),
            name: name.to_string(),
            language: None,
            genres: vec!["Drama".to_string()],
            status: ShowStatus::Running,
            rating: Rating { average: rating },
            image: None,
            summary: None,
            official_site: None,
        }
    }

    /// App with the catalog already loaded
    fn loaded_app() -> ShowBoardApp {
        let config = AppConfig {
            api_url: "http://example.com/shows".to_string(),
            ..AppConfig::default()
        };
        let source = Arc::new(FixedSource(vec![
            show(1, "Person of Interest", Some(8.8)),
            show(2, "Castle", Some(7.2)),
        ]));
        let mut app = ShowBoardApp::with_source(config, source);

        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(event) = app.loader.poll() {
                app.handle_load_event(event);
                break;
            }
            assert!(Instant::now() < deadline, "timed out waiting for shows");
            std::thread::sleep(Duration::from_millis(5));
        }
        app
    }

    fn last_log(app: &ShowBoardApp) -> &str {
        app.console_log.last().map(String::as_str).unwrap_or("")
    }

    #[test]
    fn test_startup_loads_configured_source() {
        let app = loaded_app();
        assert_eq!(app.status_message, "Loaded 2 shows");
        assert_eq!(app.loader.url(), "http://example.com/shows");
        assert!(app.console_log.iter().any(|l| l.contains("[INFO] ShowBoard started")));
    }

    #[test]
    fn test_select_adds_favorite_once() {
        let mut app = loaded_app();

        app.select_movie(MovieId(1));
        assert_eq!(app.status_message, "Added 'Person of Interest' to favorites");
        assert!(app.favorites.contains(MovieId(1)));

        app.select_movie(MovieId(1));
        assert_eq!(app.status_message, "'Person of Interest' is already in favorites");
        assert_eq!(app.favorites.len(), 1);

        app.select_movie(MovieId(2));
        assert_eq!(app.favorites.len(), 2);
        assert_eq!(app.favorites.average_rating(), 8.0);
    }

    #[test]
    fn test_select_unknown_id_warns() {
        let mut app = loaded_app();

        app.select_movie(MovieId(99));
        assert!(last_log(&app).contains("[WARN] No show found with id 99"));
        assert!(app.favorites.is_empty());
        assert_eq!(app.status_message, "Loaded 2 shows");
    }

    #[test]
    fn test_remove_favorite() {
        let mut app = loaded_app();
        app.select_movie(MovieId(2));

        app.remove_favorite(MovieId(2));
        assert_eq!(app.status_message, "Removed 'Castle' from favorites");
        assert!(app.favorites.is_empty());

        // Removing again changes nothing
        app.remove_favorite(MovieId(2));
        assert_eq!(app.status_message, "Removed 'Castle' from favorites");
    }

    #[test]
    fn test_review_actions_applied_in_order() {
        let mut app = loaded_app();

        app.add_review(ReviewAction::Positive("Great show".to_string()));
        assert!(last_log(&app).contains("[INFO] Added positive review (1 total)"));

        app.add_review(ReviewAction::Negative("   ".to_string()));
        assert_eq!(app.reviews.len(), 1);

        app.add_review(ReviewAction::Negative("Too slow".to_string()));
        let rendered: Vec<String> = app.reviews.reviews().iter().map(|r| r.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["Positive review: Great show", "Negative review: Too slow"]
        );
    }
}
