use crate::catalog::{Category, ProductRecord};
use crate::config::Config;
use crate::fetch::ScoredProduct;
use crate::scoring::{ScoreResult, ScoringConfig};
use crate::tui::theme::ThemeColors;
use ratatui::widgets::{ListState, TableState};
use std::time::{Duration, Instant};

const FLASH_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Category(Category),
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    Help,
    ScoreBreakdown,
}

pub struct App {
    /// Navigation stack; the bottom entry is always `Screen::Home`
    pub screens: Vec<Screen>,
    pub home_state: ListState,
    pub products: Vec<ScoredProduct>,
    pub table_state: TableState,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, Instant)>,
    pub last_refresh: Option<Instant>,
    /// Set when the top screen needs its one fetch
    pub needs_fetch: bool,
    pub should_quit: bool,
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub scoring: ScoringConfig,
    pub search_url: String,
    pub sort: bool,
    pub theme: ThemeColors,
    pub verbose: bool,
}

impl App {
    pub fn new(config: &Config, theme: ThemeColors, sort: bool, verbose: bool) -> Self {
        let mut home_state = ListState::default();
        home_state.select(Some(0));

        Self {
            screens: vec![Screen::Home],
            home_state,
            products: Vec::new(),
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            flash_message: None,
            last_refresh: None,
            needs_fetch: false,
            should_quit: false,
            is_loading: false,
            spinner_frame: 0,
            scoring: config.effective_scoring(),
            search_url: config.search_url().to_string(),
            sort,
            theme,
            verbose,
        }
    }

    pub fn current_screen(&self) -> Screen {
        self.screens.last().copied().unwrap_or(Screen::Home)
    }

    /// Category of the screen on top of the stack, if it is a list screen
    pub fn current_category(&self) -> Option<Category> {
        match self.current_screen() {
            Screen::Home => None,
            Screen::Category(category) => Some(category),
        }
    }

    /// Push a category list screen. The new screen starts empty and asks for
    /// exactly one fetch.
    pub fn push_category(&mut self, category: Category) {
        self.screens.push(Screen::Category(category));
        self.products.clear();
        self.table_state = TableState::default();
        self.input_mode = InputMode::Normal;
        self.last_refresh = None;
        self.needs_fetch = true;
    }

    /// Pop the top screen. Home cannot be popped.
    pub fn pop_screen(&mut self) -> bool {
        if self.screens.len() <= 1 {
            return false;
        }
        self.screens.pop();
        self.products.clear();
        self.table_state = TableState::default();
        self.input_mode = InputMode::Normal;
        self.needs_fetch = false;
        true
    }

    /// Push the category highlighted on the home screen
    pub fn enter_selected_category(&mut self) {
        if let Some(category) = self.selected_category() {
            self.push_category(category);
        }
    }

    pub fn selected_category(&self) -> Option<Category> {
        self.home_state
            .selected()
            .and_then(|i| Category::ALL.get(i).copied())
    }

    pub fn next_row(&mut self) {
        match self.current_screen() {
            Screen::Home => {
                let i = wrap_next(self.home_state.selected(), Category::ALL.len());
                self.home_state.select(i);
            }
            Screen::Category(_) => {
                let i = wrap_next(self.table_state.selected(), self.products.len());
                self.table_state.select(i);
            }
        }
    }

    pub fn previous_row(&mut self) {
        match self.current_screen() {
            Screen::Home => {
                let i = wrap_previous(self.home_state.selected(), Category::ALL.len());
                self.home_state.select(i);
            }
            Screen::Category(_) => {
                let i = wrap_previous(self.table_state.selected(), self.products.len());
                self.table_state.select(i);
            }
        }
    }

    pub fn selected_product(&self) -> Option<&ProductRecord> {
        self.selected_entry().map(|(product, _)| product)
    }

    pub fn selected_score_result(&self) -> Option<&ScoreResult> {
        self.selected_entry().map(|(_, result)| result)
    }

    fn selected_entry(&self) -> Option<&ScoredProduct> {
        if self.current_category().is_none() {
            return None;
        }
        self.table_state
            .selected()
            .and_then(|i| self.products.get(i))
    }

    /// Purchase search link for the selected product
    pub fn selected_purchase_url(&self) -> Option<anyhow::Result<String>> {
        self.selected_product()
            .map(|p| crate::browser::purchase_url(&self.search_url, p.display_name()))
    }

    /// Open the selected product's purchase link in the browser
    pub fn open_selected(&mut self) {
        let name = match self.selected_product() {
            Some(p) => p.display_name().to_string(),
            None => return,
        };
        let result = self
            .selected_purchase_url()
            .unwrap_or_else(|| Err(anyhow::anyhow!("no product selected")))
            .and_then(|url| crate::browser::open_url(&url));
        match result {
            Ok(()) => self.show_flash(format!("Opened: {}", name)),
            Err(e) => self.show_flash(format!("Failed to open browser: {}", e)),
        }
    }

    /// Ask for a fresh fetch of the current list screen
    pub fn request_refresh(&mut self) {
        if self.current_category().is_some() {
            self.needs_fetch = true;
            self.show_flash("Refreshing...".to_string());
        }
    }

    /// Install fetched products. Results for a screen that is no longer on
    /// top are dropped.
    pub fn update_products(&mut self, category: Category, mut products: Vec<ScoredProduct>) {
        if self.current_category() != Some(category) {
            return;
        }
        if self.sort {
            crate::fetch::rank_products(&mut products);
        }
        self.products = products;

        if self.products.is_empty() {
            self.table_state.select(None);
        } else {
            match self.table_state.selected() {
                Some(selected) if selected >= self.products.len() => {
                    self.table_state.select(Some(self.products.len() - 1));
                }
                Some(_) => {}
                None => self.table_state.select(Some(0)),
            }
        }

        self.last_refresh = Some(Instant::now());
        self.show_flash(format!("Loaded {} products", self.products.len()));
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed() >= FLASH_DURATION {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Show score breakdown overlay
    pub fn show_score_breakdown(&mut self) {
        if self.selected_product().is_some() {
            self.input_mode = InputMode::ScoreBreakdown;
        }
    }

    pub fn dismiss_score_breakdown(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Advance the loading spinner animation frame
    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}

fn wrap_next(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match selected {
        Some(i) if i + 1 < len => i + 1,
        Some(_) => 0,
        None => 0,
    })
}

fn wrap_previous(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match selected {
        Some(0) | None => len - 1,
        Some(i) => (i - 1).min(len - 1),
    })
}
