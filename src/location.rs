//! Search state persisted in a location string.
//!
//! The location plays the part of a browser address bar: `?q=rick&page=3`.
//! [`SearchState`] converts to and from it, and [`History`] keeps the
//! back/forward stack of visited locations.

use reqwest::Url;

/// Base used to resolve relative locations such as `?q=rick`.
const LOCATION_BASE: &str = "http://localhost/";

/// The query and page currently being displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    /// 1-based page number, never zero
    pub page: u32,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
        }
    }
}

impl SearchState {
    pub fn new(query: impl Into<String>, page: u32) -> Self {
        Self {
            query: query.into(),
            page: page.max(1),
        }
    }

    /// Derive state from a location such as `?q=rick&page=3`.
    ///
    /// Accepts a bare query string (with or without the leading `?`) or a
    /// full URL. A missing `q` is the empty query; a missing, non-numeric or
    /// non-positive `page` becomes 1.
    pub fn from_location(location: &str) -> Self {
        let location = location.trim();
        let Some(url) = resolve_location(location) else {
            return Self::default();
        };

        let mut query = None;
        let mut page = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "q" if query.is_none() => query = Some(value.into_owned()),
                "page" if page.is_none() => page = Some(parse_page(&value)),
                _ => {}
            }
        }

        Self {
            query: query.unwrap_or_default(),
            page: page.unwrap_or(1),
        }
    }

    /// Render the location for this state.
    ///
    /// `q` is omitted when empty and `page` when it is 1; with both omitted
    /// the location is the empty string.
    pub fn to_location(&self) -> String {
        let mut pairs = Vec::new();
        if !self.query.is_empty() {
            pairs.push(("q", self.query.clone()));
        }
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }
        if pairs.is_empty() {
            return String::new();
        }

        let Ok(mut url) = Url::parse(LOCATION_BASE) else {
            return String::new();
        };
        url.query_pairs_mut().extend_pairs(pairs);
        url.query()
            .map_or_else(String::new, |query| format!("?{query}"))
    }
}

fn resolve_location(location: &str) -> Option<Url> {
    if let Ok(url) = Url::parse(location) {
        return Some(url);
    }
    let base = Url::parse(LOCATION_BASE).ok()?;
    if location.is_empty() || location.starts_with('?') || location.starts_with('/') {
        base.join(location).ok()
    } else {
        base.join(&format!("?{location}")).ok()
    }
}

/// Parse a page number leniently: leading digits count, anything else is 1.
///
/// `"3"` and `"3abc"` give 3; `"abc"`, `"0"` and `"-2"` give 1. Values too
/// large for `u32` saturate.
pub fn parse_page(raw: &str) -> u32 {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let digits: String = digits.chars().take_while(char::is_ascii_digit).collect();
    if negative || digits.is_empty() {
        return 1;
    }
    digits
        .parse::<u32>()
        .unwrap_or(u32::MAX)
        .max(1)
}

/// Back/forward stack of visited locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
    cursor: usize,
}

impl History {
    /// Start a history whose only entry is `initial`.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            cursor: 0,
        }
    }

    /// The location at the cursor.
    pub fn current(&self) -> &str {
        self.entries.get(self.cursor).map_or("", String::as_str)
    }

    /// Push a new location, dropping any forward entries.
    pub fn push(&mut self, location: impl Into<String>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(location.into());
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one entry and return it, or `None` at the oldest entry.
    pub fn back(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    /// Step forward one entry and return it, or `None` at the newest entry.
    pub fn forward(&mut self) -> Option<&str> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub const fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(String::new())
    }
}
