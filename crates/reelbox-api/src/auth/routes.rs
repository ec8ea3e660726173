//! Static route classification table.

use std::collections::HashMap;

/// Access class of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    PublicPage,
    ProtectedPage,
    PublicApi,
    ProtectedApi,
}

impl RouteClass {
    pub fn is_protected(&self) -> bool {
        matches!(self, RouteClass::ProtectedPage | RouteClass::ProtectedApi)
    }

    pub fn is_api(&self) -> bool {
        matches!(self, RouteClass::PublicApi | RouteClass::ProtectedApi)
    }
}

#[derive(Debug, Clone, Copy)]
struct RouteEntry {
    class: RouteClass,
    /// Public page that signed-in callers are sent away from
    entry_page: bool,
}

/// Exact-path route table. Unknown paths fail closed.
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: HashMap<&'static str, RouteEntry>,
}

const API_PREFIX: &str = "/api/";

impl RouteTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The table for every route this service knows about.
    pub fn default_table() -> Self {
        Self::empty()
            .entry_page("/")
            .entry_page("/sign-in")
            .entry_page("/sign-up")
            .with("/home", RouteClass::PublicPage)
            .with("/video-upload", RouteClass::ProtectedPage)
            .with("/social-share", RouteClass::ProtectedPage)
            .with("/health", RouteClass::PublicApi)
            .with("/ready", RouteClass::PublicApi)
            .with("/api/videos", RouteClass::PublicApi)
            .with("/api/openapi.json", RouteClass::PublicApi)
            .with("/api/video-upload", RouteClass::ProtectedApi)
            .with("/api/image-upload", RouteClass::ProtectedApi)
            .with("/api/delivery", RouteClass::ProtectedApi)
    }

    pub fn with(mut self, path: &'static str, class: RouteClass) -> Self {
        self.entries.insert(
            path,
            RouteEntry {
                class,
                entry_page: false,
            },
        );
        self
    }

    fn entry_page(mut self, path: &'static str) -> Self {
        self.entries.insert(
            path,
            RouteEntry {
                class: RouteClass::PublicPage,
                entry_page: true,
            },
        );
        self
    }

    /// Classify a request path. Paths missing from the table are protected: `/api/...` as
    /// protected API, anything else as a protected page.
    pub fn classify(&self, path: &str) -> RouteClass {
        let path = normalize_path(path);
        match self.entries.get(path) {
            Some(entry) => entry.class,
            None if path.starts_with(API_PREFIX) || path == "/api" => RouteClass::ProtectedApi,
            None => RouteClass::ProtectedPage,
        }
    }

    pub fn is_entry_page(&self, path: &str) -> bool {
        self.entries
            .get(normalize_path(path))
            .map(|entry| entry.entry_page)
            .unwrap_or(false)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::default_table()
    }
}

/// Strip one trailing slash; the root path stays `/`.
fn normalize_path(path: &str) -> &str {
    if path.is_empty() {
        return "/";
    }
    match path.strip_suffix('/') {
        Some("") | None => path,
        Some(trimmed) => trimmed,
    }
}
