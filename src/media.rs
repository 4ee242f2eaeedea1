use serde::Serialize;

/// One accepted search result. Immutable once added to the result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultItem {
    pub id: String,
    /// Directly playable asset.
    pub url: String,
    pub title: String,
    /// Page on giphy.com, if the API returned one.
    pub page_url: Option<String>,
}

impl ResultItem {
    /// Where "open in browser" should go.
    pub fn open_target(&self) -> &str {
        self.page_url.as_deref().unwrap_or(&self.url)
    }
}

/// An entry in the collage: a result plus its local load state.
#[derive(Debug, Clone)]
pub struct MediaItem {
    /// Local entry key. Results are not de-duplicated, so the GIPHY id
    /// cannot identify an entry.
    pub key: u64,
    pub item: ResultItem,
    ready: bool,
    size_bytes: Option<u64>,
}

impl MediaItem {
    pub fn new(key: u64, item: ResultItem) -> Self {
        Self {
            key,
            item,
            ready: false,
            size_bytes: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn size_bytes(&self) -> Option<u64> {
        self.size_bytes
    }

    /// Record that the asset finished loading. Never reverts.
    pub fn mark_ready(&mut self, size_bytes: Option<u64>) {
        self.ready = true;
        if size_bytes.is_some() {
            self.size_bytes = size_bytes;
        }
    }
}

/// Human-readable byte count (`812 B`, `1.4 KB`, `2.0 MB`).
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
