//! Fitting labels into fixed-width rows by cutting them short.

/// Measures rendered text. Implemented by the display backend.
pub trait TextMetrics {
    fn measure_width(&self, text: &str, font_size: u32) -> f32;
}

/// First `chars` characters of `text`.
pub fn prefix(text: &str, chars: usize) -> &str {
    match text.char_indices().nth(chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Length, in characters, of the longest prefix of `text` whose rendered
/// width fits in `budget`. `len` is the character count of `text` and is
/// returned unchanged when the whole string fits. Nothing is appended.
pub fn truncate(
    metrics: &impl TextMetrics,
    text: &str,
    len: usize,
    font_size: u32,
    budget: f32,
) -> usize {
    let fits = |n: usize| metrics.measure_width(prefix(text, n), font_size) <= budget;

    if len == 0 || fits(len) {
        return len;
    }

    let mut lo = 0;
    let mut hi = len - 1;
    while lo < hi {
        // round up, or `lo = mid` never moves past a fitting `lo`
        let mid = lo + (hi - lo + 1) / 2;
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    lo
}

/// Owned, truncated copy of `text`.
pub fn fit(metrics: &impl TextMetrics, text: &str, font_size: u32, budget: f32) -> String {
    let len = text.chars().count();
    let keep = truncate(metrics, text, len, font_size, budget);
    prefix(text, keep).to_string()
}
