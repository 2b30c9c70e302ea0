use super::model::Track;

/// Format a price the way the storefront shows it: `$29.99`, `$30`.
pub fn format_price(price: f64) -> String {
    format!("${}", price)
}

/// Tags joined for a single card line, e.g. `#summer #chill`.
pub fn tag_line(tags: &[String]) -> String {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| format!("#{t}"))
        .collect::<Vec<String>>()
        .join(" ")
}

/// Counters line of a card: plays, likes and price.
pub fn stats_line(track: &Track) -> String {
    format!(
        "♫ {}  ♥ {}  {}",
        track.plays,
        track.likes,
        format_price(track.price)
    )
}
