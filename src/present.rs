//! Bullet-list rendering of summaries

/// Render `*`-delimited summary text as an HTML bullet list.
///
/// Every segment that is non-empty after trimming becomes one `<li>`, its text written
/// out unchanged.
pub fn to_html_bullets(summary: &str) -> String {
    let mut html = String::from("<ul>");
    for point in summary.split('*') {
        let point = point.trim();
        if !point.is_empty() {
            html.push_str("<li>");
            html.push_str(point);
            html.push_str("</li>");
        }
    }
    html.push_str("</ul>");
    html
}
