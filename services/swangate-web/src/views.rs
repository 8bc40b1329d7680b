//! Minimal server-rendered views.
//!
//! The rendering layer is intentionally thin; pages are assembled from
//! escaped claim values and static markup.

use swangate_auth_core::UserRecord;

use crate::image::ResolvedImage;

/// Landing page with current auth status
pub fn home_page(user: Option<&UserRecord>, error: Option<&str>) -> String {
    let status = match user {
        Some(user) => format!(
            "<p>Signed in as <strong>{}</strong>.</p>\n        <p><a href=\"/swans\">View the swans</a> | <a href=\"/logout\">Logout</a></p>",
            escape_html(display_name(user)),
        ),
        None => {
            "<p>You are not signed in.</p>\n        <p><a href=\"/login\">Login</a></p>".to_string()
        }
    };

    let banner = match error {
        Some(_) => "<p class=\"error\">Login failed. Please try again.</p>",
        None => "",
    };

    page(
        "Swan Migration",
        &format!(
            "<h1>Swan Migration</h1>\n        {banner}\n        {status}"
        ),
    )
}

/// Protected content page
pub fn swans_page(user: &UserRecord, image: &ResolvedImage) -> String {
    let email = user
        .email
        .as_deref()
        .map(|e| format!("<p>Email: {}</p>", escape_html(e)))
        .unwrap_or_default();

    page(
        "Flying Swans",
        &format!(
            "<h1>Flying Swans</h1>\n        <p>Welcome, {name}!</p>\n        {email}\n        <img src=\"{src}\" alt=\"Flying swans\" width=\"800\">\n        <p class=\"source\">Image source: {source}</p>\n        <p><a href=\"/\">Home</a> | <a href=\"/logout\">Logout</a></p>",
            name = escape_html(display_name(user)),
            src = escape_html(&image.url),
            source = image.source,
        ),
    )
}

/// Rendered by the 500 boundary
pub fn error_page(message: &str, detail: Option<&str>) -> String {
    let detail = detail
        .map(|d| format!("<pre>{}</pre>", escape_html(d)))
        .unwrap_or_default();

    page(
        "Error",
        &format!(
            "<h1>Error</h1>\n        <p>{}</p>\n        {detail}\n        <p><a href=\"/\">Home</a></p>",
            escape_html(message),
        ),
    )
}

fn display_name(user: &UserRecord) -> &str {
    user.name
        .as_deref()
        .or(user.email.as_deref())
        .unwrap_or(&user.sub)
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"utf-8\">\n    <title>{title}</title>\n</head>\n<body>\n    <main>\n        {body}\n    </main>\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
