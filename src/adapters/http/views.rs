//! HTML views for the browser-facing routes.
//!
//! Static pages are compiled in from `templates/`; the roster table is
//! built here with every user-supplied field escaped.

use std::fmt::Write;

use crate::domain::character::Character;

pub const INDEX_PAGE: &str = include_str!("../../../templates/index.html");
pub const CREATE_PAGE: &str = include_str!("../../../templates/create.html");

/// Render the roster as an HTML table.
pub fn render_list(characters: &[Character]) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  \
         <title>Characters</title>\n</head>\n<body>\n  <h1>Characters</h1>\n",
    );

    if characters.is_empty() {
        out.push_str("  <p>No characters yet.</p>\n");
    } else {
        out.push_str("  <table>\n    <tr><th>Name</th><th>Class</th><th>Level</th></tr>\n");
        for c in characters {
            let _ = writeln!(
                out,
                "    <tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&c.name),
                escape_html(&c.class),
                c.level
            );
        }
        out.push_str("  </table>\n");
    }

    out.push_str("  <p><a href=\"/create\">Create a character</a></p>\n</body>\n</html>\n");
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
