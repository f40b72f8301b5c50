//! Self-contained HTML pages for teachers.

pub mod html;

pub use html::{generate_html, write_html_report};
