//! Class progress HTML report.
//!
//! Produces a single file with all CSS/JS inlined, so it can be emailed or
//! opened straight from disk.

use anyhow::{Context, Result};
use std::path::Path;

use campusquiz_core::leaderboard::LeaderboardEntry;
use campusquiz_core::model::Tier;
use campusquiz_core::progress::ClassProgress;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn level_class(level: Tier) -> &'static str {
    match level {
        Tier::Easy => "easy",
        Tier::Medium => "medium",
        Tier::Hard => "hard",
    }
}

/// Generate an HTML page from a class progress snapshot.
pub fn generate_html(progress: &ClassProgress) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>campusquiz class progress</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>Class progress</h1>\n");
    let filter = match &progress.search {
        Some(search) => format!(" | filter: <strong>{}</strong>", html_escape(search)),
        None => String::new(),
    };
    html.push_str(&format!(
        "<p class=\"meta\">{} players{} | {}</p>\n",
        progress.rows.len(),
        filter,
        progress.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Level breakdown
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Levels</h2>\n<ul class=\"levels\">\n");
    for (tier, count) in progress.level_counts() {
        html.push_str(&format!(
            "<li class=\"{}\">{}: {}</li>\n",
            level_class(tier),
            tier.label(),
            count
        ));
    }
    html.push_str("</ul>\n");

    html.push_str(&format!("<h2>Top {}</h2>\n", progress.top.size));
    if progress.top.entries.is_empty() {
        html.push_str("<p class=\"meta\">No players yet.</p>\n");
    } else {
        html.push_str(&generate_bar_chart(&progress.top.entries));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Players</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"players\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Username</th><th onclick=\"sortTable(1)\">Role</th><th onclick=\"sortTable(2)\">Total</th><th onclick=\"sortTable(3)\">Middlesex</th><th onclick=\"sortTable(4)\">Level</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for row in &progress.rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"{}\">{}</td></tr>\n",
            html_escape(&row.username),
            row.permission,
            row.total_score,
            row.middlesex_score,
            level_class(row.level),
            row.level.label()
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(progress).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write a class progress page to a file.
pub fn write_html_report(progress: &ClassProgress, path: &Path) -> Result<()> {
    let html = generate_html(progress);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    Ok(())
}

fn generate_bar_chart(entries: &[LeaderboardEntry]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let best = entries.iter().map(|e| e.score).max().unwrap_or(0).max(1);
    let total_height = entries.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, entry) in entries.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (entry.score as f64 / best as f64 * max_width as f64) as usize;

        let color = match entry.rank {
            1 => "#eab308",
            2 => "#94a3b8",
            3 => "#b45309",
            _ => "#3b82f6",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}. {}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            entry.rank,
            html_escape(&entry.username)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            entry.score
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --easy: #dcfce7; --medium: #fef9c3; --hard: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --easy: #064e3b; --medium: #713f12; --hard: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.levels { display: flex; gap: 1rem; list-style: none; padding: 0; }
.levels li { padding: 0.5rem 1rem; border-radius: 8px; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
td.num { text-align: right; }
.easy { background: var(--easy); }
.medium { background: var(--medium); }
.hard { background: var(--hard); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('players');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  const numeric = col == 2 || col == 3;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const cmp = numeric ? Number(va) - Number(vb) : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use campusquiz_core::leaderboard::{Leaderboard, RankCategory};
    use campusquiz_core::model::Permission;
    use campusquiz_core::progress::ProgressRow;

    fn make_progress() -> ClassProgress {
        ClassProgress {
            generated_at: chrono::Utc::now(),
            search: Some("<b>".into()),
            rows: vec![
                ProgressRow {
                    username: "ana".into(),
                    permission: Permission::Student,
                    total_score: 620,
                    middlesex_score: 520,
                    level: Tier::Medium,
                },
                ProgressRow {
                    username: "Bo & Co".into(),
                    permission: Permission::Teacher,
                    total_score: 40,
                    middlesex_score: 40,
                    level: Tier::Easy,
                },
            ],
            top: Leaderboard {
                category: RankCategory::TotalScore,
                size: 10,
                entries: vec![
                    LeaderboardEntry {
                        rank: 1,
                        username: "ana".into(),
                        score: 620,
                    },
                    LeaderboardEntry {
                        rank: 2,
                        username: "Bo & Co".into(),
                        score: 40,
                    },
                ],
            },
        }
    }

    #[test]
    fn html_report_contains_required_elements() {
        let html = generate_html(&make_progress());

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<td>ana</td>"));
        assert!(html.contains("Medium: 1"));
        assert!(html.contains("Hard: 0"));
        assert!(html.contains("<svg"));
        assert!(html.contains("Top 10"));
    }

    #[test]
    fn user_text_is_escaped() {
        let html = generate_html(&make_progress());
        assert!(html.contains("Bo &amp; Co"));
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn empty_board_has_no_chart() {
        let mut progress = make_progress();
        progress.rows.clear();
        progress.top.entries.clear();
        let html = generate_html(&progress);
        assert!(html.contains("No players yet."));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn html_report_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("class.html");

        write_html_report(&make_progress(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
