use crate::models::LeaderboardRow;
use chrono::NaiveDate;

pub fn render_leaderboard(today: NaiveDate, rows: &[LeaderboardRow]) -> String {
    let body = if rows.is_empty() {
        r#"<tr><td colspan="4" class="empty">Nobody has logged anything yet.</td></tr>"#.to_string()
    } else {
        rows.iter().map(render_row).collect::<Vec<_>>().join("\n")
    };

    INDEX_HTML
        .replace("{{DATE}}", &today.to_string())
        .replace("{{PLAYERS}}", &rows.len().to_string())
        .replace("{{ROWS}}", &body)
}

fn render_row(row: &LeaderboardRow) -> String {
    let medal = match row.rank {
        1 => " gold",
        2 => " silver",
        3 => " bronze",
        _ => "",
    };
    format!(
        r#"<tr class="row{medal}"><td class="rank">#{}</td><td>{}</td><td class="num">{} XP</td><td class="num">{} days</td></tr>"#,
        row.rank,
        escape_html(&row.display_name),
        row.total_points,
        row.current_streak,
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>StreakHub Leaderboard</title>
  <style>
    :root {
      --bg: #1e1f22;
      --card: #2b2d30;
      --ink: #dfe1e5;
      --muted: #8c8f94;
      --accent: #f97316;
      --gold: #facc15;
      --silver: #cbd5e1;
      --bronze: #d97706;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      display: grid;
      place-items: start center;
      padding: 48px 18px;
    }

    .app {
      width: min(760px, 100%);
      background: var(--card);
      border-radius: 16px;
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: 1.8rem;
    }

    .subtitle {
      margin: 6px 0 0;
      color: var(--muted);
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th,
    td {
      padding: 12px 10px;
      text-align: left;
      border-bottom: 1px solid rgba(255, 255, 255, 0.06);
    }

    th {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .num {
      text-align: right;
      font-variant-numeric: tabular-nums;
    }

    .rank {
      width: 64px;
      color: var(--accent);
      font-weight: 600;
    }

    .gold .rank {
      color: var(--gold);
    }

    .silver .rank {
      color: var(--silver);
    }

    .bronze .rank {
      color: var(--bronze);
    }

    .empty {
      text-align: center;
      color: var(--muted);
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Global Leaderboard</h1>
      <p class="subtitle">{{PLAYERS}} developers ranked by XP as of {{DATE}}</p>
    </header>
    <table>
      <thead>
        <tr><th>Rank</th><th>Developer</th><th class="num">XP</th><th class="num">Streak</th></tr>
      </thead>
      <tbody>
{{ROWS}}
      </tbody>
    </table>
  </main>
</body>
</html>
"#;
