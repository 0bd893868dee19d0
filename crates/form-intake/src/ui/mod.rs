//! Server-rendered pages: the public form and the admin dashboard

pub mod dashboard;
pub mod form;

pub use dashboard::render_dashboard;
pub use form::render_form;

/// Styles shared by both pages
const BASE_STYLE: &str = r#"
  * { box-sizing: border-box; }
  body { margin: 0; font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
         background: linear-gradient(135deg, #eff6ff, #f5f3ff); color: #1f2937; min-height: 100vh; }
  .banner { padding: 1rem; border-left: 4px solid; border-radius: 4px; margin-bottom: 1rem; }
  .banner.success { background: #dcfce7; border-color: #22c55e; color: #15803d; }
  .banner.error { background: #fee2e2; border-color: #ef4444; color: #b91c1c; }
  .hidden { display: none; }
  .btn { border: 0; border-radius: 9999px; color: #fff; cursor: pointer; font-weight: 500;
         background: linear-gradient(90deg, #2563eb, #9333ea); }
  .btn:disabled { background: #9ca3af; cursor: default; }
"#;

/// Wrap a page body in the common document shell
fn page(title: &str, extra_style: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{BASE_STYLE}{extra_style}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape_html(title),
    )
}

/// Client-side helper that shows a banner and hides it after `timeout_ms`
fn banner_script(timeout_ms: u64) -> String {
    format!(
        r#"
function showBanner(id, message) {{
  const el = document.getElementById(id);
  el.textContent = message;
  el.classList.remove('hidden');
  clearTimeout(el._timer);
  el._timer = setTimeout(() => el.classList.add('hidden'), {timeout_ms});
}}
"#
    )
}

/// Escape text for HTML element content and quoted attributes
pub fn escape_html(input: &str) -> String {
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
