//! HTML shell rewriting.
//!
//! The template must contain two literal anchors: the dev script tag for
//! the unbuilt entry module, and a closing head tag. Both substitutions
//! are exact; a missing anchor signals a template/bundler mismatch and is
//! never silently ignored.

/// Errors that can occur while rewriting the HTML shell.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("Template is missing the expected script tag: {0}")]
    MissingScriptTag(String),

    #[error("Template is missing a closing </head> tag")]
    MissingHeadTag,
}

/// The literal dev script tag the template must carry for `entry_rel`.
fn script_anchor(entry_rel: &str) -> String {
    format!(r#"<script type="module" src="/{entry_rel}"></script>"#)
}

/// Production rewrite: point the script tag at the resolved hashed entry
/// chunk and link the compiled stylesheet before `</head>`.
pub fn rewrite(
    template: &str,
    entry_rel: &str,
    resolved_entry_href: &str,
    css_href: &str,
) -> Result<String, RewriteError> {
    let anchor = script_anchor(entry_rel);

    if !template.contains(&anchor) {
        return Err(RewriteError::MissingScriptTag(anchor));
    }

    let replacement = format!(r#"<script type="module" src="{resolved_entry_href}"></script>"#);
    let html = template.replacen(&anchor, &replacement, 1);

    insert_stylesheet(&html, css_href)
}

/// Dev-mode rewrite: only the stylesheet link is injected; the dev server
/// serves the raw entry path directly, so the script tag stays untouched.
pub fn inject_dev_head(template: &str, css_href: &str) -> Result<String, RewriteError> {
    insert_stylesheet(template, css_href)
}

fn insert_stylesheet(html: &str, css_href: &str) -> Result<String, RewriteError> {
    let link = format!("<link rel=\"stylesheet\" href=\"{css_href}\">\n  </head>");

    if !html.contains("</head>") {
        return Err(RewriteError::MissingHeadTag);
    }

    Ok(html.replacen("</head>", &link, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>App</title>
</head>
<body>
  <div id="root"></div>
  <script type="module" src="/src/main.tsx"></script>
</body>
</html>"#;

    #[test]
    fn rewrites_script_and_links_stylesheet() {
        let html = rewrite(
            TEMPLATE,
            "src/main.tsx",
            "/assets/main-XYZ789.js",
            "/assets/styles.css",
        )
        .unwrap();

        assert_eq!(
            html.matches(r#"<script type="module" src="/assets/main-XYZ789.js"></script>"#)
                .count(),
            1
        );
        assert_eq!(
            html.matches(r#"<link rel="stylesheet" href="/assets/styles.css">"#)
                .count(),
            1
        );
        assert!(!html.contains("/src/main.tsx"));
    }

    #[test]
    fn missing_script_anchor_fails() {
        let template = "<html><head></head><body></body></html>";

        let result = rewrite(template, "src/main.tsx", "/assets/main.js", "/s.css");

        assert!(matches!(result, Err(RewriteError::MissingScriptTag(_))));
    }

    #[test]
    fn missing_head_tag_fails() {
        let template = r#"<body><script type="module" src="/src/main.tsx"></script></body>"#;

        let result = rewrite(template, "src/main.tsx", "/assets/main.js", "/s.css");

        assert!(matches!(result, Err(RewriteError::MissingHeadTag)));
    }

    #[test]
    fn dev_injection_leaves_script_tag_alone() {
        let html = inject_dev_head(TEMPLATE, "/styles.css").unwrap();

        assert!(html.contains(r#"<link rel="stylesheet" href="/styles.css">"#));
        assert!(html.contains(r#"<script type="module" src="/src/main.tsx"></script>"#));
    }

    #[test]
    fn dev_injection_requires_head_tag() {
        let result = inject_dev_head("<body></body>", "/styles.css");

        assert!(matches!(result, Err(RewriteError::MissingHeadTag)));
    }
}
