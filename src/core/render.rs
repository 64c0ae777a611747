use crate::core::{SearchResult, UniversityRecord};
use crate::utils::error::Result;
use std::fmt::Write;

pub const NO_RESULTS_HTML: &str =
    r#"<p class="no-results">No universities found. Try a different country or state.</p>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
    Json,
    Csv,
}

/// 所有文字欄位都不可信任，插入標記前一律跳脫
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_card(record: &UniversityRecord, index: usize) -> String {
    let name = escape_html(&record.name);
    let mut card = String::new();

    // 寫入 String 不會失敗
    let _ = write!(
        card,
        r#"<article class="university-card" style="animation-delay: {:.1}s">"#,
        index as f64 * 0.1
    );
    let _ = write!(card, r#"<h3 class="university-name">{}</h3>"#, name);
    card.push_str(r#"<div class="university-info">"#);
    push_info(&mut card, "country", &record.country);
    if let Some(state) = &record.state_province {
        push_info(&mut card, "state", state);
    }
    if let Some(domain) = record.primary_domain() {
        push_info(&mut card, "domain", domain);
    }
    card.push_str("</div>");

    if let Some(url) = record.primary_web_page().filter(|url| is_web_link(url)) {
        let _ = write!(
            card,
            r#"<a href="{}" target="_blank" rel="noopener noreferrer" class="university-link" aria-label="Visit {} website">Visit Website</a>"#,
            escape_html(url),
            name
        );
    }

    card.push_str("</article>");
    card
}

/// 只連結 http/https，其他 scheme (例如 javascript:) 不輸出連結
fn is_web_link(url: &str) -> bool {
    url::Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn push_info(card: &mut String, kind: &str, text: &str) {
    let _ = write!(
        card,
        r#"<div class="info-item info-{}"><span>{}</span></div>"#,
        kind,
        escape_html(text)
    );
}

/// 結果為空時輸出「查無結果」提示
pub fn render_results(result: &SearchResult) -> String {
    if result.is_empty() {
        return NO_RESULTS_HTML.to_string();
    }

    result
        .records
        .iter()
        .enumerate()
        .map(|(index, record)| render_card(record, index))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_text(result: &SearchResult) -> String {
    if result.is_empty() {
        return "No universities found.".to_string();
    }

    let mut out = String::new();
    for (i, record) in result.records.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", i + 1, strip_control(&record.name));
        let location = match &record.state_province {
            Some(state) => format!("{}, {}", state, record.country),
            None => record.country.clone(),
        };
        let _ = writeln!(out, "     {}", strip_control(&location));
        if let Some(domain) = record.primary_domain() {
            let _ = writeln!(out, "     domain: {}", strip_control(domain));
        }
        if let Some(url) = record.primary_web_page() {
            let _ = writeln!(out, "     web:    {}", strip_control(url));
        }
    }
    let _ = write!(out, "{} universities", result.len());
    out
}

/// 終端機輸出前移除控制字元 (ANSI escape 等)
fn strip_control(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

pub fn render_json(result: &SearchResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(&result.records)?)
}

pub fn render_csv(result: &SearchResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["name", "country", "state_province", "domain", "web_page"])?;

    for record in &result.records {
        writer.write_record([
            record.name.as_str(),
            record.country.as_str(),
            record.state_province.as_deref().unwrap_or(""),
            record.primary_domain().unwrap_or(""),
            record.primary_web_page().unwrap_or(""),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn render(result: &SearchResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(result)),
        OutputFormat::Html => Ok(render_results(result)),
        OutputFormat::Json => render_json(result),
        OutputFormat::Csv => render_csv(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> UniversityRecord {
        UniversityRecord {
            name: name.to_string(),
            country: "Canada".to_string(),
            state_province: Some("Quebec".to_string()),
            domains: vec!["mcgill.ca".to_string(), "mail.mcgill.ca".to_string()],
            web_pages: vec!["https://www.mcgill.ca/".to_string()],
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("Université Laval"), "Université Laval");
    }

    #[test]
    fn test_card_contains_fields() {
        let card = render_card(&record("McGill University"), 2);

        assert!(card.contains("McGill University"));
        assert!(card.contains("Quebec"));
        assert!(card.contains("mcgill.ca"));
        assert!(!card.contains("mail.mcgill.ca"));
        assert!(card.contains(r#"href="https://www.mcgill.ca/""#));
        assert!(card.contains(r#"target="_blank""#));
        assert!(card.contains(r#"rel="noopener noreferrer""#));
        assert!(card.contains("animation-delay: 0.2s"));
    }

    #[test]
    fn test_script_in_name_is_escaped() {
        let card = render_card(&record("<script>alert(1)</script>"), 0);

        assert!(!card.contains("<script>"));
        assert!(card.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_hostile_url_cannot_break_attribute() {
        let mut hostile = record("X");
        hostile.web_pages = vec![r#"https://x.org/" onmouseover="alert(1)"#.to_string()];

        let card = render_card(&hostile, 0);
        assert!(!card.contains(r#"" onmouseover=""#));
        assert!(card.contains("&quot; onmouseover=&quot;"));
    }

    #[test]
    fn test_non_web_links_are_dropped() {
        let mut hostile = record("X");
        hostile.web_pages = vec!["javascript:alert(1)".to_string()];

        let card = render_card(&hostile, 0);
        assert!(!card.contains("javascript:"));
        assert!(!card.contains("<a "));
    }

    #[test]
    fn test_card_tolerates_missing_optional_fields() {
        let bare = UniversityRecord {
            name: "Bare College".to_string(),
            country: "Canada".to_string(),
            state_province: None,
            domains: vec![],
            web_pages: vec![],
        };

        let card = render_card(&bare, 0);
        assert!(card.contains("Bare College"));
        assert!(!card.contains("info-state"));
        assert!(!card.contains("info-domain"));
        assert!(!card.contains("<a "));
    }

    #[test]
    fn test_empty_result_renders_no_results() {
        assert_eq!(render_results(&SearchResult::default()), NO_RESULTS_HTML);
        assert_eq!(render_text(&SearchResult::default()), "No universities found.");
    }

    #[test]
    fn test_one_card_per_record() {
        let result = SearchResult::new(vec![record("A"), record("B"), record("C")]);
        let html = render_results(&result);
        assert_eq!(html.matches("<article").count(), 3);
    }

    #[test]
    fn test_render_csv() {
        let mut second = record("Université, Laval");
        second.state_province = None;
        second.web_pages.clear();
        let result = SearchResult::new(vec![record("McGill University"), second]);

        let csv = render_csv(&result).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "name,country,state_province,domain,web_page");
        assert_eq!(
            lines[1],
            "McGill University,Canada,Quebec,mcgill.ca,https://www.mcgill.ca/"
        );
        assert_eq!(lines[2], r#""Université, Laval",Canada,,mcgill.ca,"#);
    }

    #[test]
    fn test_render_json_uses_upstream_keys() {
        let json = render_json(&SearchResult::new(vec![record("A")])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["state-province"], "Quebec");
        assert_eq!(value[0]["web_pages"][0], "https://www.mcgill.ca/");
    }

    #[test]
    fn test_render_text_strips_control_characters() {
        let mut hostile = record("Evil\x1b[2J\x1b]0;pwned\x07 University");
        hostile.state_province = Some("Que\rbec".to_string());
        hostile.domains = vec!["evil\u{9b}31m.x".to_string()];

        let text = render_text(&SearchResult::new(vec![hostile]));

        assert!(!text.chars().any(|c| c.is_control() && c != '\n'));
        assert!(text.contains("Evil[2J]0;pwned University"));
        assert!(text.contains("Quebec, Canada"));
        assert!(text.contains("domain: evil31m.x"));
    }

    #[test]
    fn test_render_text() {
        let text = render(&SearchResult::new(vec![record("A")]), OutputFormat::Text).unwrap();
        assert!(text.contains("  1. A"));
        assert!(text.contains("Quebec, Canada"));
        assert!(text.ends_with("1 universities"));
    }
}
