//! Markdown to HTML for the subset of Markdown the report template emits.
//!
//! Supported blocks: ATX headings, paragraphs, `-` / `*` bullet lists, pipe
//! tables and the report's article markers:
//!
//! ```text
//! ~article id="summary"      ->  <article id="summary">
//! ~/article                  ->  </article> plus a page break
//! ```
//!
//! Supported inline markup: images, links, `**strong**`, `*em*` and `_em_`.

use regex::Regex;

/// Bundled stylesheet, used when no other is configured.
pub const DEFAULT_STYLESHEET: &str = include_str!("../assets/report_style.css");

const ARTICLE_END: &str = "</article>\n<p style=\"page-break-before: always\" ></p>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    Default,
}

impl Align {
    fn parse(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        let body = cell.trim_start_matches(':').trim_end_matches(':');
        if body.is_empty() || !body.chars().all(|c| c == '-') {
            return None;
        }
        Some(match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Self::Center,
            (true, false) => Self::Left,
            (false, true) => Self::Right,
            (false, false) => Self::Default,
        })
    }

    fn style(self) -> &'static str {
        match self {
            Self::Left => " style=\"text-align: left;\"",
            Self::Right => " style=\"text-align: right;\"",
            Self::Center => " style=\"text-align: center;\"",
            Self::Default => "",
        }
    }
}

fn split_row(line: &str) -> Vec<&str> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(str::trim).collect()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Converts report Markdown to an HTML fragment.
pub struct MarkdownRenderer {
    article_start: Regex,
    heading: Regex,
    bullet: Regex,
    image: Regex,
    link: Regex,
    strong: Regex,
    em_star: Regex,
    em_underscore: Regex,
}

impl MarkdownRenderer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            article_start: Regex::new(r#"^~article\s+id="([A-Za-z0-9_-]*)"\s*$"#)?,
            heading: Regex::new(r"^(#{1,6})\s+(.*?)\s*#*\s*$")?,
            bullet: Regex::new(r"^\s*[-*]\s+(.*)$")?,
            image: Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)\)")?,
            link: Regex::new(r"\[([^\]]+)\]\(([^)\s]+)\)")?,
            strong: Regex::new(r"\*\*(.+?)\*\*")?,
            em_star: Regex::new(r"\*([^*\s][^*]*)\*")?,
            em_underscore: Regex::new(r"(^|[\s(])_([^_]+)_($|[\s.,;:)])")?,
        })
    }

    fn inline(
        &self,
        text: &str,
    ) -> String {
        let text = escape_html(text);
        let text = self.image.replace_all(&text, r#"<img alt="${1}" src="${2}" />"#);
        let text = self.link.replace_all(&text, r#"<a href="${2}">${1}</a>"#);
        let text = self.strong.replace_all(&text, "<strong>${1}</strong>");
        let text = self.em_star.replace_all(&text, "<em>${1}</em>");
        let text = self.em_underscore.replace_all(&text, "${1}<em>${2}</em>${3}");
        text.into_owned()
    }

    fn table(
        &self,
        header: &str,
        aligns: &[Align],
        body: &[&str],
    ) -> String {
        let cell_html = |tag: &str, cells: Vec<&str>| -> String {
            let mut row = String::from("<tr>\n");
            for (i, cell) in cells.into_iter().enumerate() {
                let style = aligns.get(i).copied().unwrap_or(Align::Default).style();
                row.push_str(&format!("<{tag}{style}>{}</{tag}>\n", self.inline(cell)));
            }
            row.push_str("</tr>");
            row
        };

        let mut html = String::from("<table>\n<thead>\n");
        html.push_str(&cell_html("th", split_row(header)));
        html.push_str("\n</thead>\n<tbody>\n");
        for line in body {
            html.push_str(&cell_html("td", split_row(line)));
            html.push('\n');
        }
        html.push_str("</tbody>\n</table>");
        html
    }

    /// Render `markdown` as an HTML fragment, one block per line.
    pub fn render(
        &self,
        markdown: &str,
    ) -> String {
        let lines: Vec<&str> = markdown.lines().collect();
        let mut blocks: Vec<String> = Vec::new();
        let mut paragraph: Vec<&str> = Vec::new();
        let mut items: Vec<&str> = Vec::new();

        let flush = |blocks: &mut Vec<String>, paragraph: &mut Vec<&str>, items: &mut Vec<&str>| {
            if !paragraph.is_empty() {
                blocks.push(format!("<p>{}</p>", self.inline(&paragraph.join("\n"))));
                paragraph.clear();
            }
            if !items.is_empty() {
                let lis: Vec<String> = items.iter().map(|i| format!("<li>{}</li>", self.inline(i))).collect();
                blocks.push(format!("<ul>\n{}\n</ul>", lis.join("\n")));
                items.clear();
            }
        };

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            let trimmed = line.trim();

            if trimmed.is_empty() {
                flush(&mut blocks, &mut paragraph, &mut items);
            } else if let Some(caps) = self.article_start.captures(trimmed) {
                flush(&mut blocks, &mut paragraph, &mut items);
                blocks.push(format!("<article id=\"{}\">", &caps[1]));
            } else if trimmed == "~/article" {
                flush(&mut blocks, &mut paragraph, &mut items);
                blocks.push(ARTICLE_END.to_string());
            } else if let Some(caps) = self.heading.captures(trimmed) {
                flush(&mut blocks, &mut paragraph, &mut items);
                let level = caps[1].len();
                blocks.push(format!("<h{level}>{}</h{level}>", self.inline(&caps[2])));
            } else if trimmed.starts_with('|') && paragraph.is_empty() {
                let aligns: Option<Vec<Align>> = lines
                    .get(i + 1)
                    .filter(|next| next.trim().starts_with('|'))
                    .and_then(|next| split_row(next).into_iter().map(Align::parse).collect());
                match aligns {
                    Some(aligns) => {
                        flush(&mut blocks, &mut paragraph, &mut items);
                        let start = i + 2;
                        let mut end = start;
                        while end < lines.len() && lines[end].trim().starts_with('|') {
                            end += 1;
                        }
                        blocks.push(self.table(trimmed, &aligns, &lines[start..end]));
                        i = end;
                        continue;
                    }
                    None => paragraph.push(trimmed),
                }
            } else if let Some(caps) = self.bullet.captures(line).filter(|_| paragraph.is_empty()) {
                let item = caps.get(1).map_or("", |m| m.as_str());
                items.push(item);
            } else {
                if !items.is_empty() {
                    flush(&mut blocks, &mut paragraph, &mut items);
                }
                paragraph.push(trimmed);
            }
            i += 1;
        }
        flush(&mut blocks, &mut paragraph, &mut items);

        blocks.join("\n")
    }
}

/// Wrap an HTML fragment in a complete document with `css` embedded.
pub fn html_document(
    title: &str,
    body: &str,
    css: &str,
) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>\n{css}\n</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape_html(title)
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(md: &str) -> String {
        MarkdownRenderer::new().unwrap().render(md)
    }

    #[test]
    fn headings_and_paragraphs() {
        let html = render("# Title\n\nFirst line\nsecond line\n\n## Next");

        assert_eq!(
            html,
            "<h1>Title</h1>\n<p>First line\nsecond line</p>\n<h2>Next</h2>"
        );
    }

    #[test]
    fn article_markers() {
        let html = render("~article id=\"summary\"\n\ntext\n\n~/article");

        assert_eq!(
            html,
            "<article id=\"summary\">\n<p>text</p>\n</article>\n<p style=\"page-break-before: always\" ></p>"
        );
    }

    #[test]
    fn bullet_list() {
        let html = render("- one\n- **two**\n\nafter");

        assert_eq!(
            html,
            "<ul>\n<li>one</li>\n<li><strong>two</strong></li>\n</ul>\n<p>after</p>"
        );
    }

    #[test]
    fn inline_markup() {
        let html = render("_Table 1: Totals_ and *this* with ![chart](dist_graph.svg) & [link](x.html)");

        assert_eq!(
            html,
            "<p><em>Table 1: Totals</em> and <em>this</em> with \
             <img alt=\"chart\" src=\"dist_graph.svg\" /> &amp; <a href=\"x.html\">link</a></p>"
        );
    }

    #[test]
    fn dollar_amounts_survive() {
        assert_eq!(render("by $5,790,000."), "<p>by $5,790,000.</p>");
    }

    #[test]
    fn pipe_table() {
        let html = render("| Bin | Value |\n|:----|------:|\n| $10K-20K | 1.00 |\n| All | 2.00 |\n\nafter");

        assert_eq!(
            html,
            "<table>\n<thead>\n<tr>\n\
             <th style=\"text-align: left;\">Bin</th>\n\
             <th style=\"text-align: right;\">Value</th>\n\
             </tr>\n</thead>\n<tbody>\n<tr>\n\
             <td style=\"text-align: left;\">$10K-20K</td>\n\
             <td style=\"text-align: right;\">1.00</td>\n\
             </tr>\n<tr>\n\
             <td style=\"text-align: left;\">All</td>\n\
             <td style=\"text-align: right;\">2.00</td>\n\
             </tr>\n</tbody>\n</table>\n<p>after</p>"
        );
    }

    #[test]
    fn pipe_without_rule_is_text() {
        assert_eq!(render("| not a table"), "<p>| not a table</p>");
    }

    #[test]
    fn document_embeds_css() {
        let doc = html_document("A & B", "<p>x</p>", "body { color: red; }");

        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>A &amp; B</title>"));
        assert!(doc.contains("<style>\nbody { color: red; }\n</style>"));
        assert!(doc.contains("<body>\n<p>x</p>\n</body>"));
    }
}
