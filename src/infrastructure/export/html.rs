//! Manuscript Export - 可打印 HTML 书稿
//!
//! 将 Book 渲染为独立的 HTML 文档：扉页 + 逐章正文。
//! PDF 化交给浏览器打印对话框或外部转换器，这里只产出打印面。
//!
//! 正文按换行拆段，并清理生成文本里常见的 markdown 残留（* 和 #）。

use crate::domain::book::{Book, Chapter};

/// 清理生成正文中的 markdown 残留
pub fn clean_content(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '*' && *c != '#')
        .collect::<String>()
        .trim()
        .to_string()
}

/// HTML 转义（文本节点）
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// 导出文件名：标题空白折叠为下划线 + .html
pub fn html_filename(book: &Book) -> String {
    format!(
        "{}.html",
        book.title.split_whitespace().collect::<Vec<_>>().join("_")
    )
}

fn render_chapter(chapter: &Chapter, out: &mut String) {
    out.push_str(&format!(
        "<section id=\"chapter-{}\">\n<h2>Chapter {}</h2>\n<h3>{}</h3>\n",
        chapter.id,
        chapter.id,
        escape(&chapter.title)
    ));
    for paragraph in clean_content(&chapter.content).split('\n') {
        let paragraph = paragraph.trim();
        if !paragraph.is_empty() {
            out.push_str(&format!("<p>{}</p>\n", escape(paragraph)));
        }
    }
    out.push_str("</section>\n");
}

/// 渲染完整书稿
pub fn render_manuscript(book: &Book) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", escape(&book.title)));
    out.push_str(
        "<style>\n\
         body { font-family: Georgia, serif; max-width: 42em; margin: 0 auto; padding: 2em; }\n\
         section { page-break-before: always; }\n\
         h1, h2, h3 { text-align: center; }\n\
         p { line-height: 1.8; text-align: justify; }\n\
         .cover img { display: block; margin: 0 auto; max-width: 60%; }\n\
         </style>\n</head>\n<body>\n",
    );

    // 扉页
    out.push_str(&format!(
        "<div class=\"cover\">\n<img src=\"{}\" alt=\"{}\">\n<h1>{}</h1>\n\
         <p class=\"byline\">{}</p>\n<p class=\"genre\">{}</p>\n\
         <p class=\"description\">{}</p>\n</div>\n",
        escape(&book.cover_image_url),
        escape(&book.title),
        escape(&book.title),
        escape(&book.author),
        escape(&book.genre),
        escape(&book.description)
    ));

    for chapter in &book.chapters {
        render_chapter(chapter, &mut out);
    }

    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{Author, ChapterStub, Outline, Title};

    fn sample_book() -> Book {
        Book::assemble(
            &Title::new("The Glass Orchard").unwrap(),
            &Author::new("A. Reyes"),
            Outline {
                title: Some("The Glass Orchard".to_string()),
                genre: Some("Mystery".to_string()),
                description: Some("A town & its secrets.".to_string()),
                chapters: vec![
                    ChapterStub {
                        id: 1,
                        title: "Arrival <late>".to_string(),
                        summary: "s".to_string(),
                    },
                    ChapterStub {
                        id: 2,
                        title: "Departure".to_string(),
                        summary: "s".to_string(),
                    },
                ],
            },
            vec![
                "## First line\n\nSecond *paragraph*.".to_string(),
                "Single paragraph.".to_string(),
            ],
            "https://covers.invalid/x.png".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_clean_content_strips_markdown_residue() {
        assert_eq!(clean_content("## Title **bold**"), "Title bold");
        assert_eq!(clean_content("  plain  "), "plain");
    }

    #[test]
    fn test_manuscript_contains_all_chapters_in_order() {
        let html = render_manuscript(&sample_book());
        let first = html.find("chapter-1").unwrap();
        let second = html.find("chapter-2").unwrap();
        assert!(first < second);
        assert!(html.contains("<p>First line</p>"));
        assert!(html.contains("<p>Second paragraph.</p>"));
    }

    #[test]
    fn test_manuscript_escapes_html() {
        let html = render_manuscript(&sample_book());
        assert!(html.contains("Arrival &lt;late&gt;"));
        assert!(html.contains("A town &amp; its secrets."));
        assert!(!html.contains("<late>"));
    }

    #[test]
    fn test_html_filename() {
        assert_eq!(html_filename(&sample_book()), "The_Glass_Orchard.html");
    }
}
