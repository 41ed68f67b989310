/// Plain-text rendering for the terminal: comment pages, the pager line and
/// single-comment analysis.
use indexmap::IndexMap;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::analysis::CommentAnalysis;
use crate::comment::Comment;
use crate::timefmt::format_published;
use crate::view::{page_window, Page, SortOrder};

/// Display width of the author column.
const AUTHOR_WIDTH: usize = 24;
/// Display width of comment previews in selection lists.
const PREVIEW_WIDTH: usize = 60;
/// Number of words shown in the "Top words" line.
const TOP_WORDS: usize = 5;

/// Truncates a string to a maximum display width with a middle ellipsis.
/// Preserves the start and end of the string.
///
/// Width is measured in terminal columns, so wide characters (CJK, most
/// emoji) count as two.
///
/// # Examples
/// - "Short name" (limit 20) → "Short name" (unchanged)
/// - "Very long author name that exceeds" (limit 20) → "Very long …t exceeds"
pub fn truncate_middle(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let available = max_width - 1;
    let start = take_width(s.chars(), available.div_ceil(2));
    let mut end: Vec<char> = take_width(s.chars().rev(), available / 2).chars().collect();
    end.reverse();
    format!("{}…{}", start, end.into_iter().collect::<String>())
}

fn take_width(chars: impl Iterator<Item = char>, budget: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in chars {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

/// Pads `s` with spaces to `width` display columns.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(pad))
}

fn author_cell(name: &str) -> String {
    pad_to_width(&truncate_middle(name, AUTHOR_WIDTH), AUTHOR_WIDTH)
}

fn render_comment(output: &mut String, comment: &Comment) {
    output.push_str(&format!(
        "{}  {}  👍 {}  ↩ {}  [{}]\n",
        format_published(&comment.published_at),
        author_cell(&comment.author_name),
        comment.like_count,
        comment.reply_count,
        comment.id
    ));
    for line in comment.text.lines() {
        output.push_str(&format!("    {}\n", line));
    }

    for reply in &comment.replies {
        output.push_str(&format!(
            "    ↳ {}  {}  👍 {}\n",
            format_published(&reply.published_at),
            truncate_middle(&reply.author_name, AUTHOR_WIDTH),
            reply.like_count
        ));
        for line in reply.text.lines() {
            output.push_str(&format!("        {}\n", line));
        }
    }
    output.push('\n');
}

/// Renders one page of comments followed by the pager.
pub fn render_page(page: &Page, order: SortOrder) -> String {
    let mut output = String::new();

    if page.total_items == 0 {
        output.push_str("No comments match the current filters.\n");
        return output;
    }

    output.push_str(&format!(
        "Showing page {} of {} ({} comments, {})\n\n",
        page.number, page.page_count, page.total_items, order
    ));

    if page.items.is_empty() {
        output.push_str("(this page is empty)\n\n");
    }
    for comment in &page.items {
        render_comment(&mut output, comment);
    }

    let pager = render_pager(page.number, page.page_count);
    if !pager.is_empty() {
        output.push_str(&pager);
        output.push('\n');
    }
    output
}

/// Pager line: previous/next markers around the visible page numbers, the
/// current page in brackets.
///
/// Example: `‹ 1 2 [3] 4 5 ›`
pub fn render_pager(current: usize, total: usize) -> String {
    if total <= 1 {
        return String::new();
    }

    let mut parts = Vec::new();
    if current > 1 {
        parts.push("‹".to_string());
    }
    for page in page_window(current, total) {
        if page == current {
            parts.push(format!("[{}]", page));
        } else {
            parts.push(page.to_string());
        }
    }
    if current < total {
        parts.push("›".to_string());
    }
    parts.join(" ")
}

/// One-line label for interactive comment selection.
pub fn comment_choice_label(comment: &Comment) -> String {
    let preview = comment.text.replace('\n', " ");
    format!(
        "{}: {}",
        truncate_middle(&comment.author_name, AUTHOR_WIDTH),
        truncate_middle(&preview, PREVIEW_WIDTH)
    )
}

/// Most frequent words; ties keep first-occurrence order.
pub fn top_words(frequency: &IndexMap<String, usize>, n: usize) -> Vec<(&str, usize)> {
    let mut words: Vec<_> = frequency.iter().map(|(w, c)| (w.as_str(), *c)).collect();
    words.sort_by(|a, b| b.1.cmp(&a.1));
    words.truncate(n);
    words
}

fn sentiment_emoji(score: i32) -> &'static str {
    if score > 0 {
        "😊"
    } else if score < 0 {
        "😞"
    } else {
        "😐"
    }
}

/// Renders the analysis of a single comment.
pub fn render_analysis(comment: &Comment, analysis: &CommentAnalysis) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Analysis of comment {} by {}\n\n",
        comment.id, comment.author_name
    ));

    let sentiment = &analysis.sentiment;
    output.push_str(&format!(
        "Sentiment: {} score {} (comparative {:.2})\n",
        sentiment_emoji(sentiment.score),
        sentiment.score,
        sentiment.comparative
    ));
    if !sentiment.positive_words.is_empty() {
        output.push_str(&format!(
            "  Positive words: {}\n",
            sentiment.positive_words.join(", ")
        ));
    }
    if !sentiment.negative_words.is_empty() {
        output.push_str(&format!(
            "  Negative words: {}\n",
            sentiment.negative_words.join(", ")
        ));
    }

    match analysis.toxicity {
        Some(ref flags) => {
            output.push_str("\nContent warnings:\n");
            for (label, flagged) in flags.entries() {
                output.push_str(&format!(
                    "  {}: {}\n",
                    label,
                    if flagged { "⚠️" } else { "✅" }
                ));
            }
        }
        None => output.push_str("\nContent warnings: unavailable\n"),
    }

    let words = top_words(&analysis.word_frequency, TOP_WORDS);
    if !words.is_empty() {
        let listed: Vec<String> = words
            .iter()
            .map(|(word, count)| format!("{} ({})", word, count))
            .collect();
        output.push_str(&format!("\nTop words: {}\n", listed.join(", ")));
    }

    if !analysis.topics.is_empty() {
        output.push_str(&format!("Topics: {}\n", analysis.topics.join(" ")));
    }

    output
}

/// Compact one-line analysis used when analyzing many comments.
///
/// Example: `[Ugz3k] Alice  😊 +4  ⚠️ toxic, insult  #rust #cli`
pub fn render_analysis_line(comment: &Comment, analysis: &CommentAnalysis) -> String {
    let score = analysis.sentiment.score;
    let mut line = format!(
        "[{}] {}  {} {:+}",
        comment.id,
        author_cell(&comment.author_name),
        sentiment_emoji(score),
        score
    );

    match analysis.toxicity {
        Some(ref flags) if flags.any() => {
            let flagged: Vec<String> = flags
                .entries()
                .iter()
                .filter(|(_, flagged)| *flagged)
                .map(|(label, _)| label.to_lowercase())
                .collect();
            line.push_str(&format!("  ⚠️ {}", flagged.join(", ")));
        }
        Some(_) => {}
        None => line.push_str("  (toxicity n/a)"),
    }

    if !analysis.topics.is_empty() {
        line.push_str(&format!("  {}", analysis.topics.join(" ")));
    }
    line
}
