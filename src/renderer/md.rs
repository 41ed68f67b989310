use crate::comment::CommentSnapshot;
use crate::sentiment::SentimentBreakdown;
use crate::stats::*;
use crate::timefmt::format_date_opt;
use anyhow::Result;

use super::{format_count_str, format_number};

/// Default file name of the Markdown report.
pub const REPORT_FILE_NAME: &str = "youtube-comments-stats.md";

/// Render the statistics report for a snapshot to Markdown.
pub fn render(
    snapshot: &CommentSnapshot,
    stats: &StatsSnapshot,
    sentiment: &SentimentBreakdown,
) -> Result<String> {
    let mut output = String::new();

    // 1. Title and video details
    render_header(&mut output, snapshot);

    // 2. Summary
    render_summary(&mut output, &stats.summary);

    // 3. Sentiment
    render_sentiment(&mut output, sentiment);

    // 4. Top commenters
    render_top_commenters(&mut output, &stats.top_commenters);

    // 5. Activity
    render_activity(&mut output, &stats.activity);

    // 6. Length and reply chains
    render_length_distribution(&mut output, stats);
    render_reply_chains(&mut output, stats);

    Ok(output)
}

fn render_header(output: &mut String, snapshot: &CommentSnapshot) {
    let video = &snapshot.video_info;
    match video.title {
        Some(ref title) => output.push_str(&format!("# 💬 Comment report — {}\n", title)),
        None => output.push_str("# 💬 Comment report\n"),
    }

    output.push_str("### 🎬 Video\n");
    if let Some(ref channel) = video.channel_title {
        output.push_str(&format!("- **Channel:** {}\n", channel));
    }
    if video.published_at.is_some() {
        output.push_str(&format!(
            "- **Published:** {}\n",
            format_date_opt(video.published_at.as_deref())
        ));
    }
    if let Some(ref views) = video.view_count {
        output.push_str(&format!("- 👀 **Views:** {}\n", format_count_str(views)));
    }
    if let Some(ref likes) = video.like_count {
        output.push_str(&format!("- 👍 **Likes:** {}\n", format_count_str(likes)));
    }
    if let Some(ref thumbnail) = video.thumbnail_url {
        output.push_str(&format!("- **Thumbnail:** [{}]({})\n", thumbnail, thumbnail));
    }
    output.push_str(&format!(
        "- **Comments fetched:** {} of {}\n",
        format_number(snapshot.fetched_comments),
        format_number(snapshot.total_comments)
    ));
    output.push('\n');
}

fn render_summary(output: &mut String, summary: &Summary) {
    output.push_str("### 📊 Summary\n");
    output.push_str("#### Total engagement\n");
    output.push_str(&format!(
        "- 💬 **Comments:** {}\n",
        format_number(summary.total_comments)
    ));
    output.push_str(&format!(
        "- 👍 **Likes:** {}\n",
        format_number(summary.total_likes)
    ));
    output.push_str(&format!(
        "- ↩️ **Replies:** {}\n",
        format_number(summary.total_replies)
    ));
    output.push_str("\n#### Averages\n");
    output.push_str(&format!(
        "- **Likes per comment:** {:.1}\n",
        summary.average_likes
    ));
    output.push_str(&format!(
        "- **Replies per comment:** {:.1}\n",
        summary.average_replies
    ));
    output.push('\n');
}

fn render_sentiment(output: &mut String, sentiment: &SentimentBreakdown) {
    output.push_str("### 😊 Sentiment\n");
    if sentiment.total() == 0 {
        output.push_str("No comments to analyze.\n\n");
        return;
    }

    let label = sentiment.overall_label();
    output.push_str(&format!(
        "Overall: {} **{:?}** (score {:.2})\n\n",
        label.emoji(),
        label,
        sentiment.overall_score
    ));

    output.push_str("| Sentiment | Comments | % of total |\n");
    output.push_str("| --------- | -------- | ---------- |\n");
    for (name, count) in [
        ("Positive", sentiment.positive),
        ("Neutral", sentiment.neutral),
        ("Negative", sentiment.negative),
    ] {
        output.push_str(&format!(
            "| {} | {} | {:.1} |\n",
            name,
            format_number(count as u64),
            sentiment.percent(count)
        ));
    }
    output.push('\n');
}

fn render_top_commenters(output: &mut String, top: &[AuthorEntry]) {
    if top.is_empty() {
        return;
    }

    output.push_str("### 🏆 Top commenters\n");
    output.push_str("| Rank | Author | Comments |\n");
    output.push_str("| ---- | ------ | -------- |\n");
    for (i, entry) in top.iter().enumerate() {
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            i + 1,
            escape_cell(&entry.author),
            format_number(entry.count)
        ));
    }
    output.push('\n');
}

fn render_activity(output: &mut String, activity: &Activity) {
    output.push_str("### 📈 Activity\n");

    if !activity.by_date.is_empty() {
        output.push_str("#### 📅 Over time\n");
        output.push_str("| Date | Comments |\n");
        output.push_str("| ---- | -------- |\n");
        for (date, count) in &activity.by_date {
            output.push_str(&format!("| {} | {} |\n", date, format_number(*count)));
        }
        output.push('\n');
    }

    // By hour - horizontal display in 2 tables (00-11 and 12-23)
    output.push_str("#### 🕐 By hour (local time)\n");

    output.push_str("| 00 | 01 | 02 | 03 | 04 | 05 | 06 | 07 | 08 | 09 | 10 | 11 |\n");
    output.push_str("| -- | -- | -- | -- | -- | -- | -- | -- | -- | -- | -- | -- |\n");
    output.push('|');
    for hour in 0..12 {
        let count = activity.by_hour.get(&hour).copied().unwrap_or(0);
        output.push_str(&format!(" {} |", format_number(count)));
    }
    output.push('\n');

    output.push_str("\n| 12 | 13 | 14 | 15 | 16 | 17 | 18 | 19 | 20 | 21 | 22 | 23 |\n");
    output.push_str("| -- | -- | -- | -- | -- | -- | -- | -- | -- | -- | -- | -- |\n");
    output.push('|');
    for hour in 12..24 {
        let count = activity.by_hour.get(&hour).copied().unwrap_or(0);
        output.push_str(&format!(" {} |", format_number(count)));
    }
    output.push_str("\n\n");
}

fn render_length_distribution(output: &mut String, stats: &StatsSnapshot) {
    output.push_str("### 📝 Comment length (characters)\n");
    output.push_str("| 0-50 | 51-100 | 101-200 | 201-500 | 500+ |\n");
    output.push_str("| ---- | ------ | ------- | ------- | ---- |\n");
    output.push('|');
    for bucket in LengthBucket::ALL {
        let count = stats
            .length_distribution
            .get(&bucket)
            .copied()
            .unwrap_or(0);
        output.push_str(&format!(" {} |", format_number(count)));
    }
    output.push_str("\n\n");
}

fn render_reply_chains(output: &mut String, stats: &StatsSnapshot) {
    if stats.reply_chain_lengths.is_empty() {
        return;
    }

    output.push_str("### 🧵 Reply chains\n");
    output.push_str("| Fetched replies | Threads |\n");
    output.push_str("| --------------- | ------- |\n");
    for (length, threads) in &stats.reply_chain_lengths {
        output.push_str(&format!(
            "| {} | {} |\n",
            reply_chain_label(*length),
            format_number(*threads)
        ));
    }
    output.push('\n');
}

fn reply_chain_label(length: usize) -> String {
    match length {
        0 => "No replies".to_string(),
        1 => "1 reply".to_string(),
        n => format!("{} replies", n),
    }
}

/// Keep author names from breaking the table layout.
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
