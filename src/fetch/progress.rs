/// Progress reporting for the fetch command.
///
/// Animated spinner on a TTY, plain lines on stderr otherwise.
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

use crate::renderer::text::truncate_middle;

/// Maximum width for the video title in progress messages.
const TITLE_WIDTH: usize = 40;

pub struct FetchProgress {
    spinner: Option<ProgressBar>,
    title: String,
}

impl FetchProgress {
    pub fn new(video_id: &str) -> Self {
        let spinner = if std::io::stderr().is_terminal() {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.green} {msg}")
            {
                pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
            }
            pb.set_message(format!("Fetching video {}", video_id));
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        Self {
            spinner,
            title: video_id.to_string(),
        }
    }

    /// Replaces the video id with its title once metadata is known.
    pub fn set_title(&mut self, title: &str) {
        self.title = truncate_middle(title, TITLE_WIDTH);
        if let Some(ref pb) = self.spinner {
            pb.set_message(format!("{} …", self.title));
        }
    }

    pub fn page_done(&self, pages: usize, comments: usize) {
        let msg = format_page_progress(&self.title, pages, comments);
        match self.spinner {
            Some(ref pb) => pb.set_message(msg),
            None => eprintln!("{}", msg),
        }
    }

    pub fn finish(&self) {
        if let Some(ref pb) = self.spinner {
            pb.finish_and_clear();
        }
    }
}

/// Single-line progress message.
///
/// Example: `Rust in 100 Seconds   page 2, 200 threads`
pub fn format_page_progress(title: &str, pages: usize, comments: usize) -> String {
    format!(
        "{}  page {}, {} thread{}",
        title,
        pages,
        comments,
        if comments == 1 { "" } else { "s" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_creation() {
        let progress = FetchProgress::new("dQw4w9WgXcQ");
        assert_eq!(progress.spinner.is_some(), std::io::stderr().is_terminal());
        progress.page_done(1, 100);
        progress.finish();
    }

    #[test]
    fn test_set_title_truncates() {
        let mut progress = FetchProgress::new("dQw4w9WgXcQ");
        progress.set_title(&"A very long video title ".repeat(5));
        assert_eq!(progress.title.chars().count(), TITLE_WIDTH);
        assert!(progress.title.contains('…'));
        progress.finish();
    }

    #[test]
    fn test_format_page_progress() {
        assert_eq!(format_page_progress("Talk", 1, 1), "Talk  page 1, 1 thread");
        assert_eq!(format_page_progress("Talk", 3, 250), "Talk  page 3, 250 threads");
    }
}
