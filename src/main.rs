use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use ytc::analysis::{AnalysisSession, Analyzer};
use ytc::comment::CommentSnapshot;
use ytc::comment_selector::select_comment;
use ytc::config::Config;
use ytc::export::ExportFormat;
use ytc::fetch::{self, DEFAULT_MAX_PAGES};
use ytc::filter::{DateRange, FilterCriteria, LengthRange, TriState};
use ytc::renderer::{self, text};
use ytc::view::{SortOrder, ViewState};
use ytc::{logging, sentiment, stats_builder};

// Help text constants
const HELP_MAIN: &str = "\
ytc — YouTube comment explorer

Commands:
    fetch <url-or-id>    Download comments into a snapshot file.
    list                 Show a filtered, sorted page of comments.
    stats                Render the statistics report (Markdown).
    export               Export the filtered comments as CSV or JSON.
    analyze              Sentiment, toxicity, word and topic analysis of one comment.

Usage:
    ytc fetch https://youtu.be/dQw4w9WgXcQ --output comments.json
    ytc list --snapshot comments.json [filters]

More help:
    ytc --help filters";

const HELP_FILTERS: &str = "\
Filters (list, export)

Options:
    --author <text>          Keep threads whose author or reply authors contain <text>.
    --search <text>          Case-insensitive substring of the comment text.
    --from <YYYY-MM-DD>      Published on or after this day (UTC).
    --to <YYYY-MM-DD>        Published on or before this day (UTC).
    --min-length <n>         Minimum text length in characters.
    --max-length <n>         Maximum text length in characters.
    --min-likes <n>          Minimum like count.
    --links yes|no           Require or exclude links.
    --hashtags yes|no        Require or exclude hashtags.
    --mentions yes|no        Require or exclude @mentions.
    --tag <tag>              Require one of the tags (repeatable).
    --order newest|oldest    Sort order (default: newest).
    --page <n>               Page to show (list only, default: 1).
    --page-size <n>          Comments per page (default: YTC_PAGE_SIZE or 10).

Examples:
  ytc list --snapshot comments.json --search rust --min-likes 10 --order oldest
  ytc export --snapshot comments.json --format csv --tag '#question' --output exports";

#[derive(Parser)]
#[command(name = "ytc", disable_help_flag = true)]
#[command(about = "YouTube comment explorer", long_about = None)]
struct Cli {
    /// Directory for the log file (overrides YTC_LOG_DIR); logs go to stderr otherwise
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Show help (global or per topic). Example: ytc --help filters
    #[arg(long, value_name = "TOPIC", num_args = 0..=1, default_missing_value = "")]
    help: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch comments of a video and save them as a snapshot
    Fetch {
        /// Video URL or 11-character video id
        input: String,
        /// Snapshot file to write
        #[arg(short, long, default_value = "comments.json")]
        output: PathBuf,
        /// Number of comment pages (100 threads each) to fetch
        #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
        max_pages: usize,
    },
    /// Show a page of comments
    List {
        #[arg(long)]
        snapshot: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Render the statistics report
    Stats {
        #[arg(long)]
        snapshot: PathBuf,
        /// Output directory; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export the filtered comments
    Export {
        #[arg(long)]
        snapshot: PathBuf,
        /// csv or json
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        /// Output directory (defaults to current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Analyze a single comment
    Analyze {
        #[arg(long)]
        snapshot: PathBuf,
        /// Comment or reply id. If omitted, interactive selection.
        #[arg(long)]
        id: Option<String>,
        /// Analyze every top-level comment instead of a single one
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },
}

/// Author match, filter, sort and pagination flags shared by list and export.
#[derive(Args)]
struct ViewArgs {
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
    #[arg(long)]
    min_length: Option<usize>,
    #[arg(long)]
    max_length: Option<usize>,
    #[arg(long)]
    min_likes: Option<u64>,
    #[arg(long)]
    links: Option<TriState>,
    #[arg(long)]
    hashtags: Option<TriState>,
    #[arg(long)]
    mentions: Option<TriState>,
    #[arg(long = "tag")]
    tags: Vec<String>,
    #[arg(long, default_value = "newest")]
    order: SortOrder,
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long, value_parser = parse_page_size)]
    page_size: Option<usize>,
}

impl ViewArgs {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::default();
        criteria.date_range = DateRange::from_dates(self.from, self.to);
        criteria.length = LengthRange {
            min: self.min_length.unwrap_or(0),
            max: self.max_length,
        };
        criteria.min_likes = self.min_likes.unwrap_or(0);
        criteria.has_links = self.links.unwrap_or_default();
        criteria.has_hashtags = self.hashtags.unwrap_or_default();
        criteria.has_mentions = self.mentions.unwrap_or_default();
        criteria.search_text = self.search.clone().unwrap_or_default();
        for tag in &self.tags {
            criteria.add_tag(tag);
        }
        criteria
    }

    fn view_state(&self, config: &Config) -> ViewState {
        let mut state = ViewState::new(self.page_size.unwrap_or(config.page_size));
        state.set_author_filter(self.author.clone().unwrap_or_default());
        state.set_criteria(self.criteria());
        state.set_order(self.order);
        state.set_page(self.page);
        state
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(help_topic) = cli.help {
        let topic = help_topic.trim();
        if topic.is_empty() {
            println!("{}", HELP_MAIN);
        } else if topic.eq_ignore_ascii_case("filters") {
            println!("{}", HELP_FILTERS);
        } else {
            println!("Unknown help topic: {}", topic);
        }
        return Ok(());
    }

    let Some(command) = cli.command else {
        eprintln!("No command specified.");
        eprintln!("Example: ytc fetch https://youtu.be/dQw4w9WgXcQ");
        return Ok(());
    };

    let mut config = Config::from_env().context("Invalid configuration")?;
    if let Some(dir) = cli.log_dir {
        config.log_dir = Some(dir);
    }
    logging::init_logging(config.log_dir.as_deref(), command.label())?;

    match command {
        Commands::Fetch {
            input,
            output,
            max_pages,
        } => {
            let snapshot = tokio::runtime::Runtime::new()
                .context("Failed to create Tokio runtime")?
                .block_on(fetch::run(&config, &input, max_pages))?;
            snapshot.save_to_file(&output)?;
            eprintln!("Snapshot written to: {}", output.display());
        }
        Commands::List { snapshot, view } => {
            let snapshot = CommentSnapshot::load_from_file(&snapshot)?;
            let state = view.view_state(&config);
            let page = state.apply(&snapshot.comments);
            print!("{}", text::render_page(&page, state.order()));
        }
        Commands::Stats { snapshot, output } => {
            let snapshot = CommentSnapshot::load_from_file(&snapshot)?;
            let stats = stats_builder::aggregate(&snapshot.comments);
            let breakdown = sentiment::breakdown(&snapshot.comments);
            let markdown = renderer::md::render(&snapshot, &stats, &breakdown)?;

            match output {
                Some(dir) => {
                    let output_path =
                        write_output(&dir, renderer::md::REPORT_FILE_NAME, &markdown)?;
                    eprintln!("Markdown report written to: {}", output_path.display());
                }
                None => print!("{}", markdown),
            }
        }
        Commands::Export {
            snapshot,
            format,
            output,
            view,
        } => {
            let snapshot = CommentSnapshot::load_from_file(&snapshot)?;
            let visible = view.view_state(&config).visible(&snapshot.comments);
            let content = format.render(&visible)?;
            let dir = output.unwrap_or_else(|| PathBuf::from("."));
            let output_path = write_output(&dir, format.file_name(), &content)?;
            eprintln!(
                "Exported {} comments ({}) to: {}",
                visible.len(),
                format.mime_type(),
                output_path.display()
            );
        }
        Commands::Analyze { snapshot, id, all } => {
            let snapshot = CommentSnapshot::load_from_file(&snapshot)?;
            let analyzer = Analyzer::from_config(&config)?;
            let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;

            if all {
                let results = runtime.block_on(analyzer.analyze_many(&snapshot.comments));
                for (comment, (_, analysis)) in snapshot.comments.iter().zip(&results) {
                    println!("{}", text::render_analysis_line(comment, analysis));
                }
                return Ok(());
            }

            let comment = select_comment(&snapshot, id.as_deref())?;
            let mut session = AnalysisSession::new();
            let ticket = session.select(comment.id.clone());
            let analysis = runtime.block_on(analyzer.analyze(&comment.text));
            session.complete(&ticket, analysis);

            match session.current() {
                Some(analysis) => print!("{}", text::render_analysis(comment, analysis)),
                None => println!(
                    "No analysis available for comment {}",
                    session.selected().unwrap_or_default()
                ),
            }
        }
    }

    Ok(())
}

impl Commands {
    fn label(&self) -> &'static str {
        match self {
            Commands::Fetch { .. } => "fetch",
            Commands::List { .. } => "list",
            Commands::Stats { .. } => "stats",
            Commands::Export { .. } => "export",
            Commands::Analyze { .. } => "analyze",
        }
    }
}

fn parse_page_size(raw: &str) -> std::result::Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(format!("'{}' is not a positive integer", raw)),
    }
}

fn write_output(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let output_path = dir.join(file_name);
    std::fs::write(&output_path, content)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    Ok(output_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_must_be_positive() {
        let result = Cli::try_parse_from(["ytc", "list", "--snapshot", "c.json", "--page-size", "0"]);
        assert!(result.is_err());

        let cli =
            Cli::try_parse_from(["ytc", "list", "--snapshot", "c.json", "--page-size", "25"]).unwrap();
        match cli.command {
            Some(Commands::List { view, .. }) => assert_eq!(view.page_size, Some(25)),
            _ => panic!("expected list command"),
        }
    }
}
