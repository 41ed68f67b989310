use anyhow::{bail, Result};
use std::io::IsTerminal;

use crate::comment::{Comment, CommentSnapshot};
use crate::renderer::text::comment_choice_label;

/// Number of rows shown at once by the interactive list.
const SELECT_PAGE_SIZE: usize = 15;

/// Resolve the comment to analyze.
///
/// Behavior:
/// - If `id_flag` is Some, returns that comment or reply (no UI)
/// - If the snapshot holds a single top-level comment, returns it (no UI)
/// - Otherwise shows a single-select list of top-level comments, which needs a TTY
pub fn select_comment<'a>(
    snapshot: &'a CommentSnapshot,
    id_flag: Option<&str>,
) -> Result<&'a Comment> {
    if let Some(id) = id_flag {
        return match snapshot.find(id) {
            Some(comment) => Ok(comment),
            None => bail!("Comment not found: {}", id),
        };
    }

    match snapshot.comments.as_slice() {
        [] => bail!("The snapshot contains no comments"),
        [only] => Ok(only),
        comments => {
            if !std::io::stdin().is_terminal() {
                bail!("Several comments available; pass --id to pick one");
            }
            prompt_for_comment(comments)
        }
    }
}

fn prompt_for_comment(comments: &[Comment]) -> Result<&Comment> {
    let labels: Vec<String> = comments.iter().map(comment_choice_label).collect();
    let choice = inquire::Select::new("Select a comment to analyze:", labels)
        .with_page_size(SELECT_PAGE_SIZE)
        .raw_prompt()?;
    Ok(&comments[choice.index])
}
