use std::path::Path;

use crate::error::Result;
use crate::models::CommentRecord;

/// The classification instructions, read verbatim from disk.
pub fn load_prompt_template<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// A system + user message pair for one input file.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, comments: &[CommentRecord]) -> Self {
        Self {
            system: system.into(),
            user: format_transcript(comments),
        }
    }

    pub fn estimate_tokens(&self) -> usize {
        // Rough estimate: ~4 characters per token
        (self.system.len() + self.user.len()) / 4
    }
}

/// One block per comment, blocks separated by a blank line.
pub fn format_transcript(comments: &[CommentRecord]) -> String {
    comments
        .iter()
        .map(|c| {
            format!(
                "Comment by {}:\n{}\nVotes: {}\nHearted: {}\nHas replies: {}",
                c.author, c.text, c.votes, c.hearted, c.has_replies
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
