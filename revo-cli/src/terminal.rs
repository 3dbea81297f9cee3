//! Line-based prompts on stdin/stdout.
//!
//! Stdin is wrapped once and shared, so prompts issued by the gateway and by
//! the booking command never lose buffered input to each other.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

pub struct Terminal {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl Terminal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        })
    }

    /// Print `question` and read one trimmed line. `None` on end of input.
    pub async fn prompt(&self, question: &str) -> std::io::Result<Option<String>> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(question.as_bytes()).await?;
        stdout.flush().await?;

        let mut lines = self.lines.lock().await;
        Ok(lines.next_line().await?.map(|line| line.trim().to_owned()))
    }

    /// Yes/no question, defaulting to no.
    pub async fn confirm(&self, question: &str) -> std::io::Result<bool> {
        let answer = self.prompt(question).await?;
        Ok(matches!(
            answer.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y" | "yes")
        ))
    }
}
