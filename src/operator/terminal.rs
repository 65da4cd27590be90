//! Line-based terminal operator.
//!
//! Input is read on a dedicated OS thread and handed over line by line, so an
//! unanswered prompt never holds the runtime open after Ctrl-C.

use async_trait::async_trait;
use std::io::{self, BufRead};
use std::thread;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

use crate::error::{BankError, BankResult};
use crate::operator::{is_decline, Operator};

/// Operator reading answers line by line and printing to stdout.
pub struct TerminalOperator {
    lines: mpsc::Receiver<io::Result<String>>,
    auto_confirm: bool,
}

impl TerminalOperator {
    /// Operator on the process's stdin. `auto_confirm` skips confirmation gates.
    pub fn stdin(auto_confirm: bool) -> Self {
        Self::from_reader(io::BufReader::new(io::stdin()), auto_confirm)
    }

    pub fn from_reader<R>(reader: R, auto_confirm: bool) -> Self
    where
        R: BufRead + Send + 'static,
    {
        Self {
            lines: spawn_reader(reader),
            auto_confirm,
        }
    }

    async fn read_answer(&mut self) -> BankResult<String> {
        match self.lines.recv().await {
            Some(Ok(line)) => Ok(line),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Reading operator input failed");
                Err(BankError::UserAbort)
            }
            // EOF: nobody is left to answer.
            None => Err(BankError::UserAbort),
        }
    }
}

/// Forward lines from `reader` until EOF, a read error, or the receiver is gone.
fn spawn_reader<R>(mut reader: R) -> mpsc::Receiver<io::Result<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);

    let spawned = thread::Builder::new()
        .name("operator-input".to_string())
        .spawn(move || loop {
            let mut line = String::new();
            let item = match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    let trimmed = line.trim_end_matches(['\n', '\r']).len();
                    line.truncate(trimmed);
                    Ok(line)
                }
                Err(e) => Err(e),
            };

            let failed = item.is_err();
            if tx.blocking_send(item).is_err() || failed {
                break;
            }
        });

    // Without the thread the sender is dropped and every read sees EOF.
    if let Err(e) = spawned {
        tracing::error!(error = %e, "Cannot start operator input thread");
    }

    rx
}

#[async_trait]
impl Operator for TerminalOperator {
    async fn ask(&mut self, question: &str) -> BankResult<String> {
        let mut out = tokio::io::stdout();
        // Prompt rendering is best effort; the answer is what matters.
        let _ = out.write_all(format!("{} ", question).as_bytes()).await;
        let _ = out.flush().await;
        self.read_answer().await
    }

    async fn confirm(&mut self, question: &str) -> BankResult<()> {
        if self.auto_confirm {
            tracing::debug!(question, "Confirmation skipped");
            return Ok(());
        }

        let answer = self.ask(question).await?;
        if is_decline(&answer) {
            return Err(BankError::UserAbort);
        }
        Ok(())
    }

    fn status(&mut self, line: &str) {
        println!("{}", line);
    }
}
