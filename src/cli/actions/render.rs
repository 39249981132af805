use crate::resource::{Resource, ResourceFlow};
use anyhow::{anyhow, Result};
use std::io::{self, IsTerminal, Write};

/// Drive `flow` to its terminal state.
///
/// `Loading` becomes a progress line on stderr when it is a terminal,
/// `Success` yields the data and `Error` becomes the command's error.
pub async fn follow<T: Send + 'static>(mut flow: ResourceFlow<T>, activity: &str) -> Result<T> {
    let interactive = io::stderr().is_terminal();

    while let Some(state) = flow.next().await {
        match state {
            Resource::Loading(_) => {
                if interactive {
                    let mut stderr = io::stderr().lock();
                    let _ = write!(stderr, "{activity}...\r");
                    let _ = stderr.flush();
                }
            }
            Resource::Success(data) => {
                clear_progress(interactive, activity);
                return Ok(data);
            }
            Resource::Error { message, .. } => {
                clear_progress(interactive, activity);
                return Err(anyhow!(message));
            }
        }
    }

    Err(anyhow!("{activity}: cancelled"))
}

fn clear_progress(interactive: bool, activity: &str) {
    if interactive {
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "{}\r", " ".repeat(activity.len() + 3));
        let _ = stderr.flush();
    }
}

/// `-` for absent optional text.
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

/// Cut `text` to at most `max` characters on a char boundary.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
