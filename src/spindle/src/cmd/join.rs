use clap::Args;
use spindle_utils::strings::{str_join, str_join_ex};

use super::Command;

const LIST: [&str; 3] = [", ", ", ", ", and "];

/// Subcommand for joining words into a single line.
#[derive(Debug, Args)]
pub struct Join {
    /// The separator to put between words.
    #[clap(short, long, default_value = " ")]
    sep: String,

    /// Joins the words as an enumeration, like `a, b, and c`.
    #[clap(long, conflicts_with = "sep")]
    oxford: bool,

    /// The words to join.
    words: Vec<String>,
}

impl Command for Join {
    fn handle(self) -> eyre::Result<()> {
        let line = if self.oxford {
            str_join_ex(LIST, &self.words)
        } else {
            str_join(&self.sep, &self.words)
        };

        println!("{line}");
        Ok(())
    }
}
