//! Operator-facing console output.
//!
//! Every line is stamped with the local time and a ` | ` separator, then a
//! bracketed, colour-coded message. Diagnostic detail goes through `log`
//! instead; this is what the operator watches.

use std::io::{BufRead, Write};

use colored::{ColoredString, Colorize};

use crate::time::now_stamp;

/// Severity of a console line; selects the colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Heading,
    Success,
    Warning,
    Failure,
}

/// Timestamped console writer.
#[derive(Debug, Clone, Default)]
pub struct Console {
    quiet: bool,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    /// A console that swallows every line. Used by tests and batch runs.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    /// Print `[ message ]` in the given tone.
    pub fn say(&self, tone: Tone, message: impl AsRef<str>) {
        self.line(&[paint(tone, &bracket(message.as_ref()))]);
    }

    /// Print several bracketed segments joined by the separator.
    pub fn segments(&self, parts: &[(Tone, &str)]) {
        let painted: Vec<ColoredString> = parts
            .iter()
            .map(|(tone, text)| paint(*tone, &bracket(text)))
            .collect();
        self.line(&painted);
    }

    pub fn success(&self, message: impl AsRef<str>) {
        self.say(Tone::Success, message);
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.say(Tone::Warning, message);
    }

    pub fn fail(&self, message: impl AsRef<str>) {
        self.say(Tone::Failure, message);
    }

    /// Print a numbered menu entry: `[ 1 ] | [ label ]`.
    pub fn menu_item(&self, index: usize, label: &str) {
        let index = index.to_string();
        self.segments(&[(Tone::Success, index.as_str()), (Tone::Heading, label)]);
    }

    /// Clear the terminal between passes.
    pub fn clear(&self) {
        if self.quiet {
            return;
        }
        print!("\x1B[2J\x1B[1;1H");
        let _ = std::io::stdout().flush();
    }

    /// Print a stamped prompt and read one trimmed line from stdin.
    pub fn prompt(&self, question: &str) -> std::io::Result<String> {
        print!(
            "{}{}{}{}",
            stamp(),
            separator(),
            bracket(question).yellow().bold(),
            separator()
        );
        std::io::stdout().flush()?;

        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().to_string())
    }

    fn line(&self, parts: &[ColoredString]) {
        if self.quiet {
            return;
        }
        let sep = separator().to_string();
        let body = parts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(sep.as_str());
        println!("{}{}{}", stamp(), separator(), body);
    }
}

fn bracket(text: &str) -> String {
    format!("[ {text} ]")
}

fn stamp() -> ColoredString {
    bracket(&now_stamp()).blue().bold()
}

fn separator() -> ColoredString {
    " | ".white().bold()
}

fn paint(tone: Tone, text: &str) -> ColoredString {
    match tone {
        Tone::Info => text.white().bold(),
        Tone::Heading => text.cyan().bold(),
        Tone::Success => text.green().bold(),
        Tone::Warning => text.yellow().bold(),
        Tone::Failure => text.red().bold(),
    }
}
