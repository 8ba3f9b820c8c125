//! Line-based interactive prompts.

use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};
use bikeshare_stats::filters::{City, MonthFilter, WeekdayFilter};
use tracing::debug;

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Prints `question` and reads one line. `None` once input is exhausted.
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        writeln!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Asks until `parse` accepts the answer.
    fn ask_until<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> bikeshare_stats::error::Result<T>,
    ) -> Result<T> {
        loop {
            let Some(answer) = self.ask(question)? else {
                bail!("input closed before a valid answer was given");
            };
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    debug!(error = %e, "Rejected input");
                    writeln!(self.output, "{e}. Please try again.")?;
                }
            }
        }
    }

    pub fn city(&mut self) -> Result<City> {
        self.ask_until(
            "Enter a city name (Chicago, New York City or Washington):",
            |s| s.parse::<City>(),
        )
    }

    pub fn month(&mut self) -> Result<MonthFilter> {
        self.ask_until(
            "Enter a month name (January(1), February(2), March(3), April(4), May(5), June(6) or All(0 / n)):",
            MonthFilter::parse,
        )
    }

    pub fn weekday(&mut self) -> Result<WeekdayFilter> {
        self.ask_until(
            "Enter a day of week (Monday (mon), Tuesday (tue), Wednesday (wed), Thursday (th), Friday (fri), Saturday (sat), Sunday (sun) or All (n)):",
            WeekdayFilter::parse,
        )
    }

    /// True when the answer starts with `y` or `Y`.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(question)?.unwrap_or_default();
        Ok(answer.trim_start().to_lowercase().starts_with('y'))
    }

    /// True when the user just pressed enter.
    pub fn more(&mut self, question: &str) -> Result<bool> {
        Ok(self.ask(question)?.is_some_and(|a| a.is_empty()))
    }
}
