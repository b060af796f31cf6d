use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use crate::repl::commands::COMMAND_NAMES;

#[derive(Default)]
pub struct ReplHelper;

impl Helper for ReplHelper {}
impl Validator for ReplHelper {}
impl Highlighter for ReplHelper {}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let trimmed = line.trim();
        if !trimmed.starts_with('/') || trimmed.contains(' ') {
            return None;
        }
        for name in COMMAND_NAMES {
            if name.starts_with(trimmed) && *name != trimmed {
                return Some(name[trimmed.len()..].to_string());
            }
        }
        None
    }
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let trimmed = prefix.trim_start();

        if !trimmed.starts_with('/') {
            return Ok((0, vec![]));
        }

        // Past the command name: complete its arguments
        if let Some(space_idx) = trimmed.find(' ') {
            let cmd = &trimmed[..space_idx];
            let arg_prefix = trimmed[space_idx..].trim_start();
            let arg_start = pos - arg_prefix.len();

            let candidates: &[&str] = match cmd {
                "/start" => &["link-finder", "article-scraper", "embeddings", "analysis", "full"],
                "/scrapers" => &["all", "none", "toggle"],
                "/config" => &["provider", "model", "temperature"],
                _ => &[],
            };

            let matches: Vec<Pair> = candidates
                .iter()
                .filter(|c| c.starts_with(arg_prefix))
                .map(|c| Pair {
                    display: c.to_string(),
                    replacement: c.to_string(),
                })
                .collect();

            return Ok((arg_start, matches));
        }

        // Complete command names
        let start = pos - trimmed.len();
        let matches: Vec<Pair> = COMMAND_NAMES
            .iter()
            .filter(|name| name.starts_with(trimmed))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();

        Ok((start, matches))
    }
}
