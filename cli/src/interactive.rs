// SPDX-FileCopyrightText: 2024 Panthyr contributors
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::common::{format_error, EmitOpts};
use crate::outputs;
use crate::status;
use anyhow::{anyhow, bail, Result};
use panthyr_gpio::line::Line;
use panthyr_gpio::{parse_outputs, Bank};
use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::history::FileHistory;
use rustyline_derive::{Helper, Highlighter, Hinter, Validator};

const COMMANDS: [&str; 5] = ["exit", "help", "off", "on", "status"];

/// Switch outputs on the claimed bank until the user exits.
pub fn run<L: Line>(bank: &mut Bank<L>, emit: &EmitOpts) -> Result<()> {
    let mut editor = Editor::new(bank.len(), "panthyr-gpio> ")?;
    println!("Type exit or press CTRL+C to release the outputs and exit...");
    loop {
        let line = editor.next_line()?;
        let mut words = line.split_ascii_whitespace();
        let res = match words.next() {
            None => continue,
            Some("exit") => return Ok(()),
            Some("on") => do_set(bank, words, true),
            Some("off") => do_set(bank, words, false),
            Some("status") => do_status(bank, emit),
            Some("help") => {
                print_help();
                Ok(())
            }
            Some(x) => Err(anyhow!("unknown command: '{x}'")),
        };
        if let Err(e) = res {
            println!("{}", format_error(&e));
        }
    }
}

fn do_set<'a, L, I>(bank: &mut Bank<L>, words: I, high: bool) -> Result<()>
where
    L: Line,
    I: Iterator<Item = &'a str>,
{
    let (numbers, errs) = parse_outputs(words);
    for e in errs {
        println!("{e}");
    }
    if numbers.is_empty() {
        bail!("no outputs specified");
    }
    let mut errors = Vec::new();
    outputs::set(bank, &numbers, high, &mut errors);
    for e in errors {
        println!("{}", format_error(&e));
    }
    Ok(())
}

fn do_status<L: Line>(bank: &mut Bank<L>, emit: &EmitOpts) -> Result<()> {
    let mut errors = Vec::new();
    let values = status::read(bank, &mut errors);
    status::print_table(&values, emit.numeric);
    for e in errors {
        println!("{}", format_error(&e));
    }
    Ok(())
}

fn print_help() {
    const HELP: &str = "COMMANDS:

    on <output>...
            Set the outputs high.
            e.g. on 1 3,4

    off <output>...
            Set the outputs low.
            e.g. off 2

    status
            Display the value of every output.

    help
            Print this help.

    exit
            Release the outputs and exit.
";
    println!("{HELP}");
}

struct Editor {
    rl: rustyline::Editor<InteractiveHelper, FileHistory>,
    prompt: String,
}

impl Editor {
    fn new(num_outputs: usize, prompt: &str) -> Result<Editor> {
        let helper = InteractiveHelper {
            outputs: (1..=num_outputs).map(|n| n.to_string()).collect(),
        };
        let config = rustyline::Config::builder()
            .completion_type(CompletionType::List)
            .auto_add_history(true)
            .max_history_size(20)?
            .history_ignore_space(true)
            .build();
        let mut rl = rustyline::Editor::with_config(config)?;
        rl.set_helper(Some(helper));
        Ok(Editor {
            rl,
            prompt: prompt.to_string(),
        })
    }

    fn next_line(&mut self) -> Result<String> {
        line_or_exit(self.rl.readline(self.prompt.as_str()))
    }
}

// CTRL+C and CTRL+D end the session
fn line_or_exit(res: rustyline::Result<String>) -> Result<String> {
    match res {
        Ok(line) => Ok(line),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok("exit".to_string()),
        Err(e) => Err(anyhow!(e)),
    }
}

#[derive(Helper, Validator, Hinter, Highlighter)]
struct InteractiveHelper {
    outputs: Vec<String>,
}

impl InteractiveHelper {
    // complete the output numbers following an on or off command
    fn complete_outputs(&self, pos: usize, args: &str) -> (usize, Vec<Pair>) {
        let partial = !args.is_empty() && !args.ends_with([' ', ',']);
        let (selected, part) = match args.rfind([' ', ',']) {
            Some(idx) if partial => (&args[..idx], &args[idx + 1..]),
            Some(_) => (args, ""),
            None if partial => ("", args),
            None => ("", ""),
        };
        let selected: Vec<&str> = selected.split([' ', ',']).collect();
        let candidates = self
            .outputs
            .iter()
            .filter(|n| !selected.contains(&n.as_str()) && n.starts_with(part))
            .map(|n| base_pair(n))
            .collect();
        (pos - part.len(), candidates)
    }
}

impl Completer for InteractiveHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let cmd_pos = line.len() - line.trim_start().len();
        if pos < cmd_pos {
            // cursor within the leading whitespace
            return Ok((pos, vec![]));
        }
        let line = &line[cmd_pos..pos];
        Ok(match line.split_once(' ') {
            None => {
                let candidates = COMMANDS
                    .iter()
                    .filter(|c| c.starts_with(line))
                    .map(|c| base_pair(c))
                    .collect();
                (cmd_pos, candidates)
            }
            Some(("on", args)) | Some(("off", args)) => {
                self.complete_outputs(pos, args.trim_start())
            }
            Some(_) => (pos, vec![]),
        })
    }
}

// a pair that ends a word
fn base_pair(candidate: &str) -> Pair {
    let display = String::from(candidate);
    let mut replacement = display.clone();
    replacement.push(' ');
    Pair {
        display,
        replacement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper() -> InteractiveHelper {
        InteractiveHelper {
            outputs: (1..=6).map(|n| n.to_string()).collect(),
        }
    }

    fn displays(candidates: &[Pair]) -> Vec<&str> {
        candidates.iter().map(|p| p.display.as_str()).collect()
    }

    mod complete_outputs {
        use super::*;

        #[test]
        fn none_selected() {
            let (pos, candidates) = helper().complete_outputs(3, "");
            assert_eq!(pos, 3);
            assert_eq!(displays(&candidates), vec!["1", "2", "3", "4", "5", "6"]);
        }

        #[test]
        fn some_selected() {
            let (pos, candidates) = helper().complete_outputs(9, "2 5,");
            assert_eq!(pos, 9);
            assert_eq!(displays(&candidates), vec!["1", "3", "4", "6"]);
        }

        #[test]
        fn partial() {
            let (pos, candidates) = helper().complete_outputs(6, "1 4");
            assert_eq!(pos, 5);
            assert_eq!(displays(&candidates), vec!["4"]);
            assert_eq!(candidates[0].replacement, "4 ");
        }

        #[test]
        fn partial_selected() {
            let (_, candidates) = helper().complete_outputs(6, "4,4");
            assert!(candidates.is_empty());
        }

        #[test]
        fn no_match() {
            let (_, candidates) = helper().complete_outputs(4, "9");
            assert!(candidates.is_empty());
        }
    }

    mod complete {
        use super::*;
        use rustyline::history::DefaultHistory;

        fn complete(line: &str, pos: usize) -> (usize, Vec<Pair>) {
            let history = DefaultHistory::new();
            let ctx = rustyline::Context::new(&history);
            helper().complete(line, pos, &ctx).unwrap()
        }

        #[test]
        fn commands() {
            let (pos, candidates) = complete("", 0);
            assert_eq!(pos, 0);
            assert_eq!(displays(&candidates), COMMANDS.to_vec());

            let (pos, candidates) = complete("  o", 3);
            assert_eq!(pos, 2);
            assert_eq!(displays(&candidates), vec!["off", "on"]);
        }

        #[test]
        fn outputs() {
            let (pos, candidates) = complete("on 1 ", 5);
            assert_eq!(pos, 5);
            assert_eq!(displays(&candidates), vec!["2", "3", "4", "5", "6"]);
        }

        #[test]
        fn cursor_in_leading_whitespace() {
            for pos in 0..2 {
                let (p, candidates) = complete("  on 1", pos);
                assert_eq!(p, pos);
                assert!(candidates.is_empty());
            }
        }

        #[test]
        fn no_arguments() {
            let (_, candidates) = complete("status ", 7);
            assert!(candidates.is_empty());
        }
    }

    mod line_or_exit {
        use super::*;

        #[test]
        fn line() {
            assert_eq!(line_or_exit(Ok("on 1".to_string())).unwrap(), "on 1");
        }

        #[test]
        fn interrupted() {
            assert_eq!(
                line_or_exit(Err(ReadlineError::Interrupted)).unwrap(),
                "exit"
            );
        }

        #[test]
        fn eof() {
            assert_eq!(line_or_exit(Err(ReadlineError::Eof)).unwrap(), "exit");
        }
    }

    mod session {
        use super::*;
        use panthyr_gpio::{Location, Mapping, Mode, Sim};

        #[test]
        fn set_outputs() {
            let sim = Sim::new();
            let mut bank = Bank::new(&sim, &Mapping::DEFAULT, Mode::Output).unwrap();
            do_set(&mut bank, "1 3,4".split_ascii_whitespace(), true).unwrap();
            assert_eq!(sim.level(Location::new(3, 19)), Some(true));
            assert_eq!(sim.level(Location::new(2, 12)), Some(true));
            assert_eq!(sim.level(Location::new(2, 6)), Some(true));
            do_set(&mut bank, "3".split_ascii_whitespace(), false).unwrap();
            assert_eq!(sim.level(Location::new(2, 12)), Some(false));
        }

        #[test]
        fn set_nothing() {
            let sim = Sim::new();
            let mut bank = Bank::new(&sim, &Mapping::DEFAULT, Mode::Output).unwrap();
            let err = do_set(&mut bank, "x".split_ascii_whitespace(), true).unwrap_err();
            assert_eq!(err.to_string(), "no outputs specified");
            assert!(do_set(&mut bank, "".split_ascii_whitespace(), false).is_err());
        }

        #[test]
        fn bad_outputs_are_not_fatal() {
            let sim = Sim::new();
            let mut bank = Bank::new(&sim, &Mapping::DEFAULT, Mode::Output).unwrap();
            do_set(&mut bank, "9 x 6".split_ascii_whitespace(), true).unwrap();
            assert_eq!(sim.level(Location::new(0, 9)), Some(true));
        }
    }
}
