//! Interactive configuration prompts.
//!
//! Each question is repeated until the answer is valid. End of input is
//! an error rather than a silent default.

use std::io::{BufRead, Write};

use super::CliError;

/// Values collected from the prompts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Answers {
    pub cells: usize,
    pub rule: u32,
    pub generations: u64,
    pub periodic: bool,
}

/// Ask every question in order.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Answers, CliError> {
    let cells = ask_until(input, output, "Enter positive array size: ", |s| {
        s.parse::<usize>().ok().filter(|&n| n > 0)
    })?;
    let rule = ask_until(input, output, "Enter rule number from 0 to 255: ", |s| {
        s.parse::<u32>().ok().filter(|&r| r <= 255)
    })?;
    let generations = ask_until(input, output, "Enter iterations number: ", |s| {
        s.parse::<u64>().ok().filter(|&g| g > 0)
    })?;
    let periodic = ask_until(
        input,
        output,
        "Set periodic boundary conditions? (1/0): ",
        parse_flag,
    )?;
    Ok(Answers {
        cells,
        rule,
        generations,
        periodic,
    })
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" | "true" => Some(true),
        "0" | "n" | "no" | "false" => Some(false),
        _ => None,
    }
}

fn ask_until<T, R, W>(
    input: &mut R,
    output: &mut W,
    question: &str,
    accept: impl Fn(&str) -> Option<T>,
) -> Result<T, CliError>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        write!(output, "{question}")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(CliError::InputClosed);
        }
        if let Some(value) = accept(line.trim()) {
            return Ok(value);
        }
    }
}
