//! Line-oriented prompts
//!
//! Generic over the reader and writer so the interactive menu can be
//! driven by scripted input in tests.

use std::io::{BufRead, Write};

use crate::error::{ParkingError, ParkingResult};

/// Shown after input that does not parse as a number
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input. Try again.";

fn read_raw<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> ParkingResult<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(ParkingError::Io("Unexpected end of input".into()));
    }
    Ok(line)
}

/// Prompt for a line and return it with surrounding whitespace removed
pub fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> ParkingResult<String> {
    Ok(read_raw(input, output, prompt)?.trim().to_string())
}

/// Prompt until the answer parses as an integer
pub fn read_int<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> ParkingResult<i32> {
    loop {
        match read_raw(input, output, prompt)?.trim().parse::<i32>() {
            Ok(n) => return Ok(n),
            Err(_) => writeln!(output, "{}", INVALID_INPUT_MESSAGE)?,
        }
    }
}
