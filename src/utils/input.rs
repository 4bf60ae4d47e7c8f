use chrono::Weekday;
use std::io::{BufRead, Write};

use crate::error::{Error, Result};

/// Line-oriented prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}").map_err(|e| Error::io("writing prompt", e))?;
        self.output.flush().map_err(|e| Error::io("writing prompt", e))?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| Error::io("reading input", e))?;
        if read == 0 {
            return Err(Error::invalid_input(prompt.trim(), "input closed"));
        }
        Ok(line.trim().to_string())
    }

    fn complain(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}").map_err(|e| Error::io("writing prompt", e))
    }

    /// Asks until a number inside `low..=high` is entered; empty keeps `default`.
    pub fn number(&mut self, prompt: &str, (low, high): (f64, f64), default: f64) -> Result<f64> {
        loop {
            let line = self.read_line(&format!("{prompt} [{low}-{high}, default {default}]: "))?;
            if line.is_empty() {
                return Ok(default);
            }
            match line.parse::<f64>() {
                Ok(num) if (low..=high).contains(&num) => return Ok(num),
                Ok(_) => self.complain(&format!("Please enter a value between {low} and {high}"))?,
                Err(_) => self.complain("Please enter a valid number")?,
            }
        }
    }

    pub fn weekday(&mut self, prompt: &str, default: Weekday) -> Result<Weekday> {
        loop {
            let line = self.read_line(&format!("{prompt} [Mon-Sun, default {default}]: "))?;
            if line.is_empty() {
                return Ok(default);
            }
            match line.parse::<Weekday>() {
                Ok(day) => return Ok(day),
                Err(_) => self.complain("Please enter a day such as Mon or Tuesday")?,
            }
        }
    }

    pub fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let line = self.read_line(&format!("{prompt} [y/N]: "))?;
        Ok(matches!(line.to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn number_retries_until_in_range() {
        let mut out = Vec::new();
        let mut p = Prompter::new(Cursor::new("abc\n99\n30\n"), &mut out);
        assert_eq!(p.number("Temperature", (10.0, 45.0), 25.0).unwrap(), 30.0);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Please enter a valid number"));
        assert!(text.contains("between 10 and 45"));
    }

    #[test]
    fn empty_line_keeps_default() {
        let mut p = Prompter::new(Cursor::new("\n"), Vec::<u8>::new());
        assert_eq!(p.number("Humidity", (10.0, 100.0), 60.0).unwrap(), 60.0);
    }

    #[test]
    fn weekday_accepts_short_and_long_names() {
        let mut p = Prompter::new(Cursor::new("Fri\nsunday\n"), Vec::<u8>::new());
        assert_eq!(p.weekday("Day", Weekday::Mon).unwrap(), Weekday::Fri);
        assert_eq!(p.weekday("Day", Weekday::Mon).unwrap(), Weekday::Sun);
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut p = Prompter::new(Cursor::new(""), Vec::<u8>::new());
        assert!(p.confirm("Start").is_err());
    }
}
