//! Interactive questions on the terminal.
//!
//! Both prompts are generic over the reader and writer so tests can drive
//! them with in-memory buffers.

use std::io::{self, BufRead, Write};

use almanac_core::ReleaseRecord;
use almanac_merge::{Conflict, ConflictResolver, Resolution};

/// Asks the operator about each merge conflict.
///
/// `c` keeps the incoming record, `s` keeps the existing one, `a` and `n`
/// do the same for this and every later conflict of the merge. Anything else
/// is asked again. End of input is an error.
pub(crate) struct TerminalResolver<R, W> {
    input: R,
    output: W,
}

impl TerminalResolver<io::StdinLock<'static>, io::Stdout> {
    pub(crate) fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalResolver<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn describe(&mut self, conflict: &Conflict<'_>) -> io::Result<()> {
        if conflict.by_alias {
            writeln!(self.output, "\nConflict on {} (matched by translation):", conflict.date)?;
            writeln!(self.output, "  new: {}", summary(conflict.incoming))?;
            writeln!(self.output, "  old: {}", summary(conflict.existing))?;
        } else {
            writeln!(self.output, "\nConflict on {}: {}", conflict.date, conflict.incoming.title)?;
            writeln!(self.output, "  new: {}", summary(conflict.incoming))?;
            writeln!(self.output, "  old: {}", summary(conflict.existing))?;
        }
        writeln!(self.output, "  [c] keep new   [s] keep old")?;
        writeln!(self.output, "  [a] keep new for all   [n] keep old for all")
    }
}

fn summary(record: &ReleaseRecord) -> String {
    format!("{} [{}]", record.title, record.platforms.join(", "))
}

fn parse_answer(line: &str) -> Option<Resolution> {
    match line.trim().to_lowercase().as_str() {
        "c" => Some(Resolution::KeepIncoming),
        "s" => Some(Resolution::KeepExisting),
        "a" => Some(Resolution::KeepIncomingForAll),
        "n" => Some(Resolution::KeepExistingForAll),
        _ => None,
    }
}

fn read_answer_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed while waiting for an answer",
        ));
    }
    Ok(line)
}

impl<R: BufRead, W: Write> ConflictResolver for TerminalResolver<R, W> {
    fn resolve(&mut self, conflict: &Conflict<'_>) -> io::Result<Resolution> {
        self.describe(conflict)?;
        loop {
            write!(self.output, "Choose [c/s/a/n]: ")?;
            self.output.flush()?;
            let line = read_answer_line(&mut self.input)?;
            if let Some(answer) = parse_answer(&line) {
                return Ok(answer);
            }
            writeln!(self.output, "Invalid choice, try again.")?;
        }
    }
}

/// Ask a yes/no question. Only `y` or `yes` counts as yes; end of input is no.
pub(crate) fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    write!(output, "{question} [y/N]: ")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// [`confirm`] on the process's stdin and stdout.
pub(crate) fn confirm_stdio(question: &str) -> io::Result<bool> {
    confirm(&mut io::stdin().lock(), &mut io::stdout(), question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn records() -> (ReleaseRecord, ReleaseRecord) {
        (
            ReleaseRecord::new("Game X").with_platforms(["PC"]),
            ReleaseRecord::new("Game X").with_platforms(["PS5"]),
        )
    }

    #[test]
    fn invalid_answers_are_asked_again() {
        let (old, new) = records();
        let conflict = Conflict {
            date: "2026-03-15",
            existing: &old,
            incoming: &new,
            by_alias: false,
        };
        let mut out = Vec::new();
        let mut resolver = TerminalResolver::new(Cursor::new("x\n\nA\n"), &mut out);
        assert_eq!(resolver.resolve(&conflict).unwrap(), Resolution::KeepIncomingForAll);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Choose [c/s/a/n]").count(), 3);
        assert_eq!(text.matches("Invalid choice").count(), 2);
        assert!(text.contains("Game X [PS5]"));
    }

    #[test]
    fn alias_conflicts_show_both_titles() {
        let old = ReleaseRecord::new("艾尔登法环");
        let new = ReleaseRecord::new("Elden Ring");
        let conflict = Conflict {
            date: "2026-03-15",
            existing: &old,
            incoming: &new,
            by_alias: true,
        };
        let mut out = Vec::new();
        let mut resolver = TerminalResolver::new(Cursor::new("s\n"), &mut out);
        assert_eq!(resolver.resolve(&conflict).unwrap(), Resolution::KeepExisting);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("matched by translation"));
        assert!(text.contains("old: 艾尔登法环"));
    }

    #[test]
    fn closed_input_is_an_error() {
        let (old, new) = records();
        let conflict = Conflict {
            date: "2026-03-15",
            existing: &old,
            incoming: &new,
            by_alias: false,
        };
        let mut resolver = TerminalResolver::new(Cursor::new(""), Vec::new());
        let err = resolver.resolve(&conflict).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn confirm_defaults_to_no() {
        let mut out = Vec::new();
        assert!(confirm(&mut Cursor::new("y\n"), &mut out, "Write?").unwrap());
        assert!(confirm(&mut Cursor::new("YES\n"), &mut out, "Write?").unwrap());
        assert!(!confirm(&mut Cursor::new("\n"), &mut out, "Write?").unwrap());
        assert!(!confirm(&mut Cursor::new("maybe\n"), &mut out, "Write?").unwrap());
        assert!(!confirm(&mut Cursor::new(""), &mut out, "Write?").unwrap());
        assert!(String::from_utf8(out).unwrap().starts_with("Write? [y/N]: "));
    }
}
