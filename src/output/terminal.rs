//! Coloured terminal output for the report

use crate::output::report::Report;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Prints the report to stdout, flagged lines in red
pub fn print_report(report: &Report, choice: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    write_report(&mut stdout, report)
}

/// Writes the report to any colour-capable writer
pub fn write_report<W: WriteColor>(out: &mut W, report: &Report) -> io::Result<()> {
    let mut flagged = ColorSpec::new();
    flagged.set_fg(Some(Color::Red));

    for line in report.lines() {
        if line.flagged {
            out.set_color(&flagged)?;
            write!(out, "{}", line.text)?;
            out.reset()?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", line.text)?;
        }
    }
    out.flush()
}
