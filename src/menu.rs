use std::io::{self, BufRead, Write};

use crate::chart::ChartKind;

/// Where the selector is in its conversation with the user.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    AskWhetherToGraph,
    Retry,
    AskChartType,
    Done(Option<ChartKind>),
}

/// Asks the user whether to draw a chart, and which one.
///
/// An unrecognised yes/no answer asks again, for as long as input lasts.
/// An unrecognised chart choice does not: it ends the conversation with no
/// chart. End of input also ends it with no chart.
///
/// Returns the chosen chart, if any.
///
/// # Errors
///
/// Returns any error from reading `input` or writing `output`.
///
/// # Examples
///
/// ```
/// # use matreport::{select_chart, ChartKind};
/// let mut output = Vec::new();
/// let choice = select_chart("maybe\nYES\n2\n".as_bytes(), &mut output).unwrap();
/// assert_eq!(choice, Some(ChartKind::Pie));
/// ```
pub fn select_chart(mut input: impl BufRead, mut output: impl Write) -> io::Result<Option<ChartKind>> {
    let mut state = State::AskWhetherToGraph;
    loop {
        state = match state {
            State::AskWhetherToGraph => {
                writeln!(output, "\nWould you like to create a graphical report?")?;
                write!(output, "Type 'yes' or 'no': ")?;
                output.flush()?;
                match read_answer(&mut input)? {
                    None => State::Done(None),
                    Some(answer) => match answer.to_lowercase().as_str() {
                        "yes" => State::AskChartType,
                        "no" => {
                            writeln!(output, "No graph will be created.")?;
                            State::Done(None)
                        }
                        _ => State::Retry,
                    },
                }
            }
            State::Retry => {
                writeln!(output, "Invalid response. Please try again.")?;
                State::AskWhetherToGraph
            }
            State::AskChartType => {
                writeln!(output, "\nChoose the type of graph:")?;
                writeln!(output, "1. Bar Chart")?;
                writeln!(output, "2. Pie Chart")?;
                write!(output, "Enter the number of your choice: ")?;
                output.flush()?;
                match read_answer(&mut input)?.as_deref() {
                    Some("1") => State::Done(Some(ChartKind::Bar)),
                    Some("2") => State::Done(Some(ChartKind::Pie)),
                    Some(_) => {
                        writeln!(output, "Invalid option. No graph will be created.")?;
                        State::Done(None)
                    }
                    None => State::Done(None),
                }
            }
            State::Done(choice) => return Ok(choice),
        };
    }
}

/// Reads one trimmed line, or `None` at end of input.
fn read_answer(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
