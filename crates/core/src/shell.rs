use std::{
    io::{BufRead, Write},
    str::FromStr,
};

use anyhow::{anyhow, Context, Result};
use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{one_of, space0, space1},
    combinator::{all_consuming, map, map_res, recognize, value},
    sequence::{delimited, pair, preceded},
    IResult,
};
use tracing::{debug, warn};

use crate::{
    game::Square,
    renderer::render_with_highlights,
    session::Session,
    MoveGenerator,
};

const HELP: &str = "\
commands:
  start          begin the game
  select <sq>    select a piece of the side to move (again to deselect)
  move <sq>      move the selected piece
  clear          drop the current selection
  moves <sq>     list destinations of any piece
  board | d      draw the board
  fen            print the placement and side to move
  help           show this text
  quit           leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Select(Square),
    Move(Square),
    Clear,
    Moves(Square),
    Board,
    Fen,
    Help,
    Quit,
}

fn square(i: &str) -> IResult<&str, Square> {
    map_res(
        recognize(pair(one_of("abcdefghABCDEFGH"), one_of("12345678"))),
        Square::from_str,
    )(i)
}

fn with_square<'a>(
    name: &'static str,
    command: fn(Square) -> Command,
) -> impl FnMut(&'a str) -> IResult<&'a str, Command> {
    map(preceded(pair(tag_no_case(name), space1), square), command)
}

fn command(i: &str) -> IResult<&str, Command> {
    alt((
        value(Command::Start, tag_no_case("start")),
        with_square("select", Command::Select),
        // "moves" must come before "move"
        with_square("moves", Command::Moves),
        with_square("move", Command::Move),
        value(Command::Clear, tag_no_case("clear")),
        value(Command::Board, alt((tag_no_case("board"), tag_no_case("d")))),
        value(Command::Fen, tag_no_case("fen")),
        value(Command::Help, tag_no_case("help")),
        value(Command::Quit, alt((tag_no_case("quit"), tag_no_case("exit")))),
    ))(i)
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        all_consuming(delimited(space0, command, space0))(s)
            .map(|(_, command)| command)
            .map_err(|_| anyhow!("Unknown command: {s}, type `help` for a list"))
    }
}

/// Reads commands line by line until `quit` or the end of input.
///
/// A command that fails is reported as `error: ...` and the loop carries on.
pub fn start_shell<R: MoveGenerator>(
    session: &mut Session<R>,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<()> {
    respond(&mut output, "cheddah ready, type `help` for commands")?;

    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        debug!(command = line, "Received command");

        let result = Command::from_str(line).and_then(|command| {
            if command == Command::Quit {
                return Ok(None);
            }

            execute(command, session).map(Some)
        });

        match result {
            Ok(Some(response)) => respond(&mut output, &response)?,
            Ok(None) => break,
            Err(e) => {
                warn!(command = line, "{e:#}");
                respond(&mut output, &format!("error: {e:#}"))?;
            }
        }
    }

    output.flush()?;
    Ok(())
}

fn execute<R: MoveGenerator>(command: Command, session: &mut Session<R>) -> Result<String> {
    Ok(match command {
        Command::Start => {
            session.start();
            format!("game started, {} to move", session.side_to_move())
        }
        Command::Select(square) => {
            let highlights = session.select(square)?.clone();
            match highlights.selected {
                Some(selected) => format!(
                    "{}selected {selected}, destinations: {}",
                    render_with_highlights(session.board(), &highlights),
                    highlights.destinations()
                ),
                None => format!("deselected {square}"),
            }
        }
        Command::Move(square) => {
            let record = session.move_to(square)?;
            format!(
                "{}{record}, {} to move",
                session.board(),
                session.side_to_move()
            )
        }
        Command::Clear => {
            session.clear_selection();
            "selection cleared".to_string()
        }
        Command::Moves(square) => {
            let destinations = session.destinations_of(square)?;
            if destinations.is_empty() {
                format!("{square} has no destinations")
            } else {
                format!("{square}: {destinations}")
            }
        }
        Command::Board => session.board().to_string(),
        Command::Fen => format!(
            "{} {}",
            session.board().to_placement(),
            session.side_to_move().to_char()
        ),
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    })
}

fn respond(output: &mut impl Write, msg: &str) -> Result<()> {
    writeln!(output, "{}", msg.trim_end())?;
    output.flush()?;
    Ok(())
}
