//! Interactive quote entry session.
//!
//! Line-oriented front end over the dispatcher: each input line parses to
//! one command, the resulting outputs go through the event bus, and the
//! bus subscribers do the printing. Dialog outputs are answered inline on
//! the same input stream.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use quotegrid_app::bus::EventBus;
use quotegrid_app::dispatcher::Dispatcher;
use quotegrid_app::events::{Intent, NumKey, Output};
use quotegrid_app::focus::Direction;
use quotegrid_engine::item::Column;

pub const HELP: &str = "\
Entry:
  w | h             jump to the first empty width/height cell
  <number>          type the number into the active cell and commit
  del               erase the last typed digit
  enter             commit the input buffer
  up/down/left/right  move the active cell
Rows (1-based):
  click <row> <col>  click a cell (width, height, type, location, ...)
  seq <row>          click a row's sequence cell (select / batch-select)
  insert | delete | clear
  multi              toggle multi-delete mode
Quote:
  cycle              cycle the fabric type of every complete row
  calc               price all rows and update the total
  save | export      write the quote as JSON / CSV
  load <path>        load a saved quote
  reset              start over
Views:
  detail             switch to the detail configuration view
  focus <col>        show only the sequence and <col> columns
  batch <col> <value>     set <col> on every non-empty row
  set <row> <col> <value> set one detail cell
Other:
  show | help | quit";

#[derive(Debug)]
enum Command {
    Intent(Intent),
    /// A bare number: type its digits, then commit.
    Digits(String),
    Load(PathBuf),
    Show,
    Help,
    Quit,
}

pub fn run_session(
    dispatcher: &mut Dispatcher,
    mut reader: impl BufRead,
    bus: &mut EventBus,
) -> io::Result<()> {
    if dispatcher.pending_snapshot() {
        let restore = prompt_yes_no(
            &mut reader,
            "Restore the auto-saved quote from the previous session?",
        )?;
        if restore {
            dispatcher.restore_snapshot();
        } else {
            dispatcher.discard_snapshot();
        }
    }
    bus.publish_all(&dispatcher.initial_state());

    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        dispatcher.autosave_tick();

        let command = match parse_line(line.trim()) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };
        match command {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Show => bus.publish_all(&dispatcher.initial_state()),
            Command::Digits(digits) => {
                // Per-digit snapshots are interim; only the commit result
                // is worth rendering.
                for ch in digits.chars() {
                    if let Some(d) = ch.to_digit(10) {
                        dispatcher.dispatch(Intent::NumericKeyPressed(NumKey::Digit(d as u8)));
                    }
                }
                bus.publish_all(&dispatcher.dispatch(Intent::NumericKeyPressed(NumKey::Enter)));
            }
            Command::Load(path) => run_load(dispatcher, &mut reader, bus, &path)?,
            Command::Intent(intent) => {
                bus.publish_all(&dispatcher.dispatch(intent));
            }
        }
    }
    Ok(())
}

fn run_load(
    dispatcher: &mut Dispatcher,
    reader: &mut impl BufRead,
    bus: &mut EventBus,
    path: &Path,
) -> io::Result<()> {
    let mut outputs = dispatcher.dispatch(Intent::LoadRequested);
    bus.publish_all(&outputs);

    if outputs
        .iter()
        .any(|o| matches!(o, Output::ShowLoadConfirmationDialog))
    {
        let intent = if prompt_yes_no(reader, "Save the current quote before loading?")? {
            Intent::SaveThenLoadChosen
        } else {
            Intent::LoadDirectlyChosen
        };
        outputs = dispatcher.dispatch(intent);
        bus.publish_all(&outputs);
    }
    if !outputs.iter().any(|o| matches!(o, Output::TriggerFileLoad)) {
        return Ok(());
    }

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("quote.json")
        .to_string();
    match std::fs::read_to_string(path) {
        Ok(content) => {
            bus.publish_all(&dispatcher.dispatch(Intent::FileLoaded { name, content }));
        }
        Err(e) => eprintln!("Could not read {}: {}", path.display(), e),
    }
    Ok(())
}

fn prompt_yes_no(reader: &mut impl BufRead, question: &str) -> io::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    reader.read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn parse_line(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = parts.collect();

    if rest.is_empty() && head.chars().all(|c| c.is_ascii_digit()) {
        return Ok(Some(Command::Digits(head.to_string())));
    }

    let command = match head {
        "w" => Command::Intent(Intent::NumericKeyPressed(NumKey::Width)),
        "h" => Command::Intent(Intent::NumericKeyPressed(NumKey::Height)),
        "del" => Command::Intent(Intent::NumericKeyPressed(NumKey::Delete)),
        "enter" => Command::Intent(Intent::NumericKeyPressed(NumKey::Enter)),
        "up" => Command::Intent(Intent::MoveActiveCell(Direction::Up)),
        "down" => Command::Intent(Intent::MoveActiveCell(Direction::Down)),
        "left" => Command::Intent(Intent::MoveActiveCell(Direction::Left)),
        "right" => Command::Intent(Intent::MoveActiveCell(Direction::Right)),
        "click" => Command::Intent(Intent::TableCellClicked {
            row: parse_row(rest.first())?,
            column: parse_column(rest.get(1))?,
        }),
        "seq" => Command::Intent(Intent::SequenceCellClicked {
            row: parse_row(rest.first())?,
        }),
        "insert" => Command::Intent(Intent::InsertRowRequested),
        "delete" => Command::Intent(Intent::DeleteRowRequested),
        "clear" => Command::Intent(Intent::ClearRowRequested),
        "multi" => Command::Intent(Intent::MultiDeleteModeToggled),
        "cycle" => Command::Intent(Intent::CycleTypeRequested),
        "calc" => Command::Intent(Intent::CalculateRequested),
        "save" => Command::Intent(Intent::SaveRequested),
        "export" => Command::Intent(Intent::ExportCsvRequested),
        "reset" => Command::Intent(Intent::ResetRequested),
        "detail" => Command::Intent(Intent::NavigateToDetailView),
        "focus" => Command::Intent(Intent::FocusModeRequested {
            column: parse_column(rest.first())?,
        }),
        "batch" => Command::Intent(Intent::BatchUpdateRequested {
            column: parse_column(rest.first())?,
            value: rest[1..].join(" "),
        }),
        "set" => Command::Intent(Intent::DetailCellEdited {
            row: parse_row(rest.first())?,
            column: parse_column(rest.get(1))?,
            value: rest[2..].join(" "),
        }),
        "load" => {
            if rest.is_empty() {
                return Err("Expected a file path.".to_string());
            }
            Command::Load(PathBuf::from(rest.join(" ")))
        }
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => {
            return Err(format!(
                "Unknown command '{}'. Type 'help' for the command list.",
                other
            ))
        }
    };
    Ok(Some(command))
}

fn parse_row(arg: Option<&&str>) -> Result<usize, String> {
    let raw = arg.ok_or_else(|| "Expected a row number.".to_string())?;
    let n: usize = raw
        .parse()
        .map_err(|_| format!("'{}' is not a row number.", raw))?;
    n.checked_sub(1)
        .ok_or_else(|| "Rows are numbered from 1.".to_string())
}

fn parse_column(arg: Option<&&str>) -> Result<Column, String> {
    let raw = arg.ok_or_else(|| "Expected a column name.".to_string())?;
    let column = match raw.to_ascii_lowercase().as_str() {
        "width" | "w" => Column::Width,
        "height" | "h" => Column::Height,
        "type" | "t" => Column::Type,
        "location" | "loc" => Column::Location,
        "fabric" => Column::Fabric,
        "color" => Column::Color,
        "over" => Column::Over,
        "oi" => Column::Oi,
        "lr" => Column::Lr,
        _ => return Err(format!("'{}' is not an editable column.", raw)),
    };
    Ok(column)
}
