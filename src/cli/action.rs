use crate::drag::DragMode;
use crate::filter::{DateFilter, DatePreset, FilterState};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;

#[derive(Debug, PartialEq)]
pub enum Command {
    Week(NaiveDate),
    Month(NaiveDate),
    Day(NaiveDate),
    List(FilterState),
    Drag {
        id: String,
        mode: DragMode,
        from: NaiveDate,
        to: NaiveDate,
    },
    Colors,
    Outbox,
    Help,
}

#[derive(Debug, PartialEq)]
pub struct Invocation {
    pub file: Option<PathBuf>,
    pub command: Command,
}

pub const USAGE: &str = "\
Usage: planboard [--file PATH] <command>

  week DATE                     day grid for the week containing DATE
  month DATE                    day grid for the month containing DATE
  day DATE                      hour grid for DATE
  list [--kind K]... [--priority P]... [--hide-completed] [--range R]
                                R: today | week | month | next7 | FROM..TO
  drag ID move|start|end FROM TO
                                drag an item and save the result
  colors                        palette bucket per item
  outbox                        print and clear queued updates

DATE is YYYY-MM-DD or `today`.";

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    if s == "today" {
        return Ok(Local::now().date_naive());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("Bad date `{}`: {}", s, e))
}

fn parse_range(s: &str) -> Result<DateFilter, String> {
    if let Some((from, to)) = s.split_once("..") {
        let bound = |v: &str| -> Result<Option<NaiveDate>, String> {
            if v.is_empty() { Ok(None) } else { parse_date(v).map(Some) }
        };
        return Ok(DateFilter::Custom {
            from: bound(from)?,
            to: bound(to)?,
        });
    }
    if s == "all" {
        return Ok(DateFilter::All);
    }
    s.parse::<DatePreset>().map(DateFilter::Preset)
}

pub fn parse_args<I>(args: I) -> Result<Invocation, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().peekable();
    let mut file = None;
    if args.peek().map(String::as_str) == Some("--file") {
        args.next();
        file = Some(PathBuf::from(args.next().ok_or("--file needs a path")?));
    }

    let Some(cmd) = args.next() else {
        return Ok(Invocation {
            file,
            command: Command::Help,
        });
    };
    let mut next = |what: &str| args.next().ok_or_else(|| format!("Missing {}", what));

    let command = match cmd.as_str() {
        "week" => Command::Week(parse_date(&next("DATE")?)?),
        "month" => Command::Month(parse_date(&next("DATE")?)?),
        "day" => Command::Day(parse_date(&next("DATE")?)?),
        "colors" => Command::Colors,
        "outbox" => Command::Outbox,
        "help" | "--help" | "-h" => Command::Help,
        "drag" => Command::Drag {
            id: next("ID")?,
            mode: next("MODE")?.parse()?,
            from: parse_date(&next("FROM")?)?,
            to: parse_date(&next("TO")?)?,
        },
        "list" => {
            let mut filters = FilterState::default();
            while let Ok(flag) = next("flag") {
                match flag.as_str() {
                    "--kind" => {
                        filters.kinds.insert(next("kind")?.parse()?);
                    }
                    "--priority" => {
                        filters.priorities.insert(next("priority")?.parse()?);
                    }
                    "--hide-completed" => filters.include_completed = false,
                    "--range" => filters.date_range = parse_range(&next("range")?)?,
                    other => return Err(format!("Unknown flag: {}", other)),
                }
            }
            Command::List(filters)
        }
        other => return Err(format!("Unknown command: {}", other)),
    };
    Ok(Invocation { file, command })
}
