// File: ./src/cli/mod.rs
// Text front-end driving the engine from the command line
pub mod action;
pub mod view;

use crate::config::Config;
use crate::drag::{CommitOutcome, DragController, DragMode};
use crate::journal::{Journal, JournalSink, UpdateSink};
use crate::model::{ScheduleEntity, normalize_all};
use crate::occupancy::OccupancyIndex;
use crate::range::{Granularity, VisibleWindow};
use crate::storage::LocalStorage;
use action::{Command, USAGE, parse_args};
use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use std::env;
use std::path::Path;

/// Prints each drained update as one JSON line, for piping into a real backend client.
struct StdoutSink;

impl UpdateSink for StdoutSink {
    fn submit(&mut self, update: crate::drag::RangeUpdate) -> Result<()> {
        println!("{}", serde_json::to_string(&update)?);
        Ok(())
    }
}

pub fn run() -> Result<()> {
    let level = crate::logging::level_from_env();
    if let Err(e) = crate::logging::init_logging(&level) {
        eprintln!("Logging disabled: {}", e);
    }

    let invocation = parse_args(env::args().skip(1)).map_err(|e| anyhow!("{}\n\n{}", e, USAGE))?;
    let config = Config::load()?;
    let file = match invocation.file {
        Some(path) => path,
        None => LocalStorage::default_path().context("No data directory available")?,
    };

    match invocation.command {
        Command::Help => println!("{}", USAGE),
        Command::Week(day) => {
            let window = VisibleWindow::week_of(day, config.week_start, Granularity::Day);
            print!("{}", grid(&file, &config, window, false)?);
        }
        Command::Month(day) => {
            let window = VisibleWindow::month_grid_of(day, config.week_start);
            print!("{}", grid(&file, &config, window, true)?);
        }
        Command::Day(day) => {
            let entities = normalize_all(&LocalStorage::load(&file)?, config.inverted_ranges);
            let index = OccupancyIndex::new(VisibleWindow::single_day(day), &entities, config.occupancy);
            print!("{}", view::render_hours(&index, day));
        }
        Command::List(filters) => {
            let entities = normalize_all(&LocalStorage::load(&file)?, config.inverted_ranges);
            let today = Local::now().date_naive();
            print!("{}", view::render_list(&filters.apply(&entities, today)));
        }
        Command::Colors => {
            let entities = normalize_all(&LocalStorage::load(&file)?, config.inverted_ranges);
            print!("{}", view::render_colors(&entities, config.palette()));
        }
        Command::Drag { id, mode, from, to } => {
            let journal = Journal::default_path().context("No data directory available")?;
            let mut sink = JournalSink::new(journal);
            drag_and_save(&file, &config, &mut sink, &id, mode, from, to)?;
        }
        Command::Outbox => {
            let journal = Journal::default_path().context("No data directory available")?;
            let sent = Journal::drain(&journal, &mut StdoutSink)?;
            eprintln!("{} update(s) sent.", sent);
        }
    }
    Ok(())
}

fn grid(file: &Path, config: &Config, window: VisibleWindow, skip_empty: bool) -> Result<String> {
    let entities = normalize_all(&LocalStorage::load(file)?, config.inverted_ranges);
    let index = OccupancyIndex::new(window, &entities, config.occupancy);
    Ok(view::render_days(&index, skip_empty))
}

/// One full gesture: press on `from`, release on `to`. A real commit is
/// handed to `sink` and then written back to the entity file, all while the
/// file is locked. If the sink refuses, the file is left untouched.
pub fn drag_and_save<S: UpdateSink>(
    file: &Path,
    config: &Config,
    sink: &mut S,
    id: &str,
    mode: DragMode,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<CommitOutcome> {
    let outcome = LocalStorage::modify(file, |entities: &mut Vec<ScheduleEntity>| {
        let Some(source) = entities.iter().find(|e| e.id() == id) else {
            bail!("No item with id `{}` in {}", id, file.display());
        };
        let normalized = source.normalize(config.inverted_ranges)?;

        let mut drag = DragController::new(config.drag.clone());
        drag.begin(&normalized, mode, from)?;
        if let Some(preview) = drag.update(to)
            && !preview.accepted
        {
            println!("Edge cannot cross the opposite edge; keeping {}.", preview.range);
        }

        let outcome = drag.commit();
        if let CommitOutcome::Updated(update) = &outcome {
            sink.submit(update.clone())
                .with_context(|| format!("queueing update for `{}`", update.entity_id))?;
            for entity in entities.iter_mut() {
                if entity.apply_update(update) {
                    break;
                }
            }
        }
        Ok(outcome)
    })?;

    match &outcome {
        CommitOutcome::Updated(update) => {
            println!("{} -> {}..{}", update.entity_id, update.new_start, update.new_end)
        }
        CommitOutcome::Unchanged => println!("No change."),
        CommitOutcome::Idle => {}
    }
    Ok(outcome)
}
