use crate::color_utils::{color_bucket, is_dark, palette_rgb, to_hex};
use crate::model::{EntityKind, NormalizedEntity};
use crate::occupancy::{OccupancyIndex, SlotOccupancy};
use chrono::NaiveDate;
use std::fmt::Write;
use std::num::NonZeroUsize;

fn kind_tag(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Event => "E",
        EntityKind::Sprint => "S",
        EntityKind::Task => "T",
        EntityKind::Project => "P",
    }
}

fn label(e: &NormalizedEntity) -> String {
    let done = if e.completed { " [x]" } else { "" };
    let title = if e.title.is_empty() { e.id.as_str() } else { e.title.as_str() };
    format!("[{}] {}{}", kind_tag(e.kind), title, done)
}

fn slot_line(slot: &SlotOccupancy<'_>) -> String {
    let mut parts: Vec<String> = slot.shown.iter().map(|e| label(e)).collect();
    if slot.overflow > 0 {
        parts.push(format!("+{} more", slot.overflow));
    }
    parts.join(", ")
}

/// One block per day of the window, capped like a grid cell.
pub fn render_days(index: &OccupancyIndex<'_>, skip_empty: bool) -> String {
    let mut out = String::new();
    for day in index.window().days() {
        let slot = index.occupants_for(day, None);
        if skip_empty && slot.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", day.format("%a %Y-%m-%d"));
        for e in &slot.shown {
            let _ = writeln!(out, "  {}  {}", label(e), e.range);
        }
        if slot.overflow > 0 {
            let _ = writeln!(out, "  +{} more", slot.overflow);
        }
    }
    if out.is_empty() {
        out.push_str("Nothing scheduled.\n");
    }
    out
}

/// 24 hour rows for a single day.
pub fn render_hours(index: &OccupancyIndex<'_>, day: NaiveDate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", day.format("%A %Y-%m-%d"));
    for hour in 0..24 {
        let slot = index.occupants_for(day, Some(hour));
        let _ = writeln!(out, "{:02}:00 | {}", hour, slot_line(&slot));
    }
    out
}

pub fn render_list(entities: &[&NormalizedEntity]) -> String {
    if entities.is_empty() {
        return "No matching items.\n".to_string();
    }
    let mut out = String::new();
    for e in entities {
        let prio = e.priority.map(|p| format!(" !{}", p)).unwrap_or_default();
        let _ = writeln!(out, "{:<12} {}  {}{}", e.id, label(e), e.range, prio);
    }
    out
}

/// Bucket, swatch and the text shade to draw on it, per entity.
pub fn render_colors(entities: &[NormalizedEntity], palette_size: NonZeroUsize) -> String {
    let palette = palette_rgb(palette_size);
    let mut out = String::new();
    for e in entities {
        let bucket = color_bucket(&e.id, palette_size);
        let Some(&color) = palette.get(bucket) else {
            continue;
        };
        let text = if is_dark(color) { "light" } else { "dark" };
        let _ = writeln!(
            out,
            "{:<12} {:>3} {} {:<5}  {}",
            e.id,
            bucket,
            to_hex(color),
            text,
            label(e)
        );
    }
    out
}
