// File: ./src/model/entity.rs
// Schedulable items as they arrive from the backend
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Event,
    Sprint,
    Task,
    Project,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Event,
        EntityKind::Sprint,
        EntityKind::Task,
        EntityKind::Project,
    ];

    /// Stacking order inside a grid cell: lower renders first.
    pub fn display_rank(self) -> u8 {
        match self {
            EntityKind::Event => 0,
            EntityKind::Task => 1,
            EntityKind::Sprint => 2,
            EntityKind::Project => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Event => "event",
            EntityKind::Sprint => "sprint",
            EntityKind::Task => "task",
            EntityKind::Project => "project",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "event" | "events" => Ok(EntityKind::Event),
            "sprint" | "sprints" => Ok(EntityKind::Sprint),
            "task" | "tasks" => Ok(EntityKind::Task),
            "project" | "projects" => Ok(EntityKind::Project),
            other => Err(format!("Unknown kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("Unknown priority: {}", other)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SprintStatus {
    #[default]
    Planned,
    Active,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(alias = "start_time", alias = "startTime")]
    pub start: NaiveDateTime,
    #[serde(alias = "end_time", alias = "endTime")]
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: String,
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(alias = "start_date", alias = "startDate")]
    pub start: NaiveDate,
    #[serde(alias = "end_date", alias = "endDate")]
    pub end: NaiveDate,
    #[serde(default)]
    pub status: SprintStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(alias = "due_date", alias = "dueDate")]
    pub due: NaiveDate,
    #[serde(
        default,
        alias = "start_date",
        alias = "startDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, alias = "is_completed", alias = "isCompleted")]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(
        default,
        alias = "start_date",
        alias = "startDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<NaiveDate>,
    #[serde(
        default,
        alias = "end_date",
        alias = "endDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<NaiveDate>,
}

/// Any item that can be placed on the calendar grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScheduleEntity {
    Event(Event),
    Sprint(Sprint),
    Task(Task),
    Project(Project),
}

impl ScheduleEntity {
    pub fn id(&self) -> &str {
        match self {
            ScheduleEntity::Event(e) => &e.id,
            ScheduleEntity::Sprint(s) => &s.id,
            ScheduleEntity::Task(t) => &t.id,
            ScheduleEntity::Project(p) => &p.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ScheduleEntity::Event(e) => &e.title,
            ScheduleEntity::Sprint(s) => &s.title,
            ScheduleEntity::Task(t) => &t.title,
            ScheduleEntity::Project(p) => &p.title,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            ScheduleEntity::Event(_) => EntityKind::Event,
            ScheduleEntity::Sprint(_) => EntityKind::Sprint,
            ScheduleEntity::Task(_) => EntityKind::Task,
            ScheduleEntity::Project(_) => EntityKind::Project,
        }
    }
}
