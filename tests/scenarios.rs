use chrono::NaiveDate;
use planboard::drag::{CommitOutcome, DragController, DragMode};
use planboard::filter::FilterState;
use planboard::model::{
    EntityKind, Priority, ScheduleEntity, Sprint, SprintStatus, Task, normalize_all,
};
use planboard::occupancy::{OccupancyIndex, OccupancyLimits};
use planboard::range::{DateRange, Granularity, InvertedRangePolicy, VisibleWindow};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn sprint(id: &str, start: &str, end: &str) -> ScheduleEntity {
    ScheduleEntity::Sprint(Sprint {
        id: id.to_string(),
        title: format!("Sprint {id}"),
        start: d(start),
        end: d(end),
        status: SprintStatus::Active,
    })
}

fn task(id: &str, due: &str, priority: Priority) -> ScheduleEntity {
    ScheduleEntity::Task(Task {
        id: id.to_string(),
        title: format!("Task {id}"),
        due: d(due),
        start: None,
        priority,
        completed: false,
    })
}

#[test]
fn moving_a_sprint_three_days() {
    let s = sprint("s1", "2024-06-03", "2024-06-07")
        .normalize(InvertedRangePolicy::Collapse)
        .unwrap();
    let mut drag = DragController::default();
    drag.begin(&s, DragMode::Move, d("2024-06-04")).unwrap();
    drag.update(d("2024-06-05"));
    drag.update(d("2024-06-07"));

    let CommitOutcome::Updated(update) = drag.commit() else {
        panic!("expected a real commit");
    };
    assert_eq!(update.entity_id, "s1");
    assert_eq!(update.kind, EntityKind::Sprint);
    assert_eq!((update.new_start, update.new_end), (d("2024-06-06"), d("2024-06-10")));
    assert!(!drag.is_active());
}

#[test]
fn task_without_start_occupies_only_its_due_day() {
    let entities = normalize_all(
        &[task("t1", "2024-06-10", Priority::Medium)],
        InvertedRangePolicy::Collapse,
    );
    assert_eq!(entities[0].range, DateRange::single(d("2024-06-10")));

    let window = VisibleWindow::new(d("2024-06-08"), d("2024-06-12"), Granularity::Day).unwrap();
    let index = OccupancyIndex::new(window, &entities, OccupancyLimits::default());
    let occupied: Vec<NaiveDate> = window
        .days()
        .filter(|day| !index.occupants_for(*day, None).is_empty())
        .collect();
    assert_eq!(occupied, vec![d("2024-06-10")]);
}

#[test]
fn resize_start_past_end_is_rejected() {
    let s = sprint("s1", "2024-06-03", "2024-06-07")
        .normalize(InvertedRangePolicy::Collapse)
        .unwrap();
    let mut drag = DragController::default();
    drag.begin(&s, DragMode::ResizeStart, d("2024-06-03")).unwrap();
    let preview = drag.update(d("2024-06-09")).unwrap();
    assert!(!preview.accepted);
    assert_eq!(preview.range, DateRange::new(d("2024-06-03"), d("2024-06-07")).unwrap());
    assert_eq!(drag.commit(), CommitOutcome::Unchanged);
}

#[test]
fn resize_start_onto_end_is_rejected_but_recovers() {
    let s = sprint("s1", "2024-06-03", "2024-06-07")
        .normalize(InvertedRangePolicy::Collapse)
        .unwrap();
    let mut drag = DragController::default();
    drag.begin(&s, DragMode::ResizeStart, d("2024-06-03")).unwrap();
    assert!(!drag.update(d("2024-06-07")).unwrap().accepted);
    let ok = drag.update(d("2024-06-05")).unwrap();
    assert!(ok.accepted);
    assert_eq!(ok.range.start, d("2024-06-05"));
    // The end edge is never touched by a start resize.
    assert_eq!(ok.range.end, d("2024-06-07"));
}

#[test]
fn commit_without_net_movement_is_unchanged() {
    let s = sprint("s1", "2024-06-03", "2024-06-07")
        .normalize(InvertedRangePolicy::Collapse)
        .unwrap();
    let mut drag = DragController::default();
    drag.begin(&s, DragMode::Move, d("2024-06-03")).unwrap();
    drag.update(d("2024-06-06"));
    drag.update(d("2024-06-03"));
    assert_eq!(drag.commit(), CommitOutcome::Unchanged);
}

#[test]
fn high_priority_task_filter() {
    let raw = vec![
        task("t1", "2024-06-03", Priority::High),
        task("t2", "2024-06-04", Priority::Medium),
        task("t3", "2024-06-05", Priority::High),
        task("t4", "2024-06-06", Priority::Medium),
        task("t5", "2024-06-07", Priority::Medium),
        sprint("s1", "2024-06-03", "2024-06-07"),
        sprint("s2", "2024-06-10", "2024-06-14"),
        sprint("s3", "2024-06-17", "2024-06-21"),
    ];
    let entities = normalize_all(&raw, InvertedRangePolicy::Collapse);
    let filters = FilterState {
        kinds: [EntityKind::Task].into_iter().collect(),
        priorities: [Priority::High].into_iter().collect(),
        ..Default::default()
    };
    let ids: Vec<&str> = filters
        .apply(&entities, d("2024-06-01"))
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(ids, vec!["t1", "t3"]);
}

#[test]
fn completed_sprint_counts_as_completed() {
    let mut done = sprint("s1", "2024-06-03", "2024-06-07");
    if let ScheduleEntity::Sprint(s) = &mut done {
        s.status = SprintStatus::Completed;
    }
    let n = done.normalize(InvertedRangePolicy::Collapse).unwrap();
    let filters = FilterState {
        include_completed: false,
        ..Default::default()
    };
    assert!(!filters.matches(&n, d("2024-06-05")));
}
