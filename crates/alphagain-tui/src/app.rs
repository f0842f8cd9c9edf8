//! TUI-local state: the request form, pane focus, and scroll positions.

use alphagain::request::{
    AGE_RANGE, DURATION_RANGE, Equipment, FitnessLevel, Gender, Goal, RequestError,
    WorkoutRequest,
};

use crate::logs::{LogLine, trim_logs};

/// Minutes added or removed per key press on the duration field.
pub(crate) const DURATION_STEP: u32 = 5;

/// One row of the request form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FormField {
    FitnessLevel,
    Goal,
    Gender,
    Age,
    Duration,
    Equipment,
}

impl FormField {
    pub(crate) const ALL: [FormField; 6] = [
        Self::FitnessLevel,
        Self::Goal,
        Self::Gender,
        Self::Age,
        Self::Duration,
        Self::Equipment,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::FitnessLevel => "Fitness Level",
            Self::Goal => "Goal",
            Self::Gender => "Gender",
            Self::Age => "Age",
            Self::Duration => "Duration",
            Self::Equipment => "Equipment",
        }
    }
}

/// Step through a closed set of choices, wrapping at both ends.
fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let len = all.len();
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    all[next]
}

fn step(value: u32, by: u32, forward: bool, (min, max): (u32, u32)) -> u32 {
    if forward {
        value.saturating_add(by).min(max)
    } else {
        value.saturating_sub(by).max(min)
    }
}

/// Editable copy of the six request parameters.
///
/// Every value the form can hold is valid: choices cycle through their
/// enumerations and numbers are clamped to their ranges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Form {
    pub(crate) fitness_level: FitnessLevel,
    pub(crate) goal: Goal,
    pub(crate) gender: Gender,
    pub(crate) age: u32,
    pub(crate) duration_minutes: u32,
    pub(crate) equipment: Equipment,
    /// Index into [`FormField::ALL`].
    pub(crate) cursor: usize,
}

impl Default for Form {
    fn default() -> Self {
        Self::from_request(&WorkoutRequest::default())
    }
}

impl Form {
    pub(crate) fn from_request(request: &WorkoutRequest) -> Self {
        Self {
            fitness_level: request.fitness_level(),
            goal: request.goal(),
            gender: request.gender(),
            age: request.age(),
            duration_minutes: request.duration_minutes(),
            equipment: request.equipment(),
            cursor: 0,
        }
    }

    pub(crate) fn focused(&self) -> FormField {
        FormField::ALL[self.cursor]
    }

    pub(crate) fn focus_prev(&mut self) {
        self.cursor = (self.cursor + FormField::ALL.len() - 1) % FormField::ALL.len();
    }

    pub(crate) fn focus_next(&mut self) {
        self.cursor = (self.cursor + 1) % FormField::ALL.len();
    }

    /// Change the focused field's value by one step.
    pub(crate) fn adjust(&mut self, forward: bool) {
        match self.focused() {
            FormField::FitnessLevel => {
                self.fitness_level = cycle(FitnessLevel::ALL, self.fitness_level, forward);
            }
            FormField::Goal => self.goal = cycle(Goal::ALL, self.goal, forward),
            FormField::Gender => self.gender = cycle(Gender::ALL, self.gender, forward),
            FormField::Age => self.age = step(self.age, 1, forward, AGE_RANGE),
            FormField::Duration => {
                self.duration_minutes =
                    step(self.duration_minutes, DURATION_STEP, forward, DURATION_RANGE);
            }
            FormField::Equipment => {
                self.equipment = cycle(Equipment::ALL, self.equipment, forward);
            }
        }
    }

    pub(crate) fn value(&self, field: FormField) -> String {
        match field {
            FormField::FitnessLevel => self.fitness_level.to_string(),
            FormField::Goal => self.goal.to_string(),
            FormField::Gender => self.gender.to_string(),
            FormField::Age => self.age.to_string(),
            FormField::Duration => format!("{} min", self.duration_minutes),
            FormField::Equipment => self.equipment.to_string(),
        }
    }

    pub(crate) fn to_request(&self) -> Result<WorkoutRequest, RequestError> {
        WorkoutRequest::new(
            self.fitness_level,
            self.goal,
            self.gender,
            self.age,
            self.duration_minutes,
            self.equipment,
        )
    }
}

/// Which pane currently receives navigation keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ActivePane {
    Form,
    History,
    Plan,
    Log,
}

/// TUI-local state (the session itself is owned by the event loop).
pub(crate) struct App {
    pub(crate) form: Form,
    /// Which pane is focused (cycled with Tab).
    pub(crate) active_pane: ActivePane,
    /// Whether the logs pane is visible (toggled with `,`).
    pub(crate) show_logs: bool,
    pub(crate) logs: Vec<LogLine>,
    /// Offset from the bottom of the log (0 = follow tail).
    pub(crate) log_scroll: usize,
    /// Offset from the top of the plan.
    pub(crate) plan_scroll: usize,
    /// History index shown in the plan pane.
    pub(crate) selected: Option<usize>,
    /// Status messages shown temporarily at the bottom.
    pub(crate) status_message: Option<String>,
    /// True while a generation request is in flight.
    pub(crate) busy: bool,
    pub(crate) should_quit: bool,
    pub(crate) model: String,
    pub(crate) session_id: String,
}

impl App {
    pub(crate) fn new(model: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            form: Form::default(),
            active_pane: ActivePane::Form,
            show_logs: false,
            logs: Vec::new(),
            log_scroll: 0,
            plan_scroll: 0,
            selected: None,
            status_message: None,
            busy: false,
            should_quit: false,
            model: model.into(),
            session_id: session_id.into(),
        }
    }

    pub(crate) fn push_logs(&mut self, lines: Vec<LogLine>) {
        if lines.is_empty() {
            return;
        }
        self.logs.extend(lines);
        trim_logs(&mut self.logs);
    }

    /// Show a history entry in the plan pane.
    pub(crate) fn select(&mut self, index: usize) {
        if self.selected != Some(index) {
            self.plan_scroll = 0;
        }
        self.selected = Some(index);
    }

    /// Move the history selection by one, within `len` entries.
    pub(crate) fn move_selection(&mut self, newer: bool, len: usize) {
        if len == 0 {
            return;
        }
        let next = match (self.selected, newer) {
            (None, _) => len - 1,
            (Some(i), true) => (i + 1).min(len - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        self.select(next);
    }

    /// Panes reachable with Tab, in order.
    pub(crate) fn panes(&self) -> &'static [ActivePane] {
        if self.show_logs {
            &[
                ActivePane::Form,
                ActivePane::History,
                ActivePane::Plan,
                ActivePane::Log,
            ]
        } else {
            &[ActivePane::Form, ActivePane::History, ActivePane::Plan]
        }
    }

    pub(crate) fn cycle_pane(&mut self, forward: bool) {
        self.active_pane = cycle(self.panes(), self.active_pane, forward);
    }
}
