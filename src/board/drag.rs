//! Drag/drop coordination.
//!
//! Gesture capture (pointer or touch) is reduced to `start`, `update` and `end`
//! calls carrying board coordinates. The coordinator hit-tests those points
//! against a [`BoardLayout`] and only touches the board when a drag is released
//! over a stage column.

use crate::board::TaskBoard;
use crate::models::{Stage, TaskId};

/// Point on the board surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle; contains its top/left edges but not bottom/right
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// A stage column that accepts drops
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropTarget {
    pub stage: Stage,
    pub bounds: Rect,
}

/// Drop targets on the board surface, in paint order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardLayout {
    targets: Vec<DropTarget>,
}

impl BoardLayout {
    pub fn new(targets: Vec<DropTarget>) -> Self {
        Self { targets }
    }

    /// One equal-width column per stage across a `width` x `height` surface
    pub fn columns(width: f64, height: f64) -> Self {
        let stages = Stage::all();
        let column_width = width / stages.len() as f64;
        let targets = stages
            .iter()
            .enumerate()
            .map(|(i, stage)| DropTarget {
                stage: *stage,
                bounds: Rect::new(i as f64 * column_width, 0.0, column_width, height),
            })
            .collect();
        Self { targets }
    }

    pub fn targets(&self) -> &[DropTarget] {
        &self.targets
    }

    /// Stage whose column is under `point`
    pub fn hit_test(&self, point: Point) -> Option<Stage> {
        self.targets
            .iter()
            .find(|t| t.bounds.contains(point))
            .map(|t| t.stage)
    }

    /// Bounds of a stage column, if laid out
    pub fn bounds_of(&self, stage: Stage) -> Option<Rect> {
        self.targets.iter().find(|t| t.stage == stage).map(|t| t.bounds)
    }
}

/// Source of a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureInput {
    Pointer,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        task_id: TaskId,
        input: GestureInput,
        position: Point,
        hover: Option<Stage>,
    },
}

/// Result of releasing (or failing to release) a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Released over another stage; the task moved
    Moved { task_id: TaskId, from: Stage, to: Stage },
    /// Released over the column the task already sits in
    Unchanged { task_id: TaskId, stage: Stage },
    /// Released outside every column, or the task vanished mid-drag
    Cancelled { task_id: TaskId },
    /// No drag was in progress
    Ignored,
}

/// Raw gesture events, as delivered by an input layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Start { task_id: TaskId, input: GestureInput, at: Point },
    Move { at: Point },
    End { at: Point },
    Cancel,
}

/// Single-pointer drag state machine
#[derive(Debug, Clone)]
pub struct DragCoordinator {
    layout: BoardLayout,
    state: DragState,
}

impl DragCoordinator {
    pub fn new(layout: BoardLayout) -> Self {
        Self {
            layout,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Stage currently under the dragged task, if any
    pub fn hover(&self) -> Option<Stage> {
        match self.state {
            DragState::Dragging { hover, .. } => hover,
            DragState::Idle => None,
        }
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    /// Replace the layout (window resized). An in-flight drag keeps going and
    /// is re-hit-tested against the new columns.
    pub fn set_layout(&mut self, layout: BoardLayout) {
        self.layout = layout;
        if let DragState::Dragging { position, hover, .. } = &mut self.state {
            *hover = self.layout.hit_test(*position);
        }
    }

    /// Begin dragging `task_id`.
    ///
    /// Ignored while another drag is in flight, or when the board has no such
    /// task. Returns whether the drag started.
    pub fn start(&mut self, board: &TaskBoard, task_id: TaskId, input: GestureInput, at: Point) -> bool {
        if let DragState::Dragging { task_id: current, .. } = self.state {
            log::debug!("Ignoring drag of task {} while task {} is dragged", task_id, current);
            return false;
        }
        if !board.contains(task_id) {
            log::debug!("Ignoring drag of unknown task {}", task_id);
            return false;
        }
        self.state = DragState::Dragging {
            task_id,
            input,
            position: at,
            hover: self.layout.hit_test(at),
        };
        true
    }

    /// Track the gesture position; returns the stage now under it
    pub fn update(&mut self, at: Point) -> Option<Stage> {
        match &mut self.state {
            DragState::Dragging { position, hover, .. } => {
                *position = at;
                *hover = self.layout.hit_test(at);
                *hover
            }
            DragState::Idle => None,
        }
    }

    /// Release the drag at `at`, moving the task if a column is under it
    pub fn end(&mut self, board: &mut TaskBoard, at: Point) -> DropOutcome {
        let DragState::Dragging { task_id, .. } = std::mem::replace(&mut self.state, DragState::Idle) else {
            return DropOutcome::Ignored;
        };

        let Some(target) = self.layout.hit_test(at) else {
            log::debug!("Drag of task {} released outside the board", task_id);
            return DropOutcome::Cancelled { task_id };
        };
        let Some(from) = board.get(task_id).map(|t| t.status) else {
            log::debug!("Task {} disappeared during drag", task_id);
            return DropOutcome::Cancelled { task_id };
        };

        if board.move_task(task_id, target) {
            DropOutcome::Moved { task_id, from, to: target }
        } else {
            DropOutcome::Unchanged { task_id, stage: from }
        }
    }

    /// Abort an in-flight drag without touching the board
    pub fn cancel(&mut self) -> DropOutcome {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging { task_id, .. } => DropOutcome::Cancelled { task_id },
            DragState::Idle => DropOutcome::Ignored,
        }
    }

    /// Feed one raw event. Only `End` and `Cancel` produce an outcome.
    pub fn handle(&mut self, board: &mut TaskBoard, event: GestureEvent) -> Option<DropOutcome> {
        match event {
            GestureEvent::Start { task_id, input, at } => {
                self.start(board, task_id, input, at);
                None
            }
            GestureEvent::Move { at } => {
                self.update(at);
                None
            }
            GestureEvent::End { at } => Some(self.end(board, at)),
            GestureEvent::Cancel => Some(self.cancel()),
        }
    }
}
