/// Logical input actions. The simulation never sees physical key codes; the
/// host maps whatever bindings it likes onto these before each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Wait,
    Reset,
}

pub const ACTION_COUNT: usize = 6;

impl InputAction {
    fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Wait => 4,
            InputAction::Reset => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

/// Immutable per-tick snapshot of action states. Built once per frame by the
/// host and passed into update calls by value; the simulation holds no input
/// state of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }
}
