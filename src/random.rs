use crate::particle::Direction;

/// Source of particle directions, injected so tests can script exact sequences.
pub trait DirectionSource: Send {
    fn next_direction(&mut self) -> Direction;
}

/// Fair coin flip.
impl DirectionSource for fastrand::Rng {
    fn next_direction(&mut self) -> Direction {
        if self.bool() {
            Direction::Left
        } else {
            Direction::Right
        }
    }
}

/// Replays a fixed sequence of directions, cycling when it runs out.
#[derive(Debug, Clone)]
pub struct ScriptedDirections {
    script: Vec<Direction>,
    cursor: usize,
}

impl ScriptedDirections {
    /// An empty script always yields [`Direction::Right`].
    pub fn new(script: impl Into<Vec<Direction>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }
}

impl DirectionSource for ScriptedDirections {
    fn next_direction(&mut self) -> Direction {
        let Some(direction) = self.script.get(self.cursor % self.script.len().max(1)).copied() else {
            return Direction::Right;
        };
        self.cursor += 1;
        direction
    }
}
