#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! March controller that walks the follow column into the sanctuary.

use sanctuary_core::{Command, Event, Phase};

/// Pure system emitting one march step per tick while the column marches.
#[derive(Debug, Default)]
pub struct March {
    marching: bool,
}

impl March {
    /// Creates an idle march controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether the column is currently marching.
    #[must_use]
    pub const fn is_marching(&self) -> bool {
        self.marching
    }

    /// Consumes world events and emits march steps.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::PhaseChanged { phase } => {
                    self.marching = *phase == Phase::GoToSanctuary;
                }
                Event::MarchHalted => self.marching = false,
                Event::TimeAdvanced { .. } if self.marching => out.push(Command::MarchStep),
                _ => {}
            }
        }
    }
}
