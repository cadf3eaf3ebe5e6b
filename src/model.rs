//! Quiz round model shared by all map modes.
//! The region list itself lives in `data`; this reducer only tracks indices.

use std::collections::HashMap;
use std::rc::Rc;
use yew::Reducible;

/// How long the wrong-guess toast stays up.
pub const WRONG_FLASH_MS: i32 = 2000;
/// How long a skipped region pulses before the round moves on.
pub const SKIP_REVEAL_MS: i32 = 2000;

/// State of one quiz round over a fixed region order.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizState {
    /// Region indices into the active dataset, in prompt order.
    pub order: Vec<usize>,
    /// Position of the current prompt within `order`.
    pub position: usize,
    /// Correctly answered prompts so far.
    pub score: u32,
    /// Attempts each solved region took (1 = first try).
    pub solved: HashMap<usize, u32>,
    /// Wrong guesses on the current prompt.
    pub current_attempts: u32,
    /// Most recent wrong guess; the host toasts its name until the timer clears it.
    pub wrong_flash: Option<usize>,
    /// Region revealed after a skip; guessing is paused while set.
    pub skip_pulse: Option<usize>,
    pub game_over: bool,
}

impl QuizState {
    pub fn new(order: Vec<usize>) -> Self {
        Self {
            order,
            position: 0,
            score: 0,
            solved: HashMap::new(),
            current_attempts: 0,
            wrong_flash: None,
            skip_pulse: None,
            game_over: false,
        }
    }

    /// The region currently asked for, unless the round is over.
    pub fn current(&self) -> Option<usize> {
        if self.game_over {
            return None;
        }
        self.order.get(self.position).copied()
    }

    pub fn total(&self) -> usize {
        self.order.len()
    }

    /// Fill for a region tile. Only solved regions are colored; a skipped
    /// region goes back to the default fill once its reveal ends.
    pub fn fill_color(&self, region: usize) -> &'static str {
        match self.solved.get(&region) {
            Some(1) => "#00FF00",
            Some(2) => "#8ec961",
            Some(3) => "#fff200",
            Some(_) => "#FF0000",
            None => "#D6D6DA",
        }
    }

    fn advance(&mut self) {
        self.current_attempts = 0;
        if self.position + 1 < self.order.len() {
            self.position += 1;
        } else {
            self.game_over = true;
        }
    }
}

// ---------------- Reducer & actions -----------------

#[derive(Clone, Debug)]
pub enum QuizAction {
    /// Start over with a freshly shuffled order.
    Restart { order: Vec<usize> },
    /// A region tile was clicked. The host only dispatches this when the
    /// viewport's click suppression is off.
    Guess { region: usize },
    /// Give up on the current prompt and reveal it.
    Skip,
    /// The skip reveal timer fired.
    FinishSkip,
    /// The wrong-guess toast timer fired.
    ClearWrongFlash,
}

impl Reducible for QuizState {
    type Action = QuizAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use QuizAction::*;
        let mut new = (*self).clone();
        match action {
            Restart { order } => {
                new = QuizState::new(order);
            }
            Guess { region } => {
                if new.game_over || new.skip_pulse.is_some() {
                    return self;
                }
                let Some(current) = new.current() else { return self };
                if region == current {
                    new.solved.insert(region, new.current_attempts + 1);
                    new.score += 1;
                    new.advance();
                } else {
                    new.current_attempts += 1;
                    new.wrong_flash = Some(region);
                }
            }
            Skip => {
                if new.game_over || new.skip_pulse.is_some() {
                    return self;
                }
                let Some(current) = new.current() else { return self };
                new.skip_pulse = Some(current);
            }
            FinishSkip => {
                if new.skip_pulse.take().is_none() {
                    return self;
                }
                new.advance();
            }
            ClearWrongFlash => {
                new.wrong_flash = None;
            }
        }
        Rc::new(new)
    }
}
