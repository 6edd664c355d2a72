/// How a session's step count moves before capturing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMove {
    Forward,
    Back,
    Reset,
    Stay,
}

impl StepMove {
    pub fn apply(self, steps: usize) -> usize {
        match self {
            StepMove::Forward => steps.saturating_add(1),
            StepMove::Back => steps.saturating_sub(1),
            StepMove::Reset => 0,
            StepMove::Stay => steps,
        }
    }
}
