use crate::layout::Layout;

/// One committed gesture: the unit of undo/redo.
///
/// Steps are only ever created by [`History::add_step`], which hands out
/// contiguous 1-based indices, so a step index always equals the step's
/// position in the ledger plus one.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStep {
    index: usize,
    layouts: Vec<Layout>,
}

impl HistoryStep {
    /// Step index, 1-based.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Layouts in the order they were drawn.
    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }
}

/// Step-indexed undo/redo ledger over committed gestures.
///
/// `current` selects how much of the ledger is applied: 0 is the blank
/// canvas (even when redo steps exist ahead), `last_step_index()` is
/// everything committed.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Applied step index, always within `0..=steps.len()`.
    current: usize,
    /// Committed steps, ascending by index, contiguous from 1.
    steps: Vec<HistoryStep>,
}

impl History {
    /// Creates an empty ledger at step 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits `layouts` as the step after `current`.
    ///
    /// Steps ahead of `current` (the stale redo branch) are discarded first,
    /// so redo availability ends the moment a new step lands after an undo.
    pub fn add_step(&mut self, layouts: Vec<Layout>) {
        self.steps.truncate(self.current);
        let index = self.current + 1;
        self.steps.push(HistoryStep { index, layouts });
        self.current = index;
    }

    /// Moves one step back, floor 0. Returns whether the step moved.
    pub fn undo(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Moves one step forward, ceiling the last committed step. Returns
    /// whether the step moved.
    pub fn redo(&mut self) -> bool {
        if self.current >= self.steps.len() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Applied step index; 0 means nothing is applied.
    pub fn current_step(&self) -> usize {
        self.current
    }

    /// Highest committed step index, or 0 when the ledger is empty.
    pub fn last_step_index(&self) -> usize {
        self.steps.len()
    }

    /// All steps with index `<= step`, ascending: the replay set for a
    /// render. Concatenating their layouts reproduces the committed draw
    /// order exactly.
    pub fn steps_up_to(&self, step: usize) -> &[HistoryStep] {
        &self.steps[..step.min(self.steps.len())]
    }

    /// Replay set for the applied step.
    pub fn current_steps(&self) -> &[HistoryStep] {
        self.steps_up_to(self.current)
    }

    /// Returns true if a step can be undone.
    pub fn can_undo(&self) -> bool {
        self.current > 0
    }

    /// Returns true if an undone step can be reapplied.
    pub fn can_redo(&self) -> bool {
        self.current < self.steps.len()
    }

    /// Resets to the empty ledger at step 0.
    pub fn clear(&mut self) {
        self.steps.clear();
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Tool;
    use egui::pos2;

    fn step_layouts(n: usize) -> Vec<Layout> {
        (0..n)
            .map(|i| {
                let at = pos2(i as f32, i as f32);
                Layout::closed(Tool::Line, at, pos2(at.x + 1.0, at.y))
            })
            .collect()
    }

    #[test]
    fn test_commits_number_steps_contiguously() {
        let mut history = History::new();
        for _ in 0..4 {
            history.add_step(step_layouts(1));
        }
        assert_eq!(history.last_step_index(), 4);
        let indices: Vec<usize> = history.steps_up_to(4).iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_undo_floors_at_zero() {
        let mut history = History::new();
        history.add_step(step_layouts(1));
        assert!(history.undo());
        assert!(!history.undo());
        assert_eq!(history.current_step(), 0);
        assert!(history.steps_up_to(history.current_step()).is_empty());
    }

    #[test]
    fn test_redo_ceilings_at_last_step() {
        let mut history = History::new();
        history.add_step(step_layouts(1));
        history.add_step(step_layouts(1));
        history.undo();
        assert!(history.redo());
        assert!(!history.redo());
        assert_eq!(history.current_step(), 2);
    }

    #[test]
    fn test_undo_redo_round_trip_is_element_wise_stable() {
        let mut history = History::new();
        for n in 1..=3 {
            history.add_step(step_layouts(n));
        }
        let before: Vec<HistoryStep> = history.current_steps().to_vec();
        for _ in 0..3 {
            history.undo();
        }
        for _ in 0..3 {
            history.redo();
        }
        assert_eq!(history.current_step(), 3);
        assert_eq!(history.current_steps(), &before[..]);
    }

    #[test]
    fn test_add_step_discards_stale_redo_branch() {
        let mut history = History::new();
        for _ in 0..3 {
            history.add_step(step_layouts(1));
        }
        history.undo();
        history.undo();
        history.add_step(step_layouts(2));
        assert_eq!(history.current_step(), 2);
        assert_eq!(history.last_step_index(), 2);
        assert!(!history.redo());
        assert_eq!(history.current_steps().last().map(|s| s.layouts().len()), Some(2));
    }

    #[test]
    fn test_step_zero_means_blank_even_with_redo_ahead() {
        let mut history = History::new();
        history.add_step(step_layouts(1));
        history.undo();
        assert_eq!(history.current_step(), 0);
        assert_eq!(history.last_step_index(), 1);
        assert!(history.current_steps().is_empty());
        assert!(history.can_redo());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_clear_resets_to_empty() {
        let mut history = History::new();
        history.add_step(step_layouts(1));
        history.clear();
        assert_eq!(history.current_step(), 0);
        assert_eq!(history.last_step_index(), 0);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
