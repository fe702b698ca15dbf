use std::collections::HashMap;
/// Remembers which figures already have their grid drawn.
///
/// Plain owned state: share a registry between threads only behind a lock.
#[derive(Clone, Debug, Default)]
pub struct FigureRegistry {
    grids: HashMap<u32, bool>,
}
impl FigureRegistry {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn activate_grid(&mut self, figure_id: u32) {
        self.grids.insert(figure_id, true);
    }
    /// Unseen figures are registered with the grid off.
    pub fn check_active_grid(&mut self, figure_id: u32) -> bool {
        *self.grids.entry(figure_id).or_insert(false)
    }
    pub fn contains(&self, figure_id: u32) -> bool {
        self.grids.contains_key(&figure_id)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn new_figures_start_without_grid() {
        let mut registry = FigureRegistry::new();
        assert!(!registry.contains(4));
        assert!(!registry.check_active_grid(4));
        assert!(registry.contains(4));
    }
    #[test]
    fn activation_is_per_figure() {
        let mut registry = FigureRegistry::new();
        registry.activate_grid(1);
        assert!(registry.check_active_grid(1));
        assert!(!registry.check_active_grid(2));
        registry.activate_grid(1);
        assert!(registry.check_active_grid(1));
    }
}
