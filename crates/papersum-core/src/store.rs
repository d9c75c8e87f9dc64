use std::collections::BTreeSet;

use crate::Paper;

/// The latest search results plus the user's selection over them.
///
/// Selection is tracked by position, so it only makes sense against the list
/// it was made on: [`set_results`](PaperStore::set_results) always clears it.
#[derive(Debug, Clone, Default)]
pub struct PaperStore {
    papers: Vec<Paper>,
    selected: BTreeSet<usize>,
}

impl PaperStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the result set and clear the selection.
    pub fn set_results(&mut self, papers: Vec<Paper>) {
        self.papers = papers;
        self.selected.clear();
    }

    pub fn papers(&self) -> &[Paper] {
        &self.papers
    }

    pub fn get(&self, index: usize) -> Option<&Paper> {
        self.papers.get(index)
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }

    /// Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.papers.len() {
            self.selected.insert(index);
        }
    }

    pub fn deselect(&mut self, index: usize) {
        self.selected.remove(&index);
    }

    /// Flip the selection of `index`. Returns the new state.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.selected.contains(&index) {
            self.selected.remove(&index);
            false
        } else {
            self.select(index);
            self.selected.contains(&index)
        }
    }

    pub fn select_all(&mut self) {
        self.selected = (0..self.papers.len()).collect();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    /// Selected papers in ascending index order.
    pub fn selected_papers(&self) -> Vec<Paper> {
        self.selected
            .iter()
            .filter_map(|&i| self.papers.get(i))
            .cloned()
            .collect()
    }
}
