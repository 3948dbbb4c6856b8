use std::collections::HashSet;

use crate::models::{Grid, Position};

/// Result of checking a selection against the target words
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    NoMatchYet,
    Matched(String),
}

/// Turns the cells a player clicked into a word and checks it against the
/// words hidden in the current grid.
#[derive(Debug, Clone)]
pub struct SelectionMatcher {
    targets: HashSet<String>,
}

impl SelectionMatcher {
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    /// Append a clicked cell. Clicking the same cell twice records it twice.
    pub fn extend(mut selection: Vec<Position>, cell: Position) -> Vec<Position> {
        selection.push(cell);
        selection
    }

    /// Read the letters under the selection, in click order.
    /// Returns None if any cell is off the grid.
    pub fn extract_word(grid: &Grid, selection: &[Position]) -> Option<String> {
        selection.iter().map(|pos| grid.letter_at(*pos)).collect()
    }

    /// Check the selection for an exact, order-sensitive match.
    ///
    /// A single cell never matches, even for one-letter targets: a word needs
    /// at least two clicks. Selecting a word back to front spells it backwards
    /// and does not match.
    pub fn resolve(&self, grid: &Grid, selection: &[Position]) -> MatchOutcome {
        if selection.len() < 2 {
            return MatchOutcome::NoMatchYet;
        }

        match Self::extract_word(grid, selection) {
            Some(candidate) if self.targets.contains(&candidate) => {
                MatchOutcome::Matched(candidate)
            }
            _ => MatchOutcome::NoMatchYet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat_grid() -> Grid {
        Grid::from_rows(vec![
            vec!['C', 'A', 'T'],
            vec!['D', 'O', 'G'],
            vec!['X', 'Y', 'Z'],
        ])
    }

    fn cells(coords: &[(usize, usize)]) -> Vec<Position> {
        coords.iter().map(|(r, c)| Position::new(*r, *c)).collect()
    }

    #[test]
    fn test_extend_keeps_duplicates() {
        let selection = SelectionMatcher::extend(Vec::new(), Position::new(0, 0));
        let selection = SelectionMatcher::extend(selection, Position::new(0, 0));
        assert_eq!(selection, cells(&[(0, 0), (0, 0)]));
    }

    #[test]
    fn test_forward_selection_matches() {
        let matcher = SelectionMatcher::new(["CAT", "DOG"]);
        let outcome = matcher.resolve(&cat_grid(), &cells(&[(0, 0), (0, 1), (0, 2)]));
        assert_eq!(outcome, MatchOutcome::Matched("CAT".to_string()));
    }

    #[test]
    fn test_reverse_selection_does_not_match() {
        let matcher = SelectionMatcher::new(["CAT", "DOG"]);
        let outcome = matcher.resolve(&cat_grid(), &cells(&[(0, 2), (0, 1), (0, 0)]));
        assert_eq!(outcome, MatchOutcome::NoMatchYet);
    }

    #[test]
    fn test_single_cell_never_matches() {
        let matcher = SelectionMatcher::new(["C"]);
        let outcome = matcher.resolve(&cat_grid(), &cells(&[(0, 0)]));
        assert_eq!(outcome, MatchOutcome::NoMatchYet);
    }

    #[test]
    fn test_cells_need_not_be_in_a_line() {
        // Only the spelled letters matter, not the shape of the selection
        let matcher = SelectionMatcher::new(["COG"]);
        let outcome = matcher.resolve(&cat_grid(), &cells(&[(0, 0), (1, 1), (1, 2)]));
        assert_eq!(outcome, MatchOutcome::Matched("COG".to_string()));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let matcher = SelectionMatcher::new(["DOG"]);
        let grid = cat_grid();
        let selection = cells(&[(1, 0), (1, 1)]);
        let first = matcher.resolve(&grid, &selection);
        let second = matcher.resolve(&grid, &selection);
        assert_eq!(first, second);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_extract_word() {
        let grid = cat_grid();
        assert_eq!(
            SelectionMatcher::extract_word(&grid, &cells(&[(1, 0), (1, 1), (1, 2)])),
            Some("DOG".to_string())
        );
        assert_eq!(
            SelectionMatcher::extract_word(&grid, &cells(&[(1, 0), (3, 3)])),
            None
        );
    }
}
