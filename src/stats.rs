//! Summary metrics
//!
//! Headline fields always describe the first trajectory. When a response holds
//! several trajectories, each also gets one row in the stats table.

use crate::consts::PLACEHOLDER;
use crate::model::{SimulationResponse, SimulationResult};
use crate::presenter::{Field, Presenter};

pub fn meters(n: f64) -> String {
    format!("{:.2} m", n)
}

pub fn seconds(n: f64) -> String {
    format!("{:.2} s", n)
}

/// One table row: `"45°: 10.20 m · 2.89 s · 40.82 m"`
pub fn summary_row(result: &SimulationResult) -> String {
    format!(
        "{}°: {} · {} · {}",
        result.angle,
        meters(result.stats.max_height),
        seconds(result.stats.time_of_flight),
        meters(result.stats.range)
    )
}

#[derive(Debug, Default, Clone)]
pub struct StatsPresenter {
    rows_written: usize,
}

impl StatsPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the summary for `response`
    pub fn present(&mut self, response: &SimulationResponse, presenter: &mut dyn Presenter) {
        let Some(first) = response.results.first() else {
            self.clear(presenter);
            return;
        };
        presenter.set_text(Field::StatHeight, &meters(first.stats.max_height));
        presenter.set_text(Field::StatTime, &seconds(first.stats.time_of_flight));
        presenter.set_text(Field::StatRange, &meters(first.stats.range));

        let rows = if response.results.len() > 1 {
            response.results.len()
        } else {
            0
        };
        for (i, r) in response.results.iter().take(rows).enumerate() {
            presenter.set_text(Field::StatRow(i), &summary_row(r));
            presenter.set_visible(Field::StatRow(i), true);
        }
        self.clear_rows_from(rows, presenter);
        self.rows_written = rows;
    }

    /// Placeholders everywhere, table emptied
    pub fn clear(&mut self, presenter: &mut dyn Presenter) {
        presenter.set_text(Field::StatHeight, PLACEHOLDER);
        presenter.set_text(Field::StatTime, PLACEHOLDER);
        presenter.set_text(Field::StatRange, PLACEHOLDER);
        self.clear_rows_from(0, presenter);
        self.rows_written = 0;
    }

    fn clear_rows_from(&self, start: usize, presenter: &mut dyn Presenter) {
        for i in start..self.rows_written {
            presenter.set_text(Field::StatRow(i), "");
            presenter.set_visible(Field::StatRow(i), false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::response;
    use crate::presenter::MemoryPresenter;

    #[test]
    fn test_unit_formatting() {
        assert_eq!(meters(10.204), "10.20 m");
        assert_eq!(seconds(2.0), "2.00 s");
        assert_eq!(meters(0.005), "0.01 m");
    }

    #[test]
    fn test_single_trajectory_writes_one_row() {
        let mut presenter = MemoryPresenter::new();
        let mut stats = StatsPresenter::new();
        stats.present(&response(&[(45.0, 4)]), &mut presenter);

        assert_eq!(presenter.text(Field::StatHeight), Some("3.00 m"));
        assert_eq!(presenter.text(Field::StatTime), Some("0.06 s"));
        assert_eq!(presenter.text(Field::StatRange), Some("3.00 m"));
        assert!(presenter.stat_rows().is_empty());
    }

    #[test]
    fn test_multiple_trajectories_get_a_row_each() {
        let mut presenter = MemoryPresenter::new();
        let mut stats = StatsPresenter::new();
        stats.present(&response(&[(30.0, 4), (45.0, 4), (60.0, 4)]), &mut presenter);

        let rows = presenter.stat_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], "30°: 3.00 m · 0.06 s · 3.00 m");
        assert!(rows[2].starts_with("60°"));

        // A smaller response clears the leftover rows
        stats.present(&response(&[(15.0, 4), (20.0, 4)]), &mut presenter);
        assert_eq!(presenter.stat_rows().len(), 2);
        assert_eq!(presenter.is_visible(Field::StatRow(2)), Some(false));
    }

    #[test]
    fn test_clear_restores_placeholders() {
        let mut presenter = MemoryPresenter::new();
        let mut stats = StatsPresenter::new();
        stats.present(&response(&[(30.0, 4), (45.0, 4)]), &mut presenter);
        stats.clear(&mut presenter);

        assert_eq!(presenter.text(Field::StatHeight), Some(PLACEHOLDER));
        assert_eq!(presenter.text(Field::StatRange), Some(PLACEHOLDER));
        assert!(presenter.stat_rows().is_empty());
    }
}
