//! The user's drill-down position: selected year, month and day.

use crate::partition::days_in_month;
use crate::views::month_no_from_string;
use crate::Result;
use anyhow::bail;
use serde::Serialize;

/// The currently selected year, month and day. `month == 0` means the whole
/// year, `day == 0` the whole month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Selection {
    year: i32,
    month: u32,
    day: u32,
}

impl Selection {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            month: 0,
            day: 0,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn has_valid_month(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    pub fn has_valid_day(&self) -> bool {
        self.has_valid_month() && self.day >= 1 && self.day <= days_in_month(self.year, self.month)
    }

    /// Drops the month/day drill-down, keeping the year.
    pub fn reset_drill_down(&mut self) {
        self.month = 0;
        self.day = 0;
    }

    /// Applies a chart or table label to the selection.
    ///
    /// Labels are what the presentation layer has: a numeric label above 31
    /// is a year (which resets month and day), 1..=31 is a day, and a month
    /// name selects that month (which resets the day).
    pub fn apply_label(&mut self, label: &str) -> Result<()> {
        let label = label.trim();
        if label.is_empty() {
            bail!("an empty label cannot be applied to the selection");
        }

        if let Ok(number) = label.parse::<i64>() {
            if number > 31 {
                self.year = i32::try_from(number)
                    .map_err(|_| anyhow::anyhow!("[{number}] is not a plausible year"))?;
                self.month = 0;
                self.day = 0;
            } else if (1..=31).contains(&number) {
                self.day = number as u32;
            } else {
                bail!("numeric label [{number}] is neither a day nor a year");
            }
        } else if let Some(month) = month_no_from_string(label) {
            self.month = month;
            // A new month invalidates the previously selected day.
            self.day = 0;
        } else {
            bail!("label [{label}] is neither a day, a year nor a month name");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_label_resets_drill_down() {
        let mut selection = Selection::new(2016);
        selection.apply_label("September").unwrap();
        selection.apply_label("21").unwrap();

        selection.apply_label("2017").unwrap();
        assert_eq!(selection, Selection::new(2017));
    }

    #[test]
    fn test_day_label() {
        let mut selection = Selection::new(2016);
        selection.apply_label("March").unwrap();
        selection.apply_label("14").unwrap();
        assert_eq!(selection.month(), 3);
        assert_eq!(selection.day(), 14);
        assert!(selection.has_valid_day());
    }

    #[test]
    fn test_month_label_resets_day() {
        let mut selection = Selection::new(2016);
        selection.apply_label("March").unwrap();
        selection.apply_label("14").unwrap();
        selection.apply_label("April").unwrap();
        assert_eq!(selection.month(), 4);
        assert_eq!(selection.day(), 0);
    }

    #[test]
    fn test_invalid_labels() {
        let mut selection = Selection::new(2016);
        assert!(selection.apply_label("").is_err());
        assert!(selection.apply_label("Smarch").is_err());
        assert!(selection.apply_label("0").is_err());
        assert!(selection.apply_label("-3").is_err());
        // Failed labels leave the selection untouched.
        assert_eq!(selection, Selection::new(2016));
    }

    #[test]
    fn test_day_validity_respects_month_length() {
        let mut selection = Selection::new(2017);
        selection.apply_label("February").unwrap();
        selection.apply_label("29").unwrap();
        // 2017 is not a leap year.
        assert!(!selection.has_valid_day());

        let mut leap = Selection::new(2016);
        leap.apply_label("February").unwrap();
        leap.apply_label("29").unwrap();
        assert!(leap.has_valid_day());
    }

    #[test]
    fn test_no_month_means_no_valid_day() {
        let mut selection = Selection::new(2016);
        selection.apply_label("10").unwrap();
        assert!(!selection.has_valid_day());
        assert!(!selection.has_valid_month());
    }
}
