use crate::domain::model::UsageWindow;

/// Expected DNS lookup load for an hour of the day.
pub fn predict_usage(hour: i64) -> UsageWindow {
    match hour {
        0..=5 => UsageWindow::Low,
        6..=11 => UsageWindow::Moderate,
        12..=17 => UsageWindow::High,
        18..=23 => UsageWindow::Moderate,
        _ => UsageWindow::Invalid,
    }
}
