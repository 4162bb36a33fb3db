use eframe::egui::Color32;

use crate::geotag::WriteOutcome;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    AllSucceeded,
    AllFailed,
    Partial { succeeded: usize, total: usize },
}

impl Outcome {
    pub fn from_results(results: &[WriteOutcome]) -> Self {
        let total = results.len();
        let succeeded = results.iter().filter(|r| r.success).count();
        if succeeded == total {
            Outcome::AllSucceeded
        } else if succeeded == 0 {
            Outcome::AllFailed
        } else {
            Outcome::Partial { succeeded, total }
        }
    }

    pub fn message(&self) -> String {
        match self {
            Outcome::AllSucceeded => "All coordinates written successfully!".to_string(),
            Outcome::AllFailed => "Writing failed for every image!".to_string(),
            Outcome::Partial { succeeded, total } => {
                format!("Some writes failed. {succeeded}/{total} images updated")
            }
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Outcome::AllSucceeded => "✔",
            Outcome::AllFailed => "✖",
            Outcome::Partial { .. } => "⚠",
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            Outcome::AllSucceeded => Color32::from_rgb(34, 197, 94),
            Outcome::AllFailed => Color32::from_rgb(239, 68, 68),
            Outcome::Partial { .. } => Color32::from_rgb(234, 179, 8),
        }
    }
}

/// Keeps the last batch result until the dialog is dismissed.
#[derive(Default, Debug)]
pub struct ResultPresenter {
    last: Option<Vec<WriteOutcome>>,
}

impl ResultPresenter {
    pub fn show(&mut self, results: Vec<WriteOutcome>) {
        self.last = Some(results);
    }

    pub fn dismiss(&mut self) {
        self.last = None;
    }

    pub fn is_visible(&self) -> bool {
        self.last.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.last.as_deref().map(Outcome::from_results)
    }

    pub fn results(&self) -> Option<&[WriteOutcome]> {
        self.last.as_deref()
    }
}
