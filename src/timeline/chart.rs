//! Chart collaborator for the timeline.
//!
//! The refresh loop never draws; it hands grouped series to a
//! [`ChartSlot`], which disposes the previous chart instance before
//! creating the next one.

use super::{time_span, TrainSeries};

/// A rendered chart instance.
pub trait Chart: Send + Sync {
    /// Series this instance was built from
    fn series(&self) -> &[TrainSeries];

    /// Draw into text rows `width` cells wide.
    fn draw(&self, width: usize) -> Vec<String>;

    /// Release whatever the instance holds. Called exactly once.
    fn dispose(&mut self);
}

/// Builds chart instances.
pub trait ChartFactory: Send + Sync {
    fn create(&self, series: Vec<TrainSeries>) -> Box<dyn Chart>;
}

/// Holds the single live chart instance.
pub struct ChartSlot {
    factory: Box<dyn ChartFactory>,
    current: Option<Box<dyn Chart>>,
    renders: u64,
}

impl ChartSlot {
    pub fn new(factory: Box<dyn ChartFactory>) -> Self {
        Self {
            factory,
            current: None,
            renders: 0,
        }
    }

    /// Slot drawing text Gantt charts
    pub fn gantt() -> Self {
        Self::new(Box::new(GanttFactory))
    }

    /// Dispose the current instance, then build a new one from `series`.
    pub fn replace(&mut self, series: Vec<TrainSeries>) {
        if let Some(mut previous) = self.current.take() {
            previous.dispose();
        }
        self.current = Some(self.factory.create(series));
        self.renders += 1;
    }

    pub fn current(&self) -> Option<&dyn Chart> {
        self.current.as_deref()
    }

    /// Number of instances created so far
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

impl Drop for ChartSlot {
    fn drop(&mut self) {
        if let Some(mut chart) = self.current.take() {
            chart.dispose();
        }
    }
}

impl std::fmt::Debug for ChartSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartSlot")
            .field("has_chart", &self.current.is_some())
            .field("renders", &self.renders)
            .finish()
    }
}

/// Factory for [`GanttChart`]
#[derive(Debug, Default, Clone, Copy)]
pub struct GanttFactory;

impl ChartFactory for GanttFactory {
    fn create(&self, series: Vec<TrainSeries>) -> Box<dyn Chart> {
        Box::new(GanttChart::new(series))
    }
}

/// Horizontal bar chart drawn with block numbers as fill characters.
///
/// ```text
/// T1   |111222333                 |
/// T2   |   111111222222333333     |
///       0                     17.4
/// ```
#[derive(Debug, Clone)]
pub struct GanttChart {
    series: Vec<TrainSeries>,
    disposed: bool,
}

impl GanttChart {
    pub fn new(series: Vec<TrainSeries>) -> Self {
        Self {
            series,
            disposed: false,
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn label_width(&self) -> usize {
        self.series
            .iter()
            .map(|s| s.train.chars().count())
            .max()
            .unwrap_or(0)
            .max(4)
    }
}

impl Chart for GanttChart {
    fn series(&self) -> &[TrainSeries] {
        &self.series
    }

    fn draw(&self, width: usize) -> Vec<String> {
        let Some((lo, hi)) = time_span(&self.series) else {
            return vec!["(no timeline data)".to_string()];
        };
        let width = width.max(10);
        let span = if hi > lo { hi - lo } else { 1.0 };
        let label_width = self.label_width();

        let column = |t: f64| -> usize {
            let col = ((t - lo) / span * width as f64).floor() as usize;
            col.min(width - 1)
        };

        let mut rows = Vec::with_capacity(self.series.len() + 1);
        for series in &self.series {
            let mut track = vec![' '; width];
            for seg in &series.segments {
                let from = column(seg.start());
                let to = column(seg.end()).max(from);
                let fill = char::from_digit(seg.block % 10, 10).unwrap_or('#');
                for cell in &mut track[from..=to] {
                    *cell = fill;
                }
            }
            rows.push(format!(
                "{:<label_width$} |{}|",
                series.train,
                track.into_iter().collect::<String>()
            ));
        }

        let lo_label = format!("{}", lo);
        let hi_label = format!("{}", hi);
        let gap = (width + 2).saturating_sub(lo_label.len() + hi_label.len());
        rows.push(format!(
            "{:<label_width$} {}{}{}",
            "",
            lo_label,
            " ".repeat(gap),
            hi_label
        ));
        rows
    }

    fn dispose(&mut self) {
        self.series.clear();
        self.disposed = true;
    }
}
