//! Row summary line ("Viewing rows 1 through 10 of 20").

use serde::Deserialize;

use crate::types::SummaryOption;

const DEFAULT_TEMPLATE: &str = "Viewing rows {start} through {end} of {total}";

/// A row laid out by the virtualizer: view index, top offset and height in
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct VirtualRow {
    pub index: usize,
    pub start: f64,
    pub size: f64,
}

impl VirtualRow {
    fn middle(&self) -> f64 {
        self.start + self.size / 2.0
    }
}

/// Scroll geometry of the grid container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_top: f64,
    pub client_height: f64,
    /// Height of the sticky header, which hides rows beneath it
    pub header_height: f64,
}

/// Substitute `{start}`, `{end}` and `{total}` in `template`.
pub fn format_summary(template: &str, start: usize, end: usize, total: usize) -> String {
    template
        .replace("{start}", &start.to_string())
        .replace("{end}", &end.to_string())
        .replace("{total}", &total.to_string())
}

/// First and last item whose midpoint lies inside `[top, bottom]`.
///
/// Items must be in layout order. Scanning stops at the first item past
/// `bottom`.
pub fn find_range_index(top: f64, bottom: f64, rows: &[VirtualRow]) -> Option<(usize, usize)> {
    let mut range: Option<(usize, usize)> = None;
    for (i, row) in rows.iter().enumerate() {
        match range {
            None => {
                if row.middle() >= top {
                    range = Some((i, i));
                }
            }
            Some((first, _)) => {
                if row.middle() <= bottom {
                    range = Some((first, i));
                } else {
                    break;
                }
            }
        }
    }
    range
}

/// Summary text for the rows currently in view, or `None` when the summary
/// is disabled or every row is visible.
pub fn summary_message(
    option: &SummaryOption,
    viewport: Viewport,
    rows: &[VirtualRow],
    nrows: usize,
) -> Option<String> {
    let template = match option {
        SummaryOption::Enabled(false) => return None,
        SummaryOption::Enabled(true) => DEFAULT_TEMPLATE,
        SummaryOption::Template(t) => t.as_str(),
    };

    let top = viewport.scroll_top + viewport.header_height;
    let bottom = viewport.scroll_top + viewport.client_height;
    let (first, last) = find_range_index(top, bottom, rows)?;
    let first = rows.get(first)?;
    let last = rows.get(last)?;

    if first.index == 0 && last.index + 1 == nrows {
        return None;
    }
    Some(format_summary(template, first.index + 1, last.index + 1, nrows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize, height: f64) -> Vec<VirtualRow> {
        (0..n)
            .map(|index| VirtualRow {
                index,
                start: index as f64 * height,
                size: height,
            })
            .collect()
    }

    #[test]
    fn template_tokens() {
        assert_eq!(
            format_summary(DEFAULT_TEMPLATE, 1, 10, 20),
            "Viewing rows 1 through 10 of 20"
        );
        assert_eq!(format_summary("{end}/{total}", 1, 5, 9), "5/9");
    }

    #[test]
    fn visible_window_is_reported() {
        let viewport = Viewport {
            scroll_top: 0.0,
            client_height: 330.0,
            header_height: 30.0,
        };
        // rows are laid out below the header
        let layout: Vec<VirtualRow> = rows(20, 30.0)
            .into_iter()
            .map(|r| VirtualRow {
                start: r.start + 30.0,
                ..r
            })
            .collect();
        let msg = summary_message(&SummaryOption::default(), viewport, &layout, 20);
        assert_eq!(msg.as_deref(), Some("Viewing rows 1 through 10 of 20"));
    }

    #[test]
    fn hidden_when_everything_fits() {
        let viewport = Viewport {
            scroll_top: 0.0,
            client_height: 1000.0,
            header_height: 0.0,
        };
        assert!(summary_message(&SummaryOption::default(), viewport, &rows(5, 30.0), 5).is_none());
    }

    #[test]
    fn disabled_summary() {
        let viewport = Viewport {
            scroll_top: 0.0,
            client_height: 60.0,
            header_height: 0.0,
        };
        let opt = SummaryOption::Enabled(false);
        assert!(summary_message(&opt, viewport, &rows(50, 30.0), 50).is_none());
    }

    #[test]
    fn custom_template() {
        let viewport = Viewport {
            scroll_top: 300.0,
            client_height: 300.0,
            header_height: 0.0,
        };
        let opt = SummaryOption::Template("{start}-{end} of {total}".into());
        let msg = summary_message(&opt, viewport, &rows(50, 30.0), 50);
        assert_eq!(msg.as_deref(), Some("11-20 of 50"));
    }
}
