/// Legend as a control surface
///
/// Every entry carries the id of its series, so picks never depend on
/// legend position.

use super::event::PointerButton;
use crate::config::ChartConfig;
use crate::data::series::{DisplayMode, SeriesError, SeriesId, SeriesStore};

/// What part of a legend entry was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    Glyph(SeriesId),
    Label(SeriesId),
}

impl PickTarget {
    pub fn id(&self) -> SeriesId {
        match self {
            PickTarget::Glyph(id) | PickTarget::Label(id) => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub id: SeriesId,
    /// Label as displayed, prefixed when selected
    pub text: String,
    pub selected: bool,
    /// Hidden series stay listed but dimmed
    pub dimmed: bool,
    pub alpha: f32,
    pub color_index: usize,
}

/// Choice made in the per-series context menu
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegendMenuAction {
    Delete,
    /// Replaces the scale factor
    SetScale(f64),
    SetDisplayMode(DisplayMode),
}

/// Effect of a pick on the store
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickOutcome {
    VisibilityChanged { id: SeriesId, visible: bool },
    SelectionChanged(Option<SeriesId>),
    OpenMenu(SeriesId),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct LegendController {
    selection_prefix: String,
    dimmed_alpha: f32,
}

impl LegendController {
    pub fn new(config: &ChartConfig) -> Self {
        Self {
            selection_prefix: config.selection_prefix.clone(),
            dimmed_alpha: config.dimmed_alpha,
        }
    }

    /// Legend entries in store order; `None` when there is nothing to list
    pub fn entries(&self, store: &SeriesStore) -> Option<Vec<LegendEntry>> {
        if store.is_empty() {
            return None;
        }
        let selected = store.selected();
        Some(
            store
                .list()
                .iter()
                .map(|series| {
                    let is_selected = selected == Some(series.id());
                    let text = if is_selected {
                        format!("{}{}", self.selection_prefix, series.label())
                    } else {
                        series.label().to_string()
                    };
                    LegendEntry {
                        id: series.id(),
                        text,
                        selected: is_selected,
                        dimmed: !series.visible(),
                        alpha: if series.visible() { 1.0 } else { self.dimmed_alpha },
                        color_index: series.color_index(),
                    }
                })
                .collect(),
        )
    }

    pub fn handle_pick(
        &self,
        store: &mut SeriesStore,
        target: PickTarget,
        button: PointerButton,
    ) -> Result<PickOutcome, SeriesError> {
        match (button, target) {
            (PointerButton::Primary, PickTarget::Glyph(id)) => {
                let visible = !store.get(id).ok_or(SeriesError::NotFound(id))?.visible();
                store.set_visible(id, visible)?;
                Ok(PickOutcome::VisibilityChanged { id, visible })
            }
            (PointerButton::Primary, PickTarget::Label(id)) => {
                let selection = if store.selected() == Some(id) {
                    None
                } else {
                    Some(id)
                };
                store.select(selection)?;
                Ok(PickOutcome::SelectionChanged(selection))
            }
            (PointerButton::Secondary, PickTarget::Label(id)) => {
                if store.get(id).is_none() {
                    return Err(SeriesError::NotFound(id));
                }
                Ok(PickOutcome::OpenMenu(id))
            }
            // no action bound to glyph right-click yet
            (PointerButton::Secondary, PickTarget::Glyph(_)) => Ok(PickOutcome::Ignored),
            (PointerButton::Middle, _) => Ok(PickOutcome::Ignored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn store_with(n: usize) -> (SeriesStore, Vec<SeriesId>) {
        let mut store = SeriesStore::new();
        let ids = (0..n)
            .map(|i| {
                store
                    .add(
                        vec![0.0, 1.0],
                        vec![Complex64::new(1.0, 0.0); 2],
                        format!("s{}", i),
                    )
                    .unwrap()
            })
            .collect();
        (store, ids)
    }

    #[test]
    fn test_empty_store_has_no_legend() {
        let legend = LegendController::new(&ChartConfig::default());
        assert!(legend.entries(&SeriesStore::new()).is_none());
    }

    #[test]
    fn test_label_pick_toggles_selection() {
        let legend = LegendController::new(&ChartConfig::default());
        let (mut store, ids) = store_with(2);

        let outcome = legend
            .handle_pick(&mut store, PickTarget::Label(ids[0]), PointerButton::Primary)
            .unwrap();
        assert_eq!(outcome, PickOutcome::SelectionChanged(Some(ids[0])));
        let entries = legend.entries(&store).unwrap();
        assert_eq!(entries[0].text, "*s0");
        assert_eq!(entries[1].text, "s1");

        legend
            .handle_pick(&mut store, PickTarget::Label(ids[1]), PointerButton::Primary)
            .unwrap();
        let entries = legend.entries(&store).unwrap();
        assert_eq!(entries[0].text, "s0");
        assert_eq!(entries[1].text, "*s1");

        let outcome = legend
            .handle_pick(&mut store, PickTarget::Label(ids[1]), PointerButton::Primary)
            .unwrap();
        assert_eq!(outcome, PickOutcome::SelectionChanged(None));
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_glyph_pick_toggles_visibility() {
        let legend = LegendController::new(&ChartConfig::default());
        let (mut store, ids) = store_with(1);
        legend
            .handle_pick(&mut store, PickTarget::Glyph(ids[0]), PointerButton::Primary)
            .unwrap();
        let entry = &legend.entries(&store).unwrap()[0];
        assert!(entry.dimmed);
        assert!((entry.alpha - 0.2).abs() < 1e-6);

        legend
            .handle_pick(&mut store, PickTarget::Glyph(ids[0]), PointerButton::Primary)
            .unwrap();
        assert!(!legend.entries(&store).unwrap()[0].dimmed);
    }

    #[test]
    fn test_right_clicks() {
        let legend = LegendController::new(&ChartConfig::default());
        let (mut store, ids) = store_with(1);
        assert_eq!(
            legend
                .handle_pick(&mut store, PickTarget::Label(ids[0]), PointerButton::Secondary)
                .unwrap(),
            PickOutcome::OpenMenu(ids[0])
        );
        assert_eq!(
            legend
                .handle_pick(&mut store, PickTarget::Glyph(ids[0]), PointerButton::Secondary)
                .unwrap(),
            PickOutcome::Ignored
        );
    }

    #[test]
    fn test_stale_pick_is_not_found() {
        let legend = LegendController::new(&ChartConfig::default());
        let (mut store, ids) = store_with(1);
        store.remove(ids[0]).unwrap();
        let result = legend.handle_pick(&mut store, PickTarget::Glyph(ids[0]), PointerButton::Primary);
        assert_eq!(result, Err(SeriesError::NotFound(ids[0])));
    }
}
