/// One on-screen item as reported by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleItem {
    /// Position in the feed's item list.
    pub index: usize,
    /// Share of the item currently on screen, from 0.0 to 1.0.
    pub visible_fraction: f32,
}

impl VisibleItem {
    pub fn new(index: usize, visible_fraction: f32) -> Self {
        Self {
            index,
            visible_fraction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    Start { id: String },
    Stop { id: String },
}

/// The item that should play: the first in scroll order at or above `threshold`.
pub fn select_active(visible: &[VisibleItem], threshold: f32, len: usize) -> Option<usize> {
    visible
        .iter()
        .filter(|v| v.index < len && v.visible_fraction >= threshold)
        .map(|v| v.index)
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_in_scroll_order_wins() {
        let visible = [VisibleItem::new(4, 0.95), VisibleItem::new(3, 0.6)];
        assert_eq!(select_active(&visible, 0.5, 10), Some(3));
    }

    #[test]
    fn test_threshold_filters() {
        let visible = [VisibleItem::new(3, 0.6), VisibleItem::new(4, 0.95)];
        assert_eq!(select_active(&visible, 0.9, 10), Some(4));
        assert_eq!(select_active(&visible, 0.99, 10), None);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(select_active(&[VisibleItem::new(0, 0.5)], 0.5, 1), Some(0));
    }

    #[test]
    fn test_out_of_range_ignored() {
        let visible = [VisibleItem::new(7, 1.0)];
        assert_eq!(select_active(&visible, 0.5, 5), None);
        assert_eq!(select_active(&[], 0.5, 5), None);
    }
}
