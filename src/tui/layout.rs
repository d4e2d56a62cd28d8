/// Width breakpoints for layout decisions.
///
/// Single source of truth for width thresholds: render code asks the
/// breakpoint instead of comparing widths itself.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Breakpoint {
    /// < 80 cols: every section stacked in one column
    Narrow,
    /// 80-139 cols: form left, activity right
    Normal,
    /// 140+ cols: profiles get their own column
    Wide,
}

impl Breakpoint {
    pub fn from_width(width: u16) -> Self {
        match width {
            0..=79 => Breakpoint::Narrow,
            80..=139 => Breakpoint::Normal,
            _ => Breakpoint::Wide,
        }
    }

    /// Check if at least this breakpoint (inclusive)
    pub fn at_least(&self, min: Breakpoint) -> bool {
        *self >= min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_thresholds() {
        assert_eq!(Breakpoint::from_width(40), Breakpoint::Narrow);
        assert_eq!(Breakpoint::from_width(79), Breakpoint::Narrow);
        assert_eq!(Breakpoint::from_width(80), Breakpoint::Normal);
        assert_eq!(Breakpoint::from_width(139), Breakpoint::Normal);
        assert_eq!(Breakpoint::from_width(140), Breakpoint::Wide);
    }

    #[test]
    fn at_least_comparisons() {
        let normal = Breakpoint::Normal;
        assert!(normal.at_least(Breakpoint::Narrow));
        assert!(normal.at_least(Breakpoint::Normal));
        assert!(!normal.at_least(Breakpoint::Wide));
    }
}
