use crate::error::{Cop1Error, Result};

/// Default FARM-1 sliding window width W.
pub const DEFAULT_WINDOW_WIDTH: u8 = 128;

/// Where a frame's sequence number falls relative to V(R).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    /// N(S) == V(R).
    Expected,
    /// Ahead of V(R) inside the positive window.
    Positive,
    /// Behind V(R) inside the negative window.
    Negative,
    /// Outside both windows.
    Lockout,
}

/// FARM-1 configuration.
///
/// The window width W splits the 256 sequence numbers around V(R): the
/// positive window covers `V(R)+1 ..= V(R)+W/2-1`, the negative window
/// covers `V(R)-W/2 ..= V(R)-1`, and everything else is the lockout area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Farm1Config {
    window_width: u8,
}

impl Farm1Config {
    /// Create a configuration. W must be even and within 2..=254.
    pub fn new(window_width: u8) -> Result<Self> {
        if window_width < 2 || window_width % 2 != 0 {
            return Err(Cop1Error::InvalidConfig(format!(
                "window width must be even and within 2..=254, got {window_width}"
            )));
        }
        Ok(Self { window_width })
    }

    /// Window width W.
    pub fn window_width(&self) -> u8 {
        self.window_width
    }

    /// Largest forward distance that requests a retransmit.
    pub fn positive_window(&self) -> u8 {
        self.window_width / 2 - 1
    }

    /// Largest backward distance that is discarded as a duplicate.
    pub fn negative_window(&self) -> u8 {
        self.window_width / 2
    }

    /// Classify a frame sequence number against V(R).
    pub fn classify(&self, seq: u8, expected: u8) -> WindowPosition {
        let d_fwd = seq.wrapping_sub(expected);
        let d_back = expected.wrapping_sub(seq);
        if d_fwd == 0 {
            WindowPosition::Expected
        } else if d_fwd <= self.positive_window() {
            WindowPosition::Positive
        } else if d_back <= self.negative_window() {
            WindowPosition::Negative
        } else {
            WindowPosition::Lockout
        }
    }
}

impl Default for Farm1Config {
    fn default() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_windows() {
        let config = Farm1Config::default();
        assert_eq!(config.window_width(), 128);
        assert_eq!(config.positive_window(), 63);
        assert_eq!(config.negative_window(), 64);
    }

    #[test]
    fn rejects_bad_widths() {
        for width in [0u8, 1, 3, 127, 255] {
            assert!(matches!(
                Farm1Config::new(width),
                Err(Cop1Error::InvalidConfig(_))
            ));
        }
        assert!(Farm1Config::new(2).is_ok());
        assert!(Farm1Config::new(254).is_ok());
    }

    #[test]
    fn classify_default_boundaries() {
        let config = Farm1Config::default();
        assert_eq!(config.classify(0, 0), WindowPosition::Expected);
        assert_eq!(config.classify(1, 0), WindowPosition::Positive);
        assert_eq!(config.classify(62, 0), WindowPosition::Positive);
        assert_eq!(config.classify(63, 0), WindowPosition::Positive);
        assert_eq!(config.classify(64, 0), WindowPosition::Lockout);
        assert_eq!(config.classify(191, 0), WindowPosition::Lockout);
        assert_eq!(config.classify(192, 0), WindowPosition::Negative);
        assert_eq!(config.classify(255, 0), WindowPosition::Negative);
        assert_eq!(config.classify(0, 100), WindowPosition::Lockout);
        assert_eq!(config.classify(36, 100), WindowPosition::Negative);
    }

    #[test]
    fn classify_wraps_around() {
        let config = Farm1Config::default();
        assert_eq!(config.classify(2, 250), WindowPosition::Positive);
        assert_eq!(config.classify(250, 2), WindowPosition::Negative);
    }

    #[test]
    fn smallest_window() {
        let config = Farm1Config::new(2).unwrap();
        assert_eq!(config.classify(1, 0), WindowPosition::Lockout);
        assert_eq!(config.classify(255, 0), WindowPosition::Negative);
        assert_eq!(config.classify(254, 0), WindowPosition::Lockout);
    }
}
