//! Length units accepted in SVG dimensions.

use std::{fmt, str::FromStr};

/// A length unit suffix of an SVG dimension such as `210mm`.
///
/// The pixel sizes are the 90 dpi values used by documents that predate the
/// CSS 96 dpi convention. LaTeX output converted to SVG is always in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Em,
    Ex,
    #[default]
    Px,
    Pt,
    Pc,
    Cm,
    Mm,
    In,
}

impl LengthUnit {
    /// Every unit, in the order the dimension grammar tries them.
    pub const ALL: [LengthUnit; 8] = [
        Self::Em,
        Self::Ex,
        Self::Px,
        Self::Pt,
        Self::Pc,
        Self::Cm,
        Self::Mm,
        Self::In,
    ];

    /// Returns the unit suffix as written in a document
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Em => "em",
            Self::Ex => "ex",
            Self::Px => "px",
            Self::Pt => "pt",
            Self::Pc => "pc",
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::In => "in",
        }
    }

    /// Returns the size of one unit in pixels, or `None` for the
    /// font-relative units `em` and `ex`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use svgtex_core::units::LengthUnit;
    /// assert_eq!(LengthUnit::Pt.px_per_unit(), Some(1.25));
    /// assert_eq!(LengthUnit::Em.px_per_unit(), None);
    /// ```
    pub fn px_per_unit(self) -> Option<f64> {
        match self {
            Self::Px => Some(1.0),
            Self::Pt => Some(1.25),
            Self::Pc => Some(15.0),
            Self::Mm => Some(3.543307),
            Self::Cm => Some(35.43307),
            Self::In => Some(90.0),
            Self::Em | Self::Ex => None,
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Error returned when a string is not a known unit suffix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown length unit `{0}`")]
pub struct UnknownUnit(pub String);

impl FromStr for LengthUnit {
    type Err = UnknownUnit;

    /// Parses a unit suffix; the empty string means pixels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::Px);
        }
        Self::ALL
            .into_iter()
            .find(|unit| unit.suffix() == s)
            .ok_or_else(|| UnknownUnit(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("mm".parse::<LengthUnit>(), Ok(LengthUnit::Mm));
        assert_eq!("".parse::<LengthUnit>(), Ok(LengthUnit::Px));
        assert_eq!(
            "km".parse::<LengthUnit>(),
            Err(UnknownUnit("km".to_string()))
        );
    }

    #[test]
    fn test_px_table() {
        assert_eq!(LengthUnit::Px.px_per_unit(), Some(1.0));
        assert_eq!(LengthUnit::Pc.px_per_unit(), Some(15.0));
        assert_eq!(LengthUnit::Cm.px_per_unit(), Some(35.43307));
        assert_eq!(LengthUnit::In.px_per_unit(), Some(90.0));
        assert_eq!(LengthUnit::Ex.px_per_unit(), None);
    }

    #[test]
    fn test_suffix_roundtrip() {
        for unit in LengthUnit::ALL {
            assert_eq!(unit.suffix().parse::<LengthUnit>(), Ok(unit));
        }
    }
}
