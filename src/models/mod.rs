// Domain types shared across the service

/// Caption fill color.
///
/// A closed two-value enumeration, selected by the `white` request flag.
/// Kept binary on purpose; arbitrary colors are out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionColor {
    Black,
    White,
}

impl CaptionColor {
    pub fn rgba8(self) -> [u8; 4] {
        match self {
            CaptionColor::Black => [0, 0, 0, 255],
            CaptionColor::White => [255, 255, 255, 255],
        }
    }
}

/// A fully parsed captioning request.
///
/// Immutable once constructed; its four fields completely determine the
/// rendered output, which is what makes the fingerprint a sound cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionRequest {
    pub source_url: String,
    pub top_text: String,
    pub bottom_text: String,
    pub color: CaptionColor,
}

impl CaptionRequest {
    pub fn new(
        source_url: impl Into<String>,
        top_text: impl Into<String>,
        bottom_text: impl Into<String>,
        color: CaptionColor,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            top_text: top_text.into(),
            bottom_text: bottom_text.into(),
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_rgba() {
        assert_eq!(CaptionColor::Black.rgba8(), [0, 0, 0, 255]);
        assert_eq!(CaptionColor::White.rgba8(), [255, 255, 255, 255]);
    }
}
