//! Axis label text.
//!
//! The figure prefers a typeset-looking label (Unicode subscripts, solar
//! symbol). If drawing it fails, the caller switches to the ASCII variant.

/// A label in one of two renderings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderLabel {
    Rich(String),
    Plain(String),
}

impl RenderLabel {
    pub fn text(&self) -> &str {
        match self {
            RenderLabel::Rich(s) | RenderLabel::Plain(s) => s,
        }
    }

    pub fn is_rich(&self) -> bool {
        matches!(self, RenderLabel::Rich(_))
    }
}

pub const DPR_AXIS_RICH: &str = "log\u{2081}\u{2080}(DPR [M\u{2609} yr\u{207b}\u{00b9}])";
pub const DPR_AXIS_PLAIN: &str = "log10(DPR [Msun/yr])";

/// Label for the DPR axis in the requested rendering.
pub fn dpr_axis_label(rich: bool) -> RenderLabel {
    if rich {
        RenderLabel::Rich(DPR_AXIS_RICH.to_string())
    } else {
        RenderLabel::Plain(DPR_AXIS_PLAIN.to_string())
    }
}
