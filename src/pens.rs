//! Named plotting pens.
//!
//! A pen is a named stroke color standing in for a physical pen; the
//! emitted document carries only the stroke color, layer per pen, so each
//! layer can be plotted with the matching pen loaded.

/// A physical plotting pen: a name and its stroke color
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pen {
    pub name: &'static str,
    pub color: &'static str,
}

/// Plain black, any fineliner
pub const BLACK: Pen = Pen {
    name: "black",
    color: "black",
};

/// The Micron Pigma archival ink set
pub struct MicronPigma;

impl MicronPigma {
    pub const RED: Pen = Pen {
        name: "red",
        color: "#d02d2e",
    };
    pub const GREEN: Pen = Pen {
        name: "green",
        color: "#1a7a4b",
    };
    pub const BLUE: Pen = Pen {
        name: "blue",
        color: "#295ca7",
    };
    pub const BLACK: Pen = BLACK;
}
