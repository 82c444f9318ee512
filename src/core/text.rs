//=========================================================================
// Rich Text
//=========================================================================
//
// Markup helpers for engine consoles and UI labels that understand
// <b>, <i>, <color=…> and <size=…> tags.
//
//=========================================================================

/// Rich-text markup wrappers for string slices.
///
/// ```rust
/// use lifecycle_singleton::core::text::RichText;
///
/// assert_eq!("ready".bold(), "<b>ready</b>");
/// assert_eq!("hp".color("red").size(14), "<size=14><color=red>hp</color></size>");
/// ```
pub trait RichText {
    /// Wraps the text in `<b>` tags.
    fn bold(&self) -> String;

    /// Wraps the text in `<i>` tags.
    fn italic(&self) -> String;

    /// Wraps the text in a `<color>` tag. Accepts names or `#rrggbb`.
    fn color(&self, color: &str) -> String;

    /// Wraps the text in a `<size>` tag.
    fn size(&self, points: u32) -> String;
}

impl RichText for str {
    fn bold(&self) -> String {
        format!("<b>{}</b>", self)
    }

    fn italic(&self) -> String {
        format!("<i>{}</i>", self)
    }

    fn color(&self, color: &str) -> String {
        format!("<color={}>{}</color>", color, self)
    }

    fn size(&self, points: u32) -> String {
        format!("<size={}>{}</size>", points, self)
    }
}

//=========================================================================
// Tests
//=========================================================================
