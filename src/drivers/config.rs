use std::path::Path;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use crate::drivers::plot::PlotStyle;
use crate::drivers::ScopeError;
// Largest canvas edge accepted from a style file.
const MAX_EDGE: u32 = 16_384;
/// On-disk form of [`PlotStyle`]; missing fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
    pub palette: Vec<[u8; 3]>,
}
impl Default for StyleConfig {
    fn default() -> Self {
        Self::from(&PlotStyle::default())
    }
}
impl StyleConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScopeError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
impl From<&PlotStyle> for StyleConfig {
    fn from(style: &PlotStyle) -> Self {
        let rgb = |c: &RGBColor| [c.0, c.1, c.2];
        Self {
            width: style.width,
            height: style.height,
            background: rgb(&style.background),
            palette: style.palette.iter().map(rgb).collect(),
        }
    }
}
impl From<StyleConfig> for PlotStyle {
    fn from(config: StyleConfig) -> Self {
        let rgb = |[r, g, b]: [u8; 3]| RGBColor(r, g, b);
        Self {
            width: config.width.clamp(1, MAX_EDGE),
            height: config.height.clamp(1, MAX_EDGE),
            background: rgb(config.background),
            palette: config.palette.into_iter().map(rgb).collect(),
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "width": 1200, "background": [255, 255, 255] }}"#).unwrap();
        let config = StyleConfig::from_path(file.path()).unwrap();
        assert_eq!(config.width, 1200);
        assert_eq!(config.height, 400);
        let style = PlotStyle::from(config);
        assert_eq!(style.background, RGBColor(255, 255, 255));
        assert_eq!(style.palette.len(), PlotStyle::default().palette.len());
    }
    #[test]
    fn canvas_edges_are_clamped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "width": 40000, "height": 0 }}"#).unwrap();
        let style = PlotStyle::from(StyleConfig::from_path(file.path()).unwrap());
        assert_eq!(style.width, MAX_EDGE);
        assert_eq!(style.height, 1);
    }
    #[test]
    fn malformed_file_is_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "width = 3").unwrap();
        assert!(matches!(
            StyleConfig::from_path(file.path()),
            Err(ScopeError::Json(_))
        ));
    }
}
