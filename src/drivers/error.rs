use thiserror::Error;
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("format error{}: {field}: {reason}", line_suffix(.line))]
    Format {
        line: Option<usize>,
        field: String,
        reason: String,
    },
    #[error("layout error: {0}")]
    Layout(String),
    #[error("figure {0} has not been plotted yet")]
    UnknownFigure(u32),
    #[error("failed to render plot: {0}")]
    Plot(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
impl ScopeError {
    pub fn format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ScopeError::Format {
            line: None,
            field: field.into(),
            reason: reason.into(),
        }
    }
    /// Attaches a 1-based line number to a format error. Other kinds pass through.
    pub fn at_line(self, number: usize) -> Self {
        match self {
            ScopeError::Format { field, reason, .. } => ScopeError::Format {
                line: Some(number),
                field,
                reason,
            },
            other => other,
        }
    }
}
fn line_suffix(line: &Option<usize>) -> String {
    line.map(|n| format!(" on line {n}")).unwrap_or_default()
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ScopeError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ScopeError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for ScopeError {
    fn from(value: image::ImageError) -> Self {
        ScopeError::Plot(value.to_string())
    }
}
