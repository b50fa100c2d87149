//! Template rendering
//!
//! One-shot tera rendering: every call re-reads the template from disk and
//! renders it against the given context. Nothing is cached, so edits to a
//! template between runs always take effect.

use crate::error::{ConvoyError, Result};
use std::path::Path;
use tera::{Context, Tera};

/// Read a template file and render it against the context.
pub fn render_file(path: &Path, context: &Context) -> Result<String> {
    let content = std::fs::read_to_string(path).map_err(|e| ConvoyError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Tera::one_off(&content, context, false).map_err(|e| ConvoyError::Template {
        file: path.to_path_buf(),
        message: render_error_detail(&e),
    })
}

/// Render a template file and write the result, overwriting any previous
/// output.
pub fn render_to_file(src: &Path, dst: &Path, context: &Context) -> Result<()> {
    let rendered = render_file(src, context)?;
    std::fs::write(dst, rendered).map_err(|e| ConvoyError::Io {
        path: dst.to_path_buf(),
        message: e.to_string(),
    })
}

/// Collect the tera error chain into one line. Tera tends to bury the
/// useful part (the undefined variable, the bad filter) in `source()`.
fn render_error_detail(e: &tera::Error) -> String {
    use std::error::Error;

    let mut details = vec![e.to_string()];
    let mut source = e.source();
    while let Some(err) = source {
        details.push(err.to_string());
        source = err.source();
    }

    details.join(" | ")
}
