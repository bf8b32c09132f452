use chrono::{DateTime, SecondsFormat, Utc};
use minijinja::{Environment, context};
use otg_core::config::GenerateOptions;

use super::escape_jsdoc;

/// The comment block that opens every generated file, if any.
///
/// A custom `header_comment` is used verbatim; otherwise the default block
/// names the tool, the generation time and, when known, the source.
pub fn render_header(
    env: &Environment<'_>,
    options: &GenerateOptions,
    generated_at: DateTime<Utc>,
) -> Result<Option<String>, minijinja::Error> {
    if !options.include_header {
        return Ok(None);
    }
    if let Some(custom) = &options.header_comment {
        return Ok(Some(custom.clone()));
    }
    let header = env.get_template("header.ts.j2")?.render(context! {
        generated_at => generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        source_label => options
            .source_label
            .as_deref()
            .filter(|label| !label.is_empty())
            .map(escape_jsdoc),
    })?;
    Ok(Some(header))
}
