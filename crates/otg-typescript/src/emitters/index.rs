use minijinja::{Environment, context};
use otg_core::split::IndexExport;

/// Render `index.ts`: one `export type { ... }` line per group.
pub fn render_index(
    env: &Environment<'_>,
    header: Option<&str>,
    exports: &[IndexExport],
) -> Result<String, minijinja::Error> {
    let exports: Vec<minijinja::Value> = exports
        .iter()
        .map(|entry| {
            context! {
                group => entry.group.as_str(),
                names => &entry.names,
            }
        })
        .collect();

    env.get_template("index.ts.j2")?.render(context! {
        header => header,
        exports => exports,
    })
}
