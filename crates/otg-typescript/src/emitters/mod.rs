pub mod declaration;
pub mod header;
pub mod index;
pub mod module;

use minijinja::Environment;

/// Escape `*/` sequences that would prematurely close a comment block.
pub(crate) fn escape_jsdoc(text: &str) -> String {
    text.replace("*/", "*\\/")
}

/// Template environment shared by the file emitters.
pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_template("header.ts.j2", include_str!("../../templates/header.ts.j2"))?;
    env.add_template("module.ts.j2", include_str!("../../templates/module.ts.j2"))?;
    env.add_template("index.ts.j2", include_str!("../../templates/index.ts.j2"))?;
    Ok(env)
}
