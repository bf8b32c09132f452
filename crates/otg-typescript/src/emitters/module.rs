use indexmap::IndexMap;
use minijinja::{Environment, context};
use otg_core::split::GroupId;

/// Render a module: header, `import type` lines per owning group, then the
/// declarations separated by blank lines.
pub fn render_module(
    env: &Environment<'_>,
    header: Option<&str>,
    imports: &IndexMap<GroupId, Vec<String>>,
    declarations: &[String],
) -> Result<String, minijinja::Error> {
    let imports: Vec<minijinja::Value> = imports
        .iter()
        .filter(|(_, names)| !names.is_empty())
        .map(|(group, names)| {
            context! {
                group => group.as_str(),
                names => names,
            }
        })
        .collect();

    env.get_template("module.ts.j2")?.render(context! {
        header => header,
        imports => imports,
        declarations => declarations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::environment;

    #[test]
    fn test_module_layout() {
        let env = environment().unwrap();
        let mut imports = IndexMap::new();
        imports.insert(GroupId::shared(), vec!["Error".to_string(), "Id".to_string()]);
        imports.insert(GroupId::new("users"), vec!["User".to_string()]);
        let declarations = vec![
            "export type A = string;".to_string(),
            "export type B = A[];".to_string(),
        ];
        let out = render_module(&env, Some("// header"), &imports, &declarations).unwrap();
        assert_eq!(
            out,
            "// header\n\nimport type { Error, Id } from \"./common.ts\";\nimport type { User } from \"./users.ts\";\n\nexport type A = string;\n\nexport type B = A[];\n"
        );
    }

    #[test]
    fn test_module_without_header_or_imports() {
        let env = environment().unwrap();
        let declarations = vec!["export type A = string;".to_string()];
        let out = render_module(&env, None, &IndexMap::new(), &declarations).unwrap();
        assert_eq!(out, "export type A = string;\n");
    }
}
