//! PlantUML output

use std::fmt::Write;

use super::model::DiagramModel;

/// Name given to the `@startuml` block
pub const DIAGRAM_NAME: &str = "greenfootClassDiagram";

/// Render the model as a `.wsd` document; classes are sorted by name
#[must_use]
pub fn render(model: &DiagramModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "@startuml {DIAGRAM_NAME}");
    out.push('\n');

    for class in model.classes.values() {
        log::debug!("Writing class {}", class.name);
        let _ = writeln!(out, "{} {} {{", class.kind.keyword(), class.name);
        for field in &class.fields {
            let _ = writeln!(out, "\t{field}");
        }
        for method in &class.methods {
            let _ = writeln!(out, "\t{method}");
        }
        out.push_str("}\n\n");
    }

    for relation in &model.relations {
        let _ = writeln!(out, "{relation}");
    }
    if !model.relations.is_empty() {
        out.push('\n');
    }
    out.push_str("@enduml\n");
    out
}
