//! Graphviz export — render a scene graph for admin tooling.
//!
//! ```text
//! SceneGraph → export_dot() → digraph { ... }
//!   → dot -Tsvg world.dot > world.svg
//! ```
//!
//! Scenes become nodes labelled with their display name. One-way
//! connections are plain arrows; bidirectional ones are drawn with
//! `dir=both`. A connection that terminates in a named group carries the
//! group name as its edge label.

use std::io::Write;

use crate::graph::SceneGraph;
use crate::model::*;
use crate::Result;

/// Write `graph` as a Graphviz `digraph`.
///
/// Output is sorted by id so that two exports of the same graph are
/// byte-identical.
pub fn export_dot(graph: &SceneGraph, writer: &mut dyn Write) -> Result<()> {
    writeln!(writer, "// scene-graph export")?;
    writeln!(writer, "// Scenes: {}", graph.scene_count())?;
    writeln!(writer, "// Connections: {}", graph.connection_count())?;
    writeln!(writer, "digraph world {{")?;

    let mut scenes: Vec<&Scene> = graph.scenes().collect();
    scenes.sort_by(|a, b| a.id().cmp(b.id()));
    for scene in scenes {
        let groups: Vec<String> = graph.connection_groups(scene.id())
            .into_iter()
            .map(|g| escape(g.name()))
            .collect();
        let mut label = escape(&scene.name);
        if !groups.is_empty() {
            label.push_str(&format!("\\n[{}]", groups.join(", ")));
        }
        writeln!(writer, "    \"{}\" [label=\"{}\"];", escape(&scene.id().0), label)?;
    }

    let mut connections: Vec<&Connection> = graph.connections().collect();
    connections.sort_by(|a, b| a.id().cmp(b.id()));
    for connection in connections {
        let mut attrs = Vec::new();
        if connection.is_bidirectional() {
            attrs.push("dir=both".to_string());
        }
        if let Some(group) = connection.incoming_group() {
            attrs.push(format!("label=\"{}\"", escape(group)));
        }
        let attrs = if attrs.is_empty() {
            String::new()
        } else {
            format!(" [{}]", attrs.join(", "))
        };
        writeln!(
            writer,
            "    \"{}\" -> \"{}\"{};",
            escape(&connection.outgoing_scene().0),
            escape(&connection.incoming_scene().0),
            attrs,
        )?;
    }

    writeln!(writer, "}}")?;
    Ok(())
}

/// Escape a string for use inside a double-quoted DOT id.
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
