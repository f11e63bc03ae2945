//! Graphviz DOT formatter. Nodes colored green (valid) or red (invalid);
//! edges mirror parent→child references.

use std::collections::HashSet;

use linkchecker_types::UrlItemWire;

use super::escape::dot_escape;
use crate::sink::Sink;
use crate::{Logger, Summary};

pub struct DotFormatter {
    sink: Sink,
    nodes: String,
    edges: String,
    seen: HashSet<String>,
}

impl DotFormatter {
    #[must_use]
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            nodes: String::new(),
            edges: String::new(),
            seen: HashSet::new(),
        }
    }
}

impl Logger for DotFormatter {
    fn start(&mut self) {
        self.sink.write("digraph linkchecker {\n");
    }

    fn log(&mut self, item: &UrlItemWire) {
        let key = item.canonical.clone().unwrap_or_else(|| item.raw_ref.clone());
        if self.seen.insert(key.clone()) {
            let color = if item.valid { "green" } else { "red" };
            self.nodes
                .push_str(&format!("  \"{}\" [color={color}];\n", dot_escape(&key)));
        }
        if let Some(parent) = &item.parent_url {
            self.edges
                .push_str(&format!("  \"{}\" -> \"{}\";\n", dot_escape(parent), dot_escape(&key)));
        }
    }

    fn end(&mut self, _summary: &Summary) {
        self.sink.write(&self.nodes.clone());
        self.sink.write(&self.edges.clone());
        self.sink.write("}\n");
        self.sink.flush();
    }
}
