//! Graph Modelling Language formatter. Each checked URL becomes a node;
//! each parent→child reference becomes an edge.

use std::collections::HashMap;

use linkchecker_types::UrlItemWire;

use crate::sink::Sink;
use crate::{Logger, Summary};

pub struct GmlFormatter {
    sink: Sink,
    nodes: String,
    edges: String,
    ids: HashMap<String, u32>,
    next_id: u32,
}

impl GmlFormatter {
    #[must_use]
    pub fn new(sink: Sink) -> Self {
        Self {
            sink,
            nodes: String::new(),
            edges: String::new(),
            ids: HashMap::new(),
            next_id: 0,
        }
    }

    fn id_for(&mut self, key: &str, valid: bool) -> u32 {
        if let Some(id) = self.ids.get(key) {
            return *id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.ids.insert(key.to_string(), id);
        self.nodes.push_str(&format!(
            "  node [\n    id {id}\n    label \"{}\"\n    valid \"{}\"\n  ]\n",
            key.replace('"', "'"),
            valid
        ));
        id
    }
}

impl Logger for GmlFormatter {
    fn start(&mut self) {}

    fn log(&mut self, item: &UrlItemWire) {
        let key = item.canonical.clone().unwrap_or_else(|| item.raw_ref.clone());
        let child_id = self.id_for(&key, item.valid);
        if let Some(parent) = &item.parent_url {
            let parent_id = self.id_for(parent, true);
            self.edges.push_str(&format!("  edge [\n    source {parent_id}\n    target {child_id}\n  ]\n"));
        }
    }

    fn end(&mut self, _summary: &Summary) {
        self.sink.write("graph [\n  directed 1\n");
        self.sink.write(&self.nodes.clone());
        self.sink.write(&self.edges.clone());
        self.sink.write("]\n");
        self.sink.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revisiting_the_same_url_reuses_its_node_id() {
        let mut formatter = GmlFormatter::new(Sink::Stdout);
        let first = formatter.id_for("http://example.test/", true);
        let second = formatter.id_for("http://example.test/", true);
        assert_eq!(first, second);
    }
}
