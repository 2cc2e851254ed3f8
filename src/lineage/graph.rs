// 进化图
// 只包含能解析到种群内条目的边，用于链构建之前的环检测

use log::debug;
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use petgraph::{Directed, Graph};
use std::collections::HashMap;

use crate::core::error::{DexError, Result};

#[derive(Debug, Default)]
pub struct EvolutionGraph<'a> {
    graph: Graph<&'a str, (), Directed>,
    node_map: HashMap<&'a str, NodeIndex>,
}

impl<'a> EvolutionGraph<'a> {
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            graph: Graph::with_capacity(nodes, nodes),
            node_map: HashMap::with_capacity(nodes),
        }
    }

    pub fn add_node(&mut self, id: &'a str) -> NodeIndex {
        if let Some(index) = self.node_map.get(id) {
            return *index;
        }
        let index = self.graph.add_node(id);
        self.node_map.insert(id, index);
        index
    }

    pub fn add_edge(&mut self, source: &'a str, target: &'a str) {
        let from = self.add_node(source);
        let to = self.add_node(target);
        self.graph.add_edge(from, to, ());
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// 存在环（包括自环）时返回 `EvolutionCycle`，携带环上某个条目的编号。
    pub fn ensure_acyclic(&self) -> Result<()> {
        debug!("环检测: {} 个节点, {} 条边", self.node_count(), self.edge_count());
        toposort(&self.graph, None)
            .map(|_| ())
            .map_err(|cycle| DexError::EvolutionCycle(self.graph[cycle.node_id()].to_string()))
    }
}
