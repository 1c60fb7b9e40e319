//!
//! Context tree, a trie over the reversed context of a position
//!
//! The root represents the empty context. The child of a node at depth `d`
//! labeled with symbol `s` represents the context whose `d+1`-th symbol
//! before the position is `s`. Nodes live in an arena owned by the tree and
//! refer to each other by [`NodeIndex`]; the root is index `0`.
//!
//! ```text
//! seq = ... x[i-2] x[i-1] | x[i]
//!
//! root --x[i-1]--> n1 --x[i-2]--> n2 ...
//! ```
//!
//! Training: [`ContextTree::count`] builds the full tree of counts up to a
//! maximum order, [`ContextTree::prune`] / [`ContextTree::prune_rare`]
//! remove uninformative leaves and [`ContextTree::normalize`] (or one of its
//! variants) turns counts into per-node distributions.
//!
use super::iid::DiscreteIIDModel;
use super::ProbabilisticModel;
use crate::common::{Sequence, Symbol};
use crate::error::{ModelError, Result};
use log::info;
use std::collections::VecDeque;

/// Index of a node in the arena of its tree
pub type NodeIndex = usize;

/// A node of the context tree
#[derive(Debug, Clone)]
pub struct ContextTreeNode {
    id: NodeIndex,
    /// label of the edge from the parent
    symbol: Option<Symbol>,
    parent: Option<NodeIndex>,
    children: Vec<Option<NodeIndex>>,
    distribution: Option<DiscreteIIDModel>,
    /// symbol counts observed after this context during training
    counts: Vec<f64>,
}

impl ContextTreeNode {
    fn new(id: NodeIndex, alphabet_size: usize) -> Self {
        ContextTreeNode {
            id,
            symbol: None,
            parent: None,
            children: vec![None; alphabet_size],
            distribution: None,
            counts: vec![0.0; alphabet_size],
        }
    }
    pub fn id(&self) -> NodeIndex {
        self.id
    }
    pub fn symbol(&self) -> Option<Symbol> {
        self.symbol
    }
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }
    ///
    /// Child reached by the edge labeled `symbol`
    ///
    pub fn child(&self, symbol: Symbol) -> Option<NodeIndex> {
        self.children.get(symbol).copied().flatten()
    }
    ///
    /// create iterator of `(symbol, child)` of all existing children
    ///
    pub fn children(&self) -> impl Iterator<Item = (Symbol, NodeIndex)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.map(|c| (s, c)))
    }
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(|c| c.is_none())
    }
    pub fn distribution(&self) -> Option<&DiscreteIIDModel> {
        self.distribution.as_ref()
    }
    pub fn counts(&self) -> &[f64] {
        &self.counts
    }
    pub fn total_count(&self) -> f64 {
        self.counts.iter().sum()
    }
}

/// Arena of context nodes
#[derive(Debug, Clone)]
pub struct ContextTree {
    alphabet_size: usize,
    nodes: Vec<ContextTreeNode>,
}

impl ContextTree {
    ///
    /// Tree with only the root (no distribution yet).
    ///
    pub fn new(alphabet_size: usize) -> Self {
        ContextTree {
            alphabet_size,
            nodes: vec![ContextTreeNode::new(0, alphabet_size)],
        }
    }
    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }
    /// The number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn root(&self) -> &ContextTreeNode {
        &self.nodes[0]
    }
    pub fn node(&self, index: NodeIndex) -> &ContextTreeNode {
        &self.nodes[index]
    }
    pub fn nodes(&self) -> &[ContextTreeNode] {
        &self.nodes
    }
    ///
    /// Allocate a new unlinked node and return its index.
    ///
    pub fn create_context(&mut self) -> NodeIndex {
        let id = self.nodes.len();
        self.nodes.push(ContextTreeNode::new(id, self.alphabet_size));
        id
    }
    ///
    /// Link `child` under `parent` with edge label `symbol`.
    /// A previous child with the same label is replaced and detached.
    ///
    /// The root, a node already linked elsewhere, or an ancestor of `parent`
    /// cannot become a child.
    ///
    pub fn set_child(&mut self, parent: NodeIndex, child: NodeIndex, symbol: Symbol) -> Result<()> {
        self.check_node(parent)?;
        self.check_node(child)?;
        if symbol >= self.alphabet_size {
            return Err(ModelError::SymbolOutOfRange {
                symbol,
                position: 0,
                alphabet_size: self.alphabet_size,
            });
        }
        if child == 0 {
            return Err(ModelError::InvalidTree(
                "the root cannot be a child".to_string(),
            ));
        }
        if let Some(p) = self.nodes[child].parent {
            if p == parent && self.nodes[child].symbol == Some(symbol) {
                return Ok(());
            }
            return Err(ModelError::InvalidTree(format!(
                "node {} is already a child of node {}",
                child, p
            )));
        }
        let mut ancestor = Some(parent);
        while let Some(node) = ancestor {
            if node == child {
                return Err(ModelError::InvalidTree(format!(
                    "node {} is an ancestor of node {}",
                    child, parent
                )));
            }
            ancestor = self.nodes[node].parent;
        }
        if let Some(old) = self.nodes[parent].children[symbol] {
            self.nodes[old].parent = None;
            self.nodes[old].symbol = None;
        }
        self.nodes[parent].children[symbol] = Some(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[child].symbol = Some(symbol);
        Ok(())
    }
    pub fn set_distribution(&mut self, node: NodeIndex, distribution: DiscreteIIDModel) -> Result<()> {
        self.check_node(node)?;
        if distribution.alphabet_size() != self.alphabet_size {
            return Err(ModelError::AlphabetMismatch {
                what: format!("distribution of context node {}", node),
                expected: self.alphabet_size,
                actual: distribution.alphabet_size(),
            });
        }
        self.nodes[node].distribution = Some(distribution);
        Ok(())
    }
    fn check_node(&self, node: NodeIndex) -> Result<()> {
        if node < self.nodes.len() {
            Ok(())
        } else {
            Err(ModelError::RangeOutOfBounds {
                begin: node,
                end: node + 1,
                length: self.nodes.len(),
            })
        }
    }
    ///
    /// Deepest node owning a distribution along the longest suffix of
    /// `seq[..position]` present in the tree.
    ///
    /// `None` if the root has no distribution (malformed tree).
    ///
    pub fn get_context(&self, seq: &[Symbol], position: usize) -> Option<&ContextTreeNode> {
        let root = self.root();
        root.distribution.as_ref()?;
        let mut best = root;
        let mut current = root;
        for &symbol in seq[..position.min(seq.len())].iter().rev() {
            match current.child(symbol) {
                Some(c) => {
                    current = &self.nodes[c];
                    if current.distribution.is_some() {
                        best = current;
                    }
                }
                None => break,
            }
        }
        Some(best)
    }
    ///
    /// The context a node represents, in sequence order.
    /// e.g. `root -1-> a -0-> b` gives `[0, 1]` for `b`.
    ///
    pub fn context_of(&self, node: NodeIndex) -> Sequence {
        let mut context = Vec::new();
        let mut current = &self.nodes[node];
        while let (Some(symbol), Some(parent)) = (current.symbol, current.parent) {
            context.push(symbol);
            current = &self.nodes[parent];
        }
        context
    }
    ///
    /// Maximum depth (order) of reachable nodes
    ///
    pub fn depth(&self) -> usize {
        self.bfs().into_iter().map(|(_, depth)| depth).max().unwrap_or(0)
    }
    /// reachable nodes in breadth-first order, with their depth
    fn bfs(&self) -> Vec<(NodeIndex, usize)> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::new();
        queue.push_back((0, 0));
        while let Some((node, depth)) = queue.pop_front() {
            order.push((node, depth));
            for (_, child) in self.nodes[node].children() {
                queue.push_back((child, depth + 1));
            }
        }
        order
    }
    ///
    /// Rebuild the arena with only the nodes reachable from the root,
    /// in breadth-first order.
    ///
    pub fn compact(&mut self) {
        let order = self.bfs();
        let mut new_index = vec![None; self.nodes.len()];
        for (i, &(node, _)) in order.iter().enumerate() {
            new_index[node] = Some(i);
        }
        let nodes = order
            .iter()
            .enumerate()
            .map(|(i, &(node, _))| {
                let old = &self.nodes[node];
                ContextTreeNode {
                    id: i,
                    symbol: old.symbol,
                    parent: old.parent.and_then(|p| new_index[p]),
                    children: old
                        .children
                        .iter()
                        .map(|c| c.and_then(|c| new_index[c]))
                        .collect(),
                    distribution: old.distribution.clone(),
                    counts: old.counts.clone(),
                }
            })
            .collect();
        self.nodes = nodes;
    }
}

//
// Training
//
impl ContextTree {
    ///
    /// Full tree of contexts up to `max_order` observed in the sequences,
    /// each node counting the symbols that followed its context.
    ///
    pub fn count(alphabet_size: usize, sequences: &[Sequence], max_order: usize) -> Result<Self> {
        let mut tree = ContextTree::new(alphabet_size);
        for seq in sequences {
            if let Some((position, symbol)) = crate::common::find_invalid_symbol(seq, alphabet_size)
            {
                return Err(ModelError::SymbolOutOfRange {
                    symbol,
                    position,
                    alphabet_size,
                });
            }
            for (i, &symbol) in seq.iter().enumerate() {
                let mut node = 0;
                tree.nodes[node].counts[symbol] += 1.0;
                for d in 1..=max_order.min(i) {
                    let c = seq[i - d];
                    node = match tree.nodes[node].child(c) {
                        Some(child) => child,
                        None => {
                            let child = tree.create_context();
                            tree.set_child(node, child, c)?;
                            child
                        }
                    };
                    tree.nodes[node].counts[symbol] += 1.0;
                }
            }
        }
        Ok(tree)
    }
    ///
    /// Log likelihood gain of predicting with `child` instead of its parent
    ///
    /// ```text
    /// sum_s n_child(s) log( p_child(s) / p_parent(s) )
    /// ```
    fn likelihood_gain(&self, parent: NodeIndex, child: NodeIndex) -> f64 {
        let parent = &self.nodes[parent];
        let child = &self.nodes[child];
        let (n_parent, n_child) = (parent.total_count(), child.total_count());
        child
            .counts
            .iter()
            .zip(parent.counts.iter())
            .filter(|(&c, &p)| c > 0.0 && p > 0.0)
            .map(|(&c, &p)| c * ((c / n_child) / (p / n_parent)).ln())
            .sum()
    }
    ///
    /// Context algorithm pruning: remove, bottom-up, every leaf whose
    /// likelihood gain over its parent is below `delta`.
    /// Returns the number of removed nodes.
    ///
    pub fn prune(&mut self, delta: f64) -> usize {
        let removed = self.prune_node(0, delta);
        self.compact();
        info!("pruned {} contexts (delta={}), {} left", removed, delta, self.len());
        removed
    }
    fn prune_node(&mut self, node: NodeIndex, delta: f64) -> usize {
        let children: Vec<(Symbol, NodeIndex)> = self.nodes[node].children().collect();
        let mut removed = 0;
        for &(_, child) in children.iter() {
            removed += self.prune_node(child, delta);
        }
        for &(symbol, child) in children.iter() {
            if self.nodes[child].is_leaf() && self.likelihood_gain(node, child) < delta {
                self.nodes[node].children[symbol] = None;
                removed += 1;
            }
        }
        removed
    }
    ///
    /// Remove every subtree whose context was observed less than `min_count` times.
    /// Returns the number of unlinked subtrees.
    ///
    pub fn prune_rare(&mut self, min_count: f64) -> usize {
        let mut removed = 0;
        let mut stack = vec![0];
        while let Some(node) = stack.pop() {
            let children: Vec<(Symbol, NodeIndex)> = self.nodes[node].children().collect();
            for (symbol, child) in children {
                if self.nodes[child].total_count() < min_count {
                    self.nodes[node].children[symbol] = None;
                    removed += 1;
                } else {
                    stack.push(child);
                }
            }
        }
        self.compact();
        info!("removed {} rare subtrees (min_count={})", removed, min_count);
        removed
    }
    ///
    /// Turn counts into distributions
    /// `p(s) = (n(s) + pseudocounts) / (n + pseudocounts * alphabet_size)`.
    /// Nodes with no mass at all are left without a distribution.
    ///
    pub fn normalize(&mut self, pseudocounts: f64) -> Result<()> {
        let reachable: Vec<NodeIndex> = self.bfs().into_iter().map(|(n, _)| n).collect();
        for node in reachable {
            let total = self.nodes[node].total_count() + pseudocounts * self.alphabet_size as f64;
            self.nodes[node].distribution = if total > 0.0 {
                Some(DiscreteIIDModel::from_counts(
                    &self.nodes[node].counts,
                    pseudocounts,
                )?)
            } else {
                None
            };
        }
        Ok(())
    }
    ///
    /// Blend counts with an a-priori model:
    /// `p(s) = (n(s) + weight * prior(s | context)) / (n + weight)`.
    ///
    pub fn normalize_with_prior(&mut self, prior: &dyn ProbabilisticModel, weight: f64) -> Result<()> {
        if prior.alphabet_size() != self.alphabet_size {
            return Err(ModelError::AlphabetMismatch {
                what: "a-priori model".to_string(),
                expected: self.alphabet_size,
                actual: prior.alphabet_size(),
            });
        }
        let reachable: Vec<NodeIndex> = self.bfs().into_iter().map(|(n, _)| n).collect();
        for node in reachable {
            let mut context = self.context_of(node);
            let position = context.len();
            context.push(0);
            let weights: Vec<f64> = (0..self.alphabet_size)
                .map(|s| {
                    context[position] = s;
                    let p_prior = prior.evaluate_position(&context, position).to_value();
                    self.nodes[node].counts[s] + weight * p_prior
                })
                .collect();
            self.nodes[node].distribution = if weights.iter().sum::<f64>() > 0.0 {
                Some(DiscreteIIDModel::new(weights)?)
            } else {
                None
            };
        }
        Ok(())
    }
    ///
    /// Interpolate every node with its parent, top-down:
    ///
    /// ```text
    /// p_node(s) = l * n(s)/n + (1 - l) * p_parent(s),   l = n / (n + weight)
    /// ```
    ///
    /// The root uses its maximum likelihood estimate (uniform if empty).
    ///
    pub fn interpolate(&mut self, weight: f64) -> Result<()> {
        let uniform = vec![1.0 / self.alphabet_size as f64; self.alphabet_size];
        let mut stack: Vec<(NodeIndex, Vec<f64>)> = vec![(0, uniform)];
        while let Some((node, parent_probs)) = stack.pop() {
            let n = self.nodes[node].total_count();
            let lambda = if node == 0 {
                if n > 0.0 {
                    1.0
                } else {
                    0.0
                }
            } else {
                n / (n + weight)
            };
            let probs: Vec<f64> = self.nodes[node]
                .counts
                .iter()
                .zip(parent_probs.iter())
                .map(|(&c, &pp)| {
                    let ml = if n > 0.0 { c / n } else { 0.0 };
                    lambda * ml + (1.0 - lambda) * pp
                })
                .collect();
            for (_, child) in self.nodes[node].children() {
                stack.push((child, probs.clone()));
            }
            self.nodes[node].distribution = Some(DiscreteIIDModel::new(probs)?);
        }
        Ok(())
    }
}

impl std::fmt::Display for ContextTree {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (node, _) in self.bfs() {
            let context: Vec<String> = self.context_of(node).iter().map(|s| s.to_string()).collect();
            match &self.nodes[node].distribution {
                Some(d) => writeln!(f, "[{}]\t{}", context.join(","), d)?,
                None => writeln!(f, "[{}]\t-", context.join(","))?,
            }
        }
        Ok(())
    }
}
