use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::crop::CropLabel;
use crate::domain::features::{FeatureVector, FEATURE_COUNT};
use crate::model::{ModelError, Predictor};

/// One node of a fitted tree. Splits send `x[feature] <= threshold` to `left`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split { feature: usize, threshold: f64, left: usize, right: usize },
    Leaf { label: i64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub nodes: Vec<TreeNode>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierParams {
    DecisionTree { nodes: Vec<TreeNode> },
    RandomForest { trees: Vec<TreeParams> },
}

/// Node array rooted at index 0. Children always sit after their parent, so every
/// walk from the root reaches a leaf in at most `nodes.len()` steps.
#[derive(Clone, Debug, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
}

impl DecisionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Result<Self, ModelError> {
        if nodes.is_empty() {
            return Err(ModelError::InvalidBundle("decision tree has no nodes".to_string()));
        }

        for (index, node) in nodes.iter().enumerate() {
            let TreeNode::Split { feature, threshold, left, right } = node else {
                continue;
            };
            if *feature >= FEATURE_COUNT {
                return Err(ModelError::InvalidBundle(format!(
                    "node {index} splits on feature {feature}, expected < {FEATURE_COUNT}"
                )));
            }
            if !threshold.is_finite() {
                return Err(ModelError::InvalidBundle(format!(
                    "node {index} has a non-finite threshold"
                )));
            }
            for child in [*left, *right] {
                if child <= index || child >= nodes.len() {
                    return Err(ModelError::InvalidBundle(format!(
                        "node {index} points at child {child}, expected {} ..< {}",
                        index + 1,
                        nodes.len()
                    )));
                }
            }
        }

        Ok(Self { nodes })
    }

    pub fn predict(&self, input: &FeatureVector) -> CropLabel {
        let values = input.values();
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { label } => return CropLabel(*label),
                TreeNode::Split { feature, threshold, left, right } => {
                    index = if values[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| matches!(node, TreeNode::Leaf { .. })).count()
    }

    /// Longest root-to-leaf path, counted in splits.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        let mut deepest = 0;
        for (index, node) in self.nodes.iter().enumerate() {
            deepest = deepest.max(depths[index]);
            if let TreeNode::Split { left, right, .. } = node {
                depths[*left] = depths[*left].max(depths[index] + 1);
                depths[*right] = depths[*right].max(depths[index] + 1);
            }
        }
        deepest
    }
}

/// Majority vote over independently fitted trees; ties go to the smallest label.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(trees: Vec<DecisionTree>) -> Result<Self, ModelError> {
        if trees.is_empty() {
            return Err(ModelError::InvalidBundle("random forest has no trees".to_string()));
        }
        Ok(Self { trees })
    }

    pub fn predict(&self, input: &FeatureVector) -> CropLabel {
        let mut votes: BTreeMap<CropLabel, usize> = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry(tree.predict(input)).or_default() += 1;
        }

        let mut winner = (CropLabel(0), 0);
        for (label, count) in votes {
            if count > winner.1 {
                winner = (label, count);
            }
        }
        winner.0
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Classifier {
    Tree(DecisionTree),
    Forest(RandomForest),
}

impl Classifier {
    pub fn from_params(params: ClassifierParams) -> Result<Self, ModelError> {
        match params {
            ClassifierParams::DecisionTree { nodes } => DecisionTree::new(nodes).map(Self::Tree),
            ClassifierParams::RandomForest { trees } => {
                let trees = trees
                    .into_iter()
                    .enumerate()
                    .map(|(position, tree)| {
                        DecisionTree::new(tree.nodes).map_err(|error| match error {
                            ModelError::InvalidBundle(message) => {
                                ModelError::InvalidBundle(format!("tree {position}: {message}"))
                            }
                            other => other,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                RandomForest::new(trees).map(Self::Forest)
            }
        }
    }
}

impl Classifier {
    /// Shape of the fitted model, for startup logs and the doctor report.
    pub fn summary(&self) -> String {
        match self {
            Self::Tree(tree) => format!(
                "{} nodes, {} leaves, depth {}",
                tree.node_count(),
                tree.leaf_count(),
                tree.depth()
            ),
            Self::Forest(forest) => {
                let trees = &forest.trees;
                let nodes: usize = trees.iter().map(DecisionTree::node_count).sum();
                let leaves: usize = trees.iter().map(DecisionTree::leaf_count).sum();
                let depth = trees.iter().map(DecisionTree::depth).max().unwrap_or(0);
                format!(
                    "{} trees, {nodes} nodes, {leaves} leaves, max depth {depth}",
                    forest.tree_count()
                )
            }
        }
    }
}

impl Predictor for Classifier {
    fn kind(&self) -> &'static str {
        match self {
            Self::Tree(_) => "decision_tree",
            Self::Forest(_) => "random_forest",
        }
    }

    fn predict(&self, input: &FeatureVector) -> Result<CropLabel, ModelError> {
        if !input.is_finite() {
            return Err(ModelError::NonFinite { stage: "classifier input" });
        }
        Ok(match self {
            Self::Tree(tree) => tree.predict(input),
            Self::Forest(forest) => forest.predict(input),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Classifier, ClassifierParams, DecisionTree, RandomForest, TreeNode};
    use crate::domain::crop::CropLabel;
    use crate::domain::features::FeatureVector;
    use crate::model::{ModelError, Predictor};

    fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
        TreeNode::Split { feature, threshold, left, right }
    }

    fn leaf(label: i64) -> TreeNode {
        TreeNode::Leaf { label }
    }

    /// rainfall <= 0.5 ? (humidity <= 0.0 ? 21 : 4) : 1
    fn rainfall_tree() -> DecisionTree {
        DecisionTree::new(vec![split(6, 0.5, 1, 2), split(4, 0.0, 3, 4), leaf(1), leaf(21), leaf(4)])
            .expect("valid tree")
    }

    fn vector(humidity: f64, rainfall: f64) -> FeatureVector {
        FeatureVector::new([0.0, 0.0, 0.0, 0.0, humidity, 0.0, rainfall])
    }

    #[test]
    fn traversal_goes_left_on_equal_threshold() {
        let tree = rainfall_tree();
        assert_eq!(tree.predict(&vector(-1.0, 0.5)), CropLabel(21));
        assert_eq!(tree.predict(&vector(0.0, 0.5)), CropLabel(21));
        assert_eq!(tree.predict(&vector(0.1, 0.4)), CropLabel(4));
        assert_eq!(tree.predict(&vector(0.0, 0.51)), CropLabel(1));
    }

    #[test]
    fn structure_is_reported() {
        let tree = rainfall_tree();
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.depth(), 2);
        assert_eq!(DecisionTree::new(vec![leaf(7)]).expect("stump").depth(), 0);
        assert_eq!(Classifier::Tree(tree).summary(), "5 nodes, 3 leaves, depth 2");
    }

    #[test]
    fn backward_or_dangling_children_are_rejected() {
        let cycle = DecisionTree::new(vec![split(0, 1.0, 1, 2), split(0, 1.0, 0, 2), leaf(1)]);
        assert!(matches!(cycle, Err(ModelError::InvalidBundle(message)) if message.contains("node 1")));

        let dangling = DecisionTree::new(vec![split(0, 1.0, 1, 9), leaf(1)]);
        assert!(matches!(dangling, Err(ModelError::InvalidBundle(_))));

        let empty = DecisionTree::new(Vec::new());
        assert!(matches!(empty, Err(ModelError::InvalidBundle(_))));
    }

    #[test]
    fn out_of_range_feature_is_rejected() {
        let result = DecisionTree::new(vec![split(7, 0.0, 1, 2), leaf(1), leaf(2)]);
        assert!(matches!(result, Err(ModelError::InvalidBundle(message)) if message.contains("feature 7")));
    }

    #[test]
    fn forest_takes_majority_and_breaks_ties_low() {
        let stump = |label| DecisionTree::new(vec![leaf(label)]).expect("stump");

        let majority = RandomForest::new(vec![stump(5), stump(3), stump(5)]).expect("forest");
        assert_eq!(majority.predict(&vector(0.0, 0.0)), CropLabel(5));
        assert_eq!(
            Classifier::Forest(majority).summary(),
            "3 trees, 3 nodes, 3 leaves, max depth 0"
        );

        let tie = RandomForest::new(vec![stump(9), stump(2)]).expect("forest");
        assert_eq!(tie.predict(&vector(0.0, 0.0)), CropLabel(2));
        assert_eq!(tie.tree_count(), 2);

        assert!(RandomForest::new(Vec::new()).is_err());
    }

    #[test]
    fn classifier_params_deserialize_both_kinds() {
        let tree: ClassifierParams = serde_json::from_str(
            r#"{"kind": "decision_tree", "nodes": [
                {"feature": 6, "threshold": 0.5, "left": 1, "right": 2},
                {"label": 21}, {"label": 1}
            ]}"#,
        )
        .expect("tree params");
        let tree = Classifier::from_params(tree).expect("valid tree");
        assert_eq!(tree.kind(), "decision_tree");
        assert_eq!(tree.predict(&vector(0.0, 0.9)).expect("predict"), CropLabel(1));

        let forest: ClassifierParams = serde_json::from_str(
            r#"{"kind": "random_forest", "trees": [
                {"nodes": [{"label": 3}]}, {"nodes": [{"label": 3}]}, {"nodes": [{"label": 8}]}
            ]}"#,
        )
        .expect("forest params");
        let forest = Classifier::from_params(forest).expect("valid forest");
        assert_eq!(forest.kind(), "random_forest");
        assert_eq!(forest.predict(&vector(0.0, 0.0)).expect("predict"), CropLabel(3));
    }

    #[test]
    fn invalid_forest_member_is_named() {
        let params = ClassifierParams::RandomForest {
            trees: vec![
                super::TreeParams { nodes: vec![leaf(1)] },
                super::TreeParams { nodes: Vec::new() },
            ],
        };
        let error = Classifier::from_params(params).expect_err("empty member tree");
        assert!(error.to_string().contains("tree 1"));
    }

    #[test]
    fn classifier_refuses_non_finite_input() {
        let classifier = Classifier::Tree(rainfall_tree());
        let result = classifier.predict(&vector(f64::NAN, 0.0));
        assert!(matches!(result, Err(ModelError::NonFinite { .. })));
    }
}
