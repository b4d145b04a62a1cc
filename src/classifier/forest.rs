//! Random forest stored as JSON.
//!
//! Nodes are laid out the way scikit-learn lays out its fitted trees: node 0
//! is the root, children always come after their parent, and a sample goes
//! left when `x[feature] <= threshold`. Leaves carry per-class weights
//! (sample counts or fractions); each tree's leaf is normalized and the
//! forest averages those distributions.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::Classifier;
use crate::error::{Error, Result};
use crate::features::{check_feature_names, FeatureVector, FEATURE_COUNT};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    /// Class labels, in the column order of every leaf's `value`
    pub classes: Vec<i64>,
    /// Column names the forest was trained on, if the exporter recorded them
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub trees: Vec<Tree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

impl Tree {
    fn validate(&self, n_classes: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(format!("node {idx}: feature index {feature} out of range"));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {idx}: threshold is not finite"));
                    }
                    for child in [*left, *right] {
                        // children after parent rules out cycles
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {idx}: invalid child index {child}"));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(format!(
                            "node {idx}: leaf has {} weights, expected {n_classes}",
                            value.len()
                        ));
                    }
                    if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        return Err(format!("node {idx}: leaf weights must be finite and non-negative"));
                    }
                    if value.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("node {idx}: leaf weights sum to zero"));
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { value } => return value,
            }
        }
    }
}

impl ForestModel {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.classes.is_empty() {
            return Err("forest declares no classes".to_string());
        }
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        if let Some(names) = &self.feature_names {
            check_feature_names(names)?;
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.classes.len())
                .map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct ForestClassifier {
    model: ForestModel,
}

impl ForestClassifier {
    pub fn new(model: ForestModel) -> Result<Self> {
        model.validate().map_err(Error::invalid_model)?;
        Ok(Self { model })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let model: ForestModel = serde_json::from_reader(reader)?;
        Self::new(model)
    }
}

impl Classifier for ForestClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<i64> {
        let proba = self.predict_proba(features)?;
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(self.model.classes[best])
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        let x = features.as_slice();
        let mut proba = vec![0.0; self.model.classes.len()];
        for tree in &self.model.trees {
            let leaf = tree.leaf(x);
            let total: f64 = leaf.iter().sum();
            for (acc, w) in proba.iter_mut().zip(leaf) {
                *acc += w / total;
            }
        }
        let n = self.model.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        Ok(proba)
    }

    fn name(&self) -> &str {
        "random-forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stump(threshold: f64, low: [f64; 2], high: [f64; 2]) -> serde_json::Value {
        json!({
            "nodes": [
                {"feature": 0, "threshold": threshold, "left": 1, "right": 2},
                {"value": low},
                {"value": high}
            ]
        })
    }

    fn forest(trees: Vec<serde_json::Value>) -> ForestModel {
        serde_json::from_value(json!({
            "classes": [0, 1],
            "feature_names": ["rainfall", "temperature", "humidity"],
            "trees": trees
        }))
        .unwrap()
    }

    #[test]
    fn test_single_tree_routes_on_threshold() {
        let clf = ForestClassifier::new(forest(vec![stump(100.0, [8.0, 2.0], [9.0, 91.0])])).unwrap();

        let heavy = FeatureVector::new([120.5, 28.0, 80.0]);
        assert_eq!(clf.predict(&heavy).unwrap(), 1);
        let proba = clf.predict_proba(&heavy).unwrap();
        assert!((proba[1] - 0.91).abs() < 1e-12);

        // threshold itself goes left
        let edge = FeatureVector::new([100.0, 28.0, 80.0]);
        assert_eq!(clf.predict(&edge).unwrap(), 0);
    }

    #[test]
    fn test_forest_averages_normalized_leaves() {
        let clf = ForestClassifier::new(forest(vec![
            stump(50.0, [1.0, 0.0], [0.0, 4.0]),
            stump(150.0, [3.0, 1.0], [0.0, 1.0]),
        ]))
        .unwrap();

        // tree 1 -> [0, 1], tree 2 -> [0.75, 0.25]
        let proba = clf.predict_proba(&FeatureVector::new([100.0, 0.0, 0.0])).unwrap();
        assert!((proba[0] - 0.375).abs() < 1e-12);
        assert!((proba[1] - 0.625).abs() < 1e-12);
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tie_goes_to_first_class() {
        let clf = ForestClassifier::new(forest(vec![stump(0.0, [1.0, 1.0], [1.0, 1.0])])).unwrap();
        assert_eq!(clf.predict(&FeatureVector::new([5.0, 0.0, 0.0])).unwrap(), 0);
    }

    #[test]
    fn test_rejects_backward_child() {
        let model = forest(vec![json!({
            "nodes": [
                {"feature": 0, "threshold": 1.0, "left": 1, "right": 0},
                {"value": [1.0, 0.0]}
            ]
        })]);
        let err = ForestClassifier::new(model).unwrap_err();
        assert!(err.to_string().contains("invalid child index 0"));
    }

    #[test]
    fn test_rejects_unknown_feature_index() {
        let model = forest(vec![json!({
            "nodes": [
                {"feature": 3, "threshold": 1.0, "left": 1, "right": 2},
                {"value": [1.0, 0.0]},
                {"value": [0.0, 1.0]}
            ]
        })]);
        assert!(ForestClassifier::new(model).is_err());
    }

    #[test]
    fn test_rejects_leaf_width_mismatch() {
        let model = forest(vec![json!({"nodes": [{"value": [1.0, 0.0, 0.0]}]})]);
        assert!(ForestClassifier::new(model).is_err());
    }

    #[test]
    fn test_rejects_reordered_feature_names() {
        let mut model = forest(vec![stump(1.0, [1.0, 0.0], [0.0, 1.0])]);
        model.feature_names = Some(vec![
            "humidity".to_string(),
            "temperature".to_string(),
            "rainfall".to_string(),
        ]);
        let err = ForestClassifier::new(model).unwrap_err();
        assert!(matches!(err, Error::InvalidModel(_)));
    }

    #[test]
    fn test_rejects_empty_forest() {
        assert!(ForestClassifier::new(forest(vec![])).is_err());
    }
}
