//! # Term Normalization
//!
//! Rewrites a CSG term into the left-leaning normal form used for image-based
//! CSG rendering (Kirsch & Döllner, "OpenCSG: A Library for Image-Based CSG
//! Rendering"). In normal form no difference or intersection node has an
//! operation as its right operand, which lets [`Chain::import`] flatten the
//! tree into a single ordered sequence.
//!
//! ## Rewrite rules
//!
//! Tried in priority order, at most one per step:
//!
//! ```text
//! 1. x - (y + z) -> (x - y) - z
//! 2. x * (y + z) -> (x * y) + (x * z)
//! 3. x - (y * z) -> (x - y) + (x - z)
//! 4. x * (y * z) -> (x * y) * z
//! 5. x - (y - z) -> (x - y) + (x * z)
//! 6. x * (y - z) -> (x * y) - z
//! 7. (x - y) * z -> (x * z) - y
//! 8. (x + y) - z -> (x - z) + (y - z)
//! 9. (x + y) * z -> (x * z) + (y * z)
//! ```
//!
//! [`Chain::import`]: crate::chain::Chain::import

use std::fmt;
use std::sync::Arc;

use config::constants::{NormalizerConfig, STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use stacker::maybe_grow;
use tracing::{debug, error, trace};

use crate::error::CsgError;
use crate::term::{CsgOp, Term};

/// One of the nine normalization rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// 1. `x - (y + z) -> (x - y) - z`
    DifferenceOfUnion,
    /// 2. `x * (y + z) -> (x * y) + (x * z)`
    IntersectionOfUnion,
    /// 3. `x - (y * z) -> (x - y) + (x - z)`
    DifferenceOfIntersection,
    /// 4. `x * (y * z) -> (x * y) * z`
    IntersectionOfIntersection,
    /// 5. `x - (y - z) -> (x - y) + (x * z)`
    DifferenceOfDifference,
    /// 6. `x * (y - z) -> (x * y) - z`
    IntersectionOfDifference,
    /// 7. `(x - y) * z -> (x * z) - y`
    DifferenceIntersected,
    /// 8. `(x + y) - z -> (x - z) + (y - z)`
    UnionSubtracted,
    /// 9. `(x + y) * z -> (x * z) + (y * z)`
    UnionIntersected,
}

impl Rule {
    /// All rules in priority order.
    pub const ALL: [Rule; 9] = [
        Rule::DifferenceOfUnion,
        Rule::IntersectionOfUnion,
        Rule::DifferenceOfIntersection,
        Rule::IntersectionOfIntersection,
        Rule::DifferenceOfDifference,
        Rule::IntersectionOfDifference,
        Rule::DifferenceIntersected,
        Rule::UnionSubtracted,
        Rule::UnionIntersected,
    ];

    /// 1-based rule number.
    pub fn number(&self) -> u8 {
        match self {
            Rule::DifferenceOfUnion => 1,
            Rule::IntersectionOfUnion => 2,
            Rule::DifferenceOfIntersection => 3,
            Rule::IntersectionOfIntersection => 4,
            Rule::DifferenceOfDifference => 5,
            Rule::IntersectionOfDifference => 6,
            Rule::DifferenceIntersected => 7,
            Rule::UnionSubtracted => 8,
            Rule::UnionIntersected => 9,
        }
    }

    /// Returns true for rules matching on the right operand (rules 1-6).
    pub fn rewrites_right(&self) -> bool {
        self.number() <= 6
    }

    /// Builds the rewritten term.
    ///
    /// Only the tree shape is checked; use [`match_rule`] to pick the rule.
    /// Returns `None` if the operand this rule destructures is a primitive.
    pub fn apply(&self, term: &Term) -> Option<Arc<Term>> {
        let (left, right) = term.children()?;
        if self.rewrites_right() {
            let (y, z) = right.children()?;
            Some(self.rewrite(left, y, z))
        } else {
            let (x, y) = left.children()?;
            Some(self.rewrite(x, y, right))
        }
    }

    fn rewrite(&self, x: &Arc<Term>, y: &Arc<Term>, z: &Arc<Term>) -> Arc<Term> {
        let (x, y, z) = (x.clone(), y.clone(), z.clone());
        match self {
            Rule::DifferenceOfUnion => Term::difference(Term::difference(x, y), z),
            Rule::IntersectionOfUnion => Term::union(
                Term::intersection(x.clone(), y),
                Term::intersection(x, z),
            ),
            Rule::DifferenceOfIntersection => {
                Term::union(Term::difference(x.clone(), y), Term::difference(x, z))
            }
            Rule::IntersectionOfIntersection => Term::intersection(Term::intersection(x, y), z),
            Rule::DifferenceOfDifference => {
                Term::union(Term::difference(x.clone(), y), Term::intersection(x, z))
            }
            Rule::IntersectionOfDifference => Term::difference(Term::intersection(x, y), z),
            Rule::DifferenceIntersected => Term::difference(Term::intersection(x, z), y),
            Rule::UnionSubtracted => {
                Term::union(Term::difference(x, z.clone()), Term::difference(y, z))
            }
            Rule::UnionIntersected => Term::union(
                Term::intersection(x, z.clone()),
                Term::intersection(y, z),
            ),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule {}", self.number())
    }
}

/// Finds the highest-priority rule matching the root of `term`.
///
/// Patterns on the right operand (rules 1-6) always win over patterns on the
/// left operand (rules 7-9).
pub fn match_rule(term: &Term) -> Option<Rule> {
    use CsgOp::{Difference, Intersection, Union};

    let Term::Operation { op, left, right } = term else {
        return None;
    };

    if let Some(inner) = right.op() {
        let rule = match (*op, inner) {
            (Difference, Union) => Some(Rule::DifferenceOfUnion),
            (Intersection, Union) => Some(Rule::IntersectionOfUnion),
            (Difference, Intersection) => Some(Rule::DifferenceOfIntersection),
            (Intersection, Intersection) => Some(Rule::IntersectionOfIntersection),
            (Difference, Difference) => Some(Rule::DifferenceOfDifference),
            (Intersection, Difference) => Some(Rule::IntersectionOfDifference),
            (Union, _) => None,
        };
        if rule.is_some() {
            return rule;
        }
    }

    match (left.op()?, *op) {
        (Difference, Intersection) => Some(Rule::DifferenceIntersected),
        (Union, Difference) => Some(Rule::UnionSubtracted),
        (Union, Intersection) => Some(Rule::UnionIntersected),
        _ => None,
    }
}

/// Applies at most one rewrite to the root of `term`.
///
/// Returns `term` itself (same allocation) when no rule matches, so callers
/// detect the fixed point with [`Arc::ptr_eq`].
pub fn normalize_tail(term: &Arc<Term>) -> Arc<Term> {
    let Some(rule) = match_rule(term) else {
        return Arc::clone(term);
    };
    match rule.apply(term) {
        Some(rewritten) => {
            trace!(rule = rule.number(), op = ?rewritten.op(), "applied rewrite");
            rewritten
        }
        None => Arc::clone(term),
    }
}

/// Normalizes `term` with the default configuration.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use glam::DVec3;
/// use openscad_csg::{normalize, BoundingBox, SolidRef, Term};
///
/// let solid: SolidRef = Arc::new(BoundingBox::new(DVec3::ZERO, DVec3::ONE));
/// let [a, b, c] = ["A", "B", "C"].map(|label| Term::labeled(solid.clone(), label));
///
/// let tree = Term::difference(Term::union(a, b), c);
/// let normal = normalize(&tree).unwrap();
/// assert_eq!(normal.dump(), "((A - C) + (B - C))");
/// ```
pub fn normalize(term: &Arc<Term>) -> Result<Arc<Term>, CsgError> {
    Normalizer::default().normalize(term)
}

/// Rewrites terms to normal form under a rewrite budget.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizerConfig,
    rewrites: usize,
    visits: usize,
}

impl Normalizer {
    /// Creates a normalizer with the given configuration.
    pub fn new(config: NormalizerConfig) -> Self {
        Self {
            config,
            rewrites: 0,
            visits: 0,
        }
    }

    /// Creates a normalizer allowing at most `max_rewrites` rule applications.
    pub fn with_max_rewrites(max_rewrites: usize) -> Result<Self, CsgError> {
        Ok(Self::new(NormalizerConfig::new(max_rewrites)?))
    }

    /// Active configuration.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Rule applications performed by the last [`normalize`](Self::normalize) call.
    pub fn rewrites(&self) -> usize {
        self.rewrites
    }

    /// Rule matches attempted by the last [`normalize`](Self::normalize) call.
    pub fn visits(&self) -> usize {
        self.visits
    }

    /// Rewrites `term` until every node is a fixed point of [`normalize_tail`].
    ///
    /// Unchanged subtrees are returned by reference; a term that is already
    /// normalized comes back as the same allocation.
    ///
    /// # Errors
    ///
    /// [`CsgError::RewriteLimitExceeded`] if the rewrite budget runs out.
    pub fn normalize(&mut self, term: &Arc<Term>) -> Result<Arc<Term>, CsgError> {
        self.rewrites = 0;
        self.visits = 0;
        let normalized = self.normalize_term(term)?;
        debug!(
            rewrites = self.rewrites,
            visits = self.visits,
            nodes_before = term.node_count(),
            nodes_after = normalized.node_count(),
            "normalized csg term"
        );
        Ok(normalized)
    }

    fn normalize_term(&mut self, term: &Arc<Term>) -> Result<Arc<Term>, CsgError> {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            if term.is_primitive() {
                return Ok(Arc::clone(term));
            }
            let current = self.normalize_children(term)?;
            self.settle(current)
        })
    }

    /// Runs the tail loop on a node whose operands are already normalized.
    ///
    /// After a rewrite only the nodes the rule just built are settled again;
    /// operands carried over from the old node are reused as they are.
    fn settle(&mut self, node: Arc<Term>) -> Result<Arc<Term>, CsgError> {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            let mut current = node;
            loop {
                self.visits += 1;
                let next = normalize_tail(&current);
                if Arc::ptr_eq(&next, &current) {
                    return Ok(current);
                }
                self.count_rewrite(&current)?;
                current = self.settle_built_children(&current, next)?;
            }
        })
    }

    fn settle_built_children(
        &mut self,
        before: &Term,
        next: Arc<Term>,
    ) -> Result<Arc<Term>, CsgError> {
        let (op, left, right) = match next.as_ref() {
            Term::Operation { op, left, right } => (*op, Arc::clone(left), Arc::clone(right)),
            Term::Primitive(_) => return Ok(next),
        };

        let new_left = if is_operand_of(before, &left) {
            Arc::clone(&left)
        } else {
            self.settle(Arc::clone(&left))?
        };
        let new_right = if is_operand_of(before, &right) {
            Arc::clone(&right)
        } else {
            self.settle(Arc::clone(&right))?
        };

        if Arc::ptr_eq(&new_left, &left) && Arc::ptr_eq(&new_right, &right) {
            Ok(next)
        } else {
            Ok(Term::operation(op, new_left, new_right))
        }
    }

    /// Normalizes both operands, rebuilding the node only if one changed.
    fn normalize_children(&mut self, term: &Arc<Term>) -> Result<Arc<Term>, CsgError> {
        let Term::Operation { op, left, right } = term.as_ref() else {
            return Ok(Arc::clone(term));
        };

        let new_left = self.normalize_term(left)?;
        let new_right = self.normalize_term(right)?;
        if Arc::ptr_eq(&new_left, left) && Arc::ptr_eq(&new_right, right) {
            Ok(Arc::clone(term))
        } else {
            Ok(Term::operation(*op, new_left, new_right))
        }
    }

    fn count_rewrite(&mut self, term: &Term) -> Result<(), CsgError> {
        self.rewrites += 1;
        if self.rewrites > self.config.max_rewrites {
            let nodes = term.node_count();
            error!(
                limit = self.config.max_rewrites,
                nodes,
                "csg normalization did not converge; rewrite limit exceeded"
            );
            return Err(CsgError::rewrite_limit(self.config.max_rewrites, nodes));
        }
        Ok(())
    }
}

/// Returns true if `node` is one of the subterms a rule at `term` can reuse:
/// an operand of `term` or an operand of one of its operands.
fn is_operand_of(term: &Term, node: &Arc<Term>) -> bool {
    let Some((left, right)) = term.children() else {
        return false;
    };
    [left, right].into_iter().any(|child| {
        Arc::ptr_eq(child, node)
            || child
                .children()
                .is_some_and(|(x, y)| Arc::ptr_eq(x, node) || Arc::ptr_eq(y, node))
    })
}
