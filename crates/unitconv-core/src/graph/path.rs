//! Resolved conversion paths

use crate::conversion::Conversion;
use crate::error::Result;
use crate::types::Quantity;
use std::fmt;
use std::sync::Arc;

/// An ordered chain of edges borrowed from a [`Converter`](super::Converter)
///
/// The path stores edge indices only; the edges themselves stay owned by
/// the graph.
#[derive(Debug, Clone)]
pub struct ConversionPath<'a> {
    conversions: &'a [Conversion],
    edges: Arc<[usize]>,
}

impl<'a> ConversionPath<'a> {
    pub(crate) fn new(conversions: &'a [Conversion], edges: Arc<[usize]>) -> Self {
        Self { conversions, edges }
    }

    /// Number of hops
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Indices of the edges in declaration order of the graph
    pub fn edge_indices(&self) -> &[usize] {
        &self.edges
    }

    /// Iterate over the edges in path order
    pub fn iter(&self) -> impl Iterator<Item = &'a Conversion> + '_ {
        let conversions = self.conversions;
        self.edges.iter().map(move |&index| &conversions[index])
    }

    /// Unit labels visited, starting with the source unit
    pub fn units(&self) -> Vec<&'a str> {
        let mut units = Vec::with_capacity(self.len() + 1);
        for (position, conversion) in self.iter().enumerate() {
            if position == 0 {
                units.push(conversion.from.as_str());
            }
            units.push(conversion.to.as_str());
        }
        units
    }

    /// Fold a quantity through every edge; the first failure aborts
    pub fn apply(&self, input: &Quantity) -> Result<Quantity> {
        self.iter()
            .try_fold(input.clone(), |quantity, conversion| conversion.convert(&quantity))
    }

    /// Whether two paths use the same edges
    pub fn same_edges(&self, other: &ConversionPath<'_>) -> bool {
        self.edges == other.edges
    }
}

impl fmt::Display for ConversionPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.units().join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges() -> Vec<Conversion> {
        vec![
            Conversion::new("m", "km", "magnitude / 1000", vec![]),
            Conversion::new("km", "in", "magnitude * 39370.0787", vec![]),
        ]
    }

    #[test]
    fn test_units_and_display() {
        let conversions = edges();
        let path = ConversionPath::new(&conversions, Arc::from(vec![0, 1]));
        assert_eq!(path.len(), 2);
        assert_eq!(path.units(), vec!["m", "km", "in"]);
        assert_eq!(path.to_string(), "m -> km -> in");
    }

    #[test]
    fn test_apply_stops_on_mismatch() {
        let conversions = edges();
        let path = ConversionPath::new(&conversions, Arc::from(vec![1, 0]));
        assert!(path.apply(&Quantity::new(1.0, "km")).is_err());
    }
}
