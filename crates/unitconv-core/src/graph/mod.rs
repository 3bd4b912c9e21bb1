//! Conversion graph: path resolution, caching and preferred units
//!
//! Units are the nodes and [`Conversion`]s the directed edges of a
//! multigraph. Paths are found with a first-match depth-first search that
//! honours edge declaration order, so the order of the definition file is a
//! meaningful tie-break. Multi-hop results are memoized in a [`PathCache`].

pub mod cache;
pub mod path;

pub use cache::{CacheStats, PathCache, PathKey};
pub use path::ConversionPath;

use crate::conversion::Conversion;
use crate::error::{Error, Result};
use crate::types::Quantity;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info};

/// Longest chain of edges the search will build
pub const MAX_PATH_HOPS: usize = 32;

/// Converts quantities between units by composing declared conversions
#[derive(Debug)]
pub struct Converter {
    conversions: Vec<Conversion>,
    preferred_units: Vec<String>,
    cache: PathCache,
}

impl Converter {
    /// Build a graph, self-testing every edge first
    ///
    /// The first edge that fails its fixtures aborts construction; no
    /// partially valid graph is ever returned.
    pub fn new(conversions: Vec<Conversion>, preferred_units: Vec<String>) -> Result<Self> {
        let converter = Self {
            conversions,
            preferred_units,
            cache: PathCache::new(),
        };
        converter.test()?;

        info!(
            conversions = converter.conversions.len(),
            preferred_units = ?converter.preferred_units,
            "Conversion graph ready"
        );

        Ok(converter)
    }

    /// Run the self-test of every conversion in declaration order
    pub fn test(&self) -> Result<()> {
        for conversion in &self.conversions {
            conversion.test()?;
        }
        Ok(())
    }

    /// Declared edges, in declaration order
    pub fn conversions(&self) -> &[Conversion] {
        &self.conversions
    }

    /// Preferred targets, in declaration order
    pub fn preferred_units(&self) -> &[String] {
        &self.preferred_units
    }

    /// Every unit label that appears on an edge, sorted
    pub fn units(&self) -> Vec<&str> {
        self.conversions
            .iter()
            .flat_map(|conversion| [conversion.from.as_str(), conversion.to.as_str()])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Whether a path for the pair is memoized
    pub fn is_cached(&self, from: &str, to: &str) -> bool {
        self.cache.contains(from, to)
    }

    /// Find a chain of conversions from one unit to another
    pub fn resolve(&self, from: &str, to: &str) -> Result<ConversionPath<'_>> {
        if let Some(edges) = self.cache.get(from, to) {
            debug!(from, to, hops = edges.len(), "Path cache hit");
            return Ok(ConversionPath::new(&self.conversions, edges));
        }

        let reaching = self.units_reaching(to);
        let mut path = Vec::new();
        let mut visited = HashSet::from([from]);

        let found =
            reaching.contains(from) && self.search(from, to, &reaching, &mut path, &mut visited);
        if !found {
            debug!(from, to, "No conversion path");
            return Err(Error::NoPathFound {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let mut edges: Arc<[usize]> = Arc::from(path);
        // Single-hop resolutions are cheap and not memoized.
        if edges.len() > 1 {
            let key = PathKey::new(from, to);
            debug!(key = %key, hops = edges.len(), "Caching conversion path");
            edges = self.cache.insert(key, edges);
        }

        Ok(ConversionPath::new(&self.conversions, edges))
    }

    /// Units with at least one edge chain ending at `target`
    fn units_reaching(&self, target: &str) -> HashSet<&str> {
        let mut reaching = HashSet::new();
        let mut queue = VecDeque::from([target]);

        while let Some(unit) = queue.pop_front() {
            for conversion in self.conversions.iter().filter(|c| c.to == unit) {
                if reaching.insert(conversion.from.as_str()) {
                    queue.push_back(conversion.from.as_str());
                }
            }
        }

        reaching
    }

    /// Depth-first search extending `path` from `node` towards `target`
    ///
    /// Only units in `reaching` are entered, which keeps failed lookups
    /// from enumerating every simple path of a dense graph.
    fn search<'a>(
        &'a self,
        node: &'a str,
        target: &str,
        reaching: &HashSet<&str>,
        path: &mut Vec<usize>,
        visited: &mut HashSet<&'a str>,
    ) -> bool {
        if path.len() >= MAX_PATH_HOPS {
            return false;
        }

        let candidates: Vec<usize> = self
            .conversions
            .iter()
            .enumerate()
            .filter(|(index, conversion)| conversion.from == node && !path.contains(index))
            .map(|(index, _)| index)
            .collect();

        if let Some(&direct) = candidates
            .iter()
            .find(|&&index| self.conversions[index].to == target)
        {
            path.push(direct);
            return true;
        }

        for index in candidates {
            let next = self.conversions[index].to.as_str();
            if !reaching.contains(next) || !visited.insert(next) {
                continue;
            }

            path.push(index);
            if self.search(next, target, reaching, path, visited) {
                return true;
            }
            path.pop();
            visited.remove(next);
        }

        false
    }

    /// Convert a quantity to the given unit
    pub fn convert(&self, input: &Quantity, to: &str) -> Result<Quantity> {
        ensure_unit(input)?;
        let path = self.resolve(&input.unit, to)?;
        path.apply(input)
    }

    /// Pick the preferred unit a quantity in `unit` should be converted to
    ///
    /// Every preferred unit is tried in declaration order and the last
    /// reachable one is kept.
    pub fn preferred_unit_for(&self, unit: &str) -> Result<&str> {
        let mut target = None;
        for preferred in &self.preferred_units {
            if self.resolve(unit, preferred).is_ok() {
                target = Some(preferred.as_str());
            }
        }

        target.ok_or_else(|| Error::NoPreferredUnitReachable {
            unit: unit.to_string(),
        })
    }

    /// Convert a quantity to its preferred unit
    pub fn convert_to_preferred_unit(&self, input: &Quantity) -> Result<Quantity> {
        ensure_unit(input)?;
        let to = self.preferred_unit_for(&input.unit)?;
        self.convert(input, to)
    }
}

fn ensure_unit(input: &Quantity) -> Result<()> {
    if input.unit.is_empty() {
        return Err(Error::validation("unit", "quantity unit must not be empty"));
    }
    Ok(())
}
