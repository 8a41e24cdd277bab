use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::Point2;

/// Priority reserved for the home base of a city.
pub const HOME_PRIORITY: u32 = 0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("Unknown city: {0}")]
    UnknownCity(String),
    #[error("City already exists: {0}")]
    DuplicateCity(String),
    #[error("City has no bases: {0}")]
    EmptyCity(String),
    #[error("Node index {index} out of range for {len} bases")]
    InvalidIndex { index: usize, len: usize },
    #[error("Edge {from} -> {to} points outside a graph of {len} bases")]
    InvalidEdge { from: usize, to: usize, len: usize },
    #[error("Base {base} has an invalid edge cost {cost}")]
    NegativeEdgeCost { base: String, cost: f32 },
    #[error("City {0} has no home base")]
    MissingHomeBase(String),
    #[error("City {0} has more than one home base")]
    MultipleHomeBases(String),
}

/// Directed link to another base of the same city, priced in fuel units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub to: usize,
    pub cost: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base {
    pub name: String,
    pub pos: Point2,
    pub priority: u32,
    pub neighbors: Vec<Edge>,
}

impl Base {
    pub fn new(name: impl Into<String>, x: f32, y: f32, priority: u32) -> Self {
        Self {
            name: name.into(),
            pos: Point2::new(x, y),
            priority,
            neighbors: Vec::new(),
        }
    }

    pub fn with_edges(mut self, edges: &[(usize, f32)]) -> Self {
        self.neighbors
            .extend(edges.iter().map(|&(to, cost)| Edge { to, cost }));
        self
    }

    pub fn is_home(&self) -> bool {
        self.priority == HOME_PRIORITY
    }

    pub fn edge_to(&self, to: usize) -> Option<&Edge> {
        self.neighbors.iter().find(|e| e.to == to)
    }

    /// Every edge cost must be finite and non-negative.
    pub fn check_costs(&self) -> Result<(), GraphError> {
        match self
            .neighbors
            .iter()
            .find(|e| !(e.cost >= 0.0 && e.cost.is_finite()))
        {
            Some(e) => Err(GraphError::NegativeEdgeCost {
                base: self.name.clone(),
                cost: e.cost,
            }),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    bases: Vec<Base>,
}

impl City {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
        }
    }

    /// Bases in insertion order; positions are the node ids used by the path finder.
    pub fn bases(&self) -> &[Base] {
        &self.bases
    }

    pub fn base(&self, index: usize) -> Result<&Base, GraphError> {
        self.bases.get(index).ok_or(GraphError::InvalidIndex {
            index,
            len: self.bases.len(),
        })
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.bases.iter().position(|b| b.name == name)
    }

    pub fn home_index(&self) -> Result<usize, GraphError> {
        let mut homes = self.bases.iter().enumerate().filter(|(_, b)| b.is_home());
        let (index, _) = homes
            .next()
            .ok_or_else(|| GraphError::MissingHomeBase(self.name.clone()))?;
        if homes.next().is_some() {
            return Err(GraphError::MultipleHomeBases(self.name.clone()));
        }
        Ok(index)
    }

    /// Checks edge targets and costs, and that there is exactly one home.
    pub fn validate(&self) -> Result<(), GraphError> {
        let len = self.bases.len();
        if len == 0 {
            return Err(GraphError::EmptyCity(self.name.clone()));
        }
        for (from, base) in self.bases.iter().enumerate() {
            base.check_costs()?;
            if let Some(e) = base.neighbors.iter().find(|e| e.to >= len) {
                return Err(GraphError::InvalidEdge { from, to: e.to, len });
            }
        }
        self.home_index().map(|_| ())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationGraph {
    cities: Vec<City>,
}

impl LocationGraph {
    pub fn new() -> Self {
        Self { cities: Vec::new() }
    }

    pub fn add_city(&mut self, name: impl Into<String>) -> Result<(), GraphError> {
        let name = name.into();
        if self.cities.iter().any(|c| c.name == name) {
            return Err(GraphError::DuplicateCity(name));
        }
        self.cities.push(City::new(name));
        Ok(())
    }

    pub fn add_base(&mut self, city_name: &str, base: Base) -> Result<(), GraphError> {
        base.check_costs()?;
        let city = self
            .cities
            .iter_mut()
            .find(|c| c.name == city_name)
            .ok_or_else(|| GraphError::UnknownCity(city_name.to_string()))?;
        city.bases.push(base);
        Ok(())
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn city(&self, name: &str) -> Result<&City, GraphError> {
        self.cities
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| GraphError::UnknownCity(name.to_string()))
    }

    pub fn bases_of(&self, city_name: &str) -> Result<&[Base], GraphError> {
        self.city(city_name).map(City::bases)
    }

    /// First base carrying the maximum priority.
    pub fn highest_priority_base(&self, city_name: &str) -> Result<&Base, GraphError> {
        let bases = self.bases_of(city_name)?;
        let mut best = bases
            .first()
            .ok_or_else(|| GraphError::EmptyCity(city_name.to_string()))?;
        for b in bases {
            if b.priority > best.priority {
                best = b;
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LocationGraph {
        let mut g = LocationGraph::new();
        g.add_city("Quetta").unwrap();
        g.add_base("Quetta", Base::new("Alpha", 8.0, 7.0, 4).with_edges(&[(2, 4.0)]))
            .unwrap();
        g.add_base("Quetta", Base::new("Gamma", 14.0, 13.0, 5).with_edges(&[(2, 8.0)]))
            .unwrap();
        g.add_base(
            "Quetta",
            Base::new("Home Base", 5.0, 5.0, 0).with_edges(&[(0, 4.0), (1, 8.0)]),
        )
        .unwrap();
        g
    }

    #[test]
    fn lookup_by_name() {
        let g = sample();
        let bases = g.bases_of("Quetta").unwrap();
        assert_eq!(bases.len(), 3);
        assert_eq!(bases[1].name, "Gamma");
        assert_eq!(
            g.bases_of("Atlantis"),
            Err(GraphError::UnknownCity("Atlantis".into()))
        );
    }

    #[test]
    fn duplicate_city_is_rejected() {
        let mut g = sample();
        assert_eq!(
            g.add_city("Quetta"),
            Err(GraphError::DuplicateCity("Quetta".into()))
        );
        assert_eq!(g.cities().len(), 1);
    }

    #[test]
    fn add_base_to_unknown_city_fails() {
        let mut g = sample();
        let err = g.add_base("Nowhere", Base::new("X", 0.0, 0.0, 1)).unwrap_err();
        assert_eq!(err, GraphError::UnknownCity("Nowhere".into()));
    }

    #[test]
    fn negative_edge_cost_is_rejected() {
        let mut g = sample();
        let bad = Base::new("Bad", 0.0, 0.0, 2).with_edges(&[(0, -1.0)]);
        assert!(matches!(
            g.add_base("Quetta", bad),
            Err(GraphError::NegativeEdgeCost { .. })
        ));
        assert_eq!(g.bases_of("Quetta").unwrap().len(), 3);
    }

    #[test]
    fn highest_priority_picks_first_maximum() {
        let mut g = sample();
        g.add_base("Quetta", Base::new("Gamma Two", 1.0, 1.0, 5)).unwrap();
        assert_eq!(g.highest_priority_base("Quetta").unwrap().name, "Gamma");

        g.add_city("Empty").unwrap();
        assert_eq!(
            g.highest_priority_base("Empty"),
            Err(GraphError::EmptyCity("Empty".into()))
        );
    }

    #[test]
    fn home_index_and_validation() {
        let g = sample();
        let city = g.city("Quetta").unwrap();
        assert_eq!(city.home_index(), Ok(2));
        assert!(city.validate().is_ok());

        let mut two_homes = city.clone();
        two_homes.bases.push(Base::new("Second Home", 0.0, 0.0, 0));
        assert_eq!(
            two_homes.validate(),
            Err(GraphError::MultipleHomeBases("Quetta".into()))
        );

        let mut dangling = city.clone();
        dangling.bases[0].neighbors.push(Edge { to: 9, cost: 1.0 });
        assert_eq!(
            dangling.validate(),
            Err(GraphError::InvalidEdge { from: 0, to: 9, len: 3 })
        );
    }

    #[test]
    fn deserialized_graph_with_negative_cost_fails_validation() {
        let json = r#"{ "cities": [ { "name": "X", "bases": [
            { "name": "T", "pos": { "x": 1.0, "y": 0.0 }, "priority": 3, "neighbors": [ { "to": 1, "cost": -30.0 } ] },
            { "name": "Home Base", "pos": { "x": 0.0, "y": 0.0 }, "priority": 0, "neighbors": [ { "to": 0, "cost": -30.0 } ] }
        ] } ] }"#;
        let g: LocationGraph = serde_json::from_str(json).unwrap();
        assert_eq!(
            g.city("X").unwrap().validate(),
            Err(GraphError::NegativeEdgeCost { base: "T".into(), cost: -30.0 })
        );
    }
}
