use crate::{graph::*, Result};
use log::error;

impl GraphModel {
    /// The campus map a fresh sandbox opens with:
    /// six labeled places, A to F, joined by eight undirected weighted roads.
    pub fn campus_demo() -> Self {
        Self::build_campus().unwrap_or_else(|e| {
            error!("cannot lay out the campus demo: {}", e);
            GraphModel::new()
        })
    }

    fn build_campus() -> Result<Self> {
        let mut g = GraphModel::new();
        let places = [
            ("A", "Main gate", 100.0, 100.0),
            ("B", "Faculty A", 300.0, 50.0),
            ("C", "Library", 300.0, 250.0),
            ("D", "Laboratory", 500.0, 150.0),
            ("E", "Dormitory", 700.0, 350.0),
            ("F", "Sports field", 500.0, 400.0),
        ];
        let ids: Vec<NodeId> = places
            .iter()
            .map(|(key, name, x, y)| {
                g.add_labeled_node(Position::new(*x, *y), format!("{} {}", key, name))
            })
            .collect();
        let roads = [
            (0, 1, 5.0),
            (0, 2, 3.0),
            (1, 3, 2.0),
            (2, 3, 7.0),
            (3, 4, 4.0),
            (5, 4, 1.0),
            (2, 5, 6.0),
            (1, 2, 6.0),
        ];
        for (u, v, w) in roads {
            g.add_or_update_edge(ids[u], ids[v], w, false)?;
        }
        Ok(g)
    }
}
