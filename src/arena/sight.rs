use petgraph::graphmap::UnGraphMap;

/// the precomputed line-of-sight relation over cell indices. one
/// undirected edge per mutually visible pair keeps the relation symmetric
/// by construction; queries during play are a single lookup.
pub struct Sight(UnGraphMap<u32, ()>);

impl Sight {
    pub fn new() -> Self {
        Self(UnGraphMap::new())
    }

    pub fn link(&mut self, a: u32, b: u32) {
        self.0.add_edge(a, b, ());
    }

    pub fn visible(&self, a: u32, b: u32) -> bool {
        self.0.contains_edge(a, b)
    }

    /// number of visible pairs, for the load-time log line
    pub fn links(&self) -> usize {
        self.0.edge_count()
    }
}

impl Default for Sight {
    fn default() -> Self {
        Self::new()
    }
}
