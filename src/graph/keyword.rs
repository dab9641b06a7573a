use std::path::Path;

use thiserror::Error;

use super::RelationGraph;

/// Error types for loading a persisted keyword graph
#[derive(Debug, Error)]
pub enum KeywordGraphError {
    #[error("Failed to read keyword graph file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Keyword graph file is missing line {0}")]
    MissingLine(usize),

    #[error("Keyword graph file line {line} is not a valid JSON list: {source}")]
    Malformed {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Keyword graph file has unexpected content after line 2")]
    TrailingContent,

    #[error("Duplicate keyword in vertex list: {0}")]
    DuplicateKeyword(String),

    #[error("Keyword related to itself: {0}")]
    SelfLoop(String),
}

/// Relationship graph over lowercase keywords
///
/// Two keywords share an edge when an external similarity judgment related
/// them. Keywords are lowercased at every entry point, so lookups are
/// case-insensitive and the stored vocabulary is canonical.
#[derive(Debug, Clone, Default)]
pub struct KeywordGraph {
    graph: RelationGraph<String>,
}

impl KeywordGraph {
    /// Creates an empty keyword graph
    pub fn new() -> Self {
        Self {
            graph: RelationGraph::new(),
        }
    }

    /// Loads a graph from its persisted file form
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, KeywordGraphError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_serialized(&contents)
    }

    /// Parses the two-line serialized form
    ///
    /// Line 1 is a JSON list of keywords, line 2 a JSON list of
    /// `[from, to]` relation pairs. Relations may name keywords absent from
    /// line 1; those are added on the fly. Anything else out of place
    /// rejects the whole document, leaving no partially-built graph behind.
    pub fn from_serialized(contents: &str) -> Result<Self, KeywordGraphError> {
        let mut lines = contents.lines();
        let vertex_line = lines.next().ok_or(KeywordGraphError::MissingLine(1))?;
        let edge_line = lines.next().ok_or(KeywordGraphError::MissingLine(2))?;
        if lines.any(|line| !line.trim().is_empty()) {
            return Err(KeywordGraphError::TrailingContent);
        }

        let keywords: Vec<String> = serde_json::from_str(vertex_line)
            .map_err(|source| KeywordGraphError::Malformed { line: 1, source })?;
        let relations: Vec<(String, String)> = serde_json::from_str(edge_line)
            .map_err(|source| KeywordGraphError::Malformed { line: 2, source })?;

        let mut graph = Self::new();
        for keyword in keywords {
            graph.add_keyword(&keyword)?;
        }
        for (from, to) in relations {
            graph.relate(&from, &to)?;
        }
        Ok(graph)
    }

    /// Adds a keyword vertex, failing on duplicates
    pub fn add_keyword(&mut self, keyword: &str) -> Result<(), KeywordGraphError> {
        let keyword = keyword.to_lowercase();
        self.graph
            .add_vertex(keyword.clone())
            .map_err(|_| KeywordGraphError::DuplicateKeyword(keyword))
    }

    /// Relates two keywords, adding either if absent
    pub fn relate(&mut self, from: &str, to: &str) -> Result<(), KeywordGraphError> {
        let from = from.to_lowercase();
        let to = to.to_lowercase();
        self.graph
            .add_all_edges([(from.clone(), to)])
            .map_err(|_| KeywordGraphError::SelfLoop(from))
    }

    /// Returns true when the keyword has a vertex in the graph
    pub fn contains(&self, keyword: &str) -> bool {
        self.graph.contains(&keyword.to_lowercase())
    }

    /// Vertex count of the shortest path between two keywords
    ///
    /// A keyword is at distance 1 from itself; unrelated or unknown
    /// keywords have no distance.
    pub fn path_length(&self, from: &str, to: &str) -> Option<usize> {
        self.graph
            .shortest_path(&from.to_lowercase(), &to.to_lowercase())
            .map(|(length, _)| length)
    }

    /// Number of keywords in the graph
    pub fn keyword_count(&self) -> usize {
        self.graph.vertex_count()
    }

    /// Number of relations in the graph
    pub fn relation_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns true when no keywords have been added
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = concat!(
        r#"["hero", "sword", "magic", "space"]"#,
        "\n",
        r#"[["hero", "sword"], ["sword", "magic"]]"#,
        "\n",
    );

    #[test]
    fn test_from_serialized_well_formed() {
        let graph = KeywordGraph::from_serialized(WELL_FORMED).unwrap();
        assert_eq!(graph.keyword_count(), 4);
        assert_eq!(graph.relation_count(), 2);
        assert!(graph.contains("hero"));
        assert!(graph.contains("space"));
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let contents = concat!(r#"["Hero", "SWORD"]"#, "\n", r#"[["Hero", "SWORD"]]"#);
        let graph = KeywordGraph::from_serialized(contents).unwrap();
        assert!(graph.contains("hero"));
        assert!(graph.contains("Sword"));
        assert_eq!(graph.path_length("HERO", "sword"), Some(2));
    }

    #[test]
    fn test_missing_edge_line_rejected() {
        let result = KeywordGraph::from_serialized(r#"["hero"]"#);
        assert!(matches!(result, Err(KeywordGraphError::MissingLine(2))));
    }

    #[test]
    fn test_empty_document_rejected() {
        let result = KeywordGraph::from_serialized("");
        assert!(matches!(result, Err(KeywordGraphError::MissingLine(1))));
    }

    #[test]
    fn test_malformed_vertex_line_rejected() {
        let contents = concat!("not json", "\n", "[]");
        let result = KeywordGraph::from_serialized(contents);
        assert!(matches!(
            result,
            Err(KeywordGraphError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_malformed_edge_line_rejected() {
        let contents = concat!(r#"["hero"]"#, "\n", r#"[["hero"]]"#);
        let result = KeywordGraph::from_serialized(contents);
        assert!(matches!(
            result,
            Err(KeywordGraphError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn test_trailing_content_rejected() {
        let contents = concat!(r#"["hero"]"#, "\n", "[]", "\n", "leftover");
        let result = KeywordGraph::from_serialized(contents);
        assert!(matches!(result, Err(KeywordGraphError::TrailingContent)));
    }

    #[test]
    fn test_trailing_blank_lines_tolerated() {
        let contents = concat!(r#"["hero"]"#, "\n", "[]", "\n", "\n");
        assert!(KeywordGraph::from_serialized(contents).is_ok());
    }

    #[test]
    fn test_duplicate_keyword_rejected() {
        let contents = concat!(r#"["hero", "Hero"]"#, "\n", "[]");
        let result = KeywordGraph::from_serialized(contents);
        assert!(matches!(
            result,
            Err(KeywordGraphError::DuplicateKeyword(word)) if word == "hero"
        ));
    }

    #[test]
    fn test_self_relation_rejected() {
        let contents = concat!(r#"["hero"]"#, "\n", r#"[["hero", "hero"]]"#);
        let result = KeywordGraph::from_serialized(contents);
        assert!(matches!(
            result,
            Err(KeywordGraphError::SelfLoop(word)) if word == "hero"
        ));
    }

    #[test]
    fn test_relations_may_introduce_keywords() {
        let contents = concat!(r#"["hero"]"#, "\n", r#"[["hero", "villain"]]"#);
        let graph = KeywordGraph::from_serialized(contents).unwrap();
        assert!(graph.contains("villain"));
        assert_eq!(graph.keyword_count(), 2);
    }

    #[test]
    fn test_path_length_counts_vertices() {
        let graph = KeywordGraph::from_serialized(WELL_FORMED).unwrap();
        assert_eq!(graph.path_length("hero", "hero"), Some(1));
        assert_eq!(graph.path_length("hero", "sword"), Some(2));
        assert_eq!(graph.path_length("hero", "magic"), Some(3));
    }

    #[test]
    fn test_path_length_unrelated_is_none() {
        let graph = KeywordGraph::from_serialized(WELL_FORMED).unwrap();
        assert_eq!(graph.path_length("hero", "space"), None);
        assert_eq!(graph.path_length("hero", "unknown"), None);
    }

    #[test]
    fn test_from_file_reads_disk() {
        let dir = std::env::temp_dir().join("torii-keyword-graph-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("graph.txt");
        std::fs::write(&path, WELL_FORMED).unwrap();

        let graph = KeywordGraph::from_file(&path).unwrap();
        assert_eq!(graph.keyword_count(), 4);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_from_file_missing_path_is_io_error() {
        let result = KeywordGraph::from_file("/nonexistent/keyword-graph.txt");
        assert!(matches!(result, Err(KeywordGraphError::Io(_))));
    }
}
