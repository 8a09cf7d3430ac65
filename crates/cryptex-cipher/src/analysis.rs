//! Text Statistics
//!
//! Character frequency, n-graphs and index of coincidence.

use crate::alphabet::{fold_case, Alphabet};
use crate::{Error, Result};
use std::collections::HashMap;

/// Occurrences of every distinct symbol in `text`, case-sensitive
pub fn character_frequency(text: &str) -> HashMap<char, usize> {
    let mut frequencies = HashMap::new();
    for c in text.chars() {
        *frequencies.entry(c).or_insert(0) += 1;
    }
    frequencies
}

/// Split `text` into consecutive chunks of `n` symbols (the last one may be
/// shorter) and rate each distinct chunk.
///
/// The rating is `(len(text) - len(text without the chunk)) / len(text)` in
/// integer division, so it is 0 unless the chunk covers the whole text.
/// Lengths count `char`s.
pub fn n_graph(text: &str, n: usize) -> Result<HashMap<String, usize>> {
    if n == 0 {
        return Err(Error::InvalidInput("n-graph length must be at least 1".into()));
    }

    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut graphs = HashMap::new();

    for chunk in chars.chunks(n) {
        let graph: String = chunk.iter().collect();
        if graphs.contains_key(&graph) {
            continue;
        }
        let remaining = text.replace(graph.as_str(), "").chars().count();
        graphs.insert(graph, (len - remaining) / len);
    }

    Ok(graphs)
}

/// Frequency report for the symbols of one alphabet
#[derive(Debug, Clone)]
pub struct FrequencyAnalysis {
    pub frequencies: HashMap<char, usize>,
    pub total_chars: usize,
    alphabet: Alphabet,
}

impl FrequencyAnalysis {
    /// Count the alphabet symbols of `text`, folding case
    pub fn analyze(text: &str, alphabet: &Alphabet) -> Self {
        let mut frequencies: HashMap<char, usize> = HashMap::new();
        let mut total_chars = 0;

        for c in text.chars().map(fold_case).filter(|&c| alphabet.contains(c)) {
            *frequencies.entry(c).or_insert(0) += 1;
            total_chars += 1;
        }

        Self {
            frequencies,
            total_chars,
            alphabet: alphabet.clone(),
        }
    }

    pub fn count(&self, c: char) -> usize {
        *self.frequencies.get(&fold_case(c)).unwrap_or(&0)
    }

    /// Get frequency as percentage
    pub fn frequency_percent(&self, c: char) -> f64 {
        if self.total_chars > 0 {
            (self.count(c) as f64 / self.total_chars as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate Index of Coincidence
    /// English text ≈ 0.067, random ≈ 0.038
    pub fn index_of_coincidence(&self) -> f64 {
        if self.total_chars < 2 {
            return 0.0;
        }

        let sum: usize = self.frequencies.values()
            .map(|&n| n * (n - 1))
            .sum();

        let n = self.total_chars;
        sum as f64 / (n * (n - 1)) as f64
    }

    /// Top `n` symbols, most frequent first; ties follow alphabet order
    pub fn top_chars(&self, n: usize) -> Vec<(char, usize)> {
        let mut sorted: Vec<(char, usize)> = self
            .alphabet
            .symbols()
            .iter()
            .filter_map(|&c| self.frequencies.get(&c).map(|&count| (c, count)))
            .collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }

    /// Render as ASCII frequency chart
    pub fn render_ascii(&self) -> String {
        let mut lines = Vec::new();
        lines.push("FREQUENCY ANALYSIS".to_string());
        lines.push("═".repeat(40));

        let max_count = *self.frequencies.values().max().unwrap_or(&1);
        let scale = 30.0 / max_count as f64;

        for &c in self.alphabet.symbols().iter().filter(|c| !c.is_control()) {
            let count = self.count(c);
            let bar = "█".repeat((count as f64 * scale) as usize);
            lines.push(format!("{}: {:5.2}% |{}", c, self.frequency_percent(c), bar));
        }

        lines.push(String::new());
        lines.push(format!("Index of Coincidence: {:.4}", self.index_of_coincidence()));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_frequency() {
        let freq = character_frequency("Hello, World");
        assert_eq!(freq[&'l'], 3);
        assert_eq!(freq[&'o'], 2);
        assert_eq!(freq[&'H'], 1);
        assert_eq!(freq.get(&'h'), None);
        assert_eq!(freq.values().sum::<usize>(), 12);
    }

    #[test]
    fn test_n_graph_chunks() {
        let graphs = n_graph("Hello, World!", 3).unwrap();
        let mut keys: Vec<&str> = graphs.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec![" Wo", "!", "Hel", "lo,", "rld"]);
        assert!(graphs.values().all(|&v| v == 0));
    }

    #[test]
    fn test_n_graph_integer_division() {
        // "aa" removes every symbol: (4 - 0) / 4 == 1
        let graphs = n_graph("aaaa", 2).unwrap();
        assert_eq!(graphs.len(), 1);
        assert_eq!(graphs["aa"], 1);

        let graphs = n_graph("abab", 2).unwrap();
        assert_eq!(graphs["ab"], 1);
    }

    #[test]
    fn test_n_graph_edge_cases() {
        assert!(n_graph("", 2).unwrap().is_empty());
        assert!(matches!(n_graph("abc", 0), Err(Error::InvalidInput(_))));
        assert_eq!(n_graph("abc", 10).unwrap()["abc"], 1);
    }

    #[test]
    fn test_frequency_analysis() {
        let analysis = FrequencyAnalysis::analyze("HELLO WORLD", &Alphabet::english());
        assert_eq!(analysis.total_chars, 10);
        assert_eq!(analysis.count('L'), 3);
        assert_eq!(analysis.count('l'), 3);
    }

    #[test]
    fn test_ioc_english() {
        let english = "TO BE OR NOT TO BE THAT IS THE QUESTION WHETHER TIS NOBLER";
        let analysis = FrequencyAnalysis::analyze(english, &Alphabet::english());
        let ioc = analysis.index_of_coincidence();
        assert!(ioc > 0.05 && ioc < 0.10, "IoC was {}", ioc);
    }

    #[test]
    fn test_top_chars() {
        let analysis = FrequencyAnalysis::analyze("AAABBCdd", &Alphabet::english());
        let top = analysis.top_chars(3);
        assert_eq!(top, vec![('a', 3), ('b', 2), ('d', 2)]);
    }

    #[test]
    fn test_render_lists_every_symbol() {
        let alphabet = Alphabet::new("abc").unwrap();
        let chart = FrequencyAnalysis::analyze("aab", &alphabet).render_ascii();
        assert!(chart.contains("a: 66.67%"));
        assert!(chart.contains("c:  0.00%"));
    }
}
