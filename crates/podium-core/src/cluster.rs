//! Unsupervised topic grouping over scored sentences.
//!
//! Sentences are vectorized with smoothed TF-IDF (alphabetical vocabulary,
//! stopwords and near-ubiquitous terms removed, rows l2-normalized) and
//! grouped with seeded k-means, so a given seed always produces the same
//! clusters. Each cluster is labeled with the terms that most distinguish
//! its centroid from the corpus mean.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::analysis::HIGHLIGHT_MIN_TOKENS;
use crate::types::SentenceScore;

/// Terms appearing in more than this share of sentences carry no signal.
const MAX_DF_RATIO: f64 = 0.9;
const MAX_ITERATIONS: usize = 100;
/// Terms used in a cluster label.
const TOP_TERMS: usize = 3;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how",
    "i", "if", "in", "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "nor",
    "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "under", "until",
    "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "would", "you", "your",
];

/// One discovered topic group, ordered by average sentiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicCluster {
    /// 1-based rank after ordering by average sentiment, best first.
    pub id: usize,
    pub label: String,
    pub member_count: usize,
    pub average_sentiment: f64,
}

/// Group already-scored sentences into at most `k` topics. Returns an empty
/// list when there are fewer than `2 * k` usable sentences.
pub fn cluster_topics(sentences: &[SentenceScore], k: usize, seed: u64) -> Vec<TopicCluster> {
    if k == 0 {
        return Vec::new();
    }
    let docs: Vec<(&SentenceScore, Vec<String>)> = sentences
        .iter()
        .filter_map(|s| {
            if s.text.split_whitespace().count() < HIGHLIGHT_MIN_TOKENS {
                return None;
            }
            let terms = terms(&s.text);
            (!terms.is_empty()).then_some((s, terms))
        })
        .collect();
    if docs.len() < 2 * k {
        return Vec::new();
    }

    let (columns, rows) = vectorize(&docs);
    if columns.is_empty() {
        return Vec::new();
    }
    let assignments = kmeans(&rows, k, seed);

    let mut global = vec![0.0; columns.len()];
    for row in &rows {
        for (g, v) in global.iter_mut().zip(row) {
            *g += v;
        }
    }
    for g in &mut global {
        *g /= rows.len() as f64;
    }

    let mut clusters = Vec::new();
    for cluster in 0..k {
        let members: Vec<usize> = assignments
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == cluster)
            .map(|(i, _)| i)
            .collect();
        if members.is_empty() {
            continue;
        }
        let mut centroid = vec![0.0; columns.len()];
        for &i in &members {
            for (c, v) in centroid.iter_mut().zip(&rows[i]) {
                *c += v;
            }
        }
        for c in &mut centroid {
            *c /= members.len() as f64;
        }

        let mut ranked: Vec<(usize, f64)> = centroid
            .iter()
            .zip(&global)
            .map(|(c, g)| c - g)
            .enumerate()
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        let label = ranked
            .iter()
            .take(TOP_TERMS)
            .map(|&(col, _)| columns[col].as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let average_sentiment =
            members.iter().map(|&i| docs[i].0.compound).sum::<f64>() / members.len() as f64;
        clusters.push(TopicCluster {
            id: 0,
            label,
            member_count: members.len(),
            average_sentiment,
        });
    }

    clusters.sort_by(|a, b| b.average_sentiment.total_cmp(&a.average_sentiment));
    for (i, cluster) in clusters.iter_mut().enumerate() {
        cluster.id = i + 1;
    }
    clusters
}

/// Lowercased alphabetic terms of at least two letters, stopwords removed.
fn terms(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|raw| {
            let core: String = raw
                .chars()
                .filter(|c| c.is_alphabetic())
                .collect::<String>()
                .to_lowercase();
            (core.chars().count() >= 2 && !STOPWORDS.contains(&core.as_str())).then_some(core)
        })
        .collect()
}

/// Smoothed TF-IDF rows over an alphabetical vocabulary.
fn vectorize(docs: &[(&SentenceScore, Vec<String>)]) -> (Vec<String>, Vec<Vec<f64>>) {
    let n_docs = docs.len() as f64;
    let mut df: BTreeMap<&str, usize> = BTreeMap::new();
    for (_, terms) in docs {
        let unique: BTreeSet<&str> = terms.iter().map(String::as_str).collect();
        for term in unique {
            *df.entry(term).or_insert(0) += 1;
        }
    }

    let mut columns = Vec::new();
    let mut idf = Vec::new();
    for (&term, &count) in &df {
        if (count as f64) <= MAX_DF_RATIO * n_docs {
            columns.push(term.to_string());
            idf.push((n_docs / (1.0 + count as f64)).ln() + 1.0);
        }
    }

    let index: HashMap<&str, usize> = columns
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();
    let mut rows = Vec::with_capacity(docs.len());
    for (_, terms) in docs {
        let mut row = vec![0.0; columns.len()];
        for term in terms {
            if let Some(&col) = index.get(term.as_str()) {
                row[col] += 1.0;
            }
        }
        for (value, idf) in row.iter_mut().zip(&idf) {
            *value *= idf;
        }
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut row {
                *value /= norm;
            }
        }
        rows.push(row);
    }
    (columns, rows)
}

/// Plain k-means with a seeded init; an emptied cluster keeps its previous
/// centroid instead of being reseeded.
fn kmeans(rows: &[Vec<f64>], k: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let indices: Vec<usize> = (0..rows.len()).collect();
    let mut centroids: Vec<Vec<f64>> = indices
        .choose_multiple(&mut rng, k)
        .map(|&i| rows[i].clone())
        .collect();

    let mut assignments = vec![0usize; rows.len()];
    for _ in 0..MAX_ITERATIONS {
        let next: Vec<usize> = rows.iter().map(|row| nearest(row, &centroids)).collect();
        let converged = next == assignments;
        assignments = next;

        let mut sums = vec![vec![0.0; rows[0].len()]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];
        for (row, &cluster) in rows.iter().zip(&assignments) {
            counts[cluster] += 1;
            for (s, v) in sums[cluster].iter_mut().zip(row) {
                *s += v;
            }
        }
        for (cluster, sum) in sums.into_iter().enumerate() {
            if counts[cluster] > 0 {
                centroids[cluster] = sum
                    .into_iter()
                    .map(|v| v / counts[cluster] as f64)
                    .collect();
            }
        }
        if converged {
            break;
        }
    }
    assignments
}

fn nearest(row: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let distance = row
            .iter()
            .zip(centroid)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>();
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}
