use gist_core::Sentence;

use crate::algorithms::kmeans::{euclidean, KmeansResult};

/// Pick, for every non-empty cluster, the sentence whose vector lies closest
/// to that cluster's centroid.
///
/// `candidates` and `vectors` are aligned with `clustering.labels`. Members
/// are scanned in input order and only a strictly smaller distance replaces
/// the current pick, so ties go to the earliest sentence. The returned
/// sentences keep their original indices; output is in cluster-id order.
pub fn select_representatives(
    candidates: &[Sentence],
    vectors: &[Vec<f64>],
    clustering: &KmeansResult,
) -> Vec<Sentence> {
    let mut selected = Vec::with_capacity(clustering.centroids.len());

    for (cluster, centroid) in clustering.centroids.iter().enumerate() {
        let mut best: Option<(usize, f64)> = None;
        for member in clustering.members(cluster) {
            let dist = euclidean(&vectors[member], centroid);
            if best.map_or(true, |(_, best_dist)| dist < best_dist) {
                best = Some((member, dist));
            }
        }

        if let Some((member, _)) = best {
            selected.push(candidates[member].clone());
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use gist_core::index_sentences;

    fn clustering(labels: Vec<usize>, centroids: Vec<Vec<f64>>) -> KmeansResult {
        KmeansResult {
            k: centroids.len(),
            labels,
            centroids,
            iterations: 1,
            inertia: 0.0,
        }
    }

    #[test]
    fn picks_member_nearest_centroid() {
        let candidates = index_sentences(["a", "b", "c", "d"]);
        let vectors = vec![vec![0.0], vec![1.0], vec![9.0], vec![10.0]];
        let result = clustering(vec![0, 0, 1, 1], vec![vec![0.9], vec![9.8]]);

        let selected = select_representatives(&candidates, &vectors, &result);
        let indices: Vec<usize> = selected.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 3]);
    }

    #[test]
    fn ties_go_to_first_member() {
        let candidates = index_sentences(["left", "right"]);
        let vectors = vec![vec![0.0], vec![2.0]];
        let result = clustering(vec![0, 0], vec![vec![1.0]]);

        let selected = select_representatives(&candidates, &vectors, &result);
        assert_eq!(selected, vec![Sentence::new(0, "left")]);
    }

    #[test]
    fn keeps_original_indices_of_filtered_candidates() {
        // Candidates 0 and 2 of the source were filtered out before embedding.
        let candidates = vec![Sentence::new(1, "kept one"), Sentence::new(3, "kept two")];
        let vectors = vec![vec![0.0], vec![5.0]];
        let result = clustering(vec![1, 0], vec![vec![5.0], vec![0.0]]);

        let selected = select_representatives(&candidates, &vectors, &result);
        assert_eq!(
            selected,
            vec![Sentence::new(3, "kept two"), Sentence::new(1, "kept one")]
        );
    }

    #[test]
    fn empty_clusters_are_skipped() {
        let candidates = index_sentences(["only"]);
        let vectors = vec![vec![0.0]];
        let result = clustering(vec![0], vec![vec![0.0], vec![3.0]]);

        assert_eq!(select_representatives(&candidates, &vectors, &result).len(), 1);
    }
}
