//! Community statistics, computed on demand from a completed run's output,
//! per §4.6's output contract and grounded on `original_source`'s
//! `LouvainClusteringStatistics`/`LeidenClusteringStatistics::Compute`.

use super::CommunityResult;
use crate::parallel::{atomic_add_u32, atomic_max_u32, parallel_for_chunked};
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommunityStatistics {
    pub n_clusters: u32,
    pub n_non_trivial_clusters: u32,
    pub largest_cluster_size: u32,
    pub largest_cluster_proportion: f64,
    pub modularity: f64,
}

impl CommunityStatistics {
    pub fn compute(result: &CommunityResult) -> Self {
        let sizes: Vec<AtomicU32> = (0..result.num_communities)
            .map(|_| AtomicU32::new(0))
            .collect();
        parallel_for_chunked(0..result.community_of.len() as u32, 1024, |v| {
            atomic_add_u32(&sizes[result.community_of[v as usize] as usize], 1);
        });

        let largest = AtomicU32::new(0);
        let non_trivial = AtomicU32::new(0);
        parallel_for_chunked(0..result.num_communities, 256, |c| {
            let size = sizes[c as usize].load(Ordering::SeqCst);
            atomic_max_u32(&largest, size);
            if size > 1 {
                atomic_add_u32(&non_trivial, 1);
            }
        });

        let largest_cluster_size = largest.load(Ordering::SeqCst);
        let total_nodes = result.community_of.len() as f64;
        let largest_cluster_proportion = if total_nodes > 0.0 {
            largest_cluster_size as f64 / total_nodes
        } else {
            0.0
        };

        CommunityStatistics {
            n_clusters: result.num_communities,
            n_non_trivial_clusters: non_trivial.load(Ordering::SeqCst),
            largest_cluster_size,
            largest_cluster_proportion,
            modularity: result.modularity,
        }
    }
}
