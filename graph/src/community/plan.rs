//! Algorithm configuration objects, one per algorithm, each a named-
//! constructor builder rather than a public-field struct.
//!
//! Grounded on `original_source`'s `LouvainClusteringPlan`/
//! `LeidenClusteringPlan` (`libgalois/include/katana/analytics/
//! louvain_clustering/louvain_clustering.h`): a private constructor plus
//! named static factories (`DoAll()`, `Deterministic()`) and const getters,
//! so a plan is always constructed in one of its recognized modes and
//! every other field carries a documented default.

/// Which vertex-move schedule a Louvain/Leiden level uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityAlgorithm {
    /// Non-deterministic: every node races to compute its move in one
    /// parallel pass.
    DoAll,
    /// Colored schedule over `bucket_count` buckets, committed one bucket
    /// at a time; reproducible given a fixed thread count.
    Deterministic { bucket_count: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LouvainPlan {
    enable_vertex_following: bool,
    modularity_threshold_per_round: f64,
    modularity_threshold_total: f64,
    max_iterations: u32,
    min_graph_size: u32,
    algorithm: CommunityAlgorithm,
    verbose: bool,
}

impl LouvainPlan {
    fn new(algorithm: CommunityAlgorithm) -> Self {
        LouvainPlan {
            enable_vertex_following: false,
            modularity_threshold_per_round: 0.01,
            modularity_threshold_total: 0.01,
            max_iterations: 10,
            min_graph_size: 100,
            algorithm,
            verbose: false,
        }
    }

    pub fn do_all() -> Self {
        LouvainPlan::new(CommunityAlgorithm::DoAll)
    }

    pub fn deterministic() -> Self {
        LouvainPlan::new(CommunityAlgorithm::Deterministic { bucket_count: 16 })
    }

    pub fn with_enable_vertex_following(mut self, enable: bool) -> Self {
        self.enable_vertex_following = enable;
        self
    }

    pub fn with_modularity_threshold_per_round(mut self, threshold: f64) -> Self {
        self.modularity_threshold_per_round = threshold;
        self
    }

    pub fn with_modularity_threshold_total(mut self, threshold: f64) -> Self {
        self.modularity_threshold_total = threshold;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_min_graph_size(mut self, min_graph_size: u32) -> Self {
        self.min_graph_size = min_graph_size;
        self
    }

    /// Only meaningful on a plan built via [`LouvainPlan::deterministic`];
    /// ignored otherwise. See `spec.md` §9's bucket-count open question.
    pub fn with_bucket_count(mut self, bucket_count: u32) -> Self {
        if let CommunityAlgorithm::Deterministic { .. } = self.algorithm {
            self.algorithm = CommunityAlgorithm::Deterministic { bucket_count };
        }
        self
    }

    pub fn enable_vertex_following(&self) -> bool {
        self.enable_vertex_following
    }

    pub fn modularity_threshold_per_round(&self) -> f64 {
        self.modularity_threshold_per_round
    }

    pub fn modularity_threshold_total(&self) -> f64 {
        self.modularity_threshold_total
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn min_graph_size(&self) -> u32 {
        self.min_graph_size
    }

    pub fn algorithm(&self) -> CommunityAlgorithm {
        self.algorithm
    }

    /// Shows a progress bar over each level's vertex-move rounds.
    /// Off by default: a library call never prints unless asked to.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeidenPlan {
    louvain: LouvainPlan,
    resolution: f64,
    randomness: f64,
}

impl LeidenPlan {
    pub fn do_all() -> Self {
        LeidenPlan {
            louvain: LouvainPlan::do_all(),
            resolution: 1.0,
            randomness: 0.01,
        }
    }

    pub fn deterministic() -> Self {
        LeidenPlan {
            louvain: LouvainPlan::deterministic(),
            resolution: 1.0,
            randomness: 0.01,
        }
    }

    pub fn with_enable_vertex_following(mut self, enable: bool) -> Self {
        self.louvain = self.louvain.with_enable_vertex_following(enable);
        self
    }

    pub fn with_modularity_threshold_per_round(mut self, threshold: f64) -> Self {
        self.louvain = self.louvain.with_modularity_threshold_per_round(threshold);
        self
    }

    pub fn with_modularity_threshold_total(mut self, threshold: f64) -> Self {
        self.louvain = self.louvain.with_modularity_threshold_total(threshold);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.louvain = self.louvain.with_max_iterations(max_iterations);
        self
    }

    pub fn with_min_graph_size(mut self, min_graph_size: u32) -> Self {
        self.louvain = self.louvain.with_min_graph_size(min_graph_size);
        self
    }

    pub fn with_bucket_count(mut self, bucket_count: u32) -> Self {
        self.louvain = self.louvain.with_bucket_count(bucket_count);
        self
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_randomness(mut self, randomness: f64) -> Self {
        self.randomness = randomness;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.louvain = self.louvain.with_verbose(verbose);
        self
    }

    pub fn louvain(&self) -> &LouvainPlan {
        &self.louvain
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn randomness(&self) -> f64 {
        self.randomness
    }
}
