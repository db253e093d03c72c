use crate::{Csr, CsrBuilder};
use shared::EdgeT;

/// Builds the transposed topology (out-edges of the reversed graph) in two
/// linear passes: count incoming degrees, then scatter. Returns the
/// transposed [`Csr`] together with a permutation such that
/// `permutation[new_edge_id] == old_edge_id`, so callers can still look up
/// the original edge's properties through a transposed view.
pub fn transpose(csr: &Csr) -> (Csr, Vec<EdgeT>) {
    let num_nodes = csr.num_nodes();
    let num_edges = csr.num_edges() as usize;

    let mut in_degrees = vec![0 as EdgeT; num_nodes as usize + 1];
    for e in 0..csr.num_edges() {
        let dst = csr.out_edge_dst(e);
        in_degrees[dst as usize + 1] += 1;
    }
    for v in 0..num_nodes as usize {
        in_degrees[v + 1] += in_degrees[v];
    }

    let mut cursor = in_degrees.clone();
    let mut out_dests = vec![0; num_edges];
    let mut permutation = vec![0 as EdgeT; num_edges];
    for v in 0..num_nodes {
        for e in csr.out_edges(v) {
            let dst = csr.out_edge_dst(e);
            let slot = &mut cursor[dst as usize];
            out_dests[*slot as usize] = v;
            permutation[*slot as usize] = e;
            *slot += 1;
        }
    }

    let csr = CsrBuilder::new(in_degrees, out_dests)
        .build()
        .expect("transposing a valid Csr cannot violate Csr invariants");
    (csr, permutation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_small_graph() {
        let csr =
            CsrBuilder::from_edge_list(4, &[(0, 1), (0, 2), (1, 2), (2, 3)]).unwrap();
        let (transposed, _) = transpose(&csr);
        assert_eq!(transposed.num_edges(), csr.num_edges());
        assert_eq!(transposed.out_neighbours(1), &[0]);
        let mut into_two: Vec<_> = transposed.out_neighbours(2).to_vec();
        into_two.sort();
        assert_eq!(into_two, vec![0, 1]);

        let (back, _) = transpose(&transposed);
        for v in 0..4 {
            let mut original: Vec<_> = csr.out_neighbours(v).to_vec();
            let mut round_tripped: Vec<_> = back.out_neighbours(v).to_vec();
            original.sort();
            round_tripped.sort();
            assert_eq!(original, round_tripped);
        }
    }
}
