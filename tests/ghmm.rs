//!
//! test of ghmm decoding on sampled data
//!
#[macro_use]
extern crate approx;

use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::io::Write;
use std::sync::Arc;
use tops::converter::{Alphabet, Converter};
use tops::ghmm::link_states;
use tops::ghmm::mocks::{mock_casino, mock_mixed};
use tops::prelude::*;
use tops::random_seq::generate;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn accuracy(truth: &[StateId], decoded: &[StateId]) -> f64 {
    assert_eq!(truth.len(), decoded.len());
    let hit = truth.iter().zip(decoded.iter()).filter(|(a, b)| a == b).count();
    hit as f64 / truth.len() as f64
}

#[test]
fn casino_decoding_recovers_labels() {
    init();
    let ghmm = mock_casino(GhmmParams::default()).unwrap();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
    let sample = ghmm.choose(&mut rng, 3000).unwrap();

    let v = ghmm.viterbi(&sample.observations).unwrap();
    let acc = accuracy(&sample.labels, &v.path);
    println!("viterbi accuracy {}", acc);
    assert!(acc > 0.7);

    let p = ghmm.posterior_decoding(&sample.observations).unwrap();
    let acc = accuracy(&sample.labels, &p.path);
    println!("posterior accuracy {}", acc);
    assert!(acc > 0.7);

    // the MAP labeling is at least as likely as the true one
    let truth = ghmm.evaluate(&sample.observations, &sample.labels).unwrap();
    assert!(v.probability >= truth);
    assert!(p.total >= v.probability);
}

#[test]
fn mixed_model_tables_are_consistent() {
    init();
    let ghmm = mock_mixed(GhmmParams::default()).unwrap();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
    let seqs: Vec<Sequence> = (0..8)
        .map(|_| ghmm.choose(&mut rng, 120).unwrap().observations)
        .collect();
    let totals = ghmm.forward_many(&seqs).unwrap();
    let paths = ghmm.viterbi_many(&seqs);
    for ((seq, total), path) in seqs.iter().zip(totals.iter()).zip(paths.into_iter()) {
        let b = ghmm.backward(seq).unwrap();
        assert_abs_diff_eq!(*total, b.total, epsilon = 1e-8);
        let v = path.unwrap();
        assert!(v.probability <= *total);
        assert_abs_diff_eq!(
            ghmm.evaluate(seq, &v.path).unwrap(),
            v.probability,
            epsilon = 1e-8
        );
    }
}

#[test]
fn dna_island_model() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("params.json");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, r#"{{"max_explicit_duration": 50, "cached_emissions": true}}"#).unwrap();
    let params = GhmmParams::from_json_file(&path).unwrap();
    assert_eq!(params.max_explicit_duration, 50);
    assert_eq!(params.max_backtracking, 15000);

    // background: second order chain trained on uniform DNA
    let training: Vec<Sequence> = (0..5).map(|seed| generate(2000, 4, seed)).collect();
    let background =
        VariableLengthMarkovChain::train_fixed_length(&training, 4, 2, 1.0, None).unwrap();
    let background: ProbabilisticModelPtr = Arc::new(background);
    // island: GC rich, explicit length around 20
    let island: ProbabilisticModelPtr =
        Arc::new(DiscreteIIDModel::new(vec![0.1, 0.4, 0.4, 0.1]).unwrap());
    let lengths: Vec<usize> = (10..=30).collect();
    let lengths = DiscreteIIDModel::smoothed_histogram(&lengths, 60, 2.0).unwrap();

    let mut states = vec![
        State::new(
            0,
            "background",
            background,
            Arc::new(DiscreteIIDModel::new(vec![0.98, 0.02]).unwrap()),
            Duration::Geometric,
        ),
        State::new(
            1,
            "island",
            island,
            Arc::new(DiscreteIIDModel::new(vec![1.0, 0.0]).unwrap()),
            Duration::explicit(Arc::new(lengths)),
        ),
    ];
    link_states(&mut states);
    let ghmm = GeneralizedHiddenMarkovModel::new(
        states,
        Arc::new(DiscreteIIDModel::new(vec![0.9, 0.1]).unwrap()),
        4,
        params,
    )
    .unwrap();

    let dna = Alphabet::dna();
    let xs = dna
        .convert_bytes(b"ATATTAATATTTAAGCGCGGCCGCGGCGCCGCGGCGCGCATATTATAATTATATAT")
        .unwrap();
    let v = ghmm.viterbi(&xs).unwrap();
    let islands: Vec<_> = v.segments().into_iter().filter(|s| s.state == 1).collect();
    assert_eq!(islands.len(), 1);
    assert!(islands[0].start >= 10 && islands[0].end <= 45);
    let decoded = dna.revert_all(&xs[islands[0].start..islands[0].end]).unwrap();
    let gc = decoded.iter().filter(|b| *b == "G" || *b == "C").count();
    assert!(gc * 10 >= decoded.len() * 8);
}
