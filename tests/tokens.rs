mod common;

use common::fixtures::unit_tokenizer;
use poly_decoder::postprocess::postprocess_one;
use poly_decoder::{postprocess, Tokenizer, TokenizerParams, Vertex};

#[test]
fn round_trip_stays_within_one_bin() {
    let tok = Tokenizer::new(TokenizerParams {
        num_bins: 100,
        image_size: 320.0,
        n_vertices: 4,
    })
    .unwrap();
    let bound = 320.0 / 100.0;
    let mut c = 0.0f32;
    while c < 320.0 {
        let seq = tok.encode(&[Vertex::new(c, 319.9 - c)], tok.max_len()).unwrap();
        let back = tok.decode(&seq);
        assert_eq!(back.len(), 1);
        assert!((back[0].row - c).abs() <= bound, "row {c} -> {}", back[0].row);
        assert!((back[0].col - (319.9 - c)).abs() <= bound);
        c += 0.37;
    }
}

#[test]
fn parity_recovers_every_vertex_count() {
    let n = 12;
    let tok = unit_tokenizer(n);
    for k in 0..=n {
        let vertices: Vec<Vertex> = (0..k)
            .map(|i| Vertex::new(i as f32 * 3.0, 200.0 - i as f32))
            .collect();
        let seq = tok.encode(&vertices, tok.max_len()).unwrap();
        assert_eq!(seq.len(), tok.max_len());
        let confs = vec![0.5f32; n + 1];
        let decoded = postprocess_one(&seq, &confs, &tok).unwrap();
        assert_eq!(decoded.vertex_count(), k, "k={k}");
        assert_eq!(decoded.coords.as_deref(), Some(vertices.as_slice()), "k={k}");
        assert_eq!(decoded.confidences.as_ref().map(Vec::len), Some(k));
    }
}

#[test]
fn misplaced_or_missing_eos_rejects_the_sample() {
    let tok = unit_tokenizer(4);
    let (bos, eos, pad) = (tok.bos(), tok.eos(), tok.pad());
    let sequences: Vec<Vec<u32>> = vec![
        vec![bos, 5, 6, 7, 8, eos, pad, pad, pad, pad],
        vec![bos, 5, 6, 7, eos, pad, pad, pad, pad, pad],
        vec![bos, 5, 6, 7, 8, 9, 10, 11, 12, 13],
        vec![eos, 5, 6, eos, pad, pad, pad, pad, pad, pad],
    ];
    let confidences = vec![vec![0.91234f32, 0.4, 0.3, 0.2, 0.1]; sequences.len()];
    let decoded = postprocess(&sequences, &confidences, &tok).unwrap();
    assert_eq!(
        decoded[0].coords,
        Some(vec![Vertex::new(5.0, 6.0), Vertex::new(7.0, 8.0)])
    );
    assert_eq!(decoded[0].confidences, Some(vec![0.912, 0.4]));
    assert!(decoded[1..].iter().all(|d| !d.is_valid()));
    assert!(decoded[1..].iter().all(|d| d.confidences.is_none()));
}

#[test]
fn batch_length_mismatch_is_an_error() {
    let tok = unit_tokenizer(2);
    let sequences = vec![vec![tok.bos(), tok.eos()]];
    assert!(postprocess(&sequences, &[], &tok).is_err());
}
