mod common;

use common::fixtures::{canonical_ring, init_logging, square_sample, triangle_sample};
use poly_decoder::io::{read_json_file, write_json_file};
use poly_decoder::pipeline::{AssemblyParams, ModelOutputDump, RecordedSample};
use poly_decoder::synthetic::ScriptedPredictor;
use poly_decoder::{
    DecodeError, FormattedRing, PipelineParams, PolygonPipeline, RingFormat, TokenizerParams,
};

fn pipeline(n_vertices: usize, format: RingFormat) -> PolygonPipeline {
    PolygonPipeline::new(PipelineParams {
        tokenizer: TokenizerParams {
            n_vertices,
            ..Default::default()
        },
        assembly: AssemblyParams { format },
        ..Default::default()
    })
    .unwrap()
}

fn favour(succ: &[usize]) -> Vec<Vec<f32>> {
    (0..succ.len())
        .map(|i| {
            (0..succ.len())
                .map(|j| if succ[i] == j { 2.0 } else { 0.0 })
                .collect()
        })
        .collect()
}

/// Three slots, `BOS = 224`, `EOS = 225`, `PAD = 226`.
fn recorded_dump() -> ModelOutputDump {
    ModelOutputDump {
        samples: vec![
            // Two-cycle over slots 0 and 2; slot 1 self-loops.
            RecordedSample {
                tokens: vec![224, 5, 6, 7, 8, 9, 10, 225],
                confidences: vec![0.9, 0.8, 0.7, 0.6],
                scores: favour(&[2, 1, 0]),
            },
            // Full 3-cycle, but only slot 0 carries a decoded vertex.
            RecordedSample {
                tokens: vec![224, 5, 6, 225, 226, 226, 226, 226],
                confidences: vec![0.9, 0.1, 0.1, 0.1],
                scores: favour(&[1, 2, 0]),
            },
            // EOS after an unpaired row token.
            RecordedSample {
                tokens: vec![224, 5, 6, 7, 225, 226, 226, 226],
                confidences: vec![0.9, 0.9, 0.9, 0.9],
                scores: favour(&[1, 2, 0]),
            },
        ],
    }
}

#[test]
fn scripted_generation_yields_closed_footprints() {
    init_logging();
    let pipeline = pipeline(8, RingFormat::Raw);
    let predictor = ScriptedPredictor::new(
        pipeline.tokenizer(),
        &[square_sample(10.0, 20.0, 30.0), triangle_sample()],
    )
    .unwrap();
    let mut rng = pipeline.driver().seeded_rng();
    let report = pipeline.generate(&predictor, &(), 2, &mut rng).unwrap();

    assert_eq!(report.summary.samples, 2);
    assert_eq!(report.summary.valid_samples, 2);
    assert_eq!(report.summary.rings, 2);
    assert_eq!(report.summary.degenerate_rings, 0);
    assert_eq!(report.summary.polygons, 2);

    let square = &report.samples[0];
    assert_eq!(square.decoded.vertex_count(), 4);
    assert_eq!(canonical_ring(&square.rings[0]), vec![0, 1, 2, 3]);
    assert_eq!(
        square.polygons,
        vec![FormattedRing::Points(vec![
            [10.0, 20.0],
            [10.0, 50.0],
            [40.0, 50.0],
            [40.0, 20.0],
        ])]
    );
    assert_eq!(report.samples[1].polygons[0].vertex_count(), 3);

    for label in ["generate", "postprocess", "assembly"] {
        assert!(report.timing.stage_ms(label).is_some(), "missing stage {label}");
    }
}

#[test]
fn recorded_outputs_are_assembled_and_flattened() {
    init_logging();
    let pipeline = pipeline(3, RingFormat::Flattened);
    let report = pipeline.run_recorded(&recorded_dump()).unwrap();

    assert_eq!(report.summary.samples, 3);
    assert_eq!(report.summary.valid_samples, 2);
    assert_eq!(report.summary.degenerate_rings, 1);
    assert!(report.timing.stage_ms("assignment").is_some());

    let two_cycle = &report.samples[0];
    assert_eq!(canonical_ring(&two_cycle.rings[0]), vec![0, 2]);
    assert_eq!(two_cycle.decoded.confidences, Some(vec![0.9, 0.8, 0.7]));
    let flat = match &two_cycle.polygons[0] {
        FormattedRing::Flat(v) => v.clone(),
        other => panic!("expected flattened ring, got {other:?}"),
    };
    assert_eq!(flat.len(), 4);
    assert!(flat == vec![6.0, 5.0, 10.0, 9.0] || flat == vec![10.0, 9.0, 6.0, 5.0]);

    // Padding slots are dropped from the resolved polygon.
    let partial = &report.samples[1];
    assert_eq!(partial.rings[0].len(), 3);
    assert_eq!(partial.polygons, vec![FormattedRing::Flat(vec![6.0, 5.0])]);

    // Rejected sequences still report rings but resolve to no polygons.
    let rejected = &report.samples[2];
    assert!(!rejected.decoded.is_valid());
    assert_eq!(rejected.rings.len(), 1);
    assert!(rejected.polygons.is_empty());
}

#[test]
fn degenerate_rescale_is_rejected_up_front() {
    let params = PipelineParams {
        assembly: AssemblyParams {
            format: RingFormat::Rescaled {
                source_size: 0.0,
                target_size: 300.0,
            },
        },
        ..Default::default()
    };
    assert!(matches!(
        PolygonPipeline::new(params),
        Err(DecodeError::InvalidParams(_))
    ));
}

#[test]
fn recorded_non_square_scores_are_fatal() {
    let pipeline = pipeline(3, RingFormat::Raw);
    let mut dump = recorded_dump();
    dump.samples[1].scores.pop();
    assert_eq!(
        pipeline.run_recorded(&dump).unwrap_err(),
        DecodeError::NotSquare { rows: 2, cols: 3 }
    );
}

#[test]
fn dump_and_report_survive_a_json_round_trip_on_disk() {
    let dir = std::env::temp_dir().join(format!("poly_decoder_it_{}", std::process::id()));
    let dump_path = dir.join("dump.json");
    write_json_file(&dump_path, &recorded_dump()).unwrap();
    let dump: ModelOutputDump = read_json_file(&dump_path).unwrap();
    assert_eq!(dump.samples.len(), 3);

    let report = pipeline(3, RingFormat::Swapped).run_recorded(&dump).unwrap();
    let report_path = dir.join("out").join("report.json");
    write_json_file(&report_path, &report).unwrap();
    let json: serde_json::Value = read_json_file(&report_path).unwrap();
    assert_eq!(json["summary"]["validSamples"], 2);
    assert_eq!(json["samples"][1]["polygons"][0][0][0], 6.0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn generation_can_be_assembled_separately() {
    let pipeline = pipeline(4, RingFormat::Swapped);
    let predictor =
        ScriptedPredictor::new(pipeline.tokenizer(), &[square_sample(0.0, 0.0, 100.0)]).unwrap();
    let driver = pipeline.driver();
    let generation = driver
        .generate(&predictor, &(), 1, &mut driver.seeded_rng())
        .unwrap();
    let report = pipeline.assemble_generation(&generation).unwrap();
    assert_eq!(report.summary.polygons, 1);
    assert_eq!(report.samples[0].polygons[0].vertex_count(), 4);
    assert!(report.timing.stage_ms("generate").is_none());
}
