use poly_decoder::synthetic::{ScriptedPredictor, ScriptedSample};
use poly_decoder::{PipelineParams, PolygonPipeline, TokenizerParams, Vertex};

fn main() {
    env_logger::init();

    // Replays two scripted footprints through generation and assembly.
    let params = PipelineParams {
        tokenizer: TokenizerParams {
            n_vertices: 8,
            ..Default::default()
        },
        ..Default::default()
    };
    let samples = [
        ScriptedSample {
            vertices: vec![
                Vertex::new(20.0, 20.0),
                Vertex::new(20.0, 90.0),
                Vertex::new(80.0, 90.0),
                Vertex::new(80.0, 20.0),
            ],
            successors: vec![1, 2, 3, 0],
        },
        ScriptedSample {
            vertices: vec![
                Vertex::new(120.0, 120.0),
                Vertex::new(120.0, 200.0),
                Vertex::new(190.0, 160.0),
            ],
            successors: vec![1, 2, 0],
        },
    ];

    let result = PolygonPipeline::new(params).and_then(|pipeline| {
        let predictor = ScriptedPredictor::new(pipeline.tokenizer(), &samples)?;
        let mut rng = pipeline.driver().seeded_rng();
        pipeline.generate(&predictor, &(), predictor.batch_size(), &mut rng)
    });

    match result {
        Ok(report) => {
            for (i, sample) in report.samples.iter().enumerate() {
                println!(
                    "sample={} vertices={} rings={:?}",
                    i,
                    sample.decoded.vertex_count(),
                    sample.rings
                );
            }
            println!("total_ms={:.3}", report.timing.total_ms);
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
