//! Benchmarks for the per-chunk hot path

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::VecDeque;

use voxlog::{
    encode_chunk, normalize, AudioChunk, AudioFrame, ChunkAssembler, FrameRead, Result,
    SilenceGate,
};

/// Speech-like chunk: a tone under a slow envelope at dictation levels
fn generate_voiced_chunk(sample_rate: u32, duration_secs: f32) -> AudioChunk {
    let num_samples = (sample_rate as f32 * duration_secs) as usize;
    let samples: Vec<i16> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let envelope = 0.5 + 0.5 * (2.0 * std::f32::consts::PI * 3.0 * t).sin();
            (8000.0 * envelope * (2.0 * std::f32::consts::PI * 200.0 * t).sin()) as i16
        })
        .collect();
    AudioChunk::from_samples(sample_rate, samples)
}

struct ScriptedSource {
    frames: VecDeque<AudioFrame>,
}

impl FrameRead for ScriptedSource {
    fn read_frame(&mut self) -> Result<Option<AudioFrame>> {
        Ok(self.frames.pop_front())
    }
}

fn bench_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("silence_gate");
    let chunk = generate_voiced_chunk(16000, 2.0);
    let gate = SilenceGate::new(200.0);

    group.bench_function("voiced_2s", |b| b.iter(|| black_box(gate.accept(&chunk))));
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for duration in [1.0f32, 2.0, 4.0] {
        let chunk = generate_voiced_chunk(16000, duration);
        group.bench_with_input(
            BenchmarkId::new("voiced", format!("{:.0}s", duration)),
            &chunk,
            |b, chunk| b.iter(|| black_box(normalize(chunk.clone()))),
        );
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    let chunk = generate_voiced_chunk(16000, 2.0);

    group.bench_function("wav_2s", |b| {
        b.iter(|| black_box(encode_chunk(&chunk).unwrap()))
    });
    group.finish();
}

fn bench_assembler(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunk_assembler");
    let frames_per_chunk = 46;
    let frame: AudioFrame = generate_voiced_chunk(16000, 0.064).samples;

    group.bench_function("assemble_3s", |b| {
        b.iter_with_setup(
            || ScriptedSource {
                frames: (0..frames_per_chunk).map(|_| frame.clone()).collect(),
            },
            |mut source| {
                let assembler = ChunkAssembler::new(16000, frames_per_chunk);
                black_box(assembler.assemble(&mut source).unwrap())
            },
        )
    });
    group.finish();
}

criterion_group!(benches, bench_gate, bench_normalize, bench_encode, bench_assembler);
criterion_main!(benches);
