//! Criterion benchmarks for consumer-synth components
//!
//! Run with: cargo bench -p consumer-synth

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use consumer_synth::{
    AdsrEnvelope, ChannelParameters, EnvelopeGenerator, Filter, LfoDestination, Note, Oscillator,
    SharedPatch, SynthChannel, SynthController, Waveform,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

// ============================================================================
// Oscillator benchmarks
// ============================================================================

fn bench_oscillator_waveforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("Oscillator");

    for waveform in Waveform::ALL {
        let name = format!("{:?}", waveform);
        for &block_size in BLOCK_SIZES {
            let mut osc = Oscillator::new(SAMPLE_RATE);

            group.bench_with_input(
                BenchmarkId::new(name.as_str(), block_size),
                &block_size,
                |b, &size| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for _ in 0..size {
                            sum += osc.advance(440.0, waveform, 0.1, 0);
                        }
                        black_box(sum)
                    })
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// Envelope and filter benchmarks
// ============================================================================

fn bench_envelope_adsr(c: &mut Criterion) {
    let mut group = c.benchmark_group("Envelope");
    let shape = AdsrEnvelope::new(0.01, 0.1, 0.7, 0.3);

    for &block_size in BLOCK_SIZES {
        let mut env = EnvelopeGenerator::new(SAMPLE_RATE);
        env.note_on();

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, &size| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for _ in 0..size {
                        sum += env.advance(&shape);
                    }
                    black_box(sum)
                })
            },
        );
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("Filter");

    let settings = [("Static", 0.0f32), ("EnvelopeSweep", 1.0f32)];

    for (name, env_amount) in settings {
        for &block_size in BLOCK_SIZES {
            let mut filter = Filter::new(SAMPLE_RATE);
            let mut osc = Oscillator::new(SAMPLE_RATE);

            group.bench_with_input(
                BenchmarkId::new(name, block_size),
                &block_size,
                |b, &size| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for i in 0..size {
                            let x = osc.advance(110.0, Waveform::Saw, 0.0, 0);
                            let env = i as f32 / size as f32;
                            sum += filter.process(x, 0.4, 0.6, 0.5, env_amount, env, 0.0);
                        }
                        black_box(sum)
                    })
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// Channel benchmarks
// ============================================================================

fn bench_channel(c: &mut Criterion) {
    let mut group = c.benchmark_group("SynthChannel");

    for &block_size in BLOCK_SIZES {
        let mut channel = SynthChannel::new(SAMPLE_RATE);
        channel.note_on(Note(60));
        let mut buffer = vec![0.0f32; block_size];

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                b.iter(|| {
                    channel.render_buffer(&mut buffer);
                    black_box(&buffer);
                })
            },
        );
    }

    group.finish();
}

fn bench_channel_full_modulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("SynthChannel_Modulated");

    let mut params = ChannelParameters::default();
    params.osc2.waveform = Waveform::Square;
    params.osc2.detune = 0.07;
    params.hard_sync = true;
    params.glide = 0.3;
    params.lfo.rate = 5.0;
    params.lfo.depth = 0.5;
    params.lfo.destination = LfoDestination::Both;
    params.filter.env_amount = 0.6;
    params.filter.resonance = 0.8;

    for &block_size in BLOCK_SIZES {
        let mut channel = SynthChannel::new(SAMPLE_RATE);
        channel.set_parameters(&params);
        let mut buffer = vec![0.0f32; block_size];
        let mut note = 0;

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                b.iter(|| {
                    // New pitch every block keeps glide and retrigger in play
                    channel.note_on(Note(48 + note % 24));
                    note += 7;
                    channel.render_buffer(&mut buffer);
                    black_box(&buffer);
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Cross-thread hand-off benchmarks
// ============================================================================

fn bench_renderer_with_patch_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("ChannelRenderer");

    for &block_size in BLOCK_SIZES {
        let Ok((mut controller, mut renderer)) = SynthController::new(SAMPLE_RATE) else {
            return;
        };
        let _ = controller.note_on(Note(57));
        let mut buffer = vec![0.0f32; block_size];
        let mut cutoff = 0.0f32;

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                b.iter(|| {
                    cutoff = (cutoff + 0.01) % 1.0;
                    controller.set_filter_cutoff(cutoff);
                    renderer.render_buffer(&mut buffer);
                    black_box(&buffer);
                })
            },
        );
    }

    group.finish();
}

fn bench_shared_patch(c: &mut Criterion) {
    let mut group = c.benchmark_group("SharedPatch");
    let params = ChannelParameters::default();
    let shared = SharedPatch::new(&params);

    group.bench_function("publish", |b| {
        b.iter(|| shared.publish(black_box(&params)));
    });

    group.bench_function("publish_and_read", |b| {
        let mut last = shared.sequence();
        let mut out = ChannelParameters::default();
        b.iter(|| {
            shared.publish(&params);
            black_box(shared.read_if_changed(&mut last, &mut out))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_oscillator_waveforms,
    bench_envelope_adsr,
    bench_filter,
    bench_channel,
    bench_channel_full_modulation,
    bench_renderer_with_patch_updates,
    bench_shared_patch,
);

criterion_main!(benches);
