//! Property-based tests for consumer-synth.
//!
//! Tests waveform bounds, envelope continuity, glide monotonicity, filter
//! stability, and patch sanitizing using proptest for randomized inputs.

use consumer_synth::{
    AdsrEnvelope, ChannelParameters, EnvelopeGenerator, Filter, GlideRamp, Note,
    PARAM_DESCRIPTORS, SynthChannel, Waveform,
};
use proptest::prelude::*;

const SR: f32 = 48000.0;

fn waveform() -> impl Strategy<Value = Waveform> {
    (0i32..4).prop_map(Waveform::from_index)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every waveform stays within [-1, 1] at every phase.
    #[test]
    fn waveform_bounded(shape in waveform(), phase in 0.0f32..1.0f32) {
        let s = shape.sample_at(phase);
        prop_assert!((-1.0..=1.0).contains(&s), "{:?} at {} gave {}", shape, phase, s);
    }

    /// Retriggering at any point never jumps by more than one sample's
    /// natural increment.
    #[test]
    fn envelope_retrigger_is_continuous(
        attack in 0.001f32..1.0f32,
        decay in 0.001f32..1.0f32,
        sustain in 0.0f32..=1.0f32,
        release in 0.001f32..1.0f32,
        run in 1usize..20000,
        released in any::<bool>(),
    ) {
        let shape = AdsrEnvelope::new(attack, decay, sustain, release);
        let mut env = EnvelopeGenerator::new(SR);
        env.note_on();
        for _ in 0..run {
            env.advance(&shape);
        }
        if released {
            env.note_off();
            for _ in 0..run / 2 {
                env.advance(&shape);
            }
        }

        let before = env.level();
        env.note_on();
        let after = env.advance(&shape);
        let step = 1.0 / (attack * SR);
        prop_assert!(after >= before, "retrigger fell: {} -> {}", before, after);
        prop_assert!(after - before <= step + 1e-6, "jump {} > step {}", after - before, step);
    }

    /// Glide approaches the target monotonically and never overshoots.
    #[test]
    fn glide_monotonic(
        from in 20.0f32..5000.0f32,
        to in 20.0f32..5000.0f32,
        amount in 0.0f32..=1.0f32,
    ) {
        let mut glide = GlideRamp::new(SR);
        glide.snap(from);
        let mut prev = from;
        for _ in 0..2048 {
            let hz = glide.advance(to, amount);
            if to >= from {
                prop_assert!(hz >= prev && hz <= to);
            } else {
                prop_assert!(hz <= prev && hz >= to);
            }
            prev = hz;
        }
    }

    /// Any filter setting keeps the output within [-1, 1].
    #[test]
    fn filter_bounded(
        cutoff in 0.0f32..=1.0f32,
        resonance in -0.5f32..=1.0f32,
        peak in 0.0f32..=1.0f32,
        env_amount in -1.0f32..=1.0f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut filter = Filter::new(SR);
        for _ in 0..32 {
            for (i, &x) in input.iter().enumerate() {
                let env = i as f32 / 32.0;
                let out = filter.process(x, cutoff, resonance, peak, env_amount, env, 0.0);
                prop_assert!(out.is_finite() && (-1.0..=1.0).contains(&out));
            }
        }
    }

    /// Sanitizing arbitrary values lands every field in range, and is idempotent.
    #[test]
    fn sanitize_in_range_and_idempotent(values in prop::array::uniform28(-100.0f32..100.0f32)) {
        let patch = ChannelParameters::from_values(&values);
        for (i, v) in patch.to_values().iter().enumerate() {
            let desc = &PARAM_DESCRIPTORS[i];
            prop_assert!(desc.min <= *v && *v <= desc.max, "{} = {}", desc.string_id, v);
        }
        prop_assert_eq!(patch.sanitized(), patch);
    }

    /// Any sanitized patch renders finite, bounded audio.
    #[test]
    fn channel_output_bounded(
        values in prop::array::uniform28(-2.0f32..22.0f32),
        note in 0i32..128,
    ) {
        let patch = ChannelParameters::from_values(&values);
        let mut channel = SynthChannel::new(SR);
        channel.set_parameters(&patch);
        channel.note_on(Note(note));

        let mut buffer = [0.0f32; 512];
        for _ in 0..4 {
            channel.render_buffer(&mut buffer);
            for &s in &buffer {
                prop_assert!(s.is_finite() && (-1.0..=1.0).contains(&s));
            }
        }
    }
}
