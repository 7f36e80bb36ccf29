//! Real-time note playback command.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use clap::Args;
use consumer_core::{clamp_channel, floats_are_equal, tick_length};
use consumer_synth::{ChannelRenderer, Note, SynthController, SynthError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

#[derive(Args)]
pub struct PlayArgs {
    /// Note indices to play in order (60 = middle C, -1 = rest)
    #[arg(
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_value = "60,64,67,72"
    )]
    notes: Vec<i32>,

    /// Fraction of each step the note is held before release
    #[arg(long, default_value = "0.5")]
    gate: f32,

    /// Tempo in beats per minute
    #[arg(long, default_value = "120")]
    bpm: f32,

    /// Sequencer ticks (sixteenth notes) per step
    #[arg(long, default_value = "4")]
    ticks: u32,

    /// Times to play the sequence (0 = until Ctrl+C)
    #[arg(long, default_value = "1")]
    repeat: u32,

    /// Patch parameters (e.g., "filter_cutoff=0.4")
    #[arg(long, value_parser = parse_key_val, num_args = 1)]
    param: Vec<(String, f32)>,

    /// Output device name
    #[arg(long)]
    output_device: Option<String>,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,

    /// Buffer size
    #[arg(long, default_value = "256")]
    buffer_size: u32,

    /// Output channels; the voice is copied to each
    #[arg(long, default_value = "2")]
    channels: u16,
}

fn parse_key_val(s: &str) -> Result<(String, f32), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid parameter format: '{}' (expected key=value)", s))?;
    let value = value
        .trim()
        .parse::<f32>()
        .map_err(|e| format!("Invalid value for '{}': {}", key, e))?;
    Ok((key.trim().to_string(), value))
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    if args.notes.is_empty() {
        anyhow::bail!("No notes to play. Use --notes 60,64,67");
    }
    if args.channels == 0 || args.buffer_size == 0 {
        anyhow::bail!("--channels and --buffer-size must be at least 1");
    }
    let gate = args.gate.clamp(0.0, 1.0);
    let sample_rate = args.sample_rate as f32;

    let (mut controller, renderer) = SynthController::new(sample_rate)?;
    for (name, value) in &args.param {
        let applied = controller.set_param_by_name(name, *value)?;
        if floats_are_equal(applied, *value) {
            println!("  {} = {}", name, applied);
        } else {
            println!("  {} = {} (clamped from {})", name, applied, value);
        }
    }

    let step_samples = tick_length(args.bpm, sample_rate) * args.ticks as f32;
    if step_samples <= 0.0 {
        anyhow::bail!("--bpm and --ticks must be positive");
    }
    let step = Duration::from_secs_f32(step_samples / sample_rate);
    let hold = step.mul_f32(gate);

    let device = find_output_device(args.output_device.as_deref())?;
    let device_name = device
        .description()
        .map(|d| d.name().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let sends = controller.sends();
    println!("Playing {} note(s)", args.notes.len());
    println!("  Output: {}", device_name);
    println!("  Sample rate: {} Hz", args.sample_rate);
    println!("  Buffer size: {} samples", args.buffer_size);
    println!(
        "  Step: {:.0} ms, held {:.0} ms",
        step.as_secs_f32() * 1000.0,
        hold.as_secs_f32() * 1000.0
    );
    println!("  Sends: reverb {:.2}, delay {:.2}", sends.reverb, sends.delay);
    println!("\nPress Ctrl+C to stop...\n");

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        println!("\nStopping...");
        r.store(false, Ordering::SeqCst);
    })?;

    let stream = build_stream(&device, &args, renderer)?;

    let mut pass = 0;
    'sequence: while args.repeat == 0 || pass < args.repeat {
        for &index in &args.notes {
            if !running.load(Ordering::SeqCst) {
                break 'sequence;
            }
            let note = Note(index);
            if note.is_off() {
                send(controller.note_off())?;
                sleep_while_running(step, &running);
                continue;
            }

            send(controller.note_on(note))?;
            sleep_while_running(hold, &running);
            send(controller.note_off())?;
            sleep_while_running(step.saturating_sub(hold), &running);
        }
        pass += 1;
    }

    // Let the release tail ring out
    send(controller.note_off())?;
    let release = controller.parameters().amp_envelope.release;
    sleep_while_running(Duration::from_secs_f32(release + 0.05), &running);

    drop(stream);
    println!("Done!");
    Ok(())
}

/// A full note queue drops the event; anything else ends playback.
fn send(result: consumer_synth::Result<()>) -> anyhow::Result<()> {
    match result {
        Ok(()) | Err(SynthError::EventQueueFull) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn sleep_while_running(duration: Duration, running: &AtomicBool) {
    const SLICE: Duration = Duration::from_millis(10);
    let mut remaining = duration;
    while !remaining.is_zero() && running.load(Ordering::SeqCst) {
        let nap = remaining.min(SLICE);
        thread::sleep(nap);
        remaining = remaining.saturating_sub(nap);
    }
}

fn find_output_device(name: Option<&str>) -> anyhow::Result<cpal::Device> {
    let host = cpal::default_host();
    tracing::info!(host = host.id().name(), "audio host");

    match name {
        Some(search) => {
            let search_lower = search.to_lowercase();
            for device in host.output_devices()? {
                if let Ok(description) = device.description()
                    && description.name().to_lowercase().contains(&search_lower)
                {
                    return Ok(device);
                }
            }
            anyhow::bail!("No output device matching '{}'", search)
        }
        None => host
            .default_output_device()
            .ok_or_else(|| anyhow::anyhow!("No default output device")),
    }
}

fn build_stream(
    device: &cpal::Device,
    args: &PlayArgs,
    mut renderer: ChannelRenderer,
) -> anyhow::Result<cpal::Stream> {
    let config = cpal::StreamConfig {
        channels: args.channels,
        sample_rate: args.sample_rate,
        buffer_size: cpal::BufferSize::Fixed(args.buffer_size),
    };
    let channels = args.channels as usize;

    // Sized up front; the callback never allocates
    let mut voice = vec![0.0f32; args.buffer_size as usize];

    let stream = device.build_output_stream(
        &config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            for frames in data.chunks_mut(voice.len() * channels) {
                let block = &mut voice[..frames.len() / channels];
                renderer.render_buffer(block);
                clamp_channel(block, 1.0);

                for (frame, &sample) in frames.chunks_exact_mut(channels).zip(block.iter()) {
                    frame.fill(sample);
                }
            }
        },
        |err| tracing::error!("Output stream error: {}", err),
        None,
    )?;

    stream.play()?;
    tracing::info!(
        channels = args.channels,
        sample_rate = args.sample_rate,
        "output stream started"
    );

    Ok(stream)
}
