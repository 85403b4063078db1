//! pcmix - mix raw PCM files
//!
//! Reads headerless PCM files in the configured format, mixes them one buffer
//! at a time and writes the result to a file or to the configured output.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use pcmix_audio::{
    AudioSink, CpalSink, FileSink, Gain, Mixer, NullSink, OutputDriver, PcmFormat, Source,
};
use pcmix_core::config::{AudioBackendKind, AudioConfig, Config};

struct Input {
    gain: Option<Gain>,
    data: Vec<u8>,
}

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(config) => {
            pcmix_core::logging::init(&config);
            config
        }
        Err(e) => {
            pcmix_core::logging::init_default();
            tracing::warn!("Using default config: {}", e);
            Config::default()
        }
    };

    let args: Vec<String> = env::args().collect();
    if args.get(1).map(String::as_str) == Some("--write-config") {
        config.save().context("Failed to save config")?;
        println!("Wrote {}", Config::config_path()?.display());
        return Ok(());
    }
    if args.len() < 3 {
        eprintln!("Usage: {} <out.pcm|-> <in.pcm[:volume|:left:right]>...", args[0]);
        eprintln!("       {} --write-config", args[0]);
        eprintln!("\nMixes raw PCM files. '-' plays through the configured backend.");
        std::process::exit(1);
    }

    let inputs = args[2..]
        .iter()
        .map(|arg| load_input(arg))
        .collect::<Result<Vec<_>>>()?;

    let mut output = open_output(&args[1], &config.audio).context("Failed to open output")?;
    let format = *output.mixer().format();

    let written = mix_all(&mut output, &inputs, format)?;
    output.finish().context("Failed to finish output")?;
    output.close();

    tracing::info!("Wrote {} bytes from {} input(s)", written, inputs.len());
    Ok(())
}

/// Build the mixer for the configured format and start its sink.
fn open_output(
    target: &str,
    audio: &AudioConfig,
) -> pcmix_core::Result<OutputDriver<Box<dyn AudioSink>>> {
    let format = PcmFormat::from_config(audio)?;
    tracing::info!(
        "Mixing {}-bit {:?}-endian, {} channel(s), {} byte buffer",
        format.sample_bits(),
        format.byte_order(),
        format.channels(),
        audio.buffer_size
    );

    let sink = open_sink(target, format, audio);
    let mut output = OutputDriver::with_sink(Mixer::new(format, audio.buffer_size), sink);
    output.start()?;
    Ok(output)
}

fn open_sink(target: &str, format: PcmFormat, audio: &AudioConfig) -> Box<dyn AudioSink> {
    if target != "-" {
        return Box::new(FileSink::new(target));
    }
    match audio.backend {
        AudioBackendKind::Null => Box::new(NullSink::new()),
        AudioBackendKind::Cpal => {
            Box::new(CpalSink::new(format, audio.sample_rate, audio.buffer_size))
        }
        AudioBackendKind::File => Box::new(FileSink::new(&audio.output_path)),
    }
}

fn load_input(arg: &str) -> Result<Input> {
    let (path, gain) = parse_input(arg);
    let data = fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    tracing::debug!("Loaded {} ({} bytes, gain {:?})", path.display(), data.len(), gain);
    Ok(Input { gain, data })
}

/// Split `path[:volume]` or `path[:left:right]`.
fn parse_input(arg: &str) -> (PathBuf, Option<Gain>) {
    let Some((rest, last)) = arg.rsplit_once(':') else {
        return (PathBuf::from(arg), None);
    };
    let Ok(last) = last.parse::<f32>() else {
        return (PathBuf::from(arg), None);
    };
    if let Some((path, first)) = rest.rsplit_once(':') {
        if let Ok(first) = first.parse::<f32>() {
            return (PathBuf::from(path), Some(Gain::stereo(first, last)));
        }
    }
    (PathBuf::from(rest), Some(Gain::uniform(last)))
}

fn mix_all<S: AudioSink>(
    output: &mut OutputDriver<S>,
    inputs: &[Input],
    format: PcmFormat,
) -> Result<usize> {
    let buffer = output.mixer().buffer_size();
    let chunk = buffer - buffer % format.frame_bytes();
    if chunk == 0 {
        bail!("Buffer size {} is smaller than one frame", buffer);
    }

    let longest = inputs.iter().map(|i| i.data.len()).max().unwrap_or(0);
    let mut written = 0;
    for offset in (0..longest).step_by(chunk) {
        let sources: Vec<Source<'_>> = inputs
            .iter()
            .filter(|input| offset < input.data.len())
            .map(|input| Source {
                bytes: &input.data[offset..(offset + chunk).min(input.data.len())],
                gain: input.gain,
            })
            .collect();
        written += output
            .play(&sources)
            .with_context(|| format!("Failed to play chunk at byte {}", offset))?;
    }
    Ok(written)
}
